use serde::{Deserialize, Serialize};

/// Signed-in user as reported by the identity provider. Never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentityProfile {
    /// Lifted from the profile as-is; usually a string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<serde_json::Value>,
    /// The provider's user-info document, passed through untouched.
    pub profile: serde_json::Value,
}

impl IdentityProfile {
    pub fn from_userinfo(profile: serde_json::Value) -> Self {
        let email = profile
            .get("email")
            .filter(|v| !v.is_null())
            .cloned();
        Self { email, profile }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn email_is_lifted_from_userinfo() {
        let profile = IdentityProfile::from_userinfo(json!({
            "sub": "1234",
            "email": "ada@example.com",
            "email_verified": true
        }));
        assert_eq!(profile.email, Some(json!("ada@example.com")));
        assert_eq!(profile.profile["sub"], "1234");
    }

    #[test]
    fn non_string_email_is_kept() {
        let profile = IdentityProfile::from_userinfo(json!({ "email": ["a@x.com", "b@x.com"] }));
        assert_eq!(profile.email, Some(json!(["a@x.com", "b@x.com"])));

        let null_email = IdentityProfile::from_userinfo(json!({ "email": null }));
        assert_eq!(null_email.email, None);
    }

    #[test]
    fn missing_email_is_omitted_from_json() {
        let profile = IdentityProfile::from_userinfo(json!({ "sub": "1234" }));
        let body = serde_json::to_value(&profile).unwrap();
        assert!(body.get("email").is_none());
        assert_eq!(body["profile"]["sub"], "1234");
    }
}
