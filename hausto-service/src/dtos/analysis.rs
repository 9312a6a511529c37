use serde::Deserialize;
use serde_json::Value;

static NULL_PREFERENCE: Value = Value::Null;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzePropertyRequest {
    /// Loose so that a non-array value is reported as `no_images`.
    #[serde(default)]
    pub image_urls: Option<Value>,
    #[serde(default)]
    pub user_preference: Option<Value>,
    /// Listing title; logged for correlation only. Any JSON type is accepted.
    #[serde(default)]
    pub title: Option<Value>,
    /// Listing URL; logged for correlation only.
    #[serde(default)]
    pub url: Option<Value>,
}

impl AnalyzePropertyRequest {
    /// The image URLs, if `imageUrls` is a non-empty array.
    ///
    /// Non-string elements are kept through their JSON text.
    pub fn image_urls(&self) -> Option<Vec<String>> {
        let items = self.image_urls.as_ref()?.as_array()?;
        if items.is_empty() {
            return None;
        }
        Some(
            items
                .iter()
                .map(|item| match item {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect(),
        )
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_ref().and_then(Value::as_str)
    }

    pub fn listing_url(&self) -> Option<&str> {
        self.url.as_ref().and_then(Value::as_str)
    }

    /// The preference as sent, `null` when absent.
    pub fn preference(&self) -> &Value {
        self.user_preference.as_ref().unwrap_or(&NULL_PREFERENCE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(body: Value) -> AnalyzePropertyRequest {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn reads_camel_case_fields() {
        let req = parse(json!({
            "imageUrls": ["http://a/1.jpg"],
            "userPreference": { "style": "loft" },
            "title": "Sunny flat",
            "url": "http://listing/1"
        }));
        assert_eq!(req.image_urls(), Some(vec!["http://a/1.jpg".to_string()]));
        assert_eq!(req.preference(), &json!({ "style": "loft" }));
        assert_eq!(req.title(), Some("Sunny flat"));
        assert_eq!(req.listing_url(), Some("http://listing/1"));
    }

    #[test]
    fn non_string_context_fields_still_decode() {
        let req = parse(json!({
            "imageUrls": [],
            "title": 5,
            "url": { "href": "x" }
        }));
        assert_eq!(req.image_urls(), None);
        assert_eq!(req.title(), None);
        assert_eq!(req.listing_url(), None);
    }

    #[test]
    fn missing_non_array_and_empty_images_are_rejected() {
        assert_eq!(parse(json!({})).image_urls(), None);
        assert_eq!(parse(json!({ "imageUrls": "http://a/1.jpg" })).image_urls(), None);
        assert_eq!(parse(json!({ "imageUrls": { "0": "x" } })).image_urls(), None);
        assert_eq!(parse(json!({ "imageUrls": [] })).image_urls(), None);
    }

    #[test]
    fn non_string_elements_use_json_text() {
        let req = parse(json!({ "imageUrls": ["http://a/1.jpg", 7] }));
        assert_eq!(
            req.image_urls(),
            Some(vec!["http://a/1.jpg".to_string(), "7".to_string()])
        );
    }

    #[test]
    fn absent_preference_is_null() {
        assert_eq!(parse(json!({ "imageUrls": ["x"] })).preference(), &Value::Null);
    }
}
