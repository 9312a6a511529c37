use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Default, Deserialize)]
pub struct ExchangeCodeRequest {
    /// Kept loose so that a missing, null or non-string code is reported as
    /// `no_code` instead of a body decoding failure.
    #[serde(default)]
    pub code: Option<Value>,
}

impl ExchangeCodeRequest {
    /// The authorization code, if present and non-empty.
    pub fn code(&self) -> Option<&str> {
        self.code
            .as_ref()
            .and_then(Value::as_str)
            .filter(|c| !c.is_empty())
    }
}
