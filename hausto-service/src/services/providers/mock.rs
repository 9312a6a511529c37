//! Mock provider implementation for testing.

use super::{GenerationParams, ProviderError, ProviderResponse, TextProvider};
use async_trait::async_trait;
use std::sync::Mutex;

/// Scripted text provider.
///
/// Each rule pairs a prompt fragment with a canned reply (`None` = the model
/// returned no content). The first rule whose fragment occurs in the prompt
/// answers, so replies do not depend on call order. Every prompt is recorded.
pub struct MockTextProvider {
    rules: Vec<(String, Option<String>)>,
    default_reply: Option<String>,
    fail_on: Option<String>,
    prompts: Mutex<Vec<String>>,
}

impl MockTextProvider {
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            default_reply: Some("Mock response".to_string()),
            fail_on: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Reply with `reply` to any prompt containing `fragment`.
    pub fn reply_when(mut self, fragment: &str, reply: &str) -> Self {
        self.rules
            .push((fragment.to_string(), Some(reply.to_string())));
        self
    }

    /// Return a choice without content for prompts containing `fragment`.
    pub fn empty_when(mut self, fragment: &str) -> Self {
        self.rules.push((fragment.to_string(), None));
        self
    }

    /// Fail with an API error for prompts containing `fragment`.
    pub fn fail_when(mut self, fragment: &str) -> Self {
        self.fail_on = Some(fragment.to_string());
        self
    }

    /// Prompts received so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .map(|p| p.clone())
            .unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.prompts().len()
    }
}

impl Default for MockTextProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TextProvider for MockTextProvider {
    async fn complete(
        &self,
        prompt: &str,
        _params: &GenerationParams,
    ) -> Result<ProviderResponse, ProviderError> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }

        if let Some(fragment) = &self.fail_on {
            if prompt.contains(fragment.as_str()) {
                return Err(ProviderError::ApiError(
                    "Mock provider failure".to_string(),
                ));
            }
        }

        let text = self
            .rules
            .iter()
            .find(|(fragment, _)| prompt.contains(fragment.as_str()))
            .map(|(_, reply)| reply.clone())
            .unwrap_or_else(|| self.default_reply.clone());

        Ok(ProviderResponse {
            text,
            input_tokens: (prompt.len() / 4) as u32,
            output_tokens: 10,
        })
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
