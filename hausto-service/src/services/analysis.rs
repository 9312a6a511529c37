//! Property vibe analysis.
//!
//! One caption completion per image, then a single rating completion over all
//! captions and the user's preference. The rating text is mapped to a
//! [`VibeTier`] by keyword.

use crate::models::{AnalysisResult, Highlight, VibeTier};
use crate::services::metrics;
use crate::services::providers::{GenerationParams, ProviderError, TextProvider};
use futures::{StreamExt, TryStreamExt};
use serde_json::Value;
use std::sync::Arc;

/// Caption used when the model returns no content for an image.
pub const CAPTION_FALLBACK: &str = "Nice feature";

/// Rating text used when the model returns no content.
pub const RATING_FALLBACK: &str = "Casual";

pub fn caption_prompt(image_url: &str) -> String {
    format!(
        "Describe the standout feature of the photo at this URL in 12 words or less: {}",
        image_url
    )
}

pub fn rating_prompt(preference: &Value, descriptions: &[String]) -> String {
    format!(
        "User prefers: {}. Property features: {}. Rate the match as one of: Casual, Good, Strong, Perfect. Explain briefly.",
        preference,
        descriptions.join("; ")
    )
}

/// Trimmed model text, or `fallback` when it is missing or blank.
fn text_or(text: Option<String>, fallback: &str) -> String {
    text.map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

#[derive(Clone)]
pub struct PropertyAnalyzer {
    provider: Arc<dyn TextProvider>,
    params: GenerationParams,
    caption_concurrency: usize,
}

impl PropertyAnalyzer {
    pub fn new(
        provider: Arc<dyn TextProvider>,
        params: GenerationParams,
        caption_concurrency: usize,
    ) -> Self {
        Self {
            provider,
            params,
            caption_concurrency: caption_concurrency.max(1),
        }
    }

    /// Caption every image, then rate the set against `preference`.
    ///
    /// Captions are requested with at most `caption_concurrency` calls in
    /// flight; results keep the order of `image_urls`. The first provider
    /// failure aborts the analysis.
    pub async fn analyze(
        &self,
        image_urls: &[String],
        preference: &Value,
    ) -> Result<AnalysisResult, ProviderError> {
        // Futures are built up front; a closure inside the stream makes the
        // handler future fail axum's `Handler` bound.
        let captions: Vec<_> = image_urls.iter().map(|url| self.caption(url)).collect();
        let descriptions: Vec<String> = futures::stream::iter(captions)
            .buffered(self.caption_concurrency)
            .try_collect()
            .await?;

        let explanation = self.rate(preference, &descriptions).await?;
        let vibe = VibeTier::classify(&explanation);
        metrics::record_vibe(vibe);

        let highlights = image_urls
            .iter()
            .zip(descriptions)
            .map(|(url, highlight)| Highlight {
                url: url.clone(),
                highlight,
            })
            .collect();

        Ok(AnalysisResult {
            vibe,
            explanation,
            highlights,
        })
    }

    async fn caption(&self, image_url: &str) -> Result<String, ProviderError> {
        let text = self.complete("caption", &caption_prompt(image_url)).await?;
        Ok(text_or(text, CAPTION_FALLBACK))
    }

    async fn rate(&self, preference: &Value, descriptions: &[String]) -> Result<String, ProviderError> {
        let text = self
            .complete("rating", &rating_prompt(preference, descriptions))
            .await?;
        Ok(text_or(text, RATING_FALLBACK))
    }

    async fn complete(&self, purpose: &str, prompt: &str) -> Result<Option<String>, ProviderError> {
        let started = std::time::Instant::now();
        let result = self.provider.complete(prompt, &self.params).await;
        let elapsed = started.elapsed().as_secs_f64();

        match result {
            Ok(response) => {
                metrics::record_completion(self.provider.name(), purpose, "ok", elapsed);
                tracing::debug!(
                    purpose,
                    input_tokens = response.input_tokens,
                    output_tokens = response.output_tokens,
                    "Completion received"
                );
                Ok(response.text)
            }
            Err(e) => {
                metrics::record_completion(self.provider.name(), purpose, e.kind(), elapsed);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::providers::mock::MockTextProvider;
    use crate::services::providers::ProviderResponse;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn analyzer(provider: Arc<MockTextProvider>, concurrency: usize) -> PropertyAnalyzer {
        PropertyAnalyzer::new(provider, GenerationParams::default(), concurrency)
    }

    fn urls(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn rating_prompt_embeds_preference_as_json() {
        let prompt = rating_prompt(
            &json!("quiet street"),
            &["Bright kitchen".to_string(), "Large backyard".to_string()],
        );
        assert_eq!(
            prompt,
            "User prefers: \"quiet street\". Property features: Bright kitchen; Large backyard. \
             Rate the match as one of: Casual, Good, Strong, Perfect. Explain briefly."
        );
    }

    #[test]
    fn rating_prompt_keeps_object_key_order() {
        let prompt = rating_prompt(&json!({"rooms": 3, "garden": true}), &[]);
        assert!(prompt.starts_with("User prefers: {\"rooms\":3,\"garden\":true}."));
    }

    #[test]
    fn text_or_trims_and_falls_back() {
        assert_eq!(text_or(Some("  Sunny deck \n".into()), "x"), "Sunny deck");
        assert_eq!(text_or(Some("   ".into()), "x"), "x");
        assert_eq!(text_or(None, CAPTION_FALLBACK), "Nice feature");
    }

    #[tokio::test]
    async fn end_to_end_strong_match() {
        let provider = Arc::new(
            MockTextProvider::new()
                .reply_when("http://a/1.jpg", "Bright kitchen")
                .reply_when("http://a/2.jpg", "Large backyard")
                .reply_when("Rate the match", "This is a Strong match because..."),
        );

        let result = analyzer(provider.clone(), 4)
            .analyze(&urls(&["http://a/1.jpg", "http://a/2.jpg"]), &json!("garden"))
            .await
            .unwrap();

        assert_eq!(result.vibe, VibeTier::Strong);
        assert_eq!(result.explanation, "This is a Strong match because...");
        assert_eq!(
            result.highlights,
            vec![
                Highlight {
                    url: "http://a/1.jpg".into(),
                    highlight: "Bright kitchen".into()
                },
                Highlight {
                    url: "http://a/2.jpg".into(),
                    highlight: "Large backyard".into()
                },
            ]
        );
        assert_eq!(provider.call_count(), 3);

        let rating = provider.prompts().pop().unwrap();
        assert!(rating.contains("Bright kitchen; Large backyard"));
    }

    #[tokio::test]
    async fn issues_one_caption_per_image_plus_one_rating() {
        let provider = Arc::new(MockTextProvider::new());
        let images: Vec<String> = (0..7).map(|i| format!("http://img/{}.jpg", i)).collect();

        let result = analyzer(provider.clone(), 3)
            .analyze(&images, &Value::Null)
            .await
            .unwrap();

        assert_eq!(provider.call_count(), images.len() + 1);
        let returned: Vec<&str> = result.highlights.iter().map(|h| h.url.as_str()).collect();
        let expected: Vec<&str> = images.iter().map(String::as_str).collect();
        assert_eq!(returned, expected);

        let prompts = provider.prompts();
        let captions = prompts
            .iter()
            .filter(|p| p.starts_with("Describe the standout feature"))
            .count();
        assert_eq!(captions, images.len());
        assert!(prompts.last().unwrap().starts_with("User prefers: null."));
    }

    #[tokio::test]
    async fn sequential_mode_calls_in_input_order() {
        let provider = Arc::new(MockTextProvider::new());
        let images = urls(&["http://x/a.jpg", "http://x/b.jpg", "http://x/c.jpg"]);

        analyzer(provider.clone(), 1)
            .analyze(&images, &json!("any"))
            .await
            .unwrap();

        let prompts = provider.prompts();
        for (prompt, url) in prompts.iter().zip(&images) {
            assert_eq!(prompt, &caption_prompt(url));
        }
    }

    #[tokio::test]
    async fn empty_caption_uses_fallback() {
        let provider = Arc::new(
            MockTextProvider::new()
                .empty_when("http://a/blank.jpg")
                .reply_when("Rate the match", "Good enough"),
        );

        let result = analyzer(provider, 2)
            .analyze(&urls(&["http://a/blank.jpg"]), &json!("x"))
            .await
            .unwrap();

        assert_eq!(result.highlights[0].highlight, CAPTION_FALLBACK);
        assert_eq!(result.vibe, VibeTier::Good);
    }

    #[tokio::test]
    async fn empty_rating_is_casual() {
        let provider = Arc::new(MockTextProvider::new().empty_when("Rate the match"));

        let result = analyzer(provider, 2)
            .analyze(&urls(&["http://a/1.jpg"]), &json!("x"))
            .await
            .unwrap();

        assert_eq!(result.vibe, VibeTier::Casual);
        assert_eq!(result.explanation, RATING_FALLBACK);
    }

    /// Sleeps longer for lower image indices and tracks calls in flight.
    struct SlowFirstProvider {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl TextProvider for SlowFirstProvider {
        async fn complete(
            &self,
            prompt: &str,
            _params: &GenerationParams,
        ) -> Result<ProviderResponse, ProviderError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);

            let index: u64 = prompt
                .rsplit('/')
                .next()
                .and_then(|tail| tail.trim_end_matches(".jpg").parse().ok())
                .unwrap_or(0);
            tokio::time::sleep(Duration::from_millis(10 * (6 - index.min(5)))).await;

            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok(ProviderResponse {
                text: Some(format!("feature of {}", index)),
                ..Default::default()
            })
        }

        fn name(&self) -> &'static str {
            "slow"
        }
    }

    #[tokio::test]
    async fn concurrent_captions_respect_cap_and_input_order() {
        let provider = Arc::new(SlowFirstProvider {
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        });
        let images: Vec<String> = (0..6).map(|i| format!("http://img/{}.jpg", i)).collect();

        let result = PropertyAnalyzer::new(provider.clone(), GenerationParams::default(), 3)
            .analyze(&images, &json!("x"))
            .await
            .unwrap();

        let peak = provider.peak.load(Ordering::SeqCst);
        assert!(peak <= 3, "peak in-flight calls was {}", peak);
        assert!(peak > 1, "captions ran sequentially");

        for (i, highlight) in result.highlights.iter().enumerate() {
            assert_eq!(highlight.url, images[i]);
            assert_eq!(highlight.highlight, format!("feature of {}", i));
        }
    }

    #[tokio::test]
    async fn caption_failure_aborts_analysis() {
        let provider = Arc::new(MockTextProvider::new().fail_when("http://a/broken.jpg"));

        let err = analyzer(provider.clone(), 1)
            .analyze(&urls(&["http://a/broken.jpg", "http://a/ok.jpg"]), &json!("x"))
            .await
            .unwrap_err();

        assert!(matches!(err, ProviderError::ApiError(_)));
        assert!(!provider
            .prompts()
            .iter()
            .any(|p| p.starts_with("User prefers")));
    }
}
