use reqwest::Client;
use tracing::instrument;

use crate::domain::{common::entities::app_errors::CoreError, food_analysis::ports::Translator};

/// Stateless client for the public Google Translate endpoint.
#[derive(Debug, Clone)]
pub struct GoogleTranslateClient {
    base_url: String,
    client: Client,
}

impl GoogleTranslateClient {
    pub fn new(base_url: &str, client: Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }
}

impl Translator for GoogleTranslateClient {
    #[instrument(skip(self))]
    async fn translate(
        &self,
        text: String,
        source_language: String,
        target_language: String,
    ) -> Result<String, CoreError> {
        let url = format!("{}/translate_a/single", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("client", "gtx"),
                ("sl", source_language.as_str()),
                ("tl", target_language.as_str()),
                ("dt", "t"),
                ("q", text.as_str()),
            ])
            .send()
            .await
            .map_err(|e| CoreError::ExternalServiceError(format!("Translation error: {}", e)))?;

        if !response.status().is_success() {
            return Err(CoreError::ExternalServiceError(format!(
                "Translation service returned {}",
                response.status()
            )));
        }

        let body: serde_json::Value = response.json().await.map_err(|e| {
            CoreError::ExternalServiceError(format!("Invalid translation payload: {}", e))
        })?;

        translated_text(&body).ok_or_else(|| {
            CoreError::ExternalServiceError("Translation payload had no text".to_string())
        })
    }
}

/// The payload is a nested array whose first element lists `[translated, original, ...]`
/// segments.
fn translated_text(body: &serde_json::Value) -> Option<String> {
    let text: String = body
        .get(0)?
        .as_array()?
        .iter()
        .filter_map(|segment| segment.get(0).and_then(|s| s.as_str()))
        .collect();

    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_translated_text_joins_segments() {
        let body = json!([[["pain ", "bread ", null], ["complet", "wholemeal", null]], null, "en"]);
        assert_eq!(translated_text(&body).as_deref(), Some("pain complet"));
    }

    #[test]
    fn test_translated_text_rejects_unexpected_shape() {
        assert!(translated_text(&json!({"text": "pain"})).is_none());
        assert!(translated_text(&json!([[]])).is_none());
    }
}
