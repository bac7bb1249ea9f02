//! Outbound model client
//!
//! The normalizer only needs text in, text out, so the model sits behind the
//! [`CompletionModel`] trait. [`GeminiClient`] is the production implementation.

use serde::Deserialize;
use thiserror::Error;

use crate::config::AdvisorConfig;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("GEMINI_API_KEY is not configured")]
    MissingApiKey,

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Gemini API error {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Gemini response contained no candidates")]
    NoCandidates,
}

/// A blocking text-in, text-out language model
pub trait CompletionModel: Send + Sync {
    fn complete(&self, prompt: &str) -> Result<String, ModelError>;
}

// ============================================================================
// Gemini REST API
// ============================================================================

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate
    fn into_text(self) -> Result<String, ModelError> {
        let candidate = self.candidates.into_iter().next().ok_or(ModelError::NoCandidates)?;

        Ok(candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect::<String>())
            .unwrap_or_default())
    }
}

/// Client for the Gemini `generateContent` endpoint
#[derive(Debug, Clone)]
pub struct GeminiClient {
    config: AdvisorConfig,
}

impl GeminiClient {
    pub fn new(config: AdvisorConfig) -> Self {
        Self { config }
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.endpoint.trim_end_matches('/'),
            self.config.model
        )
    }
}

impl CompletionModel for GeminiClient {
    fn complete(&self, prompt: &str) -> Result<String, ModelError> {
        let api_key = self.config.api_key.as_deref().ok_or(ModelError::MissingApiKey)?;

        // Built per call: a blocking client must be created and dropped off the async runtime.
        let http = reqwest::blocking::Client::builder()
            .timeout(self.config.timeout)
            .build()?;

        let body = serde_json::json!({
            "contents": [{
                "parts": [{ "text": prompt }]
            }]
        });

        tracing::debug!(model = %self.config.model, prompt_chars = prompt.len(), "calling Gemini");

        let response = http
            .post(self.url())
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().unwrap_or_default();
            return Err(ModelError::Status { status, body });
        }

        let parsed: GenerateContentResponse = response.json()?;
        parsed.into_text()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_endpoint_and_model() {
        let client = GeminiClient::new(AdvisorConfig {
            endpoint: "https://example.test/v1beta/".to_string(),
            model: "gemini-2.5-flash".to_string(),
            ..Default::default()
        });
        assert_eq!(
            client.url(),
            "https://example.test/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn test_missing_api_key_fails_before_any_request() {
        let client = GeminiClient::new(AdvisorConfig::default());
        let err = client.complete("hello").unwrap_err();
        assert!(matches!(err, ModelError::MissingApiKey));
    }

    #[test]
    fn test_response_text_concatenates_parts() {
        let json = r#"{"candidates":[{"content":{"parts":[{"text":"Hello, "},{"text":"world"}]}}]}"#;
        let parsed: GenerateContentResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.into_text().unwrap(), "Hello, world");
    }

    #[test]
    fn test_response_without_candidates_is_an_error() {
        let parsed: GenerateContentResponse =
            serde_json::from_str(r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#).unwrap();
        assert!(matches!(parsed.into_text(), Err(ModelError::NoCandidates)));
    }

    #[test]
    fn test_candidate_without_content_is_empty_text() {
        let parsed: GenerateContentResponse =
            serde_json::from_str(r#"{"candidates":[{"finishReason":"MAX_TOKENS"}]}"#).unwrap();
        assert_eq!(parsed.into_text().unwrap(), "");
    }
}
