use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::GenerationConfig;
use crate::error::{GatewayError, Result};
use crate::prompt::PromptPayload;

/// Text produced by the generation service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationResult {
    pub translated_text: String,
}

/// A remote service that turns an instruction into text
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Run one generation call authorised by `api_key`. Never retried.
    async fn generate(&self, api_key: &str, prompt: &PromptPayload) -> Result<GenerationResult>;
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

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
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Text of the first part of the first candidate
    fn into_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
    }
}

/// Pull the generated text out of a raw generateContent response body
pub fn extract_text(body: &str) -> Result<String> {
    serde_json::from_str::<GenerateContentResponse>(body)
        .ok()
        .and_then(GenerateContentResponse::into_text)
        .ok_or(GatewayError::MalformedUpstreamResponse)
}

/// Client for the Gemini generateContent endpoint
pub struct GeminiClient {
    client: Client,
    url: String,
}

impl GeminiClient {
    pub fn new(config: &GenerationConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| GatewayError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: config.generate_url(),
        })
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, api_key: &str, prompt: &PromptPayload) -> Result<GenerationResult> {
        let request = GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: &prompt.instruction_text }],
            }],
        };

        debug!("Sending generation request to: {}", self.url);

        let response = self.client
            .post(&self.url)
            .query(&[("key", api_key)])
            .json(&request)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;

        if status.as_u16() == 400 {
            warn!("Gemini API rejected the request (400)");
            return Err(GatewayError::InvalidCredential);
        }
        if !status.is_success() {
            warn!("Gemini API error {}", status);
            return Err(GatewayError::Upstream { status: status.as_u16(), body });
        }

        let translated_text = extract_text(&body)?;
        debug!("Received {} bytes of generated text", translated_text.len());

        Ok(GenerationResult { translated_text })
    }
}

// reqwest puts the full URL, query string included, into its error messages.
fn transport_error(e: reqwest::Error) -> GatewayError {
    let e = e.without_url();
    if e.is_timeout() {
        GatewayError::Unknown(format!("request to the Gemini API timed out: {}", e))
    } else {
        GatewayError::Unknown(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_text_from_first_candidate() {
        let body = r#"{"candidates":[{"content":{"parts":[{"text":"X"},{"text":"Y"}]}},{"content":{"parts":[{"text":"Z"}]}}]}"#;
        assert_eq!(extract_text(body).unwrap(), "X");
    }

    #[test]
    fn test_extract_text_missing_candidates() {
        for body in [
            r#"{}"#,
            r#"{"candidates":[]}"#,
            r#"{"candidates":[{"finishReason":"SAFETY"}]}"#,
            r#"{"candidates":[{"content":{"parts":[]}}]}"#,
            r#"{"candidates":[{"content":{"parts":[{"inlineData":{}}]}}]}"#,
            "not json",
        ] {
            assert!(
                matches!(extract_text(body), Err(GatewayError::MalformedUpstreamResponse)),
                "body should be rejected: {}",
                body
            );
        }
    }

    #[test]
    fn test_request_body_shape() {
        let request = GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: "hello" }],
            }],
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({"contents": [{"parts": [{"text": "hello"}]}]})
        );
    }
}
