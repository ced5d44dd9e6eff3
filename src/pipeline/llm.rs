//! Model-capability client.
//!
//! Classification and type-specific extraction both ride on the same
//! `LlmClient` trait. Every caller resolves failure locally — the
//! classifier substitutes the unknown sentinel, parsers return empty
//! output — so no `CapabilityError` ever crosses a stage boundary.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CapabilityError {
    /// No capability configured for this deployment.
    #[error("Model capability not configured")]
    Unavailable,

    #[error("Cannot connect to model endpoint at {0}")]
    Connection(String),

    #[error("HTTP client error: {0}")]
    Http(String),

    #[error("Model endpoint returned status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Failed to parse model response: {0}")]
    ResponseParsing(String),
}

/// Structured-output generation against a model endpoint.
///
/// `images` carries base64-encoded page previews for multimodal calls;
/// implementations that cannot use them must ignore them.
pub trait LlmClient: Send + Sync {
    fn generate(
        &self,
        model: &str,
        prompt: &str,
        system: &str,
        images: &[String],
    ) -> Result<String, CapabilityError>;
}

/// Pull the JSON object out of a model response. Handles fenced
/// ```json blocks, bare fences, and raw output with surrounding prose by
/// falling back to the outermost brace pair.
pub fn extract_json_object(response: &str) -> Option<String> {
    let lower = response.to_lowercase();
    if let Some(fence_start) = lower.find("```json") {
        let body = &response[fence_start + 7..];
        if let Some(fence_end) = body.find("```") {
            return Some(body[..fence_end].trim().to_string());
        }
    }
    let start = response.find('{')?;
    let end = response.rfind('}')?;
    if end > start {
        Some(response[start..=end].to_string())
    } else {
        None
    }
}

/// HTTP client for an Ollama-compatible endpoint.
pub struct OllamaClient {
    base_url: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl OllamaClient {
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, CapabilityError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| CapabilityError::Http(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            timeout_secs,
        })
    }
}

/// Request body for /api/generate
#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    system: &'a str,
    stream: bool,
    #[serde(skip_serializing_if = "<[String]>::is_empty")]
    images: &'a [String],
}

/// Response body from /api/generate
#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

impl LlmClient for OllamaClient {
    fn generate(
        &self,
        model: &str,
        prompt: &str,
        system: &str,
        images: &[String],
    ) -> Result<String, CapabilityError> {
        let url = format!("{}/api/generate", self.base_url);
        let body = GenerateRequest {
            model,
            prompt,
            system,
            stream: false,
            images,
        };

        let response = self.client.post(&url).json(&body).send().map_err(|e| {
            if e.is_connect() {
                CapabilityError::Connection(self.base_url.clone())
            } else if e.is_timeout() {
                CapabilityError::Http(format!("Request timed out after {}s", self.timeout_secs))
            } else {
                CapabilityError::Http(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(CapabilityError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = response
            .json()
            .map_err(|e| CapabilityError::ResponseParsing(e.to_string()))?;

        Ok(parsed.response)
    }
}

/// Null object for deployments with no capability configured. Always
/// fails with `Unavailable`, which callers degrade from.
pub struct NullLlmClient;

impl LlmClient for NullLlmClient {
    fn generate(
        &self,
        _model: &str,
        _prompt: &str,
        _system: &str,
        _images: &[String],
    ) -> Result<String, CapabilityError> {
        Err(CapabilityError::Unavailable)
    }
}

/// Mock client for testing — returns a configurable response, or an
/// error when constructed with `failing()`.
pub struct MockLlmClient {
    response: Option<String>,
}

impl MockLlmClient {
    pub fn new(response: &str) -> Self {
        Self {
            response: Some(response.to_string()),
        }
    }

    pub fn failing() -> Self {
        Self { response: None }
    }
}

impl LlmClient for MockLlmClient {
    fn generate(
        &self,
        _model: &str,
        _prompt: &str,
        _system: &str,
        _images: &[String],
    ) -> Result<String, CapabilityError> {
        match &self.response {
            Some(r) => Ok(r.clone()),
            None => Err(CapabilityError::Http("mock transport failure".into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_client_returns_configured_response() {
        let client = MockLlmClient::new("test response");
        let result = client.generate("m", "p", "s", &[]).unwrap();
        assert_eq!(result, "test response");
    }

    #[test]
    fn failing_mock_returns_error() {
        let client = MockLlmClient::failing();
        assert!(client.generate("m", "p", "s", &[]).is_err());
    }

    #[test]
    fn null_client_is_unavailable() {
        let client = NullLlmClient;
        assert!(matches!(
            client.generate("m", "p", "s", &[]),
            Err(CapabilityError::Unavailable)
        ));
    }

    #[test]
    fn extract_json_from_fenced_block() {
        let response = "Here you go:\n```json\n{\"a\": 1}\n```\nDone.";
        assert_eq!(extract_json_object(response).unwrap(), "{\"a\": 1}");
    }

    #[test]
    fn extract_json_from_bare_braces() {
        let response = "Sure. {\"document_type\": \"court_order\"} hope that helps";
        assert_eq!(
            extract_json_object(response).unwrap(),
            "{\"document_type\": \"court_order\"}"
        );
    }

    #[test]
    fn extract_json_missing_returns_none() {
        assert!(extract_json_object("no json here").is_none());
        assert!(extract_json_object("").is_none());
    }

    #[test]
    fn ollama_client_trims_trailing_slash() {
        let client = OllamaClient::new("http://localhost:11434/", 60).unwrap();
        assert_eq!(client.base_url, "http://localhost:11434");
        assert_eq!(client.timeout_secs, 60);
    }
}
