//! Gemini text-generation client.
//!
//! One-shot prompt-in, text-out calls against the `generateContent`
//! endpoint. The API key comes from the GEMINI_API_KEY environment
//! variable, falling back to the OS keyring.

use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::check_status;
use super::keyring_store;
use crate::error::ApiError;

const GENAI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Keyring entry holding the API key when GEMINI_API_KEY is unset.
pub const API_KEY_ENTRY: &str = "genai_api_key";

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

/// HTTP client for the Gemini API.
pub struct GenAiClient {
    http: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl GenAiClient {
    /// Build a client for `model`, resolving the API key from the
    /// environment or the keyring.
    pub fn new(model: &str) -> Result<Self, ApiError> {
        let api_key = match std::env::var("GEMINI_API_KEY") {
            Ok(key) if !key.trim().is_empty() => key.trim().to_string(),
            _ => keyring_store::get(API_KEY_ENTRY)
                .ok()
                .flatten()
                .ok_or_else(|| {
                    ApiError::NotAuthenticated(
                        "no Gemini API key; set GEMINI_API_KEY or store one with 'auth genai set-key'"
                            .to_string(),
                    )
                })?,
        };
        Ok(Self::with_key(model, &api_key))
    }

    pub fn with_key(model: &str, api_key: &str) -> Self {
        Self {
            http: Client::new(),
            base_url: GENAI_BASE_URL.to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        }
    }

    #[cfg(test)]
    fn with_base_url(model: &str, api_key: &str, base_url: &str) -> Self {
        let mut client = Self::with_key(model, api_key);
        client.base_url = base_url.to_string();
        client
    }

    /// Generate text for `prompt`, returning the first candidate.
    pub async fn generate(&self, prompt: &str) -> Result<String, ApiError> {
        log::debug!("generate request against model {}", self.model);
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        let resp = self
            .http
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;
        let resp = check_status(resp, false).await?;

        let parsed: GenerateResponse = resp.json().await?;
        let text = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| ApiError::UnexpectedResponse("no candidates in response".to_string()))?;
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    #[tokio::test]
    async fn generate_returns_first_candidate_text() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1beta/models/gemini-2.5-flash:generateContent")
            .match_header("x-goog-api-key", "test-key")
            .match_body(Matcher::Json(serde_json::json!({
                "contents": [ { "parts": [ { "text": "Say hi" } ] } ]
            })))
            .with_status(200)
            .with_body(
                serde_json::json!({
                    "candidates": [
                        { "content": { "parts": [ { "text": "Hi there." } ] } }
                    ]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = GenAiClient::with_base_url("gemini-2.5-flash", "test-key", &server.url());
        let text = client.generate("Say hi").await.unwrap();
        assert_eq!(text, "Hi there.");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn empty_candidates_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1beta/models/gemini-2.5-flash:generateContent")
            .with_status(200)
            .with_body(serde_json::json!({ "candidates": [] }).to_string())
            .create_async()
            .await;

        let client = GenAiClient::with_base_url("gemini-2.5-flash", "k", &server.url());
        let err = client.generate("x").await.unwrap_err();
        assert!(matches!(err, ApiError::UnexpectedResponse(_)));
    }
}
