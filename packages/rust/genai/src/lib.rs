//! Text-generation client (Gemini-style `generateContent` REST shape).
//!
//! One call in, one text out. A response with no usable candidate text is
//! `Ok(None)`, not an error: callers decide whether that is a warning
//! (email synthesis) or a placeholder substitution (README features).

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use devreach_shared::{ReachError, Result};

/// User-Agent string for generation requests.
const USER_AGENT: &str = concat!("devreach/", env!("CARGO_PKG_VERSION"));

/// Default API base URL.
const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";

/// Generation can be slow; allow more headroom than plain REST lookups.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Client for the text-generation service.
pub struct GenAiClient {
    client: Client,
    base: String,
    model: String,
    api_key: String,
}

impl GenAiClient {
    /// Create a client against the public API.
    pub fn new(api_key: &str, model: &str) -> Result<Self> {
        Self::with_base(api_key, model, DEFAULT_API_BASE)
    }

    /// Create a client against a custom API base (mock servers in tests).
    pub fn with_base(api_key: &str, model: &str, base: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ReachError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base: base.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// Generate text for a single prompt.
    ///
    /// Returns `Ok(None)` when the service answers without usable text.
    pub async fn generate(&self, prompt: &str) -> Result<Option<String>> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base, self.model
        );
        debug!(model = %self.model, prompt_len = prompt.len(), "generation request");

        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|e| ReachError::Generation(format!("{url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ReachError::Generation(format!("{url}: HTTP {status}")));
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| ReachError::Generation(format!("{url}: invalid response body: {e}")))?;

        let text = body
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .filter(|text| !text.trim().is_empty());

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, Request, ResponseTemplate};

    #[tokio::test]
    async fn generate_returns_candidate_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-2.0-flash:generateContent"))
            .and(query_param("key", "k"))
            .and(body_partial_json(serde_json::json!({
                "contents": [{"parts": [{"text": "say hi"}]}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [
                    {"content": {"parts": [{"text": "Hello "}, {"text": "there."}]}}
                ]
            })))
            .mount(&server)
            .await;

        let client = GenAiClient::with_base("k", "gemini-2.0-flash", &server.uri()).expect("client");
        let text = client.generate("say hi").await.expect("generate");
        assert_eq!(text.as_deref(), Some("Hello there."));
    }

    #[tokio::test]
    async fn empty_candidates_are_none_not_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"candidates": []})),
            )
            .mount(&server)
            .await;

        let client = GenAiClient::with_base("k", "gemini-2.0-flash", &server.uri()).expect("client");
        assert!(client.generate("anything").await.expect("generate").is_none());
    }

    #[tokio::test]
    async fn whitespace_only_text_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{"content": {"parts": [{"text": "   \n"}]}}]
            })))
            .mount(&server)
            .await;

        let client = GenAiClient::with_base("k", "gemini-2.0-flash", &server.uri()).expect("client");
        assert!(client.generate("anything").await.expect("generate").is_none());
    }

    #[tokio::test]
    async fn server_error_is_generation_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = GenAiClient::with_base("k", "gemini-2.0-flash", &server.uri()).expect("client");
        let err = client.generate("anything").await.unwrap_err();
        assert!(matches!(err, ReachError::Generation(_)));
    }

    #[tokio::test]
    async fn api_key_travels_as_query_param_not_header() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(move |req: &Request| {
                assert!(req.url.query().unwrap_or_default().contains("key=k"));
                assert!(req.headers.get("authorization").is_none());
                ResponseTemplate::new(200).set_body_json(serde_json::json!({
                    "candidates": [{"content": {"parts": [{"text": "ok"}]}}]
                }))
            })
            .mount(&server)
            .await;

        let client = GenAiClient::with_base("k", "gemini-2.0-flash", &server.uri()).expect("client");
        assert_eq!(client.generate("x").await.expect("generate").as_deref(), Some("ok"));
    }
}
