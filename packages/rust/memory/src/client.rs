//! HTTP client for the memory-store API.

use std::time::Duration;

use reqwest::Client;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use tracing::debug;

use devreach_shared::{ReachError, Result};

/// User-Agent string for memory-store requests.
const USER_AGENT: &str = concat!("devreach/", env!("CARGO_PKG_VERSION"));

/// Default API base URL.
const DEFAULT_API_BASE: &str = "https://api.mem0.ai";

/// Memory API schema version sent with every write.
const API_VERSION: &str = "v2";

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// One role-tagged message to store.
#[derive(Debug, Clone, Serialize)]
pub struct MemoryMessage {
    /// `"system"` for inferred context, `"user"` for verbatim facts.
    pub role: &'static str,
    /// Message text.
    pub content: String,
}

impl MemoryMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system",
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user",
            content: content.into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct AddRequest<'a> {
    messages: &'a [MemoryMessage],
    user_id: &'a str,
    infer: bool,
    version: &'static str,
}

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    query: &'a str,
    user_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    #[serde(default)]
    memory: Option<String>,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Authenticated client for the memory-store API.
pub struct MemoryClient {
    client: Client,
    base: String,
}

impl MemoryClient {
    /// Create a client against the hosted store.
    pub fn new(api_key: &str) -> Result<Self> {
        Self::with_base(api_key, DEFAULT_API_BASE)
    }

    /// Create a client against a custom API base (mock servers in tests).
    pub fn with_base(api_key: &str, base: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Token {api_key}"))
            .map_err(|e| ReachError::config(format!("invalid memory-store API key: {e}")))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| ReachError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base: base.trim_end_matches('/').to_string(),
        })
    }

    /// Store a batch of messages under an identity.
    ///
    /// `infer` controls whether the store summarizes/interprets the batch
    /// (system context) or keeps it verbatim (recipient facts).
    pub async fn add(&self, messages: &[MemoryMessage], user_id: &str, infer: bool) -> Result<()> {
        let url = format!("{}/v1/memories/", self.base);
        debug!(user_id, infer, count = messages.len(), "storing memories");

        let response = self
            .client
            .post(&url)
            .json(&AddRequest {
                messages,
                user_id,
                infer,
                version: API_VERSION,
            })
            .send()
            .await
            .map_err(|e| ReachError::Memory(format!("{url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ReachError::Memory(format!("{url}: HTTP {status}")));
        }
        Ok(())
    }

    /// Semantic search scoped to one identity.
    ///
    /// Returns fact snippets in the store's relevance order.
    pub async fn search(&self, query: &str, user_id: &str) -> Result<Vec<String>> {
        let url = format!("{}/v1/memories/search/", self.base);
        debug!(user_id, query_len = query.len(), "searching memories");

        let response = self
            .client
            .post(&url)
            .json(&SearchRequest { query, user_id })
            .send()
            .await
            .map_err(|e| ReachError::Memory(format!("{url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ReachError::Memory(format!("{url}: HTTP {status}")));
        }

        let hits: Vec<SearchHit> = response
            .json()
            .await
            .map_err(|e| ReachError::Memory(format!("{url}: invalid response body: {e}")))?;

        Ok(hits.into_iter().filter_map(|h| h.memory).collect())
    }
}
