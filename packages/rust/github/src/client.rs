//! Minimal GitHub REST v3 client.

use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use devreach_shared::{ReachError, Result};

/// User-Agent string for API requests.
const USER_AGENT: &str = concat!("devreach/", env!("CARGO_PKG_VERSION"));

/// Default API base URL.
const DEFAULT_API_BASE: &str = "https://api.github.com";

/// How many recent commits to request when hunting for an author email.
const COMMIT_PAGE_SIZE: u32 = 30;

// ---------------------------------------------------------------------------
// Response models
// ---------------------------------------------------------------------------

/// A user's public profile.
#[derive(Debug, Clone, Deserialize)]
pub struct UserProfile {
    /// Login name.
    pub login: String,
    /// Declared display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Publicly declared email.
    #[serde(default)]
    pub email: Option<String>,
}

/// Repository metadata.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RepoInfo {
    /// Repository description.
    #[serde(default)]
    pub description: Option<String>,
    /// Stargazer count.
    #[serde(default)]
    pub stargazers_count: u64,
    /// Primary language.
    #[serde(default)]
    pub language: Option<String>,
    /// Repository topics.
    #[serde(default)]
    pub topics: Vec<String>,
    /// Homepage URL.
    #[serde(default)]
    pub homepage: Option<String>,
}

/// One entry of the list-commits response.
#[derive(Debug, Clone, Deserialize)]
pub struct CommitEntry {
    /// Git-level commit data.
    pub commit: CommitDetail,
}

/// Git-level commit data (author only; that is all the pipeline reads).
#[derive(Debug, Clone, Deserialize)]
pub struct CommitDetail {
    /// Commit author, when recorded.
    #[serde(default)]
    pub author: Option<CommitAuthor>,
}

/// Commit author signature.
#[derive(Debug, Clone, Deserialize)]
pub struct CommitAuthor {
    /// Author email from the commit signature.
    #[serde(default)]
    pub email: Option<String>,
}

/// README endpoint response: base64-encoded file content.
#[derive(Debug, Deserialize)]
struct ReadmeResponse {
    content: String,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Authenticated GitHub REST client.
///
/// Construct once at process start and pass by reference into the
/// components that need it.
pub struct GithubClient {
    client: Client,
    base: String,
}

impl GithubClient {
    /// Create a client against the public GitHub API.
    pub fn new(token: &str) -> Result<Self> {
        Self::with_base(token, DEFAULT_API_BASE)
    }

    /// Create a client against a custom API base (mock servers in tests).
    pub fn with_base(token: &str, base: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|e| ReachError::config(format!("invalid GitHub token: {e}")))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );

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

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{path}", self.base);
        debug!(%url, "GET");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ReachError::Network(format!("{url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ReachError::Network(format!("{url}: HTTP {status}")));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ReachError::Network(format!("{url}: invalid response body: {e}")))
    }

    /// Fetch a user's public profile.
    pub async fn get_user(&self, login: &str) -> Result<UserProfile> {
        self.get_json(&format!("/users/{login}")).await
    }

    /// Fetch repository metadata.
    pub async fn get_repo(&self, owner: &str, repo: &str) -> Result<RepoInfo> {
        self.get_json(&format!("/repos/{owner}/{repo}")).await
    }

    /// List recent commits on a repository, newest first.
    pub async fn list_commits(&self, owner: &str, repo: &str) -> Result<Vec<CommitEntry>> {
        self.get_json(&format!(
            "/repos/{owner}/{repo}/commits?per_page={COMMIT_PAGE_SIZE}"
        ))
        .await
    }

    /// Fetch and decode the repository README.
    pub async fn get_readme(&self, owner: &str, repo: &str) -> Result<String> {
        let readme: ReadmeResponse = self.get_json(&format!("/repos/{owner}/{repo}/readme")).await?;

        // The API wraps base64 content at 60 columns; strip the line breaks first.
        let packed: String = readme
            .content
            .chars()
            .filter(|c| !c.is_ascii_whitespace())
            .collect();

        let bytes = BASE64
            .decode(packed)
            .map_err(|e| ReachError::Network(format!("README content is not valid base64: {e}")))?;

        String::from_utf8(bytes)
            .map_err(|e| ReachError::Network(format!("README content is not valid UTF-8: {e}")))
    }
}
