//! Core domain types for devreach outreach runs.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ReachError, Result};

/// Shape an `owner/repo` identifier must match: exactly one separator,
/// both halves limited to GitHub's allowed name characters.
static REPO_REF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_.\-]+/[A-Za-z0-9_.\-]+$").expect("valid regex"));

// ---------------------------------------------------------------------------
// RunId
// ---------------------------------------------------------------------------

/// A UUID v7 wrapper for outreach-run identifiers (time-sortable).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(pub Uuid);

impl RunId {
    /// Generate a new time-sortable run identifier.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// RepoRef
// ---------------------------------------------------------------------------

/// A validated `owner/repo` repository reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoRef {
    /// Repository owner (user or organization login).
    pub owner: String,
    /// Repository name.
    pub repo: String,
}

impl RepoRef {
    /// Parse and validate an `owner/repo` string.
    pub fn parse(s: &str) -> Result<Self> {
        if !REPO_REF_RE.is_match(s) {
            return Err(ReachError::validation(format!(
                "invalid repository format '{s}': expected 'owner/repo'"
            )));
        }
        let (owner, repo) = s.split_once('/').expect("regex guarantees a separator");
        Ok(Self {
            owner: owner.to_string(),
            repo: repo.to_string(),
        })
    }

    /// The short project name used in prompts (the repo half).
    pub fn short_name(&self) -> &str {
        &self.repo
    }

    /// Filesystem-safe `owner-repo` form used for snapshot file names.
    pub fn slug(&self) -> String {
        format!("{}-{}", self.owner, self.repo)
    }

    /// Canonical GitHub URL for this repository.
    pub fn html_url(&self) -> String {
        format!("https://github.com/{self}")
    }
}

impl std::fmt::Display for RepoRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

impl std::str::FromStr for RepoRef {
    type Err = ReachError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

// ---------------------------------------------------------------------------
// Dependent
// ---------------------------------------------------------------------------

/// One entry of the dependent-resolver output.
///
/// `name` stays optional: entries missing it are skipped with a warning by
/// the orchestrator rather than dropped silently here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dependent {
    /// `owner/repo` identifier of the dependent repository.
    #[serde(default)]
    pub name: Option<String>,
    /// Star count, when the resolver reports one.
    #[serde(default)]
    pub stars: Option<u64>,
}

// ---------------------------------------------------------------------------
// RecipientProfile
// ---------------------------------------------------------------------------

/// A dependent-repository owner enriched with contact and repo metadata.
///
/// Built once per dependent by the profile enricher and discarded after a
/// single pipeline pass; never cached across runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipientProfile {
    /// GitHub login of the repository owner.
    pub username: String,
    /// Display name from the owner's profile, if declared.
    pub display_name: Option<String>,
    /// Contact address (profile email, or commit-author fallback).
    pub email: Option<String>,
    /// Name of the dependent repository (without owner).
    pub repo_name: String,
    /// Canonical URL of the dependent repository.
    pub repo_url: String,
    /// Repository description.
    pub repo_description: Option<String>,
    /// Stargazer count.
    pub star_count: Option<u64>,
    /// Primary language reported by GitHub.
    pub primary_language: Option<String>,
    /// Repository topics, in GitHub's order.
    pub topics: Vec<String>,
}

impl RecipientProfile {
    /// The name to address the recipient by: display name, falling back to login.
    pub fn preferred_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.username)
    }
}

// ---------------------------------------------------------------------------
// TargetContext
// ---------------------------------------------------------------------------

/// Metadata and README feature summary for the target repository.
///
/// Built once per run and shared read-only across all recipients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetContext {
    /// Repository description.
    pub description: String,
    /// LLM-extracted feature list from the README (or a placeholder).
    pub readme_features: String,
    /// Stargazer count.
    pub star_count: u64,
    /// Repository topics.
    pub topics: Vec<String>,
    /// Homepage URL, if set.
    pub homepage: Option<String>,
    /// Primary language.
    pub primary_language: Option<String>,
}

impl Default for TargetContext {
    fn default() -> Self {
        Self {
            description: "Could not fetch repository details".to_string(),
            readme_features: "Could not fetch README".to_string(),
            star_count: 0,
            topics: Vec::new(),
            homepage: None,
            primary_language: None,
        }
    }
}

// ---------------------------------------------------------------------------
// OutreachEvent
// ---------------------------------------------------------------------------

/// A progress-stream event, serialized as one JSON object per line.
///
/// The wire shape is field-keyed rather than tag-keyed: `{"status": …}`,
/// `{"warning": …}`, `{"error": …}`, or the full result object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OutreachEvent {
    /// A generated email for one recipient.
    Result {
        /// Recipient's GitHub login.
        user: String,
        /// Recipient's display name, if any.
        name: Option<String>,
        /// Address the email would be sent to.
        email_address: String,
        /// Dependent repository name.
        repo: String,
        /// Generated email body.
        email_body: String,
    },
    /// Progress message.
    Status { status: String },
    /// A recipient was skipped; the run continues.
    Warning { warning: String },
    /// The run terminated (pre-flight or structural failure).
    Error { error: String },
}

impl OutreachEvent {
    pub fn status(msg: impl Into<String>) -> Self {
        Self::Status { status: msg.into() }
    }

    pub fn warning(msg: impl Into<String>) -> Self {
        Self::Warning {
            warning: msg.into(),
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self::Error { error: msg.into() }
    }

    /// Build a result event from an enriched profile and a generated body.
    ///
    /// Callers must only do this for profiles with a resolved email.
    pub fn result(profile: &RecipientProfile, email_body: impl Into<String>) -> Self {
        Self::Result {
            user: profile.username.clone(),
            name: profile.display_name.clone(),
            email_address: profile.email.clone().unwrap_or_default(),
            repo: profile.repo_name.clone(),
            email_body: email_body.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// RunRecord
// ---------------------------------------------------------------------------

/// One durable CSV row per successfully synthesized email.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRecord {
    /// Display name, falling back to login.
    pub name: String,
    /// Recipient address.
    pub email: String,
    /// Generated email body.
    pub email_content: String,
}
