//! Recipient-profile enrichment.
//!
//! Turns one dependent-list entry into a [`RecipientProfile`] in three
//! independently fault-tolerant steps: owner profile, commit-email fallback,
//! repo metadata. Only a malformed identifier or an unresolvable owner drops
//! the profile; missing metadata degrades to empty defaults.

use tracing::{debug, warn};

use devreach_shared::{Dependent, RecipientProfile, RepoRef};

use crate::client::GithubClient;

/// Whether an address is usable as a contact, given the excluded-suffix list.
///
/// Platform relay addresses (and anything else configured) are rejected by
/// case-insensitive suffix match.
pub fn is_usable_contact(email: &str, excluded_suffixes: &[String]) -> bool {
    let lowered = email.to_ascii_lowercase();
    !excluded_suffixes
        .iter()
        .any(|suffix| lowered.ends_with(&suffix.to_ascii_lowercase()))
}

/// Enriches dependents with owner profile, contact email, and repo metadata.
pub struct ProfileEnricher<'a> {
    gh: &'a GithubClient,
    excluded_suffixes: &'a [String],
}

impl<'a> ProfileEnricher<'a> {
    pub fn new(gh: &'a GithubClient, excluded_suffixes: &'a [String]) -> Self {
        Self {
            gh,
            excluded_suffixes,
        }
    }

    /// Resolve one dependent into a recipient profile.
    ///
    /// Returns `None` only when the identifier is malformed or the owner
    /// cannot be resolved; a failed metadata fetch still yields a profile.
    pub async fn enrich(&self, dependent: &Dependent) -> Option<RecipientProfile> {
        let Some(name) = dependent.name.as_deref() else {
            warn!("skipping dependent with no identifier");
            return None;
        };

        let Ok(repo_ref) = RepoRef::parse(name) else {
            warn!(name, "skipping dependent with malformed identifier");
            return None;
        };

        let user = match self.gh.get_user(&repo_ref.owner).await {
            Ok(user) => user,
            Err(e) => {
                warn!(owner = %repo_ref.owner, error = %e, "could not resolve owner");
                return None;
            }
        };

        // Profile email first, commit authorship second.
        let email = match user.email {
            Some(email) => Some(email),
            None => self.email_from_commits(&repo_ref).await,
        };

        // Metadata is best-effort: a failure here never drops the profile.
        let repo = match self.gh.get_repo(&repo_ref.owner, &repo_ref.repo).await {
            Ok(repo) => repo,
            Err(e) => {
                warn!(repo = %repo_ref, error = %e, "could not fetch dependent repo metadata");
                Default::default()
            }
        };

        Some(RecipientProfile {
            username: user.login,
            display_name: user.name,
            email,
            repo_name: repo_ref.repo.clone(),
            repo_url: repo_ref.html_url(),
            repo_description: repo.description,
            star_count: Some(repo.stargazers_count),
            primary_language: repo.language,
            topics: repo.topics,
        })
    }

    /// Scan recent commits newest-first for the first usable author email.
    async fn email_from_commits(&self, repo_ref: &RepoRef) -> Option<String> {
        let commits = match self.gh.list_commits(&repo_ref.owner, &repo_ref.repo).await {
            Ok(commits) => commits,
            Err(e) => {
                warn!(repo = %repo_ref, error = %e, "could not fetch commits for email fallback");
                return None;
            }
        };

        for entry in commits {
            if let Some(email) = entry.commit.author.and_then(|a| a.email) {
                if is_usable_contact(&email, self.excluded_suffixes) {
                    debug!(repo = %repo_ref, "found contact email in commit history");
                    return Some(email);
                }
            }
        }
        None
    }
}
