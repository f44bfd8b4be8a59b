//! GitHub REST API client and recipient-profile enrichment.
//!
//! The client covers the four endpoints the pipeline needs (user lookup,
//! repo metadata, recent commits, README content). The enricher turns one
//! dependent-list entry into a [`devreach_shared::RecipientProfile`],
//! tolerating partial failures: only an unresolvable identifier or owner
//! drops the profile.

mod client;
mod enrich;

pub use client::{CommitAuthor, CommitEntry, GithubClient, RepoInfo, UserProfile};
pub use enrich::{ProfileEnricher, is_usable_contact};
