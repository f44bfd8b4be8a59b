//! Shared types, error model, and configuration for devreach.
//!
//! This crate is the foundation depended on by all other devreach crates.
//! It provides:
//! - [`ReachError`] — the unified error type
//! - Domain types ([`RepoRef`], [`Dependent`], [`RecipientProfile`],
//!   [`TargetContext`], [`OutreachEvent`], [`RunRecord`], [`RunId`])
//! - Configuration ([`AppConfig`], [`Secrets`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, DefaultsConfig, EmailConfig, GenAiConfig, GithubConfig, MemoryConfig, Secrets,
    config_dir, config_file_path, init_config, load_config, load_config_from,
};
pub use error::{ReachError, Result};
pub use types::{
    Dependent, OutreachEvent, RecipientProfile, RepoRef, RunId, RunRecord, TargetContext,
};
