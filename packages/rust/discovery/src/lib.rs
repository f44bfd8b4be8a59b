//! Dependent-repository resolution.
//!
//! Given a target `owner/repo`, produces the list of public repositories
//! depending on it, sorted by popularity. Three sources, selected by
//! configuration:
//!
//! - **Cli** (default): the external `github-dependents-info` tool
//! - **Snapshot**: a previously saved raw snapshot file
//! - **Scrape**: the public dependents listing page
//!
//! Cli and scrape failures never cross this boundary: they are logged and
//! yield an empty list, so a run terminates naturally with zero processed.
//! A missing or corrupt snapshot file is the exception — that is a
//! structural error the caller must surface.

mod parser;
mod scrape;

use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::Command;
use tracing::{info, instrument, warn};

use devreach_shared::{Dependent, ReachError, RepoRef, Result};

pub use parser::{DependentsOutput, parse_dependents};

/// External dependent-lookup tool invoked by the default source.
const LOOKUP_TOOL: &str = "github-dependents-info";

/// Default base URL for the scrape source.
const SCRAPE_BASE: &str = "https://github.com";

// ---------------------------------------------------------------------------
// Source selection
// ---------------------------------------------------------------------------

/// Where the dependent list comes from.
#[derive(Debug, Clone)]
pub enum DependentSource {
    /// Spawn the external lookup tool.
    Cli,
    /// Read a previously saved snapshot file.
    Snapshot(PathBuf),
    /// Scrape the public dependents listing.
    Scrape,
}

impl DependentSource {
    /// Map a config/flag string onto a source.
    pub fn from_name(name: &str, snapshot_file: Option<PathBuf>) -> Result<Self> {
        match name {
            "cli" => Ok(Self::Cli),
            "scrape" => Ok(Self::Scrape),
            "snapshot" => snapshot_file.map(Self::Snapshot).ok_or_else(|| {
                ReachError::config("source 'snapshot' requires a snapshot file path")
            }),
            other => Err(ReachError::config(format!(
                "unknown dependent source '{other}': expected 'cli', 'snapshot', or 'scrape'"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Resolver
// ---------------------------------------------------------------------------

/// Configuration for the dependent resolver.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Which source to resolve from.
    pub source: DependentSource,
    /// Directory the raw snapshot is written into.
    pub snapshot_dir: PathBuf,
    /// Base URL for the scrape source (overridable for tests).
    pub scrape_base: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            source: DependentSource::Cli,
            snapshot_dir: PathBuf::from("."),
            scrape_base: SCRAPE_BASE.to_string(),
        }
    }
}

/// Resolves the dependent list for a target repository.
pub struct DependentResolver {
    config: ResolverConfig,
}

impl DependentResolver {
    pub fn new(config: ResolverConfig) -> Self {
        Self { config }
    }

    /// Resolve the dependent list for `target`.
    ///
    /// On success from a live source, the raw structured output is written
    /// to `<owner>-<repo>-dependants.json` under the snapshot dir before
    /// returning, for auditability.
    #[instrument(skip_all, fields(target = %target))]
    pub async fn resolve(&self, target: &RepoRef) -> Result<Vec<Dependent>> {
        match &self.config.source {
            DependentSource::Cli => Ok(self.resolve_via_tool(target).await),
            DependentSource::Snapshot(path) => self.resolve_from_snapshot(path),
            DependentSource::Scrape => Ok(self.resolve_via_scrape(target).await),
        }
    }

    /// Spawn the external lookup tool. All failures degrade to an empty list.
    async fn resolve_via_tool(&self, target: &RepoRef) -> Vec<Dependent> {
        let output = Command::new(LOOKUP_TOOL)
            .args(["--repo", &target.to_string(), "--json", "--sort", "stars"])
            .stdin(Stdio::null())
            .output()
            .await;

        let output = match output {
            Ok(output) if output.status.success() => output,
            Ok(output) => {
                warn!(
                    tool = LOOKUP_TOOL,
                    status = %output.status,
                    stderr = %String::from_utf8_lossy(&output.stderr),
                    "dependent lookup tool failed"
                );
                return Vec::new();
            }
            Err(e) => {
                warn!(tool = LOOKUP_TOOL, error = %e, "could not spawn dependent lookup tool");
                return Vec::new();
            }
        };

        let raw = String::from_utf8_lossy(&output.stdout);
        match parse_dependents(&raw) {
            Ok(dependents) => {
                self.write_snapshot(target, raw.as_ref());
                info!(count = dependents.len(), "resolved dependents via lookup tool");
                dependents
            }
            Err(e) => {
                warn!(error = %e, "could not parse lookup tool output");
                Vec::new()
            }
        }
    }

    /// Read a saved snapshot. Missing or corrupt files are structural errors.
    fn resolve_from_snapshot(&self, path: &Path) -> Result<Vec<Dependent>> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            ReachError::Resolver(format!("could not read snapshot {}: {e}", path.display()))
        })?;
        let dependents = parse_dependents(&raw)?;
        info!(count = dependents.len(), path = %path.display(), "resolved dependents from snapshot");
        Ok(dependents)
    }

    /// Scrape the public listing. All failures degrade to an empty list.
    async fn resolve_via_scrape(&self, target: &RepoRef) -> Vec<Dependent> {
        match scrape::scrape_dependents(target, &self.config.scrape_base).await {
            Ok(dependents) => {
                // Mirror the tool's output shape so the snapshot stays loadable.
                let raw = serde_json::json!({
                    "all_public_dependent_repos": dependents,
                });
                self.write_snapshot(target, &raw.to_string());
                info!(count = dependents.len(), "resolved dependents via scrape");
                dependents
            }
            Err(e) => {
                warn!(error = %e, "dependents scrape failed");
                Vec::new()
            }
        }
    }

    /// Best-effort raw-snapshot write; a failure here never fails resolution.
    fn write_snapshot(&self, target: &RepoRef, raw: &str) {
        let path = self.snapshot_path(target);
        if let Err(e) = std::fs::write(&path, raw) {
            warn!(path = %path.display(), error = %e, "could not write dependents snapshot");
        }
    }

    /// Snapshot file path for a target: `<dir>/<owner>-<repo>-dependants.json`.
    pub fn snapshot_path(&self, target: &RepoRef) -> PathBuf {
        self.config
            .snapshot_dir
            .join(format!("{}-dependants.json", target.slug()))
    }
}
