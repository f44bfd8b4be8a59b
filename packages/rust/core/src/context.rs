//! Target-repository context construction.
//!
//! Built once per run and shared across every recipient. This call never
//! fails: metadata trouble yields an all-default context, README or
//! generation trouble yields a placeholder feature summary.

use tracing::{info, instrument, warn};

use devreach_genai::GenAiClient;
use devreach_github::GithubClient;
use devreach_shared::{RepoRef, TargetContext};

/// Substituted when the README exists but feature extraction fails.
const FEATURES_UNAVAILABLE: &str = "Could not extract features from README";

/// Substituted when the README itself cannot be fetched.
const NO_README: &str = "No README available";

/// Fetch target metadata and summarize its README into a feature list.
#[instrument(skip_all, fields(target = %target))]
pub async fn build_target_context(
    gh: &GithubClient,
    genai: &GenAiClient,
    target: &RepoRef,
) -> TargetContext {
    let repo = match gh.get_repo(&target.owner, &target.repo).await {
        Ok(repo) => repo,
        Err(e) => {
            warn!(error = %e, "could not fetch target repository details");
            return TargetContext::default();
        }
    };

    let readme_features = match gh.get_readme(&target.owner, &target.repo).await {
        Ok(readme) => {
            let prompt =
                format!("Extract and list only the key features from this README: {readme}");
            match genai.generate(&prompt).await {
                Ok(Some(features)) => features,
                Ok(None) => FEATURES_UNAVAILABLE.to_string(),
                Err(e) => {
                    warn!(error = %e, "feature extraction failed");
                    FEATURES_UNAVAILABLE.to_string()
                }
            }
        }
        Err(e) => {
            warn!(error = %e, "could not fetch target README");
            NO_README.to_string()
        }
    };

    info!(stars = repo.stargazers_count, "target context built");

    TargetContext {
        description: repo
            .description
            .unwrap_or_else(|| "No description available".to_string()),
        readme_features,
        star_count: repo.stargazers_count,
        topics: repo.topics,
        homepage: repo.homepage,
        primary_language: repo.language,
    }
}
