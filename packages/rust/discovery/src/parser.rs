//! Parsing for the external dependent-lookup tool's JSON output.

use serde::Deserialize;

use devreach_shared::{Dependent, ReachError, Result};

/// Top-level structure emitted by `github-dependents-info --json`.
///
/// Only the public-repos list is consumed; the tool's aggregate counters
/// are ignored.
#[derive(Debug, Deserialize)]
pub struct DependentsOutput {
    /// All public dependent repositories, in the tool's sort order.
    pub all_public_dependent_repos: Vec<Dependent>,
}

/// Parse the tool's stdout into the dependent list.
pub fn parse_dependents(raw: &str) -> Result<Vec<Dependent>> {
    let output: DependentsOutput = serde_json::from_str(raw)
        .map_err(|e| ReachError::Resolver(format!("malformed dependent-list output: {e}")))?;
    Ok(output.all_public_dependent_repos)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_sorted_dependent_list() {
        let raw = r#"{
            "repo": "mem0ai/mem0",
            "total_dependents_number": 3,
            "all_public_dependent_repos": [
                {"name": "octocat/widgets", "stars": 120},
                {"name": "other/thing", "stars": 4},
                {"stars": 1}
            ]
        }"#;

        let dependents = parse_dependents(raw).expect("parse");
        assert_eq!(dependents.len(), 3);
        assert_eq!(dependents[0].name.as_deref(), Some("octocat/widgets"));
        assert_eq!(dependents[0].stars, Some(120));
        // Entries without a name survive parsing; the orchestrator warns on them.
        assert!(dependents[2].name.is_none());
    }

    #[test]
    fn rejects_output_without_repo_list() {
        let err = parse_dependents(r#"{"total_dependents_number": 0}"#).unwrap_err();
        assert!(matches!(err, ReachError::Resolver(_)));
    }

    #[test]
    fn rejects_non_json_output() {
        assert!(parse_dependents("usage: github-dependents-info ...").is_err());
    }
}
