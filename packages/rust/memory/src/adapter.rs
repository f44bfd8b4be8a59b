//! Remember/recall adapter: maps the domain onto memory-store writes.
//!
//! Two records per recipient: one system-role context describing the target
//! project (inferred by the store), and one verbatim batch of user-role
//! facts describing the recipient. The context text is derived once per run
//! from the shared [`TargetContext`] and reused for every recipient call.

use tracing::instrument;

use devreach_shared::{RecipientProfile, RepoRef, Result, TargetContext};

use crate::client::{MemoryClient, MemoryMessage};

/// Per-recipient identity: `{username}_{repo_name}`.
///
/// Including the repo disambiguates users who own several dependent repos.
pub fn recipient_identity(profile: &RecipientProfile) -> String {
    format!("{}_{}", profile.username, profile.repo_name)
}

/// Writes and retrieves recipient memory through the external store.
pub struct MemoryAdapter<'a> {
    client: &'a MemoryClient,
}

impl<'a> MemoryAdapter<'a> {
    pub fn new(client: &'a MemoryClient) -> Self {
        Self { client }
    }

    /// Store the target-project context and the recipient facts.
    #[instrument(skip_all, fields(identity = %identity))]
    pub async fn remember(
        &self,
        identity: &str,
        target: &RepoRef,
        context: &TargetContext,
        profile: &RecipientProfile,
    ) -> Result<()> {
        let system = vec![MemoryMessage::system(system_context(target, context))];
        self.client.add(&system, identity, true).await?;

        let facts: Vec<MemoryMessage> = recipient_facts(target, profile)
            .into_iter()
            .map(MemoryMessage::user)
            .collect();
        self.client.add(&facts, identity, false).await
    }

    /// Retrieve the facts most relevant to `query`, in store order.
    pub async fn recall(&self, identity: &str, query: &str) -> Result<Vec<String>> {
        self.client.search(query, identity).await
    }
}

/// System-role context describing the target project.
fn system_context(target: &RepoRef, context: &TargetContext) -> String {
    let name = target.short_name();
    format!(
        "You are an AI assistant designed to help discover and connect with developers \
         using {name}. Your goal is to understand their usage context and create \
         personalized, meaningful outreach as a Developer Relations Engineer at {name}.\n\
         \n\
         About {name}:\n\
         Description: {}\n\
         Stars: {}\n\
         Language: {}\n\
         Topics: {}\n\
         \n\
         Key Features from README:\n\
         {}\n\
         \n\
         Focus on building genuine connections by highlighting relevant {name} features \
         that could benefit their specific project.",
        context.description,
        context.star_count,
        context.primary_language.as_deref().unwrap_or("not specified"),
        context.topics.join(", "),
        context.readme_features,
    )
}

/// Verbatim user-role facts describing the recipient and their repo.
fn recipient_facts(target: &RepoRef, profile: &RecipientProfile) -> Vec<String> {
    vec![
        format!("GitHub user @{} is a developer", profile.username),
        format!(
            "They have a repository called {} which {}",
            profile.repo_name,
            profile
                .repo_description
                .as_deref()
                .unwrap_or("has no description"),
        ),
        format!(
            "Their repository is located at {} and has {} stars",
            profile.repo_url,
            profile.star_count.unwrap_or(0),
        ),
        format!(
            "The primary language used in the repository is {}",
            profile.primary_language.as_deref().unwrap_or("not specified"),
        ),
        format!(
            "Repository topics: {}",
            if profile.topics.is_empty() {
                "none specified".to_string()
            } else {
                profile.topics.join(", ")
            },
        ),
        format!("They use {target} in their project"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn profile() -> RecipientProfile {
        RecipientProfile {
            username: "octocat".into(),
            display_name: Some("The Octocat".into()),
            email: Some("octo@example.com".into()),
            repo_name: "widgets".into(),
            repo_url: "https://github.com/octocat/widgets".into(),
            repo_description: Some("builds widgets".into()),
            star_count: Some(12),
            primary_language: Some("Rust".into()),
            topics: vec!["widgets".into(), "tooling".into()],
        }
    }

    fn context() -> TargetContext {
        TargetContext {
            description: "memory layer".into(),
            readme_features: "- fast\n- simple".into(),
            star_count: 900,
            topics: vec!["ai".into()],
            homepage: None,
            primary_language: Some("Python".into()),
        }
    }

    #[test]
    fn identity_combines_login_and_repo() {
        assert_eq!(recipient_identity(&profile()), "octocat_widgets");
    }

    #[test]
    fn facts_cover_identity_repo_and_usage() {
        let target = RepoRef::parse("mem0ai/mem0").expect("ref");
        let facts = recipient_facts(&target, &profile());
        assert_eq!(facts.len(), 6);
        assert!(facts[0].contains("@octocat"));
        assert!(facts[1].contains("builds widgets"));
        assert!(facts[2].contains("12 stars"));
        assert!(facts[4].contains("widgets, tooling"));
        assert_eq!(facts[5], "They use mem0ai/mem0 in their project");
    }

    #[test]
    fn facts_degrade_gracefully_for_sparse_profiles() {
        let target = RepoRef::parse("mem0ai/mem0").expect("ref");
        let mut sparse = profile();
        sparse.repo_description = None;
        sparse.star_count = None;
        sparse.primary_language = None;
        sparse.topics.clear();

        let facts = recipient_facts(&target, &sparse);
        assert!(facts[1].contains("has no description"));
        assert!(facts[2].contains("0 stars"));
        assert!(facts[3].contains("not specified"));
        assert!(facts[4].contains("none specified"));
    }

    #[test]
    fn system_context_names_the_target() {
        let target = RepoRef::parse("mem0ai/mem0").expect("ref");
        let text = system_context(&target, &context());
        assert!(text.contains("Developer Relations Engineer at mem0"));
        assert!(text.contains("Description: memory layer"));
        assert!(text.contains("- fast"));
    }

    #[tokio::test]
    async fn remember_writes_inferred_context_then_verbatim_facts() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/memories/"))
            .and(body_partial_json(serde_json::json!({"infer": true})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1/memories/"))
            .and(body_partial_json(serde_json::json!({"infer": false})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let client = MemoryClient::with_base("k", &server.uri()).expect("client");
        let adapter = MemoryAdapter::new(&client);
        let target = RepoRef::parse("mem0ai/mem0").expect("ref");

        adapter
            .remember("octocat_widgets", &target, &context(), &profile())
            .await
            .expect("remember");
    }
}
