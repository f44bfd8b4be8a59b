//! End-to-end outreach pipeline: resolve → enrich → remember → synthesize → record.
//!
//! Strictly sequential: one recipient is fully processed before the next
//! begins, with a courtesy delay after each successful synthesis. Every
//! per-recipient failure becomes a `warning` event and the loop continues;
//! only pre-flight checks and structural errors (snapshot resolution, CSV
//! writes) terminate a run early.

use std::path::PathBuf;
use std::time::Duration;

use rand::seq::SliceRandom;
use tracing::{info, instrument, warn};

use devreach_discovery::DependentResolver;
use devreach_genai::GenAiClient;
use devreach_github::{GithubClient, ProfileEnricher};
use devreach_memory::{MemoryAdapter, MemoryClient, recipient_identity};
use devreach_shared::{
    Dependent, OutreachEvent, ReachError, RepoRef, Result, RunId, RunRecord, TargetContext,
};

use crate::context::build_target_context;
use crate::events::EventSink;
use crate::records::RecordWriter;
use crate::synth::{synthesis_query, synthesize_email};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// How the working set is selected from the resolved dependents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionPolicy {
    /// First N after the popularity sort (default).
    OrderedPrefix,
    /// Random sample of N.
    RandomSample,
}

impl SelectionPolicy {
    /// Map a config/flag string onto a policy.
    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "ordered" => Ok(Self::OrderedPrefix),
            "random" => Ok(Self::RandomSample),
            other => Err(ReachError::config(format!(
                "unknown selection policy '{other}': expected 'ordered' or 'random'"
            ))),
        }
    }
}

/// Configuration for one outreach run.
#[derive(Debug, Clone)]
pub struct OutreachConfig {
    /// Target repository as given by the caller; validated in pre-flight.
    pub target: String,
    /// Processing cap: maximum recipients per run.
    pub max_recipients: usize,
    /// Pause after each successful synthesis.
    pub courtesy_delay: Duration,
    /// Working-set selection policy.
    pub selection: SelectionPolicy,
    /// Output CSV path.
    pub output_file: PathBuf,
    /// Address suffixes excluded from contact use.
    pub excluded_domains: Vec<String>,
}

/// External-service handles, constructed once at process start.
pub struct Deps<'a> {
    pub gh: &'a GithubClient,
    pub genai: &'a GenAiClient,
    pub memory: &'a MemoryClient,
    pub resolver: &'a DependentResolver,
}

/// Outcome of a completed run.
#[derive(Debug)]
pub struct RunSummary {
    /// Run identifier (also on the tracing span).
    pub run_id: RunId,
    /// Dependents discovered before the cap was applied.
    pub total_found: usize,
    /// Recipients for whom an email was generated and recorded.
    pub processed: usize,
    /// Where the run records were written.
    pub output_file: PathBuf,
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Run the outreach pipeline, emitting progress into `sink`.
#[instrument(skip_all, fields(target = %config.target))]
pub async fn run_outreach(
    config: &OutreachConfig,
    deps: &Deps<'_>,
    sink: &dyn EventSink,
) -> Result<RunSummary> {
    let run_id = RunId::new();
    info!(%run_id, "starting outreach run");

    // --- Pre-flight: target shape ---
    let target = match RepoRef::parse(&config.target) {
        Ok(target) => target,
        Err(e) => {
            sink.emit(OutreachEvent::error(format!(
                "Invalid target repository format: {}. Use 'owner/repo'.",
                config.target
            )));
            return Err(e);
        }
    };

    // --- Output file: truncate + header before any network work ---
    let mut records = match RecordWriter::create(&config.output_file) {
        Ok(records) => records,
        Err(e) => {
            sink.emit(OutreachEvent::error(format!(
                "Could not open output file: {e}"
            )));
            return Err(e);
        }
    };

    // --- Resolution ---
    sink.emit(OutreachEvent::status(format!(
        "Fetching dependents for {target}..."
    )));

    let dependents = match deps.resolver.resolve(&target).await {
        Ok(dependents) => dependents,
        Err(e) => {
            // Snapshot-file trouble is structural, not a per-recipient skip.
            sink.emit(OutreachEvent::error(e.to_string()));
            return Err(e);
        }
    };

    let total_found = dependents.len();
    sink.emit(OutreachEvent::status(format!(
        "Found {total_found} dependents. Processing up to {}...",
        config.max_recipients
    )));

    let candidates = select_candidates(dependents, config.max_recipients, &config.selection);

    // --- Per-recipient loop ---
    let enricher = ProfileEnricher::new(deps.gh, &config.excluded_domains);
    let adapter = MemoryAdapter::new(deps.memory);
    let mut target_context: Option<TargetContext> = None;
    let mut processed = 0usize;

    for (i, dependent) in candidates.iter().enumerate() {
        let Some(name) = dependent.name.as_deref() else {
            sink.emit(OutreachEvent::warning(format!(
                "Skipping dependent at index {i} due to missing name"
            )));
            continue;
        };

        sink.emit(OutreachEvent::status(format!(
            "Processing dependent {}/{}: {name}",
            i + 1,
            candidates.len()
        )));

        let Some(profile) = enricher.enrich(dependent).await else {
            sink.emit(OutreachEvent::warning(format!(
                "Could not fetch user data for dependent: {name}"
            )));
            continue;
        };

        if profile.email.is_none() {
            sink.emit(OutreachEvent::warning(format!(
                "No email found for {}",
                profile.username
            )));
            continue;
        }

        // Shared context, built on the first recipient that gets this far
        // and reused for the rest of the run.
        if target_context.is_none() {
            target_context = Some(build_target_context(deps.gh, deps.genai, &target).await);
        }
        let context = target_context.as_ref().expect("context just built");

        let identity = recipient_identity(&profile);
        if let Err(e) = adapter.remember(&identity, &target, context, &profile).await {
            warn!(identity = %identity, error = %e, "memory write failed");
            sink.emit(OutreachEvent::warning(format!(
                "Could not store memory for {}: {e}",
                profile.username
            )));
            continue;
        }

        let query = synthesis_query(profile.preferred_name(), target.short_name());
        let facts = match adapter.recall(&identity, &query).await {
            Ok(facts) => facts,
            Err(e) => {
                warn!(identity = %identity, error = %e, "memory recall failed");
                sink.emit(OutreachEvent::warning(format!(
                    "Could not recall memory for {}: {e}",
                    profile.username
                )));
                continue;
            }
        };

        match synthesize_email(deps.genai, profile.preferred_name(), target.short_name(), &facts)
            .await
        {
            Some(body) => {
                sink.emit(OutreachEvent::result(&profile, &body));

                let record = RunRecord {
                    name: profile.preferred_name().to_string(),
                    email: profile.email.clone().expect("checked above"),
                    email_content: body,
                };
                if let Err(e) = records.append(&record) {
                    sink.emit(OutreachEvent::error(format!(
                        "Failed to write run record: {e}"
                    )));
                    return Err(e);
                }
                processed += 1;

                // Courtesy pause before the next recipient.
                tokio::time::sleep(config.courtesy_delay).await;
            }
            None => {
                sink.emit(OutreachEvent::warning(format!(
                    "Could not generate email for {}",
                    profile.username
                )));
            }
        }
    }

    sink.emit(OutreachEvent::status(format!(
        "Finished processing. Generated emails for {processed} users. Saved to {}",
        config.output_file.display()
    )));

    info!(%run_id, total_found, processed, "outreach run complete");

    Ok(RunSummary {
        run_id,
        total_found,
        processed,
        output_file: records.path().to_path_buf(),
    })
}

/// Apply the processing cap under the configured selection policy.
fn select_candidates(
    dependents: Vec<Dependent>,
    cap: usize,
    policy: &SelectionPolicy,
) -> Vec<Dependent> {
    match policy {
        SelectionPolicy::OrderedPrefix => {
            let mut dependents = dependents;
            dependents.truncate(cap);
            dependents
        }
        SelectionPolicy::RandomSample => {
            let mut rng = rand::thread_rng();
            dependents
                .choose_multiple(&mut rng, cap)
                .cloned()
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::CollectingSink;
    use devreach_discovery::{DependentSource, ResolverConfig};
    use wiremock::matchers::{method, path, path_regex};
    use wiremock::{Mock, MockServer, Request, ResponseTemplate};

    // -- harness ------------------------------------------------------------

    struct TestDeps {
        gh: GithubClient,
        genai: GenAiClient,
        memory: MemoryClient,
        resolver: DependentResolver,
    }

    impl TestDeps {
        fn deps(&self) -> Deps<'_> {
            Deps {
                gh: &self.gh,
                genai: &self.genai,
                memory: &self.memory,
                resolver: &self.resolver,
            }
        }
    }

    fn test_deps(server: &MockServer, source: DependentSource, dir: &std::path::Path) -> TestDeps {
        TestDeps {
            gh: GithubClient::with_base("t", &server.uri()).expect("gh"),
            genai: GenAiClient::with_base("k", "gemini-2.0-flash", &server.uri()).expect("genai"),
            memory: MemoryClient::with_base("m", &server.uri()).expect("memory"),
            resolver: DependentResolver::new(ResolverConfig {
                source,
                snapshot_dir: dir.to_path_buf(),
                scrape_base: server.uri(),
            }),
        }
    }

    fn config(target: &str, cap: usize, out: PathBuf) -> OutreachConfig {
        OutreachConfig {
            target: target.to_string(),
            max_recipients: cap,
            courtesy_delay: Duration::from_millis(0),
            selection: SelectionPolicy::OrderedPrefix,
            output_file: out,
            excluded_domains: vec!["@users.noreply.github.com".into()],
        }
    }

    fn snapshot(dir: &std::path::Path, entries: serde_json::Value) -> PathBuf {
        let path = dir.join("snapshot.json");
        std::fs::write(
            &path,
            serde_json::json!({"all_public_dependent_repos": entries}).to_string(),
        )
        .expect("write snapshot");
        path
    }

    /// Memory endpoints: always succeed, search returns one fact.
    async fn mount_memory(server: &MockServer) {
        Mock::given(method("POST"))
            .and(path("/v1/memories/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1/memories/search/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"memory": "They use the target in their project"}
            ])))
            .mount(server)
            .await;
    }

    /// Generation endpoint: fixed reply for any prompt.
    async fn mount_genai(server: &MockServer) {
        Mock::given(method("POST"))
            .and(path_regex(r"^/v1beta/models/.+:generateContent$"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{"content": {"parts": [{"text": "Hello from devreach!"}]}}]
            })))
            .mount(server)
            .await;
    }

    fn count_results(events: &[OutreachEvent]) -> usize {
        events
            .iter()
            .filter(|e| matches!(e, OutreachEvent::Result { .. }))
            .count()
    }

    fn count_warnings(events: &[OutreachEvent]) -> usize {
        events
            .iter()
            .filter(|e| matches!(e, OutreachEvent::Warning { .. }))
            .count()
    }

    fn count_errors(events: &[OutreachEvent]) -> usize {
        events
            .iter()
            .filter(|e| matches!(e, OutreachEvent::Error { .. }))
            .count()
    }

    fn csv_rows(path: &std::path::Path) -> Vec<RunRecord> {
        csv::Reader::from_path(path)
            .expect("open csv")
            .deserialize()
            .collect::<std::result::Result<_, _>>()
            .expect("well-formed csv")
    }

    // -- tests --------------------------------------------------------------

    #[tokio::test]
    async fn mixed_dependents_scenario() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().expect("tempdir");

        // 7 dependents: 2 lack a name, 3 resolve without email, 2 succeed.
        let snap = snapshot(
            dir.path(),
            serde_json::json!([
                {"stars": 90},
                {"name": "good1/app", "stars": 80},
                {"name": "noemail1/app", "stars": 70},
                {"stars": 60},
                {"name": "noemail2/app", "stars": 50},
                {"name": "good2/app", "stars": 40},
                {"name": "noemail3/app", "stars": 30},
            ]),
        );

        // Users: good* declare an email, noemail* do not (and commits offer
        // only relay addresses).
        Mock::given(method("GET"))
            .and(path_regex(r"^/users/[^/]+$"))
            .respond_with(|req: &Request| {
                let login = req.url.path().rsplit('/').next().unwrap().to_string();
                let email = if login.starts_with("good") {
                    serde_json::json!(format!("{login}@example.com"))
                } else {
                    serde_json::json!(null)
                };
                ResponseTemplate::new(200).set_body_json(serde_json::json!({
                    "login": login, "name": null, "email": email,
                }))
            })
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path_regex(r"^/repos/[^/]+/[^/]+/commits$"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"commit": {"author": {"email": "1+x@users.noreply.github.com"}}}
            ])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path_regex(r"^/repos/[^/]+/[^/]+$"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "description": "an app", "stargazers_count": 5, "language": "Rust",
            })))
            .mount(&server)
            .await;
        // Target README fetched exactly once for the whole run.
        Mock::given(method("GET"))
            .and(path("/repos/octo/widgets/readme"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "content": "IyBtZW0wCgpGYXN0IG1lbW9yaWVzLg==", "encoding": "base64",
            })))
            .expect(1)
            .mount(&server)
            .await;
        mount_memory(&server).await;
        mount_genai(&server).await;

        let deps = test_deps(&server, DependentSource::Snapshot(snap), dir.path());
        let out = dir.path().join("emails.csv");
        let sink = CollectingSink::new();

        let summary = run_outreach(&config("octo/widgets", 7, out.clone()), &deps.deps(), &sink)
            .await
            .expect("run");

        assert_eq!(summary.total_found, 7);
        assert_eq!(summary.processed, 2);

        let events = sink.events();
        assert_eq!(count_results(&events), 2);
        // 2 missing-name + 3 missing-email warnings.
        assert_eq!(count_warnings(&events), 5);
        assert_eq!(count_errors(&events), 0);

        // Stream ends with exactly one terminal summary status.
        match events.last().expect("events") {
            OutreachEvent::Status { status } => {
                assert!(status.contains("Generated emails for 2 users"));
            }
            other => panic!("expected terminal status, got {other:?}"),
        }

        let rows = csv_rows(&out);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "good1");
        assert_eq!(rows[0].email, "good1@example.com");
        assert_eq!(rows[0].email_content, "Hello from devreach!");
    }

    #[tokio::test]
    async fn processing_cap_holds() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().expect("tempdir");

        let entries: Vec<serde_json::Value> = (1..=7)
            .map(|i| serde_json::json!({"name": format!("user{i}/app{i}"), "stars": 100 - i}))
            .collect();
        let snap = snapshot(dir.path(), serde_json::Value::Array(entries));

        Mock::given(method("GET"))
            .and(path_regex(r"^/users/[^/]+$"))
            .respond_with(|req: &Request| {
                let login = req.url.path().rsplit('/').next().unwrap().to_string();
                ResponseTemplate::new(200).set_body_json(serde_json::json!({
                    "login": login,
                    "name": "Dev",
                    "email": format!("{login}@example.com"),
                }))
            })
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path_regex(r"^/repos/[^/]+/[^/]+$"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "stargazers_count": 1,
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path_regex(r"^/repos/[^/]+/[^/]+/readme$"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        mount_memory(&server).await;
        mount_genai(&server).await;

        let deps = test_deps(&server, DependentSource::Snapshot(snap), dir.path());
        let out = dir.path().join("emails.csv");
        let sink = CollectingSink::new();

        let summary = run_outreach(&config("octo/widgets", 5, out.clone()), &deps.deps(), &sink)
            .await
            .expect("run");

        assert_eq!(summary.total_found, 7);
        assert_eq!(summary.processed, 5);
        assert_eq!(count_results(&sink.events()), 5);
        assert_eq!(csv_rows(&out).len(), 5);
        // Ordered-prefix selection: the first five by the resolver's order.
        assert_eq!(csv_rows(&out)[0].email, "user1@example.com");
        assert_eq!(csv_rows(&out)[4].email, "user5@example.com");
    }

    #[tokio::test]
    async fn malformed_target_terminates_before_any_side_effect() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().expect("tempdir");
        // A snapshot path that would error if resolution were attempted.
        let deps = test_deps(
            &server,
            DependentSource::Snapshot(dir.path().join("never-read.json")),
            dir.path(),
        );
        let out = dir.path().join("emails.csv");
        let sink = CollectingSink::new();

        let err = run_outreach(&config("not-a-repo-id", 5, out.clone()), &deps.deps(), &sink)
            .await
            .unwrap_err();
        assert!(matches!(err, ReachError::Validation { .. }));

        let events = sink.events();
        assert_eq!(events.len(), 1);
        assert_eq!(count_errors(&events), 1);
        // No resolver invocation, no output file.
        assert!(!out.exists());
    }

    #[tokio::test]
    async fn missing_snapshot_is_structural_failure_after_header() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().expect("tempdir");
        let deps = test_deps(
            &server,
            DependentSource::Snapshot(dir.path().join("gone.json")),
            dir.path(),
        );
        let out = dir.path().join("emails.csv");
        let sink = CollectingSink::new();

        let err = run_outreach(&config("octo/widgets", 5, out.clone()), &deps.deps(), &sink)
            .await
            .unwrap_err();
        assert!(matches!(err, ReachError::Resolver(_)));
        assert_eq!(count_errors(&sink.events()), 1);
        // The header row is the only write that happened.
        assert_eq!(
            std::fs::read_to_string(&out).expect("read"),
            "name,email,email_content\n"
        );
    }

    #[tokio::test]
    async fn lookup_failure_completes_with_zero_processed() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().expect("tempdir");
        // The external lookup tool is not installed here, so the Cli source
        // degrades to an empty dependent list.
        let deps = test_deps(&server, DependentSource::Cli, dir.path());
        let out = dir.path().join("emails.csv");
        let sink = CollectingSink::new();

        let summary = run_outreach(&config("octo/widgets", 5, out.clone()), &deps.deps(), &sink)
            .await
            .expect("run proceeds despite lookup failure");

        assert_eq!(summary.total_found, 0);
        assert_eq!(summary.processed, 0);

        let events = sink.events();
        assert_eq!(count_results(&events), 0);
        assert_eq!(count_errors(&events), 0);
        match events.last().expect("events") {
            OutreachEvent::Status { status } => {
                assert!(status.contains("Generated emails for 0 users"));
            }
            other => panic!("expected terminal status, got {other:?}"),
        }
        // The header-only file is still produced.
        assert_eq!(
            std::fs::read_to_string(&out).expect("read"),
            "name,email,email_content\n"
        );
    }

    #[tokio::test]
    async fn memory_failure_skips_recipient_and_continues() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().expect("tempdir");
        let snap = snapshot(
            dir.path(),
            serde_json::json!([{"name": "good1/app", "stars": 1}]),
        );

        Mock::given(method("GET"))
            .and(path_regex(r"^/users/[^/]+$"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "login": "good1", "name": null, "email": "good1@example.com",
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path_regex(r"^/repos/[^/]+/[^/]+$"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "stargazers_count": 1,
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path_regex(r"^/repos/[^/]+/[^/]+/readme$"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1/memories/"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        mount_genai(&server).await;

        let deps = test_deps(&server, DependentSource::Snapshot(snap), dir.path());
        let out = dir.path().join("emails.csv");
        let sink = CollectingSink::new();

        let summary = run_outreach(&config("octo/widgets", 5, out.clone()), &deps.deps(), &sink)
            .await
            .expect("run completes despite memory failure");

        assert_eq!(summary.processed, 0);
        assert_eq!(count_results(&sink.events()), 0);
        assert!(count_warnings(&sink.events()) >= 1);
        assert_eq!(csv_rows(&out).len(), 0);
    }

    #[tokio::test]
    async fn generation_failure_warns_and_continues() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().expect("tempdir");
        let snap = snapshot(
            dir.path(),
            serde_json::json!([
                {"name": "good1/app", "stars": 2},
                {"name": "good2/app", "stars": 1},
            ]),
        );

        Mock::given(method("GET"))
            .and(path_regex(r"^/users/[^/]+$"))
            .respond_with(|req: &Request| {
                let login = req.url.path().rsplit('/').next().unwrap().to_string();
                ResponseTemplate::new(200).set_body_json(serde_json::json!({
                    "login": login, "name": null, "email": format!("{login}@example.com"),
                }))
            })
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path_regex(r"^/repos/[^/]+/[^/]+$"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "stargazers_count": 1,
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path_regex(r"^/repos/[^/]+/[^/]+/readme$"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        mount_memory(&server).await;
        // Generation always answers with no candidates.
        Mock::given(method("POST"))
            .and(path_regex(r"^/v1beta/models/.+:generateContent$"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"candidates": []})),
            )
            .mount(&server)
            .await;

        let deps = test_deps(&server, DependentSource::Snapshot(snap), dir.path());
        let out = dir.path().join("emails.csv");
        let sink = CollectingSink::new();

        let summary = run_outreach(&config("octo/widgets", 5, out.clone()), &deps.deps(), &sink)
            .await
            .expect("run");

        assert_eq!(summary.processed, 0);
        let events = sink.events();
        assert_eq!(count_results(&events), 0);
        // One generation warning per recipient, and the loop reached both.
        assert_eq!(count_warnings(&events), 2);
        assert_eq!(csv_rows(&out).len(), 0);
    }

    #[test]
    fn ordered_prefix_keeps_resolver_order() {
        let dependents: Vec<Dependent> = (1..=4)
            .map(|i| Dependent {
                name: Some(format!("u{i}/r{i}")),
                stars: Some(10 - i),
            })
            .collect();

        let selected = select_candidates(dependents, 2, &SelectionPolicy::OrderedPrefix);
        assert_eq!(selected.len(), 2);
        assert_eq!(selected[0].name.as_deref(), Some("u1/r1"));
        assert_eq!(selected[1].name.as_deref(), Some("u2/r2"));
    }

    #[test]
    fn random_sample_draws_from_input_without_exceeding_cap() {
        let dependents: Vec<Dependent> = (1..=10)
            .map(|i| Dependent {
                name: Some(format!("u{i}/r{i}")),
                stars: None,
            })
            .collect();
        let names: Vec<String> = dependents.iter().filter_map(|d| d.name.clone()).collect();

        let selected = select_candidates(dependents.clone(), 3, &SelectionPolicy::RandomSample);
        assert_eq!(selected.len(), 3);
        for d in &selected {
            assert!(names.contains(d.name.as_ref().expect("name")));
        }

        // A cap above the population returns everything.
        let all = select_candidates(dependents, 99, &SelectionPolicy::RandomSample);
        assert_eq!(all.len(), 10);
    }

    #[test]
    fn selection_policy_from_name() {
        assert_eq!(
            SelectionPolicy::from_name("ordered").expect("ordered"),
            SelectionPolicy::OrderedPrefix
        );
        assert_eq!(
            SelectionPolicy::from_name("random").expect("random"),
            SelectionPolicy::RandomSample
        );
        assert!(SelectionPolicy::from_name("alphabetical").is_err());
    }
}
