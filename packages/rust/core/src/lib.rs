//! devreach pipeline core: target context, synthesis, records, and the
//! outreach orchestrator.
//!
//! [`run_outreach`] is the dependency-injected pipeline; callers construct
//! the service clients themselves. [`run_outreach_from_env`] is the
//! process boundary: it validates the configured secrets, builds the
//! clients, and runs the pipeline, converting a missing secret into the
//! run's single `error` event.

pub mod context;
pub mod events;
pub mod outreach;
pub mod records;
pub mod synth;

use devreach_discovery::{DependentResolver, ResolverConfig};
use devreach_genai::GenAiClient;
use devreach_github::GithubClient;
use devreach_memory::MemoryClient;
use devreach_shared::{AppConfig, OutreachEvent, Result, Secrets};

pub use events::{CollectingSink, EventSink, SilentSink};
pub use outreach::{Deps, OutreachConfig, RunSummary, SelectionPolicy, run_outreach};

/// Pre-flight secrets check, client construction, and pipeline run.
///
/// Any pre-flight failure emits exactly one `error` event and returns
/// before side effects.
pub async fn run_outreach_from_env(
    app: &AppConfig,
    config: &OutreachConfig,
    resolver_config: ResolverConfig,
    sink: &dyn EventSink,
) -> Result<RunSummary> {
    let secrets = match Secrets::from_env(app) {
        Ok(secrets) => secrets,
        Err(e) => {
            sink.emit(OutreachEvent::error(
                "Missing API keys in environment variables.",
            ));
            return Err(e);
        }
    };

    let clients = build_clients(app, &secrets);
    let (gh, genai, memory) = match clients {
        Ok(clients) => clients,
        Err(e) => {
            sink.emit(OutreachEvent::error(e.to_string()));
            return Err(e);
        }
    };
    let resolver = DependentResolver::new(resolver_config);

    let deps = Deps {
        gh: &gh,
        genai: &genai,
        memory: &memory,
        resolver: &resolver,
    };

    run_outreach(config, &deps, sink).await
}

fn build_clients(
    app: &AppConfig,
    secrets: &Secrets,
) -> Result<(GithubClient, GenAiClient, MemoryClient)> {
    let gh = GithubClient::with_base(&secrets.github_token, &app.github.api_base)?;
    let genai = GenAiClient::with_base(
        &secrets.genai_api_key,
        &app.genai.model,
        &app.genai.api_base,
    )?;
    let memory = MemoryClient::with_base(&secrets.memory_api_key, &app.memory.api_base)?;
    Ok((gh, genai, memory))
}
