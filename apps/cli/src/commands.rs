//! CLI command definitions, routing, and tracing setup.

use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use tracing::info;

use devreach_core::{EventSink, OutreachConfig, SelectionPolicy, run_outreach_from_env};
use devreach_discovery::{DependentSource, ResolverConfig};
use devreach_shared::{AppConfig, OutreachEvent, init_config, load_config};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// devreach — personalized outreach for your project's dependents.
#[derive(Parser)]
#[command(
    name = "devreach",
    version,
    about = "Discover dependents of a repository and generate personalized outreach emails.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Run an outreach pass for one target repository.
    Run {
        /// Target repository as `owner/repo`.
        repository: String,

        /// Maximum recipients to process this run.
        #[arg(short, long)]
        limit: Option<usize>,

        /// Dependent source: cli, snapshot, or scrape.
        #[arg(long)]
        source: Option<String>,

        /// Snapshot file to resolve from (implies --source snapshot).
        #[arg(long)]
        snapshot_file: Option<PathBuf>,

        /// Recipient selection: ordered or random.
        #[arg(long)]
        select: Option<String>,

        /// Output CSV file.
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
///
/// Logs go to stderr: stdout is reserved for the NDJSON event stream.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Run {
            repository,
            limit,
            source,
            snapshot_file,
            select,
            out,
        } => cmd_run(&repository, limit, source.as_deref(), snapshot_file, select.as_deref(), out).await,
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init().await,
            ConfigAction::Show => cmd_config_show().await,
        },
    }
}

async fn cmd_run(
    repository: &str,
    limit: Option<usize>,
    source: Option<&str>,
    snapshot_file: Option<PathBuf>,
    select: Option<&str>,
    out: Option<PathBuf>,
) -> Result<()> {
    let app = load_config()?;

    // Flags override config file values.
    let source_name = match (source, &snapshot_file) {
        (Some(name), _) => name.to_string(),
        (None, Some(_)) => "snapshot".to_string(),
        (None, None) => app.defaults.source.clone(),
    };
    let source = DependentSource::from_name(&source_name, snapshot_file)?;

    let selection =
        SelectionPolicy::from_name(select.unwrap_or(app.defaults.selection.as_str()))?;

    let config = OutreachConfig {
        target: repository.to_string(),
        max_recipients: limit.unwrap_or(app.defaults.max_recipients),
        courtesy_delay: Duration::from_millis(app.defaults.courtesy_delay_ms),
        selection,
        output_file: out.unwrap_or_else(|| PathBuf::from(&app.defaults.output_file)),
        excluded_domains: app.email.excluded_domains.clone(),
    };

    let resolver_config = ResolverConfig {
        source,
        snapshot_dir: PathBuf::from(&app.defaults.snapshot_dir),
        ..Default::default()
    };

    info!(
        repository,
        limit = config.max_recipients,
        source = %source_name,
        "starting outreach run"
    );

    let sink = NdjsonSink;
    let summary = run_outreach_from_env(&app, &config, resolver_config, &sink)
        .await
        .map_err(|e| eyre!("outreach run failed: {e}"))?;

    info!(
        processed = summary.processed,
        total_found = summary.total_found,
        output = %summary.output_file.display(),
        "outreach run finished"
    );

    Ok(())
}

// ---------------------------------------------------------------------------
// NDJSON event sink
// ---------------------------------------------------------------------------

/// Writes each pipeline event as one JSON line on stdout, flushed
/// immediately so consumers see events as they happen.
struct NdjsonSink;

impl EventSink for NdjsonSink {
    fn emit(&self, event: OutreachEvent) {
        if let Ok(line) = serde_json::to_string(&event) {
            let mut stdout = std::io::stdout().lock();
            // A closed pipe just means the consumer went away.
            let _ = writeln!(stdout, "{line}");
            let _ = stdout.flush();
        }
    }
}

// ---------------------------------------------------------------------------
// Config commands
// ---------------------------------------------------------------------------

async fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

async fn cmd_config_show() -> Result<()> {
    let config: AppConfig = load_config()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}
