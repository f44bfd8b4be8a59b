//! Application configuration for devreach.
//!
//! User config lives at `~/.devreach/devreach.toml`.
//! CLI flags override config file values, which override defaults.
//! Secrets are never stored in the file: each service section names the
//! environment variable that holds its credential.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ReachError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "devreach.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".devreach";

// ---------------------------------------------------------------------------
// Config structs (matching devreach.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Global defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// GitHub API settings.
    #[serde(default)]
    pub github: GithubConfig,

    /// Text-generation service settings.
    #[serde(default)]
    pub genai: GenAiConfig,

    /// Memory-store service settings.
    #[serde(default)]
    pub memory: MemoryConfig,

    /// Contact-address filtering.
    #[serde(default)]
    pub email: EmailConfig,
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Processing cap: maximum recipients per run.
    #[serde(default = "default_max_recipients")]
    pub max_recipients: usize,

    /// Courtesy delay after each successful synthesis, in milliseconds.
    #[serde(default = "default_courtesy_delay_ms")]
    pub courtesy_delay_ms: u64,

    /// Dependent-resolution source: "cli", "snapshot", or "scrape".
    #[serde(default = "default_source")]
    pub source: String,

    /// Recipient selection policy: "ordered" (first N by popularity) or "random".
    #[serde(default = "default_selection")]
    pub selection: String,

    /// Output CSV file for run records.
    #[serde(default = "default_output_file")]
    pub output_file: String,

    /// Directory for raw dependent-list snapshots.
    #[serde(default = "default_snapshot_dir")]
    pub snapshot_dir: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            max_recipients: default_max_recipients(),
            courtesy_delay_ms: default_courtesy_delay_ms(),
            source: default_source(),
            selection: default_selection(),
            output_file: default_output_file(),
            snapshot_dir: default_snapshot_dir(),
        }
    }
}

fn default_max_recipients() -> usize {
    5
}
fn default_courtesy_delay_ms() -> u64 {
    1000
}
fn default_source() -> String {
    "cli".into()
}
fn default_selection() -> String {
    "ordered".into()
}
fn default_output_file() -> String {
    "emails.csv".into()
}
fn default_snapshot_dir() -> String {
    ".".into()
}

/// `[github]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubConfig {
    /// Name of the env var holding the API token (never store the token itself).
    #[serde(default = "default_github_token_env")]
    pub token_env: String,

    /// API base URL (overridable for tests).
    #[serde(default = "default_github_api_base")]
    pub api_base: String,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            token_env: default_github_token_env(),
            api_base: default_github_api_base(),
        }
    }
}

fn default_github_token_env() -> String {
    "GITHUB_TOKEN".into()
}
fn default_github_api_base() -> String {
    "https://api.github.com".into()
}

/// `[genai]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenAiConfig {
    /// Name of the env var holding the API key.
    #[serde(default = "default_genai_key_env")]
    pub api_key_env: String,

    /// Model to use for feature extraction and email generation.
    #[serde(default = "default_genai_model")]
    pub model: String,

    /// API base URL (overridable for tests).
    #[serde(default = "default_genai_api_base")]
    pub api_base: String,
}

impl Default for GenAiConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_genai_key_env(),
            model: default_genai_model(),
            api_base: default_genai_api_base(),
        }
    }
}

fn default_genai_key_env() -> String {
    "GEMINI_API_KEY".into()
}
fn default_genai_model() -> String {
    "gemini-2.0-flash".into()
}
fn default_genai_api_base() -> String {
    "https://generativelanguage.googleapis.com".into()
}

/// `[memory]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// Name of the env var holding the API key.
    #[serde(default = "default_memory_key_env")]
    pub api_key_env: String,

    /// API base URL (overridable for tests).
    #[serde(default = "default_memory_api_base")]
    pub api_base: String,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_memory_key_env(),
            api_base: default_memory_api_base(),
        }
    }
}

fn default_memory_key_env() -> String {
    "MEM0_API_KEY".into()
}
fn default_memory_api_base() -> String {
    "https://api.mem0.ai".into()
}

/// `[email]` section — contact-address filtering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    /// Address suffixes that are never usable contacts (platform relays etc.).
    #[serde(default = "default_excluded_domains")]
    pub excluded_domains: Vec<String>,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            excluded_domains: default_excluded_domains(),
        }
    }
}

fn default_excluded_domains() -> Vec<String> {
    vec!["@users.noreply.github.com".into()]
}

// ---------------------------------------------------------------------------
// Secrets
// ---------------------------------------------------------------------------

/// Credentials resolved from the environment at process start.
///
/// Construct once via [`Secrets::from_env`] and pass the values into the
/// service clients; components never read the environment themselves.
#[derive(Clone)]
pub struct Secrets {
    /// GitHub API token.
    pub github_token: String,
    /// Text-generation API key.
    pub genai_api_key: String,
    /// Memory-store API key.
    pub memory_api_key: String,
}

impl Secrets {
    /// Resolve all required secrets from the env vars named in `config`.
    ///
    /// Fails on the first missing or empty variable, naming it.
    pub fn from_env(config: &AppConfig) -> Result<Self> {
        Ok(Self {
            github_token: require_env(&config.github.token_env)?,
            genai_api_key: require_env(&config.genai.api_key_env)?,
            memory_api_key: require_env(&config.memory.api_key_env)?,
        })
    }
}

impl std::fmt::Debug for Secrets {
    // Never let credentials leak into logs or error output.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Secrets").finish_non_exhaustive()
    }
}

fn require_env(var_name: &str) -> Result<String> {
    match std::env::var(var_name) {
        Ok(val) if !val.is_empty() => Ok(val),
        _ => Err(ReachError::config(format!(
            "missing required secret: set the {var_name} environment variable"
        ))),
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.devreach/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| ReachError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.devreach/devreach.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| ReachError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| ReachError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| ReachError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| ReachError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| ReachError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}
