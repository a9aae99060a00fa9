//! # Configuration
//!
//! Settings come from three layers, highest precedence first:
//!
//! 1. Command-line flags (some with `RULEPACK_*` environment fallbacks).
//! 2. An optional YAML file passed with `--config`.
//! 3. Built-in defaults matching the SpeedReader repository layout.
//!
//! Relative paths inside the YAML file resolve against the file's own
//! directory, so a checked-in `rulepack.yaml` works from any working
//! directory.
//!
//! ```yaml
//! source: remote
//! input: data/SpeedReaderConfig.json
//! output: data/speedreader-updater.dat
//! remote:
//!   base_url: https://raw.githubusercontent.com/brave-experiments/SpeedReader/master/
//!   path: data/SpeedReaderConfig.json
//!   timeout_secs: 30
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use serde::Deserialize;

use rulepack_schema::SchemaDocument;
use rulepack_source::{
    AnySource, LocalFileSource, RemoteConfig, RemoteSource, SourceError, DEFAULT_BASE_URL,
    DEFAULT_CONFIG_FILE,
};

/// Default artifact path, relative to the working directory.
pub const DEFAULT_OUTPUT_FILE: &str = "data/speedreader-updater.dat";

/// Which source the pipeline reads from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceMode {
    #[default]
    Local,
    Remote,
}

/// Contents of a `--config` YAML file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub source: Option<SourceMode>,
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub schema: Option<PathBuf>,
    #[serde(default)]
    pub remote: RemoteSection,
}

/// The `remote:` block of the YAML file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RemoteSection {
    pub base_url: Option<String>,
    pub path: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl FileConfig {
    /// Load and parse a YAML config file.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read, is not valid YAML, or contains
    /// keys this version does not understand.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let mut config: FileConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("invalid config file: {}", path.display()))?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        config.input = config.input.map(|p| relative_to(base, p));
        config.output = config.output.map(|p| relative_to(base, p));
        config.schema = config.schema.map(|p| relative_to(base, p));

        tracing::debug!(path = %path.display(), "loaded config file");
        Ok(config)
    }
}

fn relative_to(base: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}

/// Flags selecting and configuring the config source.
#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// Input configuration file.
    #[arg(long, value_name = "PATH", env = "RULEPACK_INPUT")]
    pub input: Option<PathBuf>,

    /// Fetch the configuration over HTTP instead of reading a file.
    #[arg(long)]
    pub remote: bool,

    /// Base URL for --remote.
    #[arg(long, value_name = "URL", env = "RULEPACK_BASE_URL")]
    pub base_url: Option<String>,

    /// Path under the base URL for --remote.
    #[arg(long, value_name = "PATH")]
    pub remote_path: Option<String>,

    /// Request timeout for --remote. No timeout when unset.
    #[arg(long, value_name = "SECS")]
    pub timeout_secs: Option<u64>,

    /// Schema override file. Defaults to the embedded schema.
    #[arg(long, value_name = "PATH")]
    pub schema: Option<PathBuf>,
}

/// A fully resolved source choice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceSettings {
    Local { path: PathBuf },
    Remote {
        base_url: String,
        path: String,
        timeout: Option<Duration>,
    },
}

impl SourceSettings {
    /// Merge flags over the file config over defaults.
    pub fn resolve(args: &SourceArgs, file: &FileConfig) -> Self {
        let mode = if args.remote {
            SourceMode::Remote
        } else {
            file.source.unwrap_or_default()
        };

        match mode {
            SourceMode::Local => Self::Local {
                path: args
                    .input
                    .clone()
                    .or_else(|| file.input.clone())
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE)),
            },
            SourceMode::Remote => Self::Remote {
                base_url: args
                    .base_url
                    .clone()
                    .or_else(|| file.remote.base_url.clone())
                    .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
                path: args
                    .remote_path
                    .clone()
                    .or_else(|| file.remote.path.clone())
                    .unwrap_or_else(|| DEFAULT_CONFIG_FILE.to_string()),
                timeout: args
                    .timeout_secs
                    .or(file.remote.timeout_secs)
                    .map(Duration::from_secs),
            },
        }
    }

    /// Construct the source.
    ///
    /// # Errors
    ///
    /// Returns `SourceError` if the remote URL is invalid or the HTTP
    /// client cannot be built.
    pub fn build(&self) -> Result<AnySource, SourceError> {
        Ok(match self {
            Self::Local { path } => LocalFileSource::new(path.clone()).into(),
            Self::Remote {
                base_url,
                path,
                timeout,
            } => {
                let mut config = RemoteConfig::new(base_url.clone(), path.clone());
                config.timeout = *timeout;
                RemoteSource::new(config)?.into()
            }
        })
    }
}

/// Resolve the schema override path, if any.
pub fn schema_path(flag: Option<&Path>, file: &FileConfig) -> Option<PathBuf> {
    flag.map(Path::to_path_buf).or_else(|| file.schema.clone())
}

/// Load the override schema or fall back to the embedded one.
///
/// # Errors
///
/// Returns the schema provider's error unchanged.
pub fn load_schema(path: Option<&Path>) -> Result<SchemaDocument, rulepack_schema::SchemaError> {
    match path {
        Some(p) => SchemaDocument::from_file(p),
        None => SchemaDocument::embedded(),
    }
}
