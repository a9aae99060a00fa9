//! # Pack Subcommand
//!
//! Runs the full pipeline and writes the updater artifact.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use crate::config::{self, FileConfig, SourceArgs, SourceSettings, DEFAULT_OUTPUT_FILE};
use crate::pipeline::run_pipeline;

/// Arguments for the `pack` subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct PackArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Output artifact path.
    #[arg(long, short, value_name = "PATH", env = "RULEPACK_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Build the artifact but do not write it.
    #[arg(long)]
    pub dry_run: bool,
}

impl PackArgs {
    /// Output path after applying the config file and default.
    pub fn output_path(&self, file: &FileConfig) -> PathBuf {
        self.output
            .clone()
            .or_else(|| file.output.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_FILE))
    }
}

/// Execute `rulepack pack`.
///
/// Prints `Serialized` and returns exit code 0 on success. Any failure is
/// returned as an error for `main` to report.
pub async fn run_pack(args: &PackArgs, file: &FileConfig) -> Result<u8> {
    let schema_path = config::schema_path(args.source.schema.as_deref(), file);
    let schema = config::load_schema(schema_path.as_deref())
        .context("failed to load configuration schema")?;

    let source = SourceSettings::resolve(&args.source, file)
        .build()
        .context("failed to set up configuration source")?;

    let output = (!args.dry_run).then(|| args.output_path(file));
    let report = run_pipeline(&source, &schema, output.as_deref()).await?;

    tracing::info!(
        rules = report.rules,
        payload_bytes = report.payload_bytes,
        artifact_bytes = report.artifact_bytes,
        digest = %report.digest,
        dry_run = args.dry_run,
        "packed configuration"
    );
    println!("Serialized");
    Ok(0)
}
