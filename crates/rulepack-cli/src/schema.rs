//! Schema subcommand: prints the effective schema document.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use crate::config::{self, FileConfig};

/// Arguments for the `schema` subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct SchemaArgs {
    /// Schema override file. Defaults to the embedded schema.
    #[arg(long, value_name = "PATH")]
    pub schema: Option<PathBuf>,
}

/// Execute `rulepack schema`.
pub fn run_schema(args: &SchemaArgs, file: &FileConfig) -> Result<u8> {
    let path = config::schema_path(args.schema.as_deref(), file);
    let schema = config::load_schema(path.as_deref()).context("failed to load configuration schema")?;
    tracing::debug!(origin = %schema.origin(), "printing schema");
    println!("{}", schema.to_pretty_string());
    Ok(0)
}
