//! # Validate Subcommand
//!
//! Fetches and validates a configuration without packing it.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use rulepack_schema::Validator;
use rulepack_source::{AnySource, ConfigSource, LocalFileSource};

use crate::config::{self, FileConfig, SourceArgs, SourceSettings};

/// Arguments for the `validate` subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct ValidateArgs {
    /// Configuration file to check. Overrides --input and --remote.
    pub path: Option<PathBuf>,

    #[command(flatten)]
    pub source: SourceArgs,
}

/// Execute `rulepack validate`.
///
/// Prints `Schema is alright.` and returns 0 for a valid document, or
/// prints the concatenated error text and returns 1.
pub async fn run_validate(args: &ValidateArgs, file: &FileConfig) -> Result<u8> {
    let schema_path = config::schema_path(args.source.schema.as_deref(), file);
    let schema = config::load_schema(schema_path.as_deref())
        .context("failed to load configuration schema")?;
    let validator = Validator::new(schema).context("failed to compile configuration schema")?;

    let source: AnySource = match &args.path {
        Some(path) => LocalFileSource::new(path.clone()).into(),
        None => SourceSettings::resolve(&args.source, file)
            .build()
            .context("failed to set up configuration source")?,
    };

    let document = source
        .fetch()
        .await
        .with_context(|| format!("failed to fetch configuration from {}", source.describe()))?;

    let outcome = validator.validate_owned(document);
    if outcome.valid {
        println!("Schema is alright.");
        Ok(0)
    } else {
        tracing::warn!(violations = outcome.violations.len(), "configuration is invalid");
        println!("{}", outcome.error_text());
        Ok(1)
    }
}
