//! # Inspect Subcommand
//!
//! Decompresses an updater artifact the way the browser-side loader does
//! and summarizes what it holds.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use rulepack_pack::read_artifact;

/// Arguments for the `inspect` subcommand.
#[derive(Args, Debug, Clone)]
pub struct InspectArgs {
    /// Artifact to inspect.
    pub artifact: PathBuf,

    /// Print the decompressed configuration as pretty JSON.
    #[arg(long)]
    pub json: bool,
}

/// Execute `rulepack inspect`.
pub fn run_inspect(args: &InspectArgs) -> Result<u8> {
    let artifact = read_artifact(&args.artifact)
        .with_context(|| format!("failed to read artifact {}", args.artifact.display()))?;
    let payload = artifact
        .payload()
        .with_context(|| format!("failed to decompress {}", args.artifact.display()))?;
    let config = artifact
        .unpack()
        .with_context(|| format!("failed to decode {}", args.artifact.display()))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(0);
    }

    println!("artifact:   {}", args.artifact.display());
    println!("digest:     {}", artifact.digest());
    println!("compressed: {} bytes", artifact.len());
    println!("payload:    {} bytes", payload.len());
    println!("rules:      {}", config.len());
    for domain in config.domains() {
        println!("  {domain}");
    }
    let duplicates = config.duplicate_domains();
    if !duplicates.is_empty() {
        println!("duplicate domains: {}", duplicates.join(", "));
    }
    Ok(0)
}
