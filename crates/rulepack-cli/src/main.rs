//! # rulepack CLI entry point
//!
//! Parses command-line arguments, sets up logging, and dispatches to the
//! subcommand handlers in the `rulepack_cli` library.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use rulepack_cli::config::FileConfig;
use rulepack_cli::inspect::{run_inspect, InspectArgs};
use rulepack_cli::pack::{run_pack, PackArgs};
use rulepack_cli::schema::{run_schema, SchemaArgs};
use rulepack_cli::validate::{run_validate, ValidateArgs};

/// Build the SpeedReader updater artifact.
///
/// Fetches the readability configuration, validates it against the
/// configuration schema, and writes it gzip-compressed for the component
/// updater.
#[derive(Parser, Debug)]
#[command(name = "rulepack", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a YAML configuration file.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch, validate, compress and write the updater artifact.
    Pack(PackArgs),

    /// Validate a configuration without packing it.
    Validate(ValidateArgs),

    /// Summarize the contents of an updater artifact.
    Inspect(InspectArgs),

    /// Print the effective configuration schema.
    Schema(SchemaArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG wins over -v when set.
    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "rulepack starting");

    match run(cli) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            println!("Error: {e:#}");
            ExitCode::from(1)
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<u8> {
    let file = match &cli.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    match cli.command {
        Commands::Pack(args) => runtime.block_on(run_pack(&args, &file)),
        Commands::Validate(args) => runtime.block_on(run_validate(&args, &file)),
        Commands::Inspect(args) => run_inspect(&args),
        Commands::Schema(args) => run_schema(&args, &file),
    }
}
