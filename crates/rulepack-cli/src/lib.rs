//! # rulepack-cli: Command-Line Interface
//!
//! Library half of the `rulepack` binary. Each subcommand lives in its own
//! module and returns an exit code so the handlers can be driven from tests.
//!
//! ## Subcommands
//!
//! - `rulepack pack`: fetch, validate, canonicalize, compress and write the
//!   updater artifact. Prints `Serialized` on success.
//! - `rulepack validate [PATH]`: validate only. Prints `Schema is alright.`
//!   or the concatenated error text.
//! - `rulepack inspect <ARTIFACT>`: decompress an artifact and summarize it.
//! - `rulepack schema`: print the effective schema document.
//!
//! ## Configuration
//!
//! Flags override an optional `--config` YAML file, which overrides the
//! built-in defaults. See [`config`].

pub mod config;
pub mod inspect;
pub mod pack;
pub mod pipeline;
pub mod schema;
pub mod validate;

pub use pipeline::{run_pipeline, PackReport, PipelineError, PipelineStage};

#[cfg(test)]
mod tests {
    #[test]
    fn public_modules_are_accessible() {
        let _ = crate::config::DEFAULT_OUTPUT_FILE;
        let _ = crate::pipeline::PipelineStage::Fetching;
        let _ = crate::pack::run_pack;
        let _ = crate::validate::run_validate;
        let _ = crate::inspect::run_inspect;
        let _ = crate::schema::run_schema;
    }
}
