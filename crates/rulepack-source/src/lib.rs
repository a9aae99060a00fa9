//! # rulepack-source: Configuration Sources
//!
//! Produces the raw configuration document for the pipeline. Two sources
//! implement [`ConfigSource`]:
//!
//! - [`LocalFileSource`]: reads a JSON file. This is the default.
//! - [`RemoteSource`]: one HTTP GET against `base_url` + `path`. Selected
//!   explicitly, never as a fallback.
//!
//! [`AnySource`] picks one of the two at runtime so callers hold a single
//! concrete type.
//!
//! ## Error Handling
//!
//! Local failures map to `NotFound`/`Io`, remote transport and status
//! failures to `Network`, and an unparseable body to `Parse`. Nothing is
//! retried.

use std::future::Future;

use serde_json::Value;

pub mod error;
pub mod local;
pub mod remote;

pub use error::SourceError;
pub use local::{LocalFileSource, DEFAULT_CONFIG_FILE};
pub use remote::{RemoteConfig, RemoteSource, DEFAULT_BASE_URL};

/// Something that can produce a parsed configuration document.
pub trait ConfigSource {
    /// Short human-readable description for logs, e.g. `file data/x.json`.
    fn describe(&self) -> String;

    /// Fetch and parse the document.
    fn fetch(&self) -> impl Future<Output = Result<Value, SourceError>> + Send;
}

/// Runtime choice between the local and remote source.
#[derive(Debug, Clone)]
pub enum AnySource {
    Local(LocalFileSource),
    Remote(RemoteSource),
}

impl From<LocalFileSource> for AnySource {
    fn from(source: LocalFileSource) -> Self {
        Self::Local(source)
    }
}

impl From<RemoteSource> for AnySource {
    fn from(source: RemoteSource) -> Self {
        Self::Remote(source)
    }
}

impl ConfigSource for AnySource {
    fn describe(&self) -> String {
        match self {
            Self::Local(s) => s.describe(),
            Self::Remote(s) => s.describe(),
        }
    }

    async fn fetch(&self) -> Result<Value, SourceError> {
        match self {
            Self::Local(s) => s.fetch().await,
            Self::Remote(s) => s.fetch().await,
        }
    }
}
