//! # Remote HTTP Source
//!
//! Fetches the configuration document with a single HTTP GET against a
//! base URL joined with a relative path.
//!
//! ## Timeout & Retry
//!
//! No timeout is applied unless one is configured, and nothing is retried.
//! A hung server blocks the pipeline until the process is interrupted.

use std::time::Duration;

use serde_json::Value;
use url::Url;

use crate::error::SourceError;
use crate::ConfigSource;

/// Default location of the published configuration.
pub const DEFAULT_BASE_URL: &str =
    "https://raw.githubusercontent.com/brave-experiments/SpeedReader/master/";

/// Configuration for the remote source.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// Base URL, e.g. `https://raw.githubusercontent.com/org/repo/master/`.
    pub base_url: String,
    /// Path relative to the base URL.
    pub path: String,
    /// Optional per-request timeout.
    pub timeout: Option<Duration>,
}

impl RemoteConfig {
    /// Create a configuration with no timeout.
    pub fn new(base_url: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            path: path.into(),
            timeout: None,
        }
    }

    /// Resolve the full document URL.
    ///
    /// The base is treated as a directory even without a trailing slash,
    /// and a leading slash on the path is ignored, so the result is always
    /// `base/path`.
    ///
    /// # Errors
    ///
    /// Returns `SourceError::InvalidUrl` if the base or the joined URL does
    /// not parse.
    pub fn resolve(&self) -> Result<Url, SourceError> {
        let mut base = self.base_url.clone();
        if !base.ends_with('/') {
            base.push('/');
        }
        let invalid = |reason: url::ParseError| SourceError::InvalidUrl {
            url: format!("{base}{}", self.path),
            reason: reason.to_string(),
        };
        let base_url = Url::parse(&base).map_err(invalid)?;
        base_url
            .join(self.path.trim_start_matches('/'))
            .map_err(invalid)
    }
}

/// Fetches a configuration document over HTTP.
#[derive(Debug, Clone)]
pub struct RemoteSource {
    client: reqwest::Client,
    url: Url,
}

impl RemoteSource {
    /// Build a remote source from configuration.
    ///
    /// # Errors
    ///
    /// Returns `SourceError::InvalidUrl` for a malformed URL and
    /// `SourceError::Network` if the HTTP client cannot be built.
    pub fn new(config: RemoteConfig) -> Result<Self, SourceError> {
        let url = config.resolve()?;
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| SourceError::Network {
            url: url.to_string(),
            reason: format!("failed to build HTTP client: {e}"),
        })?;
        Ok(Self { client, url })
    }

    /// The URL this source fetches.
    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl ConfigSource for RemoteSource {
    fn describe(&self) -> String {
        format!("url {}", self.url)
    }

    async fn fetch(&self) -> Result<Value, SourceError> {
        let network = |reason: String| SourceError::Network {
            url: self.url.to_string(),
            reason,
        };

        let resp = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .map_err(|e| network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(network(format!("HTTP {status}")));
        }

        let body = resp.bytes().await.map_err(|e| network(e.to_string()))?;
        tracing::debug!(url = %self.url, bytes = body.len(), "fetched remote configuration");

        serde_json::from_slice(&body).map_err(|source| SourceError::Parse {
            origin: self.url.to_string(),
            source,
        })
    }
}
