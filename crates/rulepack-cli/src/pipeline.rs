//! # Pack Pipeline
//!
//! Drives one configuration document through
//! `Fetching → Validating → Serializing → Compressing → Writing → Done`.
//!
//! Any failure aborts the run at the stage where it happened; the returned
//! [`PipelineError`] names that stage. Nothing is retried. The output file is
//! only touched in `Writing`, and that write is atomic, so a failed run never
//! leaves a partial artifact behind.

use std::fmt;
use std::path::{Path, PathBuf};

use rulepack_core::{CanonicalBytes, ContentDigest, RulepackError};
use rulepack_pack::{write_artifact, Artifact};
use rulepack_schema::{SchemaDocument, Validator};
use rulepack_source::ConfigSource;

/// Pipeline stage, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Fetching,
    Validating,
    Serializing,
    Compressing,
    Writing,
    Done,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Fetching => "fetching",
            Self::Validating => "validating",
            Self::Serializing => "serializing",
            Self::Compressing => "compressing",
            Self::Writing => "writing",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

/// A failed pipeline run.
#[derive(Debug)]
pub struct PipelineError {
    pub stage: PipelineStage,
    pub source: RulepackError,
}

impl PipelineError {
    fn at(stage: PipelineStage, err: impl Into<RulepackError>) -> Self {
        let source = err.into();
        tracing::debug!(%stage, error = %source, "pipeline failed");
        Self { stage, source }
    }
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failed: {}", self.stage, self.source)
    }
}

// The cause is already part of the message, so no `source()` chain.
impl std::error::Error for PipelineError {}

/// Summary of a successful run.
#[derive(Debug, Clone)]
pub struct PackReport {
    /// Number of domain rules in the validated configuration.
    pub rules: usize,
    /// Size of the canonical JSON payload.
    pub payload_bytes: usize,
    /// Size of the compressed artifact.
    pub artifact_bytes: usize,
    /// SHA-256 of the compressed artifact.
    pub digest: ContentDigest,
    /// Where the artifact was written. `None` for a dry run.
    pub output: Option<PathBuf>,
    /// Domains that appear in more than one rule.
    pub duplicate_domains: Vec<String>,
}

/// Run the pipeline once.
///
/// With `output == None` the artifact is built but not written.
///
/// # Errors
///
/// Returns a [`PipelineError`] tagged with the stage that failed.
pub async fn run_pipeline<S: ConfigSource>(
    source: &S,
    schema: &SchemaDocument,
    output: Option<&Path>,
) -> Result<PackReport, PipelineError> {
    use PipelineStage::*;

    tracing::info!(stage = %Fetching, source = %source.describe());
    let document = source.fetch().await.map_err(|e| PipelineError::at(Fetching, e))?;

    tracing::info!(stage = %Validating, schema = %schema.origin());
    let validator = Validator::new(schema.clone()).map_err(|e| PipelineError::at(Validating, e))?;
    let config = validator
        .validate_typed(document)
        .map_err(|e| PipelineError::at(Validating, e))?;

    let duplicate_domains: Vec<String> = config
        .duplicate_domains()
        .into_iter()
        .map(str::to_owned)
        .collect();
    for domain in &duplicate_domains {
        tracing::warn!(%domain, "domain appears in more than one rule; the last one wins");
    }

    tracing::info!(stage = %Serializing, rules = config.len());
    let payload = CanonicalBytes::new(&config).map_err(|e| PipelineError::at(Serializing, e))?;

    tracing::info!(stage = %Compressing, payload_bytes = payload.len());
    let artifact = Artifact::pack(&payload).map_err(|e| PipelineError::at(Compressing, e))?;

    match output {
        Some(path) => {
            tracing::info!(stage = %Writing, path = %path.display(), artifact_bytes = artifact.len());
            write_artifact(path, &artifact).map_err(|e| PipelineError::at(Writing, e))?;
        }
        None => tracing::info!(stage = %Writing, "dry run, skipping write"),
    }

    tracing::info!(stage = %Done, digest = %artifact.digest());
    Ok(PackReport {
        rules: config.len(),
        payload_bytes: payload.len(),
        artifact_bytes: artifact.len(),
        digest: *artifact.digest(),
        output: output.map(Path::to_path_buf),
        duplicate_domains,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rulepack_pack::read_artifact;
    use rulepack_source::LocalFileSource;

    fn write_input(dir: &Path, body: &str) -> LocalFileSource {
        let path = dir.join("SpeedReaderConfig.json");
        std::fs::write(&path, body).unwrap();
        LocalFileSource::new(path)
    }

    #[tokio::test]
    async fn valid_document_round_trips_through_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let input = r#"[{"domain":"example.com","url_rules":["example.com/*"]}]"#;
        let source = write_input(dir.path(), input);
        let output = dir.path().join("out/speedreader-updater.dat");
        let schema = SchemaDocument::embedded().unwrap();

        let report = run_pipeline(&source, &schema, Some(&output)).await.unwrap();
        assert_eq!(report.rules, 1);
        assert_eq!(report.output.as_deref(), Some(output.as_path()));
        assert!(report.duplicate_domains.is_empty());

        let artifact = read_artifact(&output).unwrap();
        assert_eq!(artifact.digest(), &report.digest);
        assert_eq!(artifact.payload().unwrap(), input.as_bytes());
    }

    #[tokio::test]
    async fn missing_domain_fails_validation_without_output() {
        let dir = tempfile::tempdir().unwrap();
        let source = write_input(dir.path(), r#"[{"url_rules":["a"]}]"#);
        let output = dir.path().join("speedreader-updater.dat");
        let schema = SchemaDocument::embedded().unwrap();

        let err = run_pipeline(&source, &schema, Some(&output)).await.unwrap_err();
        assert_eq!(err.stage, PipelineStage::Validating);
        assert!(matches!(err.source, RulepackError::Validation(_)), "got: {err}");
        assert!(err.to_string().contains("domain"), "got: {err}");
        assert!(!output.exists());
    }

    #[tokio::test]
    async fn single_string_url_rule_is_coerced() {
        let dir = tempfile::tempdir().unwrap();
        let source = write_input(
            dir.path(),
            r#"[{"domain":"x.com","url_rules":"single-string"}]"#,
        );
        let output = dir.path().join("speedreader-updater.dat");
        let schema = SchemaDocument::embedded().unwrap();

        run_pipeline(&source, &schema, Some(&output)).await.unwrap();
        let config = read_artifact(&output).unwrap().unpack().unwrap();
        let rule = config.find_domain("x.com").unwrap();
        assert_eq!(rule.url_rules, vec!["single-string".to_string()]);
    }

    #[tokio::test]
    async fn missing_input_fails_while_fetching() {
        let dir = tempfile::tempdir().unwrap();
        let source = LocalFileSource::new(dir.path().join("absent.json"));
        let schema = SchemaDocument::embedded().unwrap();

        let err = run_pipeline(&source, &schema, None).await.unwrap_err();
        assert_eq!(err.stage, PipelineStage::Fetching);
        assert!(matches!(err.source, RulepackError::NotFound(_)));
    }

    #[tokio::test]
    async fn dry_run_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let source = write_input(dir.path(), r#"[{"domain":"a.com","url_rules":["a.com/*"]}]"#);
        let schema = SchemaDocument::embedded().unwrap();

        let report = run_pipeline(&source, &schema, None).await.unwrap();
        assert!(report.output.is_none());
        assert!(report.artifact_bytes > 0);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn duplicate_domains_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        let source = write_input(
            dir.path(),
            r#"[{"domain":"a.com","url_rules":["a.com/1"]},{"domain":"a.com","url_rules":["a.com/2"]}]"#,
        );
        let schema = SchemaDocument::embedded().unwrap();

        let report = run_pipeline(&source, &schema, None).await.unwrap();
        assert_eq!(report.duplicate_domains, vec!["a.com".to_string()]);
    }

    #[tokio::test]
    async fn unwritable_output_fails_while_writing() {
        let dir = tempfile::tempdir().unwrap();
        let source = write_input(dir.path(), r#"[{"domain":"a.com","url_rules":["a.com/*"]}]"#);
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"file, not a directory").unwrap();
        let schema = SchemaDocument::embedded().unwrap();

        let err = run_pipeline(&source, &schema, Some(&blocker.join("out.dat")))
            .await
            .unwrap_err();
        assert_eq!(err.stage, PipelineStage::Writing);
        assert!(matches!(err.source, RulepackError::Io(_)));
    }

    #[test]
    fn stage_names_are_lowercase() {
        assert_eq!(PipelineStage::Fetching.to_string(), "fetching");
        assert_eq!(PipelineStage::Done.to_string(), "done");
    }
}
