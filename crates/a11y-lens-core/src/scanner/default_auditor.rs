use std::{path::Path, sync::Arc};

use anyhow::Result;
use tracing::{debug, instrument, warn};

use super::{Auditor, FileReport, SourceRepository, WcagLevel, WcagVersion};
use crate::llm::LlmClient;
use crate::prompt::build_audit_prompt;
use crate::response::parse_findings;

/// Sequential audit pipeline: load a file, number its lines, send the
/// audit prompt to the model, and parse findings out of the response.
///
/// One file at a time, one blocking call each; no state is shared
/// across files.
pub struct DefaultAuditor<R: SourceRepository> {
    repo: Arc<R>,
    client: Arc<dyn LlmClient>,
    level: WcagLevel,
    version: WcagVersion,
}

impl<R: SourceRepository + 'static> DefaultAuditor<R> {
    pub fn new(
        repo: Arc<R>,
        client: Arc<dyn LlmClient>,
        level: WcagLevel,
        version: WcagVersion,
    ) -> Self {
        Self {
            repo,
            client,
            level,
            version,
        }
    }

    /// Discover and audit every matching file under the repository.
    /// Unreadable files are logged and skipped; the scan continues.
    pub async fn audit_all(&self) -> Result<Vec<FileReport>> {
        let files = self.repo.discover().await?;
        let mut reports = Vec::with_capacity(files.len());
        for path in files {
            match self.audit_file(&path).await {
                Ok(report) => reports.push(report),
                Err(err) => warn!(path = %path.display(), error = %err, "skipping file"),
            }
        }
        Ok(reports)
    }
}

#[async_trait::async_trait]
impl<R> Auditor for DefaultAuditor<R>
where
    R: SourceRepository + 'static,
{
    #[instrument(name = "audit_file", skip(self), fields(path = %path.display()))]
    async fn audit_file(&self, path: &Path) -> Result<FileReport> {
        let content = self.repo.load(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let prompt = build_audit_prompt(&file_name, &content, self.level, self.version);

        let findings = match self.client.complete(&prompt).await {
            Ok(raw) => parse_findings(&raw),
            // Model failures are recoverable: log and report the file
            // as clean rather than aborting the scan.
            Err(err) => {
                warn!(error = %err, "model call failed; treating file as clean");
                Vec::new()
            }
        };
        debug!(findings = findings.len(), "file audited");

        Ok(FileReport {
            path: path.to_path_buf(),
            findings,
        })
    }
}
