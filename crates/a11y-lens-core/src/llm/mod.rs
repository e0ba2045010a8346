mod openai;
mod settings;

use std::sync::Arc;

use anyhow::{bail, Result};
use async_trait::async_trait;

use crate::prompt::AuditPrompt;

pub use openai::OpenAiClient;
pub use settings::LlmSettings;

/// Client abstraction for sending an audit prompt to a completion
/// endpoint and receiving the model's raw text output.
#[async_trait]
pub trait LlmClient: Send + Sync + std::fmt::Debug {
    /// Run one audit request and return the model output verbatim.
    /// The caller extracts findings from the text.
    async fn complete(&self, prompt: &AuditPrompt) -> Result<String>;
}

/// Offline client that always reports a clean file. Used in tests and
/// for exercising the pipeline without network access.
#[derive(Debug, Default, Clone)]
pub struct NoopLlmClient;

#[async_trait]
impl LlmClient for NoopLlmClient {
    async fn complete(&self, _prompt: &AuditPrompt) -> Result<String> {
        Ok("[]".to_string())
    }
}

/// Instantiate the client matching `settings.provider`.
pub fn client_for(settings: &LlmSettings) -> Result<Arc<dyn LlmClient>> {
    match settings.provider.to_lowercase().as_str() {
        "openai" => Ok(Arc::new(OpenAiClient::new(settings)?)),
        "noop" => Ok(Arc::new(NoopLlmClient)),
        other => bail!("unsupported LLM provider `{other}` (expected openai or noop)"),
    }
}
