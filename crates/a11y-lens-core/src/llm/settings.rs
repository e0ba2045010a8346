use anyhow::{Context, Result};
use std::collections::HashMap;

/// Environment-driven configuration required for LLM adapters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlmSettings {
    pub provider: String,
    pub api_key: String,
    pub endpoint: Option<String>,
    pub model: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl LlmSettings {
    pub const PROVIDER_ENV: &'static str = "A11Y_LENS_PROVIDER";
    pub const API_KEY_ENV: &'static str = "A11Y_LENS_API_KEY";
    pub const ENDPOINT_ENV: &'static str = "A11Y_LENS_ENDPOINT";
    pub const MODEL_ENV: &'static str = "A11Y_LENS_MODEL";
    pub const TIMEOUT_ENV: &'static str = "A11Y_LENS_TIMEOUT_SECS";

    /// Load settings from environment variables.
    ///
    /// * `A11Y_LENS_PROVIDER` — Provider identifier (default: `openai`).
    /// * `A11Y_LENS_API_KEY`  — API key/token (required unless `noop`).
    /// * `A11Y_LENS_ENDPOINT` — Optional custom endpoint/base URL.
    /// * `A11Y_LENS_MODEL`    — Optional model override.
    pub fn from_env() -> Result<Self> {
        Self::from_map(std::env::vars().collect())
    }

    fn from_map(vars: HashMap<String, String>) -> Result<Self> {
        let provider = vars
            .get(Self::PROVIDER_ENV)
            .cloned()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| "openai".to_string())
            .trim()
            .to_string();
        let provider_lower = provider.to_lowercase();
        let api_key = match provider_lower.as_str() {
            "noop" => vars.get(Self::API_KEY_ENV).cloned().unwrap_or_default(),
            _ => vars
                .get(Self::API_KEY_ENV)
                .cloned()
                .filter(|v| !v.trim().is_empty())
                .with_context(|| {
                    format!(
                        "environment variable {} must be set to scan with a remote model",
                        Self::API_KEY_ENV
                    )
                })?,
        };
        let endpoint = vars
            .get(Self::ENDPOINT_ENV)
            .cloned()
            .filter(|v| !v.trim().is_empty());
        let model = vars
            .get(Self::MODEL_ENV)
            .cloned()
            .filter(|v| !v.trim().is_empty());
        let timeout_secs = vars
            .get(Self::TIMEOUT_ENV)
            .and_then(|v| v.trim().parse::<u64>().ok());

        Ok(Self {
            provider,
            api_key,
            endpoint,
            model,
            timeout_secs,
        })
    }
}
