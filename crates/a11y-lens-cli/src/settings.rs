use std::path::Path;

use anyhow::{Context, Result};
use config::{Config, File, FileFormat};
use serde::Deserialize;

use a11y_lens_core::ScanFilter;

/// Default config file looked up in the working directory when
/// `--config` is not given.
const DEFAULT_CONFIG_FILE: &str = "a11y-lens.json";

/// Optional JSON configuration. Every key falls back to the built-in
/// defaults when absent, and a missing default file is not an error.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct FileConfig {
    pub extensions: Option<Vec<String>>,
    pub excluded_dirs: Option<Vec<String>>,
    pub exclude_patterns: Option<Vec<String>>,
    pub model: Option<String>,
}

impl FileConfig {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let source = match path {
            Some(path) => File::from(path).format(FileFormat::Json).required(true),
            None => File::new(DEFAULT_CONFIG_FILE, FileFormat::Json).required(false),
        };
        let config = Config::builder()
            .add_source(source)
            .build()
            .context("failed to load config file")?;
        config
            .try_deserialize()
            .context("invalid config file structure")
    }

    /// Merge configured keys over the default scan filter.
    pub fn scan_filter(&self) -> ScanFilter {
        let mut filter = ScanFilter::default();
        if let Some(extensions) = &self.extensions {
            filter.extensions = extensions.clone();
        }
        if let Some(excluded_dirs) = &self.excluded_dirs {
            filter.excluded_dirs = excluded_dirs.clone();
        }
        if let Some(exclude_patterns) = &self.exclude_patterns {
            filter.exclude_patterns = exclude_patterns.clone();
        }
        filter
    }
}
