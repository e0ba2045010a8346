use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::Result as AnyResult;
use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

pub mod default_auditor;
pub mod file_repository;

/// WCAG conformance level requested for an audit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WcagLevel {
    A,
    AA,
    AAA,
}

impl FromStr for WcagLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(Self::A),
            "AA" => Ok(Self::AA),
            "AAA" => Ok(Self::AAA),
            other => Err(format!("invalid WCAG level `{other}` (expected A, AA, or AAA)")),
        }
    }
}

impl fmt::Display for WcagLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::A => "A",
            Self::AA => "AA",
            Self::AAA => "AAA",
        };
        f.write_str(s)
    }
}

/// WCAG specification version referenced in the audit prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WcagVersion {
    V2_0,
    V2_1,
    V2_2,
}

impl FromStr for WcagVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "2.0" => Ok(Self::V2_0),
            "2.1" => Ok(Self::V2_1),
            "2.2" => Ok(Self::V2_2),
            other => Err(format!(
                "invalid WCAG version `{other}` (expected 2.0, 2.1, or 2.2)"
            )),
        }
    }
}

impl fmt::Display for WcagVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::V2_0 => "2.0",
            Self::V2_1 => "2.1",
            Self::V2_2 => "2.2",
        };
        f.write_str(s)
    }
}

/// Impact buckets reported by the model per finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Severity {
    High,
    Medium,
    /// Unknown or missing severities land here rather than inflating
    /// unverified model output.
    #[default]
    Low,
}

impl<'de> Deserialize<'de> for Severity {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(match raw.trim().to_ascii_lowercase().as_str() {
            "high" => Self::High,
            "medium" => Self::Medium,
            _ => Self::Low,
        })
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        };
        f.write_str(s)
    }
}

/// A single accessibility issue reported by the model for one file.
///
/// Every field is optional on the wire; missing text fields decode to
/// empty strings and missing line lists to an empty vector, so a
/// schema-sloppy model response still yields usable findings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub issue_type: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub line_numbers: Vec<u32>,
    #[serde(default)]
    pub code_snippet: String,
    #[serde(default)]
    pub suggestion: String,
    #[serde(default)]
    pub severity: Severity,
}

/// The findings produced for one scanned file. Never merged across
/// files and never mutated after creation.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    pub findings: Vec<Finding>,
}

impl FileReport {
    pub fn clean(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            findings: Vec::new(),
        }
    }
}

/// Extension and exclusion rules applied during file discovery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanFilter {
    /// File extensions to scan, each with a leading dot.
    pub extensions: Vec<String>,
    /// Directory names skipped wherever they appear in the tree.
    pub excluded_dirs: Vec<String>,
    /// Additional glob patterns excluded from the walk.
    #[serde(default)]
    pub exclude_patterns: Vec<String>,
}

impl Default for ScanFilter {
    fn default() -> Self {
        Self {
            extensions: [".html", ".twig", ".css", ".scss", ".pcss", ".jsx", ".tsx"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            excluded_dirs: ["node_modules", ".git", "__pycache__", "dist", "build"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            exclude_patterns: Vec::new(),
        }
    }
}

impl ScanFilter {
    /// Validate invariants before the filter is used for a walk.
    pub fn validate(&self) -> Result<(), FilterError> {
        if self.extensions.is_empty() {
            return Err(FilterError::EmptyExtensions);
        }
        for ext in &self.extensions {
            if !ext.starts_with('.') || ext.len() < 2 {
                return Err(FilterError::InvalidExtension {
                    extension: ext.clone(),
                });
            }
        }
        for pattern in &self.exclude_patterns {
            if globset::Glob::new(pattern).is_err() {
                return Err(FilterError::InvalidPattern {
                    pattern: pattern.clone(),
                });
            }
        }
        Ok(())
    }

    pub fn matches_extension(&self, path: &Path) -> bool {
        let name = match path.file_name().and_then(|n| n.to_str()) {
            Some(name) => name,
            None => return false,
        };
        self.extensions.iter().any(|ext| name.ends_with(ext.as_str()))
    }
}

/// Errors emitted while validating discovery filters.
#[derive(Debug, Error, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FilterError {
    #[error("at least one file extension must be configured")]
    EmptyExtensions,
    #[error("extension `{extension}` must start with a dot and name a suffix")]
    InvalidExtension { extension: String },
    #[error("exclude pattern `{pattern}` is not a valid glob")]
    InvalidPattern { pattern: String },
}

/// Abstraction over file discovery and loading so tests can substitute
/// fixture trees for a real directory walk.
#[async_trait]
pub trait SourceRepository: Send + Sync {
    /// Enumerate the files that should be audited, in walk order.
    async fn discover(&self) -> AnyResult<Vec<PathBuf>>;

    /// Read a discovered file as UTF-8 text.
    async fn load(&self, path: &Path) -> AnyResult<String>;
}

/// Primary audit interface transforming one source file into a report.
#[async_trait]
pub trait Auditor: Send + Sync {
    /// Audit a single file. Errors indicate the file could not be read;
    /// model-side failures degrade to an empty finding list instead.
    async fn audit_file(&self, path: &Path) -> AnyResult<FileReport>;
}
