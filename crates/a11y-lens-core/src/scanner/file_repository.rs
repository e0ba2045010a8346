use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use walkdir::{DirEntry, WalkDir};

use super::{ScanFilter, SourceRepository};

/// Discovers front-end source files under a base directory by walking
/// the tree and applying extension and exclusion rules.
pub struct WalkdirSourceRepository {
    base_path: PathBuf,
    filter: ScanFilter,
}

impl WalkdirSourceRepository {
    /// Create a repository rooted at the given directory with default
    /// filter rules.
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self::with_filter(base_path, ScanFilter::default())
    }

    pub fn with_filter(base_path: impl Into<PathBuf>, filter: ScanFilter) -> Self {
        Self {
            base_path: base_path.into(),
            filter,
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn build_exclude_set(&self) -> Result<GlobSet> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &self.filter.exclude_patterns {
            let glob = Glob::new(pattern)
                .with_context(|| format!("invalid exclude pattern `{pattern}`"))?;
            builder.add(glob);
        }
        builder.build().context("failed to build exclude glob set")
    }

    fn keep_entry(&self, entry: &DirEntry, excludes: &GlobSet) -> bool {
        // The walk root itself is never filtered, even hidden ones
        // like `.` or a dot-named project directory.
        if entry.depth() == 0 {
            return true;
        }
        let name = entry.file_name().to_string_lossy();
        if entry.file_type().is_dir() {
            if name.starts_with('.') {
                return false;
            }
            if self.filter.excluded_dirs.iter().any(|dir| dir == &*name) {
                return false;
            }
        }
        !excludes.is_match(entry.path())
    }
}

#[async_trait::async_trait]
impl SourceRepository for WalkdirSourceRepository {
    async fn discover(&self) -> Result<Vec<PathBuf>> {
        self.filter.validate()?;
        let excludes = self.build_exclude_set()?;

        let mut files = Vec::new();
        let walker = WalkDir::new(&self.base_path)
            .follow_links(false)
            .into_iter()
            .filter_entry(|entry| self.keep_entry(entry, &excludes));
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::warn!(error = %err, "skipping unreadable directory entry");
                    continue;
                }
            };
            if entry.file_type().is_file() && self.filter.matches_extension(entry.path()) {
                files.push(entry.into_path());
            }
        }
        Ok(files)
    }

    async fn load(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
    }
}
