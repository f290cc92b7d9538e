/// File discovery for a benchmark run.
///
/// Directory scanning is shallow: only the direct children of the
/// root are considered, and only regular files whose extension is on the
/// allow list. The walk is sorted so that the same directory always yields
/// the same `FileSet`, which keeps partitioning reproducible.
use ignore::WalkBuilder;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

use crate::errors::{BenchError, SearchResult};

/// Checks if a file carries one of the allowed extensions (case-insensitive)
pub fn has_valid_extension(path: &Path, extensions: &[String]) -> bool {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)),
        None => false,
    }
}

/// Ordered list of files to search
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSet {
    files: Vec<PathBuf>,
}

impl FileSet {
    pub fn new(files: Vec<PathBuf>) -> Self {
        Self { files }
    }

    /// Lists the files directly under `root` whose extension is in `extensions`
    pub fn discover(root: &Path, extensions: &[String]) -> SearchResult<Self> {
        debug!("Scanning directory: {}", root.display());

        let mut walker = WalkBuilder::new(root);
        walker
            .max_depth(Some(1))
            .standard_filters(false)
            .sort_by_file_name(|a, b| a.cmp(b));

        let mut files = Vec::new();
        for entry in walker.build() {
            let entry = entry.map_err(|e| match e.into_io_error() {
                Some(io_err) => io_err.into(),
                None => BenchError::config_error(format!("cannot scan {}", root.display())),
            })?;
            // Resolves symlinks; dangling links are dropped
            if !entry.path().is_file() {
                continue;
            }
            if has_valid_extension(entry.path(), extensions) {
                trace!("Adding file: {}", entry.path().display());
                files.push(entry.into_path());
            }
        }

        debug!("Found {} files to process", files.len());
        Ok(Self { files })
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PathBuf> {
        self.files.iter()
    }

    pub fn as_slice(&self) -> &[PathBuf] {
        &self.files
    }
}

impl From<Vec<PathBuf>> for FileSet {
    fn from(files: Vec<PathBuf>) -> Self {
        Self::new(files)
    }
}
