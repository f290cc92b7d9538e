/// Result types for a benchmark run and the aggregation that joins them.
///
/// A `PartialResult` is owned by exactly one worker until it is handed over,
/// by move through a channel or by value through a JSON pipe. Nothing here is
/// shared between workers, so merging needs no locking: `aggregate` simply
/// takes ownership of every partial and concatenates their lists keyword by
/// keyword.
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::keywords::KeywordSet;

/// Matches found by one worker within its own partition
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialResult {
    /// Index of the partition this result covers
    pub partition: usize,
    /// Keyword to matching files, in partition order
    pub matches: HashMap<String, Vec<PathBuf>>,
    /// Files that were read successfully
    pub files_scanned: usize,
    /// Files that could not be read and were skipped
    pub files_skipped: usize,
}

impl PartialResult {
    /// Creates an empty result with one (empty) entry per keyword
    pub fn new(partition: usize, keywords: &KeywordSet) -> Self {
        Self {
            partition,
            matches: keywords.iter().map(|k| (k.to_string(), Vec::new())).collect(),
            files_scanned: 0,
            files_skipped: 0,
        }
    }

    /// Records a file as containing `keyword`
    pub fn record(&mut self, keyword: &str, path: &Path) {
        self.matches
            .entry(keyword.to_string())
            .or_default()
            .push(path.to_path_buf());
    }
}

/// Keyword to files mapping covering the whole file set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedResult {
    keywords: KeywordSet,
    matches: HashMap<String, Vec<PathBuf>>,
    /// Total files read successfully across all partitions
    pub files_scanned: usize,
    /// Total files skipped across all partitions
    pub files_skipped: usize,
}

impl MergedResult {
    /// Files containing `keyword`, or `None` if it was not part of the run
    pub fn get(&self, keyword: &str) -> Option<&[PathBuf]> {
        self.matches.get(keyword).map(Vec::as_slice)
    }

    /// Iterates keywords in the order they were supplied
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[PathBuf])> {
        self.keywords
            .iter()
            .map(move |k| (k, self.matches.get(k).map_or(&[][..], Vec::as_slice)))
    }

    pub fn keywords(&self) -> &KeywordSet {
        &self.keywords
    }

    /// Total number of (keyword, file) hits
    pub fn total_matches(&self) -> usize {
        self.matches.values().map(Vec::len).sum()
    }

    /// Keyword to the sorted list of matching files, for order-insensitive comparison
    pub fn to_sorted(&self) -> HashMap<String, Vec<PathBuf>> {
        self.matches
            .iter()
            .map(|(k, files)| {
                let mut files = files.clone();
                files.sort();
                (k.clone(), files)
            })
            .collect()
    }
}

/// Merges the partial results of every worker into one result.
///
/// For each keyword the partial lists are concatenated in ascending partition
/// index. Partitions are disjoint, so no file can appear twice. Entries for
/// words outside `keywords` are dropped.
pub fn aggregate(keywords: &KeywordSet, mut partials: Vec<PartialResult>) -> MergedResult {
    partials.sort_by_key(|p| p.partition);

    let mut matches: HashMap<String, Vec<PathBuf>> =
        keywords.iter().map(|k| (k.to_string(), Vec::new())).collect();
    let mut files_scanned = 0;
    let mut files_skipped = 0;

    for partial in partials {
        files_scanned += partial.files_scanned;
        files_skipped += partial.files_skipped;
        for (keyword, files) in partial.matches {
            match matches.get_mut(&keyword) {
                Some(merged) => merged.extend(files),
                None => warn!(
                    "Partition {} reported unknown keyword '{}'",
                    partial.partition, keyword
                ),
            }
        }
    }

    debug!(
        "Aggregated {} scanned files ({} skipped)",
        files_scanned, files_skipped
    );

    MergedResult {
        keywords: keywords.clone(),
        matches,
        files_scanned,
        files_skipped,
    }
}
