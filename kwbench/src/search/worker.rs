use tracing::debug;

use super::matcher::{FileScan, KeywordMatcher};
use crate::partition::Partition;
use crate::results::PartialResult;

/// Searches every file of `partition` and folds the hits into one result.
///
/// Files are visited in partition order, so each keyword's list preserves that
/// order. Unreadable files are counted as skipped and add no entries.
pub fn search_partition(matcher: &KeywordMatcher, partition: Partition) -> PartialResult {
    let mut result = PartialResult::new(partition.index, matcher.keywords());

    for path in &partition.files {
        match matcher.scan_file(path) {
            FileScan::Matched(flags) => {
                result.files_scanned += 1;
                for (keyword, found) in matcher.keywords().iter().zip(flags) {
                    if found {
                        result.record(keyword, path);
                    }
                }
            }
            FileScan::Skipped(_) => result.files_skipped += 1,
        }
    }

    debug!(
        "Partition {} done: {} scanned, {} skipped",
        partition.index, result.files_scanned, result.files_skipped
    );
    result
}
