/// The search routine shared by every execution strategy.
///
/// `matcher` answers "which keywords occur in this file"; `worker` folds those
/// answers over one partition. Both are pure apart from reading files, so any
/// number of workers can run at once on disjoint partitions.
pub mod matcher;
pub mod worker;

pub use matcher::{CaseMode, FileScan, KeywordMatcher};
pub use worker::search_partition;
