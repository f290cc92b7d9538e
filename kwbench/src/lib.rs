pub mod config;
pub mod driver;
pub mod errors;
pub mod filters;
pub mod keywords;
pub mod partition;
pub mod results;
pub mod search;
pub mod strategy;
pub mod wire;

pub use config::{BenchConfig, CliOverrides};
pub use driver::{BenchmarkDriver, DriverOptions, StrategyRun};
pub use errors::{BenchError, SearchResult, UnreadableReason};
pub use filters::FileSet;
pub use keywords::KeywordSet;
pub use partition::{partition, Partition};
pub use results::{aggregate, MergedResult, PartialResult};
pub use search::{CaseMode, KeywordMatcher};
pub use strategy::{
    build_strategy, ExecutionStrategy, MultiProcess, Sequential, StrategyKind, Threaded,
    WorkerCommand,
};
