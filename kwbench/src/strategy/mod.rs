/// Execution strategies: three ways of running the same partition workers.
///
/// Every strategy receives the partitions by value and the shared matcher by
/// reference, and returns one `PartialResult` per partition once all of its
/// workers have finished. Strategies differ only in how the workers run:
///
/// 1. **Sequential**: one after another on the calling thread
/// 2. **Threads**: one task per partition on a private rayon pool, results
///    sent back over a channel and drained after the pool's scope closes
/// 3. **Processes**: one child process per partition, with requests and
///    results crossing the process boundary as JSON over stdin/stdout
///
/// The observable result never depends on the strategy, only the wall-clock
/// cost does.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::{BenchError, SearchResult};
use crate::partition::Partition;
use crate::results::PartialResult;
use crate::search::KeywordMatcher;

pub mod collector;
pub mod process;
pub mod sequential;
pub mod threaded;

pub use collector::ResultCollector;
pub use process::{MultiProcess, WorkerCommand};
pub use sequential::Sequential;
pub use threaded::Threaded;

/// Identifies an execution strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    Sequential,
    Threads,
    Processes,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 3] = [
        StrategyKind::Sequential,
        StrategyKind::Threads,
        StrategyKind::Processes,
    ];

    pub fn name(self) -> &'static str {
        match self {
            StrategyKind::Sequential => "sequential",
            StrategyKind::Threads => "threads",
            StrategyKind::Processes => "processes",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StrategyKind {
    type Err = BenchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sequential" | "sync" => Ok(StrategyKind::Sequential),
            "threads" | "threaded" => Ok(StrategyKind::Threads),
            "processes" | "process" => Ok(StrategyKind::Processes),
            other => Err(BenchError::config_error(format!(
                "unknown strategy '{}', expected sequential, threads or processes",
                other
            ))),
        }
    }
}

/// A concurrency model for running partition workers
pub trait ExecutionStrategy: Send + Sync {
    fn kind(&self) -> StrategyKind;

    /// Runs one worker per partition and returns every partial result.
    ///
    /// Implementations block until all workers have completed and fail with
    /// `BenchError::MissingResults` if fewer results than partitions arrive.
    fn execute(
        &self,
        partitions: Vec<Partition>,
        matcher: &KeywordMatcher,
    ) -> SearchResult<Vec<PartialResult>>;
}

/// Builds the strategy for `kind`. Only `Processes` needs a worker command.
pub fn build_strategy(
    kind: StrategyKind,
    worker: Option<&WorkerCommand>,
) -> SearchResult<Box<dyn ExecutionStrategy>> {
    Ok(match kind {
        StrategyKind::Sequential => Box::new(Sequential),
        StrategyKind::Threads => Box::new(Threaded),
        StrategyKind::Processes => {
            let worker = worker.ok_or_else(|| {
                BenchError::config_error("the processes strategy needs a worker command")
            })?;
            Box::new(MultiProcess::new(worker.clone()))
        }
    })
}
