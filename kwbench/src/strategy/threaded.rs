use rayon::ThreadPoolBuilder;
use std::sync::mpsc;
use tracing::{debug, warn};

use super::{ExecutionStrategy, ResultCollector, StrategyKind};
use crate::errors::{BenchError, SearchResult};
use crate::partition::Partition;
use crate::results::PartialResult;
use crate::search::{search_partition, KeywordMatcher};

/// Runs one worker per partition on a dedicated rayon pool.
///
/// The pool is sized to the partition count so every worker gets its own
/// thread. Workers never touch shared state: each sends its result into an
/// mpsc channel, and the channel is drained only after `scope` returns, which
/// is the point where every worker has finished.
#[derive(Debug, Clone, Copy, Default)]
pub struct Threaded;

impl ExecutionStrategy for Threaded {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Threads
    }

    fn execute(
        &self,
        partitions: Vec<Partition>,
        matcher: &KeywordMatcher,
    ) -> SearchResult<Vec<PartialResult>> {
        let expected = partitions.len();
        let mut collector = ResultCollector::new(self.kind().name(), expected);
        if expected == 0 {
            return collector.finish();
        }

        let pool = ThreadPoolBuilder::new()
            .num_threads(expected)
            .thread_name(|i| format!("kwbench-worker-{}", i))
            .build()
            .map_err(|e| BenchError::ThreadPool(e.to_string()))?;
        debug!("Spawning {} worker threads", expected);

        let (tx, rx) = mpsc::channel::<PartialResult>();
        pool.scope(|scope| {
            for partition in partitions {
                let tx = tx.clone();
                scope.spawn(move |_| {
                    let index = partition.index;
                    if tx.send(search_partition(matcher, partition)).is_err() {
                        warn!("Result channel closed before partition {} reported", index);
                    }
                });
            }
        });
        drop(tx);

        for partial in rx {
            collector.accept(partial)?;
        }
        collector.finish()
    }
}
