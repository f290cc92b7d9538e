use tracing::debug;

use super::{ExecutionStrategy, ResultCollector, StrategyKind};
use crate::errors::SearchResult;
use crate::partition::Partition;
use crate::results::PartialResult;
use crate::search::{search_partition, KeywordMatcher};

/// Runs each partition worker in turn on the calling thread
#[derive(Debug, Clone, Copy, Default)]
pub struct Sequential;

impl ExecutionStrategy for Sequential {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Sequential
    }

    fn execute(
        &self,
        partitions: Vec<Partition>,
        matcher: &KeywordMatcher,
    ) -> SearchResult<Vec<PartialResult>> {
        debug!("Running {} partitions sequentially", partitions.len());
        let mut collector = ResultCollector::new(self.kind().name(), partitions.len());
        for partition in partitions {
            collector.accept(search_partition(matcher, partition))?;
        }
        collector.finish()
    }
}
