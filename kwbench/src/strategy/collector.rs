use tracing::{trace, warn};

use crate::errors::{BenchError, SearchResult};
use crate::results::PartialResult;

/// Completion barrier bookkeeping: counts partial results against the number
/// of workers that were started.
///
/// A strategy that lost a worker's output must fail rather than hand an
/// under-counted set to the aggregator, so `finish` checks that exactly one
/// result arrived per partition.
#[derive(Debug)]
pub struct ResultCollector {
    strategy: &'static str,
    expected: usize,
    received: Vec<PartialResult>,
}

impl ResultCollector {
    pub fn new(strategy: &'static str, expected: usize) -> Self {
        Self {
            strategy,
            expected,
            received: Vec::with_capacity(expected),
        }
    }

    /// Accepts one worker's output. A second result for the same partition is
    /// rejected so that a misbehaving worker cannot mask a missing one.
    pub fn accept(&mut self, partial: PartialResult) -> SearchResult<()> {
        if self.received.iter().any(|p| p.partition == partial.partition) {
            warn!(
                "{}: duplicate result for partition {}",
                self.strategy, partial.partition
            );
            return Err(BenchError::worker(
                partial.partition,
                "delivered more than one result",
            ));
        }
        trace!("{}: received partition {}", self.strategy, partial.partition);
        self.received.push(partial);
        Ok(())
    }

    pub fn received(&self) -> usize {
        self.received.len()
    }

    /// Releases the collected results once all `expected` have arrived
    pub fn finish(self) -> SearchResult<Vec<PartialResult>> {
        if self.received.len() != self.expected {
            return Err(BenchError::missing_results(
                self.strategy,
                self.expected,
                self.received.len(),
            ));
        }
        Ok(self.received)
    }
}
