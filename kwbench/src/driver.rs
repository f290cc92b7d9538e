use std::num::NonZeroUsize;
use std::time::{Duration, Instant};
use tracing::{info, warn};

use crate::config::{default_worker_cap, BenchConfig};
use crate::errors::{BenchError, SearchResult};
use crate::filters::FileSet;
use crate::keywords::KeywordSet;
use crate::partition::{partition, Partition};
use crate::results::{aggregate, MergedResult};
use crate::search::{CaseMode, KeywordMatcher};
use crate::strategy::{ExecutionStrategy, StrategyKind};

/// Knobs shared by every strategy of one benchmark
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverOptions {
    pub worker_cap: NonZeroUsize,
    pub case_mode: CaseMode,
}

impl Default for DriverOptions {
    fn default() -> Self {
        Self {
            worker_cap: default_worker_cap(),
            case_mode: CaseMode::default(),
        }
    }
}

impl From<&BenchConfig> for DriverOptions {
    fn from(config: &BenchConfig) -> Self {
        Self {
            worker_cap: config.worker_cap,
            case_mode: config.case_mode,
        }
    }
}

/// Outcome of running one strategy
#[derive(Debug)]
pub struct StrategyRun {
    pub strategy: StrategyKind,
    /// Wall-clock time from dispatch through aggregation
    pub elapsed: Duration,
    pub outcome: SearchResult<MergedResult>,
}

impl StrategyRun {
    pub fn result(&self) -> Option<&MergedResult> {
        self.outcome.as_ref().ok()
    }
}

/// Runs strategies one after another over the same files and keywords
#[derive(Debug)]
pub struct BenchmarkDriver {
    matcher: KeywordMatcher,
    partitions: Vec<Partition>,
    file_count: usize,
}

impl BenchmarkDriver {
    /// Prepares a benchmark, partitioning `files` once for all strategies.
    ///
    /// Fails with `BenchError::NoFiles` for an empty file set.
    pub fn new(
        files: &FileSet,
        keywords: KeywordSet,
        options: DriverOptions,
    ) -> SearchResult<Self> {
        let partitions = partition(files, options.worker_cap)?;
        Ok(Self {
            matcher: KeywordMatcher::new(keywords, options.case_mode),
            partitions,
            file_count: files.len(),
        })
    }

    /// Like [`BenchmarkDriver::new`], taking raw keywords.
    ///
    /// Files are checked before keywords, so an empty directory reports
    /// `NoFiles` even when no keywords were given either.
    pub fn from_inputs<I, S>(
        files: &FileSet,
        words: I,
        options: DriverOptions,
    ) -> SearchResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if files.is_empty() {
            return Err(BenchError::NoFiles);
        }
        let keywords = KeywordSet::new(words)?;
        Self::new(files, keywords, options)
    }

    pub fn keywords(&self) -> &KeywordSet {
        self.matcher.keywords()
    }

    /// Number of workers each strategy will start
    pub fn worker_count(&self) -> usize {
        self.partitions.len()
    }

    pub fn file_count(&self) -> usize {
        self.file_count
    }

    /// Runs a single strategy, timing dispatch through aggregation
    pub fn run_strategy(&self, strategy: &dyn ExecutionStrategy) -> StrategyRun {
        let kind = strategy.kind();
        let partitions = self.partitions.clone();
        info!(
            "Running {} strategy over {} files with {} workers",
            kind,
            self.file_count,
            partitions.len()
        );

        let start = Instant::now();
        let outcome = strategy
            .execute(partitions, &self.matcher)
            .map(|partials| aggregate(self.matcher.keywords(), partials));
        let elapsed = start.elapsed();

        match &outcome {
            Ok(merged) => info!(
                "{} finished in {:?}: {} matches",
                kind,
                elapsed,
                merged.total_matches()
            ),
            Err(e) => warn!("{} failed after {:?}: {}", kind, elapsed, e),
        }

        StrategyRun {
            strategy: kind,
            elapsed,
            outcome,
        }
    }

    /// Runs every strategy in order, never two at once
    pub fn run(&self, strategies: &[Box<dyn ExecutionStrategy>]) -> Vec<StrategyRun> {
        strategies
            .iter()
            .map(|strategy| self.run_strategy(strategy.as_ref()))
            .collect()
    }
}
