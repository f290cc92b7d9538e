use std::ffi::OsString;
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use tracing::{debug, trace, warn};

use super::{ExecutionStrategy, ResultCollector, StrategyKind};
use crate::errors::{BenchError, SearchResult};
use crate::partition::Partition;
use crate::results::PartialResult;
use crate::search::KeywordMatcher;
use crate::wire::{self, WorkerRequest};

/// How to launch a worker process that speaks the `wire` protocol
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerCommand {
    program: PathBuf,
    args: Vec<OsString>,
}

impl WorkerCommand {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn program(&self) -> &PathBuf {
        &self.program
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit());
        cmd
    }
}

/// Runs one isolated worker process per partition.
///
/// All children are started before any is awaited so they run concurrently.
/// Each receives its partition on stdin and answers on stdout; the strategy
/// then waits for every child, whether or not an earlier one failed, so no
/// process is left behind.
#[derive(Debug, Clone)]
pub struct MultiProcess {
    worker: WorkerCommand,
}

impl MultiProcess {
    pub fn new(worker: WorkerCommand) -> Self {
        Self { worker }
    }

    fn spawn_worker(
        &self,
        partition: Partition,
        matcher: &KeywordMatcher,
    ) -> SearchResult<Child> {
        let index = partition.index;
        let mut child = self.worker.command().spawn().map_err(|e| {
            BenchError::worker(
                index,
                format!("cannot start {}: {}", self.worker.program.display(), e),
            )
        })?;
        trace!("Started worker pid {} for partition {}", child.id(), index);

        let request = WorkerRequest::new(partition, matcher);
        let sent = match child.stdin.take() {
            // stdin is dropped, and therefore closed, at the end of this arm
            Some(stdin) => wire::write_request(stdin, &request),
            None => Err(BenchError::worker(index, "stdin was not captured")),
        };
        if let Err(e) = sent {
            let _ = child.kill();
            let _ = child.wait();
            return Err(BenchError::worker(
                index,
                format!("cannot send request: {}", e),
            ));
        }
        Ok(child)
    }

    fn await_worker(index: usize, child: Child) -> SearchResult<PartialResult> {
        let output = child
            .wait_with_output()
            .map_err(|e| BenchError::worker(index, format!("wait failed: {}", e)))?;
        if !output.status.success() {
            return Err(BenchError::worker(
                index,
                format!("exited with {}", output.status),
            ));
        }

        let response = wire::read_response(&output.stdout)
            .map_err(|e| BenchError::worker(index, format!("unreadable response: {}", e)))?;
        if response.partial.partition != index {
            return Err(BenchError::worker(
                index,
                format!("answered for partition {}", response.partial.partition),
            ));
        }
        Ok(response.partial)
    }
}

impl ExecutionStrategy for MultiProcess {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Processes
    }

    fn execute(
        &self,
        partitions: Vec<Partition>,
        matcher: &KeywordMatcher,
    ) -> SearchResult<Vec<PartialResult>> {
        let expected = partitions.len();
        debug!(
            "Spawning {} worker processes via {}",
            expected,
            self.worker.program.display()
        );

        let mut first_error: Option<BenchError> = None;
        let mut children = Vec::with_capacity(expected);
        for partition in partitions {
            let index = partition.index;
            match self.spawn_worker(partition, matcher) {
                Ok(child) => children.push((index, child)),
                Err(e) => {
                    warn!("{}", e);
                    first_error = Some(e);
                    break;
                }
            }
        }

        let mut collector = ResultCollector::new(self.kind().name(), expected);
        for (index, child) in children {
            let received = Self::await_worker(index, child).and_then(|p| collector.accept(p));
            if let Err(e) = received {
                warn!("{}", e);
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => collector.finish(),
        }
    }
}
