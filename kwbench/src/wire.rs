/// Frames exchanged between the multi-process strategy and its workers.
///
/// A worker process reads exactly one `WorkerRequest` JSON document from stdin,
/// searches its partition and writes exactly one `WorkerResponse` document to
/// stdout. Logging must go to stderr; stdout carries data only.
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use tracing::{debug, info};

use crate::errors::SearchResult;
use crate::keywords::KeywordSet;
use crate::partition::Partition;
use crate::results::PartialResult;
use crate::search::{search_partition, CaseMode, KeywordMatcher};

/// Work handed to an isolated worker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerRequest {
    pub partition: Partition,
    pub keywords: KeywordSet,
    pub case_mode: CaseMode,
}

impl WorkerRequest {
    pub fn new(partition: Partition, matcher: &KeywordMatcher) -> Self {
        Self {
            partition,
            keywords: matcher.keywords().clone(),
            case_mode: matcher.case_mode(),
        }
    }
}

/// A worker's answer: the partial result for its partition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerResponse {
    pub partial: PartialResult,
}

/// Writes a request frame and flushes the writer
pub fn write_request<W: Write>(mut writer: W, request: &WorkerRequest) -> SearchResult<()> {
    serde_json::to_writer(&mut writer, request)?;
    writer.flush()?;
    Ok(())
}

/// Reads a response frame from a worker's complete stdout
pub fn read_response(bytes: &[u8]) -> SearchResult<WorkerResponse> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Worker-side loop: reads one request from `input`, runs the partition
/// worker and writes the response to `output`.
pub fn serve<R: Read, W: Write>(input: R, mut output: W) -> SearchResult<()> {
    let request: WorkerRequest = serde_json::from_reader(input)?;
    info!(
        "Worker received partition {} ({} files)",
        request.partition.index,
        request.partition.files.len()
    );

    let matcher = KeywordMatcher::new(request.keywords, request.case_mode);
    let partial = search_partition(&matcher, request.partition);

    serde_json::to_writer(&mut output, &WorkerResponse { partial })?;
    output.flush()?;
    debug!("Worker response written");
    Ok(())
}
