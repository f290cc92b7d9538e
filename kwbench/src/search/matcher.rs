use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::str::FromStr;
use tracing::{trace, warn};

use crate::errors::{BenchError, UnreadableReason};
use crate::keywords::KeywordSet;

/// Case policy applied to every keyword of a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseMode {
    /// Raw substring containment
    #[default]
    Sensitive,
    /// Content and keywords are both lowercased before the containment test
    Insensitive,
}

impl FromStr for CaseMode {
    type Err = BenchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sensitive" => Ok(CaseMode::Sensitive),
            "insensitive" => Ok(CaseMode::Insensitive),
            other => Err(BenchError::config_error(format!(
                "unknown case mode '{}', expected sensitive or insensitive",
                other
            ))),
        }
    }
}

/// Outcome of scanning a single file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileScan {
    /// One flag per keyword, in keyword order
    Matched(Vec<bool>),
    /// The file could not be read and contributes nothing
    Skipped(UnreadableReason),
}

/// Tests file contents for every keyword of a `KeywordSet`
#[derive(Debug, Clone)]
pub struct KeywordMatcher {
    keywords: KeywordSet,
    needles: Vec<String>,
    case_mode: CaseMode,
}

impl KeywordMatcher {
    /// Creates a matcher, preparing one needle per keyword for the given case mode
    pub fn new(keywords: KeywordSet, case_mode: CaseMode) -> Self {
        let needles = keywords
            .iter()
            .map(|k| match case_mode {
                CaseMode::Sensitive => k.to_string(),
                CaseMode::Insensitive => k.to_lowercase(),
            })
            .collect();

        Self {
            keywords,
            needles,
            case_mode,
        }
    }

    pub fn keywords(&self) -> &KeywordSet {
        &self.keywords
    }

    pub fn case_mode(&self) -> CaseMode {
        self.case_mode
    }

    /// Returns, for each keyword, whether it occurs anywhere in `content`
    pub fn match_content(&self, content: &str) -> Vec<bool> {
        match self.case_mode {
            CaseMode::Sensitive => self
                .needles
                .iter()
                .map(|n| content.contains(n.as_str()))
                .collect(),
            CaseMode::Insensitive => {
                let folded = content.to_lowercase();
                self.needles
                    .iter()
                    .map(|n| folded.contains(n.as_str()))
                    .collect()
            }
        }
    }

    /// Reads `path` and tests it against every keyword.
    ///
    /// Read and decode failures never escape: they are logged and reported as
    /// `FileScan::Skipped`, so one bad file cannot abort a partition.
    pub fn scan_file(&self, path: &Path) -> FileScan {
        trace!("Scanning file: {}", path.display());
        match read_text(path) {
            Ok(content) => FileScan::Matched(self.match_content(&content)),
            Err(reason) => {
                warn!("Error processing file {}: {}", path.display(), reason);
                FileScan::Skipped(reason)
            }
        }
    }
}

fn read_text(path: &Path) -> Result<String, UnreadableReason> {
    if path.is_dir() {
        return Err(UnreadableReason::IsDirectory);
    }
    let bytes = fs::read(path).map_err(|e| UnreadableReason::classify(path, &e))?;
    String::from_utf8(bytes).map_err(|_| UnreadableReason::InvalidEncoding)
}
