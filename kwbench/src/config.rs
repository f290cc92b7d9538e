use config::{Config as ConfigBuilder, ConfigError, File};
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use crate::search::matcher::CaseMode;
use crate::strategy::StrategyKind;

/// Default cap on the number of workers any strategy may start
pub const DEFAULT_WORKER_CAP: usize = 8;

/// Configuration for a benchmark run.
///
/// # Configuration Locations
///
/// Loaded from these locations, later entries overriding earlier ones:
/// 1. Global `$HOME/.config/kwbench/config.yaml`
/// 2. Local `.kwbench.yaml` in the current directory
/// 3. Custom config file specified via `--config`
///
/// # Configuration Format
///
/// ```yaml
/// # Directory holding the files to search
/// root_path: "src"
///
/// # Only files with these extensions are searched
/// file_extensions: ["txt"]
///
/// # Upper bound on workers per strategy
/// worker_cap: 8
///
/// # sensitive | insensitive
/// case_mode: sensitive
///
/// # Strategies to run, in order
/// strategies: [threads, processes, sequential]
///
/// # Log level (trace, debug, info, warn, error)
/// log_level: "warn"
/// ```
///
/// Command-line arguments take precedence over file values, see
/// [`BenchConfig::merge_with_cli`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchConfig {
    /// Directory whose direct children are searched
    #[serde(default = "default_root_path")]
    pub root_path: PathBuf,

    /// Extensions (without the dot) a file must carry to be searched
    #[serde(default = "default_file_extensions")]
    pub file_extensions: Vec<String>,

    /// Maximum number of partitions, and therefore workers, per strategy
    #[serde(default = "default_worker_cap")]
    pub worker_cap: NonZeroUsize,

    /// Whether keyword matching respects case
    #[serde(default)]
    pub case_mode: CaseMode,

    /// Strategies to benchmark, in the order they run
    #[serde(default = "default_strategies")]
    pub strategies: Vec<StrategyKind>,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_root_path() -> PathBuf {
    PathBuf::from("src")
}

fn default_file_extensions() -> Vec<String> {
    vec!["txt".to_string()]
}

pub(crate) fn default_worker_cap() -> NonZeroUsize {
    NonZeroUsize::new(DEFAULT_WORKER_CAP).unwrap()
}

fn default_strategies() -> Vec<StrategyKind> {
    vec![
        StrategyKind::Threads,
        StrategyKind::Processes,
        StrategyKind::Sequential,
    ]
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            root_path: default_root_path(),
            file_extensions: default_file_extensions(),
            worker_cap: default_worker_cap(),
            case_mode: CaseMode::default(),
            strategies: default_strategies(),
            log_level: default_log_level(),
        }
    }
}

/// Values supplied on the command line; `None` leaves the file value alone
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub root_path: Option<PathBuf>,
    pub file_extensions: Option<Vec<String>>,
    pub worker_cap: Option<NonZeroUsize>,
    pub case_mode: Option<CaseMode>,
    pub strategies: Option<Vec<StrategyKind>>,
    pub log_level: Option<String>,
}

impl BenchConfig {
    /// Loads configuration from the default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Loads configuration, layering an explicit file over the default locations
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        let config_files = [
            dirs::config_dir().map(|p| p.join("kwbench/config.yaml")),
            Some(PathBuf::from(".kwbench.yaml")),
        ];

        for path in config_files.iter().flatten() {
            if path.exists() {
                builder = builder.add_source(File::from(path.as_path()));
            }
        }

        // An explicit file must exist
        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path));
        }

        let config: Self = builder.build()?.try_deserialize()?;
        if config.strategies.is_empty() {
            return Err(ConfigError::Message(
                "strategies must name at least one strategy".to_string(),
            ));
        }
        Ok(config)
    }

    /// Merges CLI arguments over configuration file values
    pub fn merge_with_cli(mut self, cli: CliOverrides) -> Self {
        if let Some(root_path) = cli.root_path {
            self.root_path = root_path;
        }
        if let Some(extensions) = cli.file_extensions {
            self.file_extensions = extensions;
        }
        if let Some(cap) = cli.worker_cap {
            self.worker_cap = cap;
        }
        if let Some(case_mode) = cli.case_mode {
            self.case_mode = case_mode;
        }
        if let Some(strategies) = cli.strategies {
            if !strategies.is_empty() {
                self.strategies = strategies;
            }
        }
        if let Some(level) = cli.log_level {
            self.log_level = level;
        }
        self
    }
}
