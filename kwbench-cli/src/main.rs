mod seed;

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use kwbench::{
    build_strategy, BenchConfig, BenchError, BenchmarkDriver, CaseMode, CliOverrides,
    DriverOptions, ExecutionStrategy, FileSet, StrategyKind, StrategyRun, WorkerCommand,
};
use serde_json::json;
use std::collections::BTreeMap;
use std::io::{self, BufRead, Write};
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

type Result<T> = std::result::Result<T, BenchError>;

const KEYWORD_PROMPT: &str = "Enter keywords to search for, use a comma as a separator: ";

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct RunArgs {
    /// Directory holding the files to search
    #[arg(short = 'd', long)]
    dir: Option<PathBuf>,

    /// Comma-separated keywords; prompted for on stdin when omitted
    #[arg(short = 'k', long)]
    keywords: Option<String>,

    /// File extensions to include (e.g. txt,md)
    #[arg(short = 'e', long)]
    extensions: Option<String>,

    /// Maximum number of workers per strategy
    #[arg(short = 'j', long)]
    workers: Option<NonZeroUsize>,

    /// Keyword matching policy (sensitive|insensitive)
    #[arg(long)]
    case_mode: Option<CaseMode>,

    /// Strategy to run (sequential|threads|processes), may be repeated
    #[arg(short = 's', long = "strategy")]
    strategies: Vec<StrategyKind>,

    /// Configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Print results as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Benchmark the configured strategies over a directory of files
    Run(RunArgs),

    /// Populate a directory with files of random text
    Seed {
        /// Directory to create and fill
        #[arg(short = 'd', long, default_value = "src")]
        dir: PathBuf,

        /// Number of files to write
        #[arg(short = 'n', long, default_value_t = 50)]
        files: usize,

        /// Maximum characters per file
        #[arg(short = 'l', long, default_value_t = 1000)]
        length: usize,

        /// Seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Search one partition received on stdin (used by the processes strategy)
    #[command(hide = true)]
    Worker {
        #[arg(long, default_value = "warn")]
        log_level: String,
    },
}

fn main() -> ExitCode {
    match run() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(2),
        Err(e) => {
            eprintln!("{}", e.to_string().red());
            ExitCode::FAILURE
        }
    }
}

/// Returns `Ok(false)` when the run completed but a strategy failed
fn run() -> Result<bool> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => run_benchmark(args),
        Commands::Seed {
            dir,
            files,
            length,
            seed,
        } => {
            init_logging("warn");
            seed::seed_directory(&dir, files, length, seed)?;
            println!(
                "Seeded {} files with random text in the '{}' directory",
                files,
                dir.display()
            );
            Ok(true)
        }
        Commands::Worker { log_level } => {
            init_logging(&log_level);
            kwbench::wire::serve(io::stdin().lock(), io::stdout().lock())?;
            Ok(true)
        }
    }
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn run_benchmark(args: RunArgs) -> Result<bool> {
    let overrides = CliOverrides {
        root_path: args.dir,
        file_extensions: args.extensions.as_ref().map(|e| {
            e.split(',')
                .map(|s| s.trim().trim_start_matches('.').to_string())
                .filter(|s| !s.is_empty())
                .collect()
        }),
        worker_cap: args.workers,
        case_mode: args.case_mode,
        strategies: Some(args.strategies),
        log_level: args.log_level,
    };
    let config = BenchConfig::load_from(args.config.as_deref())
        .map_err(|e| BenchError::config_error(e.to_string()))?
        .merge_with_cli(overrides);
    init_logging(&config.log_level);

    // Files are checked before asking for keywords
    let files = FileSet::discover(&config.root_path, &config.file_extensions)?;
    if files.is_empty() {
        return Err(BenchError::NoFiles);
    }

    let raw_keywords = match args.keywords {
        Some(keywords) => keywords,
        None => prompt_keywords()?,
    };
    let driver = BenchmarkDriver::from_inputs(
        &files,
        raw_keywords.split(','),
        DriverOptions::from(&config),
    )?;
    info!(
        "Benchmarking {} files with {} workers",
        driver.file_count(),
        driver.worker_count()
    );

    let worker = WorkerCommand::new(std::env::current_exe()?)
        .arg("worker")
        .arg("--log-level")
        .arg(&config.log_level);
    let strategies = config
        .strategies
        .iter()
        .map(|kind| build_strategy(*kind, Some(&worker)))
        .collect::<Result<Vec<Box<dyn ExecutionStrategy>>>>()?;

    let runs = driver.run(&strategies);
    if args.json {
        print_json(&runs)?;
    } else {
        print_runs(&runs);
    }
    Ok(runs.iter().all(|run| run.outcome.is_ok()))
}

/// Asks for keywords on stderr, leaving stdout to the report
fn prompt_keywords() -> Result<String> {
    let mut stderr = io::stderr();
    write!(stderr, "{}", KEYWORD_PROMPT)?;
    stderr.flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line)
}

fn print_runs(runs: &[StrategyRun]) {
    for run in runs {
        println!("\n{} Results:", run.strategy.to_string().blue().bold());
        match &run.outcome {
            Ok(merged) => {
                for (keyword, files) in merged.iter() {
                    let listed: Vec<String> =
                        files.iter().map(|p| p.display().to_string()).collect();
                    if listed.is_empty() {
                        println!("  {}: {}", keyword.green(), "no matches".dimmed());
                    } else {
                        println!("  {}: {}", keyword.green(), listed.join(", "));
                    }
                }
                if merged.files_skipped > 0 {
                    println!(
                        "  {}",
                        format!("{} unreadable files skipped", merged.files_skipped).yellow()
                    );
                }
            }
            Err(e) => println!("  {}", e.to_string().red()),
        }
        println!(
            "Execution Time: {} seconds",
            run.elapsed.as_secs_f64().to_string().yellow()
        );
    }
}

fn print_json(runs: &[StrategyRun]) -> Result<()> {
    let report: Vec<_> = runs
        .iter()
        .map(|run| match &run.outcome {
            Ok(merged) => {
                let results: BTreeMap<&str, &[PathBuf]> = merged.iter().collect();
                json!({
                    "strategy": run.strategy.name(),
                    "elapsed_seconds": run.elapsed.as_secs_f64(),
                    "results": results,
                    "files_scanned": merged.files_scanned,
                    "files_skipped": merged.files_skipped,
                })
            }
            Err(e) => json!({
                "strategy": run.strategy.name(),
                "elapsed_seconds": run.elapsed.as_secs_f64(),
                "error": e.to_string(),
            }),
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
