use anyhow::Result;
use kwbench::{
    BenchError, BenchmarkDriver, CaseMode, DriverOptions, ExecutionStrategy, FileSet, KeywordSet,
    Sequential, StrategyKind, Threaded,
};
use std::collections::HashMap;
use std::fs;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use tempfile::{tempdir, TempDir};

// Helper function to create test files
fn create_test_files(dir: &TempDir, files: &[(&str, &str)]) -> Result<FileSet> {
    for (name, content) in files {
        fs::write(dir.path().join(name), content)?;
    }
    Ok(FileSet::discover(dir.path(), &["txt".to_string()])?)
}

fn in_process_strategies() -> Vec<Box<dyn ExecutionStrategy>> {
    vec![Box::new(Sequential), Box::new(Threaded)]
}

fn options(cap: usize, case_mode: CaseMode) -> DriverOptions {
    DriverOptions {
        worker_cap: NonZeroUsize::new(cap).unwrap(),
        case_mode,
    }
}

fn sorted_results(
    driver: &BenchmarkDriver,
    strategy: &dyn ExecutionStrategy,
) -> Result<HashMap<String, Vec<PathBuf>>> {
    let run = driver.run_strategy(strategy);
    Ok(run.outcome?.to_sorted())
}

#[test]
fn test_hello_goodbye_scenario() -> Result<()> {
    let dir = tempdir()?;
    let files = create_test_files(&dir, &[("a.txt", "hello world"), ("b.txt", "goodbye")])?;
    let driver =
        BenchmarkDriver::from_inputs(&files, ["hello", "xyz"], DriverOptions::default())?;

    for run in driver.run(&in_process_strategies()) {
        let merged = run.outcome?;
        assert_eq!(merged.get("hello").unwrap(), &[dir.path().join("a.txt")]);
        assert!(merged.get("xyz").unwrap().is_empty());
    }
    Ok(())
}

#[test]
fn test_strategy_invariance() -> Result<()> {
    let dir = tempdir()?;
    let mut contents = Vec::new();
    for i in 0..23 {
        let mut text = format!("file {} body", i);
        if i % 2 == 0 {
            text.push_str(" even");
        }
        if i % 3 == 0 {
            text.push_str(" Fizz");
        }
        if i % 5 == 0 {
            text.push_str(" buzz");
        }
        contents.push((format!("f{:02}.txt", i), text));
    }
    let refs: Vec<(&str, &str)> = contents
        .iter()
        .map(|(n, c)| (n.as_str(), c.as_str()))
        .collect();
    let files = create_test_files(&dir, &refs)?;

    for cap in [1, 3, 8, 64] {
        let driver = BenchmarkDriver::from_inputs(
            &files,
            ["even", "fizz", "buzz", "body", "nothing"],
            options(cap, CaseMode::Insensitive),
        )?;
        let sequential = sorted_results(&driver, &Sequential)?;
        let threaded = sorted_results(&driver, &Threaded)?;
        assert_eq!(sequential, threaded, "cap {}", cap);

        assert_eq!(sequential["even"].len(), 12);
        assert_eq!(sequential["fizz"].len(), 8);
        assert_eq!(sequential["buzz"].len(), 5);
        assert_eq!(sequential["body"].len(), 23);
        assert!(sequential["nothing"].is_empty());
    }
    Ok(())
}

#[test]
fn test_keyword_in_every_file() -> Result<()> {
    let dir = tempdir()?;
    let files = create_test_files(
        &dir,
        &[
            ("1.txt", "common a"),
            ("2.txt", "b common"),
            ("3.txt", "xcommonx"),
            ("4.txt", "common"),
            ("5.txt", "common!"),
        ],
    )?;
    let driver =
        BenchmarkDriver::from_inputs(&files, ["common"], options(2, CaseMode::Sensitive))?;

    for run in driver.run(&in_process_strategies()) {
        let merged = run.outcome?;
        let mut found = merged.get("common").unwrap().to_vec();
        found.sort();
        assert_eq!(found.len(), files.len());
        assert_eq!(found, files.as_slice());
    }
    Ok(())
}

#[test]
fn test_case_policy_applies_to_all_strategies() -> Result<()> {
    let dir = tempdir()?;
    let files = create_test_files(&dir, &[("a.txt", "Hello"), ("b.txt", "hello")])?;

    let sensitive =
        BenchmarkDriver::from_inputs(&files, ["hello"], options(8, CaseMode::Sensitive))?;
    let insensitive =
        BenchmarkDriver::from_inputs(&files, ["hello"], options(8, CaseMode::Insensitive))?;

    for strategy in in_process_strategies() {
        assert_eq!(sorted_results(&sensitive, strategy.as_ref())?["hello"].len(), 1);
        assert_eq!(sorted_results(&insensitive, strategy.as_ref())?["hello"].len(), 2);
    }
    Ok(())
}

#[test]
fn test_unreadable_file_does_not_corrupt_run() -> Result<()> {
    let dir = tempdir()?;
    let files = create_test_files(&dir, &[("a.txt", "alpha beta"), ("c.txt", "beta")])?;
    let bad = dir.path().join("b.txt");
    fs::write(&bad, [0xc3, 0x28, b'b', b'e', b't', b'a'])?;
    let gone = dir.path().join("gone.txt");

    let mut paths = files.as_slice().to_vec();
    paths.push(bad);
    paths.push(gone);
    let files = FileSet::new(paths);

    let driver = BenchmarkDriver::from_inputs(
        &files,
        ["alpha", "beta"],
        options(3, CaseMode::Sensitive),
    )?;
    for run in driver.run(&in_process_strategies()) {
        let merged = run.outcome?;
        assert_eq!(merged.get("alpha").unwrap(), &[dir.path().join("a.txt")]);
        let mut beta = merged.get("beta").unwrap().to_vec();
        beta.sort();
        assert_eq!(beta, vec![dir.path().join("a.txt"), dir.path().join("c.txt")]);
        assert_eq!(merged.files_scanned, 2);
        assert_eq!(merged.files_skipped, 2);
    }
    Ok(())
}

#[test]
fn test_directory_entry_is_skipped() -> Result<()> {
    let dir = tempdir()?;
    let files = create_test_files(&dir, &[("open.txt", "secret")])?;
    let folder = dir.path().join("folder.txt");
    fs::create_dir(&folder)?;

    let mut paths = files.as_slice().to_vec();
    paths.push(folder);
    let files = FileSet::new(paths);

    let driver = BenchmarkDriver::from_inputs(&files, ["secret"], options(2, CaseMode::Sensitive))?;
    for run in driver.run(&in_process_strategies()) {
        let merged = run.outcome?;
        assert_eq!(merged.get("secret").unwrap(), &[dir.path().join("open.txt")]);
        assert_eq!(merged.files_scanned, 1);
        assert_eq!(merged.files_skipped, 1);
    }
    Ok(())
}

#[cfg(unix)]
#[test]
fn test_permission_denied_file_is_skipped() -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir()?;
    let files = create_test_files(&dir, &[("locked.txt", "secret"), ("open.txt", "secret")])?;
    let locked = dir.path().join("locked.txt");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000))?;
    // Privileged users can still read a mode-000 file
    let denied = fs::read(&locked).is_err();

    let driver = BenchmarkDriver::from_inputs(&files, ["secret"], DriverOptions::default())?;
    let runs = driver.run(&in_process_strategies());
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o644))?;

    let expected = if denied {
        vec![dir.path().join("open.txt")]
    } else {
        vec![locked.clone(), dir.path().join("open.txt")]
    };
    for run in runs {
        let merged = run.outcome?;
        assert_eq!(merged.get("secret").unwrap(), expected.as_slice());
        assert_eq!(merged.files_skipped, usize::from(denied));
        assert_eq!(merged.files_scanned + merged.files_skipped, 2);
    }
    Ok(())
}

#[test]
fn test_repeated_runs_are_idempotent() -> Result<()> {
    let dir = tempdir()?;
    let files = create_test_files(
        &dir,
        &[("a.txt", "red green"), ("b.txt", "green blue"), ("c.txt", "blue")],
    )?;
    let driver = BenchmarkDriver::from_inputs(
        &files,
        ["red", "green", "blue"],
        options(2, CaseMode::Sensitive),
    )?;

    for strategy in in_process_strategies() {
        let first = sorted_results(&driver, strategy.as_ref())?;
        let second = sorted_results(&driver, strategy.as_ref())?;
        assert_eq!(first, second, "{}", strategy.kind());
    }
    Ok(())
}

#[test]
fn test_empty_directory_aborts() -> Result<()> {
    let dir = tempdir()?;
    let files = FileSet::discover(dir.path(), &["txt".to_string()])?;
    let result = BenchmarkDriver::from_inputs(&files, ["hello"], DriverOptions::default());
    assert!(matches!(result, Err(BenchError::NoFiles)));
    Ok(())
}

#[test]
fn test_no_keywords_aborts() -> Result<()> {
    let dir = tempdir()?;
    let files = create_test_files(&dir, &[("a.txt", "hello")])?;
    assert!(matches!(KeywordSet::parse(" , "), Err(BenchError::NoKeywords)));
    let result = BenchmarkDriver::from_inputs(&files, [""], DriverOptions::default());
    assert!(matches!(result, Err(BenchError::NoKeywords)));
    Ok(())
}

#[test]
fn test_run_reports_strategy_and_timing() -> Result<()> {
    let dir = tempdir()?;
    let files = create_test_files(&dir, &[("a.txt", "x")])?;
    let driver = BenchmarkDriver::from_inputs(&files, ["x"], DriverOptions::default())?;
    assert_eq!(driver.worker_count(), 1);

    let run = driver.run_strategy(&Threaded);
    assert_eq!(run.strategy, StrategyKind::Threads);
    assert!(run.result().is_some());
    Ok(())
}
