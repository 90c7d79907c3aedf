//! End-to-end walk over a real directory tree with a scripted engine.
//!
//! These tests verify the full pipeline: deterministic traversal, per-file
//! capture and classification, console rendering, and the nesting of CI
//! test events.

mod common;

use common::SharedBuf;
use modernize_reporter::capture::EngineIo;
use modernize_reporter::config::types::{OutputFormat, ReporterConfig, EXIT_CHANGES, EXIT_UNCHANGED};
use modernize_reporter::engine::{EngineExit, RefactorEngine, REFACTOR_LOG_CHANNEL};
use modernize_reporter::harness::Harness;
use modernize_reporter::report::{Console, TeamcityReporter};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Engine that decides its behavior from the file name it is handed.
struct ByNameEngine;

impl RefactorEngine for ByNameEngine {
    fn run(&mut self, argv: &[String], io: &mut EngineIo<'_>) -> EngineExit {
        let file = argv.last().expect("argv always ends with the file");
        if file.ends_with("fixme.py") {
            io.write_stdout(&format!("{}\t(original)\n+modernized line\n", file));
            EngineExit::Code(EXIT_CHANGES)
        } else if file.ends_with("defensive.py") {
            // Code 2 but the log says otherwise.
            io.log(REFACTOR_LOG_CHANNEL, &format!("No changes to {}.", file));
            EngineExit::Code(EXIT_CHANGES)
        } else if file.ends_with("crash.py") {
            EngineExit::Aborted("2".to_string())
        } else {
            EngineExit::Code(EXIT_UNCHANGED)
        }
    }
}

fn touch(dir: &Path, name: &str) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, b"pass\n").unwrap();
}

fn run_tree(tmp: &TempDir, config: ReporterConfig) -> (String, String, String) {
    let out = SharedBuf::default();
    let err = SharedBuf::default();
    let mut console = Console::new(
        Box::new(out.clone()),
        Box::new(err.clone()),
        config.verbose,
        config.output_format,
    );
    let mut harness = Harness::new(config, ByNameEngine);
    let mut reporter = TeamcityReporter::new(Vec::new());

    harness
        .run(&[tmp.path()], &mut console, &mut reporter)
        .unwrap();

    let ci = String::from_utf8(reporter.into_inner()).unwrap();
    (out.text(), err.text(), ci)
}

#[test]
fn walk_classifies_every_file_exactly_once() {
    let tmp = TempDir::new().unwrap();
    touch(tmp.path(), "clean.py");
    touch(tmp.path(), "fixme.py");
    touch(tmp.path(), "defensive.py");
    touch(tmp.path(), ".hidden.py");
    touch(tmp.path(), "notes.txt");

    let (out, err, _) = run_tree(&tmp, ReporterConfig::default());

    assert_eq!(out.matches("no change:").count(), 2); // clean + defensive
    assert_eq!(out.matches("needs fix:").count(), 1);
    assert!(!out.contains(".hidden.py"));
    assert!(!out.contains("notes.txt"));
    assert!(err.contains("modernize: +modernized line"));
}

#[test]
fn ci_events_nest_correctly_per_file() {
    let tmp = TempDir::new().unwrap();
    touch(tmp.path(), "clean.py");
    touch(tmp.path(), "fixme.py");

    let (_, _, ci) = run_tree(&tmp, ReporterConfig::default());
    let lines: Vec<&str> = ci.lines().collect();

    // Sorted order: clean.py before fixme.py.
    assert!(lines[0].starts_with("##teamcity[testStarted"));
    assert!(lines[0].contains("clean.py"));
    assert!(lines[1].starts_with("##teamcity[testFinished"));
    assert!(lines[2].contains("testStarted"));
    assert!(lines[2].contains("fixme.py"));
    assert!(lines[3].contains("testFailed"));
    assert!(lines[3].contains("Suggested changes from"));
    assert!(lines[4].contains("testFinished"));
    assert_eq!(lines.len(), 5);
}

#[test]
fn engine_abort_does_not_stop_the_walk() {
    let tmp = TempDir::new().unwrap();
    touch(tmp.path(), "crash.py");
    touch(tmp.path(), "zafter.py");

    let (out, _, ci) = run_tree(&tmp, ReporterConfig::default());

    assert!(out.contains("UNK_ERROR: "));
    assert!(out.contains("'Modernize' exited abnormally: 2"));
    // The file after the crash is still classified.
    assert!(out.contains("no change:"));
    assert!(out.contains("zafter.py"));
    // The crashed file still gets a complete started/failed/finished triple.
    assert!(ci.contains("testFailed"));
    assert_eq!(
        ci.matches("testStarted").count(),
        ci.matches("testFinished").count()
    );
}

#[test]
fn excluded_directories_are_never_classified() {
    let tmp = TempDir::new().unwrap();
    touch(tmp.path(), "vendored/six.py");
    touch(tmp.path(), "kept.py");

    let config = ReporterConfig {
        excludes: vec!["vendored".to_string()],
        ..ReporterConfig::default()
    };
    let (out, _, _) = run_tree(&tmp, config);

    assert!(out.contains("kept.py"));
    assert!(!out.contains("six.py"));
}

#[test]
fn json_mode_emits_one_object_per_file() {
    let tmp = TempDir::new().unwrap();
    touch(tmp.path(), "clean.py");
    touch(tmp.path(), "fixme.py");

    let config = ReporterConfig {
        output_format: OutputFormat::Json,
        ..ReporterConfig::default()
    };
    let (out, _, _) = run_tree(&tmp, config);

    let reports: Vec<serde_json::Value> = out
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0]["verdict"], "unchanged");
    assert_eq!(reports[0]["code"], 0);
    assert_eq!(reports[1]["verdict"], "needs_fix");
    assert!(reports[1]["detail"]
        .as_str()
        .unwrap()
        .contains("Suggested changes from"));
}

#[test]
fn single_file_root_is_classified_directly() {
    let tmp = TempDir::new().unwrap();
    touch(tmp.path(), "fixme.py");
    let root = tmp.path().join("fixme.py");

    let out = SharedBuf::default();
    let err = SharedBuf::default();
    let mut console = Console::new(
        Box::new(out.clone()),
        Box::new(err.clone()),
        false,
        OutputFormat::Text,
    );
    let mut harness = Harness::new(ReporterConfig::default(), ByNameEngine);
    let mut reporter = TeamcityReporter::new(Vec::new());

    harness
        .run(&[root.as_path()], &mut console, &mut reporter)
        .unwrap();

    assert_eq!(out.text().matches("needs fix:").count(), 1);
}
