// tests/engine_scan.rs
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

use tempfile::TempDir;

use srcvet_core::config::Config;
use srcvet_core::engine::Engine;
use srcvet_core::report::{render, Format};

fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    let mut file = File::create(&path).unwrap();
    write!(file, "{content}").unwrap();
    path
}

#[test]
fn test_scan_mixes_clean_degraded_and_skipped() {
    let dir = TempDir::new().unwrap();
    let clean = write_file(&dir, "clean.py", "x = 1\n");
    let broken = write_file(&dir, "broken.py", "def broken(:\n    pass\n");
    let notes = write_file(&dir, "notes.txt", "not source code\n");

    let engine = Engine::new(Config::default());
    let report = engine.scan(&[clean.clone(), broken.clone(), notes]);

    // The .txt file has no supported language and is skipped.
    assert_eq!(report.files.len(), 2);
    assert_eq!(report.total_issues, 1);
    assert_eq!(report.clean_file_count(), 1);

    let broken_report = report.files.iter().find(|f| f.path == broken).unwrap();
    assert!(broken_report.result.is_degraded());

    let clean_report = report.files.iter().find(|f| f.path == clean).unwrap();
    assert!(clean_report.is_clean());
    assert_eq!(clean_report.language, "python");
}

#[test]
fn test_sibling_failure_does_not_leak() {
    let dir = TempDir::new().unwrap();
    let broken = write_file(&dir, "broken.py", "def broken(:\n");
    let risky = write_file(&dir, "risky.py", "eval(x)\n");

    let engine = Engine::new(Config::default());
    let report = engine.scan(&[broken, risky.clone()]);

    let risky_report = report.files.iter().find(|f| f.path == risky).unwrap();
    assert!(!risky_report.result.is_degraded());
    assert_eq!(risky_report.result.issues.len(), 1);
}

#[test]
fn test_ignore_patterns_skip_files() {
    let dir = TempDir::new().unwrap();
    let generated = write_file(&dir, "generated_api.py", "eval(x)\n");

    let config = Config {
        ignore_patterns: vec!["generated".to_string()],
        ..Config::default()
    };
    let engine = Engine::new(config);
    let report = engine.scan(&[generated]);

    assert!(report.files.is_empty());
    assert_eq!(report.total_issues, 0);
    assert!(!report.has_blocking_issues());
}

#[test]
fn test_blocking_issues_signal() {
    let dir = TempDir::new().unwrap();
    let clean = write_file(&dir, "clean.py", "x = 1\n");
    let risky = write_file(&dir, "risky.py", "eval(x)\n");

    let engine = Engine::new(Config::default());

    let report = engine.scan(&[clean.clone()]);
    assert!(!report.has_blocking_issues());

    let report = engine.scan(&[clean, risky]);
    assert!(report.has_blocking_issues());
}

#[test]
fn test_markdown_report_shape() {
    let dir = TempDir::new().unwrap();
    let risky = write_file(&dir, "risky.py", "import os\n\nos.system(cmd)\n");

    let engine = Engine::new(Config::default());
    let report = engine.scan(&[risky]);

    let md = render(&report, Format::Markdown).unwrap();
    assert!(md.starts_with("# Code Review Report"));
    assert!(md.contains("risky.py"));
    assert!(md.contains("- [high] Line 3: Potential shell injection"));
    assert!(md.contains("cyclomatic_complexity: 1"));
}

#[test]
fn test_json_report_parses() {
    let dir = TempDir::new().unwrap();
    let clean = write_file(&dir, "clean.py", "x = 1\n");

    let engine = Engine::new(Config::default());
    let report = engine.scan(&[clean]);

    let json = render(&report, Format::Json).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["files"][0]["result"]["metrics"]["cyclomatic_complexity"], 1);
    assert_eq!(value["total_issues"], 0);
}
