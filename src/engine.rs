// src/engine.rs
//! Multi-file scanning. Each file is an independent unit of work: a file
//! that fails to parse degrades on its own and never affects siblings.

use std::path::{Path, PathBuf};
use std::time::Instant;

use rayon::prelude::*;
use tracing::debug;

use crate::analysis::Analyzer;
use crate::config::Config;
use crate::lang::Lang;
use crate::types::{FileReport, ScanReport};

/// Drives the analyzer over a set of files in parallel.
pub struct Engine {
    config: Config,
    analyzer: Analyzer,
}

impl Engine {
    #[must_use]
    pub fn new(config: Config) -> Self {
        let analyzer = Analyzer::new(&config.rules);
        Self { config, analyzer }
    }

    /// Analyzes the given files. Ignored paths, unsupported extensions,
    /// and unreadable files are skipped, never fatal.
    #[must_use]
    pub fn scan(&self, files: &[PathBuf]) -> ScanReport {
        let start = Instant::now();

        let reports: Vec<FileReport> = files
            .par_iter()
            .filter_map(|path| self.scan_file(path))
            .collect();

        ScanReport {
            total_issues: reports.iter().map(|r| r.result.issues.len()).sum(),
            files: reports,
            duration_ms: start.elapsed().as_millis(),
        }
    }

    fn scan_file(&self, path: &Path) -> Option<FileReport> {
        if self.is_ignored(path) {
            return None;
        }
        let lang = Lang::from_path(path)?;
        let source = match std::fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "skipping unreadable file");
                return None;
            }
        };
        Some(FileReport {
            path: path.to_path_buf(),
            language: lang.name(),
            result: self.analyzer.analyze(lang, &source),
        })
    }

    fn is_ignored(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();
        self.config
            .ignore_patterns
            .iter()
            .any(|p| path_str.contains(p.as_str()))
    }
}
