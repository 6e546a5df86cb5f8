// src/analysis/mod.rs
//! The analysis engine: parse, measure, scan, aggregate.
//!
//! `analyze` is total over its input text. A well-formed file yields
//! metrics, findings, and issues; a malformed one yields the uniform
//! degraded result. Nothing in here errors past the boundary.

pub mod issues;
pub mod metrics;
pub mod patterns;
pub mod tree;

use tracing::debug;
use tree_sitter::{Parser, Tree};

use crate::config::RuleConfig;
use crate::lang::Lang;
use crate::types::AnalysisResult;

/// Analyzes one file's text with default thresholds.
#[must_use]
pub fn analyze(lang: Lang, source: &str) -> AnalysisResult {
    Analyzer::default().analyze(lang, source)
}

/// The analysis engine for a fixed rule configuration. Holds no per-call
/// state; one instance may serve any number of files.
#[derive(Debug, Clone)]
pub struct Analyzer {
    complexity_threshold: i64,
}

impl Analyzer {
    #[must_use]
    pub fn new(rules: &RuleConfig) -> Self {
        Self {
            complexity_threshold: rules.complexity_threshold,
        }
    }

    /// Runs the full pipeline over one file's text.
    ///
    /// Metric calculation and pattern scanning are independent of each
    /// other; the issue aggregator merges both. On parse failure the
    /// pipeline is skipped entirely and the degraded result is returned.
    #[must_use]
    pub fn analyze(&self, lang: Lang, source: &str) -> AnalysisResult {
        let Some(tree) = parse(lang, source) else {
            debug!(lang = lang.name(), "parse failed, degrading result");
            return AnalysisResult::degraded();
        };

        let metrics = metrics::compute(lang, tree.root_node(), source);
        let patterns_found = patterns::scan(lang, source);
        let issues = issues::collect(
            &patterns_found,
            metrics.cyclomatic_complexity,
            self.complexity_threshold,
        );

        AnalysisResult {
            metrics,
            issues,
            patterns_found,
        }
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new(&RuleConfig::default())
    }
}

/// Parse boundary. tree-sitter does not raise on malformed input the way
/// a compiler front end does; a missing tree or any ERROR node under the
/// root counts as a parse failure. Deterministic for a given input.
pub(crate) fn parse(lang: Lang, source: &str) -> Option<Tree> {
    let mut parser = Parser::new();
    parser.set_language(lang.grammar()).ok()?;
    let tree = parser.parse(source, None)?;
    if tree.root_node().has_error() {
        return None;
    }
    Some(tree)
}
