// src/types.rs
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

/// Risk category for pattern rules and the issues derived from them.
///
/// Declaration order is catalog order; `Ord` follows it, which fixes how
/// findings and issues are grouped in reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Security,
    Performance,
    Maintainability,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Security => write!(f, "security"),
            Self::Performance => write!(f, "performance"),
            Self::Maintainability => write!(f, "maintainability"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
    Low,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::High => write!(f, "high"),
            Self::Medium => write!(f, "medium"),
            Self::Low => write!(f, "low"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// A single located match of a risk-pattern rule against source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    /// 1-based line number of the match start.
    pub line: usize,
    pub category: Category,
    pub description: String,
}

/// A reportable problem, derived from a finding or from a metric threshold.
/// The synthetic complexity issue and the parse-failure issue carry no line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    pub category: Category,
    pub severity: Severity,
    pub message: String,
}

/// Structural quality metrics for one source file.
///
/// All fields are `-1` when the source failed to parse; real and sentinel
/// values never mix. The degraded form is only constructible through
/// [`Metrics::degraded`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metrics {
    pub cyclomatic_complexity: i64,
    pub maintainability_index: f64,
    pub cognitive_complexity: i64,
    pub lines_of_code: i64,
    pub comment_ratio: f64,
}

impl Metrics {
    /// The uniform "unparseable" sentinel across every field.
    #[must_use]
    pub fn degraded() -> Self {
        Self {
            cyclomatic_complexity: -1,
            maintainability_index: -1.0,
            cognitive_complexity: -1,
            lines_of_code: -1,
            comment_ratio: -1.0,
        }
    }

    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.cyclomatic_complexity == -1
    }
}

/// Findings grouped by category. Categories with no matches are absent,
/// never present with an empty list.
pub type PatternMap = BTreeMap<Category, Vec<Finding>>;

/// Immutable output of one `analyze` call, owned by the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub metrics: Metrics,
    pub issues: Vec<Issue>,
    pub patterns_found: PatternMap,
}

impl AnalysisResult {
    /// The degraded result for unparseable source: sentinel metrics, one
    /// error issue, no findings.
    #[must_use]
    pub fn degraded() -> Self {
        Self {
            metrics: Metrics::degraded(),
            issues: vec![Issue {
                line: None,
                category: Category::Maintainability,
                severity: Severity::Error,
                message: "invalid syntax".to_string(),
            }],
            patterns_found: PatternMap::new(),
        }
    }

    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.metrics.is_degraded()
    }

    /// Returns true if any issue is high severity or a parse error.
    #[must_use]
    pub fn has_blocking_issues(&self) -> bool {
        self.issues
            .iter()
            .any(|i| matches!(i.severity, Severity::High | Severity::Error))
    }
}

/// Analysis results for a single file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    pub language: &'static str,
    pub result: AnalysisResult,
}

impl FileReport {
    /// Returns true if no issues were found.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.result.issues.is_empty()
    }
}

/// Aggregated results from scanning multiple files.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScanReport {
    pub files: Vec<FileReport>,
    pub total_issues: usize,
    pub duration_ms: u128,
}

impl ScanReport {
    /// Returns true if any file carries a high-severity or error issue.
    #[must_use]
    pub fn has_blocking_issues(&self) -> bool {
        self.files.iter().any(|f| f.result.has_blocking_issues())
    }

    /// Returns the number of clean files.
    #[must_use]
    pub fn clean_file_count(&self) -> usize {
        self.files.iter().filter(|f| f.is_clean()).count()
    }
}
