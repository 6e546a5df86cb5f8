// src/analysis/issues.rs
//! Merges pattern findings and metric thresholds into the ranked issue
//! list.

use crate::types::{Category, Issue, PatternMap, Severity};

/// Builds the issue list for a successfully parsed file.
///
/// Findings come first, grouped by category in catalog order with match
/// order preserved inside each group. Security findings rank high, all
/// other findings medium. If cyclomatic complexity exceeds `threshold`, a
/// single synthetic issue carrying the numeric value is appended last.
#[must_use]
pub fn collect(patterns_found: &PatternMap, cyclomatic: i64, threshold: i64) -> Vec<Issue> {
    let mut issues = Vec::new();

    for (category, findings) in patterns_found {
        let severity = if *category == Category::Security {
            Severity::High
        } else {
            Severity::Medium
        };
        for finding in findings {
            issues.push(Issue {
                line: Some(finding.line),
                category: *category,
                severity,
                message: finding.description.clone(),
            });
        }
    }

    if cyclomatic > threshold {
        issues.push(Issue {
            line: None,
            category: Category::Maintainability,
            severity: Severity::Medium,
            message: format!("High cyclomatic complexity: {cyclomatic}"),
        });
    }

    issues
}
