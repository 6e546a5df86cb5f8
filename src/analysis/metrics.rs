// src/analysis/metrics.rs
//! Structural metric calculators. Pure functions of the tree and raw text;
//! the degraded sentinel form is handled one level up, at the parse
//! boundary, so everything here assumes a well-formed tree.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use tree_sitter::Node;

use crate::lang::Lang;
use crate::types::Metrics;

use super::tree::{classify, NodeCategory};

// Halstead approximation: distinct single-character operator symbols and
// distinct identifier-shaped tokens, scanned over the raw text.
static OPERATOR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[+\-*/%=<>!&|^~]").unwrap());
static OPERAND_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[a-zA-Z_]\w*").unwrap());

/// Computes the full metric set for a successfully parsed file.
#[must_use]
pub fn compute(lang: Lang, root: Node, source: &str) -> Metrics {
    let cyclomatic = cyclomatic_complexity(lang, root, source);
    let cognitive = cognitive_complexity(lang, root, source);
    let (loc, comment_ratio) = loc_metrics(lang, source);
    let maintainability = maintainability_index(source, cyclomatic, loc, comment_ratio);

    Metrics {
        cyclomatic_complexity: cyclomatic,
        maintainability_index: maintainability,
        cognitive_complexity: cognitive,
        lines_of_code: loc,
        comment_ratio,
    }
}

/// McCabe complexity: one baseline path, plus one per decision point and
/// `k - 1` per boolean chain. A tree-wide sum, insensitive to traversal
/// order.
#[must_use]
pub fn cyclomatic_complexity(lang: Lang, root: Node, source: &str) -> i64 {
    let mut complexity = 1;
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        complexity += match classify(lang, node, source) {
            NodeCategory::Branch
            | NodeCategory::Loop
            | NodeCategory::ExceptionHandler
            | NodeCategory::ScopeEntry
            | NodeCategory::Assertion => 1,
            NodeCategory::BooleanCombinator { operands } => operands as i64 - 1,
            NodeCategory::Other => 0,
        };
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            stack.push(child);
        }
    }
    complexity
}

/// Nesting-weighted complexity: entering a branch, loop, or exception
/// handler costs `1 + nesting`, and its subtree is scored one level deeper.
/// Boolean chains and scope entries do not contribute.
#[must_use]
pub fn cognitive_complexity(lang: Lang, root: Node, source: &str) -> i64 {
    walk_cognitive(lang, root, source, 0)
}

fn walk_cognitive(lang: Lang, node: Node, source: &str, nesting: i64) -> i64 {
    let mut total = 0;
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        total += match classify(lang, child, source) {
            NodeCategory::Branch | NodeCategory::Loop | NodeCategory::ExceptionHandler => {
                1 + nesting + walk_cognitive(lang, child, source, nesting + 1)
            }
            _ => walk_cognitive(lang, child, source, nesting),
        };
    }
    total
}

/// Halstead-volume approximation blended with complexity and comment
/// density, clamped to [0, 100].
#[must_use]
pub fn maintainability_index(source: &str, cyclomatic: i64, loc: i64, comment_ratio: f64) -> f64 {
    let unique_operators = OPERATOR_RE
        .find_iter(source)
        .map(|m| m.as_str())
        .collect::<HashSet<_>>()
        .len();
    let unique_operands = OPERAND_RE
        .find_iter(source)
        .map(|m| m.as_str())
        .collect::<HashSet<_>>()
        .len();

    // Floored at 1 so the logarithm argument never hits zero.
    let volume =
        ((unique_operators + unique_operands) as f64 * (loc.max(1) as f64).ln()).max(1.0);

    let mut index = 171.0 - 5.2 * volume.ln() - 0.23 * cyclomatic as f64;
    index += 50.0 * comment_ratio;
    index.clamp(0.0, 100.0)
}

/// Non-blank line count, and the share of those lines that are single-line
/// comments. Ratio is 0 for empty input.
#[must_use]
pub fn loc_metrics(lang: Lang, source: &str) -> (i64, f64) {
    let marker = lang.comment_marker();
    let mut loc = 0_i64;
    let mut comments = 0_i64;
    for line in source.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        loc += 1;
        if trimmed.starts_with(marker) {
            comments += 1;
        }
    }
    let ratio = if loc == 0 {
        0.0
    } else {
        comments as f64 / loc as f64
    };
    (loc, ratio)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::parse;

    fn cyclomatic(lang: Lang, source: &str) -> i64 {
        let tree = parse(lang, source).expect("valid source");
        cyclomatic_complexity(lang, tree.root_node(), source)
    }

    fn cognitive(lang: Lang, source: &str) -> i64 {
        let tree = parse(lang, source).expect("valid source");
        cognitive_complexity(lang, tree.root_node(), source)
    }

    #[test]
    fn test_straight_line_code_is_baseline() {
        assert_eq!(cyclomatic(Lang::Python, "x = 1\ny = 2\n"), 1);
        assert_eq!(cognitive(Lang::Python, "x = 1\ny = 2\n"), 0);
    }

    #[test]
    fn test_python_decision_points() {
        // if + while = 2 decisions over the baseline.
        let code = "if x:\n    pass\nwhile y:\n    pass\n";
        assert_eq!(cyclomatic(Lang::Python, code), 3);
    }

    #[test]
    fn test_python_boolean_chain_counts_operands_minus_one() {
        // `a and b and c` nests as two combinator nodes: +1 each.
        let code = "if a and b and c:\n    pass\n";
        assert_eq!(cyclomatic(Lang::Python, code), 4);
        // Boolean chains do not contribute cognitively.
        assert_eq!(cognitive(Lang::Python, code), 1);
    }

    #[test]
    fn test_python_with_and_assert_count() {
        let code = "with open(p) as f:\n    assert f\n";
        assert_eq!(cyclomatic(Lang::Python, code), 3);
        // Neither construct carries cognitive weight.
        assert_eq!(cognitive(Lang::Python, code), 0);
    }

    #[test]
    fn test_cognitive_rewards_nesting() {
        let nested = "while x:\n    if y:\n        if z:\n            pass\n";
        assert_eq!(cognitive(Lang::Python, nested), 6);

        let flat = "if x:\n    pass\nif y:\n    pass\nif z:\n    pass\n";
        assert_eq!(cognitive(Lang::Python, flat), 3);

        // Same construct count, same cyclomatic score.
        assert_eq!(cyclomatic(Lang::Python, nested), cyclomatic(Lang::Python, flat));
    }

    #[test]
    fn test_rust_decision_points() {
        let code = "fn f(a: bool, b: bool) -> i32 {\n    if a && b { 1 } else { 0 }\n}\n";
        // if + one && chain.
        assert_eq!(cyclomatic(Lang::Rust, code), 3);
    }

    #[test]
    fn test_typescript_try_catch() {
        let code = "try {\n    f();\n} catch (e) {\n    g();\n}\n";
        // try + catch.
        assert_eq!(cyclomatic(Lang::TypeScript, code), 3);
    }

    #[test]
    fn test_loc_metrics_skip_blank_and_count_comments() {
        let code = "# header\n\nx = 1\n# trailer\n";
        let (loc, ratio) = loc_metrics(Lang::Python, code);
        assert_eq!(loc, 3);
        assert!((ratio - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_loc_metrics_empty_input() {
        let (loc, ratio) = loc_metrics(Lang::Python, "");
        assert_eq!(loc, 0);
        assert!((ratio - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_maintainability_is_clamped() {
        // Pathological input cannot push the index outside [0, 100].
        let mi = maintainability_index("x", 1, 1, 0.0);
        assert!((0.0..=100.0).contains(&mi));

        let dense = "a+b-c*d/e%f=g<h>i!j&k|l^m~n";
        let mi = maintainability_index(dense, 500, 1, 0.0);
        assert!((0.0..=100.0).contains(&mi));

        let mi = maintainability_index("# nothing but comments", 1, 1, 1.0);
        assert!((0.0..=100.0).contains(&mi));
    }

    #[test]
    fn test_comment_ratio_raises_maintainability() {
        let source = "x = a + b\n";
        let bare = maintainability_index(source, 1, 1, 0.0);
        let commented = maintainability_index(source, 1, 1, 0.5);
        assert!(commented > bare);
    }
}
