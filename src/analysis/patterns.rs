// src/analysis/patterns.rs
//! The fixed risk-pattern catalog and its text matcher.
//!
//! These are intentionally shallow, text-level heuristics, not semantic
//! analysis. Each rule is a compiled regex scanned over the full raw text;
//! matches are located by counting newlines before the match start.

use std::sync::LazyLock;

use regex::Regex;

use crate::lang::Lang;
use crate::types::{Category, Finding, PatternMap};

/// A single catalog entry. The catalog is process-wide and read-only after
/// first use.
pub struct Rule {
    pub category: Category,
    pub name: &'static str,
    pub regex: Regex,
    pub description: &'static str,
}

type RuleSpec = (Category, &'static str, &'static str, &'static str);

const PYTHON_RULES: &[RuleSpec] = &[
    (
        Category::Security,
        "eval_exec",
        r"\b(eval|exec)\s*\(",
        "Use of eval() or exec()",
    ),
    (
        Category::Security,
        "shell_injection",
        r"(os\.system|subprocess\.(call|run|Popen))\s*\(",
        "Potential shell injection",
    ),
    (
        Category::Security,
        "sql_injection",
        r#"execute\s*\(\s*['"][^'"]*%"#,
        "Potential SQL injection via string formatting",
    ),
    (
        Category::Performance,
        "index_iteration",
        r"for\s+\w+\s+in\s+range\s*\(\s*len\s*\(",
        "Index-based iteration where direct iteration suffices",
    ),
    (
        Category::Performance,
        "redundant_copy",
        r"\.copy\s*\(\s*\)",
        "Redundant copy of a collection",
    ),
    (
        Category::Performance,
        "infinite_loop",
        r"while\s+True\s*:",
        "Unconditional infinite loop",
    ),
    (
        Category::Maintainability,
        "bare_except",
        r"except\s*:",
        "Bare except handler swallows all errors",
    ),
    (
        Category::Maintainability,
        "global_binding",
        r"\bglobal\s+\w+",
        "Global mutable binding",
    ),
    (
        Category::Maintainability,
        "debug_print",
        r"\bprint\s*\(",
        "Debug print left in place",
    ),
    (
        Category::Maintainability,
        "mixed_bool_condition",
        r"if\s+[^\n:]*\band\b[^\n:]*\bor\b",
        "Mixed and/or condition without parentheses",
    ),
];

const RUST_RULES: &[RuleSpec] = &[
    (
        Category::Security,
        "shell_invocation",
        r#"Command::new\s*\(\s*"(sh|bash|/bin/sh)""#,
        "Shell invocation; arguments may be attacker-controlled",
    ),
    (
        Category::Security,
        "sql_format",
        r#"(?i)format!\s*\(\s*"\s*(select|insert|update|delete)\b"#,
        "SQL built via string formatting",
    ),
    (
        Category::Performance,
        "index_iteration",
        r"for\s+\w+\s+in\s+0\s*\.\.\s*\w+\s*\.\s*len\s*\(\s*\)",
        "Index-based iteration where direct iteration suffices",
    ),
    (
        Category::Performance,
        "redundant_copy",
        r"\.to_vec\s*\(\s*\)\s*\.\s*iter\b",
        "Redundant copy before iteration",
    ),
    (
        Category::Performance,
        "empty_spin_loop",
        r"loop\s*\{\s*\}",
        "Unconditional busy loop",
    ),
    (
        Category::Maintainability,
        "unwrap",
        r"\.unwrap\s*\(\s*\)",
        "unwrap() panics on the error path",
    ),
    (
        Category::Maintainability,
        "global_mut",
        r"\bstatic\s+mut\s+",
        "Global mutable binding",
    ),
    (
        Category::Maintainability,
        "debug_print",
        r"\b(println!|dbg!)\s*\(",
        "Debug print left in place",
    ),
    (
        Category::Maintainability,
        "mixed_bool_condition",
        r"if\s+[^\n{]*&&[^\n{]*\|\|",
        "Mixed &&/|| condition without parentheses",
    ),
];

const TYPESCRIPT_RULES: &[RuleSpec] = &[
    (
        Category::Security,
        "eval_call",
        r"\b(eval|new\s+Function)\s*\(",
        "Use of eval() or the Function constructor",
    ),
    (
        Category::Security,
        "shell_exec",
        r"\b(execSync|spawnSync|exec)\s*\(",
        "Child-process execution; arguments may be attacker-controlled",
    ),
    (
        Category::Security,
        "sql_concat",
        r#"(?i)["'`]\s*(select|insert|update|delete)\b[^"'`\n]*["'`]\s*\+"#,
        "SQL built via string concatenation",
    ),
    (
        Category::Performance,
        "index_iteration",
        r"for\s*\(\s*(let|var)\s+\w+\s*=\s*0\s*;",
        "Index-based iteration where iteration methods suffice",
    ),
    (
        Category::Performance,
        "json_deep_copy",
        r"JSON\.parse\s*\(\s*JSON\.stringify\s*\(",
        "Redundant deep copy via JSON round-trip",
    ),
    (
        Category::Performance,
        "infinite_loop",
        r"while\s*\(\s*true\s*\)",
        "Unconditional infinite loop",
    ),
    (
        Category::Maintainability,
        "empty_catch",
        r"catch\s*(\(\s*\w*\s*\))?\s*\{\s*\}",
        "Empty catch block swallows all errors",
    ),
    (
        Category::Maintainability,
        "var_binding",
        r"\bvar\s+\w+",
        "var binding; prefer const or let",
    ),
    (
        Category::Maintainability,
        "console_log",
        r"console\.(log|debug)\s*\(",
        "Debug logging left in place",
    ),
    (
        Category::Maintainability,
        "mixed_bool_condition",
        r"if\s*\([^)\n]*&&[^)\n]*\|\|",
        "Mixed &&/|| condition without parentheses",
    ),
];

static PYTHON_CATALOG: LazyLock<Vec<Rule>> = LazyLock::new(|| compile(PYTHON_RULES));
static RUST_CATALOG: LazyLock<Vec<Rule>> = LazyLock::new(|| compile(RUST_RULES));
static TYPESCRIPT_CATALOG: LazyLock<Vec<Rule>> = LazyLock::new(|| compile(TYPESCRIPT_RULES));

// Patterns are hardcoded and exercised by tests; a failed compile is a
// developer error, so construction panics rather than propagating.
fn compile(specs: &[RuleSpec]) -> Vec<Rule> {
    specs
        .iter()
        .map(|&(category, name, pattern, description)| Rule {
            category,
            name,
            regex: Regex::new(pattern).unwrap(),
            description,
        })
        .collect()
}

/// Returns the immutable catalog for `lang`.
#[must_use]
pub fn catalog(lang: Lang) -> &'static [Rule] {
    match lang {
        Lang::Python => PYTHON_CATALOG.as_slice(),
        Lang::Rust => RUST_CATALOG.as_slice(),
        Lang::TypeScript => TYPESCRIPT_CATALOG.as_slice(),
    }
}

/// Scans `source` against the catalog for `lang`. Findings are grouped by
/// category; categories with no matches are absent from the map. Within a
/// category, findings follow catalog rule order, then document order.
#[must_use]
pub fn scan(lang: Lang, source: &str) -> PatternMap {
    let mut found = PatternMap::new();
    for rule in catalog(lang) {
        for m in rule.regex.find_iter(source) {
            found.entry(rule.category).or_default().push(Finding {
                line: line_of(source, m.start()),
                category: rule.category,
                description: rule.description.to_string(),
            });
        }
    }
    found
}

// 1-based: newlines strictly before the match start, plus one.
fn line_of(source: &str, byte_offset: usize) -> usize {
    source.as_bytes()[..byte_offset]
        .iter()
        .filter(|&&b| b == b'\n')
        .count()
        + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_of_counts_preceding_newlines() {
        let text = "a\nb\nc";
        assert_eq!(line_of(text, 0), 1);
        assert_eq!(line_of(text, 2), 2);
        assert_eq!(line_of(text, 4), 3);
    }

    #[test]
    fn test_empty_categories_are_omitted() {
        let found = scan(Lang::Python, "x = 1\n");
        assert!(found.is_empty());

        let found = scan(Lang::Python, "print(x)\n");
        assert!(!found.contains_key(&Category::Security));
        assert!(!found.contains_key(&Category::Performance));
        assert_eq!(found[&Category::Maintainability].len(), 1);
    }

    #[test]
    fn test_python_security_rules() {
        let code = "eval(data)\nos.system(cmd)\nsubprocess.run(cmd)\n";
        let found = scan(Lang::Python, code);
        let security = &found[&Category::Security];
        assert_eq!(security.len(), 3);
        // Catalog rule order first: eval, then the two shell matches in
        // document order.
        assert_eq!(security[0].line, 1);
        assert_eq!(security[1].line, 2);
        assert_eq!(security[2].line, 3);
    }

    #[test]
    fn test_python_index_iteration() {
        let code = "for i in range(len(xs)):\n    pass\n";
        let found = scan(Lang::Python, code);
        assert_eq!(found[&Category::Performance].len(), 1);
    }

    #[test]
    fn test_rust_rules() {
        let code = "fn main() {\n    let v = x.unwrap();\n    static mut COUNTER: u32 = 0;\n}\n";
        let found = scan(Lang::Rust, code);
        let maint = &found[&Category::Maintainability];
        assert_eq!(maint.len(), 2);
        assert_eq!(maint[0].line, 2);
        assert_eq!(maint[1].line, 3);
    }

    #[test]
    fn test_typescript_rules() {
        let code = "eval(payload);\nwhile (true) {\n    console.log(x);\n}\n";
        let found = scan(Lang::TypeScript, code);
        assert_eq!(found[&Category::Security].len(), 1);
        assert_eq!(found[&Category::Performance].len(), 1);
        assert_eq!(found[&Category::Maintainability].len(), 1);
    }

    #[test]
    fn test_mixed_condition_requires_both_operators() {
        let found = scan(Lang::Python, "if a and b:\n    pass\n");
        assert!(found.is_empty());

        let found = scan(Lang::Python, "if a and b or c:\n    pass\n");
        assert_eq!(found[&Category::Maintainability].len(), 1);
    }

    #[test]
    fn test_catalogs_have_every_category() {
        for lang in [Lang::Python, Lang::Rust, Lang::TypeScript] {
            let rules = catalog(lang);
            for category in [
                Category::Security,
                Category::Performance,
                Category::Maintainability,
            ] {
                assert!(
                    rules.iter().any(|r| r.category == category),
                    "{} catalog missing {category}",
                    lang.name()
                );
            }
            // Rule names are unique within a catalog.
            let mut names: Vec<_> = rules.iter().map(|r| r.name).collect();
            names.sort_unstable();
            names.dedup();
            assert_eq!(names.len(), rules.len());
        }
    }
}
