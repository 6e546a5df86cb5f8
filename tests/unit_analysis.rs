// tests/unit_analysis.rs
use srcvet_core::analysis::{analyze, Analyzer};
use srcvet_core::config::RuleConfig;
use srcvet_core::lang::Lang;
use srcvet_core::types::{Category, Severity};

#[test]
fn test_baseline_complexity_is_one() {
    let result = analyze(Lang::Python, "x = 1\ny = x\n");
    assert!(!result.is_degraded());
    assert_eq!(result.metrics.cyclomatic_complexity, 1);
    assert_eq!(result.metrics.cognitive_complexity, 0);
    assert!(result.issues.is_empty());
    assert!(result.patterns_found.is_empty());
}

#[test]
fn test_maintainability_stays_in_range() {
    for code in [
        "x = 1\n",
        "# a fully commented file\n# nothing else\nx = 1\n",
        "if a and b or c:\n    pass\n",
    ] {
        let result = analyze(Lang::Python, code);
        let mi = result.metrics.maintainability_index;
        assert!((0.0..=100.0).contains(&mi), "index {mi} out of range");
    }
}

#[test]
fn test_eleven_branches_trip_the_threshold() {
    // 1 baseline + 11 independent ifs = 12, one over the default limit.
    let mut code = String::from("x = 1\n");
    for i in 0..11 {
        code.push_str(&format!("if x > {i}:\n    x = {i}\n"));
    }

    let result = analyze(Lang::Python, &code);
    assert_eq!(result.metrics.cyclomatic_complexity, 12);

    // Exactly one synthetic issue, carrying the numeric value, no line.
    assert_eq!(result.issues.len(), 1);
    let issue = &result.issues[0];
    assert_eq!(issue.line, None);
    assert_eq!(issue.severity, Severity::Medium);
    assert_eq!(issue.category, Category::Maintainability);
    assert!(issue.message.contains("12"));
}

#[test]
fn test_threshold_is_configurable() {
    let mut code = String::from("x = 1\n");
    for i in 0..11 {
        code.push_str(&format!("if x > {i}:\n    x = {i}\n"));
    }

    let relaxed = Analyzer::new(&RuleConfig {
        complexity_threshold: 20,
    });
    let result = relaxed.analyze(Lang::Python, &code);
    assert_eq!(result.metrics.cyclomatic_complexity, 12);
    assert!(result.issues.is_empty());
}

#[test]
fn test_security_findings_preserve_line_order() {
    let code = "import os\n\ndef unsafe(cmd):\n    eval(cmd)\n    os.system(cmd)\n";
    let result = analyze(Lang::Python, code);

    let security = &result.patterns_found[&Category::Security];
    assert_eq!(security.len(), 2);
    assert_eq!(security[0].line, 4);
    assert_eq!(security[1].line, 5);

    assert_eq!(result.issues.len(), 2);
    for (issue, line) in result.issues.iter().zip([4, 5]) {
        assert_eq!(issue.severity, Severity::High);
        assert_eq!(issue.category, Category::Security);
        assert_eq!(issue.line, Some(line));
    }
}

#[test]
fn test_invalid_syntax_degrades_uniformly() {
    let result = analyze(Lang::Python, "def broken(:\n    pass\n");
    assert!(result.is_degraded());

    // Every metric carries the sentinel; never a mix.
    assert_eq!(result.metrics.cyclomatic_complexity, -1);
    assert_eq!(result.metrics.cognitive_complexity, -1);
    assert_eq!(result.metrics.lines_of_code, -1);
    assert!((result.metrics.maintainability_index + 1.0).abs() < f64::EPSILON);
    assert!((result.metrics.comment_ratio + 1.0).abs() < f64::EPSILON);

    assert_eq!(result.issues.len(), 1);
    let issue = &result.issues[0];
    assert_eq!(issue.severity, Severity::Error);
    assert_eq!(issue.line, None);
    assert_eq!(issue.message, "invalid syntax");

    assert!(result.patterns_found.is_empty());
}

#[test]
fn test_successful_parse_never_emits_error_severity() {
    let code = "eval(x)\nprint(x)\nwhile True:\n    pass\n";
    let result = analyze(Lang::Python, code);
    assert!(!result.is_degraded());
    assert!(result.issues.iter().all(|i| i.severity != Severity::Error));
}

#[test]
fn test_cognitive_diverges_on_nesting_only() {
    let nested = "while x:\n    if y:\n        if z:\n            pass\n";
    let flat = "if x:\n    pass\nif y:\n    pass\nif z:\n    pass\n";

    let nested_result = analyze(Lang::Python, nested);
    let flat_result = analyze(Lang::Python, flat);

    // Three constructs either way: cyclomatic agrees...
    assert_eq!(nested_result.metrics.cyclomatic_complexity, 4);
    assert_eq!(flat_result.metrics.cyclomatic_complexity, 4);

    // ...cognitive weights the nesting: 1 + 2 + 3 vs 1 + 1 + 1.
    assert_eq!(nested_result.metrics.cognitive_complexity, 6);
    assert_eq!(flat_result.metrics.cognitive_complexity, 3);
}

#[test]
fn test_analyze_is_idempotent() {
    let code = "import os\n\nif a and b:\n    os.system(cmd)  # risky\n";
    let first = analyze(Lang::Python, code);
    let second = analyze(Lang::Python, code);
    assert_eq!(first, second);

    let degraded_first = analyze(Lang::Python, "def broken(:\n");
    let degraded_second = analyze(Lang::Python, "def broken(:\n");
    assert_eq!(degraded_first, degraded_second);
}

#[test]
fn test_rust_sources_are_supported() {
    let code =
        "fn main() {\n    let v = read().unwrap();\n    if v > 0 && v < 10 {\n        work(v);\n    }\n}\n";
    let result = analyze(Lang::Rust, code);
    assert!(!result.is_degraded());
    // if + one && chain over the baseline.
    assert_eq!(result.metrics.cyclomatic_complexity, 3);

    let maint = &result.patterns_found[&Category::Maintainability];
    assert_eq!(maint.len(), 1);
    assert_eq!(maint[0].line, 2);
}

#[test]
fn test_typescript_sources_are_supported() {
    let code = "function risky(payload: string) {\n    eval(payload);\n    while (true) {\n        step();\n    }\n}\n";
    let result = analyze(Lang::TypeScript, code);
    assert!(!result.is_degraded());
    // while over the baseline.
    assert_eq!(result.metrics.cyclomatic_complexity, 2);

    assert_eq!(result.patterns_found[&Category::Security][0].line, 2);
    assert_eq!(result.patterns_found[&Category::Performance][0].line, 3);

    // eval ranks high, the infinite loop medium; security group first.
    assert_eq!(result.issues[0].severity, Severity::High);
    assert_eq!(result.issues[1].severity, Severity::Medium);
}

#[test]
fn test_loc_and_comment_ratio() {
    let code = "# module docs\n\nx = 1\ny = 2\n";
    let result = analyze(Lang::Python, code);
    assert_eq!(result.metrics.lines_of_code, 3);
    assert!((result.metrics.comment_ratio - 1.0 / 3.0).abs() < 1e-9);
}
