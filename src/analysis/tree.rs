// src/analysis/tree.rs
//! Normalizing classification over tree-sitter nodes.
//!
//! The metric calculators never branch on grammar-specific node kinds; this
//! module maps each concrete node to a `NodeCategory` tag in a single pass,
//! so supporting a new language touches classification only.

use tree_sitter::Node;

use crate::lang::Lang;

/// Control-flow category of a syntax node: the only semantic fact the
/// metric calculators need from the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeCategory {
    /// Conditional: if/elif, match arm, switch case, ternary.
    Branch,
    /// for/while/loop/do-while.
    Loop,
    /// try/except/catch, and Rust's `?`.
    ExceptionHandler,
    /// Context-managed block: `with`, `unsafe { }`.
    ScopeEntry,
    Assertion,
    /// Short-circuit boolean operator, with its operand count.
    BooleanCombinator { operands: usize },
    Other,
}

/// Classifies a node for `lang`. Boolean combinators need the raw source
/// to read the operator token.
#[must_use]
pub fn classify(lang: Lang, node: Node, source: &str) -> NodeCategory {
    match lang {
        Lang::Python => classify_python(node),
        Lang::Rust => classify_rust(node, source),
        Lang::TypeScript => classify_typescript(node, source),
    }
}

fn classify_python(node: Node) -> NodeCategory {
    match node.kind() {
        // elif is a clause node here, not a nested if; it still counts as
        // one decision.
        "if_statement" | "elif_clause" | "conditional_expression" => NodeCategory::Branch,
        "for_statement" | "while_statement" => NodeCategory::Loop,
        "try_statement" | "except_clause" => NodeCategory::ExceptionHandler,
        "with_statement" => NodeCategory::ScopeEntry,
        "assert_statement" => NodeCategory::Assertion,
        "boolean_operator" => NodeCategory::BooleanCombinator {
            operands: operand_count(node),
        },
        _ => NodeCategory::Other,
    }
}

fn classify_rust(node: Node, source: &str) -> NodeCategory {
    match node.kind() {
        "if_expression" | "if_let_expression" | "match_arm" => NodeCategory::Branch,
        "for_expression" | "while_expression" | "while_let_expression" | "loop_expression" => {
            NodeCategory::Loop
        }
        "try_expression" => NodeCategory::ExceptionHandler,
        "unsafe_block" => NodeCategory::ScopeEntry,
        "binary_expression" => boolean_combinator(node, source, &["&&", "||"]),
        _ => NodeCategory::Other,
    }
}

fn classify_typescript(node: Node, source: &str) -> NodeCategory {
    match node.kind() {
        "if_statement" | "switch_case" | "ternary_expression" => NodeCategory::Branch,
        "for_statement" | "for_in_statement" | "while_statement" | "do_statement" => {
            NodeCategory::Loop
        }
        "try_statement" | "catch_clause" => NodeCategory::ExceptionHandler,
        "with_statement" => NodeCategory::ScopeEntry,
        "binary_expression" => boolean_combinator(node, source, &["&&", "||", "??"]),
        _ => NodeCategory::Other,
    }
}

fn boolean_combinator(node: Node, source: &str, ops: &[&str]) -> NodeCategory {
    let Some(op) = node.child_by_field_name("operator") else {
        return NodeCategory::Other;
    };
    let text = op.utf8_text(source.as_bytes()).unwrap_or("");
    if ops.contains(&text) {
        NodeCategory::BooleanCombinator {
            operands: operand_count(node),
        }
    } else {
        NodeCategory::Other
    }
}

// Boolean chains come out of tree-sitter as nested binary nodes, so each
// combinator has two operands; `a and b and c` is two combinator nodes
// whose contributions sum to the flattened chain's k - 1.
fn operand_count(node: Node) -> usize {
    node.named_child_count().max(2)
}
