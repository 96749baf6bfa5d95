//! Statement-level syntax tree for shell scripts.
//!
//! The tree stops at statement granularity: each top-level statement keeps the
//! raw tokens it was built from so the printer can render it back faithfully.

use crate::parser::lexer::Token;

/// Root node: a parsed script
#[derive(Debug, Clone, Default)]
pub struct ScriptNode {
    pub statements: Vec<StatementNode>,
}

impl ScriptNode {
    pub fn new(statements: Vec<StatementNode>) -> Self {
        Self { statements }
    }
}

/// One top-level construct: a command list up to its terminator, a compound
/// command with everything nested inside it, or a standalone comment.
#[derive(Debug, Clone)]
pub struct StatementNode {
    /// Tokens in source order. `;` terminators are dropped, `&` is kept.
    pub tokens: Vec<Token>,
    /// At least one blank line separated this statement from the previous one
    pub blank_before: bool,
}

impl StatementNode {
    pub fn new(tokens: Vec<Token>, blank_before: bool) -> Self {
        Self {
            tokens,
            blank_before,
        }
    }
}
