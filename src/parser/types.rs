//! Parser Types and Constants
//!
//! Shared types, interfaces, and constants used across parser modules.

use thiserror::Error;

use crate::parser::lexer::{LexerError, Token, TokenType};

// Parser limits to prevent hangs and resource exhaustion
pub const MAX_INPUT_SIZE: usize = 10_000_000; // 10MB max input
pub const MAX_TOKENS: usize = 1_000_000; // Max tokens to parse

/// Check if a token type is a redirection token
pub fn is_redirection_token(t: TokenType) -> bool {
    matches!(
        t,
        TokenType::Less
            | TokenType::Great
            | TokenType::DLess
            | TokenType::DGreat
            | TokenType::LessAnd
            | TokenType::GreatAnd
            | TokenType::LessGreat
            | TokenType::DLessDash
            | TokenType::Clobber
            | TokenType::TLess
            | TokenType::AndGreat
            | TokenType::AndDGreat
    )
}

/// Control operators: blanks around them carry no meaning.
pub fn is_separator_token(t: TokenType) -> bool {
    matches!(
        t,
        TokenType::Newline
            | TokenType::Semicolon
            | TokenType::Amp
            | TokenType::Pipe
            | TokenType::PipeAmp
            | TokenType::AndAnd
            | TokenType::OrOr
            | TokenType::DSemi
            | TokenType::SemiAnd
            | TokenType::SemiSemiAnd
            | TokenType::LParen
            | TokenType::RParen
    )
}

/// Tokens after which a new command may begin
pub fn starts_command_position(t: TokenType) -> bool {
    matches!(
        t,
        TokenType::Newline
            | TokenType::Semicolon
            | TokenType::Amp
            | TokenType::Pipe
            | TokenType::PipeAmp
            | TokenType::AndAnd
            | TokenType::OrOr
            | TokenType::Bang
            | TokenType::LParen
            | TokenType::RParen
            | TokenType::LBrace
            | TokenType::DSemi
            | TokenType::SemiAnd
            | TokenType::SemiSemiAnd
            | TokenType::If
            | TokenType::Then
            | TokenType::Else
            | TokenType::Elif
            | TokenType::While
            | TokenType::Until
            | TokenType::Do
            | TokenType::Time
    )
}

#[derive(Debug, Clone, Error)]
#[error("line {line}: {message}")]
pub struct ParseException {
    pub message: String,
    pub line: usize,
    pub column: usize,
}

impl ParseException {
    pub fn new(message: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            message: message.into(),
            line,
            column,
        }
    }

    pub fn at_token(message: impl Into<String>, token: &Token) -> Self {
        Self::new(message, token.line, token.column)
    }
}

impl From<LexerError> for ParseException {
    fn from(err: LexerError) -> Self {
        Self::new(err.message, err.line, err.column)
    }
}
