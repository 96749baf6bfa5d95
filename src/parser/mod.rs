//! Parser module for bash scripts
//!
//! This module contains the lexer and the statement parser.

pub mod lexer;
#[allow(clippy::module_inception)]
pub mod parser;
pub mod types;

// Re-exports
pub use lexer::{Lexer, LexerError, Token, TokenType};
pub use parser::{parse, parse_script, ParseOptions, Parser};
pub use types::ParseException;
