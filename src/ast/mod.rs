//! Syntax Tree Types for Bash
//!
//! Architecture:
//!   Input → Lexer → Parser → ScriptNode → Printer → Output

pub mod types;
