//! SQL Lexer/Tokenizer
//!
//! This module provides a hand-written, dialect-aware lexer for SQL that
//! produces a stream of tokens.

mod span;
mod token;
mod tokenizer;

pub use span::{Location, Span};
pub use token::{Keyword, Token, TokenKind, Word};
pub use tokenizer::Lexer;
