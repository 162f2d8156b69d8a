//! Error types for the public entry points.

use thiserror::Error;

use crate::parser::ParseError;

/// Invalid parser configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The dialect name is not recognized.
    #[error("unknown dialect: {0}")]
    UnknownDialect(String),

    /// The call style name is not recognized.
    #[error("unknown call style: {0}")]
    UnknownCallStyle(String),

    /// The nesting limit must allow at least one level.
    #[error("invalid max depth: {0}")]
    InvalidMaxDepth(usize),
}

/// Errors returned by [`crate::parse`] and friends.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The options were rejected before parsing started.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The SQL text could not be parsed.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
}

impl Error {
    /// Returns the parse error, if this is one.
    #[must_use]
    pub const fn as_parse_error(&self) -> Option<&ParseError> {
        match self {
            Self::Parse(error) => Some(error),
            Self::Config(_) => None,
        }
    }
}

/// Result type alias for parsing operations.
pub type Result<T> = std::result::Result<T, Error>;
