//! Parser error types.

use serde::Serialize;

use crate::lexer::{Location, Span, TokenKind};

/// Broad category of a parse failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The input could not be tokenized.
    Lexical,
    /// The token stream does not match the grammar.
    Grammar,
    /// The construct exists but the active dialect does not accept it.
    Unsupported,
    /// Nesting went past the configured limit.
    DepthExceeded,
}

/// A parse error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseError {
    /// The failure category.
    pub kind: ErrorKind,
    /// The error message.
    pub message: String,
    /// The byte range of the offending input.
    pub span: Span,
    /// Line and column of `span.start`.
    pub location: Location,
    /// Expected tokens (if applicable).
    pub expected: Option<String>,
    /// Description of the token actually found.
    pub found: Option<String>,
    /// Grammar rules being parsed, outermost first.
    pub context: Vec<&'static str>,
}

impl ParseError {
    /// Creates a new parse error.
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            message: message.into(),
            span,
            location: Location::default(),
            expected: None,
            found: None,
            context: Vec::new(),
        }
    }

    /// Creates an "unexpected token" error.
    #[must_use]
    pub fn unexpected(expected: impl Into<String>, found: &TokenKind, span: Span) -> Self {
        let expected: String = expected.into();
        let found = found.describe();
        let mut error = Self::new(
            ErrorKind::Grammar,
            format!("expected {expected}, found {found}"),
            span,
        );
        error.expected = Some(expected);
        error.found = Some(found);
        error
    }

    /// Creates an error for a construct the dialect rejects.
    #[must_use]
    pub fn unsupported(what: &str, dialect: &str, span: Span) -> Self {
        Self::new(
            ErrorKind::Unsupported,
            format!("{what} is not supported by the {dialect} dialect"),
            span,
        )
    }

    /// Fills in the line/column from the source text.
    #[must_use]
    pub fn located(mut self, input: &str) -> Self {
        self.location = Location::of(input, self.span.start);
        self
    }

    /// Attaches the grammar-rule stack active when the error was raised.
    #[must_use]
    pub fn with_context(mut self, context: &[&'static str]) -> Self {
        if self.context.is_empty() {
            self.context = context.to_vec();
        }
        self
    }

    /// Returns the 1-based line of the error.
    #[must_use]
    pub const fn line(&self) -> usize {
        self.location.line
    }

    /// Returns the 1-based column of the error.
    #[must_use]
    pub const fn column(&self) -> usize {
        self.location.column
    }
}

impl core::fmt::Display for ParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} at {}", self.message, self.location)?;
        if let Some(rule) = self.context.last() {
            write!(f, " (in {rule})")?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}
