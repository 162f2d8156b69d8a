//! Parser configuration.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::dialect::DialectName;
use crate::error::ConfigError;

/// Default limit on expression and subquery nesting.
pub const DEFAULT_MAX_DEPTH: usize = 100;

/// How operator and function applications appear in the output tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallStyle {
    /// `{"add": [a, b]}`, with keyword arguments as sibling keys.
    #[default]
    Nested,
    /// `{"op": "add", "args": [a, b], "kwargs": {..}}`.
    Normalized,
}

impl CallStyle {
    /// Returns the lower-case name used in configuration.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Nested => "nested",
            Self::Normalized => "normalized",
        }
    }
}

impl fmt::Display for CallStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CallStyle {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "nested" => Ok(Self::Nested),
            "normalized" | "normal" | "normal_op" => Ok(Self::Normalized),
            _ => Err(ConfigError::UnknownCallStyle(s.to_string())),
        }
    }
}

/// Options for a single parse call.
///
/// Options are plain data; nothing is cached between calls, so the same
/// value can be shared freely across threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Dialect governing lexing and grammar.
    pub dialect: DialectName,
    /// Output shape for calls.
    pub call_style: CallStyle,
    /// Maximum nesting of expressions and subqueries.
    pub max_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            dialect: DialectName::default(),
            call_style: CallStyle::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ParseOptions {
    /// Creates options for a dialect and call style with the default depth.
    #[must_use]
    pub fn new(dialect: DialectName, call_style: CallStyle) -> Self {
        Self {
            dialect,
            call_style,
            ..Self::default()
        }
    }

    /// Builds options from configuration names such as `"mysql"` and
    /// `"nested"`.
    ///
    /// # Errors
    ///
    /// Returns an error if either name is not recognized.
    pub fn from_names(dialect: &str, call_style: &str) -> Result<Self, ConfigError> {
        Ok(Self::new(dialect.parse()?, call_style.parse()?))
    }

    /// Sets the dialect.
    #[must_use]
    pub const fn with_dialect(mut self, dialect: DialectName) -> Self {
        self.dialect = dialect;
        self
    }

    /// Sets the call style.
    #[must_use]
    pub const fn with_call_style(mut self, call_style: CallStyle) -> Self {
        self.call_style = call_style;
        self
    }

    /// Sets the nesting limit.
    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Checks that the options can be used.
    ///
    /// # Errors
    ///
    /// Returns an error if `max_depth` is zero.
    pub const fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth == 0 {
            return Err(ConfigError::InvalidMaxDepth(self.max_depth));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ParseOptions::default();
        assert_eq!(options.dialect, DialectName::Ansi);
        assert_eq!(options.call_style, CallStyle::Nested);
        assert_eq!(options.max_depth, DEFAULT_MAX_DEPTH);
        assert_eq!(options.validate(), Ok(()));
    }

    #[test]
    fn test_from_names() {
        let options = ParseOptions::from_names("Snowflake", "normalized").unwrap();
        assert_eq!(options.dialect, DialectName::Snowflake);
        assert_eq!(options.call_style, CallStyle::Normalized);
        assert_eq!(
            ParseOptions::from_names("mysql", "flat"),
            Err(ConfigError::UnknownCallStyle("flat".to_string()))
        );
    }

    #[test]
    fn test_zero_depth_rejected() {
        let options = ParseOptions::default().with_max_depth(0);
        assert_eq!(options.validate(), Err(ConfigError::InvalidMaxDepth(0)));
    }

    #[test]
    fn test_deserialize_partial() {
        let options: ParseOptions = serde_json::from_str(r#"{"dialect": "mysql"}"#).unwrap();
        assert_eq!(options.dialect, DialectName::MySql);
        assert_eq!(options.max_depth, DEFAULT_MAX_DEPTH);
    }
}
