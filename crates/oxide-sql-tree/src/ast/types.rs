//! SQL data type definitions.

use super::expression::Expr;

/// A data type as written in a cast or column definition.
///
/// Types are kept open-ended: the name is whatever the source spelled
/// (lower-cased, multi-word names joined with `_`), and the parameters are
/// the parenthesized arguments, if any.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DataType {
    /// Lower-cased type name (e.g., `varchar`, `character_varying`).
    pub name: String,
    /// Parenthesized parameters (e.g., length, precision and scale).
    pub params: Vec<Expr>,
    /// MySQL `UNSIGNED`.
    pub unsigned: bool,
    /// MySQL `ZEROFILL`.
    pub zerofill: bool,
}

impl DataType {
    /// Creates a parameterless type.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Creates a type with parameters.
    #[must_use]
    pub fn with_params(name: impl Into<String>, params: Vec<Expr>) -> Self {
        Self {
            name: name.into(),
            params,
            ..Self::default()
        }
    }
}
