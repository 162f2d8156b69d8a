//! # oxide-sql-tree
//!
//! A dialect-aware SQL parser that produces a canonical, JSON-shaped syntax
//! tree.
//!
//! This crate provides:
//! - A hand-written recursive descent parser with Pratt expression parsing
//! - Dialects as data: ANSI, MySQL, Snowflake, SQL Server and BigQuery
//! - A normalizer rendering statements as [`serde_json::Value`] trees, with
//!   function calls either nested by name or in a uniform `op` shape
//!
//! ## Parsing
//!
//! ```rust
//! use oxide_sql_tree::{parse, DialectName, ParseOptions};
//! use serde_json::json;
//!
//! let options = ParseOptions::default().with_dialect(DialectName::MySql);
//! let tree = parse("SELECT * FROM t1 LIMIT 1, 10", &options).unwrap();
//! assert_eq!(
//!     tree,
//!     json!({"select": "*", "from": "t1", "offset": 1, "limit": 10})
//! );
//! ```
//!
//! ## Failures
//!
//! A failed parse carries the position, the grammar context and the
//! expected input:
//!
//! ```rust
//! use oxide_sql_tree::{parse, ErrorKind, ParseOptions};
//!
//! let error = parse("SELECT a FROM t QUALIFY a = 1", &ParseOptions::default()).unwrap_err();
//! let failure = error.as_parse_error().unwrap();
//! assert_eq!(failure.kind, ErrorKind::Unsupported);
//! assert_eq!(failure.line(), 1);
//! ```

pub mod ast;
pub mod dialect;
pub mod error;
pub mod lexer;
pub mod normalize;
pub mod options;
pub mod parser;

use serde_json::Value;
use tracing::debug;

pub use ast::{Expr, Statement};
pub use dialect::{Dialect, DialectName, Feature};
pub use error::{ConfigError, Error, Result};
pub use lexer::{Lexer, Token, TokenKind};
pub use normalize::Normalizer;
pub use options::{CallStyle, ParseOptions};
pub use parser::{ErrorKind, ParseError, Parser};

/// Parses one SQL statement, with an optional trailing `;`, into its
/// canonical tree.
///
/// # Errors
///
/// Returns [`Error::Config`] if the options are invalid and
/// [`Error::Parse`] if the text is not a valid statement in the selected
/// dialect.
pub fn parse(sql: &str, options: &ParseOptions) -> Result<Value> {
    options.validate()?;
    let mut parser = new_parser(sql, options)?;
    let statement = parser.parse_statement().map_err(|error| failed(error, options))?;
    let tree = Normalizer::new(options.call_style).statement(&statement);
    debug!(dialect = %options.dialect, "parsed statement");
    Ok(tree)
}

/// Parses `;`-separated statements into a list of canonical trees.
///
/// # Errors
///
/// Returns the first error encountered; no partial result is produced.
pub fn parse_many(sql: &str, options: &ParseOptions) -> Result<Vec<Value>> {
    options.validate()?;
    let mut parser = new_parser(sql, options)?;
    let statements = parser
        .parse_statements()
        .map_err(|error| failed(error, options))?;
    let normalizer = Normalizer::new(options.call_style);
    let trees = statements
        .iter()
        .map(|statement| normalizer.statement(statement))
        .collect::<Vec<_>>();
    debug!(dialect = %options.dialect, count = trees.len(), "parsed statements");
    Ok(trees)
}

/// Parses one statement into the raw syntax tree, before normalization.
///
/// # Errors
///
/// Same as [`parse`].
pub fn parse_statement(sql: &str, options: &ParseOptions) -> Result<Statement> {
    options.validate()?;
    let mut parser = new_parser(sql, options)?;
    Ok(parser.parse_statement().map_err(|error| failed(error, options))?)
}

fn new_parser<'a>(sql: &'a str, options: &ParseOptions) -> Result<Parser<'a>> {
    let dialect = Dialect::get(options.dialect);
    let parser = Parser::new(sql, dialect)
        .map_err(|error| failed(error, options))?
        .with_max_depth(options.max_depth);
    debug!(
        dialect = %options.dialect,
        call_style = %options.call_style,
        tokens = parser.token_count(),
        "parsing"
    );
    Ok(parser)
}

fn failed(error: ParseError, options: &ParseOptions) -> ParseError {
    debug!(
        dialect = %options.dialect,
        kind = ?error.kind,
        line = error.line(),
        column = error.column(),
        context = ?error.context,
        "parse failed: {}",
        error.message
    );
    error
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_parse_defaults() {
        let tree = parse("SELECT a FROM t", &ParseOptions::default()).unwrap();
        assert_eq!(tree, json!({"select": {"value": "a"}, "from": "t"}));
    }

    #[test]
    fn test_invalid_depth_is_config_error() {
        let options = ParseOptions::default().with_max_depth(0);
        let error = parse("SELECT 1", &options).unwrap_err();
        assert_eq!(error, Error::Config(ConfigError::InvalidMaxDepth(0)));
    }

    #[test]
    fn test_parse_many() {
        let trees = parse_many("SELECT 1; SELECT 2;", &ParseOptions::default()).unwrap();
        assert_eq!(
            trees,
            vec![json!({"select": {"value": 1}}), json!({"select": {"value": 2}})]
        );
    }

    #[test]
    fn test_raw_statement() {
        let statement = parse_statement("SELECT 1", &ParseOptions::default()).unwrap();
        assert!(matches!(statement, Statement::Query(_)));
    }
}
