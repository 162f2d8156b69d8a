//! SQL Parser
//!
//! A hand-written recursive descent parser with Pratt expression parsing.
//! Operator binding powers and optional syntax come from the active
//! [`crate::dialect::Dialect`].

mod command;
mod ddl;
mod dml;
mod error;
mod expression;
mod parser;
mod pratt;
mod query;

pub use error::{ErrorKind, ParseError};
pub use parser::Parser;
