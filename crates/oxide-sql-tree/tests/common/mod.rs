#![allow(dead_code)]

use std::sync::Once;

use oxide_sql_tree::{CallStyle, DialectName, ParseError, ParseOptions};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

static TRACING: Once = Once::new();

/// Routes parser logs to the test output; filter with `RUST_LOG`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

pub fn options(dialect: DialectName) -> ParseOptions {
    init_tracing();
    ParseOptions::default().with_dialect(dialect)
}

pub fn parse_in(dialect: DialectName, sql: &str) -> Value {
    oxide_sql_tree::parse(sql, &options(dialect))
        .unwrap_or_else(|e| panic!("Failed to parse: {sql}\nError: {e}"))
}

pub fn parse(sql: &str) -> Value {
    parse_in(DialectName::Ansi, sql)
}

pub fn mysql(sql: &str) -> Value {
    parse_in(DialectName::MySql, sql)
}

pub fn snowflake(sql: &str) -> Value {
    parse_in(DialectName::Snowflake, sql)
}

pub fn normalized(dialect: DialectName, sql: &str) -> Value {
    let options = options(dialect).with_call_style(CallStyle::Normalized);
    oxide_sql_tree::parse(sql, &options)
        .unwrap_or_else(|e| panic!("Failed to parse: {sql}\nError: {e}"))
}

pub fn parse_err_in(dialect: DialectName, sql: &str) -> ParseError {
    match oxide_sql_tree::parse(sql, &options(dialect)) {
        Ok(tree) => panic!("Expected parse error for: {sql}\nGot: {tree}"),
        Err(error) => error
            .as_parse_error()
            .cloned()
            .unwrap_or_else(|| panic!("Expected parse error for: {sql}\nGot: {error}")),
    }
}

pub fn parse_err(sql: &str) -> ParseError {
    parse_err_in(DialectName::Ansi, sql)
}
