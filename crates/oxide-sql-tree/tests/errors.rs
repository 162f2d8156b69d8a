//! Failure reporting: dialect gating, lexical and grammar errors, nesting
//! limits and configuration.

mod common;

use common::*;
use oxide_sql_tree::{
    parse_many, CallStyle, ConfigError, DialectName, Error, ErrorKind, ParseOptions,
};
use serde_json::json;

#[test]
fn test_qualify_is_gated() {
    let error = parse_err("SELECT a FROM t QUALIFY a = 1");
    assert_eq!(error.kind, ErrorKind::Unsupported);
    assert!(error.message.contains("QUALIFY"));
    assert_eq!(error.context, vec!["SELECT"]);
    assert_eq!((error.line(), error.column()), (1, 17));

    let error = parse_err_in(DialectName::MySql, "SELECT a FROM t QUALIFY a = 1");
    assert_eq!(error.kind, ErrorKind::Unsupported);
}

#[test]
fn test_dialect_gated_constructs() {
    let cases = [
        (DialectName::Ansi, "SELECT a FROM t1 MINUS SELECT a FROM t2"),
        (DialectName::Ansi, "SELECT a:b FROM t"),
        (DialectName::Ansi, "SELECT f(a => 1)"),
        (DialectName::Ansi, "SELECT TOP 5 a FROM t"),
        (DialectName::MySql, "SELECT a::int FROM t"),
        (DialectName::MySql, "SELECT * FROM t PIVOT (sum(a) FOR b IN (1, 2))"),
        (DialectName::SqlServer, "SELECT a FROM t LIMIT 1"),
        (DialectName::Snowflake, "SELECT * FROM t LATERAL VIEW explode(a) x"),
        (DialectName::Ansi, "SELECT a ^ b FROM t"),
        (DialectName::Snowflake, "SELECT a ^ b FROM t"),
    ];
    for (dialect, sql) in cases {
        let error = parse_err_in(dialect, sql);
        assert_eq!(error.kind, ErrorKind::Unsupported, "{dialect}: {sql}");
    }
}

#[test]
fn test_lexical_errors() {
    let error = parse_err("SELECT 'abc");
    assert_eq!(error.kind, ErrorKind::Lexical);
    assert_eq!(error.message, "unterminated string literal");

    let error = parse_err("SELECT `x` FROM t");
    assert_eq!(error.kind, ErrorKind::Lexical);

    let error = parse_err_in(DialectName::BigQuery, "SELECT 'a\nb'");
    assert_eq!(error.kind, ErrorKind::Lexical);
}

#[test]
fn test_grammar_error_location() {
    let error = parse_err("SELECT a,\n  FROM t");
    assert_eq!(error.kind, ErrorKind::Grammar);
    assert_eq!((error.line(), error.column()), (2, 3));
    assert_eq!(error.expected.as_deref(), Some("expression"));
    assert_eq!(error.context, vec!["SELECT", "select list"]);
}

#[test]
fn test_misplaced_clause() {
    let error = parse_err("SELECT a FROM t LIMIT 1 WHERE a = 1");
    assert_eq!(error.kind, ErrorKind::Grammar);
    assert_eq!(error.message, "unexpected WHERE clause");
}

#[test]
fn test_unknown_statement() {
    let error = parse_err("FOO bar");
    assert_eq!(error.kind, ErrorKind::Grammar);
    assert_eq!(error.expected.as_deref(), Some("a statement"));
}

#[test]
fn test_nesting_limit() {
    let deep = format!("SELECT {}1{}", "(".repeat(150), ")".repeat(150));
    let error = parse_err(&deep);
    assert_eq!(error.kind, ErrorKind::DepthExceeded);

    let sql = format!("SELECT {}1{}", "(".repeat(12), ")".repeat(12));
    assert_eq!(parse(&sql), json!({"select": {"value": 1}}));

    let options = ParseOptions::default().with_max_depth(10);
    let error = oxide_sql_tree::parse(&sql, &options).unwrap_err();
    assert_eq!(
        error.as_parse_error().map(|error| error.kind),
        Some(ErrorKind::DepthExceeded)
    );
}

#[test]
fn test_left_nested_operators_count_toward_depth() {
    let sql = format!("SELECT 1{}", " - 1".repeat(20));
    let options = ParseOptions::default().with_max_depth(10);
    let error = oxide_sql_tree::parse(&sql, &options).unwrap_err();
    assert_eq!(
        error.as_parse_error().map(|error| error.kind),
        Some(ErrorKind::DepthExceeded)
    );
    // The same chain fits under the default limit.
    assert!(parse(&sql)["select"]["value"]["sub"].is_array());
}

#[test]
fn test_chained_explain_is_depth_limited() {
    let sql = format!("{}SELECT 1", "EXPLAIN ".repeat(100_000));
    assert_eq!(parse_err(&sql).kind, ErrorKind::DepthExceeded);

    let sql = format!("{}SELECT 1", "EXPLAIN ".repeat(3));
    assert_eq!(
        parse(&sql),
        json!({"explain": {"explain": {"explain": {"select": {"value": 1}}}}})
    );
}

#[test]
fn test_chained_lateral_is_depth_limited() {
    let sql = format!("SELECT * FROM {}t", "LATERAL ".repeat(100_000));
    assert_eq!(parse_err(&sql).kind, ErrorKind::DepthExceeded);
}

#[test]
fn test_nested_copy_groups_are_depth_limited() {
    let sql = format!(
        "COPY INTO t FROM @s FILE_FORMAT = {}1{}",
        "(x = ".repeat(200),
        ")".repeat(200)
    );
    let error = parse_err_in(DialectName::Snowflake, &sql);
    assert_eq!(error.kind, ErrorKind::DepthExceeded);
}

#[test]
fn test_default_depth_fits_a_small_stack() {
    let calls = |levels: usize| {
        format!("SELECT {}1{}", "f(".repeat(levels), ")".repeat(levels))
    };
    let windows = |levels: usize| {
        (0..levels).fold("1".to_string(), |inner, _| format!("f({inner}) OVER ()"))
    };
    let outcome = std::thread::Builder::new()
        .stack_size(1 << 20)
        .spawn(move || {
            let options = ParseOptions::default();
            (
                oxide_sql_tree::parse(&calls(95), &options).is_ok(),
                oxide_sql_tree::parse(&format!("SELECT {}", windows(95)), &options).is_ok(),
                oxide_sql_tree::parse(&calls(150), &options)
                    .unwrap_err()
                    .as_parse_error()
                    .map(|error| error.kind),
            )
        })
        .unwrap()
        .join()
        .unwrap();
    assert_eq!(outcome, (true, true, Some(ErrorKind::DepthExceeded)));
}

#[test]
fn test_repeated_named_argument() {
    let error = parse_err_in(DialectName::Snowflake, "SELECT f(a => 1, a => 2)");
    assert_eq!(error.kind, ErrorKind::Grammar);
    assert_eq!(error.message, "argument a of f is given more than once");
    assert_eq!(error.column(), 18);

    let error = parse_err_in(DialectName::Snowflake, "SELECT f(f => 1, 2)");
    assert_eq!(error.kind, ErrorKind::Grammar);
    assert!(error.message.contains("argument f of f"));

    let error = parse_err_in(DialectName::Snowflake, "SELECT count(DISTINCT x, distinct => 2)");
    assert_eq!(error.kind, ErrorKind::Grammar);

    assert_eq!(
        snowflake("SELECT f(a => 1, b => 2)"),
        json!({"select": {"value": {"f": {}, "a": 1, "b": 2}}})
    );
}

#[test]
fn test_repeated_copy_option() {
    let error = parse_err_in(
        DialectName::Snowflake,
        "COPY INTO t FROM @s FORCE=TRUE FORCE=FALSE",
    );
    assert_eq!(error.kind, ErrorKind::Grammar);
    assert_eq!(error.message, "COPY option FORCE is given more than once");
    assert_eq!(error.column(), 32);

    let error = parse_err_in(
        DialectName::Snowflake,
        "COPY INTO t FROM @s FILE_FORMAT = (TYPE = CSV TYPE = JSON)",
    );
    assert_eq!(error.kind, ErrorKind::Grammar);
    assert!(error.message.contains("TYPE"));
}

#[test]
fn test_malformed_numbers() {
    let error = parse_err("SELECT 1e999");
    assert_eq!(error.kind, ErrorKind::Lexical);
    assert_eq!(error.message, "number 1e999 is out of range");

    let error = parse_err("SELECT 0x1F");
    assert_eq!(error.kind, ErrorKind::Lexical);
    assert_eq!(error.message, "invalid number 0x1F");
}

#[test]
fn test_configuration_errors() {
    let options = ParseOptions::default().with_max_depth(0);
    assert_eq!(
        oxide_sql_tree::parse("SELECT 1", &options),
        Err(Error::Config(ConfigError::InvalidMaxDepth(0)))
    );
    assert_eq!(
        ParseOptions::from_names("oracle", "nested"),
        Err(ConfigError::UnknownDialect("oracle".to_string()))
    );
    let options = ParseOptions::from_names("mssql", "normal_op").unwrap();
    assert_eq!(options.dialect, DialectName::SqlServer);
    assert_eq!(options.call_style, CallStyle::Normalized);
}

#[test]
fn test_error_display_and_serialization() {
    let error = oxide_sql_tree::parse("SELECT a FROM t QUALIFY a = 1", &ParseOptions::default())
        .unwrap_err();
    assert!(error.to_string().starts_with("parse error: QUALIFY clause"));

    let failure = parse_err("SELECT a FROM t QUALIFY a = 1");
    let value = serde_json::to_value(&failure).unwrap();
    assert_eq!(value["kind"], json!("unsupported"));
    assert_eq!(value["location"], json!({"line": 1, "column": 17}));
}

#[test]
fn test_parse_many_stops_at_first_error() {
    let options = ParseOptions::default();
    let trees = parse_many("SELECT 1;; SELECT a FROM t;", &options).unwrap();
    assert_eq!(
        trees,
        vec![
            json!({"select": {"value": 1}}),
            json!({"select": {"value": "a"}, "from": "t"}),
        ]
    );
    let error = parse_many("SELECT 1; SELECT FROM t", &options).unwrap_err();
    assert_eq!(error.as_parse_error().map(|error| error.kind), Some(ErrorKind::Grammar));
}

#[test]
fn test_parsing_is_deterministic_across_threads() {
    let sql = "SELECT a, count(*) FROM t WHERE b IN ('x', 'y') GROUP BY a";
    let expected = parse(sql);
    let options = ParseOptions::default();
    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| oxide_sql_tree::parse(sql, &options)))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap().unwrap(), expected);
        }
    });
}
