//! INSERT, UPDATE, DELETE and MERGE statements.

mod common;

use common::*;
use oxide_sql_tree::{DialectName, ErrorKind};
use serde_json::json;

#[test]
fn test_insert_single_row() {
    assert_eq!(
        parse("INSERT INTO t (a, b) VALUES (1, 'x')"),
        json!({"insert": "t", "columns": ["a", "b"], "values": [1, {"literal": "x"}]})
    );
}

#[test]
fn test_insert_many_rows() {
    assert_eq!(
        parse("INSERT INTO t VALUES (1), (2)"),
        json!({"insert": "t", "values": [[1], [2]]})
    );
}

#[test]
fn test_insert_query() {
    assert_eq!(
        parse("INSERT INTO t SELECT a FROM u"),
        json!({"insert": "t", "query": {"select": {"value": "a"}, "from": "u"}})
    );
    assert_eq!(
        parse("INSERT INTO t (a) (SELECT a FROM u)"),
        json!({
            "insert": "t",
            "columns": "a",
            "query": {"select": {"value": "a"}, "from": "u"},
        })
    );
}

#[test]
fn test_insert_modifiers() {
    assert_eq!(
        snowflake("INSERT OVERWRITE INTO t SELECT * FROM u"),
        json!({"insert": "t", "query": {"select": "*", "from": "u"}, "overwrite": true})
    );
    assert_eq!(
        mysql("INSERT IGNORE INTO t VALUES (1)"),
        json!({"insert": "t", "values": [1], "ignore": true})
    );
    assert_eq!(
        parse("INSERT INTO t DEFAULT VALUES"),
        json!({"insert": "t", "default_values": true})
    );
}

#[test]
fn test_insert_requires_into() {
    let error = parse_err("INSERT t VALUES (1)");
    assert_eq!(error.kind, ErrorKind::Grammar);
    assert_eq!(error.expected.as_deref(), Some("INTO"));
}

#[test]
fn test_update() {
    assert_eq!(
        parse("UPDATE t SET a = 1, b = 'x' WHERE id = 2"),
        json!({
            "update": "t",
            "set": {"a": 1, "b": {"literal": "x"}},
            "where": {"eq": ["id", 2]},
        })
    );
}

#[test]
fn test_update_from() {
    assert_eq!(
        parse("UPDATE t SET a = u.a FROM u WHERE t.id = u.id"),
        json!({
            "update": "t",
            "set": {"a": "u.a"},
            "from": "u",
            "where": {"eq": ["t.id", "u.id"]},
        })
    );
}

#[test]
fn test_update_duplicate_column() {
    let error = parse_err("UPDATE t SET a = 1, a = 2");
    assert_eq!(error.kind, ErrorKind::Grammar);
    assert!(error.message.contains("assigned more than once"));
}

#[test]
fn test_delete() {
    assert_eq!(
        parse("DELETE FROM t WHERE a = 1"),
        json!({"delete": "t", "where": {"eq": ["a", 1]}})
    );
}

#[test]
fn test_mysql_delete_modifiers() {
    assert_eq!(
        mysql("DELETE LOW_PRIORITY QUICK IGNORE FROM t WHERE a = 1 ORDER BY b LIMIT 10"),
        json!({
            "delete": "t",
            "where": {"eq": ["a", 1]},
            "orderby": {"value": "b"},
            "limit": 10,
            "low_priority": true,
            "quick": true,
            "ignore": true,
        })
    );
}

#[test]
fn test_mysql_multi_table_delete() {
    assert_eq!(
        mysql("DELETE t1, t2 FROM t1 INNER JOIN t2 ON t1.id = t2.id WHERE t1.a = 1"),
        json!({
            "delete": ["t1", "t2"],
            "from": ["t1", {"inner join": "t2", "on": {"eq": ["t1.id", "t2.id"]}}],
            "where": {"eq": ["t1.a", 1]},
        })
    );
    assert_eq!(
        mysql("DELETE FROM t1, t2 USING t1, t2 WHERE t1.id = t2.id"),
        json!({
            "delete": ["t1", "t2"],
            "from": ["t1", "t2"],
            "where": {"eq": ["t1.id", "t2.id"]},
        })
    );
}

#[test]
fn test_delete_extensions_are_gated() {
    let error = parse_err("DELETE FROM t ORDER BY a");
    assert_eq!(error.kind, ErrorKind::Unsupported);
    let error = parse_err("DELETE t1 FROM t1");
    assert_eq!(error.kind, ErrorKind::Unsupported);
}

#[test]
fn test_merge_clauses() {
    let sql = "MERGE INTO tgt t USING src s ON t.id = s.id \
               WHEN MATCHED AND s.deleted THEN DELETE \
               WHEN MATCHED THEN UPDATE SET t.v = s.v \
               WHEN NOT MATCHED THEN INSERT (id, v) VALUES (s.id, s.v);";
    assert_eq!(
        parse(sql),
        json!({
            "merge": [
                {"when": "matched", "condition": "s.deleted", "then": {"delete": {}}},
                {"when": "matched", "then": {"update": {"t.v": "s.v"}}},
                {
                    "when": "not_matched_by_target",
                    "then": {"insert": {}, "columns": ["id", "v"], "values": ["s.id", "s.v"]},
                },
            ],
            "target": {"name": "t", "value": "tgt"},
            "source": {"name": "s", "value": "src"},
            "on": {"eq": ["t.id", "s.id"]},
        })
    );
}

#[test]
fn test_merge_top_and_by_source() {
    assert_eq!(
        parse(
            "MERGE TOP (10) INTO tgt USING src ON tgt.id = src.id \
             WHEN NOT MATCHED BY SOURCE THEN DELETE"
        ),
        json!({
            "merge": {"when": "not_matched_by_source", "then": {"delete": {}}},
            "top": 10,
            "target": "tgt",
            "source": "src",
            "on": {"eq": ["tgt.id", "src.id"]},
        })
    );
}

#[test]
fn test_merge_action_must_fit_clause() {
    let error = parse_err(
        "MERGE INTO tgt USING src ON tgt.id = src.id WHEN MATCHED THEN INSERT VALUES (1)",
    );
    assert_eq!(error.kind, ErrorKind::Grammar);
    assert_eq!(error.context, vec!["MERGE", "WHEN clause"]);
}

#[test]
fn test_merge_is_gated() {
    let error = parse_err_in(
        DialectName::MySql,
        "MERGE INTO tgt USING src ON tgt.id = src.id WHEN MATCHED THEN DELETE",
    );
    assert_eq!(error.kind, ErrorKind::Unsupported);
}
