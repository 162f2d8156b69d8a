//! DML grammar: INSERT, UPDATE, DELETE and MERGE.

use super::error::{ErrorKind, ParseError};
use super::parser::Parser;
use crate::ast::{
    Assignment, DeleteStatement, Expr, InsertSource, InsertStatement, MergeAction, MergeClause,
    MergeMatch, MergeStatement, Statement, TableRef, UpdateStatement,
};
use crate::dialect::Feature;
use crate::lexer::{Keyword, TokenKind};

impl Parser<'_> {
    /// `INSERT [IGNORE] [OVERWRITE] [INTO] table [(columns)] source`
    pub(super) fn parse_insert(&mut self) -> Result<Statement, ParseError> {
        self.expect_keyword(Keyword::Insert)?;
        let ignore = self.consume_keyword(Keyword::Ignore);
        let overwrite = self.consume_keyword(Keyword::Overwrite);
        if !self.consume_keyword(Keyword::Into) && !overwrite {
            return Err(self.expected("INTO"));
        }
        let table = self.parse_object_name()?;
        let columns = if self.check(&TokenKind::LeftParen) && !self.parenthesized_query_follows() {
            self.parse_identifier_list()?
        } else {
            Vec::new()
        };

        let source = if self.consume_keyword(Keyword::Values) {
            InsertSource::Values(self.parse_value_rows()?)
        } else if self.consume_keywords(&[Keyword::Default, Keyword::Values]) {
            InsertSource::DefaultValues
        } else if self.starts_query() || self.check(&TokenKind::LeftParen) {
            InsertSource::Query(Box::new(self.parse_query()?))
        } else {
            return Err(self.expected("VALUES or a query"));
        };

        Ok(Statement::Insert(InsertStatement {
            table,
            columns,
            source,
            ignore,
            overwrite,
        }))
    }

    /// Returns true at `(` directly followed by SELECT or WITH.
    fn parenthesized_query_follows(&self) -> bool {
        self.peek_keyword(1, Keyword::Select) || self.peek_keyword(1, Keyword::With)
    }

    /// Parses `(a, b), (c, d)`.
    fn parse_value_rows(&mut self) -> Result<Vec<Vec<Expr>>, ParseError> {
        let mut rows = Vec::new();
        loop {
            self.expect(&TokenKind::LeftParen)?;
            rows.push(self.parse_expr_list()?);
            self.expect(&TokenKind::RightParen)?;
            if !self.consume(&TokenKind::Comma) {
                return Ok(rows);
            }
        }
    }

    /// `UPDATE table SET col = value, ... [FROM items] [WHERE cond]`
    pub(super) fn parse_update(&mut self) -> Result<Statement, ParseError> {
        self.expect_keyword(Keyword::Update)?;
        let table = self.parse_table_factor()?;
        self.expect_keyword(Keyword::Set)?;
        let assignments = self.parse_assignments()?;
        let from = if self.consume_keyword(Keyword::From) {
            self.parse_from_list()?
        } else {
            Vec::new()
        };
        let where_clause = if self.consume_keyword(Keyword::Where) {
            Some(self.parse_expr()?)
        } else {
            None
        };
        Ok(Statement::Update(UpdateStatement {
            table,
            assignments,
            from,
            where_clause,
        }))
    }

    /// Parses `col = value, ...`, rejecting a column assigned twice.
    fn parse_assignments(&mut self) -> Result<Vec<Assignment>, ParseError> {
        let mut assignments: Vec<Assignment> = Vec::new();
        loop {
            let start = self.current().span;
            let column = self.parse_object_name()?;
            if assignments.iter().any(|a| a.column == column) {
                return Err(ParseError::new(
                    ErrorKind::Grammar,
                    format!("column {column} is assigned more than once"),
                    start,
                ));
            }
            self.expect(&TokenKind::Eq)?;
            let value = self.parse_expr()?;
            assignments.push(Assignment { column, value });
            if !self.consume(&TokenKind::Comma) {
                return Ok(assignments);
            }
        }
    }

    /// DELETE, with the MySQL modifiers, multi-table forms, ORDER BY and
    /// LIMIT where the dialect allows them.
    pub(super) fn parse_delete(&mut self) -> Result<Statement, ParseError> {
        self.expect_keyword(Keyword::Delete)?;
        let mut delete = DeleteStatement::default();
        loop {
            if self.consume_keyword(Keyword::LowPriority) {
                delete.low_priority = true;
            } else if self.consume_keyword(Keyword::Quick) {
                delete.quick = true;
            } else if self.consume_keyword(Keyword::Ignore) {
                delete.ignore = true;
            } else {
                break;
            }
        }
        if delete.low_priority || delete.quick || delete.ignore {
            self.require(Feature::DeleteExtensions)?;
        }

        if self.consume_keyword(Keyword::From) {
            delete.targets = self.parse_delete_targets()?;
            if self.consume_keyword(Keyword::Using) {
                delete.from = self.parse_from_list()?;
            } else if delete.targets.len() > 1 {
                return Err(self.expected("USING"));
            }
        } else {
            // DELETE t1, t2 FROM ...
            self.require(Feature::DeleteExtensions)?;
            delete.targets = self.parse_delete_targets()?;
            self.expect_keyword(Keyword::From)?;
            delete.from = self.parse_from_list()?;
        }

        if self.consume_keyword(Keyword::Where) {
            delete.where_clause = Some(self.parse_expr()?);
        }
        if self.check_keyword(Keyword::Order) {
            self.require(Feature::DeleteExtensions)?;
            self.expect_keyword(Keyword::Order)?;
            self.expect_keyword(Keyword::By)?;
            delete.order_by = self.parse_order_by_list()?;
        }
        if self.check_keyword(Keyword::Limit) {
            self.require(Feature::DeleteExtensions)?;
            self.advance();
            delete.limit = Some(self.parse_expr()?);
        }
        Ok(Statement::Delete(delete))
    }

    fn parse_delete_targets(&mut self) -> Result<Vec<TableRef>, ParseError> {
        let mut targets = vec![self.parse_table_factor()?];
        while self.consume(&TokenKind::Comma) {
            targets.push(self.parse_table_factor()?);
        }
        Ok(targets)
    }

    /// `MERGE [TOP (n) [PERCENT]] [INTO] target USING source ON cond
    /// WHEN ... THEN ...`
    pub(super) fn parse_merge(&mut self) -> Result<Statement, ParseError> {
        self.expect_keyword(Keyword::Merge)?;
        let top = if self.check_keyword(Keyword::Top) {
            Some(self.parse_top()?)
        } else {
            None
        };
        self.consume_keyword(Keyword::Into);
        let target = self.parse_table_factor()?;
        self.expect_keyword(Keyword::Using)?;
        let source = self.parse_table_factor()?;
        self.expect_keyword(Keyword::On)?;
        let on = self.parse_expr()?;

        let mut clauses = Vec::new();
        while self.check_keyword(Keyword::When) {
            clauses.push(self.with_context("WHEN clause", Self::parse_merge_clause)?);
        }
        if clauses.is_empty() {
            return Err(self.expected("WHEN"));
        }
        Ok(Statement::Merge(MergeStatement {
            top,
            target,
            source,
            on,
            clauses,
        }))
    }

    fn parse_merge_clause(&mut self) -> Result<MergeClause, ParseError> {
        self.expect_keyword(Keyword::When)?;
        let kind = if self.consume_keyword(Keyword::Not) {
            self.expect_keyword(Keyword::Matched)?;
            if self.consume_keywords(&[Keyword::By, Keyword::Source]) {
                MergeMatch::NotMatchedBySource
            } else {
                self.consume_keywords(&[Keyword::By, Keyword::Target]);
                MergeMatch::NotMatchedByTarget
            }
        } else {
            self.expect_keyword(Keyword::Matched)?;
            MergeMatch::Matched
        };
        let condition = if self.consume_keyword(Keyword::And) {
            Some(self.parse_expr()?)
        } else {
            None
        };
        self.expect_keyword(Keyword::Then)?;

        let action = if self.consume_keyword(Keyword::Update) {
            self.expect_keyword(Keyword::Set)?;
            MergeAction::Update(self.parse_assignments()?)
        } else if self.consume_keyword(Keyword::Delete) {
            MergeAction::Delete
        } else if self.consume_keyword(Keyword::Insert) {
            let columns = if self.check(&TokenKind::LeftParen) {
                self.parse_identifier_list()?
            } else {
                Vec::new()
            };
            self.expect_keyword(Keyword::Values)?;
            self.expect(&TokenKind::LeftParen)?;
            let values = self.parse_expr_list()?;
            self.expect(&TokenKind::RightParen)?;
            MergeAction::Insert { columns, values }
        } else {
            return Err(self.expected("UPDATE, DELETE or INSERT"));
        };

        if matches!(kind, MergeMatch::NotMatchedByTarget)
            != matches!(action, MergeAction::Insert { .. })
        {
            return Err(self.error(format!(
                "WHEN {} clauses cannot use this action",
                kind.name().replace('_', " ").to_uppercase()
            )));
        }
        Ok(MergeClause {
            kind,
            condition,
            action,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::ObjectName;
    use crate::dialect::{Dialect, ANSI, MYSQL, SNOWFLAKE};

    fn parse(dialect: &'static Dialect, sql: &str) -> Result<Statement, ParseError> {
        Parser::new(sql, dialect)?.parse_statement()
    }

    #[test]
    fn test_insert_values() {
        let Statement::Insert(insert) =
            parse(&ANSI, "INSERT INTO t (a, b) VALUES (1, 2), (3, 4)").unwrap()
        else {
            panic!("expected insert");
        };
        assert_eq!(insert.columns, vec!["a".to_string(), "b".to_string()]);
        assert!(matches!(&insert.source, InsertSource::Values(rows) if rows.len() == 2));
    }

    #[test]
    fn test_insert_query() {
        let Statement::Insert(insert) = parse(&ANSI, "INSERT INTO t SELECT * FROM u").unwrap()
        else {
            panic!("expected insert");
        };
        assert!(matches!(insert.source, InsertSource::Query(_)));
        let Statement::Insert(insert) = parse(&ANSI, "INSERT INTO t (SELECT 1)").unwrap() else {
            panic!("expected insert");
        };
        assert!(insert.columns.is_empty());
    }

    #[test]
    fn test_update_duplicate_column() {
        assert!(parse(&ANSI, "UPDATE t SET a = 1, b = 2 WHERE c = 3").is_ok());
        let error = parse(&ANSI, "UPDATE t SET a = 1, a = 2").unwrap_err();
        assert_eq!(error.kind, ErrorKind::Grammar);
        assert!(error.message.contains("more than once"));
    }

    #[test]
    fn test_delete_forms() {
        let Statement::Delete(delete) =
            parse(&MYSQL, "DELETE LOW_PRIORITY QUICK FROM a ORDER BY b LIMIT 1").unwrap()
        else {
            panic!("expected delete");
        };
        assert!(delete.low_priority && delete.quick);
        assert_eq!(delete.limit, Some(Expr::integer(1)));

        let Statement::Delete(delete) =
            parse(&MYSQL, "DELETE t1 FROM table1 t1 WHERE t1.a = 1").unwrap()
        else {
            panic!("expected delete");
        };
        assert_eq!(
            delete.targets,
            vec![TableRef::table(ObjectName::simple("t1"))]
        );
        assert_eq!(delete.from.len(), 1);
    }

    #[test]
    fn test_delete_extensions_are_gated() {
        assert_eq!(
            parse(&ANSI, "DELETE FROM a LIMIT 1").unwrap_err().kind,
            ErrorKind::Unsupported
        );
        assert_eq!(
            parse(&ANSI, "DELETE t1 FROM t1").unwrap_err().kind,
            ErrorKind::Unsupported
        );
    }

    #[test]
    fn test_merge() {
        let Statement::Merge(merge) = parse(
            &SNOWFLAKE,
            "MERGE INTO t USING s ON t.id = s.id \
             WHEN MATCHED AND s.del THEN DELETE \
             WHEN MATCHED THEN UPDATE SET t.v = s.v \
             WHEN NOT MATCHED THEN INSERT (id, v) VALUES (s.id, s.v)",
        )
        .unwrap() else {
            panic!("expected merge");
        };
        assert_eq!(merge.clauses.len(), 3);
        assert!(merge.clauses[0].condition.is_some());
        assert_eq!(merge.clauses[2].kind, MergeMatch::NotMatchedByTarget);
    }

    #[test]
    fn test_merge_rejects_insert_when_matched() {
        let error = parse(
            &ANSI,
            "MERGE INTO t USING s ON t.id = s.id WHEN MATCHED THEN INSERT VALUES (1)",
        )
        .unwrap_err();
        assert_eq!(error.kind, ErrorKind::Grammar);
    }
}
