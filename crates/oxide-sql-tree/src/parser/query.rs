//! Query grammar: WITH, set operations, SELECT and FROM items.

use super::error::ParseError;
use super::parser::Parser;
use crate::ast::{
    Cte, Expr, JoinConstraint, JoinType, ObjectName, Query, Select, SelectItem, SetExpr,
    SetOperator, TableAlias, TableRef, Top, With,
};
use crate::dialect::Feature;
use crate::lexer::{Keyword, TokenKind};

/// Keyword sequences introducing a join, longest first.
const JOIN_SEQUENCES: &[(&[Keyword], JoinType)] = &[
    (&[Keyword::Join], JoinType::Join),
    (&[Keyword::Inner, Keyword::Join], JoinType::Inner),
    (&[Keyword::Left, Keyword::Outer, Keyword::Join], JoinType::LeftOuter),
    (&[Keyword::Left, Keyword::Join], JoinType::Left),
    (&[Keyword::Right, Keyword::Outer, Keyword::Join], JoinType::RightOuter),
    (&[Keyword::Right, Keyword::Join], JoinType::Right),
    (&[Keyword::Full, Keyword::Outer, Keyword::Join], JoinType::FullOuter),
    (&[Keyword::Full, Keyword::Join], JoinType::Full),
    (&[Keyword::Cross, Keyword::Join], JoinType::Cross),
    (&[Keyword::Natural, Keyword::Join], JoinType::Natural),
];

impl Parser<'_> {
    /// Parses a full query: WITH, body, ORDER BY and row limiting.
    pub(super) fn parse_query(&mut self) -> Result<Query, ParseError> {
        self.nested(Self::parse_query_inner)
    }

    fn parse_query_inner(&mut self) -> Result<Query, ParseError> {
        let with = if self.check_keyword(Keyword::With) {
            Some(self.with_context("WITH clause", Self::parse_with)?)
        } else {
            None
        };
        let body = self.parse_set_expr()?;
        let mut query = Query {
            with,
            body,
            order_by: Vec::new(),
            limit: None,
            offset: None,
        };
        if self.consume_keywords(&[Keyword::Order, Keyword::By]) {
            query.order_by = self.with_context("ORDER BY clause", Self::parse_order_by_list)?;
        }
        self.parse_row_limits(&mut query)?;
        Ok(query)
    }

    fn parse_with(&mut self) -> Result<With, ParseError> {
        self.expect_keyword(Keyword::With)?;
        let recursive = self.consume_keyword(Keyword::Recursive);
        let mut ctes = Vec::new();
        loop {
            let name = self.expect_identifier()?;
            let columns = if self.check(&TokenKind::LeftParen) {
                self.parse_identifier_list()?
            } else {
                Vec::new()
            };
            self.expect_keyword(Keyword::As)?;
            self.expect(&TokenKind::LeftParen)?;
            let query = self.parse_query()?;
            self.expect(&TokenKind::RightParen)?;
            ctes.push(Cte {
                name,
                columns,
                query: Box::new(query),
            });
            if !self.consume(&TokenKind::Comma) {
                return Ok(With { recursive, ctes });
            }
        }
    }

    /// UNION, EXCEPT and MINUS bind looser than INTERSECT.
    fn parse_set_expr(&mut self) -> Result<SetExpr, ParseError> {
        let mut left = self.parse_intersection()?;
        loop {
            let op = if self.check_keyword(Keyword::Union) {
                SetOperator::Union
            } else if self.check_keyword(Keyword::Except) {
                SetOperator::Except
            } else if self.check_keyword(Keyword::Minus) {
                self.require(Feature::Minus)?;
                SetOperator::Minus
            } else {
                return Ok(left);
            };
            self.advance();
            let all = self.parse_set_quantifier();
            let right = self.parse_intersection()?;
            left = combine(left, op, all, right);
        }
    }

    fn parse_intersection(&mut self) -> Result<SetExpr, ParseError> {
        let mut left = self.parse_set_operand()?;
        while self.consume_keyword(Keyword::Intersect) {
            let all = self.parse_set_quantifier();
            let right = self.parse_set_operand()?;
            left = combine(left, SetOperator::Intersect, all, right);
        }
        Ok(left)
    }

    /// Parses `ALL` / `DISTINCT` after a set operator.
    fn parse_set_quantifier(&mut self) -> bool {
        if self.consume_keyword(Keyword::All) {
            return true;
        }
        self.consume_keyword(Keyword::Distinct);
        false
    }

    fn parse_set_operand(&mut self) -> Result<SetExpr, ParseError> {
        if self.consume(&TokenKind::LeftParen) {
            let query = self.parse_query()?;
            self.expect(&TokenKind::RightParen)?;
            return Ok(SetExpr::Query(Box::new(query)));
        }
        if !self.check_keyword(Keyword::Select) {
            return Err(self.expected("SELECT"));
        }
        let select = self.with_context("SELECT", Self::parse_select)?;
        Ok(SetExpr::Select(Box::new(select)))
    }

    /// Parses LIMIT, OFFSET and FETCH FIRST.
    fn parse_row_limits(&mut self, query: &mut Query) -> Result<(), ParseError> {
        if self.check_keyword(Keyword::Limit) {
            self.require(Feature::Limit)?;
            self.advance();
            let first = self.parse_expr()?;
            if self.check(&TokenKind::Comma) {
                self.require(Feature::LimitComma)?;
                self.advance();
                query.offset = Some(first);
                query.limit = Some(self.parse_expr()?);
            } else {
                query.limit = Some(first);
            }
        }
        if self.consume_keyword(Keyword::Offset) {
            query.offset = Some(self.parse_expr()?);
            if !self.consume_keyword(Keyword::Rows) {
                self.consume_keyword(Keyword::Row);
            }
        }
        if self.consume_keyword(Keyword::Fetch) {
            if !self.consume_keyword(Keyword::First) && !self.consume_keyword(Keyword::Next) {
                return Err(self.expected("FIRST or NEXT"));
            }
            let count = if self.check_keyword(Keyword::Rows) || self.check_keyword(Keyword::Row) {
                Expr::integer(1)
            } else {
                self.parse_expr()?
            };
            if !self.consume_keyword(Keyword::Rows) && !self.consume_keyword(Keyword::Row) {
                return Err(self.expected("ROWS"));
            }
            self.expect_keyword(Keyword::Only)?;
            query.limit = Some(count);
        }
        Ok(())
    }

    fn parse_select(&mut self) -> Result<Select, ParseError> {
        self.expect_keyword(Keyword::Select)?;
        let mut select = Select::default();
        select.distinct = self.consume_keyword(Keyword::Distinct);
        if !select.distinct {
            self.consume_keyword(Keyword::All);
        }
        if self.starts_top() {
            self.require(Feature::Top)?;
            select.top = Some(self.parse_top()?);
        }
        select.columns = self.with_context("select list", Self::parse_select_list)?;

        if self.consume_keyword(Keyword::From) {
            select.from = self.with_context("FROM clause", Self::parse_from_list)?;
        }
        if self.consume_keyword(Keyword::Where) {
            select.where_clause = Some(self.with_context("WHERE clause", Self::parse_expr)?);
        }
        if self.consume_keywords(&[Keyword::Group, Keyword::By]) {
            select.group_by = self.with_context("GROUP BY clause", Self::parse_expr_list)?;
        }
        if self.consume_keyword(Keyword::Having) {
            select.having = Some(self.with_context("HAVING clause", Self::parse_expr)?);
        }
        if self.check_keyword(Keyword::Qualify) {
            self.require(Feature::Qualify)?;
            self.advance();
            select.qualify = Some(self.with_context("QUALIFY clause", Self::parse_expr)?);
        }
        Ok(select)
    }

    /// Returns true at `TOP n` or `TOP (n)`; a lone `top` is a column name.
    fn starts_top(&self) -> bool {
        self.check_keyword(Keyword::Top)
            && matches!(
                self.peek_token(1).kind,
                TokenKind::Integer(_)
                    | TokenKind::UnsignedInteger(_)
                    | TokenKind::Float(_)
                    | TokenKind::LeftParen
            )
    }

    /// Parses `TOP n [PERCENT] [WITH TIES]`.
    pub(super) fn parse_top(&mut self) -> Result<Top, ParseError> {
        self.expect_keyword(Keyword::Top)?;
        let quantity = if self.consume(&TokenKind::LeftParen) {
            let quantity = self.parse_expr()?;
            self.expect(&TokenKind::RightParen)?;
            quantity
        } else {
            self.parse_expr_bp(u8::MAX)?
        };
        let percent = self.consume_keyword(Keyword::Percent);
        let with_ties = self.consume_keywords(&[Keyword::With, Keyword::Ties]);
        Ok(Top {
            quantity,
            percent,
            with_ties,
        })
    }

    fn parse_select_list(&mut self) -> Result<Vec<SelectItem>, ParseError> {
        let mut items = Vec::new();
        loop {
            let item = match self.parse_expr()? {
                Expr::Wildcard(qualifier) => SelectItem::Wildcard(qualifier),
                expr => SelectItem::Expr {
                    expr,
                    alias: self.parse_column_alias()?,
                },
            };
            items.push(item);
            if !self.consume(&TokenKind::Comma) {
                return Ok(items);
            }
        }
    }

    /// Parses `[AS] alias` after a select item. Quoted strings are accepted
    /// after AS.
    fn parse_column_alias(&mut self) -> Result<Option<String>, ParseError> {
        if self.consume_keyword(Keyword::As) {
            if let TokenKind::String(alias) = &self.current().kind {
                let alias = alias.clone();
                self.advance();
                return Ok(Some(alias));
            }
            return self.expect_word().map(Some);
        }
        if self.at_bare_alias() {
            return self.expect_identifier().map(Some);
        }
        Ok(None)
    }

    /// Returns true if the current token can be an alias without AS.
    pub(super) fn at_bare_alias(&self) -> bool {
        let token = self.current();
        matches!(token.kind, TokenKind::Identifier(_)) && !token.is_keyword(Keyword::Minus)
    }

    /// Parses `[AS] alias [(columns)]` after a FROM item.
    pub(super) fn parse_table_alias(&mut self) -> Result<Option<TableAlias>, ParseError> {
        let name = if self.consume_keyword(Keyword::As) || self.at_bare_alias() {
            self.expect_identifier()?
        } else {
            return Ok(None);
        };
        let columns = if self.check(&TokenKind::LeftParen) {
            self.parse_identifier_list()?
        } else {
            Vec::new()
        };
        Ok(Some(TableAlias { name, columns }))
    }

    /// Parses a comma-separated FROM list with joins and table operators.
    pub(super) fn parse_from_list(&mut self) -> Result<Vec<TableRef>, ParseError> {
        let mut items = Vec::new();
        loop {
            items.push(self.parse_table_factor()?);
            self.parse_from_suffixes(&mut items)?;
            if !self.consume(&TokenKind::Comma) {
                return Ok(items);
            }
        }
    }

    fn parse_from_suffixes(&mut self, items: &mut Vec<TableRef>) -> Result<(), ParseError> {
        loop {
            if let Some(join_type) = self.parse_join_type() {
                let table = self.parse_table_factor()?;
                let constraint = if self.consume_keyword(Keyword::On) {
                    JoinConstraint::On(self.parse_expr()?)
                } else if self.consume_keyword(Keyword::Using) {
                    JoinConstraint::Using(self.parse_identifier_list()?)
                } else {
                    JoinConstraint::None
                };
                items.push(TableRef::Join {
                    join_type,
                    table: Box::new(table),
                    constraint,
                });
            } else if self.check_keyword(Keyword::Pivot) {
                self.require(Feature::Pivot)?;
                items.push(self.with_context("PIVOT", Self::parse_pivot)?);
            } else if self.check_keyword(Keyword::Unpivot) {
                self.require(Feature::Pivot)?;
                items.push(self.with_context("UNPIVOT", Self::parse_unpivot)?);
            } else if self.check_keyword(Keyword::Lateral) && self.peek_keyword(1, Keyword::View) {
                self.require(Feature::LateralView)?;
                items.push(self.with_context("LATERAL VIEW", Self::parse_lateral_view)?);
            } else {
                return Ok(());
            }
        }
    }

    fn parse_join_type(&mut self) -> Option<JoinType> {
        JOIN_SEQUENCES
            .iter()
            .find(|(keywords, _)| self.consume_keywords(keywords))
            .map(|(_, join_type)| *join_type)
    }

    /// Parses one FROM item: a table, derived table, table function,
    /// LATERAL item or stage reference, with its alias.
    pub(super) fn parse_table_factor(&mut self) -> Result<TableRef, ParseError> {
        if self.check_keyword(Keyword::Lateral) {
            self.require(Feature::Lateral)?;
            self.advance();
            let inner = self.nested(Self::parse_table_factor)?;
            return Ok(TableRef::Lateral(Box::new(inner)));
        }
        if self.check_keyword(Keyword::Table)
            && matches!(self.peek_token(1).kind, TokenKind::LeftParen)
        {
            self.advance();
            let call = self.parse_function("table".to_string())?;
            let alias = self.parse_table_alias()?;
            return Ok(TableRef::Function { call, alias });
        }
        if self.consume(&TokenKind::LeftParen) {
            let query = self.parse_query()?;
            self.expect(&TokenKind::RightParen)?;
            let alias = self.parse_table_alias()?;
            return Ok(TableRef::Derived {
                query: Box::new(query),
                alias,
            });
        }
        if matches!(self.current().kind, TokenKind::Variable(_) | TokenKind::At) {
            let location = self.parse_raw_path()?;
            let alias = self.parse_table_alias()?;
            return Ok(TableRef::Table {
                name: ObjectName::simple(location),
                alias,
            });
        }

        let quoted = matches!(&self.current().kind, TokenKind::Identifier(word) if word.quote.is_some());
        let name = self.parse_object_name()?;
        if self.check(&TokenKind::LeftParen) {
            let function = name.to_string();
            let function = if quoted { function } else { function.to_lowercase() };
            let call = self.parse_function(function)?;
            let alias = self.parse_table_alias()?;
            return Ok(TableRef::Function { call, alias });
        }
        let alias = self.parse_table_alias()?;
        Ok(TableRef::Table { name, alias })
    }

    /// `PIVOT (aggregate FOR column IN (values)) [AS alias]`
    fn parse_pivot(&mut self) -> Result<TableRef, ParseError> {
        self.expect_keyword(Keyword::Pivot)?;
        self.expect(&TokenKind::LeftParen)?;
        let aggregate = self.parse_expr()?;
        let (column, values) = self.parse_pivot_for()?;
        self.expect(&TokenKind::RightParen)?;
        let alias = self.parse_table_alias()?.map(|alias| alias.name);
        Ok(TableRef::Pivot {
            aggregate,
            column,
            values,
            alias,
        })
    }

    /// `UNPIVOT (value FOR column IN (columns)) [AS alias]`
    fn parse_unpivot(&mut self) -> Result<TableRef, ParseError> {
        self.expect_keyword(Keyword::Unpivot)?;
        self.expect(&TokenKind::LeftParen)?;
        let value = self.parse_expr()?;
        let (column, columns) = self.parse_pivot_for()?;
        self.expect(&TokenKind::RightParen)?;
        let alias = self.parse_table_alias()?.map(|alias| alias.name);
        Ok(TableRef::Unpivot {
            value,
            column,
            columns,
            alias,
        })
    }

    /// Parses `FOR column IN (items)`.
    fn parse_pivot_for(&mut self) -> Result<(Expr, Vec<Expr>), ParseError> {
        self.expect_keyword(Keyword::For)?;
        let column = Expr::Column(self.parse_object_name()?);
        self.expect_keyword(Keyword::In)?;
        self.expect(&TokenKind::LeftParen)?;
        let items = self.parse_expr_list()?;
        self.expect(&TokenKind::RightParen)?;
        Ok((column, items))
    }

    /// `LATERAL VIEW [OUTER] function [table_alias] [AS column, ...]`
    fn parse_lateral_view(&mut self) -> Result<TableRef, ParseError> {
        self.expect_keyword(Keyword::Lateral)?;
        self.expect_keyword(Keyword::View)?;
        let outer = self.consume_keyword(Keyword::Outer);
        let function = self.parse_expr()?;
        let table_alias = if self.at_bare_alias() {
            Some(self.expect_identifier()?)
        } else {
            None
        };
        let mut column_aliases = Vec::new();
        if self.consume_keyword(Keyword::As) {
            column_aliases.push(self.expect_identifier()?);
            while self.check(&TokenKind::Comma)
                && matches!(self.peek_token(1).kind, TokenKind::Identifier(_))
                && !matches!(
                    self.peek_token(2).kind,
                    TokenKind::Identifier(_) | TokenKind::Dot | TokenKind::LeftParen
                )
            {
                self.advance();
                column_aliases.push(self.expect_identifier()?);
            }
        }
        Ok(TableRef::LateralView {
            function,
            outer,
            table_alias,
            column_aliases,
        })
    }
}

/// Adds `right` to a set operation, extending a chain of the same operator.
fn combine(left: SetExpr, op: SetOperator, all: bool, right: SetExpr) -> SetExpr {
    match left {
        SetExpr::SetOperation {
            op: left_op,
            all: left_all,
            mut operands,
        } if left_op == op && left_all == all => {
            operands.push(right);
            SetExpr::SetOperation { op, all, operands }
        }
        left => SetExpr::SetOperation {
            op,
            all,
            operands: vec![left, right],
        },
    }
}
