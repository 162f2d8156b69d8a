//! Expression grammar: Pratt loop, primary expressions, function calls,
//! windows and data types.

use super::error::{ErrorKind, ParseError};
use super::parser::Parser;
use super::pratt::{self, PendingOperator};
use crate::ast::{
    BinaryOp, DataType, Expr, FrameBound, FrameUnits, FunctionCall, Literal, NullOrdering,
    ObjectName, OrderByExpr, OrderDirection, UnaryOp, WindowFrame, WindowSpec,
};
use crate::dialect::{Feature, Fixity, Operator};
use crate::lexer::{Keyword, Span, Token, TokenKind};

/// Units accepted after an INTERVAL value.
const INTERVAL_UNITS: &[&str] = &[
    "year",
    "years",
    "quarter",
    "month",
    "months",
    "week",
    "weeks",
    "day",
    "days",
    "hour",
    "hours",
    "minute",
    "minutes",
    "second",
    "seconds",
    "millisecond",
    "milliseconds",
    "microsecond",
    "microseconds",
];

/// Type names that may prefix a string literal, as in `DATE '2020-01-01'`.
const TYPED_LITERALS: &[&str] = &["date", "time", "timestamp", "datetime"];

/// Fails when a named argument repeats, or shares its key with the
/// function name or a call modifier that is present.
fn check_argument_keys(call: &FunctionCall, spans: &[Span]) -> Result<(), ParseError> {
    for (index, ((key, _), span)) in call.named_args.iter().zip(spans).enumerate() {
        let clashes = key == &call.name
            || call.named_args[..index].iter().any(|(earlier, _)| earlier == key)
            || (key == "distinct" && call.distinct)
            || (key == "orderby" && !call.order_by.is_empty())
            || (key == "separator" && call.separator.is_some());
        if clashes {
            return Err(ParseError::new(
                ErrorKind::Grammar,
                format!("argument {key} of {} is given more than once", call.name),
                *span,
            ));
        }
    }
    Ok(())
}

impl Parser<'_> {
    /// Parses an expression.
    pub(super) fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        self.parse_expr_bp(0)
    }

    /// Parses an expression whose operators bind at least as tightly as
    /// `min_bp`.
    pub(super) fn parse_expr_bp(&mut self, min_bp: u8) -> Result<Expr, ParseError> {
        self.nested(|p| p.parse_expr_bp_inner(min_bp))
    }

    fn parse_expr_bp_inner(&mut self, min_bp: u8) -> Result<Expr, ParseError> {
        let mut left = self.parse_prefix()?;
        // Height of the left-nested tree built by this loop; n-ary merges
        // do not add to it.
        let mut height = 0;

        while let Some(pending) = pratt::infix_operator(self.current(), self.peek_token(1)) {
            let Some(def) = self.dialect.operator(pending.operator, pending.fixity) else {
                return Err(self.unsupported(pending.operator.as_str()));
            };
            let (l_bp, r_bp) = def.binding_power();
            if l_bp < min_bp {
                break;
            }
            if !flattens(&left, pending) {
                height += 1;
                if height > self.max_depth {
                    return Err(self.depth_exceeded());
                }
            }
            left = match pending.fixity {
                Fixity::Postfix => self.parse_postfix(left, pending.operator)?,
                Fixity::Infix | Fixity::Prefix => self.parse_infix(left, pending, r_bp)?,
            };
        }

        Ok(left)
    }

    fn parse_prefix(&mut self) -> Result<Expr, ParseError> {
        if self.check(&TokenKind::Plus) {
            self.advance();
            return self.parse_unary_operand(Operator::Neg);
        }
        let Some(operator) = pratt::prefix_operator(self.current()) else {
            return self.parse_primary();
        };
        self.advance();
        let operand = self.parse_unary_operand(operator)?;
        let expr = match (operator, operand) {
            (Operator::Neg, Expr::Literal(Literal::Integer(n))) if n != i64::MIN => {
                Expr::integer(-n)
            }
            (Operator::Neg, Expr::Literal(Literal::UnsignedInteger(n))) => {
                match 0i64.checked_sub_unsigned(n) {
                    Some(negated) => Expr::integer(negated),
                    None => Expr::Unary {
                        op: UnaryOp::Neg,
                        operand: Box::new(Expr::Literal(Literal::UnsignedInteger(n))),
                    },
                }
            }
            (Operator::Neg, Expr::Literal(Literal::Float(f))) => Expr::Literal(Literal::Float(-f)),
            (operator, operand) => Expr::Unary {
                op: pratt::unary_op(operator).ok_or_else(|| self.expected("expression"))?,
                operand: Box::new(operand),
            },
        };
        Ok(expr)
    }

    /// Parses the operand of a prefix operator at that operator's binding
    /// power.
    fn parse_unary_operand(&mut self, operator: Operator) -> Result<Expr, ParseError> {
        let def = self
            .dialect
            .operator(operator, Fixity::Prefix)
            .ok_or_else(|| self.unsupported(operator.as_str()))?;
        let (_, r_bp) = def.binding_power();
        self.parse_expr_bp(r_bp)
    }

    fn parse_infix(
        &mut self,
        left: Expr,
        pending: PendingOperator,
        r_bp: u8,
    ) -> Result<Expr, ParseError> {
        if pending.negated {
            self.advance(); // NOT
        }
        self.advance();
        match pending.operator {
            Operator::In => self.parse_in(left, pending.negated),
            Operator::Between => {
                let low = self.parse_expr_bp(r_bp)?;
                self.expect_keyword(Keyword::And)?;
                let high = self.parse_expr_bp(r_bp)?;
                Ok(Expr::Between {
                    expr: Box::new(left),
                    low: Box::new(low),
                    high: Box::new(high),
                    negated: pending.negated,
                })
            }
            operator => {
                let op = pratt::binary_op(operator, pending.negated)
                    .ok_or_else(|| self.expected("operator"))?;
                let right = self.parse_expr_bp(r_bp)?;
                Ok(Expr::binary(op, left, right))
            }
        }
    }

    fn parse_in(&mut self, expr: Expr, negated: bool) -> Result<Expr, ParseError> {
        self.expect(&TokenKind::LeftParen)?;
        let expr = Box::new(expr);
        if self.starts_query() {
            let query = self.parse_query()?;
            self.expect(&TokenKind::RightParen)?;
            return Ok(Expr::InSubquery {
                expr,
                query: Box::new(query),
                negated,
            });
        }
        let list = self.parse_expr_list()?;
        self.expect(&TokenKind::RightParen)?;
        Ok(Expr::InList {
            expr,
            list,
            negated,
        })
    }

    fn parse_postfix(&mut self, left: Expr, operator: Operator) -> Result<Expr, ParseError> {
        match operator {
            Operator::Is => {
                self.advance();
                let negated = self.consume_keyword(Keyword::Not);
                if self.consume_keyword(Keyword::Null) {
                    return Ok(Expr::IsNull {
                        expr: Box::new(left),
                        negated,
                    });
                }
                let value = if self.consume_keyword(Keyword::True) {
                    true
                } else if self.consume_keyword(Keyword::False) {
                    false
                } else {
                    return Err(self.expected("NULL, TRUE or FALSE"));
                };
                let op = if negated { BinaryOp::NotEq } else { BinaryOp::Eq };
                Ok(Expr::binary(op, left, Expr::Literal(Literal::Boolean(value))))
            }
            Operator::Cast => {
                self.advance();
                let data_type = self.parse_data_type()?;
                Ok(Expr::Cast {
                    expr: Box::new(left),
                    data_type,
                    try_cast: false,
                })
            }
            Operator::Path => {
                self.advance();
                let mut path = Vec::new();
                if !self.check(&TokenKind::LeftBracket) {
                    path.push(self.parse_path_key()?);
                }
                self.parse_path_tail(&mut path)?;
                Ok(push_path(left, path))
            }
            Operator::Index => {
                let mut path = Vec::new();
                self.parse_path_tail(&mut path)?;
                Ok(push_path(left, path))
            }
            _ => Err(self.expected("operator")),
        }
    }

    /// Parses a path key such as `name` or `"quoted-key"` into a string
    /// literal.
    fn parse_path_key(&mut self) -> Result<Expr, ParseError> {
        Ok(Expr::string(self.expect_word()?))
    }

    /// Parses `.key` and `[index]` segments.
    fn parse_path_tail(&mut self, path: &mut Vec<Expr>) -> Result<(), ParseError> {
        loop {
            if self.consume(&TokenKind::LeftBracket) {
                path.push(self.parse_expr()?);
                self.expect(&TokenKind::RightBracket)?;
            } else if self.check(&TokenKind::Dot) && !path.is_empty() {
                self.advance();
                path.push(self.parse_path_key()?);
            } else {
                return Ok(());
            }
        }
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let token = self.current().clone();
        match &token.kind {
            TokenKind::Integer(n) => {
                self.advance();
                Ok(Expr::integer(*n))
            }
            TokenKind::UnsignedInteger(n) => {
                self.advance();
                Ok(Expr::Literal(Literal::UnsignedInteger(*n)))
            }
            TokenKind::Float(f) => {
                self.advance();
                Ok(Expr::Literal(Literal::Float(*f)))
            }
            TokenKind::String(s) => {
                self.advance();
                Ok(Expr::string(s.clone()))
            }
            TokenKind::Variable(name) => {
                self.advance();
                Ok(Expr::Variable(name.clone()))
            }
            TokenKind::Question => {
                self.advance();
                Ok(Expr::Variable("?".to_string()))
            }
            TokenKind::Star => {
                self.advance();
                Ok(Expr::Wildcard(None))
            }
            TokenKind::LeftParen => self.parse_parenthesized(),
            TokenKind::Keyword(keyword) => self.parse_keyword_expr(*keyword),
            TokenKind::Identifier(word) if word.quote.is_none() => {
                self.parse_contextual_expr(word.keyword, &word.value)
            }
            TokenKind::Identifier(_) => self.parse_name_expr(),
            _ => Err(self.expected("expression")),
        }
    }

    /// Expressions introduced by a reserved keyword.
    fn parse_keyword_expr(&mut self, keyword: Keyword) -> Result<Expr, ParseError> {
        match keyword {
            Keyword::Null => {
                self.advance();
                Ok(Expr::Literal(Literal::Null))
            }
            Keyword::True | Keyword::False => {
                self.advance();
                Ok(Expr::Literal(Literal::Boolean(keyword == Keyword::True)))
            }
            Keyword::Case => self.with_context("CASE expression", Self::parse_case),
            Keyword::Cast => self.with_context("CAST", |p| p.parse_cast(false)),
            Keyword::Exists => {
                self.advance();
                self.expect(&TokenKind::LeftParen)?;
                let query = self.parse_query()?;
                self.expect(&TokenKind::RightParen)?;
                Ok(Expr::Exists(Box::new(query)))
            }
            keyword
                if keyword.is_function_name()
                    && matches!(self.peek_token(1).kind, TokenKind::LeftParen) =>
            {
                self.parse_name_expr()
            }
            _ => Err(self.expected("expression")),
        }
    }

    /// Expressions introduced by an unreserved word that is only special
    /// in context (`TRY_CAST(`, `EXTRACT(`, `INTERVAL '1'`, `DATE '..'`).
    fn parse_contextual_expr(
        &mut self,
        keyword: Option<Keyword>,
        text: &str,
    ) -> Result<Expr, ParseError> {
        let next = &self.peek_token(1).kind;
        let call = matches!(next, TokenKind::LeftParen);
        let literal_follows = matches!(next, TokenKind::String(_));
        let value_follows = matches!(
            next,
            TokenKind::String(_)
                | TokenKind::Integer(_)
                | TokenKind::UnsignedInteger(_)
                | TokenKind::Float(_)
        );
        match keyword {
            Some(Keyword::TryCast) if call => {
                return self.with_context("TRY_CAST", |p| p.parse_cast(true));
            }
            Some(Keyword::Extract) if call => return self.parse_extract(),
            Some(Keyword::Trim) if call => return self.parse_trim(),
            Some(Keyword::Interval) if value_follows => return self.parse_interval(),
            _ => {}
        }
        let lower = text.to_ascii_lowercase();
        if literal_follows && TYPED_LITERALS.contains(&lower.as_str()) {
            self.advance();
            if let TokenKind::String(value) = self.advance().kind {
                return Ok(Expr::TypedString {
                    data_type: lower,
                    value,
                });
            }
        }
        self.parse_name_expr()
    }

    /// Parses a column reference, `t.*`, or a function call.
    fn parse_name_expr(&mut self) -> Result<Expr, ParseError> {
        let first = self.advance();
        let quoted = matches!(&first.kind, TokenKind::Identifier(word) if word.quote.is_some());
        let mut parts = vec![self.word_text(&first)];
        while self.check(&TokenKind::Dot) {
            if matches!(self.peek_token(1).kind, TokenKind::Star) {
                self.advance();
                self.advance();
                return Ok(Expr::Wildcard(Some(ObjectName(parts))));
            }
            self.advance();
            parts.push(self.expect_word()?);
        }
        if self.check(&TokenKind::LeftParen) {
            let name = parts.join(".");
            let name = if quoted { name } else { name.to_lowercase() };
            return self.parse_function(name);
        }
        Ok(Expr::Column(ObjectName(parts)))
    }

    /// Returns the text of a word token: the unquoted value of an
    /// identifier, or a keyword as written.
    fn word_text(&self, token: &Token) -> String {
        match &token.kind {
            TokenKind::Identifier(word) => word.value.clone(),
            _ => self.token_text(token).to_string(),
        }
    }

    /// Parses the argument list and trailing WITHIN GROUP / OVER of a call.
    pub(super) fn parse_function(&mut self, name: String) -> Result<Expr, ParseError> {
        self.expect(&TokenKind::LeftParen)?;
        let mut call = FunctionCall::new(name, Vec::new());
        let mut named_spans = Vec::new();
        if !self.check(&TokenKind::RightParen) {
            call.distinct = self.consume_keyword(Keyword::Distinct);
            if !call.distinct {
                self.consume_keyword(Keyword::All);
            }
            loop {
                if self.check_word() && matches!(self.peek_token(1).kind, TokenKind::Arrow) {
                    self.require(Feature::NamedArguments)?;
                    named_spans.push(self.current().span);
                    let key = self.expect_word()?.to_lowercase();
                    self.advance(); // =>
                    call.named_args.push((key, self.parse_expr()?));
                } else {
                    call.args.push(self.parse_expr()?);
                }
                if !self.consume(&TokenKind::Comma) {
                    break;
                }
            }
            if self.consume_keywords(&[Keyword::Order, Keyword::By]) {
                call.order_by = self.parse_order_by_list()?;
            }
            if self.consume_keyword(Keyword::Separator) {
                call.separator = Some(Box::new(self.parse_expr()?));
            }
        }
        check_argument_keys(&call, &named_spans)?;
        self.expect(&TokenKind::RightParen)?;

        let mut expr = Expr::Function(call);
        if self.check_keyword(Keyword::Within) && self.peek_keyword(1, Keyword::Group) {
            self.advance();
            self.advance();
            self.expect(&TokenKind::LeftParen)?;
            self.expect_keyword(Keyword::Order)?;
            self.expect_keyword(Keyword::By)?;
            let order_by = self.parse_order_by_list()?;
            self.expect(&TokenKind::RightParen)?;
            expr = Expr::WithinGroup {
                function: Box::new(expr),
                order_by,
            };
        }
        if self.consume_keyword(Keyword::Over) {
            let window = self.with_context("OVER clause", Self::parse_window_spec)?;
            expr = Expr::Window {
                function: Box::new(expr),
                window,
            };
        }
        Ok(expr)
    }

    fn parse_window_spec(&mut self) -> Result<WindowSpec, ParseError> {
        if !self.check(&TokenKind::LeftParen) {
            return Ok(WindowSpec {
                name: Some(self.expect_identifier()?),
                ..WindowSpec::default()
            });
        }
        self.advance();
        let mut spec = WindowSpec::default();
        if self.consume_keywords(&[Keyword::Partition, Keyword::By]) {
            spec.partition_by = self.parse_expr_list()?;
        }
        if self.consume_keywords(&[Keyword::Order, Keyword::By]) {
            spec.order_by = self.parse_order_by_list()?;
        }
        let units = if self.consume_keyword(Keyword::Rows) {
            Some(FrameUnits::Rows)
        } else if self.consume_keyword(Keyword::Range) {
            Some(FrameUnits::Range)
        } else {
            None
        };
        if let Some(units) = units {
            let frame = if self.consume_keyword(Keyword::Between) {
                let start = self.parse_frame_bound()?;
                self.expect_keyword(Keyword::And)?;
                let end = self.parse_frame_bound()?;
                WindowFrame {
                    units,
                    start,
                    end: Some(end),
                }
            } else {
                WindowFrame {
                    units,
                    start: self.parse_frame_bound()?,
                    end: None,
                }
            };
            spec.frame = Some(frame);
        }
        self.expect(&TokenKind::RightParen)?;
        Ok(spec)
    }

    fn parse_frame_bound(&mut self) -> Result<FrameBound, ParseError> {
        if self.consume_keyword(Keyword::Unbounded) {
            if self.consume_keyword(Keyword::Preceding) {
                return Ok(FrameBound::UnboundedPreceding);
            }
            self.expect_keyword(Keyword::Following)?;
            return Ok(FrameBound::UnboundedFollowing);
        }
        if self.consume_keywords(&[Keyword::Current, Keyword::Row]) {
            return Ok(FrameBound::CurrentRow);
        }
        let offset = Box::new(self.parse_expr_bp(u8::MAX)?);
        if self.consume_keyword(Keyword::Preceding) {
            return Ok(FrameBound::Preceding(offset));
        }
        self.expect_keyword(Keyword::Following)?;
        Ok(FrameBound::Following(offset))
    }

    fn parse_case(&mut self) -> Result<Expr, ParseError> {
        self.expect_keyword(Keyword::Case)?;
        let operand = if self.check_keyword(Keyword::When) {
            None
        } else {
            Some(Box::new(self.parse_expr()?))
        };
        let mut when_clauses = Vec::new();
        while self.consume_keyword(Keyword::When) {
            let condition = self.parse_expr()?;
            self.expect_keyword(Keyword::Then)?;
            when_clauses.push((condition, self.parse_expr()?));
        }
        if when_clauses.is_empty() {
            return Err(self.expected("WHEN"));
        }
        let else_clause = if self.consume_keyword(Keyword::Else) {
            Some(Box::new(self.parse_expr()?))
        } else {
            None
        };
        self.expect_keyword(Keyword::End)?;
        Ok(Expr::Case {
            operand,
            when_clauses,
            else_clause,
        })
    }

    fn parse_cast(&mut self, try_cast: bool) -> Result<Expr, ParseError> {
        self.advance(); // CAST / TRY_CAST
        self.expect(&TokenKind::LeftParen)?;
        let expr = self.parse_expr()?;
        self.expect_keyword(Keyword::As)?;
        let data_type = self.parse_data_type()?;
        self.expect(&TokenKind::RightParen)?;
        Ok(Expr::Cast {
            expr: Box::new(expr),
            data_type,
            try_cast,
        })
    }

    /// `EXTRACT(part FROM value)`, rendered as a call with the part first.
    fn parse_extract(&mut self) -> Result<Expr, ParseError> {
        self.advance();
        self.expect(&TokenKind::LeftParen)?;
        let part = self.expect_word()?.to_lowercase();
        self.expect_keyword(Keyword::From)?;
        let value = self.parse_expr()?;
        self.expect(&TokenKind::RightParen)?;
        Ok(Expr::Function(FunctionCall::new(
            "extract",
            vec![Expr::Word(part), value],
        )))
    }

    /// `TRIM([BOTH|LEADING|TRAILING] [chars] FROM value)` or
    /// `TRIM(value [, chars])`.
    fn parse_trim(&mut self) -> Result<Expr, ParseError> {
        self.advance();
        self.expect(&TokenKind::LeftParen)?;
        let direction = [Keyword::Both, Keyword::Leading, Keyword::Trailing]
            .into_iter()
            .find(|keyword| self.check_keyword(*keyword));
        if direction.is_some() {
            self.advance();
        }

        let (value, characters) = if self.consume_keyword(Keyword::From) {
            (self.parse_expr()?, None)
        } else {
            let first = self.parse_expr()?;
            if self.consume_keyword(Keyword::From) {
                (self.parse_expr()?, Some(first))
            } else if direction.is_none() && self.consume(&TokenKind::Comma) {
                (first, Some(self.parse_expr()?))
            } else if direction.is_some() {
                return Err(self.expected("FROM"));
            } else {
                (first, None)
            }
        };
        self.expect(&TokenKind::RightParen)?;

        let mut call = FunctionCall::new("trim", vec![value]);
        if let Some(direction) = direction {
            let name = direction.as_str().to_lowercase();
            call.named_args
                .push(("direction".to_string(), Expr::Word(name)));
        }
        if let Some(characters) = characters {
            call.named_args
                .push(("characters".to_string(), characters));
        }
        Ok(Expr::Function(call))
    }

    fn parse_interval(&mut self) -> Result<Expr, ParseError> {
        self.advance();
        let value = self.parse_primary()?;
        let unit = match &self.current().kind {
            TokenKind::Identifier(word)
                if word.quote.is_none()
                    && INTERVAL_UNITS.contains(&word.value.to_ascii_lowercase().as_str()) =>
            {
                let unit = word.value.to_ascii_lowercase();
                self.advance();
                Some(unit)
            }
            _ => None,
        };
        Ok(Expr::Interval {
            value: Box::new(value),
            unit,
        })
    }

    /// Parses `( expr )`, `( subquery )` or a row constructor `(a, b)`.
    fn parse_parenthesized(&mut self) -> Result<Expr, ParseError> {
        self.expect(&TokenKind::LeftParen)?;
        if self.starts_query() {
            let query = self.parse_query()?;
            self.expect(&TokenKind::RightParen)?;
            return Ok(Expr::Subquery(Box::new(query)));
        }
        let first = self.parse_expr()?;
        if self.consume(&TokenKind::Comma) {
            let mut items = vec![first];
            items.extend(self.parse_expr_list()?);
            self.expect(&TokenKind::RightParen)?;
            return Ok(Expr::Tuple(items));
        }
        self.expect(&TokenKind::RightParen)?;
        Ok(first)
    }

    /// Returns true if a query starts at the current token.
    pub(super) fn starts_query(&self) -> bool {
        self.check_keyword(Keyword::Select) || self.check_keyword(Keyword::With)
    }

    /// Parses a comma-separated expression list.
    pub(super) fn parse_expr_list(&mut self) -> Result<Vec<Expr>, ParseError> {
        let mut exprs = vec![self.parse_expr()?];
        while self.consume(&TokenKind::Comma) {
            exprs.push(self.parse_expr()?);
        }
        Ok(exprs)
    }

    /// Parses ORDER BY items (after `ORDER BY`).
    pub(super) fn parse_order_by_list(&mut self) -> Result<Vec<OrderByExpr>, ParseError> {
        let mut items = Vec::new();
        loop {
            let expr = self.parse_expr()?;
            let direction = if self.consume_keyword(Keyword::Asc) {
                Some(OrderDirection::Asc)
            } else if self.consume_keyword(Keyword::Desc) {
                Some(OrderDirection::Desc)
            } else {
                None
            };
            let nulls = if self.consume_keyword(Keyword::Nulls) {
                if self.consume_keyword(Keyword::First) {
                    Some(NullOrdering::First)
                } else {
                    self.expect_keyword(Keyword::Last)?;
                    Some(NullOrdering::Last)
                }
            } else {
                None
            };
            items.push(OrderByExpr {
                expr,
                direction,
                nulls,
            });
            if !self.consume(&TokenKind::Comma) {
                return Ok(items);
            }
        }
    }

    /// Parses a data type: `varchar(10)`, `character varying(5)`,
    /// `int(3) unsigned zerofill`.
    pub(super) fn parse_data_type(&mut self) -> Result<DataType, ParseError> {
        let mut name = self.expect_word()?.to_lowercase();
        let suffix = match name.as_str() {
            "character" | "char" => Some(Keyword::Varying),
            "double" => Some(Keyword::Precision),
            _ => None,
        };
        if let Some(suffix) = suffix {
            if self.consume_keyword(suffix) {
                name = format!("{name}_{}", suffix.as_str().to_lowercase());
            }
        }

        let mut data_type = DataType::new(name);
        if self.consume(&TokenKind::LeftParen) {
            data_type.params = self.parse_expr_list()?;
            self.expect(&TokenKind::RightParen)?;
        }
        loop {
            if self.check_keyword(Keyword::Unsigned) {
                self.require(Feature::ColumnOptions)?;
                self.advance();
                data_type.unsigned = true;
            } else if self.check_keyword(Keyword::Zerofill) {
                self.require(Feature::ColumnOptions)?;
                self.advance();
                data_type.zerofill = true;
            } else {
                return Ok(data_type);
            }
        }
    }
}

/// Returns true if applying `pending` to `left` extends an existing node
/// instead of nesting it.
fn flattens(left: &Expr, pending: PendingOperator) -> bool {
    match (left, pratt::binary_op(pending.operator, pending.negated)) {
        (Expr::Binary { op, .. }, Some(next)) => *op == next && next.is_associative(),
        (Expr::PathGet { .. }, _) => pending.operator == Operator::Index,
        _ => false,
    }
}

/// Appends path segments, merging into an existing path access.
fn push_path(base: Expr, segments: Vec<Expr>) -> Expr {
    match base {
        Expr::PathGet { base, mut path } => {
            path.extend(segments);
            Expr::PathGet { base, path }
        }
        base => Expr::PathGet {
            base: Box::new(base),
            path: segments,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::UnaryOp;
    use crate::dialect::{Dialect, ANSI, MYSQL, SNOWFLAKE};
    use crate::parser::ErrorKind;

    fn expr_in(dialect: &'static Dialect, sql: &str) -> Result<Expr, ParseError> {
        let mut parser = Parser::new(sql, dialect)?;
        let expr = parser.parse_expr()?;
        assert!(parser.current().is_eof(), "trailing input in {sql}");
        Ok(expr)
    }

    fn expr(sql: &str) -> Expr {
        expr_in(&ANSI, sql).unwrap()
    }

    fn col(name: &str) -> Expr {
        Expr::column(name)
    }

    #[test]
    fn test_precedence() {
        assert_eq!(
            expr("1 + 2 * 3"),
            Expr::Binary {
                op: BinaryOp::Add,
                operands: vec![
                    Expr::integer(1),
                    Expr::Binary {
                        op: BinaryOp::Mul,
                        operands: vec![Expr::integer(2), Expr::integer(3)],
                    },
                ],
            }
        );
    }

    #[test]
    fn test_and_binds_tighter_than_or() {
        let Expr::Binary { op, operands } = expr("a OR b AND c") else {
            panic!("expected binary");
        };
        assert_eq!(op, BinaryOp::Or);
        assert!(matches!(operands[1], Expr::Binary { op: BinaryOp::And, .. }));
    }

    #[test]
    fn test_left_associative_subtraction() {
        let Expr::Binary { op, operands } = expr("a - b - c") else {
            panic!("expected binary");
        };
        assert_eq!(op, BinaryOp::Sub);
        assert_eq!(operands[1], col("c"));
        assert!(matches!(operands[0], Expr::Binary { op: BinaryOp::Sub, .. }));
    }

    #[test]
    fn test_concat_chain_is_flat() {
        let sql = format!("a{}", " || a".repeat(300));
        let Expr::Binary { op, operands } = expr(&sql) else {
            panic!("expected binary");
        };
        assert_eq!(op, BinaryOp::Concat);
        assert_eq!(operands.len(), 301);
    }

    #[test]
    fn test_negative_literal_folds() {
        assert_eq!(expr("-5"), Expr::integer(-5));
        assert_eq!(
            expr("-a"),
            Expr::Unary {
                op: UnaryOp::Neg,
                operand: Box::new(col("a")),
            }
        );
    }

    #[test]
    fn test_not_binds_looser_than_comparison() {
        let Expr::Unary { op, operand } = expr("NOT a = 1") else {
            panic!("expected unary");
        };
        assert_eq!(op, UnaryOp::Not);
        assert!(matches!(*operand, Expr::Binary { op: BinaryOp::Eq, .. }));
    }

    #[test]
    fn test_between_and() {
        let Expr::Binary { op, operands } = expr("x BETWEEN 1 AND 2 AND y") else {
            panic!("expected binary");
        };
        assert_eq!(op, BinaryOp::And);
        assert!(matches!(operands[0], Expr::Between { negated: false, .. }));
    }

    #[test]
    fn test_is_null_and_in() {
        assert_eq!(
            expr("a IS NOT NULL"),
            Expr::IsNull {
                expr: Box::new(col("a")),
                negated: true,
            }
        );
        assert!(matches!(
            expr("a NOT IN (1, 2)"),
            Expr::InList { negated: true, .. }
        ));
        assert!(matches!(
            expr("a IN (SELECT b FROM t)"),
            Expr::InSubquery { negated: false, .. }
        ));
    }

    #[test]
    fn test_dialect_operators() {
        assert!(matches!(
            expr_in(&SNOWFLAKE, "a ILIKE 'x'"),
            Ok(Expr::Binary { op: BinaryOp::ILike, .. })
        ));
        assert!(matches!(
            expr_in(&MYSQL, "a NOT REGEXP 'x'"),
            Ok(Expr::Binary { op: BinaryOp::NotRegexp, .. })
        ));
        let error = expr_in(&ANSI, "a ILIKE 'x'").unwrap_err();
        assert_eq!(error.kind, ErrorKind::Unsupported);
        let error = expr_in(&MYSQL, "a::int").unwrap_err();
        assert_eq!(error.kind, ErrorKind::Unsupported);
    }

    #[test]
    fn test_colon_path() {
        assert_eq!(
            expr_in(&SNOWFLAKE, "src:salesperson.name").unwrap(),
            Expr::PathGet {
                base: Box::new(col("src")),
                path: vec![Expr::string("salesperson"), Expr::string("name")],
            }
        );
        assert_eq!(
            expr_in(&SNOWFLAKE, "src:['a']['b']").unwrap(),
            Expr::PathGet {
                base: Box::new(col("src")),
                path: vec![Expr::string("a"), Expr::string("b")],
            }
        );
    }

    #[test]
    fn test_index_after_call() {
        let Expr::PathGet { base, path } = expr_in(&MYSQL, "split(a, ':')[0]").unwrap() else {
            panic!("expected path");
        };
        assert!(matches!(*base, Expr::Function(_)));
        assert_eq!(path, vec![Expr::integer(0)]);
    }

    #[test]
    fn test_function_call_modifiers() {
        let Expr::Function(call) =
            expr_in(&MYSQL, "group_concat(DISTINCT x ORDER BY y DESC SEPARATOR ',')").unwrap()
        else {
            panic!("expected call");
        };
        assert!(call.distinct);
        assert_eq!(call.order_by.len(), 1);
        assert_eq!(call.separator, Some(Box::new(Expr::string(","))));
    }

    #[test]
    fn test_named_arguments_are_gated() {
        let Expr::Function(call) = expr_in(&SNOWFLAKE, "generator(ROWCOUNT => 10)").unwrap()
        else {
            panic!("expected call");
        };
        assert_eq!(call.named_args, vec![("rowcount".to_string(), Expr::integer(10))]);
        let error = expr_in(&MYSQL, "generator(rowcount => 10)").unwrap_err();
        assert_eq!(error.kind, ErrorKind::Unsupported);
    }

    #[test]
    fn test_window_frame() {
        let Expr::Window { window, .. } = expr(
            "sum(x) OVER (PARTITION BY a ORDER BY b ROWS BETWEEN 2 PRECEDING AND CURRENT ROW)",
        ) else {
            panic!("expected window");
        };
        assert_eq!(window.partition_by, vec![col("a")]);
        let frame = window.frame.unwrap();
        assert_eq!(frame.units, FrameUnits::Rows);
        assert_eq!(frame.start, FrameBound::Preceding(Box::new(Expr::integer(2))));
        assert_eq!(frame.end, Some(FrameBound::CurrentRow));
    }

    #[test]
    fn test_cast_and_data_types() {
        let Expr::Cast { data_type, .. } = expr("CAST(a AS CHARACTER VARYING(5))") else {
            panic!("expected cast");
        };
        assert_eq!(data_type.name, "character_varying");
        assert_eq!(data_type.params, vec![Expr::integer(5)]);
        assert!(matches!(
            expr_in(&SNOWFLAKE, "TRY_CAST(a AS int)"),
            Ok(Expr::Cast { try_cast: true, .. })
        ));
    }

    #[test]
    fn test_case_requires_when() {
        assert!(expr_in(&ANSI, "CASE a END").is_err());
        assert!(matches!(
            expr("CASE a WHEN 1 THEN 'x' ELSE 'y' END"),
            Expr::Case { operand: Some(_), .. }
        ));
    }

    #[test]
    fn test_trim_forms() {
        let Expr::Function(call) = expr("trim(' ' FROM b + c)") else {
            panic!("expected call");
        };
        assert_eq!(call.name, "trim");
        assert_eq!(call.named_args[0].0, "characters");
        let Expr::Function(call) = expr("TRIM(LEADING 'x' FROM y)") else {
            panic!("expected call");
        };
        assert_eq!(call.named_args[0], ("direction".to_string(), Expr::Word("leading".into())));
    }

    #[test]
    fn test_typed_literals_and_intervals() {
        assert_eq!(
            expr("DATE '2020-01-01'"),
            Expr::TypedString {
                data_type: "date".into(),
                value: "2020-01-01".into(),
            }
        );
        assert_eq!(
            expr("INTERVAL '1' DAY"),
            Expr::Interval {
                value: Box::new(Expr::string("1")),
                unit: Some("day".into()),
            }
        );
        // a bare word stays a column
        assert_eq!(expr("date"), col("date"));
    }

    #[test]
    fn test_function_name_keywords() {
        let Expr::Function(call) = expr("RIGHT('00', 2)") else {
            panic!("expected call");
        };
        assert_eq!(call.name, "right");
    }

    #[test]
    fn test_long_subtraction_chain_hits_limit() {
        let sql = format!("a{}", " - a".repeat(200));
        let error = expr_in(&ANSI, &sql).unwrap_err();
        assert_eq!(error.kind, ErrorKind::DepthExceeded);
    }
}
