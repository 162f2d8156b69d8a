//! Utility statements: COPY INTO, EXPLAIN/DESCRIBE, SET, UNSET and USE.

use super::error::{ErrorKind, ParseError};
use super::parser::Parser;
use crate::ast::{
    CopyOption, CopyOptionValue, CopySource, CopyStatement, ExplainFormat, Expr, SetScope,
    Statement,
};
use crate::dialect::Feature;
use crate::lexer::{Keyword, Span, TokenKind};

/// Top-level options accepted by COPY INTO.
const COPY_OPTIONS: &[&str] = &[
    "file_format",
    "credentials",
    "encryption",
    "storage_integration",
    "pattern",
    "files",
    "force",
    "purge",
    "on_error",
    "size_limit",
    "validation_mode",
    "match_by_column_name",
    "return_failed_only",
    "enforce_length",
    "truncatecolumns",
    "load_uncertain_files",
    "header",
    "single",
    "max_file_size",
    "overwrite",
    "include_query_id",
    "detailed_output",
];

/// Output formats accepted by `EXPLAIN FORMAT = ..`.
const EXPLAIN_FORMATS: &[&str] = &["traditional", "tree", "json"];

/// Fails when `name` already appears among `options`.
fn reject_repeated_option(
    options: &[CopyOption],
    name: &str,
    span: Span,
) -> Result<(), ParseError> {
    if options.iter().any(|option| option.name == name) {
        return Err(ParseError::new(
            ErrorKind::Grammar,
            format!("COPY option {} is given more than once", name.to_uppercase()),
            span,
        ));
    }
    Ok(())
}

impl Parser<'_> {
    /// `COPY INTO target [(columns)] [FROM source] [option = value ...]`
    pub(super) fn parse_copy(&mut self) -> Result<Statement, ParseError> {
        self.expect_keyword(Keyword::Copy)?;
        self.expect_keyword(Keyword::Into)?;
        let into = self.parse_copy_location()?;
        let columns = if self.check(&TokenKind::LeftParen) {
            self.parse_identifier_list()?
        } else {
            Vec::new()
        };
        let from = if self.consume_keyword(Keyword::From) {
            Some(self.parse_copy_location()?)
        } else {
            None
        };

        let mut options: Vec<CopyOption> = Vec::new();
        while self.check_word() {
            let span = self.current().span;
            let name = self.expect_word()?.to_lowercase();
            if !COPY_OPTIONS.contains(&name.as_str()) {
                return Err(ParseError::new(
                    ErrorKind::Grammar,
                    format!("unknown COPY option {}", name.to_uppercase()),
                    span,
                ));
            }
            reject_repeated_option(&options, &name, span)?;
            self.expect(&TokenKind::Eq)?;
            let value = self.parse_copy_value()?;
            options.push(CopyOption { name, value });
            self.consume(&TokenKind::Comma);
        }

        Ok(Statement::Copy(CopyStatement {
            into,
            columns,
            from,
            options,
        }))
    }

    /// Parses a stage path, URL, quoted location, subquery or table name.
    fn parse_copy_location(&mut self) -> Result<CopySource, ParseError> {
        let token = self.current().clone();
        match &token.kind {
            TokenKind::Variable(_) | TokenKind::At => {
                Ok(CopySource::Location(self.parse_raw_path()?))
            }
            TokenKind::Identifier(_)
                if self.peek_token(1).kind == TokenKind::Colon
                    && self.peek_token(1).span.start == token.span.end =>
            {
                Ok(CopySource::Location(self.parse_raw_path()?))
            }
            TokenKind::String(location) => {
                let location = location.clone();
                self.advance();
                Ok(CopySource::Literal(location))
            }
            TokenKind::LeftParen => {
                self.advance();
                let query = self.parse_query()?;
                self.expect(&TokenKind::RightParen)?;
                Ok(CopySource::Query(Box::new(query)))
            }
            _ => Ok(CopySource::Table(self.parse_object_name()?)),
        }
    }

    /// Parses an option value: a word, literal, `(k = v ...)` group or
    /// `(v, ...)` list.
    fn parse_copy_value(&mut self) -> Result<CopyOptionValue, ParseError> {
        match &self.current().kind {
            TokenKind::LeftParen => {
                let is_group = self.peek_token(2).kind == TokenKind::Eq
                    && matches!(
                        self.peek_token(1).kind,
                        TokenKind::Identifier(_) | TokenKind::Keyword(_)
                    );
                self.advance();
                let value = if is_group {
                    CopyOptionValue::Group(self.nested(Self::parse_copy_group)?)
                } else {
                    CopyOptionValue::List(self.parse_expr_list()?)
                };
                self.expect(&TokenKind::RightParen)?;
                Ok(value)
            }
            TokenKind::Keyword(Keyword::True | Keyword::False | Keyword::Null) => {
                Ok(CopyOptionValue::Value(self.parse_expr_bp(u8::MAX)?))
            }
            TokenKind::Identifier(_) | TokenKind::Keyword(_) => {
                Ok(CopyOptionValue::Value(Expr::Word(self.expect_word()?)))
            }
            _ => Ok(CopyOptionValue::Value(self.parse_expr_bp(u8::MAX)?)),
        }
    }

    /// Parses the inside of `(k = v k = v)`; commas between pairs are
    /// optional.
    fn parse_copy_group(&mut self) -> Result<Vec<CopyOption>, ParseError> {
        let mut options = Vec::new();
        while !self.check(&TokenKind::RightParen) {
            let span = self.current().span;
            let name = self.expect_word()?.to_lowercase();
            reject_repeated_option(&options, &name, span)?;
            self.expect(&TokenKind::Eq)?;
            let value = self.parse_copy_value()?;
            options.push(CopyOption { name, value });
            self.consume(&TokenKind::Comma);
        }
        Ok(options)
    }

    /// Parses EXPLAIN, DESC and DESCRIBE.
    ///
    /// `DESCRIBE [TABLE] name` describes a table; followed by FORMAT or a
    /// statement, DESC and DESCRIBE are synonyms for EXPLAIN.
    pub(super) fn parse_explain(&mut self) -> Result<Statement, ParseError> {
        let explain = self.consume_keyword(Keyword::Explain);
        if !explain {
            let describes_table = !self.peek_keyword(1, Keyword::Format)
                && !matches!(self.peek_token(1).kind, TokenKind::LeftParen)
                && ![
                    Keyword::Select,
                    Keyword::With,
                    Keyword::Insert,
                    Keyword::Update,
                    Keyword::Delete,
                ]
                .iter()
                .any(|keyword| self.peek_keyword(1, *keyword));
            if describes_table {
                self.advance();
                self.consume_keyword(Keyword::Table);
                return Ok(Statement::Describe(self.parse_object_name()?));
            }
            self.require(Feature::ExplainFormat)?;
            self.advance();
        }

        let format = if self.check_keyword(Keyword::Format) {
            self.require(Feature::ExplainFormat)?;
            self.advance();
            self.expect(&TokenKind::Eq)?;
            let format = self.expect_word()?.to_lowercase();
            if !EXPLAIN_FORMATS.contains(&format.as_str()) {
                return Err(self.error(format!("unknown EXPLAIN format {format}")));
            }
            Some(ExplainFormat(format))
        } else {
            None
        };
        let statement = self.nested(Self::statement)?;
        Ok(Statement::Explain {
            statement: Box::new(statement),
            format,
        })
    }

    /// `SET [SESSION|GLOBAL|LOCAL] name = value, ...`
    pub(super) fn parse_set(&mut self) -> Result<Statement, ParseError> {
        self.expect_keyword(Keyword::Set)?;
        let scope = if self.consume_keyword(Keyword::Session) {
            Some(SetScope::Session)
        } else if self.consume_keyword(Keyword::Global) {
            Some(SetScope::Global)
        } else if self.consume_keyword(Keyword::Local) {
            Some(SetScope::Local)
        } else {
            None
        };
        self.parse_set_assignments(scope)
    }

    /// Parses `name = value, ...`, rejecting a name set twice.
    pub(super) fn parse_set_assignments(
        &mut self,
        scope: Option<SetScope>,
    ) -> Result<Statement, ParseError> {
        let mut assignments: Vec<(String, Expr)> = Vec::new();
        loop {
            let span = self.current().span;
            let name = self.parse_parameter_name()?;
            if assignments.iter().any(|(existing, _)| existing == &name) {
                return Err(ParseError::new(
                    ErrorKind::Grammar,
                    format!("parameter {name} is set more than once"),
                    span,
                ));
            }
            if !self.consume(&TokenKind::Eq) {
                self.expect_keyword(Keyword::To)?;
            }
            let value = self.parse_expr()?;
            assignments.push((name, value));
            if !self.consume(&TokenKind::Comma) {
                return Ok(Statement::Set { scope, assignments });
            }
        }
    }

    /// `UNSET name, ...`
    pub(super) fn parse_unset(&mut self) -> Result<Statement, ParseError> {
        self.expect_keyword(Keyword::Unset)?;
        let mut names = vec![self.parse_parameter_name()?];
        while self.consume(&TokenKind::Comma) {
            names.push(self.parse_parameter_name()?);
        }
        Ok(Statement::Unset(names))
    }

    /// A parameter or variable name, as written: `LOCK_TIMEOUT`,
    /// `@@session.sql_mode`, `@var`.
    fn parse_parameter_name(&mut self) -> Result<String, ParseError> {
        let mut name = match &self.current().kind {
            TokenKind::Variable(variable) => {
                let variable = variable.clone();
                self.advance();
                variable
            }
            _ => self.expect_word()?,
        };
        while self.consume(&TokenKind::Dot) {
            name.push('.');
            name.push_str(&self.expect_word()?);
        }
        Ok(name)
    }

    /// `USE [DATABASE|SCHEMA] name`
    pub(super) fn parse_use(&mut self) -> Result<Statement, ParseError> {
        self.expect_keyword(Keyword::Use)?;
        let qualified = matches!(self.peek_token(1).kind, TokenKind::Identifier(_));
        if qualified
            && (self.check_keyword(Keyword::Database) || self.check_keyword(Keyword::Schema))
        {
            self.advance();
        }
        Ok(Statement::Use(self.parse_object_name()?))
    }
}
