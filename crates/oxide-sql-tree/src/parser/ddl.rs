//! DDL grammar: CREATE TABLE/VIEW/INDEX, ALTER and DROP.

use super::error::ParseError;
use super::parser::Parser;
use crate::ast::{
    AlterTableAction, AlterTableStatement, ColumnDef, ConstraintKind, CreateIndexStatement,
    CreateTableStatement, CreateViewStatement, DropStatement, Expr, ForeignKeyRef, IndexColumn,
    IndexDef, ObjectType, OrderDirection, Statement, TableConstraint, TableOption,
};
use crate::dialect::Feature;
use crate::lexer::{Keyword, TokenKind};

impl Parser<'_> {
    /// Parses CREATE TABLE, CREATE VIEW and CREATE INDEX.
    pub(super) fn parse_create(&mut self) -> Result<Statement, ParseError> {
        self.expect_keyword(Keyword::Create)?;
        let or_replace = self.consume_keywords(&[Keyword::Or, Keyword::Replace]);
        let temporary =
            self.consume_keyword(Keyword::Temporary) || self.consume_keyword(Keyword::Temp);
        let transient = if self.check_keyword(Keyword::Transient) {
            self.require(Feature::TransientTables)?;
            self.advance();
            true
        } else {
            false
        };
        let unique = self.consume_keyword(Keyword::Unique);
        let algorithm = if self.check_keyword(Keyword::Algorithm) {
            self.require(Feature::ViewAlgorithm)?;
            self.advance();
            self.expect(&TokenKind::Eq)?;
            Some(self.expect_word()?.to_lowercase())
        } else {
            None
        };

        if self.consume_keyword(Keyword::Table) {
            let mut create = CreateTableStatement {
                or_replace,
                temporary,
                transient,
                ..CreateTableStatement::default()
            };
            self.with_context("CREATE TABLE", |p| p.parse_create_table(&mut create))?;
            return Ok(Statement::CreateTable(create));
        }
        if self.consume_keyword(Keyword::View) {
            let if_not_exists = self.parse_if_not_exists();
            let name = self.parse_object_name()?;
            let columns = if self.check(&TokenKind::LeftParen) {
                self.parse_identifier_list()?
            } else {
                Vec::new()
            };
            self.expect_keyword(Keyword::As)?;
            let query = self.parse_query()?;
            return Ok(Statement::CreateView(CreateViewStatement {
                name,
                or_replace,
                temporary,
                if_not_exists,
                algorithm,
                columns,
                query: Box::new(query),
            }));
        }
        if self.consume_keyword(Keyword::Index) {
            let if_not_exists = self.parse_if_not_exists();
            let name = self.expect_identifier()?;
            self.expect_keyword(Keyword::On)?;
            let table = self.parse_object_name()?;
            let mut using = self.parse_index_method()?;
            let columns = self.parse_index_columns()?;
            if using.is_none() {
                using = self.parse_index_method()?;
            }
            return Ok(Statement::CreateIndex(CreateIndexStatement {
                name,
                table,
                unique,
                if_not_exists,
                columns,
                using,
            }));
        }
        Err(self.expected("TABLE, VIEW or INDEX"))
    }

    fn parse_if_not_exists(&mut self) -> bool {
        self.consume_keywords(&[Keyword::If, Keyword::Not, Keyword::Exists])
    }

    fn parse_create_table(&mut self, create: &mut CreateTableStatement) -> Result<(), ParseError> {
        create.if_not_exists = self.parse_if_not_exists();
        create.name = self.parse_object_name()?;
        if self.consume(&TokenKind::LeftParen) {
            loop {
                if self.starts_table_constraint() {
                    create.constraints.push(self.parse_table_constraint()?);
                } else {
                    create.columns.push(self.parse_column_def()?);
                }
                if !self.consume(&TokenKind::Comma) || self.check(&TokenKind::RightParen) {
                    break;
                }
            }
            self.expect(&TokenKind::RightParen)?;
            create.options = self.parse_table_options()?;
        }
        if self.consume_keyword(Keyword::As) {
            create.query = Some(Box::new(self.parse_query()?));
        } else if create.columns.is_empty() && create.constraints.is_empty() {
            return Err(self.expected("column list or AS"));
        }
        Ok(())
    }

    /// Returns true if a table constraint, rather than a column, starts
    /// here. `KEY` and `INDEX` only count where the dialect reserves them,
    /// so elsewhere they remain usable as column names.
    fn starts_table_constraint(&self) -> bool {
        matches!(
            self.current().kind,
            TokenKind::Keyword(
                Keyword::Constraint
                    | Keyword::Primary
                    | Keyword::Unique
                    | Keyword::Foreign
                    | Keyword::Check
                    | Keyword::Key
                    | Keyword::Index
            )
        )
    }

    fn parse_table_constraint(&mut self) -> Result<TableConstraint, ParseError> {
        let name = if self.consume_keyword(Keyword::Constraint) {
            Some(self.expect_identifier()?)
        } else {
            None
        };
        let kind = if self.consume_keywords(&[Keyword::Primary, Keyword::Key]) {
            ConstraintKind::PrimaryKey(self.parse_index_def(false)?)
        } else if self.consume_keyword(Keyword::Unique) {
            if !self.consume_keyword(Keyword::Key) {
                self.consume_keyword(Keyword::Index);
            }
            ConstraintKind::Unique(self.parse_index_def(true)?)
        } else if self.consume_keywords(&[Keyword::Foreign, Keyword::Key]) {
            let columns = self.parse_identifier_list()?;
            let references = self.parse_references()?;
            ConstraintKind::ForeignKey {
                columns,
                references,
            }
        } else if self.consume_keyword(Keyword::Check) {
            self.expect(&TokenKind::LeftParen)?;
            let check = self.parse_expr()?;
            self.expect(&TokenKind::RightParen)?;
            ConstraintKind::Check(check)
        } else if self.check_keyword(Keyword::Key) || self.check_keyword(Keyword::Index) {
            self.require(Feature::TableOptions)?;
            self.advance();
            ConstraintKind::Index(self.parse_index_def(true)?)
        } else {
            return Err(self.expected("constraint"));
        };
        Ok(TableConstraint { name, kind })
    }

    /// Parses `[name] [USING m] (columns) [USING m] [COMMENT '..']`.
    fn parse_index_def(&mut self, named: bool) -> Result<IndexDef, ParseError> {
        let mut index = IndexDef::default();
        if named && matches!(self.current().kind, TokenKind::Identifier(_))
            && !self.check_keyword(Keyword::Using)
        {
            index.name = Some(self.expect_identifier()?);
        }
        index.using = self.parse_index_method()?;
        index.columns = self.parse_index_columns()?;
        loop {
            if self.check_keyword(Keyword::Using) {
                index.using = self.parse_index_method()?;
            } else if self.consume_keyword(Keyword::Comment) {
                index.comment = Some(self.expect_string()?);
            } else {
                return Ok(index);
            }
        }
    }

    /// Parses `USING BTREE|HASH`, keeping the method as written.
    fn parse_index_method(&mut self) -> Result<Option<String>, ParseError> {
        if self.consume_keyword(Keyword::Using) {
            Ok(Some(self.expect_word()?))
        } else {
            Ok(None)
        }
    }

    /// Parses `(a, b(10) DESC)`.
    fn parse_index_columns(&mut self) -> Result<Vec<IndexColumn>, ParseError> {
        self.expect(&TokenKind::LeftParen)?;
        let mut columns = Vec::new();
        loop {
            let name = self.expect_identifier()?;
            let length = if self.consume(&TokenKind::LeftParen) {
                let length = match self.current().kind {
                    TokenKind::Integer(n) => n,
                    _ => return Err(self.expected("index prefix length")),
                };
                self.advance();
                self.expect(&TokenKind::RightParen)?;
                Some(length)
            } else {
                None
            };
            let direction = if self.consume_keyword(Keyword::Asc) {
                Some(OrderDirection::Asc)
            } else if self.consume_keyword(Keyword::Desc) {
                Some(OrderDirection::Desc)
            } else {
                None
            };
            columns.push(IndexColumn {
                name,
                length,
                direction,
            });
            if !self.consume(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::RightParen)?;
        Ok(columns)
    }

    /// `REFERENCES table [(columns)] [ON DELETE action] [ON UPDATE action]`
    fn parse_references(&mut self) -> Result<ForeignKeyRef, ParseError> {
        self.expect_keyword(Keyword::References)?;
        let table = self.parse_object_name()?;
        let columns = if self.check(&TokenKind::LeftParen) {
            self.parse_identifier_list()?
        } else {
            Vec::new()
        };
        let mut references = ForeignKeyRef {
            table,
            columns,
            on_delete: None,
            on_update: None,
        };
        loop {
            if self.consume_keywords(&[Keyword::On, Keyword::Delete]) {
                references.on_delete = Some(self.parse_referential_action()?);
            } else if self.consume_keywords(&[Keyword::On, Keyword::Update]) {
                references.on_update = Some(self.parse_referential_action()?);
            } else {
                return Ok(references);
            }
        }
    }

    /// CASCADE, RESTRICT, SET NULL, SET DEFAULT or NO ACTION, lower-cased.
    fn parse_referential_action(&mut self) -> Result<String, ParseError> {
        let first = self.expect_word()?.to_lowercase();
        if first == "set" || first == "no" {
            let second = self.expect_word()?.to_lowercase();
            return Ok(format!("{first} {second}"));
        }
        Ok(first)
    }

    /// Parses a column name, type and options.
    pub(super) fn parse_column_def(&mut self) -> Result<ColumnDef, ParseError> {
        let name = self.expect_identifier()?;
        let data_type = self.parse_data_type()?;
        let mut column = ColumnDef::new(name, data_type);
        loop {
            if self.consume_keywords(&[Keyword::Not, Keyword::Null]) {
                column.nullable = Some(false);
            } else if self.consume_keyword(Keyword::Null) {
                column.nullable = Some(true);
            } else if self.consume_keyword(Keyword::Default) {
                column.default = Some(self.parse_expr()?);
            } else if self.check_keyword(Keyword::On) && self.peek_keyword(1, Keyword::Update) {
                self.require(Feature::ColumnOptions)?;
                self.advance();
                self.advance();
                column.on_update = Some(self.parse_expr()?);
            } else if self.check_keyword(Keyword::AutoIncrement) {
                self.require(Feature::ColumnOptions)?;
                self.advance();
                column.auto_increment = true;
            } else if self.consume_keywords(&[Keyword::Character, Keyword::Set])
                || self.consume_keyword(Keyword::Charset)
            {
                column.character_set = Some(self.expect_word_or_string()?);
            } else if self.consume_keyword(Keyword::Collate) {
                column.collate = Some(self.expect_word_or_string()?);
            } else if self.consume_keyword(Keyword::Comment) {
                column.comment = Some(self.expect_string()?);
            } else if self.consume_keywords(&[Keyword::Primary, Keyword::Key]) {
                column.primary_key = true;
            } else if self.consume_keyword(Keyword::Unique) {
                self.consume_keyword(Keyword::Key);
                column.unique = true;
            } else if self.check_keyword(Keyword::References) {
                column.references = Some(self.parse_references()?);
            } else {
                return Ok(column);
            }
        }
    }

    /// Parses trailing `NAME [=] value` options such as `ENGINE=InnoDB`.
    fn parse_table_options(&mut self) -> Result<Vec<TableOption>, ParseError> {
        let mut options = Vec::new();
        while self.check_word() && !self.check_keyword(Keyword::As) {
            self.require(Feature::TableOptions)?;
            let mut words = vec![self.expect_word()?.to_lowercase()];
            while self.check_word() {
                words.push(self.expect_word()?.to_lowercase());
            }
            self.expect(&TokenKind::Eq)?;
            let value = match &self.current().kind {
                TokenKind::Identifier(_) | TokenKind::Keyword(_) => Expr::Word(self.expect_word()?),
                _ => self.parse_expr_bp(u8::MAX)?,
            };
            options.push(TableOption {
                name: words.join("_"),
                value,
            });
            self.consume(&TokenKind::Comma);
        }
        Ok(options)
    }

    /// Expects a string literal.
    pub(super) fn expect_string(&mut self) -> Result<String, ParseError> {
        match &self.current().kind {
            TokenKind::String(value) => {
                let value = value.clone();
                self.advance();
                Ok(value)
            }
            _ => Err(self.expected("string literal")),
        }
    }

    fn expect_word_or_string(&mut self) -> Result<String, ParseError> {
        if matches!(self.current().kind, TokenKind::String(_)) {
            self.expect_string()
        } else {
            self.expect_word()
        }
    }

    /// Parses `ALTER TABLE` and `ALTER SESSION`.
    pub(super) fn parse_alter(&mut self) -> Result<Statement, ParseError> {
        self.expect_keyword(Keyword::Alter)?;
        if self.check_keyword(Keyword::Session) {
            self.require(Feature::SessionParameters)?;
            self.advance();
            if self.check_keyword(Keyword::Unset) {
                return self.parse_unset();
            }
            self.expect_keyword(Keyword::Set)?;
            return self.parse_set_assignments(None);
        }
        self.expect_keyword(Keyword::Table)?;
        let name = self.parse_object_name()?;
        let mut actions = vec![self.parse_alter_action()?];
        while self.consume(&TokenKind::Comma) {
            actions.push(self.parse_alter_action()?);
        }
        Ok(Statement::AlterTable(AlterTableStatement { name, actions }))
    }

    fn parse_alter_action(&mut self) -> Result<AlterTableAction, ParseError> {
        if self.consume_keyword(Keyword::Add) {
            if self.starts_table_constraint() {
                return Ok(AlterTableAction::AddConstraint(
                    self.parse_table_constraint()?,
                ));
            }
            self.consume_keyword(Keyword::Column);
            return Ok(AlterTableAction::AddColumn(self.parse_column_def()?));
        }
        if self.consume_keyword(Keyword::Drop) {
            self.consume_keyword(Keyword::Column);
            let if_exists = self.consume_keywords(&[Keyword::If, Keyword::Exists]);
            let name = self.expect_identifier()?;
            return Ok(AlterTableAction::DropColumn { name, if_exists });
        }
        if self.check_keyword(Keyword::Modify) {
            self.require(Feature::ColumnOptions)?;
            self.advance();
            self.consume_keyword(Keyword::Column);
            return Ok(AlterTableAction::ModifyColumn(self.parse_column_def()?));
        }
        if self.consume_keyword(Keyword::Rename) {
            if self.consume_keyword(Keyword::Column) {
                let from = self.expect_identifier()?;
                self.expect_keyword(Keyword::To)?;
                let to = self.expect_identifier()?;
                return Ok(AlterTableAction::RenameColumn { from, to });
            }
            self.expect_keyword(Keyword::To)?;
            return Ok(AlterTableAction::RenameTable(self.parse_object_name()?));
        }
        Err(self.expected("ADD, DROP, MODIFY or RENAME"))
    }

    /// `DROP TABLE|VIEW|INDEX|SCHEMA|DATABASE [IF EXISTS] names [CASCADE]`
    pub(super) fn parse_drop(&mut self) -> Result<Statement, ParseError> {
        self.expect_keyword(Keyword::Drop)?;
        let object_type = if self.consume_keyword(Keyword::Table) {
            ObjectType::Table
        } else if self.consume_keyword(Keyword::View) {
            ObjectType::View
        } else if self.consume_keyword(Keyword::Index) {
            ObjectType::Index
        } else if self.consume_keyword(Keyword::Schema) {
            ObjectType::Schema
        } else if self.consume_keyword(Keyword::Database) {
            ObjectType::Database
        } else {
            return Err(self.expected("TABLE, VIEW, INDEX, SCHEMA or DATABASE"));
        };
        let if_exists = self.consume_keywords(&[Keyword::If, Keyword::Exists]);
        let mut names = vec![self.parse_object_name()?];
        while self.consume(&TokenKind::Comma) {
            names.push(self.parse_object_name()?);
        }
        let cascade = self.consume_keyword(Keyword::Cascade);
        Ok(Statement::Drop(DropStatement {
            object_type,
            names,
            if_exists,
            cascade,
        }))
    }
}
