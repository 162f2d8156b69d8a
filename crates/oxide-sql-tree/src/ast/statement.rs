//! SQL statement AST types.

use super::ddl::{
    AlterTableStatement, CreateIndexStatement, CreateTableStatement, CreateViewStatement,
    DropStatement,
};
use super::expression::{Expr, ObjectName};
use super::query::{OrderByExpr, Query, TableRef, Top};

/// Source of rows for INSERT.
#[derive(Debug, Clone, PartialEq)]
pub enum InsertSource {
    /// VALUES (...), (...).
    Values(Vec<Vec<Expr>>),
    /// INSERT ... SELECT.
    Query(Box<Query>),
    /// DEFAULT VALUES.
    DefaultValues,
}

/// INSERT statement.
#[derive(Debug, Clone, PartialEq)]
pub struct InsertStatement {
    /// Target table.
    pub table: ObjectName,
    /// Column list, empty when omitted.
    pub columns: Vec<String>,
    /// Row source.
    pub source: InsertSource,
    /// MySQL `INSERT IGNORE`.
    pub ignore: bool,
    /// `INSERT OVERWRITE`.
    pub overwrite: bool,
}

/// A `column = value` pair of UPDATE SET or MERGE UPDATE.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub column: ObjectName,
    pub value: Expr,
}

/// UPDATE statement.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateStatement {
    /// Target table with optional alias.
    pub table: TableRef,
    /// SET assignments. Columns are unique.
    pub assignments: Vec<Assignment>,
    /// Extra FROM items.
    pub from: Vec<TableRef>,
    /// WHERE clause.
    pub where_clause: Option<Expr>,
}

/// DELETE statement.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DeleteStatement {
    /// Tables rows are deleted from.
    pub targets: Vec<TableRef>,
    /// FROM/USING items when targets are listed separately.
    pub from: Vec<TableRef>,
    /// WHERE clause.
    pub where_clause: Option<Expr>,
    pub order_by: Vec<OrderByExpr>,
    pub limit: Option<Expr>,
    pub low_priority: bool,
    pub quick: bool,
    pub ignore: bool,
}

/// Which rows a MERGE clause applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeMatch {
    Matched,
    NotMatchedByTarget,
    NotMatchedBySource,
}

impl MergeMatch {
    /// Returns the value used in the output tree.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Matched => "matched",
            Self::NotMatchedByTarget => "not_matched_by_target",
            Self::NotMatchedBySource => "not_matched_by_source",
        }
    }
}

/// The action of a MERGE clause.
#[derive(Debug, Clone, PartialEq)]
pub enum MergeAction {
    Update(Vec<Assignment>),
    Delete,
    Insert {
        columns: Vec<String>,
        values: Vec<Expr>,
    },
}

/// `WHEN [NOT] MATCHED [BY ..] [AND cond] THEN action`.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeClause {
    pub kind: MergeMatch,
    pub condition: Option<Expr>,
    pub action: MergeAction,
}

/// MERGE statement.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeStatement {
    pub top: Option<Top>,
    pub target: TableRef,
    pub source: TableRef,
    pub on: Expr,
    pub clauses: Vec<MergeClause>,
}

/// Where COPY reads from.
#[derive(Debug, Clone, PartialEq)]
pub enum CopySource {
    /// Stage reference or URL, kept verbatim (`@stage/path`, `s3://..`).
    Location(String),
    /// Quoted location.
    Literal(String),
    /// A table name.
    Table(ObjectName),
    /// `(SELECT ..)` transformation.
    Query(Box<Query>),
}

/// The value of a COPY option.
#[derive(Debug, Clone, PartialEq)]
pub enum CopyOptionValue {
    Value(Expr),
    /// Parenthesized `(k = v ...)` group.
    Group(Vec<CopyOption>),
    /// Parenthesized value list such as `('a.csv', 'b.csv')`.
    List(Vec<Expr>),
}

/// A `name = value` COPY option.
#[derive(Debug, Clone, PartialEq)]
pub struct CopyOption {
    /// Lower-cased option name.
    pub name: String,
    pub value: CopyOptionValue,
}

/// Snowflake COPY INTO statement.
#[derive(Debug, Clone, PartialEq)]
pub struct CopyStatement {
    pub into: CopySource,
    pub columns: Vec<String>,
    /// Absent when the files come from the table's own stage.
    pub from: Option<CopySource>,
    pub options: Vec<CopyOption>,
}

/// EXPLAIN output formats.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplainFormat(pub String);

/// Scope keyword of SET.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetScope {
    Session,
    Global,
    Local,
}

/// SQL statements.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// SELECT / WITH / set operations.
    Query(Box<Query>),
    Insert(InsertStatement),
    Update(UpdateStatement),
    Delete(DeleteStatement),
    Merge(MergeStatement),
    CreateTable(CreateTableStatement),
    CreateView(CreateViewStatement),
    CreateIndex(CreateIndexStatement),
    AlterTable(AlterTableStatement),
    Drop(DropStatement),
    Copy(CopyStatement),
    /// `EXPLAIN [FORMAT = x] stmt`.
    Explain {
        statement: Box<Statement>,
        format: Option<ExplainFormat>,
    },
    /// `DESCRIBE [TABLE] name`.
    Describe(ObjectName),
    /// `SET` or `ALTER SESSION SET`. Names are unique.
    Set {
        scope: Option<SetScope>,
        assignments: Vec<(String, Expr)>,
    },
    /// `UNSET` or `ALTER SESSION UNSET`.
    Unset(Vec<String>),
    /// `USE [DATABASE|SCHEMA] name`.
    Use(ObjectName),
}
