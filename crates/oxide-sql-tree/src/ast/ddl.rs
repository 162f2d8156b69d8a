//! DDL AST types: CREATE, ALTER and DROP.

use super::expression::{Expr, ObjectName};
use super::query::{OrderDirection, Query};
use super::types::DataType;

/// A column definition in CREATE TABLE / ALTER TABLE.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDef {
    /// Column name.
    pub name: String,
    /// Data type.
    pub data_type: DataType,
    /// `NULL` gives `Some(true)`, `NOT NULL` gives `Some(false)`.
    pub nullable: Option<bool>,
    /// DEFAULT value.
    pub default: Option<Expr>,
    /// MySQL `ON UPDATE` value.
    pub on_update: Option<Expr>,
    /// `CHARACTER SET` / `CHARSET`.
    pub character_set: Option<String>,
    /// `COLLATE`.
    pub collate: Option<String>,
    /// `COMMENT '..'`.
    pub comment: Option<String>,
    /// `AUTO_INCREMENT`.
    pub auto_increment: bool,
    /// Inline `PRIMARY KEY`.
    pub primary_key: bool,
    /// Inline `UNIQUE`.
    pub unique: bool,
    /// Inline `REFERENCES t (c)`.
    pub references: Option<ForeignKeyRef>,
}

impl ColumnDef {
    /// Creates a column definition with no options.
    #[must_use]
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            nullable: None,
            default: None,
            on_update: None,
            character_set: None,
            collate: None,
            comment: None,
            auto_increment: false,
            primary_key: false,
            unique: false,
            references: None,
        }
    }
}

/// A column of an index or key, with optional prefix length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexColumn {
    pub name: String,
    pub length: Option<i64>,
    pub direction: Option<OrderDirection>,
}

/// The body shared by PRIMARY KEY, UNIQUE and KEY/INDEX definitions.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IndexDef {
    pub name: Option<String>,
    pub columns: Vec<IndexColumn>,
    /// `USING BTREE|HASH`, as written.
    pub using: Option<String>,
    pub comment: Option<String>,
}

/// `REFERENCES table (columns)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKeyRef {
    pub table: ObjectName,
    pub columns: Vec<String>,
    /// `ON DELETE` action, lower-cased.
    pub on_delete: Option<String>,
    /// `ON UPDATE` action, lower-cased.
    pub on_update: Option<String>,
}

/// Table-level constraint kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstraintKind {
    PrimaryKey(IndexDef),
    Unique(IndexDef),
    /// MySQL `KEY` / `INDEX`.
    Index(IndexDef),
    ForeignKey {
        columns: Vec<String>,
        references: ForeignKeyRef,
    },
    Check(Expr),
}

/// A table-level constraint, optionally named with `CONSTRAINT name`.
#[derive(Debug, Clone, PartialEq)]
pub struct TableConstraint {
    pub name: Option<String>,
    pub kind: ConstraintKind,
}

/// A trailing table option such as `ENGINE=InnoDB`.
#[derive(Debug, Clone, PartialEq)]
pub struct TableOption {
    /// Lower-cased option name, multi-word names joined with `_`.
    pub name: String,
    pub value: Expr,
}

/// CREATE TABLE statement.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CreateTableStatement {
    pub name: ObjectName,
    pub or_replace: bool,
    pub temporary: bool,
    pub transient: bool,
    pub if_not_exists: bool,
    pub columns: Vec<ColumnDef>,
    pub constraints: Vec<TableConstraint>,
    pub options: Vec<TableOption>,
    /// `AS SELECT ..`
    pub query: Option<Box<Query>>,
}

/// CREATE VIEW statement.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateViewStatement {
    pub name: ObjectName,
    pub or_replace: bool,
    pub temporary: bool,
    pub if_not_exists: bool,
    /// MySQL `ALGORITHM = ..`, lower-cased.
    pub algorithm: Option<String>,
    pub columns: Vec<String>,
    pub query: Box<Query>,
}

/// CREATE INDEX statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateIndexStatement {
    pub name: String,
    pub table: ObjectName,
    pub unique: bool,
    pub if_not_exists: bool,
    pub columns: Vec<IndexColumn>,
    pub using: Option<String>,
}

/// One ALTER TABLE action.
#[derive(Debug, Clone, PartialEq)]
pub enum AlterTableAction {
    AddColumn(ColumnDef),
    AddConstraint(TableConstraint),
    DropColumn { name: String, if_exists: bool },
    ModifyColumn(ColumnDef),
    RenameTable(ObjectName),
    RenameColumn { from: String, to: String },
}

/// ALTER TABLE statement.
#[derive(Debug, Clone, PartialEq)]
pub struct AlterTableStatement {
    pub name: ObjectName,
    pub actions: Vec<AlterTableAction>,
}

/// Kinds of objects DROP can remove.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectType {
    Table,
    View,
    Index,
    Schema,
    Database,
}

impl ObjectType {
    /// Returns the key used in the output tree.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Table => "table",
            Self::View => "view",
            Self::Index => "index",
            Self::Schema => "schema",
            Self::Database => "database",
        }
    }
}

/// DROP statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropStatement {
    pub object_type: ObjectType,
    pub names: Vec<ObjectName>,
    pub if_exists: bool,
    pub cascade: bool,
}
