//! Abstract Syntax Tree (AST) types for SQL statements.
//!
//! The parser builds these; [`crate::normalize`] turns them into the
//! canonical JSON-shaped tree.

mod ddl;
mod expression;
mod query;
mod statement;
mod types;

pub use ddl::{
    AlterTableAction, AlterTableStatement, ColumnDef, ConstraintKind, CreateIndexStatement,
    CreateTableStatement, CreateViewStatement, DropStatement, ForeignKeyRef, IndexColumn,
    IndexDef, ObjectType, TableConstraint, TableOption,
};
pub use expression::{
    BinaryOp, Expr, FrameBound, FrameUnits, FunctionCall, Literal, ObjectName, UnaryOp,
    WindowFrame, WindowSpec,
};
pub use query::{
    Cte, JoinConstraint, JoinType, NullOrdering, OrderByExpr, OrderDirection, Query, Select,
    SelectItem, SetExpr, SetOperator, TableAlias, TableRef, Top, With,
};
pub use statement::{
    Assignment, CopyOption, CopyOptionValue, CopySource, CopyStatement, DeleteStatement,
    ExplainFormat, InsertSource, InsertStatement, MergeAction, MergeClause, MergeMatch,
    MergeStatement, SetScope, Statement, UpdateStatement,
};
pub use types::DataType;
