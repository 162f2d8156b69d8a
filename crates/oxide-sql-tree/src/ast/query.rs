//! Query AST types: SELECT, set operations and FROM items.

use super::expression::{Expr, ObjectName};

/// Order direction for ORDER BY.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderDirection {
    /// Ascending order.
    Asc,
    /// Descending order.
    Desc,
}

impl OrderDirection {
    /// Returns the value used in the output tree.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Null ordering for ORDER BY.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NullOrdering {
    /// NULLs come first.
    First,
    /// NULLs come last.
    Last,
}

impl NullOrdering {
    /// Returns the value used in the output tree.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::First => "first",
            Self::Last => "last",
        }
    }
}

/// An ORDER BY entry.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderByExpr {
    /// The expression to order by.
    pub expr: Expr,
    /// The direction, when written.
    pub direction: Option<OrderDirection>,
    /// Null ordering (optional).
    pub nulls: Option<NullOrdering>,
}

/// `TOP n [PERCENT] [WITH TIES]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Top {
    pub quantity: Expr,
    pub percent: bool,
    pub with_ties: bool,
}

/// One entry of a SELECT list.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectItem {
    /// `*` or `t.*`.
    Wildcard(Option<ObjectName>),
    /// An expression with optional alias.
    Expr {
        expr: Expr,
        alias: Option<String>,
    },
}

/// A SELECT block.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Select {
    /// Whether DISTINCT was specified.
    pub distinct: bool,
    /// TOP clause (SQL Server, Snowflake).
    pub top: Option<Top>,
    /// The select list.
    pub columns: Vec<SelectItem>,
    /// FROM items, joins included, in source order.
    pub from: Vec<TableRef>,
    /// WHERE clause.
    pub where_clause: Option<Expr>,
    /// GROUP BY expressions.
    pub group_by: Vec<Expr>,
    /// HAVING clause.
    pub having: Option<Expr>,
    /// QUALIFY clause.
    pub qualify: Option<Expr>,
}

/// Set operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOperator {
    Union,
    Intersect,
    Except,
    /// Snowflake's spelling of EXCEPT; kept apart to preserve the key.
    Minus,
}

impl SetOperator {
    /// Returns the key used in the output tree.
    #[must_use]
    pub const fn name(&self, all: bool) -> &'static str {
        match (self, all) {
            (Self::Union, false) => "union",
            (Self::Union, true) => "union_all",
            (Self::Intersect, false) => "intersect",
            (Self::Intersect, true) => "intersect_all",
            (Self::Except, false) => "except",
            (Self::Except, true) => "except_all",
            (Self::Minus, _) => "minus",
        }
    }
}

/// The body of a query: a SELECT, a parenthesized query, or a set operation.
#[derive(Debug, Clone, PartialEq)]
pub enum SetExpr {
    Select(Box<Select>),
    Query(Box<Query>),
    /// A chain of the same operator, e.g. `a UNION b UNION c`.
    SetOperation {
        op: SetOperator,
        all: bool,
        operands: Vec<SetExpr>,
    },
}

/// A common table expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Cte {
    pub name: String,
    pub columns: Vec<String>,
    pub query: Box<Query>,
}

/// A WITH clause.
#[derive(Debug, Clone, PartialEq)]
pub struct With {
    pub recursive: bool,
    pub ctes: Vec<Cte>,
}

/// A complete query: WITH, body, ORDER BY, LIMIT/OFFSET/FETCH.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub with: Option<With>,
    pub body: SetExpr,
    pub order_by: Vec<OrderByExpr>,
    /// LIMIT n, or FETCH FIRST n ROWS ONLY.
    pub limit: Option<Expr>,
    pub offset: Option<Expr>,
}

impl Query {
    /// Wraps a SELECT with no trailing clauses.
    #[must_use]
    pub fn from_select(select: Select) -> Self {
        Self {
            with: None,
            body: SetExpr::Select(Box::new(select)),
            order_by: Vec::new(),
            limit: None,
            offset: None,
        }
    }
}

/// A table alias, optionally with column aliases: `AS t (a, b)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableAlias {
    pub name: String,
    pub columns: Vec<String>,
}

/// Join type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinType {
    /// Plain JOIN.
    Join,
    Inner,
    Left,
    LeftOuter,
    Right,
    RightOuter,
    Full,
    FullOuter,
    Cross,
    Natural,
}

impl JoinType {
    /// Returns the key used in the output tree.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Join => "join",
            Self::Inner => "inner join",
            Self::Left => "left join",
            Self::LeftOuter => "left outer join",
            Self::Right => "right join",
            Self::RightOuter => "right outer join",
            Self::Full => "full join",
            Self::FullOuter => "full outer join",
            Self::Cross => "cross join",
            Self::Natural => "natural join",
        }
    }
}

/// Join condition.
#[derive(Debug, Clone, PartialEq)]
pub enum JoinConstraint {
    On(Expr),
    Using(Vec<String>),
    None,
}

/// An item of a FROM list.
#[derive(Debug, Clone, PartialEq)]
pub enum TableRef {
    /// Named table.
    Table {
        name: ObjectName,
        alias: Option<TableAlias>,
    },
    /// Derived table: `(SELECT ..) AS t`.
    Derived {
        query: Box<Query>,
        alias: Option<TableAlias>,
    },
    /// Table function: `TABLE(generator(..))`, `flatten(..)`.
    Function {
        call: Expr,
        alias: Option<TableAlias>,
    },
    /// `LATERAL <derived table or table function>`.
    Lateral(Box<TableRef>),
    /// `LATERAL VIEW [OUTER] f(..) t AS c1, c2`.
    LateralView {
        function: Expr,
        outer: bool,
        table_alias: Option<String>,
        column_aliases: Vec<String>,
    },
    /// A join onto the preceding items.
    Join {
        join_type: JoinType,
        table: Box<TableRef>,
        constraint: JoinConstraint,
    },
    /// `PIVOT (agg FOR col IN (..)) [AS alias]`.
    Pivot {
        aggregate: Expr,
        column: Expr,
        values: Vec<Expr>,
        alias: Option<String>,
    },
    /// `UNPIVOT (value FOR col IN (..)) [AS alias]`.
    Unpivot {
        value: Expr,
        column: Expr,
        columns: Vec<Expr>,
        alias: Option<String>,
    },
}

impl TableRef {
    /// Creates a named table reference without alias.
    #[must_use]
    pub fn table(name: ObjectName) -> Self {
        Self::Table { name, alias: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_operator_names() {
        assert_eq!(SetOperator::Union.name(false), "union");
        assert_eq!(SetOperator::Union.name(true), "union_all");
        assert_eq!(SetOperator::Minus.name(false), "minus");
    }

    #[test]
    fn test_join_type_names() {
        assert_eq!(JoinType::Inner.name(), "inner join");
        assert_eq!(JoinType::LeftOuter.name(), "left outer join");
    }
}
