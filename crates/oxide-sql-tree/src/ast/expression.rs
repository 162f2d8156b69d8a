//! Expression AST types.

use super::query::{OrderByExpr, Query};
use super::types::DataType;

/// A literal value.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// Integer literal.
    Integer(i64),
    /// Integer literal above `i64::MAX`.
    UnsignedInteger(u64),
    /// Float literal.
    Float(f64),
    /// String literal.
    String(String),
    /// Boolean literal.
    Boolean(bool),
    /// NULL literal.
    Null,
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,

    // Comparison
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,

    // Logical
    And,
    Or,

    // String
    Concat,
    Like,
    NotLike,
    ILike,
    NotILike,
    Regexp,
    NotRegexp,

    // Bitwise
    BitAnd,
    BitOr,
    BitXor,
    LeftShift,
    RightShift,
}

impl BinaryOp {
    /// Returns the SQL representation of the operator.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::Eq => "=",
            Self::NotEq => "<>",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::And => "AND",
            Self::Or => "OR",
            Self::Concat => "||",
            Self::Like => "LIKE",
            Self::NotLike => "NOT LIKE",
            Self::ILike => "ILIKE",
            Self::NotILike => "NOT ILIKE",
            Self::Regexp => "REGEXP",
            Self::NotRegexp => "NOT REGEXP",
            Self::BitAnd => "&",
            Self::BitOr => "|",
            Self::BitXor => "^",
            Self::LeftShift => "<<",
            Self::RightShift => ">>",
        }
    }

    /// Returns the operator name used in the output tree.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Sub => "sub",
            Self::Mul => "mul",
            Self::Div => "div",
            Self::Mod => "mod",
            Self::Eq => "eq",
            Self::NotEq => "neq",
            Self::Lt => "lt",
            Self::LtEq => "lte",
            Self::Gt => "gt",
            Self::GtEq => "gte",
            Self::And => "and",
            Self::Or => "or",
            Self::Concat => "concat",
            Self::Like => "like",
            Self::NotLike => "not_like",
            Self::ILike => "ilike",
            Self::NotILike => "not_ilike",
            Self::Regexp => "regexp",
            Self::NotRegexp => "not_regexp",
            Self::BitAnd => "binary_and",
            Self::BitOr => "binary_or",
            Self::BitXor => "binary_xor",
            Self::LeftShift => "left_shift",
            Self::RightShift => "right_shift",
        }
    }

    /// Returns true if chains of this operator collapse into one n-ary node.
    #[must_use]
    pub const fn is_associative(&self) -> bool {
        matches!(
            self,
            Self::And | Self::Or | Self::Add | Self::Mul | Self::Concat | Self::BitAnd | Self::BitOr
        )
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// Numeric negation (-).
    Neg,
    /// Logical NOT.
    Not,
    /// Bitwise NOT (~).
    BitNot,
}

impl UnaryOp {
    /// Returns the operator name used in the output tree.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Neg => "neg",
            Self::Not => "not",
            Self::BitNot => "binary_not",
        }
    }
}

/// A dotted name such as `schema.table.column`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ObjectName(pub Vec<String>);

impl ObjectName {
    /// Creates a single-part name.
    #[must_use]
    pub fn simple(name: impl Into<String>) -> Self {
        Self(vec![name.into()])
    }
}

impl core::fmt::Display for ObjectName {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0.join("."))
    }
}

/// A function call.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FunctionCall {
    /// Function name, lower-cased unless it was quoted.
    pub name: String,
    /// Positional arguments.
    pub args: Vec<Expr>,
    /// Keyword arguments (`name => value`) and keyword-introduced operands.
    pub named_args: Vec<(String, Expr)>,
    /// Whether DISTINCT was specified (e.g., COUNT(DISTINCT x)).
    pub distinct: bool,
    /// In-call ORDER BY (e.g., `GROUP_CONCAT(x ORDER BY y)`).
    pub order_by: Vec<OrderByExpr>,
    /// `SEPARATOR` of `GROUP_CONCAT`.
    pub separator: Option<Box<Expr>>,
}

impl FunctionCall {
    /// Creates a call with positional arguments only.
    #[must_use]
    pub fn new(name: impl Into<String>, args: Vec<Expr>) -> Self {
        Self {
            name: name.into(),
            args,
            ..Self::default()
        }
    }
}

/// Frame units of a window frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameUnits {
    Rows,
    Range,
}

impl FrameUnits {
    /// Returns the key used in the output tree.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Rows => "rows",
            Self::Range => "range",
        }
    }
}

/// One end of a window frame.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameBound {
    /// `UNBOUNDED PRECEDING`
    UnboundedPreceding,
    /// `n PRECEDING`
    Preceding(Box<Expr>),
    /// `CURRENT ROW`
    CurrentRow,
    /// `n FOLLOWING`
    Following(Box<Expr>),
    /// `UNBOUNDED FOLLOWING`
    UnboundedFollowing,
}

/// `ROWS BETWEEN .. AND ..`
#[derive(Debug, Clone, PartialEq)]
pub struct WindowFrame {
    pub units: FrameUnits,
    pub start: FrameBound,
    /// Defaults to `CURRENT ROW` when omitted.
    pub end: Option<FrameBound>,
}

/// The body of an `OVER (...)` clause.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WindowSpec {
    /// `OVER name` referring to a named window.
    pub name: Option<String>,
    pub partition_by: Vec<Expr>,
    pub order_by: Vec<OrderByExpr>,
    pub frame: Option<WindowFrame>,
}

/// SQL expressions.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Literal value.
    Literal(Literal),

    /// Column or other name reference (possibly qualified).
    Column(ObjectName),

    /// `*` or `table.*`.
    Wildcard(Option<ObjectName>),

    /// Session or bind variable (`@x`, `$1`).
    Variable(String),

    /// A bare word standing for itself, such as a date part or an option value.
    Word(String),

    /// Operator application. Associative operators hold every chain operand.
    Binary {
        /// The operator.
        op: BinaryOp,
        /// Two or more operands, left to right.
        operands: Vec<Expr>,
    },

    /// Unary operation.
    Unary {
        /// The operator.
        op: UnaryOp,
        /// The operand.
        operand: Box<Expr>,
    },

    /// Function call.
    Function(FunctionCall),

    /// CAST / TRY_CAST / `::`.
    Cast {
        /// Expression being converted.
        expr: Box<Expr>,
        /// Target type.
        data_type: DataType,
        /// TRY_CAST returns NULL instead of failing.
        try_cast: bool,
    },

    /// CASE expression.
    Case {
        /// The operand of a simple CASE.
        operand: Option<Box<Expr>>,
        /// WHEN conditions and THEN results.
        when_clauses: Vec<(Expr, Expr)>,
        /// ELSE result.
        else_clause: Option<Box<Expr>>,
    },

    /// Scalar subquery.
    Subquery(Box<Query>),

    /// `EXISTS (subquery)`.
    Exists(Box<Query>),

    /// `IS [NOT] NULL`.
    IsNull {
        /// The tested expression.
        expr: Box<Expr>,
        /// IS NOT NULL.
        negated: bool,
    },

    /// `[NOT] IN (list)`.
    InList {
        expr: Box<Expr>,
        list: Vec<Expr>,
        negated: bool,
    },

    /// `[NOT] IN (subquery)`.
    InSubquery {
        expr: Box<Expr>,
        query: Box<Query>,
        negated: bool,
    },

    /// `[NOT] BETWEEN low AND high`.
    Between {
        expr: Box<Expr>,
        low: Box<Expr>,
        high: Box<Expr>,
        negated: bool,
    },

    /// Semi-structured access: `base:a.b`, `base['a']`, `f(x)[0]`.
    PathGet {
        /// The value being navigated.
        base: Box<Expr>,
        /// Path segments in order.
        path: Vec<Expr>,
    },

    /// Window function call: `f(..) OVER (..)`.
    Window {
        function: Box<Expr>,
        window: WindowSpec,
    },

    /// Ordered-set aggregate: `f(..) WITHIN GROUP (ORDER BY ..)`.
    WithinGroup {
        function: Box<Expr>,
        order_by: Vec<OrderByExpr>,
    },

    /// `INTERVAL value [unit]`.
    Interval {
        value: Box<Expr>,
        unit: Option<String>,
    },

    /// Typed string literal such as `DATE '2020-01-01'`.
    TypedString {
        /// Lower-cased type name.
        data_type: String,
        value: String,
    },

    /// Row constructor or parenthesized list: `(a, b)`.
    Tuple(Vec<Expr>),
}

impl Expr {
    /// Creates an integer literal expression.
    #[must_use]
    pub const fn integer(n: i64) -> Self {
        Self::Literal(Literal::Integer(n))
    }

    /// Creates a string literal expression.
    #[must_use]
    pub fn string(s: impl Into<String>) -> Self {
        Self::Literal(Literal::String(s.into()))
    }

    /// Creates an unqualified column reference.
    #[must_use]
    pub fn column(name: impl Into<String>) -> Self {
        Self::Column(ObjectName::simple(name))
    }

    /// Creates a binary operation, merging operands of the same
    /// associative operator into one node.
    #[must_use]
    pub fn binary(op: BinaryOp, mut left: Self, right: Self) -> Self {
        if op.is_associative() {
            if let Self::Binary {
                op: left_op,
                operands,
            } = &mut left
            {
                if *left_op == op {
                    operands.push(right);
                    return left;
                }
            }
        }
        Self::Binary {
            op,
            operands: vec![left, right],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_op_names() {
        assert_eq!(BinaryOp::Eq.name(), "eq");
        assert_eq!(BinaryOp::NotEq.name(), "neq");
        assert_eq!(BinaryOp::NotRegexp.name(), "not_regexp");
        assert_eq!(BinaryOp::Add.as_str(), "+");
    }

    #[test]
    fn test_associative_chain_flattens() {
        let chain = Expr::binary(
            BinaryOp::Concat,
            Expr::binary(BinaryOp::Concat, Expr::column("a"), Expr::column("b")),
            Expr::column("c"),
        );
        assert_eq!(
            chain,
            Expr::Binary {
                op: BinaryOp::Concat,
                operands: vec![Expr::column("a"), Expr::column("b"), Expr::column("c")],
            }
        );
    }

    #[test]
    fn test_non_associative_chain_nests() {
        let chain = Expr::binary(
            BinaryOp::Sub,
            Expr::binary(BinaryOp::Sub, Expr::column("a"), Expr::column("b")),
            Expr::column("c"),
        );
        let Expr::Binary { operands, .. } = chain else {
            panic!("expected binary");
        };
        assert_eq!(operands.len(), 2);
    }

    #[test]
    fn test_object_name_display() {
        let name = ObjectName(vec!["db".to_string(), "t".to_string()]);
        assert_eq!(name.to_string(), "db.t");
    }
}
