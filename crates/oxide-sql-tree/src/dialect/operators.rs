//! Operator tables: which operators a dialect accepts and how tightly they bind.

/// Every operator the expression grammar knows about.
///
/// A dialect's table decides which of these are accepted; the parser maps
/// tokens onto operators and then asks the table for precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Or,
    And,
    Not,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Like,
    ILike,
    Regexp,
    In,
    Between,
    Is,
    BitOr,
    BitAnd,
    BitXor,
    LeftShift,
    RightShift,
    Concat,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Neg,
    BitNot,
    /// `expr :: type`
    Cast,
    /// `expr : path`
    Path,
    /// `expr [ index ]`
    Index,
}

impl Operator {
    /// Returns the operator as written in SQL.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Or => "OR",
            Self::And => "AND",
            Self::Not => "NOT",
            Self::Eq => "=",
            Self::NotEq => "<>",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::Like => "LIKE",
            Self::ILike => "ILIKE",
            Self::Regexp => "REGEXP",
            Self::In => "IN",
            Self::Between => "BETWEEN",
            Self::Is => "IS",
            Self::BitOr => "|",
            Self::BitAnd => "&",
            Self::BitXor => "^",
            Self::LeftShift => "<<",
            Self::RightShift => ">>",
            Self::Concat => "||",
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::Neg => "unary -",
            Self::BitNot => "~",
            Self::Cast => "::",
            Self::Path => "colon path access",
            Self::Index => "[] indexing",
        }
    }
}

/// Precedence levels, loosest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Precedence {
    Or = 1,
    And,
    Not,
    Comparison,
    Bitwise,
    Concat,
    Additive,
    Multiplicative,
    Unary,
    Postfix,
}

/// Operator associativity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Assoc {
    Left,
    Right,
}

/// Where the operator sits relative to its operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fixity {
    Prefix,
    Infix,
    Postfix,
}

/// One row of an operator table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperatorDef {
    pub operator: Operator,
    pub fixity: Fixity,
    pub precedence: Precedence,
    pub assoc: Assoc,
}

impl OperatorDef {
    const fn new(operator: Operator, fixity: Fixity, precedence: Precedence) -> Self {
        Self {
            operator,
            fixity,
            precedence,
            assoc: Assoc::Left,
        }
    }

    /// Returns the (left, right) binding power for Pratt parsing.
    ///
    /// Prefix operators only use the right value (the operand's minimum
    /// binding power). Postfix operators only use the left value.
    #[must_use]
    pub const fn binding_power(&self) -> (u8, u8) {
        let level = self.precedence as u8;
        match self.assoc {
            Assoc::Left => (level * 2 - 1, level * 2),
            Assoc::Right => (level * 2, level * 2 - 1),
        }
    }
}

use Fixity::{Infix, Postfix, Prefix};

/// Operators every dialect accepts.
pub static BASE_OPERATORS: &[OperatorDef] = &[
    OperatorDef::new(Operator::Or, Infix, Precedence::Or),
    OperatorDef::new(Operator::And, Infix, Precedence::And),
    OperatorDef::new(Operator::Not, Prefix, Precedence::Not),
    OperatorDef::new(Operator::Eq, Infix, Precedence::Comparison),
    OperatorDef::new(Operator::NotEq, Infix, Precedence::Comparison),
    OperatorDef::new(Operator::Lt, Infix, Precedence::Comparison),
    OperatorDef::new(Operator::LtEq, Infix, Precedence::Comparison),
    OperatorDef::new(Operator::Gt, Infix, Precedence::Comparison),
    OperatorDef::new(Operator::GtEq, Infix, Precedence::Comparison),
    OperatorDef::new(Operator::Like, Infix, Precedence::Comparison),
    OperatorDef::new(Operator::In, Infix, Precedence::Comparison),
    OperatorDef::new(Operator::Between, Infix, Precedence::Comparison),
    OperatorDef::new(Operator::Is, Postfix, Precedence::Comparison),
    OperatorDef::new(Operator::BitOr, Infix, Precedence::Bitwise),
    OperatorDef::new(Operator::BitAnd, Infix, Precedence::Bitwise),
    OperatorDef::new(Operator::LeftShift, Infix, Precedence::Bitwise),
    OperatorDef::new(Operator::RightShift, Infix, Precedence::Bitwise),
    OperatorDef::new(Operator::Concat, Infix, Precedence::Concat),
    OperatorDef::new(Operator::Add, Infix, Precedence::Additive),
    OperatorDef::new(Operator::Sub, Infix, Precedence::Additive),
    OperatorDef::new(Operator::Mul, Infix, Precedence::Multiplicative),
    OperatorDef::new(Operator::Div, Infix, Precedence::Multiplicative),
    OperatorDef::new(Operator::Mod, Infix, Precedence::Multiplicative),
    OperatorDef::new(Operator::Neg, Prefix, Precedence::Unary),
    OperatorDef::new(Operator::BitNot, Prefix, Precedence::Unary),
    OperatorDef::new(Operator::Index, Postfix, Precedence::Postfix),
];

pub(super) static CAST_OPERATOR: &[OperatorDef] =
    &[OperatorDef::new(Operator::Cast, Postfix, Precedence::Postfix)];

pub(super) static MYSQL_OPERATORS: &[OperatorDef] = &[
    OperatorDef::new(Operator::Regexp, Infix, Precedence::Comparison),
    OperatorDef::new(Operator::BitXor, Infix, Precedence::Bitwise),
];

/// `^` is bitwise XOR in SQL Server and BigQuery.
pub(super) static XOR_OPERATOR: &[OperatorDef] =
    &[OperatorDef::new(Operator::BitXor, Infix, Precedence::Bitwise)];

pub(super) static SNOWFLAKE_OPERATORS: &[OperatorDef] = &[
    OperatorDef::new(Operator::ILike, Infix, Precedence::Comparison),
    OperatorDef::new(Operator::Regexp, Infix, Precedence::Comparison),
    OperatorDef::new(Operator::Cast, Postfix, Precedence::Postfix),
    OperatorDef::new(Operator::Path, Postfix, Precedence::Postfix),
];
