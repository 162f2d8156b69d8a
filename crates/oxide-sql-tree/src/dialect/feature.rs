//! Optional syntax features a dialect may enable.

/// A syntax feature that only some dialects accept.
///
/// Core grammar (SELECT, joins, DML, basic DDL) is available everywhere;
/// anything listed here is checked against the active dialect when the
/// parser reaches the construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    // Lexical
    /// `` `name` `` quoted identifiers
    BacktickIdentifiers,
    /// `[name]` quoted identifiers
    BracketIdentifiers,
    /// `"text"` is a string literal rather than an identifier
    DoubleQuotedStrings,
    /// Backslash escapes inside string literals
    BackslashEscapes,
    /// `#` line comments
    HashComments,
    /// Raw newlines inside string literals
    MultilineStrings,

    // Query clauses
    /// `QUALIFY` filter on window results
    Qualify,
    /// `TOP n [PERCENT]` row limiting
    Top,
    /// `LIMIT n [OFFSET m]`
    Limit,
    /// `LIMIT offset, count`
    LimitComma,
    /// `name => value` function arguments
    NamedArguments,
    /// `LATERAL` derived tables and table functions
    Lateral,
    /// `LATERAL VIEW [OUTER] explode(..)`
    LateralView,
    /// `PIVOT` and `UNPIVOT` table operators
    Pivot,
    /// `MINUS` as a synonym for `EXCEPT`
    Minus,

    // Statements
    /// `MERGE INTO`
    Merge,
    /// `COPY INTO` bulk loading
    CopyInto,
    /// `ALTER SESSION SET` and `UNSET`
    SessionParameters,
    /// `DELETE` modifiers, multi-table targets, ORDER BY and LIMIT
    DeleteExtensions,
    /// Column options such as `UNSIGNED`, `AUTO_INCREMENT`, `ON UPDATE`
    ColumnOptions,
    /// Inline `KEY`/`INDEX` definitions and trailing table options
    TableOptions,
    /// `CREATE TRANSIENT TABLE`
    TransientTables,
    /// `CREATE ALGORITHM = .. VIEW`
    ViewAlgorithm,
    /// `EXPLAIN FORMAT = ..` and `DESC` as a synonym for `EXPLAIN`
    ExplainFormat,
}

impl Feature {
    /// Returns a human-readable description for error messages.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::BacktickIdentifiers => "backtick-quoted identifiers",
            Self::BracketIdentifiers => "bracket-quoted identifiers",
            Self::DoubleQuotedStrings => "double-quoted string literals",
            Self::BackslashEscapes => "backslash escapes",
            Self::HashComments => "'#' comments",
            Self::MultilineStrings => "multi-line string literals",
            Self::Qualify => "QUALIFY clause",
            Self::Top => "TOP clause",
            Self::Limit => "LIMIT clause",
            Self::LimitComma => "LIMIT offset, count",
            Self::NamedArguments => "named function arguments",
            Self::Lateral => "LATERAL",
            Self::LateralView => "LATERAL VIEW",
            Self::Pivot => "PIVOT/UNPIVOT",
            Self::Minus => "MINUS set operator",
            Self::Merge => "MERGE statement",
            Self::CopyInto => "COPY INTO statement",
            Self::SessionParameters => "session parameters",
            Self::DeleteExtensions => "DELETE extensions",
            Self::ColumnOptions => "column options",
            Self::TableOptions => "index definitions and table options",
            Self::TransientTables => "TRANSIENT tables",
            Self::ViewAlgorithm => "view ALGORITHM",
            Self::ExplainFormat => "EXPLAIN FORMAT",
        }
    }
}
