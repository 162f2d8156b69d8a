//! Token types for the SQL lexer.

use super::Span;

macro_rules! define_keywords {
    ($($variant:ident => $text:literal,)+) => {
        /// Words with grammatical meaning somewhere in the supported grammar.
        ///
        /// Whether a keyword is *reserved* (and therefore lexed as
        /// [`TokenKind::Keyword`]) depends on the active dialect. Unreserved
        /// keywords are lexed as identifiers carrying [`Word::keyword`].
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Keyword {
            $(
                #[doc = concat!("`", $text, "`")]
                $variant,
            )+
        }

        impl Keyword {
            /// Every keyword, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Attempts to parse a keyword from a string (case-insensitive).
            #[must_use]
            #[allow(clippy::should_implement_trait)]
            pub fn from_str(s: &str) -> Option<Self> {
                match s.to_ascii_uppercase().as_str() {
                    $($text => Some(Self::$variant),)+
                    _ => None,
                }
            }

            /// Returns the canonical (upper-case) spelling.
            #[must_use]
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)+
                }
            }
        }
    };
}

define_keywords! {
    Add => "ADD",
    Algorithm => "ALGORITHM",
    All => "ALL",
    Alter => "ALTER",
    And => "AND",
    As => "AS",
    Asc => "ASC",
    AutoIncrement => "AUTO_INCREMENT",
    Between => "BETWEEN",
    Both => "BOTH",
    By => "BY",
    Cascade => "CASCADE",
    Case => "CASE",
    Cast => "CAST",
    Character => "CHARACTER",
    Charset => "CHARSET",
    Check => "CHECK",
    Collate => "COLLATE",
    Column => "COLUMN",
    Comment => "COMMENT",
    Constraint => "CONSTRAINT",
    Copy => "COPY",
    Create => "CREATE",
    Cross => "CROSS",
    Current => "CURRENT",
    Database => "DATABASE",
    Default => "DEFAULT",
    Delete => "DELETE",
    Desc => "DESC",
    Describe => "DESCRIBE",
    Distinct => "DISTINCT",
    Drop => "DROP",
    Else => "ELSE",
    End => "END",
    Except => "EXCEPT",
    Exists => "EXISTS",
    Explain => "EXPLAIN",
    Extract => "EXTRACT",
    False => "FALSE",
    Fetch => "FETCH",
    First => "FIRST",
    Following => "FOLLOWING",
    For => "FOR",
    Foreign => "FOREIGN",
    Format => "FORMAT",
    From => "FROM",
    Full => "FULL",
    Global => "GLOBAL",
    Group => "GROUP",
    Having => "HAVING",
    If => "IF",
    ILike => "ILIKE",
    Ignore => "IGNORE",
    In => "IN",
    Index => "INDEX",
    Inner => "INNER",
    Insert => "INSERT",
    Intersect => "INTERSECT",
    Interval => "INTERVAL",
    Into => "INTO",
    Is => "IS",
    Join => "JOIN",
    Key => "KEY",
    Last => "LAST",
    Lateral => "LATERAL",
    Leading => "LEADING",
    Left => "LEFT",
    Like => "LIKE",
    Limit => "LIMIT",
    Local => "LOCAL",
    LowPriority => "LOW_PRIORITY",
    Matched => "MATCHED",
    Merge => "MERGE",
    Minus => "MINUS",
    Modify => "MODIFY",
    Natural => "NATURAL",
    Next => "NEXT",
    Not => "NOT",
    Null => "NULL",
    Nulls => "NULLS",
    Offset => "OFFSET",
    On => "ON",
    Only => "ONLY",
    Or => "OR",
    Order => "ORDER",
    Outer => "OUTER",
    Over => "OVER",
    Overwrite => "OVERWRITE",
    Partition => "PARTITION",
    Percent => "PERCENT",
    Pivot => "PIVOT",
    Preceding => "PRECEDING",
    Precision => "PRECISION",
    Primary => "PRIMARY",
    Qualify => "QUALIFY",
    Quick => "QUICK",
    Range => "RANGE",
    Recursive => "RECURSIVE",
    References => "REFERENCES",
    Regexp => "REGEXP",
    Rename => "RENAME",
    Replace => "REPLACE",
    Right => "RIGHT",
    RLike => "RLIKE",
    Row => "ROW",
    Rows => "ROWS",
    Schema => "SCHEMA",
    Select => "SELECT",
    Separator => "SEPARATOR",
    Session => "SESSION",
    Set => "SET",
    Source => "SOURCE",
    Table => "TABLE",
    Target => "TARGET",
    Temp => "TEMP",
    Temporary => "TEMPORARY",
    Then => "THEN",
    Ties => "TIES",
    To => "TO",
    Top => "TOP",
    Trailing => "TRAILING",
    Transient => "TRANSIENT",
    Trim => "TRIM",
    True => "TRUE",
    TryCast => "TRY_CAST",
    Unbounded => "UNBOUNDED",
    Union => "UNION",
    Unique => "UNIQUE",
    Unpivot => "UNPIVOT",
    Unset => "UNSET",
    Unsigned => "UNSIGNED",
    Update => "UPDATE",
    Use => "USE",
    Using => "USING",
    Values => "VALUES",
    Varying => "VARYING",
    View => "VIEW",
    When => "WHEN",
    Where => "WHERE",
    With => "WITH",
    Within => "WITHIN",
    Zerofill => "ZEROFILL",
}

impl Keyword {
    /// Returns true if a reserved occurrence of this keyword may still name
    /// a function when directly followed by `(`.
    #[must_use]
    pub const fn is_function_name(&self) -> bool {
        matches!(
            self,
            Self::Left | Self::Right | Self::Replace | Self::If | Self::Insert | Self::Values
        )
    }
}

/// An identifier-like word: a bare or quoted name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Word {
    /// The name with quotes removed and escapes resolved.
    pub value: String,
    /// The quote character, when the word was delimited.
    pub quote: Option<char>,
    /// The keyword this bare word spells, if any.
    pub keyword: Option<Keyword>,
}

impl Word {
    /// Creates a bare (unquoted) word.
    #[must_use]
    pub fn bare(value: &str) -> Self {
        Self {
            value: value.to_string(),
            quote: None,
            keyword: Keyword::from_str(value),
        }
    }

    /// Creates a quoted word.
    #[must_use]
    pub const fn quoted(value: String, quote: char) -> Self {
        Self {
            value,
            quote: Some(quote),
            keyword: None,
        }
    }
}

/// The kind of token.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Literals
    /// Integer literal (e.g., 42)
    Integer(i64),
    /// Integer literal above `i64::MAX` that fits in `u64`
    UnsignedInteger(u64),
    /// Float literal (e.g., 3.14), also used for integers out of `u64` range
    Float(f64),
    /// String literal (e.g., 'hello')
    String(String),

    // Identifiers and keywords
    /// Identifier (e.g., column_name, "Quoted", `back`)
    Identifier(Word),
    /// Reserved keyword in the active dialect
    Keyword(Keyword),
    /// Session or bind variable (e.g., @name, @@global, $1)
    Variable(String),

    // Operators
    /// +
    Plus,
    /// -
    Minus,
    /// *
    Star,
    /// /
    Slash,
    /// %
    Percent,
    /// = or ==
    Eq,
    /// != or <>
    NotEq,
    /// <
    Lt,
    /// <=
    LtEq,
    /// >
    Gt,
    /// >=
    GtEq,
    /// ||
    Concat,
    /// &
    BitAnd,
    /// |
    BitOr,
    /// ^
    BitXor,
    /// ~
    BitNot,
    /// <<
    LeftShift,
    /// >>
    RightShift,
    /// =>
    Arrow,

    // Delimiters
    /// (
    LeftParen,
    /// )
    RightParen,
    /// [
    LeftBracket,
    /// ]
    RightBracket,
    /// ,
    Comma,
    /// ;
    Semicolon,
    /// .
    Dot,
    /// :
    Colon,
    /// ::
    DoubleColon,
    /// ?
    Question,
    /// @
    At,

    // Special
    /// End of input
    Eof,
    /// Invalid/unknown token
    Error(String),
}

impl TokenKind {
    /// Returns a short human-readable description used in error messages.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Integer(n) => format!("number {n}"),
            Self::UnsignedInteger(n) => format!("number {n}"),
            Self::Float(n) => format!("number {n}"),
            Self::String(s) => format!("string '{s}'"),
            Self::Identifier(word) => format!("identifier {}", word.value),
            Self::Keyword(kw) => format!("keyword {}", kw.as_str()),
            Self::Variable(name) => format!("variable {name}"),
            Self::Eof => "end of input".to_string(),
            Self::Error(message) => message.clone(),
            other => format!("'{}'", other.symbol()),
        }
    }

    /// Returns the source spelling of punctuation and operator tokens.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Star => "*",
            Self::Slash => "/",
            Self::Percent => "%",
            Self::Eq => "=",
            Self::NotEq => "<>",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::Concat => "||",
            Self::BitAnd => "&",
            Self::BitOr => "|",
            Self::BitXor => "^",
            Self::BitNot => "~",
            Self::LeftShift => "<<",
            Self::RightShift => ">>",
            Self::Arrow => "=>",
            Self::LeftParen => "(",
            Self::RightParen => ")",
            Self::LeftBracket => "[",
            Self::RightBracket => "]",
            Self::Comma => ",",
            Self::Semicolon => ";",
            Self::Dot => ".",
            Self::Colon => ":",
            Self::DoubleColon => "::",
            Self::Question => "?",
            Self::At => "@",
            _ => "",
        }
    }
}

/// A token with its span in the source code.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The kind of token.
    pub kind: TokenKind,
    /// The location in the source code.
    pub span: Span,
}

impl Token {
    /// Creates a new token.
    #[must_use]
    pub const fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Returns true if this is an EOF token.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::Eof)
    }

    /// Returns the keyword this token spells, reserved or not.
    ///
    /// Quoted identifiers never spell a keyword.
    #[must_use]
    pub const fn as_keyword(&self) -> Option<Keyword> {
        match &self.kind {
            TokenKind::Keyword(kw) => Some(*kw),
            TokenKind::Identifier(Word {
                quote: None,
                keyword,
                ..
            }) => *keyword,
            _ => None,
        }
    }

    /// Returns true if this token spells `keyword`, reserved or not.
    #[must_use]
    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        self.as_keyword() == Some(keyword)
    }
}
