//! SQL Dialect support.
//!
//! Different databases have slightly different SQL syntax. A [`Dialect`] is
//! plain data: the optional [`Feature`]s it enables, the keywords it reserves
//! on top of the common set, and the operators it accepts beyond
//! [`BASE_OPERATORS`]. All dialects are `static` and immutable.

mod feature;
mod operators;

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::lexer::Keyword;

pub use feature::Feature;
pub use operators::{Assoc, BASE_OPERATORS, Fixity, Operator, OperatorDef, Precedence};

/// Names of the supported dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DialectName {
    /// Standard SQL.
    #[default]
    Ansi,
    /// MySQL.
    MySql,
    /// Snowflake.
    Snowflake,
    /// Microsoft SQL Server.
    SqlServer,
    /// Google BigQuery.
    BigQuery,
}

impl DialectName {
    /// Every supported dialect.
    pub const ALL: [Self; 5] = [
        Self::Ansi,
        Self::MySql,
        Self::Snowflake,
        Self::SqlServer,
        Self::BigQuery,
    ];

    /// Returns the lower-case name used in configuration.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ansi => "ansi",
            Self::MySql => "mysql",
            Self::Snowflake => "snowflake",
            Self::SqlServer => "sqlserver",
            Self::BigQuery => "bigquery",
        }
    }

    /// Returns the dialect definition.
    #[must_use]
    pub fn dialect(self) -> &'static Dialect {
        match self {
            Self::Ansi => &ANSI,
            Self::MySql => &MYSQL,
            Self::Snowflake => &SNOWFLAKE,
            Self::SqlServer => &SQLSERVER,
            Self::BigQuery => &BIGQUERY,
        }
    }
}

impl fmt::Display for DialectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DialectName {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ansi" | "sql" | "generic" => Ok(Self::Ansi),
            "mysql" => Ok(Self::MySql),
            "snowflake" => Ok(Self::Snowflake),
            "sqlserver" | "mssql" | "tsql" => Ok(Self::SqlServer),
            "bigquery" => Ok(Self::BigQuery),
            _ => Err(ConfigError::UnknownDialect(s.to_string())),
        }
    }
}

/// Keywords reserved in every dialect.
///
/// Clause keywords are reserved even where the clause itself is
/// unsupported, so that misuse reports the clause instead of silently
/// becoming an alias.
static COMMON_RESERVED: &[Keyword] = &[
    Keyword::All,
    Keyword::Alter,
    Keyword::And,
    Keyword::As,
    Keyword::Asc,
    Keyword::Between,
    Keyword::By,
    Keyword::Case,
    Keyword::Cast,
    Keyword::Check,
    Keyword::Constraint,
    Keyword::Create,
    Keyword::Cross,
    Keyword::Default,
    Keyword::Delete,
    Keyword::Desc,
    Keyword::Distinct,
    Keyword::Drop,
    Keyword::Else,
    Keyword::End,
    Keyword::Except,
    Keyword::Exists,
    Keyword::False,
    Keyword::Fetch,
    Keyword::Foreign,
    Keyword::From,
    Keyword::Full,
    Keyword::Group,
    Keyword::Having,
    Keyword::In,
    Keyword::Inner,
    Keyword::Insert,
    Keyword::Intersect,
    Keyword::Into,
    Keyword::Is,
    Keyword::Join,
    Keyword::Lateral,
    Keyword::Left,
    Keyword::Like,
    Keyword::Limit,
    Keyword::Natural,
    Keyword::Not,
    Keyword::Null,
    Keyword::Offset,
    Keyword::On,
    Keyword::Or,
    Keyword::Order,
    Keyword::Outer,
    Keyword::Pivot,
    Keyword::Primary,
    Keyword::Qualify,
    Keyword::References,
    Keyword::Right,
    Keyword::Select,
    Keyword::Set,
    Keyword::Table,
    Keyword::Then,
    Keyword::True,
    Keyword::Union,
    Keyword::Unique,
    Keyword::Unpivot,
    Keyword::Update,
    Keyword::Using,
    Keyword::Values,
    Keyword::When,
    Keyword::Where,
    Keyword::With,
];

/// A SQL dialect definition.
#[derive(Debug)]
pub struct Dialect {
    /// The dialect's name.
    pub name: DialectName,
    features: &'static [Feature],
    reserved: &'static [Keyword],
    operators: &'static [OperatorDef],
}

impl Dialect {
    /// Returns the dialect with the given name.
    #[must_use]
    pub fn get(name: DialectName) -> &'static Self {
        name.dialect()
    }

    /// Returns true if the dialect enables `feature`.
    #[must_use]
    pub fn supports(&self, feature: Feature) -> bool {
        self.features.contains(&feature)
    }

    /// Returns true if `keyword` cannot be used as a bare identifier.
    #[must_use]
    pub fn is_reserved(&self, keyword: Keyword) -> bool {
        COMMON_RESERVED.contains(&keyword) || self.reserved.contains(&keyword)
    }

    /// Looks up an operator in the dialect's table.
    ///
    /// Returns `None` when the dialect does not accept the operator.
    #[must_use]
    pub fn operator(&self, operator: Operator, fixity: Fixity) -> Option<&'static OperatorDef> {
        self.operators
            .iter()
            .chain(BASE_OPERATORS)
            .find(|def| def.operator == operator && def.fixity == fixity)
    }
}

/// Standard SQL.
pub static ANSI: Dialect = Dialect {
    name: DialectName::Ansi,
    features: &[
        Feature::MultilineStrings,
        Feature::Limit,
        Feature::Lateral,
        Feature::Merge,
    ],
    reserved: &[],
    operators: operators::CAST_OPERATOR,
};

/// MySQL.
pub static MYSQL: Dialect = Dialect {
    name: DialectName::MySql,
    features: &[
        Feature::BacktickIdentifiers,
        Feature::DoubleQuotedStrings,
        Feature::BackslashEscapes,
        Feature::HashComments,
        Feature::MultilineStrings,
        Feature::Limit,
        Feature::LimitComma,
        Feature::Lateral,
        Feature::LateralView,
        Feature::DeleteExtensions,
        Feature::ColumnOptions,
        Feature::TableOptions,
        Feature::ViewAlgorithm,
        Feature::ExplainFormat,
    ],
    reserved: &[Keyword::Index, Keyword::Key, Keyword::Regexp, Keyword::RLike],
    operators: operators::MYSQL_OPERATORS,
};

/// Snowflake.
pub static SNOWFLAKE: Dialect = Dialect {
    name: DialectName::Snowflake,
    features: &[
        Feature::BackslashEscapes,
        Feature::MultilineStrings,
        Feature::Qualify,
        Feature::Top,
        Feature::Limit,
        Feature::NamedArguments,
        Feature::Lateral,
        Feature::Pivot,
        Feature::Minus,
        Feature::Merge,
        Feature::CopyInto,
        Feature::SessionParameters,
        Feature::TransientTables,
    ],
    reserved: &[Keyword::ILike, Keyword::Regexp, Keyword::Minus],
    operators: operators::SNOWFLAKE_OPERATORS,
};

/// Microsoft SQL Server.
pub static SQLSERVER: Dialect = Dialect {
    name: DialectName::SqlServer,
    features: &[
        Feature::BracketIdentifiers,
        Feature::MultilineStrings,
        Feature::Top,
        Feature::Pivot,
        Feature::Merge,
    ],
    reserved: &[Keyword::Top],
    operators: operators::XOR_OPERATOR,
};

/// Google BigQuery.
pub static BIGQUERY: Dialect = Dialect {
    name: DialectName::BigQuery,
    features: &[
        Feature::BacktickIdentifiers,
        Feature::DoubleQuotedStrings,
        Feature::BackslashEscapes,
        Feature::Qualify,
        Feature::Limit,
        Feature::NamedArguments,
        Feature::Lateral,
        Feature::Pivot,
        Feature::Merge,
    ],
    reserved: &[],
    operators: operators::XOR_OPERATOR,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dialect_names_parse() {
        assert_eq!("MySQL".parse::<DialectName>(), Ok(DialectName::MySql));
        assert_eq!("snowflake".parse::<DialectName>(), Ok(DialectName::Snowflake));
        assert_eq!("tsql".parse::<DialectName>(), Ok(DialectName::SqlServer));
        assert_eq!(
            "oracle".parse::<DialectName>(),
            Err(ConfigError::UnknownDialect("oracle".to_string()))
        );
    }

    #[test]
    fn test_name_round_trip() {
        for name in DialectName::ALL {
            assert_eq!(name.as_str().parse::<DialectName>(), Ok(name));
            assert_eq!(name.dialect().name, name);
        }
    }

    #[test]
    fn test_feature_matrix() {
        assert!(MYSQL.supports(Feature::BacktickIdentifiers));
        assert!(!ANSI.supports(Feature::BacktickIdentifiers));
        assert!(SNOWFLAKE.supports(Feature::Qualify));
        assert!(!MYSQL.supports(Feature::Qualify));
        assert!(!SQLSERVER.supports(Feature::Limit));
        assert!(!MYSQL.supports(Feature::Merge));
        assert!(!BIGQUERY.supports(Feature::MultilineStrings));
    }

    #[test]
    fn test_reserved_words() {
        assert!(ANSI.is_reserved(Keyword::Select));
        assert!(MYSQL.is_reserved(Keyword::Key));
        assert!(!ANSI.is_reserved(Keyword::Key));
        assert!(!ANSI.is_reserved(Keyword::Merge));
        assert!(SQLSERVER.is_reserved(Keyword::Top));
    }

    #[test]
    fn test_operator_tables() {
        assert!(SNOWFLAKE.operator(Operator::Path, Fixity::Postfix).is_some());
        assert!(ANSI.operator(Operator::Path, Fixity::Postfix).is_none());
        assert!(ANSI.operator(Operator::Cast, Fixity::Postfix).is_some());
        assert!(MYSQL.operator(Operator::Cast, Fixity::Postfix).is_none());
        assert!(MYSQL.operator(Operator::Regexp, Fixity::Infix).is_some());
        assert!(ANSI.operator(Operator::ILike, Fixity::Infix).is_none());
        assert!(ANSI.operator(Operator::Add, Fixity::Infix).is_some());
        assert!(ANSI.operator(Operator::Sub, Fixity::Prefix).is_none());
        assert!(ANSI.operator(Operator::Neg, Fixity::Prefix).is_some());
    }
}
