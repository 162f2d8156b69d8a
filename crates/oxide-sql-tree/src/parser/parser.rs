//! SQL Parser implementation: token cursor, shared helpers and statement
//! dispatch.
//!
//! The grammar itself is split by area into sibling modules
//! (`expression`, `query`, `dml`, `ddl`, `command`), each adding an
//! `impl Parser` block.

use tracing::trace;

use super::error::{ErrorKind, ParseError};
use crate::ast::{ObjectName, Statement};
use crate::dialect::{Dialect, Feature};
use crate::lexer::{Keyword, Lexer, Token, TokenKind};
use crate::options::DEFAULT_MAX_DEPTH;

/// Remaining stack below which a nested rule runs on a fresh segment.
const STACK_RED_ZONE: usize = 256 << 10;

/// Size of each stack segment allocated for deep nesting.
const STACK_SEGMENT_SIZE: usize = 2 << 20;

/// Keywords that begin a clause; finding one after a complete statement
/// means the clause is out of order.
const CLAUSE_KEYWORDS: &[Keyword] = &[
    Keyword::From,
    Keyword::Where,
    Keyword::Group,
    Keyword::Having,
    Keyword::Qualify,
    Keyword::Order,
    Keyword::Limit,
    Keyword::Offset,
    Keyword::Fetch,
    Keyword::Union,
    Keyword::Intersect,
    Keyword::Except,
    Keyword::Values,
    Keyword::Set,
    Keyword::On,
    Keyword::Using,
];

/// SQL Parser.
///
/// A parser owns the token stream of one input and is consumed by a single
/// call to [`Parser::parse_statement`] or [`Parser::parse_statements`].
pub struct Parser<'a> {
    pub(super) input: &'a str,
    pub(super) dialect: &'static Dialect,
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
    pub(super) max_depth: usize,
    context: Vec<&'static str>,
}

impl<'a> Parser<'a> {
    /// Tokenizes `input` under `dialect` and creates a parser over it.
    ///
    /// # Errors
    ///
    /// Returns a [`ErrorKind::Lexical`] error if the input cannot be
    /// tokenized.
    pub fn new(input: &'a str, dialect: &'static Dialect) -> Result<Self, ParseError> {
        let tokens = Lexer::new(input, dialect).tokenize();
        if let Some(Token {
            kind: TokenKind::Error(message),
            span,
        }) = tokens.last()
        {
            return Err(ParseError::new(ErrorKind::Lexical, message.clone(), *span).located(input));
        }
        Ok(Self {
            input,
            dialect,
            tokens,
            pos: 0,
            depth: 0,
            max_depth: DEFAULT_MAX_DEPTH,
            context: Vec::new(),
        })
    }

    /// Sets the nesting limit.
    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Returns the number of tokens, end of input included.
    #[must_use]
    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    /// Parses a single SQL statement followed by an optional `;`.
    ///
    /// # Errors
    ///
    /// Returns a `ParseError` if the input is not exactly one valid
    /// statement in the active dialect.
    pub fn parse_statement(&mut self) -> Result<Statement, ParseError> {
        let result = self.statement().and_then(|statement| {
            self.consume(&TokenKind::Semicolon);
            self.expect_end()?;
            Ok(statement)
        });
        result.map_err(|error| error.located(self.input))
    }

    /// Parses `;`-separated statements until the end of input.
    ///
    /// # Errors
    ///
    /// Returns the first `ParseError` encountered.
    pub fn parse_statements(&mut self) -> Result<Vec<Statement>, ParseError> {
        let mut statements = Vec::new();
        let result = loop {
            while self.consume(&TokenKind::Semicolon) {}
            if self.current().is_eof() {
                break Ok(());
            }
            match self.statement() {
                Ok(statement) => statements.push(statement),
                Err(error) => break Err(error),
            }
            if !self.consume(&TokenKind::Semicolon) {
                break self.expect_end();
            }
        };
        result
            .map(|()| statements)
            .map_err(|error| error.located(self.input))
    }

    pub(super) fn statement(&mut self) -> Result<Statement, ParseError> {
        let token = self.current().clone();
        trace!(token = %token.kind.describe(), "dispatching statement");
        if token.kind == TokenKind::LeftParen {
            return Ok(Statement::Query(Box::new(self.parse_query()?)));
        }
        match token.as_keyword() {
            Some(Keyword::Select | Keyword::With) => {
                Ok(Statement::Query(Box::new(self.parse_query()?)))
            }
            Some(Keyword::Insert) => self.with_context("INSERT", Self::parse_insert),
            Some(Keyword::Update) => self.with_context("UPDATE", Self::parse_update),
            Some(Keyword::Delete) => self.with_context("DELETE", Self::parse_delete),
            Some(Keyword::Merge) => {
                self.require(Feature::Merge)?;
                self.with_context("MERGE", Self::parse_merge)
            }
            Some(Keyword::Create) => self.with_context("CREATE", Self::parse_create),
            Some(Keyword::Alter) => self.with_context("ALTER", Self::parse_alter),
            Some(Keyword::Drop) => self.with_context("DROP", Self::parse_drop),
            Some(Keyword::Copy) => {
                self.require(Feature::CopyInto)?;
                self.with_context("COPY INTO", Self::parse_copy)
            }
            Some(Keyword::Explain | Keyword::Describe | Keyword::Desc) => {
                self.with_context("EXPLAIN", Self::parse_explain)
            }
            Some(Keyword::Set) => self.with_context("SET", Self::parse_set),
            Some(Keyword::Unset) => {
                self.require(Feature::SessionParameters)?;
                self.with_context("UNSET", Self::parse_unset)
            }
            Some(Keyword::Use) => self.with_context("USE", Self::parse_use),
            _ => Err(self.expected("a statement")),
        }
    }

    /// Requires the end of input, reporting misplaced clauses by name.
    fn expect_end(&self) -> Result<(), ParseError> {
        let token = self.current();
        if token.is_eof() {
            return Ok(());
        }
        match token.kind {
            TokenKind::Keyword(keyword) if CLAUSE_KEYWORDS.contains(&keyword) => {
                Err(self.error(format!("unexpected {} clause", keyword.as_str())))
            }
            _ => Err(self.expected("end of statement")),
        }
    }

    // Token cursor

    /// Returns the current token.
    pub(super) fn current(&self) -> &Token {
        self.peek_token(0)
    }

    /// Returns the token `n` positions ahead, clamped to the end of input.
    pub(super) fn peek_token(&self, n: usize) -> &Token {
        // The lexer always ends the stream with Eof.
        let index = (self.pos + n).min(self.tokens.len() - 1);
        &self.tokens[index]
    }

    /// Advances to the next token and returns the one just consumed.
    pub(super) fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    /// Checks if the current token has the same kind as `kind`, ignoring
    /// any payload.
    pub(super) fn check(&self, kind: &TokenKind) -> bool {
        core::mem::discriminant(&self.current().kind) == core::mem::discriminant(kind)
    }

    /// Consumes the current token if it matches `kind`.
    pub(super) fn consume(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Expects the current token to match `kind`.
    pub(super) fn expect(&mut self, kind: &TokenKind) -> Result<Token, ParseError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.expected(&format!("'{}'", kind.symbol())))
        }
    }

    /// Checks if the current token spells `keyword`, reserved or not.
    pub(super) fn check_keyword(&self, keyword: Keyword) -> bool {
        self.current().is_keyword(keyword)
    }

    /// Checks if the token `n` positions ahead spells `keyword`.
    pub(super) fn peek_keyword(&self, n: usize, keyword: Keyword) -> bool {
        self.peek_token(n).is_keyword(keyword)
    }

    /// Consumes the current token if it spells `keyword`.
    pub(super) fn consume_keyword(&mut self, keyword: Keyword) -> bool {
        if self.check_keyword(keyword) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consumes a keyword sequence only if every keyword matches.
    pub(super) fn consume_keywords(&mut self, keywords: &[Keyword]) -> bool {
        let matched = keywords
            .iter()
            .enumerate()
            .all(|(i, keyword)| self.peek_keyword(i, *keyword));
        if matched {
            for _ in keywords {
                self.advance();
            }
        }
        matched
    }

    /// Expects the current token to spell `keyword`.
    pub(super) fn expect_keyword(&mut self, keyword: Keyword) -> Result<(), ParseError> {
        if self.consume_keyword(keyword) {
            Ok(())
        } else {
            Err(self.expected(keyword.as_str()))
        }
    }

    /// Returns the source text of a token.
    pub(super) fn token_text(&self, token: &Token) -> &'a str {
        self.input
            .get(token.span.start..token.span.end)
            .unwrap_or_default()
    }

    // Names

    /// Expects an identifier (quoted, or a bare word the dialect does not
    /// reserve).
    pub(super) fn expect_identifier(&mut self) -> Result<String, ParseError> {
        match &self.current().kind {
            TokenKind::Identifier(word) => {
                let value = word.value.clone();
                self.advance();
                Ok(value)
            }
            _ => Err(self.expected("identifier")),
        }
    }

    /// Expects any word, reserved keywords included, as written.
    pub(super) fn expect_word(&mut self) -> Result<String, ParseError> {
        match &self.current().kind {
            TokenKind::Identifier(word) => {
                let value = word.value.clone();
                self.advance();
                Ok(value)
            }
            TokenKind::Keyword(_) => {
                let token = self.advance();
                Ok(self.token_text(&token).to_string())
            }
            _ => Err(self.expected("name")),
        }
    }

    /// Returns true if the current token is a word of any kind.
    pub(super) fn check_word(&self) -> bool {
        matches!(
            self.current().kind,
            TokenKind::Identifier(_) | TokenKind::Keyword(_)
        )
    }

    /// Parses a dotted name. Parts after the first may be reserved words.
    pub(super) fn parse_object_name(&mut self) -> Result<ObjectName, ParseError> {
        let mut parts = vec![self.expect_identifier()?];
        while self.check(&TokenKind::Dot) && !matches!(self.peek_token(1).kind, TokenKind::Star) {
            self.advance();
            parts.push(self.expect_word()?);
        }
        Ok(ObjectName(parts))
    }

    /// Parses `(a, b, c)`.
    pub(super) fn parse_identifier_list(&mut self) -> Result<Vec<String>, ParseError> {
        self.expect(&TokenKind::LeftParen)?;
        let mut names = vec![self.expect_identifier()?];
        while self.consume(&TokenKind::Comma) {
            names.push(self.expect_identifier()?);
        }
        self.expect(&TokenKind::RightParen)?;
        Ok(names)
    }

    // Errors

    /// Creates an "expected X, found Y" error at the current token.
    pub(super) fn expected(&self, what: &str) -> ParseError {
        let token = self.current();
        ParseError::unexpected(what, &token.kind, token.span)
    }

    /// Creates a grammar error at the current token.
    pub(super) fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError::new(ErrorKind::Grammar, message, self.current().span)
    }

    /// Creates an error for a construct the active dialect rejects.
    pub(super) fn unsupported(&self, what: &str) -> ParseError {
        ParseError::unsupported(what, self.dialect.name.as_str(), self.current().span)
    }

    /// Fails unless the active dialect enables `feature`.
    pub(super) fn require(&self, feature: Feature) -> Result<(), ParseError> {
        if self.dialect.supports(feature) {
            Ok(())
        } else {
            Err(self.unsupported(feature.description()))
        }
    }

    // Context and depth

    /// Runs `f` with `rule` pushed on the context stack, attaching the
    /// stack to any error it returns.
    pub(super) fn with_context<T>(
        &mut self,
        rule: &'static str,
        f: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        self.context.push(rule);
        let result = f(self).map_err(|error| error.with_context(&self.context));
        self.context.pop();
        result
    }

    /// Runs `f` one nesting level deeper, failing past the limit.
    ///
    /// The stack grows on demand, so any depth up to `max_depth` fits on
    /// a small thread stack.
    pub(super) fn nested<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        if self.depth >= self.max_depth {
            return Err(self.depth_exceeded());
        }
        self.depth += 1;
        let result = stacker::maybe_grow(STACK_RED_ZONE, STACK_SEGMENT_SIZE, || f(self));
        self.depth -= 1;
        result
    }

    /// Creates the error reported when nesting passes the limit.
    pub(super) fn depth_exceeded(&self) -> ParseError {
        ParseError::new(
            ErrorKind::DepthExceeded,
            format!("nesting exceeds the maximum depth of {}", self.max_depth),
            self.current().span,
        )
        .with_context(&self.context)
    }

    /// Collects span-adjacent tokens into one verbatim string, such as a
    /// stage path `@stage/dir/file.csv` or a URL `s3://bucket/key`.
    pub(super) fn parse_raw_path(&mut self) -> Result<String, ParseError> {
        let first = self.current().clone();
        if first.is_eof() {
            return Err(self.expected("location"));
        }
        let mut end = first.span.end;
        self.advance();
        loop {
            let token = self.current();
            let stops = matches!(
                token.kind,
                TokenKind::Eof | TokenKind::Semicolon | TokenKind::Comma | TokenKind::RightParen
            );
            if stops || token.span.start != end {
                break;
            }
            end = token.span.end;
            self.advance();
        }
        Ok(self
            .input
            .get(first.span.start..end)
            .unwrap_or_default()
            .to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Expr, SelectItem, SetExpr};
    use crate::dialect::{ANSI, MYSQL, SNOWFLAKE};

    fn parse(sql: &str) -> Result<Statement, ParseError> {
        Parser::new(sql, &ANSI)?.parse_statement()
    }

    #[test]
    fn test_lexical_error_is_reported() {
        let error = parse("SELECT 'open").err();
        assert_eq!(error.map(|e| e.kind), Some(ErrorKind::Lexical));
    }

    #[test]
    fn test_trailing_semicolon() {
        assert!(parse("SELECT 1;").is_ok());
        assert!(parse("SELECT 1; SELECT 2").is_err());
    }

    #[test]
    fn test_parse_statements() {
        let statements = Parser::new("SELECT 1; SELECT 2;;", &ANSI)
            .and_then(|mut p| p.parse_statements())
            .unwrap();
        assert_eq!(statements.len(), 2);
    }

    #[test]
    fn test_misplaced_clause() {
        let error = parse("SELECT a FROM t WHERE a = 1 FROM u").unwrap_err();
        assert_eq!(error.kind, ErrorKind::Grammar);
        assert_eq!(error.message, "unexpected FROM clause");
    }

    #[test]
    fn test_error_location() {
        let error = parse("SELECT a\nFROM t\nWHERE").unwrap_err();
        assert_eq!(error.line(), 3);
        assert_eq!(error.column(), 6);
        assert_eq!(error.found.as_deref(), Some("end of input"));
    }

    #[test]
    fn test_error_context() {
        let error = parse("INSERT INTO t VALUES (1,").unwrap_err();
        assert_eq!(error.context.first(), Some(&"INSERT"));
    }

    #[test]
    fn test_unknown_statement() {
        let error = parse("FROB t").unwrap_err();
        assert_eq!(error.expected.as_deref(), Some("a statement"));
    }

    #[test]
    fn test_gated_statements() {
        let error = Parser::new("MERGE INTO t USING s ON a = b WHEN MATCHED THEN DELETE", &MYSQL)
            .and_then(|mut p| p.parse_statement())
            .unwrap_err();
        assert_eq!(error.kind, ErrorKind::Unsupported);
        assert!(error.message.contains("mysql"));
    }

    #[test]
    fn test_depth_limit() {
        let sql = format!("SELECT {}1{}", "(".repeat(50), ")".repeat(50));
        let error = Parser::new(&sql, &ANSI)
            .map(|p| p.with_max_depth(10))
            .and_then(|mut p| p.parse_statement())
            .unwrap_err();
        assert_eq!(error.kind, ErrorKind::DepthExceeded);
    }

    #[test]
    fn test_reserved_words_after_dot() {
        let statement = Parser::new("SELECT t.index FROM schema.table", &MYSQL)
            .and_then(|mut p| p.parse_statement())
            .unwrap();
        let Statement::Query(query) = statement else {
            panic!("expected query");
        };
        let SetExpr::Select(select) = &query.body else {
            panic!("expected select");
        };
        assert_eq!(
            select.columns[0],
            SelectItem::Expr {
                expr: Expr::Column(ObjectName(vec!["t".into(), "index".into()])),
                alias: None,
            }
        );
    }

    #[test]
    fn test_raw_path() {
        let mut parser = Parser::new("@~/staged/x.csv FILES", &SNOWFLAKE).unwrap();
        assert_eq!(parser.parse_raw_path().unwrap(), "@~/staged/x.csv");
        assert_eq!(parser.expect_identifier().unwrap(), "FILES");
    }
}
