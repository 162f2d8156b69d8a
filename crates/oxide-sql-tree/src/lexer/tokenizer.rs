//! SQL Tokenizer implementation.

use super::{Keyword, Span, Token, TokenKind, Word};
use crate::dialect::{Dialect, Feature};

/// Operator and punctuation spellings, longest first so that matching the
/// first prefix is a longest match.
const SYMBOLS: &[&str] = &[
    "::", "=>", "<=", ">=", "<>", "!=", "==", "||", "<<", ">>", "+", "-", "*", "/", "%", "=", "<",
    ">", "&", "|", "^", "~", "(", ")", "[", "]", ",", ";", ".", ":", "?",
];

fn symbol_kind(symbol: &str) -> TokenKind {
    match symbol {
        "::" => TokenKind::DoubleColon,
        "=>" => TokenKind::Arrow,
        "<=" => TokenKind::LtEq,
        ">=" => TokenKind::GtEq,
        "<>" | "!=" => TokenKind::NotEq,
        "=" | "==" => TokenKind::Eq,
        "||" => TokenKind::Concat,
        "<<" => TokenKind::LeftShift,
        ">>" => TokenKind::RightShift,
        "+" => TokenKind::Plus,
        "-" => TokenKind::Minus,
        "*" => TokenKind::Star,
        "/" => TokenKind::Slash,
        "%" => TokenKind::Percent,
        "<" => TokenKind::Lt,
        ">" => TokenKind::Gt,
        "&" => TokenKind::BitAnd,
        "|" => TokenKind::BitOr,
        "^" => TokenKind::BitXor,
        "~" => TokenKind::BitNot,
        "(" => TokenKind::LeftParen,
        ")" => TokenKind::RightParen,
        "[" => TokenKind::LeftBracket,
        "]" => TokenKind::RightBracket,
        "," => TokenKind::Comma,
        ";" => TokenKind::Semicolon,
        "." => TokenKind::Dot,
        ":" => TokenKind::Colon,
        _ => TokenKind::Question,
    }
}

fn is_identifier_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_identifier_part(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// A lexer that tokenizes SQL input under a particular dialect.
pub struct Lexer<'a> {
    /// The input source code.
    input: &'a str,
    /// Dialect deciding quoting, escapes, comments and reserved words.
    dialect: &'static Dialect,
    /// The current byte position.
    pos: usize,
    /// The byte position of the start of the current token.
    start: usize,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input.
    #[must_use]
    pub const fn new(input: &'a str, dialect: &'static Dialect) -> Self {
        Self {
            input,
            dialect,
            pos: 0,
            start: 0,
        }
    }

    /// Returns the current character without advancing.
    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    /// Returns the next character without advancing.
    fn peek_next(&self) -> Option<char> {
        let mut chars = self.input[self.pos..].chars();
        chars.next();
        chars.next()
    }

    /// Advances to the next character and returns it.
    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Skips whitespace and comments.
    ///
    /// Returns false if a block comment runs off the end of the input.
    fn skip_whitespace_and_comments(&mut self) -> bool {
        loop {
            while self.peek().is_some_and(char::is_whitespace) {
                self.advance();
            }

            let hash_comment =
                self.peek() == Some('#') && self.dialect.supports(Feature::HashComments);
            if hash_comment || (self.peek() == Some('-') && self.peek_next() == Some('-')) {
                while self.peek().is_some_and(|c| c != '\n') {
                    self.advance();
                }
                continue;
            }

            if self.peek() == Some('/') && self.peek_next() == Some('*') {
                self.start = self.pos;
                self.advance(); // /
                self.advance(); // *
                loop {
                    match self.advance() {
                        Some('*') if self.peek() == Some('/') => {
                            self.advance();
                            break;
                        }
                        None => return false,
                        _ => {}
                    }
                }
                continue;
            }

            return true;
        }
    }

    /// Creates a span from start to current position.
    const fn make_span(&self) -> Span {
        Span::new(self.start, self.pos)
    }

    /// Creates a token with the current span.
    const fn make_token(&self, kind: TokenKind) -> Token {
        Token::new(kind, self.make_span())
    }

    fn error(&self, message: &str) -> Token {
        self.make_token(TokenKind::Error(message.to_string()))
    }

    /// Scans an identifier or keyword.
    fn scan_identifier(&mut self) -> Token {
        while self.peek().is_some_and(is_identifier_part) {
            self.advance();
        }

        let text = &self.input[self.start..self.pos];
        match Keyword::from_str(text) {
            Some(keyword) if self.dialect.is_reserved(keyword) => {
                self.make_token(TokenKind::Keyword(keyword))
            }
            keyword => self.make_token(TokenKind::Identifier(Word {
                value: text.to_string(),
                quote: None,
                keyword,
            })),
        }
    }

    /// Scans a delimited identifier. A doubled closing delimiter stands for
    /// itself.
    fn scan_quoted_identifier(&mut self, open: char, close: char) -> Token {
        self.advance(); // consume opening quote
        let mut value = String::new();

        loop {
            match self.advance() {
                Some(c) if c == close => {
                    if self.peek() == Some(close) {
                        value.push(close);
                        self.advance();
                    } else {
                        break;
                    }
                }
                Some(c) => value.push(c),
                None => return self.error("unterminated quoted identifier"),
            }
        }

        self.make_token(TokenKind::Identifier(Word::quoted(value, open)))
    }

    /// Returns true when the previous character ends an operand, making a
    /// following `.` member access rather than the start of `.5`.
    fn follows_operand(&self) -> bool {
        self.input[..self.pos]
            .chars()
            .next_back()
            .is_some_and(|c| is_identifier_part(c) || matches!(c, ')' | ']' | '"' | '`'))
    }

    /// Scans a number: digits with an optional fraction (`1.5`, `.5`,
    /// `1.`) and exponent.
    ///
    /// A number running straight into identifier characters (`0x1F`,
    /// `1abc`) and a value outside the `f64` range are lexical errors.
    fn scan_number(&mut self) -> Token {
        let mut is_float = false;

        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }

        if self.peek() == Some('.') && !self.peek_next().is_some_and(is_identifier_start) {
            is_float = true;
            self.advance(); // consume .
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }

        if self.peek().is_some_and(|c| c == 'e' || c == 'E') {
            let rest = &self.input[self.pos + 1..];
            let digits = rest.strip_prefix(|c: char| c == '+' || c == '-').unwrap_or(rest);
            if digits.starts_with(|c: char| c.is_ascii_digit()) {
                is_float = true;
                self.advance(); // consume e/E
                if self.peek().is_some_and(|c| c == '+' || c == '-') {
                    self.advance();
                }
                while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                    self.advance();
                }
            }
        }

        if self.peek().is_some_and(is_identifier_part) {
            while self.peek().is_some_and(is_identifier_part) {
                self.advance();
            }
            let text = &self.input[self.start..self.pos];
            return self.make_token(TokenKind::Error(format!("invalid number {text}")));
        }

        let text = &self.input[self.start..self.pos];
        if !is_float {
            if let Ok(i) = text.parse::<i64>() {
                return self.make_token(TokenKind::Integer(i));
            }
            if let Ok(u) = text.parse::<u64>() {
                return self.make_token(TokenKind::UnsignedInteger(u));
            }
        }
        match text.parse::<f64>() {
            Ok(f) if f.is_finite() => self.make_token(TokenKind::Float(f)),
            Ok(_) => self.make_token(TokenKind::Error(format!("number {text} is out of range"))),
            Err(e) => self.make_token(TokenKind::Error(format!("invalid number {text}: {e}"))),
        }
    }

    /// Scans a string literal.
    fn scan_string(&mut self, quote: char) -> Token {
        let backslash = self.dialect.supports(Feature::BackslashEscapes);
        let multiline = self.dialect.supports(Feature::MultilineStrings);
        self.advance(); // consume opening quote
        let mut value = String::new();

        loop {
            match self.advance() {
                Some(c) if c == quote => {
                    if self.peek() == Some(quote) {
                        value.push(quote);
                        self.advance();
                    } else {
                        break;
                    }
                }
                Some('\\') if backslash => match self.advance() {
                    Some('n') => value.push('\n'),
                    Some('t') => value.push('\t'),
                    Some('r') => value.push('\r'),
                    Some('b') => value.push('\u{8}'),
                    Some('0') => value.push('\0'),
                    Some('Z') => value.push('\u{1a}'),
                    Some(c @ ('\\' | '\'' | '"')) => value.push(c),
                    Some(c) => {
                        value.push('\\');
                        value.push(c);
                    }
                    None => return self.error("unterminated string literal"),
                },
                Some('\n') if !multiline => {
                    return self.error("newline in string literal");
                }
                Some(c) => value.push(c),
                None => return self.error("unterminated string literal"),
            }
        }

        self.make_token(TokenKind::String(value))
    }

    /// Scans `@name`, `@@name` or `$name`; a lone `@` is a stage marker.
    fn scan_variable(&mut self, sigil: char) -> Token {
        self.advance(); // consume sigil
        if sigil == '@' && self.peek() == Some('@') {
            self.advance();
        }
        let name_start = self.pos;
        while self.peek().is_some_and(is_identifier_part) {
            self.advance();
        }
        if self.pos == name_start {
            return if sigil == '@' {
                self.make_token(TokenKind::At)
            } else {
                self.error("unexpected character $")
            };
        }
        self.make_token(TokenKind::Variable(
            self.input[self.start..self.pos].to_string(),
        ))
    }

    /// Scans the next token.
    #[must_use]
    pub fn next_token(&mut self) -> Token {
        let closed = self.skip_whitespace_and_comments();
        if !closed {
            return self.error("unterminated block comment");
        }
        self.start = self.pos;

        let Some(c) = self.peek() else {
            return self.make_token(TokenKind::Eof);
        };

        match c {
            '\'' => self.scan_string('\''),
            '"' if self.dialect.supports(Feature::DoubleQuotedStrings) => self.scan_string('"'),
            '"' => self.scan_quoted_identifier('"', '"'),
            '`' if self.dialect.supports(Feature::BacktickIdentifiers) => {
                self.scan_quoted_identifier('`', '`')
            }
            '[' if self.dialect.supports(Feature::BracketIdentifiers) => {
                self.scan_quoted_identifier('[', ']')
            }
            '@' | '$' => self.scan_variable(c),
            c if c.is_ascii_digit() => self.scan_number(),
            '.' if self.peek_next().is_some_and(|c| c.is_ascii_digit())
                && !self.follows_operand() =>
            {
                self.scan_number()
            }
            c if is_identifier_start(c) => self.scan_identifier(),
            _ => {
                let rest = &self.input[self.pos..];
                match SYMBOLS.iter().find(|symbol| rest.starts_with(**symbol)) {
                    Some(symbol) => {
                        self.pos += symbol.len();
                        self.make_token(symbol_kind(symbol))
                    }
                    None => {
                        self.advance();
                        self.make_token(TokenKind::Error(format!("unexpected character {c}")))
                    }
                }
            }
        }
    }

    /// Tokenizes the entire input and returns all tokens.
    ///
    /// The last token is always [`TokenKind::Eof`] unless an error token
    /// stops the scan first.
    #[must_use]
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let done = matches!(token.kind, TokenKind::Eof | TokenKind::Error(_));
            tokens.push(token);
            if done {
                break;
            }
        }
        tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::{ANSI, BIGQUERY, MYSQL, SNOWFLAKE, SQLSERVER};

    fn tokenize(input: &str) -> Vec<Token> {
        Lexer::new(input, &ANSI).tokenize()
    }

    fn token_kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input).into_iter().map(|t| t.kind).collect()
    }

    fn kinds_in(dialect: &'static Dialect, input: &str) -> Vec<TokenKind> {
        Lexer::new(input, dialect)
            .tokenize()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    fn ident(value: &str) -> TokenKind {
        TokenKind::Identifier(Word::bare(value))
    }

    #[test]
    fn test_empty_input() {
        let tokens = tokenize("");
        assert_eq!(tokens.len(), 1);
        assert!(tokens[0].is_eof());
    }

    #[test]
    fn test_whitespace_only() {
        let tokens = tokenize("   \n\t  ");
        assert_eq!(tokens.len(), 1);
        assert!(tokens[0].is_eof());
    }

    #[test]
    fn test_single_line_comment() {
        assert_eq!(
            token_kinds("SELECT -- comment\nFROM"),
            vec![
                TokenKind::Keyword(Keyword::Select),
                TokenKind::Keyword(Keyword::From),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_multi_line_comment() {
        assert_eq!(
            token_kinds("SELECT /* comment */ FROM"),
            vec![
                TokenKind::Keyword(Keyword::Select),
                TokenKind::Keyword(Keyword::From),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_unterminated_block_comment() {
        let tokens = tokenize("SELECT /* never closed");
        assert_eq!(
            tokens.last().map(|t| &t.kind),
            Some(&TokenKind::Error("unterminated block comment".to_string()))
        );
        assert_eq!(tokens[1].span.start, 7);
    }

    #[test]
    fn test_hash_comment_is_mysql_only() {
        assert_eq!(
            kinds_in(&MYSQL, "a # note\nb"),
            vec![ident("a"), ident("b"), TokenKind::Eof]
        );
        assert!(matches!(
            kinds_in(&ANSI, "a # note").get(1),
            Some(TokenKind::Error(_))
        ));
    }

    #[test]
    fn test_keywords_case_insensitive() {
        assert_eq!(
            token_kinds("select FROM wHeRe"),
            vec![
                TokenKind::Keyword(Keyword::Select),
                TokenKind::Keyword(Keyword::From),
                TokenKind::Keyword(Keyword::Where),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_unreserved_keyword_is_identifier() {
        let kinds = token_kinds("merge");
        assert_eq!(kinds[0], ident("merge"));
        assert!(matches!(
            &kinds[0],
            TokenKind::Identifier(Word { keyword: Some(Keyword::Merge), .. })
        ));
    }

    #[test]
    fn test_reservation_depends_on_dialect() {
        assert_eq!(kinds_in(&MYSQL, "key")[0], TokenKind::Keyword(Keyword::Key));
        assert_eq!(kinds_in(&ANSI, "key")[0], ident("key"));
    }

    #[test]
    fn test_identifiers() {
        assert_eq!(
            token_kinds("foo bar_baz _qux a$b"),
            vec![
                ident("foo"),
                ident("bar_baz"),
                ident("_qux"),
                ident("a$b"),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_quoted_identifiers() {
        assert_eq!(
            token_kinds("\"column name\" \"a\"\"b\""),
            vec![
                TokenKind::Identifier(Word::quoted("column name".to_string(), '"')),
                TokenKind::Identifier(Word::quoted("a\"b".to_string(), '"')),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_backticks_and_brackets() {
        assert_eq!(
            kinds_in(&MYSQL, "`order`")[0],
            TokenKind::Identifier(Word::quoted("order".to_string(), '`'))
        );
        assert_eq!(
            kinds_in(&SQLSERVER, "[my col]")[0],
            TokenKind::Identifier(Word::quoted("my col".to_string(), '['))
        );
        assert_eq!(token_kinds("[0]")[0], TokenKind::LeftBracket);
        assert!(matches!(token_kinds("`x`")[0], TokenKind::Error(_)));
    }

    #[test]
    fn test_double_quoted_strings() {
        assert_eq!(
            kinds_in(&MYSQL, "\"fred\"")[0],
            TokenKind::String("fred".to_string())
        );
        assert_eq!(
            kinds_in(&SNOWFLAKE, "\"fred\"")[0],
            TokenKind::Identifier(Word::quoted("fred".to_string(), '"'))
        );
    }

    #[test]
    fn test_integers() {
        assert_eq!(
            token_kinds("42 0 123456789"),
            vec![
                TokenKind::Integer(42),
                TokenKind::Integer(0),
                TokenKind::Integer(123_456_789),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_floats() {
        assert_eq!(
            token_kinds("3.25 0.5 1e10 2.5e-3"),
            vec![
                TokenKind::Float(3.25),
                TokenKind::Float(0.5),
                TokenKind::Float(1e10),
                TokenKind::Float(2.5e-3),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_decimals_with_bare_dot() {
        assert_eq!(
            token_kinds(".5 1. 2.)"),
            vec![
                TokenKind::Float(0.5),
                TokenKind::Float(1.0),
                TokenKind::Float(2.0),
                TokenKind::RightParen,
                TokenKind::Eof,
            ]
        );
        assert_eq!(token_kinds("t1.col")[1], TokenKind::Dot);
        assert_eq!(token_kinds("f(x).5")[4], TokenKind::Dot);
    }

    #[test]
    fn test_unsigned_integers() {
        assert_eq!(
            token_kinds("9223372036854775807 9223372036854775808 18446744073709551615"),
            vec![
                TokenKind::Integer(i64::MAX),
                TokenKind::UnsignedInteger(9_223_372_036_854_775_808),
                TokenKind::UnsignedInteger(u64::MAX),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_malformed_numbers() {
        assert_eq!(
            token_kinds("1e999")[0],
            TokenKind::Error("number 1e999 is out of range".to_string())
        );
        assert_eq!(
            token_kinds("SELECT 0x1F"),
            vec![
                TokenKind::Keyword(Keyword::Select),
                TokenKind::Error("invalid number 0x1F".to_string()),
            ]
        );
        assert!(matches!(token_kinds("12abc")[0], TokenKind::Error(_)));
    }

    #[test]
    fn test_integer_overflow_becomes_float() {
        assert_eq!(
            token_kinds("99999999999999999999")[0],
            TokenKind::Float(1e20)
        );
    }

    #[test]
    fn test_strings() {
        assert_eq!(
            token_kinds("'hello' 'it''s'"),
            vec![
                TokenKind::String("hello".to_string()),
                TokenKind::String("it's".to_string()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_backslash_escapes() {
        assert_eq!(
            kinds_in(&MYSQL, r"'a\'b\nc'")[0],
            TokenKind::String("a'b\nc".to_string())
        );
        assert_eq!(
            kinds_in(&SNOWFLAKE, r"'\ | '")[0],
            TokenKind::String(r"\ | ".to_string())
        );
        assert_eq!(
            token_kinds(r"'a\n'")[0],
            TokenKind::String(r"a\n".to_string())
        );
    }

    #[test]
    fn test_multiline_strings() {
        assert_eq!(
            kinds_in(&SNOWFLAKE, "'a\nb'")[0],
            TokenKind::String("a\nb".to_string())
        );
        assert!(matches!(kinds_in(&BIGQUERY, "'a\nb'")[0], TokenKind::Error(_)));
    }

    #[test]
    fn test_unterminated_string() {
        assert_eq!(
            token_kinds("'abc"),
            vec![TokenKind::Error("unterminated string literal".to_string())]
        );
    }

    #[test]
    fn test_operators() {
        assert_eq!(
            token_kinds("+ - * / % = == != <> < <= > >= =>"),
            vec![
                TokenKind::Plus,
                TokenKind::Minus,
                TokenKind::Star,
                TokenKind::Slash,
                TokenKind::Percent,
                TokenKind::Eq,
                TokenKind::Eq,
                TokenKind::NotEq,
                TokenKind::NotEq,
                TokenKind::Lt,
                TokenKind::LtEq,
                TokenKind::Gt,
                TokenKind::GtEq,
                TokenKind::Arrow,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_delimiters() {
        assert_eq!(
            token_kinds("( ) [ ] , ; . : ::"),
            vec![
                TokenKind::LeftParen,
                TokenKind::RightParen,
                TokenKind::LeftBracket,
                TokenKind::RightBracket,
                TokenKind::Comma,
                TokenKind::Semicolon,
                TokenKind::Dot,
                TokenKind::Colon,
                TokenKind::DoubleColon,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_bitwise_operators() {
        assert_eq!(
            token_kinds("a & b | c ~ d << e >> f || g ^ h"),
            vec![
                ident("a"),
                TokenKind::BitAnd,
                ident("b"),
                TokenKind::BitOr,
                ident("c"),
                TokenKind::BitNot,
                ident("d"),
                TokenKind::LeftShift,
                ident("e"),
                TokenKind::RightShift,
                ident("f"),
                TokenKind::Concat,
                ident("g"),
                TokenKind::BitXor,
                ident("h"),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_variables_and_stages() {
        assert_eq!(
            token_kinds("@my_stage @@session.x $1 @~ @%t"),
            vec![
                TokenKind::Variable("@my_stage".to_string()),
                TokenKind::Variable("@@session".to_string()),
                TokenKind::Dot,
                ident("x"),
                TokenKind::Variable("$1".to_string()),
                TokenKind::At,
                TokenKind::BitNot,
                TokenKind::At,
                TokenKind::Percent,
                ident("t"),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_span_tracking() {
        let tokens = tokenize("SELECT id");
        assert_eq!(tokens[0].span, Span::new(0, 6));
        assert_eq!(tokens[1].span, Span::new(7, 9));
    }
}
