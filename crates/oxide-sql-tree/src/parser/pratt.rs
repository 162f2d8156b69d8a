//! Pratt expression parser: mapping tokens onto operators.
//!
//! Binding powers are not hard-coded here; they come from the active
//! dialect's operator table via [`crate::dialect::OperatorDef::binding_power`].

use crate::ast::{BinaryOp, UnaryOp};
use crate::dialect::{Fixity, Operator};
use crate::lexer::{Keyword, Token, TokenKind};

/// An operator found at the current position, before the dialect table is
/// consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingOperator {
    pub operator: Operator,
    pub fixity: Fixity,
    /// `NOT LIKE`, `NOT IN`, `NOT BETWEEN`...
    pub negated: bool,
}

impl PendingOperator {
    const fn infix(operator: Operator) -> Self {
        Self {
            operator,
            fixity: Fixity::Infix,
            negated: false,
        }
    }

    const fn postfix(operator: Operator) -> Self {
        Self {
            operator,
            fixity: Fixity::Postfix,
            negated: false,
        }
    }
}

/// Returns the infix or postfix operator starting at `token`.
///
/// `next` is the following token, needed to recognise `NOT LIKE` and
/// friends. Returns `None` if `token` cannot continue an expression.
#[must_use]
pub fn infix_operator(token: &Token, next: &Token) -> Option<PendingOperator> {
    let operator = match &token.kind {
        TokenKind::Plus => Operator::Add,
        TokenKind::Minus => Operator::Sub,
        TokenKind::Star => Operator::Mul,
        TokenKind::Slash => Operator::Div,
        TokenKind::Percent => Operator::Mod,
        TokenKind::Eq => Operator::Eq,
        TokenKind::NotEq => Operator::NotEq,
        TokenKind::Lt => Operator::Lt,
        TokenKind::LtEq => Operator::LtEq,
        TokenKind::Gt => Operator::Gt,
        TokenKind::GtEq => Operator::GtEq,
        TokenKind::Concat => Operator::Concat,
        TokenKind::BitAnd => Operator::BitAnd,
        TokenKind::BitOr => Operator::BitOr,
        TokenKind::BitXor => Operator::BitXor,
        TokenKind::LeftShift => Operator::LeftShift,
        TokenKind::RightShift => Operator::RightShift,
        TokenKind::DoubleColon => return Some(PendingOperator::postfix(Operator::Cast)),
        TokenKind::Colon => return Some(PendingOperator::postfix(Operator::Path)),
        TokenKind::LeftBracket => return Some(PendingOperator::postfix(Operator::Index)),
        _ => return keyword_operator(token, next),
    };
    Some(PendingOperator::infix(operator))
}

fn keyword_operator(token: &Token, next: &Token) -> Option<PendingOperator> {
    let operator = match token.as_keyword()? {
        Keyword::Or => Operator::Or,
        Keyword::And => Operator::And,
        Keyword::Is => return Some(PendingOperator::postfix(Operator::Is)),
        Keyword::Not => {
            let mut negated = PendingOperator::infix(negatable(next.as_keyword()?)?);
            negated.negated = true;
            return Some(negated);
        }
        keyword => negatable(keyword)?,
    };
    Some(PendingOperator::infix(operator))
}

/// Operators that may follow `NOT`.
const fn negatable(keyword: Keyword) -> Option<Operator> {
    match keyword {
        Keyword::Like => Some(Operator::Like),
        Keyword::ILike => Some(Operator::ILike),
        Keyword::Regexp | Keyword::RLike => Some(Operator::Regexp),
        Keyword::In => Some(Operator::In),
        Keyword::Between => Some(Operator::Between),
        _ => None,
    }
}

/// Returns the prefix operator starting at `token`.
#[must_use]
pub fn prefix_operator(token: &Token) -> Option<Operator> {
    match &token.kind {
        TokenKind::Minus => Some(Operator::Neg),
        TokenKind::BitNot => Some(Operator::BitNot),
        TokenKind::Keyword(Keyword::Not) => Some(Operator::Not),
        _ => None,
    }
}

/// Converts an infix operator to the AST operator.
#[must_use]
pub const fn binary_op(operator: Operator, negated: bool) -> Option<BinaryOp> {
    let op = match (operator, negated) {
        (Operator::Or, false) => BinaryOp::Or,
        (Operator::And, false) => BinaryOp::And,
        (Operator::Eq, false) => BinaryOp::Eq,
        (Operator::NotEq, false) => BinaryOp::NotEq,
        (Operator::Lt, false) => BinaryOp::Lt,
        (Operator::LtEq, false) => BinaryOp::LtEq,
        (Operator::Gt, false) => BinaryOp::Gt,
        (Operator::GtEq, false) => BinaryOp::GtEq,
        (Operator::Like, false) => BinaryOp::Like,
        (Operator::Like, true) => BinaryOp::NotLike,
        (Operator::ILike, false) => BinaryOp::ILike,
        (Operator::ILike, true) => BinaryOp::NotILike,
        (Operator::Regexp, false) => BinaryOp::Regexp,
        (Operator::Regexp, true) => BinaryOp::NotRegexp,
        (Operator::BitOr, false) => BinaryOp::BitOr,
        (Operator::BitAnd, false) => BinaryOp::BitAnd,
        (Operator::BitXor, false) => BinaryOp::BitXor,
        (Operator::LeftShift, false) => BinaryOp::LeftShift,
        (Operator::RightShift, false) => BinaryOp::RightShift,
        (Operator::Concat, false) => BinaryOp::Concat,
        (Operator::Add, false) => BinaryOp::Add,
        (Operator::Sub, false) => BinaryOp::Sub,
        (Operator::Mul, false) => BinaryOp::Mul,
        (Operator::Div, false) => BinaryOp::Div,
        (Operator::Mod, false) => BinaryOp::Mod,
        _ => return None,
    };
    Some(op)
}

/// Converts a prefix operator to the AST operator.
#[must_use]
pub const fn unary_op(operator: Operator) -> Option<UnaryOp> {
    match operator {
        Operator::Neg => Some(UnaryOp::Neg),
        Operator::Not => Some(UnaryOp::Not),
        Operator::BitNot => Some(UnaryOp::BitNot),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::{Span, Word};

    fn token(kind: TokenKind) -> Token {
        Token::new(kind, Span::default())
    }

    fn word(text: &str) -> Token {
        token(TokenKind::Identifier(Word::bare(text)))
    }

    #[test]
    fn test_symbol_operators() {
        let eof = token(TokenKind::Eof);
        let op = infix_operator(&token(TokenKind::Plus), &eof).map(|p| p.operator);
        assert_eq!(op, Some(Operator::Add));
        let cast = infix_operator(&token(TokenKind::DoubleColon), &eof);
        assert_eq!(cast.map(|p| p.fixity), Some(Fixity::Postfix));
        assert!(infix_operator(&token(TokenKind::Comma), &eof).is_none());
    }

    #[test]
    fn test_negated_operators() {
        let not = token(TokenKind::Keyword(Keyword::Not));
        let like = token(TokenKind::Keyword(Keyword::Like));
        let pending = infix_operator(&not, &like);
        assert_eq!(
            pending,
            Some(PendingOperator {
                operator: Operator::Like,
                fixity: Fixity::Infix,
                negated: true,
            })
        );
        // RLIKE is a spelling of REGEXP, even as an unreserved word
        let pending = infix_operator(&not, &word("rlike"));
        assert_eq!(pending.map(|p| p.operator), Some(Operator::Regexp));
        // NOT on its own does not continue an expression
        assert!(infix_operator(&not, &word("x")).is_none());
    }

    #[test]
    fn test_quoted_word_is_not_an_operator() {
        let quoted = token(TokenKind::Identifier(Word::quoted("ilike".into(), '"')));
        assert!(infix_operator(&quoted, &token(TokenKind::Eof)).is_none());
    }

    #[test]
    fn test_ast_mapping() {
        assert_eq!(binary_op(Operator::Regexp, true), Some(BinaryOp::NotRegexp));
        assert_eq!(binary_op(Operator::Add, true), None);
        assert_eq!(binary_op(Operator::In, false), None);
        assert_eq!(unary_op(Operator::BitNot), Some(UnaryOp::BitNot));
        assert_eq!(
            prefix_operator(&token(TokenKind::Minus)),
            Some(Operator::Neg)
        );
    }
}
