use logos::{Lexer, Logos};
use std::ops::Range;

/// Extends a number lexeme with a trailing exponent such as `e-3`. The exponent is only consumed
/// if it is complete, so `2e` lexes as the number `2` followed by the name `e`.
fn exponent(lexer: &mut Lexer<TokenKind>) -> bool {
    let rest = lexer.remainder().as_bytes();
    if !matches!(rest.first(), Some(b'e' | b'E')) {
        return true;
    }

    let sign = usize::from(matches!(rest.get(1), Some(b'+' | b'-')));
    let digits = rest[1 + sign..]
        .iter()
        .take_while(|b| b.is_ascii_digit())
        .count();
    if digits > 0 {
        lexer.bump(1 + sign + digits);
    }
    true
}

/// The different kinds of tokens that can be produced by the tokenizer.
#[derive(Logos, Clone, Copy, Debug, PartialEq)]
pub enum TokenKind {
    #[regex(r"[ \t]+")]
    Whitespace,

    #[token("+")]
    Add,

    #[token("-")]
    Sub,

    #[token("*")]
    Mul,

    #[token("/")]
    Div,

    #[token("^")]
    Exp,

    #[token("(")]
    OpenParen,

    #[token(")")]
    CloseParen,

    #[regex(r"[a-zA-Z]+")]
    Name,

    #[regex(r"[0-9]+(\.[0-9]*)?|\.[0-9]+", exponent)]
    Number,

    #[regex(r".", priority = 0)]
    Symbol,
}

impl TokenKind {
    /// Returns true if the token represents whitespace.
    pub fn is_whitespace(self) -> bool {
        matches!(self, TokenKind::Whitespace)
    }
}

/// A token produced by the tokenizer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token<'source> {
    /// The region of the source code that this token originated from.
    pub span: Range<usize>,

    /// The kind of token.
    pub kind: TokenKind,

    /// The raw lexeme that was parsed into this token.
    pub lexeme: &'source str,
}
