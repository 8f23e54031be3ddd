pub mod error;
pub mod expr;
pub mod factor;

use crate::{ast::Tree, tokenizer::{tokenize, Token, TokenKind}};
use error::{Error, ParseErrorKind};
use logos::Lexer;
use std::ops::Range;
use tracing::debug;

/// Parses a complete expression into a tree.
///
/// All of the source must be consumed; leftover input is an error. On failure no tree is
/// returned.
pub fn parse(source: &str) -> Result<Tree, Error> {
    let mut parser = Parser::new(source);
    parser.parse_full().map_err(|err| {
        debug!(source, offset = err.offset(), kind = ?err.kind, "parse failed");
        err
    })
}

/// A high-level parser for expressions.
///
/// The parser pulls tokens from the lexer one at a time as the grammar asks for them, holding a
/// single token of lookahead. Nodes are allocated directly into the tree being built.
pub struct Parser<'source> {
    /// The lexer producing the remaining tokens.
    lexer: Lexer<'source, TokenKind>,

    /// The next non-whitespace token, already lexed.
    current: Option<Token<'source>>,

    /// The end of the last consumed token.
    last_end: usize,

    /// The tree that nodes are allocated into.
    pub(crate) tree: Tree,
}

impl<'source> Parser<'source> {
    /// Create a new parser for the given source.
    pub fn new(source: &'source str) -> Self {
        let mut parser = Self {
            lexer: tokenize(source),
            current: None,
            last_end: 0,
            tree: Tree::new(),
        };
        parser.current = parser.lex();
        parser
    }

    /// Lexes the next non-whitespace token. Characters the lexer rejects become
    /// [`TokenKind::Symbol`] tokens.
    fn lex(&mut self) -> Option<Token<'source>> {
        loop {
            let kind = match self.lexer.next()? {
                Ok(kind) if kind.is_whitespace() => continue,
                Ok(kind) => kind,
                Err(()) => TokenKind::Symbol,
            };
            return Some(Token {
                span: self.lexer.span(),
                kind,
                lexeme: self.lexer.slice(),
            });
        }
    }

    /// Creates an error that points at the current token, or the end of the source code if the
    /// cursor is at the end of the stream.
    pub fn error(&self, kind: ParseErrorKind) -> Error {
        Error::new(self.span(), kind)
    }

    /// Returns a span pointing at the end of the source code.
    pub fn eof_span(&self) -> Range<usize> {
        self.last_end..self.last_end
    }

    /// Returns the span of the current token, or the end of the source code if the cursor is at
    /// the end of the stream.
    pub fn span(&self) -> Range<usize> {
        self.current
            .as_ref()
            .map_or(self.eof_span(), |token| token.span.clone())
    }

    /// Returns the current token. The cursor is not moved. Returns [`None`] if the cursor is at
    /// the end of the stream.
    pub fn current_token(&self) -> Option<&Token<'source>> {
        self.current.as_ref()
    }

    /// Returns the kind of the current token.
    pub fn current_kind(&self) -> Option<TokenKind> {
        self.current.as_ref().map(|token| token.kind)
    }

    /// Returns the current token, then advances to the next one. Whitespace tokens are skipped.
    ///
    /// Returns an [`ParseErrorKind::UnfinishedExpression`] error if there are no more tokens.
    pub fn next_token(&mut self) -> Result<Token<'source>, Error> {
        let token = self
            .current
            .take()
            .ok_or_else(|| self.error(ParseErrorKind::UnfinishedExpression))?;
        self.last_end = token.span.end;
        self.current = self.lex();
        Ok(token)
    }

    /// Parses an expression that must span the whole source, and returns the resulting tree.
    pub fn parse_full(&mut self) -> Result<Tree, Error> {
        let root = self.expression()?;
        if let Some(token) = self.current_token() {
            let kind = match token.kind {
                TokenKind::CloseParen => ParseErrorKind::MissingOpeningBracket,
                _ => ParseErrorKind::InvalidSymbol { symbol: token.lexeme.to_string() },
            };
            return Err(self.error(kind));
        }

        let mut tree = std::mem::take(&mut self.tree);
        tree.set_root(root);
        Ok(tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{NodeId, NodeKind, Op};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use std::f64::consts::{E, PI};

    fn error(source: &str) -> (ParseErrorKind, usize) {
        let err = parse(source).unwrap_err();
        let offset = err.offset();
        (err.kind, offset)
    }

    #[test]
    fn precedence() {
        let tree = parse("2 + 3 * 4").unwrap();

        let mut expected = Tree::new();
        let two = expected.number(2.0);
        let three = expected.number(3.0);
        let four = expected.number(4.0);
        let mul = expected.binary(Op::Mul, three, four);
        let add = expected.binary(Op::Add, two, mul);
        expected.set_root(add);

        assert_eq!(tree, expected);
    }

    #[test]
    fn power_is_left_associative() {
        // `2 ^ 3 ^ 2` is `(2 ^ 3) ^ 2`, not the conventional `2 ^ (3 ^ 2)`
        let tree = parse("2 ^ 3 ^ 2").unwrap();
        let root = tree.root().unwrap();
        let left = tree.left(root).unwrap();
        assert_eq!(tree.kind(left), NodeKind::Operation(Op::Pow));
        assert_eq!(tree.kind(tree.right(root).unwrap()), NodeKind::Number(2.0));
        assert_eq!(tree.to_string(), "2^3^2");
    }

    #[test]
    fn names() {
        let tree = parse("sin(x) * pi + e / y").unwrap();
        assert_eq!(tree.to_string(), "sin(x) * pi + e / y");

        let root = tree.root().unwrap();
        let mul = tree.left(root).unwrap();
        assert_eq!(tree.kind(tree.right(mul).unwrap()), NodeKind::Constant(std::f64::consts::PI));
    }

    #[test]
    fn function_without_parentheses() {
        let tree = parse("cos x ^ 2").unwrap();
        assert_eq!(tree.to_string(), "cos(x)^2");
    }

    #[test]
    fn signed_numbers() {
        let tree = parse("2 - -3 * x^-1").unwrap();
        assert_eq!(tree.to_string(), "2 - -3 * x^-1");
        let root = tree.root().unwrap();
        let mul = tree.right(root).unwrap();
        assert_eq!(tree.kind(tree.left(mul).unwrap()), NodeKind::Number(-3.0));
    }

    #[test]
    fn exponent_numbers() {
        let tree = parse("1.5e3 + .25").unwrap();
        let root = tree.root().unwrap();
        assert_eq!(tree.kind(tree.left(root).unwrap()), NodeKind::Number(1500.0));
        assert_eq!(tree.kind(tree.right(root).unwrap()), NodeKind::Number(0.25));
    }

    #[test]
    fn unclosed_paren() {
        assert_eq!(error("(2 + 3"), (ParseErrorKind::MissingClosingBracket, 6));
        assert_eq!(error("sin((x)"), (ParseErrorKind::MissingClosingBracket, 7));
    }

    #[test]
    fn unopened_paren() {
        assert_eq!(error("2 + 3)"), (ParseErrorKind::MissingOpeningBracket, 5));
    }

    #[test]
    fn unfinished() {
        assert_eq!(error("2 +"), (ParseErrorKind::UnfinishedExpression, 3));
        assert_eq!(error("sin"), (ParseErrorKind::UnfinishedExpression, 3));
        assert_eq!(error(""), (ParseErrorKind::UnfinishedExpression, 0));
        assert_eq!(error("   "), (ParseErrorKind::UnfinishedExpression, 0));
    }

    #[test]
    fn no_number() {
        assert_eq!(error("2 * * 3"), (ParseErrorKind::NoNumberFound, 4));
        assert_eq!(error("()"), (ParseErrorKind::NoNumberFound, 1));
        assert_eq!(error("-x"), (ParseErrorKind::NoNumberFound, 0));
    }

    #[test]
    fn invalid_symbols() {
        assert_eq!(
            error("2 $ 3"),
            (ParseErrorKind::InvalidSymbol { symbol: "$".to_string() }, 2),
        );
        assert_eq!(
            error("2 3"),
            (ParseErrorKind::InvalidSymbol { symbol: "3".to_string() }, 2),
        );
        assert_eq!(
            error("x\n"),
            (ParseErrorKind::InvalidSymbol { symbol: "\n".to_string() }, 1),
        );
    }

    #[test]
    fn unknown_names() {
        assert_eq!(
            error("sinh(x)"),
            (ParseErrorKind::UnknownOperation { name: "sinh".to_string(), similar: vec!["sin"] }, 0),
        );
        assert_eq!(
            error("1 + xy"),
            (ParseErrorKind::UnknownOperation { name: "xy".to_string(), similar: vec![] }, 4),
        );
    }

    #[test]
    fn report_points_at_offset() {
        let err = parse("(2 + 3").unwrap_err();
        let mut buf = Vec::new();
        err.build_report("input")
            .write(("input", ariadne::Source::from("(2 + 3")), &mut buf)
            .unwrap();
        let out = String::from_utf8(strip_ansi_escapes::strip(buf)).unwrap();

        assert!(out.contains("unclosed parenthesis"), "{}", out);
        assert!(out.contains("add a closing parenthesis"), "{}", out);
        assert_eq!(err.to_string(), "unclosed parenthesis at offset 6");
    }

    /// The shape of a tree, generated by proptest and then built into a [`Tree`].
    #[derive(Debug, Clone)]
    enum Shape {
        Leaf(NodeKind),
        Unary(Op, Box<Shape>),
        Binary(Op, Box<Shape>, Box<Shape>),
    }

    fn build(tree: &mut Tree, shape: &Shape) -> NodeId {
        match shape {
            Shape::Leaf(kind) => tree.alloc(*kind, None, None),
            Shape::Unary(op, operand) => {
                let operand = build(tree, operand);
                tree.unary(*op, operand)
            },
            Shape::Binary(op, left, right) => {
                let left = build(tree, left);
                let right = build(tree, right);
                tree.binary(*op, left, right)
            },
        }
    }

    fn shape() -> impl Strategy<Value = Shape> {
        let leaf = prop_oneof![
            (-20i32..20).prop_map(|n| Shape::Leaf(NodeKind::Number(n as f64 / 4.0))),
            prop::sample::select(vec![E, PI]).prop_map(|c| Shape::Leaf(NodeKind::Constant(c))),
            prop::sample::select(vec!['x', 'y']).prop_map(|v| Shape::Leaf(NodeKind::Variable(v))),
        ];
        leaf.prop_recursive(5, 48, 2, |inner| {
            prop_oneof![
                (prop::sample::select(Op::FUNCTIONS.to_vec()), inner.clone())
                    .prop_map(|(op, operand)| Shape::Unary(op, Box::new(operand))),
                (
                    prop::sample::select(vec![Op::Add, Op::Sub, Op::Mul, Op::Div, Op::Pow]),
                    inner.clone(),
                    inner,
                )
                    .prop_map(|(op, left, right)| Shape::Binary(op, Box::new(left), Box::new(right))),
            ]
        })
    }

    proptest! {
        #[test]
        fn printed_trees_parse_back(shape in shape()) {
            let mut tree = Tree::new();
            let root = build(&mut tree, &shape);
            tree.set_root(root);

            let printed = tree.to_string();
            let parsed = parse(&printed).map_err(|err| {
                TestCaseError::fail(format!("`{}` failed to parse: {}", printed, err))
            })?;
            prop_assert_eq!(parsed, tree, "printed as `{}`", printed);
        }
    }
}
