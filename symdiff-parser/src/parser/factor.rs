use crate::{ast::{NodeId, Op}, consts, tokenizer::{Token, TokenKind}};
use levenshtein::levenshtein;
use super::{error::{Error, ParseErrorKind}, Parser};

/// Returns the function and constant names that are spelled similarly to `name`.
fn similar_names(name: &str) -> Vec<&'static str> {
    Op::FUNCTIONS
        .iter()
        .map(|op| op.symbol())
        .chain(consts::CONSTANTS.iter().map(|(n, _)| *n))
        .filter(|n| levenshtein(n, name) < 2)
        .collect()
}

/// Parses the lexeme of a number token.
fn number_value(token: &Token) -> Result<f64, Error> {
    token.lexeme.parse::<f64>().map_err(|_| {
        Error::new(token.span.clone(), ParseErrorKind::InvalidSymbol {
            symbol: token.lexeme.to_string(),
        })
    })
}

impl<'source> Parser<'source> {
    /// Parses a single operand.
    ///
    /// ```text
    /// Factor  := '(' Expression ')' | Number | Constant | Variable | UnaryOp
    /// UnaryOp := ('log' | 'exp' | 'sin' | 'cos' | 'tan') Factor
    /// ```
    pub fn factor(&mut self) -> Result<NodeId, Error> {
        let Some(kind) = self.current_kind() else {
            return Err(self.error(ParseErrorKind::UnfinishedExpression));
        };

        match kind {
            TokenKind::OpenParen => self.paren(),
            TokenKind::Number => {
                let token = self.next_token()?;
                let value = number_value(&token)?;
                Ok(self.tree.number(value))
            },
            TokenKind::Add | TokenKind::Sub => self.signed_number(),
            TokenKind::Name => self.name(),
            TokenKind::Symbol => {
                let symbol = self.current_token().map_or_else(String::new, |t| t.lexeme.to_string());
                Err(self.error(ParseErrorKind::InvalidSymbol { symbol }))
            },
            TokenKind::Mul
                | TokenKind::Div
                | TokenKind::Exp
                | TokenKind::CloseParen
                | TokenKind::Whitespace => Err(self.error(ParseErrorKind::NoNumberFound)),
        }
    }

    /// Parses a parenthesized expression.
    fn paren(&mut self) -> Result<NodeId, Error> {
        self.next_token()?;
        let inner = self.expression()?;
        match self.current_kind() {
            Some(TokenKind::CloseParen) => {
                self.next_token()?;
                Ok(inner)
            },
            _ => Err(self.error(ParseErrorKind::MissingClosingBracket)),
        }
    }

    /// Parses a number with a sign written directly in front of it, such as `-2.5`.
    fn signed_number(&mut self) -> Result<NodeId, Error> {
        let sign = self.next_token()?;
        let adjacent = self
            .current_token()
            .filter(|token| token.kind == TokenKind::Number && token.span.start == sign.span.end)
            .is_some();
        if !adjacent {
            return Err(Error::new(sign.span, ParseErrorKind::NoNumberFound));
        }

        let token = self.next_token()?;
        let value = number_value(&token)?;
        let value = if sign.kind == TokenKind::Sub { -value } else { value };
        Ok(self.tree.number(value))
    }

    /// Parses a name, which is either a function applied to an operand, a named constant, or a
    /// single-letter variable.
    fn name(&mut self) -> Result<NodeId, Error> {
        let token = self.next_token()?;
        let name = token.lexeme;

        if let Some(op) = Op::from_name(name) {
            let operand = self.factor()?;
            return Ok(self.tree.unary(op, operand));
        }

        if let Some(value) = consts::constant_value(name) {
            return Ok(self.tree.constant(value));
        }

        let mut chars = name.chars();
        match (chars.next(), chars.next()) {
            (Some(var), None) => Ok(self.tree.variable(var)),
            _ => Err(Error::new(token.span, ParseErrorKind::UnknownOperation {
                name: name.to_string(),
                similar: similar_names(name),
            })),
        }
    }
}
