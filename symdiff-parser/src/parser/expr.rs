use crate::{ast::{NodeId, Op}, tokenizer::TokenKind};
use super::{error::Error, Parser};

/// The binary operators of each precedence level, from lowest to highest.
const TERM_OPS: &[(TokenKind, Op)] = &[(TokenKind::Add, Op::Add), (TokenKind::Sub, Op::Sub)];
const FACTOR_OPS: &[(TokenKind, Op)] = &[(TokenKind::Mul, Op::Mul), (TokenKind::Div, Op::Div)];
const EXP_OPS: &[(TokenKind, Op)] = &[(TokenKind::Exp, Op::Pow)];

impl<'source> Parser<'source> {
    /// Parses a sum or difference of terms.
    ///
    /// ```text
    /// Expression := Term (('+' | '-') Term)*
    /// ```
    pub fn expression(&mut self) -> Result<NodeId, Error> {
        self.binary_chain(TERM_OPS, Self::term)
    }

    /// Parses a product or quotient of powers.
    ///
    /// ```text
    /// Term := Power (('*' | '/') Power)*
    /// ```
    pub fn term(&mut self) -> Result<NodeId, Error> {
        self.binary_chain(FACTOR_OPS, Self::power)
    }

    /// Parses a chain of exponentiations. The chain is folded to the left, so `a ^ b ^ c` is
    /// `(a ^ b) ^ c`.
    ///
    /// ```text
    /// Power := Factor ('^' Factor)*
    /// ```
    pub fn power(&mut self) -> Result<NodeId, Error> {
        self.binary_chain(EXP_OPS, Self::factor)
    }

    /// Parses operands separated by any of the given operators, folding them to the left.
    fn binary_chain(
        &mut self,
        ops: &[(TokenKind, Op)],
        mut operand: impl FnMut(&mut Self) -> Result<NodeId, Error>,
    ) -> Result<NodeId, Error> {
        let mut left = operand(self)?;
        while let Some(op) = self.current_kind().and_then(|kind| {
            ops.iter().find(|(k, _)| *k == kind).map(|(_, op)| *op)
        }) {
            self.next_token()?;
            let right = operand(self)?;
            left = self.tree.binary(op, left, right);
        }
        Ok(left)
    }
}
