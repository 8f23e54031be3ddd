#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The precedence of an operation, in order from lowest precedence (evaluated last) to highest
/// precedence (evaluated first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    /// Addition and subtraction.
    Term,

    /// Multiplication and division.
    Factor,

    /// Exponentiation.
    Exp,

    /// Leaves and function applications, which never need to be parenthesized.
    Atom,
}

/// An operation stored in an internal node of the expression tree.
///
/// Binary operations own two operands. Unary operations (the named functions) own a single
/// operand, which is stored in the right slot of the node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Op {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
    /// Natural logarithm.
    Log,
    Exp,
    Sin,
    Cos,
    Tan,
}

impl Op {
    /// The named functions, which are the unary operations.
    pub const FUNCTIONS: [Op; 5] = [Op::Log, Op::Exp, Op::Sin, Op::Cos, Op::Tan];

    /// Returns the symbol or function name of this operation, as written in source code.
    pub fn symbol(self) -> &'static str {
        match self {
            Op::Add => "+",
            Op::Sub => "-",
            Op::Mul => "*",
            Op::Div => "/",
            Op::Pow => "^",
            Op::Log => "log",
            Op::Exp => "exp",
            Op::Sin => "sin",
            Op::Cos => "cos",
            Op::Tan => "tan",
        }
    }

    /// Returns the function with the given name.
    pub fn from_name(name: &str) -> Option<Op> {
        Self::FUNCTIONS.into_iter().find(|op| op.symbol() == name)
    }

    /// Returns true if this operation takes a single operand.
    pub fn is_unary(self) -> bool {
        matches!(self, Op::Log | Op::Exp | Op::Sin | Op::Cos | Op::Tan)
    }

    /// Returns the precedence of the operation.
    pub fn precedence(self) -> Precedence {
        match self {
            Op::Add | Op::Sub => Precedence::Term,
            Op::Mul | Op::Div => Precedence::Factor,
            Op::Pow => Precedence::Exp,
            Op::Log | Op::Exp | Op::Sin | Op::Cos | Op::Tan => Precedence::Atom,
        }
    }

    /// Applies a unary operation to its operand.
    ///
    /// Panics if the operation is binary.
    pub fn apply_unary(self, operand: f64) -> f64 {
        match self {
            Op::Log => operand.ln(),
            Op::Exp => operand.exp(),
            Op::Sin => operand.sin(),
            Op::Cos => operand.cos(),
            Op::Tan => operand.tan(),
            _ => panic!("`{}` is not a unary operation", self.symbol()),
        }
    }

    /// Applies a binary operation to its operands.
    ///
    /// Panics if the operation is unary.
    pub fn apply_binary(self, left: f64, right: f64) -> f64 {
        match self {
            Op::Add => left + right,
            Op::Sub => left - right,
            Op::Mul => left * right,
            Op::Div => left / right,
            Op::Pow => left.powf(right),
            _ => panic!("`{}` is not a binary operation", self.symbol()),
        }
    }
}
