//! Plain-text and LaTeX formatting of expression trees.
//!
//! The plain-text form is the concrete syntax accepted by the parser, with the fewest parentheses
//! needed for it to parse back into the same tree.

use crate::consts;
use std::fmt::{Display, Formatter, Result};
use super::{NodeId, NodeKind, Op, Precedence, Tree};

/// A trait for types that can be formatted as LaTeX.
pub trait Latex {
    /// Format the value as LaTeX.
    fn fmt_latex(&self, f: &mut Formatter) -> Result;

    /// Wraps the value in a [`LatexFormatter`], which implements [`Display`].
    fn as_display(&self) -> LatexFormatter<'_, Self> {
        LatexFormatter(self)
    }
}

/// A wrapper type that implements [`Display`] for any type that implements [`Latex`].
pub struct LatexFormatter<'a, T: ?Sized>(&'a T);

impl<T: ?Sized> Display for LatexFormatter<'_, T>
where
    T: Latex,
{
    fn fmt(&self, f: &mut Formatter) -> Result {
        self.0.fmt_latex(f)
    }
}

/// A borrowed view of a single node of a [`Tree`], used to format subtrees.
#[derive(Debug, Clone, Copy)]
pub struct NodeRef<'a> {
    /// The tree the node lives in.
    pub tree: &'a Tree,

    /// The node to format.
    pub id: NodeId,
}

impl Tree {
    /// Returns a formattable view of the given node.
    pub fn node_ref(&self, id: NodeId) -> NodeRef<'_> {
        NodeRef { tree: self, id }
    }
}

impl<'a> NodeRef<'a> {
    fn kind(&self) -> NodeKind {
        self.tree.kind(self.id)
    }

    fn operand(&self, slot: Option<NodeId>) -> NodeRef<'a> {
        match slot {
            Some(id) => NodeRef { tree: self.tree, id },
            None => panic!("operation node {:?} is missing an operand", self.id),
        }
    }

    fn left(&self) -> NodeRef<'a> {
        self.operand(self.tree.left(self.id))
    }

    fn right(&self) -> NodeRef<'a> {
        self.operand(self.tree.right(self.id))
    }

    /// The precedence of the node when it appears as an operand.
    fn precedence(&self) -> Precedence {
        match self.kind() {
            NodeKind::Operation(op) => op.precedence(),
            _ => Precedence::Atom,
        }
    }
}

/// Writes `value`, wrapped in `open` and `close` if `paren` is true.
fn fmt_wrapped(
    f: &mut Formatter,
    paren: bool,
    (open, close): (&str, &str),
    mut value: impl FnMut(&mut Formatter) -> Result,
) -> Result {
    if paren {
        f.write_str(open)?;
        value(f)?;
        f.write_str(close)
    } else {
        value(f)
    }
}

impl Display for NodeRef<'_> {
    fn fmt(&self, f: &mut Formatter) -> Result {
        match self.kind() {
            NodeKind::Number(n) => write!(f, "{}", n),
            NodeKind::Constant(c) => match consts::constant_name(c) {
                Some(name) => f.write_str(name),
                None => write!(f, "{}", c),
            },
            NodeKind::Variable(v) => write!(f, "{}", v),
            NodeKind::Operation(op) if op.is_unary() => {
                write!(f, "{}({})", op.symbol(), self.right())
            },
            NodeKind::Operation(op) => {
                // operators are left-associative, so only the right operand needs parentheses at
                // equal precedence
                let (left, right) = (self.left(), self.right());
                fmt_wrapped(f, left.precedence() < op.precedence(), ("(", ")"), |f| left.fmt(f))?;
                match op {
                    Op::Pow => f.write_str("^")?,
                    _ => write!(f, " {} ", op.symbol())?,
                }
                fmt_wrapped(f, right.precedence() <= op.precedence(), ("(", ")"), |f| right.fmt(f))
            },
        }
    }
}

impl Display for Tree {
    fn fmt(&self, f: &mut Formatter) -> Result {
        match self.root() {
            Some(root) => self.node_ref(root).fmt(f),
            None => Ok(()),
        }
    }
}

/// The precedence of a node in LaTeX output, where `\frac` groups on its own.
fn latex_precedence(node: &NodeRef) -> Precedence {
    match node.kind() {
        NodeKind::Operation(Op::Div) => Precedence::Atom,
        _ => node.precedence(),
    }
}

const LATEX_PAREN: (&str, &str) = ("\\left(", "\\right)");

impl Latex for NodeRef<'_> {
    fn fmt_latex(&self, f: &mut Formatter) -> Result {
        match self.kind() {
            NodeKind::Number(n) => write!(f, "{}", n),
            NodeKind::Constant(c) => match consts::constant_name(c) {
                Some("pi") => f.write_str("\\pi"),
                Some(name) => f.write_str(name),
                None => write!(f, "{}", c),
            },
            NodeKind::Variable(v) => write!(f, "{}", v),
            NodeKind::Operation(Op::Exp) => {
                write!(f, "e^{{")?;
                self.right().fmt_latex(f)?;
                write!(f, "}}")
            },
            NodeKind::Operation(op) if op.is_unary() => {
                let name = match op {
                    Op::Log => "\\ln",
                    Op::Sin => "\\sin",
                    Op::Cos => "\\cos",
                    _ => "\\tan",
                };
                f.write_str(name)?;
                fmt_wrapped(f, true, LATEX_PAREN, |f| self.right().fmt_latex(f))
            },
            NodeKind::Operation(Op::Div) => {
                write!(f, "\\frac{{")?;
                self.left().fmt_latex(f)?;
                write!(f, "}}{{")?;
                self.right().fmt_latex(f)?;
                write!(f, "}}")
            },
            NodeKind::Operation(Op::Pow) => {
                let left = self.left();
                // only plain leaves and parenthesized functions can carry a superscript as is
                let paren = match left.kind() {
                    NodeKind::Operation(op) => !op.is_unary() || op == Op::Exp,
                    kind => kind.value().map_or(false, |n| n < 0.0),
                };
                fmt_wrapped(f, paren, LATEX_PAREN, |f| left.fmt_latex(f))?;
                write!(f, "^{{")?;
                self.right().fmt_latex(f)?;
                write!(f, "}}")
            },
            NodeKind::Operation(op) => {
                let (left, right) = (self.left(), self.right());
                let symbol = match op {
                    Op::Mul => "\\cdot",
                    _ => op.symbol(),
                };
                fmt_wrapped(f, latex_precedence(&left) < op.precedence(), LATEX_PAREN, |f| {
                    left.fmt_latex(f)
                })?;
                write!(f, " {} ", symbol)?;
                fmt_wrapped(f, latex_precedence(&right) <= op.precedence(), LATEX_PAREN, |f| {
                    right.fmt_latex(f)
                })
            },
        }
    }
}

impl Latex for Tree {
    fn fmt_latex(&self, f: &mut Formatter) -> Result {
        match self.root() {
            Some(root) => self.node_ref(root).fmt_latex(f),
            None => Ok(()),
        }
    }
}
