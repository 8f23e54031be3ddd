//! Parsing and representation of single-variable mathematical expressions.
//!
//! Source text is turned into a [`Tree`](ast::Tree) by [`parse`]; the tree is an arena of nodes
//! addressed by [`NodeId`](ast::NodeId) handles, with explicit parent links so that subtrees can
//! be rewritten in place.

pub mod ast;
pub mod consts;
pub mod parser;
pub mod tokenizer;

pub use parser::parse;
