//! Numerical evaluation of expression trees.

pub mod ctxt;
pub mod error;
pub mod eval;

pub use ctxt::Ctxt;
pub use error::EvalError;
pub use eval::Eval;
