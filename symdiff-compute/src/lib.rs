//! Numerical evaluation and symbolic manipulation of expression trees produced by
//! [`symdiff_parser`].
//!
//! - [`numerical`] evaluates trees, binding variables through a [`Ctxt`](numerical::ctxt::Ctxt).
//! - [`symbolic`] differentiates and simplifies trees, and builds Taylor polynomials from them.

pub mod numerical;
pub mod symbolic;
