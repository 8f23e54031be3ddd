//! Module to simplify expression trees.
//!
//! This module provides the [`simplify`] function, which rewrites a tree in place into a reduced
//! form. It does this by alternating two passes over the tree until one full round changes
//! nothing:
//!
//! - [`fold::fold_constants`] replaces operations on plain numbers with their value, and collapses
//!   variable-free subtrees that evaluate to 0, 1 or -1 (such as `sin(pi)`).
//! - [`identity::eliminate_identities`] removes algebraic identities such as `x + 0` and `x ^ 1`.
//!
//! A rewrite in one pass can expose work for the other (and for itself, higher up the tree), which
//! is why the passes are repeated rather than run once. The result is a fixed point, so simplifying
//! an already simplified tree is a no-op.

pub mod fold;
pub mod identity;
pub mod step;

use crate::symbolic::step_collector::StepCollector;
use step::Step;
use symdiff_parser::ast::Tree;
use tracing::debug;

/// Simplify the given tree in place, reporting each rewrite to the given step collector.
///
/// Returns true if the tree changed.
pub fn simplify_with(tree: &mut Tree, step_collector: &mut dyn StepCollector<Step>) -> bool {
    let mut changed_at_least_once = false;
    let mut round = 0;

    loop {
        round += 1;
        let folded = fold::fold_constants(tree, step_collector);
        let eliminated = identity::eliminate_identities(tree, step_collector);
        debug!(round, folded, eliminated, tree = %tree, "simplification round");

        if !folded && !eliminated {
            break;
        }
        changed_at_least_once = true;
    }

    changed_at_least_once
}

/// Simplify the given tree in place.
pub fn simplify(tree: &mut Tree) {
    simplify_with(tree, &mut ());
}

/// Simplify the given tree in place. The steps taken by the simplifier are collected and returned,
/// in the order they were applied. This is useful for debugging, and also for displaying the steps
/// taken to the user.
pub fn simplify_with_steps(tree: &mut Tree) -> Vec<Step> {
    let mut steps = Vec::new();
    simplify_with(tree, &mut steps);
    steps
}

#[cfg(test)]
mod tests {
    use crate::numerical::{Ctxt, Eval};
    use crate::symbolic::{derivative, strategy};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use symdiff_parser::{ast::NodeKind, parse};
    use super::*;

    fn simplified(source: &str) -> Tree {
        let mut tree = parse(source).unwrap();
        simplify(&mut tree);
        tree
    }

    #[test]
    fn folds_arithmetic() {
        let tree = simplified("2 + 3 * 4");
        assert_eq!(tree.kind(tree.root().unwrap()), NodeKind::Number(14.0));
    }

    #[test]
    fn derivative_of_square() {
        let mut deriv = derivative(&parse("x ^ 2").unwrap(), 'x');
        simplify(&mut deriv);
        assert_eq!(deriv.to_string(), "2 * x");
    }

    #[test]
    fn derivative_of_sine() {
        let mut deriv = derivative(&parse("sin(x)").unwrap(), 'x');
        simplify(&mut deriv);
        assert_eq!(deriv.to_string(), "cos(x)");
    }

    #[test]
    fn identities() {
        assert_eq!(simplified("x * 1").to_string(), "x");
        assert_eq!(simplified("(x + 0) ^ (3 - 2)").to_string(), "x");
        assert_eq!(simplified("sin(x) * (y - y)").to_string(), "sin(x) * (y - y)");
        assert_eq!(simplified("sin(x) * (2 - 2)").to_string(), "0");
    }

    #[test]
    fn log_of_e_is_one() {
        let tree = simplified("log(e)");
        assert_eq!(tree.kind(tree.root().unwrap()), NodeKind::Number(1.0));
    }

    #[test]
    fn passes_feed_each_other() {
        // folding exposes `x ^ 0`, and rewriting it to 1 exposes `3 * 1`
        assert_eq!(simplified("3 * x ^ (1 - 1)").to_string(), "3");
        assert_eq!(simplified("2 * (x * 0 + 4)").to_string(), "8");
    }

    #[test]
    fn derivative_of_product() {
        let mut deriv = derivative(&parse("x * sin(x)").unwrap(), 'x');
        simplify(&mut deriv);
        assert_eq!(deriv.to_string(), "sin(x) + x * cos(x)");
    }

    #[test]
    fn derivative_of_cosine() {
        let mut deriv = derivative(&parse("cos(x)").unwrap(), 'x');
        simplify(&mut deriv);
        assert_eq!(deriv.to_string(), "-1 * sin(x)");
    }

    #[test]
    fn records_steps() {
        let mut tree = parse("(x + 0) * (4 - 3)").unwrap();
        let steps = simplify_with_steps(&mut tree);
        assert_eq!(tree.to_string(), "x");
        assert_eq!(steps, vec![Step::FoldConstants, Step::AddZero, Step::MultiplyOne]);
    }

    #[test]
    fn empty_tree() {
        let mut tree = Tree::new();
        assert!(!simplify_with(&mut tree, &mut ()));
        assert!(tree.is_empty());
    }

    #[test]
    fn already_simple() {
        let mut tree = parse("x * sin(y)").unwrap();
        assert!(!simplify_with(&mut tree, &mut ()));
        assert!(simplify_with_steps(&mut tree).is_empty());
    }

    proptest! {
        #[test]
        fn simplify_is_idempotent(shape in strategy::tame_tree()) {
            let mut once = shape.build();
            simplify(&mut once);

            let mut twice = once.clone();
            let changed = simplify_with(&mut twice, &mut ());
            prop_assert!(!changed, "second pass changed `{}` into `{}`", once, twice);
            prop_assert_eq!(twice, once);
        }

        #[test]
        fn simplify_preserves_value(shape in strategy::tame_tree(), x in -2.0f64..2.0) {
            let tree = shape.build();
            let mut ctxt = Ctxt::new();
            ctxt.add_var('x', x);

            let before = tree.eval(&ctxt).unwrap();
            prop_assume!(before.is_finite() && before.abs() < 1e6);

            let mut reduced = tree.clone();
            simplify(&mut reduced);
            let after = reduced.eval(&ctxt).unwrap();

            let tolerance = 1e-6 * before.abs().max(1.0);
            prop_assert!(
                (before - after).abs() < tolerance,
                "`{}` = {} but `{}` = {}", tree, before, reduced, after,
            );
        }

        #[test]
        fn simplify_preserves_value_over_every_operation(
            shape in strategy::positive_tree(),
            x in 0.25f64..2.0,
        ) {
            let tree = shape.build();
            let mut ctxt = Ctxt::new();
            ctxt.add_var('x', x);

            let before = tree.eval(&ctxt).unwrap();
            prop_assume!(before.is_finite() && before.abs() < 1e6);

            let mut reduced = tree.clone();
            simplify(&mut reduced);
            prop_assert!(!simplify_with(&mut reduced.clone(), &mut ()), "`{}` is not a fixed point", reduced);

            let after = reduced.eval(&ctxt).unwrap();
            let tolerance = 1e-6 * before.abs().max(1.0);
            prop_assert!(
                (before - after).abs() < tolerance,
                "`{}` = {} but `{}` = {}", tree, before, reduced, after,
            );
        }

        #[test]
        fn simplified_derivative_matches_raw(shape in strategy::tame_tree(), x in -2.0f64..2.0) {
            let deriv = derivative(&shape.build(), 'x');
            let mut ctxt = Ctxt::new();
            ctxt.add_var('x', x);

            let raw = deriv.eval(&ctxt).unwrap();
            prop_assume!(raw.abs() < 1e6);

            let mut reduced = deriv.clone();
            simplify(&mut reduced);
            let after = reduced.eval(&ctxt).unwrap();
            prop_assert!((raw - after).abs() < 1e-6 * raw.abs().max(1.0));
        }
    }
}
