//! Constant folding.

use crate::numerical::Eval;
use crate::symbolic::step_collector::StepCollector;
use super::step::Step;
use symdiff_parser::{ast::{NodeKind, Tree}, consts};
use tracing::trace;

/// The values a variable-free subtree is collapsed to when it evaluates close enough to them.
const KNOWN_VALUES: [f64; 3] = [0.0, 1.0, -1.0];

/// Returns the leaf a computed value should become: a named constant if it matches one, or a
/// plain number otherwise.
fn leaf_for(value: f64) -> NodeKind {
    if consts::is_constant(value) {
        NodeKind::Constant(value)
    } else {
        NodeKind::Number(value)
    }
}

/// Folds constant subexpressions, visiting children before their parents.
///
/// An operation whose operands are all [`NodeKind::Number`] leaves is replaced by its value, as
/// long as that value is finite. Named constants are not folded this way, so `2 * e` is kept as
/// written. A subtree with no variables that evaluates to 0, 1 or -1 is collapsed to that literal
/// regardless of what it contains, which covers identities such as `sin(pi) = 0`.
///
/// Returns true if the tree changed.
pub fn fold_constants(tree: &mut Tree, step_collector: &mut dyn StepCollector<Step>) -> bool {
    // every collapse happens at the node being visited, and only frees nodes that were already
    // visited, so the order can be computed up front
    let order = tree.post_order_iter().collect::<Vec<_>>();
    // collapsing a node never changes whether its ancestors contain a variable
    let has_variable = tree.variable_flags(|_| true);
    let mut changed = false;

    for id in order {
        if tree.kind(id).is_leaf() {
            continue;
        }

        let all_numbers = tree
            .children(id)
            .all(|child| matches!(tree.kind(child), NodeKind::Number(_)));
        if all_numbers {
            if let Ok(value) = tree.node_ref(id).eval_default() {
                if value.is_finite() {
                    trace!(node = %tree.node_ref(id), value, "folding constants");
                    tree.collapse(id, leaf_for(value));
                    step_collector.push(Step::FoldConstants);
                    changed = true;
                    continue;
                }
            }
        }

        if has_variable[id.index()] {
            continue;
        }
        let Ok(value) = tree.node_ref(id).eval_default() else {
            continue;
        };
        if let Some(known) = KNOWN_VALUES.into_iter().find(|known| consts::approx_eq(value, *known)) {
            trace!(node = %tree.node_ref(id), value = known, "collapsing known value");
            tree.collapse(id, NodeKind::Number(known));
            step_collector.push(Step::CollapseKnownValue);
            changed = true;
        }
    }

    changed
}
