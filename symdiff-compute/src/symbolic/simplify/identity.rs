//! Identity elimination.
//!
//! Each rule matches an operation whose operand in a given slot is a number or named constant
//! with a given value, and rewrites the operation either to its other operand or to a literal.

use crate::symbolic::step_collector::StepCollector;
use super::step::Step;
use std::f64::consts::E;
use symdiff_parser::{ast::{NodeId, NodeKind, Op, Tree}, consts};
use tracing::trace;

/// The operand slot a rule inspects. Unary operations keep their operand in the right slot.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Slot {
    Left,
    Right,
    Either,
}

/// What the matched operation is rewritten to.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Rewrite {
    /// The operand in the other slot.
    Other,

    /// A number leaf.
    Number(f64),

    /// A named constant leaf.
    Constant(f64),
}

struct Rule {
    op: Op,
    slot: Slot,
    value: f64,
    rewrite: Rewrite,
    step: Step,
}

const RULES: [Rule; 13] = [
    Rule { op: Op::Add, slot: Slot::Either, value: 0.0, rewrite: Rewrite::Other, step: Step::AddZero },
    Rule { op: Op::Sub, slot: Slot::Right, value: 0.0, rewrite: Rewrite::Other, step: Step::SubtractZero },
    Rule { op: Op::Mul, slot: Slot::Either, value: 1.0, rewrite: Rewrite::Other, step: Step::MultiplyOne },
    Rule { op: Op::Mul, slot: Slot::Either, value: 0.0, rewrite: Rewrite::Number(0.0), step: Step::MultiplyZero },
    Rule { op: Op::Div, slot: Slot::Right, value: 1.0, rewrite: Rewrite::Other, step: Step::DivideOne },
    Rule { op: Op::Div, slot: Slot::Left, value: 0.0, rewrite: Rewrite::Number(0.0), step: Step::DivideZero },
    Rule { op: Op::Pow, slot: Slot::Right, value: 1.0, rewrite: Rewrite::Other, step: Step::PowerOne },
    Rule { op: Op::Pow, slot: Slot::Right, value: 0.0, rewrite: Rewrite::Number(1.0), step: Step::PowerZero },
    Rule { op: Op::Pow, slot: Slot::Left, value: 1.0, rewrite: Rewrite::Number(1.0), step: Step::PowerOneLeft },
    Rule { op: Op::Log, slot: Slot::Right, value: 1.0, rewrite: Rewrite::Number(0.0), step: Step::LogOne },
    Rule { op: Op::Log, slot: Slot::Right, value: E, rewrite: Rewrite::Number(1.0), step: Step::LogE },
    Rule { op: Op::Exp, slot: Slot::Right, value: 0.0, rewrite: Rewrite::Number(1.0), step: Step::ExpZero },
    Rule { op: Op::Exp, slot: Slot::Right, value: 1.0, rewrite: Rewrite::Constant(E), step: Step::ExpOne },
];

/// Returns true if the node is a number or constant leaf equal to `value`.
fn is_value(tree: &Tree, id: Option<NodeId>, value: f64) -> bool {
    id.and_then(|id| tree.kind(id).value())
        .map_or(false, |v| consts::approx_eq(v, value))
}

/// Finds the first rule that applies to the operation node `id`. For identity rewrites, also
/// returns the operand that replaces the node.
fn find_rule(tree: &Tree, id: NodeId, op: Op) -> Option<(&'static Rule, Option<NodeId>)> {
    let (left, right) = (tree.left(id), tree.right(id));
    RULES.iter().filter(|rule| rule.op == op).find_map(|rule| {
        let matched = match rule.slot {
            Slot::Left => is_value(tree, left, rule.value).then_some(right),
            Slot::Right => is_value(tree, right, rule.value).then_some(left),
            Slot::Either => {
                if is_value(tree, left, rule.value) {
                    Some(right)
                } else if is_value(tree, right, rule.value) {
                    Some(left)
                } else {
                    None
                }
            },
        };
        matched.map(|other| (rule, other))
    })
}

/// Eliminates algebraic identities, visiting children before their parents.
///
/// Returns true if the tree changed.
pub fn eliminate_identities(tree: &mut Tree, step_collector: &mut dyn StepCollector<Step>) -> bool {
    // rewrites only free the visited node and its descendants, and allocate nothing, so the
    // remaining handles in the order stay valid
    let order = tree.post_order_iter().collect::<Vec<_>>();
    let mut changed = false;

    for id in order {
        let NodeKind::Operation(op) = tree.kind(id) else {
            continue;
        };
        let Some((rule, other)) = find_rule(tree, id, op) else {
            continue;
        };

        trace!(node = %tree.node_ref(id), step = ?rule.step, "eliminating identity");
        match (rule.rewrite, other) {
            (Rewrite::Other, Some(other)) => tree.replace(id, other),
            (Rewrite::Other, None) => unreachable!("identity rules only apply to binary operations"),
            (Rewrite::Number(n), _) => tree.collapse(id, NodeKind::Number(n)),
            (Rewrite::Constant(c), _) => tree.collapse(id, NodeKind::Constant(c)),
        }
        step_collector.push(rule.step);
        changed = true;
    }

    changed
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use symdiff_parser::parse;
    use super::*;

    fn eliminate(source: &str) -> (String, Vec<Step>) {
        let mut tree = parse(source).unwrap();
        let mut steps = Vec::new();
        eliminate_identities(&mut tree, &mut steps);
        (tree.to_string(), steps)
    }

    #[test]
    fn keeps_other_operand() {
        assert_eq!(eliminate("x + 0"), ("x".to_string(), vec![Step::AddZero]));
        assert_eq!(eliminate("0 + x"), ("x".to_string(), vec![Step::AddZero]));
        assert_eq!(eliminate("x - 0"), ("x".to_string(), vec![Step::SubtractZero]));
        assert_eq!(eliminate("x * 1"), ("x".to_string(), vec![Step::MultiplyOne]));
        assert_eq!(eliminate("1 * x"), ("x".to_string(), vec![Step::MultiplyOne]));
        assert_eq!(eliminate("x / 1"), ("x".to_string(), vec![Step::DivideOne]));
        assert_eq!(eliminate("x ^ 1"), ("x".to_string(), vec![Step::PowerOne]));
    }

    #[test]
    fn replaces_with_literal() {
        assert_eq!(eliminate("sin(x) * 0"), ("0".to_string(), vec![Step::MultiplyZero]));
        assert_eq!(eliminate("0 * sin(x)"), ("0".to_string(), vec![Step::MultiplyZero]));
        assert_eq!(eliminate("0 / x"), ("0".to_string(), vec![Step::DivideZero]));
        assert_eq!(eliminate("x ^ 0"), ("1".to_string(), vec![Step::PowerZero]));
        assert_eq!(eliminate("1 ^ x"), ("1".to_string(), vec![Step::PowerOneLeft]));
        assert_eq!(eliminate("log(1)"), ("0".to_string(), vec![Step::LogOne]));
        assert_eq!(eliminate("log(e)"), ("1".to_string(), vec![Step::LogE]));
        assert_eq!(eliminate("exp(0)"), ("1".to_string(), vec![Step::ExpZero]));
        assert_eq!(eliminate("exp(1)"), ("e".to_string(), vec![Step::ExpOne]));
    }

    #[test]
    fn one_sided_rules() {
        assert_eq!(eliminate("0 - x"), ("0 - x".to_string(), vec![]));
        assert_eq!(eliminate("1 / x"), ("1 / x".to_string(), vec![]));
        assert_eq!(eliminate("x / 0"), ("x / 0".to_string(), vec![]));
        assert_eq!(eliminate("0 ^ x"), ("0^x".to_string(), vec![]));
    }

    #[test]
    fn nested_rewrites_in_one_pass() {
        // the inner rewrite hands its parent a new operand, which is checked right after
        assert_eq!(
            eliminate("(x * 1 + 0) ^ 1"),
            ("x".to_string(), vec![Step::MultiplyOne, Step::AddZero, Step::PowerOne]),
        );
    }

    #[test]
    fn parent_links_survive_rewrites() {
        let mut tree = parse("sin(x + 0) * (y ^ 1)").unwrap();
        eliminate_identities(&mut tree, &mut ());
        assert_eq!(tree.to_string(), "sin(x) * y");

        for id in tree.post_order_iter() {
            for child in tree.children(id) {
                assert_eq!(tree.parent(child), Some(id));
            }
        }
    }
}
