use crate::numerical::{error::EvalError, Eval};
use super::{derivative::derivative, simplify::simplify};
use symdiff_parser::ast::{Op, Tree};
use tracing::debug;

/// Evaluates the tree at `var = point` by substituting the point into a copy.
fn value_at(tree: &Tree, var: char, point: f64) -> Result<f64, EvalError> {
    let mut at_point = tree.clone();
    at_point.substitute(var, point);
    at_point.eval_default()
}

/// Returns the Taylor polynomial of the tree around `var = point`, up to and including the term of
/// degree `order`:
///
/// ```text
/// f(a) + f'(a) / 1! * (x - a) + ... + f⁽ⁿ⁾(a) / n! * (x - a)^n
/// ```
///
/// Each derivative is simplified before the next one is taken, and the polynomial is simplified
/// before it is returned, so terms with a zero coefficient disappear.
///
/// Fails if the tree is empty, or if it contains any variable other than `var`.
pub fn taylor(tree: &Tree, var: char, point: f64, order: u32) -> Result<Tree, EvalError> {
    let mut current = tree.clone();
    simplify(&mut current);

    let mut expansion = Tree::new();
    let mut sum = None;
    let mut factorial = 1.0;

    for k in 0..=order {
        if k > 0 {
            current = derivative(&current, var);
            simplify(&mut current);
            factorial *= k as f64;
        }

        let coefficient = value_at(&current, var, point)? / factorial;
        let term = if k == 0 {
            expansion.number(coefficient)
        } else {
            let x = expansion.variable(var);
            let a = expansion.number(point);
            let shifted = expansion.binary(Op::Sub, x, a);
            let degree = expansion.number(k as f64);
            let power = expansion.binary(Op::Pow, shifted, degree);
            let coefficient = expansion.number(coefficient);
            expansion.binary(Op::Mul, coefficient, power)
        };

        sum = Some(match sum {
            Some(sum) => expansion.binary(Op::Add, sum, term),
            None => term,
        });
    }

    if let Some(sum) = sum {
        expansion.set_root(sum);
    }
    simplify(&mut expansion);

    debug!(var = %var, point, order, input = %tree, output = %expansion, "taylor expansion");
    Ok(expansion)
}
