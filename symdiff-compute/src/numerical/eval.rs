use symdiff_parser::ast::{fmt::NodeRef, NodeId, NodeKind, Tree};
use super::{ctxt::Ctxt, error::EvalError};

/// Any type that can be evaluated to produce a value.
pub trait Eval {
    /// Evaluate the expression to produce a value, using the given context to resolve variables.
    fn eval(&self, ctxt: &Ctxt) -> Result<f64, EvalError>;

    /// Evaluate the expression to produce a value, using an empty context. This fails if the
    /// expression contains any variable.
    fn eval_default(&self) -> Result<f64, EvalError> {
        self.eval(&Ctxt::default())
    }
}

fn eval_node(tree: &Tree, id: NodeId, ctxt: &Ctxt) -> Result<f64, EvalError> {
    let node = tree.node(id);
    match (node.kind, node.left(), node.right()) {
        (NodeKind::Number(n) | NodeKind::Constant(n), ..) => Ok(n),
        (NodeKind::Variable(var), ..) => ctxt
            .get_var(var)
            .ok_or(EvalError::UnresolvedVariable(var)),
        (NodeKind::Operation(op), None, Some(operand)) => {
            Ok(op.apply_unary(eval_node(tree, operand, ctxt)?))
        },
        (NodeKind::Operation(op), Some(left), Some(right)) => {
            let left = eval_node(tree, left, ctxt)?;
            let right = eval_node(tree, right, ctxt)?;
            Ok(op.apply_binary(left, right))
        },
        (NodeKind::Operation(op), ..) => unreachable!("`{}` node without its operands", op.symbol()),
    }
}

impl Eval for NodeRef<'_> {
    fn eval(&self, ctxt: &Ctxt) -> Result<f64, EvalError> {
        eval_node(self.tree, self.id, ctxt)
    }
}

impl Eval for Tree {
    fn eval(&self, ctxt: &Ctxt) -> Result<f64, EvalError> {
        match self.root() {
            Some(root) => eval_node(self, root, ctxt),
            None => Err(EvalError::EmptyExpression),
        }
    }
}

/// Eval tests depend on the parser, so ensure that parser tests pass before running these.
#[cfg(test)]
mod tests {
    use assert_float_eq::{
        afe_abs,
        afe_relative_error_msg,
        afe_is_relative_eq,
        assert_float_relative_eq,
    };
    use pretty_assertions::assert_eq;
    use symdiff_parser::parse;
    use super::*;

    #[test]
    fn binary_expr() {
        let tree = parse("1 + 2 * 3").unwrap();
        assert_eq!(tree.eval_default().unwrap(), 7.0);
    }

    #[test]
    fn parenthesized() {
        let tree = parse("((1 + 9) / 5) * 3").unwrap();
        assert_eq!(tree.eval_default().unwrap(), 6.0);
    }

    #[test]
    fn power_chain_folds_left() {
        // (2 ^ 3) ^ 2, not 2 ^ 9
        let tree = parse("2 ^ 3 ^ 2").unwrap();
        assert_eq!(tree.eval_default().unwrap(), 64.0);
    }

    #[test]
    fn constants_and_functions() {
        let tree = parse("90 * 2 * pi / 360").unwrap();
        assert_float_relative_eq!(tree.eval_default().unwrap(), std::f64::consts::FRAC_PI_2, 1e-12);

        let tree = parse("log(e) + exp(0) + cos(0) + tan(0) + sin(0)").unwrap();
        assert_float_relative_eq!(tree.eval_default().unwrap(), 3.0, 1e-12);
    }

    #[test]
    fn variables() {
        let tree = parse("x ^ 2 + y").unwrap();
        let mut ctxt = Ctxt::new();
        ctxt.add_var('x', 3.0);
        assert_eq!(tree.eval(&ctxt), Err(EvalError::UnresolvedVariable('y')));

        ctxt.add_var('y', 0.5);
        assert_eq!(tree.eval(&ctxt).unwrap(), 9.5);
    }

    #[test]
    fn unresolved_variable_is_an_error() {
        let tree = parse("2 * x").unwrap();
        assert_eq!(tree.eval_default(), Err(EvalError::UnresolvedVariable('x')));
        assert_eq!(Tree::new().eval_default(), Err(EvalError::EmptyExpression));
    }

    #[test]
    fn subtree() {
        let tree = parse("x * (3 - 1)").unwrap();
        let root = tree.root().unwrap();
        let sub = tree.right(root).unwrap();
        assert_eq!(tree.node_ref(sub).eval_default().unwrap(), 2.0);
    }
}
