use symdiff_parser::ast::{NodeId, NodeKind, Op, Tree};
use tracing::debug;

/// Builds the derivative of a source tree into a fresh destination tree.
///
/// Subtrees of the source that appear in the result are deep-copied each time they are used, so
/// no node of the result is shared and the source is never touched.
struct Builder<'a> {
    src: &'a Tree,
    dst: Tree,

    /// Whether each source node depends on the variable, indexed by [`NodeId::index`].
    depends: Vec<bool>,
}

impl Builder<'_> {
    fn depends(&self, id: NodeId) -> bool {
        self.depends[id.index()]
    }

    /// Copies a source subtree into the destination.
    fn copy(&mut self, id: NodeId) -> NodeId {
        self.dst.copy_from(self.src, id)
    }

    fn num(&mut self, value: f64) -> NodeId {
        self.dst.number(value)
    }

    fn mul(&mut self, left: NodeId, right: NodeId) -> NodeId {
        self.dst.binary(Op::Mul, left, right)
    }

    /// Returns the operands of a source operation node. The left operand is [`None`] for unary
    /// operations.
    fn operands(&self, id: NodeId) -> (Option<NodeId>, NodeId) {
        match self.src.right(id) {
            Some(right) => (self.src.left(id), right),
            None => unreachable!("operation node {:?} has no operand", id),
        }
    }

    /// Returns the left operand of a binary operation node.
    fn lhs(&self, left: Option<NodeId>) -> NodeId {
        match left {
            Some(left) => left,
            None => unreachable!("binary operation without a left operand"),
        }
    }

    /// Differentiates the source subtree rooted at `id`.
    fn derive(&mut self, id: NodeId) -> NodeId {
        if !self.depends(id) {
            return self.num(0.0);
        }

        let op = match self.src.kind(id) {
            // the only variable that passes the check above is the target
            NodeKind::Variable(_) => return self.num(1.0),
            NodeKind::Operation(op) => op,
            NodeKind::Number(_) | NodeKind::Constant(_) => unreachable!(),
        };

        let (left, right) = self.operands(id);
        match op {
            Op::Add | Op::Sub => {
                let left = self.lhs(left);
                self.sum_rule(op, left, right)
            },
            Op::Mul => {
                let left = self.lhs(left);
                self.product_rule(left, right)
            },
            Op::Div => {
                let left = self.lhs(left);
                self.quotient_rule(left, right)
            },
            Op::Pow => {
                let left = self.lhs(left);
                if self.depends(right) {
                    self.exponential_rule(left, right)
                } else {
                    self.power_rule(left, right)
                }
            },
            Op::Log => {
                // (1 / u) * u'
                let one = self.num(1.0);
                let u = self.copy(right);
                let outer = self.dst.binary(Op::Div, one, u);
                self.chain(outer, right)
            },
            Op::Exp => {
                // exp(u) * u'
                let u = self.copy(right);
                let outer = self.dst.unary(Op::Exp, u);
                self.chain(outer, right)
            },
            Op::Sin => {
                // cos(u) * u'
                let u = self.copy(right);
                let outer = self.dst.unary(Op::Cos, u);
                self.chain(outer, right)
            },
            Op::Cos => {
                // (-1 * sin(u)) * u'
                let neg = self.num(-1.0);
                let u = self.copy(right);
                let sin = self.dst.unary(Op::Sin, u);
                let outer = self.mul(neg, sin);
                self.chain(outer, right)
            },
            Op::Tan => {
                // (1 / cos(u)^2) * u'
                let one = self.num(1.0);
                let u = self.copy(right);
                let cos = self.dst.unary(Op::Cos, u);
                let two = self.num(2.0);
                let square = self.dst.binary(Op::Pow, cos, two);
                let outer = self.dst.binary(Op::Div, one, square);
                self.chain(outer, right)
            },
        }
    }

    /// `f(u)' = f'(u) * u'`, given the already built `f'(u)`.
    fn chain(&mut self, outer: NodeId, inner: NodeId) -> NodeId {
        let inner = self.derive(inner);
        self.mul(outer, inner)
    }

    /// `(f ± g)' = f' ± g'`
    fn sum_rule(&mut self, op: Op, f: NodeId, g: NodeId) -> NodeId {
        let df = self.derive(f);
        let dg = self.derive(g);
        self.dst.binary(op, df, dg)
    }

    /// `(fg)' = f'g + fg'`
    fn product_rule(&mut self, f: NodeId, g: NodeId) -> NodeId {
        let df = self.derive(f);
        let g_copy = self.copy(g);
        let left = self.mul(df, g_copy);

        let f_copy = self.copy(f);
        let dg = self.derive(g);
        let right = self.mul(f_copy, dg);

        self.dst.binary(Op::Add, left, right)
    }

    /// `(f / g)' = (f'g - fg') / g^2`
    fn quotient_rule(&mut self, f: NodeId, g: NodeId) -> NodeId {
        let df = self.derive(f);
        let g_copy = self.copy(g);
        let left = self.mul(df, g_copy);

        let f_copy = self.copy(f);
        let dg = self.derive(g);
        let right = self.mul(f_copy, dg);

        let numerator = self.dst.binary(Op::Sub, left, right);
        let g_copy = self.copy(g);
        let two = self.num(2.0);
        let denominator = self.dst.binary(Op::Pow, g_copy, two);
        self.dst.binary(Op::Div, numerator, denominator)
    }

    /// `(f^n)' = n * f^(n - 1) * f'`, where `n` does not depend on the variable.
    fn power_rule(&mut self, f: NodeId, n: NodeId) -> NodeId {
        let n_copy = self.copy(n);
        let f_copy = self.copy(f);
        let n_exp = self.copy(n);
        let one = self.num(1.0);
        let exponent = self.dst.binary(Op::Sub, n_exp, one);
        let power = self.dst.binary(Op::Pow, f_copy, exponent);
        let scaled = self.mul(n_copy, power);

        let df = self.derive(f);
        self.mul(scaled, df)
    }

    /// `(f^g)' = f^g * (g' * log(f) + g * f' / f)`
    fn exponential_rule(&mut self, f: NodeId, g: NodeId) -> NodeId {
        let f_copy = self.copy(f);
        let g_copy = self.copy(g);
        let power = self.dst.binary(Op::Pow, f_copy, g_copy);

        let dg = self.derive(g);
        let f_copy = self.copy(f);
        let log = self.dst.unary(Op::Log, f_copy);
        let left = self.mul(dg, log);

        let g_copy = self.copy(g);
        let df = self.derive(f);
        let g_df = self.mul(g_copy, df);
        let f_copy = self.copy(f);
        let right = self.dst.binary(Op::Div, g_df, f_copy);

        let sum = self.dst.binary(Op::Add, left, right);
        self.mul(power, sum)
    }
}

/// Returns the derivative of the tree with respect to `var`, as a new tree.
///
/// The result is not simplified; pass it to [`simplify`](super::simplify()) for a reduced form.
/// An empty tree differentiates to an empty tree.
pub fn derivative(tree: &Tree, var: char) -> Tree {
    let mut builder = Builder {
        src: tree,
        dst: Tree::new(),
        depends: tree.variable_flags(|v| v == var),
    };
    if let Some(root) = tree.root() {
        let root = builder.derive(root);
        builder.dst.set_root(root);
    }

    debug!(var = %var, input = %tree, output = %builder.dst, "differentiated");
    builder.dst
}
