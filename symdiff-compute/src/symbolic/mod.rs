//! Symbolic manipulation of expression trees.
//!
//! [`derivative()`] builds the derivative of a tree as a new, unsimplified tree, applying the
//! textbook rules node by node. [`simplify()`] then reduces a tree in place by folding constant
//! subexpressions and eliminating algebraic identities until nothing changes.
//!
//! ```
//! use symdiff_compute::symbolic::{derivative, simplify};
//! use symdiff_parser::parse;
//!
//! let tree = parse("x ^ 2").unwrap();
//! let mut deriv = derivative(&tree, 'x');
//! assert_eq!(deriv.to_string(), "2 * x^(2 - 1) * 1");
//!
//! simplify(&mut deriv);
//! assert_eq!(deriv.to_string(), "2 * x");
//! ```

pub mod derivative;
pub mod simplify;
pub mod step_collector;
pub mod taylor;

pub use derivative::derivative;
pub use simplify::{simplify, simplify_with, simplify_with_steps};
pub use step_collector::StepCollector;
pub use taylor::taylor;

/// Generators of random trees for property tests.
#[cfg(test)]
pub(crate) mod strategy {
    use proptest::prelude::*;
    use symdiff_parser::ast::{NodeId, NodeKind, Op, Tree};

    /// The shape of a tree, generated by proptest and then built into a [`Tree`].
    #[derive(Debug, Clone)]
    pub enum Shape {
        Leaf(NodeKind),
        Unary(Op, Box<Shape>),
        Binary(Op, Box<Shape>, Box<Shape>),
    }

    impl Shape {
        fn build_node(&self, tree: &mut Tree) -> NodeId {
            match self {
                Shape::Leaf(kind) => tree.alloc(*kind, None, None),
                Shape::Unary(op, operand) => {
                    let operand = operand.build_node(tree);
                    tree.unary(*op, operand)
                },
                Shape::Binary(op, left, right) => {
                    let left = left.build_node(tree);
                    let right = right.build_node(tree);
                    tree.binary(*op, left, right)
                },
            }
        }

        /// Builds the tree this shape describes.
        pub fn build(&self) -> Tree {
            let mut tree = Tree::new();
            let root = self.build_node(&mut tree);
            tree.set_root(root);
            tree
        }
    }

    /// Trees over small integers, the constants, and `x`, using operations that stay finite for
    /// every input.
    pub fn tame_tree() -> impl Strategy<Value = Shape> {
        let leaf = prop_oneof![
            3 => (-3i32..=3).prop_map(|n| Shape::Leaf(NodeKind::Number(n as f64))),
            1 => prop::sample::select(vec![std::f64::consts::E, std::f64::consts::PI])
                .prop_map(|c| Shape::Leaf(NodeKind::Constant(c))),
            3 => Just(Shape::Leaf(NodeKind::Variable('x'))),
        ];
        leaf.prop_recursive(3, 24, 2, |inner| {
            prop_oneof![
                (prop::sample::select(vec![Op::Sin, Op::Cos]), inner.clone())
                    .prop_map(|(op, operand)| Shape::Unary(op, Box::new(operand))),
                (prop::sample::select(vec![Op::Add, Op::Sub, Op::Mul]), inner.clone(), inner)
                    .prop_map(|(op, left, right)| Shape::Binary(op, Box::new(left), Box::new(right))),
            ]
        })
    }

    /// Trees over every operation whose leaves are non-negative, with `x` meant to be bound to a
    /// positive value. The leaves include 0, 1 and `e` so that every identity rule can fire.
    pub fn positive_tree() -> impl Strategy<Value = Shape> {
        let leaf = prop_oneof![
            3 => prop::sample::select(vec![0.0, 0.5, 1.0, 2.0])
                .prop_map(|n| Shape::Leaf(NodeKind::Number(n))),
            1 => Just(Shape::Leaf(NodeKind::Constant(std::f64::consts::E))),
            3 => Just(Shape::Leaf(NodeKind::Variable('x'))),
        ];
        leaf.prop_recursive(3, 24, 2, |inner| {
            prop_oneof![
                (prop::sample::select(Op::FUNCTIONS.to_vec()), inner.clone())
                    .prop_map(|(op, operand)| Shape::Unary(op, Box::new(operand))),
                (
                    prop::sample::select(vec![Op::Add, Op::Mul, Op::Div, Op::Pow]),
                    inner.clone(),
                    inner,
                )
                    .prop_map(|(op, left, right)| Shape::Binary(op, Box::new(left), Box::new(right))),
            ]
        })
    }

    /// Trees that never mention `x`, over every operation.
    pub fn free_of_x() -> impl Strategy<Value = Shape> {
        let leaf = prop_oneof![
            (-4i32..=4).prop_map(|n| Shape::Leaf(NodeKind::Number(n as f64 / 2.0))),
            prop::sample::select(vec![std::f64::consts::E, std::f64::consts::PI])
                .prop_map(|c| Shape::Leaf(NodeKind::Constant(c))),
            Just(Shape::Leaf(NodeKind::Variable('y'))),
        ];
        leaf.prop_recursive(3, 24, 2, |inner| {
            prop_oneof![
                (prop::sample::select(Op::FUNCTIONS.to_vec()), inner.clone())
                    .prop_map(|(op, operand)| Shape::Unary(op, Box::new(operand))),
                (
                    prop::sample::select(vec![Op::Add, Op::Sub, Op::Mul, Op::Div, Op::Pow]),
                    inner.clone(),
                    inner,
                )
                    .prop_map(|(op, left, right)| Shape::Binary(op, Box::new(left), Box::new(right))),
            ]
        })
    }
}
