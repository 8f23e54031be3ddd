//! The expression tree.
//!
//! A [`Tree`] is an arena: it owns every [`Node`] and hands out [`NodeId`] handles to them. Each
//! node records its parent and its two child slots, which lets the simplifier splice subtrees in
//! place. All structural mutation goes through [`Tree::alloc`], [`Tree::replace`] and
//! [`Tree::collapse`], which keep the parent links consistent with the child links.

pub mod fmt;
pub mod iter;
pub mod op;

use crate::consts;
use iter::PostOrderIter;

pub use op::{Op, Precedence};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A handle to a node stored in a [`Tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NodeId(usize);

impl NodeId {
    /// Returns the index of the node's slot in the arena.
    pub fn index(self) -> usize {
        self.0
    }
}

/// The payload of a node.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum NodeKind {
    /// A literal number.
    Number(f64),

    /// One of the named constants, such as `e` or `pi`. See [`consts::CONSTANTS`].
    Constant(f64),

    /// A single-letter free variable.
    Variable(char),

    /// An internal node applying an operation to its children.
    Operation(Op),
}

impl NodeKind {
    /// Returns true if nodes of this kind have no children.
    pub fn is_leaf(&self) -> bool {
        !matches!(self, NodeKind::Operation(_))
    }

    /// Returns the numeric payload of a [`NodeKind::Number`] or [`NodeKind::Constant`].
    pub fn value(&self) -> Option<f64> {
        match self {
            NodeKind::Number(n) | NodeKind::Constant(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the operation of a [`NodeKind::Operation`].
    pub fn op(&self) -> Option<Op> {
        match self {
            NodeKind::Operation(op) => Some(*op),
            _ => None,
        }
    }

    /// Compares two payloads. Numeric payloads are compared with [`consts::EPSILON`] tolerance,
    /// variables and operations exactly.
    pub fn approx_eq(&self, other: &NodeKind) -> bool {
        match (self, other) {
            (NodeKind::Number(a), NodeKind::Number(b))
                | (NodeKind::Constant(a), NodeKind::Constant(b)) => consts::approx_eq(*a, *b),
            (NodeKind::Variable(a), NodeKind::Variable(b)) => a == b,
            (NodeKind::Operation(a), NodeKind::Operation(b)) => a == b,
            _ => false,
        }
    }
}

/// A single node of a [`Tree`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Node {
    /// The payload of the node.
    pub kind: NodeKind,

    parent: Option<NodeId>,
    left: Option<NodeId>,
    right: Option<NodeId>,
}

impl Node {
    /// The node this node is a child of, or [`None`] for a root or detached node.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// The left child. Always [`None`] for leaves and unary operations.
    pub fn left(&self) -> Option<NodeId> {
        self.left
    }

    /// The right child. This is the operand of a unary operation.
    pub fn right(&self) -> Option<NodeId> {
        self.right
    }
}

/// The value returned by a traversal callback to steer the traversal.
#[derive(Debug, Clone, PartialEq)]
pub enum Flow<E> {
    /// Keep visiting nodes.
    Continue,

    /// Stop the traversal without an error.
    Stop,

    /// Stop the traversal and report an error.
    Error(E),
}

impl<E> Flow<E> {
    /// Converts the final state of a traversal into a [`Result`]. Both [`Flow::Continue`] and
    /// [`Flow::Stop`] are successful.
    pub fn into_result(self) -> Result<(), E> {
        match self {
            Flow::Continue | Flow::Stop => Ok(()),
            Flow::Error(err) => Err(err),
        }
    }
}

/// An expression tree.
///
/// Removed nodes leave an empty slot behind, which is reused by the next allocation. A tree with
/// no root is empty; that is the state of [`Tree::new`].
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Tree {
    nodes: Vec<Option<Node>>,
    free: Vec<NodeId>,
    root: Option<NodeId>,
}

impl Tree {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the tree has no root.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Returns the number of live nodes in the arena, including detached ones.
    pub fn len(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    /// Returns the root node.
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Makes the given detached node the root of the tree. The previous root, if any, is removed
    /// along with its subtree.
    pub fn set_root(&mut self, id: NodeId) {
        assert!(self.node(id).parent.is_none(), "the new root {:?} still has a parent", id);
        if let Some(old) = self.root.replace(id) {
            if old != id {
                self.free_subtree(old);
            }
        }
    }

    /// Returns the node with the given handle.
    ///
    /// Panics if the handle does not refer to a live node.
    pub fn node(&self, id: NodeId) -> &Node {
        match self.nodes.get(id.0) {
            Some(Some(node)) => node,
            _ => panic!("dangling node handle {:?}", id),
        }
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        match self.nodes.get_mut(id.0) {
            Some(Some(node)) => node,
            _ => panic!("dangling node handle {:?}", id),
        }
    }

    /// Returns the payload of the given node.
    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.node(id).kind
    }

    /// Returns the parent of the given node.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    /// Returns the left child of the given node.
    pub fn left(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).left
    }

    /// Returns the right child of the given node.
    pub fn right(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).right
    }

    /// Returns the children of the given node, left to right, skipping empty slots.
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> {
        let node = self.node(id);
        node.left.into_iter().chain(node.right)
    }

    /// Allocates a new, detached node with the given payload and children, and makes it the
    /// parent of those children.
    ///
    /// Leaves take no children, unary operations take only a right child, and binary operations
    /// take both. The children must be detached.
    pub fn alloc(&mut self, kind: NodeKind, left: Option<NodeId>, right: Option<NodeId>) -> NodeId {
        match kind {
            NodeKind::Operation(op) if op.is_unary() => assert!(
                left.is_none() && right.is_some(),
                "unary `{}` takes exactly one operand in the right slot",
                op.symbol(),
            ),
            NodeKind::Operation(op) => assert!(
                left.is_some() && right.is_some(),
                "binary `{}` takes exactly two operands",
                op.symbol(),
            ),
            _ => assert!(left.is_none() && right.is_none(), "leaf nodes take no children"),
        }

        let node = Node { kind, parent: None, left, right };
        let id = match self.free.pop() {
            Some(id) => {
                self.nodes[id.0] = Some(node);
                id
            },
            None => {
                self.nodes.push(Some(node));
                NodeId(self.nodes.len() - 1)
            },
        };

        for child in left.into_iter().chain(right) {
            assert!(self.root != Some(child), "the root cannot become a child");
            let child = self.node_mut(child);
            assert!(child.parent.is_none(), "child node is already attached to a parent");
            child.parent = Some(id);
        }

        id
    }

    /// Allocates a number leaf.
    pub fn number(&mut self, value: f64) -> NodeId {
        self.alloc(NodeKind::Number(value), None, None)
    }

    /// Allocates a named constant leaf.
    pub fn constant(&mut self, value: f64) -> NodeId {
        self.alloc(NodeKind::Constant(value), None, None)
    }

    /// Allocates a variable leaf.
    pub fn variable(&mut self, var: char) -> NodeId {
        self.alloc(NodeKind::Variable(var), None, None)
    }

    /// Allocates a unary operation applied to `operand`.
    pub fn unary(&mut self, op: Op, operand: NodeId) -> NodeId {
        self.alloc(NodeKind::Operation(op), None, Some(operand))
    }

    /// Allocates a binary operation applied to `left` and `right`.
    pub fn binary(&mut self, op: Op, left: NodeId, right: NodeId) -> NodeId {
        self.alloc(NodeKind::Operation(op), Some(left), Some(right))
    }

    /// Deep-copies the subtree of `src` rooted at `id` into this tree. The copy is detached.
    pub fn copy_from(&mut self, src: &Tree, id: NodeId) -> NodeId {
        let node = src.node(id);
        let left = node.left.map(|left| self.copy_from(src, left));
        let right = node.right.map(|right| self.copy_from(src, right));
        self.alloc(node.kind, left, right)
    }

    /// Deep-copies the subtree rooted at `id` within this tree. The copy is detached.
    pub fn duplicate(&mut self, id: NodeId) -> NodeId {
        let Node { kind, left, right, .. } = self.node(id).clone();
        let left = left.map(|left| self.duplicate(left));
        let right = right.map(|right| self.duplicate(right));
        self.alloc(kind, left, right)
    }

    /// Returns a new tree containing a copy of the subtree rooted at `id`.
    pub fn subtree(&self, id: NodeId) -> Tree {
        let mut tree = Tree::new();
        let root = tree.copy_from(self, id);
        tree.set_root(root);
        tree
    }

    /// Frees every node of the subtree rooted at `id`, children before parents. The slot in the
    /// parent, if any, is left dangling for the caller to fill.
    fn free_subtree(&mut self, id: NodeId) {
        let ids = self.post_order_iter_from(id).collect::<Vec<_>>();
        for id in ids {
            self.nodes[id.0] = None;
            self.free.push(id);
        }
        if self.root == Some(id) {
            self.root = None;
        }
    }

    /// Detaches `id` from its parent, clearing the parent's slot.
    fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.node_mut(id).parent.take() {
            let parent = self.node_mut(parent);
            if parent.left == Some(id) {
                parent.left = None;
            } else if parent.right == Some(id) {
                parent.right = None;
            }
        }
    }

    /// Returns true if `ancestor` is `id` or one of its ancestors.
    fn is_ancestor(&self, ancestor: NodeId, mut id: NodeId) -> bool {
        loop {
            if id == ancestor {
                return true;
            }
            match self.node(id).parent {
                Some(parent) => id = parent,
                None => return false,
            }
        }
    }

    /// Replaces the subtree rooted at `target` with the subtree rooted at `replacement`.
    ///
    /// `replacement` may be a detached node or a node inside the target's subtree (such as one of
    /// its operands). It is unlinked from wherever it was, every other node of the target's
    /// subtree is freed, and `replacement` takes the target's place in its parent, or becomes the
    /// root if the target was the root.
    pub fn replace(&mut self, target: NodeId, replacement: NodeId) {
        if target == replacement {
            return;
        }
        assert!(
            !self.is_ancestor(replacement, target),
            "cannot replace a node with one of its ancestors",
        );

        let parent = self.node(target).parent;
        let was_root = self.root == Some(target);
        let in_left = parent.map_or(false, |parent| self.node(parent).left == Some(target));

        self.detach(replacement);
        self.free_subtree(target);

        match parent {
            Some(parent) => {
                let slot = self.node_mut(parent);
                if in_left {
                    slot.left = Some(replacement);
                } else {
                    slot.right = Some(replacement);
                }
                self.node_mut(replacement).parent = Some(parent);
            },
            None if was_root => self.root = Some(replacement),
            None => {},
        }
    }

    /// Turns the given node into a leaf with the given payload, freeing its children.
    pub fn collapse(&mut self, id: NodeId, kind: NodeKind) {
        assert!(kind.is_leaf(), "a node can only be collapsed into a leaf");
        let node = self.node_mut(id);
        let children = [node.left.take(), node.right.take()];
        node.kind = kind;
        for child in children.into_iter().flatten() {
            self.node_mut(child).parent = None;
            self.free_subtree(child);
        }
    }

    /// Compares the subtree of this tree rooted at `id` with the subtree of `other` rooted at
    /// `other_id`. See [`NodeKind::approx_eq`] for how payloads are compared.
    pub fn subtree_eq(&self, id: NodeId, other: &Tree, other_id: NodeId) -> bool {
        let a = self.node(id);
        let b = other.node(other_id);
        let slot_eq = |x: Option<NodeId>, y: Option<NodeId>| match (x, y) {
            (Some(x), Some(y)) => self.subtree_eq(x, other, y),
            (None, None) => true,
            _ => false,
        };

        a.kind.approx_eq(&b.kind) && slot_eq(a.left, b.left) && slot_eq(a.right, b.right)
    }

    /// Returns true if any variable leaf under `id` is `var`.
    pub fn has_variable(&self, id: NodeId, var: char) -> bool {
        self.post_order_iter_from(id)
            .any(|id| self.node(id).kind == NodeKind::Variable(var))
    }

    /// Marks, in one post-order sweep, every node of the tree that has a matching variable leaf in
    /// its subtree.
    ///
    /// The result is indexed by [`NodeId::index`]. Slots of detached or freed nodes are false.
    pub fn variable_flags(&self, mut matches: impl FnMut(char) -> bool) -> Vec<bool> {
        let mut flags = vec![false; self.nodes.len()];
        for id in self.post_order_iter() {
            let node = self.node(id);
            let flag = match node.kind {
                NodeKind::Variable(var) => matches(var),
                _ => node.left.into_iter().chain(node.right).any(|child| flags[child.0]),
            };
            flags[id.0] = flag;
        }
        flags
    }

    /// Replaces every `var` leaf in the tree with a number leaf holding `value`.
    pub fn substitute(&mut self, var: char, value: f64) {
        let targets = self
            .post_order_iter()
            .filter(|&id| self.node(id).kind == NodeKind::Variable(var))
            .collect::<Vec<_>>();
        for id in targets {
            self.node_mut(id).kind = NodeKind::Number(value);
        }
    }

    /// Returns an iterator over the tree's nodes in left-to-right post-order.
    pub fn post_order_iter(&self) -> PostOrderIter<'_> {
        PostOrderIter::new(self, self.root)
    }

    /// Returns an iterator over the nodes of the subtree rooted at `id` in left-to-right
    /// post-order.
    pub fn post_order_iter_from(&self, id: NodeId) -> PostOrderIter<'_> {
        PostOrderIter::new(self, Some(id))
    }

    /// Visits every node, parents before children.
    pub fn pre_order<E>(&self, mut f: impl FnMut(NodeId, &Node) -> Flow<E>) -> Flow<E> {
        match self.root {
            Some(root) => self.walk(root, Order::Pre, &mut f),
            None => Flow::Continue,
        }
    }

    /// Visits every node, left subtree, then the node, then right subtree.
    pub fn in_order<E>(&self, mut f: impl FnMut(NodeId, &Node) -> Flow<E>) -> Flow<E> {
        match self.root {
            Some(root) => self.walk(root, Order::In, &mut f),
            None => Flow::Continue,
        }
    }

    /// Visits every node, children before parents.
    pub fn post_order<E>(&self, mut f: impl FnMut(NodeId, &Node) -> Flow<E>) -> Flow<E> {
        match self.root {
            Some(root) => self.walk(root, Order::Post, &mut f),
            None => Flow::Continue,
        }
    }

    fn walk<E>(
        &self,
        id: NodeId,
        order: Order,
        f: &mut impl FnMut(NodeId, &Node) -> Flow<E>,
    ) -> Flow<E> {
        macro_rules! visit {
            ($flow:expr) => {
                match $flow {
                    Flow::Continue => {},
                    other => return other,
                }
            };
        }

        let node = self.node(id);
        if order == Order::Pre {
            visit!(f(id, node));
        }
        if let Some(left) = node.left {
            visit!(self.walk(left, order, f));
        }
        if order == Order::In {
            visit!(f(id, node));
        }
        if let Some(right) = node.right {
            visit!(self.walk(right, order, f));
        }
        if order == Order::Post {
            visit!(f(id, node));
        }
        Flow::Continue
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Order {
    Pre,
    In,
    Post,
}

/// Two trees are equal if both are empty, or their roots are equal by [`Tree::subtree_eq`].
impl PartialEq for Tree {
    fn eq(&self, other: &Self) -> bool {
        match (self.root, other.root) {
            (Some(a), Some(b)) => self.subtree_eq(a, other, b),
            (None, None) => true,
            _ => false,
        }
    }
}
