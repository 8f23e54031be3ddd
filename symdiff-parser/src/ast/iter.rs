use super::{NodeId, Tree};

/// An iterator that iteratively traverses a subtree in left-to-right post-order (i.e.
/// depth-first), yielding node handles.
///
/// This iterator is created by [`Tree::post_order_iter`] and [`Tree::post_order_iter_from`].
pub struct PostOrderIter<'a> {
    tree: &'a Tree,
    stack: Vec<NodeId>,
    last_visited: Option<NodeId>,
}

impl<'a> PostOrderIter<'a> {
    /// Creates a new iterator starting at the given node. If `start` is [`None`], the iterator
    /// is empty.
    pub fn new(tree: &'a Tree, start: Option<NodeId>) -> Self {
        Self {
            tree,
            stack: start.into_iter().collect(),
            last_visited: None,
        }
    }

    /// Pops the current node in the stack and marks it as the last visited node.
    fn visit(&mut self) -> Option<NodeId> {
        self.last_visited = Some(self.stack.pop()?);
        self.last_visited
    }
}

impl Iterator for PostOrderIter<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let id = *self.stack.last()?;
            let (left, right) = (self.tree.left(id), self.tree.right(id));
            // the last child is the right slot if present; unary operations only have that one
            match right.or(left) {
                None => return self.visit(),
                Some(last) if self.last_visited == Some(last) => return self.visit(),
                Some(_) => {
                    self.stack.extend(right);
                    self.stack.extend(left);
                },
            }
        }
    }
}
