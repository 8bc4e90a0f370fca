//! Breadth-first traversal
//!
//! One FIFO-driven walk feeds every ordered view of the tree: element
//! materialization, indexed access, removal scans and cursor recovery.
//! Keeping a single routine means those orders cannot drift apart.

use std::collections::VecDeque;
use std::iter::FusedIterator;

use super::node::{NodeArena, NodeId};

/// Level-by-level, left-to-right walk over node ids
///
/// Lazy: each `next` dequeues one node and enqueues its children.
#[derive(Debug)]
pub struct BreadthFirst<'a, T> {
    arena: &'a NodeArena<T>,
    queue: VecDeque<NodeId>,
}

impl<'a, T> BreadthFirst<'a, T> {
    /// Start a walk at `root` (an empty walk when `None`)
    pub fn new(arena: &'a NodeArena<T>, root: Option<NodeId>) -> Self {
        let mut queue = VecDeque::new();
        queue.extend(root);
        Self { arena, queue }
    }

    /// Pair each id with its depth (root depth 0)
    pub fn with_depth(arena: &'a NodeArena<T>, root: Option<NodeId>) -> LeveledBreadthFirst<'a, T> {
        let mut queue = VecDeque::new();
        queue.extend(root.map(|id| (id, 0)));
        LeveledBreadthFirst { arena, queue }
    }
}

impl<'a, T> Iterator for BreadthFirst<'a, T> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.queue.pop_front()?;
        let node = &self.arena[id];
        self.queue.extend(node.left());
        self.queue.extend(node.right());
        Some(id)
    }
}

impl<T> FusedIterator for BreadthFirst<'_, T> {}

/// Breadth-first walk yielding `(id, depth)` pairs
#[derive(Debug)]
pub struct LeveledBreadthFirst<'a, T> {
    arena: &'a NodeArena<T>,
    queue: VecDeque<(NodeId, usize)>,
}

impl<'a, T> Iterator for LeveledBreadthFirst<'a, T> {
    type Item = (NodeId, usize);

    fn next(&mut self) -> Option<(NodeId, usize)> {
        let (id, depth) = self.queue.pop_front()?;
        let node = &self.arena[id];
        self.queue.extend(node.left().map(|child| (child, depth + 1)));
        self.queue.extend(node.right().map(|child| (child, depth + 1)));
        Some((id, depth))
    }
}

impl<T> FusedIterator for LeveledBreadthFirst<'_, T> {}

/// Snapshot iterator over a materialized traversal
///
/// The element sequence is fixed when the iterator is built; the borrow
/// on the tree keeps it from being mutated mid-iteration.
#[derive(Debug, Clone)]
pub struct Iter<'a, T> {
    inner: std::vec::IntoIter<&'a T>,
}

impl<'a, T> Iter<'a, T> {
    /// Wrap an already materialized traversal
    pub fn new(snapshot: Vec<&'a T>) -> Self {
        Self {
            inner: snapshot.into_iter(),
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<&'a T> {
        self.inner.next()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}
