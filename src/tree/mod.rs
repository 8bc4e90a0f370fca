//! Binary tree collections
//!
//! [`BinaryTree`] is the shape-independent collection contract;
//! [`CompleteTree`] keeps every level full except the last, which fills
//! left to right.
//!
//! Nodes live in a [`NodeArena`] and link to each other by [`NodeId`],
//! so parent back-references never own anything.

mod complete;
mod node;
mod traversal;

pub use complete::CompleteTree;
pub use node::{Node, NodeArena, NodeId};
pub use traversal::{BreadthFirst, Iter, LeveledBreadthFirst};

use crate::TreeError;

/// Collection contract shared by binary tree shapes
///
/// Implementors supply the shape-maintaining operations; sizing, indexed
/// access and iteration are derived from [`BinaryTree::len`] and the
/// canonical [`BinaryTree::traversal`].
pub trait BinaryTree<T: PartialEq> {
    /// Number of vertices
    fn len(&self) -> usize;

    /// Presence check by payload equality
    fn search(&self, element: &T) -> bool;

    /// Add an element while preserving the tree's shape invariant
    fn insert(&mut self, element: T) -> Result<(), TreeError>;

    /// Remove one element equal to `element`
    ///
    /// Returns the removed payload, or `Ok(None)` when nothing matched.
    /// Fails with [`TreeError::EmptyCollection`] on an empty tree.
    fn remove(&mut self, element: &T) -> Result<Option<T>, TreeError>;

    /// Every element exactly once, in canonical order
    fn traversal(&self) -> Vec<&T>;

    /// Whether the tree holds no vertices
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Element at zero-based `index` of the canonical order
    fn element_at(&self, index: usize) -> Result<&T, TreeError> {
        let len = self.len();
        if index >= len {
            return Err(TreeError::IndexOutOfRange { index, len });
        }
        self.traversal()
            .get(index)
            .copied()
            .ok_or_else(|| TreeError::Inconsistent(format!("traversal shorter than size {}", len)))
    }

    /// Fresh snapshot iterator in canonical order
    fn iter(&self) -> Iter<'_, T> {
        Iter::new(self.traversal())
    }

    /// [`BinaryTree::insert`] for callers holding a possibly absent element
    fn insert_nullable(&mut self, element: Option<T>) -> Result<(), TreeError> {
        let element =
            element.ok_or_else(|| TreeError::InvalidArgument("element to insert is absent".into()))?;
        self.insert(element)
    }

    /// [`BinaryTree::remove`] for callers holding a possibly absent element
    fn remove_nullable(&mut self, element: Option<&T>) -> Result<Option<T>, TreeError> {
        let element =
            element.ok_or_else(|| TreeError::InvalidArgument("element to remove is absent".into()))?;
        self.remove(element)
    }
}
