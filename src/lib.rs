//! # Complete Binary Tree
//!
//! A binary tree collection that stays *complete* (every level full except
//! possibly the last, which fills left to right) across arbitrary
//! insertions and removals.
//!
//! ## Core Algorithm
//!
//! 1. **Last-added cursor**: remember the most recently created node
//! 2. **Slot derivation**: climb through right children, then descend the
//!    leftmost path to reach the next free slot (amortized O(1))
//! 3. **Hole filling**: on removal, move the last breadth-first payload into
//!    the matched node and unlink the last node, which is always a leaf
//!
//! Nodes live in an arena and link by index, so parent back-references
//! never form an ownership cycle.
//!
//! ## Usage Example
//!
//! ```
//! use complete_tree::{BinaryTree, CompleteTree};
//!
//! let mut tree: CompleteTree<u32> = (1..=7).collect();
//! assert_eq!(tree.traversal(), vec![&1, &2, &3, &4, &5, &6, &7]);
//!
//! tree.remove(&2)?;
//! assert!(!tree.search(&2));
//! assert_eq!(tree.len(), 6);
//! # Ok::<(), complete_tree::TreeError>(())
//! ```

#![warn(missing_docs, missing_debug_implementations)]

pub mod tree; // Arena nodes, traversal and the complete-tree engine

pub use tree::{BinaryTree, BreadthFirst, CompleteTree, Iter, Node, NodeArena, NodeId};

use thiserror::Error;

/// Configuration parameters for a tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeConfig {
    /// Node slots reserved up front
    pub initial_capacity: usize,

    /// Run a full consistency check after every insert and remove
    pub check_invariants: bool,
}

impl TreeConfig {
    /// Reserve room for `capacity` nodes
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    /// Enable or disable post-mutation consistency checks
    pub fn with_invariant_checks(mut self, enabled: bool) -> Self {
        self.check_invariants = enabled;
        self
    }
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 0,
            check_invariants: false,
        }
    }
}

/// Errors raised by tree operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// Absent element passed to insert or remove
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Removal attempted on an empty tree
    #[error("the tree is empty")]
    EmptyCollection,

    /// Index outside `[0, len)`
    #[error("index {index} out of range for tree of size {len}")]
    IndexOutOfRange {
        /// Requested position
        index: usize,
        /// Tree size at the time of the request
        len: usize,
    },

    /// Internal bookkeeping no longer matches the tree structure
    #[error("internal consistency fault: {0}")]
    Inconsistent(String),
}
