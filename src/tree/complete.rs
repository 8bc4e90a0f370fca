//! Complete binary tree engine
//!
//! Insertion never scans the tree: the engine remembers the node it
//! created last and derives the next free slot from it by walking up
//! through right children and back down the leftmost path. That walk
//! is bounded by the height and amortizes to O(1) over a run of inserts.
//!
//! Removal moves the payload of the last breadth-first node into the
//! matched node and unlinks that last node, which is always a leaf.

use std::collections::VecDeque;
use std::fmt;
use std::mem;

use bitvec::prelude::*;
use tracing::{debug, trace, warn};

use super::node::{Node, NodeArena, NodeId};
use super::traversal::{BreadthFirst, Iter};
use super::BinaryTree;
use crate::{TreeConfig, TreeError};

/// Where the next inserted node goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Root,
    Left(NodeId),
    Right(NodeId),
}

/// Binary tree kept complete across insertions and removals
///
/// Every level is full except possibly the last, which fills left to
/// right. Canonical order is breadth-first, and a tree built by
/// inserting `1..=n` in order has the array-heap layout.
#[derive(Clone)]
pub struct CompleteTree<T> {
    arena: NodeArena<T>,
    root: Option<NodeId>,
    size: usize,

    /// Node created by the latest insertion (or last in breadth-first
    /// order after a removal)
    last_added: Option<NodeId>,

    config: TreeConfig,
}

impl<T> CompleteTree<T> {
    /// Create an empty tree with default configuration
    pub fn new() -> Self {
        Self::with_config(TreeConfig::default())
    }

    /// Create an empty tree with explicit configuration
    pub fn with_config(config: TreeConfig) -> Self {
        Self {
            arena: NodeArena::with_capacity(config.initial_capacity),
            root: None,
            size: 0,
            last_added: None,
            config,
        }
    }

    /// Active configuration
    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    /// Number of levels (0 when empty)
    pub fn height(&self) -> usize {
        // A complete tree of n nodes has floor(log2 n) + 1 levels
        (usize::BITS - self.size.leading_zeros()) as usize
    }

    /// Root element
    pub fn root(&self) -> Option<&T> {
        self.root.map(|id| &self.arena[id].element)
    }

    /// Element held by the last-added cursor
    pub fn last_added(&self) -> Option<&T> {
        self.last_added.map(|id| &self.arena[id].element)
    }

    /// Node by id, for shape inspection
    pub fn node(&self, id: NodeId) -> Option<&Node<T>> {
        self.arena.get(id)
    }

    /// Id of the root node
    pub fn root_id(&self) -> Option<NodeId> {
        self.root
    }

    /// Breadth-first walk over node ids
    pub fn breadth_first(&self) -> BreadthFirst<'_, T> {
        BreadthFirst::new(&self.arena, self.root)
    }

    /// Elements grouped by depth, each level left to right
    pub fn levels(&self) -> Vec<Vec<&T>> {
        let mut levels: Vec<Vec<&T>> = Vec::with_capacity(self.height());
        for (id, depth) in BreadthFirst::with_depth(&self.arena, self.root) {
            if depth == levels.len() {
                levels.push(Vec::new());
            }
            levels[depth].push(&self.arena[id].element);
        }
        levels
    }

    /// Drop every node
    pub fn clear(&mut self) {
        self.arena.clear();
        self.root = None;
        self.size = 0;
        self.last_added = None;
        debug!("tree cleared");
    }

    /// Check every structural invariant
    ///
    /// Verifies root/size agreement, parent back-references, that the
    /// reachable nodes occupy exactly heap slots `0..len`, that no node
    /// leaked in the arena, and that the cursor sits on the last node in
    /// breadth-first order.
    pub fn validate(&self) -> Result<(), TreeError> {
        let root = match (self.root, self.size) {
            (None, 0) => {
                if self.last_added.is_some() {
                    return Err(inconsistent("empty tree with a last-added cursor"));
                }
                if !self.arena.is_empty() {
                    return Err(inconsistent(format!(
                        "empty tree holds {} arena nodes",
                        self.arena.len()
                    )));
                }
                return Ok(());
            }
            (None, size) => return Err(inconsistent(format!("size {} without a root", size))),
            (Some(_), 0) => return Err(inconsistent("root present with size 0")),
            (Some(root), _) => root,
        };

        let root_node = self
            .arena
            .get(root)
            .ok_or_else(|| inconsistent(format!("root {} is not a live node", root)))?;
        if root_node.parent().is_some() {
            return Err(inconsistent("root has a parent"));
        }

        // Heap numbering: root 0, left 2p+1, right 2p+2
        let mut occupied = bitvec![0; self.size];
        let mut queue = VecDeque::from([(root, 0usize)]);
        let mut visited = 0usize;
        let mut last = root;

        while let Some((id, slot)) = queue.pop_front() {
            visited += 1;
            if visited > self.size {
                return Err(inconsistent(format!(
                    "more reachable nodes than size {}",
                    self.size
                )));
            }
            if slot >= self.size {
                return Err(inconsistent(format!(
                    "node {} sits in heap slot {} beyond size {}",
                    id, slot, self.size
                )));
            }
            if occupied.replace(slot, true) {
                return Err(inconsistent(format!("heap slot {} reached twice", slot)));
            }

            let node = self
                .arena
                .get(id)
                .ok_or_else(|| inconsistent(format!("link to vacant node {}", id)))?;
            for (child, offset) in [(node.left(), 1), (node.right(), 2)] {
                if let Some(child) = child {
                    let parent = self.arena.get(child).and_then(Node::parent);
                    if parent != Some(id) {
                        return Err(inconsistent(format!(
                            "node {} does not point back to parent {}",
                            child, id
                        )));
                    }
                    queue.push_back((child, 2 * slot + offset));
                }
            }
            last = id;
        }

        if visited != self.size {
            return Err(inconsistent(format!(
                "reached {} nodes but size is {}",
                visited, self.size
            )));
        }
        if self.arena.len() != self.size {
            return Err(inconsistent(format!(
                "arena holds {} nodes but size is {}",
                self.arena.len(),
                self.size
            )));
        }
        if self.last_added != Some(last) {
            return Err(inconsistent("last-added cursor is not the last breadth-first node"));
        }
        Ok(())
    }

    fn elements(&self) -> impl Iterator<Item = &T> + '_ {
        self.breadth_first().map(move |id| &self.arena[id].element)
    }

    fn is_root(&self, id: NodeId) -> bool {
        self.root == Some(id)
    }

    /// Locate the next free slot from the last-added cursor
    fn next_slot(&self) -> Result<Slot, TreeError> {
        let cursor = match (self.root, self.last_added) {
            (None, _) => return Ok(Slot::Root),
            (Some(_), None) => return Err(inconsistent("non-empty tree without a cursor")),
            (Some(_), Some(cursor)) => cursor,
        };

        if self.arena.is_left_child(cursor) {
            let parent = self
                .arena[cursor]
                .parent()
                .ok_or_else(|| inconsistent("left child without a parent"))?;
            if self.arena[parent].right().is_some() {
                return Err(inconsistent(format!(
                    "cursor {} has an occupied right sibling",
                    cursor
                )));
            }
            return Ok(Slot::Right(parent));
        }

        let mut current = cursor;
        while self.arena.is_right_child(current) {
            current = self
                .arena[current]
                .parent()
                .ok_or_else(|| inconsistent("right child without a parent"))?;
        }

        // Level full: open the next level under the root. Otherwise the
        // slot is in the right subtree next to the ancestor we stopped at.
        let mut from = if self.is_root(current) {
            current
        } else {
            let parent = self.arena[current]
                .parent()
                .ok_or_else(|| inconsistent(format!("node {} is detached from the tree", current)))?;
            self.arena[parent]
                .right()
                .ok_or_else(|| inconsistent(format!("node {} lacks a right subtree", parent)))?
        };

        while let Some(left) = self.arena[from].left() {
            from = left;
        }
        Ok(Slot::Left(from))
    }

    fn last_in_breadth_first(&self) -> Option<NodeId> {
        self.breadth_first().last()
    }

    fn check_after_mutation(&self) -> Result<(), TreeError> {
        if !self.config.check_invariants {
            return Ok(());
        }
        if let Err(err) = self.validate() {
            warn!(%err, size = self.size, "tree failed invariant check");
            return Err(err);
        }
        Ok(())
    }
}

impl<T: PartialEq> CompleteTree<T> {
    fn search_from(&self, node: Option<NodeId>, element: &T) -> bool {
        match node {
            None => false,
            Some(id) => {
                let node = &self.arena[id];
                node.element == *element
                    || self.search_from(node.left(), element)
                    || self.search_from(node.right(), element)
            }
        }
    }
}

impl<T: PartialEq> BinaryTree<T> for CompleteTree<T> {
    fn len(&self) -> usize {
        debug_assert_eq!(
            self.size == 0,
            self.root.is_none(),
            "root and size disagree"
        );
        self.size
    }

    fn search(&self, element: &T) -> bool {
        self.search_from(self.root, element)
    }

    fn insert(&mut self, element: T) -> Result<(), TreeError> {
        // Resolve the slot first so a fault leaves the tree untouched
        let slot = self.next_slot()?;
        let id = self.arena.alloc(element);

        match slot {
            Slot::Root => {
                self.root = Some(id);
                trace!(node = %id, "inserted root");
            }
            Slot::Left(parent) => {
                self.arena.attach_left(parent, Some(id));
                trace!(node = %id, parent = %parent, "inserted as left child");
            }
            Slot::Right(parent) => {
                self.arena.attach_right(parent, Some(id));
                trace!(node = %id, parent = %parent, "inserted as right child");
            }
        }

        self.last_added = Some(id);
        self.size += 1;
        self.check_after_mutation()
    }

    /// Removes the first breadth-first match; duplicates further along
    /// the order are left in place.
    fn remove(&mut self, element: &T) -> Result<Option<T>, TreeError> {
        if self.is_empty() {
            return Err(TreeError::EmptyCollection);
        }

        let mut target = None;
        let mut last = None;
        for id in self.breadth_first() {
            if target.is_none() && self.arena[id].element == *element {
                target = Some(id);
            }
            last = Some(id);
        }

        let (target, last) = match (target, last) {
            (Some(target), Some(last)) => (target, last),
            _ => {
                debug!(size = self.size, "no matching element; nothing removed");
                return Ok(None);
            }
        };

        if !self.arena[last].is_leaf() {
            return Err(inconsistent(format!(
                "last breadth-first node {} has children",
                last
            )));
        }

        if self.is_root(last) {
            self.root = None;
        } else if self.arena.detach(last).is_none() {
            return Err(inconsistent(format!("node {} is detached from the tree", last)));
        }

        let moved = self.arena.release(last);
        let removed = if target == last {
            moved
        } else {
            mem::replace(&mut self.arena[target].element, moved)
        };

        self.size -= 1;
        self.last_added = self.last_in_breadth_first();
        debug!(
            node = %target,
            unlinked = %last,
            size = self.size,
            "removed element and recomputed cursor"
        );

        self.check_after_mutation()?;
        Ok(Some(removed))
    }

    fn traversal(&self) -> Vec<&T> {
        let mut sequence = Vec::with_capacity(self.size);
        sequence.extend(self.elements());
        sequence
    }
}

impl<T> Default for CompleteTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for CompleteTree<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.elements()).finish()
    }
}

/// One line per level, elements separated by spaces.
impl<T: fmt::Display> fmt::Display for CompleteTree<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (depth, level) in self.levels().iter().enumerate() {
            if depth > 0 {
                writeln!(f)?;
            }
            for (i, element) in level.iter().enumerate() {
                if i > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{}", element)?;
            }
        }
        Ok(())
    }
}

impl<'a, T: PartialEq> IntoIterator for &'a CompleteTree<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

/// # Panics
///
/// Panics if an insertion hits an internal-consistency fault, which only
/// an invariant check enabled through [`TreeConfig`] can report here.
impl<T: PartialEq> Extend<T> for CompleteTree<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for element in iter {
            if let Err(err) = self.insert(element) {
                panic!("extend hit a corrupted tree: {}", err);
            }
        }
    }
}

impl<T: PartialEq> FromIterator<T> for CompleteTree<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let config = TreeConfig::default().with_capacity(iter.size_hint().0);
        let mut tree = Self::with_config(config);
        tree.extend(iter);
        tree
    }
}

#[cfg(feature = "serde")]
impl<T: serde::Serialize> serde::Serialize for CompleteTree<T> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.elements())
    }
}

/// A complete tree is fully determined by its breadth-first sequence,
/// so re-inserting in order rebuilds the same shape.
#[cfg(feature = "serde")]
impl<'de, T> serde::Deserialize<'de> for CompleteTree<T>
where
    T: serde::Deserialize<'de> + PartialEq,
{
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let elements = Vec::<T>::deserialize(deserializer)?;
        let mut tree = Self::with_config(TreeConfig::default().with_capacity(elements.len()));
        for element in elements {
            tree.insert(element).map_err(serde::de::Error::custom)?;
        }
        Ok(tree)
    }
}

fn inconsistent(msg: impl Into<String>) -> TreeError {
    TreeError::Inconsistent(msg.into())
}
