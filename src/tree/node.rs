//! Arena-backed tree vertices
//!
//! Children are owned by the arena and addressed by stable [`NodeId`]s.
//! The parent link is a plain index used only for upward navigation,
//! so the parent/child cycle never involves ownership.

use std::fmt;
use std::ops::{Index, IndexMut};

/// Stable handle to a node slot inside a [`NodeArena`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Raw slot index
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Tree vertex: payload plus parent/child links
#[derive(Debug, Clone)]
pub struct Node<T> {
    /// Payload stored at this vertex
    pub element: T,

    pub(crate) parent: Option<NodeId>,
    pub(crate) left: Option<NodeId>,
    pub(crate) right: Option<NodeId>,
}

impl<T> Node<T> {
    /// Create a detached node holding `element`
    pub fn new(element: T) -> Self {
        Self {
            element,
            parent: None,
            left: None,
            right: None,
        }
    }

    /// Parent link (`None` for the root or a detached node)
    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Left child link
    #[inline]
    pub fn left(&self) -> Option<NodeId> {
        self.left
    }

    /// Right child link
    #[inline]
    pub fn right(&self) -> Option<NodeId> {
        self.right
    }

    /// Check if the node has no children
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}

/// Two nodes are equal when their payloads are equal; links are ignored.
impl<T: PartialEq> PartialEq for Node<T> {
    fn eq(&self, other: &Self) -> bool {
        self.element == other.element
    }
}

impl<T: Eq> Eq for Node<T> {}

/// Growable node table with slot reuse
///
/// Released slots go onto a free list and are handed out again by the
/// next [`NodeArena::alloc`], so ids stay small under churn.
#[derive(Debug, Clone)]
pub struct NodeArena<T> {
    slots: Vec<Option<Node<T>>>,
    free: Vec<NodeId>,
}

impl<T> NodeArena<T> {
    /// Create an empty arena
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create an empty arena with room for `capacity` nodes
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
        }
    }

    /// Number of live nodes
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Whether no node is live
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Store a detached node and return its id
    pub fn alloc(&mut self, element: T) -> NodeId {
        let node = Node::new(element);
        match self.free.pop() {
            Some(id) => {
                self.slots[id.0] = Some(node);
                id
            }
            None => {
                self.slots.push(Some(node));
                NodeId(self.slots.len() - 1)
            }
        }
    }

    /// Free a slot and hand back its payload
    ///
    /// Links are not touched; callers detach the node first.
    pub fn release(&mut self, id: NodeId) -> T {
        let node = self.slots[id.0]
            .take()
            .unwrap_or_else(|| panic!("release of vacant slot {}", id));
        self.free.push(id);
        node.element
    }

    /// Look up a live node
    pub fn get(&self, id: NodeId) -> Option<&Node<T>> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    /// Look up a live node mutably
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node<T>> {
        self.slots.get_mut(id.0).and_then(Option::as_mut)
    }

    /// Whether `id` is its parent's left child (false if parentless)
    pub fn is_left_child(&self, id: NodeId) -> bool {
        match self[id].parent {
            Some(parent) => self[parent].left == Some(id),
            None => false,
        }
    }

    /// Whether `id` is its parent's right child (false if parentless)
    pub fn is_right_child(&self, id: NodeId) -> bool {
        match self[id].parent {
            Some(parent) => self[parent].right == Some(id),
            None => false,
        }
    }

    /// Set `parent`'s left link; a present child gets its back-reference set
    ///
    /// Passing `None` detaches the old child without clearing its parent link.
    pub fn attach_left(&mut self, parent: NodeId, child: Option<NodeId>) {
        self[parent].left = child;
        if let Some(child) = child {
            self[child].parent = Some(parent);
        }
    }

    /// Set `parent`'s right link; see [`NodeArena::attach_left`]
    pub fn attach_right(&mut self, parent: NodeId, child: Option<NodeId>) {
        self[parent].right = child;
        if let Some(child) = child {
            self[child].parent = Some(parent);
        }
    }

    /// Unlink `id` from its parent, clearing both directions
    ///
    /// Returns the former parent.
    pub fn detach(&mut self, id: NodeId) -> Option<NodeId> {
        let parent = self[id].parent.take()?;
        let node = &mut self[parent];
        if node.left == Some(id) {
            node.left = None;
        } else if node.right == Some(id) {
            node.right = None;
        }
        Some(parent)
    }

    /// Drop every node
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
    }
}

impl<T> Default for NodeArena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Index<NodeId> for NodeArena<T> {
    type Output = Node<T>;

    fn index(&self, id: NodeId) -> &Node<T> {
        self.get(id)
            .unwrap_or_else(|| panic!("stale node id {}", id))
    }
}

impl<T> IndexMut<NodeId> for NodeArena<T> {
    fn index_mut(&mut self, id: NodeId) -> &mut Node<T> {
        self.get_mut(id)
            .unwrap_or_else(|| panic!("stale node id {}", id))
    }
}
