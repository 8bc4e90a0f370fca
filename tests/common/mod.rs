//! Shared helpers for integration tests.
//!
//! `RUST_LOG=complete_tree=trace cargo test` shows the engine's slot
//! decisions for a failing case.

#![allow(dead_code)]

use std::sync::Once;

use complete_tree::{BinaryTree, CompleteTree};
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Install a test-friendly subscriber once per test binary.
pub fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
            )
            .with_test_writer()
            .try_init();
    });
}

/// Check completeness from node links alone: in breadth-first order, once
/// a node is missing a child every later node must be a leaf, and no node
/// has a right child without a left one.
pub fn assert_complete<T: PartialEq>(tree: &CompleteTree<T>) {
    let mut seen_gap = false;
    let mut count = 0;
    for id in tree.breadth_first() {
        let node = tree.node(id).expect("breadth-first ids are live");
        count += 1;
        assert!(
            !(node.right().is_some() && node.left().is_none()),
            "right child without left child at {}",
            id
        );
        if seen_gap {
            assert!(node.is_leaf(), "node {} has children after a gap", id);
        }
        if node.left().is_none() || node.right().is_none() {
            seen_gap = true;
        }
    }
    assert_eq!(count, tree.len(), "reachable nodes differ from size");
}

/// Sorted copy of the tree's elements, for multiset comparison.
pub fn sorted<T: PartialEq + Ord + Clone>(tree: &CompleteTree<T>) -> Vec<T> {
    let mut elements: Vec<T> = tree.iter().cloned().collect();
    elements.sort();
    elements
}
