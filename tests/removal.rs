//! Removal table over a seven-element tree
//!
//! Removal swaps in the last breadth-first payload, so expectations are
//! the exact resulting order plus multiset and shape checks.

use complete_tree::{BinaryTree, CompleteTree};
use test_case::test_case;
mod common;
use common::*;

#[test_case(1, &[7, 2, 3, 4, 5, 6] ; "root")]
#[test_case(2, &[1, 7, 3, 4, 5, 6] ; "left child of root")]
#[test_case(3, &[1, 2, 7, 4, 5, 6] ; "right child of root")]
#[test_case(4, &[1, 2, 3, 7, 5, 6] ; "leftmost leaf")]
#[test_case(5, &[1, 2, 3, 4, 7, 6] ; "inner leaf")]
#[test_case(6, &[1, 2, 3, 4, 5, 7] ; "left sibling of last")]
#[test_case(7, &[1, 2, 3, 4, 5, 6] ; "last added")]
fn remove_from_seven(target: i32, expected: &[i32]) {
    init_tracing();
    let mut tree: CompleteTree<i32> = (1..=7).collect();

    assert_eq!(tree.remove(&target).unwrap(), Some(target));

    let order: Vec<i32> = tree.iter().copied().collect();
    assert_eq!(order, expected);
    assert_eq!(tree.len(), 6);
    assert!(!tree.search(&target));
    assert_complete(&tree);
    tree.validate().unwrap();

    let mut remaining: Vec<i32> = (1..=7).filter(|&v| v != target).collect();
    remaining.sort();
    assert_eq!(sorted(&tree), remaining);
    assert_eq!(tree.last_added(), Some(&expected[5]));
}

#[test_case(&[5, 5] ; "root and its left child")]
#[test_case(&[1, 5, 2, 5] ; "duplicate deeper than match")]
#[test_case(&[5, 1, 5, 5, 5] ; "many duplicates")]
fn remove_duplicate_takes_one(elements: &[i32]) {
    let mut tree: CompleteTree<i32> = elements.iter().copied().collect();
    let before = elements.iter().filter(|&&v| v == 5).count();

    assert_eq!(tree.remove(&5).unwrap(), Some(5));

    let after = tree.iter().filter(|&&v| v == 5).count();
    assert_eq!(after, before - 1);
    assert_complete(&tree);
    tree.validate().unwrap();
}

#[test]
fn remove_first_match_in_breadth_first_order() {
    // 1 / 5 2 / 5: the match at depth 1 goes, its payload replaced by the
    // trailing 5, so a 5 stays in slot 1
    let mut tree: CompleteTree<i32> = [1, 5, 2, 5].into_iter().collect();
    tree.remove(&5).unwrap();
    assert_eq!(tree.iter().copied().collect::<Vec<_>>(), vec![1, 5, 2]);
}
