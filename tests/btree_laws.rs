//! Property-based tests for BTree.
//!
//! Random sequences of puts and deletes are replayed against both the tree
//! and `std::collections::BTreeMap`, checking the structural invariants
//! after every step.

use std::collections::BTreeMap;

use arbor::btree::BTree;
use proptest::prelude::*;

// =============================================================================
// Strategies for Generating Test Data
// =============================================================================

#[derive(Debug, Clone)]
enum Operation {
    Put(i16, i32),
    Delete(i16),
}

fn operation() -> impl Strategy<Value = Operation> {
    prop_oneof![
        3 => (any::<i16>().prop_map(|key| key % 64), any::<i32>())
            .prop_map(|(key, value)| Operation::Put(key, value)),
        2 => any::<i16>().prop_map(|key| Operation::Delete(key % 64)),
    ]
}

fn tree_from(order: usize, entries: &[(i32, i32)]) -> BTree<i32, i32> {
    let mut tree = BTree::new(order).unwrap();
    for &(key, value) in entries {
        tree.put(key, value);
    }
    tree
}

// =============================================================================
// Model Laws
// =============================================================================

proptest! {
    /// Law: after any interleaving of puts and deletes the tree matches a
    /// reference map and keeps every structural invariant.
    #[test]
    fn prop_matches_reference_map(
        order in 2usize..9,
        operations in prop::collection::vec(operation(), 0..200)
    ) {
        let mut tree = BTree::new(order).unwrap();
        let mut model = BTreeMap::new();
        for operation in operations {
            match operation {
                Operation::Put(key, value) => {
                    prop_assert_eq!(tree.put(key, value), model.insert(key, value));
                }
                Operation::Delete(key) => {
                    prop_assert_eq!(tree.delete(&key), model.remove(&key));
                }
            }
            prop_assert_eq!(tree.check_invariants(), Ok(()));
            prop_assert_eq!(tree.len(), model.len());
        }
        let entries: Vec<(i16, i32)> = tree.iter().map(|(key, value)| (*key, *value)).collect();
        let expected: Vec<(i16, i32)> = model.into_iter().collect();
        prop_assert_eq!(entries, expected);
    }
}

// =============================================================================
// Put / Get / Delete Laws
// =============================================================================

proptest! {
    /// Law: keys come out strictly ascending and without duplicates.
    #[test]
    fn prop_keys_strictly_ascending(
        entries in prop::collection::vec((any::<i32>(), any::<i32>()), 0..300),
        order in 3usize..12
    ) {
        let tree = tree_from(order, &entries);
        let keys: Vec<&i32> = tree.keys().collect();
        prop_assert!(keys.windows(2).all(|pair| pair[0] < pair[1]));
    }

    /// Law: the second put of a key wins and does not change the length.
    #[test]
    fn prop_put_overwrites(
        entries in prop::collection::vec((any::<i32>(), any::<i32>()), 0..100),
        key: i32,
        first: i32,
        second: i32
    ) {
        let mut tree = tree_from(3, &entries);
        tree.put(key, first);
        let length = tree.len();
        prop_assert_eq!(tree.put(key, second), Some(first));
        prop_assert_eq!(tree.get(&key), Some(&second));
        prop_assert_eq!(tree.len(), length);
    }

    /// Law: delete removes exactly one key, or nothing if it was absent.
    #[test]
    fn prop_delete_removes_key(
        entries in prop::collection::vec((any::<i32>(), any::<i32>()), 0..100),
        key: i32
    ) {
        let mut tree = tree_from(4, &entries);
        let was_present = tree.contains(&key);
        let length = tree.len();
        let removed = tree.delete(&key);
        prop_assert_eq!(removed.is_some(), was_present);
        prop_assert!(!tree.contains(&key));
        prop_assert_eq!(tree.len(), if was_present { length - 1 } else { length });
    }

    /// Law: deleting keys does not affect other keys.
    #[test]
    fn prop_delete_other_keys_unchanged(
        entries in prop::collection::vec((any::<i32>(), any::<i32>()), 0..100),
        key1: i32,
        key2: i32
    ) {
        prop_assume!(key1 != key2);
        let mut tree = tree_from(3, &entries);
        let before = tree.get(&key2).copied();
        tree.delete(&key1);
        prop_assert_eq!(tree.get(&key2).copied(), before);
    }
}

// =============================================================================
// Cursor Laws
// =============================================================================

proptest! {
    /// Law: walking backward visits the forward walk in reverse.
    #[test]
    fn prop_cursor_symmetry(
        entries in prop::collection::vec((any::<i32>(), any::<i32>()), 0..200),
        order in 3usize..8
    ) {
        let tree = tree_from(order, &entries);
        let mut cursor = tree.cursor();
        let mut forward = Vec::new();
        while cursor.next() {
            forward.push(*cursor.key());
        }
        let mut backward = Vec::new();
        while cursor.prev() {
            backward.push(*cursor.key());
        }
        backward.reverse();
        prop_assert_eq!(forward.len(), tree.len());
        prop_assert_eq!(forward, backward);
    }

    /// Law: the double-ended iterator yields each entry once however the two
    /// ends are interleaved.
    #[test]
    fn prop_iter_ends_meet(
        entries in prop::collection::vec((any::<i32>(), any::<i32>()), 0..100),
        pattern in prop::collection::vec(any::<bool>(), 0..100)
    ) {
        let tree = tree_from(3, &entries);
        let mut iter = tree.iter();
        let mut front = Vec::new();
        let mut back = Vec::new();
        for from_front in pattern.into_iter().chain(std::iter::repeat(true)) {
            let next = if from_front { iter.next() } else { iter.next_back() };
            match next {
                Some((key, _)) if from_front => front.push(*key),
                Some((key, _)) => back.push(*key),
                None => break,
            }
        }
        back.reverse();
        front.extend(back);
        let expected: Vec<i32> = tree.keys().copied().collect();
        prop_assert_eq!(front, expected);
    }

    /// Law: first and last agree with the ends of iteration.
    #[test]
    fn prop_first_last_match_iteration(
        entries in prop::collection::vec((any::<i32>(), any::<i32>()), 0..100)
    ) {
        let tree = tree_from(5, &entries);
        prop_assert_eq!(tree.first(), tree.iter().next());
        prop_assert_eq!(tree.last(), tree.iter().next_back());
    }
}

// =============================================================================
// Clone / Clear Laws
// =============================================================================

proptest! {
    /// Law: a clone equals its source and stays valid after diverging.
    #[test]
    fn prop_clone_independent(
        entries in prop::collection::vec((any::<i32>(), any::<i32>()), 1..100),
        extra: i32
    ) {
        let tree = tree_from(3, &entries);
        let mut copy = tree.clone();
        prop_assert_eq!(&copy, &tree);
        let key = *tree.keys().next().unwrap();
        copy.delete(&key);
        copy.put(extra, extra);
        prop_assert!(tree.contains(&key));
        prop_assert_eq!(copy.check_invariants(), Ok(()));
        prop_assert_eq!(tree.check_invariants(), Ok(()));
    }

    /// Law: a cleared tree rebuilt from the same entries equals a fresh one.
    #[test]
    fn prop_clear_then_refill(
        entries in prop::collection::vec((any::<i32>(), any::<i32>()), 0..150)
    ) {
        let mut tree = tree_from(4, &entries);
        tree.clear();
        prop_assert!(tree.is_empty());
        for &(key, value) in &entries {
            tree.put(key, value);
        }
        prop_assert_eq!(tree.check_invariants(), Ok(()));
        prop_assert_eq!(tree, tree_from(4, &entries));
    }
}
