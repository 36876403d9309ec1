//! Stateful cursors and the std iterators built from them.
//!
//! A [`Cursor`] is a position in a tree's entry sequence. It moves with
//! [`next`](Cursor::next) and [`prev`](Cursor::prev) and finds successors by
//! following parent ids, so it never keeps a stack of visited nodes.
//!
//! ```text
//!            next                 next            next (last entry)
//! BeforeFirst ───► At(node, index) ───► At(...) ───► AfterLast
//!             ◄───                 ◄───          ◄───
//!            prev (first entry)   prev            prev
//! ```
//!
//! A cursor holds a shared borrow of its tree. Any mutation of the tree needs
//! a unique borrow, so a cursor can never observe a split or merge halfway
//! through a walk: the compiler rejects the program instead.
//!
//! [`Iter`] pairs two cursors, one walking forward and one backward, and
//! stops when they meet.

use std::iter::FusedIterator;

use super::node::NodeId;
use super::pool::NodePool;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Position {
    BeforeFirst,
    At(NodeId, usize),
    AfterLast,
}

// =============================================================================
// Cursor
// =============================================================================

/// A bidirectional position over a tree's entries in ascending key order.
///
/// A fresh cursor sits before the first entry.
///
/// # Examples
///
/// ```rust
/// use arbor::btree::BTree;
///
/// let tree: BTree<i32, &str> = [(1, "a"), (2, "b"), (3, "c")].into_iter().collect();
/// let mut cursor = tree.cursor();
///
/// assert!(cursor.next());
/// assert_eq!(cursor.entry(), (&1, &"a"));
/// assert!(cursor.next());
/// assert!(cursor.prev());
/// assert_eq!(cursor.key(), &1);
/// assert!(!cursor.prev()); // now before the first entry
///
/// cursor.end();
/// assert!(cursor.prev());
/// assert_eq!(cursor.value(), &"c");
/// ```
pub struct Cursor<'a, K, V> {
    pool: &'a NodePool<K, V>,
    root: Option<NodeId>,
    position: Position,
}

impl<'a, K, V> Cursor<'a, K, V> {
    pub(crate) const fn new(pool: &'a NodePool<K, V>, root: Option<NodeId>) -> Self {
        Self {
            pool,
            root,
            position: Position::BeforeFirst,
        }
    }

    /// Moves to the next entry in ascending order.
    ///
    /// Returns `false` once the cursor moves past the last entry; it then
    /// stays after the last entry.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> bool {
        self.position = match self.position {
            Position::AfterLast => Position::AfterLast,
            Position::BeforeFirst => self.root.map_or(Position::AfterLast, |root| {
                Position::At(self.pool.leftmost_leaf(root), 0)
            }),
            Position::At(id, index) => self.successor(id, index),
        };
        self.is_positioned()
    }

    /// Moves to the previous entry in ascending order.
    ///
    /// Returns `false` once the cursor moves before the first entry; it then
    /// stays before the first entry.
    pub fn prev(&mut self) -> bool {
        self.position = match self.position {
            Position::BeforeFirst => Position::BeforeFirst,
            Position::AfterLast => self.root.map_or(Position::BeforeFirst, |root| {
                let leaf = self.pool.rightmost_leaf(root);
                Position::At(leaf, self.pool[leaf].entries.len() - 1)
            }),
            Position::At(id, index) => self.predecessor(id, index),
        };
        self.is_positioned()
    }

    fn successor(&self, id: NodeId, index: usize) -> Position {
        let node = &self.pool[id];
        if !node.is_leaf() {
            return Position::At(self.pool.leftmost_leaf(node.children[index + 1]), 0);
        }
        if index + 1 < node.entries.len() {
            return Position::At(id, index + 1);
        }
        let mut child = id;
        while let Some(parent) = self.pool[child].parent {
            let Some(position) = self.pool[parent].child_position(child) else {
                break;
            };
            if position < self.pool[parent].entries.len() {
                return Position::At(parent, position);
            }
            child = parent;
        }
        Position::AfterLast
    }

    fn predecessor(&self, id: NodeId, index: usize) -> Position {
        let node = &self.pool[id];
        if !node.is_leaf() {
            let leaf = self.pool.rightmost_leaf(node.children[index]);
            return Position::At(leaf, self.pool[leaf].entries.len() - 1);
        }
        if index > 0 {
            return Position::At(id, index - 1);
        }
        let mut child = id;
        while let Some(parent) = self.pool[child].parent {
            let Some(position) = self.pool[parent].child_position(child) else {
                break;
            };
            if position > 0 {
                return Position::At(parent, position - 1);
            }
            child = parent;
        }
        Position::BeforeFirst
    }

    /// Resets the cursor to before the first entry.
    pub const fn begin(&mut self) {
        self.position = Position::BeforeFirst;
    }

    /// Resets the cursor to after the last entry.
    pub const fn end(&mut self) {
        self.position = Position::AfterLast;
    }

    /// Moves to the first entry. Returns `false` for an empty tree.
    pub fn first(&mut self) -> bool {
        self.begin();
        self.next()
    }

    /// Moves to the last entry. Returns `false` for an empty tree.
    pub fn last(&mut self) -> bool {
        self.end();
        self.prev()
    }

    /// Moves forward until `predicate` holds for the current entry.
    ///
    /// Returns `false`, with the cursor after the last entry, if no later
    /// entry matches.
    ///
    /// ```rust
    /// use arbor::btree::BTree;
    ///
    /// let tree: BTree<i32, i32> = (1..=10).map(|key| (key, key * key)).collect();
    /// let mut cursor = tree.cursor();
    /// assert!(cursor.next_to(|_, square| *square > 20));
    /// assert_eq!(cursor.key(), &5);
    /// ```
    pub fn next_to<P>(&mut self, mut predicate: P) -> bool
    where
        P: FnMut(&K, &V) -> bool,
    {
        while self.next() {
            let (key, value) = self.entry();
            if predicate(key, value) {
                return true;
            }
        }
        false
    }

    /// Moves backward until `predicate` holds for the current entry.
    ///
    /// Returns `false`, with the cursor before the first entry, if no earlier
    /// entry matches.
    pub fn prev_to<P>(&mut self, mut predicate: P) -> bool
    where
        P: FnMut(&K, &V) -> bool,
    {
        while self.prev() {
            let (key, value) = self.entry();
            if predicate(key, value) {
                return true;
            }
        }
        false
    }

    /// Returns `true` while the cursor is on an entry.
    #[inline]
    #[must_use]
    pub const fn is_positioned(&self) -> bool {
        matches!(self.position, Position::At(..))
    }

    /// The current entry, or `None` before the first or after the last entry.
    #[must_use]
    pub fn try_entry(&self) -> Option<(&'a K, &'a V)> {
        match self.position {
            Position::At(id, index) => {
                let entry = &self.pool[id].entries[index];
                Some((&entry.key, &entry.value))
            }
            Position::BeforeFirst | Position::AfterLast => None,
        }
    }

    /// The current entry.
    ///
    /// # Panics
    ///
    /// Panics if the cursor is before the first or after the last entry.
    #[must_use]
    pub fn entry(&self) -> (&'a K, &'a V) {
        match self.try_entry() {
            Some(entry) => entry,
            None => panic!(
                "invalid iterator state: cursor is {:?}, not on an entry",
                self.position
            ),
        }
    }

    /// The current key.
    ///
    /// # Panics
    ///
    /// Panics if the cursor is before the first or after the last entry.
    #[must_use]
    pub fn key(&self) -> &'a K {
        self.entry().0
    }

    /// The current value.
    ///
    /// # Panics
    ///
    /// Panics if the cursor is before the first or after the last entry.
    #[must_use]
    pub fn value(&self) -> &'a V {
        self.entry().1
    }
}

impl<K, V> Clone for Cursor<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool,
            root: self.root,
            position: self.position,
        }
    }
}

// =============================================================================
// Iter
// =============================================================================

/// An iterator over entries in ascending key order; `.rev()` descends.
pub struct Iter<'a, K, V> {
    front: Cursor<'a, K, V>,
    back: Cursor<'a, K, V>,
    remaining: usize,
}

impl<'a, K, V> Iter<'a, K, V> {
    pub(crate) const fn new(pool: &'a NodePool<K, V>, root: Option<NodeId>, length: usize) -> Self {
        let mut back = Cursor::new(pool, root);
        back.position = Position::AfterLast;
        Self {
            front: Cursor::new(pool, root),
            back,
            remaining: length,
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        self.front.next();
        self.front.try_entry()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> DoubleEndedIterator for Iter<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        self.back.prev();
        self.back.try_entry()
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            front: self.front.clone(),
            back: self.back.clone(),
            remaining: self.remaining,
        }
    }
}

// =============================================================================
// Keys / Values
// =============================================================================

/// An iterator over keys in ascending order.
pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Keys<'a, K, V> {
    pub(crate) const fn new(inner: Iter<'a, K, V>) -> Self {
        Self { inner }
    }
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(key, _)| key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Keys<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(key, _)| key)
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}

impl<K, V> FusedIterator for Keys<'_, K, V> {}

/// An iterator over values in ascending key order.
pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Values<'a, K, V> {
    pub(crate) const fn new(inner: Iter<'a, K, V>) -> Self {
        Self { inner }
    }
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Values<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, value)| value)
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}

impl<K, V> FusedIterator for Values<'_, K, V> {}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::btree::BTree;
    use rstest::rstest;

    fn tree_of(order: usize, keys: impl IntoIterator<Item = i32>) -> BTree<i32, i32> {
        let mut tree = BTree::new(order).unwrap();
        for key in keys {
            tree.put(key, -key);
        }
        tree
    }

    #[rstest]
    fn test_empty_tree_cursor() {
        let tree = tree_of(3, []);
        let mut cursor = tree.cursor();
        assert!(!cursor.next());
        assert!(!cursor.is_positioned());
        assert!(!cursor.next());
        assert!(!cursor.prev());
        assert!(!cursor.first());
        assert!(!cursor.last());
    }

    #[rstest]
    #[case(3)]
    #[case(4)]
    #[case(7)]
    fn test_forward_walk_visits_every_key(#[case] order: usize) {
        let tree = tree_of(order, (0..100).rev());
        let mut cursor = tree.cursor();
        let mut visited = Vec::new();
        while cursor.next() {
            visited.push(*cursor.key());
        }
        assert_eq!(visited, (0..100).collect::<Vec<_>>());
        assert!(!cursor.is_positioned());
    }

    #[rstest]
    #[case(3)]
    #[case(5)]
    fn test_backward_walk_mirrors_forward(#[case] order: usize) {
        let tree = tree_of(order, [8, 3, 10, 1, 6, 14, 4, 7, 13, 2, 5, 9, 11, 12]);
        let mut forward = Vec::new();
        let mut cursor = tree.cursor();
        while cursor.next() {
            forward.push(*cursor.key());
        }
        let mut backward = Vec::new();
        cursor.end();
        while cursor.prev() {
            backward.push(*cursor.key());
        }
        backward.reverse();
        assert_eq!(forward, backward);
    }

    #[rstest]
    fn test_direction_change_mid_walk() {
        let tree = tree_of(3, 1..=20);
        let mut cursor = tree.cursor();
        for _ in 0..10 {
            cursor.next();
        }
        assert_eq!(cursor.key(), &10);
        assert!(cursor.prev());
        assert_eq!(cursor.key(), &9);
        assert!(cursor.next());
        assert!(cursor.next());
        assert_eq!(cursor.key(), &11);
    }

    #[rstest]
    fn test_walk_off_the_end_and_back() {
        let tree = tree_of(3, 1..=5);
        let mut cursor = tree.cursor();
        assert!(cursor.last());
        assert_eq!(cursor.key(), &5);
        assert!(!cursor.next());
        assert!(cursor.prev());
        assert_eq!(cursor.key(), &5);
        assert!(cursor.first());
        assert!(!cursor.prev());
        assert!(cursor.next());
        assert_eq!(cursor.value(), &-1);
    }

    #[rstest]
    fn test_prev_to_finds_earlier_entry() {
        let tree = tree_of(4, 1..=30);
        let mut cursor = tree.cursor();
        cursor.end();
        assert!(cursor.prev_to(|key, _| key % 7 == 0));
        assert_eq!(cursor.key(), &28);
        assert!(!cursor.prev_to(|key, _| *key > 100));
        assert!(!cursor.is_positioned());
    }

    #[rstest]
    #[should_panic(expected = "invalid iterator state")]
    fn test_key_before_first_panics() {
        let tree = tree_of(3, 1..=3);
        let cursor = tree.cursor();
        let _ = cursor.key();
    }

    #[rstest]
    #[should_panic(expected = "invalid iterator state")]
    fn test_value_after_last_panics() {
        let tree = tree_of(3, 1..=3);
        let mut cursor = tree.cursor();
        cursor.end();
        let _ = cursor.value();
    }

    #[rstest]
    fn test_iter_meets_in_the_middle() {
        let tree = tree_of(3, 1..=6);
        let mut iter = tree.iter();
        assert_eq!(iter.len(), 6);
        assert_eq!(iter.next(), Some((&1, &-1)));
        assert_eq!(iter.next_back(), Some((&6, &-6)));
        assert_eq!(iter.next_back(), Some((&5, &-5)));
        assert_eq!(iter.next(), Some((&2, &-2)));
        assert_eq!(iter.len(), 2);
        let rest: Vec<i32> = iter.map(|(key, _)| *key).collect();
        assert_eq!(rest, vec![3, 4]);
    }

    #[rstest]
    fn test_keys_and_values_rev() {
        let tree = tree_of(3, 1..=4);
        let keys: Vec<&i32> = tree.keys().rev().collect();
        assert_eq!(keys, vec![&4, &3, &2, &1]);
        let values: Vec<i32> = tree.values().copied().collect();
        assert_eq!(values, vec![-1, -2, -3, -4]);
    }

    #[rstest]
    fn test_keys_and_values_stay_exhausted() {
        fn assert_fused<I: std::iter::FusedIterator>(_: &I) {}

        let tree = tree_of(3, 1..=2);
        let mut keys = tree.keys();
        let mut values = tree.values();
        assert_fused(&keys);
        assert_fused(&values);

        assert_eq!(keys.by_ref().count(), 2);
        assert_eq!(keys.next(), None);
        assert_eq!(keys.next_back(), None);
        assert_eq!(values.next_back(), Some(&-2));
        assert_eq!(values.next(), Some(&-1));
        assert_eq!(values.next(), None);
        assert_eq!(values.next(), None);
    }
}
