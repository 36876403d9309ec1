//! The B-tree itself: lookup, insert-with-split and delete-with-rebalance.
//!
//! # Internal Structure
//!
//! Nodes are stored in a [`NodePool`] and linked by [`NodeId`]. Between two
//! operations the tree maintains:
//!
//! 1. Entries within a node are strictly ascending under the comparator
//! 2. Internal nodes have exactly `entries + 1` children, leaves have none
//! 3. Every leaf is at the same depth
//! 4. Every non-root node holds `ceil(order / 2) - 1 ..= order - 1` entries,
//!    the root `1 ..= order - 1` (an empty tree has no root node)
//! 5. `len` equals the number of entries reachable from the root
//! 6. `parent` ids agree with `children`
//!
//! Splits and merges walk upward with explicit loops over node ids; the
//! number of steps is bounded by the height, `O(log_order N)`.

use std::fmt;
use std::iter::FromIterator;
use std::mem;

use super::comparator::{Comparator, NaturalOrder};
use super::config::{BTreeConfig, DEFAULT_FREE_LIST_CAPACITY, DEFAULT_ORDER};
use super::cursor::{Cursor, Iter, Keys, Values};
use super::error::Result;
use super::node::{Entry, Node, NodeId};
use super::pool::NodePool;

// =============================================================================
// BTree Definition
// =============================================================================

/// An in-memory B-tree with a configurable order.
///
/// The order is the maximum number of children per node. Keys are unique
/// under the tree's [`Comparator`]; putting an existing key replaces its
/// value.
///
/// # Time Complexity
///
/// | Operation                | Complexity      |
/// |--------------------------|-----------------|
/// | `get` / `contains`       | O(log N)        |
/// | `put`                    | O(log N)        |
/// | `delete`                 | O(log N)        |
/// | `first` / `last`         | O(log N)        |
/// | `pop_first` / `pop_last` | O(log N)        |
/// | `len` / `is_empty`       | O(1)            |
/// | `clear`                  | O(N)            |
/// | `clone`                  | O(N)            |
///
/// # Examples
///
/// ```rust
/// use arbor::btree::BTree;
///
/// let mut tree = BTree::new(3).unwrap();
/// for (key, value) in [(5, "e"), (6, "f"), (7, "g"), (3, "c"), (4, "d"), (1, "x"), (2, "b")] {
///     tree.put(key, value);
/// }
/// tree.put(1, "a");
///
/// assert_eq!(tree.len(), 7);
/// assert_eq!(tree.get(&1), Some(&"a"));
/// let keys: Vec<&i32> = tree.keys().collect();
/// assert_eq!(keys, vec![&1, &2, &3, &4, &5, &6, &7]);
/// ```
pub struct BTree<K, V, C = NaturalOrder> {
    pub(crate) pool: NodePool<K, V>,
    pub(crate) root: Option<NodeId>,
    comparator: C,
    order: usize,
    length: usize,
}

impl<K: Ord, V> BTree<K, V, NaturalOrder> {
    /// Creates an empty tree ordered by `K: Ord`.
    ///
    /// # Errors
    ///
    /// Returns [`BTreeError::InvalidOrder`](super::BTreeError::InvalidOrder)
    /// if `order < 2`. An order of 2 runs as order 3.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use arbor::btree::BTree;
    ///
    /// let tree: BTree<i32, String> = BTree::new(4).unwrap();
    /// assert!(tree.is_empty());
    /// assert!(BTree::<i32, String>::new(1).is_err());
    /// ```
    pub fn new(order: usize) -> Result<Self> {
        Self::with_comparator(order, NaturalOrder)
    }
}

impl<K, V, C: Comparator<K>> BTree<K, V, C> {
    /// Creates an empty tree ordered by `comparator`.
    ///
    /// # Errors
    ///
    /// Returns [`BTreeError::InvalidOrder`](super::BTreeError::InvalidOrder)
    /// if `order < 2`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use arbor::btree::BTree;
    ///
    /// let mut tree = BTree::with_comparator(3, |left: &i32, right: &i32| right.cmp(left)).unwrap();
    /// tree.put(1, "one");
    /// tree.put(2, "two");
    /// assert_eq!(tree.first(), Some((&2, &"two")));
    /// ```
    pub fn with_comparator(order: usize, comparator: C) -> Result<Self> {
        Self::with_config(BTreeConfig::new(order), comparator)
    }

    /// Creates an empty tree from a full configuration.
    ///
    /// # Errors
    ///
    /// Returns [`BTreeError::InvalidOrder`](super::BTreeError::InvalidOrder)
    /// if `config.order < 2`.
    pub fn with_config(config: BTreeConfig, comparator: C) -> Result<Self> {
        let order = config.effective_order()?;
        Ok(Self {
            pool: NodePool::new(order, config.free_list_capacity),
            root: None,
            comparator,
            order,
            length: 0,
        })
    }

    /// Creates an empty tree ordered by `comparator` with [`DEFAULT_ORDER`].
    ///
    /// Unlike the other constructors this cannot fail.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use arbor::btree::{BTree, DEFAULT_ORDER, NaturalOrder, Reversed};
    ///
    /// let tree: BTree<u8, (), Reversed<NaturalOrder>> = BTree::with_default_order(Reversed(NaturalOrder));
    /// assert_eq!(tree.order(), DEFAULT_ORDER);
    /// ```
    #[must_use]
    pub const fn with_default_order(comparator: C) -> Self {
        Self {
            pool: NodePool::new(DEFAULT_ORDER, DEFAULT_FREE_LIST_CAPACITY),
            root: None,
            comparator,
            order: DEFAULT_ORDER,
            length: 0,
        }
    }
}

impl<K, V, C> BTree<K, V, C> {
    /// Returns the number of entries.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.length
    }

    /// Returns `true` if the tree holds no entries.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Maximum number of children per node.
    ///
    /// This is the order the tree runs with, which can differ from the one
    /// requested: order 2 is promoted to 3, so `BTree::new(2)` reports 3 here.
    #[inline]
    #[must_use]
    pub const fn order(&self) -> usize {
        self.order
    }

    /// The comparator ordering this tree's keys.
    #[inline]
    #[must_use]
    pub const fn comparator(&self) -> &C {
        &self.comparator
    }

    /// Number of levels; 0 for an empty tree, 1 for a lone root leaf.
    #[must_use]
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut current = self.root;
        while let Some(id) = current {
            height += 1;
            current = self.pool[id].children.first().copied();
        }
        height
    }

    /// Number of retired nodes currently held for reuse.
    #[inline]
    #[must_use]
    pub fn free_list_len(&self) -> usize {
        self.pool.free_len()
    }

    /// The entry with the smallest key.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use arbor::btree::BTree;
    ///
    /// let mut tree = BTree::new(3).unwrap();
    /// assert_eq!(tree.first(), None);
    /// tree.put(2, "two");
    /// tree.put(1, "one");
    /// assert_eq!(tree.first(), Some((&1, &"one")));
    /// ```
    #[must_use]
    pub fn first(&self) -> Option<(&K, &V)> {
        let leaf = self.pool.leftmost_leaf(self.root?);
        self.pool[leaf]
            .entries
            .first()
            .map(|entry| (&entry.key, &entry.value))
    }

    /// The entry with the largest key.
    #[must_use]
    pub fn last(&self) -> Option<(&K, &V)> {
        let leaf = self.pool.rightmost_leaf(self.root?);
        self.pool[leaf]
            .entries
            .last()
            .map(|entry| (&entry.key, &entry.value))
    }

    /// A cursor positioned before the first entry.
    ///
    /// The cursor borrows the tree, so the tree cannot be modified while the
    /// cursor is alive.
    #[must_use]
    pub const fn cursor(&self) -> Cursor<'_, K, V> {
        Cursor::new(&self.pool, self.root)
    }

    /// Iterates over entries in ascending key order.
    ///
    /// The iterator is double ended: `iter().rev()` walks in descending order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use arbor::btree::BTree;
    ///
    /// let tree: BTree<i32, char> = [(2, 'b'), (1, 'a'), (3, 'c')].into_iter().collect();
    /// let ascending: Vec<(&i32, &char)> = tree.iter().collect();
    /// assert_eq!(ascending, vec![(&1, &'a'), (&2, &'b'), (&3, &'c')]);
    /// let descending: Vec<&i32> = tree.iter().rev().map(|(key, _)| key).collect();
    /// assert_eq!(descending, vec![&3, &2, &1]);
    /// ```
    #[must_use]
    pub const fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(&self.pool, self.root, self.length)
    }

    /// Iterates over keys in ascending order.
    #[must_use]
    pub const fn keys(&self) -> Keys<'_, K, V> {
        Keys::new(self.iter())
    }

    /// Iterates over values in ascending key order.
    #[must_use]
    pub const fn values(&self) -> Values<'_, K, V> {
        Values::new(self.iter())
    }

    /// Removes every entry.
    ///
    /// Up to the free list capacity, the detached nodes are kept for reuse
    /// by later insertions.
    pub fn clear(&mut self) {
        self.pool.retire_all();
        self.root = None;
        self.length = 0;
        tracing::debug!(pooled = self.pool.free_len(), "tree cleared");
    }

    /// An empty tree with this tree's order, comparator and pool size.
    #[must_use]
    pub fn empty_like(&self) -> Self
    where
        C: Clone,
    {
        Self {
            pool: NodePool::new(self.order, self.pool.capacity()),
            root: None,
            comparator: self.comparator.clone(),
            order: self.order,
            length: 0,
        }
    }

    /// Removes and returns the entry with the smallest key.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use arbor::btree::BTree;
    ///
    /// let mut tree: BTree<i32, &str> = [(2, "two"), (1, "one")].into_iter().collect();
    /// assert_eq!(tree.pop_first(), Some((1, "one")));
    /// assert_eq!(tree.pop_first(), Some((2, "two")));
    /// assert_eq!(tree.pop_first(), None);
    /// ```
    pub fn pop_first(&mut self) -> Option<(K, V)> {
        let leaf = self.pool.leftmost_leaf(self.root?);
        Some(self.remove_at(leaf, 0).into_pair())
    }

    /// Removes and returns the entry with the largest key.
    pub fn pop_last(&mut self) -> Option<(K, V)> {
        let leaf = self.pool.rightmost_leaf(self.root?);
        let index = self.pool[leaf].entries.len().checked_sub(1)?;
        Some(self.remove_at(leaf, index).into_pair())
    }

    // =========================================================================
    // Deletion
    // =========================================================================

    #[inline]
    const fn max_entries(&self) -> usize {
        self.order - 1
    }

    #[inline]
    const fn min_entries(&self) -> usize {
        self.order.div_ceil(2) - 1
    }

    /// Removes the entry at `index` of node `id` and restores the invariants.
    ///
    /// An entry of an internal node is swapped with its in-order predecessor,
    /// so the physical removal always happens in a leaf.
    fn remove_at(&mut self, id: NodeId, index: usize) -> Entry<K, V> {
        let (removed, leaf) = if self.pool[id].is_leaf() {
            (self.pool[id].entries.remove(index), id)
        } else {
            let leaf = self.pool.rightmost_leaf(self.pool[id].children[index]);
            let last = self.pool[leaf].entries.len() - 1;
            let predecessor = self.pool[leaf].entries.remove(last);
            (
                mem::replace(&mut self.pool[id].entries[index], predecessor),
                leaf,
            )
        };
        self.length -= 1;
        self.rebalance(leaf);
        removed
    }

    /// Repairs underflow starting at `current` and moving toward the root.
    fn rebalance(&mut self, mut current: NodeId) {
        let minimum = self.min_entries();
        loop {
            let Some(parent) = self.pool[current].parent else {
                self.collapse_root(current);
                return;
            };
            if self.pool[current].entries.len() >= minimum {
                return;
            }
            let Some(position) = self.pool[parent].child_position(current) else {
                unreachable!("node {current:?} is missing from its parent's children");
            };
            if self.try_borrow_from_right(parent, position)
                || self.try_borrow_from_left(parent, position)
            {
                return;
            }
            if position + 1 < self.pool[parent].children.len() {
                self.merge_children(parent, position);
            } else {
                self.merge_children(parent, position - 1);
            }
            current = parent;
        }
    }

    /// Rotates one entry from the right sibling through the parent.
    ///
    /// Returns `false` if there is no right sibling or it has none to spare.
    fn try_borrow_from_right(&mut self, parent: NodeId, position: usize) -> bool {
        let Some(&sibling) = self.pool[parent].children.get(position + 1) else {
            return false;
        };
        if self.pool[sibling].entries.len() <= self.min_entries() {
            return false;
        }
        let node = &mut self.pool[sibling];
        let entry = node.entries.remove(0);
        let child = (!node.is_leaf()).then(|| node.children.remove(0));

        let separator = mem::replace(&mut self.pool[parent].entries[position], entry);
        let current = self.pool[parent].children[position];
        self.pool[current].entries.push(separator);
        if let Some(child) = child {
            self.pool[current].children.push(child);
            self.pool[child].parent = Some(current);
        }
        true
    }

    /// Rotates one entry from the left sibling through the parent.
    ///
    /// Returns `false` if there is no left sibling or it has none to spare.
    fn try_borrow_from_left(&mut self, parent: NodeId, position: usize) -> bool {
        let Some(separator_index) = position.checked_sub(1) else {
            return false;
        };
        let sibling = self.pool[parent].children[separator_index];
        if self.pool[sibling].entries.len() <= self.min_entries() {
            return false;
        }
        let node = &mut self.pool[sibling];
        let Some(entry) = node.entries.pop() else {
            return false;
        };
        let child = node.children.pop();

        let separator = mem::replace(&mut self.pool[parent].entries[separator_index], entry);
        let current = self.pool[parent].children[position];
        self.pool[current].entries.insert(0, separator);
        if let Some(child) = child {
            self.pool[current].children.insert(0, child);
            self.pool[child].parent = Some(current);
        }
        true
    }

    /// Merges child `left_index + 1` of `parent` into child `left_index`,
    /// pulling the separating entry down. The right node is retired.
    fn merge_children(&mut self, parent: NodeId, left_index: usize) {
        let parent_node = &mut self.pool[parent];
        let separator = parent_node.entries.remove(left_index);
        let right = parent_node.children.remove(left_index + 1);
        let left = parent_node.children[left_index];

        let (left_node, right_node) = self.pool.pair_mut(left, right);
        let moved_from = left_node.children.len();
        left_node.entries.push(separator);
        left_node.entries.append(&mut right_node.entries);
        left_node.children.append(&mut right_node.children);

        for index in moved_from..self.pool[left].children.len() {
            let child = self.pool[left].children[index];
            self.pool[child].parent = Some(left);
        }
        self.pool.retire(right);
    }

    /// Drops an empty root, promoting its only child if it has one.
    fn collapse_root(&mut self, root: NodeId) {
        if !self.pool[root].entries.is_empty() {
            return;
        }
        let child = self.pool[root].children.first().copied();
        if let Some(child) = child {
            self.pool[child].parent = None;
        }
        self.root = child;
        self.pool.retire(root);
        tracing::trace!(height = self.height(), "root collapsed, tree shrank one level");
    }
}

impl<K, V, C: Comparator<K>> BTree<K, V, C> {
    /// Finds the node and index holding `key`.
    fn locate(&self, key: &K) -> Option<(NodeId, usize)> {
        let mut current = self.root?;
        loop {
            let node = &self.pool[current];
            match node.search(key, &self.comparator) {
                Ok(index) => return Some((current, index)),
                Err(_) if node.is_leaf() => return None,
                Err(index) => current = node.children[index],
            }
        }
    }

    /// Returns a reference to the value stored under `key`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use arbor::btree::BTree;
    ///
    /// let mut tree = BTree::new(3).unwrap();
    /// tree.put("b", 2);
    /// assert_eq!(tree.get(&"b"), Some(&2));
    /// assert_eq!(tree.get(&"z"), None);
    /// ```
    #[must_use]
    pub fn get(&self, key: &K) -> Option<&V> {
        self.locate(key)
            .map(|(id, index)| &self.pool[id].entries[index].value)
    }

    /// Returns the stored key and value for `key`.
    #[must_use]
    pub fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
        self.locate(key).map(|(id, index)| {
            let entry = &self.pool[id].entries[index];
            (&entry.key, &entry.value)
        })
    }

    /// Returns a mutable reference to the value stored under `key`.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let (id, index) = self.locate(key)?;
        Some(&mut self.pool[id].entries[index].value)
    }

    /// Returns `true` if `key` is present.
    #[must_use]
    pub fn contains(&self, key: &K) -> bool {
        self.locate(key).is_some()
    }

    /// Returns the entry with the greatest key less than or equal to `key`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use arbor::btree::BTree;
    ///
    /// let tree: BTree<i32, char> = [(10, 'a'), (20, 'b'), (30, 'c')].into_iter().collect();
    /// assert_eq!(tree.floor(&25), Some((&20, &'b')));
    /// assert_eq!(tree.floor(&20), Some((&20, &'b')));
    /// assert_eq!(tree.floor(&5), None);
    /// ```
    #[must_use]
    pub fn floor(&self, key: &K) -> Option<(&K, &V)> {
        let mut candidate = None;
        let mut current = self.root?;
        loop {
            let node = &self.pool[current];
            match node.search(key, &self.comparator) {
                Ok(index) => return Some((&node.entries[index].key, &node.entries[index].value)),
                Err(index) => {
                    if index > 0 {
                        candidate = Some((current, index - 1));
                    }
                    if node.is_leaf() {
                        break;
                    }
                    current = node.children[index];
                }
            }
        }
        candidate.map(|(id, index)| {
            let entry = &self.pool[id].entries[index];
            (&entry.key, &entry.value)
        })
    }

    /// Returns the entry with the least key greater than or equal to `key`.
    #[must_use]
    pub fn ceiling(&self, key: &K) -> Option<(&K, &V)> {
        let mut candidate = None;
        let mut current = self.root?;
        loop {
            let node = &self.pool[current];
            match node.search(key, &self.comparator) {
                Ok(index) => return Some((&node.entries[index].key, &node.entries[index].value)),
                Err(index) => {
                    if index < node.entries.len() {
                        candidate = Some((current, index));
                    }
                    if node.is_leaf() {
                        break;
                    }
                    current = node.children[index];
                }
            }
        }
        candidate.map(|(id, index)| {
            let entry = &self.pool[id].entries[index];
            (&entry.key, &entry.value)
        })
    }

    /// Inserts `value` under `key`.
    ///
    /// If the key is already present its value is replaced in place and the
    /// previous value returned; the length does not change.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use arbor::btree::BTree;
    ///
    /// let mut tree = BTree::new(3).unwrap();
    /// assert_eq!(tree.put(1, "x"), None);
    /// assert_eq!(tree.put(1, "a"), Some("x"));
    /// assert_eq!(tree.len(), 1);
    /// ```
    pub fn put(&mut self, key: K, value: V) -> Option<V> {
        let Some(mut current) = self.root else {
            let root = self.pool.allocate();
            self.pool[root].entries.push(Entry::new(key, value));
            self.root = Some(root);
            self.length = 1;
            return None;
        };
        loop {
            let node = &mut self.pool[current];
            match node.search(&key, &self.comparator) {
                Ok(index) => return Some(mem::replace(&mut node.entries[index].value, value)),
                Err(index) if node.is_leaf() => {
                    node.entries.insert(index, Entry::new(key, value));
                    self.length += 1;
                    self.split_upward(current);
                    return None;
                }
                Err(index) => current = node.children[index],
            }
        }
    }

    /// Splits `current` while it overflows, promoting medians upward.
    fn split_upward(&mut self, mut current: NodeId) {
        let middle = (self.order - 1) / 2;
        while self.pool[current].entries.len() > self.max_entries() {
            let right = self.pool.allocate();
            let (left_node, right_node) = self.pool.pair_mut(current, right);
            right_node.entries.extend(left_node.entries.drain(middle + 1..));
            let median = left_node.entries.remove(middle);
            if !left_node.is_leaf() {
                right_node.children.extend(left_node.children.drain(middle + 1..));
            }
            let parent = left_node.parent;
            right_node.parent = parent;

            for index in 0..self.pool[right].children.len() {
                let child = self.pool[right].children[index];
                self.pool[child].parent = Some(right);
            }

            if let Some(parent) = parent {
                let node = &mut self.pool[parent];
                let position = node
                    .search(&median.key, &self.comparator)
                    .unwrap_or_else(|position| position);
                node.entries.insert(position, median);
                node.children.insert(position + 1, right);
                current = parent;
            } else {
                let root = self.pool.allocate();
                let node = &mut self.pool[root];
                node.entries.push(median);
                node.children.extend([current, right]);
                self.pool[current].parent = Some(root);
                self.pool[right].parent = Some(root);
                self.root = Some(root);
                tracing::trace!(height = self.height(), "root split, tree grew one level");
                return;
            }
        }
    }

    /// Removes `key`, returning its value.
    ///
    /// Returns `None` and leaves the tree unchanged if the key is absent.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use arbor::btree::BTree;
    ///
    /// let mut tree: BTree<i32, &str> = (1..=7).map(|key| (key, "v")).collect();
    /// assert_eq!(tree.delete(&5), Some("v"));
    /// assert_eq!(tree.delete(&5), None);
    /// assert_eq!(tree.len(), 6);
    /// ```
    pub fn delete(&mut self, key: &K) -> Option<V> {
        let (id, index) = self.locate(key)?;
        Some(self.remove_at(id, index).value)
    }

    /// Verifies every structural invariant, describing the first violation.
    ///
    /// Meant for tests and debugging; it walks the whole tree.
    ///
    /// # Errors
    ///
    /// Returns a description of the first broken invariant.
    pub fn check_invariants(&self) -> std::result::Result<(), String> {
        let Some(root) = self.root else {
            return if self.length == 0 {
                Ok(())
            } else {
                Err(format!("empty tree reports length {}", self.length))
            };
        };
        let mut walk = InvariantWalk {
            leaf_depth: None,
            entries: 0,
            nodes: 0,
        };
        self.check_node(root, None, 0, None, None, &mut walk)?;
        if walk.entries != self.length {
            return Err(format!(
                "length {} but {} reachable entries",
                self.length, walk.entries
            ));
        }
        if walk.nodes != self.pool.live_len() {
            return Err(format!(
                "{} reachable nodes but {} allocated",
                walk.nodes,
                self.pool.live_len()
            ));
        }
        Ok(())
    }

    fn check_node<'a>(
        &'a self,
        id: NodeId,
        parent: Option<NodeId>,
        depth: usize,
        lower: Option<&'a K>,
        upper: Option<&'a K>,
        walk: &mut InvariantWalk,
    ) -> std::result::Result<(), String> {
        let node = &self.pool[id];
        walk.nodes += 1;
        walk.entries += node.entries.len();

        if node.parent != parent {
            return Err(format!("node {id:?} has parent {:?}, expected {parent:?}", node.parent));
        }
        let minimum = if parent.is_none() { 1 } else { self.min_entries() };
        if node.entries.len() < minimum || node.entries.len() > self.max_entries() {
            return Err(format!(
                "node {id:?} holds {} entries, allowed {minimum}..={}",
                node.entries.len(),
                self.max_entries()
            ));
        }
        if !node.is_sorted(&self.comparator) {
            return Err(format!("node {id:?} entries are not strictly ascending"));
        }
        if let (Some(lower), Some(entry)) = (lower, node.entries.first())
            && self.comparator.compare(lower, &entry.key).is_ge()
        {
            return Err(format!("node {id:?} has a key below its separator"));
        }
        if let (Some(upper), Some(entry)) = (upper, node.entries.last())
            && self.comparator.compare(&entry.key, upper).is_ge()
        {
            return Err(format!("node {id:?} has a key above its separator"));
        }

        if node.is_leaf() {
            return match walk.leaf_depth {
                Some(expected) if expected != depth => Err(format!(
                    "leaf {id:?} at depth {depth}, other leaves at depth {expected}"
                )),
                _ => {
                    walk.leaf_depth = Some(depth);
                    Ok(())
                }
            };
        }
        if node.children.len() != node.entries.len() + 1 {
            return Err(format!(
                "node {id:?} has {} entries but {} children",
                node.entries.len(),
                node.children.len()
            ));
        }
        for (index, &child) in node.children.iter().enumerate() {
            let child_lower = index
                .checked_sub(1)
                .map_or(lower, |left| Some(&node.entries[left].key));
            let child_upper = node.entries.get(index).map_or(upper, |entry| Some(&entry.key));
            self.check_node(child, Some(id), depth + 1, child_lower, child_upper, walk)?;
        }
        Ok(())
    }
}

struct InvariantWalk {
    leaf_depth: Option<usize>,
    entries: usize,
    nodes: usize,
}

// =============================================================================
// Structure Rendering
// =============================================================================

impl<K: fmt::Debug, V, C> BTree<K, V, C> {
    /// Renders the node structure, one node per line, children indented.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use arbor::btree::BTree;
    ///
    /// let mut tree = BTree::new(3).unwrap();
    /// for key in 1..=3 {
    ///     tree.put(key, ());
    /// }
    /// assert_eq!(tree.render_structure(), "[2]\n  [1]\n  [3]\n");
    /// ```
    #[must_use]
    pub fn render_structure(&self) -> String {
        let mut output = String::new();
        if let Some(root) = self.root {
            self.render_node(root, 0, &mut output);
        }
        output
    }

    fn render_node(&self, id: NodeId, depth: usize, output: &mut String) {
        use std::fmt::Write;

        let node = &self.pool[id];
        let keys: Vec<&K> = node.entries.iter().map(|entry| &entry.key).collect();
        let rendered = format!("{keys:?}").replace('"', "");
        let _ = writeln!(output, "{:indent$}{rendered}", "", indent = depth * 2);
        for &child in &node.children {
            self.render_node(child, depth + 1, output);
        }
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

/// Deep copy: the clone owns a compacted copy of the live nodes, the same
/// order and comparator, and an empty free list of the same capacity.
impl<K: Clone, V: Clone, C: Clone> Clone for BTree<K, V, C> {
    fn clone(&self) -> Self {
        let mut pool = NodePool::new(self.order, self.pool.capacity());
        let root = self
            .root
            .map(|root| copy_subtree(&self.pool, root, None, &mut pool));
        Self {
            pool,
            root,
            comparator: self.comparator.clone(),
            order: self.order,
            length: self.length,
        }
    }
}

fn copy_subtree<K: Clone, V: Clone>(
    source: &NodePool<K, V>,
    id: NodeId,
    parent: Option<NodeId>,
    target: &mut NodePool<K, V>,
) -> NodeId {
    let node = &source[id];
    let copy = target.insert(Node {
        entries: node.entries.clone(),
        children: Vec::with_capacity(node.children.len()),
        parent,
    });
    for &child in &node.children {
        let child_copy = copy_subtree(source, child, Some(copy), target);
        target[copy].children.push(child_copy);
    }
    copy
}

impl<K: Ord, V> Default for BTree<K, V, NaturalOrder> {
    fn default() -> Self {
        Self::with_default_order(NaturalOrder)
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for BTree<K, V, NaturalOrder> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut tree = Self::default();
        tree.extend(iter);
        tree
    }
}

impl<K, V, C: Comparator<K>> Extend<(K, V)> for BTree<K, V, C> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.put(key, value);
        }
    }
}

impl<'a, K, V, C> IntoIterator for &'a BTree<K, V, C> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An owning iterator over the entries of a [`BTree`], in ascending order.
pub struct IntoIter<K, V, C> {
    tree: BTree<K, V, C>,
}

impl<K, V, C> Iterator for IntoIter<K, V, C> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.tree.pop_first()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.tree.len(), Some(self.tree.len()))
    }
}

impl<K, V, C> DoubleEndedIterator for IntoIter<K, V, C> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.tree.pop_last()
    }
}

impl<K, V, C> ExactSizeIterator for IntoIter<K, V, C> {}

impl<K, V, C> IntoIterator for BTree<K, V, C> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V, C>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter { tree: self }
    }
}

impl<K: PartialEq, V: PartialEq, C> PartialEq for BTree<K, V, C> {
    fn eq(&self, other: &Self) -> bool {
        self.length == other.length && self.iter().eq(other.iter())
    }
}

impl<K: Eq, V: Eq, C> Eq for BTree<K, V, C> {}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for BTree<K, V, C> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_map().entries(self.iter()).finish()
    }
}

impl<K: fmt::Display, V: fmt::Display, C> fmt::Display for BTree<K, V, C> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{{")?;
        let mut first = true;
        for (key, value) in self {
            if first {
                first = false;
            } else {
                write!(formatter, ", ")?;
            }
            write!(formatter, "{key}: {value}")?;
        }
        write!(formatter, "}}")
    }
}

static_assertions::assert_impl_all!(BTree<i32, String>: Send, Sync, Clone);
static_assertions::assert_impl_all!(BTree<String, Vec<u8>>: Send, Sync, Clone);

// =============================================================================
// Tests
// =============================================================================
