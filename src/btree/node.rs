//! Entries and nodes of the B-tree.
//!
//! Nodes live in the tree's [`NodePool`](super::pool::NodePool) and refer to
//! each other by [`NodeId`]. Children are owned through the pool; the parent
//! id is only a way back up and never keeps a node alive.

use std::cmp::Ordering;

use super::comparator::Comparator;
use super::config::DEFAULT_ORDER;

// =============================================================================
// Entry
// =============================================================================

/// A key-value pair stored in a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Entry<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
}

impl<K, V> Entry<K, V> {
    #[inline]
    pub(crate) const fn new(key: K, value: V) -> Self {
        Self { key, value }
    }

    #[inline]
    pub(crate) fn into_pair(self) -> (K, V) {
        (self.key, self.value)
    }
}

// =============================================================================
// NodeId
// =============================================================================

/// Index of a node inside its tree's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(usize);

impl NodeId {
    #[inline]
    pub(crate) const fn new(index: usize) -> Self {
        Self(index)
    }

    #[inline]
    pub(crate) const fn index(self) -> usize {
        self.0
    }
}

// =============================================================================
// Node
// =============================================================================

/// A B-tree node: sorted entries, `entries.len() + 1` children for internal
/// nodes, none for leaves.
#[derive(Debug, Clone)]
pub(crate) struct Node<K, V> {
    pub(crate) entries: Vec<Entry<K, V>>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) parent: Option<NodeId>,
}

impl<K, V> Node<K, V> {
    /// Empty node sized for a tree of `order`.
    ///
    /// The reservation is capped at [`DEFAULT_ORDER`]; nodes of larger orders
    /// grow on demand.
    pub(crate) fn with_capacity(order: usize) -> Self {
        Self {
            // one spare slot: a node briefly holds `order` entries before it splits
            entries: Vec::with_capacity(order.min(DEFAULT_ORDER)),
            children: Vec::new(),
            parent: None,
        }
    }

    /// Placeholder for an arena slot whose node was dropped. Does not allocate.
    pub(crate) const fn vacant() -> Self {
        Self {
            entries: Vec::new(),
            children: Vec::new(),
            parent: None,
        }
    }

    #[inline]
    pub(crate) fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Drops contents and links, keeping the allocations.
    pub(crate) fn reset(&mut self) {
        self.entries.clear();
        self.children.clear();
        self.parent = None;
    }

    /// Binary search for `key`.
    ///
    /// `Ok(index)` is the entry holding the key, `Err(index)` is the insert
    /// position, which is also the index of the child to descend into.
    pub(crate) fn search<C>(&self, key: &K, comparator: &C) -> Result<usize, usize>
    where
        C: Comparator<K>,
    {
        self.entries
            .binary_search_by(|entry| comparator.compare(&entry.key, key))
    }

    /// Position of `child` among this node's children.
    pub(crate) fn child_position(&self, child: NodeId) -> Option<usize> {
        self.children.iter().position(|&candidate| candidate == child)
    }

    /// Checks the entries of this node are strictly ascending.
    pub(crate) fn is_sorted<C>(&self, comparator: &C) -> bool
    where
        C: Comparator<K>,
    {
        self.entries
            .windows(2)
            .all(|pair| comparator.compare(&pair[0].key, &pair[1].key) == Ordering::Less)
    }
}
