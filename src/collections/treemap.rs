//! Ordered map backed by [`BTree`].
//!
//! [`TreeMap`] is the map-shaped face of the B-tree engine: `insert` and
//! `remove` instead of `put` and `delete`, plus neighbour lookups
//! ([`floor`](TreeMap::floor), [`ceiling`](TreeMap::ceiling)) that the
//! sorted layout makes cheap.
//!
//! # Examples
//!
//! ```rust
//! use arbor::collections::TreeMap;
//!
//! let mut scores = TreeMap::new();
//! scores.insert("carol", 72);
//! scores.insert("alice", 90);
//! scores.insert("bob", 85);
//!
//! let names: Vec<&&str> = scores.keys().collect();
//! assert_eq!(names, vec![&"alice", &"bob", &"carol"]);
//! assert_eq!(scores.ceiling(&"b"), Some((&"bob", &85)));
//! assert_eq!(format!("{scores}"), "{alice: 90, bob: 85, carol: 72}");
//! ```

use std::fmt;
use std::iter::FromIterator;

use crate::btree::{BTree, Comparator, Cursor, Iter, Keys, NaturalOrder, Result, Values};

// =============================================================================
// TreeMap Definition
// =============================================================================

/// An ordered map from `K` to `V`.
///
/// Iteration is always in ascending key order under the map's comparator.
///
/// # Time Complexity
///
/// | Operation                 | Complexity |
/// |---------------------------|------------|
/// | `get` / `contains_key`    | O(log N)   |
/// | `insert` / `remove`       | O(log N)   |
/// | `floor` / `ceiling`       | O(log N)   |
/// | `first` / `last`          | O(log N)   |
/// | `len` / `is_empty`        | O(1)       |
#[derive(Clone)]
pub struct TreeMap<K, V, C = NaturalOrder> {
    tree: BTree<K, V, C>,
}

impl<K: Ord, V> TreeMap<K, V, NaturalOrder> {
    /// Creates an empty map with the default order.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            tree: BTree::with_default_order(NaturalOrder),
        }
    }

    /// Creates an empty map whose tree has the given order.
    ///
    /// # Errors
    ///
    /// Returns [`BTreeError::InvalidOrder`](crate::btree::BTreeError::InvalidOrder)
    /// if `order < 2`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use arbor::collections::TreeMap;
    ///
    /// let map: TreeMap<i32, i32> = TreeMap::with_order(4).unwrap();
    /// assert_eq!(map.order(), 4);
    /// assert!(TreeMap::<i32, i32>::with_order(0).is_err());
    /// ```
    pub fn with_order(order: usize) -> Result<Self> {
        Ok(Self {
            tree: BTree::new(order)?,
        })
    }
}

impl<K, V, C: Comparator<K>> TreeMap<K, V, C> {
    /// Creates an empty map ordered by `comparator`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use arbor::collections::TreeMap;
    ///
    /// let mut map = TreeMap::with_comparator(|left: &i32, right: &i32| right.cmp(left));
    /// map.insert(1, 'a');
    /// map.insert(2, 'b');
    /// assert_eq!(map.first(), Some((&2, &'b')));
    /// ```
    #[must_use]
    pub const fn with_comparator(comparator: C) -> Self {
        Self {
            tree: BTree::with_default_order(comparator),
        }
    }

    /// Builds a map around an existing tree.
    #[inline]
    #[must_use]
    pub const fn from_tree(tree: BTree<K, V, C>) -> Self {
        Self { tree }
    }

    /// Inserts a key-value pair, returning the previous value of the key.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.tree.put(key, value)
    }

    /// Removes a key, returning its value if it was present.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.tree.delete(key)
    }

    /// Returns a reference to the value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<&V> {
        self.tree.get(key)
    }

    /// Returns a mutable reference to the value stored under `key`.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.tree.get_mut(key)
    }

    /// Returns `true` if the map holds `key`.
    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.tree.contains(key)
    }

    /// The entry with the greatest key less than or equal to `key`.
    #[must_use]
    pub fn floor(&self, key: &K) -> Option<(&K, &V)> {
        self.tree.floor(key)
    }

    /// The entry with the least key greater than or equal to `key`.
    #[must_use]
    pub fn ceiling(&self, key: &K) -> Option<(&K, &V)> {
        self.tree.ceiling(key)
    }
}

impl<K, V, C> TreeMap<K, V, C> {
    /// Returns the number of entries.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.tree.len()
    }

    /// Returns `true` if the map is empty.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Order of the underlying tree, as reported by [`BTree::order`]
    /// (a requested order of 2 reports 3).
    #[inline]
    #[must_use]
    pub const fn order(&self) -> usize {
        self.tree.order()
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// The entry with the smallest key.
    #[must_use]
    pub fn first(&self) -> Option<(&K, &V)> {
        self.tree.first()
    }

    /// The entry with the largest key.
    #[must_use]
    pub fn last(&self) -> Option<(&K, &V)> {
        self.tree.last()
    }

    /// Removes and returns the entry with the smallest key.
    pub fn pop_first(&mut self) -> Option<(K, V)> {
        self.tree.pop_first()
    }

    /// Removes and returns the entry with the largest key.
    pub fn pop_last(&mut self) -> Option<(K, V)> {
        self.tree.pop_last()
    }

    /// Iterates over entries in ascending key order.
    #[inline]
    pub const fn iter(&self) -> Iter<'_, K, V> {
        self.tree.iter()
    }

    /// Iterates over keys in ascending order.
    #[inline]
    pub const fn keys(&self) -> Keys<'_, K, V> {
        self.tree.keys()
    }

    /// Iterates over values in ascending key order.
    #[inline]
    pub const fn values(&self) -> Values<'_, K, V> {
        self.tree.values()
    }

    /// A cursor positioned before the first entry.
    #[inline]
    pub const fn cursor(&self) -> Cursor<'_, K, V> {
        self.tree.cursor()
    }

    /// The underlying tree.
    #[inline]
    #[must_use]
    pub const fn as_tree(&self) -> &BTree<K, V, C> {
        &self.tree
    }

    /// Consumes the map, returning the underlying tree.
    #[inline]
    #[must_use]
    pub fn into_tree(self) -> BTree<K, V, C> {
        self.tree
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<K: Ord, V> Default for TreeMap<K, V, NaturalOrder> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for TreeMap<K, V, NaturalOrder> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K, V, C: Comparator<K>> Extend<(K, V)> for TreeMap<K, V, C> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.tree.extend(iter);
    }
}

impl<'a, K, V, C> IntoIterator for &'a TreeMap<K, V, C> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V, C> IntoIterator for TreeMap<K, V, C> {
    type Item = (K, V);
    type IntoIter = crate::btree::IntoIter<K, V, C>;

    fn into_iter(self) -> Self::IntoIter {
        self.tree.into_iter()
    }
}

impl<K: PartialEq, V: PartialEq, C> PartialEq for TreeMap<K, V, C> {
    fn eq(&self, other: &Self) -> bool {
        self.tree == other.tree
    }
}

impl<K: Eq, V: Eq, C> Eq for TreeMap<K, V, C> {}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for TreeMap<K, V, C> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.tree, formatter)
    }
}

impl<K: fmt::Display, V: fmt::Display, C> fmt::Display for TreeMap<K, V, C> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.tree, formatter)
    }
}

#[cfg(feature = "serde")]
impl<K: serde::Serialize, V: serde::Serialize, C> serde::Serialize for TreeMap<K, V, C> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serde::Serialize::serialize(&self.tree, serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de, K, V> serde::Deserialize<'de> for TreeMap<K, V, NaturalOrder>
where
    K: serde::Deserialize<'de> + Ord,
    V: serde::Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        <BTree<K, V, NaturalOrder> as serde::Deserialize>::deserialize(deserializer)
            .map(Self::from_tree)
    }
}

static_assertions::assert_impl_all!(TreeMap<String, i32>: Send, Sync, Clone, Default);

// =============================================================================
// Tests
// =============================================================================
