//! Bidirectional map kept as two B-trees.
//!
//! [`TreeBidiMap`] is a one-to-one mapping: every key has one value and
//! every value one key. Lookups work in both directions and both directions
//! iterate in sorted order.
//!
//! # Examples
//!
//! ```rust
//! use arbor::collections::TreeBidiMap;
//!
//! let mut codes = TreeBidiMap::new();
//! codes.insert("de", 49);
//! codes.insert("fr", 33);
//!
//! assert_eq!(codes.get(&"fr"), Some(&33));
//! assert_eq!(codes.get_key(&49), Some(&"de"));
//!
//! // re-binding a value moves it to the new key
//! codes.insert("at", 49);
//! assert_eq!(codes.get(&"de"), None);
//! assert_eq!(codes.len(), 2);
//! ```

use std::fmt;

use crate::btree::{BTree, BTreeError, Iter, Result};

/// A sorted one-to-one map between keys and values.
///
/// Both `K` and `V` are stored twice, once in each direction, so both need
/// [`Clone`] and [`Ord`].
#[derive(Clone, PartialEq, Eq)]
pub struct TreeBidiMap<K, V> {
    forward: BTree<K, V>,
    inverse: BTree<V, K>,
}

impl<K: Ord + Clone, V: Ord + Clone> TreeBidiMap<K, V> {
    /// Creates an empty map with the default order in both directions.
    #[must_use]
    pub fn new() -> Self {
        Self {
            forward: BTree::default(),
            inverse: BTree::default(),
        }
    }

    /// Creates an empty map whose trees have the given order.
    ///
    /// # Errors
    ///
    /// Returns [`BTreeError::InvalidOrder`] if `order < 2`.
    pub fn with_order(order: usize) -> Result<Self> {
        Ok(Self {
            forward: BTree::new(order)?,
            inverse: BTree::new(order)?,
        })
    }

    /// Binds `key` and `value` to each other.
    ///
    /// Any existing mapping of `key` and any existing mapping of `value` is
    /// removed first. Returns the value `key` was previously bound to.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let previous = self.remove(&key);
        self.remove_value(&value);
        self.inverse.put(value.clone(), key.clone());
        self.forward.put(key, value);
        previous
    }

    /// Like [`insert`](Self::insert), but refuses to move a value away from
    /// another key.
    ///
    /// # Errors
    ///
    /// Returns [`BTreeError::DuplicateValue`] if `value` is already bound to
    /// a key other than `key`. The map is left unchanged.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use arbor::btree::BTreeError;
    /// use arbor::collections::TreeBidiMap;
    ///
    /// let mut map = TreeBidiMap::new();
    /// map.try_insert(1, 'a').unwrap();
    /// assert_eq!(map.try_insert(2, 'a'), Err(BTreeError::DuplicateValue));
    /// assert_eq!(map.try_insert(1, 'a'), Ok(Some('a')));
    /// ```
    pub fn try_insert(&mut self, key: K, value: V) -> Result<Option<V>> {
        match self.inverse.get(&value) {
            Some(bound) if *bound != key => Err(BTreeError::DuplicateValue),
            _ => Ok(self.insert(key, value)),
        }
    }

    /// The value bound to `key`.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<&V> {
        self.forward.get(key)
    }

    /// The key bound to `value`.
    #[must_use]
    pub fn get_key(&self, value: &V) -> Option<&K> {
        self.inverse.get(value)
    }

    /// Returns `true` if `key` is bound.
    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.forward.contains(key)
    }

    /// Returns `true` if `value` is bound.
    #[must_use]
    pub fn contains_value(&self, value: &V) -> bool {
        self.inverse.contains(value)
    }

    /// Unbinds `key`, returning its value.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let value = self.forward.delete(key)?;
        self.inverse.delete(&value);
        Some(value)
    }

    /// Unbinds `value`, returning its key.
    pub fn remove_value(&mut self, value: &V) -> Option<K> {
        let key = self.inverse.delete(value)?;
        self.forward.delete(&key);
        Some(key)
    }
}

impl<K, V> TreeBidiMap<K, V> {
    /// Number of key-value pairs.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.forward.len()
    }

    /// Returns `true` if no pairs are bound.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    /// Removes every pair.
    pub fn clear(&mut self) {
        self.forward.clear();
        self.inverse.clear();
    }

    /// Iterates over `(key, value)` pairs in ascending key order.
    #[inline]
    pub const fn iter(&self) -> Iter<'_, K, V> {
        self.forward.iter()
    }

    /// Iterates over `(value, key)` pairs in ascending value order.
    #[inline]
    pub const fn iter_by_value(&self) -> Iter<'_, V, K> {
        self.inverse.iter()
    }
}

impl<K: Ord + Clone, V: Ord + Clone> Default for TreeBidiMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord + Clone, V: Ord + Clone> FromIterator<(K, V)> for TreeBidiMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

impl<'a, K, V> IntoIterator for &'a TreeBidiMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for TreeBidiMap<K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.forward, formatter)
    }
}

impl<K: fmt::Display, V: fmt::Display> fmt::Display for TreeBidiMap<K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.forward, formatter)
    }
}

static_assertions::assert_impl_all!(TreeBidiMap<String, u64>: Send, Sync, Clone, Default);
