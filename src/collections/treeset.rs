//! Ordered set backed by [`BTree`].
//!
//! A [`TreeSet`] stores its elements as keys of a tree whose values are `()`.
//! Set algebra ([`union`](TreeSet::union), [`intersection`](TreeSet::intersection),
//! [`difference`](TreeSet::difference)) builds a new set with the receiver's
//! order and comparator.
//!
//! # Examples
//!
//! ```rust
//! use arbor::collections::TreeSet;
//!
//! let primes: TreeSet<u32> = [2, 3, 5, 7, 11].into_iter().collect();
//! let odds: TreeSet<u32> = (1..12).step_by(2).collect();
//!
//! let odd_primes = primes.intersection(&odds);
//! assert_eq!(format!("{odd_primes}"), "{3, 5, 7, 11}");
//! assert_eq!(primes.difference(&odds).first(), Some(&2));
//! ```

use std::fmt;
use std::iter::FromIterator;

use crate::btree::{BTree, Comparator, Keys, NaturalOrder, Result};

// =============================================================================
// TreeSet Definition
// =============================================================================

/// An ordered set of `T`.
#[derive(Clone)]
pub struct TreeSet<T, C = NaturalOrder> {
    tree: BTree<T, (), C>,
}

impl<T: Ord> TreeSet<T, NaturalOrder> {
    /// Creates an empty set with the default order.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            tree: BTree::with_default_order(NaturalOrder),
        }
    }

    /// Creates an empty set whose tree has the given order.
    ///
    /// # Errors
    ///
    /// Returns [`BTreeError::InvalidOrder`](crate::btree::BTreeError::InvalidOrder)
    /// if `order < 2`.
    pub fn with_order(order: usize) -> Result<Self> {
        Ok(Self {
            tree: BTree::new(order)?,
        })
    }
}

impl<T, C: Comparator<T>> TreeSet<T, C> {
    /// Creates an empty set ordered by `comparator`.
    #[must_use]
    pub const fn with_comparator(comparator: C) -> Self {
        Self {
            tree: BTree::with_default_order(comparator),
        }
    }

    /// Adds an element. Returns `true` if it was not already present.
    ///
    /// An element equal to a present one under the comparator is not stored
    /// twice; the set keeps the element inserted first.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use arbor::collections::TreeSet;
    ///
    /// let mut set = TreeSet::new();
    /// assert!(set.insert("a"));
    /// assert!(!set.insert("a"));
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn insert(&mut self, element: T) -> bool {
        if self.tree.contains(&element) {
            return false;
        }
        self.tree.put(element, ());
        true
    }

    /// Removes an element. Returns `true` if it was present.
    pub fn remove(&mut self, element: &T) -> bool {
        self.tree.delete(element).is_some()
    }

    /// Returns `true` if the set holds `element`.
    #[must_use]
    pub fn contains(&self, element: &T) -> bool {
        self.tree.contains(element)
    }
}

impl<T, C> TreeSet<T, C> {
    /// Returns the number of elements.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.tree.len()
    }

    /// Returns `true` if the set is empty.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Removes every element.
    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// The smallest element.
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.tree.first().map(|(element, _)| element)
    }

    /// The largest element.
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.tree.last().map(|(element, _)| element)
    }

    /// Iterates over the elements in ascending order.
    #[inline]
    pub const fn iter(&self) -> Keys<'_, T, ()> {
        self.tree.keys()
    }
}

impl<T: Clone, C: Comparator<T> + Clone> TreeSet<T, C> {
    /// Elements present in either set.
    ///
    /// ```rust
    /// use arbor::collections::TreeSet;
    ///
    /// let left: TreeSet<i32> = [1, 3].into_iter().collect();
    /// let right: TreeSet<i32> = [2, 3].into_iter().collect();
    /// let both = left.union(&right);
    /// let all: Vec<&i32> = both.iter().collect();
    /// assert_eq!(all, vec![&1, &2, &3]);
    /// ```
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        let mut result = self.clone();
        for element in other.iter() {
            result.insert(element.clone());
        }
        result
    }

    /// Elements present in both sets.
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Self {
        self.filtered(|element| other.contains(element))
    }

    /// Elements of `self` that are not in `other`.
    #[must_use]
    pub fn difference(&self, other: &Self) -> Self {
        self.filtered(|element| !other.contains(element))
    }

    fn filtered<P>(&self, mut keep: P) -> Self
    where
        P: FnMut(&T) -> bool,
    {
        let mut tree = self.tree.empty_like();
        for element in self.iter().filter(|element| keep(element)) {
            tree.put(element.clone(), ());
        }
        Self { tree }
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<T: Ord> Default for TreeSet<T, NaturalOrder> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Ord> FromIterator<T> for TreeSet<T, NaturalOrder> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<T, C: Comparator<T>> Extend<T> for TreeSet<T, C> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for element in iter {
            self.insert(element);
        }
    }
}

impl<'a, T, C> IntoIterator for &'a TreeSet<T, C> {
    type Item = &'a T;
    type IntoIter = Keys<'a, T, ()>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: PartialEq, C> PartialEq for TreeSet<T, C> {
    fn eq(&self, other: &Self) -> bool {
        self.tree == other.tree
    }
}

impl<T: Eq, C> Eq for TreeSet<T, C> {}

impl<T: fmt::Debug, C> fmt::Debug for TreeSet<T, C> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_set().entries(self.iter()).finish()
    }
}

impl<T: fmt::Display, C> fmt::Display for TreeSet<T, C> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{{")?;
        for (index, element) in self.iter().enumerate() {
            if index > 0 {
                write!(formatter, ", ")?;
            }
            write!(formatter, "{element}")?;
        }
        write!(formatter, "}}")
    }
}

#[cfg(feature = "serde")]
impl<T: serde::Serialize, C> serde::Serialize for TreeSet<T, C> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_seq(self.iter())
    }
}

#[cfg(feature = "serde")]
impl<'de, T> serde::Deserialize<'de> for TreeSet<T, NaturalOrder>
where
    T: serde::Deserialize<'de> + Ord,
{
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let elements = <Vec<T> as serde::Deserialize>::deserialize(deserializer)?;
        Ok(elements.into_iter().collect())
    }
}

static_assertions::assert_impl_all!(TreeSet<String>: Send, Sync, Clone, Default);

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::btree::Reversed;
    use rstest::{fixture, rstest};

    #[fixture]
    fn evens() -> TreeSet<i32> {
        (0..20).step_by(2).collect()
    }

    #[fixture]
    fn threes() -> TreeSet<i32> {
        (0..20).step_by(3).collect()
    }

    #[rstest]
    fn test_insert_and_contains() {
        let mut set = TreeSet::new();
        assert!(set.insert(5));
        assert!(set.insert(1));
        assert!(!set.insert(5));
        assert!(set.contains(&1));
        assert!(!set.contains(&2));
        assert_eq!(set.len(), 2);
    }

    #[rstest]
    fn test_remove(mut evens: TreeSet<i32>) {
        assert!(evens.remove(&4));
        assert!(!evens.remove(&4));
        assert!(!evens.remove(&5));
        assert_eq!(evens.len(), 9);
    }

    #[rstest]
    fn test_union(evens: TreeSet<i32>, threes: TreeSet<i32>) {
        let union = evens.union(&threes);
        let elements: Vec<i32> = union.iter().copied().collect();
        assert_eq!(elements, vec![0, 2, 3, 4, 6, 8, 9, 10, 12, 14, 15, 16, 18]);
    }

    #[rstest]
    fn test_intersection(evens: TreeSet<i32>, threes: TreeSet<i32>) {
        let both = evens.intersection(&threes);
        assert_eq!(format!("{both}"), "{0, 6, 12, 18}");
    }

    #[rstest]
    fn test_difference(evens: TreeSet<i32>, threes: TreeSet<i32>) {
        let only_evens = evens.difference(&threes);
        assert_eq!(format!("{only_evens:?}"), "{2, 4, 8, 10, 14, 16}");
        assert!(evens.difference(&evens).is_empty());
    }

    #[rstest]
    fn test_set_algebra_keeps_receiver_comparator() {
        let mut left = TreeSet::with_comparator(Reversed(NaturalOrder));
        left.extend([1, 2, 3]);
        let mut right = TreeSet::with_comparator(Reversed(NaturalOrder));
        right.extend([2, 3, 4]);
        let union_set = left.union(&right);
        let union: Vec<&i32> = union_set.iter().collect();
        assert_eq!(union, vec![&4, &3, &2, &1]);
        assert_eq!(left.intersection(&right).first(), Some(&3));
    }

    #[rstest]
    fn test_first_and_last(evens: TreeSet<i32>) {
        assert_eq!(evens.first(), Some(&0));
        assert_eq!(evens.last(), Some(&18));
        assert_eq!(TreeSet::<i32>::new().first(), None);
    }

    #[rstest]
    fn test_equality_ignores_insertion_order() {
        let forward: TreeSet<i32> = (0..10).collect();
        let backward: TreeSet<i32> = (0..10).rev().collect();
        assert_eq!(forward, backward);
    }
}

#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_serialize_as_sorted_sequence() {
        let set: TreeSet<i32> = [3, 1, 2].into_iter().collect();
        assert_eq!(serde_json::to_string(&set).unwrap(), "[1,2,3]");
    }

    #[rstest]
    fn test_deserialize_drops_duplicates() {
        let set: TreeSet<i32> = serde_json::from_str("[3,1,3,2]").unwrap();
        assert_eq!(set.len(), 3);
        assert_eq!(set.first(), Some(&1));
    }
}
