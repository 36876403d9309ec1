//! Key ordering used by [`BTree`](super::BTree).
//!
//! A tree never orders keys by itself. It asks a [`Comparator`] for a
//! strict total order and treats `Ordering::Equal` as "same key": a `put`
//! of an equal key overwrites the stored value instead of adding a second
//! entry.
//!
//! Any closure `Fn(&K, &K) -> Ordering` is a comparator, and
//! [`NaturalOrder`] delegates to [`Ord`].
//!
//! # Examples
//!
//! ```rust
//! use arbor::btree::{BTree, Comparator, NaturalOrder};
//! use std::cmp::Ordering;
//!
//! assert_eq!(NaturalOrder.compare(&1, &2), Ordering::Less);
//!
//! // Case-insensitive keys: "Apple" and "apple" are the same key.
//! let mut tree = BTree::with_comparator(3, |left: &String, right: &String| {
//!     left.to_lowercase().cmp(&right.to_lowercase())
//! })
//! .unwrap();
//! tree.put("Apple".to_string(), 1);
//! tree.put("apple".to_string(), 2);
//! assert_eq!(tree.len(), 1);
//! assert_eq!(tree.get(&"APPLE".to_string()), Some(&2));
//! ```

use std::cmp::Ordering;

/// A strict total order over keys of type `K`.
///
/// Implementations must be antisymmetric and transitive. The tree relies on
/// this to keep entries sorted; an inconsistent comparator produces a tree
/// whose lookups may miss keys, but never memory unsafety.
pub trait Comparator<K: ?Sized> {
    /// Compares two keys.
    fn compare(&self, left: &K, right: &K) -> Ordering;
}

impl<K: ?Sized, F> Comparator<K> for F
where
    F: Fn(&K, &K) -> Ordering,
{
    #[inline]
    fn compare(&self, left: &K, right: &K) -> Ordering {
        self(left, right)
    }
}

/// The ordering given by the key type's [`Ord`] implementation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct NaturalOrder;

impl<K: Ord + ?Sized> Comparator<K> for NaturalOrder {
    #[inline]
    fn compare(&self, left: &K, right: &K) -> Ordering {
        left.cmp(right)
    }
}

/// Reverses another comparator.
///
/// ```rust
/// use arbor::btree::{BTree, NaturalOrder, Reversed};
///
/// let mut tree = BTree::with_comparator(4, Reversed(NaturalOrder)).unwrap();
/// for key in [1, 3, 2] {
///     tree.put(key, ());
/// }
/// let keys: Vec<&i32> = tree.keys().collect();
/// assert_eq!(keys, vec![&3, &2, &1]);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Reversed<C>(pub C);

impl<K: ?Sized, C: Comparator<K>> Comparator<K> for Reversed<C> {
    #[inline]
    fn compare(&self, left: &K, right: &K) -> Ordering {
        self.0.compare(right, left)
    }
}
