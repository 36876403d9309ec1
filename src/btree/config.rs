//! Construction parameters for [`BTree`](super::BTree).

use super::error::{BTreeError, Result};

/// Maximum number of children per node used when no order is given.
pub const DEFAULT_ORDER: usize = 32;

/// Number of retired nodes a tree keeps for reuse by default.
pub const DEFAULT_FREE_LIST_CAPACITY: usize = 64;

/// Smallest order accepted by the constructors.
pub const MIN_ORDER: usize = 2;

/// Smallest order a tree actually runs with. An overflowing order-2 node
/// holds two entries, which cannot be split into a median and two
/// non-empty halves, so order 2 is promoted to this value.
pub(crate) const MIN_EFFECTIVE_ORDER: usize = 3;

/// Tunables for a B-tree.
///
/// # Examples
///
/// ```rust
/// use arbor::btree::{BTree, BTreeConfig, NaturalOrder};
///
/// let config = BTreeConfig::default()
///     .with_order(5)
///     .with_free_list_capacity(8);
/// let mut tree: BTree<i32, &str> = BTree::with_config(config, NaturalOrder).unwrap();
/// tree.put(1, "one");
/// assert_eq!(tree.order(), 5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BTreeConfig {
    /// Maximum number of children per node.
    pub order: usize,
    /// Upper bound on retired nodes kept for reuse.
    pub free_list_capacity: usize,
}

impl BTreeConfig {
    /// Creates a configuration with the given order and the default pool size.
    #[inline]
    #[must_use]
    pub const fn new(order: usize) -> Self {
        Self {
            order,
            free_list_capacity: DEFAULT_FREE_LIST_CAPACITY,
        }
    }

    /// Replaces the order.
    #[inline]
    #[must_use]
    pub const fn with_order(mut self, order: usize) -> Self {
        self.order = order;
        self
    }

    /// Replaces the free list capacity. Zero disables node reuse.
    #[inline]
    #[must_use]
    pub const fn with_free_list_capacity(mut self, capacity: usize) -> Self {
        self.free_list_capacity = capacity;
        self
    }

    /// Checks the order and returns the one the tree will run with.
    ///
    /// # Errors
    ///
    /// Returns [`BTreeError::InvalidOrder`] if `order < 2`.
    pub(crate) fn effective_order(&self) -> Result<usize> {
        if self.order < MIN_ORDER {
            return Err(BTreeError::InvalidOrder { order: self.order });
        }
        Ok(self.order.max(MIN_EFFECTIVE_ORDER))
    }
}

impl Default for BTreeConfig {
    fn default() -> Self {
        Self::new(DEFAULT_ORDER)
    }
}
