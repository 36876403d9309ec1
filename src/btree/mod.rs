//! An order-configurable, in-memory B-tree.
//!
//! [`BTree`] keeps key-value entries sorted under a caller-supplied
//! [`Comparator`] and supports `O(log n)` lookup, insertion and deletion.
//! The order (maximum number of children per node) is chosen at
//! construction; larger orders give shallower, wider trees.
//!
//! - [`BTree`]: the tree, with insert-with-split and delete-with-rebalance
//! - [`Cursor`]: a stateful bidirectional position over the entries
//! - [`Iter`], [`Keys`], [`Values`]: std iterators built from two cursors
//! - [`BTreeConfig`]: order and node pool size
//!
//! # Node Storage
//!
//! Nodes live in an arena owned by the tree and refer to each other by index.
//! A child's link to its parent is an index too, so navigation upward needs no
//! reference counting and no stack. Nodes freed by merges and by
//! [`BTree::clear`] are kept on a bounded free list and reused by later
//! splits.
//!
//! # Examples
//!
//! ```rust
//! use arbor::btree::BTree;
//!
//! let mut tree = BTree::new(3).unwrap();
//! for (key, value) in [(5, "e"), (3, "c"), (8, "h"), (1, "a")] {
//!     tree.put(key, value);
//! }
//!
//! assert_eq!(tree.get(&3), Some(&"c"));
//! assert_eq!(tree.delete(&5), Some("e"));
//!
//! let descending: Vec<&i32> = tree.keys().rev().collect();
//! assert_eq!(descending, vec![&8, &3, &1]);
//!
//! let mut cursor = tree.cursor();
//! assert!(cursor.next_to(|key, _| *key > 2));
//! assert_eq!(cursor.value(), &"c");
//! ```

mod comparator;
mod config;
mod cursor;
mod error;
mod node;
mod pool;
#[cfg(feature = "serde")]
mod serialization;
mod tree;

pub use comparator::{Comparator, NaturalOrder, Reversed};
pub use config::{BTreeConfig, DEFAULT_FREE_LIST_CAPACITY, DEFAULT_ORDER, MIN_ORDER};
pub use cursor::{Cursor, Iter, Keys, Values};
pub use error::{BTreeError, Result};
pub use tree::{BTree, IntoIter};
