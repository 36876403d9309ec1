//! # arbor
//!
//! An in-memory B-tree whose order is chosen at construction, and the
//! ordered containers built on it.
//!
//! ## Overview
//!
//! - **B-tree engine** ([`btree`]): insert with node splitting, delete with
//!   borrowing and merging, a parent-linked node arena with a bounded free
//!   list, and cursors that walk forward and backward without a stack
//! - **Ordered containers** ([`collections`]): `TreeMap`, `TreeSet` and
//!   `TreeBidiMap`
//!
//! ## Feature Flags
//!
//! - `collections` (default): the ordered containers
//! - `serde`: `Serialize` / `Deserialize` for trees and containers
//! - `json`: `BTree::to_json` and `BTree::load_json` (implies `serde`)
//! - `full`: Enable all features
//!
//! ## Example
//!
//! ```rust
//! use arbor::prelude::*;
//!
//! let mut tree = BTree::new(3).unwrap();
//! for key in [5, 6, 7, 3, 4, 1, 2] {
//!     tree.put(key, key * 100);
//! }
//! assert_eq!(tree.height(), 3);
//! assert!(tree.check_invariants().is_ok());
//!
//! let mut cursor = tree.cursor();
//! cursor.end();
//! assert!(cursor.prev());
//! assert_eq!(cursor.entry(), (&7, &700));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Prelude module for convenient imports.
///
/// Re-exports commonly used types and traits.
///
/// # Usage
///
/// ```rust
/// use arbor::prelude::*;
/// ```
pub mod prelude {
    pub use crate::btree::{BTree, BTreeConfig, BTreeError, Comparator, NaturalOrder, Reversed};

    #[cfg(feature = "collections")]
    pub use crate::collections::*;
}

pub mod btree;

#[cfg(feature = "collections")]
pub mod collections;
