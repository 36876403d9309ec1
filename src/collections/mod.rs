//! Ordered containers built on [`BTree`](crate::btree::BTree).
//!
//! - [`TreeMap`]: ordered map with floor and ceiling lookups
//! - [`TreeSet`]: ordered set with union, intersection and difference
//! - [`TreeBidiMap`]: sorted one-to-one map, searchable by key or by value
//!
//! Each container owns one tree (two for [`TreeBidiMap`]) with
//! [`DEFAULT_ORDER`](crate::btree::DEFAULT_ORDER) unless built with
//! `with_order`.
//!
//! # Examples
//!
//! ```rust
//! use arbor::collections::{TreeMap, TreeSet};
//!
//! let mut inventory: TreeMap<&str, u32> = TreeMap::with_order(4).unwrap();
//! inventory.insert("pears", 3);
//! inventory.insert("apples", 5);
//! assert_eq!(inventory.first(), Some((&"apples", &5)));
//!
//! let tags: TreeSet<&str> = ["rust", "btree", "rust"].into_iter().collect();
//! assert_eq!(tags.len(), 2);
//! ```

mod treebidimap;
mod treemap;
mod treeset;

pub use treebidimap::TreeBidiMap;
pub use treemap::TreeMap;
pub use treeset::TreeSet;
