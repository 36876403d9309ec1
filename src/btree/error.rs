//! Error types for the B-tree and the containers built on it.
//!
//! Only construction and the serialization boundary can fail. A missing key
//! is not an error: lookups and removals return `Option`. Calling
//! [`Cursor::key`](super::Cursor::key) on an unpositioned cursor is a
//! programmer error and panics instead of returning a value of this type.

use thiserror::Error;

/// Errors raised by the B-tree and its containers.
///
/// # Examples
///
/// ```rust
/// use arbor::btree::{BTree, BTreeError};
///
/// let error = BTree::<i32, i32>::new(1).unwrap_err();
/// assert_eq!(error, BTreeError::InvalidOrder { order: 1 });
/// assert_eq!(
///     error.to_string(),
///     "invalid order 1: a B-tree node needs room for at least 2 children"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BTreeError {
    /// The requested maximum number of children per node is below 2.
    #[error("invalid order {order}: a B-tree node needs room for at least 2 children")]
    InvalidOrder {
        /// The rejected order.
        order: usize,
    },

    /// Input handed to the JSON boundary could not be decoded.
    ///
    /// The target tree is left untouched when this is returned.
    #[error("failed to decode tree contents: {message}")]
    Serialization {
        /// Decoder message, including line and column when available.
        message: String,
    },

    /// A bidirectional map refused a value already bound to another key.
    #[error("value is already mapped to a different key")]
    DuplicateValue,
}

#[cfg(feature = "json")]
impl From<serde_json::Error> for BTreeError {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization {
            message: error.to_string(),
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, BTreeError>;
