//! Serde support and the JSON boundary.
//!
//! A tree serializes as a map in ascending key order. Deserialization
//! rebuilds the tree by inserting entries one at a time; no node layout is
//! persisted, so the resulting shape depends only on the order and the keys.

use std::fmt;
use std::marker::PhantomData;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::comparator::{Comparator, NaturalOrder};
use super::tree::BTree;

impl<K, V, C> Serialize for BTree<K, V, C>
where
    K: Serialize,
    V: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

struct BTreeVisitor<K, V> {
    marker: PhantomData<fn() -> (K, V)>,
}

impl<'de, K, V> Visitor<'de> for BTreeVisitor<K, V>
where
    K: Deserialize<'de> + Ord,
    V: Deserialize<'de>,
{
    type Value = BTree<K, V, NaturalOrder>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut tree = BTree::default();
        while let Some((key, value)) = access.next_entry()? {
            tree.put(key, value);
        }
        Ok(tree)
    }
}

impl<'de, K, V> Deserialize<'de> for BTree<K, V, NaturalOrder>
where
    K: Deserialize<'de> + Ord,
    V: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(BTreeVisitor {
            marker: PhantomData,
        })
    }
}

// =============================================================================
// JSON
// =============================================================================

/// Map entries in input order, decoded before any tree is touched.
#[cfg(feature = "json")]
struct EntryList<K, V>(Vec<(K, V)>);

#[cfg(feature = "json")]
struct EntryListVisitor<K, V> {
    marker: PhantomData<fn() -> (K, V)>,
}

#[cfg(feature = "json")]
impl<'de, K, V> Visitor<'de> for EntryListVisitor<K, V>
where
    K: Deserialize<'de>,
    V: Deserialize<'de>,
{
    type Value = EntryList<K, V>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some(entry) = access.next_entry()? {
            entries.push(entry);
        }
        Ok(EntryList(entries))
    }
}

#[cfg(feature = "json")]
impl<'de, K, V> Deserialize<'de> for EntryList<K, V>
where
    K: Deserialize<'de>,
    V: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(EntryListVisitor {
            marker: PhantomData,
        })
    }
}

#[cfg(feature = "json")]
impl<K, V, C> BTree<K, V, C>
where
    K: Serialize,
    V: Serialize,
{
    /// Encodes the entries as a JSON object in ascending key order.
    ///
    /// # Errors
    ///
    /// Returns [`BTreeError::Serialization`](super::BTreeError::Serialization)
    /// if a key cannot be used as a JSON object key.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use arbor::btree::BTree;
    ///
    /// let mut tree = BTree::new(3).unwrap();
    /// tree.put("b", 2);
    /// tree.put("a", 1);
    /// assert_eq!(tree.to_json().unwrap(), r#"{"a":1,"b":2}"#);
    /// ```
    pub fn to_json(&self) -> super::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(feature = "json")]
impl<K, V, C> BTree<K, V, C>
where
    K: serde::de::DeserializeOwned,
    V: serde::de::DeserializeOwned,
    C: Comparator<K>,
{
    /// Replaces the contents with the entries of a JSON object.
    ///
    /// The whole input is decoded before the tree is modified. On error the
    /// tree keeps its previous contents. Duplicate keys in the input resolve
    /// to the last occurrence.
    ///
    /// # Errors
    ///
    /// Returns [`BTreeError::Serialization`](super::BTreeError::Serialization)
    /// if `json` is not an object of the expected key and value types.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use arbor::btree::BTree;
    ///
    /// let mut tree: BTree<String, i32> = BTree::new(3).unwrap();
    /// tree.put("stale".to_string(), 0);
    /// tree.load_json(r#"{"b":2,"a":1}"#).unwrap();
    /// assert_eq!(tree.len(), 2);
    /// assert_eq!(tree.first(), Some((&"a".to_string(), &1)));
    ///
    /// assert!(tree.load_json("[1, 2]").is_err());
    /// assert_eq!(tree.len(), 2);
    /// ```
    pub fn load_json(&mut self, json: &str) -> super::Result<()> {
        let EntryList(entries) = serde_json::from_str::<EntryList<K, V>>(json)?;
        self.clear();
        for (key, value) in entries {
            self.put(key, value);
        }
        tracing::debug!(entries = self.len(), "tree loaded from json");
        Ok(())
    }
}
