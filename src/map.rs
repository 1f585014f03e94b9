//! Ordered map type for object nodes.
//!
//! [`DataMap`] wraps an [`IndexMap`] so that properties iterate in insertion
//! order. Order matters for iteration, for positional access to an object
//! (`get(0)` is the first property) and for the encoded byte stream; it does
//! not matter for equality.
//!
//! ## Examples
//!
//! ```rust
//! use generic_data::{DataMap, GenericData};
//!
//! let mut map = DataMap::new();
//! map.insert("name".to_string(), GenericData::from("Alice"));
//! map.insert("age".to_string(), GenericData::from(30));
//!
//! assert_eq!(map.len(), 2);
//! assert_eq!(map.keys().next().map(String::as_str), Some("name"));
//! ```

use crate::GenericData;
use indexmap::IndexMap;

/// An insertion-ordered map of property names to child nodes.
///
/// Equality compares entries regardless of order, which matches the
/// structural equality of [`GenericData`] objects.
///
/// # Examples
///
/// ```rust
/// use generic_data::{DataMap, GenericData};
///
/// let forward: DataMap = [
///     ("x".to_string(), GenericData::from(1)),
///     ("y".to_string(), GenericData::from(2)),
/// ]
/// .into_iter()
/// .collect();
/// let backward: DataMap = forward.clone().into_iter().rev().collect();
///
/// assert_eq!(forward, backward);
/// assert_eq!(backward.keys().next().map(String::as_str), Some("y"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataMap(IndexMap<String, GenericData>);

impl DataMap {
    /// Creates an empty `DataMap`.
    #[must_use]
    pub fn new() -> Self {
        DataMap(IndexMap::new())
    }

    /// Creates an empty `DataMap` with room for `capacity` properties.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        DataMap(IndexMap::with_capacity(capacity))
    }

    /// Inserts a property, keeping the position of an existing key.
    ///
    /// If the map already contained this key, the old node is returned.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use generic_data::{DataMap, GenericData};
    ///
    /// let mut map = DataMap::new();
    /// assert!(map.insert("key".to_string(), GenericData::from(42)).is_none());
    /// assert!(map.insert("key".to_string(), GenericData::from(43)).is_some());
    /// ```
    pub fn insert(&mut self, key: String, value: GenericData) -> Option<GenericData> {
        self.0.insert(key, value)
    }

    /// Returns the node stored under `key`.
    ///
    /// Unlike [`Data::get`](crate::Data::get), a miss is `None` rather than
    /// the null sentinel.
    ///
    /// ```rust
    /// use generic_data::{DataMap, GenericData};
    ///
    /// let mut map = DataMap::new();
    /// map.insert("k".to_string(), GenericData::from("v"));
    /// assert_eq!(map.get("k"), Some(&GenericData::from("v")));
    /// assert_eq!(map.get("missing"), None);
    /// ```
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&GenericData> {
        self.0.get(key)
    }

    /// Returns the node stored at insertion position `index`.
    ///
    /// ```rust
    /// use generic_data::{DataMap, GenericData};
    ///
    /// let mut map = DataMap::new();
    /// map.insert("b".to_string(), GenericData::from(2));
    /// map.insert("a".to_string(), GenericData::from(1));
    /// assert_eq!(map.get_index(0), Some(&GenericData::from(2)));
    /// assert_eq!(map.get_index(2), None);
    /// ```
    #[must_use]
    pub fn get_index(&self, index: usize) -> Option<&GenericData> {
        self.0.get_index(index).map(|(_, value)| value)
    }

    /// Returns the first inserted node for in-place writes.
    pub fn first_mut(&mut self) -> Option<&mut GenericData> {
        self.0.first_mut().map(|(_, value)| value)
    }

    /// Returns `true` if a property named `key` exists.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Returns the number of properties.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no properties. Object nodes never hold
    /// an empty map.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over the property names, in insertion order.
    pub fn keys(&self) -> indexmap::map::Keys<'_, String, GenericData> {
        self.0.keys()
    }

    /// Returns an iterator over the child nodes, in insertion order.
    pub fn values(&self) -> indexmap::map::Values<'_, String, GenericData> {
        self.0.values()
    }

    /// Returns an iterator over the properties, in insertion order.
    ///
    /// ```rust
    /// use generic_data::{data, Data};
    ///
    /// let node = data!({ "a": 1, "b": 2 });
    /// let total: i64 = node
    ///     .as_object()
    ///     .into_iter()
    ///     .flat_map(|map| map.iter())
    ///     .map(|(_, child)| child.get_i64().unwrap_or_default())
    ///     .sum();
    /// assert_eq!(total, 3);
    /// ```
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, GenericData> {
        self.0.iter()
    }
}

impl Default for DataMap {
    fn default() -> Self {
        Self::new()
    }
}

impl IntoIterator for DataMap {
    type Item = (String, GenericData);
    type IntoIter = indexmap::map::IntoIter<String, GenericData>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a DataMap {
    type Item = (&'a String, &'a GenericData);
    type IntoIter = indexmap::map::Iter<'a, String, GenericData>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<(String, GenericData)> for DataMap {
    fn from_iter<T: IntoIterator<Item = (String, GenericData)>>(iter: T) -> Self {
        DataMap(IndexMap::from_iter(iter))
    }
}
