//! Ordered map type for API objects.
//!
//! [`ApiMap`] wraps an [`IndexMap`] so objects decoded from Proxmox API
//! responses keep the field order they arrived in.
//!
//! ## Examples
//!
//! ```rust
//! use pve_conf::{ApiMap, ApiValue};
//!
//! let mut user = ApiMap::new();
//! user.insert("userid".to_string(), ApiValue::from("alice@pve"));
//! user.insert("enable".to_string(), ApiValue::from(1));
//!
//! assert_eq!(user.len(), 2);
//! assert_eq!(user.get("userid").and_then(|v| v.as_str()), Some("alice@pve"));
//! ```

use crate::ApiValue;
use indexmap::IndexMap;
use std::collections::HashMap;

/// An ordered map of string keys to API values.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ApiMap(IndexMap<String, ApiValue>);

impl ApiMap {
    /// Creates an empty `ApiMap`.
    #[must_use]
    pub fn new() -> Self {
        ApiMap(IndexMap::new())
    }

    /// Inserts a key-value pair, returning the previous value for the key.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pve_conf::{ApiMap, ApiValue};
    ///
    /// let mut map = ApiMap::new();
    /// assert!(map.insert("tokenid".to_string(), ApiValue::from("ci")).is_none());
    /// assert!(map.insert("tokenid".to_string(), ApiValue::from("deploy")).is_some());
    /// ```
    pub fn insert(&mut self, key: String, value: ApiValue) -> Option<ApiValue> {
        self.0.insert(key, value)
    }

    /// Returns a reference to the value corresponding to the key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ApiValue> {
        self.0.get(key)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over the keys of the map, in insertion order.
    pub fn keys(&self) -> indexmap::map::Keys<'_, String, ApiValue> {
        self.0.keys()
    }

    /// Returns an iterator over the values of the map, in insertion order.
    pub fn values(&self) -> indexmap::map::Values<'_, String, ApiValue> {
        self.0.values()
    }

    /// Returns an iterator over the key-value pairs of the map, in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, ApiValue> {
        self.0.iter()
    }
}

impl From<HashMap<String, ApiValue>> for ApiMap {
    fn from(map: HashMap<String, ApiValue>) -> Self {
        ApiMap(map.into_iter().collect())
    }
}

impl IntoIterator for ApiMap {
    type Item = (String, ApiValue);
    type IntoIter = indexmap::map::IntoIter<String, ApiValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ApiMap {
    type Item = (&'a String, &'a ApiValue);
    type IntoIter = indexmap::map::Iter<'a, String, ApiValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<(String, ApiValue)> for ApiMap {
    fn from_iter<T: IntoIterator<Item = (String, ApiValue)>>(iter: T) -> Self {
        ApiMap(IndexMap::from_iter(iter))
    }
}
