//! Keyed view of binary object maps.
//!
//! On the wire a map is an ordered run of `(key, value)` pairs and the same key
//! may appear more than once. [`BofMap`] is the keyed form consumers usually
//! want: an [`IndexMap`] from string keys to values that keeps first-seen key
//! order and fans repeated keys out into a list instead of overwriting.
//!
//! ## Examples
//!
//! ```rust
//! use serde_bof::{BofMap, Value};
//!
//! let map = BofMap::from_entries(vec![
//!     (Value::from("a"), Value::from(1)),
//!     (Value::from("b"), Value::from(true)),
//!     (Value::from("a"), Value::from(2)),
//! ])
//! .unwrap();
//!
//! assert_eq!(map.len(), 2);
//! assert_eq!(
//!     map.get("a"),
//!     Some(&Value::List(vec![Value::from(1), Value::from(2)]))
//! );
//! ```

use crate::{Error, Result, Value};
use indexmap::IndexMap;

/// An ordered map of string keys to values.
///
/// A thin wrapper around [`IndexMap`] that maintains insertion order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BofMap(IndexMap<String, Value>);

impl BofMap {
    /// Creates an empty `BofMap`.
    #[must_use]
    pub fn new() -> Self {
        BofMap(IndexMap::new())
    }

    /// Creates an empty `BofMap` with the specified capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        BofMap(IndexMap::with_capacity(capacity))
    }

    /// Builds a map from wire-order entries, fanning out duplicate keys.
    ///
    /// - Comment entries are dropped.
    /// - `Properties` around a key or value are skipped.
    /// - Scalar keys are rendered as text (`Empty` becomes `""`).
    /// - A repeated key appends to its value when that value is already a
    ///   list. Otherwise the value becomes a list of both values.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedValue`] if a key is a container or bytes.
    pub fn from_entries<I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (Value, Value)>,
    {
        let mut map = BofMap::new();
        for (key, value) in entries {
            let key = key.into_annotated();
            if key.is_comment() {
                continue;
            }
            let key = key_text(&key)?;
            map.merge(key, value.into_annotated());
        }
        Ok(map)
    }

    fn merge(&mut self, key: String, value: Value) {
        match self.0.get_mut(&key) {
            None => {
                self.0.insert(key, value);
            }
            Some(existing) => {
                let mut items = match std::mem::take(existing) {
                    Value::List(items) | Value::UniformList { items, .. } => items,
                    first => vec![first],
                };
                items.push(value);
                *existing = Value::List(items);
            }
        }
    }

    /// Inserts a key-value pair, returning the previous value for the key.
    pub fn insert(&mut self, key: String, value: Value) -> Option<Value> {
        self.0.insert(key, value)
    }

    /// Returns a reference to the value corresponding to the key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns the number of keys in the map.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the map contains no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over the keys of the map, in insertion order.
    pub fn keys(&self) -> indexmap::map::Keys<'_, String, Value> {
        self.0.keys()
    }

    /// Returns an iterator over the values of the map, in insertion order.
    pub fn values(&self) -> indexmap::map::Values<'_, String, Value> {
        self.0.values()
    }

    /// Returns an iterator over the key-value pairs of the map, in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Value> {
        self.0.iter()
    }
}

fn key_text(key: &Value) -> Result<String> {
    match key {
        Value::Utf8(s) => Ok(s.clone()),
        Value::Empty | Value::Bool(_) | Value::Integer(_) | Value::Real(_) => {
            Ok(key.to_text().unwrap_or_default())
        }
        other => Err(Error::unsupported(format!(
            "{} cannot be used as a map key",
            other.kind()
        ))),
    }
}

impl IntoIterator for BofMap {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a BofMap {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<(String, Value)> for BofMap {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        BofMap(IndexMap::from_iter(iter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(key: &str, value: i64) -> (Value, Value) {
        (Value::from(key), Value::from(value))
    }

    #[test]
    fn test_duplicate_keys_fan_out() {
        let map = BofMap::from_entries(vec![entry("a", 1), entry("a", 2), entry("a", 3)]).unwrap();
        assert_eq!(
            map.get("a"),
            Some(&Value::List(vec![
                Value::from(1),
                Value::from(2),
                Value::from(3)
            ]))
        );
    }

    #[test]
    fn test_existing_list_is_extended() {
        let map = BofMap::from_entries(vec![
            (
                Value::from("a"),
                Value::List(vec![Value::from(1), Value::from(2)]),
            ),
            entry("a", 3),
            (
                Value::from("b"),
                Value::uniform(crate::Kind::Bool, vec![Value::Bool(true)]).unwrap(),
            ),
            entry("b", 4),
        ])
        .unwrap();
        assert_eq!(
            map.get("a"),
            Some(&Value::List(vec![
                Value::from(1),
                Value::from(2),
                Value::from(3)
            ]))
        );
        assert_eq!(
            map.get("b"),
            Some(&Value::List(vec![Value::Bool(true), Value::from(4)]))
        );
    }

    #[test]
    fn test_key_order_is_first_seen() {
        let map = BofMap::from_entries(vec![entry("z", 1), entry("a", 2), entry("z", 3)]).unwrap();
        let keys: Vec<_> = map.keys().cloned().collect();
        assert_eq!(keys, vec!["z", "a"]);
    }

    #[test]
    fn test_scalar_keys_render_as_text() {
        let map = BofMap::from_entries(vec![
            (Value::from(7), Value::from("seven")),
            (Value::Bool(false), Value::from("no")),
            (Value::Empty, Value::from("blank")),
        ])
        .unwrap();
        assert_eq!(map.get("7"), Some(&Value::from("seven")));
        assert_eq!(map.get("false"), Some(&Value::from("no")));
        assert_eq!(map.get(""), Some(&Value::from("blank")));
    }

    #[test]
    fn test_comment_entries_dropped() {
        let map = BofMap::from_entries(vec![
            (Value::Comment("c".into()), Value::Empty),
            entry("a", 1),
        ])
        .unwrap();
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_container_key_rejected() {
        let err = BofMap::from_entries(vec![(Value::List(vec![]), Value::Empty)]).unwrap_err();
        assert!(matches!(err, Error::UnsupportedValue(_)));
    }
}
