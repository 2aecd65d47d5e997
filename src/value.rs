//! Dynamic value representation for binary object data.
//!
//! This module provides the [`Value`] enum, the tree every encode starts from and
//! every decode produces, and [`Kind`], its discriminant. Kinds double as the
//! numeric type tags written on the wire.
//!
//! ## Core Types
//!
//! - [`Value`]: one of the eleven kinds (empty, bool, integer, real, bytes,
//!   utf8, list, uniform list, map, properties, comment)
//! - [`Kind`]: the discriminant, with its wire code
//!
//! ## Usage Patterns
//!
//! ### Creating Values
//!
//! ```rust
//! use serde_bof::{bof, Value};
//!
//! let empty = Value::Empty;
//! let boolean = Value::from(true);
//! let number = Value::from(42);
//! let text = Value::from("hello");
//!
//! let map = bof!({
//!     "name": "Alice",
//!     "age": 30
//! });
//! assert!(map.is_map());
//! ```
//!
//! ### Extracting Values
//!
//! ```rust
//! use serde_bof::Value;
//! use std::convert::TryFrom;
//!
//! let value = Value::from(42);
//! let num: i64 = i64::try_from(value).unwrap();
//! assert_eq!(num, 42);
//! ```

use crate::{BofMap, Error, Result};
use num_bigint::BigInt;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// The discriminant of [`Value`], carrying the numeric type tag used on the wire.
///
/// # Examples
///
/// ```rust
/// use serde_bof::Kind;
///
/// assert_eq!(Kind::Utf8.code(), 5);
/// assert_eq!(Kind::from_code(8), Some(Kind::Map));
/// assert_eq!(Kind::from_code(11), None);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    Empty,
    Bool,
    Integer,
    Real,
    Bytes,
    Utf8,
    List,
    UniformList,
    Map,
    Properties,
    Comment,
}

impl Kind {
    /// Every kind, in tag order.
    pub const ALL: [Kind; 11] = [
        Kind::Empty,
        Kind::Bool,
        Kind::Integer,
        Kind::Real,
        Kind::Bytes,
        Kind::Utf8,
        Kind::List,
        Kind::UniformList,
        Kind::Map,
        Kind::Properties,
        Kind::Comment,
    ];

    /// The numeric type tag for this kind.
    #[inline]
    #[must_use]
    pub const fn code(self) -> u64 {
        match self {
            Kind::Empty => 0,
            Kind::Bool => 1,
            Kind::Integer => 2,
            Kind::Real => 3,
            Kind::Bytes => 4,
            Kind::Utf8 => 5,
            Kind::List => 6,
            Kind::UniformList => 7,
            Kind::Map => 8,
            Kind::Properties => 9,
            Kind::Comment => 10,
        }
    }

    /// Looks up the kind for a numeric type tag.
    #[must_use]
    pub fn from_code(code: u64) -> Option<Kind> {
        usize::try_from(code)
            .ok()
            .and_then(|index| Kind::ALL.get(index).copied())
    }

    /// Returns `true` for kinds that hold other values.
    #[inline]
    #[must_use]
    pub const fn is_container(self) -> bool {
        matches!(
            self,
            Kind::List | Kind::UniformList | Kind::Map | Kind::Properties
        )
    }

    /// Lowercase name used in messages.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Kind::Empty => "empty",
            Kind::Bool => "bool",
            Kind::Integer => "integer",
            Kind::Real => "real",
            Kind::Bytes => "bytes",
            Kind::Utf8 => "utf8",
            Kind::List => "list",
            Kind::UniformList => "uniform list",
            Kind::Map => "map",
            Kind::Properties => "properties",
            Kind::Comment => "comment",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A dynamically-typed binary object value.
///
/// `Map` keeps its entries in wire order, duplicates included; use
/// [`Value::to_merged_map`] for a keyed view. A `Map` entry whose key is a
/// `Comment` is a comment entry: its value slot is never written and decodes
/// as `Empty`.
///
/// `Properties` is the attribute block that precedes a value on the wire; in
/// the tree it wraps the value it annotates.
///
/// # Examples
///
/// ```rust
/// use serde_bof::{Kind, Value};
///
/// let attrs = Value::Properties {
///     entries: vec![(Value::from("k"), Value::from("v"))],
///     value: Box::new(Value::from("text")),
/// };
/// assert_eq!(attrs.kind(), Kind::Properties);
/// assert_eq!(attrs.annotated().as_str(), Some("text"));
/// ```
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Value {
    #[default]
    Empty,
    Bool(bool),
    Integer(BigInt),
    Real(f64),
    Bytes(Vec<u8>),
    Utf8(String),
    List(Vec<Value>),
    UniformList {
        kind: Kind,
        items: Vec<Value>,
    },
    Map(Vec<(Value, Value)>),
    Properties {
        entries: Vec<(Value, Value)>,
        value: Box<Value>,
    },
    Comment(String),
}

impl Value {
    /// The discriminant of this value.
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> Kind {
        match self {
            Value::Empty => Kind::Empty,
            Value::Bool(_) => Kind::Bool,
            Value::Integer(_) => Kind::Integer,
            Value::Real(_) => Kind::Real,
            Value::Bytes(_) => Kind::Bytes,
            Value::Utf8(_) => Kind::Utf8,
            Value::List(_) => Kind::List,
            Value::UniformList { .. } => Kind::UniformList,
            Value::Map(_) => Kind::Map,
            Value::Properties { .. } => Kind::Properties,
            Value::Comment(_) => Kind::Comment,
        }
    }

    /// Builds a uniform list, checking that every item has the declared kind.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_bof::{Kind, Value};
    ///
    /// let ok = Value::uniform(Kind::Integer, vec![Value::from(5), Value::from(0)]);
    /// assert!(ok.is_ok());
    ///
    /// let mixed = Value::uniform(Kind::Integer, vec![Value::from(5), Value::from("x")]);
    /// assert!(mixed.is_err());
    /// ```
    pub fn uniform(kind: Kind, items: Vec<Value>) -> Result<Value> {
        if let Some(bad) = items.iter().find(|item| item.kind() != kind) {
            return Err(Error::UniformListMismatch {
                expected: kind,
                found: bad.kind(),
            });
        }
        Ok(Value::UniformList { kind, items })
    }

    /// Returns `true` if the value is empty.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Value::Empty)
    }

    /// Returns `true` if the value is a boolean.
    #[inline]
    #[must_use]
    pub const fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    /// Returns `true` if the value is an integer.
    #[inline]
    #[must_use]
    pub const fn is_integer(&self) -> bool {
        matches!(self, Value::Integer(_))
    }

    /// Returns `true` if the value is a real number.
    #[inline]
    #[must_use]
    pub const fn is_real(&self) -> bool {
        matches!(self, Value::Real(_))
    }

    /// Returns `true` if the value is a UTF-8 string.
    #[inline]
    #[must_use]
    pub const fn is_string(&self) -> bool {
        matches!(self, Value::Utf8(_))
    }

    /// Returns `true` if the value is a list or a uniform list.
    #[inline]
    #[must_use]
    pub const fn is_list(&self) -> bool {
        matches!(self, Value::List(_) | Value::UniformList { .. })
    }

    /// Returns `true` if the value is a map.
    #[inline]
    #[must_use]
    pub const fn is_map(&self) -> bool {
        matches!(self, Value::Map(_))
    }

    /// Returns `true` if the value is a comment.
    #[inline]
    #[must_use]
    pub const fn is_comment(&self) -> bool {
        matches!(self, Value::Comment(_))
    }

    /// If the value is a boolean, returns it. Otherwise returns `None`.
    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// If the value is a string, returns a reference to it. Otherwise returns `None`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_bof::Value;
    ///
    /// assert_eq!(Value::from("hello").as_str(), Some("hello"));
    /// assert_eq!(Value::from(42).as_str(), None);
    /// ```
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Utf8(s) => Some(s),
            _ => None,
        }
    }

    /// If the value is an integer that fits in `i64`, returns it.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_bof::Value;
    ///
    /// assert_eq!(Value::from(42).as_i64(), Some(42));
    /// assert_eq!(Value::from(u64::MAX).as_i64(), None);
    /// ```
    #[inline]
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => i64::try_from(i).ok(),
            _ => None,
        }
    }

    /// If the value is an integer that fits in `u64`, returns it.
    #[inline]
    #[must_use]
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::Integer(i) => u64::try_from(i).ok(),
            _ => None,
        }
    }

    /// If the value is an integer, returns a reference to it.
    #[inline]
    #[must_use]
    pub fn as_bigint(&self) -> Option<&BigInt> {
        match self {
            Value::Integer(i) => Some(i),
            _ => None,
        }
    }

    /// If the value is a real number, returns it.
    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Real(f) => Some(*f),
            _ => None,
        }
    }

    /// If the value is a byte blob, returns it.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// If the value is a list or uniform list, returns its items.
    #[inline]
    #[must_use]
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) | Value::UniformList { items, .. } => Some(items),
            _ => None,
        }
    }

    /// If the value is a map, returns its entries in wire order.
    #[inline]
    #[must_use]
    pub fn as_entries(&self) -> Option<&[(Value, Value)]> {
        match self {
            Value::Map(entries) => Some(entries),
            _ => None,
        }
    }

    /// Skips any `Properties` wrappers and returns the value they annotate.
    #[must_use]
    pub fn annotated(&self) -> &Value {
        let mut current = self;
        while let Value::Properties { value, .. } = current {
            current = value;
        }
        current
    }

    /// Owned version of [`Value::annotated`].
    #[must_use]
    pub fn into_annotated(self) -> Value {
        let mut current = self;
        while let Value::Properties { value, .. } = current {
            current = *value;
        }
        current
    }

    /// Returns a keyed view of a map with duplicate keys fanned out into lists.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_bof::Value;
    ///
    /// let map = Value::Map(vec![
    ///     (Value::from("a"), Value::from(1)),
    ///     (Value::from("a"), Value::from(2)),
    /// ]);
    /// let merged = map.to_merged_map().unwrap();
    /// assert_eq!(
    ///     merged.get("a"),
    ///     Some(&Value::List(vec![Value::from(1), Value::from(2)]))
    /// );
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not a map or a key is a container.
    pub fn to_merged_map(&self) -> Result<BofMap> {
        match self.annotated() {
            Value::Map(entries) => BofMap::from_entries(entries.iter().cloned()),
            other => Err(Error::unsupported(format!(
                "expected map, found {}",
                other.kind()
            ))),
        }
    }

    /// Renders a scalar value as plain text, the way adapters print leaf content.
    ///
    /// Returns `None` for containers and comments.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_bof::Value;
    ///
    /// assert_eq!(Value::from(3.0).to_text().as_deref(), Some("3.0"));
    /// assert_eq!(Value::from(-7).to_text().as_deref(), Some("-7"));
    /// assert_eq!(Value::Empty.to_text().as_deref(), Some(""));
    /// ```
    #[must_use]
    pub fn to_text(&self) -> Option<String> {
        match self {
            Value::Empty => Some(String::new()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Integer(i) => Some(i.to_string()),
            Value::Real(f) => Some(format_real(*f)),
            Value::Bytes(b) => Some(to_hex(b)),
            Value::Utf8(s) => Some(s.clone()),
            Value::Properties { value, .. } => value.to_text(),
            _ => None,
        }
    }
}

/// Shortest round-trip formatting that keeps a `.0` on whole numbers.
pub(crate) fn format_real(f: f64) -> String {
    format!("{:?}", f)
}

pub(crate) fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Empty => write!(f, "empty"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Real(r) => write!(f, "{}", format_real(*r)),
            Value::Bytes(b) => write!(f, "0x{}", to_hex(b)),
            Value::Utf8(s) => write!(f, "{:?}", s),
            Value::List(items) => write_items(f, "[", items, "]"),
            Value::UniformList { kind, items } => {
                write!(f, "{}", kind)?;
                write_items(f, "[", items, "]")
            }
            Value::Map(entries) => write_entries(f, "{", entries, "}"),
            Value::Properties { entries, value } => {
                write_entries(f, "@{", entries, "}")?;
                write!(f, " {}", value)
            }
            Value::Comment(c) => write!(f, "<!--{}-->", c),
        }
    }
}

fn write_items(f: &mut fmt::Formatter<'_>, open: &str, items: &[Value], close: &str) -> fmt::Result {
    f.write_str(open)?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(",")?;
        }
        write!(f, "{}", item)?;
    }
    f.write_str(close)
}

fn write_entries(
    f: &mut fmt::Formatter<'_>,
    open: &str,
    entries: &[(Value, Value)],
    close: &str,
) -> fmt::Result {
    f.write_str(open)?;
    for (i, (key, value)) in entries.iter().enumerate() {
        if i > 0 {
            f.write_str(",")?;
        }
        if key.annotated().is_comment() {
            write!(f, "{}", key)?;
        } else {
            write!(f, "{}:{}", key, value)?;
        }
    }
    f.write_str(close)
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Empty | Value::Comment(_) => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Integer(i) => {
                if let Ok(v) = i64::try_from(i) {
                    serializer.serialize_i64(v)
                } else if let Ok(v) = u64::try_from(i) {
                    serializer.serialize_u64(v)
                } else if let Ok(v) = i128::try_from(i) {
                    serializer.serialize_i128(v)
                } else if let Ok(v) = u128::try_from(i) {
                    serializer.serialize_u128(v)
                } else {
                    serializer.serialize_str(&i.to_string())
                }
            }
            Value::Real(f) => serializer.serialize_f64(*f),
            Value::Bytes(b) => serializer.serialize_bytes(b),
            Value::Utf8(s) => serializer.serialize_str(s),
            Value::List(items) | Value::UniformList { items, .. } => {
                use serde::ser::SerializeSeq;
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Map(entries) => {
                use serde::ser::SerializeMap;
                let live = entries.iter().filter(|(k, _)| !k.annotated().is_comment());
                let mut map = serializer.serialize_map(Some(live.clone().count()))?;
                for (k, v) in live {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
            Value::Properties { value, .. } => value.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct ValueVisitor;

        impl<'de> Visitor<'de> for ValueVisitor {
            type Value = Value;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("any binary object value")
            }

            fn visit_bool<E>(self, value: bool) -> std::result::Result<Value, E> {
                Ok(Value::Bool(value))
            }

            fn visit_i64<E>(self, value: i64) -> std::result::Result<Value, E> {
                Ok(Value::from(value))
            }

            fn visit_i128<E>(self, value: i128) -> std::result::Result<Value, E> {
                Ok(Value::Integer(BigInt::from(value)))
            }

            fn visit_u64<E>(self, value: u64) -> std::result::Result<Value, E> {
                Ok(Value::from(value))
            }

            fn visit_u128<E>(self, value: u128) -> std::result::Result<Value, E> {
                Ok(Value::Integer(BigInt::from(value)))
            }

            fn visit_f64<E>(self, value: f64) -> std::result::Result<Value, E> {
                Ok(Value::Real(value))
            }

            fn visit_str<E>(self, value: &str) -> std::result::Result<Value, E> {
                Ok(Value::Utf8(value.to_string()))
            }

            fn visit_string<E>(self, value: String) -> std::result::Result<Value, E> {
                Ok(Value::Utf8(value))
            }

            fn visit_bytes<E>(self, value: &[u8]) -> std::result::Result<Value, E> {
                Ok(Value::Bytes(value.to_vec()))
            }

            fn visit_byte_buf<E>(self, value: Vec<u8>) -> std::result::Result<Value, E> {
                Ok(Value::Bytes(value))
            }

            fn visit_unit<E>(self) -> std::result::Result<Value, E> {
                Ok(Value::Empty)
            }

            fn visit_none<E>(self) -> std::result::Result<Value, E> {
                Ok(Value::Empty)
            }

            fn visit_some<D>(self, deserializer: D) -> std::result::Result<Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                Deserialize::deserialize(deserializer)
            }

            fn visit_seq<A>(self, mut seq: A) -> std::result::Result<Value, A::Error>
            where
                A: de::SeqAccess<'de>,
            {
                let mut vec = Vec::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(elem) = seq.next_element()? {
                    vec.push(elem);
                }
                Ok(Value::List(vec))
            }

            fn visit_map<A>(self, mut map: A) -> std::result::Result<Value, A::Error>
            where
                A: de::MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((key, value)) = map.next_entry()? {
                    entries.push((key, value));
                }
                Ok(Value::Map(entries))
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}

// TryFrom implementations for extracting values from Value
impl TryFrom<Value> for i64 {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Integer(i) => i64::try_from(&i)
                .map_err(|_| Error::custom(format!("integer {} out of range for i64", i))),
            _ => Err(Error::custom(format!(
                "expected integer, found {}",
                value.kind()
            ))),
        }
    }
}

impl TryFrom<Value> for f64 {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Real(f) => Ok(f),
            _ => Err(Error::custom(format!(
                "expected real, found {}",
                value.kind()
            ))),
        }
    }
}

impl TryFrom<Value> for bool {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Bool(b) => Ok(b),
            _ => Err(Error::custom(format!(
                "expected bool, found {}",
                value.kind()
            ))),
        }
    }
}

impl TryFrom<Value> for String {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Utf8(s) => Ok(s),
            _ => Err(Error::custom(format!(
                "expected utf8, found {}",
                value.kind()
            ))),
        }
    }
}

// From implementations for creating Value from primitives
impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

macro_rules! from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::Integer(BigInt::from(value))
                }
            }
        )*
    };
}

from_integer!(i8, i16, i32, i64, i128, u8, u16, u32, u64, u128, usize, isize);

impl From<BigInt> for Value {
    fn from(value: BigInt) -> Self {
        Value::Integer(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Real(f64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Real(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Utf8(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Utf8(value.to_string())
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Value::Bytes(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::List(value)
    }
}

impl From<BofMap> for Value {
    fn from(value: BofMap) -> Self {
        Value::Map(
            value
                .into_iter()
                .map(|(k, v)| (Value::Utf8(k), v))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::TryFrom;

    #[test]
    fn test_kind_codes() {
        for (code, kind) in Kind::ALL.iter().enumerate() {
            assert_eq!(kind.code(), code as u64);
            assert_eq!(Kind::from_code(code as u64), Some(*kind));
        }
        assert_eq!(Kind::from_code(11), None);
        assert_eq!(Kind::from_code(u64::MAX), None);
    }

    #[test]
    fn test_tryfrom_i64() {
        let value = Value::from(42);
        let result: i64 = TryFrom::try_from(value).unwrap();
        assert_eq!(result, 42);

        assert!(i64::try_from(Value::from(u64::MAX)).is_err());
        assert!(i64::try_from(Value::from("test")).is_err());
    }

    #[test]
    fn test_tryfrom_f64() {
        let result: f64 = TryFrom::try_from(Value::Real(3.5)).unwrap();
        assert_eq!(result, 3.5);
        assert!(f64::try_from(Value::from(1)).is_err());
    }

    #[test]
    fn test_tryfrom_bool_and_string() {
        assert!(bool::try_from(Value::Bool(true)).unwrap());
        assert!(bool::try_from(Value::from(1)).is_err());
        assert_eq!(String::try_from(Value::from("hello")).unwrap(), "hello");
        assert!(String::try_from(Value::Empty).is_err());
    }

    #[test]
    fn test_from_primitives() {
        assert_eq!(Value::from(true), Value::Bool(true));
        assert_eq!(Value::from(42i32), Value::Integer(BigInt::from(42)));
        assert_eq!(Value::from(3.5f64), Value::Real(3.5));
        assert_eq!(Value::from("test"), Value::Utf8("test".to_string()));
        assert_eq!(Value::from(vec![1u8, 2]), Value::Bytes(vec![1, 2]));
    }

    #[test]
    fn test_uniform_checks_kinds() {
        let err = Value::uniform(Kind::Integer, vec![Value::from(1), Value::Real(1.0)]).unwrap_err();
        assert_eq!(
            err,
            Error::UniformListMismatch {
                expected: Kind::Integer,
                found: Kind::Real
            }
        );
        assert!(Value::uniform(Kind::Empty, vec![]).is_ok());
    }

    #[test]
    fn test_annotated_skips_nested_properties() {
        let value = Value::Properties {
            entries: vec![],
            value: Box::new(Value::Properties {
                entries: vec![(Value::from("a"), Value::from(1))],
                value: Box::new(Value::from("x")),
            }),
        };
        assert_eq!(value.annotated(), &Value::from("x"));
        assert_eq!(value.into_annotated(), Value::from("x"));
    }

    #[test]
    fn test_to_text() {
        assert_eq!(Value::Real(2.5).to_text().unwrap(), "2.5");
        assert_eq!(Value::Real(1e300).to_text().unwrap(), "1e300");
        assert_eq!(Value::Bytes(vec![0xde, 0xad]).to_text().unwrap(), "dead");
        assert_eq!(Value::Bool(false).to_text().unwrap(), "false");
        assert_eq!(Value::List(vec![]).to_text(), None);
        assert_eq!(Value::Comment("c".into()).to_text(), None);
    }

    #[test]
    fn test_display() {
        let value = Value::Map(vec![
            (Value::from("a"), Value::List(vec![Value::from(1), Value::Empty])),
            (Value::Comment(" note ".into()), Value::Empty),
        ]);
        assert_eq!(value.to_string(), "{\"a\":[1,empty],<!-- note -->}");
    }

    #[test]
    fn test_serialize_skips_annotated_comment_keys() {
        let value = Value::Map(vec![
            (
                Value::Properties {
                    entries: vec![(Value::from("by"), Value::from("me"))],
                    value: Box::new(Value::Comment("note".into())),
                },
                Value::Empty,
            ),
            (Value::Comment("plain".into()), Value::Empty),
            (Value::from("a"), Value::from(1)),
        ]);
        assert_eq!(
            serde_json::to_value(&value).unwrap(),
            serde_json::json!({"a": 1})
        );
    }
}
