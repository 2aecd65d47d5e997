//! Serde deserialization out of [`Value`] trees.
//!
//! [`ValueDeserializer`] drives any `T: Deserialize` from a decoded
//! [`Value`]. Most users go through [`crate::from_slice`] or
//! [`crate::from_value`]:
//!
//! ```rust
//! use serde::Deserialize;
//! use serde_bof::{bof, from_value};
//!
//! #[derive(Deserialize, Debug, PartialEq)]
//! struct Data { x: i32, tags: Vec<String> }
//!
//! let data: Data = from_value(bof!({"x": 1, "tags": ["a", "b"]})).unwrap();
//! assert_eq!(data, Data { x: 1, tags: vec!["a".into(), "b".into()] });
//! ```
//!
//! ## Binary-specific shapes
//!
//! - `Properties` are transparent: the annotated value is deserialized.
//! - `Comment` values deserialize as unit, and comment entries in a map are
//!   skipped.
//! - Map pairs are visited in wire order. Repeated keys are passed through
//!   as-is; the receiving type decides what a repeat means.
//! - `Bytes` visit as a byte buffer, or as a sequence of integers when a
//!   sequence is requested.

use crate::{Error, Kind, Result, Value};
use serde::de::{self, Deserializer as _, IntoDeserializer};
use serde::forward_to_deserialize_any;

/// Deserializer that reads from an owned [`Value`].
pub struct ValueDeserializer {
    value: Value,
}

impl ValueDeserializer {
    #[must_use]
    pub fn new(value: Value) -> Self {
        ValueDeserializer {
            value: value.into_annotated(),
        }
    }
}

impl<'de> IntoDeserializer<'de, Error> for Value {
    type Deserializer = ValueDeserializer;

    fn into_deserializer(self) -> ValueDeserializer {
        ValueDeserializer::new(self)
    }
}

impl<'de> de::Deserializer<'de> for ValueDeserializer {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Empty | Value::Comment(_) => visitor.visit_unit(),
            Value::Bool(b) => visitor.visit_bool(b),
            Value::Integer(i) => {
                if let Ok(v) = i64::try_from(&i) {
                    visitor.visit_i64(v)
                } else if let Ok(v) = u64::try_from(&i) {
                    visitor.visit_u64(v)
                } else if let Ok(v) = i128::try_from(&i) {
                    visitor.visit_i128(v)
                } else if let Ok(v) = u128::try_from(&i) {
                    visitor.visit_u128(v)
                } else {
                    Err(Error::unsupported(format!(
                        "integer {} does not fit in 128 bits",
                        i
                    )))
                }
            }
            Value::Real(f) => visitor.visit_f64(f),
            Value::Bytes(b) => visitor.visit_byte_buf(b),
            Value::Utf8(s) => visitor.visit_string(s),
            Value::List(items) | Value::UniformList { items, .. } => {
                visitor.visit_seq(SeqDeserializer::new(items))
            }
            Value::Map(entries) => visitor.visit_map(MapDeserializer::new(entries)),
            Value::Properties { value, .. } => ValueDeserializer::new(*value).deserialize_any(visitor),
        }
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Empty | Value::Comment(_) => visitor.visit_none(),
            other => visitor.visit_some(ValueDeserializer::new(other)),
        }
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Bytes(bytes) => {
                let items = bytes.into_iter().map(Value::from).collect();
                visitor.visit_seq(SeqDeserializer::new(items))
            }
            other => ValueDeserializer::new(other).deserialize_any(visitor),
        }
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Utf8(variant) => visitor.visit_enum(EnumDeserializer::new(variant, None)),
            Value::Map(entries) => {
                let mut live = entries
                    .into_iter()
                    .filter(|(key, _)| !key.annotated().is_comment());
                match (live.next(), live.next()) {
                    (Some((key, value)), None) => match key.into_annotated() {
                        Value::Utf8(variant) => {
                            visitor.visit_enum(EnumDeserializer::new(variant, Some(value)))
                        }
                        other => Err(Error::custom(format!(
                            "enum variant name must be utf8, found {}",
                            other.kind()
                        ))),
                    },
                    _ => Err(Error::custom(
                        "enum must be a variant name or a map with a single entry",
                    )),
                }
            }
            other => Err(Error::custom(format!(
                "expected enum, found {}",
                other.kind()
            ))),
        }
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf unit unit_struct tuple
        tuple_struct map struct identifier ignored_any
    }
}

struct SeqDeserializer {
    iter: std::vec::IntoIter<Value>,
}

impl SeqDeserializer {
    fn new(vec: Vec<Value>) -> Self {
        SeqDeserializer {
            iter: vec.into_iter(),
        }
    }
}

impl<'de> de::SeqAccess<'de> for SeqDeserializer {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some(value) => seed.deserialize(ValueDeserializer::new(value)).map(Some),
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        match self.iter.size_hint() {
            (lower, Some(upper)) if lower == upper => Some(upper),
            _ => None,
        }
    }
}

struct MapDeserializer {
    iter: std::vec::IntoIter<(Value, Value)>,
    value: Option<Value>,
}

impl MapDeserializer {
    fn new(entries: Vec<(Value, Value)>) -> Self {
        let live: Vec<_> = entries
            .into_iter()
            .filter(|(key, _)| !key.annotated().is_comment())
            .collect();
        MapDeserializer {
            iter: live.into_iter(),
            value: None,
        }
    }
}

impl<'de> de::MapAccess<'de> for MapDeserializer {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some((key, value)) => {
                self.value = Some(value);
                seed.deserialize(KeyDeserializer::new(key)).map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'de>,
    {
        match self.value.take() {
            Some(value) => seed.deserialize(ValueDeserializer::new(value)),
            None => Err(Error::custom("next_value_seed called before next_key_seed")),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        match self.iter.size_hint() {
            (lower, Some(upper)) if lower == upper => Some(upper),
            _ => None,
        }
    }
}

/// Map keys: scalar keys may be requested as strings, so `{1: ..}` can fill a
/// `HashMap<String, _>` and `{"1": ..}` can fill a `HashMap<u32, _>`.
struct KeyDeserializer {
    key: Value,
}

impl KeyDeserializer {
    fn new(key: Value) -> Self {
        KeyDeserializer {
            key: key.into_annotated(),
        }
    }

    fn text(self) -> Result<String> {
        match self.key {
            Value::Utf8(s) => Ok(s),
            ref scalar if !scalar.kind().is_container() && scalar.kind() != Kind::Bytes => {
                scalar.to_text().ok_or_else(|| Error::custom("map key has no text form"))
            }
            other => Err(Error::custom(format!(
                "{} cannot be used as a map key",
                other.kind()
            ))),
        }
    }
}

macro_rules! deserialize_key_parsed {
    ($($method:ident => $visit:ident : $ty:ty),* $(,)?) => {
        $(
            fn $method<V>(self, visitor: V) -> Result<V::Value>
            where
                V: de::Visitor<'de>,
            {
                match self.key {
                    Value::Utf8(s) => match s.parse::<$ty>() {
                        Ok(v) => visitor.$visit(v),
                        Err(_) => Err(Error::custom(format!(
                            "map key {:?} is not a valid {}",
                            s,
                            stringify!($ty)
                        ))),
                    },
                    other => ValueDeserializer::new(other).$method(visitor),
                }
            }
        )*
    };
}

impl<'de> de::Deserializer<'de> for KeyDeserializer {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        ValueDeserializer::new(self.key).deserialize_any(visitor)
    }

    fn deserialize_str<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_string(self.text()?)
    }

    fn deserialize_string<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_string(self.text()?)
    }

    fn deserialize_identifier<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_string(self.text()?)
    }

    fn deserialize_enum<V>(
        self,
        name: &'static str,
        variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        ValueDeserializer::new(self.key).deserialize_enum(name, variants, visitor)
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    deserialize_key_parsed! {
        deserialize_bool => visit_bool: bool,
        deserialize_i8 => visit_i8: i8,
        deserialize_i16 => visit_i16: i16,
        deserialize_i32 => visit_i32: i32,
        deserialize_i64 => visit_i64: i64,
        deserialize_u8 => visit_u8: u8,
        deserialize_u16 => visit_u16: u16,
        deserialize_u32 => visit_u32: u32,
        deserialize_u64 => visit_u64: u64,
        deserialize_f32 => visit_f32: f32,
        deserialize_f64 => visit_f64: f64,
    }

    forward_to_deserialize_any! {
        i128 u128 char bytes byte_buf option unit unit_struct seq tuple
        tuple_struct map struct ignored_any
    }
}

struct EnumDeserializer {
    variant: String,
    value: Option<Value>,
}

impl EnumDeserializer {
    fn new(variant: String, value: Option<Value>) -> Self {
        EnumDeserializer { variant, value }
    }
}

impl<'de> de::EnumAccess<'de> for EnumDeserializer {
    type Error = Error;
    type Variant = VariantDeserializer;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self::Variant)>
    where
        V: de::DeserializeSeed<'de>,
    {
        let variant = seed.deserialize(ValueDeserializer::new(Value::Utf8(self.variant)))?;
        let visitor = VariantDeserializer { value: self.value };
        Ok((variant, visitor))
    }
}

struct VariantDeserializer {
    value: Option<Value>,
}

impl<'de> de::VariantAccess<'de> for VariantDeserializer {
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        match self.value.map(Value::into_annotated) {
            Some(Value::Empty) | None => Ok(()),
            _ => Err(Error::custom("expected unit variant")),
        }
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value>
    where
        T: de::DeserializeSeed<'de>,
    {
        match self.value {
            Some(value) => seed.deserialize(ValueDeserializer::new(value)),
            None => Err(Error::custom("expected newtype variant")),
        }
    }

    fn tuple_variant<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value.map(Value::into_annotated) {
            Some(Value::List(items)) | Some(Value::UniformList { items, .. }) => {
                visitor.visit_seq(SeqDeserializer::new(items))
            }
            _ => Err(Error::custom("expected tuple variant")),
        }
    }

    fn struct_variant<V>(self, _fields: &'static [&'static str], visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value.map(Value::into_annotated) {
            Some(Value::Map(entries)) => visitor.visit_map(MapDeserializer::new(entries)),
            _ => Err(Error::custom("expected struct variant")),
        }
    }
}
