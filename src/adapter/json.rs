//! JSON documents as `serde_json::Value` trees.
//!
//! Encoding maps null, booleans, numbers, strings, arrays and objects onto
//! `Empty`, `Bool`, `Integer`/`Real`, `Utf8`, `List` and `Map`, keeping object
//! key order. Decoding goes the other way with a few binary-only shapes
//! folded in:
//!
//! - `Properties` are skipped and `Comment` becomes `null`.
//! - Repeated map keys fan out into arrays (see [`crate::BofMap`]).
//! - `Bytes` and non-finite reals are rejected.
//!
//! Numbers keep their source text, so integers of any size read as `Integer`
//! and write back digit for digit.
//!
//! ```rust
//! use serde_bof::adapter::json;
//!
//! let bytes = json::encode_str(r#"{"b": 1, "a": [true, null, 0.1]}"#).unwrap();
//! assert_eq!(
//!     json::decode_to_string(&bytes).unwrap(),
//!     "{\n  \"b\": 1,\n  \"a\": [\n    true,\n    null,\n    0.1\n  ]\n}"
//! );
//! ```

use super::Adapter;
use crate::{BofMap, Error, Result, Value};
use num_bigint::BigInt;
use serde_json::{Map, Number};

/// Adapter between `serde_json::Value` and [`Value`].
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonAdapter;

impl Adapter for JsonAdapter {
    type Tree = serde_json::Value;

    fn encode_from(&self, tree: &serde_json::Value) -> Result<Value> {
        Ok(match tree {
            serde_json::Value::Null => Value::Empty,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => number_value(n)?,
            serde_json::Value::String(s) => Value::Utf8(s.clone()),
            serde_json::Value::Array(items) => Value::List(
                items
                    .iter()
                    .map(|item| self.encode_from(item))
                    .collect::<Result<_>>()?,
            ),
            serde_json::Value::Object(map) => Value::Map(
                map.iter()
                    .map(|(k, v)| Ok((Value::Utf8(k.clone()), self.encode_from(v)?)))
                    .collect::<Result<_>>()?,
            ),
        })
    }

    fn decode_into(&self, value: Value) -> Result<serde_json::Value> {
        Ok(match value.into_annotated() {
            Value::Empty | Value::Comment(_) => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(b),
            Value::Integer(i) => serde_json::Value::Number(integer_number(&i)?),
            Value::Real(f) => Number::from_f64(f)
                .map(serde_json::Value::Number)
                .ok_or_else(|| Error::unsupported(format!("JSON has no representation for {}", f)))?,
            Value::Bytes(_) => return Err(Error::unsupported("JSON cannot hold raw bytes")),
            Value::Utf8(s) => serde_json::Value::String(s),
            Value::List(items) | Value::UniformList { items, .. } => serde_json::Value::Array(
                items
                    .into_iter()
                    .map(|item| self.decode_into(item))
                    .collect::<Result<_>>()?,
            ),
            Value::Map(entries) => {
                let merged = BofMap::from_entries(entries)?;
                let mut object = Map::with_capacity(merged.len());
                for (key, value) in merged {
                    object.insert(key, self.decode_into(value)?);
                }
                serde_json::Value::Object(object)
            }
            // into_annotated never returns Properties
            Value::Properties { value, .. } => self.decode_into(*value)?,
        })
    }
}

fn number_value(n: &Number) -> Result<Value> {
    let text = n.to_string();
    if !text.contains(['.', 'e', 'E']) {
        if let Ok(i) = text.parse::<BigInt>() {
            return Ok(Value::Integer(i));
        }
    }
    n.as_f64()
        .filter(|f| f.is_finite())
        .map(Value::Real)
        .ok_or_else(|| Error::json(format!("number {} is out of range", n)))
}

fn integer_number(i: &BigInt) -> Result<Number> {
    Ok(serde_json::from_str(&i.to_string())?)
}

/// Parses JSON text and encodes it.
///
/// # Errors
///
/// Returns [`Error::Json`] if the text is not valid JSON.
pub fn encode_str(text: &str) -> Result<Vec<u8>> {
    let tree: serde_json::Value = serde_json::from_str(text)?;
    JsonAdapter.encode_tree(&tree)
}

/// Decodes bytes and renders them as pretty-printed JSON with 2-space indents.
///
/// # Errors
///
/// Returns an error if the bytes do not decode or hold a value JSON cannot
/// express.
pub fn decode_to_string(data: &[u8]) -> Result<String> {
    let tree = JsonAdapter.decode_tree(data)?;
    Ok(serde_json::to_string_pretty(&tree)?)
}
