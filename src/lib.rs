//! # serde_bof
//!
//! A compact, self-describing binary object format with Serde support.
//!
//! ## What is BOF?
//!
//! BOF packs a tree of dynamically typed values into a bit stream. Type tags
//! are 3 bits wide, integers use the fewest whole bytes that hold them, and
//! repeated strings are written once and referenced by index afterwards.
//! Small and repetitive documents come out a fraction of the size of their
//! JSON or XML text.
//!
//! ## Key Features
//!
//! - **Bit-packed**: tags, booleans and length selectors share bytes
//! - **String interning**: every repeated string or comment costs a few bits
//! - **Uniform lists**: homogeneous lists store the element tag once
//! - **Markup friendly**: attribute blocks and comments survive a round trip
//! - **Serde Compatible**: works with `#[derive(Serialize, Deserialize)]`
//! - **Adapters**: JSON, XML and CSV text converts to and from [`Value`] trees
//!
//! ## Quick Start
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use serde_bof::{from_slice, to_vec};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct User {
//!     id: u32,
//!     name: String,
//!     active: bool,
//! }
//!
//! let user = User {
//!     id: 123,
//!     name: "Alice".to_string(),
//!     active: true,
//! };
//!
//! let bytes = to_vec(&user).unwrap();
//! let user_back: User = from_slice(&bytes).unwrap();
//! assert_eq!(user, user_back);
//! ```
//!
//! ### Dynamic Values
//!
//! ```rust
//! use serde_bof::{bof, decode, encode};
//!
//! let data = bof!({
//!     "name": "Alice",
//!     "tags": ["rust", "serde", "rust"]
//! });
//!
//! let bytes = encode(&data).unwrap();
//! assert_eq!(decode(&bytes).unwrap(), data);
//! ```
//!
//! ### Converting Text Formats
//!
//! ```rust
//! use serde_bof::adapter::json;
//!
//! let bytes = json::encode_str(r#"{"a": [1, 2.5, "x"]}"#).unwrap();
//! let text = json::decode_to_string(&bytes).unwrap();
//! assert!(text.contains("2.5"));
//! ```
//!
//! ## Safety Guarantees
//!
//! - No `unsafe` code blocks
//! - Every read is bounds-checked; truncated or corrupt input is an error, not a panic
//! - Nesting depth is capped while decoding (see [`DecodeOptions`])
//! - Counts read from the input never drive allocation beyond the input size,
//!   and their total is capped by [`DecodeOptions::max_items`]

pub mod adapter;
pub mod bits;
pub mod de;
pub mod decode;
pub mod encode;
pub mod error;
pub mod macros;
pub mod map;
pub mod options;
pub mod ser;
mod strings;
pub mod value;
pub mod varint;

pub use adapter::Adapter;
pub use de::ValueDeserializer;
pub use decode::Decoder;
pub use encode::Encoder;
pub use error::{Error, Result};
pub use map::BofMap;
pub use options::{DecodeOptions, EncodeOptions};
pub use ser::ValueSerializer;
pub use value::{Kind, Value};

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Encode a [`Value`] tree to bytes.
///
/// # Examples
///
/// ```rust
/// use serde_bof::{encode, Value};
///
/// assert_eq!(encode(&Value::Empty).unwrap(), vec![0]);
/// assert_eq!(encode(&Value::from(true)).unwrap(), vec![0b1001]);
/// ```
///
/// # Errors
///
/// Returns an error for a uniform list whose items differ in kind, or a
/// comment entry that carries a value.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn encode(value: &Value) -> Result<Vec<u8>> {
    encode_with_options(value, EncodeOptions::default())
}

/// Encode a [`Value`] tree to bytes with custom options.
///
/// # Errors
///
/// Same as [`encode`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn encode_with_options(value: &Value, options: EncodeOptions) -> Result<Vec<u8>> {
    let mut encoder = Encoder::with_options(options);
    encoder.write_value(value)?;
    Ok(encoder.finish())
}

/// Decode bytes to a [`Value`] tree.
///
/// # Examples
///
/// ```rust
/// use serde_bof::{decode, Value};
///
/// assert_eq!(decode(&[0b1001]).unwrap(), Value::Bool(true));
/// assert!(decode(&[]).is_err());
/// ```
///
/// # Errors
///
/// Returns an error if the input is truncated, malformed, nested too deeply or
/// followed by trailing bytes.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn decode(data: &[u8]) -> Result<Value> {
    decode_with_options(data, DecodeOptions::default())
}

/// Decode bytes to a [`Value`] tree with custom options.
///
/// # Errors
///
/// Same as [`decode`], subject to the given options.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn decode_with_options(data: &[u8], options: DecodeOptions) -> Result<Value> {
    let mut decoder = Decoder::with_options(data, options);
    let value = decoder.read_value()?;
    decoder.finish()?;
    Ok(value)
}

/// Convert any `T: Serialize` to a [`Value`].
///
/// # Examples
///
/// ```rust
/// use serde_bof::{to_value, Value};
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Point { x: i32, y: i32 }
///
/// let value: Value = to_value(&Point { x: 1, y: 2 }).unwrap();
/// assert!(value.is_map());
/// ```
///
/// # Errors
///
/// Returns an error if the value cannot be serialized.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_value<T>(value: &T) -> Result<Value>
where
    T: ?Sized + Serialize,
{
    value.serialize(ValueSerializer)
}

/// Serialize any `T: Serialize` to bytes.
///
/// # Examples
///
/// ```rust
/// use serde_bof::to_vec;
///
/// let bytes = to_vec(&vec!["a", "b", "a"]).unwrap();
/// assert!(!bytes.is_empty());
/// ```
///
/// # Errors
///
/// Returns an error if the value cannot be serialized.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_vec<T>(value: &T) -> Result<Vec<u8>>
where
    T: ?Sized + Serialize,
{
    encode(&to_value(value)?)
}

/// Deserialize an instance of type `T` from a [`Value`].
///
/// # Errors
///
/// Returns an error if the value's shape does not match `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_value<T>(value: Value) -> Result<T>
where
    T: DeserializeOwned,
{
    T::deserialize(ValueDeserializer::new(value))
}

/// Deserialize an instance of type `T` from encoded bytes.
///
/// # Examples
///
/// ```rust
/// use serde_bof::{from_slice, to_vec};
/// use std::collections::BTreeMap;
///
/// let mut scores = BTreeMap::new();
/// scores.insert("alice".to_string(), 3u8);
/// let bytes = to_vec(&scores).unwrap();
/// let back: BTreeMap<String, u8> = from_slice(&bytes).unwrap();
/// assert_eq!(back, scores);
/// ```
///
/// # Errors
///
/// Returns an error if the bytes do not decode or do not match `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice<T>(data: &[u8]) -> Result<T>
where
    T: DeserializeOwned,
{
    from_value(decode(data)?)
}
