//! Conversions between text formats and [`Value`] trees.
//!
//! Each adapter pairs a native tree type with two conversions: into a
//! [`Value`] for encoding, and back out of a decoded [`Value`]. The codec
//! itself never sees text.
//!
//! - [`json::JsonAdapter`]: `serde_json::Value` trees
//! - [`markup::MarkupAdapter`]: XML element trees with comments
//! - [`tabular::TabularAdapter`]: comma-separated tables
//!
//! [`Format`] and [`convert`] tie them together by file extension.
//!
//! ```rust
//! use serde_bof::adapter::{convert, Format};
//!
//! let xml = convert(b"[1, 2]", Format::Json, Format::Markup);
//! assert!(xml.is_err()); // a markup root must be a single named element
//!
//! let csv = convert(b"[[1, 2], [3, \"x\"]]", Format::Json, Format::Tabular).unwrap();
//! assert_eq!(csv, b"1,2\n3,x");
//! ```

pub mod json;
pub mod markup;
pub mod tabular;

use crate::{Error, Result, Value};
use std::fmt;

/// A text representation that converts to and from [`Value`] trees.
pub trait Adapter {
    /// The native tree this adapter works on.
    type Tree;

    /// Builds the value tree to encode for `tree`.
    fn encode_from(&self, tree: &Self::Tree) -> Result<Value>;

    /// Rebuilds a native tree from a decoded value.
    fn decode_into(&self, value: Value) -> Result<Self::Tree>;

    /// Encodes `tree` straight to bytes.
    fn encode_tree(&self, tree: &Self::Tree) -> Result<Vec<u8>> {
        crate::encode(&self.encode_from(tree)?)
    }

    /// Decodes bytes straight to a native tree.
    fn decode_tree(&self, data: &[u8]) -> Result<Self::Tree> {
        self.decode_into(crate::decode(data)?)
    }
}

/// File formats understood by [`convert`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Json,
    Markup,
    Tabular,
    /// Already-encoded bytes, passed through verbatim.
    Binary,
}

impl Format {
    /// Looks up a format by file extension, ignoring case and a leading dot.
    ///
    /// ```rust
    /// use serde_bof::adapter::Format;
    ///
    /// assert_eq!(Format::from_extension(".XML"), Some(Format::Markup));
    /// assert_eq!(Format::from_extension("bf"), Some(Format::Binary));
    /// assert_eq!(Format::from_extension("yaml"), None);
    /// ```
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Format> {
        match ext.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "json" => Some(Format::Json),
            "xml" => Some(Format::Markup),
            "csv" => Some(Format::Tabular),
            "bf" => Some(Format::Binary),
            _ => None,
        }
    }

    /// Converts input in this format to encoded bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not UTF-8, does not parse, or holds a
    /// value the format cannot express.
    pub fn encode_input(self, input: &[u8]) -> Result<Vec<u8>> {
        match self {
            Format::Binary => Ok(input.to_vec()),
            Format::Json => json::encode_str(text(input)?),
            Format::Markup => markup::encode_str(text(input)?),
            Format::Tabular => tabular::encode_str(text(input)?),
        }
    }

    /// Converts encoded bytes to output in this format.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes do not decode or hold a value the format
    /// cannot express.
    pub fn decode_output(self, data: &[u8]) -> Result<Vec<u8>> {
        match self {
            Format::Binary => Ok(data.to_vec()),
            Format::Json => Ok(json::decode_to_string(data)?.into_bytes()),
            Format::Markup => Ok(markup::decode_to_string(data)?.into_bytes()),
            Format::Tabular => Ok(tabular::decode_to_string(data)?.into_bytes()),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Format::Json => "json",
            Format::Markup => "xml",
            Format::Tabular => "csv",
            Format::Binary => "bf",
        })
    }
}

/// Converts `input` from one format to another by way of the binary form.
///
/// # Errors
///
/// Returns the first error from either half of the conversion.
pub fn convert(input: &[u8], from: Format, to: Format) -> Result<Vec<u8>> {
    let binary = from.encode_input(input)?;
    log::debug!(
        "{} input ({} bytes) encoded to {} bytes",
        from,
        input.len(),
        binary.len()
    );
    let output = to.decode_output(&binary)?;
    log::debug!("decoded to {} output ({} bytes)", to, output.len());
    Ok(output)
}

fn text(input: &[u8]) -> Result<&str> {
    std::str::from_utf8(input).map_err(|e| Error::InvalidUtf8(format!("{} (input text)", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_passes_through() {
        let bytes = crate::encode(&Value::from("x")).unwrap();
        assert_eq!(convert(&bytes, Format::Binary, Format::Binary).unwrap(), bytes);
    }

    #[test]
    fn test_json_to_markup() {
        let xml = convert(
            br#"{"doc": {"title": "Hi", "n": 2}}"#,
            Format::Json,
            Format::Markup,
        )
        .unwrap();
        assert_eq!(
            String::from_utf8(xml).unwrap(),
            "<doc>\n  <title>Hi</title>\n  <n>2</n>\n</doc>"
        );
    }

    #[test]
    fn test_non_utf8_text_rejected() {
        assert!(matches!(
            convert(&[0xff, 0xfe], Format::Json, Format::Binary),
            Err(Error::InvalidUtf8(_))
        ));
    }

    #[test]
    fn test_markup_to_json_drops_attributes_and_comments() {
        let json = convert(
            b"<r a=\"1\"><!-- c --><x>5</x></r>",
            Format::Markup,
            Format::Json,
        )
        .unwrap();
        let tree: serde_json::Value = serde_json::from_slice(&json).unwrap();
        assert_eq!(tree, serde_json::json!({"r": {"x": "5"}}));
    }
}
