//! Error types for binary object encoding and decoding.
//!
//! This module provides a single [`Error`] enum covering every failure the codec
//! and its adapters can report.
//!
//! ## Error Categories
//!
//! - **Malformed input**: truncated streams, unknown type tags, bad string
//!   back-references, invalid UTF-8, runaway nesting or item counts, trailing
//!   bytes
//! - **Unsupported values**: a value that has no mapping in the target model, or a
//!   uniform list whose elements do not match the declared kind
//! - **Adapter errors**: problems parsing or producing JSON, XML or CSV text
//! - **I/O errors**: file reading/writing failures
//!
//! Every error is terminal for the encode or decode call that produced it; the
//! partially written buffer is discarded.
//!
//! ## Examples
//!
//! ```rust
//! use serde_bof::{decode, Error};
//!
//! // A lone integer tag with no payload behind it
//! let result = decode(&[0b0000_0010]);
//! assert!(matches!(result, Err(Error::UnexpectedEof { .. })));
//! ```

use crate::Kind;
use std::fmt;
use thiserror::Error;

/// Represents all possible errors that can occur while encoding or decoding.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// IO error during reading or writing
    #[error("IO error: {0}")]
    Io(String),

    /// The input ended before a complete value was read
    #[error("Unexpected end of input at byte {position}: needed {needed} more byte(s)")]
    UnexpectedEof { position: usize, needed: usize },

    /// A type tag outside the eleven known kinds
    #[error("Unknown type tag {0}")]
    UnknownType(u64),

    /// A string back-reference that points past the strings decoded so far
    #[error("String reference {index} out of range (only {len} string(s) decoded)")]
    StringIndexOutOfRange { index: u64, len: usize },

    /// Literal string bytes that are not valid UTF-8
    #[error("Invalid UTF-8 in string: {0}")]
    InvalidUtf8(String),

    /// Containers nested deeper than the configured limit
    #[error("Nesting depth limit of {0} exceeded")]
    DepthLimitExceeded(usize),

    /// More list items and map entries than the configured budget
    #[error("Item limit of {0} exceeded")]
    ItemLimitExceeded(usize),

    /// Bytes left over after the root value
    #[error("{0} trailing byte(s) after the root value")]
    TrailingBytes(usize),

    /// A decoded length or count that does not fit in memory
    #[error("Length does not fit in usize")]
    LengthOverflow,

    /// A value that cannot be represented in the target model
    #[error("Unsupported value: {0}")]
    UnsupportedValue(String),

    /// A uniform list element whose kind differs from the declared kind
    #[error("Uniform list of {expected} contains a {found} element")]
    UniformListMismatch { expected: Kind, found: Kind },

    /// JSON text could not be parsed or produced
    #[error("JSON error: {0}")]
    Json(String),

    /// XML text could not be parsed or produced
    #[error("XML error: {0}")]
    Markup(String),

    /// Delimited table text could not be parsed
    #[error("Table error: {0}")]
    Tabular(String),

    /// Custom error
    #[error("Error: {0}")]
    Custom(String),
}

impl Error {
    /// Creates an end-of-input error at `position`, short by `needed` bytes.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_bof::Error;
    ///
    /// let err = Error::eof(12, 3);
    /// assert!(err.to_string().contains("byte 12"));
    /// ```
    pub fn eof(position: usize, needed: usize) -> Self {
        Error::UnexpectedEof { position, needed }
    }

    /// Creates an unsupported value error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_bof::Error;
    ///
    /// let err = Error::unsupported("maps cannot be table cells");
    /// assert!(err.to_string().contains("maps cannot"));
    /// ```
    pub fn unsupported<T: fmt::Display>(msg: T) -> Self {
        Error::UnsupportedValue(msg.to_string())
    }

    /// Creates a custom error with a display message.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_bof::Error;
    ///
    /// let err = Error::custom("something went wrong");
    /// assert!(err.to_string().contains("something went wrong"));
    /// ```
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Creates an I/O error for file reading/writing failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }

    /// Creates a JSON adapter error.
    pub fn json<T: fmt::Display>(msg: T) -> Self {
        Error::Json(msg.to_string())
    }

    /// Creates an XML adapter error.
    pub fn markup<T: fmt::Display>(msg: T) -> Self {
        Error::Markup(msg.to_string())
    }

    /// Creates a table adapter error.
    pub fn tabular<T: fmt::Display>(msg: T) -> Self {
        Error::Tabular(msg.to_string())
    }

    /// Returns `true` if this error means the binary input itself is malformed.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_bof::Error;
    ///
    /// assert!(Error::UnknownType(11).is_malformed());
    /// assert!(!Error::unsupported("bytes").is_malformed());
    /// ```
    #[must_use]
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            Error::UnexpectedEof { .. }
                | Error::UnknownType(_)
                | Error::StringIndexOutOfRange { .. }
                | Error::InvalidUtf8(_)
                | Error::DepthLimitExceeded(_)
                | Error::ItemLimitExceeded(_)
                | Error::TrailingBytes(_)
                | Error::LengthOverflow
        )
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err.to_string())
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::Tabular(err.to_string())
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
