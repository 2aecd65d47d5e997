//! Configuration options for encoding and decoding.
//!
//! - [`EncodeOptions`]: controls string interning
//! - [`DecodeOptions`]: controls nesting limits, comment handling and trailing input
//!
//! ## Examples
//!
//! ```rust
//! use serde_bof::{decode_with_options, encode_with_options, DecodeOptions, EncodeOptions, Value};
//!
//! let value = Value::List(vec![Value::from("x"), Value::from("x")]);
//!
//! // Write every string literally
//! let bytes = encode_with_options(&value, EncodeOptions::new().with_intern_strings(false)).unwrap();
//!
//! // Refuse anything nested deeper than 8 containers
//! let options = DecodeOptions::new().with_max_depth(8);
//! assert_eq!(decode_with_options(&bytes, options).unwrap(), value);
//! ```

/// Options for [`crate::Encoder`].
///
/// # Examples
///
/// ```rust
/// use serde_bof::EncodeOptions;
///
/// let options = EncodeOptions::new();
/// assert!(options.intern_strings);
/// ```
#[derive(Clone, Debug)]
pub struct EncodeOptions {
    /// Replace repeated strings with back-references.
    pub intern_strings: bool,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        EncodeOptions {
            intern_strings: true,
        }
    }
}

impl EncodeOptions {
    /// Creates default options (string interning on).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables string back-references.
    ///
    /// Decoders read either form, so this only trades size for encode speed.
    #[must_use]
    pub fn with_intern_strings(mut self, intern_strings: bool) -> Self {
        self.intern_strings = intern_strings;
        self
    }
}

/// Options for [`crate::Decoder`].
///
/// # Examples
///
/// ```rust
/// use serde_bof::DecodeOptions;
///
/// let options = DecodeOptions::new();
/// assert_eq!(options.max_depth, 512);
/// assert_eq!(options.max_items, 1 << 22);
/// assert!(options.preserve_comments);
/// assert!(!options.allow_trailing_bytes);
/// ```
#[derive(Clone, Debug)]
pub struct DecodeOptions {
    /// Deepest container nesting accepted before failing.
    pub max_depth: usize,
    /// Most list items and map entries accepted across the whole document.
    pub max_items: usize,
    /// Keep comments; when `false` they are consumed and decode as empty.
    pub preserve_comments: bool,
    /// Accept input that continues after the root value.
    pub allow_trailing_bytes: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        DecodeOptions {
            max_depth: 512,
            max_items: 1 << 22,
            preserve_comments: true,
            allow_trailing_bytes: false,
        }
    }
}

impl DecodeOptions {
    /// Creates default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the nesting limit.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_bof::DecodeOptions;
    ///
    /// let options = DecodeOptions::new().with_max_depth(16);
    /// assert_eq!(options.max_depth, 16);
    /// ```
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Sets the item budget.
    ///
    /// Counts are claimed before any item is read, so a uniform list of
    /// `Empty` claiming billions of items fails without allocating them.
    #[must_use]
    pub fn with_max_items(mut self, max_items: usize) -> Self {
        self.max_items = max_items;
        self
    }

    /// Keeps or drops comments.
    #[must_use]
    pub fn with_preserve_comments(mut self, preserve_comments: bool) -> Self {
        self.preserve_comments = preserve_comments;
        self
    }

    /// Accepts or rejects bytes after the root value.
    #[must_use]
    pub fn with_allow_trailing_bytes(mut self, allow_trailing_bytes: bool) -> Self {
        self.allow_trailing_bytes = allow_trailing_bytes;
        self
    }
}
