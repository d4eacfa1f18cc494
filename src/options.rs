//! Configuration options for escaped JSON encoding.
//!
//! This module provides the types that select which built-in extensions a
//! [`JsonEsc`](crate::JsonEsc) instance activates:
//!
//! - [`EscOptions`]: Main configuration struct
//! - [`BinaryFormat`]: Which wire form byte buffers are written in
//! - [`DateFormat`]: Which payload timestamps are written with
//!
//! ## Examples
//!
//! ```rust
//! use serde_jsonesc::{BinaryFormat, EscOptions, JsonEsc, Value};
//!
//! // Write buffers as base64 instead of the packed radix-93 form
//! let options = EscOptions::new().with_binary_format(BinaryFormat::Base64);
//! let esc = JsonEsc::with_options(options);
//!
//! let json = esc.stringify(&Value::Binary(vec![91, 82, 112, 207]), None).unwrap();
//! assert_eq!(json, "\"\\u001bB64:W1Jwzw==\"");
//! ```

/// The default sentinel, the ASCII escape control character.
pub const DEFAULT_SENTINEL: char = '\u{1b}';

/// The alternate sentinel glyph (COMBINING DOUBLE RIGHTWARDS ARROW BELOW).
///
/// Unlike [`DEFAULT_SENTINEL`] it is printed unescaped by JSON printers.
pub const ARROW_SENTINEL: char = '\u{362}';

/// Wire form used when encoding byte buffers.
///
/// Regardless of the choice, every buffer form is still *decoded*, so output
/// from a peer using another format is always accepted (unless binary support
/// is [`Disabled`](BinaryFormat::Disabled) entirely).
///
/// # Examples
///
/// ```rust
/// use serde_jsonesc::BinaryFormat;
///
/// assert_eq!(BinaryFormat::Base93.tag(), Some("Bin"));
/// assert_eq!(BinaryFormat::Base91.tag(), Some("B91"));
/// assert_eq!(BinaryFormat::Base64.tag(), Some("B64"));
/// assert_eq!(BinaryFormat::Disabled.tag(), None);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum BinaryFormat {
    /// Buffers are not extension-encoded; they render as arrays of numbers
    Disabled,
    /// Packed with the 93-symbol alphabet, tag `Bin`
    #[default]
    Base93,
    /// Packed with the 91-symbol alphabet, tag `B91`.
    ///
    /// `Bin` always means the 93-symbol alphabet, so a peer that writes
    /// 91-symbol output under `Bin` is misread as 93-symbol data.
    Base91,
    /// Standard padded base64, tag `B64`
    Base64,
}

impl BinaryFormat {
    /// Returns the tag written by this format, if any.
    #[must_use]
    pub const fn tag(&self) -> Option<&'static str> {
        match self {
            BinaryFormat::Disabled => None,
            BinaryFormat::Base93 => Some("Bin"),
            BinaryFormat::Base91 => Some("B91"),
            BinaryFormat::Base64 => Some("B64"),
        }
    }
}

/// Payload representation for timestamps.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum DateFormat {
    /// `2018-02-07T19:07:18.207Z`
    #[default]
    Iso8601,
    /// `1518030438207`
    EpochMillis,
}

/// Configuration options for a [`JsonEsc`](crate::JsonEsc) instance.
///
/// # Examples
///
/// ```rust
/// use serde_jsonesc::{BinaryFormat, DateFormat, EscOptions};
///
/// // Defaults: dates, radix-93 buffers and big integers enabled
/// let options = EscOptions::new();
/// assert!(options.encode_date);
/// assert_eq!(options.encode_binary, BinaryFormat::Base93);
///
/// // Custom configuration
/// let options = EscOptions::new()
///     .with_date_format(DateFormat::EpochMillis)
///     .with_bigint(false)
///     .with_primitive(true);
/// assert!(options.encode_primitive);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct EscOptions {
    pub sentinel: char,
    pub encode_binary: BinaryFormat,
    pub encode_date: bool,
    pub date_format: DateFormat,
    pub encode_bigint: bool,
    pub encode_primitive: bool,
}

impl Default for EscOptions {
    fn default() -> Self {
        EscOptions {
            sentinel: DEFAULT_SENTINEL,
            encode_binary: BinaryFormat::default(),
            encode_date: true,
            date_format: DateFormat::default(),
            encode_bigint: true,
            encode_primitive: false,
        }
    }
}

impl EscOptions {
    /// Creates default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the sentinel character that marks escaped strings.
    ///
    /// The sentinel should not be `:` or an ASCII letter/digit; those would make
    /// tags ambiguous with ordinary text.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_jsonesc::{EscOptions, ARROW_SENTINEL};
    ///
    /// let options = EscOptions::new().with_sentinel(ARROW_SENTINEL);
    /// assert_eq!(options.sentinel, '\u{362}');
    /// ```
    #[must_use]
    pub fn with_sentinel(mut self, sentinel: char) -> Self {
        self.sentinel = sentinel;
        self
    }

    /// Selects the wire form for byte buffers.
    #[must_use]
    pub fn with_binary_format(mut self, format: BinaryFormat) -> Self {
        self.encode_binary = format;
        self
    }

    /// Enables or disables the `Date` extension.
    #[must_use]
    pub fn with_date(mut self, enabled: bool) -> Self {
        self.encode_date = enabled;
        self
    }

    /// Selects the timestamp payload representation.
    #[must_use]
    pub fn with_date_format(mut self, format: DateFormat) -> Self {
        self.date_format = format;
        self
    }

    /// Enables or disables the big integer extension.
    #[must_use]
    pub fn with_bigint(mut self, enabled: bool) -> Self {
        self.encode_bigint = enabled;
        self
    }

    /// Enables primitive mode.
    ///
    /// In primitive mode the string-level [`encode`](crate::JsonEsc::encode)
    /// escapes every scalar (`\u{1b}true`, `\u{1b}Number:1.25`, ...) and the
    /// decoder additionally recognises those literals.
    #[must_use]
    pub fn with_primitive(mut self, enabled: bool) -> Self {
        self.encode_primitive = enabled;
        self
    }
}
