//! The [`JsonEsc`] façade.
//!
//! A `JsonEsc` owns an [`ExtensionRegistry`] built from [`EscOptions`] and
//! exposes the text-level operations on it. The crate-root functions
//! ([`parse`](crate::parse), [`stringify`](crate::stringify), ...) use a
//! shared default-configured instance, see [`JsonEsc::shared`].
//!
//! ## Examples
//!
//! ```rust
//! use serde_jsonesc::{esc, EscOptions, JsonEsc, Value, ARROW_SENTINEL};
//!
//! let esc = JsonEsc::with_options(EscOptions::new().with_sentinel(ARROW_SENTINEL));
//!
//! let text = esc.stringify(&esc!([undefined, (f64::NAN)]), None).unwrap();
//! assert_eq!(text, "[\"\u{362}\",\"\u{362}NaN\"]");
//!
//! let back = esc.parse(&text).unwrap();
//! assert!(back.as_array().unwrap()[0].is_undefined());
//! assert!(back.as_array().unwrap()[1].is_nan());
//! ```

use crate::registry::{Extension, ExtensionRegistry};
use crate::ser::{SortedWriter, MAX_INDENT};
use crate::{de, ser, Error, EscOptions, Result, Value};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value as Json;
use std::io;
use std::sync::OnceLock;

/// An escaped-JSON encoder/decoder with its own extension set.
#[derive(Clone, Debug)]
pub struct JsonEsc {
    options: EscOptions,
    registry: ExtensionRegistry,
}

impl Default for JsonEsc {
    fn default() -> Self {
        JsonEsc::new()
    }
}

impl JsonEsc {
    /// Creates an instance with default options.
    #[must_use]
    pub fn new() -> Self {
        JsonEsc::with_options(EscOptions::default())
    }

    /// Creates an instance with the built-in extensions `options` selects.
    #[must_use]
    pub fn with_options(options: EscOptions) -> Self {
        let registry = ExtensionRegistry::from_options(&options);
        JsonEsc { options, registry }
    }

    /// Returns the process-wide default instance, built on first use.
    ///
    /// The shared instance cannot be extended; create an instance with
    /// [`JsonEsc::new`] to register extensions.
    pub fn shared() -> &'static JsonEsc {
        static SHARED: OnceLock<JsonEsc> = OnceLock::new();
        SHARED.get_or_init(JsonEsc::new)
    }

    /// Returns the options this instance was built with.
    #[must_use]
    pub fn options(&self) -> &EscOptions {
        &self.options
    }

    /// Returns the extension registry.
    #[must_use]
    pub fn registry(&self) -> &ExtensionRegistry {
        &self.registry
    }

    /// Registers a payload-level extension.
    /// See [`ExtensionRegistry::register`].
    pub fn register(&mut self, extension: Extension) -> &mut Self {
        self.registry.register(extension);
        self
    }

    /// Registers an extension that handles the complete escaped string.
    /// See [`ExtensionRegistry::register_raw`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_jsonesc::{Extension, JsonEsc, Value};
    ///
    /// let mut esc = JsonEsc::new();
    /// esc.register_raw(Extension::new("Len").with_decoder(|text| Ok(Value::from(text.len() as i64))));
    ///
    /// assert_eq!(esc.parse("\"\\u001bLen:abc\"").unwrap(), Value::from(8));
    /// ```
    pub fn register_raw(&mut self, extension: Extension) -> &mut Self {
        self.registry.register_raw(extension);
        self
    }

    /// Parses JSON text and revives every escaped string in it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] for malformed JSON and propagates decoder
    /// failures for recognised tags with malformed payloads. Unknown tags are
    /// not errors.
    pub fn parse(&self, text: &str) -> Result<Value> {
        let json: Json = serde_json::from_str(text)?;
        self.registry.from_json(json)
    }

    /// Parses JSON bytes, see [`parse`](JsonEsc::parse).
    ///
    /// # Errors
    ///
    /// Same as [`parse`](JsonEsc::parse).
    pub fn parse_slice(&self, bytes: &[u8]) -> Result<Value> {
        let json: Json = serde_json::from_slice(bytes)?;
        self.registry.from_json(json)
    }

    /// Writes `value` as JSON text, escaping every value JSON cannot hold.
    ///
    /// `indent` is the number of spaces per nesting level, capped at 10;
    /// `None` or `Some(0)` produce compact output. A top-level `Undefined`
    /// yields the quoted absence literal.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_jsonesc::{esc, JsonEsc};
    ///
    /// let esc = JsonEsc::new();
    /// assert_eq!(esc.stringify(&esc!({"a": [1]}), Some(2)).unwrap(), "{\n  \"a\": [\n    1\n  ]\n}");
    /// ```
    ///
    /// # Errors
    ///
    /// Propagates encoder failures and [`Error::UnsupportedType`] for values
    /// nothing can write.
    pub fn stringify(&self, value: &Value, indent: Option<usize>) -> Result<String> {
        let mut out = Vec::with_capacity(128);
        self.stringify_to_writer(&mut out, value, indent)?;
        String::from_utf8(out).map_err(Error::custom)
    }

    /// Writes `value` as JSON text to `writer`, see
    /// [`stringify`](JsonEsc::stringify).
    ///
    /// # Errors
    ///
    /// Same as [`stringify`](JsonEsc::stringify), plus I/O failures.
    pub fn stringify_to_writer<W: io::Write>(
        &self,
        mut writer: W,
        value: &Value,
        indent: Option<usize>,
    ) -> Result<()> {
        let json = match self.registry.to_json(value)? {
            Some(json) => json,
            None => Json::String(self.registry.sentinel().to_string()),
        };
        match indent.unwrap_or(0).min(MAX_INDENT) {
            0 => serde_json::to_writer(&mut writer, &json)?,
            width => {
                let spaces = " ".repeat(width);
                let formatter = PrettyFormatter::with_indent(spaces.as_bytes());
                let mut serializer = serde_json::Serializer::with_formatter(&mut writer, formatter);
                json.serialize(&mut serializer)?;
            }
        }
        writer.flush().map_err(|e| Error::io(&e.to_string()))
    }

    /// Writes `value` as canonical JSON with sorted object keys.
    /// See [`SortedWriter`].
    ///
    /// # Errors
    ///
    /// Propagates encoder failures.
    pub fn stringify_sorted(&self, value: &Value, indent: Option<usize>) -> Result<String> {
        let mut writer = SortedWriter::new(&self.registry, indent);
        writer.write(value)?;
        Ok(writer.into_inner())
    }

    /// String-level encoding of a single value.
    /// See [`ExtensionRegistry::encode`].
    ///
    /// # Errors
    ///
    /// Propagates encoder failures.
    pub fn encode(&self, value: &Value) -> Result<String> {
        self.registry.encode(value)
    }

    /// String-level decoding of a single value.
    /// See [`ExtensionRegistry::decode`].
    ///
    /// # Errors
    ///
    /// Propagates decoder failures.
    pub fn decode(&self, text: &str) -> Result<Value> {
        self.registry.decode(text)
    }

    /// Serializes any `Serialize` type through this instance.
    ///
    /// # Errors
    ///
    /// Same as [`stringify`](JsonEsc::stringify).
    pub fn to_string<T: Serialize + ?Sized>(&self, value: &T, indent: Option<usize>) -> Result<String> {
        self.stringify(&ser::to_value(value)?, indent)
    }

    /// Deserializes any `Deserialize` type through this instance.
    ///
    /// # Errors
    ///
    /// Same as [`parse`](JsonEsc::parse), plus shape mismatches with `T`.
    pub fn from_str<T: DeserializeOwned>(&self, text: &str) -> Result<T> {
        de::from_value(self.parse(text)?)
    }
}
