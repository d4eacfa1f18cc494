//! # serde_jsonesc
//!
//! JSON with an escape hatch: a reversible encoding for values plain JSON
//! cannot represent, carried inside ordinary JSON strings.
//!
//! ## How it works
//!
//! A string whose first character is the **sentinel** (U+001B by default) is
//! an encoded value. The rest of the string is either a short literal or
//! `TAG:PAYLOAD`:
//!
//! | encoded string | value |
//! |---|---|
//! | `\u001b` | `undefined` |
//! | `\u001bNaN`, `\u001bInf`, `\u001b-Inf` | non-finite numbers |
//! | `\u001bDate:2018-02-07T19:07:18.207Z` | timestamp |
//! | `\u001bBin:xy'/z` | byte buffer, radix-93 packed |
//! | `\u001bB91:...`, `\u001bB64:W1Jwzw==` | byte buffer, radix-91 or base64 |
//! | `\u001bn:12345678901234567890` | big integer |
//! | `\u001bStr:...` | a string that itself starts with the sentinel |
//!
//! Any JSON parser can read the output; only readers that know the scheme
//! see the richer values. Unknown tags decode to `undefined` instead of
//! failing, so new extensions degrade gracefully on old readers.
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use serde_jsonesc::{esc, parse, stringify, Value};
//!
//! let when = Utc.timestamp_millis_opt(1518030438207).unwrap();
//! let value = esc!({
//!     "when": (Value::Date(when)),
//!     "bytes": (Value::Binary(vec![91, 82, 112, 207])),
//!     "ratio": (f64::INFINITY)
//! });
//!
//! let text = stringify(&value, None).unwrap();
//! assert_eq!(
//!     text,
//!     r#"{"when":"\u001bDate:2018-02-07T19:07:18.207Z","bytes":"\u001bBin:xy'/z","ratio":"\u001bInf"}"#
//! );
//! assert_eq!(parse(&text).unwrap(), value);
//! ```
//!
//! ## Typed Data
//!
//! Any `serde` type can be written and read back; byte buffers serialized
//! with `serialize_bytes` become packed binary.
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use serde_jsonesc::{from_str, to_string};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct Reading {
//!     sensor: String,
//!     value: f64,
//! }
//!
//! let reading = Reading { sensor: "t1".to_string(), value: f64::NEG_INFINITY };
//! let text = to_string(&reading).unwrap();
//! assert_eq!(text, r#"{"sensor":"t1","value":"\u001b-Inf"}"#);
//!
//! let back: Reading = from_str(&text).unwrap();
//! assert_eq!(back, reading);
//! ```
//!
//! ## Custom Extensions
//!
//! Register an encoder for a type key and a decoder for a tag on your own
//! [`JsonEsc`] instance:
//!
//! ```rust
//! use serde_jsonesc::{CustomValue, Extension, ExtensionValue, JsonEsc, Value};
//!
//! #[derive(Debug, PartialEq)]
//! struct Version(u32, u32);
//! impl ExtensionValue for Version {}
//!
//! let mut esc = JsonEsc::new();
//! esc.register(Extension::typed::<Version, _, _>(
//!     "Ver",
//!     |v| Ok(format!("{}.{}", v.0, v.1)),
//!     |payload| {
//!         let (major, minor) = payload
//!             .split_once('.')
//!             .ok_or_else(|| serde_jsonesc::Error::invalid_payload("Ver", payload))?;
//!         let parse = |s: &str| s.parse::<u32>().map_err(|e| serde_jsonesc::Error::invalid_payload("Ver", e));
//!         Ok(Version(parse(major)?, parse(minor)?))
//!     },
//! ));
//!
//! let value = Value::Custom(CustomValue::new(Version(1, 4)));
//! let text = esc.stringify(&value, None).unwrap();
//! assert_eq!(text, "\"\\u001bVer:1.4\"");
//! assert_eq!(esc.parse(&text).unwrap(), value);
//! ```
//!
//! ## Modules
//!
//! - [`packer`]: radix-91 / radix-93 binary-to-text packing
//! - [`codec`]: payload codecs for the built-in tags
//! - [`registry`]: the extension registry and its tree walks
//! - [`ser`] / [`de`]: the serde bridge and the canonical sorted writer
//! - [`value`] / [`map`]: the dynamic value tree

pub mod codec;
pub mod de;
pub mod error;
pub mod esc;
pub mod macros;
pub mod map;
pub mod options;
pub mod packer;
pub mod registry;
pub mod ser;
pub mod value;

pub use de::{from_value, ValueDeserializer};
pub use error::{Error, Result};
pub use esc::JsonEsc;
pub use map::EscMap;
pub use options::{BinaryFormat, DateFormat, EscOptions, ARROW_SENTINEL, DEFAULT_SENTINEL};
pub use registry::{DecodeFn, EncodeFn, Extension, ExtensionRegistry};
pub use ser::{to_value, SortedWriter, ValueSerializer};
pub use value::{CustomValue, ExtensionValue, Number, TypeKey, Value};

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io;

/// Parses JSON text with the shared instance, reviving escaped strings.
///
/// # Examples
///
/// ```rust
/// use serde_jsonesc::{parse, Value};
///
/// let value = parse(r#"["\u001bNaN", "\u001bUnknown:x", 1]"#).unwrap();
/// let items = value.as_array().unwrap();
/// assert!(items[0].is_nan());
/// assert!(items[1].is_undefined());
/// assert_eq!(items[2], Value::from(1));
/// ```
///
/// # Errors
///
/// Returns [`Error::Json`] for malformed JSON and [`Error::InvalidPayload`]
/// for a recognised tag with a malformed payload.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn parse(text: &str) -> Result<Value> {
    JsonEsc::shared().parse(text)
}

/// Writes a value as JSON text with the shared instance.
///
/// # Examples
///
/// ```rust
/// use serde_jsonesc::{esc, stringify};
///
/// assert_eq!(stringify(&esc!({"a": undefined}), None).unwrap(), "{}");
/// assert_eq!(stringify(&esc!([undefined]), None).unwrap(), r#"["\u001b"]"#);
/// ```
///
/// # Errors
///
/// Propagates encoder failures.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn stringify(value: &Value, indent: Option<usize>) -> Result<String> {
    JsonEsc::shared().stringify(value, indent)
}

/// Writes a value as canonical JSON with sorted keys, with the shared
/// instance.
///
/// # Errors
///
/// Propagates encoder failures.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn stringify_sorted(value: &Value, indent: Option<usize>) -> Result<String> {
    JsonEsc::shared().stringify_sorted(value, indent)
}

/// String-level encoding with the shared instance.
///
/// ```rust
/// use serde_jsonesc::{encode, Value};
///
/// assert_eq!(encode(&Value::from(f64::NAN)).unwrap(), "\u{1b}NaN");
/// assert_eq!(encode(&Value::from("plain")).unwrap(), "plain");
/// ```
///
/// # Errors
///
/// Propagates encoder failures.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn encode(value: &Value) -> Result<String> {
    JsonEsc::shared().encode(value)
}

/// String-level decoding with the shared instance.
///
/// # Errors
///
/// Propagates decoder failures.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn decode(text: &str) -> Result<Value> {
    JsonEsc::shared().decode(text)
}

/// Serialize the given data structure as a compact escaped JSON string.
///
/// # Errors
///
/// Returns an error if the value cannot be converted or written.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string<T>(value: &T) -> Result<String>
where
    T: ?Sized + Serialize,
{
    JsonEsc::shared().to_string(value, None)
}

/// Serialize the given data structure as escaped JSON indented by two spaces.
///
/// # Examples
///
/// ```rust
/// use serde_jsonesc::to_string_pretty;
///
/// assert_eq!(to_string_pretty(&vec![1, 2]).unwrap(), "[\n  1,\n  2\n]");
/// ```
///
/// # Errors
///
/// Returns an error if the value cannot be converted or written.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_pretty<T>(value: &T) -> Result<String>
where
    T: ?Sized + Serialize,
{
    JsonEsc::shared().to_string(value, Some(2))
}

/// Serialize the given data structure as escaped JSON into the I/O stream.
///
/// # Errors
///
/// Returns an error if the value cannot be converted or writing fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W, T>(writer: W, value: &T) -> Result<()>
where
    W: io::Write,
    T: ?Sized + Serialize,
{
    JsonEsc::shared().stringify_to_writer(writer, &to_value(value)?, None)
}

/// Deserialize an instance of type `T` from escaped JSON text.
///
/// # Examples
///
/// ```rust
/// use serde_jsonesc::from_str;
///
/// let bytes: Vec<u8> = from_str(r#""\u001bB64:W1Jwzw==""#).unwrap();
/// assert_eq!(bytes, vec![91, 82, 112, 207]);
/// ```
///
/// # Errors
///
/// Returns an error if the input is not valid JSON, carries a malformed
/// payload, or cannot be deserialized to type `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str<T>(s: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    JsonEsc::shared().from_str(s)
}

/// Deserialize an instance of type `T` from an I/O stream of escaped JSON.
///
/// # Errors
///
/// Returns an error if reading fails or the input cannot be deserialized.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<R, T>(mut reader: R) -> Result<T>
where
    R: io::Read,
    T: DeserializeOwned,
{
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(|e| Error::io(&e.to_string()))?;
    from_slice(&bytes)
}

/// Deserialize an instance of type `T` from bytes of escaped JSON.
///
/// # Errors
///
/// Returns an error if the bytes are not valid JSON or cannot be
/// deserialized to type `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice<T>(v: &[u8]) -> Result<T>
where
    T: DeserializeOwned,
{
    from_value(JsonEsc::shared().parse_slice(v)?)
}
