//! The extension registry.
//!
//! An [`ExtensionRegistry`] maps [`TypeKey`]s to encoders and tags to
//! decoders, and performs the two tree walks that connect [`Value`] with
//! `serde_json`:
//!
//! - the **replacer** walk ([`to_json`](ExtensionRegistry::to_json)) turns a
//!   value tree into a JSON tree, writing every non-JSON value as an escaped
//!   string `SENTINEL TAG : PAYLOAD`
//! - the **reviver** walk ([`from_json`](ExtensionRegistry::from_json))
//!   inspects every string leaf and dispatches sentinel strings to the decoder
//!   registered for their tag
//!
//! Decoding is total: a sentinel string with an unknown tag, or no tag at
//! all, revives as [`Value::Undefined`]. Object entries that revive as
//! `Undefined` are dropped; array positions are kept.
//!
//! ## Examples
//!
//! ```rust
//! use serde_jsonesc::{EscOptions, Extension, ExtensionRegistry, Value};
//!
//! let mut registry = ExtensionRegistry::from_options(&EscOptions::new());
//! registry.register(Extension::new("Upper").with_decoder(|payload| {
//!     Ok(Value::from(payload.to_uppercase()))
//! }));
//!
//! assert_eq!(registry.revive_str("\u{1b}Upper:abc").unwrap(), Value::from("ABC"));
//! assert_eq!(registry.revive_str("\u{1b}Lower:abc").unwrap(), Value::Undefined);
//! assert_eq!(registry.revive_str("plain").unwrap(), Value::from("plain"));
//! ```

use crate::codec::{self, STRING_TAG};
use crate::packer::{BASE91, BASE93};
use crate::{
    BinaryFormat, CustomValue, Error, EscMap, EscOptions, ExtensionValue, Number, Result, TypeKey,
    Value,
};
use log::{debug, trace};
use serde_json::Value as Json;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Writes an extension value as text.
pub type EncodeFn = Arc<dyn Fn(&Value) -> Result<String> + Send + Sync>;

/// Reads an extension value from text.
pub type DecodeFn = Arc<dyn Fn(&str) -> Result<Value> + Send + Sync>;

/// A tag with an optional encoder and an optional decoder.
///
/// An extension with only a decoder is decode-only; one with only an encoder
/// is encode-only.
///
/// # Examples
///
/// ```rust
/// use serde_jsonesc::{CustomValue, Extension, ExtensionValue, JsonEsc, Value};
///
/// #[derive(Debug, PartialEq)]
/// struct Rgb(u8, u8, u8);
/// impl ExtensionValue for Rgb {}
///
/// let mut esc = JsonEsc::new();
/// esc.register(Extension::typed::<Rgb, _, _>(
///     "Rgb",
///     |c| Ok(format!("{:02x}{:02x}{:02x}", c.0, c.1, c.2)),
///     |payload| {
///         let channel = |i: usize| {
///             u8::from_str_radix(&payload[i..i + 2], 16).map_err(serde_jsonesc::Error::custom)
///         };
///         Ok(Rgb(channel(0)?, channel(2)?, channel(4)?))
///     },
/// ));
///
/// let value = Value::Custom(CustomValue::new(Rgb(255, 128, 0)));
/// let json = esc.stringify(&value, None).unwrap();
/// assert_eq!(json, "\"\\u001bRgb:ff8000\"");
/// assert_eq!(esc.parse(&json).unwrap(), value);
/// ```
#[derive(Clone)]
pub struct Extension {
    tag: String,
    encoder: Option<(TypeKey, EncodeFn)>,
    decoder: Option<DecodeFn>,
}

impl Extension {
    /// Creates an extension for `tag` with neither encoder nor decoder.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Extension {
            tag: tag.into(),
            encoder: None,
            decoder: None,
        }
    }

    /// Sets the encoder used for values whose type key is `key`.
    #[must_use]
    pub fn with_encoder<F>(mut self, key: TypeKey, encoder: F) -> Self
    where
        F: Fn(&Value) -> Result<String> + Send + Sync + 'static,
    {
        self.encoder = Some((key, Arc::new(encoder)));
        self
    }

    /// Sets the decoder for strings carrying this extension's tag.
    #[must_use]
    pub fn with_decoder<F>(mut self, decoder: F) -> Self
    where
        F: Fn(&str) -> Result<Value> + Send + Sync + 'static,
    {
        self.decoder = Some(Arc::new(decoder));
        self
    }

    /// Builds a two-way extension for the custom type `T`.
    ///
    /// Downcasting to `T` and wrapping decoded values in [`CustomValue`] is
    /// handled here, so both callbacks work with `T` directly.
    #[must_use]
    pub fn typed<T, E, D>(tag: impl Into<String>, encode: E, decode: D) -> Self
    where
        T: ExtensionValue,
        E: Fn(&T) -> Result<String> + Send + Sync + 'static,
        D: Fn(&str) -> Result<T> + Send + Sync + 'static,
    {
        let tag = tag.into();
        let name = tag.clone();
        Extension::new(tag)
            .with_encoder(TypeKey::of::<T>(), move |value| {
                match value.downcast_ref::<T>() {
                    Some(inner) => encode(inner),
                    None => Err(Error::unsupported_type(&format!(
                        "`{}` encoder cannot write {:?}",
                        name, value
                    ))),
                }
            })
            .with_decoder(move |payload| decode(payload).map(|v| Value::Custom(CustomValue::new(v))))
    }

    /// Returns the tag.
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Returns `true` if the extension can encode.
    #[must_use]
    pub fn has_encoder(&self) -> bool {
        self.encoder.is_some()
    }

    /// Returns `true` if the extension can decode.
    #[must_use]
    pub fn has_decoder(&self) -> bool {
        self.decoder.is_some()
    }
}

impl fmt::Debug for Extension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Extension")
            .field("tag", &self.tag)
            .field("encoder", &self.encoder.as_ref().map(|(key, _)| key.name()))
            .field("decoder", &self.decoder.is_some())
            .finish()
    }
}

/// Type-keyed encoders and tag-keyed decoders, plus the tree walks over them.
#[derive(Clone)]
pub struct ExtensionRegistry {
    sentinel: char,
    primitive: bool,
    encoders: HashMap<TypeKey, EncodeFn>,
    decoders: HashMap<String, DecodeFn>,
}

impl ExtensionRegistry {
    /// Creates a registry with no extensions beyond the `Str` escape.
    #[must_use]
    pub fn new(sentinel: char) -> Self {
        let mut registry = ExtensionRegistry {
            sentinel,
            primitive: false,
            encoders: HashMap::new(),
            decoders: HashMap::new(),
        };
        registry.register(codec::string_extension());
        registry
    }

    /// Creates a registry with the built-in extensions `options` selects.
    ///
    /// Every buffer format other than the primary one is registered
    /// decode-only, so input from a peer using a different format is still
    /// read.
    #[must_use]
    pub fn from_options(options: &EscOptions) -> Self {
        let mut registry = ExtensionRegistry::new(options.sentinel);
        let sentinel = options.sentinel;

        if options.encode_date {
            registry.register(codec::date_extension(options.date_format));
        }

        if options.encode_binary != BinaryFormat::Disabled {
            let primary = options.encode_binary;
            registry.register_raw(codec::packed_extension(
                BASE93,
                codec::PACKED_93_TAG,
                sentinel,
                primary == BinaryFormat::Base93,
            ));
            registry.register_raw(codec::packed_extension(
                BASE91,
                codec::PACKED_91_TAG,
                sentinel,
                primary == BinaryFormat::Base91,
            ));
            registry.register(codec::base64_extension(primary == BinaryFormat::Base64));
        }

        if options.encode_bigint {
            registry.register(codec::bigint_extension(codec::BIGINT_TAG, true));
            registry.register(codec::bigint_extension(codec::LEGACY_BIGINT_TAG, false));
        }

        if options.encode_primitive {
            registry.primitive = true;
            registry.register(codec::number_extension());
        }
        registry
    }

    /// Returns the sentinel character.
    #[inline]
    #[must_use]
    pub const fn sentinel(&self) -> char {
        self.sentinel
    }

    /// Returns `true` if primitive mode is active.
    #[inline]
    #[must_use]
    pub const fn is_primitive(&self) -> bool {
        self.primitive
    }

    /// Returns `true` if an encoder is registered for `key`.
    #[must_use]
    pub fn has_encoder(&self, key: &TypeKey) -> bool {
        self.encoders.contains_key(key)
    }

    /// Returns `true` if a decoder is registered for `tag`.
    #[must_use]
    pub fn has_decoder(&self, tag: &str) -> bool {
        self.decoders.contains_key(tag)
    }

    /// Returns the registered decode tags, in no particular order.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.decoders.keys().map(String::as_str)
    }

    /// Registers an extension whose encoder writes the payload only and whose
    /// decoder receives the payload only.
    ///
    /// Registering a tag or type key again replaces the earlier entry.
    pub fn register(&mut self, extension: Extension) -> &mut Self {
        let prefix = format!("{}{}:", self.sentinel, extension.tag);
        let Extension {
            tag,
            encoder,
            decoder,
        } = extension;

        let encoder = encoder.map(|(key, encode)| {
            let prefix = prefix.clone();
            let wrapped: EncodeFn = Arc::new(move |value: &Value| {
                let payload = encode(value)?;
                let mut out = String::with_capacity(prefix.len() + payload.len());
                out.push_str(&prefix);
                out.push_str(&payload);
                Ok(out)
            });
            (key, wrapped)
        });

        let decoder = decoder.map(|decode| {
            let offset = prefix.len();
            let wrapped: DecodeFn =
                Arc::new(move |text: &str| decode(text.get(offset..).unwrap_or_default()));
            wrapped
        });

        self.install(tag, encoder, decoder)
    }

    /// Registers an extension whose encoder writes the complete escaped
    /// string and whose decoder receives it unchanged.
    pub fn register_raw(&mut self, extension: Extension) -> &mut Self {
        let Extension {
            tag,
            encoder,
            decoder,
        } = extension;
        self.install(tag, encoder, decoder)
    }

    fn install(
        &mut self,
        tag: String,
        encoder: Option<(TypeKey, EncodeFn)>,
        decoder: Option<DecodeFn>,
    ) -> &mut Self {
        if let Some((key, encode)) = encoder {
            if self.encoders.insert(key, encode).is_some() {
                debug!("replacing encoder for type `{}`", key.name());
            }
        }
        if let Some(decode) = decoder {
            if self.decoders.insert(tag.clone(), decode).is_some() {
                debug!("replacing decoder for tag `{}`", tag);
            }
        }
        self
    }

    /// Replacer walk: converts a value tree into a JSON tree.
    ///
    /// Returns `None` when the value itself is absent (`Undefined` or an
    /// opaque custom value).
    ///
    /// # Errors
    ///
    /// Propagates encoder failures, and returns [`Error::UnsupportedType`] for
    /// a big integer with no active encoder.
    pub fn to_json(&self, value: &Value) -> Result<Option<Json>> {
        let json = match value {
            Value::Undefined => return Ok(None),
            Value::Null => Json::Null,
            Value::Bool(b) => Json::Bool(*b),
            Value::Number(n) => match self.special_literal(n) {
                Some(literal) => Json::String(literal),
                None => number_to_json(n),
            },
            Value::String(s) => Json::String(self.escape_string(s)),
            Value::Array(items) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    out.push(match self.to_json(item)? {
                        Some(json) => json,
                        None => Json::String(self.sentinel.to_string()),
                    });
                }
                Json::Array(out)
            }
            Value::Object(map) => {
                let mut out = serde_json::Map::with_capacity(map.len());
                for (key, item) in map {
                    if let Some(json) = self.to_json(item)? {
                        out.insert(key.clone(), json);
                    }
                }
                Json::Object(out)
            }
            Value::Date(_) | Value::Binary(_) | Value::BigInt(_) | Value::Custom(_) => {
                if let Some(plain) = self.plain_form(value) {
                    return self.to_json(&plain);
                }
                match self.escape_extension(value)? {
                    Some(escaped) => Json::String(escaped),
                    None => return self.opaque(value),
                }
            }
        };
        Ok(Some(json))
    }

    /// Reviver walk: converts a JSON tree into a value tree.
    ///
    /// # Errors
    ///
    /// Propagates decoder failures for recognised tags with malformed payloads.
    pub fn from_json(&self, json: Json) -> Result<Value> {
        Ok(match json {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Bool(b),
            Json::Number(n) => number_from_json(&n),
            Json::String(s) => self.revive_str(&s)?,
            Json::Array(items) => Value::Array(
                items
                    .into_iter()
                    .map(|item| self.from_json(item))
                    .collect::<Result<_>>()?,
            ),
            Json::Object(map) => {
                let mut out = EscMap::with_capacity(map.len());
                for (key, item) in map {
                    let value = self.from_json(item)?;
                    if !value.is_undefined() {
                        out.insert(key, value);
                    }
                }
                Value::Object(out)
            }
        })
    }

    /// Revives a single string leaf.
    ///
    /// # Errors
    ///
    /// Propagates decoder failures for recognised tags with malformed payloads.
    pub fn revive_str(&self, text: &str) -> Result<Value> {
        let Some(rest) = text.strip_prefix(self.sentinel) else {
            return Ok(Value::String(text.to_string()));
        };

        match rest {
            "" => return Ok(Value::Undefined),
            "NaN" => return Ok(Value::Number(Number::NaN)),
            "Inf" => return Ok(Value::Number(Number::Infinity)),
            "-Inf" => return Ok(Value::Number(Number::NegativeInfinity)),
            "true" if self.primitive => return Ok(Value::Bool(true)),
            "false" if self.primitive => return Ok(Value::Bool(false)),
            "null" if self.primitive => return Ok(Value::Null),
            _ => {}
        }

        if self.primitive && (rest.starts_with('{') || rest.starts_with('[')) {
            return match serde_json::from_str::<Json>(rest) {
                Ok(json) => self.from_json(json),
                Err(e) => {
                    trace!("unreadable nested document: {}", e);
                    Ok(Value::Undefined)
                }
            };
        }

        let Some((tag, _)) = rest.split_once(':') else {
            trace!("sentinel string without a tag");
            return Ok(Value::Undefined);
        };
        match self.decoders.get(tag) {
            Some(decode) => decode(text),
            None => {
                trace!("no decoder for tag `{}`", tag);
                Ok(Value::Undefined)
            }
        }
    }

    /// String-level encoding of a single value.
    ///
    /// Strings are returned as they are unless reading them back would change
    /// them (they start with the sentinel, or they parse as JSON); those are
    /// written as `Str` escapes. In primitive mode every scalar and container
    /// is escaped; otherwise they are written as JSON text.
    ///
    /// # Errors
    ///
    /// Same as [`to_json`](ExtensionRegistry::to_json).
    pub fn encode(&self, value: &Value) -> Result<String> {
        let s = self.sentinel;
        Ok(match value {
            Value::Undefined => s.to_string(),
            Value::Number(n) => match self.special_literal(n) {
                Some(literal) => literal,
                None if self.primitive => {
                    format!("{}{}:{}", s, codec::NUMBER_TAG, codec::encode_number(n))
                }
                None => codec::encode_number(n),
            },
            Value::Null => self.scalar_literal("null"),
            Value::Bool(true) => self.scalar_literal("true"),
            Value::Bool(false) => self.scalar_literal("false"),
            Value::String(text) => {
                if text.starts_with(s) || serde_json::from_str::<Json>(text).is_ok() {
                    self.str_escape(text)
                } else {
                    text.clone()
                }
            }
            Value::Array(_) | Value::Object(_) => {
                let json = self.to_json(value)?.unwrap_or(Json::Null);
                let text = serde_json::to_string(&json)?;
                if self.primitive {
                    format!("{}{}", s, text)
                } else {
                    text
                }
            }
            Value::Date(_) | Value::Binary(_) | Value::BigInt(_) | Value::Custom(_) => {
                if let Some(plain) = self.plain_form(value) {
                    return self.encode(&plain);
                }
                match self.escape_extension(value)? {
                    Some(escaped) => escaped,
                    None => {
                        self.opaque(value)?;
                        s.to_string()
                    }
                }
            }
        })
    }

    /// String-level decoding, the inverse of [`encode`](ExtensionRegistry::encode).
    ///
    /// Sentinel text is revived; other text is read as JSON when it is valid
    /// JSON and returned as a plain string otherwise.
    ///
    /// # Errors
    ///
    /// Propagates decoder failures for recognised tags with malformed payloads.
    pub fn decode(&self, text: &str) -> Result<Value> {
        if text.starts_with(self.sentinel) {
            return self.revive_str(text);
        }
        match serde_json::from_str::<Json>(text) {
            Ok(json) => self.from_json(json),
            Err(_) => Ok(Value::String(text.to_string())),
        }
    }

    /// Writes an extension value through its registered encoder, falling back
    /// to the value's own [`to_escaped`](ExtensionValue::to_escaped) hook.
    ///
    /// Returns `None` for values neither can write.
    ///
    /// # Errors
    ///
    /// Propagates encoder failures.
    pub fn escape_extension(&self, value: &Value) -> Result<Option<String>> {
        let Some(key) = value.type_key() else {
            return Ok(None);
        };
        if let Some(encode) = self.encoders.get(&key) {
            return encode(value).map(Some);
        }
        match value {
            Value::Custom(custom) => Ok(custom.to_escaped(self.sentinel)),
            _ => Ok(None),
        }
    }

    /// The literal for a non-finite number, `None` for finite ones.
    #[must_use]
    pub fn special_literal(&self, number: &Number) -> Option<String> {
        let literal = match number.special()? {
            Number::NaN => "NaN",
            Number::Infinity => "Inf",
            _ => "-Inf",
        };
        Some(format!("{}{}", self.sentinel, literal))
    }

    fn scalar_literal(&self, text: &str) -> String {
        if self.primitive {
            format!("{}{}", self.sentinel, text)
        } else {
            text.to_string()
        }
    }

    pub(crate) fn str_escape(&self, text: &str) -> String {
        format!("{}{}:{}", self.sentinel, STRING_TAG, text)
    }

    pub(crate) fn escape_string(&self, text: &str) -> String {
        if text.starts_with(self.sentinel) {
            self.str_escape(text)
        } else {
            text.to_string()
        }
    }

    // Types with a registered encoder never use their plain form.
    fn plain_form(&self, value: &Value) -> Option<Value> {
        match value.type_key() {
            Some(key) if !self.encoders.contains_key(&key) => value.plain_form(),
            _ => None,
        }
    }

    fn opaque(&self, value: &Value) -> Result<Option<Json>> {
        if value.is_bigint() {
            return Err(Error::unsupported_type(
                "big integer without an active encoder",
            ));
        }
        trace!("no encoding for {:?}, treating it as absent", value);
        Ok(None)
    }
}

impl fmt::Debug for ExtensionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tags: Vec<_> = self.tags().collect();
        tags.sort_unstable();
        f.debug_struct("ExtensionRegistry")
            .field("sentinel", &self.sentinel)
            .field("primitive", &self.primitive)
            .field("encoders", &self.encoders.len())
            .field("tags", &tags)
            .finish()
    }
}

pub(crate) fn number_to_json(number: &Number) -> Json {
    match number {
        Number::Integer(i) => Json::from(*i),
        other => serde_json::Number::from_f64(other.as_f64()).map_or(Json::Null, Json::Number),
    }
}

fn number_from_json(number: &serde_json::Number) -> Value {
    match number.as_i64() {
        Some(i) => Value::Number(Number::Integer(i)),
        None => Value::from(number.as_f64().unwrap_or(f64::NAN)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{esc, ARROW_SENTINEL};
    use chrono::{TimeZone, Utc};
    use num_bigint::BigInt;

    fn registry() -> ExtensionRegistry {
        ExtensionRegistry::from_options(&EscOptions::new())
    }

    fn primitive() -> ExtensionRegistry {
        ExtensionRegistry::from_options(&EscOptions::new().with_primitive(true))
    }

    #[test]
    fn test_builtin_tags() {
        let registry = registry();
        for tag in ["Str", "Date", "Bin", "B91", "B64", "n", "BigInt"] {
            assert!(registry.has_decoder(tag), "missing {}", tag);
        }
        assert!(!registry.has_decoder("Number"));
        assert!(registry.has_encoder(&TypeKey::of::<Vec<u8>>()));

        let bare = ExtensionRegistry::from_options(
            &EscOptions::new()
                .with_date(false)
                .with_bigint(false)
                .with_binary_format(BinaryFormat::Disabled),
        );
        let tags: Vec<_> = bare.tags().collect();
        assert_eq!(tags, vec!["Str"]);
    }

    #[test]
    fn test_undefined_placement() {
        let registry = registry();
        assert_eq!(registry.to_json(&Value::Undefined).unwrap(), None);
        assert_eq!(
            registry.to_json(&esc!([undefined])).unwrap(),
            Some(serde_json::json!(["\u{1b}"]))
        );
        assert_eq!(
            registry.to_json(&esc!({"a": undefined, "b": 1})).unwrap(),
            Some(serde_json::json!({"b": 1}))
        );
    }

    #[test]
    fn test_reviver_drops_undefined_entries_only() {
        let registry = registry();
        let json = serde_json::json!({"a": "\u{1b}", "b": ["\u{1b}", "\u{1b}Nope:x"], "c": "\u{1b}Nope:x"});
        let value = registry.from_json(json).unwrap();
        assert_eq!(value, esc!({"b": [undefined, undefined]}));
    }

    #[test]
    fn test_short_literals() {
        let registry = registry();
        assert!(registry.revive_str("\u{1b}NaN").unwrap().is_nan());
        assert_eq!(registry.revive_str("\u{1b}Inf").unwrap(), Value::from(f64::INFINITY));
        assert_eq!(registry.revive_str("\u{1b}-Inf").unwrap(), Value::from(f64::NEG_INFINITY));
        // primitive literals need primitive mode
        assert_eq!(registry.revive_str("\u{1b}true").unwrap(), Value::Undefined);
        assert_eq!(primitive().revive_str("\u{1b}true").unwrap(), Value::Bool(true));
        assert_eq!(primitive().revive_str("\u{1b}null").unwrap(), Value::Null);
    }

    #[test]
    fn test_sentinel_strings_are_escaped() {
        let registry = registry();
        let tricky = Value::from("\u{1b}Date:not really");
        let json = registry.to_json(&tricky).unwrap().unwrap();
        assert_eq!(json, Json::String("\u{1b}Str:\u{1b}Date:not really".into()));
        assert_eq!(registry.from_json(json).unwrap(), tricky);
    }

    #[test]
    fn test_plain_forms_when_disabled() {
        let registry = ExtensionRegistry::from_options(
            &EscOptions::new()
                .with_date(false)
                .with_binary_format(BinaryFormat::Disabled),
        );
        let dt = Utc.timestamp_millis_opt(1518030438207).unwrap();
        assert_eq!(
            registry.to_json(&Value::Date(dt)).unwrap(),
            Some(Json::from("2018-02-07T19:07:18.207Z"))
        );
        assert_eq!(
            registry.to_json(&Value::Binary(vec![1, 2])).unwrap(),
            Some(serde_json::json!([1, 2]))
        );
    }

    #[test]
    fn test_bigint_without_encoder_fails() {
        let registry = ExtensionRegistry::from_options(&EscOptions::new().with_bigint(false));
        let err = registry.to_json(&Value::BigInt(BigInt::from(7))).unwrap_err();
        assert!(matches!(err, Error::UnsupportedType(_)));
    }

    #[test]
    fn test_register_wraps_prefix() {
        let mut registry = ExtensionRegistry::new(ARROW_SENTINEL);
        registry.register(
            Extension::new("Echo").with_decoder(|payload| Ok(Value::from(format!("<{}>", payload)))),
        );
        registry.register_raw(
            Extension::new("Raw").with_decoder(|text| Ok(Value::from(format!("<{}>", text)))),
        );
        assert_eq!(
            registry.revive_str("\u{362}Echo:a:b").unwrap(),
            Value::from("<a:b>")
        );
        assert_eq!(
            registry.revive_str("\u{362}Raw:a").unwrap(),
            Value::from("<\u{362}Raw:a>")
        );
    }

    #[test]
    fn test_reregistering_overwrites() {
        let mut registry = registry();
        registry.register(Extension::new("n").with_decoder(|_| Ok(Value::Null)));
        assert_eq!(registry.revive_str("\u{1b}n:12").unwrap(), Value::Null);
    }

    #[test]
    fn test_string_level_encode() {
        let registry = registry();
        assert_eq!(registry.encode(&Value::Undefined).unwrap(), "\u{1b}");
        assert_eq!(registry.encode(&Value::from(1.25)).unwrap(), "1.25");
        assert_eq!(registry.encode(&Value::from(true)).unwrap(), "true");
        assert_eq!(registry.encode(&Value::from("hello")).unwrap(), "hello");
        assert_eq!(registry.encode(&Value::from("12")).unwrap(), "\u{1b}Str:12");
        assert_eq!(registry.encode(&esc!([1, 2])).unwrap(), "[1,2]");
        assert_eq!(registry.decode("hello").unwrap(), Value::from("hello"));
        assert_eq!(registry.decode("\u{1b}Str:12").unwrap(), Value::from("12"));
        assert_eq!(registry.decode("1.25").unwrap(), Value::from(1.25));
    }

    #[test]
    fn test_primitive_encode() {
        let registry = primitive();
        assert_eq!(registry.encode(&Value::from(true)).unwrap(), "\u{1b}true");
        assert_eq!(registry.encode(&Value::Null).unwrap(), "\u{1b}null");
        assert_eq!(registry.encode(&Value::from(1.25)).unwrap(), "\u{1b}Number:1.25");
        assert_eq!(registry.encode(&esc!({"a": 1})).unwrap(), "\u{1b}{\"a\":1}");
        assert_eq!(registry.decode("\u{1b}Number:1.25").unwrap(), Value::from(1.25));
        assert_eq!(registry.decode("\u{1b}[1,2]").unwrap(), esc!([1, 2]));
        assert_eq!(registry.decode("\u{1b}{broken").unwrap(), Value::Undefined);
    }
}
