//! Serialization into [`Value`] trees and canonical sorted output.
//!
//! This module provides two writers:
//!
//! - [`ValueSerializer`]: a `serde` serializer that turns any `Serialize`
//!   type into a [`Value`]. Byte slices become [`Value::Binary`], so
//!   `serde_bytes`-style fields are extension-encoded like any other buffer.
//! - [`SortedWriter`]: renders a value tree as canonical JSON text with
//!   object keys in lexicographic order, for hashing and diffing.
//!
//! ## Usage
//!
//! Most users should use the high-level functions in the crate root:
//!
//! ```rust
//! use serde_jsonesc::{stringify_sorted, to_value, esc};
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Data { y: i32, x: i32 }
//!
//! let value = to_value(&Data { y: 2, x: 1 }).unwrap();
//! assert_eq!(value, esc!({"y": 2, "x": 1}));
//!
//! assert_eq!(stringify_sorted(&value, None).unwrap(), r#"{"x":1,"y":2}"#);
//! ```
//!
//! ## Indented Output
//!
//! With an indent the sorted writer produces one entry per line:
//!
//! ```rust
//! use serde_jsonesc::{esc, stringify_sorted};
//!
//! let value = esc!({"c": 1, "a": 2, "b": 3});
//! assert_eq!(
//!     stringify_sorted(&value, Some(1)).unwrap(),
//!     "{\n \"a\": 2,\n \"b\": 3,\n \"c\": 1\n}"
//! );
//! ```

use crate::codec;
use crate::registry::ExtensionRegistry;
use crate::{Error, EscMap, Number, Result, Value};
use num_bigint::BigInt;
use serde::{ser, Serialize};

/// Indentation wider than this is clamped.
pub const MAX_INDENT: usize = 10;

/// Canonical JSON writer with sorted object keys.
///
/// Extension values are written through the registry's encoders (or their
/// [`to_escaped`](crate::ExtensionValue::to_escaped) hook) and never through
/// their plain forms; anything neither can write renders as `null`.
/// `Undefined` object entries are omitted and `Undefined` array elements are
/// written as the absence literal.
pub struct SortedWriter<'a> {
    registry: &'a ExtensionRegistry,
    output: String,
    indent: usize,
    // newline plus indentation, per nesting level
    indents: Vec<String>,
}

impl<'a> SortedWriter<'a> {
    /// Creates a writer; `indent` is the number of spaces per level, `None`
    /// or `Some(0)` for compact output.
    #[must_use]
    pub fn new(registry: &'a ExtensionRegistry, indent: Option<usize>) -> Self {
        SortedWriter {
            registry,
            output: String::with_capacity(256),
            indent: indent.unwrap_or(0).min(MAX_INDENT),
            indents: Vec::new(),
        }
    }

    /// Consumes the writer and returns the text written so far.
    pub fn into_inner(self) -> String {
        self.output
    }

    /// Appends `value` to the output.
    ///
    /// # Errors
    ///
    /// Propagates encoder failures.
    pub fn write(&mut self, value: &Value) -> Result<()> {
        self.write_value(value, 0)
    }

    fn write_value(&mut self, value: &Value, level: usize) -> Result<()> {
        match value {
            Value::Undefined => {
                let literal = self.registry.sentinel().to_string();
                self.write_quoted(&literal)?;
            }
            Value::Null => self.output.push_str("null"),
            Value::Bool(b) => self.output.push_str(if *b { "true" } else { "false" }),
            Value::Number(n) => match self.registry.special_literal(n) {
                Some(literal) => self.write_quoted(&literal)?,
                None => self.output.push_str(&codec::encode_number(n)),
            },
            Value::String(s) => {
                let escaped = self.registry.escape_string(s);
                self.write_quoted(&escaped)?;
            }
            Value::Array(items) => self.write_array(items, level)?,
            Value::Object(map) => self.write_object(map, level)?,
            Value::Date(_) | Value::Binary(_) | Value::BigInt(_) | Value::Custom(_) => {
                match self.registry.escape_extension(value)? {
                    Some(escaped) => self.write_quoted(&escaped)?,
                    None => self.output.push_str("null"),
                }
            }
        }
        Ok(())
    }

    fn write_array(&mut self, items: &[Value], level: usize) -> Result<()> {
        if items.is_empty() {
            self.output.push_str("[]");
            return Ok(());
        }
        self.output.push('[');
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.output.push(',');
            }
            self.write_newline(level + 1);
            self.write_value(item, level + 1)?;
        }
        self.write_newline(level);
        self.output.push(']');
        Ok(())
    }

    fn write_object(&mut self, map: &EscMap, level: usize) -> Result<()> {
        let entries: Vec<_> = map
            .sorted_entries()
            .into_iter()
            .filter(|(_, value)| !value.is_undefined())
            .collect();
        if entries.is_empty() {
            self.output.push_str("{}");
            return Ok(());
        }
        self.output.push('{');
        for (i, (key, value)) in entries.into_iter().enumerate() {
            if i > 0 {
                self.output.push(',');
            }
            self.write_newline(level + 1);
            self.write_quoted(key)?;
            self.output.push(':');
            if self.indent > 0 {
                self.output.push(' ');
            }
            self.write_value(value, level + 1)?;
        }
        self.write_newline(level);
        self.output.push('}');
        Ok(())
    }

    fn write_newline(&mut self, level: usize) {
        if self.indent == 0 {
            return;
        }
        while self.indents.len() <= level {
            let depth = self.indents.len();
            self.indents
                .push(format!("\n{}", " ".repeat(depth * self.indent)));
        }
        self.output.push_str(&self.indents[level]);
    }

    #[inline]
    fn write_quoted(&mut self, s: &str) -> Result<()> {
        self.output.push_str(&serde_json::to_string(s)?);
        Ok(())
    }
}

/// A serializer producing [`Value`] trees.
///
/// # Examples
///
/// ```rust
/// use serde::Serialize;
/// use serde_jsonesc::ser::ValueSerializer;
/// use serde_jsonesc::Value;
///
/// let value = f64::NAN.serialize(ValueSerializer).unwrap();
/// assert!(value.is_nan());
///
/// let value = u64::MAX.serialize(ValueSerializer).unwrap();
/// assert!(value.is_bigint());
/// ```
pub struct ValueSerializer;

pub struct SerializeVec {
    vec: Vec<Value>,
    variant: Option<&'static str>,
}

pub struct SerializeMap {
    map: EscMap,
    current_key: Option<String>,
    variant: Option<&'static str>,
}

impl ser::Serializer for ValueSerializer {
    type Ok = Value;
    type Error = Error;

    type SerializeSeq = SerializeVec;
    type SerializeTuple = SerializeVec;
    type SerializeTupleStruct = SerializeVec;
    type SerializeTupleVariant = SerializeVec;
    type SerializeMap = SerializeMap;
    type SerializeStruct = SerializeMap;
    type SerializeStructVariant = SerializeMap;

    fn serialize_bool(self, v: bool) -> Result<Value> {
        Ok(Value::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_i16(self, v: i16) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_i32(self, v: i32) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_i64(self, v: i64) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_i128(self, v: i128) -> Result<Value> {
        Ok(match i64::try_from(v) {
            Ok(i) => Value::from(i),
            Err(_) => Value::BigInt(BigInt::from(v)),
        })
    }

    fn serialize_u8(self, v: u8) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_u16(self, v: u16) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_u32(self, v: u32) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_u64(self, v: u64) -> Result<Value> {
        Ok(match i64::try_from(v) {
            Ok(i) => Value::from(i),
            Err(_) => Value::BigInt(BigInt::from(v)),
        })
    }

    fn serialize_u128(self, v: u128) -> Result<Value> {
        Ok(match i64::try_from(v) {
            Ok(i) => Value::from(i),
            Err(_) => Value::BigInt(BigInt::from(v)),
        })
    }

    fn serialize_f32(self, v: f32) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_f64(self, v: f64) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_char(self, v: char) -> Result<Value> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Value> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Value> {
        Ok(Value::Binary(v.to_vec()))
    }

    fn serialize_none(self) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_some<T>(self, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Value> {
        Ok(Value::String(variant.to_string()))
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        let mut map = EscMap::with_capacity(1);
        map.insert(variant.to_string(), to_value(value)?);
        Ok(Value::Object(map))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len.unwrap_or(0), None))
    }

    fn serialize_tuple(self, len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len, None))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len, None))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len, Some(variant)))
    }

    fn serialize_map(self, len: Option<usize>) -> Result<SerializeMap> {
        Ok(SerializeMap::new(len.unwrap_or(0), None))
    }

    fn serialize_struct(self, _name: &'static str, len: usize) -> Result<SerializeMap> {
        Ok(SerializeMap::new(len, None))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeMap> {
        Ok(SerializeMap::new(len, Some(variant)))
    }
}

// Wraps `value` as `{variant: value}` for enum variants.
fn wrap_variant(variant: Option<&'static str>, value: Value) -> Value {
    match variant {
        Some(name) => {
            let mut map = EscMap::with_capacity(1);
            map.insert(name.to_string(), value);
            Value::Object(map)
        }
        None => value,
    }
}

impl SerializeVec {
    fn new(capacity: usize, variant: Option<&'static str>) -> Self {
        SerializeVec {
            vec: Vec::with_capacity(capacity),
            variant,
        }
    }

    fn push<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.vec.push(to_value(value)?);
        Ok(())
    }

    fn finish(self) -> Result<Value> {
        Ok(wrap_variant(self.variant, Value::Array(self.vec)))
    }
}

impl SerializeMap {
    fn new(capacity: usize, variant: Option<&'static str>) -> Self {
        SerializeMap {
            map: EscMap::with_capacity(capacity),
            current_key: None,
            variant,
        }
    }

    fn finish(self) -> Result<Value> {
        Ok(wrap_variant(self.variant, Value::Object(self.map)))
    }
}

impl ser::SerializeSeq for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value> {
        self.finish()
    }
}

impl ser::SerializeTuple for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value> {
        self.finish()
    }
}

impl ser::SerializeTupleStruct for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value> {
        self.finish()
    }
}

impl ser::SerializeTupleVariant for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value> {
        self.finish()
    }
}

impl ser::SerializeMap for SerializeMap {
    type Ok = Value;
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = match to_value(key)? {
            Value::String(s) => s,
            Value::Number(Number::Integer(i)) => i.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::BigInt(bi) => bi.to_string(),
            _ => return Err(Error::custom("Map keys must be strings or integers")),
        };
        self.current_key = Some(key);
        Ok(())
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .current_key
            .take()
            .ok_or_else(|| Error::custom("serialize_value called without serialize_key"))?;
        self.map.insert(key, to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        self.finish()
    }
}

impl ser::SerializeStruct for SerializeMap {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.map.insert(key.to_string(), to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        self.finish()
    }
}

impl ser::SerializeStructVariant for SerializeMap {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.map.insert(key.to_string(), to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        self.finish()
    }
}

/// Converts any `Serialize` type into a [`Value`].
///
/// # Errors
///
/// Returns an error if a map key is not a string, integer or boolean, or if
/// the type's `Serialize` implementation fails.
pub fn to_value<T: Serialize + ?Sized>(value: &T) -> Result<Value> {
    value.serialize(ValueSerializer)
}
