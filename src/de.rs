//! Deserialization out of [`Value`] trees.
//!
//! [`ValueDeserializer`] drives any `Deserialize` type from a decoded value
//! tree. It is what [`from_str`](crate::from_str) and
//! [`from_value`](crate::from_value) use after the reviver walk.
//!
//! Extension values are presented in the closest serde data model shape:
//!
//! - `Undefined` and `Null` are unit, and `None` for options
//! - `Date` is its RFC 3339 string (so `chrono`'s serde support reads it)
//! - `Binary` is a byte buffer, or a sequence of `u8` when a sequence is
//!   requested
//! - `BigInt` is its decimal string, or the integer itself when a `u64`,
//!   `i128` or `u128` is requested and it fits
//! - `Custom` is its plain form, or unit when it has none
//!
//! ## Examples
//!
//! ```rust
//! use chrono::{DateTime, TimeZone, Utc};
//! use serde::Deserialize;
//! use serde_jsonesc::{esc, from_value, Value};
//!
//! #[derive(Deserialize, Debug, PartialEq)]
//! struct Event {
//!     at: DateTime<Utc>,
//!     payload: Vec<u8>,
//!     note: Option<String>,
//! }
//!
//! let at = Utc.timestamp_millis_opt(1518030438207).unwrap();
//! let value = esc!({
//!     "at": (Value::Date(at)),
//!     "payload": (Value::Binary(vec![1, 2, 3])),
//!     "note": undefined
//! });
//!
//! let event: Event = from_value(value).unwrap();
//! assert_eq!(event, Event { at, payload: vec![1, 2, 3], note: None });
//! ```

use crate::{Error, EscMap, Number, Result, Value};
use chrono::SecondsFormat;
use serde::de::{self, DeserializeOwned, IntoDeserializer};
use serde::forward_to_deserialize_any;

/// A deserializer reading from an owned [`Value`].
pub struct ValueDeserializer {
    value: Value,
}

impl ValueDeserializer {
    #[must_use]
    pub fn new(value: Value) -> Self {
        ValueDeserializer { value }
    }
}

/// Deserializes a `T` from a [`Value`].
///
/// # Errors
///
/// Returns an error if the value's shape does not match `T`.
pub fn from_value<T: DeserializeOwned>(value: Value) -> Result<T> {
    T::deserialize(ValueDeserializer::new(value))
}

impl<'de> de::Deserializer<'de> for ValueDeserializer {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Undefined | Value::Null => visitor.visit_unit(),
            Value::Bool(b) => visitor.visit_bool(b),
            Value::Number(Number::Integer(i)) => visitor.visit_i64(i),
            Value::Number(n) => visitor.visit_f64(n.as_f64()),
            Value::String(s) => visitor.visit_string(s),
            Value::Array(arr) => visitor.visit_seq(SeqDeserializer::new(arr)),
            Value::Object(obj) => visitor.visit_map(MapDeserializer::new(obj)),
            Value::Date(dt) => visitor.visit_string(dt.to_rfc3339_opts(SecondsFormat::Millis, true)),
            Value::Binary(bytes) => visitor.visit_byte_buf(bytes),
            Value::BigInt(bi) => visitor.visit_string(bi.to_string()),
            Value::Custom(custom) => match custom.to_plain() {
                Some(plain) => ValueDeserializer::new(plain).deserialize_any(visitor),
                None => visitor.visit_unit(),
            },
        }
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Undefined | Value::Null => visitor.visit_none(),
            _ => visitor.visit_some(self),
        }
    }

    fn deserialize_seq<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Binary(bytes) => {
                let elements = bytes.into_iter().map(Value::from).collect();
                visitor.visit_seq(SeqDeserializer::new(elements))
            }
            other => ValueDeserializer::new(other).deserialize_any(visitor),
        }
    }

    fn deserialize_tuple<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_bytes<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_byte_buf(visitor)
    }

    fn deserialize_byte_buf<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Binary(bytes) => visitor.visit_byte_buf(bytes),
            Value::Array(arr) => {
                let bytes = arr
                    .into_iter()
                    .map(|v| {
                        v.as_i64()
                            .and_then(|i| u8::try_from(i).ok())
                            .ok_or_else(|| Error::custom("Expected byte values"))
                    })
                    .collect::<Result<Vec<u8>>>()?;
                visitor.visit_byte_buf(bytes)
            }
            other => ValueDeserializer::new(other).deserialize_any(visitor),
        }
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::String(variant) => visitor.visit_enum(variant.into_deserializer()),
            Value::Object(obj) => {
                let mut iter = obj.into_iter();
                match (iter.next(), iter.next()) {
                    (Some((variant, value)), None) => {
                        visitor.visit_enum(EnumDeserializer::new(variant, value))
                    }
                    _ => Err(Error::custom("Expected enum object with a single key")),
                }
            }
            _ => Err(Error::custom("Expected enum")),
        }
    }

    fn deserialize_u64<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::BigInt(ref bi) => match u64::try_from(bi) {
                Ok(n) => visitor.visit_u64(n),
                Err(_) => Err(Error::custom(format!("{} is out of range for u64", bi))),
            },
            _ => self.deserialize_any(visitor),
        }
    }

    fn deserialize_i128<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::BigInt(ref bi) => match i128::try_from(bi) {
                Ok(n) => visitor.visit_i128(n),
                Err(_) => Err(Error::custom(format!("{} is out of range for i128", bi))),
            },
            _ => self.deserialize_any(visitor),
        }
    }

    fn deserialize_u128<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::BigInt(ref bi) => match u128::try_from(bi) {
                Ok(n) => visitor.visit_u128(n),
                Err(_) => Err(Error::custom(format!("{} is out of range for u128", bi))),
            },
            _ => self.deserialize_any(visitor),
        }
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 u8 u16 u32 f32 f64 char str string
        unit unit_struct tuple_struct map struct identifier ignored_any
    }
}

struct SeqDeserializer {
    iter: std::vec::IntoIter<Value>,
}

impl SeqDeserializer {
    fn new(vec: Vec<Value>) -> Self {
        SeqDeserializer {
            iter: vec.into_iter(),
        }
    }
}

impl<'de> de::SeqAccess<'de> for SeqDeserializer {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some(value) => seed.deserialize(ValueDeserializer::new(value)).map(Some),
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        match self.iter.size_hint() {
            (lower, Some(upper)) if lower == upper => Some(upper),
            _ => None,
        }
    }
}

struct MapDeserializer {
    iter: indexmap::map::IntoIter<String, Value>,
    value: Option<Value>,
}

impl MapDeserializer {
    fn new(map: EscMap) -> Self {
        MapDeserializer {
            iter: map.into_iter(),
            value: None,
        }
    }
}

impl<'de> de::MapAccess<'de> for MapDeserializer {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some((key, value)) => {
                self.value = Some(value);
                seed.deserialize(ValueDeserializer::new(Value::String(key)))
                    .map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'de>,
    {
        match self.value.take() {
            Some(value) => seed.deserialize(ValueDeserializer::new(value)),
            None => Err(Error::custom("next_value_seed called before next_key_seed")),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        match self.iter.size_hint() {
            (lower, Some(upper)) if lower == upper => Some(upper),
            _ => None,
        }
    }
}

struct EnumDeserializer {
    variant: String,
    value: Value,
}

impl EnumDeserializer {
    fn new(variant: String, value: Value) -> Self {
        EnumDeserializer { variant, value }
    }
}

impl<'de> de::EnumAccess<'de> for EnumDeserializer {
    type Error = Error;
    type Variant = VariantDeserializer;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self::Variant)>
    where
        V: de::DeserializeSeed<'de>,
    {
        let variant = seed.deserialize(ValueDeserializer::new(Value::String(self.variant)))?;
        Ok((variant, VariantDeserializer { value: self.value }))
    }
}

struct VariantDeserializer {
    value: Value,
}

impl<'de> de::VariantAccess<'de> for VariantDeserializer {
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        match self.value {
            Value::Null | Value::Undefined => Ok(()),
            _ => Err(Error::custom("Expected unit variant")),
        }
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value>
    where
        T: de::DeserializeSeed<'de>,
    {
        seed.deserialize(ValueDeserializer::new(self.value))
    }

    fn tuple_variant<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Array(arr) => visitor.visit_seq(SeqDeserializer::new(arr)),
            _ => Err(Error::custom("Expected tuple variant")),
        }
    }

    fn struct_variant<V>(self, _fields: &'static [&'static str], visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Object(obj) => visitor.visit_map(MapDeserializer::new(obj)),
            _ => Err(Error::custom("Expected struct variant")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{esc, to_value};
    use num_bigint::BigInt;
    use serde::{Deserialize, Serialize};

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    enum Shape {
        Empty,
        Circle(f64),
        Rect(u32, u32),
        Named { label: String },
    }

    #[test]
    fn test_enum_round_trip() {
        for shape in [
            Shape::Empty,
            Shape::Circle(1.5),
            Shape::Rect(2, 3),
            Shape::Named { label: "x".into() },
        ] {
            let value = to_value(&shape).unwrap();
            let back: Shape = from_value(value).unwrap();
            assert_eq!(back, shape);
        }
    }

    #[test]
    fn test_bigint_as_string() {
        let value = Value::BigInt(BigInt::from(12345));
        let text: String = from_value(value).unwrap();
        assert_eq!(text, "12345");
    }

    #[test]
    fn test_bigint_as_wide_integer() {
        let big: u64 = from_value(Value::BigInt(BigInt::from(u64::MAX))).unwrap();
        assert_eq!(big, u64::MAX);
        let wide: i128 = from_value(Value::BigInt(BigInt::from(i128::MIN))).unwrap();
        assert_eq!(wide, i128::MIN);
        assert!(from_value::<u64>(Value::BigInt(BigInt::from(-1))).is_err());
    }

    #[test]
    fn test_binary_as_sequence() {
        let bytes: Vec<u8> = from_value(Value::Binary(vec![9, 8])).unwrap();
        assert_eq!(bytes, vec![9, 8]);
    }

    #[test]
    fn test_non_finite_floats() {
        let values: Vec<f64> = from_value(esc!([(f64::INFINITY), (f64::NAN)])).unwrap();
        assert!(values[0].is_infinite());
        assert!(values[1].is_nan());
    }

    #[test]
    fn test_undefined_option_fields() {
        #[derive(Deserialize, Debug, PartialEq)]
        struct Partial {
            a: Option<i32>,
            b: Option<i32>,
        }
        let parsed: Partial = from_value(esc!({"a": undefined, "b": 2})).unwrap();
        assert_eq!(parsed, Partial { a: None, b: Some(2) });
    }

    #[test]
    fn test_wrong_shape() {
        assert!(from_value::<Vec<i32>>(esc!({"a": 1})).is_err());
        assert!(from_value::<Shape>(esc!({"Circle": 1, "Rect": [1, 2]})).is_err());
    }
}
