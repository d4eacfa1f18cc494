//! Dynamic value representation for escaped JSON data.
//!
//! This module provides the [`Value`] enum, the tree that
//! [`stringify`](crate::stringify) walks and [`parse`](crate::parse) produces.
//! Next to the JSON primitives it carries the values plain JSON cannot
//! represent: `undefined`, non-finite numbers, timestamps, byte buffers,
//! big integers, and caller-defined [`CustomValue`]s.
//!
//! ## Core Types
//!
//! - [`Value`]: Any value the registry can encode
//! - [`Number`]: Integers, floats and the special values (Infinity, -Infinity, NaN)
//! - [`TypeKey`]: Stable type identity used to look up encoders
//! - [`ExtensionValue`]: Capability trait implemented by custom types
//! - [`CustomValue`]: A shared, type-erased [`ExtensionValue`]
//!
//! ## Creating Values
//!
//! ```rust
//! use serde_jsonesc::{esc, Number, Value};
//!
//! let undefined = Value::Undefined;
//! let nan = Value::from(f64::NAN);
//! assert_eq!(nan, Value::Number(Number::NaN));
//!
//! let obj = esc!({
//!     "name": "Alice",
//!     "blob": (Value::Binary(vec![1, 2, 3]))
//! });
//! assert!(obj.is_object());
//! ```

use crate::EscMap;
use chrono::{DateTime, SecondsFormat, Utc};
use num_bigint::BigInt;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// A stable type-identity token.
///
/// Encoders are looked up by `TypeKey` rather than by inspecting values at
/// runtime. The built-in extension types use the key of their payload type:
///
/// ```rust
/// use serde_jsonesc::{TypeKey, Value};
///
/// assert_eq!(Value::Binary(vec![]).type_key(), Some(TypeKey::of::<Vec<u8>>()));
/// assert_eq!(Value::from(1).type_key(), None);
/// ```
#[derive(Clone, Copy, Debug, Eq)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    /// Returns the key of `T`.
    #[must_use]
    pub fn of<T: ?Sized + 'static>() -> Self {
        TypeKey {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// Returns the type name, for diagnostics only.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[doc(hidden)]
pub trait AsAny {
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[doc(hidden)]
pub trait DynEq {
    fn dyn_eq(&self, other: &dyn Any) -> bool;
}

impl<T: Any + PartialEq> DynEq for T {
    fn dyn_eq(&self, other: &dyn Any) -> bool {
        other.downcast_ref::<T>().is_some_and(|other| self == other)
    }
}

/// Capability trait for caller-defined value types.
///
/// A custom type is encoded by the first of these that applies:
///
/// 1. [`to_plain`](ExtensionValue::to_plain), unless an encoder is registered
///    for the type (registered types always bypass their plain form)
/// 2. the encoder registered for [`type_key`](ExtensionValue::type_key)
/// 3. [`to_escaped`](ExtensionValue::to_escaped), the self-describing hook
///
/// When none applies the value is treated as absent.
///
/// # Examples
///
/// ```rust
/// use serde_jsonesc::{stringify, CustomValue, ExtensionValue, Value};
///
/// #[derive(Debug, PartialEq)]
/// struct Marker;
///
/// impl ExtensionValue for Marker {
///     fn to_escaped(&self, sentinel: char) -> Option<String> {
///         Some(format!("{sentinel}Marker:"))
///     }
/// }
///
/// let json = stringify(&Value::Custom(CustomValue::new(Marker)), None).unwrap();
/// assert_eq!(json, "\"\\u001bMarker:\"");
/// ```
pub trait ExtensionValue: AsAny + DynEq + fmt::Debug + Send + Sync + 'static {
    /// The key encoders for this type are registered under.
    fn type_key(&self) -> TypeKey {
        TypeKey::of::<Self>()
    }

    /// Self-describing hook: the complete escaped string for this value.
    fn to_escaped(&self, _sentinel: char) -> Option<String> {
        None
    }

    /// Generic serialization hook: a plain value to encode in place of this one.
    fn to_plain(&self) -> Option<Value> {
        None
    }
}

/// A shared, type-erased [`ExtensionValue`].
#[derive(Clone)]
pub struct CustomValue(Arc<dyn ExtensionValue>);

impl CustomValue {
    /// Wraps a custom value.
    pub fn new<T: ExtensionValue>(value: T) -> Self {
        CustomValue(Arc::new(value))
    }

    /// Returns the key encoders for this value are registered under.
    #[must_use]
    pub fn type_key(&self) -> TypeKey {
        self.inner().type_key()
    }

    /// Returns the wrapped value if it is a `T`.
    #[must_use]
    pub fn downcast_ref<T: ExtensionValue>(&self) -> Option<&T> {
        self.inner().as_any().downcast_ref::<T>()
    }

    /// Returns `true` if the wrapped value is a `T`.
    #[must_use]
    pub fn is<T: ExtensionValue>(&self) -> bool {
        self.inner().as_any().is::<T>()
    }

    // Method calls on the `Arc` itself would pick the blanket `AsAny` impl
    // for `Arc<dyn ExtensionValue>`.
    fn inner(&self) -> &dyn ExtensionValue {
        &*self.0
    }

    pub(crate) fn to_escaped(&self, sentinel: char) -> Option<String> {
        self.inner().to_escaped(sentinel)
    }

    pub(crate) fn to_plain(&self) -> Option<Value> {
        self.inner().to_plain()
    }
}

impl fmt::Debug for CustomValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.inner(), f)
    }
}

impl PartialEq for CustomValue {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.inner().dyn_eq(other.inner().as_any())
    }
}

/// A dynamically-typed representation of any value the registry can encode.
///
/// # Examples
///
/// ```rust
/// use serde_jsonesc::{Number, Value};
///
/// let null = Value::Null;
/// let num = Value::Number(Number::Integer(42));
/// let text = Value::String("hello".to_string());
///
/// assert!(null.is_null());
/// assert!(num.is_number());
/// assert!(text.is_string());
/// assert!(Value::Undefined.is_undefined());
/// ```
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Value {
    /// The absence-of-value marker
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Array(Vec<Value>),
    Object(EscMap),
    Date(DateTime<Utc>),
    Binary(Vec<u8>),
    BigInt(BigInt),
    Custom(CustomValue),
}

/// A numeric value that can be an integer, float, or a special value.
///
/// Special values never reach the JSON printer; they are written as short
/// sentinel literals instead.
///
/// # Examples
///
/// ```rust
/// use serde_jsonesc::Number;
///
/// let integer = Number::Integer(42);
/// let infinity = Number::from(f64::INFINITY);
///
/// assert_eq!(integer.as_i64(), Some(42));
/// assert_eq!(infinity, Number::Infinity);
/// assert!(infinity.is_special());
/// assert!(Number::from(f64::NAN).is_special());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Number {
    Integer(i64),
    Float(f64),
    Infinity,
    NegativeInfinity,
    NaN,
}

impl Number {
    /// Returns `true` if this is an integer value.
    #[inline]
    #[must_use]
    pub const fn is_integer(&self) -> bool {
        matches!(self, Number::Integer(_))
    }

    /// Returns `true` if this is a floating-point value.
    #[inline]
    #[must_use]
    pub const fn is_float(&self) -> bool {
        matches!(self, Number::Float(_))
    }

    /// Returns `true` if this is a special value, including a non-finite
    /// [`Number::Float`].
    #[inline]
    #[must_use]
    pub fn is_special(&self) -> bool {
        match self {
            Number::Infinity | Number::NegativeInfinity | Number::NaN => true,
            Number::Float(f) => !f.is_finite(),
            Number::Integer(_) => false,
        }
    }

    /// Returns the special value this number denotes, folding non-finite
    /// floats into the dedicated variants.
    #[must_use]
    pub fn special(&self) -> Option<Number> {
        match self {
            Number::Integer(_) => None,
            Number::Float(f) if f.is_finite() => None,
            Number::Float(f) if f.is_nan() => Some(Number::NaN),
            Number::Float(f) if *f > 0.0 => Some(Number::Infinity),
            Number::Float(_) => Some(Number::NegativeInfinity),
            special => Some(special.clone()),
        }
    }

    /// Converts this number to an `i64` if possible.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_jsonesc::Number;
    ///
    /// assert_eq!(Number::Integer(42).as_i64(), Some(42));
    /// assert_eq!(Number::Float(42.0).as_i64(), Some(42));
    /// assert_eq!(Number::Float(42.5).as_i64(), None);
    /// assert_eq!(Number::Infinity.as_i64(), None);
    /// ```
    #[inline]
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Number::Integer(i) => Some(*i),
            Number::Float(f) => {
                if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64 {
                    Some(*f as i64)
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    /// Converts this number to an `f64`.
    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> f64 {
        match self {
            Number::Integer(i) => *i as f64,
            Number::Float(f) => *f,
            Number::Infinity => f64::INFINITY,
            Number::NegativeInfinity => f64::NEG_INFINITY,
            Number::NaN => f64::NAN,
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Integer(i) => write!(f, "{}", i),
            Number::Float(fl) => write!(f, "{}", fl),
            Number::Infinity => write!(f, "Infinity"),
            Number::NegativeInfinity => write!(f, "-Infinity"),
            Number::NaN => write!(f, "NaN"),
        }
    }
}

macro_rules! number_from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Number {
                fn from(value: $ty) -> Self {
                    Number::Integer(value as i64)
                }
            }

            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::Number(Number::from(value))
                }
            }
        )*
    };
}

number_from_integer!(i8, i16, i32, i64, u8, u16, u32);

impl From<f64> for Number {
    fn from(value: f64) -> Self {
        if value.is_nan() {
            Number::NaN
        } else if value == f64::INFINITY {
            Number::Infinity
        } else if value == f64::NEG_INFINITY {
            Number::NegativeInfinity
        } else {
            Number::Float(value)
        }
    }
}

impl From<f32> for Number {
    fn from(value: f32) -> Self {
        Number::from(value as f64)
    }
}

impl Value {
    /// Returns `true` if the value is the absence marker.
    #[inline]
    #[must_use]
    pub const fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    /// Returns `true` if the value is null.
    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns `true` if the value is a boolean.
    #[inline]
    #[must_use]
    pub const fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    /// Returns `true` if the value is a number.
    #[inline]
    #[must_use]
    pub const fn is_number(&self) -> bool {
        matches!(self, Value::Number(_))
    }

    /// Returns `true` if the value is NaN.
    #[inline]
    #[must_use]
    pub fn is_nan(&self) -> bool {
        matches!(self, Value::Number(n) if n.special() == Some(Number::NaN))
    }

    /// Returns `true` if the value is a string.
    #[inline]
    #[must_use]
    pub const fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    /// Returns `true` if the value is an array.
    #[inline]
    #[must_use]
    pub const fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    /// Returns `true` if the value is an object.
    #[inline]
    #[must_use]
    pub const fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    /// Returns `true` if the value is a date.
    #[inline]
    #[must_use]
    pub const fn is_date(&self) -> bool {
        matches!(self, Value::Date(_))
    }

    /// Returns `true` if the value is a byte buffer.
    #[inline]
    #[must_use]
    pub const fn is_binary(&self) -> bool {
        matches!(self, Value::Binary(_))
    }

    /// Returns `true` if the value is a big integer.
    #[inline]
    #[must_use]
    pub const fn is_bigint(&self) -> bool {
        matches!(self, Value::BigInt(_))
    }

    /// If the value is a boolean, returns it. Otherwise returns `None`.
    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// If the value is a string, returns a reference to it. Otherwise returns `None`.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// If the value is an i64 integer or a whole-number float, returns it.
    #[inline]
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    /// If the value is a number, returns it as an `f64`.
    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(n.as_f64()),
            _ => None,
        }
    }

    /// If the value is an array, returns a reference to it. Otherwise returns `None`.
    #[inline]
    #[must_use]
    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(arr) => Some(arr),
            _ => None,
        }
    }

    /// If the value is an object, returns a reference to it. Otherwise returns `None`.
    #[inline]
    #[must_use]
    pub fn as_object(&self) -> Option<&EscMap> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// If the value is a date, returns a reference to it. Otherwise returns `None`.
    #[inline]
    #[must_use]
    pub fn as_date(&self) -> Option<&DateTime<Utc>> {
        match self {
            Value::Date(dt) => Some(dt),
            _ => None,
        }
    }

    /// If the value is a byte buffer, returns it. Otherwise returns `None`.
    #[inline]
    #[must_use]
    pub fn as_binary(&self) -> Option<&[u8]> {
        match self {
            Value::Binary(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// If the value is a big integer, returns a reference to it. Otherwise returns `None`.
    #[inline]
    #[must_use]
    pub fn as_bigint(&self) -> Option<&BigInt> {
        match self {
            Value::BigInt(bi) => Some(bi),
            _ => None,
        }
    }

    /// If the value is a custom value of type `T`, returns it.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_jsonesc::{CustomValue, ExtensionValue, Value};
    ///
    /// #[derive(Debug, PartialEq)]
    /// struct Point(i32, i32);
    /// impl ExtensionValue for Point {}
    ///
    /// let value = Value::Custom(CustomValue::new(Point(1, 2)));
    /// assert_eq!(value.downcast_ref::<Point>(), Some(&Point(1, 2)));
    /// ```
    #[must_use]
    pub fn downcast_ref<T: ExtensionValue>(&self) -> Option<&T> {
        match self {
            Value::Custom(custom) => custom.downcast_ref::<T>(),
            _ => None,
        }
    }

    /// Returns the type key of extension-bearing values, `None` for JSON
    /// primitives and containers.
    #[must_use]
    pub fn type_key(&self) -> Option<TypeKey> {
        match self {
            Value::Date(_) => Some(TypeKey::of::<DateTime<Utc>>()),
            Value::Binary(_) => Some(TypeKey::of::<Vec<u8>>()),
            Value::BigInt(_) => Some(TypeKey::of::<BigInt>()),
            Value::Custom(custom) => Some(custom.type_key()),
            _ => None,
        }
    }

    /// The value's own JSON form, used when no extension encoder is active for
    /// its type: dates become ISO-8601 strings, buffers become arrays of byte
    /// values, custom values defer to [`ExtensionValue::to_plain`].
    pub(crate) fn plain_form(&self) -> Option<Value> {
        match self {
            Value::Date(dt) => Some(Value::String(
                dt.to_rfc3339_opts(SecondsFormat::Millis, true),
            )),
            Value::Binary(bytes) => Some(Value::Array(bytes.iter().map(|&b| Value::from(b)).collect())),
            Value::Custom(custom) => custom.to_plain(),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "undefined"),
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "{:?}", s),
            Value::Array(arr) => {
                write!(
                    f,
                    "[{}]",
                    arr.iter()
                        .map(|v| v.to_string())
                        .collect::<Vec<_>>()
                        .join(",")
                )
            }
            Value::Object(_) => write!(f, "{{object}}"),
            Value::Date(dt) => write!(f, "{}", dt.to_rfc3339_opts(SecondsFormat::Millis, true)),
            Value::Binary(bytes) => write!(f, "<{} bytes>", bytes.len()),
            Value::BigInt(bi) => write!(f, "{}n", bi),
            Value::Custom(custom) => write!(f, "{:?}", custom),
        }
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Undefined | Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(Number::Integer(i)) => serializer.serialize_i64(*i),
            Value::Number(n) => serializer.serialize_f64(n.as_f64()),
            Value::String(s) => serializer.serialize_str(s),
            Value::Array(arr) => {
                use serde::ser::SerializeSeq;
                let mut seq = serializer.serialize_seq(Some(arr.len()))?;
                for element in arr {
                    seq.serialize_element(element)?;
                }
                seq.end()
            }
            Value::Object(obj) => {
                use serde::ser::SerializeMap;
                let present = obj.values().filter(|v| !v.is_undefined()).count();
                let mut map = serializer.serialize_map(Some(present))?;
                for (k, v) in obj.iter().filter(|(_, v)| !v.is_undefined()) {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
            Value::Date(dt) => {
                serializer.serialize_str(&dt.to_rfc3339_opts(SecondsFormat::Millis, true))
            }
            Value::Binary(bytes) => serializer.serialize_bytes(bytes),
            Value::BigInt(bi) => serializer.serialize_str(&bi.to_string()),
            Value::Custom(custom) => match custom.to_plain() {
                Some(plain) => plain.serialize(serializer),
                None => serializer.serialize_unit(),
            },
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct ValueVisitor;

        impl<'de> Visitor<'de> for ValueVisitor {
            type Value = Value;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("any valid JSON value")
            }

            fn visit_bool<E>(self, value: bool) -> Result<Self::Value, E> {
                Ok(Value::Bool(value))
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E> {
                Ok(Value::Number(Number::Integer(value)))
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E> {
                Ok(match i64::try_from(value) {
                    Ok(i) => Value::Number(Number::Integer(i)),
                    Err(_) => Value::BigInt(BigInt::from(value)),
                })
            }

            fn visit_i128<E>(self, value: i128) -> Result<Self::Value, E> {
                Ok(match i64::try_from(value) {
                    Ok(i) => Value::Number(Number::Integer(i)),
                    Err(_) => Value::BigInt(BigInt::from(value)),
                })
            }

            fn visit_u128<E>(self, value: u128) -> Result<Self::Value, E> {
                Ok(match i64::try_from(value) {
                    Ok(i) => Value::Number(Number::Integer(i)),
                    Err(_) => Value::BigInt(BigInt::from(value)),
                })
            }

            fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E> {
                Ok(Value::from(value))
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E> {
                Ok(Value::String(value.to_string()))
            }

            fn visit_string<E>(self, value: String) -> Result<Self::Value, E> {
                Ok(Value::String(value))
            }

            fn visit_bytes<E>(self, value: &[u8]) -> Result<Self::Value, E> {
                Ok(Value::Binary(value.to_vec()))
            }

            fn visit_byte_buf<E>(self, value: Vec<u8>) -> Result<Self::Value, E> {
                Ok(Value::Binary(value))
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E> {
                Ok(Value::Null)
            }

            fn visit_none<E>(self) -> Result<Self::Value, E> {
                Ok(Value::Null)
            }

            fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                Deserialize::deserialize(deserializer)
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: de::SeqAccess<'de>,
            {
                let mut vec = Vec::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(elem) = seq.next_element()? {
                    vec.push(elem);
                }
                Ok(Value::Array(vec))
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: de::MapAccess<'de>,
            {
                let mut values = EscMap::new();
                while let Some((key, value)) = map.next_entry()? {
                    values.insert(key, value);
                }
                Ok(Value::Object(values))
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}

// TryFrom implementations for extracting values from Value
impl TryFrom<Value> for i64 {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::Number(Number::Integer(i)) => Ok(i),
            Value::Number(Number::Float(f)) => {
                if f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 {
                    Ok(f as i64)
                } else {
                    Err(crate::Error::custom(format!(
                        "cannot convert float {} to i64",
                        f
                    )))
                }
            }
            _ => Err(crate::Error::custom(format!(
                "expected integer, found {:?}",
                value
            ))),
        }
    }
}

impl TryFrom<Value> for f64 {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::Number(n) => Ok(n.as_f64()),
            _ => Err(crate::Error::custom(format!(
                "expected number, found {:?}",
                value
            ))),
        }
    }
}

impl TryFrom<Value> for bool {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::Bool(b) => Ok(b),
            _ => Err(crate::Error::custom(format!(
                "expected bool, found {:?}",
                value
            ))),
        }
    }
}

impl TryFrom<Value> for String {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::String(s) => Ok(s),
            _ => Err(crate::Error::custom(format!(
                "expected string, found {:?}",
                value
            ))),
        }
    }
}

impl TryFrom<Value> for Vec<u8> {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::Binary(bytes) => Ok(bytes),
            _ => Err(crate::Error::custom(format!(
                "expected binary, found {:?}",
                value
            ))),
        }
    }
}

// From implementations for creating Value from Rust types
impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Number(Number::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(Number::from(value))
    }
}

impl From<Number> for Value {
    fn from(value: Number) -> Self {
        Value::Number(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::Array(value)
    }
}

impl From<EscMap> for Value {
    fn from(value: EscMap) -> Self {
        Value::Object(value)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Value::Date(value)
    }
}

impl From<BigInt> for Value {
    fn from(value: BigInt) -> Self {
        Value::BigInt(value)
    }
}

impl From<CustomValue> for Value {
    fn from(value: CustomValue) -> Self {
        Value::Custom(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Undefined, Into::into)
    }
}
