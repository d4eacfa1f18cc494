//! Payload codecs for the built-in extensions.
//!
//! Each built-in tag pairs a payload writer with a payload reader. The
//! functions here work on payload text only; the [`Extension`] builders at the
//! bottom of the module attach them to their tags and type keys.
//!
//! | tag | value | payload |
//! |---|---|---|
//! | `Date` | [`Value::Date`] | ISO-8601 with milliseconds, or epoch milliseconds |
//! | `Bin` | [`Value::Binary`] | radix-93 packed bytes |
//! | `B91` | [`Value::Binary`] | radix-91 packed bytes |
//! | `B64` | [`Value::Binary`] | padded standard base64 |
//! | `n`, `BigInt` | [`Value::BigInt`] | decimal digits |
//! | `Number` | [`Value::Number`] | a JSON number (primitive mode) |
//! | `Str` | [`Value::String`] | the string itself |
//!
//! ## Examples
//!
//! ```rust
//! use serde_jsonesc::codec::{decode_date, encode_date};
//! use serde_jsonesc::{DateFormat, Value};
//! use chrono::{TimeZone, Utc};
//!
//! let dt = Utc.timestamp_millis_opt(1518030438207).unwrap();
//! assert_eq!(encode_date(&dt, DateFormat::Iso8601), "2018-02-07T19:07:18.207Z");
//! assert_eq!(encode_date(&dt, DateFormat::EpochMillis), "1518030438207");
//! assert_eq!(decode_date("1518030438207"), Value::Date(dt));
//! ```

use crate::packer::Packer;
use crate::registry::Extension;
use crate::{DateFormat, Error, Number, Result, TypeKey, Value};
use base64::prelude::*;
use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
use log::trace;
use num_bigint::BigInt;
use std::str::FromStr;

pub const DATE_TAG: &str = "Date";
pub const PACKED_93_TAG: &str = "Bin";
pub const PACKED_91_TAG: &str = "B91";
pub const BASE64_TAG: &str = "B64";
pub const BIGINT_TAG: &str = "n";
pub const LEGACY_BIGINT_TAG: &str = "BigInt";
pub const NUMBER_TAG: &str = "Number";
pub const STRING_TAG: &str = "Str";

/// Writes a timestamp payload.
#[must_use]
pub fn encode_date(dt: &DateTime<Utc>, format: DateFormat) -> String {
    match format {
        DateFormat::Iso8601 => dt.to_rfc3339_opts(SecondsFormat::Millis, true),
        DateFormat::EpochMillis => dt.timestamp_millis().to_string(),
    }
}

/// Reads a timestamp payload in either representation.
///
/// A payload that is neither an RFC 3339 timestamp nor an in-range integer
/// decodes to [`Value::Undefined`].
#[must_use]
pub fn decode_date(payload: &str) -> Value {
    if let Ok(dt) = DateTime::parse_from_rfc3339(payload) {
        return Value::Date(dt.with_timezone(&Utc));
    }
    if let Some(dt) = i64::from_str(payload)
        .ok()
        .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
    {
        return Value::Date(dt);
    }
    trace!("unreadable date payload `{}`", payload);
    Value::Undefined
}

/// Writes a big integer payload.
#[must_use]
pub fn encode_bigint(value: &BigInt) -> String {
    value.to_string()
}

/// Reads a big integer payload.
///
/// # Errors
///
/// Returns [`Error::InvalidPayload`] when the payload is not a decimal integer.
pub fn decode_bigint(tag: &str, payload: &str) -> Result<Value> {
    BigInt::from_str(payload.trim())
        .map(Value::BigInt)
        .map_err(|e| Error::invalid_payload(tag, e))
}

/// Writes a base64 payload.
#[must_use]
pub fn encode_base64(bytes: &[u8]) -> String {
    BASE64_STANDARD.encode(bytes)
}

/// Reads a base64 payload.
///
/// # Errors
///
/// Returns [`Error::InvalidPayload`] when the payload is not padded base64.
pub fn decode_base64(payload: &str) -> Result<Value> {
    BASE64_STANDARD
        .decode(payload)
        .map(Value::Binary)
        .map_err(|e| Error::invalid_payload(BASE64_TAG, e))
}

/// Writes a finite number the way JSON does.
///
/// Floats keep a fractional part (`2.0`) so they read back as floats.
///
/// ```rust
/// use serde_jsonesc::codec::encode_number;
/// use serde_jsonesc::Number;
///
/// assert_eq!(encode_number(&Number::Float(1.25)), "1.25");
/// assert_eq!(encode_number(&Number::Float(2.0)), "2.0");
/// assert_eq!(encode_number(&Number::Integer(-7)), "-7");
/// ```
#[must_use]
pub fn encode_number(number: &Number) -> String {
    match number {
        Number::Integer(i) => i.to_string(),
        Number::Float(f) => serde_json::Number::from_f64(*f)
            .map_or_else(|| number.to_string(), |n| n.to_string()),
        special => special.to_string(),
    }
}

/// Reads a number payload: an integer when it fits `i64`, a float otherwise.
///
/// # Errors
///
/// Returns [`Error::InvalidPayload`] when the payload is not numeric.
pub fn decode_number(payload: &str) -> Result<Value> {
    let payload = payload.trim();
    if let Ok(i) = i64::from_str(payload) {
        return Ok(Value::Number(Number::Integer(i)));
    }
    f64::from_str(payload)
        .map(Value::from)
        .map_err(|e| Error::invalid_payload(NUMBER_TAG, e))
}

fn mismatch(tag: &str, value: &Value) -> Error {
    Error::unsupported_type(&format!("`{}` encoder cannot write {:?}", tag, value))
}

/// The `Date` extension.
#[must_use]
pub fn date_extension(format: DateFormat) -> Extension {
    Extension::new(DATE_TAG)
        .with_encoder(TypeKey::of::<DateTime<Utc>>(), move |value| match value {
            Value::Date(dt) => Ok(encode_date(dt, format)),
            other => Err(mismatch(DATE_TAG, other)),
        })
        .with_decoder(|payload| Ok(decode_date(payload)))
}

/// A packed byte-buffer extension, meant for
/// [`register_raw`](crate::ExtensionRegistry::register_raw).
///
/// The encoder writes the whole escaped string in one allocation and the
/// decoder unpacks from just after the prefix. With `encode` unset the
/// extension is decode-only.
#[must_use]
pub fn packed_extension(packer: Packer, tag: &str, sentinel: char, encode: bool) -> Extension {
    let prefix = format!("{}{}:", sentinel, tag);
    let offset = prefix.len();
    let owned_tag = tag.to_string();
    let ext = Extension::new(tag).with_decoder(move |text| {
        Ok(Value::Binary(packer.decode_range(text, offset, None)))
    });
    if !encode {
        return ext;
    }
    ext.with_encoder(TypeKey::of::<Vec<u8>>(), move |value| match value {
        Value::Binary(bytes) => Ok(packer.encode_with_prefix(bytes, &prefix)),
        other => Err(mismatch(&owned_tag, other)),
    })
}

/// The `B64` extension. With `encode` unset the extension is decode-only.
#[must_use]
pub fn base64_extension(encode: bool) -> Extension {
    let ext = Extension::new(BASE64_TAG).with_decoder(decode_base64);
    if !encode {
        return ext;
    }
    ext.with_encoder(TypeKey::of::<Vec<u8>>(), |value| match value {
        Value::Binary(bytes) => Ok(encode_base64(bytes)),
        other => Err(mismatch(BASE64_TAG, other)),
    })
}

/// The big integer extension under `tag`. With `encode` unset the extension
/// is decode-only.
#[must_use]
pub fn bigint_extension(tag: &'static str, encode: bool) -> Extension {
    let ext = Extension::new(tag).with_decoder(move |payload| decode_bigint(tag, payload));
    if !encode {
        return ext;
    }
    ext.with_encoder(TypeKey::of::<BigInt>(), move |value| match value {
        Value::BigInt(bi) => Ok(encode_bigint(bi)),
        other => Err(mismatch(tag, other)),
    })
}

/// The decode-only `Number` extension used in primitive mode.
#[must_use]
pub fn number_extension() -> Extension {
    Extension::new(NUMBER_TAG).with_decoder(decode_number)
}

/// The decode-only `Str` extension.
#[must_use]
pub fn string_extension() -> Extension {
    Extension::new(STRING_TAG).with_decoder(|payload| Ok(Value::String(payload.to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_before_epoch() {
        let dt = Utc.timestamp_millis_opt(-1).unwrap();
        assert_eq!(encode_date(&dt, DateFormat::Iso8601), "1969-12-31T23:59:59.999Z");
        assert_eq!(decode_date("1969-12-31T23:59:59.999Z"), Value::Date(dt));
        assert_eq!(decode_date("-1"), Value::Date(dt));
    }

    #[test]
    fn test_date_with_offset() {
        let expected = Utc.timestamp_millis_opt(1518030438207).unwrap();
        assert_eq!(
            decode_date("2018-02-07T20:07:18.207+01:00"),
            Value::Date(expected)
        );
    }

    #[test]
    fn test_unreadable_date_is_undefined() {
        assert_eq!(decode_date("yesterday"), Value::Undefined);
        assert_eq!(decode_date(""), Value::Undefined);
        assert_eq!(decode_date(&i64::MAX.to_string()), Value::Undefined);
    }

    #[test]
    fn test_bigint() {
        let big = BigInt::from_str("-123456789012345678901234567890").unwrap();
        assert_eq!(decode_bigint("n", &encode_bigint(&big)).unwrap(), Value::BigInt(big));
        assert!(matches!(
            decode_bigint("n", "12x"),
            Err(Error::InvalidPayload { tag, .. }) if tag == "n"
        ));
    }

    #[test]
    fn test_base64() {
        assert_eq!(encode_base64(&[91, 82, 112, 207]), "W1Jwzw==");
        assert_eq!(decode_base64("W1Jwzw==").unwrap(), Value::Binary(vec![91, 82, 112, 207]));
        assert!(decode_base64("W1Jw*w==").is_err());
    }

    #[test]
    fn test_number() {
        assert_eq!(decode_number("1.25").unwrap(), Value::from(1.25));
        assert_eq!(decode_number("42").unwrap(), Value::from(42));
        assert_eq!(decode_number("2.0").unwrap(), Value::Number(Number::Float(2.0)));
        assert!(decode_number("one").is_err());
    }

    #[test]
    fn test_packed_extension_is_decode_only_when_asked() {
        let ext = packed_extension(crate::packer::BASE91, PACKED_91_TAG, '\u{1b}', false);
        assert!(!ext.has_encoder());
        assert!(ext.has_decoder());
    }
}
