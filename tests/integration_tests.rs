use chrono::{DateTime, TimeZone, Utc};
use num_bigint::BigInt;
use serde::{Deserialize, Serialize};
use serde_jsonesc::{
    decode, encode, esc, from_str, parse, stringify, stringify_sorted, to_string, BinaryFormat,
    CustomValue, DateFormat, Error, EscOptions, Extension, ExtensionValue, JsonEsc, Number,
    TypeKey, Value, ARROW_SENTINEL,
};
use std::str::FromStr;

fn date(ms: i64) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(ms).unwrap()
}

fn arrow() -> JsonEsc {
    JsonEsc::with_options(EscOptions::new().with_sentinel(ARROW_SENTINEL))
}

fn arrow_primitive() -> JsonEsc {
    JsonEsc::with_options(
        EscOptions::new()
            .with_sentinel(ARROW_SENTINEL)
            .with_primitive(true),
    )
}

#[test]
fn test_special_numbers() {
    assert_eq!(stringify(&Value::from(f64::NAN), None).unwrap(), r#""\u001bNaN""#);
    assert_eq!(stringify(&Value::from(f64::INFINITY), None).unwrap(), r#""\u001bInf""#);
    assert_eq!(stringify(&Value::from(f64::NEG_INFINITY), None).unwrap(), r#""\u001b-Inf""#);
    assert_eq!(stringify(&Value::from(1.25), None).unwrap(), "1.25");

    assert!(parse(r#""\u001bNaN""#).unwrap().is_nan());
    assert_eq!(parse(r#""\u001bInf""#).unwrap(), Value::Number(Number::Infinity));
    assert_eq!(parse(r#""\u001b-Inf""#).unwrap(), Value::Number(Number::NegativeInfinity));
}

#[test]
fn test_arrow_sentinel_encoding() {
    let esc = arrow();
    assert_eq!(esc.stringify(&Value::from(f64::NAN), None).unwrap(), "\"\u{362}NaN\"");
    assert_eq!(esc.stringify(&Value::Undefined, None).unwrap(), "\"\u{362}\"");
    assert_eq!(esc.stringify(&esc!({"a": undefined}), None).unwrap(), "{}");
    assert_eq!(esc.stringify(&esc!([undefined]), None).unwrap(), "[\"\u{362}\"]");
    assert_eq!(esc.stringify_sorted(&Value::Undefined, None).unwrap(), "\"\u{362}\"");
    assert_eq!(esc.stringify_sorted(&esc!({"a": undefined}), None).unwrap(), "{}");
    assert_eq!(esc.stringify_sorted(&esc!([undefined]), None).unwrap(), "[\"\u{362}\"]");
}

#[test]
fn test_date() {
    let dt = date(1518030438207);
    let text = stringify(&Value::Date(dt), None).unwrap();
    assert_eq!(text, r#""\u001bDate:2018-02-07T19:07:18.207Z""#);
    assert_eq!(parse(&text).unwrap(), Value::Date(dt));
    assert_eq!(
        parse(&text).unwrap().as_date().map(|d| d.timestamp_millis()),
        Some(1518030438207)
    );
}

#[test]
fn test_date_before_1970() {
    let dt = date(-1);
    let text = stringify(&Value::Date(dt), None).unwrap();
    assert_eq!(text, r#""\u001bDate:1969-12-31T23:59:59.999Z""#);
    assert_eq!(parse(&text).unwrap(), Value::Date(dt));
}

#[test]
fn test_date_epoch_millis() {
    let esc = JsonEsc::with_options(EscOptions::new().with_date_format(DateFormat::EpochMillis));
    let dt = date(1518030438207);
    let text = esc.stringify(&Value::Date(dt), None).unwrap();
    assert_eq!(text, r#""\u001bDate:1518030438207""#);
    // either payload form is read by any instance
    assert_eq!(parse(&text).unwrap(), Value::Date(dt));
}

#[test]
fn test_unreadable_date_is_undefined() {
    assert_eq!(parse(r#""\u001bDate:not a date""#).unwrap(), Value::Undefined);
    assert_eq!(parse(r#"{"d":"\u001bDate:2018-13-45"}"#).unwrap(), esc!({}));
}

#[test]
fn test_binary_base93() {
    let bin = Value::Binary(vec![91, 82, 112, 207]);
    let text = stringify(&bin, None).unwrap();
    assert_eq!(text, r#""\u001bBin:xy'/z""#);
    assert_eq!(parse(&text).unwrap(), bin);
}

#[test]
fn test_binary_base64() {
    let esc = JsonEsc::with_options(EscOptions::new().with_binary_format(BinaryFormat::Base64));
    let bin = Value::Binary(vec![91, 82, 112, 207]);
    let text = esc.stringify(&bin, None).unwrap();
    assert_eq!(text, r#""\u001bB64:W1Jwzw==""#);
    assert_eq!(esc.parse(&text).unwrap(), bin);
    // the default instance reads base64 too
    assert_eq!(parse(&text).unwrap(), bin);
}

#[test]
fn test_binary_base91() {
    let esc = JsonEsc::with_options(EscOptions::new().with_binary_format(BinaryFormat::Base91));
    let bin = Value::Binary(vec![1]);
    let text = esc.stringify(&bin, None).unwrap();
    assert_eq!(text, r#""\u001bB91:BA""#);
    assert_eq!(parse(&text).unwrap(), bin);
}

#[test]
fn test_binary_disabled() {
    let esc = JsonEsc::with_options(EscOptions::new().with_binary_format(BinaryFormat::Disabled));
    let text = esc.stringify(&Value::Binary(vec![1, 2]), None).unwrap();
    assert_eq!(text, "[1,2]");
    assert_eq!(esc.parse(r#""\u001bBin:xy'/z""#).unwrap(), Value::Undefined);
}

#[test]
fn test_bad_base64_payload_is_an_error() {
    let err = parse(r#""\u001bB64:%%%""#).unwrap_err();
    assert!(matches!(err, Error::InvalidPayload { ref tag, .. } if tag == "B64"));
}

#[test]
fn test_bigint() {
    let big = BigInt::from_str("123456789012345678901234567890").unwrap();
    let text = stringify(&Value::BigInt(big.clone()), None).unwrap();
    assert_eq!(text, r#""\u001bn:123456789012345678901234567890""#);
    assert_eq!(parse(&text).unwrap(), Value::BigInt(big.clone()));
    assert_eq!(
        parse(r#""\u001bBigInt:123456789012345678901234567890""#).unwrap(),
        Value::BigInt(big)
    );
    assert!(matches!(
        parse(r#""\u001bn:12x""#),
        Err(Error::InvalidPayload { .. })
    ));
}

#[test]
fn test_undefined_placement() {
    assert_eq!(stringify(&Value::Undefined, None).unwrap(), r#""\u001b""#);
    assert_eq!(stringify(&esc!({"a": undefined}), None).unwrap(), "{}");
    assert_eq!(stringify(&esc!([undefined]), None).unwrap(), r#"["\u001b"]"#);
    assert_eq!(parse(r#"["\u001b"]"#).unwrap(), esc!([undefined]));
    assert_eq!(parse(r#"{"a":"\u001b"}"#).unwrap(), esc!({}));
}

#[test]
fn test_unknown_tags_never_fail() {
    for text in [
        r#""\u001bWhatever:payload""#,
        r#""\u001bno colon here""#,
        r#""\u001b:empty tag""#,
        r#""\u001btrue""#,
        r#""\u001b{\"a\":1}""#,
    ] {
        assert_eq!(parse(text).unwrap(), Value::Undefined, "{}", text);
    }
}

#[test]
fn test_sentinel_string_round_trip() {
    let value = esc!(["\u{1b}", "\u{1b}Date:2018-02-07T19:07:18.207Z", "plain"]);
    let text = stringify(&value, None).unwrap();
    assert_eq!(
        text,
        r#"["\u001bStr:\u001b","\u001bStr:\u001bDate:2018-02-07T19:07:18.207Z","plain"]"#
    );
    assert_eq!(parse(&text).unwrap(), value);
}

#[test]
fn test_stringify_sorted() {
    let forward = esc!({"c": 1, "a": 2, "b": 3});
    let backward = esc!({"b": 3, "a": 2, "c": 1});
    assert_eq!(stringify_sorted(&forward, None).unwrap(), r#"{"a":2,"b":3,"c":1}"#);
    assert_eq!(stringify_sorted(&backward, None).unwrap(), r#"{"a":2,"b":3,"c":1}"#);
    assert_eq!(
        stringify_sorted(&forward, Some(1)).unwrap(),
        "{\n \"a\": 2,\n \"b\": 3,\n \"c\": 1\n}"
    );
}

#[test]
fn test_stringify_indent() {
    let value = esc!({"b": [1, 2], "a": {}});
    assert_eq!(
        stringify(&value, Some(1)).unwrap(),
        "{\n \"b\": [\n  1,\n  2\n ],\n \"a\": {}\n}"
    );
    assert_eq!(stringify(&value, Some(0)).unwrap(), r#"{"b":[1,2],"a":{}}"#);
}

#[test]
fn test_primitive_mode_encode() {
    let esc = arrow_primitive();
    assert_eq!(esc.encode(&Value::from(true)).unwrap(), "\u{362}true");
    assert_eq!(esc.encode(&Value::from(false)).unwrap(), "\u{362}false");
    assert_eq!(esc.encode(&Value::Null).unwrap(), "\u{362}null");
    assert_eq!(esc.encode(&Value::from(1.25)).unwrap(), "\u{362}Number:1.25");
    assert_eq!(esc.encode(&esc!({"a": 1})).unwrap(), "\u{362}{\"a\":1}");
    assert_eq!(esc.encode(&esc!([1, 2])).unwrap(), "\u{362}[1,2]");
}

#[test]
fn test_primitive_mode_decode() {
    let esc = arrow_primitive();
    assert_eq!(esc.decode("\u{362}true").unwrap(), Value::from(true));
    assert_eq!(esc.decode("\u{362}false").unwrap(), Value::from(false));
    assert_eq!(esc.decode("\u{362}null").unwrap(), Value::Null);
    assert_eq!(esc.decode("\u{362}Number:1.25").unwrap(), Value::from(1.25));
    assert_eq!(esc.decode("\u{362}{\"a\":1}").unwrap(), esc!({"a": 1}));
    assert_eq!(esc.decode("\u{362}[1,2]").unwrap(), esc!([1, 2]));
    assert_eq!(esc.decode("1.25").unwrap(), Value::from(1.25));
}

#[test]
fn test_primitive_mode_round_trip() {
    let esc = arrow_primitive();
    let value = esc!({"flag": true, "nothing": null, "nested": [1, "two", (f64::NAN)]});
    let encoded = esc.encode(&value).unwrap();
    let decoded = esc.decode(&encoded).unwrap();
    let nested = decoded.as_object().and_then(|o| o.get("nested")).unwrap();
    assert!(nested.as_array().unwrap()[2].is_nan());
    assert_eq!(decoded.as_object().unwrap().get("flag"), Some(&Value::from(true)));
}

#[test]
fn test_string_level_round_trip() {
    for value in [
        Value::Undefined,
        Value::from("hello"),
        Value::from("42"),
        Value::from("\u{1b}sneaky"),
        Value::from(-0.5),
        Value::Date(date(0)),
        Value::Binary(vec![0, 255]),
        esc!({"k": [true, null]}),
    ] {
        let encoded = encode(&value).unwrap();
        assert_eq!(decode(&encoded).unwrap(), value, "encoded as {:?}", encoded);
    }
}

#[derive(Debug, PartialEq)]
struct Fraction {
    num: i64,
    den: i64,
}

impl ExtensionValue for Fraction {}

#[test]
fn test_custom_extension() {
    let mut esc = JsonEsc::new();
    esc.register(Extension::typed::<Fraction, _, _>(
        "Frac",
        |f| Ok(format!("{}/{}", f.num, f.den)),
        |payload| {
            let (num, den) = payload
                .split_once('/')
                .ok_or_else(|| Error::invalid_payload("Frac", payload))?;
            Ok(Fraction {
                num: num.parse().map_err(|e| Error::invalid_payload("Frac", e))?,
                den: den.parse().map_err(|e| Error::invalid_payload("Frac", e))?,
            })
        },
    ));

    let value = esc!({"half": (CustomValue::new(Fraction { num: 1, den: 2 }))});
    let text = esc.stringify(&value, None).unwrap();
    assert_eq!(text, r#"{"half":"\u001bFrac:1/2"}"#);
    assert_eq!(esc.parse(&text).unwrap(), value);

    // instances without the extension treat the tag as unknown
    assert_eq!(parse(&text).unwrap(), esc!({}));
}

#[test]
fn test_custom_raw_extension() {
    let mut esc = JsonEsc::new();
    esc.register_raw(
        Extension::new("Frac")
            .with_encoder(TypeKey::of::<Fraction>(), |value| {
                let f = value.downcast_ref::<Fraction>().ok_or_else(|| Error::custom("not a fraction"))?;
                Ok(format!("\u{1b}Frac:{}|{}", f.num, f.den))
            })
            .with_decoder(|text| {
                let body = text.trim_start_matches("\u{1b}Frac:");
                let (num, den) = body.split_once('|').ok_or_else(|| Error::custom("bad fraction"))?;
                Ok(Value::Custom(CustomValue::new(Fraction {
                    num: num.parse().map_err(Error::custom)?,
                    den: den.parse().map_err(Error::custom)?,
                })))
            }),
    );

    let value = Value::Custom(CustomValue::new(Fraction { num: -3, den: 4 }));
    let text = esc.stringify(&value, None).unwrap();
    assert_eq!(text, r#""\u001bFrac:-3|4""#);
    assert_eq!(esc.parse(&text).unwrap(), value);
}

#[derive(Debug, PartialEq)]
struct Celsius(f64);

impl ExtensionValue for Celsius {
    fn to_escaped(&self, sentinel: char) -> Option<String> {
        Some(format!("{}Celsius:{}", sentinel, self.0))
    }
}

#[derive(Debug, PartialEq)]
struct Point {
    x: i32,
    y: i32,
}

impl ExtensionValue for Point {
    fn to_plain(&self) -> Option<Value> {
        Some(esc!({"x": (self.x), "y": (self.y)}))
    }

    fn to_escaped(&self, sentinel: char) -> Option<String> {
        Some(format!("{}Point:{},{}", sentinel, self.x, self.y))
    }
}

#[derive(Debug, PartialEq)]
struct Handle;

impl ExtensionValue for Handle {}

#[test]
fn test_self_describing_hook() {
    let value = Value::Custom(CustomValue::new(Celsius(21.5)));
    assert_eq!(stringify(&value, None).unwrap(), r#""\u001bCelsius:21.5""#);
    assert_eq!(arrow().stringify(&value, None).unwrap(), "\"\u{362}Celsius:21.5\"");
    assert_eq!(stringify_sorted(&value, None).unwrap(), r#""\u001bCelsius:21.5""#);
}

#[test]
fn test_plain_form_precedence() {
    let value = Value::Custom(CustomValue::new(Point { x: 1, y: 2 }));
    // the plain form wins unless an encoder is registered for the type
    assert_eq!(stringify(&value, None).unwrap(), r#"{"x":1,"y":2}"#);
    // canonical output never uses plain forms
    assert_eq!(stringify_sorted(&value, None).unwrap(), r#""\u001bPoint:1,2""#);

    let mut esc = JsonEsc::new();
    esc.register(
        Extension::new("P").with_encoder(TypeKey::of::<Point>(), |_| Ok("p".to_string())),
    );
    assert_eq!(esc.stringify(&value, None).unwrap(), r#""\u001bP:p""#);
}

#[test]
fn test_opaque_values_are_absent() {
    let handle = || Value::Custom(CustomValue::new(Handle));
    assert_eq!(stringify(&handle(), None).unwrap(), r#""\u001b""#);
    assert_eq!(stringify(&esc!({"h": (handle()), "k": 1}), None).unwrap(), r#"{"k":1}"#);
    assert_eq!(stringify(&Value::Array(vec![handle()]), None).unwrap(), r#"["\u001b"]"#);
    assert_eq!(stringify_sorted(&handle(), None).unwrap(), "null");
}

#[test]
fn test_bigint_disabled() {
    let esc = JsonEsc::with_options(EscOptions::new().with_bigint(false));
    let err = esc.stringify(&Value::BigInt(BigInt::from(1)), None).unwrap_err();
    assert!(matches!(err, Error::UnsupportedType(_)));
    assert_eq!(esc.parse(r#""\u001bn:1""#).unwrap(), Value::Undefined);
}

#[test]
fn test_date_disabled_uses_plain_string() {
    let esc = JsonEsc::with_options(EscOptions::new().with_date(false));
    let text = esc.stringify(&Value::Date(date(1518030438207)), None).unwrap();
    assert_eq!(text, r#""2018-02-07T19:07:18.207Z""#);
    assert_eq!(esc.parse(&text).unwrap(), Value::from("2018-02-07T19:07:18.207Z"));
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct Upload {
    name: String,
    #[serde(with = "bytes_field")]
    body: Vec<u8>,
    uploaded: DateTime<Utc>,
    ratio: f64,
}

mod bytes_field {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], s: S) -> Result<S::Ok, S::Error> {
        s.serialize_bytes(bytes)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<u8>, D::Error> {
        Vec::<u8>::deserialize(d)
    }
}

#[test]
fn test_typed_round_trip() {
    let upload = Upload {
        name: "blob".to_string(),
        body: vec![91, 82, 112, 207],
        uploaded: date(1518030438207),
        ratio: f64::NAN,
    };
    let text = to_string(&upload).unwrap();
    assert_eq!(
        text,
        r#"{"name":"blob","body":"\u001bBin:xy'/z","uploaded":"2018-02-07T19:07:18.207Z","ratio":"\u001bNaN"}"#
    );
    let back: Upload = from_str(&text).unwrap();
    assert_eq!(back.body, upload.body);
    assert_eq!(back.uploaded, upload.uploaded);
    assert!(back.ratio.is_nan());
}

#[test]
fn test_finite_floats_round_trip_exactly() {
    for f in [-2.9805332933612744e-183, 4.6292427449743435e-9_f64] {
        let value = Value::from(f);

        let text = stringify(&value, None).unwrap();
        assert_eq!(parse(&text).unwrap(), value, "stringify {}", text);

        let sorted = stringify_sorted(&esc!([(f)]), Some(2)).unwrap();
        assert_eq!(parse(&sorted).unwrap(), esc!([(f)]), "sorted {}", sorted);

        assert_eq!(decode(&encode(&value).unwrap()).unwrap(), value);

        let typed: f64 = from_str(&to_string(&f).unwrap()).unwrap();
        assert_eq!(typed.to_bits(), f.to_bits());
    }
}
