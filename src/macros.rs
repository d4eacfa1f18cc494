/// Builds a [`Value`](crate::Value) from a JSON-like literal.
///
/// `null`, `undefined`, `true`, `false`, arrays and objects are recognised;
/// anything else goes through [`Value::from`](crate::Value), so dates,
/// buffers and custom values can be spliced in directly. Negative numbers and
/// other multi-token expressions need parentheses.
///
/// ```rust
/// use serde_jsonesc::{esc, Value};
///
/// let value = esc!({
///     "name": "Alice",
///     "missing": undefined,
///     "scores": [1, 2.5, (-3)],
///     "blob": (Value::Binary(vec![0xFF]))
/// });
/// assert_eq!(value.as_object().unwrap().len(), 4);
/// ```
#[macro_export]
macro_rules! esc {
    (null) => {
        $crate::Value::Null
    };

    (undefined) => {
        $crate::Value::Undefined
    };

    (true) => {
        $crate::Value::Bool(true)
    };

    (false) => {
        $crate::Value::Bool(false)
    };

    ([]) => {
        $crate::Value::Array(vec![])
    };

    ([ $($elem:tt),* $(,)? ]) => {
        $crate::Value::Array(vec![$($crate::esc!($elem)),*])
    };

    ({}) => {
        $crate::Value::Object($crate::EscMap::new())
    };

    ({ $($key:literal : $value:tt),* $(,)? }) => {{
        let mut object = $crate::EscMap::new();
        $(
            object.insert($key.to_string(), $crate::esc!($value));
        )*
        $crate::Value::Object(object)
    }};

    ($other:expr) => {
        $crate::Value::from($other)
    };
}
