//! Error types for escaped JSON encoding and decoding.
//!
//! Most decoding problems are *not* errors: an unknown tag, a sentinel string
//! with no tag, or an unreadable date all decode to [`Value::Undefined`](crate::Value::Undefined).
//! Errors are reserved for:
//!
//! - **Host format failures**: the JSON text itself is malformed
//! - **Invalid payloads**: a recognised tag carries a payload its codec rejects
//!   (for example `n:12x` for a big integer)
//! - **Unsupported types**: a value JSON cannot represent and no extension handles
//! - **Custom errors**: raised by user encoders/decoders or the serde bridge
//!
//! ## Examples
//!
//! ```rust
//! use serde_jsonesc::{parse, Error};
//!
//! let result = parse("{\"a\": [1, 2");
//! assert!(matches!(result, Err(Error::Json(_))));
//!
//! let result = parse("\"\\u001bn:12x\"");
//! assert!(matches!(result, Err(Error::InvalidPayload { .. })));
//! ```

use std::fmt;
use thiserror::Error;

/// Represents all possible errors raised while encoding or decoding.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// IO error during reading or writing
    #[error("IO error: {0}")]
    Io(String),

    /// The host JSON parser or printer failed
    #[error("JSON error: {0}")]
    Json(String),

    /// A recognised extension tag carried a payload its codec could not read
    #[error("Invalid payload for tag `{tag}`: {msg}")]
    InvalidPayload { tag: String, msg: String },

    /// Unsupported type for serialization
    #[error("Unsupported type: {0}")]
    UnsupportedType(String),

    /// Custom error
    #[error("Error: {0}")]
    Custom(String),
}

impl Error {
    /// Creates an invalid payload error for the given extension tag.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_jsonesc::Error;
    ///
    /// let err = Error::invalid_payload("n", "not an integer");
    /// assert!(err.to_string().contains("`n`"));
    /// ```
    pub fn invalid_payload<T: fmt::Display>(tag: &str, msg: T) -> Self {
        Error::InvalidPayload {
            tag: tag.to_string(),
            msg: msg.to_string(),
        }
    }

    /// Creates an unsupported type error for values JSON cannot represent.
    pub fn unsupported_type(msg: &str) -> Self {
        Error::UnsupportedType(msg.to_string())
    }

    /// Creates a custom error with a display message.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_jsonesc::Error;
    ///
    /// let err = Error::custom("something went wrong");
    /// assert!(err.to_string().contains("something went wrong"));
    /// ```
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Creates an I/O error for reading/writing failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err.to_string())
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
