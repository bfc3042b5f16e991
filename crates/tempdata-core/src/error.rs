//! Error types for validation and the payload codec.

use thiserror::Error;

/// Result type alias for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// A value (or collection element) whose type is outside the permitted set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("The type {type_name} cannot be serialized to Session by '{component}'.")]
pub struct UnsupportedTypeError {
    /// Underlying type, with any nullable wrapper stripped.
    pub type_name: String,
    /// Store component that rejected the value.
    pub component: String,
}

/// Errors raised while encoding or decoding a temp data payload.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("cannot encode value for key '{key}' of type {type_name}")]
    Unencodable { key: String, type_name: String },

    #[error("payload too large: {0} bytes")]
    TooLarge(usize),

    #[error("payload truncated: {0} bytes is shorter than the length header")]
    Truncated(usize),

    #[error("payload length mismatch: header says {declared} bytes, got {actual}")]
    LengthMismatch { declared: usize, actual: usize },

    #[error("encode error: {0}")]
    Encode(String),

    #[error("decode error: {0}")]
    Decode(String),

    #[error("invalid {kind} token: {reason}")]
    InvalidToken { kind: &'static str, reason: String },
}
