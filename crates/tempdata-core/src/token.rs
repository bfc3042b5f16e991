//! Decoded, kind-tagged intermediate values.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, FixedOffset, Utc};
use rust_decimal::Decimal;
use url::Url;
use uuid::Uuid;

use crate::value::ErasedValue;

/// One value of the wire document. Tokens know their kind but never the Rust
/// type that produced them: every integer width becomes `Integer`, every
/// sequence becomes `Array`.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Null,
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Guid(Uuid),
    Date(DateTime<Utc>),
    DateOffset(DateTime<FixedOffset>),
    TimeSpan(Duration),
    Uri(Url),
    Decimal(Decimal),
    Array(Vec<Token>),
    Object(Vec<(String, Token)>),
}

/// The kind tag of a [`Token`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Null,
    String,
    Integer,
    Float,
    Boolean,
    Guid,
    Date,
    DateOffset,
    TimeSpan,
    Uri,
    Decimal,
    Array,
    Object,
}

impl TokenKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TokenKind::Null => "null",
            TokenKind::String => "string",
            TokenKind::Integer => "integer",
            TokenKind::Float => "float",
            TokenKind::Boolean => "boolean",
            TokenKind::Guid => "guid",
            TokenKind::Date => "date",
            TokenKind::DateOffset => "date_offset",
            TokenKind::TimeSpan => "time_span",
            TokenKind::Uri => "uri",
            TokenKind::Decimal => "decimal",
            TokenKind::Array => "array",
            TokenKind::Object => "object",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Token {
    pub fn kind(&self) -> TokenKind {
        match self {
            Token::Null => TokenKind::Null,
            Token::String(_) => TokenKind::String,
            Token::Integer(_) => TokenKind::Integer,
            Token::Float(_) => TokenKind::Float,
            Token::Boolean(_) => TokenKind::Boolean,
            Token::Guid(_) => TokenKind::Guid,
            Token::Date(_) => TokenKind::Date,
            Token::DateOffset(_) => TokenKind::DateOffset,
            Token::TimeSpan(_) => TokenKind::TimeSpan,
            Token::Uri(_) => TokenKind::Uri,
            Token::Decimal(_) => TokenKind::Decimal,
            Token::Array(_) => TokenKind::Array,
            Token::Object(_) => TokenKind::Object,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Token::Null)
    }

    /// Unwrap a scalar token into its native value.
    ///
    /// Integers come back as `i64` and floats as `f64` regardless of the
    /// width that was written. Null, array and object tokens stay tokens.
    pub fn into_value(self) -> Box<dyn ErasedValue> {
        match self {
            Token::String(v) => Box::new(v),
            Token::Integer(v) => Box::new(v),
            Token::Float(v) => Box::new(v),
            Token::Boolean(v) => Box::new(v),
            Token::Guid(v) => Box::new(v),
            Token::Date(v) => Box::new(v),
            Token::DateOffset(v) => Box::new(v),
            Token::TimeSpan(v) => Box::new(v),
            Token::Uri(v) => Box::new(v),
            Token::Decimal(v) => Box::new(v),
            token @ (Token::Null | Token::Array(_) | Token::Object(_)) => Box::new(token),
        }
    }
}
