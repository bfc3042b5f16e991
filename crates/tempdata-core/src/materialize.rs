//! Sequence materializers: untyped token arrays back to `Vec<T>`.
//!
//! The wire document cannot say "this array holds `u16`s", only that each
//! element is an `Integer` token. After decode, the first element's kind is
//! classified and the matching materializer walks the array, coercing every
//! element to the classified type. Materializers are plain generic functions
//! selected by [`ElementType`]; the cache only saves the dispatch.

use std::any::type_name;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, FixedOffset, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use tracing::{trace, warn};
use url::Url;
use uuid::Uuid;

use crate::classify::{ElementType, classify};
use crate::token::Token;
use crate::value::{ErasedValue, TempDataValue};

/// Converts a token array into a boxed `Vec<T>`.
pub type Materializer = Arc<dyn Fn(&[Token]) -> Box<dyn ErasedValue> + Send + Sync>;

/// Lenient conversion of a single token into a concrete element type.
///
/// Returns `None` when the token cannot represent `Self`; such elements are
/// dropped from the materialized sequence.
pub trait FromToken: Sized {
    fn from_token(token: &Token) -> Option<Self>;
}

impl FromToken for String {
    fn from_token(token: &Token) -> Option<Self> {
        match token {
            Token::String(v) => Some(v.clone()),
            Token::Integer(v) => Some(v.to_string()),
            Token::Float(v) => Some(v.to_string()),
            Token::Boolean(v) => Some(v.to_string()),
            Token::Guid(v) => Some(v.to_string()),
            Token::Date(v) => Some(v.to_rfc3339()),
            Token::DateOffset(v) => Some(v.to_rfc3339()),
            Token::Uri(v) => Some(v.to_string()),
            Token::Decimal(v) => Some(v.to_string()),
            _ => None,
        }
    }
}

impl FromToken for i64 {
    fn from_token(token: &Token) -> Option<Self> {
        match token {
            Token::Integer(v) => Some(*v),
            Token::Float(v) if v.fract() == 0.0 => v.to_i64(),
            Token::Boolean(v) => Some(i64::from(*v)),
            Token::Decimal(v) if v.fract().is_zero() => v.to_i64(),
            Token::String(v) => v.trim().parse().ok(),
            _ => None,
        }
    }
}

impl FromToken for f64 {
    fn from_token(token: &Token) -> Option<Self> {
        match token {
            Token::Float(v) => Some(*v),
            Token::Integer(v) => v.to_f64(),
            Token::Decimal(v) => v.to_f64(),
            Token::String(v) => v.trim().parse().ok(),
            _ => None,
        }
    }
}

impl FromToken for bool {
    fn from_token(token: &Token) -> Option<Self> {
        match token {
            Token::Boolean(v) => Some(*v),
            Token::Integer(v) => Some(*v != 0),
            Token::String(v) => v.trim().to_ascii_lowercase().parse().ok(),
            _ => None,
        }
    }
}

impl FromToken for Uuid {
    fn from_token(token: &Token) -> Option<Self> {
        match token {
            Token::Guid(v) => Some(*v),
            Token::String(v) => Uuid::parse_str(v.trim()).ok(),
            _ => None,
        }
    }
}

impl FromToken for DateTime<Utc> {
    fn from_token(token: &Token) -> Option<Self> {
        match token {
            Token::Date(v) => Some(*v),
            Token::DateOffset(v) => Some(v.with_timezone(&Utc)),
            Token::String(v) => DateTime::parse_from_rfc3339(v.trim())
                .ok()
                .map(|v| v.with_timezone(&Utc)),
            _ => None,
        }
    }
}

impl FromToken for DateTime<FixedOffset> {
    fn from_token(token: &Token) -> Option<Self> {
        match token {
            Token::DateOffset(v) => Some(*v),
            Token::Date(v) => Some(v.fixed_offset()),
            Token::String(v) => DateTime::parse_from_rfc3339(v.trim()).ok(),
            _ => None,
        }
    }
}

impl FromToken for Duration {
    fn from_token(token: &Token) -> Option<Self> {
        match token {
            Token::TimeSpan(v) => Some(*v),
            _ => None,
        }
    }
}

impl FromToken for Url {
    fn from_token(token: &Token) -> Option<Self> {
        match token {
            Token::Uri(v) => Some(v.clone()),
            Token::String(v) => Url::parse(v.trim()).ok(),
            _ => None,
        }
    }
}

impl FromToken for Decimal {
    fn from_token(token: &Token) -> Option<Self> {
        match token {
            Token::Decimal(v) => Some(*v),
            Token::Integer(v) => Some(Decimal::from(*v)),
            Token::Float(v) => Decimal::from_f64(*v),
            Token::String(v) => Decimal::from_str(v.trim()).ok(),
            _ => None,
        }
    }
}

impl FromToken for Token {
    fn from_token(token: &Token) -> Option<Self> {
        Some(token.clone())
    }
}

fn materialize_as<T>(tokens: &[Token]) -> Box<dyn ErasedValue>
where
    T: FromToken + TempDataValue,
{
    let mut values = Vec::with_capacity(tokens.len());
    for (index, token) in tokens.iter().enumerate() {
        match T::from_token(token) {
            Some(value) => values.push(value),
            None => warn!(
                index,
                kind = %token.kind(),
                element_type = type_name::<T>(),
                "dropping array element that cannot be coerced"
            ),
        }
    }
    Box::new(values)
}

fn build(element_type: ElementType) -> Materializer {
    match element_type {
        ElementType::String => Arc::new(materialize_as::<String>),
        ElementType::Integer => Arc::new(materialize_as::<i64>),
        ElementType::Boolean => Arc::new(materialize_as::<bool>),
        ElementType::Float => Arc::new(materialize_as::<f64>),
        ElementType::Guid => Arc::new(materialize_as::<Uuid>),
        ElementType::Object => Arc::new(materialize_as::<Token>),
        ElementType::Date => Arc::new(materialize_as::<DateTime<Utc>>),
        ElementType::DateOffset => Arc::new(materialize_as::<DateTime<FixedOffset>>),
        ElementType::TimeSpan => Arc::new(materialize_as::<Duration>),
        ElementType::Uri => Arc::new(materialize_as::<Url>),
        ElementType::Decimal => Arc::new(materialize_as::<Decimal>),
    }
}

/// Process-wide cache of one materializer per element type.
///
/// Safe to populate from concurrent requests: a materializer built by a
/// request that lost the insert race is dropped and the stored one is used.
#[derive(Default)]
pub struct MaterializerCache {
    converters: DashMap<ElementType, Materializer>,
}

impl MaterializerCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the materializer for `element_type`, building it on first use.
    pub fn get_or_build(&self, element_type: ElementType) -> Materializer {
        if let Some(existing) = self.converters.get(&element_type) {
            return Arc::clone(existing.value());
        }
        self.store(element_type, build(element_type)).0
    }

    /// Insert `built` unless another caller got there first. Returns the
    /// materializer now in the cache and whether it is `built`.
    fn store(&self, element_type: ElementType, built: Materializer) -> (Materializer, bool) {
        match self.converters.entry(element_type) {
            Entry::Occupied(existing) => (Arc::clone(existing.get()), false),
            Entry::Vacant(slot) => {
                let stored = slot.insert(built);
                trace!(?element_type, "materializer cached");
                (Arc::clone(stored.value()), true)
            }
        }
    }

    pub fn materialize(&self, element_type: ElementType, tokens: &[Token]) -> Box<dyn ErasedValue> {
        (self.get_or_build(element_type))(tokens)
    }

    /// Turn one decoded token into the value handed back to callers.
    ///
    /// Non-empty arrays whose first element has a mapped kind become a typed
    /// `Vec<T>`; scalars become native values; everything else stays a token.
    pub fn rematerialize(&self, token: Token) -> Box<dyn ErasedValue> {
        if let Token::Array(items) = &token {
            if let Some(element_type) = items.first().and_then(|first| classify(first.kind())) {
                return self.materialize(element_type, items);
            }
        }
        token.into_value()
    }

    /// Number of element types with a cached materializer.
    pub fn len(&self) -> usize {
        self.converters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.converters.is_empty()
    }

    pub fn contains(&self, element_type: ElementType) -> bool {
        self.converters.contains_key(&element_type)
    }
}
