//! Token kind → element type table used when rebuilding typed sequences.

use crate::token::TokenKind;

/// Concrete element type of a rematerialized sequence.
///
/// | Element      | Materialized as          |
/// |--------------|--------------------------|
/// | `String`     | `Vec<String>`            |
/// | `Integer`    | `Vec<i64>`               |
/// | `Boolean`    | `Vec<bool>`              |
/// | `Float`      | `Vec<f64>`               |
/// | `Guid`       | `Vec<Uuid>`              |
/// | `Object`     | `Vec<Token>`             |
/// | `Date`       | `Vec<DateTime<Utc>>`     |
/// | `DateOffset` | `Vec<DateTime<FixedOffset>>` |
/// | `TimeSpan`   | `Vec<Duration>`          |
/// | `Uri`        | `Vec<Url>`               |
/// | `Decimal`    | `Vec<Decimal>`           |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    String,
    Integer,
    Boolean,
    Float,
    Guid,
    Object,
    Date,
    DateOffset,
    TimeSpan,
    Uri,
    Decimal,
}

/// Map a decoded token kind to the element type that should represent it.
///
/// `Null` and nested `Array` kinds have no entry; arrays starting with them
/// are left in their generic token form.
pub fn classify(kind: TokenKind) -> Option<ElementType> {
    match kind {
        TokenKind::String => Some(ElementType::String),
        TokenKind::Integer => Some(ElementType::Integer),
        TokenKind::Boolean => Some(ElementType::Boolean),
        TokenKind::Float => Some(ElementType::Float),
        TokenKind::Guid => Some(ElementType::Guid),
        TokenKind::Object => Some(ElementType::Object),
        TokenKind::Date => Some(ElementType::Date),
        TokenKind::DateOffset => Some(ElementType::DateOffset),
        TokenKind::TimeSpan => Some(ElementType::TimeSpan),
        TokenKind::Uri => Some(ElementType::Uri),
        TokenKind::Decimal => Some(ElementType::Decimal),
        TokenKind::Null | TokenKind::Array => None,
    }
}
