//! Payload codec: [`TempData`] → bytes, bytes → `(key, Token)` fields.
//!
//! Layout: a `u32` little-endian total length (header included) followed by
//! a postcard-encoded document. An empty byte string is the placeholder
//! written on first load and decodes to no fields.
//!
//! The wire enum below is the format; reordering its variants breaks every
//! payload already sitting in a session.

use std::time::Duration;

use chrono::{DateTime, FixedOffset, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

use crate::error::{CodecError, CodecResult};
use crate::temp_data::TempData;
use crate::token::Token;

const HEADER_LEN: usize = 4;

#[derive(Debug, Serialize, Deserialize)]
struct WireDocument {
    fields: Vec<(String, WireToken)>,
}

#[derive(Debug, Serialize, Deserialize)]
enum WireToken {
    Null,
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Guid([u8; 16]),
    Date { secs: i64, nanos: u32 },
    DateOffset { secs: i64, nanos: u32, offset: i32 },
    TimeSpan { secs: u64, nanos: u32 },
    Uri(String),
    Decimal([u8; 16]),
    Array(Vec<WireToken>),
    Object(Vec<(String, WireToken)>),
}

impl From<&Token> for WireToken {
    fn from(token: &Token) -> Self {
        match token {
            Token::Null => WireToken::Null,
            Token::String(v) => WireToken::String(v.clone()),
            Token::Integer(v) => WireToken::Integer(*v),
            Token::Float(v) => WireToken::Float(*v),
            Token::Boolean(v) => WireToken::Boolean(*v),
            Token::Guid(v) => WireToken::Guid(*v.as_bytes()),
            Token::Date(v) => WireToken::Date {
                secs: v.timestamp(),
                nanos: v.timestamp_subsec_nanos(),
            },
            Token::DateOffset(v) => WireToken::DateOffset {
                secs: v.timestamp(),
                nanos: v.timestamp_subsec_nanos(),
                offset: v.offset().local_minus_utc(),
            },
            Token::TimeSpan(v) => WireToken::TimeSpan {
                secs: v.as_secs(),
                nanos: v.subsec_nanos(),
            },
            Token::Uri(v) => WireToken::Uri(v.to_string()),
            Token::Decimal(v) => WireToken::Decimal(v.serialize()),
            Token::Array(items) => WireToken::Array(items.iter().map(WireToken::from).collect()),
            Token::Object(fields) => WireToken::Object(
                fields
                    .iter()
                    .map(|(name, value)| (name.clone(), WireToken::from(value)))
                    .collect(),
            ),
        }
    }
}

fn invalid(kind: &'static str, reason: impl ToString) -> CodecError {
    CodecError::InvalidToken {
        kind,
        reason: reason.to_string(),
    }
}

fn utc_from_parts(secs: i64, nanos: u32) -> CodecResult<DateTime<Utc>> {
    DateTime::from_timestamp(secs, nanos)
        .ok_or_else(|| invalid("date", format!("timestamp {secs}.{nanos:09} out of range")))
}

impl TryFrom<WireToken> for Token {
    type Error = CodecError;

    fn try_from(wire: WireToken) -> CodecResult<Self> {
        Ok(match wire {
            WireToken::Null => Token::Null,
            WireToken::String(v) => Token::String(v),
            WireToken::Integer(v) => Token::Integer(v),
            WireToken::Float(v) => Token::Float(v),
            WireToken::Boolean(v) => Token::Boolean(v),
            WireToken::Guid(bytes) => Token::Guid(Uuid::from_bytes(bytes)),
            WireToken::Date { secs, nanos } => Token::Date(utc_from_parts(secs, nanos)?),
            WireToken::DateOffset {
                secs,
                nanos,
                offset,
            } => {
                let offset = FixedOffset::east_opt(offset)
                    .ok_or_else(|| invalid("date_offset", format!("offset {offset}s out of range")))?;
                Token::DateOffset(utc_from_parts(secs, nanos)?.with_timezone(&offset))
            }
            WireToken::TimeSpan { secs, nanos } => {
                if nanos >= 1_000_000_000 {
                    return Err(invalid("time_span", format!("{nanos} subsecond nanos")));
                }
                Token::TimeSpan(Duration::new(secs, nanos))
            }
            WireToken::Uri(v) => Token::Uri(Url::parse(&v).map_err(|e| invalid("uri", e))?),
            WireToken::Decimal(bytes) => Token::Decimal(Decimal::deserialize(bytes)),
            WireToken::Array(items) => Token::Array(
                items
                    .into_iter()
                    .map(Token::try_from)
                    .collect::<CodecResult<_>>()?,
            ),
            WireToken::Object(fields) => Token::Object(
                fields
                    .into_iter()
                    .map(|(name, value)| -> CodecResult<_> { Ok((name, Token::try_from(value)?)) })
                    .collect::<CodecResult<_>>()?,
            ),
        })
    }
}

/// Encode every entry of `values` into one payload.
///
/// Values are expected to have passed allowlist validation; any value that
/// still has no token form fails the whole encode.
pub fn encode(values: &TempData) -> CodecResult<Vec<u8>> {
    let mut fields = Vec::with_capacity(values.len());
    for (key, value) in values.iter() {
        let token = value
            .encode_token()
            .ok_or_else(|| CodecError::Unencodable {
                key: key.to_string(),
                type_name: value.runtime_type_info().to_string(),
            })?;
        fields.push((key.to_string(), WireToken::from(&token)));
    }

    let body = postcard::to_allocvec(&WireDocument { fields })
        .map_err(|e| CodecError::Encode(e.to_string()))?;
    let total = HEADER_LEN + body.len();
    let header = u32::try_from(total).map_err(|_| CodecError::TooLarge(total))?;

    let mut payload = Vec::with_capacity(total);
    payload.extend_from_slice(&header.to_le_bytes());
    payload.extend_from_slice(&body);
    Ok(payload)
}

/// Decode a payload into its fields, in wire order.
pub fn decode(bytes: &[u8]) -> CodecResult<Vec<(String, Token)>> {
    if bytes.is_empty() {
        return Ok(Vec::new());
    }
    let (header, body) = bytes
        .split_first_chunk::<HEADER_LEN>()
        .ok_or(CodecError::Truncated(bytes.len()))?;
    let declared = u32::from_le_bytes(*header) as usize;
    if declared != bytes.len() {
        return Err(CodecError::LengthMismatch {
            declared,
            actual: bytes.len(),
        });
    }

    let document: WireDocument =
        postcard::from_bytes(body).map_err(|e| CodecError::Decode(e.to_string()))?;
    document
        .fields
        .into_iter()
        .map(|(key, value)| -> CodecResult<_> { Ok((key, Token::try_from(value)?)) })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TempData {
        let mut temp = TempData::new();
        temp.insert("string", "value");
        temp.insert("int", 10i32);
        temp.insert("bool", false);
        temp.insert("list", vec!["one".to_string(), "two".to_string()]);
        temp
    }

    fn field<'a>(fields: &'a [(String, Token)], key: &str) -> &'a Token {
        &fields.iter().find(|(k, _)| k == key).unwrap().1
    }

    #[test]
    fn header_carries_total_length() {
        let bytes = encode(&sample()).unwrap();
        let declared = u32::from_le_bytes(bytes[..4].try_into().unwrap());
        assert_eq!(declared as usize, bytes.len());
    }

    #[test]
    fn element_types_are_not_on_the_wire() {
        let mut temp = TempData::new();
        temp.insert("narrow", vec![1u8, 2]);
        let fields = decode(&encode(&temp).unwrap()).unwrap();
        assert_eq!(
            field(&fields, "narrow"),
            &Token::Array(vec![Token::Integer(1), Token::Integer(2)])
        );
    }

    #[test]
    fn scalars_decode_to_tokens() {
        let id = Uuid::new_v4();
        let offset = FixedOffset::east_opt(2 * 3600).unwrap();
        let when = DateTime::from_timestamp(1_700_000_000, 123).unwrap().with_timezone(&offset);
        let mut temp = sample();
        temp.insert("id", id);
        temp.insert("when", when);
        temp.insert("wait", Duration::from_millis(1500));
        temp.insert("price", Decimal::new(1001, 1));
        temp.insert("missing", None::<i32>);

        let fields = decode(&encode(&temp).unwrap()).unwrap();
        assert_eq!(field(&fields, "string"), &Token::String("value".into()));
        assert_eq!(field(&fields, "int"), &Token::Integer(10));
        assert_eq!(field(&fields, "id"), &Token::Guid(id));
        assert_eq!(field(&fields, "when"), &Token::DateOffset(when));
        assert_eq!(
            field(&fields, "wait"),
            &Token::TimeSpan(Duration::from_millis(1500))
        );
        assert_eq!(field(&fields, "price"), &Token::Decimal(Decimal::new(1001, 1)));
        assert_eq!(field(&fields, "missing"), &Token::Null);
    }

    #[test]
    fn empty_payload_is_the_placeholder() {
        assert!(decode(&[]).unwrap().is_empty());
    }

    #[test]
    fn truncated_and_mismatched_payloads_are_rejected() {
        assert!(matches!(decode(&[1, 0]), Err(CodecError::Truncated(2))));

        let mut bytes = encode(&sample()).unwrap();
        bytes.push(0);
        assert!(matches!(
            decode(&bytes),
            Err(CodecError::LengthMismatch { .. })
        ));
    }

    #[test]
    fn garbage_body_is_a_decode_error() {
        let bytes = [6u8, 0, 0, 0, 0xff, 0xff];
        assert!(matches!(decode(&bytes), Err(CodecError::Decode(_))));
    }

    #[test]
    fn unencodable_values_fail_the_whole_payload() {
        let mut temp = sample();
        temp.insert("big", u64::MAX);
        match encode(&temp) {
            Err(CodecError::Unencodable { key, type_name }) => {
                assert_eq!(key, "big");
                assert_eq!(type_name, "u64");
            }
            other => panic!("expected Unencodable, got {other:?}"),
        }
    }
}
