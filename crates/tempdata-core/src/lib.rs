//! tempdata-core: value model and wire policy for single-read flash data.
//!
//! Values handed to the store are type-erased (`Box<dyn ErasedValue>`) but
//! carry a [`TypeInfo`] describing their container shape. The allowlist
//! validator checks that shape against the closed [`ScalarType`] set before
//! anything is encoded.
//!
//! # Wire format
//!
//! A payload is a `u32` little-endian total length followed by a postcard
//! document of `(key, token)` fields. Tokens only carry their kind, so a
//! `Vec<u16>` comes back as an array of `Integer` tokens. On decode the
//! [`MaterializerCache`] sniffs the first element's kind and rebuilds a typed
//! `Vec<T>` for it.

pub mod classify;
pub mod codec;
pub mod config;
pub mod error;
pub mod materialize;
pub mod temp_data;
pub mod token;
pub mod validate;
pub mod value;

pub use classify::{ElementType, classify};
pub use config::TempDataConfig;
pub use error::{CodecError, CodecResult, UnsupportedTypeError};
pub use materialize::{FromToken, Materializer, MaterializerCache};
pub use temp_data::TempData;
pub use token::{Token, TokenKind};
pub use validate::{ElementShape, ValueShape, ensure_can_be_serialized};
pub use value::{ErasedValue, ScalarType, TempDataValue, TypeInfo};
