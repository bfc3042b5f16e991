//! Provider error types.

use tempdata_core::{CodecError, UnsupportedTypeError};
use tempdata_session::SessionError;
use thiserror::Error;

/// Errors returned by temp data load and save.
#[derive(Debug, Error)]
pub enum TempDataError {
    #[error(transparent)]
    UnsupportedType(#[from] UnsupportedTypeError),

    #[error("session state is not available for this request")]
    SessionUnavailable,

    #[error("session error: {0}")]
    Session(#[from] SessionError),

    #[error("codec error: {0}")]
    Codec(#[from] CodecError),
}

pub type TempDataResult<T> = Result<T, TempDataError>;
