//! Session-state temp data provider.
//!
//! Save validates every value against the allowlist, encodes the whole
//! mapping and writes it under one reserved session key. Load reads that key,
//! rebuilds typed values and removes the key so the data is delivered at most
//! once.

use std::any::type_name;

use tempdata_core::config::DEFAULT_SESSION_KEY;
use tempdata_core::{
    ErasedValue, MaterializerCache, TempData, TempDataConfig, UnsupportedTypeError, ValueShape,
    codec, ensure_can_be_serialized,
};
use tracing::{debug, warn};

use crate::context::RequestContext;
use crate::error::TempDataResult;

/// Loads and saves the temp data of a request.
pub trait TempDataProvider: Send + Sync {
    /// Read and consume the temp data stored for this request.
    ///
    /// Returns `Ok(None)` when the request has no session at all.
    fn load_temp_data(&self, ctx: &mut RequestContext<'_>) -> TempDataResult<Option<TempData>>;

    /// Persist `values` for the next request. `None` or an empty mapping
    /// clears any pending temp data.
    fn save_temp_data(
        &self,
        ctx: &mut RequestContext<'_>,
        values: Option<&TempData>,
    ) -> TempDataResult<()>;
}

/// Stores temp data in the request's session under a reserved key.
///
/// Construct once per process and share it; the materializer cache lives as
/// long as the provider.
pub struct SessionStateTempDataProvider {
    session_key: String,
    materializers: MaterializerCache,
}

impl Default for SessionStateTempDataProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStateTempDataProvider {
    pub fn new() -> Self {
        Self::with_session_key(DEFAULT_SESSION_KEY)
    }

    pub fn with_session_key(session_key: impl Into<String>) -> Self {
        Self {
            session_key: session_key.into(),
            materializers: MaterializerCache::new(),
        }
    }

    pub fn from_config(config: &TempDataConfig) -> Self {
        Self::with_session_key(config.provider.session_key.clone())
    }

    pub fn session_key(&self) -> &str {
        &self.session_key
    }

    pub fn materializers(&self) -> &MaterializerCache {
        &self.materializers
    }

    /// Check a single value against the allowlist.
    pub fn ensure_can_be_serialized(
        &self,
        value: &dyn ErasedValue,
    ) -> Result<ValueShape, UnsupportedTypeError> {
        ensure_can_be_serialized(value, type_name::<Self>())
    }

    /// Decode a stored payload without touching any session.
    pub fn decode_payload(&self, bytes: &[u8]) -> TempDataResult<TempData> {
        let mut temp_data = TempData::new();
        for (key, token) in codec::decode(bytes)? {
            temp_data.insert_boxed(key, self.materializers.rematerialize(token));
        }
        Ok(temp_data)
    }
}

impl TempDataProvider for SessionStateTempDataProvider {
    fn load_temp_data(&self, ctx: &mut RequestContext<'_>) -> TempDataResult<Option<TempData>> {
        if !ctx.is_session_enabled() {
            debug!("session not enabled, skipping temp data load");
            return Ok(None);
        }

        let session = ctx.session()?;
        match session.try_get(&self.session_key)? {
            Some(bytes) => {
                let decoded = self.decode_payload(&bytes);
                // Removed whether or not the payload decoded: a bad payload
                // must not fail every following request too.
                session.remove(&self.session_key)?;
                let temp_data = decoded.inspect_err(|e| {
                    warn!(error = %e, len = bytes.len(), "discarding undecodable temp data");
                })?;
                debug!(entries = temp_data.len(), "temp data loaded and removed from session");
                Ok(Some(temp_data))
            }
            None => {
                // The session may need to establish itself (cookie) before
                // headers go out, which is before save runs.
                session.set(&self.session_key, Vec::new())?;
                debug!("temp data placeholder written to session");
                Ok(Some(TempData::new()))
            }
        }
    }

    fn save_temp_data(
        &self,
        ctx: &mut RequestContext<'_>,
        values: Option<&TempData>,
    ) -> TempDataResult<()> {
        let Some(values) = values.filter(|values| !values.is_empty()) else {
            if ctx.is_session_enabled() {
                ctx.session()?.remove(&self.session_key)?;
                debug!("empty temp data, session entry cleared");
            }
            return Ok(());
        };

        for (key, value) in values.iter() {
            self.ensure_can_be_serialized(value).inspect_err(|e| {
                debug!(%key, type_name = %e.type_name, "temp data value rejected");
            })?;
        }
        let bytes = codec::encode(values)?;

        let session = ctx.session()?;
        let len = bytes.len();
        session.set(&self.session_key, bytes)?;
        debug!(entries = values.len(), len, "temp data saved to session");
        Ok(())
    }
}
