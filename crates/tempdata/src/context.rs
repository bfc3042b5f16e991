//! Per-request access to the session backend.

use tempdata_session::Session;

use crate::error::{TempDataError, TempDataResult};

/// The slice of a request the temp data provider needs: its session, if the
/// application has one configured.
pub struct RequestContext<'s> {
    session: Option<&'s mut dyn Session>,
}

impl<'s> RequestContext<'s> {
    pub fn with_session(session: &'s mut dyn Session) -> Self {
        Self {
            session: Some(session),
        }
    }

    /// A request for which no session feature is configured.
    pub fn without_session() -> Self {
        Self { session: None }
    }

    pub fn is_session_enabled(&self) -> bool {
        self.session.is_some()
    }

    /// Borrow the session, failing when none is configured.
    pub fn session(&mut self) -> TempDataResult<&mut (dyn Session + 's)> {
        match self.session {
            Some(ref mut session) => Ok(&mut **session),
            None => Err(TempDataError::SessionUnavailable),
        }
    }
}
