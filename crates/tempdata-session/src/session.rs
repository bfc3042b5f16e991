//! The byte-valued key store seen by the temp data provider.

use crate::error::SessionResult;

/// Request-local handle to a session.
///
/// Values are opaque bytes. Every call may hit I/O, so all of them are
/// fallible; callers do not retry.
pub trait Session: Send {
    fn try_get(&self, key: &str) -> SessionResult<Option<Vec<u8>>>;

    fn set(&mut self, key: &str, value: Vec<u8>) -> SessionResult<()>;

    fn remove(&mut self, key: &str) -> SessionResult<()>;
}

impl<S: Session + ?Sized> Session for Box<S> {
    fn try_get(&self, key: &str) -> SessionResult<Option<Vec<u8>>> {
        (**self).try_get(key)
    }

    fn set(&mut self, key: &str, value: Vec<u8>) -> SessionResult<()> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> SessionResult<()> {
        (**self).remove(key)
    }
}
