//! SessionStore: redb-backed session persistence.
//!
//! Holds the values of every session in one table keyed
//! `{session_id}/{key}`. The store is `Clone` (backed by `Arc<Database>`);
//! each request gets its own [`RedbSession`] handle for one session id.
//! The store supports both on-disk and in-memory backends (the latter for
//! testing).

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

use redb::{Database, ReadableDatabase, ReadableTable};
use tracing::debug;

use crate::error::{SessionError, SessionResult};
use crate::session::Session;
use crate::tables::{SESSION_VALUES, value_key};

/// Convert any `Display` error into a `SessionError` variant via a closure factory.
macro_rules! map_err {
    ($variant:ident) => {
        |e| SessionError::$variant(e.to_string())
    };
}

/// Thread-safe session store backed by redb.
#[derive(Clone)]
pub struct SessionStore {
    db: Arc<Database>,
}

impl SessionStore {
    /// Open (or create) a persistent session store at the given path.
    pub fn open(path: &Path) -> SessionResult<Self> {
        let db = Database::create(path).map_err(map_err!(Open))?;
        let store = Self { db: Arc::new(db) };
        store.ensure_tables()?;
        debug!(?path, "session store opened");
        Ok(store)
    }

    /// Create an ephemeral in-memory session store (for testing).
    pub fn open_in_memory() -> SessionResult<Self> {
        let backend = redb::backends::InMemoryBackend::new();
        let db = Database::builder()
            .create_with_backend(backend)
            .map_err(map_err!(Open))?;
        let store = Self { db: Arc::new(db) };
        store.ensure_tables()?;
        debug!("in-memory session store opened");
        Ok(store)
    }

    fn ensure_tables(&self) -> SessionResult<()> {
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        // Opening a table in a write transaction creates it if absent.
        txn.open_table(SESSION_VALUES).map_err(map_err!(Table))?;
        txn.commit().map_err(map_err!(Transaction))?;
        Ok(())
    }

    /// Handle to one session, for use by a single request.
    pub fn session(&self, session_id: &str) -> SessionResult<RedbSession> {
        check_session_id(session_id)?;
        Ok(RedbSession {
            store: self.clone(),
            session_id: session_id.to_string(),
        })
    }

    /// Get a session value.
    pub fn get(&self, session_id: &str, key: &str) -> SessionResult<Option<Vec<u8>>> {
        check_session_id(session_id)?;
        let composite = value_key(session_id, key);
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(SESSION_VALUES).map_err(map_err!(Table))?;
        let value = table
            .get(composite.as_str())
            .map_err(map_err!(Read))?
            .map(|guard| guard.value().to_vec());
        Ok(value)
    }

    /// Insert or replace a session value.
    pub fn put(&self, session_id: &str, key: &str, value: &[u8]) -> SessionResult<()> {
        check_session_id(session_id)?;
        let composite = value_key(session_id, key);
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        {
            let mut table = txn.open_table(SESSION_VALUES).map_err(map_err!(Table))?;
            table
                .insert(composite.as_str(), value)
                .map_err(map_err!(Write))?;
        }
        txn.commit().map_err(map_err!(Transaction))?;
        debug!(%session_id, %key, len = value.len(), "session value stored");
        Ok(())
    }

    /// Delete a session value. Returns true if it existed.
    pub fn remove(&self, session_id: &str, key: &str) -> SessionResult<bool> {
        check_session_id(session_id)?;
        let composite = value_key(session_id, key);
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        let existed;
        {
            let mut table = txn.open_table(SESSION_VALUES).map_err(map_err!(Table))?;
            existed = table
                .remove(composite.as_str())
                .map_err(map_err!(Write))?
                .is_some();
        }
        txn.commit().map_err(map_err!(Transaction))?;
        debug!(%session_id, %key, existed, "session value removed");
        Ok(existed)
    }

    /// List the keys stored for one session.
    pub fn list_keys(&self, session_id: &str) -> SessionResult<Vec<String>> {
        check_session_id(session_id)?;
        let prefix = value_key(session_id, "");
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(SESSION_VALUES).map_err(map_err!(Table))?;
        let mut keys = Vec::new();
        for entry in table.iter().map_err(map_err!(Read))? {
            let (key, _) = entry.map_err(map_err!(Read))?;
            if let Some(rest) = key.value().strip_prefix(&prefix) {
                keys.push(rest.to_string());
            }
        }
        Ok(keys)
    }

    /// List every session id that holds at least one value.
    pub fn list_sessions(&self) -> SessionResult<Vec<String>> {
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(SESSION_VALUES).map_err(map_err!(Table))?;
        let mut sessions = BTreeSet::new();
        for entry in table.iter().map_err(map_err!(Read))? {
            let (key, _) = entry.map_err(map_err!(Read))?;
            if let Some((session_id, _)) = key.value().split_once('/') {
                sessions.insert(session_id.to_string());
            }
        }
        Ok(sessions.into_iter().collect())
    }

    /// Delete every value of a session. Returns number deleted.
    pub fn clear_session(&self, session_id: &str) -> SessionResult<u32> {
        check_session_id(session_id)?;
        let prefix = value_key(session_id, "");
        // Collect keys in a read transaction first.
        let mut keys = Vec::new();
        {
            let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
            let table = txn.open_table(SESSION_VALUES).map_err(map_err!(Table))?;
            for entry in table.iter().map_err(map_err!(Read))? {
                let (key, _) = entry.map_err(map_err!(Read))?;
                if key.value().starts_with(&prefix) {
                    keys.push(key.value().to_string());
                }
            }
        }
        let count = u32::try_from(keys.len())
            .map_err(|_| SessionError::Backend(format!("{} keys in one session", keys.len())))?;

        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        {
            let mut table = txn.open_table(SESSION_VALUES).map_err(map_err!(Table))?;
            for key in &keys {
                table.remove(key.as_str()).map_err(map_err!(Write))?;
            }
        }
        txn.commit().map_err(map_err!(Transaction))?;
        debug!(%session_id, count, "session cleared");
        Ok(count)
    }
}

fn check_session_id(session_id: &str) -> SessionResult<()> {
    if session_id.is_empty() || session_id.contains('/') {
        return Err(SessionError::InvalidSessionId(session_id.to_string()));
    }
    Ok(())
}

/// One session of a [`SessionStore`].
#[derive(Clone)]
pub struct RedbSession {
    store: SessionStore,
    session_id: String,
}

impl RedbSession {
    pub fn id(&self) -> &str {
        &self.session_id
    }
}

impl Session for RedbSession {
    fn try_get(&self, key: &str) -> SessionResult<Option<Vec<u8>>> {
        self.store.get(&self.session_id, key)
    }

    fn set(&mut self, key: &str, value: Vec<u8>) -> SessionResult<()> {
        self.store.put(&self.session_id, key, &value)
    }

    fn remove(&mut self, key: &str) -> SessionResult<()> {
        self.store.remove(&self.session_id, key)?;
        Ok(())
    }
}
