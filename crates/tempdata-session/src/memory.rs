//! In-memory session backend.

use std::sync::Arc;

use dashmap::DashMap;

use crate::error::SessionResult;
use crate::session::Session;

/// Session values held in memory.
///
/// Clones share the same values, so a test can hand one clone to a request
/// and inspect the other afterwards.
#[derive(Debug, Clone, Default)]
pub struct MemorySession {
    values: Arc<DashMap<String, Vec<u8>>>,
}

impl MemorySession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.values.get(key).map(|v| v.value().clone())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn clear(&self) {
        self.values.clear();
    }
}

impl Session for MemorySession {
    fn try_get(&self, key: &str) -> SessionResult<Option<Vec<u8>>> {
        Ok(self.get(key))
    }

    fn set(&mut self, key: &str, value: Vec<u8>) -> SessionResult<()> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> SessionResult<()> {
        self.values.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_values() {
        let observer = MemorySession::new();
        let mut session = observer.clone();

        session.set("k", vec![1, 2, 3]).unwrap();
        assert_eq!(observer.get("k"), Some(vec![1, 2, 3]));

        session.remove("k").unwrap();
        assert!(observer.is_empty());
    }

    #[test]
    fn missing_key_is_none() {
        let session = MemorySession::new();
        assert_eq!(session.try_get("nope").unwrap(), None);
    }
}
