//! redb table definitions for the session store.
//!
//! Keys are `{session_id}/{key}`; session ids never contain `/`, keys may.

use redb::TableDefinition;

/// Session values keyed by `{session_id}/{key}`.
pub const SESSION_VALUES: TableDefinition<&str, &[u8]> = TableDefinition::new("session_values");

/// Build the composite key for the session values table.
pub fn value_key(session_id: &str, key: &str) -> String {
    format!("{session_id}/{key}")
}
