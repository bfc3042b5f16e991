use tempdata_session::{Session, SessionStore};

pub fn clear(config: &str, db: Option<&str>, session_id: &str, all: bool) -> anyhow::Result<()> {
    let target = super::open(config, db)?;

    if all {
        let count = target.store.clear_session(session_id)?;
        println!("✓ Deleted {count} value(s) of session {session_id}");
        return Ok(());
    }

    if clear_temp_data(&target.store, session_id, target.provider.session_key())? {
        println!("✓ Cleared temp data of session {session_id}");
    } else {
        println!("No temp data pending for session {session_id}");
    }
    Ok(())
}

/// Remove the reserved key of one session. Returns false if nothing was pending.
fn clear_temp_data(store: &SessionStore, session_id: &str, key: &str) -> anyhow::Result<bool> {
    let mut session = store.session(session_id)?;
    if session.try_get(key)?.is_none() {
        return Ok(false);
    }
    session.remove(key)?;
    Ok(true)
}
