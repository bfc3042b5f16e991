pub mod clear;
pub mod init;
pub mod inspect;

use std::path::{Path, PathBuf};

use anyhow::Context;
use tempdata::{SessionStateTempDataProvider, TempDataConfig};
use tempdata_session::SessionStore;

/// Session store and provider resolved from the CLI arguments.
pub struct Target {
    pub store: SessionStore,
    pub provider: SessionStateTempDataProvider,
}

/// Open the session database named by `--db`, falling back to the config.
///
/// A missing config file is not an error; defaults apply.
pub fn open(config_path: &str, db: Option<&str>) -> anyhow::Result<Target> {
    let config_path = Path::new(config_path);
    let config = if config_path.exists() {
        TempDataConfig::from_file(config_path)
            .with_context(|| format!("reading {}", config_path.display()))?
    } else {
        TempDataConfig::default()
    };

    let db_path = match (db, &config.session) {
        (Some(db), _) => PathBuf::from(db),
        (None, Some(session)) => session.path.clone(),
        (None, None) => anyhow::bail!(
            "no session database: pass --db or set [session].path in {}",
            config_path.display()
        ),
    };
    let store = SessionStore::open(&db_path)
        .with_context(|| format!("opening session database {}", db_path.display()))?;
    tracing::debug!(db = %db_path.display(), "session database opened");

    Ok(Target {
        store,
        provider: SessionStateTempDataProvider::from_config(&config),
    })
}
