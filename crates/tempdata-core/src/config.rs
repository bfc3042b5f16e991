//! tempdata.toml configuration parser.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Session key the provider owns when none is configured.
pub const DEFAULT_SESSION_KEY: &str = "__ControllerTempData";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TempDataConfig {
    #[serde(default)]
    pub provider: ProviderConfig,
    pub session: Option<SessionConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Reserved session key holding the whole flash payload.
    #[serde(default = "default_session_key")]
    pub session_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Path of the redb session database.
    pub path: PathBuf,
}

fn default_session_key() -> String {
    DEFAULT_SESSION_KEY.to_string()
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            session_key: default_session_key(),
        }
    }
}

impl TempDataConfig {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: TempDataConfig = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Scaffold a config pointing at a session database.
    pub fn scaffold(session_path: &Path) -> Self {
        TempDataConfig {
            provider: ProviderConfig::default(),
            session: Some(SessionConfig {
                path: session_path.to_path_buf(),
            }),
        }
    }
}
