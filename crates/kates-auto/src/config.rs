//! Persistent configuration for the `kates` runner.
//!
//! Stored in `~/.kates/config.json`. Every field is optional; a missing or
//! unparsable default file yields the defaults. A file named explicitly with
//! `--config` must exist and parse.
//!
//! ```json
//! {
//!   "resume": false,
//!   "log_filter": "kates_core=debug",
//!   "variables": { "greeting": "hello" }
//! }
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::AutoError;

const CONFIG_FILENAME: &str = "config.json";

/// Default log filter when neither `RUST_LOG` nor the config sets one.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Returns `~/.kates`.
pub fn kates_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".kates")
}

/// Runner configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KatesConfig {
    /// Resume automatically when a script pauses.
    pub resume: bool,

    /// `tracing` filter directive, e.g. `"kates_core=debug"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_filter: Option<String>,

    /// Variables bound before the first command runs.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub variables: BTreeMap<String, String>,
}

impl Default for KatesConfig {
    fn default() -> Self {
        Self {
            resume: true,
            log_filter: None,
            variables: BTreeMap::new(),
        }
    }
}

impl KatesConfig {
    /// Load from `~/.kates/config.json`, falling back to defaults.
    pub fn load() -> Self {
        let path = kates_dir().join(CONFIG_FILENAME);
        std::fs::read_to_string(&path)
            .ok()
            .and_then(|s| serde_json::from_str(&s).ok())
            .unwrap_or_default()
    }

    /// Load from an explicit path. Unlike [`KatesConfig::load`], errors are
    /// reported.
    pub fn load_from(path: &Path) -> Result<Self, AutoError> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| AutoError::Config {
            message: format!("{}: {}", path.display(), e),
        })
    }

    /// `load_from` when a path is given, `load` otherwise.
    pub fn resolve(path: Option<&Path>) -> Result<Self, AutoError> {
        match path {
            Some(path) => Self::load_from(path),
            None => Ok(Self::load()),
        }
    }

    pub fn log_filter(&self) -> &str {
        self.log_filter.as_deref().unwrap_or(DEFAULT_LOG_FILTER)
    }
}
