//! Storage configuration

use serde::Deserialize;
use std::path::PathBuf;

/// Where the persisted JSON documents live
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory holding `rate_limits.json`, `bot_state.json` and `user_acceptances.json`
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(".")
}
