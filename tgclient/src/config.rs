//! Client configuration
//!
//! A small YAML configuration for the pieces callers usually want to pin
//! down across runs: the gateway base URL, the request timeout and the name
//! of the persistent cache store. Absent file or absent fields fall back to
//! defaults.

use crate::api::DEFAULT_REQUEST_TIMEOUT_SECS;
use crate::client::DEFAULT_GATEWAY_URL;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Configuration file name
pub const CONFIG_FILE_NAME: &str = "tunegate.yaml";

/// Directory component under the user config directory
const APP_DIR: &str = "tunegate";

/// Gateway client configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GatewayConfig {
    /// Gateway base URL
    pub gateway: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Name of the persistent cache store
    pub cache_name: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            gateway: DEFAULT_GATEWAY_URL.to_string(),
            timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            cache_name: tgcache::DEFAULT_STORE_NAME.to_string(),
        }
    }
}

impl GatewayConfig {
    /// Default location of the configuration file
    /// (`<user config dir>/tunegate/tunegate.yaml`), if the platform
    /// provides a config directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE_NAME))
    }

    /// Load the configuration from a YAML file.
    ///
    /// A missing file yields the defaults; a file that exists but does not
    /// parse is an error.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let text = fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&text)?)
    }

    /// Save the configuration as YAML, creating parent directories as
    /// needed.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, serde_yaml::to_string(self)?)?;
        debug!("Saved config to {}", path.display());

        Ok(())
    }
}
