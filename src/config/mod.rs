// ABOUTME: Configuration types and parsing for nodelink.yml.
// ABOUTME: Teardown audit message, release parameters, and link defaults.

mod init;

pub use init::init_config;

use crate::error::{Error, Result};
use crate::gateway::{LinkMode, ReleaseParams};
use crate::types::SystemId;
use serde::Deserialize;
use std::path::Path;

pub const CONFIG_FILENAME: &str = "nodelink.yml";
pub const CONFIG_FILENAME_ALT: &str = "nodelink.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".nodelink/config.yml";

pub const DEFAULT_ABORT_MESSAGE: &str =
    "nodelink on {host} requested removal of a link on machine {system_id}. Aborting current operation...";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub teardown: TeardownConfig,

    /// Mode used by `create` when none is given.
    #[serde(default)]
    pub default_mode: LinkMode,
}

/// Settings for the abort and release steps of a link teardown.
#[derive(Debug, Clone, Deserialize)]
pub struct TeardownConfig {
    /// Audit message for abort. Supports `{system_id}` and `{host}`.
    #[serde(default = "default_abort_message")]
    pub abort_message: String,

    #[serde(default)]
    pub release: ReleaseParams,
}

fn default_abort_message() -> String {
    DEFAULT_ABORT_MESSAGE.to_string()
}

impl Default for TeardownConfig {
    fn default() -> Self {
        Self {
            abort_message: default_abort_message(),
            release: ReleaseParams::default(),
        }
    }
}

impl TeardownConfig {
    /// Render the abort audit message for a node.
    pub fn abort_message_for(&self, node: &SystemId) -> String {
        let host = gethostname::gethostname();
        self.abort_message
            .replace("{system_id}", node.as_str())
            .replace("{host}", &host.to_string_lossy())
    }
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn discover(dir: &Path) -> Result<Self> {
        let candidates = [
            dir.join(CONFIG_FILENAME),
            dir.join(CONFIG_FILENAME_ALT),
            dir.join(CONFIG_FILENAME_DIR),
        ];

        for path in &candidates {
            if path.exists() {
                return Self::load(path);
            }
        }

        Err(Error::ConfigNotFound(dir.to_path_buf()))
    }

    /// Like `discover`, but fall back to defaults when no file exists.
    pub fn discover_or_default(dir: &Path) -> Result<Self> {
        match Self::discover(dir) {
            Err(Error::ConfigNotFound(_)) => Ok(Self::default()),
            other => other,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.teardown.abort_message.trim().is_empty() {
            return Err(Error::InvalidConfig(
                "teardown.abort_message cannot be empty".to_string(),
            ));
        }

        let release = &self.teardown.release;
        if (release.secure_erase || release.quick_erase) && !release.erase {
            return Err(Error::InvalidConfig(
                "teardown.release: secure_erase and quick_erase require erase".to_string(),
            ));
        }

        Ok(())
    }

    pub fn template() -> Self {
        Config {
            teardown: TeardownConfig {
                abort_message: default_abort_message(),
                release: ReleaseParams {
                    comment: Some("released by nodelink to remove an interface link".to_string()),
                    ..ReleaseParams::default()
                },
            },
            default_mode: LinkMode::Auto,
        }
    }
}
