use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use directories_next::ProjectDirs;

/// Environment override for the config root, used by integration tests
/// and unusual deployments.
const CONFIG_DIR_ENV: &str = "COLORFIELD_CONFIG_DIR";

/// Resolved on-disk locations for colorfield.
#[derive(Debug, Clone)]
pub struct AppPaths {
    config_dir: PathBuf,
}

impl AppPaths {
    /// Discovers the platform config directory (XDG on Linux), honoring
    /// the `COLORFIELD_CONFIG_DIR` override when set.
    pub fn discover() -> Result<Self> {
        if let Some(dir) = env::var_os(CONFIG_DIR_ENV).filter(|value| !value.is_empty()) {
            return Ok(Self {
                config_dir: PathBuf::from(dir),
            });
        }
        let dirs = ProjectDirs::from("", "", "colorfield")
            .context("failed to resolve platform directories")?;
        Ok(Self {
            config_dir: dirs.config_dir().to_path_buf(),
        })
    }

    /// File holding the persisted hue/saturation pair.
    pub fn state_file(&self) -> PathBuf {
        self.config_dir.join("state.toml")
    }
}
