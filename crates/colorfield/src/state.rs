use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use theme::ColorState;

/// Persisted color preferences.
///
/// Both values are stored as decimal strings, the wire format the picker
/// has always used, so the file survives hand edits and version drift.
/// Reading back is lenient: anything missing or unparseable lands on the
/// defaults via [`ColorState::from_persisted`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppState {
    #[serde(rename = "bgHue", skip_serializing_if = "Option::is_none")]
    pub bg_hue: Option<String>,
    #[serde(rename = "bgSaturation", skip_serializing_if = "Option::is_none")]
    pub bg_saturation: Option<String>,
}

impl AppState {
    pub fn from_color(color: ColorState) -> Self {
        Self {
            bg_hue: Some(color.hue.to_string()),
            bg_saturation: Some(color.saturation.to_string()),
        }
    }

    /// Interprets the stored strings as a valid color state.
    pub fn color(&self) -> ColorState {
        ColorState::from_persisted(self.bg_hue.as_deref(), self.bg_saturation.as_deref())
    }

    /// Loads the state file, treating an unreadable or malformed file the
    /// same as a missing one: the picker must come up regardless.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read state file at {}", path.display()))?;
        match toml::from_str(&contents) {
            Ok(state) => Ok(state),
            Err(err) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %err,
                    "state file is malformed; starting from defaults"
                );
                Ok(Self::default())
            }
        }
    }

    pub fn persist(&self, path: &Path) -> Result<()> {
        let dir = path
            .parent()
            .ok_or_else(|| anyhow::anyhow!("state path has no parent: {}", path.display()))?;
        fs::create_dir_all(dir).with_context(|| {
            format!(
                "failed to prepare directory for state file at {}",
                dir.display()
            )
        })?;
        let serialized = toml::to_string_pretty(self)
            .context("failed to serialize state file to TOML")?;
        fs::write(path, serialized)
            .with_context(|| format!("failed to write state file to {}", path.display()))?;
        Ok(())
    }
}
