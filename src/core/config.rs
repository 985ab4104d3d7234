use std::path::PathBuf;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;

use super::alerts::model::AlertLevel;
use super::alerts::triggers::AlertQuery;
use super::geometry::Geometry;

/// One persisted alert condition: watch every graphic of `feed` against a
/// fixed target geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionConfig {
    pub name: String,
    #[serde(default)]
    pub level: AlertLevel,
    pub query: AlertQuery,
    /// Name of the graphics feed supplying sources
    pub feed: String,
    /// Target geometries (perimeters, points of interest)
    #[serde(default)]
    pub target: Vec<Geometry>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

/// Alert settings persisted in settings.json.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlertSettings {
    #[serde(default)]
    pub conditions: Vec<ConditionConfig>,
}

pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    pub fn new(app_config_dir: PathBuf) -> Self {
        Self {
            config_path: app_config_dir.join("settings.json"),
        }
    }

    /// Missing or unreadable settings fall back to defaults.
    pub fn load(&self) -> AlertSettings {
        if self.config_path.exists() {
            match fs::read_to_string(&self.config_path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(settings) => return settings,
                    Err(e) => log::warn!("Ignoring invalid {:?}: {}", self.config_path, e),
                },
                Err(e) => log::warn!("Cannot read {:?}: {}", self.config_path, e),
            }
        }
        AlertSettings::default()
    }

    pub fn save(&self, settings: &AlertSettings) -> io::Result<()> {
        // Ensure directory exists
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(settings)?;
        fs::write(&self.config_path, content)
    }
}
