use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use lookout_core::shared::constants::{FOCAL_LENGTH_PX, REFERENCE_WIDTH_M};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub camera_index: u32,
    /// Detection confidence as a percentage, 0..=100.
    pub confidence: u32,
    #[serde(default = "default_focal_length")]
    pub focal_length_px: f64,
    #[serde(default = "default_reference_width")]
    pub reference_width_m: f64,
}

fn default_focal_length() -> f64 {
    FOCAL_LENGTH_PX
}

fn default_reference_width() -> f64 {
    REFERENCE_WIDTH_M
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            camera_index: 0,
            confidence: 25,
            focal_length_px: FOCAL_LENGTH_PX,
            reference_width_m: REFERENCE_WIDTH_M,
        }
    }
}

impl Settings {
    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("Lookout").join("settings.json"))
    }

    pub fn load() -> Self {
        Self::config_path()
            .map(|path| Self::read_from(&path))
            .unwrap_or_default()
    }

    pub fn save(&self) {
        if let Some(path) = Self::config_path() {
            self.write_to(&path);
        }
    }

    fn read_from(path: &Path) -> Self {
        fs::read_to_string(path)
            .ok()
            .and_then(|json| serde_json::from_str(&json).ok())
            .unwrap_or_default()
    }

    fn write_to(&self, path: &Path) {
        if let Some(parent) = path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        if let Ok(json) = serde_json::to_string_pretty(self) {
            let _ = fs::write(path, json);
        }
    }
}
