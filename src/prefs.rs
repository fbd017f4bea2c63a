//! User preferences persistence.
//!
//! Optional settings read from ~/.config/tracemap/config.toml. Command-line
//! flags override anything set here.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::map::{Calibration, MarkerStyle};

/// User preferences
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prefs {
    /// Map bitmap to render
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map_path: Option<PathBuf>,
    /// MaxMind GeoLite2 City database
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geoip_db: Option<PathBuf>,
    /// Glyphs from bright to dark, e.g. " .:-=+*#"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub palette: Option<String>,
    /// Marker emphasis; "none" disables escapes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marker_style: Option<String>,
    /// Geographic extent of the map bitmap
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calibration: Option<Calibration>,
}

impl Prefs {
    /// Get config file path: ~/.config/tracemap/config.toml
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("tracemap").join("config.toml"))
    }

    /// Load preferences from disk (returns default if missing/invalid)
    pub fn load() -> Self {
        Self::path()
            .map(|p| Self::load_from(&p))
            .unwrap_or_default()
    }

    /// Load from an explicit file (returns default if missing/invalid)
    pub fn load_from(path: &Path) -> Self {
        let Ok(text) = fs::read_to_string(path) else {
            return Self::default();
        };
        match toml::from_str(&text) {
            Ok(prefs) => prefs,
            Err(e) => {
                log::warn!("Ignoring invalid config {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Marker style from the config. `None` means markers are drawn plain.
    pub fn marker_style(&self) -> Option<MarkerStyle> {
        match self.marker_style.as_deref() {
            None => Some(MarkerStyle::default()),
            Some(name) if name.eq_ignore_ascii_case("none") => None,
            Some(name) => MarkerStyle::by_name(name).or_else(|| {
                log::warn!("Unknown marker style '{}', using default", name);
                Some(MarkerStyle::default())
            }),
        }
    }
}
