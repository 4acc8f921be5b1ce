// SPDX-License-Identifier: GPL-3.0-only

//! Viewfinder configuration
//!
//! Read once at construction. Stored as JSON in the user's configuration
//! directory; missing keys fall back to their defaults so older files keep
//! loading after new options are added.

use crate::errors::ConfigError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info};

/// Directory name under the platform configuration directory
const CONFIG_DIR_NAME: &str = "viewfinder";
/// Configuration file name
const CONFIG_FILE_NAME: &str = "config.json";

/// RGBA color, serialized as `#RRGGBB` or `#RRGGBBAA`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(0xff, 0xff, 0xff);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xff }
    }
}

impl FromStr for Color {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidColor(s.to_string());
        let hex = s.strip_prefix('#').ok_or_else(invalid)?;
        if !(hex.len() == 6 || hex.len() == 8) || !hex.is_ascii() {
            return Err(invalid());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        Ok(Color {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
            a: if hex.len() == 8 { channel(6)? } else { 0xff },
        })
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)?;
        if self.a != 0xff {
            write!(f, "{:02x}", self.a)?;
        }
        Ok(())
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Font used for the no-camera panel texts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontSpec {
    pub family: String,
    pub size: f32,
}

impl FontSpec {
    pub fn new(family: impl Into<String>, size: f32) -> Self {
        Self {
            family: family.into(),
            size,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Tag captures with the device location
    pub record_location: bool,
    /// Background behind the preview surface
    pub main_color: Color,
    /// Text shown when no camera can be used
    pub no_camera_title: String,
    pub no_camera_font: FontSpec,
    pub no_camera_color: Color,
    /// Label of the button pointing the user to system settings
    pub settings_title: String,
    pub settings_font: FontSpec,
    pub settings_color: Color,
    /// Initial lens selection handed to the backend at setup
    pub start_on_front_camera: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            record_location: true,
            main_color: Color::rgb(0x17, 0x1c, 0x21),
            no_camera_title: "Camera is not available".to_string(),
            no_camera_font: FontSpec::new("Sans Medium", 18.0),
            no_camera_color: Color::rgb(0xdb, 0xdb, 0xdb),
            settings_title: "Settings".to_string(),
            settings_font: FontSpec::new("Sans Medium", 16.0),
            settings_color: Color::WHITE,
            start_on_front_camera: false,
        }
    }
}

impl Config {
    /// Default location of the configuration file
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        dirs::config_dir()
            .map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Load from the default location, falling back to defaults if the file does not exist
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path()?;
        if !path.exists() {
            debug!(path = %path.display(), "No configuration file, using defaults");
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load from an explicit path
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let config = Self::from_json(&contents).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Write to an explicit path, creating parent directories as needed
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let write_error = |e: &dyn fmt::Display| ConfigError::Write {
            path: path.to_path_buf(),
            reason: e.to_string(),
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| write_error(&e))?;
        }
        let json = self.to_json().map_err(|e| write_error(&e))?;
        std::fs::write(path, json).map_err(|e| write_error(&e))?;
        info!(path = %path.display(), "Saved configuration");
        Ok(())
    }

    /// Parse a JSON document; unknown keys are ignored, missing keys use defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Pretty-printed JSON document as written by [`Config::save_to`]
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
