//! The main config loading module for mediascope.
//!
//! Handles loading and deserializing settings from `mediascope.toml`.
//!
//! Provides and manages the main [Config] struct, as well as the internal [RawConfig] used for parsing and processing.
//!
//! Also implements default config initialization when `mediascope.toml` is not present,
//! and writing back the `[general]` table after the settings tab saved it.

use crate::config::{General, Keys};

use serde::{Deserialize, Serialize};
use std::{
    fs, io,
    path::{Path, PathBuf},
};

/// Raw configuration as read from the toml file
/// This struct is deserialized directly from the toml file.
/// It uses owned types and is then converted into the main [Config] struct.
#[derive(Deserialize, Serialize, Debug, Default)]
#[serde(default)]
pub struct RawConfig {
    general: General,
    keys: Keys,
}

/// Main configuration struct for mediascope
/// This struct holds the processed configuration options used by mediascope.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    general: General,
    keys: Keys,
}

/// Conversion from RawConfig to Config
/// Extension lists are normalized on the way in.
impl From<RawConfig> for Config {
    fn from(raw: RawConfig) -> Self {
        Self {
            general: raw.general.normalized(),
            keys: raw.keys,
        }
    }
}

/// Public methods for loading and accessing the configuration
impl Config {
    /// Load configuration from the default path
    /// If the file does not exist or fails to parse, returns the default configuration.
    ///
    /// Called by entry point to load config at startup.
    pub fn load() -> Self {
        Self::load_from(&Self::default_path())
    }

    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            log::info!(
                "No config file at {}. Using internal defaults. (Tip: run 'mscope --init' to generate one.)",
                path.display()
            );
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(content) => match toml::from_str::<RawConfig>(&content) {
                Ok(raw) => raw.into(),
                Err(e) => {
                    log::warn!("Error parsing config {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Could not read config {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    // Getters

    #[inline]
    pub fn general(&self) -> &General {
        &self.general
    }

    #[inline]
    pub fn keys(&self) -> &Keys {
        &self.keys
    }

    pub fn set_general(&mut self, general: General) {
        self.general = general;
    }

    /// Determine the default configuration file path.
    /// Checks the MSCOPE_CONFIG environment variable first,
    /// Checks for XDG_CONFIG_HOME after,
    /// then defaults to ~/.config/mediascope/mediascope.toml,
    pub fn default_path() -> PathBuf {
        if let Ok(path) = std::env::var("MSCOPE_CONFIG") {
            return PathBuf::from(path);
        }

        if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg_config).join("mediascope/mediascope.toml");
        }

        if let Some(home) = dirs::home_dir() {
            return home.join(".config/mediascope/mediascope.toml");
        }
        PathBuf::from("mediascope.toml")
    }

    /// Generate a default configuration file at the specified path.
    /// If the file already exists, returns an error.
    pub fn generate_default(path: &Path) -> io::Result<()> {
        if path.exists() {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("Config file already exists at {:?}", path),
            ));
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, DEFAULT_TOML)
    }

    /// Replaces the `[general]` table of the config file, keeping every other table as is.
    ///
    /// Creates the file (and its parent directories) when missing.
    pub fn save_general(path: &Path, general: &General) -> io::Result<()> {
        let mut doc = match fs::read_to_string(path) {
            Ok(content) => toml::from_str::<toml::Table>(&content)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => toml::Table::new(),
            Err(e) => return Err(e),
        };

        let value = toml::Value::try_from(general)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))?;
        doc.insert("general".to_string(), value);

        let text = toml::to_string_pretty(&doc)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, text)
    }
}

const DEFAULT_TOML: &str = r##"# mediascope.toml - default configuration for mediascope

# Note:
# Commented values are the internal defaults of mediascope.

[general]
append_on_file_drop = true
# display_mode = "auto"          # "auto", "light" or "dark"
# directory_mode = "all"         # "all", "audio", "image" or "video"

# [general.file_extensions]
# audio = ["mp3", "aac", "flac", "wav", "ogg", "m4a", "mka", "ape", "ac3", "dts"]
# image = ["jpg", "jpeg", "png", "gif", "bmp", "tif"]
# video = ["mkv", "mp4", "m2ts", "ts", "avi", "mov", "wmv", "flv", "webm"]

# [keys]
# quit = ["q"]
# go_up = ["k", "Up"]
# go_down = ["j", "Down"]
# go_left = ["h", "Left"]
# go_right = ["l", "Right"]
# next_tab = ["Tab", "Ctrl+n"]
# prev_tab = ["BackTab", "Ctrl+p"]
# close_tab = ["Ctrl+w"]
# open_about = ["F1"]
# open_settings = ["F10"]
# add_files = ["o"]
# append_files = ["Shift+o"]
# add_directory = ["d"]
# append_directory = ["Shift+d"]
# clear_files = ["Ctrl+q"]
# delete_file = ["x", "Delete"]
# open_details = ["Enter"]
# retry = ["r"]
# filter = ["/", "f"]
# toggle_view = ["v"]
# sort = ["s"]
# export_json = ["e"]
# toggle_stream = [" "]
# select_all_streams = ["+"]
# select_no_streams = ["-"]
# cycle_stream_filter = ["t"]
# next_page = ["n", "PageDown"]
# prev_page = ["p", "PageUp"]
# page_size = ["z"]
# save_settings = ["Ctrl+s"]
"##;
