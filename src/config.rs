//! Configuration management
//!
//! Loads the optional TOML settings file. The file is only ever read: a
//! missing file means defaults, and nothing the program does is saved back.

use color_eyre::eyre::{self, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::tool::SoundVolumeView;

// ============================================================================
// Public Configuration Types
// ============================================================================

/// Main configuration structure
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub settings: Settings,
}

/// Global settings
#[derive(Debug, Clone)]
pub struct Settings {
    /// Explicit `SoundVolumeView.exe` location
    pub tool_path: Option<PathBuf>,
    /// Desktop notification after a hotkey switch
    pub notify_switch: bool,
    pub log_level: String,
    /// Also write controller logs to a rotating file
    pub log_file: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self::from(SettingsFile::default())
    }
}

// ============================================================================
// Config File Deserialization (TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    settings: SettingsFile,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SettingsFile {
    #[serde(default)]
    tool_path: Option<PathBuf>,
    #[serde(default = "default_true")]
    notify_switch: bool,
    #[serde(default = "default_log_level")]
    log_level: String,
    #[serde(default)]
    log_file: bool,
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for SettingsFile {
    fn default() -> Self {
        Self {
            tool_path: None,
            notify_switch: true,
            log_level: default_log_level(),
            log_file: false,
        }
    }
}

impl From<SettingsFile> for Settings {
    fn from(file: SettingsFile) -> Self {
        Self {
            tool_path: file.tool_path,
            notify_switch: file.notify_switch,
            log_level: file.log_level,
            log_file: file.log_file,
        }
    }
}

// ============================================================================
// Config Implementation
// ============================================================================

impl Config {
    /// Load configuration from the default config path, or defaults if absent
    ///
    /// # Errors
    /// Returns an error if the config file exists but cannot be read, parsed or
    /// validated.
    pub fn load() -> Result<Self> {
        match Self::get_config_path() {
            Some(path) if path.exists() => Self::load_from_path(&path),
            Some(path) => {
                debug!("No config at {}, using defaults", path.display());
                Ok(Self::default())
            }
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Invalid config: {}", path.display()))
    }

    /// Parse and validate configuration from TOML text
    ///
    /// # Errors
    /// Returns an error on invalid TOML, unknown keys or an invalid log level.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config_file: ConfigFile = toml::from_str(contents).context("Failed to parse TOML")?;

        let config = Self {
            settings: Settings::from(config_file.settings),
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        match self.settings.log_level.as_str() {
            "error" | "warn" | "info" | "debug" | "trace" => {}
            level => eyre::bail!(
                "Invalid log_level '{level}'. Must be: error, warn, info, debug, or trace"
            ),
        }

        if let Some(path) = &self.settings.tool_path
            && path.as_os_str().is_empty()
        {
            eyre::bail!("tool_path is empty. Remove it to use the default location");
        }

        Ok(())
    }

    /// Path of the config file (`<config dir>/audiosw/config.toml`)
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("audiosw").join("config.toml"))
    }

    /// Location of `SoundVolumeView.exe` to use
    #[must_use]
    pub fn tool_path(&self) -> PathBuf {
        self.settings
            .tool_path
            .clone()
            .unwrap_or_else(SoundVolumeView::default_path)
    }

    /// Print a human-readable summary of the configuration
    pub fn print_summary(&self) {
        println!("✓ Configuration valid\n");

        println!("Settings:");
        match &self.settings.tool_path {
            Some(path) => println!("  tool_path: {}", path.display()),
            None => println!("  tool_path: (default) {}", self.tool_path().display()),
        }
        println!("  notify_switch: {}", self.settings.notify_switch);
        println!("  log_level: {}", self.settings.log_level);
        println!("  log_file: {}", self.settings.log_file);

        if !self.tool_path().exists() {
            println!("\n⚠ SoundVolumeView not found at {}", self.tool_path().display());
        }

        if let Some(path) = Self::get_config_path() {
            let state = if path.exists() { "" } else { " (not present, using defaults)" };
            println!("\nConfig: {}{}", path.display(), state);
        }
    }
}
