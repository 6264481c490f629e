use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fmt, fs, path::Path, path::PathBuf};

use crate::error::WidgetError;

pub const DEFAULT_SELECTOR: &str = "#app";
pub const DEFAULT_UNITS: &str = "M";
pub const DEFAULT_MESSAGE: &str = "Right now in {city}, it's {temperature} and {conditions}.";
pub const DEFAULT_ERROR: &str =
    "Sorry, there was a problem getting the weather. Please try again later.";

/// Caller-supplied overrides. Every field is optional; `None` keeps the default.
///
/// Example TOML (inside the `[widget]` table of the config file):
/// api_key = "..."
/// units = "I"
/// icon = false
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selector: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub units: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Options {
    /// Layer `other` on top of `self`; fields set in `other` win.
    pub fn merge(self, other: Options) -> Options {
        Options {
            api_key: other.api_key.or(self.api_key),
            selector: other.selector.or(self.selector),
            units: other.units.or(self.units),
            message: other.message.or(self.message),
            icon: other.icon.or(self.icon),
            error: other.error.or(self.error),
        }
    }

    /// The error message to render, available even when resolution fails.
    pub fn error_message(&self) -> &str {
        self.error.as_deref().unwrap_or(DEFAULT_ERROR)
    }

    /// The target selector, available even when resolution fails.
    pub fn target_selector(&self) -> &str {
        self.selector.as_deref().unwrap_or(DEFAULT_SELECTOR)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

impl UnitSystem {
    /// Single-letter code the weather API expects.
    pub fn code(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "M",
            UnitSystem::Imperial => "I",
        }
    }

    /// Temperature unit label shown after the degree sign.
    pub fn label(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "C",
            UnitSystem::Imperial => "F",
        }
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl TryFrom<&str> for UnitSystem {
    type Error = WidgetError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_uppercase().as_str() {
            "M" => Ok(UnitSystem::Metric),
            "I" => Ok(UnitSystem::Imperial),
            _ => Err(WidgetError::InvalidUnits(value.to_string())),
        }
    }
}

/// A non-empty API key. `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// Fully resolved widget settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_key: ApiKey,
    pub target_selector: String,
    pub unit_system: UnitSystem,
    pub message_template: String,
    pub show_icon: bool,
    pub error_message: String,
}

/// Merge `overrides` over the defaults and validate the result.
pub fn resolve(overrides: &Options) -> Result<Settings, WidgetError> {
    let api_key = overrides
        .api_key
        .as_deref()
        .and_then(ApiKey::new)
        .ok_or(WidgetError::MissingCredential)?;

    let unit_system = UnitSystem::try_from(overrides.units.as_deref().unwrap_or(DEFAULT_UNITS))?;

    let message_template = overrides
        .message
        .clone()
        .unwrap_or_else(|| DEFAULT_MESSAGE.to_string());

    Ok(Settings {
        api_key,
        target_selector: overrides.target_selector().to_string(),
        unit_system,
        message_template,
        show_icon: overrides.icon.unwrap_or(true),
        error_message: overrides.error_message().to_string(),
    })
}

/// Host configuration stored on disk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Example TOML:
    /// [widget]
    /// api_key = "..."
    #[serde(default)]
    pub widget: Options,
}

impl Config {
    /// Load config from the platform location, or an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        Self::load_from(&path)
    }

    /// Load config from an explicit path; a missing file yields the default.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to the platform location.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;
        self.save_to(&path)
    }

    /// Save config to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-widget", "weather-widget")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn has_api_key(&self) -> bool {
        self.widget.api_key.as_deref().and_then(ApiKey::new).is_some()
    }
}
