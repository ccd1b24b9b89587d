use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Get the local data directory for shields.
///
/// # Errors
///
/// Returns an error if the local data directory cannot be determined.
pub fn get_data_dir() -> Result<PathBuf> {
    let mut path =
        dirs::data_local_dir().ok_or_else(|| anyhow::anyhow!("Failed to get local data dir"))?;
    path.push("shields");
    Ok(path)
}

/// Settings file, `<data_dir>/config.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub telemetry: TelemetryConfig,
    pub adblock: AdBlockConfig,
    pub features: FeatureConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Analytics project token; telemetry is disabled without one
    pub token: Option<String>,
    /// Event journal location, defaults to `<data_dir>/events.jsonl`
    pub journal: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdBlockConfig {
    pub regional_list: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureConfig {
    pub contextual_search: bool,
    pub content_suggestions_settings: bool,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            contextual_search: true,
            content_suggestions_settings: false,
        }
    }
}

impl Config {
    /// Load the config; a missing file yields defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed
    pub fn load(path: &Path) -> Result<Self> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No config at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to read config {}", path.display()))
            }
        };
        toml::from_str(&contents).with_context(|| format!("Invalid config {}", path.display()))
    }

    /// Write the config, creating the parent directory
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write config {}", path.display()))?;
        log::info!("Config saved to {}", path.display());
        Ok(())
    }

    /// Journal path, resolved against `data_dir` when not configured
    #[must_use]
    pub fn journal_path(&self, data_dir: &Path) -> PathBuf {
        self.telemetry
            .journal
            .clone()
            .unwrap_or_else(|| data_dir.join("events.jsonl"))
    }

    /// Read a value by dotted key (e.g. `telemetry.token`)
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown key
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let value = match key {
            "telemetry.token" => self.telemetry.token.clone(),
            "telemetry.journal" => path_string(self.telemetry.journal.as_deref()),
            "adblock.regional_list" => path_string(self.adblock.regional_list.as_deref()),
            "features.contextual_search" => Some(self.features.contextual_search.to_string()),
            "features.content_suggestions_settings" => {
                Some(self.features.content_suggestions_settings.to_string())
            }
            _ => anyhow::bail!("Unknown config key: {key}. Valid keys: {}", Self::KEYS.join(", ")),
        };
        Ok(value)
    }

    /// Set a value by dotted key. An empty value clears optional entries.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown key or an invalid boolean
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let optional = (!value.is_empty()).then(|| value.to_string());
        match key {
            "telemetry.token" => self.telemetry.token = optional,
            "telemetry.journal" => self.telemetry.journal = optional.map(PathBuf::from),
            "adblock.regional_list" => self.adblock.regional_list = optional.map(PathBuf::from),
            "features.contextual_search" => self.features.contextual_search = parse_flag(value)?,
            "features.content_suggestions_settings" => {
                self.features.content_suggestions_settings = parse_flag(value)?;
            }
            _ => anyhow::bail!("Unknown config key: {key}. Valid keys: {}", Self::KEYS.join(", ")),
        }
        Ok(())
    }

    pub const KEYS: [&'static str; 5] = [
        "telemetry.token",
        "telemetry.journal",
        "adblock.regional_list",
        "features.contextual_search",
        "features.content_suggestions_settings",
    ];
}

fn path_string(path: Option<&Path>) -> Option<String> {
    path.map(|p| p.display().to_string())
}

/// Parse a boolean the way the CLI accepts it
///
/// # Errors
///
/// Returns an error if the value is not a recognised boolean
pub fn parse_flag(value: &str) -> Result<bool> {
    match value {
        "true" | "1" | "on" => Ok(true),
        "false" | "0" | "off" => Ok(false),
        _ => anyhow::bail!("Invalid boolean: {value} (use true/false)"),
    }
}
