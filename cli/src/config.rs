// Configuration management for the ldp-synth CLI
//
// Cross-platform config stored in:
// - macOS: ~/Library/Application Support/ldp-synth/config.json
// - Linux: ~/.config/ldp-synth/config.json
// - Windows: %APPDATA%\ldp-synth\config.json
//
// Command-line flags always win over values from this file.

use anyhow::{Context, Result};
use ldp_synth_core::Mode;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Mechanism used when --mechanism is not given
    pub default_mechanism: Mode,

    /// Field delimiter for input and output files
    pub delimiter: char,

    /// Fixed seed for reproducible output (unset: fresh randomness per run)
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_mechanism: Mode::Both,
            delimiter: ',',
            seed: None,
        }
    }
}

impl Config {
    /// Get the config directory path (cross-platform)
    pub fn config_dir() -> Result<PathBuf> {
        Ok(dirs::config_dir()
            .context("Failed to determine config directory")?
            .join("ldp-synth"))
    }

    /// Get the config file path
    pub fn config_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    /// Load config from the default location, or defaults if absent
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }
        let contents = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, contents).context("Failed to write config file")?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        delimiter_byte(self.delimiter)?;
        Ok(())
    }

    /// Delimiter as the single byte the csv layer expects
    pub fn delimiter_byte(&self) -> Result<u8> {
        delimiter_byte(self.delimiter)
    }

    /// Set a config value (in memory; call `save` to persist)
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "default_mechanism" => {
                self.default_mechanism = value.parse().context("Invalid mechanism")?;
            }
            "delimiter" => {
                let delimiter = parse_delimiter(value)?;
                delimiter_byte(delimiter)?;
                self.delimiter = delimiter;
            }
            "seed" => {
                self.seed = if value.is_empty() || value == "none" {
                    None
                } else {
                    Some(value.parse().context("Invalid seed")?)
                };
            }
            _ => anyhow::bail!("Unknown config key: {}", key),
        }
        Ok(())
    }

    /// Get a config value
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "default_mechanism" => Some(self.default_mechanism.to_string()),
            "delimiter" => Some(display_delimiter(self.delimiter)),
            "seed" => Some(
                self.seed
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "none".to_string()),
            ),
            _ => None,
        }
    }

    /// List all config values
    pub fn list(&self) -> Vec<(String, String)> {
        ["default_mechanism", "delimiter", "seed"]
            .iter()
            .filter_map(|key| self.get(key).map(|value| (key.to_string(), value)))
            .collect()
    }
}

/// Accepts a literal single character or the escapes `\t` / `tab`.
pub fn parse_delimiter(value: &str) -> Result<char> {
    match value {
        "\\t" | "tab" => Ok('\t'),
        _ => {
            let mut chars = value.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(c),
                _ => anyhow::bail!("Delimiter must be a single character: {:?}", value),
            }
        }
    }
}

pub fn delimiter_byte(delimiter: char) -> Result<u8> {
    if !delimiter.is_ascii() {
        anyhow::bail!("Delimiter must be an ASCII character: {:?}", delimiter);
    }
    Ok(delimiter as u8)
}

fn display_delimiter(delimiter: char) -> String {
    match delimiter {
        '\t' => "\\t".to_string(),
        c => c.to_string(),
    }
}
