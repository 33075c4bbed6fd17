//! Configuration file support for Nutri.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/nutri/config.toml`.

use crate::{Error, Result, WeightUnit};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub display: DisplayConfig,

    #[serde(default)]
    pub analysis: AnalysisConfig,

    #[serde(default)]
    pub foods: FoodsConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Output formatting configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default)]
    pub weight_unit: WeightUnit,

    /// Number of weight entries shown by `nutri weights`
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            weight_unit: WeightUnit::default(),
            history_limit: default_history_limit(),
        }
    }
}

/// Progress analysis configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Calorie target used when the profile has none stored yet
    #[serde(default = "default_fallback_calorie_target")]
    pub fallback_calorie_target: i32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            fallback_calorie_target: default_fallback_calorie_target(),
        }
    }
}

/// Food database configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FoodsConfig {
    #[serde(default = "default_search_limit")]
    pub search_limit: usize,
}

impl Default for FoodsConfig {
    fn default() -> Self {
        Self {
            search_limit: default_search_limit(),
        }
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| {
        std::env::var_os("HOME")
            .map(|home| PathBuf::from(home).join(".local/share"))
            .unwrap_or_else(|| PathBuf::from("."))
    });
    base.join("nutri")
}

fn default_history_limit() -> usize {
    12
}

fn default_fallback_calorie_target() -> i32 {
    2000
}

fn default_search_limit() -> usize {
    10
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::debug!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| {
            std::env::var_os("HOME")
                .map(|home| PathBuf::from(home).join(".config"))
                .unwrap_or_else(|| PathBuf::from("."))
        });
        base.join("nutri").join("config.toml")
    }

    /// Reject values that would make commands meaningless
    pub fn validate(&self) -> Result<()> {
        if self.display.history_limit == 0 {
            return Err(Error::Config("display.history_limit must be positive".into()));
        }
        if self.foods.search_limit == 0 {
            return Err(Error::Config("foods.search_limit must be positive".into()));
        }
        if self.analysis.fallback_calorie_target <= 0 {
            return Err(Error::Config(
                "analysis.fallback_calorie_target must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}
