//! Configuration file support for Rota.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/rota/config.toml`. It is
//! the profile provider for the engine: cycle anchor, default generator
//! preferences, analytics settings, and custom catalog entries.

use crate::{
    ActivityAnalytics, Catalog, CycleConfig, Error, Focus, Result, UserPreferences,
    DEFAULT_STREAK_LOOKBACK_DAYS,
};
use chrono::{NaiveDate, Weekday};
use serde::{de, Deserialize, Deserializer, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub cycle: CycleSection,

    #[serde(default)]
    pub preferences: PreferencesConfig,

    #[serde(default)]
    pub analytics: AnalyticsConfig,

    /// Extra entries appended to the built-in catalog
    #[serde(default)]
    pub catalog: Catalog,
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

/// Training cycle anchor
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CycleSection {
    #[serde(default = "default_cycle_length")]
    pub cycle_length: u32,

    /// Day 1 of the cycle, quoted or as a native TOML date
    #[serde(
        default = "default_start_date",
        deserialize_with = "deserialize_start_date"
    )]
    pub start_date: NaiveDate,

    /// IANA zone name, e.g. "Europe/Berlin"
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

impl Default for CycleSection {
    fn default() -> Self {
        Self {
            cycle_length: default_cycle_length(),
            start_date: default_start_date(),
            timezone: default_timezone(),
        }
    }
}

/// Default generator preferences
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PreferencesConfig {
    #[serde(default = "default_focus")]
    pub focus: Focus,

    #[serde(default = "default_rest_days")]
    pub rest_days: u32,

    #[serde(default = "default_include_mobility")]
    pub include_mobility: bool,
}

impl Default for PreferencesConfig {
    fn default() -> Self {
        Self {
            focus: default_focus(),
            rest_days: default_rest_days(),
            include_mobility: default_include_mobility(),
        }
    }
}

/// Streak and weekly-count settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    #[serde(default = "default_week_start")]
    pub week_start: Weekday,

    #[serde(default = "default_streak_lookback_days")]
    pub streak_lookback_days: u32,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            week_start: default_week_start(),
            streak_lookback_days: default_streak_lookback_days(),
        }
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        PathBuf::from(home).join(".local/share")
    });
    base.join("rota")
}

fn default_cycle_length() -> u32 {
    7
}

fn default_start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default()
}

fn deserialize_start_date<'de, D>(deserializer: D) -> std::result::Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let text = match toml::Value::deserialize(deserializer)? {
        toml::Value::String(s) => s,
        toml::Value::Datetime(dt) if dt.time.is_none() && dt.offset.is_none() => dt
            .date
            .map(|d| d.to_string())
            .ok_or_else(|| de::Error::custom("start_date is missing its date"))?,
        other => {
            return Err(de::Error::custom(format!(
                "start_date must be a date like 2024-01-01, got {}",
                other
            )))
        }
    };
    NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d").map_err(de::Error::custom)
}

fn default_timezone() -> String {
    "UTC".into()
}

fn default_focus() -> Focus {
    Focus::Mix
}

fn default_rest_days() -> u32 {
    2
}

fn default_include_mobility() -> bool {
    true
}

fn default_week_start() -> Weekday {
    Weekday::Sun
}

fn default_streak_lookback_days() -> u32 {
    DEFAULT_STREAK_LOOKBACK_DAYS
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
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
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            PathBuf::from(home).join(".config")
        });
        base.join("rota").join("config.toml")
    }

    /// Save the current configuration to the default path
    pub fn save(&self) -> Result<()> {
        let config_path = Self::default_config_path();
        self.save_to(&config_path)
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::InvalidConfig(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }

    /// Validated cycle settings
    pub fn cycle_config(&self) -> Result<CycleConfig> {
        CycleConfig::new(
            self.cycle.cycle_length,
            self.cycle.start_date,
            &self.cycle.timezone,
        )
    }

    /// Default generator preferences
    pub fn preferences(&self) -> UserPreferences {
        UserPreferences {
            focus: self.preferences.focus,
            rest_days: self.preferences.rest_days,
            include_mobility: self.preferences.include_mobility,
        }
    }

    /// Analytics settings in the configured zone
    pub fn analytics(&self) -> Result<ActivityAnalytics> {
        let cycle = self.cycle_config()?;
        Ok(ActivityAnalytics::new(cycle.timezone)
            .with_week_start(self.analytics.week_start)
            .with_streak_lookback(self.analytics.streak_lookback_days))
    }

    /// Built-in catalog plus any custom entries
    pub fn catalog(&self) -> Result<Catalog> {
        let catalog = crate::get_default_catalog().clone().with_custom(&self.catalog);
        let errors = catalog.validate();
        if !errors.is_empty() {
            return Err(Error::CatalogValidation(errors.join("; ")));
        }
        Ok(catalog)
    }
}
