//! Configuration management for Batchcast
//!
//! Configuration is a TOML file. Every section is optional:
//!
//! ```toml
//! [defaults]
//! platform = "instagram"
//!
//! [limits]
//! twitter = 280
//!
//! [[slots]]
//! id = "weekday-mornings"
//! name = "Weekday Mornings"
//! time = "08:30"
//! days = ["Mon", "Tue", "Wed", "Thu", "Fri"]
//! platforms = ["linkedin"]
//!
//! [events]
//! capacity = 100
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::service::slots::SlotRegistry;
use crate::service::validation::PlatformLimits;
use crate::types::{Platform, TimeSlot};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub defaults: DefaultsConfig,
    /// Character limit overrides, merged over the built-in table
    #[serde(default)]
    pub limits: HashMap<String, usize>,
    /// Seeded time slots; the built-in slots are used when empty
    #[serde(default)]
    pub slots: Vec<TimeSlot>,
    #[serde(default)]
    pub events: EventsConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Platform assigned to imported rows without a platforms column
    pub platform: Platform,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            platform: Platform::Instagram,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventsConfig {
    pub capacity: usize,
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self { capacity: 100 }
    }
}

impl Config {
    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        let config_path = resolve_config_path()?;
        Self::load_from_path(&config_path)
    }

    /// Load from the default location, or use defaults when no file exists
    pub fn load_or_default() -> Result<Self> {
        let config_path = resolve_config_path()?;
        if config_path.exists() {
            Self::load_from_path(&config_path)
        } else {
            tracing::debug!(path = %config_path.display(), "no config file, using defaults");
            Ok(Self::default_config())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadError)?;
        Self::from_toml(&content)
    }

    /// Parse and check configuration text
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).map_err(ConfigError::ParseError)?;
        config.check()?;
        Ok(config)
    }

    /// Create a default configuration
    pub fn default_config() -> Self {
        Self::default()
    }

    pub fn platform_limits(&self) -> PlatformLimits {
        let overrides: HashMap<Platform, usize> = self
            .limits
            .iter()
            .filter_map(|(tag, limit)| Platform::from_tag(tag).map(|p| (p, *limit)))
            .collect();
        PlatformLimits::with_overrides(&overrides)
    }

    /// Slot registry seeded from config, or the built-in slots
    pub fn slot_registry(&self) -> Result<SlotRegistry> {
        if self.slots.is_empty() {
            Ok(SlotRegistry::with_defaults())
        } else {
            SlotRegistry::from_slots(self.slots.clone())
        }
    }

    fn check(&self) -> Result<()> {
        for (platform, limit) in &self.limits {
            if Platform::from_tag(platform).is_none() {
                return Err(ConfigError::InvalidValue {
                    field: format!("limits.{}", platform),
                    reason: "unknown platform".to_string(),
                }
                .into());
            }
            if *limit == 0 {
                return Err(ConfigError::InvalidValue {
                    field: format!("limits.{}", platform),
                    reason: "must be greater than zero".to_string(),
                }
                .into());
            }
        }

        if self.events.capacity == 0 {
            return Err(ConfigError::InvalidValue {
                field: "events.capacity".to_string(),
                reason: "must be greater than zero".to_string(),
            }
            .into());
        }

        self.slot_registry().map_err(|e| ConfigError::InvalidValue {
            field: "slots".to_string(),
            reason: e.to_string(),
        })?;

        Ok(())
    }
}

/// Resolve the configuration file path following XDG Base Directory spec
pub fn resolve_config_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var("BATCHCAST_CONFIG") {
        return Ok(PathBuf::from(shellexpand::tilde(&path).to_string()));
    }

    let config_dir = dirs::config_dir()
        .ok_or_else(|| ConfigError::MissingField("config directory".to_string()))?;

    Ok(config_dir.join("batchcast").join("config.toml"))
}
