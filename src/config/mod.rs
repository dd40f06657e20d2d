//! Configuration loading and management
//!
//! `~/.ecycle/config.toml` holds general settings and, optionally, a `[rules]`
//! section overriding the built-in rewards catalog.

mod io;
mod settings;

pub(crate) use io::write_locked;
pub use settings::{Settings, StoreBackend, StoreSettings};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::rewards::Rules;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// General settings
    #[serde(default)]
    pub settings: Settings,

    /// Rewards catalog (built-in defaults when absent)
    #[serde(default)]
    pub rules: Rules,
}

impl Config {
    /// Parse and validate configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).context("Failed to parse config")?;
        config.rules.validate().context("Invalid rules in config")?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CategoryId;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.settings.default_user, "guest");
        assert_eq!(config.settings.store.backend, StoreBackend::Sqlite);
    }

    #[test]
    fn test_rules_override_keeps_other_tables() {
        let config = Config::from_toml(
            r#"
            [settings.store]
            backend = "json"
            data_dir = "/tmp/ecycle"

            [[rules.categories]]
            id = "celulares"
            label = "Phones"
            points_per_unit = 200

            [[rules.multipliers]]
            min_items = 0
            multiplier = 1.0

            [[rules.multipliers]]
            min_items = 20
            multiplier = 3.0
            "#,
        )
        .unwrap();

        assert_eq!(config.settings.store.backend, StoreBackend::Json);
        assert_eq!(config.rules.categories.len(), 1);
        assert_eq!(
            config.rules.category(CategoryId::Celulares).unwrap().points_per_unit,
            200
        );
        assert_eq!(config.rules.multipliers.len(), 2);
        assert_eq!(config.rules.levels, Rules::default().levels);
        assert_eq!(config.rules.achievements.len(), 4);
    }

    #[test]
    fn test_achievement_tracking_from_toml() {
        let config = Config::from_toml(
            r#"
            [[rules.achievements]]
            id = "cable_guy"
            title = "Cable Guy"
            description = "Recycle 3 cables"
            max = 3
            reward_points = 30
            category = "weekly"
            tracks = { category = "cables" }

            [[rules.achievements]]
            id = "regular"
            title = "Regular"
            description = "Make 2 deposits"
            max = 2
            reward_points = 10
            category = "one-time"
            tracks = "deposits"
            "#,
        )
        .unwrap();

        let defs = &config.rules.achievements;
        assert_eq!(
            defs[0].tracks,
            crate::domain::ProgressSource::Category(CategoryId::Cables)
        );
        assert_eq!(defs[1].tracks, crate::domain::ProgressSource::Deposits);
    }

    #[test]
    fn test_invalid_rules_rejected() {
        let result = Config::from_toml(
            r#"
            [[rules.multipliers]]
            min_items = 0
            multiplier = 0.5
            "#,
        );
        assert!(result.is_err());
    }
}
