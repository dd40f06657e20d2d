//! Init command implementation

use anyhow::{bail, Result};
use std::path::PathBuf;

use ecycle::config::Config;

/// Default configuration content for ecycle init
pub const DEFAULT_CONFIG: &str = r#"# E-Cycle Configuration
# ======================

# ============================================================================
# SETTINGS
# ============================================================================
#
#   default_user  - user id used when --user is not given (default: "guest")
#   store.backend - "sqlite" (default), "json" (one file per user) or "memory"
#   store.data_dir - where store files live (default: ~/.ecycle)

[settings]
default_user = "guest"

[settings.store]
backend = "sqlite"

# ============================================================================
# RULES - override any table of the built-in rewards catalog
# ============================================================================
#
# Each table replaces the built-in one entirely when present.
#
# [[rules.categories]]
# id = "celulares"          # celulares | baterias | laptops | cables
# label = "Celulares"
# points_per_unit = 150
#
# [[rules.multipliers]]     # tier reached on items deposited this month
# min_items = 5
# multiplier = 1.5
#
# [[rules.levels]]          # highest level whose minimums are met wins
# level = "Ensamblador"
# min_points = 1000
# min_achievements = 2
#
# [[rules.achievements]]
# id = "battery_saver"
# title = "Guardian de Energía"
# description = "Recicla 10 baterías."
# max = 10
# reward_points = 100
# category = "weekly"       # daily | weekly | monthly | one-time
# tracks = { category = "baterias" }   # or "deposits" / "items" / "manual"
#
# [[rules.coupons]]
# id = "c3"
# title = "20% Dscto Café"
# cost = 500
# category = "Descuento"
"#;

/// Write a fresh config file
pub async fn init_command(config_path: Option<PathBuf>, force: bool) -> Result<()> {
    let config_path = config_path.unwrap_or_else(Config::global_config_path);

    if config_path.exists() && !force {
        bail!(
            "Configuration already exists: {}\nUse --force to overwrite.",
            config_path.display()
        );
    }

    // Make sure what we write is what we can load
    Config::from_toml(DEFAULT_CONFIG)?;

    if let Some(parent) = config_path.parent() {
        if !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    std::fs::write(&config_path, DEFAULT_CONFIG)?;
    println!("Created: {}", config_path.display());

    Ok(())
}
