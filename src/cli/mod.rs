//! CLI command implementations

pub mod create;
pub mod deposit;
pub mod init;
pub mod redeem;
pub mod status;

use anyhow::{Context, Result};

use ecycle::config::Config;
use ecycle::rewards::RewardsEngine;
use ecycle::service::RewardsService;
use ecycle::store::open_store;

/// Build the rewards service described by `config`
pub fn open_service(config: &Config) -> Result<RewardsService> {
    let engine = RewardsEngine::new(config.rules.clone()).context("Invalid rewards rules")?;
    let store = open_store(&config.settings.store)?;
    Ok(RewardsService::new(store, engine))
}
