//! Rewards service - load, compute, save
//!
//! Wraps the pure engine with a store. Each mutating call runs its
//! read-modify-write cycle under one lock, so concurrent callers sharing a
//! service never lose updates.

use std::sync::Mutex;

use anyhow::{anyhow, bail, Result};
use tracing::{debug, info};

use crate::domain::{Deposit, UserProgression};
use crate::rewards::{DepositOutcome, RedeemOutcome, RewardsEngine};
use crate::store::ProgressionStore;

/// Id under which the anonymous session user is stored
pub const GUEST_ID: &str = "guest";

pub struct RewardsService {
    store: Box<dyn ProgressionStore>,
    engine: RewardsEngine,
    write_lock: Mutex<()>,
}

impl RewardsService {
    pub fn new(store: Box<dyn ProgressionStore>, engine: RewardsEngine) -> Self {
        Self {
            store,
            engine,
            write_lock: Mutex::new(()),
        }
    }

    pub fn engine(&self) -> &RewardsEngine {
        &self.engine
    }

    /// Load a user and re-derive computed fields
    pub fn load(&self, id: &str) -> Result<Option<UserProgression>> {
        let Some(mut user) = self.store.load(id)? else {
            return Ok(None);
        };
        self.engine.rules().normalize(&mut user);
        Ok(Some(user))
    }

    /// Load a user, creating the guest record on first use
    pub fn load_or_guest(&self, id: &str) -> Result<UserProgression> {
        if let Some(user) = self.load(id)? {
            return Ok(user);
        }
        if id == GUEST_ID {
            return self.create_guest();
        }
        bail!("Unknown user '{}'. Create one with `ecycle create`.", id)
    }

    pub fn list_ids(&self) -> Result<Vec<String>> {
        self.store.list_ids()
    }

    /// Create (or reset) the guest user
    pub fn create_guest(&self) -> Result<UserProgression> {
        let user = self.engine.rules().new_guest();
        self.store.save(&user)?;
        info!("Created guest user");
        Ok(user)
    }

    /// Create (or reset) the seeded demo user
    pub fn create_demo(&self) -> Result<UserProgression> {
        let user = self.engine.rules().demo_user();
        self.store.save(&user)?;
        info!("Created demo user {}", user.id);
        Ok(user)
    }

    pub fn register(&self, name: &str, email: &str) -> Result<UserProgression> {
        let user = self.engine.rules().new_registered(name, email);
        self.store.save(&user)?;
        info!("Registered user {} ({})", user.id, name);
        Ok(user)
    }

    /// Apply a deposit to a stored user. Empty deposits are not saved.
    pub fn deposit(&self, id: &str, deposit: &Deposit) -> Result<DepositOutcome> {
        let _guard = self.lock()?;
        let user = self.load_or_guest(id)?;
        let outcome = self.engine.process_deposit(&user, deposit);

        if outcome.is_noop() {
            debug!("Empty deposit for {}, nothing to save", id);
            return Ok(outcome);
        }

        self.store.save(&outcome.progression)?;
        info!(
            "Deposit for {}: {} items, {} points at {}x",
            id,
            outcome.receipt.item_count,
            outcome.receipt.awarded_points,
            outcome.receipt.multiplier
        );
        if let Some(level_up) = &outcome.receipt.level_up {
            info!(
                "{} leveled up: {} -> {}",
                id, level_up.old_level, level_up.new_level
            );
        }
        Ok(outcome)
    }

    /// Redeem `cost` points. Failed redemptions leave storage untouched.
    pub fn redeem(&self, id: &str, cost: u64) -> Result<RedeemOutcome> {
        let _guard = self.lock()?;
        let user = self.load_or_guest(id)?;
        let outcome = self.engine.redeem(&user, cost);
        self.finish_redeem(id, cost, outcome)
    }

    /// Redeem a catalog coupon
    pub fn redeem_coupon(&self, id: &str, coupon_id: &str) -> Result<RedeemOutcome> {
        let _guard = self.lock()?;
        let user = self.load_or_guest(id)?;
        let outcome = self.engine.redeem_coupon(&user, coupon_id)?;
        let cost = user.points - outcome.progression.points;
        self.finish_redeem(id, cost, outcome)
    }

    fn finish_redeem(&self, id: &str, cost: u64, outcome: RedeemOutcome) -> Result<RedeemOutcome> {
        if outcome.success {
            self.store.save(&outcome.progression)?;
            info!(
                "Redeemed {} points for {}, balance {}",
                cost, id, outcome.progression.points
            );
        } else {
            debug!(
                "Redemption by {} refused: balance {} too low",
                id, outcome.progression.points
            );
        }
        Ok(outcome)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, ()>> {
        self.write_lock
            .lock()
            .map_err(|_| anyhow!("Rewards service lock poisoned"))
    }
}
