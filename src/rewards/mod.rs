//! Rewards system: points, multipliers, levels, achievements, coupons and perks
//!
//! The engine is pure. Storage lives behind [`crate::store::ProgressionStore`]
//! and the load/compute/save cycle in [`crate::service::RewardsService`].

mod coupons;
mod engine;
mod levels;
mod perks;
mod rules;

pub use coupons::{affordable_coupons, Coupon};
pub use engine::{
    DepositOutcome, DepositReceipt, LevelUp, RedeemOutcome, RewardsEngine, RewardsError,
    CO2_KG_PER_ITEM, TREE_POINTS_THRESHOLD,
};
pub use levels::{
    items_to_next_tier, next_level, resolve_level, resolve_multiplier, LevelProgress,
    MultiplierTier,
};
pub use perks::{unlocked_perks, Counter, CounterThreshold, Perk, PerkRequirement};
pub use rules::{Rules, RulesError};
