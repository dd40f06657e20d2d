//! E-Cycle - recycling rewards
//!
//! Users drop e-waste at collection points and report what they deposited.
//! Each deposit earns points, scaled by a multiplier that grows with the
//! number of items recycled this month. Points and completed achievements
//! determine the user's level, and points can be spent on coupons.
//!
//! ## Layers
//!
//! 1. **Engine** ([`rewards::RewardsEngine`]): pure rules, state in and state out.
//! 2. **Store** ([`store::ProgressionStore`]): one record per user
//!    (SQLite, JSON files or memory).
//! 3. **Service** ([`service::RewardsService`]): load, apply, save.

pub mod config;
pub mod domain;
pub mod rewards;
pub mod service;
pub mod store;

pub use domain::*;
