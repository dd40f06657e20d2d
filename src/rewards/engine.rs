//! Rewards engine - deposit and redemption rules
//!
//! Pure state transitions: every operation takes a progression, returns a new
//! one, and never touches storage.

use chrono::{DateTime, Utc};
use tracing::debug;

use super::levels::{resolve_level, resolve_multiplier};
use super::rules::{Rules, RulesError};
use crate::domain::{
    CategoryId, Deposit, Level, ProgressSource, Transaction, TransactionKind, UserProgression,
};

/// CO2 saved per deposited item, in kilograms
pub const CO2_KG_PER_ITEM: f64 = 0.5;

/// Deposits awarding more than this many points plant one tree
pub const TREE_POINTS_THRESHOLD: u64 = 200;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum RewardsError {
    #[error("Unknown coupon: {0}")]
    UnknownCoupon(String),

    #[error("Invalid rules: {0}")]
    InvalidRules(#[from] RulesError),
}

/// A level change caused by a deposit
#[derive(Debug, Clone, PartialEq)]
pub struct LevelUp {
    pub old_level: Level,
    pub new_level: Level,
}

/// Summary of what a deposit earned
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DepositReceipt {
    pub item_count: u64,
    pub base_points: u64,
    pub multiplier: f64,
    pub awarded_points: u64,
    /// Achievements completed by this deposit
    pub completed: Vec<String>,
    pub level_up: Option<LevelUp>,
    pub tree_planted: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DepositOutcome {
    pub progression: UserProgression,
    pub receipt: DepositReceipt,
}

impl DepositOutcome {
    /// True when the deposit changed nothing
    pub fn is_noop(&self) -> bool {
        self.receipt.item_count == 0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RedeemOutcome {
    pub progression: UserProgression,
    pub success: bool,
}

/// Applies the rules catalog to user progressions
#[derive(Debug, Clone, Default)]
pub struct RewardsEngine {
    rules: Rules,
}

/// Half-away-from-zero rounding of `points * multiplier`
fn apply_multiplier(points: u64, multiplier: f64) -> u64 {
    (points as f64 * multiplier).round() as u64
}

impl RewardsEngine {
    /// Create an engine over a validated rules catalog
    pub fn new(rules: Rules) -> Result<Self, RewardsError> {
        rules.validate()?;
        Ok(Self { rules })
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    /// Process a deposit stamped with the current time
    pub fn process_deposit(&self, state: &UserProgression, deposit: &Deposit) -> DepositOutcome {
        self.process_deposit_at(state, deposit, Utc::now())
    }

    /// Process a deposit at a given instant.
    ///
    /// The multiplier is resolved on the post-deposit monthly total, so a large
    /// deposit can lift itself into a higher tier.
    pub fn process_deposit_at(
        &self,
        state: &UserProgression,
        deposit: &Deposit,
        now: DateTime<Utc>,
    ) -> DepositOutcome {
        // Only rated categories count toward anything
        let rated: Vec<_> = deposit
            .iter()
            .filter_map(|(id, count)| match self.rules.category(id) {
                Some(category) => Some((category, count)),
                None => {
                    debug!("No rate configured for category {}, ignoring", id);
                    None
                }
            })
            .collect();

        let item_count: u64 = rated.iter().map(|(_, count)| u64::from(*count)).sum();
        if item_count == 0 {
            return DepositOutcome {
                progression: state.clone(),
                receipt: DepositReceipt {
                    multiplier: state.active_multiplier,
                    ..DepositReceipt::default()
                },
            };
        }

        let base_points: u64 = rated
            .iter()
            .map(|(category, count)| u64::from(*count) * category.points_per_unit)
            .sum();

        let mut next = state.clone();
        next.items_this_month = state.items_this_month.saturating_add(item_count);
        let multiplier = resolve_multiplier(&self.rules.multipliers, next.items_this_month);
        let awarded_points = apply_multiplier(base_points, multiplier);

        // One history entry per category, newest first
        let mut transactions: Vec<Transaction> = rated
            .iter()
            .map(|(category, count)| Transaction {
                id: format!(
                    "tx_{}_{}_{}",
                    now.timestamp_millis(),
                    uuid::Uuid::new_v4().simple(),
                    category.id
                ),
                kind: TransactionKind::Deposit,
                label: format!("Reciclaste {} {}", count, category.label),
                timestamp: now,
                points_delta: apply_multiplier(
                    u64::from(*count) * category.points_per_unit,
                    multiplier,
                ) as i64,
            })
            .collect();
        transactions.append(&mut next.history);
        next.history = transactions;

        let completed = self.advance_achievements(&mut next, deposit, item_count);

        for (category, count) in &rated {
            let count = u64::from(*count);
            let counter = match category.id {
                CategoryId::Celulares => &mut next.phones_recycled,
                CategoryId::Laptops => &mut next.computers_recycled,
                CategoryId::Baterias => &mut next.batteries_recycled,
                CategoryId::Cables => &mut next.cables_recycled_kg,
            };
            *counter = counter.saturating_add(count);
        }

        next.points = state.points.saturating_add(awarded_points);
        next.active_multiplier = multiplier;
        next.level = resolve_level(&self.rules.levels, next.points, next.completed_achievements());

        let tree_planted = awarded_points > TREE_POINTS_THRESHOLD;
        next.impact.co2_kg += item_count as f64 * CO2_KG_PER_ITEM;
        if tree_planted {
            next.impact.trees += 1;
        }

        let level_up = (next.level != state.level).then(|| LevelUp {
            old_level: state.level,
            new_level: next.level,
        });

        DepositOutcome {
            progression: next,
            receipt: DepositReceipt {
                item_count,
                base_points,
                multiplier,
                awarded_points,
                completed,
                level_up,
                tree_planted,
            },
        }
    }

    /// Advance every catalog-backed achievement, returning newly completed ids.
    /// Achievements missing from the catalog keep their progress.
    fn advance_achievements(
        &self,
        user: &mut UserProgression,
        deposit: &Deposit,
        item_count: u64,
    ) -> Vec<String> {
        let mut completed = Vec::new();
        for ach in &mut user.achievements {
            let Some(def) = self.rules.achievement_def(&ach.id) else {
                continue;
            };
            let amount = match def.tracks {
                ProgressSource::Category(id) if self.rules.category(id).is_some() => {
                    deposit.count(id)
                }
                ProgressSource::Category(_) => 0,
                ProgressSource::Deposits => 1,
                ProgressSource::Items => u32::try_from(item_count).unwrap_or(u32::MAX),
                ProgressSource::Manual => 0,
            };
            if amount > 0 && ach.advance(amount) {
                completed.push(ach.id.clone());
            }
        }
        completed
    }

    /// Deduct `cost` if the balance covers it; otherwise return the state unchanged
    pub fn redeem(&self, state: &UserProgression, cost: u64) -> RedeemOutcome {
        if state.points >= cost {
            let mut next = state.clone();
            next.points = state.points - cost;
            RedeemOutcome {
                progression: next,
                success: true,
            }
        } else {
            RedeemOutcome {
                progression: state.clone(),
                success: false,
            }
        }
    }

    /// Redeem a catalog coupon by id
    pub fn redeem_coupon(
        &self,
        state: &UserProgression,
        coupon_id: &str,
    ) -> Result<RedeemOutcome, RewardsError> {
        let coupon = self
            .rules
            .coupon(coupon_id)
            .ok_or_else(|| RewardsError::UnknownCoupon(coupon_id.to_string()))?;
        Ok(self.redeem(state, coupon.cost))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn engine() -> RewardsEngine {
        RewardsEngine::default()
    }

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, 10, 0, 0).unwrap()
    }

    fn user(points: u64, items_this_month: u64) -> UserProgression {
        let mut user = engine().rules().new_guest();
        user.points = points;
        user.items_this_month = items_this_month;
        user
    }

    #[test]
    fn test_deposit_crosses_multiplier_tier() {
        let state = user(0, 4);
        let deposit = Deposit::new().with(CategoryId::Celulares, 1);
        let outcome = engine().process_deposit_at(&state, &deposit, at());
        let next = &outcome.progression;

        assert_eq!(next.items_this_month, 5);
        assert_eq!(next.active_multiplier, 1.5);
        assert_eq!(outcome.receipt.base_points, 150);
        assert_eq!(outcome.receipt.awarded_points, 225);
        assert_eq!(next.points, 225);
        assert_eq!(next.phones_recycled, 1);
        assert_eq!(next.impact.co2_kg, 0.5);
        assert_eq!(next.impact.trees, 1);
    }

    #[test]
    fn test_deposit_records_one_transaction_per_category() {
        let mut state = user(0, 0);
        state.history = engine().rules().demo_user().history;
        let deposit = Deposit::new()
            .with(CategoryId::Baterias, 2)
            .with(CategoryId::Cables, 2)
            .with(CategoryId::Laptops, 0);
        let outcome = engine().process_deposit_at(&state, &deposit, at());
        let history = &outcome.progression.history;

        assert_eq!(history.len(), 3);
        assert_eq!(history[0].label, "Reciclaste 2 Baterías");
        assert_eq!(history[0].points_delta, 100);
        assert_eq!(history[1].label, "Reciclaste 2 Cables");
        assert_eq!(history[1].points_delta, 40);
        assert_eq!(history[2].id, "tx_init_1");
        assert!(history[0].id.ends_with("_baterias"));
    }

    #[test]
    fn test_same_instant_deposits_get_distinct_ids() {
        let engine = engine();
        let deposit = Deposit::new().with(CategoryId::Cables, 1);
        let first = engine.process_deposit_at(&user(0, 0), &deposit, at()).progression;
        let second = engine.process_deposit_at(&first, &deposit, at()).progression;

        assert_eq!(second.history.len(), 2);
        assert_ne!(second.history[0].id, second.history[1].id);
        assert!(second.history[0].id.starts_with(&format!("tx_{}_", at().timestamp_millis())));
    }

    #[test]
    fn test_transaction_points_use_rounded_multiplier() {
        // 1 cable at 1.5x = 30, 1 battery at 1.5x = 75
        let state = user(0, 6);
        let deposit = Deposit::new()
            .with(CategoryId::Cables, 1)
            .with(CategoryId::Baterias, 1);
        let outcome = engine().process_deposit_at(&state, &deposit, at());
        assert_eq!(outcome.receipt.multiplier, 1.5);
        assert_eq!(outcome.receipt.awarded_points, 105);
        assert!(!outcome.receipt.tree_planted);
    }

    #[test]
    fn test_achievement_completes_on_deposit() {
        let mut state = user(0, 0);
        for ach in &mut state.achievements {
            if ach.id == "phone_expert" {
                ach.progress = 4;
            }
        }
        let deposit = Deposit::new().with(CategoryId::Celulares, 1);
        let outcome = engine().process_deposit_at(&state, &deposit, at());

        let phone = outcome.progression.achievement("phone_expert").unwrap();
        assert_eq!(phone.progress, 5);
        assert!(phone.completed);
        assert!(outcome.receipt.completed.contains(&"phone_expert".to_string()));
    }

    #[test]
    fn test_deposit_counter_advances_once_per_deposit() {
        let state = user(0, 0);
        let deposit = Deposit::new()
            .with(CategoryId::Cables, 7)
            .with(CategoryId::Baterias, 2);
        let next = engine().process_deposit_at(&state, &deposit, at()).progression;

        assert_eq!(next.achievement("recycle_master").unwrap().progress, 1);
        assert_eq!(next.achievement("battery_saver").unwrap().progress, 2);
        assert_eq!(next.achievement("phone_expert").unwrap().progress, 0);
    }

    #[test]
    fn test_first_recycle_is_not_advanced_by_deposits() {
        let state = user(900, 10);
        let deposit = Deposit::new().with(CategoryId::Celulares, 5);
        let outcome = engine().process_deposit_at(&state, &deposit, at());
        let next = &outcome.progression;

        let first = next.achievement("first_recycle").unwrap();
        assert_eq!(first.progress, 0);
        assert!(!first.completed);

        // 750 * 2 = 1500; only phone_expert completes
        assert_eq!(next.points, 2400);
        assert_eq!(outcome.receipt.completed, vec!["phone_expert"]);
        assert_eq!(next.completed_achievements(), 1);
        assert_eq!(next.level, Level::Descubridor);
        assert!(outcome.receipt.level_up.is_none());
    }

    #[test]
    fn test_level_up_uses_post_deposit_achievements() {
        let mut state = user(900, 10);
        for ach in &mut state.achievements {
            match ach.id.as_str() {
                "first_recycle" => ach.progress = 1,
                "phone_expert" => ach.progress = 4,
                _ => {}
            }
            ach.refresh_completed();
        }
        // phone_expert completes as the second achievement, 150 * 2 = 300 points
        let deposit = Deposit::new().with(CategoryId::Celulares, 1);
        let outcome = engine().process_deposit_at(&state, &deposit, at());

        assert_eq!(outcome.progression.points, 1200);
        assert_eq!(outcome.progression.level, Level::Ensamblador);
        assert_eq!(
            outcome.receipt.level_up,
            Some(LevelUp {
                old_level: Level::Descubridor,
                new_level: Level::Ensamblador,
            })
        );
    }

    #[test]
    fn test_empty_deposit_is_noop() {
        let state = engine().rules().demo_user();
        let outcome = engine().process_deposit_at(&state, &Deposit::new(), at());
        assert!(outcome.is_noop());
        assert_eq!(outcome.progression, state);

        let zeros = Deposit::new().with(CategoryId::Celulares, 0);
        assert_eq!(
            engine().process_deposit_at(&state, &zeros, at()).progression,
            state
        );
    }

    #[test]
    fn test_unrated_category_is_ignored() {
        let mut rules = Rules::default();
        rules.categories.retain(|c| c.id != CategoryId::Laptops);
        let engine = RewardsEngine::new(rules).unwrap();
        let state = engine.rules().new_guest();

        let deposit = Deposit::new()
            .with(CategoryId::Laptops, 3)
            .with(CategoryId::Cables, 1);
        let outcome = engine.process_deposit_at(&state, &deposit, at());
        assert_eq!(outcome.receipt.item_count, 1);
        assert_eq!(outcome.progression.points, 20);
        assert_eq!(outcome.progression.computers_recycled, 0);
        assert_eq!(outcome.progression.history.len(), 1);
    }

    #[test]
    fn test_deposits_never_decrease_progress() {
        let engine = engine();
        let mut state = engine.rules().demo_user();
        let batches = [
            Deposit::new().with(CategoryId::Celulares, 2),
            Deposit::new(),
            Deposit::new().with(CategoryId::Cables, 11),
            Deposit::new()
                .with(CategoryId::Laptops, 1)
                .with(CategoryId::Baterias, 4),
        ];
        for deposit in &batches {
            let next = engine.process_deposit_at(&state, deposit, at()).progression;
            assert!(next.points >= state.points);
            assert!(next.items_this_month >= state.items_this_month);
            assert!(next.level >= state.level);
            for (before, after) in state.achievements.iter().zip(&next.achievements) {
                assert!(after.progress >= before.progress);
            }
            state = next;
        }
    }

    #[test]
    fn test_redeem_exact_balance_then_fail() {
        let state = user(500, 0);
        let first = engine().redeem(&state, 500);
        assert!(first.success);
        assert_eq!(first.progression.points, 0);
        assert_eq!(first.progression.history, state.history);

        let second = engine().redeem(&first.progression, 1);
        assert!(!second.success);
        assert_eq!(second.progression, first.progression);
    }

    #[test]
    fn test_redeem_only_changes_points() {
        let state = engine().rules().demo_user();
        let mut rich = state.clone();
        rich.points = 2000;

        let outcome = engine().redeem(&rich, 1250);
        let mut expected = rich.clone();
        expected.points = 750;
        assert_eq!(outcome.progression, expected);
    }

    #[test]
    fn test_redeem_coupon() {
        let state = user(600, 0);
        let outcome = engine().redeem_coupon(&state, "c3").unwrap();
        assert!(outcome.success);
        assert_eq!(outcome.progression.points, 100);

        assert_eq!(
            engine().redeem_coupon(&state, "c99"),
            Err(RewardsError::UnknownCoupon("c99".to_string()))
        );
    }

    #[test]
    fn test_new_rejects_invalid_rules() {
        let mut rules = Rules::default();
        rules.achievements[0].max = 0;
        assert!(matches!(
            RewardsEngine::new(rules),
            Err(RewardsError::InvalidRules(RulesError::ZeroMax(_)))
        ));
    }
}
