//! Static rules catalog: rates, thresholds, achievements, coupons and perks
//!
//! The built-in defaults are the production tables. A `[rules]` section in the
//! config file can replace any of them; the catalog is immutable once loaded.

use std::collections::HashSet;

use chrono::{TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::coupons::Coupon;
use super::levels::{resolve_level, resolve_multiplier, MultiplierTier};
use super::perks::{Counter, CounterThreshold, Perk, PerkRequirement};
use crate::domain::{
    Achievement, AchievementCategory, AchievementDef, CategoryId, ItemCategory, Level,
    LevelThreshold, ProgressSource, Transaction, TransactionKind, UserProgression,
};

/// Error type for rules validation
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum RulesError {
    #[error("Category '{0}' is defined more than once")]
    DuplicateCategory(CategoryId),

    #[error("Achievement '{0}' is defined more than once")]
    DuplicateAchievement(String),

    #[error("Achievement '{0}' must have max > 0")]
    ZeroMax(String),

    #[error("Coupon '{0}' is defined more than once")]
    DuplicateCoupon(String),

    #[error("Invalid multiplier {multiplier} for tier starting at {min_items} items")]
    InvalidMultiplier { min_items: u64, multiplier: f64 },

    #[error("Multiplier tiers must not decrease as item counts grow")]
    NonMonotonicMultipliers,
}

/// Full rules catalog consumed by the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rules {
    #[serde(default = "default_categories")]
    pub categories: Vec<ItemCategory>,

    #[serde(default = "default_levels")]
    pub levels: Vec<LevelThreshold>,

    #[serde(default = "default_multipliers")]
    pub multipliers: Vec<MultiplierTier>,

    #[serde(default = "default_achievements")]
    pub achievements: Vec<AchievementDef>,

    #[serde(default = "default_coupons")]
    pub coupons: Vec<Coupon>,

    #[serde(default = "default_perks")]
    pub perks: Vec<Perk>,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            categories: default_categories(),
            levels: default_levels(),
            multipliers: default_multipliers(),
            achievements: default_achievements(),
            coupons: default_coupons(),
            perks: default_perks(),
        }
    }
}

impl Rules {
    /// Check catalog consistency
    pub fn validate(&self) -> Result<(), RulesError> {
        let mut seen = HashSet::new();
        for category in &self.categories {
            if !seen.insert(category.id) {
                return Err(RulesError::DuplicateCategory(category.id));
            }
        }

        let mut seen = HashSet::new();
        for def in &self.achievements {
            if !seen.insert(def.id.as_str()) {
                return Err(RulesError::DuplicateAchievement(def.id.clone()));
            }
            if def.max == 0 {
                return Err(RulesError::ZeroMax(def.id.clone()));
            }
        }

        let mut seen = HashSet::new();
        for coupon in &self.coupons {
            if !seen.insert(coupon.id.as_str()) {
                return Err(RulesError::DuplicateCoupon(coupon.id.clone()));
            }
        }

        for tier in &self.multipliers {
            if !tier.multiplier.is_finite() || tier.multiplier < 1.0 {
                return Err(RulesError::InvalidMultiplier {
                    min_items: tier.min_items,
                    multiplier: tier.multiplier,
                });
            }
        }
        let mut tiers: Vec<_> = self.multipliers.iter().collect();
        tiers.sort_by_key(|t| t.min_items);
        if tiers.windows(2).any(|w| w[1].multiplier < w[0].multiplier) {
            return Err(RulesError::NonMonotonicMultipliers);
        }

        Ok(())
    }

    pub fn category(&self, id: CategoryId) -> Option<&ItemCategory> {
        self.categories.iter().find(|c| c.id == id)
    }

    pub fn achievement_def(&self, id: &str) -> Option<&AchievementDef> {
        self.achievements.iter().find(|a| a.id == id)
    }

    pub fn coupon(&self, id: &str) -> Option<&Coupon> {
        self.coupons.iter().find(|c| c.id == id)
    }

    /// Zero-progress achievements for a brand-new user
    pub fn starting_achievements(&self) -> Vec<Achievement> {
        self.achievements.iter().map(|d| d.to_achievement()).collect()
    }

    pub fn new_guest(&self) -> UserProgression {
        UserProgression::guest(self.starting_achievements())
    }

    pub fn new_registered(&self, name: &str, email: &str) -> UserProgression {
        UserProgression::register(name, email, self.starting_achievements())
    }

    /// The seeded demo account used for walkthroughs
    pub fn demo_user(&self) -> UserProgression {
        let mut achievements = self.starting_achievements();
        for ach in &mut achievements {
            ach.progress = match ach.id.as_str() {
                "first_recycle" => 1,
                "phone_expert" => 1,
                "battery_saver" => 3,
                "recycle_master" => 1,
                _ => 0,
            };
            ach.refresh_completed();
        }

        let mut user = UserProgression::new("user_123", achievements);
        user.name = "Alexandra".to_string();
        user.email = "fakemail@gmail.com".to_string();
        user.items_this_month = 4;
        user.phones_recycled = 2;
        user.batteries_recycled = 5;
        user.cables_recycled_kg = 2;
        user.impact.co2_kg = 85.0;
        user.impact.trees = 4;
        user.history.push(Transaction {
            id: "tx_init_1".to_string(),
            kind: TransactionKind::Deposit,
            label: "Reciclaje Inicial".to_string(),
            timestamp: Utc
                .with_ymd_and_hms(2025, 10, 28, 12, 0, 0)
                .single()
                .unwrap_or_else(Utc::now),
            points_delta: 50,
        });
        self.normalize(&mut user);
        user
    }

    /// Re-derive every computed field of a loaded record
    pub fn normalize(&self, user: &mut UserProgression) {
        for ach in &mut user.achievements {
            ach.refresh_completed();
        }
        user.level = resolve_level(&self.levels, user.points, user.completed_achievements());
        user.active_multiplier = resolve_multiplier(&self.multipliers, user.items_this_month);
    }
}

fn default_categories() -> Vec<ItemCategory> {
    vec![
        ItemCategory::new(CategoryId::Celulares, "Celulares", 150),
        ItemCategory::new(CategoryId::Baterias, "Baterías", 50),
        ItemCategory::new(CategoryId::Laptops, "Laptops", 300),
        ItemCategory::new(CategoryId::Cables, "Cables", 20),
    ]
}

fn default_levels() -> Vec<LevelThreshold> {
    let row = |level, min_points, min_achievements| LevelThreshold {
        level,
        min_points,
        min_achievements,
    };
    vec![
        row(Level::Reactivador, 5000, 4),
        row(Level::Recolector, 2500, 3),
        row(Level::Ensamblador, 1000, 2),
        row(Level::Descubridor, 0, 0),
    ]
}

fn default_multipliers() -> Vec<MultiplierTier> {
    let tier = |min_items, multiplier| MultiplierTier {
        min_items,
        multiplier,
    };
    vec![tier(0, 1.0), tier(5, 1.5), tier(10, 2.0)]
}

fn default_achievements() -> Vec<AchievementDef> {
    vec![
        AchievementDef {
            id: "first_recycle".to_string(),
            title: "Recicla tu primer objeto".to_string(),
            description: "Escanea y deposita un ítem de e-waste en un punto designado".to_string(),
            max: 1,
            reward_points: 50,
            category: AchievementCategory::OneTime,
            tracks: ProgressSource::Manual,
        },
        AchievementDef {
            id: "phone_expert".to_string(),
            title: "Llamado de Emergencia".to_string(),
            description: "Recicla 5 smartphones antiguos.".to_string(),
            max: 5,
            reward_points: 500,
            category: AchievementCategory::Monthly,
            tracks: ProgressSource::Category(CategoryId::Celulares),
        },
        AchievementDef {
            id: "battery_saver".to_string(),
            title: "Guardian de Energía".to_string(),
            description: "Recicla 10 baterías.".to_string(),
            max: 10,
            reward_points: 100,
            category: AchievementCategory::Weekly,
            tracks: ProgressSource::Category(CategoryId::Baterias),
        },
        AchievementDef {
            id: "recycle_master".to_string(),
            title: "Reciclador Experto".to_string(),
            description: "Completa 20 depósitos exitosos.".to_string(),
            max: 20,
            reward_points: 1000,
            category: AchievementCategory::Monthly,
            tracks: ProgressSource::Deposits,
        },
    ]
}

fn default_coupons() -> Vec<Coupon> {
    vec![
        Coupon::new("c1", "Botella reutilizable", 1250, "Producto"),
        Coupon::new("c2", "Audífonos Bluetooth", 2500, "Producto"),
        Coupon::new("c3", "20% Dscto Café", 500, "Descuento"),
        Coupon::new("c4", "Gift Card $5.000", 5000, "Gift Card"),
        Coupon::new("c5", "Donación Reforestemos", 1000, "Donación"),
        Coupon::new("c6", "Gift Card $10.000", 9500, "Gift Card"),
    ]
}

fn default_perks() -> Vec<Perk> {
    vec![
        Perk {
            id: "eco_seed".to_string(),
            title: "Eco-Semilla".to_string(),
            requirement: PerkRequirement::ItemsThisMonth(5),
        },
        Perk {
            id: "circuit_hunter".to_string(),
            title: "Cazador de Circuitos".to_string(),
            requirement: PerkRequirement::AnyOf(vec![
                CounterThreshold {
                    counter: Counter::Computers,
                    min: 1,
                },
                CounterThreshold {
                    counter: Counter::Phones,
                    min: 2,
                },
            ]),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rules_are_valid() {
        assert_eq!(Rules::default().validate(), Ok(()));
    }

    #[test]
    fn test_validate_rejects_duplicates_and_bad_tiers() {
        let mut rules = Rules::default();
        rules.categories.push(ItemCategory::new(CategoryId::Cables, "Cables", 1));
        assert_eq!(
            rules.validate(),
            Err(RulesError::DuplicateCategory(CategoryId::Cables))
        );

        let mut rules = Rules::default();
        rules.achievements[1].max = 0;
        assert_eq!(
            rules.validate(),
            Err(RulesError::ZeroMax("phone_expert".to_string()))
        );

        let mut rules = Rules::default();
        rules.multipliers.push(MultiplierTier {
            min_items: 20,
            multiplier: 1.2,
        });
        assert_eq!(rules.validate(), Err(RulesError::NonMonotonicMultipliers));

        let mut rules = Rules::default();
        rules.multipliers[0].multiplier = 0.5;
        assert!(matches!(
            rules.validate(),
            Err(RulesError::InvalidMultiplier { .. })
        ));
    }

    #[test]
    fn test_demo_user_is_normalized() {
        let rules = Rules::default();
        let demo = rules.demo_user();
        assert_eq!(demo.items_this_month, 4);
        assert_eq!(demo.active_multiplier, 1.0);
        assert_eq!(demo.level, Level::Descubridor);
        assert_eq!(demo.completed_achievements(), 1);
        assert_eq!(demo.history.len(), 1);
    }

    #[test]
    fn test_normalize_recomputes_derived_fields() {
        let rules = Rules::default();
        let mut user = rules.new_guest();
        user.points = 1200;
        user.items_this_month = 12;
        user.level = Level::Reactivador;
        for ach in user.achievements.iter_mut().take(2) {
            ach.progress = ach.max;
        }

        rules.normalize(&mut user);
        assert_eq!(user.level, Level::Ensamblador);
        assert_eq!(user.active_multiplier, 2.0);
        assert_eq!(user.completed_achievements(), 2);
    }
}
