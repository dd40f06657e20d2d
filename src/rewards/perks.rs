//! Perks: cosmetic unlockables gated by lifetime recycling counters

use serde::{Deserialize, Serialize};

use crate::domain::UserProgression;

/// Lifetime counter a perk can be gated on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Counter {
    Phones,
    Computers,
    Batteries,
    CablesKg,
}

impl Counter {
    fn read(&self, user: &UserProgression) -> u64 {
        match self {
            Self::Phones => user.phones_recycled,
            Self::Computers => user.computers_recycled,
            Self::Batteries => user.batteries_recycled,
            Self::CablesKg => user.cables_recycled_kg,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CounterThreshold {
    pub counter: Counter,
    pub min: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PerkRequirement {
    /// Items deposited in the current period
    ItemsThisMonth(u64),
    /// Any one of the listed counters reaching its minimum
    AnyOf(Vec<CounterThreshold>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Perk {
    pub id: String,
    pub title: String,
    pub requirement: PerkRequirement,
}

impl Perk {
    pub fn is_unlocked(&self, user: &UserProgression) -> bool {
        match &self.requirement {
            PerkRequirement::ItemsThisMonth(min) => user.items_this_month >= *min,
            PerkRequirement::AnyOf(thresholds) => {
                thresholds.iter().any(|t| t.counter.read(user) >= t.min)
            }
        }
    }
}

/// Perks from `catalog` that `user` has unlocked
pub fn unlocked_perks<'a>(catalog: &'a [Perk], user: &UserProgression) -> Vec<&'a Perk> {
    catalog.iter().filter(|p| p.is_unlocked(user)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rewards::Rules;

    #[test]
    fn test_circuit_hunter_needs_computer_or_two_phones() {
        let rules = Rules::default();
        let mut user = UserProgression::new("u", Vec::new());
        assert!(unlocked_perks(&rules.perks, &user).is_empty());

        user.phones_recycled = 2;
        let ids: Vec<_> = unlocked_perks(&rules.perks, &user)
            .iter()
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(ids, vec!["circuit_hunter"]);

        user.phones_recycled = 0;
        user.computers_recycled = 1;
        assert_eq!(unlocked_perks(&rules.perks, &user).len(), 1);
    }

    #[test]
    fn test_eco_seed_uses_monthly_items() {
        let rules = Rules::default();
        let mut user = UserProgression::new("u", Vec::new());
        user.items_this_month = 5;
        let unlocked = unlocked_perks(&rules.perks, &user);
        assert!(unlocked.iter().any(|p| p.id == "eco_seed"));
    }
}
