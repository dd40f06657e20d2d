//! Level and multiplier resolution
//!
//! Both are step functions over static tables from [`Rules`](super::Rules).

use serde::{Deserialize, Serialize};

use crate::domain::{Level, LevelThreshold};

/// Multiplier unlocked once `min_items` have been deposited this period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiplierTier {
    pub min_items: u64,
    pub multiplier: f64,
}

/// Highest level whose point and achievement minimums are both met.
/// Falls back to the entry level when nothing matches.
pub fn resolve_level(thresholds: &[LevelThreshold], points: u64, completed: usize) -> Level {
    thresholds
        .iter()
        .filter(|t| points >= t.min_points && completed >= t.min_achievements)
        .map(|t| t.level)
        .max()
        .unwrap_or_default()
}

/// Multiplier of the highest tier reached by `items_this_month`, 1x if none
pub fn resolve_multiplier(tiers: &[MultiplierTier], items_this_month: u64) -> f64 {
    tiers
        .iter()
        .filter(|t| items_this_month >= t.min_items)
        .max_by_key(|t| t.min_items)
        .map(|t| t.multiplier)
        .unwrap_or(1.0)
}

/// The next level above `current`, if any
pub fn next_level(thresholds: &[LevelThreshold], current: Level) -> Option<&LevelThreshold> {
    thresholds
        .iter()
        .filter(|t| t.level > current)
        .min_by_key(|t| t.level)
}

/// Items still needed to reach the next multiplier tier (None if at the top)
pub fn items_to_next_tier(tiers: &[MultiplierTier], items_this_month: u64) -> Option<u64> {
    tiers
        .iter()
        .filter(|t| t.min_items > items_this_month)
        .map(|t| t.min_items - items_this_month)
        .min()
}

/// Progress toward the next level, for display
#[derive(Debug, Clone, PartialEq)]
pub struct LevelProgress {
    pub current: Level,
    pub next: Option<Level>,
    pub points_needed: u64,
    pub achievements_needed: usize,
}

impl LevelProgress {
    pub fn new(thresholds: &[LevelThreshold], points: u64, completed: usize) -> Self {
        let current = resolve_level(thresholds, points, completed);
        match next_level(thresholds, current) {
            Some(next) => Self {
                current,
                next: Some(next.level),
                points_needed: next.min_points.saturating_sub(points),
                achievements_needed: next.min_achievements.saturating_sub(completed),
            },
            None => Self {
                current,
                next: None,
                points_needed: 0,
                achievements_needed: 0,
            },
        }
    }

    pub fn is_max_level(&self) -> bool {
        self.next.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rewards::Rules;

    #[test]
    fn test_resolve_level_needs_both_minimums() {
        let rules = Rules::default();
        let levels = &rules.levels;
        assert_eq!(resolve_level(levels, 0, 0), Level::Descubridor);
        assert_eq!(resolve_level(levels, 999, 4), Level::Descubridor);
        assert_eq!(resolve_level(levels, 1000, 1), Level::Descubridor);
        assert_eq!(resolve_level(levels, 1000, 2), Level::Ensamblador);
        assert_eq!(resolve_level(levels, 4999, 4), Level::Recolector);
        assert_eq!(resolve_level(levels, 5000, 4), Level::Reactivador);
        assert_eq!(resolve_level(levels, 90000, 3), Level::Recolector);
    }

    #[test]
    fn test_resolve_level_empty_table_falls_back() {
        assert_eq!(resolve_level(&[], 10_000, 10), Level::Descubridor);
    }

    #[test]
    fn test_resolve_multiplier_tiers() {
        let rules = Rules::default();
        let tiers = &rules.multipliers;
        assert_eq!(resolve_multiplier(tiers, 0), 1.0);
        assert_eq!(resolve_multiplier(tiers, 4), 1.0);
        assert_eq!(resolve_multiplier(tiers, 5), 1.5);
        assert_eq!(resolve_multiplier(tiers, 9), 1.5);
        assert_eq!(resolve_multiplier(tiers, 10), 2.0);
        assert_eq!(resolve_multiplier(tiers, 500), 2.0);
        assert_eq!(resolve_multiplier(&[], 500), 1.0);
    }

    #[test]
    fn test_multiplier_is_monotonic() {
        let rules = Rules::default();
        let mut previous = 0.0;
        for items in 0..50 {
            let m = resolve_multiplier(&rules.multipliers, items);
            assert!(m >= previous, "multiplier dropped at {items}");
            previous = m;
        }
    }

    #[test]
    fn test_level_is_monotonic() {
        let rules = Rules::default();
        for points in (0..6000).step_by(250) {
            for completed in 0..5 {
                let base = resolve_level(&rules.levels, points, completed);
                assert!(resolve_level(&rules.levels, points + 250, completed) >= base);
                assert!(resolve_level(&rules.levels, points, completed + 1) >= base);
            }
        }
    }

    #[test]
    fn test_level_progress() {
        let rules = Rules::default();
        let progress = LevelProgress::new(&rules.levels, 750, 1);
        assert_eq!(progress.current, Level::Descubridor);
        assert_eq!(progress.next, Some(Level::Ensamblador));
        assert_eq!(progress.points_needed, 250);
        assert_eq!(progress.achievements_needed, 1);

        let top = LevelProgress::new(&rules.levels, 6000, 4);
        assert!(top.is_max_level());
    }

    #[test]
    fn test_items_to_next_tier() {
        let rules = Rules::default();
        assert_eq!(items_to_next_tier(&rules.multipliers, 4), Some(1));
        assert_eq!(items_to_next_tier(&rules.multipliers, 5), Some(5));
        assert_eq!(items_to_next_tier(&rules.multipliers, 10), None);
    }
}
