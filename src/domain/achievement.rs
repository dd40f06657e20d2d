use serde::{Deserialize, Serialize};

use super::category::CategoryId;

/// Achievement period, used for grouping and filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AchievementCategory {
    #[serde(alias = "diaria")]
    Daily,
    #[serde(alias = "semanal")]
    Weekly,
    #[serde(alias = "mensual")]
    Monthly,
    #[serde(alias = "unica")]
    OneTime,
}

impl AchievementCategory {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Daily => "Daily",
            Self::Weekly => "Weekly",
            Self::Monthly => "Monthly",
            Self::OneTime => "One-time",
        }
    }
}

/// What advances an achievement's progress during a deposit
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressSource {
    /// Units reported for one category
    Category(CategoryId),
    /// One step per non-empty deposit
    Deposits,
    /// Total units across all categories
    Items,
    /// Not advanced by deposits; only seeded or restored records move it
    #[default]
    Manual,
}

/// Catalog entry for an achievement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AchievementDef {
    pub id: String,
    pub title: String,
    pub description: String,
    pub max: u32,
    pub reward_points: u64,
    pub category: AchievementCategory,
    #[serde(default)]
    pub tracks: ProgressSource,
}

impl AchievementDef {
    /// Fresh, zero-progress record for a new user
    pub fn to_achievement(&self) -> Achievement {
        Achievement {
            id: self.id.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            progress: 0,
            max: self.max,
            completed: false,
            reward_points: self.reward_points,
            category: self.category,
        }
    }
}

/// An achievement as held in a user's progression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Achievement {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub progress: u32,
    pub max: u32,
    #[serde(default)]
    pub completed: bool,
    #[serde(default, alias = "reward")]
    pub reward_points: u64,
    pub category: AchievementCategory,
}

impl Achievement {
    /// Add progress and recompute the completion flag.
    /// Returns true if this call completed the achievement.
    pub fn advance(&mut self, amount: u32) -> bool {
        let was_completed = self.completed;
        self.progress = self.progress.saturating_add(amount);
        self.refresh_completed();
        self.completed && !was_completed
    }

    pub fn refresh_completed(&mut self) {
        self.completed = self.progress >= self.max;
    }
}
