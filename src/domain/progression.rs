use serde::{Deserialize, Serialize};

use super::achievement::Achievement;
use super::level::Level;
use super::transaction::Transaction;

fn default_multiplier() -> f64 {
    1.0
}

/// Estimated environmental impact of everything a user has recycled
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Impact {
    #[serde(default, alias = "co2")]
    pub co2_kg: f64,
    #[serde(default)]
    pub trees: u64,
}

/// A user's rewards state. Persisted as one JSON record per user.
///
/// Every field except `id` has a serde default so records written by older
/// versions load cleanly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProgression {
    #[serde(alias = "uid")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub points: u64,
    #[serde(default)]
    pub level: Level,
    #[serde(default)]
    pub items_this_month: u64,
    #[serde(default = "default_multiplier")]
    pub active_multiplier: f64,
    #[serde(default)]
    pub phones_recycled: u64,
    #[serde(default)]
    pub computers_recycled: u64,
    #[serde(default)]
    pub batteries_recycled: u64,
    #[serde(default)]
    pub cables_recycled_kg: u64,
    #[serde(default)]
    pub impact: Impact,
    /// Newest first
    #[serde(default)]
    pub history: Vec<Transaction>,
    #[serde(default)]
    pub achievements: Vec<Achievement>,
}

impl UserProgression {
    /// Zeroed progression with the given starting achievements
    pub fn new(id: impl Into<String>, achievements: Vec<Achievement>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            email: String::new(),
            points: 0,
            level: Level::Descubridor,
            items_this_month: 0,
            active_multiplier: 1.0,
            phones_recycled: 0,
            computers_recycled: 0,
            batteries_recycled: 0,
            cables_recycled_kg: 0,
            impact: Impact::default(),
            history: Vec::new(),
            achievements,
        }
    }

    /// Anonymous session user
    pub fn guest(achievements: Vec<Achievement>) -> Self {
        let mut user = Self::new("guest", achievements);
        user.name = "Invitado".to_string();
        user
    }

    /// Newly registered user with a fresh unique id
    pub fn register(name: &str, email: &str, achievements: Vec<Achievement>) -> Self {
        let mut user = Self::new(format!("user-{}", uuid::Uuid::new_v4()), achievements);
        user.name = name.to_string();
        user.email = email.to_string();
        user
    }

    pub fn completed_achievements(&self) -> usize {
        self.achievements.iter().filter(|a| a.completed).count()
    }

    pub fn achievement(&self, id: &str) -> Option<&Achievement> {
        self.achievements.iter().find(|a| a.id == id)
    }
}
