use serde::{Deserialize, Serialize};

/// Progression rank, ordered from lowest to highest
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Level {
    #[default]
    Descubridor,
    Ensamblador,
    Recolector,
    Reactivador,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Descubridor => "Descubridor",
            Self::Ensamblador => "Ensamblador",
            Self::Recolector => "Recolector",
            Self::Reactivador => "Reactivador",
        }
    }

    /// Multiplier tiers are shown as locked to users still at the entry level
    pub fn multipliers_locked(&self) -> bool {
        *self == Self::Descubridor
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One row of the level table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelThreshold {
    pub level: Level,
    pub min_points: u64,
    pub min_achievements: usize,
}
