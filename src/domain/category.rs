use serde::{Deserialize, Serialize};

/// Kind of e-waste accepted at drop-off points
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryId {
    /// Mobile phones
    Celulares,
    /// Batteries of any size
    Baterias,
    /// Laptops and other computers
    Laptops,
    /// Cables, counted as one kilogram per unit
    Cables,
}

impl CategoryId {
    /// Get the string ID used in storage and on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Celulares => "celulares",
            Self::Baterias => "baterias",
            Self::Laptops => "laptops",
            Self::Cables => "cables",
        }
    }

    /// Parse from a string ID, `None` for anything outside the closed set
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "celulares" => Some(Self::Celulares),
            "baterias" => Some(Self::Baterias),
            "laptops" => Some(Self::Laptops),
            "cables" => Some(Self::Cables),
            _ => None,
        }
    }

    pub fn all() -> &'static [CategoryId] {
        &[Self::Celulares, Self::Baterias, Self::Laptops, Self::Cables]
    }
}

impl std::fmt::Display for CategoryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Point rate for one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemCategory {
    pub id: CategoryId,
    pub label: String,
    pub points_per_unit: u64,
}

impl ItemCategory {
    pub fn new(id: CategoryId, label: &str, points_per_unit: u64) -> Self {
        Self {
            id,
            label: label.to_string(),
            points_per_unit,
        }
    }
}
