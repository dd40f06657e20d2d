//! Deposit input: a batch of reported item counts
//!
//! String-keyed counts from the outside world are validated here. Unknown
//! category ids are dropped; malformed counts are rejected.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::category::CategoryId;

/// Error type for deposit parsing
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DepositParseError {
    #[error("Expected category=count, got '{0}'")]
    MissingSeparator(String),

    #[error("Invalid count for {category}: '{value}'")]
    InvalidCount { category: String, value: String },
}

/// Item counts reported in one drop-off
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deposit {
    items: BTreeMap<CategoryId, u32>,
}

impl Deposit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add units for a category (accumulates if the category repeats)
    pub fn with(mut self, category: CategoryId, count: u32) -> Self {
        self.add(category, count);
        self
    }

    pub fn add(&mut self, category: CategoryId, count: u32) {
        let entry = self.items.entry(category).or_insert(0);
        *entry = entry.saturating_add(count);
    }

    /// Build from string-keyed counts, ignoring unknown categories
    pub fn from_raw(raw: &HashMap<String, u32>) -> Self {
        let mut deposit = Self::new();
        for (key, count) in raw {
            match CategoryId::parse(key) {
                Some(category) => deposit.add(category, *count),
                None => debug!("Ignoring unknown category '{}' in deposit", key),
            }
        }
        deposit
    }

    /// Parse `category=count` pairs, e.g. `["celulares=2", "cables=1"]`
    pub fn parse_pairs<S: AsRef<str>>(pairs: &[S]) -> Result<Self, DepositParseError> {
        let mut deposit = Self::new();
        for pair in pairs {
            let pair = pair.as_ref();
            let (key, value) = pair
                .split_once('=')
                .ok_or_else(|| DepositParseError::MissingSeparator(pair.to_string()))?;
            let count: u32 =
                value
                    .trim()
                    .parse()
                    .map_err(|_| DepositParseError::InvalidCount {
                        category: key.trim().to_string(),
                        value: value.trim().to_string(),
                    })?;
            match CategoryId::parse(key) {
                Some(category) => deposit.add(category, count),
                None => debug!("Ignoring unknown category '{}' in deposit", key.trim()),
            }
        }
        Ok(deposit)
    }

    /// Units reported for one category (0 if absent)
    pub fn count(&self, category: CategoryId) -> u32 {
        self.items.get(&category).copied().unwrap_or(0)
    }

    /// Non-zero entries in category order
    pub fn iter(&self) -> impl Iterator<Item = (CategoryId, u32)> + '_ {
        self.items
            .iter()
            .filter(|(_, count)| **count > 0)
            .map(|(category, count)| (*category, *count))
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }
}
