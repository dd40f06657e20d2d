//! Core domain types for E-Cycle

mod achievement;
mod category;
mod deposit;
mod level;
mod progression;
mod transaction;

pub use achievement::{Achievement, AchievementCategory, AchievementDef, ProgressSource};
pub use category::{CategoryId, ItemCategory};
pub use deposit::{Deposit, DepositParseError};
pub use level::{Level, LevelThreshold};
pub use progression::{Impact, UserProgression};
pub use transaction::{Transaction, TransactionKind};
