//! Progression storage
//!
//! One JSON-shaped record per user, replaced atomically on every save.
//!
//! ```text
//! RewardsService ──load/save──► ProgressionStore
//!                                  ├── SqliteStore   (~/.ecycle/progressions.db)
//!                                  ├── JsonFileStore (~/.ecycle/users/<id>.json)
//!                                  └── MemoryStore   (tests, throwaway sessions)
//! ```

mod db;
mod file;
mod memory;

pub use db::SqliteStore;
pub use file::JsonFileStore;
pub use memory::MemoryStore;

use anyhow::Result;

use crate::config::{StoreBackend, StoreSettings};
use crate::domain::UserProgression;

/// Repository for user progressions
pub trait ProgressionStore: Send + Sync {
    /// Load a user's record as stored (not normalized)
    fn load(&self, id: &str) -> Result<Option<UserProgression>>;

    /// Replace a user's record
    fn save(&self, user: &UserProgression) -> Result<()>;

    /// All stored user ids, sorted
    fn list_ids(&self) -> Result<Vec<String>>;
}

/// Open the store selected in settings
pub fn open_store(settings: &StoreSettings) -> Result<Box<dyn ProgressionStore>> {
    let data_dir = settings.resolved_data_dir();
    let store: Box<dyn ProgressionStore> = match settings.backend {
        StoreBackend::Sqlite => Box::new(SqliteStore::open(&data_dir.join("progressions.db"))?),
        StoreBackend::Json => Box::new(JsonFileStore::open(&data_dir.join("users"))?),
        StoreBackend::Memory => Box::new(MemoryStore::new()),
    };
    tracing::debug!("Opened {:?} progression store in {}", settings.backend, data_dir.display());
    Ok(store)
}

/// Reject ids that could escape a storage directory or break file names
pub(crate) fn validate_id(id: &str) -> Result<()> {
    let valid = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        anyhow::bail!("Invalid user id: '{}'", id)
    }
}
