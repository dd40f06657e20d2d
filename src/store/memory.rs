use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::{anyhow, Result};

use super::ProgressionStore;
use crate::domain::UserProgression;

/// Non-persistent store
#[derive(Default)]
pub struct MemoryStore {
    users: Mutex<HashMap<String, UserProgression>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProgressionStore for MemoryStore {
    fn load(&self, id: &str) -> Result<Option<UserProgression>> {
        let users = self.users.lock().map_err(|_| anyhow!("Store lock poisoned"))?;
        Ok(users.get(id).cloned())
    }

    fn save(&self, user: &UserProgression) -> Result<()> {
        let mut users = self.users.lock().map_err(|_| anyhow!("Store lock poisoned"))?;
        users.insert(user.id.clone(), user.clone());
        Ok(())
    }

    fn list_ids(&self) -> Result<Vec<String>> {
        let users = self.users.lock().map_err(|_| anyhow!("Store lock poisoned"))?;
        let mut ids: Vec<_> = users.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }
}
