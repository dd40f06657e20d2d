//! JSON file progression store: one `<id>.json` per user

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::{validate_id, ProgressionStore};
use crate::config::write_locked;
use crate::domain::UserProgression;

pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Use `dir` for user records, creating it if needed
    pub fn open(dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create store dir: {}", dir.display()))?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    fn record_path(&self, id: &str) -> Result<PathBuf> {
        validate_id(id)?;
        Ok(self.dir.join(format!("{}.json", id)))
    }
}

impl ProgressionStore for JsonFileStore {
    fn load(&self, id: &str) -> Result<Option<UserProgression>> {
        let path = self.record_path(id)?;
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read progression: {}", path.display()))?;
        let user = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse progression: {}", path.display()))?;
        Ok(Some(user))
    }

    /// Locked, atomic replacement (temp file + rename)
    fn save(&self, user: &UserProgression) -> Result<()> {
        let path = self.record_path(&user.id)?;
        let content =
            serde_json::to_string_pretty(user).context("Failed to serialize progression")?;

        write_locked(&path, &content)
    }

    fn list_ids(&self) -> Result<Vec<String>> {
        let mut ids = Vec::new();
        for entry in std::fs::read_dir(&self.dir)
            .with_context(|| format!("Failed to list store dir: {}", self.dir.display()))?
        {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                ids.push(stem.to_string());
            }
        }
        ids.sort();
        Ok(ids)
    }
}
