//! SQLite-backed progression store
//!
//! Records are stored as JSON text alongside a few denormalized columns used
//! for listing.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use rusqlite::{Connection, OptionalExtension};

use super::{validate_id, ProgressionStore};
use crate::domain::UserProgression;

/// SQL schema for the progression database
const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY
);

-- One row per user, record holds the full JSON progression
CREATE TABLE IF NOT EXISTS progressions (
    id TEXT PRIMARY KEY,
    record TEXT NOT NULL,
    points INTEGER NOT NULL DEFAULT 0,
    level TEXT NOT NULL DEFAULT 'Descubridor',
    updated_at INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_progressions_points ON progressions(points);

INSERT OR IGNORE INTO schema_version VALUES (1);
"#;

#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open or create the database at `path`
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create data dir: {}", parent.display()))?;
        }

        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open progression db: {}", path.display()))?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;

        Self::with_connection(conn)
    }

    /// Private in-memory database
    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA_SQL)
            .context("Failed to initialize progression schema")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow!("Progression DB lock poisoned"))
    }

    pub fn schema_version(&self) -> Result<i32> {
        let conn = self.conn()?;
        let version = conn.query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_version",
            [],
            |r| r.get(0),
        )?;
        Ok(version)
    }
}

impl ProgressionStore for SqliteStore {
    fn load(&self, id: &str) -> Result<Option<UserProgression>> {
        let conn = self.conn()?;
        let record: Option<String> = conn
            .query_row(
                "SELECT record FROM progressions WHERE id = ?1",
                [id],
                |r| r.get(0),
            )
            .optional()?;
        drop(conn);

        record
            .map(|json| {
                serde_json::from_str(&json)
                    .with_context(|| format!("Corrupt progression record for '{}'", id))
            })
            .transpose()
    }

    fn save(&self, user: &UserProgression) -> Result<()> {
        validate_id(&user.id)?;
        let record = serde_json::to_string(user).context("Failed to serialize progression")?;
        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO progressions (id, record, points, level, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(id) DO UPDATE SET
                record = ?2, points = ?3, level = ?4, updated_at = ?5
            "#,
            rusqlite::params![
                user.id,
                record,
                user.points as i64,
                user.level.as_str(),
                Utc::now().timestamp_millis(),
            ],
        )?;
        Ok(())
    }

    fn list_ids(&self) -> Result<Vec<String>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT id FROM progressions ORDER BY id")?;
        let ids = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rewards::Rules;
    use tempfile::tempdir;

    #[test]
    fn test_sqlite_store_roundtrip() {
        let dir = tempdir().unwrap();
        let store = SqliteStore::open(&dir.path().join("p.db")).unwrap();
        assert_eq!(store.schema_version().unwrap(), 1);
        assert!(store.load("user_123").unwrap().is_none());

        let mut demo = Rules::default().demo_user();
        store.save(&demo).unwrap();
        assert_eq!(store.load("user_123").unwrap(), Some(demo.clone()));

        demo.points = 700;
        store.save(&demo).unwrap();
        assert_eq!(store.load("user_123").unwrap().unwrap().points, 700);
        assert_eq!(store.list_ids().unwrap(), vec!["user_123".to_string()]);
    }

    #[test]
    fn test_sqlite_store_rejects_bad_id() {
        let store = SqliteStore::open_in_memory().unwrap();
        let user = UserProgression::new("no/slashes", Vec::new());
        assert!(store.save(&user).is_err());
    }
}
