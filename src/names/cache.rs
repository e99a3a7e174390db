// OneHand Name Cache
// Copyright (c) 2026 Xing_The_Creator | OneHand
//
// SQLite table of LLM answers keyed by normalized name, so each name costs
// at most one model call.

use std::path::Path;
use std::sync::Mutex;

use anyhow::{anyhow, Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{info, warn};

use super::profile::NameProfile;

pub struct NameCache {
    conn: Mutex<Connection>,
}

impl NameCache {
    /// Open (or create) the cache database and make sure the table exists.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create cache folder {:?}", parent))?;
        }
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open name cache at {:?}", path))?;
        Self::from_connection(conn)
    }

    pub fn in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS names (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE,
                data TEXT NOT NULL,
                timestamp DATETIME DEFAULT CURRENT_TIMESTAMP
            );",
        )
        .context("Failed to set up the names table")?;
        info!("[CACHE] Table 'names' is set up");

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Cached profile for `name`. Rows that no longer parse count as misses.
    pub fn get(&self, name: &str) -> Result<Option<NameProfile>> {
        let conn = self.conn.lock().map_err(|_| anyhow!("name cache lock poisoned"))?;
        let data: Option<String> = conn
            .query_row("SELECT data FROM names WHERE name = ?1", params![name], |row| row.get(0))
            .optional()?;

        let Some(data) = data else {
            return Ok(None);
        };

        match serde_json::from_str(&data) {
            Ok(profile) => {
                info!("[CACHE] Found cached data for '{}'", name);
                Ok(Some(profile))
            }
            Err(e) => {
                warn!("[CACHE] Ignoring corrupt entry for '{}': {}", name, e);
                Ok(None)
            }
        }
    }

    /// Insert or replace the entry for `name`.
    pub fn put(&self, name: &str, profile: &NameProfile) -> Result<()> {
        let data = serde_json::to_string(profile)?;
        let conn = self.conn.lock().map_err(|_| anyhow!("name cache lock poisoned"))?;
        conn.execute(
            "INSERT OR REPLACE INTO names (name, data) VALUES (?1, ?2)",
            params![name, data],
        )?;
        info!("[CACHE] Cached data for '{}'", name);
        Ok(())
    }

    pub fn len(&self) -> Result<usize> {
        let conn = self.conn.lock().map_err(|_| anyhow!("name cache lock poisoned"))?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM names", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(meaning: &str) -> NameProfile {
        NameProfile {
            name: Some("Gabriela".to_string()),
            meaning: Some(meaning.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_get_missing_name() {
        let cache = NameCache::in_memory().unwrap();
        assert_eq!(cache.get("Nobody").unwrap(), None);
        assert!(cache.is_empty().unwrap());
    }

    #[test]
    fn test_put_replaces_existing_entry() {
        let cache = NameCache::in_memory().unwrap();
        cache.put("Gabriela", &profile("God is my strength")).unwrap();
        cache.put("Gabriela", &profile("heroine")).unwrap();

        assert_eq!(cache.len().unwrap(), 1);
        let cached = cache.get("Gabriela").unwrap().unwrap();
        assert_eq!(cached.meaning.as_deref(), Some("heroine"));
    }

    #[test]
    fn test_corrupt_row_is_a_miss() {
        let cache = NameCache::in_memory().unwrap();
        {
            let conn = cache.conn.lock().unwrap();
            conn.execute(
                "INSERT INTO names (name, data) VALUES ('Broken', 'not json')",
                [],
            )
            .unwrap();
        }
        assert_eq!(cache.get("Broken").unwrap(), None);
    }

    #[test]
    fn test_cache_persists_on_disk() {
        let tmp = tempfile::tempdir().unwrap();
        let db = tmp.path().join("data").join("name_cache.db");

        NameCache::open(&db).unwrap().put("Gabriela", &profile("strength")).unwrap();

        let reopened = NameCache::open(&db).unwrap();
        assert!(reopened.get("Gabriela").unwrap().is_some());
    }
}
