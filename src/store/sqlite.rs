use rusqlite::{params, OptionalExtension};

use crate::db::DbPool;

use super::Storage;

/// SQLite-backed implementation of the Storage trait.
/// Wraps an r2d2 connection pool over the `storage` table.
pub struct SqliteStorage {
    pub pool: DbPool,
}

impl SqliteStorage {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Open (or create) the database at `path` and apply migrations.
    pub fn open(path: &str) -> Result<Self, String> {
        let pool = crate::db::init_pool_at(path).map_err(|e| e.to_string())?;
        crate::db::run_migrations(&pool).map_err(|e| e.to_string())?;
        Ok(Self { pool })
    }
}

impl Storage for SqliteStorage {
    fn get(&self, key: &str) -> Option<String> {
        let conn = match self.pool.get() {
            Ok(c) => c,
            Err(e) => {
                log::warn!("storage: no connection for get({}): {}", key, e);
                return None;
            }
        };
        conn.query_row(
            "SELECT value FROM storage WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )
        .optional()
        .unwrap_or_else(|e| {
            log::warn!("storage: get({}) failed: {}", key, e);
            None
        })
    }

    fn set(&self, key: &str, value: &str) -> Result<(), String> {
        let conn = self.pool.get().map_err(|e| e.to_string())?;
        conn.execute(
            "INSERT INTO storage (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = ?2, updated_at = CURRENT_TIMESTAMP",
            params![key, value],
        )
        .map_err(|e| e.to_string())?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), String> {
        let conn = self.pool.get().map_err(|e| e.to_string())?;
        conn.execute("DELETE FROM storage WHERE key = ?1", params![key])
            .map_err(|e| e.to_string())?;
        Ok(())
    }
}
