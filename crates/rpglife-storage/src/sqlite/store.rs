//! [`SqliteStore`] -- SQLite-backed storage implementation.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::{Connection, params};
use tracing::{debug, info};

use rpglife_core::achievement::DEFAULT_ACHIEVEMENTS;

use crate::error::{Result, StorageError};
use crate::sqlite::schema;

/// SQLite-backed implementation of the [`Storage`](crate::traits::Storage) trait.
///
/// Wraps a [`rusqlite::Connection`] in a `Mutex` for thread safety. All
/// public methods acquire the lock, execute SQL, and release it.
pub struct SqliteStore {
    pub(crate) conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Opens (or creates) a SQLite database at the given path.
    ///
    /// Enables WAL mode and foreign keys, then initialises the schema and
    /// seeds the default catalog.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!(?path, "opening SQLite database");

        let conn = Connection::open(path).map_err(|e| {
            StorageError::Connection(format!("failed to open {}: {e}", path.display()))
        })?;

        Self::from_connection(conn)
    }

    /// Opens an in-memory SQLite database (useful for tests).
    pub fn open_in_memory() -> Result<Self> {
        debug!("opening in-memory SQLite database");
        let conn = Connection::open_in_memory()
            .map_err(|e| StorageError::Connection(format!("failed to open in-memory db: {e}")))?;

        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.configure_connection()?;
        store.init_schema()?;
        store.seed_catalog()?;
        Ok(store)
    }

    /// Sets connection pragmas (WAL mode, foreign keys, busy timeout).
    fn configure_connection(&self) -> Result<()> {
        let conn = self.lock_conn()?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA foreign_keys = ON;
             PRAGMA busy_timeout = 5000;",
        )
        .map_err(|e| StorageError::Connection(format!("failed to set pragmas: {e}")))?;

        Ok(())
    }

    /// Creates all tables and indexes if they do not exist, then records the
    /// schema version.
    fn init_schema(&self) -> Result<()> {
        let conn = self.lock_conn()?;

        let version: std::result::Result<i32, _> = conn.query_row(
            "SELECT value FROM metadata WHERE key = 'schema_version'",
            [],
            |row| {
                let v: String = row.get(0)?;
                Ok(v.parse::<i32>().unwrap_or(0))
            },
        );
        if let Ok(v) = version {
            if v >= schema::CURRENT_SCHEMA_VERSION {
                debug!(version = v, "schema already at current version, skipping init");
                return Ok(());
            }
        }

        for stmt in schema::SCHEMA_STATEMENTS {
            conn.execute_batch(stmt).map_err(|e| StorageError::Migration {
                name: "init_schema".into(),
                reason: format!("{e}\nStatement: {}", truncate(stmt, 120)),
            })?;
        }

        conn.execute(
            "INSERT OR REPLACE INTO metadata (key, value) VALUES ('schema_version', ?1)",
            params![schema::CURRENT_SCHEMA_VERSION.to_string()],
        )
        .map_err(|e| StorageError::Migration {
            name: "schema_version".into(),
            reason: e.to_string(),
        })?;

        info!("schema initialized (version {})", schema::CURRENT_SCHEMA_VERSION);
        Ok(())
    }

    /// Inserts the default categories and the achievement catalog.
    ///
    /// Safe to run on every open: categories are matched by name among the
    /// shared defaults and achievements by their unique name.
    fn seed_catalog(&self) -> Result<()> {
        let conn = self.lock_conn()?;
        let seed_err = |e: rusqlite::Error| StorageError::Migration {
            name: "seed_catalog".into(),
            reason: e.to_string(),
        };

        for &(name, icon, color) in schema::DEFAULT_CATEGORIES {
            conn.execute(
                "INSERT INTO categories (user_id, name, icon, color, is_default)
                 SELECT NULL, ?1, ?2, ?3, 1
                 WHERE NOT EXISTS (
                     SELECT 1 FROM categories WHERE is_default = 1 AND name = ?1
                 )",
                params![name, icon, color],
            )
            .map_err(seed_err)?;
        }

        let mut inserted = 0;
        for def in DEFAULT_ACHIEVEMENTS {
            inserted += conn
                .execute(
                    "INSERT OR IGNORE INTO achievements
                        (name, description, achievement_group, icon,
                         requirement_type, requirement_value)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                    params![
                        def.name,
                        def.description,
                        def.group.as_str(),
                        def.icon,
                        def.requirement.as_str(),
                        def.threshold,
                    ],
                )
                .map_err(seed_err)?;
        }
        if inserted > 0 {
            debug!(inserted, "seeded achievements");
        }
        Ok(())
    }

    /// Acquires the connection lock. Helper used by all operation modules.
    pub(crate) fn lock_conn(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| StorageError::Connection(format!("mutex poisoned: {e}")))
    }
}

impl std::fmt::Debug for SqliteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStore").finish_non_exhaustive()
    }
}

/// Truncates a string for error messages.
fn truncate(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(store: &SqliteStore, sql: &str) -> i64 {
        let conn = store.lock_conn().unwrap();
        conn.query_row(sql, [], |row| row.get(0)).unwrap()
    }

    #[test]
    fn open_in_memory_seeds_catalog() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert_eq!(count(&store, "SELECT COUNT(*) FROM categories WHERE is_default = 1"), 6);
        assert_eq!(count(&store, "SELECT COUNT(*) FROM achievements"), 14);
    }

    #[test]
    fn reopening_does_not_duplicate_seed_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rpg.db");

        drop(SqliteStore::open(&path).unwrap());
        let store = SqliteStore::open(&path).unwrap();

        assert_eq!(count(&store, "SELECT COUNT(*) FROM categories"), 6);
        assert_eq!(count(&store, "SELECT COUNT(*) FROM achievements"), 14);
    }

    #[test]
    fn schema_version_recorded() {
        let store = SqliteStore::open_in_memory().unwrap();
        let conn = store.lock_conn().unwrap();
        let v: String = conn
            .query_row(
                "SELECT value FROM metadata WHERE key = 'schema_version'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(v, schema::CURRENT_SCHEMA_VERSION.to_string());
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("abc", 5), "abc");
        assert_eq!(truncate("💪💪💪", 2), "💪💪...");
    }
}
