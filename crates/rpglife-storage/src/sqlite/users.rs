//! Users and their progression stats.

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, Row, TransactionBehavior, params};
use tracing::debug;

use rpglife_core::model::{User, UserStats};

use crate::error::{Result, StorageError};
use crate::sqlite::codec::{format_date, format_datetime, get_datetime, get_opt_date, get_u32, not_found_as};
use crate::sqlite::store::SqliteStore;

const USER_COLUMNS: &str = "id, username, created_at";

const STATS_COLUMNS: &str = "user_id, total_xp, level, available_points, current_streak, \
                             longest_streak, last_completion_date";

fn scan_user(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        created_at: get_datetime(row, 2)?,
    })
}

fn scan_stats(row: &Row<'_>) -> rusqlite::Result<UserStats> {
    Ok(UserStats {
        user_id: row.get(0)?,
        total_xp: row.get(1)?,
        level: get_u32(row, 2)?,
        available_points: row.get(3)?,
        current_streak: get_u32(row, 4)?,
        longest_streak: get_u32(row, 5)?,
        last_completion_date: get_opt_date(row, 6)?,
    })
}

fn is_unique_violation(e: &rusqlite::Error) -> bool {
    matches!(
        e,
        rusqlite::Error::SqliteFailure(err, _)
            if err.code == rusqlite::ErrorCode::ConstraintViolation
    )
}

// ---------------------------------------------------------------------------
// Connection-level helpers (shared with Transaction)
// ---------------------------------------------------------------------------

pub(crate) fn create_user_on_conn(conn: &Connection, username: &str) -> Result<User> {
    let username = username.trim();
    if username.is_empty() {
        return Err(StorageError::validation("username must not be empty"));
    }

    let exists: Option<i64> = conn
        .query_row(
            "SELECT id FROM users WHERE username = ?1",
            params![username],
            |row| row.get(0),
        )
        .optional()?;
    if exists.is_some() {
        return Err(StorageError::AlreadyExists {
            entity: "user".into(),
            id: username.into(),
        });
    }

    let now = format_datetime(&Utc::now());
    conn.execute(
        "INSERT INTO users (username, created_at) VALUES (?1, ?2)",
        params![username, now],
    )
    .map_err(|e| {
        if is_unique_violation(&e) {
            StorageError::AlreadyExists {
                entity: "user".into(),
                id: username.into(),
            }
        } else {
            StorageError::Query(e)
        }
    })?;
    let id = conn.last_insert_rowid();

    conn.execute("INSERT INTO user_stats (user_id) VALUES (?1)", params![id])?;
    debug!(id, username, "created user");

    get_user_on_conn(conn, id)
}

pub(crate) fn get_user_on_conn(conn: &Connection, user_id: i64) -> Result<User> {
    conn.query_row(
        &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
        params![user_id],
        scan_user,
    )
    .map_err(not_found_as("user", user_id))
}

pub(crate) fn get_user_by_name_on_conn(conn: &Connection, username: &str) -> Result<User> {
    conn.query_row(
        &format!("SELECT {USER_COLUMNS} FROM users WHERE username = ?1"),
        params![username.trim()],
        scan_user,
    )
    .map_err(not_found_as("user", username))
}

pub(crate) fn list_users_on_conn(conn: &Connection) -> Result<Vec<User>> {
    let mut stmt = conn.prepare(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY id"))?;
    let users = stmt
        .query_map([], scan_user)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(users)
}

pub(crate) fn get_user_stats_on_conn(conn: &Connection, user_id: i64) -> Result<UserStats> {
    conn.query_row(
        &format!("SELECT {STATS_COLUMNS} FROM user_stats WHERE user_id = ?1"),
        params![user_id],
        scan_stats,
    )
    .map_err(not_found_as("user stats", user_id))
}

pub(crate) fn update_user_stats_on_conn(conn: &Connection, stats: &UserStats) -> Result<()> {
    if stats.available_points < 0 {
        return Err(StorageError::validation(format!(
            "available points cannot go negative (got {})",
            stats.available_points
        )));
    }

    let affected = conn.execute(
        "UPDATE user_stats
         SET total_xp = ?2, level = ?3, available_points = ?4,
             current_streak = ?5, longest_streak = ?6, last_completion_date = ?7
         WHERE user_id = ?1",
        params![
            stats.user_id,
            stats.total_xp,
            stats.level,
            stats.available_points,
            stats.current_streak,
            stats.longest_streak,
            stats.last_completion_date.as_ref().map(format_date),
        ],
    )?;
    if affected == 0 {
        return Err(StorageError::not_found("user stats", stats.user_id));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// SqliteStore methods
// ---------------------------------------------------------------------------

impl SqliteStore {
    /// Inserts the user and its zeroed stats row in one transaction.
    pub fn create_user_impl(&self, username: &str) -> Result<User> {
        let mut conn = self.lock_conn()?;
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(|e| StorageError::Transaction(format!("failed to begin: {e}")))?;
        let user = create_user_on_conn(&tx, username)?;
        tx.commit()
            .map_err(|e| StorageError::Transaction(format!("failed to commit: {e}")))?;
        Ok(user)
    }

    pub fn get_user_impl(&self, user_id: i64) -> Result<User> {
        let conn = self.lock_conn()?;
        get_user_on_conn(&conn, user_id)
    }

    pub fn get_user_by_name_impl(&self, username: &str) -> Result<User> {
        let conn = self.lock_conn()?;
        get_user_by_name_on_conn(&conn, username)
    }

    pub fn list_users_impl(&self) -> Result<Vec<User>> {
        let conn = self.lock_conn()?;
        list_users_on_conn(&conn)
    }

    pub fn get_user_stats_impl(&self, user_id: i64) -> Result<UserStats> {
        let conn = self.lock_conn()?;
        get_user_stats_on_conn(&conn, user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn test_store() -> SqliteStore {
        SqliteStore::open_in_memory().unwrap()
    }

    #[test]
    fn create_user_starts_fresh_stats() {
        let store = test_store();
        let user = store.create_user_impl("ada").unwrap();
        assert_eq!(user.username, "ada");

        let stats = store.get_user_stats_impl(user.id).unwrap();
        assert_eq!(stats, UserStats::new(user.id));
    }

    #[test]
    fn failed_stats_insert_leaves_no_user() {
        let store = test_store();
        store
            .lock_conn()
            .unwrap()
            .execute_batch(
                "CREATE TRIGGER refuse_stats BEFORE INSERT ON user_stats
                 BEGIN SELECT RAISE(ABORT, 'stats refused'); END;",
            )
            .unwrap();

        assert!(store.create_user_impl("ada").is_err());
        assert!(store.list_users_impl().unwrap().is_empty());
    }

    #[test]
    fn duplicate_username_is_rejected() {
        let store = test_store();
        store.create_user_impl("ada").unwrap();
        let err = store.create_user_impl("ada").unwrap_err();
        assert!(matches!(err, StorageError::AlreadyExists { .. }));
    }

    #[test]
    fn blank_username_is_rejected() {
        let store = test_store();
        let err = store.create_user_impl("   ").unwrap_err();
        assert!(matches!(err, StorageError::Validation { .. }));
    }

    #[test]
    fn lookup_by_name() {
        let store = test_store();
        let user = store.create_user_impl("grace").unwrap();
        assert_eq!(store.get_user_by_name_impl("grace").unwrap(), user);
        assert!(store.get_user_by_name_impl("nobody").unwrap_err().is_not_found());
    }

    #[test]
    fn stats_update_roundtrip() {
        let store = test_store();
        let user = store.create_user_impl("ada").unwrap();
        let conn = store.lock_conn().unwrap();

        let stats = UserStats {
            total_xp: 450,
            level: 2,
            available_points: 30,
            current_streak: 3,
            longest_streak: 8,
            last_completion_date: NaiveDate::from_ymd_opt(2026, 3, 14),
            ..UserStats::new(user.id)
        };
        update_user_stats_on_conn(&conn, &stats).unwrap();
        assert_eq!(get_user_stats_on_conn(&conn, user.id).unwrap(), stats);
    }

    #[test]
    fn negative_balance_is_refused() {
        let store = test_store();
        let user = store.create_user_impl("ada").unwrap();
        let conn = store.lock_conn().unwrap();

        let stats = UserStats {
            available_points: -1,
            ..UserStats::new(user.id)
        };
        let err = update_user_stats_on_conn(&conn, &stats).unwrap_err();
        assert!(matches!(err, StorageError::Validation { .. }));
    }

    #[test]
    fn list_users_in_creation_order() {
        let store = test_store();
        store.create_user_impl("b").unwrap();
        store.create_user_impl("a").unwrap();
        let names: Vec<_> = store
            .list_users_impl()
            .unwrap()
            .into_iter()
            .map(|u| u.username)
            .collect();
        assert_eq!(names, vec!["b", "a"]);
    }
}
