//! Achievement catalog, unlocks and the aggregates used to evaluate them.

use chrono::Utc;
use rusqlite::{Connection, Row, params};

use rpglife_core::achievement::Achievement;

use crate::error::Result;
use crate::sqlite::codec::{format_datetime, get_datetime, get_enum};
use crate::sqlite::store::SqliteStore;
use crate::traits::{Aggregates, UnlockedAchievements};

fn scan_achievement(row: &Row<'_>) -> rusqlite::Result<Achievement> {
    Ok(Achievement {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        group: get_enum(row, 3)?,
        icon: row.get(4)?,
        requirement: get_enum(row, 5)?,
        threshold: row.get(6)?,
    })
}

// ---------------------------------------------------------------------------
// Connection-level helpers (shared with Transaction)
// ---------------------------------------------------------------------------

pub(crate) fn list_achievements_on_conn(conn: &Connection) -> Result<Vec<Achievement>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, description, achievement_group, icon,
                requirement_type, requirement_value
         FROM achievements
         ORDER BY achievement_group, requirement_value, id",
    )?;
    let achievements = stmt
        .query_map([], scan_achievement)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(achievements)
}

pub(crate) fn unlocked_achievements_on_conn(
    conn: &Connection,
    user_id: i64,
) -> Result<UnlockedAchievements> {
    let mut stmt = conn.prepare(
        "SELECT achievement_id, unlocked_at FROM user_achievements WHERE user_id = ?1",
    )?;
    let unlocked = stmt
        .query_map(params![user_id], |row| {
            Ok((row.get::<_, i64>(0)?, get_datetime(row, 1)?))
        })?
        .collect::<rusqlite::Result<UnlockedAchievements>>()?;
    Ok(unlocked)
}

pub(crate) fn unlock_achievement_on_conn(
    conn: &Connection,
    user_id: i64,
    achievement_id: i64,
) -> Result<bool> {
    let inserted = conn.execute(
        "INSERT OR IGNORE INTO user_achievements (user_id, achievement_id, unlocked_at)
         VALUES (?1, ?2, ?3)",
        params![user_id, achievement_id, format_datetime(&Utc::now())],
    )?;
    Ok(inserted > 0)
}

pub(crate) fn aggregates_on_conn(conn: &Connection, user_id: i64) -> Result<Aggregates> {
    let total_completions: i64 = conn.query_row(
        "SELECT COUNT(*) FROM task_completions WHERE user_id = ?1",
        params![user_id],
        |row| row.get(0),
    )?;

    let max_category_completions: i64 = conn.query_row(
        "SELECT COALESCE(MAX(cnt), 0) FROM (
             SELECT COUNT(tc.id) AS cnt
             FROM task_completions tc
             JOIN tasks t ON t.id = tc.task_id
             WHERE tc.user_id = ?1
             GROUP BY t.category_id
         )",
        params![user_id],
        |row| row.get(0),
    )?;

    let total_redemptions: i64 = conn.query_row(
        "SELECT COUNT(*) FROM reward_redemptions WHERE user_id = ?1",
        params![user_id],
        |row| row.get(0),
    )?;

    Ok(Aggregates {
        total_completions,
        max_category_completions,
        total_redemptions,
    })
}

// ---------------------------------------------------------------------------
// SqliteStore methods
// ---------------------------------------------------------------------------

impl SqliteStore {
    pub fn list_achievements_impl(&self) -> Result<Vec<Achievement>> {
        let conn = self.lock_conn()?;
        list_achievements_on_conn(&conn)
    }

    pub fn unlocked_achievements_impl(&self, user_id: i64) -> Result<UnlockedAchievements> {
        let conn = self.lock_conn()?;
        unlocked_achievements_on_conn(&conn, user_id)
    }

    pub fn aggregates_impl(&self, user_id: i64) -> Result<Aggregates> {
        let conn = self.lock_conn()?;
        aggregates_on_conn(&conn, user_id)
    }
}
