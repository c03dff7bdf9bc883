//! Reward and redemption operations for [`SqliteStore`].

use chrono::Utc;
use rusqlite::{Connection, Row, params};
use tracing::debug;

use rpglife_core::model::{NewReward, Reward, RewardRedemption};

use crate::error::{Result, StorageError};
use crate::sqlite::codec::{format_datetime, get_datetime, get_tier, not_found_as};
use crate::sqlite::store::SqliteStore;

const REWARD_COLUMNS: &str = "id, user_id, name, description, value, point_cost, created_at";

fn scan_reward(row: &Row<'_>) -> rusqlite::Result<Reward> {
    Ok(Reward {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        description: row.get(3)?,
        value: get_tier(row, 4)?,
        point_cost: row.get(5)?,
        created_at: get_datetime(row, 6)?,
    })
}

fn scan_redemption(row: &Row<'_>) -> rusqlite::Result<RewardRedemption> {
    Ok(RewardRedemption {
        id: row.get(0)?,
        reward_id: row.get(1)?,
        user_id: row.get(2)?,
        points_spent: row.get(3)?,
        redeemed_at: get_datetime(row, 4)?,
        reward_name: row.get(5)?,
    })
}

// ---------------------------------------------------------------------------
// Connection-level helpers (shared with Transaction)
// ---------------------------------------------------------------------------

/// Looks up a reward that has not been archived.
pub(crate) fn get_reward_on_conn(conn: &Connection, reward_id: i64) -> Result<Reward> {
    conn.query_row(
        &format!("SELECT {REWARD_COLUMNS} FROM rewards WHERE id = ?1 AND is_archived = 0"),
        params![reward_id],
        scan_reward,
    )
    .map_err(not_found_as("reward", reward_id))
}

pub(crate) fn create_reward_on_conn(conn: &Connection, new: &NewReward) -> Result<Reward> {
    let name = new.name.trim();
    if name.is_empty() {
        return Err(StorageError::validation("reward name must not be empty"));
    }

    conn.execute(
        "INSERT INTO rewards (user_id, name, description, value, point_cost, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            new.user_id,
            name,
            new.description.trim(),
            i64::from(new.value),
            new.point_cost(),
            format_datetime(&Utc::now()),
        ],
    )?;
    let id = conn.last_insert_rowid();
    debug!(id, user_id = new.user_id, cost = new.point_cost(), "created reward");
    get_reward_on_conn(conn, id)
}

pub(crate) fn list_rewards_on_conn(conn: &Connection, user_id: i64) -> Result<Vec<Reward>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {REWARD_COLUMNS} FROM rewards
         WHERE user_id = ?1 AND is_archived = 0
         ORDER BY point_cost ASC, id ASC"
    ))?;
    let rewards = stmt
        .query_map(params![user_id], scan_reward)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rewards)
}

pub(crate) fn delete_reward_on_conn(conn: &Connection, user_id: i64, reward_id: i64) -> Result<()> {
    let affected = conn.execute(
        "UPDATE rewards SET is_archived = 1
         WHERE id = ?1 AND user_id = ?2 AND is_archived = 0",
        params![reward_id, user_id],
    )?;
    if affected == 0 {
        return Err(StorageError::not_found("reward", reward_id));
    }
    Ok(())
}

pub(crate) fn insert_redemption_on_conn(
    conn: &Connection,
    reward_id: i64,
    user_id: i64,
    points_spent: i64,
) -> Result<i64> {
    conn.execute(
        "INSERT INTO reward_redemptions (reward_id, user_id, points_spent, redeemed_at)
         VALUES (?1, ?2, ?3, ?4)",
        params![reward_id, user_id, points_spent, format_datetime(&Utc::now())],
    )?;
    Ok(conn.last_insert_rowid())
}

pub(crate) fn list_redemptions_on_conn(
    conn: &Connection,
    user_id: i64,
    limit: usize,
) -> Result<Vec<RewardRedemption>> {
    let mut stmt = conn.prepare(
        "SELECT rr.id, rr.reward_id, rr.user_id, rr.points_spent, rr.redeemed_at,
                COALESCE(r.name, '')
         FROM reward_redemptions rr
         LEFT JOIN rewards r ON r.id = rr.reward_id
         WHERE rr.user_id = ?1
         ORDER BY rr.redeemed_at DESC, rr.id DESC
         LIMIT ?2",
    )?;
    let limit = i64::try_from(limit).unwrap_or(i64::MAX);
    let redemptions = stmt
        .query_map(params![user_id, limit], scan_redemption)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(redemptions)
}

// ---------------------------------------------------------------------------
// SqliteStore methods
// ---------------------------------------------------------------------------

impl SqliteStore {
    pub fn create_reward_impl(&self, reward: &NewReward) -> Result<Reward> {
        let conn = self.lock_conn()?;
        create_reward_on_conn(&conn, reward)
    }

    pub fn get_reward_impl(&self, reward_id: i64) -> Result<Reward> {
        let conn = self.lock_conn()?;
        get_reward_on_conn(&conn, reward_id)
    }

    pub fn list_rewards_impl(&self, user_id: i64) -> Result<Vec<Reward>> {
        let conn = self.lock_conn()?;
        list_rewards_on_conn(&conn, user_id)
    }

    pub fn delete_reward_impl(&self, user_id: i64, reward_id: i64) -> Result<()> {
        let conn = self.lock_conn()?;
        delete_reward_on_conn(&conn, user_id, reward_id)
    }

    pub fn list_redemptions_impl(
        &self,
        user_id: i64,
        limit: usize,
    ) -> Result<Vec<RewardRedemption>> {
        let conn = self.lock_conn()?;
        list_redemptions_on_conn(&conn, user_id, limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::users::create_user_on_conn;
    use pretty_assertions::assert_eq;
    use rpglife_core::tier::Tier;

    fn new_reward(user_id: i64, name: &str, value: i64) -> NewReward {
        NewReward {
            user_id,
            name: name.into(),
            description: String::new(),
            value: Tier::new(value).unwrap(),
        }
    }

    #[test]
    fn cost_is_captured_and_list_is_cheapest_first() {
        let store = SqliteStore::open_in_memory().unwrap();
        let conn = store.lock_conn().unwrap();
        let user = create_user_on_conn(&conn, "ada").unwrap();

        create_reward_on_conn(&conn, &new_reward(user.id, "Vacation", 5)).unwrap();
        let coffee = create_reward_on_conn(&conn, &new_reward(user.id, "Coffee", 1)).unwrap();
        assert_eq!(coffee.point_cost, 50);

        let names: Vec<_> = list_rewards_on_conn(&conn, user.id)
            .unwrap()
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["Coffee", "Vacation"]);
    }

    #[test]
    fn archived_rewards_keep_history() {
        let store = SqliteStore::open_in_memory().unwrap();
        let conn = store.lock_conn().unwrap();
        let user = create_user_on_conn(&conn, "ada").unwrap();
        let coffee = create_reward_on_conn(&conn, &new_reward(user.id, "Coffee", 1)).unwrap();

        insert_redemption_on_conn(&conn, coffee.id, user.id, 50).unwrap();
        delete_reward_on_conn(&conn, user.id, coffee.id).unwrap();

        assert!(list_rewards_on_conn(&conn, user.id).unwrap().is_empty());
        assert!(get_reward_on_conn(&conn, coffee.id).unwrap_err().is_not_found());

        let history = list_redemptions_on_conn(&conn, user.id, 10).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].reward_name, "Coffee");
        assert_eq!(history[0].points_spent, 50);
    }

    #[test]
    fn delete_requires_owner() {
        let store = SqliteStore::open_in_memory().unwrap();
        let conn = store.lock_conn().unwrap();
        let ada = create_user_on_conn(&conn, "ada").unwrap();
        let bob = create_user_on_conn(&conn, "bob").unwrap();
        let coffee = create_reward_on_conn(&conn, &new_reward(ada.id, "Coffee", 1)).unwrap();

        assert!(delete_reward_on_conn(&conn, bob.id, coffee.id).unwrap_err().is_not_found());
    }
}
