//! Point ledger and the per-day/per-category analytics built on it.

use chrono::{NaiveDate, Utc};
use rusqlite::{Connection, Row, params};

use rpglife_core::enums::TransactionKind;
use rpglife_core::model::PointTransaction;

use crate::error::{Result, StorageError};
use crate::sqlite::codec::{format_date, format_datetime, get_date, get_datetime, get_enum};
use crate::sqlite::store::SqliteStore;
use crate::traits::{CategoryCount, DailyCount};

fn scan_transaction(row: &Row<'_>) -> rusqlite::Result<PointTransaction> {
    Ok(PointTransaction {
        id: row.get(0)?,
        user_id: row.get(1)?,
        amount: row.get(2)?,
        kind: get_enum(row, 3)?,
        reference_id: row.get(4)?,
        created_at: get_datetime(row, 5)?,
    })
}

fn scan_daily(row: &Row<'_>) -> rusqlite::Result<DailyCount> {
    Ok(DailyCount {
        day: get_date(row, 0)?,
        count: row.get(1)?,
    })
}

// ---------------------------------------------------------------------------
// Connection-level helpers (shared with Transaction)
// ---------------------------------------------------------------------------

/// Appends a ledger row. Earnings must be positive and spends negative.
pub(crate) fn append_transaction_on_conn(
    conn: &Connection,
    user_id: i64,
    amount: i64,
    kind: TransactionKind,
    reference_id: Option<i64>,
) -> Result<i64> {
    let sign_ok = if kind.is_spend() { amount < 0 } else { amount > 0 };
    if !sign_ok {
        return Err(StorageError::validation(format!(
            "{kind} ledger amount has the wrong sign: {amount}"
        )));
    }

    conn.execute(
        "INSERT INTO point_transactions
            (user_id, amount, transaction_type, reference_id, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            user_id,
            amount,
            kind.as_str(),
            reference_id,
            format_datetime(&Utc::now()),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub(crate) fn list_transactions_on_conn(
    conn: &Connection,
    user_id: i64,
    limit: usize,
) -> Result<Vec<PointTransaction>> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, amount, transaction_type, reference_id, created_at
         FROM point_transactions
         WHERE user_id = ?1
         ORDER BY created_at DESC, id DESC
         LIMIT ?2",
    )?;
    let limit = i64::try_from(limit).unwrap_or(i64::MAX);
    let rows = stmt
        .query_map(params![user_id, limit], scan_transaction)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

// -- Analytics ---------------------------------------------------------------
//
// Timestamps are stored in UTC but bucketed by local calendar day, the same
// calendar streaks use.

pub(crate) fn completions_per_day_on_conn(
    conn: &Connection,
    user_id: i64,
    since: NaiveDate,
) -> Result<Vec<DailyCount>> {
    let mut stmt = conn.prepare(
        "SELECT date(completed_at, 'localtime') AS day, COUNT(*)
         FROM task_completions
         WHERE user_id = ?1 AND date(completed_at, 'localtime') >= ?2
         GROUP BY day
         ORDER BY day",
    )?;
    let rows = stmt
        .query_map(params![user_id, format_date(&since)], scan_daily)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

/// XP gained per day. Conversions are stored as negative spends, so the
/// sum is negated.
pub(crate) fn xp_per_day_on_conn(conn: &Connection, user_id: i64) -> Result<Vec<DailyCount>> {
    let mut stmt = conn.prepare(
        "SELECT date(created_at, 'localtime') AS day, -SUM(amount)
         FROM point_transactions
         WHERE user_id = ?1 AND transaction_type = ?2
         GROUP BY day
         ORDER BY day",
    )?;
    let rows = stmt
        .query_map(params![user_id, TransactionKind::SpentXp.as_str()], scan_daily)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

pub(crate) fn category_completion_counts_on_conn(
    conn: &Connection,
    user_id: i64,
) -> Result<Vec<CategoryCount>> {
    let mut stmt = conn.prepare(
        "SELECT c.id, c.name, c.icon, c.color, COUNT(tc.id) AS cnt
         FROM task_completions tc
         JOIN tasks t ON t.id = tc.task_id
         JOIN categories c ON c.id = t.category_id
         WHERE tc.user_id = ?1
         GROUP BY c.id
         ORDER BY cnt DESC, c.name",
    )?;
    let rows = stmt
        .query_map(params![user_id], |row| {
            Ok(CategoryCount {
                category_id: row.get(0)?,
                name: row.get(1)?,
                icon: row.get(2)?,
                color: row.get(3)?,
                count: row.get(4)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

// ---------------------------------------------------------------------------
// SqliteStore methods
// ---------------------------------------------------------------------------

impl SqliteStore {
    pub fn list_transactions_impl(
        &self,
        user_id: i64,
        limit: usize,
    ) -> Result<Vec<PointTransaction>> {
        let conn = self.lock_conn()?;
        list_transactions_on_conn(&conn, user_id, limit)
    }

    pub fn completions_per_day_impl(
        &self,
        user_id: i64,
        since: NaiveDate,
    ) -> Result<Vec<DailyCount>> {
        let conn = self.lock_conn()?;
        completions_per_day_on_conn(&conn, user_id, since)
    }

    pub fn xp_per_day_impl(&self, user_id: i64) -> Result<Vec<DailyCount>> {
        let conn = self.lock_conn()?;
        xp_per_day_on_conn(&conn, user_id)
    }

    pub fn category_completion_counts_impl(&self, user_id: i64) -> Result<Vec<CategoryCount>> {
        let conn = self.lock_conn()?;
        category_completion_counts_on_conn(&conn, user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};
    use crate::sqlite::categories::list_categories_on_conn;
    use crate::sqlite::tasks::create_task_on_conn;
    use crate::sqlite::users::create_user_on_conn;
    use pretty_assertions::assert_eq;
    use rpglife_core::model::NewTask;
    use rpglife_core::tier::Tier;

    /// Inserts a completion at `hour:00` local time on `day`.
    fn insert_completion_at(
        conn: &Connection,
        task_id: i64,
        user_id: i64,
        day: NaiveDate,
        hour: u32,
    ) {
        let local = Local
            .from_local_datetime(&day.and_hms_opt(hour, 0, 0).unwrap())
            .earliest()
            .unwrap();
        conn.execute(
            "INSERT INTO task_completions (task_id, user_id, points_earned, completed_at)
             VALUES (?1, ?2, 10, ?3)",
            params![task_id, user_id, format_datetime(&local.with_timezone(&Utc))],
        )
        .unwrap();
    }

    #[test]
    fn ledger_enforces_sign() {
        let store = SqliteStore::open_in_memory().unwrap();
        let conn = store.lock_conn().unwrap();
        let user = create_user_on_conn(&conn, "ada").unwrap();

        append_transaction_on_conn(&conn, user.id, 50, TransactionKind::Earned, Some(1)).unwrap();
        append_transaction_on_conn(&conn, user.id, -20, TransactionKind::SpentXp, None).unwrap();

        let err = append_transaction_on_conn(&conn, user.id, 20, TransactionKind::SpentReward, None)
            .unwrap_err();
        assert!(matches!(err, StorageError::Validation { .. }));

        let rows = list_transactions_on_conn(&conn, user.id, 10).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].kind, TransactionKind::SpentXp);
        assert_eq!(rows[0].amount, -20);
        assert_eq!(rows[1].reference_id, Some(1));
    }

    #[test]
    fn xp_per_day_is_positive() {
        let store = SqliteStore::open_in_memory().unwrap();
        let conn = store.lock_conn().unwrap();
        let user = create_user_on_conn(&conn, "ada").unwrap();

        append_transaction_on_conn(&conn, user.id, -20, TransactionKind::SpentXp, None).unwrap();
        append_transaction_on_conn(&conn, user.id, -30, TransactionKind::SpentXp, None).unwrap();
        append_transaction_on_conn(&conn, user.id, -50, TransactionKind::SpentReward, Some(1))
            .unwrap();

        let days = xp_per_day_on_conn(&conn, user.id).unwrap();
        assert_eq!(days.len(), 1);
        assert_eq!(days[0].count, 50);
        assert_eq!(days[0].day, Local::now().date_naive());
    }

    #[test]
    fn completions_bucketed_by_day() {
        let store = SqliteStore::open_in_memory().unwrap();
        let conn = store.lock_conn().unwrap();
        let user = create_user_on_conn(&conn, "ada").unwrap();
        let category = list_categories_on_conn(&conn, user.id).unwrap().remove(0);
        let task = create_task_on_conn(
            &conn,
            &NewTask {
                user_id: user.id,
                category_id: category.id,
                name: "Stretch".into(),
                description: String::new(),
                difficulty: Tier::new(1).unwrap(),
                is_recurring: false,
            },
        )
        .unwrap();

        let jan = |d| NaiveDate::from_ymd_opt(2026, 1, d).unwrap();
        insert_completion_at(&conn, task.id, user.id, jan(1), 9);
        insert_completion_at(&conn, task.id, user.id, jan(3), 1);
        insert_completion_at(&conn, task.id, user.id, jan(3), 23);

        let since = NaiveDate::from_ymd_opt(2026, 1, 2).unwrap();
        let days = completions_per_day_on_conn(&conn, user.id, since).unwrap();
        assert_eq!(
            days,
            vec![DailyCount {
                day: NaiveDate::from_ymd_opt(2026, 1, 3).unwrap(),
                count: 2,
            }]
        );

        let per_category = category_completion_counts_on_conn(&conn, user.id).unwrap();
        assert_eq!(per_category.len(), 1);
        assert_eq!(per_category[0].name, category.name);
        assert_eq!(per_category[0].count, 3);
    }
}
