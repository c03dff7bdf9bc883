//! Transaction wrapper for [`SqliteStore`].

use rusqlite::{Connection, TransactionBehavior};
use tracing::debug;

use rpglife_core::achievement::Achievement;
use rpglife_core::enums::TransactionKind;
use rpglife_core::model::{Category, NewTask, Reward, Task, UserStats};

use crate::error::{Result, StorageError};
use crate::sqlite::store::SqliteStore;
use crate::sqlite::{achievements, categories, ledger, rewards, tasks, users};
use crate::traits::{Aggregates, NewCategory, Transaction, UnlockedAchievements};

/// A thin wrapper around a SQLite connection that is inside a transaction.
///
/// Holds a reference to the connection (which already has an active
/// `BEGIN IMMEDIATE`) and implements [`Transaction`] by delegating to the
/// same connection-level helpers used by [`SqliteStore`].
pub(crate) struct SqliteTx<'a> {
    pub(crate) conn: &'a Connection,
}

impl Transaction for SqliteTx<'_> {
    fn get_user_stats(&self, user_id: i64) -> Result<UserStats> {
        users::get_user_stats_on_conn(self.conn, user_id)
    }

    fn update_user_stats(&self, stats: &UserStats) -> Result<()> {
        users::update_user_stats_on_conn(self.conn, stats)
    }

    fn get_task(&self, task_id: i64) -> Result<Task> {
        tasks::get_task_on_conn(self.conn, task_id)
    }

    fn create_task(&self, task: &NewTask) -> Result<Task> {
        tasks::create_task_on_conn(self.conn, task)
    }

    fn count_active_tasks(&self, user_id: i64) -> Result<usize> {
        tasks::count_active_tasks_on_conn(self.conn, user_id)
    }

    fn insert_completion(&self, task_id: i64, user_id: i64, points_earned: i64) -> Result<i64> {
        tasks::insert_completion_on_conn(self.conn, task_id, user_id, points_earned)
    }

    fn deactivate_task(&self, task_id: i64) -> Result<()> {
        tasks::deactivate_task_on_conn(self.conn, task_id)
    }

    fn get_category(&self, category_id: i64) -> Result<Category> {
        categories::get_category_on_conn(self.conn, category_id)
    }

    fn create_category(&self, category: &NewCategory) -> Result<Category> {
        categories::create_category_on_conn(self.conn, category)
    }

    fn get_reward(&self, reward_id: i64) -> Result<Reward> {
        rewards::get_reward_on_conn(self.conn, reward_id)
    }

    fn insert_redemption(&self, reward_id: i64, user_id: i64, points_spent: i64) -> Result<i64> {
        rewards::insert_redemption_on_conn(self.conn, reward_id, user_id, points_spent)
    }

    fn append_transaction(
        &self,
        user_id: i64,
        amount: i64,
        kind: TransactionKind,
        reference_id: Option<i64>,
    ) -> Result<i64> {
        ledger::append_transaction_on_conn(self.conn, user_id, amount, kind, reference_id)
    }

    fn aggregates(&self, user_id: i64) -> Result<Aggregates> {
        achievements::aggregates_on_conn(self.conn, user_id)
    }

    fn list_achievements(&self) -> Result<Vec<Achievement>> {
        achievements::list_achievements_on_conn(self.conn)
    }

    fn unlocked_achievements(&self, user_id: i64) -> Result<UnlockedAchievements> {
        achievements::unlocked_achievements_on_conn(self.conn, user_id)
    }

    fn unlock_achievement(&self, user_id: i64, achievement_id: i64) -> Result<bool> {
        achievements::unlock_achievement_on_conn(self.conn, user_id, achievement_id)
    }
}

// ---------------------------------------------------------------------------
// SqliteStore::run_in_transaction
// ---------------------------------------------------------------------------

impl SqliteStore {
    /// Runs a closure inside a `BEGIN IMMEDIATE` transaction.
    ///
    /// The write lock is taken before the closure runs, so a second process
    /// working on the same database waits (up to the busy timeout) instead
    /// of reading stats that are about to change.
    pub fn run_in_transaction_impl(
        &self,
        f: &mut dyn FnMut(&dyn Transaction) -> Result<()>,
    ) -> Result<()> {
        let mut conn = self.lock_conn()?;
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(|e| StorageError::Transaction(format!("failed to begin: {e}")))?;

        let sqlite_tx = SqliteTx { conn: &tx };
        match f(&sqlite_tx) {
            Ok(()) => {
                tx.commit()
                    .map_err(|e| StorageError::Transaction(format!("failed to commit: {e}")))?;
                Ok(())
            }
            Err(e) => {
                debug!(error = %e, "rolling back transaction");
                // Rolled back on drop.
                Err(e)
            }
        }
    }
}
