//! Storage and Transaction traits -- the persistence API the engine consumes.
//!
//! Consumers depend on these traits rather than on [`SqliteStore`] so that
//! alternative backends (mocks, other databases) can be substituted.
//!
//! [`SqliteStore`]: crate::SqliteStore

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use rpglife_core::achievement::Achievement;
use rpglife_core::enums::TransactionKind;
use rpglife_core::model::{
    Category, NewReward, NewTask, PointTransaction, Reward, RewardRedemption, Task,
    TaskCompletion, User, UserStats,
};

use crate::error::Result;

// ---------------------------------------------------------------------------
// View / helper types
// ---------------------------------------------------------------------------

/// Achievement id -> when the user unlocked it.
pub type UnlockedAchievements = HashMap<i64, DateTime<Utc>>;

/// The per-user counts achievement evaluation needs beyond the stats row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Aggregates {
    /// Completions ever recorded.
    pub total_completions: i64,
    /// Highest completion count within a single category.
    pub max_category_completions: i64,
    /// Redemptions ever recorded.
    pub total_redemptions: i64,
}

/// A count bucketed by calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DailyCount {
    pub day: NaiveDate,
    pub count: i64,
}

/// Completion count for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub category_id: i64,
    pub name: String,
    pub icon: String,
    pub color: String,
    pub count: i64,
}

/// Fields for a category that does not exist yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCategory {
    pub user_id: i64,
    pub name: String,
    pub icon: String,
    pub color: String,
}

// ---------------------------------------------------------------------------
// Transaction trait
// ---------------------------------------------------------------------------

/// Operations available inside a transaction.
///
/// Everything here runs on one connection and is committed or rolled back
/// as a unit. These are the reads and writes the progression engine needs
/// for a read-modify-write cycle.
pub trait Transaction {
    // -- Stats ---------------------------------------------------------------

    fn get_user_stats(&self, user_id: i64) -> Result<UserStats>;
    fn update_user_stats(&self, stats: &UserStats) -> Result<()>;

    // -- Tasks ---------------------------------------------------------------

    fn get_task(&self, task_id: i64) -> Result<Task>;
    fn create_task(&self, task: &NewTask) -> Result<Task>;
    fn count_active_tasks(&self, user_id: i64) -> Result<usize>;

    /// Records one completion event and returns its id.
    fn insert_completion(&self, task_id: i64, user_id: i64, points_earned: i64) -> Result<i64>;

    /// Marks a task inactive. Inactive tasks are never reactivated.
    fn deactivate_task(&self, task_id: i64) -> Result<()>;

    // -- Categories ----------------------------------------------------------

    fn get_category(&self, category_id: i64) -> Result<Category>;
    fn create_category(&self, category: &NewCategory) -> Result<Category>;

    // -- Rewards -------------------------------------------------------------

    fn get_reward(&self, reward_id: i64) -> Result<Reward>;

    /// Records one redemption event and returns its id.
    fn insert_redemption(&self, reward_id: i64, user_id: i64, points_spent: i64) -> Result<i64>;

    // -- Ledger --------------------------------------------------------------

    /// Appends a ledger row. Rows are never updated or deleted.
    fn append_transaction(
        &self,
        user_id: i64,
        amount: i64,
        kind: TransactionKind,
        reference_id: Option<i64>,
    ) -> Result<i64>;

    // -- Achievements --------------------------------------------------------

    fn aggregates(&self, user_id: i64) -> Result<Aggregates>;
    fn list_achievements(&self) -> Result<Vec<Achievement>>;
    fn unlocked_achievements(&self, user_id: i64) -> Result<UnlockedAchievements>;

    /// Unlocks an achievement for a user.
    ///
    /// Returns `true` if a row was inserted and `false` if the user already
    /// had it. A repeat unlock is never an error.
    fn unlock_achievement(&self, user_id: i64, achievement_id: i64) -> Result<bool>;
}

// ---------------------------------------------------------------------------
// Storage trait
// ---------------------------------------------------------------------------

/// Primary storage interface.
///
/// All methods return [`Result`] to propagate
/// [`StorageError`](crate::StorageError)s.
pub trait Storage: Send + Sync {
    // -- Users ---------------------------------------------------------------

    /// Creates a user together with a fresh stats row.
    fn create_user(&self, username: &str) -> Result<User>;
    fn get_user(&self, user_id: i64) -> Result<User>;
    fn get_user_by_name(&self, username: &str) -> Result<User>;
    fn list_users(&self) -> Result<Vec<User>>;
    fn get_user_stats(&self, user_id: i64) -> Result<UserStats>;

    // -- Categories ----------------------------------------------------------

    /// Default categories plus the user's own, defaults first.
    fn list_categories(&self, user_id: i64) -> Result<Vec<Category>>;
    fn get_category(&self, category_id: i64) -> Result<Category>;

    /// Deletes a custom category owned by `user_id`. Defaults and categories
    /// that still have tasks are refused.
    fn delete_category(&self, user_id: i64, category_id: i64) -> Result<()>;

    // -- Tasks ---------------------------------------------------------------

    fn get_task(&self, task_id: i64) -> Result<Task>;

    /// Active tasks with their category name and icon, newest first.
    fn list_active_tasks(&self, user_id: i64) -> Result<Vec<Task>>;
    fn count_active_tasks(&self, user_id: i64) -> Result<usize>;

    /// Soft-deletes a task owned by `user_id`.
    fn delete_task(&self, user_id: i64, task_id: i64) -> Result<()>;

    /// Most recent completions, newest first.
    fn list_completions(&self, user_id: i64, limit: usize) -> Result<Vec<TaskCompletion>>;

    // -- Rewards -------------------------------------------------------------

    fn create_reward(&self, reward: &NewReward) -> Result<Reward>;
    fn get_reward(&self, reward_id: i64) -> Result<Reward>;

    /// Rewards ordered by cost, cheapest first.
    fn list_rewards(&self, user_id: i64) -> Result<Vec<Reward>>;

    /// Removes a reward from the list. Its redemption history is kept.
    fn delete_reward(&self, user_id: i64, reward_id: i64) -> Result<()>;

    /// Most recent redemptions, newest first.
    fn list_redemptions(&self, user_id: i64, limit: usize) -> Result<Vec<RewardRedemption>>;

    // -- Achievements --------------------------------------------------------

    fn aggregates(&self, user_id: i64) -> Result<Aggregates>;

    /// All achievements, ordered by group then threshold.
    fn list_achievements(&self) -> Result<Vec<Achievement>>;
    fn unlocked_achievements(&self, user_id: i64) -> Result<UnlockedAchievements>;

    // -- Ledger & analytics --------------------------------------------------

    /// Most recent ledger rows, newest first.
    fn list_transactions(&self, user_id: i64, limit: usize) -> Result<Vec<PointTransaction>>;

    /// Completions per day on or after `since`, ascending by day.
    fn completions_per_day(&self, user_id: i64, since: NaiveDate) -> Result<Vec<DailyCount>>;

    /// XP gained from conversions per day, ascending by day.
    fn xp_per_day(&self, user_id: i64) -> Result<Vec<DailyCount>>;

    /// Completion counts per category, largest first.
    fn category_completion_counts(&self, user_id: i64) -> Result<Vec<CategoryCount>>;

    // -- Transactions --------------------------------------------------------

    /// Executes a closure within a write transaction.
    ///
    /// The transaction takes the database write lock up front, so the reads
    /// the closure makes cannot be invalidated by another writer before it
    /// commits. If the closure returns `Ok`, the transaction is committed;
    /// on `Err` it is rolled back.
    fn run_in_transaction(&self, f: &mut dyn FnMut(&dyn Transaction) -> Result<()>) -> Result<()>;
}
