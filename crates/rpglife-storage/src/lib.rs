//! Storage backend for rpglife.
//!
//! Provides the [`Storage`] trait and a SQLite implementation ([`SqliteStore`]).

pub mod error;
pub mod sqlite;
pub mod traits;

// Re-exports for convenience.
pub use error::StorageError;
pub use sqlite::SqliteStore;
pub use traits::{
    Aggregates, CategoryCount, DailyCount, NewCategory, Storage, Transaction,
    UnlockedAchievements,
};

// ---------------------------------------------------------------------------
// Storage trait implementation for SqliteStore
// ---------------------------------------------------------------------------

use chrono::NaiveDate;

use rpglife_core::achievement::Achievement;
use rpglife_core::model::{
    Category, NewReward, PointTransaction, Reward, RewardRedemption, Task, TaskCompletion, User,
    UserStats,
};

use crate::error::Result;

impl Storage for SqliteStore {
    fn create_user(&self, username: &str) -> Result<User> {
        self.create_user_impl(username)
    }

    fn get_user(&self, user_id: i64) -> Result<User> {
        self.get_user_impl(user_id)
    }

    fn get_user_by_name(&self, username: &str) -> Result<User> {
        self.get_user_by_name_impl(username)
    }

    fn list_users(&self) -> Result<Vec<User>> {
        self.list_users_impl()
    }

    fn get_user_stats(&self, user_id: i64) -> Result<UserStats> {
        self.get_user_stats_impl(user_id)
    }

    fn list_categories(&self, user_id: i64) -> Result<Vec<Category>> {
        self.list_categories_impl(user_id)
    }

    fn get_category(&self, category_id: i64) -> Result<Category> {
        self.get_category_impl(category_id)
    }

    fn delete_category(&self, user_id: i64, category_id: i64) -> Result<()> {
        self.delete_category_impl(user_id, category_id)
    }

    fn get_task(&self, task_id: i64) -> Result<Task> {
        self.get_task_impl(task_id)
    }

    fn list_active_tasks(&self, user_id: i64) -> Result<Vec<Task>> {
        self.list_active_tasks_impl(user_id)
    }

    fn count_active_tasks(&self, user_id: i64) -> Result<usize> {
        self.count_active_tasks_impl(user_id)
    }

    fn delete_task(&self, user_id: i64, task_id: i64) -> Result<()> {
        self.delete_task_impl(user_id, task_id)
    }

    fn list_completions(&self, user_id: i64, limit: usize) -> Result<Vec<TaskCompletion>> {
        self.list_completions_impl(user_id, limit)
    }

    fn create_reward(&self, reward: &NewReward) -> Result<Reward> {
        self.create_reward_impl(reward)
    }

    fn get_reward(&self, reward_id: i64) -> Result<Reward> {
        self.get_reward_impl(reward_id)
    }

    fn list_rewards(&self, user_id: i64) -> Result<Vec<Reward>> {
        self.list_rewards_impl(user_id)
    }

    fn delete_reward(&self, user_id: i64, reward_id: i64) -> Result<()> {
        self.delete_reward_impl(user_id, reward_id)
    }

    fn list_redemptions(&self, user_id: i64, limit: usize) -> Result<Vec<RewardRedemption>> {
        self.list_redemptions_impl(user_id, limit)
    }

    fn aggregates(&self, user_id: i64) -> Result<Aggregates> {
        self.aggregates_impl(user_id)
    }

    fn list_achievements(&self) -> Result<Vec<Achievement>> {
        self.list_achievements_impl()
    }

    fn unlocked_achievements(&self, user_id: i64) -> Result<UnlockedAchievements> {
        self.unlocked_achievements_impl(user_id)
    }

    fn list_transactions(&self, user_id: i64, limit: usize) -> Result<Vec<PointTransaction>> {
        self.list_transactions_impl(user_id, limit)
    }

    fn completions_per_day(&self, user_id: i64, since: NaiveDate) -> Result<Vec<DailyCount>> {
        self.completions_per_day_impl(user_id, since)
    }

    fn xp_per_day(&self, user_id: i64) -> Result<Vec<DailyCount>> {
        self.xp_per_day_impl(user_id)
    }

    fn category_completion_counts(&self, user_id: i64) -> Result<Vec<CategoryCount>> {
        self.category_completion_counts_impl(user_id)
    }

    fn run_in_transaction(&self, f: &mut dyn FnMut(&dyn Transaction) -> Result<()>) -> Result<()> {
        self.run_in_transaction_impl(f)
    }
}
