//! Persisted records: users, their stats, and the things they own.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::enums::TransactionKind;
use crate::progression::{xp_for_level, xp_progress};
use crate::tier::Tier;

/// A registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

/// A user's progression record. One per user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStats {
    pub user_id: i64,

    /// Cumulative experience. Only ever grows.
    pub total_xp: i64,

    /// Derived from `total_xp` via [`crate::progression::level_from_xp`].
    pub level: u32,

    /// Spendable currency. Never negative.
    pub available_points: i64,

    pub current_streak: u32,

    /// Always at least `current_streak`.
    pub longest_streak: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_completion_date: Option<NaiveDate>,
}

impl UserStats {
    /// A fresh record: level 1, nothing earned.
    pub fn new(user_id: i64) -> Self {
        Self {
            user_id,
            total_xp: 0,
            level: 1,
            available_points: 0,
            current_streak: 0,
            longest_streak: 0,
            last_completion_date: None,
        }
    }

    /// Progress toward the next level, in `[0, 1]`.
    pub fn xp_progress(&self) -> f64 {
        xp_progress(self.total_xp, self.level)
    }

    /// XP needed to reach the next level.
    pub fn next_level_xp(&self) -> i64 {
        xp_for_level(self.level + 1)
    }
}

/// A task category. Defaults have no owner and are shared by everyone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    pub name: String,
    pub icon: String,
    pub color: String,
    pub is_default: bool,
}

/// A self-defined task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub user_id: i64,
    pub category_id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub difficulty: Tier,
    pub is_recurring: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,

    // ===== Joined from categories (populated on list queries) =====
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub category_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub category_icon: String,
}

/// Fields for a task that does not exist yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub user_id: i64,
    pub category_id: i64,
    pub name: String,
    pub description: String,
    pub difficulty: Tier,
    pub is_recurring: bool,
}

/// One completion of a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskCompletion {
    pub id: i64,
    pub task_id: i64,
    pub user_id: i64,
    pub points_earned: i64,
    pub completed_at: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub task_name: String,
}

/// A user-defined reward. Redeeming it does not consume it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reward {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub value: Tier,

    /// Cost captured when the reward was created.
    pub point_cost: i64,
    pub created_at: DateTime<Utc>,
}

/// Fields for a reward that does not exist yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReward {
    pub user_id: i64,
    pub name: String,
    pub description: String,
    pub value: Tier,
}

impl NewReward {
    pub fn point_cost(&self) -> i64 {
        self.value.reward_cost()
    }
}

/// One redemption of a reward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardRedemption {
    pub id: i64,
    pub reward_id: i64,
    pub user_id: i64,
    pub points_spent: i64,
    pub redeemed_at: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub reward_name: String,
}

/// An append-only point ledger row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointTransaction {
    pub id: i64,
    pub user_id: i64,
    /// Signed: positive for earnings, negative for spends.
    pub amount: i64,
    pub kind: TransactionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}
