//! Achievement definitions and evaluation.
//!
//! An achievement pairs a [`RequirementKind`] with a threshold. Evaluation
//! looks up the matching aggregate in a [`ProgressSnapshot`] and compares it
//! against the threshold. Locked achievements report a clamped progress
//! fraction computed from the same lookup.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::enums::{AchievementGroup, RequirementKind};
use crate::model::UserStats;

/// A persisted, global achievement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Achievement {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub group: AchievementGroup,
    pub icon: String,
    pub requirement: RequirementKind,
    pub threshold: i64,
}

/// A compile-time achievement definition used to seed storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AchievementDef {
    pub name: &'static str,
    pub description: &'static str,
    pub group: AchievementGroup,
    pub icon: &'static str,
    pub requirement: RequirementKind,
    pub threshold: i64,
}

const fn def(
    name: &'static str,
    description: &'static str,
    group: AchievementGroup,
    icon: &'static str,
    requirement: RequirementKind,
    threshold: i64,
) -> AchievementDef {
    AchievementDef {
        name,
        description,
        group,
        icon,
        requirement,
        threshold,
    }
}

use AchievementGroup as G;
use RequirementKind as R;

/// The built-in achievement catalog.
pub const DEFAULT_ACHIEVEMENTS: &[AchievementDef] = &[
    def("Week Warrior", "Maintain a 7-day streak", G::Consistency, "🔥", R::Streak, 7),
    def("Monthly Master", "Maintain a 30-day streak", G::Consistency, "🔥", R::Streak, 30),
    def("Centurion", "Maintain a 100-day streak", G::Consistency, "🔥", R::Streak, 100),
    def("Getting Started", "Complete 10 tasks", G::Intensity, "⚡", R::TasksCompleted, 10),
    def("Productive", "Complete 50 tasks", G::Intensity, "⚡", R::TasksCompleted, 50),
    def("Task Machine", "Complete 100 tasks", G::Intensity, "⚡", R::TasksCompleted, 100),
    def("Unstoppable", "Complete 500 tasks", G::Intensity, "⚡", R::TasksCompleted, 500),
    def("Specialist", "Complete 25 tasks in one category", G::Specialization, "🎯", R::CategoryTasks, 25),
    def("Apprentice", "Reach level 5", G::Leveling, "⭐", R::Level, 5),
    def("Journeyman", "Reach level 10", G::Leveling, "⭐", R::Level, 10),
    def("Expert", "Reach level 25", G::Leveling, "⭐", R::Level, 25),
    def("Grand Master", "Reach level 50", G::Leveling, "⭐", R::Level, 50),
    def("First Purchase", "Redeem your first reward", G::Economy, "🛒", R::RewardsRedeemed, 1),
    def("Saver", "Have 1000+ points saved", G::Economy, "💰", R::PointsSaved, 1000),
];

/// The aggregates an achievement can be measured against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProgressSnapshot {
    pub longest_streak: i64,
    pub level: i64,
    pub available_points: i64,
    pub total_completions: i64,
    pub max_category_completions: i64,
    pub total_redemptions: i64,
}

impl ProgressSnapshot {
    /// Combines a stats record with the completion/redemption aggregates.
    pub fn new(
        stats: &UserStats,
        total_completions: i64,
        max_category_completions: i64,
        total_redemptions: i64,
    ) -> Self {
        Self {
            longest_streak: i64::from(stats.longest_streak),
            level: i64::from(stats.level),
            available_points: stats.available_points,
            total_completions,
            max_category_completions,
            total_redemptions,
        }
    }

    /// The aggregate that `kind` is measured against.
    pub fn value_for(&self, kind: RequirementKind) -> i64 {
        match kind {
            RequirementKind::Streak => self.longest_streak,
            RequirementKind::TasksCompleted => self.total_completions,
            RequirementKind::CategoryTasks => self.max_category_completions,
            RequirementKind::Level => self.level,
            RequirementKind::RewardsRedeemed => self.total_redemptions,
            RequirementKind::PointsSaved => self.available_points,
        }
    }

    pub fn is_met(&self, kind: RequirementKind, threshold: i64) -> bool {
        self.value_for(kind) >= threshold
    }

    /// `min(1, value / threshold)`, floored at 0. A non-positive threshold
    /// counts as complete.
    pub fn progress(&self, kind: RequirementKind, threshold: i64) -> f64 {
        if threshold <= 0 {
            return 1.0;
        }
        let ratio = self.value_for(kind) as f64 / threshold as f64;
        ratio.clamp(0.0, 1.0)
    }
}

impl Achievement {
    pub fn is_met(&self, snapshot: &ProgressSnapshot) -> bool {
        snapshot.is_met(self.requirement, self.threshold)
    }

    pub fn progress(&self, snapshot: &ProgressSnapshot) -> f64 {
        snapshot.progress(self.requirement, self.threshold)
    }
}

/// Achievements that are met by `snapshot` but not yet in `unlocked`.
pub fn pending_unlocks<'a, V>(
    achievements: &'a [Achievement],
    unlocked: &HashMap<i64, V>,
    snapshot: &ProgressSnapshot,
) -> Vec<&'a Achievement> {
    achievements
        .iter()
        .filter(|a| !unlocked.contains_key(&a.id))
        .filter(|a| a.is_met(snapshot))
        .collect()
}

/// Where a user stands on one achievement.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum AchievementStatus {
    Unlocked { unlocked_at: DateTime<Utc> },
    Locked { progress: f64 },
}

/// An achievement with the user's status on it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AchievementProgress {
    pub achievement: Achievement,
    #[serde(flatten)]
    pub status: AchievementStatus,
}

/// Builds the per-achievement report shown on progress screens.
pub fn progress_report(
    achievements: &[Achievement],
    unlocked: &HashMap<i64, DateTime<Utc>>,
    snapshot: &ProgressSnapshot,
) -> Vec<AchievementProgress> {
    achievements
        .iter()
        .map(|a| {
            let status = match unlocked.get(&a.id) {
                Some(at) => AchievementStatus::Unlocked { unlocked_at: *at },
                None => AchievementStatus::Locked {
                    progress: a.progress(snapshot),
                },
            };
            AchievementProgress {
                achievement: a.clone(),
                status,
            }
        })
        .collect()
}
