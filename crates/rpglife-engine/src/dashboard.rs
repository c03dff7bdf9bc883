//! Read-only views: the status dashboard and analytics.

use chrono::Days;
use serde::Serialize;

use rpglife_core::gating::{FeatureStatus, TaskSlots, feature_statuses, get_task_slots};
use rpglife_core::model::{RewardRedemption, TaskCompletion, User, UserStats};
use rpglife_core::progression::{level_multiplier, xp_for_level};
use rpglife_storage::{CategoryCount, DailyCount};

use crate::Engine;
use crate::achievements::AchievementSummary;
use crate::context::ActionContext;
use crate::error::Result;

/// Number of recent rows shown in analytics lists.
const RECENT_LIMIT: usize = 10;

/// Everything the status screen shows.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub user: User,
    pub stats: UserStats,
    /// Progress toward the next level, in `[0, 1]`.
    pub xp_progress: f64,
    pub current_level_xp: i64,
    pub next_level_xp: i64,
    pub multiplier: f64,
    pub active_tasks: usize,
    pub task_slots: TaskSlots,
    pub features: Vec<FeatureStatus>,
    pub achievements: AchievementSummary,
}

/// Time-bucketed history for charts.
#[derive(Debug, Clone, Serialize)]
pub struct Analytics {
    /// Completions per day over the last seven days, today included.
    pub completions_last_week: Vec<DailyCount>,
    pub xp_per_day: Vec<DailyCount>,
    pub per_category: Vec<CategoryCount>,
    pub recent_completions: Vec<TaskCompletion>,
    pub recent_redemptions: Vec<RewardRedemption>,
}

impl Engine<'_> {
    pub fn dashboard(&self, ctx: &ActionContext) -> Result<Dashboard> {
        let user = self.store.get_user(ctx.user_id)?;
        let stats = self.store.get_user_stats(ctx.user_id)?;
        let active_tasks = self.store.count_active_tasks(ctx.user_id)?;
        let achievements = AchievementSummary::of(&self.achievement_progress(ctx)?);

        Ok(Dashboard {
            xp_progress: stats.xp_progress(),
            current_level_xp: xp_for_level(stats.level),
            next_level_xp: stats.next_level_xp(),
            multiplier: level_multiplier(stats.level),
            task_slots: get_task_slots(stats.level),
            active_tasks,
            features: feature_statuses(stats.level),
            achievements,
            user,
            stats,
        })
    }

    pub fn analytics(&self, ctx: &ActionContext) -> Result<Analytics> {
        let since = ctx
            .today
            .checked_sub_days(Days::new(6))
            .unwrap_or(ctx.today);

        Ok(Analytics {
            completions_last_week: self.store.completions_per_day(ctx.user_id, since)?,
            xp_per_day: self.store.xp_per_day(ctx.user_id)?,
            per_category: self.store.category_completion_counts(ctx.user_id)?,
            recent_completions: self.store.list_completions(ctx.user_id, RECENT_LIMIT)?,
            recent_redemptions: self.store.list_redemptions(ctx.user_id, RECENT_LIMIT)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::*;
    use pretty_assertions::assert_eq;
    use rpglife_core::enums::Feature;
    use rpglife_storage::Storage;

    #[test]
    fn fresh_user_dashboard() {
        let store = store();
        let ctx = user(&store, "ada");

        let dash = engine(&store).dashboard(&ctx).unwrap();
        assert_eq!(dash.user.username, "ada");
        assert_eq!(dash.stats.level, 1);
        assert_eq!(dash.current_level_xp, 100);
        assert_eq!(dash.next_level_xp, 400);
        assert_eq!(dash.multiplier, 1.0);
        assert_eq!(dash.task_slots, TaskSlots::Limited(3));
        assert_eq!(dash.active_tasks, 0);
        assert!(dash.features.iter().all(|f| !f.unlocked));
        assert_eq!(dash.achievements.total, 14);
    }

    #[test]
    fn dashboard_reflects_level() {
        let store = store();
        let ctx = user(&store, "ada");
        set_stats(
            &store,
            &UserStats {
                total_xp: 10_000,
                level: 10,
                ..UserStats::new(ctx.user_id)
            },
        );

        let dash = engine(&store).dashboard(&ctx).unwrap();
        assert_eq!(dash.task_slots, TaskSlots::Unlimited);
        let unlocked: Vec<_> = dash
            .features
            .iter()
            .filter(|f| f.unlocked)
            .map(|f| f.feature)
            .collect();
        assert_eq!(
            unlocked,
            vec![
                Feature::CustomCategories,
                Feature::RecurringTasks,
                Feature::DetailedAnalytics,
            ]
        );

        let json = serde_json::to_value(&dash).unwrap();
        assert_eq!(json["task_slots"], "unlimited");
    }

    #[test]
    fn analytics_after_completion() {
        let store = store();
        let ctx = user(&store, "ada");
        let engine = engine(&store);
        let task = engine.create_task(&ctx, &draft(&store, &ctx, "Read", 2)).unwrap();
        engine.complete_task(&ctx, task.id).unwrap();

        // Completion timestamps come from the clock, so date the query from today.
        let today = ActionContext::now(ctx.user_id);
        let analytics = engine.analytics(&today).unwrap();
        assert_eq!(analytics.completions_last_week.len(), 1);
        assert_eq!(analytics.completions_last_week[0].count, 1);
        assert_eq!(analytics.per_category[0].count, 1);
        assert_eq!(analytics.recent_completions[0].points_earned, 25);
        assert!(analytics.recent_redemptions.is_empty());
        assert!(analytics.xp_per_day.is_empty());
    }

    #[test]
    fn analytics_buckets_on_the_streak_day() {
        let store = store();
        let ada = store.create_user("ada").unwrap();
        let ctx = ActionContext::now(ada.id);
        let engine = engine(&store);
        let task = engine.create_task(&ctx, &draft(&store, &ctx, "Read", 1)).unwrap();
        engine.complete_task(&ctx, task.id).unwrap();

        let stats = store.get_user_stats(ctx.user_id).unwrap();
        let analytics = engine.analytics(&ctx).unwrap();
        assert_eq!(stats.last_completion_date, Some(ctx.today));
        assert_eq!(analytics.completions_last_week[0].day, ctx.today);
    }
}
