//! Achievement evaluation against live storage.

use serde::Serialize;
use tracing::info;

use rpglife_core::achievement::{
    Achievement, AchievementProgress, AchievementStatus, ProgressSnapshot, pending_unlocks,
    progress_report,
};
use rpglife_storage::{Aggregates, Transaction};

use crate::Engine;
use crate::context::ActionContext;
use crate::error::Result;

fn snapshot(stats: &rpglife_core::model::UserStats, agg: Aggregates) -> ProgressSnapshot {
    ProgressSnapshot::new(
        stats,
        agg.total_completions,
        agg.max_category_completions,
        agg.total_redemptions,
    )
}

/// Unlocks every achievement the user now qualifies for and returns the
/// ones that were not unlocked before.
///
/// Runs on the caller's transaction so the unlocks commit together with the
/// mutation that earned them.
pub(crate) fn evaluate_on_tx(
    tx: &dyn Transaction,
    user_id: i64,
) -> rpglife_storage::error::Result<Vec<Achievement>> {
    let stats = tx.get_user_stats(user_id)?;
    let snap = snapshot(&stats, tx.aggregates(user_id)?);
    let catalog = tx.list_achievements()?;
    let unlocked = tx.unlocked_achievements(user_id)?;

    let mut newly_unlocked = Vec::new();
    for achievement in pending_unlocks(&catalog, &unlocked, &snap) {
        if tx.unlock_achievement(user_id, achievement.id)? {
            info!(user_id, name = %achievement.name, "achievement unlocked");
            newly_unlocked.push(achievement.clone());
        }
    }
    Ok(newly_unlocked)
}

/// Counts shown next to the achievement list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AchievementSummary {
    pub unlocked: usize,
    pub total: usize,
}

impl AchievementSummary {
    pub fn of(report: &[AchievementProgress]) -> Self {
        Self {
            unlocked: report
                .iter()
                .filter(|p| matches!(p.status, AchievementStatus::Unlocked { .. }))
                .count(),
            total: report.len(),
        }
    }
}

impl Engine<'_> {
    /// Evaluates achievements outside of any other operation.
    pub fn check_achievements(&self, ctx: &ActionContext) -> Result<Vec<Achievement>> {
        self.in_transaction(|tx| Ok(evaluate_on_tx(tx, ctx.user_id)?))
    }

    /// Every achievement with the user's unlock time or locked progress.
    pub fn achievement_progress(&self, ctx: &ActionContext) -> Result<Vec<AchievementProgress>> {
        let stats = self.store.get_user_stats(ctx.user_id)?;
        let snap = snapshot(&stats, self.store.aggregates(ctx.user_id)?);
        let catalog = self.store.list_achievements()?;
        let unlocked = self.store.unlocked_achievements(ctx.user_id)?;
        Ok(progress_report(&catalog, &unlocked, &snap))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::*;
    use pretty_assertions::assert_eq;
    use rpglife_core::model::UserStats;

    fn names(list: &[Achievement]) -> Vec<&str> {
        list.iter().map(|a| a.name.as_str()).collect()
    }

    #[test]
    fn unlocks_are_reported_once() {
        let store = store();
        let ctx = user(&store, "ada");
        set_stats(
            &store,
            &UserStats {
                longest_streak: 7,
                current_streak: 7,
                ..UserStats::new(ctx.user_id)
            },
        );
        let engine = engine(&store);

        let first = engine.check_achievements(&ctx).unwrap();
        assert_eq!(names(&first), vec!["Week Warrior"]);
        assert!(engine.check_achievements(&ctx).unwrap().is_empty());
    }

    #[test]
    fn points_saved_counts_balance() {
        let store = store();
        let ctx = user(&store, "ada");
        set_stats(
            &store,
            &UserStats {
                available_points: 1_000,
                ..UserStats::new(ctx.user_id)
            },
        );

        let unlocked = engine(&store).check_achievements(&ctx).unwrap();
        assert_eq!(names(&unlocked), vec!["Saver"]);
    }

    #[test]
    fn progress_report_mixes_states() {
        let store = store();
        let ctx = user(&store, "ada");
        set_stats(
            &store,
            &UserStats {
                total_xp: 1_600,
                level: 4,
                ..UserStats::new(ctx.user_id)
            },
        );
        let engine = engine(&store);
        assert!(engine.check_achievements(&ctx).unwrap().is_empty());

        let report = engine.achievement_progress(&ctx).unwrap();
        assert_eq!(AchievementSummary::of(&report), AchievementSummary { unlocked: 0, total: 14 });

        let apprentice = report
            .iter()
            .find(|p| p.achievement.name == "Apprentice")
            .unwrap();
        assert_eq!(apprentice.status, AchievementStatus::Locked { progress: 0.8 });
    }

    #[test]
    fn ten_completions_unlock_getting_started() {
        let store = store();
        let ctx = user(&store, "ada");
        set_stats(
            &store,
            &UserStats {
                total_xp: 2_500,
                level: 5,
                ..UserStats::new(ctx.user_id)
            },
        );
        let engine = engine(&store);
        let mut d = draft(&store, &ctx, "Pushups", 1);
        d.is_recurring = true;
        let task = engine.create_task(&ctx, &d).unwrap();

        let mut unlocked = Vec::new();
        for _ in 0..10 {
            unlocked.extend(engine.complete_task(&ctx, task.id).unwrap().newly_unlocked);
        }
        // Apprentice is met by the preset level on the first completion.
        assert_eq!(names(&unlocked), vec!["Apprentice", "Getting Started"]);
    }
}
