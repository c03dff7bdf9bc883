//! Task creation and completion.

use serde::Serialize;
use tracing::{debug, info};

use rpglife_core::achievement::Achievement;
use rpglife_core::economy::apply_earning;
use rpglife_core::enums::{Feature, TransactionKind};
use rpglife_core::gating::{can_create_task, require_feature};
use rpglife_core::model::{NewTask, Task, UserStats};
use rpglife_core::progression::calc_points_earned;
use rpglife_core::streak::{StreakChange, update_streak};
use rpglife_core::tier::Tier;
use rpglife_storage::StorageError;

use crate::achievements::evaluate_on_tx;
use crate::context::ActionContext;
use crate::error::{EngineError, Result};
use crate::Engine;

/// A task the acting user wants to create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    pub category_id: i64,
    pub name: String,
    pub description: String,
    pub difficulty: Tier,
    pub is_recurring: bool,
}

/// What completing a task did.
#[derive(Debug, Clone, Serialize)]
pub struct CompletionOutcome {
    /// The task as it was when completed.
    pub task: Task,
    pub completion_id: i64,
    pub points_earned: i64,
    pub streak: StreakChange,
    /// Stats after the completion.
    pub stats: UserStats,
    pub newly_unlocked: Vec<Achievement>,
}

impl Engine<'_> {
    /// Creates a task, enforcing the slot limit and the recurring-task gate.
    pub fn create_task(&self, ctx: &ActionContext, draft: &TaskDraft) -> Result<Task> {
        self.in_transaction(|tx| {
            let stats = tx.get_user_stats(ctx.user_id)?;
            let active = tx.count_active_tasks(ctx.user_id)?;
            can_create_task(stats.level, active)?;
            if draft.is_recurring {
                require_feature(stats.level, Feature::RecurringTasks)?;
            }

            let task = tx.create_task(&NewTask {
                user_id: ctx.user_id,
                category_id: draft.category_id,
                name: draft.name.clone(),
                description: draft.description.clone(),
                difficulty: draft.difficulty,
                is_recurring: draft.is_recurring,
            })?;
            debug!(task_id = task.id, active = active + 1, "task created");
            Ok(task)
        })
    }

    /// Completes a task for the acting user.
    ///
    /// Records the completion, deactivates a non-recurring task, credits the
    /// points, writes the `earned` ledger entry, advances the streak and
    /// evaluates achievements. Unknown, foreign and inactive tasks are
    /// refused without any change.
    pub fn complete_task(&self, ctx: &ActionContext, task_id: i64) -> Result<CompletionOutcome> {
        self.in_transaction(|tx| {
            let task = tx.get_task(task_id)?;
            if task.user_id != ctx.user_id {
                return Err(StorageError::not_found("task", task_id).into());
            }
            if !task.is_active {
                return Err(EngineError::InactiveTask(task_id));
            }

            let before = tx.get_user_stats(ctx.user_id)?;
            let points_earned = calc_points_earned(task.difficulty, before.level);
            let mut stats = apply_earning(&before, points_earned);
            let streak = update_streak(&mut stats, ctx.today);

            let completion_id = tx.insert_completion(task.id, ctx.user_id, points_earned)?;
            if !task.is_recurring {
                tx.deactivate_task(task.id)?;
            }
            tx.append_transaction(
                ctx.user_id,
                points_earned,
                TransactionKind::Earned,
                Some(task.id),
            )?;
            tx.update_user_stats(&stats)?;

            let newly_unlocked = evaluate_on_tx(tx, ctx.user_id)?;
            info!(
                task_id,
                points_earned,
                streak = stats.current_streak,
                "task completed"
            );

            Ok(CompletionOutcome {
                task,
                completion_id,
                points_earned,
                streak,
                stats,
                newly_unlocked,
            })
        })
    }
}
