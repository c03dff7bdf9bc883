//! Spending points: XP conversion and reward redemption.

use serde::Serialize;
use tracing::info;

use rpglife_core::achievement::Achievement;
use rpglife_core::economy::{plan_conversion, plan_redemption};
use rpglife_core::enums::TransactionKind;
use rpglife_core::model::{NewReward, Reward, UserStats};
use rpglife_core::tier::Tier;
use rpglife_storage::StorageError;

use crate::Engine;
use crate::achievements::evaluate_on_tx;
use crate::context::ActionContext;
use crate::error::Result;

/// A reward the acting user wants to create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewardDraft {
    pub name: String,
    pub description: String,
    pub value: Tier,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConversionOutcome {
    pub amount: i64,
    pub previous_level: u32,
    pub levelled_up: bool,
    pub stats: UserStats,
    pub newly_unlocked: Vec<Achievement>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RedemptionOutcome {
    pub reward: Reward,
    pub redemption_id: i64,
    pub points_spent: i64,
    pub stats: UserStats,
    pub newly_unlocked: Vec<Achievement>,
}

impl Engine<'_> {
    /// Converts `amount` points into XP at 1:1.
    pub fn convert_points(&self, ctx: &ActionContext, amount: i64) -> Result<ConversionOutcome> {
        self.in_transaction(|tx| {
            let before = tx.get_user_stats(ctx.user_id)?;
            let stats = plan_conversion(&before, amount)?;

            tx.update_user_stats(&stats)?;
            tx.append_transaction(ctx.user_id, -amount, TransactionKind::SpentXp, None)?;

            let levelled_up = stats.level > before.level;
            if levelled_up {
                info!(
                    user_id = ctx.user_id,
                    from = before.level,
                    to = stats.level,
                    "level up"
                );
            }
            let newly_unlocked = evaluate_on_tx(tx, ctx.user_id)?;

            Ok(ConversionOutcome {
                amount,
                previous_level: before.level,
                levelled_up,
                stats,
                newly_unlocked,
            })
        })
    }

    /// Redeems one of the acting user's rewards at its captured cost.
    ///
    /// The reward stays available for later redemptions.
    pub fn redeem_reward(&self, ctx: &ActionContext, reward_id: i64) -> Result<RedemptionOutcome> {
        self.in_transaction(|tx| {
            let reward = tx.get_reward(reward_id)?;
            if reward.user_id != ctx.user_id {
                return Err(StorageError::not_found("reward", reward_id).into());
            }

            let before = tx.get_user_stats(ctx.user_id)?;
            let points_spent = reward.point_cost;
            let stats = plan_redemption(&before, points_spent)?;

            let redemption_id = tx.insert_redemption(reward.id, ctx.user_id, points_spent)?;
            tx.append_transaction(
                ctx.user_id,
                -points_spent,
                TransactionKind::SpentReward,
                Some(reward.id),
            )?;
            tx.update_user_stats(&stats)?;

            let newly_unlocked = evaluate_on_tx(tx, ctx.user_id)?;
            info!(reward_id, points_spent, "reward redeemed");

            Ok(RedemptionOutcome {
                reward,
                redemption_id,
                points_spent,
                stats,
                newly_unlocked,
            })
        })
    }

    /// Creates a reward priced from its value tier.
    pub fn create_reward(&self, ctx: &ActionContext, draft: &RewardDraft) -> Result<Reward> {
        let reward = self.store.create_reward(&NewReward {
            user_id: ctx.user_id,
            name: draft.name.clone(),
            description: draft.description.clone(),
            value: draft.value,
        })?;
        Ok(reward)
    }
}
