//! `rpg reward` -- create, list, redeem and delete rewards.

use anyhow::{Context, Result};

use rpglife_core::tier::Tier;
use rpglife_engine::{ActionContext, Engine, RewardDraft};
use rpglife_storage::Storage;
use rpglife_ui::styles::{render_points, render_value, render_warn};

use crate::cli::{LimitArgs, RewardAddArgs, RewardArgs, RewardCommands};
use crate::context::RuntimeContext;
use crate::output::{format_reward_row, output_json, output_table, print_unlocks};

/// Execute the `rpg reward` command.
pub fn run(ctx: &RuntimeContext, args: &RewardArgs) -> Result<()> {
    let store = ctx.open_store()?;
    let actor = ctx.acting_user(&store)?;
    let engine = Engine::new(&store);

    match &args.command {
        RewardCommands::Add(add_args) => add(ctx, &engine, &actor, add_args),
        RewardCommands::List => list(ctx, &store, &actor),
        RewardCommands::Redeem { id } => redeem(ctx, &engine, &actor, *id),
        RewardCommands::Delete { id } => delete(ctx, &store, &actor, *id),
        RewardCommands::History(limit) => history(ctx, &store, &actor, *limit),
    }
}

fn add(ctx: &RuntimeContext, engine: &Engine<'_>, actor: &ActionContext, args: &RewardAddArgs) -> Result<()> {
    let value = Tier::new(args.value).context("invalid --value")?;
    let reward = engine.create_reward(
        actor,
        &RewardDraft {
            name: args.name.clone(),
            description: args.description.clone(),
            value,
        },
    )?;

    if ctx.json {
        output_json(&reward);
    } else if !ctx.quiet {
        println!(
            "Created reward {}: {} {} for {}",
            reward.id,
            reward.name,
            render_value(reward.value),
            render_points(reward.point_cost)
        );
    }
    Ok(())
}

fn list(ctx: &RuntimeContext, store: &dyn Storage, actor: &ActionContext) -> Result<()> {
    let rewards = store.list_rewards(actor.user_id)?;

    if ctx.json {
        output_json(&rewards);
        return Ok(());
    }
    if rewards.is_empty() {
        if !ctx.quiet {
            println!("No rewards yet. Run `rpg reward add <name> --value <1-5>`.");
        }
        return Ok(());
    }

    let rows: Vec<Vec<String>> = rewards.iter().map(format_reward_row).collect();
    output_table(&["ID", "Name", "Value", "Cost"], &rows);

    if !ctx.quiet {
        let balance = store.get_user_stats(actor.user_id)?.available_points;
        println!();
        println!("Balance: {}", render_points(balance));
    }
    Ok(())
}

fn redeem(ctx: &RuntimeContext, engine: &Engine<'_>, actor: &ActionContext, reward_id: i64) -> Result<()> {
    let outcome = engine.redeem_reward(actor, reward_id)?;

    if ctx.json {
        output_json(&outcome);
    } else if !ctx.quiet {
        println!(
            "Redeemed {} for {}. Enjoy!",
            outcome.reward.name,
            render_warn(&format!("{} pts", outcome.points_spent))
        );
        println!("Balance: {}", render_points(outcome.stats.available_points));
        print_unlocks(&outcome.newly_unlocked);
    }
    Ok(())
}

fn delete(ctx: &RuntimeContext, store: &dyn Storage, actor: &ActionContext, reward_id: i64) -> Result<()> {
    store.delete_reward(actor.user_id, reward_id)?;

    if ctx.json {
        output_json(&serde_json::json!({ "deleted": reward_id }));
    } else if !ctx.quiet {
        println!("Deleted reward {}", reward_id);
    }
    Ok(())
}

fn history(ctx: &RuntimeContext, store: &dyn Storage, actor: &ActionContext, args: LimitArgs) -> Result<()> {
    let redemptions = store.list_redemptions(actor.user_id, args.limit)?;

    if ctx.json {
        output_json(&redemptions);
        return Ok(());
    }
    if redemptions.is_empty() {
        if !ctx.quiet {
            println!("No redemptions yet.");
        }
        return Ok(());
    }

    let rows: Vec<Vec<String>> = redemptions
        .iter()
        .map(|r| {
            vec![
                r.redeemed_at.format("%Y-%m-%d %H:%M").to_string(),
                r.reward_name.clone(),
                format!("-{}", r.points_spent),
            ]
        })
        .collect();
    output_table(&["When", "Reward", "Points"], &rows);
    Ok(())
}
