//! `rpg convert` -- spend points on XP.

use anyhow::{Result, bail};

use rpglife_engine::Engine;
use rpglife_storage::Storage;
use rpglife_ui::styles::{render_level, render_pass, render_points};

use crate::cli::ConvertArgs;
use crate::context::RuntimeContext;
use crate::output::{output_json, print_unlocks};

/// Execute the `rpg convert` command.
pub fn run(ctx: &RuntimeContext, args: &ConvertArgs) -> Result<()> {
    let store = ctx.open_store()?;
    let actor = ctx.acting_user(&store)?;

    let amount = match (args.amount, args.all) {
        (Some(amount), _) => amount,
        (None, true) => store.get_user_stats(actor.user_id)?.available_points,
        (None, false) => bail!("specify an amount or --all"),
    };

    let outcome = Engine::new(&store).convert_points(&actor, amount)?;

    if ctx.json {
        output_json(&outcome);
    } else if !ctx.quiet {
        println!(
            "Converted {} into {} XP (total {} XP)",
            render_points(outcome.amount),
            outcome.amount,
            outcome.stats.total_xp
        );
        if outcome.levelled_up {
            println!(
                "{} {} -> {}",
                render_pass("Level up!"),
                render_level(outcome.previous_level),
                render_level(outcome.stats.level)
            );
        }
        print_unlocks(&outcome.newly_unlocked);
    }
    Ok(())
}
