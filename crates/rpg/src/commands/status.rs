//! `rpg status` -- the progression dashboard.

use anyhow::Result;

use rpglife_engine::Engine;
use rpglife_ui::styles::{
    ICON_LOCKED, render_bold, render_level, render_muted, render_pass_icon, render_points,
    render_progress_bar, render_separator, render_streak,
};

use crate::context::RuntimeContext;
use crate::output::output_json;

const BAR_WIDTH: usize = 24;

/// Execute the `rpg status` command.
pub fn run(ctx: &RuntimeContext) -> Result<()> {
    let store = ctx.open_store()?;
    let actor = ctx.acting_user(&store)?;
    let dash = Engine::new(&store).dashboard(&actor)?;

    if ctx.json {
        output_json(&dash);
        return Ok(());
    }

    let stats = &dash.stats;
    println!(
        "{}  {}  {}",
        render_bold(&dash.user.username),
        render_level(stats.level),
        render_muted(&format!("x{:.1} points", dash.multiplier))
    );
    println!("{}", render_separator());
    println!(
        "XP      {} {} / {}",
        render_progress_bar(dash.xp_progress, BAR_WIDTH),
        stats.total_xp,
        dash.next_level_xp
    );
    println!("Points  {}", render_points(stats.available_points));
    println!(
        "Streak  {} {}",
        render_streak(stats.current_streak),
        render_muted(&format!("(best {})", stats.longest_streak))
    );
    println!("Tasks   {} / {} active", dash.active_tasks, dash.task_slots);
    println!(
        "Badges  {} / {} achievements",
        dash.achievements.unlocked, dash.achievements.total
    );

    println!();
    for status in &dash.features {
        let marker = if status.unlocked {
            render_pass_icon()
        } else {
            render_muted(ICON_LOCKED)
        };
        let line = format!("{} (Lv {})", status.feature.label(), status.required_level);
        if status.unlocked {
            println!("{marker} {line}");
        } else {
            println!("{marker} {}", render_muted(&line));
        }
    }

    Ok(())
}
