//! `rpg analytics` -- completion and XP history.

use anyhow::Result;

use rpglife_engine::Engine;
use rpglife_ui::styles::{render_header, render_muted};

use crate::context::RuntimeContext;
use crate::output::{output_json, output_table, with_icon};

/// Execute the `rpg analytics` command.
pub fn run(ctx: &RuntimeContext) -> Result<()> {
    let store = ctx.open_store()?;
    let actor = ctx.acting_user(&store)?;
    let analytics = Engine::new(&store).analytics(&actor)?;

    if ctx.json {
        output_json(&analytics);
        return Ok(());
    }

    println!("{}", render_header("Last 7 days"));
    if analytics.completions_last_week.is_empty() {
        println!("{}", render_muted("no completions"));
    }
    for day in &analytics.completions_last_week {
        println!("{}  {:>3}  {}", day.day, day.count, "#".repeat(day.count.max(0) as usize));
    }

    println!();
    println!("{}", render_header("By category"));
    let rows: Vec<Vec<String>> = analytics
        .per_category
        .iter()
        .map(|c| vec![with_icon(&c.icon, &c.name), c.count.to_string()])
        .collect();
    if rows.is_empty() {
        println!("{}", render_muted("no completions"));
    }
    output_table(&["Category", "Completions"], &rows);

    println!();
    println!("{}", render_header("XP converted"));
    if analytics.xp_per_day.is_empty() {
        println!("{}", render_muted("no conversions"));
    }
    for day in &analytics.xp_per_day {
        println!("{}  {}", day.day, day.count);
    }

    Ok(())
}
