//! `rpg achievements` -- evaluate and list achievements.

use anyhow::Result;
use serde::Serialize;

use rpglife_core::achievement::{Achievement, AchievementProgress, AchievementStatus};
use rpglife_engine::{AchievementSummary, Engine};
use rpglife_ui::styles::{ICON_LOCKED, render_header, render_muted, render_pass_icon, render_progress_bar};

use crate::context::RuntimeContext;
use crate::output::{output_json, print_unlocks, with_icon};

const BAR_WIDTH: usize = 10;

#[derive(Serialize)]
struct AchievementsView {
    newly_unlocked: Vec<Achievement>,
    summary: AchievementSummary,
    achievements: Vec<AchievementProgress>,
}

/// Execute the `rpg achievements` command.
///
/// Evaluates first, so anything earned but not yet recorded shows up.
pub fn run(ctx: &RuntimeContext) -> Result<()> {
    let store = ctx.open_store()?;
    let actor = ctx.acting_user(&store)?;
    let engine = Engine::new(&store);

    let newly_unlocked = engine.check_achievements(&actor)?;
    let report = engine.achievement_progress(&actor)?;
    let summary = AchievementSummary::of(&report);

    if ctx.json {
        output_json(&AchievementsView {
            newly_unlocked,
            summary,
            achievements: report,
        });
        return Ok(());
    }

    print_unlocks(&newly_unlocked);
    println!("{} {}/{}", render_header("Achievements"), summary.unlocked, summary.total);

    let mut group = None;
    for entry in &report {
        let a = &entry.achievement;
        if group != Some(a.group) {
            group = Some(a.group);
            println!();
            println!("{}", render_muted(a.group.as_str()));
        }
        let name = with_icon(&a.icon, &a.name);
        match &entry.status {
            AchievementStatus::Unlocked { unlocked_at } => println!(
                "{} {}  {}",
                render_pass_icon(),
                name,
                render_muted(&unlocked_at.format("%Y-%m-%d").to_string())
            ),
            AchievementStatus::Locked { progress } => println!(
                "{} {}  {} {}",
                render_muted(ICON_LOCKED),
                name,
                render_progress_bar(*progress, BAR_WIDTH),
                render_muted(&a.description)
            ),
        }
    }
    Ok(())
}
