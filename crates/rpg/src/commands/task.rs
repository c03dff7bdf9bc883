//! `rpg task` -- create, list, complete and delete tasks.

use anyhow::{Context, Result, bail};

use rpglife_core::model::Category;
use rpglife_core::streak::StreakChange;
use rpglife_core::tier::Tier;
use rpglife_engine::{ActionContext, Engine, TaskDraft};
use rpglife_storage::Storage;
use rpglife_ui::styles::{render_difficulty, render_level, render_pass, render_points, render_streak};

use crate::cli::{LimitArgs, TaskAddArgs, TaskArgs, TaskCommands};
use crate::context::RuntimeContext;
use crate::output::{format_task_row, output_json, output_table, print_unlocks};

/// Execute the `rpg task` command.
pub fn run(ctx: &RuntimeContext, args: &TaskArgs) -> Result<()> {
    let store = ctx.open_store()?;
    let actor = ctx.acting_user(&store)?;
    let engine = Engine::new(&store);

    match &args.command {
        TaskCommands::Add(add_args) => add(ctx, &engine, &actor, add_args),
        TaskCommands::List => list(ctx, &store, &actor),
        TaskCommands::Done { id } => done(ctx, &engine, &actor, *id),
        TaskCommands::Delete { id } => delete(ctx, &store, &actor, *id),
        TaskCommands::History(limit) => history(ctx, &store, &actor, *limit),
    }
}

/// Finds a category visible to the user by ID or case-insensitive name.
pub fn resolve_category(store: &dyn Storage, actor: &ActionContext, key: &str) -> Result<Category> {
    let categories = store.list_categories(actor.user_id)?;
    let by_id = key.parse::<i64>().ok();
    categories
        .into_iter()
        .find(|c| Some(c.id) == by_id || c.name.eq_ignore_ascii_case(key))
        .with_context(|| format!("category '{key}' not found (see 'rpg category list')"))
}

fn add(ctx: &RuntimeContext, engine: &Engine<'_>, actor: &ActionContext, args: &TaskAddArgs) -> Result<()> {
    let difficulty = Tier::new(args.difficulty).context("invalid --difficulty")?;
    let category = resolve_category(engine.store(), actor, &args.category)?;

    let task = engine.create_task(
        actor,
        &TaskDraft {
            category_id: category.id,
            name: args.name.clone(),
            description: args.description.clone(),
            difficulty,
            is_recurring: args.recurring,
        },
    )?;

    if ctx.json {
        output_json(&task);
    } else if !ctx.quiet {
        println!(
            "Created task {}: {} [{}] in {}",
            task.id,
            task.name,
            render_difficulty(task.difficulty),
            category.name
        );
    }
    Ok(())
}

fn list(ctx: &RuntimeContext, store: &dyn Storage, actor: &ActionContext) -> Result<()> {
    let tasks = store.list_active_tasks(actor.user_id)?;

    if ctx.json {
        output_json(&tasks);
        return Ok(());
    }
    if tasks.is_empty() {
        if !ctx.quiet {
            println!("No active tasks.");
        }
        return Ok(());
    }

    let rows: Vec<Vec<String>> = tasks.iter().map(format_task_row).collect();
    output_table(&["ID", "Name", "Category", "Difficulty", "Recurring"], &rows);
    Ok(())
}

fn done(ctx: &RuntimeContext, engine: &Engine<'_>, actor: &ActionContext, task_id: i64) -> Result<()> {
    let outcome = engine.complete_task(actor, task_id)?;

    if ctx.json {
        output_json(&outcome);
        return Ok(());
    }
    if ctx.quiet {
        return Ok(());
    }

    println!(
        "{} {} (+{})",
        render_pass("Completed"),
        outcome.task.name,
        render_points(outcome.points_earned)
    );
    match outcome.streak {
        StreakChange::Started => println!("Streak started: {}", render_streak(outcome.stats.current_streak)),
        StreakChange::Extended => println!("Streak extended: {}", render_streak(outcome.stats.current_streak)),
        StreakChange::Unchanged => {}
    }
    println!(
        "Balance: {}  {}",
        render_points(outcome.stats.available_points),
        render_level(outcome.stats.level)
    );
    print_unlocks(&outcome.newly_unlocked);
    Ok(())
}

fn delete(ctx: &RuntimeContext, store: &dyn Storage, actor: &ActionContext, task_id: i64) -> Result<()> {
    let task = store.get_task(task_id)?;
    if task.user_id != actor.user_id || !task.is_active {
        bail!("task {task_id} not found");
    }
    store.delete_task(actor.user_id, task_id)?;

    if ctx.json {
        output_json(&serde_json::json!({ "deleted": task_id }));
    } else if !ctx.quiet {
        println!("Deleted task {}: {}", task.id, task.name);
    }
    Ok(())
}

fn history(ctx: &RuntimeContext, store: &dyn Storage, actor: &ActionContext, args: LimitArgs) -> Result<()> {
    let completions = store.list_completions(actor.user_id, args.limit)?;

    if ctx.json {
        output_json(&completions);
        return Ok(());
    }
    if completions.is_empty() {
        if !ctx.quiet {
            println!("No completions yet.");
        }
        return Ok(());
    }

    let rows: Vec<Vec<String>> = completions
        .iter()
        .map(|c| {
            vec![
                c.completed_at.format("%Y-%m-%d %H:%M").to_string(),
                c.task_name.clone(),
                format!("+{}", c.points_earned),
            ]
        })
        .collect();
    output_table(&["When", "Task", "Points"], &rows);
    Ok(())
}
