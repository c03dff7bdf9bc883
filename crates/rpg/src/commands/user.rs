//! `rpg user` -- create, list and select users.

use anyhow::{Context, Result};

use rpglife_config::{load_config, save_config};
use rpglife_storage::Storage;

use crate::cli::{UserArgs, UserCommands};
use crate::context::RuntimeContext;
use crate::output::{output_json, output_table};

/// Execute the `rpg user` command.
pub fn run(ctx: &RuntimeContext, args: &UserArgs) -> Result<()> {
    match &args.command {
        UserCommands::Add { name } => add(ctx, name),
        UserCommands::List => list(ctx),
        UserCommands::Use { name } => select(ctx, name),
    }
}

fn add(ctx: &RuntimeContext, name: &str) -> Result<()> {
    let store = ctx.open_store()?;
    let user = store.create_user(name)?;

    // The first user of a project becomes its default.
    let became_default = ctx.config.user.is_none() && set_default_user(ctx, &user.username)?;

    if ctx.json {
        output_json(&user);
    } else if !ctx.quiet {
        println!("Created user {} (id {})", user.username, user.id);
        if became_default {
            println!("Playing as {} by default.", user.username);
        }
    }
    Ok(())
}

fn list(ctx: &RuntimeContext) -> Result<()> {
    let store = ctx.open_store()?;
    let users = store.list_users()?;

    if ctx.json {
        output_json(&users);
        return Ok(());
    }
    if users.is_empty() {
        if !ctx.quiet {
            println!("No users yet. Run `rpg user add <name>`.");
        }
        return Ok(());
    }

    let selected = ctx.selected_user();
    let rows: Vec<Vec<String>> = users
        .iter()
        .map(|u| {
            vec![
                u.id.to_string(),
                u.username.clone(),
                u.created_at.format("%Y-%m-%d").to_string(),
                if Some(u.username.as_str()) == selected { "*" } else { "" }.to_string(),
            ]
        })
        .collect();
    output_table(&["ID", "Name", "Created", "Active"], &rows);
    Ok(())
}

fn select(ctx: &RuntimeContext, name: &str) -> Result<()> {
    let store = ctx.open_store()?;
    let user = store.get_user_by_name(name)?;

    ctx.require_data_dir()?;
    set_default_user(ctx, &user.username)?;

    if ctx.json {
        output_json(&user);
    } else if !ctx.quiet {
        println!("Playing as {}.", user.username);
    }
    Ok(())
}

/// Records `username` as the default in the project's config file.
///
/// Returns `false` when there is no `.rpglife/` directory to write to.
fn set_default_user(ctx: &RuntimeContext, username: &str) -> Result<bool> {
    let Some(dir) = &ctx.data_dir else {
        return Ok(false);
    };
    let mut config = load_config(dir)?;
    config.user = Some(username.to_string());
    save_config(dir, &config)
        .with_context(|| format!("failed to save config in {}", dir.display()))?;
    Ok(true)
}
