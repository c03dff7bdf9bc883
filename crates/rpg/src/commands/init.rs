//! `rpg init` -- create a `.rpglife/` directory and database.

use std::env;
use std::fs;

use anyhow::{Context, Result, bail};

use rpglife_config::config::CONFIG_FILE_NAME;
use rpglife_config::{ensure_data_dir, load_config, save_config};
use rpglife_storage::{SqliteStore, Storage, StorageError};

use crate::cli::InitArgs;
use crate::context::RuntimeContext;
use crate::output::output_json;

const GITIGNORE_CONTENT: &str = "# rpglife database files
*.db
*.db-journal
*.db-wal
*.db-shm
";

/// Execute the `rpg init` command.
pub fn run(ctx: &RuntimeContext, args: &InitArgs) -> Result<()> {
    let cwd = env::current_dir().context("failed to get current directory")?;
    let data_dir = ensure_data_dir(&cwd)
        .with_context(|| format!("failed to create .rpglife in {}", cwd.display()))?;

    let mut config = load_config(&data_dir)?;
    let db_path = match &ctx.db_flag {
        Some(p) => p.clone(),
        None => config.db_path(&data_dir),
    };

    if !args.force && db_path.exists() {
        bail!(
            "found existing database at {}\n\n\
            This directory is already initialized.\n\
            Use --force to re-run initialization (existing data is kept).",
            db_path.display()
        );
    }

    let gitignore_path = data_dir.join(".gitignore");
    if !gitignore_path.exists() {
        fs::write(&gitignore_path, GITIGNORE_CONTENT).with_context(|| {
            format!("failed to create .gitignore: {}", gitignore_path.display())
        })?;
    }

    let store = SqliteStore::open(&db_path)
        .with_context(|| format!("failed to create database: {}", db_path.display()))?;

    let username = args.username.as_deref().map(str::trim);
    if let Some(name) = username {
        match store.get_user_by_name(name) {
            Ok(_) => {}
            Err(StorageError::NotFound { .. }) => {
                store.create_user(name)?;
            }
            Err(e) => return Err(e.into()),
        }
        config.user = Some(name.to_string());
    }

    if username.is_some() || !data_dir.join(CONFIG_FILE_NAME).exists() {
        save_config(&data_dir, &config)?;
    }

    if ctx.json {
        output_json(&serde_json::json!({
            "data_dir": data_dir,
            "database": db_path,
            "user": config.user,
        }));
    } else if !ctx.quiet {
        println!();
        println!("rpg initialized successfully!");
        println!();
        println!("  Database: {}", db_path.display());
        match &config.user {
            Some(name) => {
                println!("  Playing as: {}", name);
                println!();
                println!("Run `rpg task add \"My first quest\" --category Chores` to get started.");
            }
            None => {
                println!();
                println!("Run `rpg user add <name>` to create your character.");
            }
        }
        println!();
    }

    Ok(())
}
