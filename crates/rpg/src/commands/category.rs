//! `rpg category` -- list, create and delete categories.

use anyhow::Result;

use rpglife_engine::{CategoryDraft, Engine};
use rpglife_storage::Storage;

use crate::cli::{CategoryArgs, CategoryCommands};
use crate::context::RuntimeContext;
use crate::output::{format_category_row, output_json, output_table};

/// Execute the `rpg category` command.
pub fn run(ctx: &RuntimeContext, args: &CategoryArgs) -> Result<()> {
    let store = ctx.open_store()?;
    let actor = ctx.acting_user(&store)?;

    match &args.command {
        CategoryCommands::Add { name, icon, color } => {
            let category = Engine::new(&store).create_category(
                &actor,
                &CategoryDraft {
                    name: name.clone(),
                    icon: icon.clone(),
                    color: color.clone(),
                },
            )?;
            if ctx.json {
                output_json(&category);
            } else if !ctx.quiet {
                println!("Created category {}: {}", category.id, category.name);
            }
        }
        CategoryCommands::List => {
            let categories = store.list_categories(actor.user_id)?;
            if ctx.json {
                output_json(&categories);
            } else {
                let rows: Vec<Vec<String>> = categories.iter().map(format_category_row).collect();
                output_table(&["ID", "Name", "Kind"], &rows);
            }
        }
        CategoryCommands::Delete { id } => {
            store.delete_category(actor.user_id, *id)?;
            if ctx.json {
                output_json(&serde_json::json!({ "deleted": id }));
            } else if !ctx.quiet {
                println!("Deleted category {}", id);
            }
        }
    }
    Ok(())
}
