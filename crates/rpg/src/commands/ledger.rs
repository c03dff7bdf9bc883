//! `rpg ledger` -- recent point transactions.

use anyhow::Result;

use rpglife_storage::Storage;
use rpglife_ui::styles::render_amount;

use crate::cli::LimitArgs;
use crate::context::RuntimeContext;
use crate::output::{output_json, output_table};

/// Execute the `rpg ledger` command.
pub fn run(ctx: &RuntimeContext, args: &LimitArgs) -> Result<()> {
    let store = ctx.open_store()?;
    let actor = ctx.acting_user(&store)?;
    let entries = store.list_transactions(actor.user_id, args.limit)?;

    if ctx.json {
        output_json(&entries);
        return Ok(());
    }
    if entries.is_empty() {
        if !ctx.quiet {
            println!("No transactions yet.");
        }
        return Ok(());
    }

    let rows: Vec<Vec<String>> = entries
        .iter()
        .map(|t| {
            vec![
                t.created_at.format("%Y-%m-%d %H:%M").to_string(),
                t.kind.to_string(),
                render_amount(t.amount, t.kind),
                t.reference_id.map(|r| r.to_string()).unwrap_or_default(),
            ]
        })
        .collect();
    output_table(&["When", "Kind", "Amount", "Ref"], &rows);
    Ok(())
}
