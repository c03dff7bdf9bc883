//! `rpg` -- a gamified to-do list.
//!
//! Parses CLI arguments with clap, resolves the runtime context, and
//! dispatches to command handlers.

mod cli;
mod commands;
mod context;
mod output;

use std::sync::atomic::{AtomicBool, Ordering};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use context::RuntimeContext;

/// Tracks whether a Ctrl+C has already been received.
static CTRLC_RECEIVED: AtomicBool = AtomicBool::new(false);

/// Filter used by `--verbose` when `RUST_LOG` is unset.
const VERBOSE_FILTER: &str = "rpg=debug,rpglife=debug";

fn main() {
    // First Ctrl+C: exit cleanly. Second: force exit.
    let _ = ctrlc::set_handler(|| {
        if CTRLC_RECEIVED.swap(true, Ordering::SeqCst) {
            std::process::exit(1);
        }
        std::process::exit(0);
    });

    let cli = Cli::parse();
    init_logging(cli.global.verbose);

    let result = RuntimeContext::from_global_args(&cli.global).and_then(|ctx| {
        rpglife_ui::terminal::set_color_override(ctx.color_override());
        dispatch(&ctx, cli.command)
    });

    if let Err(e) = result {
        if cli.global.json {
            let err_json = serde_json::json!({
                "error": format!("{:#}", e),
            });
            if let Ok(s) = serde_json::to_string_pretty(&err_json) {
                eprintln!("{}", s);
            }
        } else {
            eprintln!("Error: {:#}", e);
        }
        std::process::exit(1);
    }
}

/// Installs a stderr subscriber when `--verbose` or `RUST_LOG` asks for one.
fn init_logging(verbose: bool) {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) if verbose => EnvFilter::new(VERBOSE_FILTER),
        Err(_) => return,
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn dispatch(ctx: &RuntimeContext, command: Option<Commands>) -> anyhow::Result<()> {
    match command {
        Some(Commands::Init(args)) => commands::init::run(ctx, &args),
        Some(Commands::User(args)) => commands::user::run(ctx, &args),
        Some(Commands::Status) => commands::status::run(ctx),
        Some(Commands::Task(args)) => commands::task::run(ctx, &args),
        Some(Commands::Reward(args)) => commands::reward::run(ctx, &args),
        Some(Commands::Convert(args)) => commands::convert::run(ctx, &args),
        Some(Commands::Achievements) => commands::achievements::run(ctx),
        Some(Commands::Category(args)) => commands::category::run(ctx, &args),
        Some(Commands::Ledger(args)) => commands::ledger::run(ctx, &args),
        Some(Commands::Analytics) => commands::analytics::run(ctx),
        Some(Commands::Completion(args)) => commands::completion::run(ctx, &args),
        Some(Commands::Version) => commands::version::run(ctx),
        None => {
            use clap::CommandFactory;
            Cli::command().print_help().ok();
            println!();
            Ok(())
        }
    }
}
