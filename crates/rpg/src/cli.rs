//! Clap CLI definitions for the `rpg` command.

use clap::{Args, Parser, Subcommand};

/// rpg -- Turn your to-do list into a role-playing game.
///
/// Complete tasks to earn points, convert points into XP to level up,
/// spend points on rewards, and unlock achievements along the way.
#[derive(Parser, Debug)]
#[command(
    name = "rpg",
    about = "Turn your to-do list into a role-playing game",
    long_about = "Complete tasks to earn points, convert points into XP to level up, spend points on rewards, and unlock achievements along the way.",
    version,
    propagate_version = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Global flags available to all subcommands.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Database path (default: auto-discover .rpglife/rpglife.db).
    #[arg(long, global = true)]
    pub db: Option<String>,

    /// User to act as (default: $RPGLIFE_USER, then the configured user).
    #[arg(long, global = true)]
    pub user: Option<String>,

    /// Output in JSON format.
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable verbose/debug output.
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output (errors only).
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,
}

/// All available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a .rpglife directory and database in the current directory.
    Init(InitArgs),

    /// Manage users.
    User(UserArgs),

    /// Show level, XP, points, streak and unlocked features.
    #[command(alias = "dashboard")]
    Status,

    /// Manage and complete tasks.
    Task(TaskArgs),

    /// Manage and redeem rewards.
    Reward(RewardArgs),

    /// Convert points into XP.
    Convert(ConvertArgs),

    /// Show achievement progress and unlock anything newly earned.
    Achievements,

    /// Manage task categories.
    Category(CategoryArgs),

    /// Show recent point transactions.
    Ledger(LimitArgs),

    /// Show completion and XP history.
    Analytics,

    /// Generate shell completion scripts.
    Completion(CompletionArgs),

    /// Print version information.
    Version,
}

// ---------------------------------------------------------------------------
// Init
// ---------------------------------------------------------------------------

/// Arguments for `rpg init`.
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Create this user and make it the default.
    pub username: Option<String>,

    /// Re-run initialization even if a database already exists.
    #[arg(long)]
    pub force: bool,
}

// ---------------------------------------------------------------------------
// User
// ---------------------------------------------------------------------------

/// Arguments for `rpg user`.
#[derive(Args, Debug)]
pub struct UserArgs {
    #[command(subcommand)]
    pub command: UserCommands,
}

#[derive(Subcommand, Debug)]
pub enum UserCommands {
    /// Create a user. The first user becomes the default.
    Add {
        /// Unique username.
        name: String,
    },
    /// List users.
    List,
    /// Make an existing user the default.
    Use {
        name: String,
    },
}

// ---------------------------------------------------------------------------
// Task
// ---------------------------------------------------------------------------

/// Arguments for `rpg task`.
#[derive(Args, Debug)]
pub struct TaskArgs {
    #[command(subcommand)]
    pub command: TaskCommands,
}

#[derive(Subcommand, Debug)]
pub enum TaskCommands {
    /// Create a task.
    Add(TaskAddArgs),
    /// List active tasks.
    List,
    /// Complete a task and earn its points.
    #[command(alias = "complete")]
    Done {
        /// Task ID.
        id: i64,
    },
    /// Delete an active task.
    Delete {
        /// Task ID.
        id: i64,
    },
    /// Show recent completions.
    History(LimitArgs),
}

/// Arguments for `rpg task add`.
#[derive(Args, Debug)]
pub struct TaskAddArgs {
    /// Task name.
    pub name: String,

    /// Category name or ID.
    #[arg(short = 'c', long)]
    pub category: String,

    /// Difficulty from 1 (trivial) to 5 (epic).
    #[arg(short = 'd', long, default_value_t = 1)]
    pub difficulty: i64,

    /// Optional description.
    #[arg(long, default_value = "")]
    pub description: String,

    /// Keep the task active after completion (unlocks at level 5).
    #[arg(short = 'r', long)]
    pub recurring: bool,
}

// ---------------------------------------------------------------------------
// Reward
// ---------------------------------------------------------------------------

/// Arguments for `rpg reward`.
#[derive(Args, Debug)]
pub struct RewardArgs {
    #[command(subcommand)]
    pub command: RewardCommands,
}

#[derive(Subcommand, Debug)]
pub enum RewardCommands {
    /// Create a reward.
    Add(RewardAddArgs),
    /// List rewards, cheapest first.
    List,
    /// Spend points on a reward.
    Redeem {
        /// Reward ID.
        id: i64,
    },
    /// Remove a reward from the list.
    Delete {
        /// Reward ID.
        id: i64,
    },
    /// Show recent redemptions.
    History(LimitArgs),
}

/// Arguments for `rpg reward add`.
#[derive(Args, Debug)]
pub struct RewardAddArgs {
    /// Reward name.
    pub name: String,

    /// Value from 1 (small treat) to 5 (big splurge). Sets the point cost.
    #[arg(long, default_value_t = 1)]
    pub value: i64,

    /// Optional description.
    #[arg(long, default_value = "")]
    pub description: String,
}

// ---------------------------------------------------------------------------
// Convert
// ---------------------------------------------------------------------------

/// Arguments for `rpg convert`.
#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Points to convert into XP (1:1).
    #[arg(allow_negative_numbers = true)]
    pub amount: Option<i64>,

    /// Convert the entire balance.
    #[arg(long, conflicts_with = "amount")]
    pub all: bool,
}

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

/// Arguments for `rpg category`.
#[derive(Args, Debug)]
pub struct CategoryArgs {
    #[command(subcommand)]
    pub command: CategoryCommands,
}

#[derive(Subcommand, Debug)]
pub enum CategoryCommands {
    /// Create a custom category (unlocks at level 3).
    Add {
        name: String,
        /// Emoji or short symbol.
        #[arg(long, default_value = "")]
        icon: String,
        /// Hex color, e.g. #4A90D9.
        #[arg(long, default_value = "")]
        color: String,
    },
    /// List default and custom categories.
    List,
    /// Delete a custom category that has no tasks.
    Delete {
        /// Category ID.
        id: i64,
    },
}

// ---------------------------------------------------------------------------
// Shared
// ---------------------------------------------------------------------------

/// A row limit for history listings.
#[derive(Args, Debug, Clone, Copy)]
pub struct LimitArgs {
    /// Maximum number of rows.
    #[arg(short = 'n', long, default_value_t = 20)]
    pub limit: usize,
}

// ---------------------------------------------------------------------------
// Completion
// ---------------------------------------------------------------------------

/// Arguments for `rpg completion`.
#[derive(Args, Debug)]
pub struct CompletionArgs {
    #[command(subcommand)]
    pub command: CompletionCommands,
}

/// Completion subcommands.
#[derive(Subcommand, Debug)]
pub enum CompletionCommands {
    /// Generate Bash completions.
    Bash,
    /// Generate Zsh completions.
    Zsh,
    /// Generate Fish completions.
    Fish,
    /// Generate PowerShell completions.
    Powershell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_task_add() {
        let cli = Cli::parse_from([
            "rpg", "--user", "ada", "task", "add", "Run", "-c", "Health", "-d", "3", "--recurring",
        ]);
        assert_eq!(cli.global.user.as_deref(), Some("ada"));
        match cli.command {
            Some(Commands::Task(TaskArgs {
                command: TaskCommands::Add(args),
            })) => {
                assert_eq!(args.name, "Run");
                assert_eq!(args.category, "Health");
                assert_eq!(args.difficulty, 3);
                assert!(args.recurring);
            }
            other => panic!("unexpected parse: {other:?}"),
        }
    }

    #[test]
    fn convert_all_conflicts_with_amount() {
        assert!(Cli::try_parse_from(["rpg", "convert", "10", "--all"]).is_err());
    }
}
