//! Runtime context for command execution.
//!
//! The [`RuntimeContext`] holds all the state a command handler needs:
//! global flags merged with `.rpglife/config.yaml` and `RPGLIFE_*`
//! environment variables, plus helpers to open the store and resolve the
//! acting user.

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use tracing::debug;

use rpglife_config::{ColorChoice, ConfigError, RpgConfig, find_data_dir, load_config};
use rpglife_engine::ActionContext;
use rpglife_storage::{SqliteStore, Storage, StorageError};

use crate::cli::GlobalArgs;

/// Runtime context passed to every command handler.
///
/// Constructed once in `main` after CLI parsing, before command dispatch.
#[derive(Debug)]
pub struct RuntimeContext {
    /// Discovered `.rpglife/` directory, if any.
    pub data_dir: Option<PathBuf>,

    /// Merged configuration (file, then environment).
    pub config: RpgConfig,

    /// `--db`, which wins over the configured path.
    pub db_flag: Option<PathBuf>,

    /// `--user`, which wins over the configured user.
    pub user_flag: Option<String>,

    /// Whether to produce JSON output.
    pub json: bool,

    /// Quiet mode: suppress non-essential output.
    pub quiet: bool,
}

impl RuntimeContext {
    /// Build a `RuntimeContext` from parsed global arguments.
    ///
    /// Precedence for every setting is flag > environment > file > default.
    pub fn from_global_args(global: &GlobalArgs) -> Result<Self> {
        let cwd = env::current_dir().context("failed to get current directory")?;
        let data_dir = find_data_dir(&cwd);

        let config = match &data_dir {
            Some(dir) => load_config(dir)
                .with_context(|| format!("failed to load config from {}", dir.display()))?,
            None => load_config(&cwd.join(rpglife_config::data_dir::DATA_DIR_NAME))
                .context("failed to load config from environment")?,
        };

        Ok(Self {
            json: global.json || config.json,
            db_flag: global.db.as_ref().map(PathBuf::from),
            user_flag: global.user.clone().filter(|u| !u.trim().is_empty()),
            quiet: global.quiet,
            data_dir,
            config,
        })
    }

    /// Explicit color preference, or `None` to detect.
    pub fn color_override(&self) -> Option<bool> {
        match self.config.color {
            ColorChoice::Auto => None,
            ColorChoice::Always => Some(true),
            ColorChoice::Never => Some(false),
        }
    }

    /// The discovered `.rpglife/` directory, or an error pointing at `rpg init`.
    pub fn require_data_dir(&self) -> Result<PathBuf, ConfigError> {
        self.data_dir.clone().ok_or(ConfigError::DataDirNotFound)
    }

    /// Returns the resolved database path.
    pub fn resolve_db_path(&self) -> Option<PathBuf> {
        if let Some(ref p) = self.db_flag {
            return Some(p.clone());
        }
        let dir = self.data_dir.as_ref()?;
        Some(self.config.db_path(dir))
    }

    /// Open the database, creating the schema on first use.
    ///
    /// A discovered database must already exist (created by `rpg init`);
    /// an explicit `--db` path is created on demand.
    pub fn open_store(&self) -> Result<SqliteStore> {
        let db_path = self
            .resolve_db_path()
            .context("no rpglife database found. Run 'rpg init' to create one.")?;

        if self.db_flag.is_none() && !db_path.exists() {
            bail!(
                "no rpglife database found at {}\nHint: run 'rpg init' to create a database",
                db_path.display()
            );
        }

        debug!(path = %db_path.display(), "resolved database");
        SqliteStore::open(&db_path)
            .with_context(|| format!("failed to open database: {}", db_path.display()))
    }

    /// The username selected by flag, environment or config.
    pub fn selected_user(&self) -> Option<&str> {
        self.user_flag.as_deref().or(self.config.user.as_deref())
    }

    /// Resolve the acting user into a request context for today.
    ///
    /// With no user selected, a database holding exactly one user acts as
    /// that user.
    pub fn acting_user(&self, store: &dyn Storage) -> Result<ActionContext> {
        let user = match self.selected_user() {
            Some(name) => match store.get_user_by_name(name) {
                Ok(user) => user,
                Err(StorageError::NotFound { .. }) => {
                    bail!("user '{name}' not found\nHint: run 'rpg user add {name}'")
                }
                Err(e) => return Err(e.into()),
            },
            None => {
                let mut users = store.list_users()?;
                if users.len() != 1 {
                    bail!("no user selected. Pass --user <name> or run 'rpg user use <name>'");
                }
                users.remove(0)
            }
        };
        debug!(user_id = user.id, username = %user.username, "acting user");
        Ok(ActionContext::now(user.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(user_flag: Option<&str>, config_user: Option<&str>) -> RuntimeContext {
        RuntimeContext {
            data_dir: None,
            config: RpgConfig {
                user: config_user.map(String::from),
                ..Default::default()
            },
            db_flag: None,
            user_flag: user_flag.map(String::from),
            json: false,
            quiet: false,
        }
    }

    #[test]
    fn flag_user_wins_over_config() {
        assert_eq!(context(Some("ada"), Some("bob")).selected_user(), Some("ada"));
        assert_eq!(context(None, Some("bob")).selected_user(), Some("bob"));
        assert_eq!(context(None, None).selected_user(), None);
    }

    #[test]
    fn sole_user_is_implied() {
        let store = SqliteStore::open_in_memory().unwrap();
        let ada = store.create_user("ada").unwrap();

        let ctx = context(None, None).acting_user(&store).unwrap();
        assert_eq!(ctx.user_id, ada.id);

        store.create_user("bob").unwrap();
        assert!(context(None, None).acting_user(&store).is_err());
    }

    #[test]
    fn unknown_user_has_hint() {
        let store = SqliteStore::open_in_memory().unwrap();
        let err = context(Some("zed"), None).acting_user(&store).unwrap_err();
        assert!(err.to_string().contains("rpg user add zed"));
    }

    #[test]
    fn missing_database_is_reported() {
        let ctx = context(None, None);
        assert!(ctx.resolve_db_path().is_none());
        assert!(matches!(ctx.require_data_dir(), Err(ConfigError::DataDirNotFound)));
        assert!(ctx.open_store().is_err());
    }
}
