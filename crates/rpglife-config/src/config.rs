//! Configuration types and loading.
//!
//! The main entry point is [`RpgConfig`], which represents the contents of
//! `.rpglife/config.yaml` layered with `RPGLIFE_*` environment variables.
//! Configuration is loaded with [`load_config`] and saved with
//! [`save_config`].

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name of the configuration inside the data directory.
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Database file name used when the configuration does not name one.
pub const DEFAULT_DB_NAME: &str = "rpglife.db";

/// Prefix for environment overrides (`RPGLIFE_USER`, `RPGLIFE_JSON`, ...).
pub const ENV_PREFIX: &str = "RPGLIFE_";

/// Keys that may be overridden from the environment.
const ENV_KEYS: &[&str] = &["user", "db", "json", "color"];

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("failed to write config file: {0}")]
    WriteError(#[from] serde_yaml::Error),

    /// The merged file and environment values did not fit [`RpgConfig`].
    #[error("invalid configuration: {0}")]
    Invalid(#[from] figment::Error),

    #[error("no .rpglife directory found (run 'rpg init' first)")]
    DataDirNotFound,
}

/// A specialized `Result` type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// When to emit ANSI colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ColorChoice {
    /// Color when writing to a terminal that supports it.
    #[default]
    Auto,
    Always,
    Never,
}

/// The persisted configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RpgConfig {
    /// Username acted on when `--user` is not given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    /// Database path. Relative paths resolve against the data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db: Option<PathBuf>,

    /// Emit JSON by default.
    #[serde(default)]
    pub json: bool,

    #[serde(default)]
    pub color: ColorChoice,
}

impl RpgConfig {
    /// Where the database lives for a data directory.
    pub fn db_path(&self, data_dir: &Path) -> PathBuf {
        match &self.db {
            Some(p) if p.is_absolute() => p.clone(),
            Some(p) => data_dir.join(p),
            None => data_dir.join(DEFAULT_DB_NAME),
        }
    }
}

// ---------------------------------------------------------------------------
// Loading and saving
// ---------------------------------------------------------------------------

/// Builds the provider stack: defaults, then the YAML file, then `env`.
fn figment_for(data_dir: &Path, env: Env) -> Result<Figment> {
    let mut figment = Figment::from(Serialized::defaults(RpgConfig::default()));

    let config_path = data_dir.join(CONFIG_FILE_NAME);
    if config_path.exists() {
        // An empty file is valid and yields defaults.
        let content = std::fs::read_to_string(&config_path)?;
        if !content.trim().is_empty() {
            figment = figment.merge(Yaml::string(&content));
        }
    }

    Ok(figment.merge(env.only(ENV_KEYS)))
}

/// Load configuration for the given `.rpglife/` directory.
///
/// Returns [`RpgConfig::default`] values for anything neither the file nor
/// the environment sets. A missing file is not an error.
pub fn load_config(data_dir: &Path) -> Result<RpgConfig> {
    load_config_with_env(data_dir, Env::prefixed(ENV_PREFIX))
}

fn load_config_with_env(data_dir: &Path, env: Env) -> Result<RpgConfig> {
    Ok(figment_for(data_dir, env)?.extract()?)
}

/// Save configuration to `config.yaml` inside the given `.rpglife/` directory.
///
/// The directory is created if it does not exist.
pub fn save_config(data_dir: &Path, config: &RpgConfig) -> Result<()> {
    std::fs::create_dir_all(data_dir)?;

    let yaml = serde_yaml::to_string(config)?;
    std::fs::write(data_dir.join(CONFIG_FILE_NAME), yaml)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// An environment provider that never matches anything real.
    fn no_env() -> Env {
        Env::prefixed("RPGLIFE_TEST_UNSET_PREFIX_")
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_with_env(dir.path(), no_env()).unwrap();
        assert_eq!(cfg, RpgConfig::default());
        assert_eq!(cfg.color, ColorChoice::Auto);
    }

    #[test]
    fn empty_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "\n").unwrap();
        let cfg = load_config_with_env(dir.path(), no_env()).unwrap();
        assert_eq!(cfg, RpgConfig::default());
    }

    #[test]
    fn roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = RpgConfig {
            user: Some("ada".into()),
            db: Some(PathBuf::from("game.db")),
            json: true,
            color: ColorChoice::Never,
        };
        save_config(dir.path(), &cfg).unwrap();
        assert_eq!(load_config_with_env(dir.path(), no_env()).unwrap(), cfg);
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "user: grace\n").unwrap();
        let cfg = load_config_with_env(dir.path(), no_env()).unwrap();
        assert_eq!(cfg.user.as_deref(), Some("grace"));
        assert!(!cfg.json);
        assert_eq!(cfg.color, ColorChoice::Auto);
    }

    #[test]
    fn bad_value_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "color: sometimes\n").unwrap();
        let err = load_config_with_env(dir.path(), no_env()).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn db_path_resolution() {
        let base = Path::new("/data/.rpglife");
        let mut cfg = RpgConfig::default();
        assert_eq!(cfg.db_path(base), base.join(DEFAULT_DB_NAME));

        cfg.db = Some(PathBuf::from("other.db"));
        assert_eq!(cfg.db_path(base), base.join("other.db"));

        cfg.db = Some(PathBuf::from("/abs/x.db"));
        assert_eq!(cfg.db_path(base), PathBuf::from("/abs/x.db"));
    }
}
