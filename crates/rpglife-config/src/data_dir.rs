//! Discovery and creation of the `.rpglife/` data directory.

use crate::config::ConfigError;
use std::path::{Path, PathBuf};

/// The name of the data directory.
pub const DATA_DIR_NAME: &str = ".rpglife";

/// Environment variable that overrides discovery.
pub const DATA_DIR_ENV: &str = "RPGLIFE_DIR";

/// Walk up the directory tree from `start` looking for a `.rpglife/`
/// directory.
///
/// `RPGLIFE_DIR` is checked first and wins if it names an existing
/// directory.
pub fn find_data_dir(start: &Path) -> Option<PathBuf> {
    if let Ok(env_dir) = std::env::var(DATA_DIR_ENV) {
        let env_path = PathBuf::from(&env_dir);
        if env_path.is_dir() {
            return Some(env_path);
        }
    }
    walk_up(start)
}

fn walk_up(start: &Path) -> Option<PathBuf> {
    let start = start.canonicalize().ok()?;
    start
        .ancestors()
        .map(|dir| dir.join(DATA_DIR_NAME))
        .find(|candidate| candidate.is_dir())
}

/// Ensure a `.rpglife/` directory exists at (or under) `path`.
///
/// Returns the path to the `.rpglife/` directory.
pub fn ensure_data_dir(path: &Path) -> Result<PathBuf, ConfigError> {
    let dir = if path.ends_with(DATA_DIR_NAME) {
        path.to_path_buf()
    } else {
        path.join(DATA_DIR_NAME)
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn found_from_child_directory() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join(DATA_DIR_NAME);
        std::fs::create_dir(&data).unwrap();

        let child = dir.path().join("notes").join("2026");
        std::fs::create_dir_all(&child).unwrap();

        let found = walk_up(&child).unwrap();
        assert_eq!(found.canonicalize().unwrap(), data.canonicalize().unwrap());
    }

    #[test]
    fn ensure_creates_once() {
        let dir = tempfile::tempdir().unwrap();
        let first = ensure_data_dir(dir.path()).unwrap();
        let second = ensure_data_dir(dir.path()).unwrap();
        assert!(first.is_dir());
        assert!(first.ends_with(DATA_DIR_NAME));
        assert_eq!(first, second);
    }

    #[test]
    fn ensure_accepts_named_dir() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join(DATA_DIR_NAME);
        assert_eq!(ensure_data_dir(&data).unwrap(), data);
    }
}
