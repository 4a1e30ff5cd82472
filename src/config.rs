//! User configuration
//!
//! Read from ~/.config/mygit/config.json when present. Missing keys fall
//! back to defaults, and `MYGIT_DEFAULT_BRANCH` overrides the file.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Directory name used when no repository path is given
pub const DEFAULT_GIT_DIR: &str = ".git";

/// Branch HEAD points at after `init`
pub const DEFAULT_BRANCH: &str = "main";

/// Environment variable overriding the default branch
pub const DEFAULT_BRANCH_ENV: &str = "MYGIT_DEFAULT_BRANCH";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Repository directory, relative to the working directory unless absolute
    pub git_dir: PathBuf,
    /// Branch name written into HEAD on init
    pub default_branch: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            git_dir: PathBuf::from(DEFAULT_GIT_DIR),
            default_branch: DEFAULT_BRANCH.to_string(),
        }
    }
}

impl Config {
    /// Load from the user config directory, then apply env overrides
    pub fn load() -> Result<Self> {
        let mut config = match Self::default_path() {
            Some(path) if path.exists() => Self::from_file(&path)?,
            _ => Config::default(),
        };

        if let Ok(branch) = std::env::var(DEFAULT_BRANCH_ENV) {
            config.default_branch = branch;
        }
        config.validate()?;
        Ok(config)
    }

    /// Path of the user config file, if a config directory exists
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("mygit").join("config.json"))
    }

    /// Parse a config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let branch = &self.default_branch;
        if branch.is_empty()
            || branch.starts_with('/')
            || branch.ends_with('/')
            || branch.contains("..")
            || branch.chars().any(|c| c.is_whitespace() || c.is_control())
        {
            return Err(Error::Config(format!("Invalid default branch: '{}'", branch)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.git_dir, PathBuf::from(".git"));
        assert_eq!(config.default_branch, "main");
    }

    #[test]
    fn test_from_file_partial() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"default_branch": "trunk"}"#).unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.default_branch, "trunk");
        assert_eq!(config.git_dir, PathBuf::from(".git"));
    }

    #[test]
    fn test_from_file_malformed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = Config::from_file(&path).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_rejects_bad_branch() {
        for branch in ["", "a b", "../x", "x/", "/x"] {
            let config = Config {
                default_branch: branch.to_string(),
                ..Config::default()
            };
            assert!(config.validate().is_err(), "{:?}", branch);
        }
        let nested = Config {
            default_branch: "feature/x".to_string(),
            ..Config::default()
        };
        assert!(nested.validate().is_ok());
    }
}
