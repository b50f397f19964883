//! `matchql.toml` style configuration.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{MatchError, MatchResult};
use crate::schema::Dialect;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub dialect: Dialect,
    pub database_url: Option<String>,
}

impl Config {
    /// Load from an explicit path, else the user config file, else defaults.
    pub fn load(path: Option<&Path>) -> MatchResult<Self> {
        if let Some(path) = path {
            if !path.exists() {
                return Err(MatchError::Config(format!("{} not found", path.display())));
            }
            return Self::from_path(path);
        }

        match default_path() {
            Some(path) if path.exists() => Self::from_path(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn from_path(path: &Path) -> MatchResult<Self> {
        let content = fs::read_to_string(path)?;
        let config = Self::parse(&content)?;
        tracing::debug!(path = %path.display(), dialect = %config.dialect, "loaded config");
        Ok(config)
    }

    pub fn parse(content: &str) -> MatchResult<Self> {
        Ok(toml::from_str(content)?)
    }
}

/// `<config dir>/matchql/config.toml`
pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("matchql").join("config.toml"))
}
