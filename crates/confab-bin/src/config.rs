//! Configuration: an explicit `--config` path, discovery of `confab.toml`
//! under the platform config directory, or built-in defaults when neither
//! exists. A missing discovered file is fine; a named file that cannot be
//! read or parsed is an error.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CONFIG_FILE: &str = "confab.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Nick shown on sent messages.
    pub nick: String,
    /// Home buffer greeting; a built-in one is picked when unset.
    pub greeting: Option<String>,
    pub scrollback: Scrollback,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            nick: "you".into(),
            greeting: None,
            scrollback: Scrollback::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Scrollback {
    /// Cap on retained lines per buffer; unset keeps everything.
    pub limit: Option<usize>,
}

/// Load the configuration, following the explicit path when given.
pub fn load_from(explicit: Option<PathBuf>) -> Result<Config, ConfigError> {
    let path = match explicit {
        Some(p) => p,
        None => match discover() {
            Some(p) => p,
            None => return Ok(Config::default()),
        },
    };
    load_file(&path)
}

fn discover() -> Option<PathBuf> {
    let p = dirs::config_dir()?.join("confab").join(CONFIG_FILE);
    p.exists().then_some(p)
}

fn load_file(path: &Path) -> Result<Config, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config = toml::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(target: "config", path = %path.display(), "config_loaded");
    Ok(config)
}
