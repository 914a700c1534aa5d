//! Loading and saving tracker configuration files.
//!
//! Configuration is a small TOML file (see [`TrackerConfig`]). A file that
//! parses but carries an out-of-range trigger level is accepted with the
//! default level, the same way the runtime setter rejects bad values.

use std::fs;
use std::path::{Path, PathBuf};

use slotscope_types::{MAX_VISIBILITY_TRIGGER_LEVEL, TrackerConfig};
use thiserror::Error;

/// Errors that can occur during config loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Parse error in {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Serialize error for {path:?}: {source}")]
    Serialize {
        path: PathBuf,
        source: toml::ser::Error,
    },
}

/// Load a single TOML config file
pub fn load_file(path: &Path) -> Result<TrackerConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let config = parse(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(?path, ?config, "loaded tracker config");
    Ok(config)
}

const TRIGGER_LEVEL_KEY: &str = "visibility_trigger_level";

/// Parse config text, replacing an out-of-range trigger level with the default.
///
/// The level is checked as a plain integer before it is narrowed, so `300`
/// and `-1` fall back the same way `150` does.
pub fn parse(contents: &str) -> Result<TrackerConfig, toml::de::Error> {
    let mut table: toml::Table = toml::from_str(contents)?;
    let out_of_range = match table.get(TRIGGER_LEVEL_KEY) {
        Some(toml::Value::Integer(level)) => {
            !(0..=i64::from(MAX_VISIBILITY_TRIGGER_LEVEL)).contains(level)
        }
        _ => false,
    };
    if out_of_range {
        tracing::warn!(
            level = ?table.get(TRIGGER_LEVEL_KEY),
            "visibility trigger level out of range, using default"
        );
        table.remove(TRIGGER_LEVEL_KEY);
    }
    toml::Value::Table(table).try_into()
}

/// Save a config to a TOML file
pub fn save_file(path: &Path, config: &TrackerConfig) -> Result<(), ConfigError> {
    let contents = toml::to_string_pretty(config).map_err(|source| ConfigError::Serialize {
        path: path.to_path_buf(),
        source,
    })?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    fs::write(path, contents).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Load `path` if given, else the default location if it exists, else defaults.
pub fn load_or_default(path: Option<&Path>) -> Result<TrackerConfig, ConfigError> {
    match path {
        Some(path) => load_file(path),
        None => match default_config_path() {
            Some(path) if path.exists() => load_file(&path),
            _ => Ok(TrackerConfig::default()),
        },
    }
}

/// Get the default config file location
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("slotscope").join("tracker.toml"))
}
