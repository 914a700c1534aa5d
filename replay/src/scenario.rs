//! Scenario files: JSON lines describing what the ad library does and when.
//!
//! ```text
//! # comments and blank lines are skipped
//! {"at_ms": 0,   "targeting": {"pos": "top", "age": ["18", "25"]}}
//! {"at_ms": 0,   "ready": true}
//! {"at_ms": 10,  "event": {"type": "slotRequested", "slot": {"slotId": "S1"}}}
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer};
use slotscope_core::{AdEvent, TargetingValue};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("IO error reading {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{path:?} line {line}: {source}")]
    Parse {
        path: PathBuf,
        line: usize,
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Action {
    Event { event: AdEvent },
    Ready { ready: bool },
    Targeting {
        #[serde(deserialize_with = "ordered_targeting")]
        targeting: Vec<(String, TargetingValue)>,
    },
}

/// Keeps keys in file order; the ad library reports them in insertion order.
fn ordered_targeting<'de, D>(deserializer: D) -> Result<Vec<(String, TargetingValue)>, D::Error>
where
    D: Deserializer<'de>,
{
    let map = serde_json::Map::<String, serde_json::Value>::deserialize(deserializer)?;
    map.into_iter()
        .map(|(key, value)| {
            serde_json::from_value(value)
                .map(|value| (key, value))
                .map_err(serde::de::Error::custom)
        })
        .collect()
}

/// One scenario line.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Step {
    /// Offset from scenario start. Steps are replayed in file order.
    #[serde(default)]
    pub at_ms: i64,
    #[serde(flatten)]
    pub action: Action,
}

pub fn load(path: &Path) -> Result<Vec<Step>, ScenarioError> {
    let contents = fs::read_to_string(path).map_err(|source| ScenarioError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&contents).map_err(|(line, source)| ScenarioError::Parse {
        path: path.to_path_buf(),
        line,
        source,
    })
}

fn parse(contents: &str) -> Result<Vec<Step>, (usize, serde_json::Error)> {
    contents
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(line_no, line)| serde_json::from_str(line).map_err(|e| (line_no, e)))
        .collect()
}
