use serde::{Deserialize, Serialize};

/// In-view percentage at which a slot is considered viewable.
pub const DEFAULT_VISIBILITY_TRIGGER_LEVEL: u8 = 50;

/// Trigger levels are percentages, so anything above this is rejected.
pub const MAX_VISIBILITY_TRIGGER_LEVEL: u8 = 100;

fn default_trigger_level() -> u8 {
    DEFAULT_VISIBILITY_TRIGGER_LEVEL
}

/// Host configuration applied to a tracker when it is created.
///
/// Every field has a default so partial TOML files are accepted:
///
/// ```toml
/// visibility_trigger_level = 60
/// targeting_keys = ["pos", "age"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Percentage (0-100 inclusive) a slot must reach to become viewable.
    #[serde(default = "default_trigger_level")]
    pub visibility_trigger_level: u8,

    /// Targeting keys to report. Empty means "every key the ad library knows".
    #[serde(default)]
    pub targeting_keys: Vec<String>,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            visibility_trigger_level: DEFAULT_VISIBILITY_TRIGGER_LEVEL,
            targeting_keys: Vec::new(),
        }
    }
}
