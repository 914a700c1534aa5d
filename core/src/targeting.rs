//! Publisher targeting keys surfaced as `targ*` attributes.

use serde_json::Value;

use crate::ad_service::{AdService, TargetingValue};
use crate::events::Attributes;

const ATTRIBUTE_PREFIX: &str = "targ";

/// Ordered list of targeting keys the host asked to report.
///
/// An empty registry is not "report nothing": it means every key the ad
/// library currently knows is reported.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetingKeyRegistry {
    keys: Vec<String>,
}

impl TargetingKeyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }

    /// Append a key. Duplicates are kept but only reported once.
    pub fn register(&mut self, key: impl Into<String>) {
        self.keys.push(key.into());
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }

    pub fn current_keys(&self) -> &[String] {
        &self.keys
    }

    /// Pull current values from the ad library and turn them into attributes.
    ///
    /// Keys that map to the same attribute name (`pos`, `Pos`) share one
    /// entry; the last key with a value wins.
    pub fn resolve(&self, service: &dyn AdService) -> Attributes {
        let live_keys;
        let keys: &[String] = if self.keys.is_empty() {
            live_keys = service.targeting_keys();
            &live_keys
        } else {
            &self.keys
        };

        let mut attributes = Attributes::new();
        for key in keys {
            let name = attribute_name(key);
            match service.targeting(key) {
                Some(TargetingValue::Scalar(value)) => {
                    attributes.insert(name, Value::String(value));
                }
                Some(TargetingValue::List(values)) if !values.is_empty() => {
                    attributes.insert(name, Value::String(values.join(",")));
                }
                Some(TargetingValue::List(_)) | None => {}
            }
        }
        attributes
    }
}

/// `pos` -> `targPos`.
pub fn attribute_name(key: &str) -> String {
    let mut chars = key.chars();
    let mut name = String::with_capacity(ATTRIBUTE_PREFIX.len() + key.len());
    name.push_str(ATTRIBUTE_PREFIX);
    if let Some(first) = chars.next() {
        name.extend(first.to_uppercase());
        name.push_str(chars.as_str());
    }
    name
}
