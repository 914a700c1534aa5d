use serde::{Deserialize, Serialize};

/// Ad library events the tracker listens to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AdEventKind {
    SlotRequested,
    SlotResponseReceived,
    SlotRenderEnded,
    SlotOnload,
    SlotVisibilityChanged,
    ImpressionViewable,
}

impl AdEventKind {
    /// Every event kind, in the order listeners are registered.
    pub const ALL: [AdEventKind; 6] = [
        AdEventKind::SlotRenderEnded,
        AdEventKind::ImpressionViewable,
        AdEventKind::SlotOnload,
        AdEventKind::SlotVisibilityChanged,
        AdEventKind::SlotRequested,
        AdEventKind::SlotResponseReceived,
    ];

    /// Event name as the ad library spells it.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SlotRequested => "slotRequested",
            Self::SlotResponseReceived => "slotResponseReceived",
            Self::SlotRenderEnded => "slotRenderEnded",
            Self::SlotOnload => "slotOnload",
            Self::SlotVisibilityChanged => "slotVisibilityChanged",
            Self::ImpressionViewable => "impressionViewable",
        }
    }
}

/// Creative size reported on render-end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AdSize {
    /// `[width, height]` in pixels.
    Fixed([u32; 2]),
    /// Named sizes such as `"fluid"`.
    Named(String),
}

/// Metadata about the ad that filled a slot.
///
/// Every id is optional: the ad library reports `null` for backfill and
/// house ads, and the tracker forwards that as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResponseInfo {
    pub advertiser_id: Option<u64>,
    pub campaign_id: Option<u64>,
    pub creative_id: Option<u64>,
    pub creative_template_id: Option<u64>,
    pub line_item_id: Option<u64>,
    pub label_ids: Option<Vec<u64>>,
}

/// Snapshot of the slot handle an event refers to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotInfo {
    pub slot_id: String,
    #[serde(default)]
    pub ad_unit_path: String,
    #[serde(default)]
    pub element_id: String,
    /// Not known until the slot has been requested at least once.
    #[serde(default)]
    pub content_url: Option<String>,
    #[serde(default)]
    pub response: Option<ResponseInfo>,
}

/// A single event delivered by the ad library's event bus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdEvent {
    #[serde(rename = "type")]
    pub kind: AdEventKind,
    pub slot: SlotInfo,
    /// Render-end only.
    #[serde(default)]
    pub is_empty: Option<bool>,
    /// Render-end only.
    #[serde(default)]
    pub size: Option<AdSize>,
    /// Visibility-changed only.
    #[serde(default)]
    pub in_view_percentage: Option<u8>,
    #[serde(default)]
    pub service_name: Option<String>,
}

impl AdEvent {
    pub fn new(kind: AdEventKind, slot: SlotInfo) -> Self {
        Self {
            kind,
            slot,
            is_empty: None,
            size: None,
            in_view_percentage: None,
            service_name: None,
        }
    }

    pub fn slot_id(&self) -> &str {
        &self.slot.slot_id
    }
}
