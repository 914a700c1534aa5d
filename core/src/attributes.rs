//! Builds the attribute dictionary attached to every outbound slot event.
//!
//! Field order in the produced map:
//! identity (`name`, `slotId`, `contentUrl`, `elementId`), lifecycle timers,
//! `trunc`, response metadata (only when the slot has a response), then
//! targeting keys.

use chrono::NaiveDateTime;
use serde_json::{Value, json};
use url::Url;

use crate::ad_service::AdService;
use crate::events::{AdEvent, Attributes};
use crate::state::SlotState;
use crate::targeting::TargetingKeyRegistry;

/// Borrowed view of everything the builder reads.
pub struct AttributeBuilder<'a> {
    pub now: NaiveDateTime,
    pub targeting: &'a TargetingKeyRegistry,
    pub service: Option<&'a dyn AdService>,
}

impl AttributeBuilder<'_> {
    /// Assemble attributes for `event` against the slot's current state.
    /// Never fails: malformed pieces fall back and the rest is still built.
    pub fn build(&self, event: &AdEvent, state: &SlotState) -> Attributes {
        let slot = &event.slot;
        let mut attributes = Attributes::new();

        attributes.insert("name".into(), Value::String(slot.ad_unit_path.clone()));
        attributes.insert("slotId".into(), Value::String(slot.slot_id.clone()));
        attributes.insert("contentUrl".into(), json!(slot.content_url));
        attributes.insert("elementId".into(), Value::String(slot.element_id.clone()));

        for (timer, elapsed) in state.timer_readings(self.now) {
            attributes.insert(timer.attribute().into(), json!(elapsed));
        }

        let trunc = slot.content_url.as_deref().is_some_and(is_truncated);
        attributes.insert("trunc".into(), Value::Bool(trunc));

        if let Some(response) = &slot.response {
            attributes.insert("advertiserId".into(), json!(response.advertiser_id));
            attributes.insert("campaignId".into(), json!(response.campaign_id));
            attributes.insert("creativeId".into(), json!(response.creative_id));
            attributes.insert(
                "creativeTemplateId".into(),
                json!(response.creative_template_id),
            );
            attributes.insert("lineItemId".into(), json!(response.line_item_id));
            attributes.insert("labelIds".into(), json!(response.label_ids));
            if let Some(is_empty) = event.is_empty {
                attributes.insert("isEmpty".into(), Value::Bool(is_empty));
            }
            if let Some(size) = &event.size {
                attributes.insert("size".into(), json!(size));
            }
        }

        if let Some(service) = self.service {
            attributes.extend(self.targeting.resolve(service));
        }

        attributes
    }
}

/// `true` iff the URL carries a `trunc=1` query parameter.
/// Unparseable URLs count as not truncated.
pub fn is_truncated(content_url: &str) -> bool {
    match Url::parse(content_url) {
        Ok(url) => url
            .query_pairs()
            .any(|(key, value)| key == "trunc" && value == "1"),
        Err(err) => {
            tracing::debug!(content_url, %err, "unparseable content url, trunc=false");
            false
        }
    }
}
