//! Maps raw ad-library events to slot telemetry.

use chrono::NaiveDateTime;
use serde_json::{Value, json};

use crate::ad_service::AdService;
use crate::attributes::AttributeBuilder;
use crate::events::{AdEvent, AdEventKind, Attributes, SlotEventName};
use crate::state::{SlotStateStore, SlotTimer};
use crate::targeting::TargetingKeyRegistry;
use crate::visibility::{VisibilityInput, VisibilityTransition, VisibilityTrigger};

/// Event ready to hand to the sink.
pub(super) type Outbound = (SlotEventName, Attributes);

/// Mutable state owned by one tracker.
#[derive(Debug, Default)]
pub(super) struct TrackerState {
    pub slots: SlotStateStore,
    pub targeting: TargetingKeyRegistry,
    pub trigger: VisibilityTrigger,
}

impl TrackerState {
    /// Update slot state for `event` and return the telemetry it produces.
    pub fn route(
        &mut self,
        event: &AdEvent,
        now: NaiveDateTime,
        service: Option<&dyn AdService>,
    ) -> Option<Outbound> {
        match event.kind {
            AdEventKind::SlotRequested => Some(self.lifecycle(
                event,
                SlotEventName::SlotRequested,
                SlotTimer::Requested,
                now,
                service,
            )),
            AdEventKind::SlotResponseReceived => Some(self.lifecycle(
                event,
                SlotEventName::SlotReceived,
                SlotTimer::Received,
                now,
                service,
            )),
            AdEventKind::SlotRenderEnded => Some(self.lifecycle(
                event,
                SlotEventName::SlotRendered,
                SlotTimer::Rendered,
                now,
                service,
            )),
            AdEventKind::SlotOnload => Some(self.lifecycle(
                event,
                SlotEventName::SlotLoad,
                SlotTimer::Load,
                now,
                service,
            )),
            AdEventKind::SlotVisibilityChanged => {
                let Some(percent) = event.in_view_percentage else {
                    tracing::debug!(
                        slot_id = event.slot_id(),
                        "visibility change without percentage, ignored"
                    );
                    return None;
                };
                self.visibility(event, VisibilityInput::Reading(percent), now, service)
            }
            AdEventKind::ImpressionViewable => {
                self.visibility(event, VisibilityInput::ImpressionViewable, now, service)
            }
        }
    }

    /// Report the event with current timings, then restart its own timer.
    fn lifecycle(
        &mut self,
        event: &AdEvent,
        name: SlotEventName,
        timer: SlotTimer,
        now: NaiveDateTime,
        service: Option<&dyn AdService>,
    ) -> Outbound {
        let builder = AttributeBuilder {
            now,
            targeting: &self.targeting,
            service,
        };
        let state = self.slots.get_or_create(event.slot_id());
        let attributes = builder.build(event, state);
        state.restart_timer(timer, now);
        (name, attributes)
    }

    fn visibility(
        &mut self,
        event: &AdEvent,
        input: VisibilityInput,
        now: NaiveDateTime,
        service: Option<&dyn AdService>,
    ) -> Option<Outbound> {
        let state = self.slots.get_or_create(event.slot_id());
        let transition = self.trigger.advance(state, input, now)?;

        let builder = AttributeBuilder {
            now,
            targeting: &self.targeting,
            service,
        };
        let mut attributes = builder.build(event, state);

        if let Some(service_name) = &event.service_name {
            attributes.insert("serviceName".into(), Value::String(service_name.clone()));
        }
        if let VisibilityInput::Reading(percent) = input {
            attributes.insert("visibilityLevel".into(), json!(percent));
        }
        attributes.insert(
            "visibilityTriggerLevel".into(),
            json!(self.trigger.level()),
        );

        let name = match transition {
            VisibilityTransition::BecameVisible {
                time_since_last_hidden_ms,
            } => {
                attributes.insert(
                    "timeSinceLastSlotHidden".into(),
                    json!(time_since_last_hidden_ms),
                );
                SlotEventName::SlotViewable
            }
            VisibilityTransition::BecameHidden { time_visible_ms } => {
                attributes.insert("timeVisible".into(), json!(time_visible_ms));
                SlotEventName::SlotHidden
            }
        };
        Some((name, attributes))
    }
}
