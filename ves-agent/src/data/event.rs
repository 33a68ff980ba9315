// Copyright 2021-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::data::common::EventDomain;
use crate::data::fault::Fault;
use crate::data::header::EventHeader;
use crate::data::heartbeat::HeartbeatField;
use crate::data::measurement::Measurement;
use crate::data::other::OtherEvent;
use crate::data::signaling::Signaling;
use crate::data::state_change::StateChange;
use crate::data::syslog::Syslog;
use crate::data::voice_quality::VoiceQuality;

/// The tagged family of events this library can deliver. A heartbeat is a
/// naked common header; every other variant carries its domain payload.
///
/// Ownership transfers to the dispatcher on `post_event`; the dispatcher
/// drops the event after delivery (or after a delivery failure).
#[derive(Debug, Clone)]
pub enum Event {
    Heartbeat(EventHeader),
    HeartbeatField(HeartbeatField),
    Fault(Fault),
    Measurement(Measurement),
    StateChange(StateChange),
    Syslog(Syslog),
    Signaling(Signaling),
    VoiceQuality(VoiceQuality),
    Other(OtherEvent),
}

impl Event {
    pub fn header(&self) -> &EventHeader {
        match self {
            Event::Heartbeat(header) => header,
            Event::HeartbeatField(e) => &e.header,
            Event::Fault(e) => &e.header,
            Event::Measurement(e) => &e.header,
            Event::StateChange(e) => &e.header,
            Event::Syslog(e) => &e.header,
            Event::Signaling(e) => &e.header,
            Event::VoiceQuality(e) => &e.header,
            Event::Other(e) => &e.header,
        }
    }

    pub fn header_mut(&mut self) -> &mut EventHeader {
        match self {
            Event::Heartbeat(header) => header,
            Event::HeartbeatField(e) => &mut e.header,
            Event::Fault(e) => &mut e.header,
            Event::Measurement(e) => &mut e.header,
            Event::StateChange(e) => &mut e.header,
            Event::Syslog(e) => &mut e.header,
            Event::Signaling(e) => &mut e.header,
            Event::VoiceQuality(e) => &mut e.header,
            Event::Other(e) => &mut e.header,
        }
    }

    pub fn domain(&self) -> EventDomain {
        self.header().domain()
    }

    /// The JSON key of the domain-specific block, if the domain has one.
    pub(crate) fn domain_fields_key(&self) -> Option<&'static str> {
        match self {
            Event::Heartbeat(_) => None,
            Event::HeartbeatField(_) => Some("heartbeatField"),
            Event::Fault(_) => Some("faultFields"),
            Event::Measurement(_) => Some("measurementsForVfScalingFields"),
            Event::StateChange(_) => Some("stateChangeFields"),
            Event::Syslog(_) => Some("syslogFields"),
            Event::Signaling(_) => Some("signalingFields"),
            Event::VoiceQuality(_) => Some("voiceQualityFields"),
            Event::Other(_) => Some("otherFields"),
        }
    }

    /// Serialize the domain-specific block, if the domain has one.
    pub(crate) fn domain_fields_value(&self) -> serde_json::Result<Option<serde_json::Value>> {
        Ok(Some(match self {
            Event::Heartbeat(_) => return Ok(None),
            Event::HeartbeatField(e) => serde_json::to_value(e)?,
            Event::Fault(e) => serde_json::to_value(e)?,
            Event::Measurement(e) => serde_json::to_value(e)?,
            Event::StateChange(e) => serde_json::to_value(e)?,
            Event::Syslog(e) => serde_json::to_value(e)?,
            Event::Signaling(e) => serde_json::to_value(e)?,
            Event::VoiceQuality(e) => serde_json::to_value(e)?,
            Event::Other(e) => serde_json::to_value(e)?,
        }))
    }
}

impl From<HeartbeatField> for Event {
    fn from(e: HeartbeatField) -> Self {
        Event::HeartbeatField(e)
    }
}
impl From<Fault> for Event {
    fn from(e: Fault) -> Self {
        Event::Fault(e)
    }
}
impl From<Measurement> for Event {
    fn from(e: Measurement) -> Self {
        Event::Measurement(e)
    }
}
impl From<StateChange> for Event {
    fn from(e: StateChange) -> Self {
        Event::StateChange(e)
    }
}
impl From<Syslog> for Event {
    fn from(e: Syslog) -> Self {
        Event::Syslog(e)
    }
}
impl From<Signaling> for Event {
    fn from(e: Signaling) -> Self {
        Event::Signaling(e)
    }
}
impl From<VoiceQuality> for Event {
    fn from(e: VoiceQuality) -> Self {
        Event::VoiceQuality(e)
    }
}
impl From<OtherEvent> for Event {
    fn from(e: OtherEvent) -> Self {
        Event::Other(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::Identity;

    #[test]
    fn heartbeat_has_no_domain_fields() {
        let header = EventHeader::new(
            EventDomain::Heartbeat,
            "hb",
            "hb1",
            1,
            &Identity::for_tests(),
        );
        let event = Event::Heartbeat(header);
        assert!(event.domain_fields_key().is_none());
        assert!(event.domain_fields_value().unwrap().is_none());
        assert_eq!(event.domain(), EventDomain::Heartbeat);
    }
}
