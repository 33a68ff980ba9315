// Copyright 2021-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::data::common::{force_set, set_once, EventDomain, Priority, SchemaVersion};
use crate::metadata::Identity;
use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

/// Schema version of the common event header.
pub const HEADER_VERSION: SchemaVersion = SchemaVersion::new(3, 0);

/// Microseconds since the Unix epoch.
pub(crate) fn epoch_microsec_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_micros() as u64)
        .unwrap_or_default()
}

/// The `commonEventHeader` block present on every event.
///
/// Field order below matches the serialized key order; optional fields are
/// omitted when absent.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct EventHeader {
    pub(crate) domain: EventDomain,
    pub(crate) event_id: String,
    pub(crate) event_name: String,
    pub(crate) last_epoch_microsec: u64,
    pub(crate) priority: Priority,
    pub(crate) reporting_entity_name: String,
    pub(crate) sequence: i64,
    pub(crate) source_name: String,
    pub(crate) start_epoch_microsec: u64,
    pub(crate) version: SchemaVersion,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) event_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) reporting_entity_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) source_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) nfc_naming_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) nf_naming_code: Option<String>,
}

impl EventHeader {
    /// Initialize a header for a new event: stamps both epoch timestamps
    /// with the current time, defaults the reporting entity and source to
    /// the identity-source VM, and records the next event sequence number.
    pub(crate) fn new(
        domain: EventDomain,
        event_name: &str,
        event_id: &str,
        sequence: i64,
        identity: &Identity,
    ) -> Self {
        let now = epoch_microsec_now();
        EventHeader {
            domain,
            event_id: event_id.to_string(),
            event_name: event_name.to_string(),
            last_epoch_microsec: now,
            priority: Priority::Normal,
            reporting_entity_name: identity.vm_name.clone(),
            sequence,
            source_name: identity.vm_name.clone(),
            start_epoch_microsec: now,
            version: HEADER_VERSION,
            event_type: None,
            reporting_entity_id: Some(identity.vm_uuid.clone()),
            source_id: Some(identity.vm_uuid.clone()),
            nfc_naming_code: None,
            nf_naming_code: None,
        }
    }

    pub fn domain(&self) -> EventDomain {
        self.domain
    }

    pub fn sequence(&self) -> i64 {
        self.sequence
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub(crate) fn set_priority(&mut self, priority: Priority) {
        self.priority = priority;
    }

    /// Set the Event Type property. Single-shot: a repeat call is ignored
    /// with a warning.
    pub fn set_event_type(&mut self, event_type: &str) {
        set_once(&mut self.event_type, "eventType", event_type.to_string());
    }

    /// Set the start epoch, in microseconds. Defaults to the time of event
    /// creation.
    pub fn set_start_epoch(&mut self, start_epoch_microsec: u64) {
        self.start_epoch_microsec = start_epoch_microsec;
    }

    /// Set the last epoch, in microseconds. Defaults to the time of event
    /// creation.
    pub fn set_last_epoch(&mut self, last_epoch_microsec: u64) {
        self.last_epoch_microsec = last_epoch_microsec;
    }

    pub fn set_nfc_naming_code(&mut self, code: &str) {
        set_once(&mut self.nfc_naming_code, "nfcNamingCode", code.to_string());
    }

    pub fn set_nf_naming_code(&mut self, code: &str) {
        set_once(&mut self.nf_naming_code, "nfNamingCode", code.to_string());
    }

    /// Replace the reporting entity name (defaults to the VM name).
    pub fn set_reporting_entity_name(&mut self, entity_name: &str) {
        self.reporting_entity_name = entity_name.to_string();
    }

    /// Replace the reporting entity id (defaults to the VM UUID).
    pub fn set_reporting_entity_id(&mut self, entity_id: &str) {
        force_set(&mut self.reporting_entity_id, entity_id.to_string());
    }

    /// Replace the source name (defaults to the VM name).
    pub fn set_source_name(&mut self, source_name: &str) {
        self.source_name = source_name.to_string();
    }

    /// Replace the source id (defaults to the VM UUID).
    pub fn set_source_id(&mut self, source_id: &str) {
        force_set(&mut self.source_id, source_id.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn test_identity() -> Identity {
        Identity {
            vm_name: "vm-under-test".to_string(),
            vm_uuid: "uuid-under-test".to_string(),
        }
    }

    #[test]
    fn header_defaults_from_identity() {
        let header = EventHeader::new(
            EventDomain::Heartbeat,
            "Heartbeat_vTest",
            "heartbeat000000001",
            1,
            &test_identity(),
        );
        assert_eq!(header.reporting_entity_name, "vm-under-test");
        assert_eq!(header.source_name, "vm-under-test");
        assert_eq!(header.reporting_entity_id.as_deref(), Some("uuid-under-test"));
        assert_eq!(header.source_id.as_deref(), Some("uuid-under-test"));
        assert_eq!(header.priority, Priority::Normal);
        assert_eq!(header.sequence, 1);
        assert_eq!(header.start_epoch_microsec, header.last_epoch_microsec);
        assert!(header.event_type.is_none());
    }

    #[test]
    fn header_serializes_exact_keys() {
        let mut header = EventHeader::new(
            EventDomain::Fault,
            "Fault_vTest_linkDown",
            "fault000000001",
            7,
            &test_identity(),
        );
        header.set_start_epoch(100);
        header.set_last_epoch(200);
        let value = serde_json::to_value(&header).unwrap();
        assert_eq!(
            value,
            json!({
                "domain": "fault",
                "eventId": "fault000000001",
                "eventName": "Fault_vTest_linkDown",
                "lastEpochMicrosec": 200,
                "priority": "Normal",
                "reportingEntityName": "vm-under-test",
                "sequence": 7,
                "sourceName": "vm-under-test",
                "startEpochMicrosec": 100,
                "version": 3,
                "reportingEntityId": "uuid-under-test",
                "sourceId": "uuid-under-test",
            })
        );
    }

    #[test]
    fn event_type_is_single_shot() {
        let mut header = EventHeader::new(
            EventDomain::Heartbeat,
            "hb",
            "hb1",
            1,
            &test_identity(),
        );
        header.set_event_type("first");
        header.set_event_type("second");
        assert_eq!(header.event_type.as_deref(), Some("first"));
    }

    #[test]
    fn entity_overrides_replace_defaults() {
        let mut header = EventHeader::new(
            EventDomain::Syslog,
            "sl",
            "sl1",
            1,
            &test_identity(),
        );
        header.set_reporting_entity_name("other-entity");
        header.set_reporting_entity_id("other-id");
        header.set_source_name("other-source");
        header.set_source_id("other-source-id");
        assert_eq!(header.reporting_entity_name, "other-entity");
        assert_eq!(header.reporting_entity_id.as_deref(), Some("other-id"));
        assert_eq!(header.source_name, "other-source");
        assert_eq!(header.source_id.as_deref(), Some("other-source-id"));
    }
}
