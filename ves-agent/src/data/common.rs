// Copyright 2021-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use serde::{Serialize, Serializer};
use tracing::warn;

/// Event priority carried in the common header.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Priority {
    High,
    Medium,
    Normal,
    Low,
}

/// The category of an event. Immutable after construction; `Internal` is
/// reserved for dispatcher control and never serialized to the collector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventDomain {
    Heartbeat,
    HeartbeatField,
    Fault,
    Measurement,
    MobileFlow,
    Report,
    Signaling,
    StateChange,
    Syslog,
    Other,
    VoiceQuality,
    ThresholdCross,
    Batch,
    Internal,
}

impl EventDomain {
    /// The `domain` string emitted in the common event header.
    pub fn as_str(&self) -> &'static str {
        use EventDomain::*;
        match self {
            Heartbeat | HeartbeatField => "heartbeat",
            Fault => "fault",
            Measurement => "measurementsForVfScaling",
            MobileFlow => "mobileFlow",
            Report => "report",
            Signaling => "signaling",
            StateChange => "stateChange",
            Syslog => "syslog",
            Other => "other",
            VoiceQuality => "voiceQuality",
            ThresholdCross => "thresholdCrossingAlert",
            Batch => "batch",
            Internal => "internal",
        }
    }

    /// Decode an `eventDomain` value from a collector throttling command.
    ///
    /// `serviceEvents` appears in collector schemas but has no corresponding
    /// event family here, so it decodes as unknown.
    pub fn from_throttle_str(value: &str) -> Option<EventDomain> {
        use EventDomain::*;
        match value {
            "heartbeat" => Some(Heartbeat),
            "fault" => Some(Fault),
            "measurementsForVfScaling" => Some(Measurement),
            "mobileFlow" => Some(MobileFlow),
            "report" => Some(Report),
            "signaling" => Some(Signaling),
            "stateChange" => Some(StateChange),
            "syslog" => Some(Syslog),
            "other" => Some(Other),
            "voiceQuality" => Some(VoiceQuality),
            _ => None,
        }
    }
}

/// Domains a collector may throttle, in the order they are reported back in
/// a throttling-state response.
pub const THROTTLEABLE_DOMAINS: &[EventDomain] = &[
    EventDomain::Heartbeat,
    EventDomain::Fault,
    EventDomain::Measurement,
    EventDomain::MobileFlow,
    EventDomain::Report,
    EventDomain::Signaling,
    EventDomain::StateChange,
    EventDomain::Syslog,
    EventDomain::Other,
    EventDomain::VoiceQuality,
];

impl Serialize for EventDomain {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// The type of equipment represented by the VNF.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum SourceType {
    Other,
    Router,
    Switch,
    Host,
    Card,
    Port,
    SlotThreshold,
    PortThreshold,
    VirtualMachine,
    VirtualNetworkFunction,
}

impl SourceType {
    pub fn as_str(&self) -> &'static str {
        use SourceType::*;
        match self {
            Other => "other",
            Router => "router",
            Switch => "switch",
            Host => "host",
            Card => "card",
            Port => "port",
            SlotThreshold => "slotThreshold",
            PortThreshold => "portThreshold",
            VirtualMachine => "virtualMachine",
            VirtualNetworkFunction => "virtualNetworkFunction",
        }
    }
}

/// Fault severity.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Critical,
    Major,
    Minor,
    Warning,
    Normal,
}

/// Virtual function status reported with faults.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum VfStatus {
    #[serde(rename = "Active")]
    Active,
    #[serde(rename = "Idle")]
    Idle,
    #[serde(rename = "Preparing to terminate")]
    PreparingToTerminate,
    #[serde(rename = "Ready to terminate")]
    ReadyToTerminate,
    #[serde(rename = "Requesting termination")]
    RequestingTermination,
}

/// State of an entity for state-change events.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum EntityState {
    InService,
    Maintenance,
    OutOfService,
}

/// Syslog severity keywords, RFC 5424 order.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyslogSeverity {
    Emergency,
    Alert,
    Critical,
    Error,
    Warning,
    Notice,
    Info,
    Debug,
}

/// Syslog facility, serialized as the RFC 5424 integer code (0..=23,
/// `local0..local7` map to 16..=23).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyslogFacility {
    Kernel = 0,
    User = 1,
    Mail = 2,
    Daemon = 3,
    SecurityAuth = 4,
    Internal = 5,
    LinePrinter = 6,
    NetworkNews = 7,
    Uucp = 8,
    Clock = 9,
    SecurityAuth2 = 10,
    Ftp = 11,
    Ntp = 12,
    LogAudit = 13,
    LogAlert = 14,
    Clock2 = 15,
    Local0 = 16,
    Local1 = 17,
    Local2 = 18,
    Local3 = 19,
    Local4 = 20,
    Local5 = 21,
    Local6 = 22,
    Local7 = 23,
}

impl SyslogFacility {
    pub fn code(&self) -> i32 {
        *self as i32
    }
}

impl Serialize for SyslogFacility {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i32(self.code())
    }
}

/// A name/value pair inside one of the repeated event groups.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct NameValuePair {
    pub name: String,
    pub value: String,
}

impl NameValuePair {
    pub fn new(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
        }
    }
}

/// Vendor identity block shared by signaling and voice-quality events.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct VendorVnfNameFields {
    pub vendor_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vf_module_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vnf_name: Option<String>,
}

impl VendorVnfNameFields {
    pub fn new(vendor_name: &str) -> Self {
        Self {
            vendor_name: vendor_name.to_string(),
            vf_module_name: None,
            vnf_name: None,
        }
    }

    pub fn set_vf_module_name(&mut self, module_name: &str) {
        set_once(
            &mut self.vf_module_name,
            "vfModuleName",
            module_name.to_string(),
        );
    }

    pub fn set_vnf_name(&mut self, vnf_name: &str) {
        set_once(&mut self.vnf_name, "vnfName", vnf_name.to_string());
    }
}

/// Per-domain schema version, emitted as a bare integer when the minor
/// version is zero and as `major.minor` otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaVersion {
    pub major: u32,
    pub minor: u32,
}

impl SchemaVersion {
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }
}

impl Serialize for SchemaVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.minor == 0 {
            serializer.serialize_u32(self.major)
        } else {
            serializer.serialize_f64(f64::from(self.major) + f64::from(self.minor) / 10.0)
        }
    }
}

/// Store `value` into an optional field that is set at most once. A repeat
/// call logs and leaves the original value untouched.
pub(crate) fn set_once<T>(slot: &mut Option<T>, field: &'static str, value: T) {
    if slot.is_some() {
        warn!(field, "ignoring update to field that is already set");
    } else {
        *slot = Some(value);
    }
}

/// Overwrite an optional field regardless of its current state.
pub(crate) fn force_set<T>(slot: &mut Option<T>, value: T) {
    *slot = Some(value);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn domain_header_strings() {
        assert_eq!(EventDomain::Heartbeat.as_str(), "heartbeat");
        assert_eq!(EventDomain::HeartbeatField.as_str(), "heartbeat");
        assert_eq!(EventDomain::Measurement.as_str(), "measurementsForVfScaling");
        assert_eq!(EventDomain::VoiceQuality.as_str(), "voiceQuality");
    }

    #[test]
    fn domain_throttle_decode() {
        assert_eq!(
            EventDomain::from_throttle_str("fault"),
            Some(EventDomain::Fault)
        );
        assert_eq!(
            EventDomain::from_throttle_str("measurementsForVfScaling"),
            Some(EventDomain::Measurement)
        );
        assert_eq!(EventDomain::from_throttle_str("serviceEvents"), None);
        assert_eq!(EventDomain::from_throttle_str("internal"), None);
        assert_eq!(EventDomain::from_throttle_str("bogus"), None);
    }

    #[test]
    fn enum_json_strings() {
        assert_eq!(serde_json::to_value(Priority::Normal).unwrap(), json!("Normal"));
        assert_eq!(
            serde_json::to_value(SourceType::VirtualMachine).unwrap(),
            json!("virtualMachine")
        );
        assert_eq!(serde_json::to_value(Severity::Critical).unwrap(), json!("CRITICAL"));
        assert_eq!(
            serde_json::to_value(VfStatus::PreparingToTerminate).unwrap(),
            json!("Preparing to terminate")
        );
        assert_eq!(
            serde_json::to_value(EntityState::OutOfService).unwrap(),
            json!("outOfService")
        );
        assert_eq!(
            serde_json::to_value(SyslogSeverity::Emergency).unwrap(),
            json!("Emergency")
        );
    }

    #[test]
    fn syslog_facility_codes() {
        assert_eq!(SyslogFacility::Kernel.code(), 0);
        assert_eq!(SyslogFacility::Local0.code(), 16);
        assert_eq!(SyslogFacility::Local7.code(), 23);
        assert_eq!(serde_json::to_value(SyslogFacility::Local3).unwrap(), json!(19));
    }

    #[test]
    fn version_collapses_trailing_zero() {
        assert_eq!(serde_json::to_value(SchemaVersion::new(3, 0)).unwrap(), json!(3));
        assert_eq!(serde_json::to_value(SchemaVersion::new(2, 1)).unwrap(), json!(2.1));
    }

    #[test]
    fn set_once_ignores_second_write() {
        let mut slot = None;
        set_once(&mut slot, "field", 1);
        set_once(&mut slot, "field", 2);
        assert_eq!(slot, Some(1));
        force_set(&mut slot, 3);
        assert_eq!(slot, Some(3));
    }

    #[test]
    fn vendor_fields_serialize() {
        let mut vendor = VendorVnfNameFields::new("metaswitch");
        vendor.set_vnf_name("vnf-1");
        assert_eq!(
            serde_json::to_value(&vendor).unwrap(),
            json!({"vendorName": "metaswitch", "vnfName": "vnf-1"})
        );
    }
}
