// Copyright 2021-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::data::common::{set_once, NameValuePair, SchemaVersion, Severity, SourceType, VfStatus};
use crate::data::header::EventHeader;
use serde::Serialize;

pub const FAULT_VERSION: SchemaVersion = SchemaVersion::new(2, 0);

/// A fault event.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Fault {
    #[serde(skip)]
    pub(crate) header: EventHeader,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    alarm_additional_information: Vec<NameValuePair>,
    alarm_condition: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    alarm_interface_a: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    event_category: Option<String>,
    event_severity: Severity,
    event_source_type: SourceType,
    fault_fields_version: SchemaVersion,
    specific_problem: String,
    vf_status: VfStatus,
}

impl Fault {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        header: EventHeader,
        alarm_condition: &str,
        specific_problem: &str,
        severity: Severity,
        source_type: SourceType,
        vf_status: VfStatus,
    ) -> Self {
        Self {
            header,
            alarm_additional_information: Vec::new(),
            alarm_condition: alarm_condition.to_string(),
            alarm_interface_a: None,
            event_category: None,
            event_severity: severity,
            event_source_type: source_type,
            fault_fields_version: FAULT_VERSION,
            specific_problem: specific_problem.to_string(),
            vf_status,
        }
    }

    pub fn header(&self) -> &EventHeader {
        &self.header
    }

    pub fn header_mut(&mut self) -> &mut EventHeader {
        &mut self.header
    }

    /// Set the category of the alarm (e.g. `link`, `routing`, `license`).
    /// Single-shot.
    pub fn set_category(&mut self, category: &str) {
        set_once(
            &mut self.event_category,
            "eventCategory",
            category.to_string(),
        );
    }

    /// Set the card or port on which the alarm was raised. Single-shot.
    pub fn set_interface(&mut self, interface: &str) {
        set_once(
            &mut self.alarm_interface_a,
            "alarmInterfaceA",
            interface.to_string(),
        );
    }

    /// Append an alarm additional-information pair; insertion order is
    /// preserved in the JSON output.
    pub fn add_additional_info(&mut self, name: &str, value: &str) {
        self.alarm_additional_information
            .push(NameValuePair::new(name, value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::common::EventDomain;
    use crate::metadata::Identity;
    use serde_json::json;

    fn fault() -> Fault {
        let header = EventHeader::new(
            EventDomain::Fault,
            "Fault_vTest_linkDown",
            "fault000000001",
            1,
            &Identity::for_tests(),
        );
        Fault::new(
            header,
            "linkDown",
            "eth0 link lost",
            Severity::Major,
            SourceType::VirtualMachine,
            VfStatus::Active,
        )
    }

    #[test]
    fn serializes_mandatory_fields() {
        let value = serde_json::to_value(fault()).unwrap();
        assert_eq!(
            value,
            json!({
                "alarmCondition": "linkDown",
                "eventSeverity": "MAJOR",
                "eventSourceType": "virtualMachine",
                "faultFieldsVersion": 2,
                "specificProblem": "eth0 link lost",
                "vfStatus": "Active",
            })
        );
    }

    #[test]
    fn optional_fields_and_info_pairs() {
        let mut fault = fault();
        fault.set_category("link");
        fault.set_interface("eth0");
        fault.add_additional_info("peer", "gw-1");
        let value = serde_json::to_value(&fault).unwrap();
        assert_eq!(value["eventCategory"], json!("link"));
        assert_eq!(value["alarmInterfaceA"], json!("eth0"));
        assert_eq!(
            value["alarmAdditionalInformation"],
            json!([{"name": "peer", "value": "gw-1"}])
        );
    }

    #[test]
    fn interface_is_single_shot() {
        let mut fault = fault();
        fault.set_interface("eth0");
        fault.set_interface("eth1");
        assert_eq!(
            serde_json::to_value(&fault).unwrap()["alarmInterfaceA"],
            json!("eth0")
        );
    }
}
