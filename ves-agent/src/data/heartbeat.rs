// Copyright 2021-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::data::common::{NameValuePair, SchemaVersion};
use crate::data::header::EventHeader;
use serde::Serialize;

pub const HEARTBEAT_FIELD_VERSION: SchemaVersion = SchemaVersion::new(1, 0);

/// A heartbeat event carrying an explicit interval and optional additional
/// fields. A plain heartbeat is a naked common header and has no payload
/// struct of its own.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct HeartbeatField {
    #[serde(skip)]
    pub(crate) header: EventHeader,
    heartbeat_interval: i32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    additional_fields: Vec<NameValuePair>,
    heartbeat_fields_version: SchemaVersion,
}

impl HeartbeatField {
    pub(crate) fn new(header: EventHeader, interval: i32) -> Self {
        Self {
            header,
            heartbeat_interval: interval,
            additional_fields: Vec::new(),
            heartbeat_fields_version: HEARTBEAT_FIELD_VERSION,
        }
    }

    pub fn header(&self) -> &EventHeader {
        &self.header
    }

    pub fn header_mut(&mut self) -> &mut EventHeader {
        &mut self.header
    }

    /// Append a name/value pair to the additional fields; insertion order is
    /// preserved in the JSON output.
    pub fn add_field(&mut self, name: &str, value: &str) {
        self.additional_fields.push(NameValuePair::new(name, value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::common::EventDomain;
    use crate::metadata::Identity;
    use serde_json::json;

    fn header() -> EventHeader {
        EventHeader::new(
            EventDomain::HeartbeatField,
            "Heartbeat_vTest",
            "hb000001",
            1,
            &Identity::for_tests(),
        )
    }

    #[test]
    fn serializes_interval_and_fields() {
        let mut hb = HeartbeatField::new(header(), 30);
        hb.add_field("load", "0.3");
        hb.add_field("uptime", "1234");
        assert_eq!(
            serde_json::to_value(&hb).unwrap(),
            json!({
                "heartbeatInterval": 30,
                "additionalFields": [
                    {"name": "load", "value": "0.3"},
                    {"name": "uptime", "value": "1234"},
                ],
                "heartbeatFieldsVersion": 1,
            })
        );
    }

    #[test]
    fn empty_fields_are_omitted() {
        let hb = HeartbeatField::new(header(), 60);
        let value = serde_json::to_value(&hb).unwrap();
        assert!(value.get("additionalFields").is_none());
    }
}
