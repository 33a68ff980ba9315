// Copyright 2021-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::data::common::{EntityState, NameValuePair, SchemaVersion};
use crate::data::header::EventHeader;
use serde::Serialize;

pub const STATE_CHANGE_VERSION: SchemaVersion = SchemaVersion::new(2, 0);

/// A state-change event for a card or port interface.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct StateChange {
    #[serde(skip)]
    pub(crate) header: EventHeader,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    additional_fields: Vec<NameValuePair>,
    new_state: EntityState,
    old_state: EntityState,
    state_change_fields_version: SchemaVersion,
    state_interface: String,
}

impl StateChange {
    pub(crate) fn new(
        header: EventHeader,
        new_state: EntityState,
        old_state: EntityState,
        interface: &str,
    ) -> Self {
        Self {
            header,
            additional_fields: Vec::new(),
            new_state,
            old_state,
            state_change_fields_version: STATE_CHANGE_VERSION,
            state_interface: interface.to_string(),
        }
    }

    pub fn header(&self) -> &EventHeader {
        &self.header
    }

    pub fn header_mut(&mut self) -> &mut EventHeader {
        &mut self.header
    }

    pub fn add_additional_field(&mut self, name: &str, value: &str) {
        self.additional_fields.push(NameValuePair::new(name, value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::common::EventDomain;
    use crate::metadata::Identity;
    use serde_json::json;

    #[test]
    fn serializes_states_and_interface() {
        let header = EventHeader::new(
            EventDomain::StateChange,
            "StateChange_port",
            "sc000000001",
            1,
            &Identity::for_tests(),
        );
        let mut sc = StateChange::new(
            header,
            EntityState::InService,
            EntityState::OutOfService,
            "port-1",
        );
        sc.add_additional_field("cause", "manual");
        assert_eq!(
            serde_json::to_value(&sc).unwrap(),
            json!({
                "additionalFields": [{"name": "cause", "value": "manual"}],
                "newState": "inService",
                "oldState": "outOfService",
                "stateChangeFieldsVersion": 2,
                "stateInterface": "port-1",
            })
        );
    }
}
