// Copyright 2021-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Per-domain throttling state, as instructed by the collector.
//!
//! A domain is throttled while it has an entry in the table; the spec lists
//! JSON field names to suppress outright plus name/value-pair names to drop
//! from named arrays. Lookup is O(1) via hash indexes built once when a spec
//! is installed; the original list order is preserved so a throttling-state
//! report serializes the spec exactly as it was received.

use crate::data::{EventDomain, THROTTLEABLE_DOMAINS};
use hashbrown::{HashMap, HashSet};
use serde::Serialize;
use serde_json::{json, Value};

/// Names to drop from one named array of name/value-style entries.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SuppressedNvPairs {
    pub nv_pair_field_name: String,
    pub suppressed_nv_pair_names: Vec<String>,
}

/// The suppression instructions for one domain.
#[derive(Debug, Clone)]
pub struct ThrottleSpec {
    suppressed_field_names: Vec<String>,
    suppressed_nv_pairs_list: Vec<SuppressedNvPairs>,
    field_name_index: HashSet<String>,
    nv_pairs_index: HashMap<String, HashSet<String>>,
}

impl ThrottleSpec {
    /// Finalize a collected spec: build the hash indexes used during
    /// encoding. An empty spec has no meaning and yields `None` (the domain
    /// is simply not throttled).
    pub fn build(
        suppressed_field_names: Vec<String>,
        suppressed_nv_pairs_list: Vec<SuppressedNvPairs>,
    ) -> Option<Self> {
        if suppressed_field_names.is_empty() && suppressed_nv_pairs_list.is_empty() {
            return None;
        }
        let field_name_index = suppressed_field_names.iter().cloned().collect();
        let nv_pairs_index = suppressed_nv_pairs_list
            .iter()
            .map(|pairs| {
                (
                    pairs.nv_pair_field_name.clone(),
                    pairs.suppressed_nv_pair_names.iter().cloned().collect(),
                )
            })
            .collect();
        Some(Self {
            suppressed_field_names,
            suppressed_nv_pairs_list,
            field_name_index,
            nv_pairs_index,
        })
    }

    /// Whether `field_name` should be omitted from the encoded output.
    pub fn suppress_field(&self, field_name: &str) -> bool {
        self.field_name_index.contains(field_name)
    }

    /// Whether the entry named `name` should be dropped from the array
    /// `field_name`.
    pub fn suppress_nv_pair(&self, field_name: &str, name: &str) -> bool {
        self.nv_pairs_index
            .get(field_name)
            .is_some_and(|names| names.contains(name))
    }

    pub fn has_nv_pairs_for(&self, field_name: &str) -> bool {
        self.nv_pairs_index.contains_key(field_name)
    }

    fn report_value(&self, domain: EventDomain) -> Value {
        let mut spec = serde_json::Map::new();
        spec.insert("eventDomain".to_string(), json!(domain.as_str()));
        if !self.suppressed_field_names.is_empty() {
            spec.insert(
                "suppressedFieldNames".to_string(),
                json!(self.suppressed_field_names),
            );
        }
        if !self.suppressed_nv_pairs_list.is_empty() {
            spec.insert(
                "suppressedNvPairsList".to_string(),
                json!(self.suppressed_nv_pairs_list),
            );
        }
        Value::Object(spec)
    }
}

/// The throttle table for all domains. Owned by the dispatcher: commands
/// from the collector are applied and specs are consulted on the same
/// thread, so no locking is needed.
#[derive(Debug, Default)]
pub(crate) struct ThrottleState {
    specs: HashMap<EventDomain, ThrottleSpec>,
}

impl ThrottleState {
    pub fn spec_for(&self, domain: EventDomain) -> Option<&ThrottleSpec> {
        self.specs.get(&domain)
    }

    /// Replace the spec for a domain. `None` clears the entry, returning
    /// the domain to normal output.
    pub fn set_spec(&mut self, domain: EventDomain, spec: Option<ThrottleSpec>) {
        match spec {
            Some(spec) => {
                self.specs.insert(domain, spec);
            }
            None => {
                self.specs.remove(&domain);
            }
        }
    }

    pub fn is_throttled(&self) -> bool {
        !self.specs.is_empty()
    }

    /// The `eventThrottlingState` document POSTed in response to a
    /// `provideThrottlingState` command.
    pub fn report(&self) -> Value {
        if !self.is_throttled() {
            return json!({
                "eventThrottlingState": {
                    "eventThrottlingMode": "normal",
                }
            });
        }

        let specs: Vec<Value> = THROTTLEABLE_DOMAINS
            .iter()
            .filter_map(|domain| {
                self.specs
                    .get(domain)
                    .map(|spec| spec.report_value(*domain))
            })
            .collect();
        json!({
            "eventThrottlingState": {
                "eventThrottlingMode": "throttled",
                "eventDomainThrottleSpecificationList": specs,
            }
        })
    }
}
