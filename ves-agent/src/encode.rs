// Copyright 2021-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Event serialization with throttling-aware suppression.
//!
//! Events serialize through serde into a JSON value tree; the domain block
//! then gets a filter pass driven by the domain's throttle spec. Optional
//! sections that end up empty are dropped along with their key, so a fully
//! suppressed array leaves no trace in the output.

use crate::data::Event;
use crate::throttle::ThrottleSpec;
use serde_json::{Map, Value};

/// The JSON key identifying an entry within a named name/value-style array,
/// for nv-pair suppression. The measurement arrays key their entries by an
/// identifier field; everything else is a plain `name`/`value` pair list.
fn nv_pair_name_key(field_name: &str) -> &'static str {
    match field_name {
        "cpuUsageArray" => "cpuIdentifier",
        "diskUsageArray" => "diskIdentifier",
        "memoryUsageArray" => "vmIdentifier",
        "filesystemUsageArray" => "filesystemName",
        "vNicUsageArray" => "vNicIdentifier",
        "featureUsageArray" => "featureIdentifier",
        "codecUsageArray" => "codecIdentifier",
        _ => "name",
    }
}

/// Encode an event into the collector request document:
/// `{"event": {"commonEventHeader": {...}, "<domainFields>": {...}}}`.
///
/// The domain block is filtered through `spec` when the domain is
/// throttled; the common header is never throttled.
pub(crate) fn encode_event(
    event: &Event,
    spec: Option<&ThrottleSpec>,
) -> serde_json::Result<Value> {
    let mut event_obj = Map::new();
    event_obj.insert(
        "commonEventHeader".to_string(),
        serde_json::to_value(event.header())?,
    );

    if let (Some(key), Some(mut fields)) = (event.domain_fields_key(), event.domain_fields_value()?)
    {
        if let Some(spec) = spec {
            apply_throttle(spec, key, &mut fields);
        }
        if !is_empty_container(&fields) {
            event_obj.insert(key.to_string(), fields);
        }
    }

    let mut doc = Map::new();
    doc.insert("event".to_string(), Value::Object(event_obj));
    Ok(Value::Object(doc))
}

fn apply_throttle(spec: &ThrottleSpec, domain_key: &str, value: &mut Value) {
    match value {
        Value::Object(map) => filter_object(spec, map),
        Value::Array(items) => filter_array(spec, domain_key, items),
        _ => {}
    }
}

fn filter_object(spec: &ThrottleSpec, map: &mut Map<String, Value>) {
    map.retain(|key, _| !spec.suppress_field(key));
    for (key, value) in map.iter_mut() {
        match value {
            Value::Array(items) => filter_array(spec, key, items),
            Value::Object(inner) => filter_object(spec, inner),
            _ => {}
        }
    }
    // A section emptied by suppression is omitted along with its key.
    map.retain(|_, value| !is_empty_container(value));
}

fn filter_array(spec: &ThrottleSpec, field_name: &str, items: &mut Vec<Value>) {
    if spec.has_nv_pairs_for(field_name) {
        let name_key = nv_pair_name_key(field_name);
        items.retain(|item| {
            item.get(name_key)
                .and_then(Value::as_str)
                .is_none_or(|name| !spec.suppress_nv_pair(field_name, name))
        });
    }
    for item in items.iter_mut() {
        if let Value::Object(inner) = item {
            filter_object(spec, inner);
        }
    }
}

fn is_empty_container(value: &Value) -> bool {
    match value {
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}
