// Copyright 2021-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Collector response handling.
//!
//! A collector may answer an event POST with a `commandList`. Commands are
//! applied best-effort in order: any valid-looking command takes effect
//! regardless of what follows it. A structurally malformed document rejects
//! the whole list and leaves all state untouched.

use crate::data::EventDomain;
use crate::error::VesError;
use crate::throttle::{SuppressedNvPairs, ThrottleSpec, ThrottleState};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Mutex;
use tracing::{debug, error, warn};
use ves_common::MutexExt;

#[derive(Deserialize, Debug)]
struct CommandListDocument {
    #[serde(rename = "commandList")]
    command_list: Vec<CommandListEntry>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
struct CommandListEntry {
    command: Option<Command>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase", default)]
struct Command {
    command_type: Option<String>,
    measurement_interval: Option<Value>,
    event_domain_throttle_specification: Option<RawThrottleSpec>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase", default)]
struct RawThrottleSpec {
    event_domain: Option<String>,
    suppressed_field_names: Vec<String>,
    suppressed_nv_pairs_list: Vec<RawNvPairs>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase", default)]
struct RawNvPairs {
    nv_pair_field_name: Option<String>,
    suppressed_nv_pair_names: Vec<String>,
}

/// Handle a collector response body.
///
/// Returns the throttling-state report to POST out-of-band when the list
/// contained a `provideThrottlingState` command. A body without a
/// `commandList` (or with broken structure) yields `BadJsonFormat` and no
/// state change.
pub(crate) fn handle_response(
    body: &[u8],
    throttle: &mut ThrottleState,
    measurement_interval: &Mutex<i64>,
) -> Result<Option<Value>, VesError> {
    let document: CommandListDocument = serde_json::from_slice(body).map_err(|e| {
        error!(error = %e, "failed to parse collector response");
        VesError::BadJsonFormat
    })?;

    let mut provide_throttling_state = false;
    for entry in document.command_list {
        let Some(command) = entry.command else {
            debug!("commandList entry without a command - skipped");
            continue;
        };
        match command.command_type.as_deref() {
            Some("provideThrottlingState") => provide_throttling_state = true,
            Some("throttlingSpecification") => apply_throttling_spec(command, throttle),
            Some("measurementIntervalChange") => {
                apply_measurement_interval(command, measurement_interval)
            }
            Some(other) => error!(command_type = other, "ignoring unknown commandType"),
            None => debug!("command without a commandType - skipped"),
        }
    }

    // The report reflects the state after every command in this list has
    // been applied.
    Ok(provide_throttling_state.then(|| throttle.report()))
}

fn apply_throttling_spec(command: Command, throttle: &mut ThrottleState) {
    let Some(raw) = command.event_domain_throttle_specification else {
        warn!("throttlingSpecification without an eventDomainThrottleSpecification - ignored");
        return;
    };
    let Some(domain_value) = raw.event_domain else {
        warn!("throttling specification without an eventDomain - ignored");
        return;
    };
    let Some(domain) = EventDomain::from_throttle_str(&domain_value) else {
        error!(domain = %domain_value, "invalid eventDomain in throttling specification - ignored");
        return;
    };

    // An nv-pairs entry is meaningless without both its field name and at
    // least one suppressed name.
    let nv_pairs: Vec<SuppressedNvPairs> = raw
        .suppressed_nv_pairs_list
        .into_iter()
        .filter_map(|pairs| match pairs.nv_pair_field_name {
            Some(field_name) if !pairs.suppressed_nv_pair_names.is_empty() => {
                Some(SuppressedNvPairs {
                    nv_pair_field_name: field_name,
                    suppressed_nv_pair_names: pairs.suppressed_nv_pair_names,
                })
            }
            _ => {
                debug!("discarding incomplete suppressedNvPairsList entry");
                None
            }
        })
        .collect();

    let spec = ThrottleSpec::build(raw.suppressed_field_names, nv_pairs);
    debug!(
        domain = domain.as_str(),
        throttled = spec.is_some(),
        "updating throttle specification"
    );
    throttle.set_spec(domain, spec);
}

fn apply_measurement_interval(command: Command, measurement_interval: &Mutex<i64>) {
    let Some(value) = command.measurement_interval else {
        warn!("measurementIntervalChange without a measurementInterval - ignored");
        return;
    };
    let parsed = match &value {
        Value::String(s) => s.trim().parse::<i64>().ok(),
        Value::Number(n) => n.as_i64(),
        _ => None,
    };
    match parsed {
        Some(interval) if (0..=i64::from(i32::MAX)).contains(&interval) => {
            debug!(interval, "updating measurement interval");
            *measurement_interval.lock_or_panic() = interval;
        }
        _ => error!(value = %value, "ignoring invalid measurement interval"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn interval_mutex() -> Mutex<i64> {
        Mutex::new(0)
    }

    #[test]
    fn measurement_interval_change_from_string() {
        let mut throttle = ThrottleState::default();
        let interval = interval_mutex();
        let body = br#"{"commandList":[{"command":{"commandType":"measurementIntervalChange","measurementInterval":"30"}}]}"#;
        let post = handle_response(body, &mut throttle, &interval).unwrap();
        assert!(post.is_none());
        assert_eq!(*interval.lock_or_panic(), 30);
    }

    #[test]
    fn measurement_interval_change_from_number() {
        let mut throttle = ThrottleState::default();
        let interval = interval_mutex();
        let body = br#"{"commandList":[{"command":{"commandType":"measurementIntervalChange","measurementInterval":120}}]}"#;
        handle_response(body, &mut throttle, &interval).unwrap();
        assert_eq!(*interval.lock_or_panic(), 120);
    }

    #[test]
    fn invalid_interval_keeps_previous_value() {
        let mut throttle = ThrottleState::default();
        let interval = interval_mutex();
        *interval.lock_or_panic() = 60;
        for bad in ["-1", "bogus", "4294967296000"] {
            let body = serde_json::to_vec(&json!({"commandList":[{"command":{
                "commandType":"measurementIntervalChange",
                "measurementInterval": bad,
            }}]}))
            .unwrap();
            handle_response(&body, &mut throttle, &interval).unwrap();
            assert_eq!(*interval.lock_or_panic(), 60, "{bad}");
        }
    }

    #[test]
    fn provide_throttling_state_when_untouched() {
        let mut throttle = ThrottleState::default();
        let interval = interval_mutex();
        let body = br#"{"commandList":[{"command":{"commandType":"provideThrottlingState"}}]}"#;
        let post = handle_response(body, &mut throttle, &interval)
            .unwrap()
            .unwrap();
        assert_eq!(
            post,
            json!({"eventThrottlingState":{"eventThrottlingMode":"normal"}})
        );
    }

    #[test]
    fn throttling_specification_installs_spec() {
        let mut throttle = ThrottleState::default();
        let interval = interval_mutex();
        let body = serde_json::to_vec(&json!({"commandList":[{"command":{
            "commandType": "throttlingSpecification",
            "eventDomainThrottleSpecification": {
                "eventDomain": "fault",
                "suppressedFieldNames": ["alarmInterfaceA"],
                "suppressedNvPairsList": [
                    {"nvPairFieldName": "alarmAdditionalInformation",
                     "suppressedNvPairNames": ["peer"]},
                ],
            },
        }}]}))
        .unwrap();
        handle_response(&body, &mut throttle, &interval).unwrap();
        let spec = throttle.spec_for(EventDomain::Fault).unwrap();
        assert!(spec.suppress_field("alarmInterfaceA"));
        assert!(spec.suppress_nv_pair("alarmAdditionalInformation", "peer"));
    }

    #[test]
    fn empty_specification_clears_the_domain() {
        let mut throttle = ThrottleState::default();
        let interval = interval_mutex();
        let install = serde_json::to_vec(&json!({"commandList":[{"command":{
            "commandType": "throttlingSpecification",
            "eventDomainThrottleSpecification": {
                "eventDomain": "fault",
                "suppressedFieldNames": ["alarmInterfaceA"],
            },
        }}]}))
        .unwrap();
        handle_response(&install, &mut throttle, &interval).unwrap();
        assert!(throttle.is_throttled());

        let clear = serde_json::to_vec(&json!({"commandList":[{"command":{
            "commandType": "throttlingSpecification",
            "eventDomainThrottleSpecification": {"eventDomain": "fault"},
        }}]}))
        .unwrap();
        handle_response(&clear, &mut throttle, &interval).unwrap();
        assert!(!throttle.is_throttled());
    }

    #[test]
    fn invalid_domain_is_ignored() {
        let mut throttle = ThrottleState::default();
        let interval = interval_mutex();
        for domain in ["serviceEvents", "internal", "nonsense"] {
            let body = serde_json::to_vec(&json!({"commandList":[{"command":{
                "commandType": "throttlingSpecification",
                "eventDomainThrottleSpecification": {
                    "eventDomain": domain,
                    "suppressedFieldNames": ["x"],
                },
            }}]}))
            .unwrap();
            handle_response(&body, &mut throttle, &interval).unwrap();
        }
        assert!(!throttle.is_throttled());
    }

    #[test]
    fn incomplete_nv_pairs_entries_are_discarded() {
        let mut throttle = ThrottleState::default();
        let interval = interval_mutex();
        let body = serde_json::to_vec(&json!({"commandList":[{"command":{
            "commandType": "throttlingSpecification",
            "eventDomainThrottleSpecification": {
                "eventDomain": "measurementsForVfScaling",
                "suppressedNvPairsList": [
                    {"nvPairFieldName": "cpuUsageArray"},
                    {"suppressedNvPairNames": ["cpu1"]},
                    {"nvPairFieldName": "diskUsageArray",
                     "suppressedNvPairNames": ["disk1"]},
                ],
            },
        }}]}))
        .unwrap();
        handle_response(&body, &mut throttle, &interval).unwrap();
        let spec = throttle.spec_for(EventDomain::Measurement).unwrap();
        assert!(!spec.has_nv_pairs_for("cpuUsageArray"));
        assert!(spec.suppress_nv_pair("diskUsageArray", "disk1"));
    }

    #[test]
    fn malformed_document_changes_nothing() {
        let mut throttle = ThrottleState::default();
        let interval = interval_mutex();
        *interval.lock_or_panic() = 60;
        for body in [
            &b"not json at all"[..],
            br#"{"somethingElse": true}"#,
            br#"{"commandList": "not-a-list"}"#,
            br#"{"commandList":[{"command":{"commandType":"throttlingSpecification","eventDomainThrottleSpecification":{"suppressedFieldNames": 17}}}]}"#,
        ] {
            let result = handle_response(body, &mut throttle, &interval);
            assert!(matches!(result, Err(VesError::BadJsonFormat)));
            assert!(!throttle.is_throttled());
            assert_eq!(*interval.lock_or_panic(), 60);
        }
    }

    #[test]
    fn report_reflects_state_after_all_commands() {
        let mut throttle = ThrottleState::default();
        let interval = interval_mutex();
        // A single list installs a spec and then asks for the state.
        let body = serde_json::to_vec(&json!({"commandList":[
            {"command":{
                "commandType": "throttlingSpecification",
                "eventDomainThrottleSpecification": {
                    "eventDomain": "syslog",
                    "suppressedFieldNames": ["syslogProc"],
                },
            }},
            {"command":{"commandType": "provideThrottlingState"}},
        ]}))
        .unwrap();
        let post = handle_response(&body, &mut throttle, &interval)
            .unwrap()
            .unwrap();
        assert_eq!(
            post["eventThrottlingState"]["eventThrottlingMode"],
            json!("throttled")
        );
        assert_eq!(
            post["eventThrottlingState"]["eventDomainThrottleSpecificationList"],
            json!([{"eventDomain": "syslog", "suppressedFieldNames": ["syslogProc"]}])
        );
    }

    #[test]
    fn unknown_command_type_is_skipped() {
        let mut throttle = ThrottleState::default();
        let interval = interval_mutex();
        let body = br#"{"commandList":[{"command":{"commandType":"rebootEverything"}}]}"#;
        let post = handle_response(body, &mut throttle, &interval).unwrap();
        assert!(post.is_none());
        assert!(!throttle.is_throttled());
    }
}
