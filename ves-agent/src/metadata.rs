// Copyright 2021-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Best-effort source identity from the OpenStack metadata service.
//!
//! The VM name and UUID seed the header defaults for every event. A VNF may
//! run without a metadata service (labs, tests), so every failure here falls
//! back to fixed placeholder strings and is logged rather than surfaced.

use crate::error::VesError;
use bytes::Bytes;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};
use ves_common::connector::http_connector;
use ves_common::http_common::{collect_response_bytes, new_client_periodic};

/// Link-local OpenStack metadata document.
pub const DEFAULT_METADATA_URL: &str = "http://169.254.169.254/openstack/latest/meta_data.json";

/// How long we are prepared to wait for the metadata service.
const METADATA_TIMEOUT: Duration = Duration::from_secs(2);

pub const DUMMY_VM_NAME: &str = "Dummy VM name - No Metadata available";
pub const DUMMY_VM_UUID: &str = "Dummy VM UUID - No Metadata available";

/// The identity of the VM this agent reports for.
#[derive(Debug, Clone)]
pub struct Identity {
    pub vm_name: String,
    pub vm_uuid: String,
}

impl Identity {
    pub fn fallback() -> Self {
        Self {
            vm_name: DUMMY_VM_NAME.to_string(),
            vm_uuid: DUMMY_VM_UUID.to_string(),
        }
    }

    #[cfg(test)]
    pub(crate) fn for_tests() -> Self {
        Self {
            vm_name: "vm-under-test".to_string(),
            vm_uuid: "uuid-under-test".to_string(),
        }
    }
}

/// Retrieve the VM identity, falling back to the placeholder identity on
/// any failure.
pub(crate) fn load(metadata_url: &str) -> Identity {
    match fetch_blocking(metadata_url) {
        Ok(identity) => {
            debug!(
                vm_name = %identity.vm_name,
                vm_uuid = %identity.vm_uuid,
                "loaded VM identity from metadata service"
            );
            identity
        }
        Err(e) => {
            info!(error = %e, "failed to load VM metadata - assuming test environment");
            Identity::fallback()
        }
    }
}

fn fetch_blocking(metadata_url: &str) -> Result<Identity, VesError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|_| VesError::NoMetadata)?;
    runtime.block_on(fetch(metadata_url))
}

async fn fetch(metadata_url: &str) -> Result<Identity, VesError> {
    let uri: hyper::Uri = metadata_url.parse().map_err(|_| VesError::NoMetadata)?;
    let client = new_client_periodic(http_connector(None));
    let request = http::Request::builder()
        .method(http::Method::GET)
        .uri(uri)
        .body(http_body_util::Full::new(Bytes::new()))
        .map_err(|_| VesError::NoMetadata)?;

    let response = tokio::time::timeout(METADATA_TIMEOUT, client.request(request))
        .await
        .map_err(|_| VesError::NoMetadata)?
        .map_err(|_| VesError::NoMetadata)?;
    if !response.status().is_success() {
        return Err(VesError::NoMetadata);
    }
    let body = collect_response_bytes(response)
        .await
        .map_err(|_| VesError::BadMetadata)?;
    parse_identity(&body)
}

/// Extract `uuid` and `name` from the metadata document.
///
/// `uuid` may be found at any depth (vendor extensions nest it), while
/// `name` is only accepted from the top-level object so that an unrelated
/// nested `name` cannot masquerade as the VM name. A missing key falls back
/// to its placeholder; only an unparseable document is an error.
pub(crate) fn parse_identity(body: &[u8]) -> Result<Identity, VesError> {
    let document: Value = serde_json::from_slice(body).map_err(|_| VesError::BadMetadata)?;
    let Value::Object(top_level) = &document else {
        return Err(VesError::BadMetadata);
    };

    let vm_uuid = match find_string(&document, "uuid") {
        Some(uuid) => uuid.to_string(),
        None => {
            warn!("no uuid in metadata - using placeholder");
            DUMMY_VM_UUID.to_string()
        }
    };
    let vm_name = match top_level.get("name").and_then(Value::as_str) {
        Some(name) => name.to_string(),
        None => {
            warn!("no top-level name in metadata - using placeholder");
            DUMMY_VM_NAME.to_string()
        }
    };

    Ok(Identity { vm_name, vm_uuid })
}

/// Depth-first, document-order search for a string value under `key`.
fn find_string<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    match value {
        Value::Object(map) => {
            for (k, v) in map {
                if k == key {
                    if let Some(s) = v.as_str() {
                        return Some(s);
                    }
                }
                if let Some(found) = find_string(v, key) {
                    return Some(found);
                }
            }
            None
        }
        Value::Array(items) => items.iter().find_map(|item| find_string(item, key)),
        _ => None,
    }
}
