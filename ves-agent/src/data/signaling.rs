// Copyright 2021-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::data::common::{set_once, NameValuePair, SchemaVersion, VendorVnfNameFields};
use crate::data::header::EventHeader;
use serde::Serialize;

pub const SIGNALING_VERSION: SchemaVersion = SchemaVersion::new(2, 0);

/// A SIP signaling event.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Signaling {
    #[serde(skip)]
    pub(crate) header: EventHeader,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    additional_information: Vec<NameValuePair>,
    #[serde(skip_serializing_if = "Option::is_none")]
    compressed_sip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    correlator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    local_ip_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    local_port: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    remote_ip_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    remote_port: Option<String>,
    signaling_fields_version: SchemaVersion,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary_sip: Option<String>,
    vendor_vnf_name_fields: VendorVnfNameFields,
}

impl Signaling {
    pub(crate) fn new(header: EventHeader, vendor_name: &str) -> Self {
        Self {
            header,
            additional_information: Vec::new(),
            compressed_sip: None,
            correlator: None,
            local_ip_address: None,
            local_port: None,
            remote_ip_address: None,
            remote_port: None,
            signaling_fields_version: SIGNALING_VERSION,
            summary_sip: None,
            vendor_vnf_name_fields: VendorVnfNameFields::new(vendor_name),
        }
    }

    pub fn header(&self) -> &EventHeader {
        &self.header
    }

    pub fn header_mut(&mut self) -> &mut EventHeader {
        &mut self.header
    }

    pub fn vendor_fields_mut(&mut self) -> &mut VendorVnfNameFields {
        &mut self.vendor_vnf_name_fields
    }

    pub fn set_correlator(&mut self, correlator: &str) {
        set_once(&mut self.correlator, "correlator", correlator.to_string());
    }

    pub fn set_local_ip_address(&mut self, addr: &str) {
        set_once(&mut self.local_ip_address, "localIpAddress", addr.to_string());
    }

    pub fn set_local_port(&mut self, port: &str) {
        set_once(&mut self.local_port, "localPort", port.to_string());
    }

    pub fn set_remote_ip_address(&mut self, addr: &str) {
        set_once(&mut self.remote_ip_address, "remoteIpAddress", addr.to_string());
    }

    pub fn set_remote_port(&mut self, port: &str) {
        set_once(&mut self.remote_port, "remotePort", port.to_string());
    }

    pub fn set_compressed_sip(&mut self, sip: &str) {
        set_once(&mut self.compressed_sip, "compressedSip", sip.to_string());
    }

    pub fn set_summary_sip(&mut self, sip: &str) {
        set_once(&mut self.summary_sip, "summarySip", sip.to_string());
    }

    pub fn add_additional_info(&mut self, name: &str, value: &str) {
        self.additional_information
            .push(NameValuePair::new(name, value));
    }
}
