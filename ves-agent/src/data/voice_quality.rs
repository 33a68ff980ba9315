// Copyright 2021-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::data::common::{set_once, NameValuePair, SchemaVersion, VendorVnfNameFields};
use crate::data::header::EventHeader;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::Serialize;

pub const VOICE_QUALITY_VERSION: SchemaVersion = SchemaVersion::new(1, 0);

/// End-of-call voice quality metrics.
#[derive(Serialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct EndOfCallVqmSummaries {
    adjacency_name: String,
    endpoint_description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    endpoint_jitter: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    endpoint_rtp_octets_discarded: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    endpoint_rtp_octets_received: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    endpoint_rtp_octets_sent: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    endpoint_rtp_packets_discarded: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    endpoint_rtp_packets_received: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    endpoint_rtp_packets_sent: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    local_jitter: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    local_rtp_octets_discarded: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    local_rtp_octets_received: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    local_rtp_octets_sent: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    local_rtp_packets_discarded: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    local_rtp_packets_received: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    local_rtp_packets_sent: Option<i32>,
    /// Mean opinion score for conversational quality, 1.0..=5.0.
    #[serde(skip_serializing_if = "Option::is_none")]
    mos_cqe: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    packets_lost: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    packet_loss_percent: Option<f64>,
    /// R-factor voice quality rating, 0..=100.
    #[serde(skip_serializing_if = "Option::is_none")]
    r_factor: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    round_trip_delay: Option<i32>,
}

impl EndOfCallVqmSummaries {
    pub fn new(adjacency_name: &str, endpoint_description: &str) -> Self {
        Self {
            adjacency_name: adjacency_name.to_string(),
            endpoint_description: endpoint_description.to_string(),
            ..Default::default()
        }
    }

    pub fn set_endpoint_jitter(&mut self, v: i32) {
        set_once(&mut self.endpoint_jitter, "endpointJitter", v);
    }
    pub fn set_endpoint_rtp_octets_discarded(&mut self, v: i32) {
        set_once(&mut self.endpoint_rtp_octets_discarded, "endpointRtpOctetsDiscarded", v);
    }
    pub fn set_endpoint_rtp_octets_received(&mut self, v: i32) {
        set_once(&mut self.endpoint_rtp_octets_received, "endpointRtpOctetsReceived", v);
    }
    pub fn set_endpoint_rtp_octets_sent(&mut self, v: i32) {
        set_once(&mut self.endpoint_rtp_octets_sent, "endpointRtpOctetsSent", v);
    }
    pub fn set_endpoint_rtp_packets_discarded(&mut self, v: i32) {
        set_once(&mut self.endpoint_rtp_packets_discarded, "endpointRtpPacketsDiscarded", v);
    }
    pub fn set_endpoint_rtp_packets_received(&mut self, v: i32) {
        set_once(&mut self.endpoint_rtp_packets_received, "endpointRtpPacketsReceived", v);
    }
    pub fn set_endpoint_rtp_packets_sent(&mut self, v: i32) {
        set_once(&mut self.endpoint_rtp_packets_sent, "endpointRtpPacketsSent", v);
    }
    pub fn set_local_jitter(&mut self, v: i32) {
        set_once(&mut self.local_jitter, "localJitter", v);
    }
    pub fn set_local_rtp_octets_discarded(&mut self, v: i32) {
        set_once(&mut self.local_rtp_octets_discarded, "localRtpOctetsDiscarded", v);
    }
    pub fn set_local_rtp_octets_received(&mut self, v: i32) {
        set_once(&mut self.local_rtp_octets_received, "localRtpOctetsReceived", v);
    }
    pub fn set_local_rtp_octets_sent(&mut self, v: i32) {
        set_once(&mut self.local_rtp_octets_sent, "localRtpOctetsSent", v);
    }
    pub fn set_local_rtp_packets_discarded(&mut self, v: i32) {
        set_once(&mut self.local_rtp_packets_discarded, "localRtpPacketsDiscarded", v);
    }
    pub fn set_local_rtp_packets_received(&mut self, v: i32) {
        set_once(&mut self.local_rtp_packets_received, "localRtpPacketsReceived", v);
    }
    pub fn set_local_rtp_packets_sent(&mut self, v: i32) {
        set_once(&mut self.local_rtp_packets_sent, "localRtpPacketsSent", v);
    }
    pub fn set_mos_cqe(&mut self, v: f64) {
        set_once(&mut self.mos_cqe, "mosCqe", v);
    }
    pub fn set_packets_lost(&mut self, v: i32) {
        set_once(&mut self.packets_lost, "packetsLost", v);
    }
    pub fn set_packet_loss_percent(&mut self, v: f64) {
        set_once(&mut self.packet_loss_percent, "packetLossPercent", v);
    }
    pub fn set_r_factor(&mut self, v: i32) {
        set_once(&mut self.r_factor, "rFactor", v);
    }
    pub fn set_round_trip_delay(&mut self, v: i32) {
        set_once(&mut self.round_trip_delay, "roundTripDelay", v);
    }
}

/// A voice-quality event.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct VoiceQuality {
    #[serde(skip)]
    pub(crate) header: EventHeader,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    additional_information: Vec<NameValuePair>,
    callee_side_codec: String,
    caller_side_codec: String,
    correlator: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    end_of_call_vqm_summaries: Option<EndOfCallVqmSummaries>,
    /// Opaque mid-call RTCP payload, base64-encoded at the boundary.
    mid_call_rtcp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    phone_number: Option<String>,
    vendor_vnf_name_fields: VendorVnfNameFields,
    voice_quality_fields_version: SchemaVersion,
}

impl VoiceQuality {
    pub(crate) fn new(
        header: EventHeader,
        callee_side_codec: &str,
        caller_side_codec: &str,
        correlator: &str,
        mid_call_rtcp: &[u8],
        vendor_name: &str,
    ) -> Self {
        Self {
            header,
            additional_information: Vec::new(),
            callee_side_codec: callee_side_codec.to_string(),
            caller_side_codec: caller_side_codec.to_string(),
            correlator: correlator.to_string(),
            end_of_call_vqm_summaries: None,
            mid_call_rtcp: BASE64.encode(mid_call_rtcp),
            phone_number: None,
            vendor_vnf_name_fields: VendorVnfNameFields::new(vendor_name),
            voice_quality_fields_version: VOICE_QUALITY_VERSION,
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

    pub fn set_phone_number(&mut self, phone_number: &str) {
        set_once(&mut self.phone_number, "phoneNumber", phone_number.to_string());
    }

    /// Attach the end-of-call metrics summary. Single-shot.
    pub fn set_end_of_call_metrics(&mut self, summaries: EndOfCallVqmSummaries) {
        set_once(
            &mut self.end_of_call_vqm_summaries,
            "endOfCallVqmSummaries",
            summaries,
        );
    }

    pub fn add_additional_info(&mut self, name: &str, value: &str) {
        self.additional_information
            .push(NameValuePair::new(name, value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::common::EventDomain;
    use crate::metadata::Identity;
    use serde_json::json;

    fn voice_quality() -> VoiceQuality {
        let header = EventHeader::new(
            EventDomain::VoiceQuality,
            "VoiceQuality_endOfCall",
            "vq000000001",
            1,
            &Identity::for_tests(),
        );
        VoiceQuality::new(header, "PCMA", "PCMU", "call-17", b"rtcp-bytes", "metaswitch")
    }

    #[test]
    fn rtcp_payload_is_base64_encoded() {
        let value = serde_json::to_value(voice_quality()).unwrap();
        assert_eq!(value["midCallRtcp"], json!("cnRjcC1ieXRlcw=="));
        assert_eq!(value["calleeSideCodec"], json!("PCMA"));
        assert_eq!(value["callerSideCodec"], json!("PCMU"));
        assert_eq!(value["voiceQualityFieldsVersion"], json!(1));
    }

    #[test]
    fn end_of_call_metrics_serialize() {
        let mut vq = voice_quality();
        let mut summaries = EndOfCallVqmSummaries::new("sbc-1", "Caller");
        summaries.set_mos_cqe(4.2);
        summaries.set_r_factor(88);
        summaries.set_local_jitter(3);
        vq.set_end_of_call_metrics(summaries);
        let value = serde_json::to_value(&vq).unwrap();
        assert_eq!(
            value["endOfCallVqmSummaries"],
            json!({
                "adjacencyName": "sbc-1",
                "endpointDescription": "Caller",
                "localJitter": 3,
                "mosCqe": 4.2,
                "rFactor": 88,
            })
        );
    }

    #[test]
    fn end_of_call_metrics_single_shot() {
        let mut vq = voice_quality();
        vq.set_end_of_call_metrics(EndOfCallVqmSummaries::new("first", "Caller"));
        vq.set_end_of_call_metrics(EndOfCallVqmSummaries::new("second", "Callee"));
        let value = serde_json::to_value(&vq).unwrap();
        assert_eq!(value["endOfCallVqmSummaries"]["adjacencyName"], json!("first"));
    }
}
