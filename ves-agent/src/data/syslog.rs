// Copyright 2021-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::data::common::{
    set_once, SchemaVersion, SourceType, SyslogFacility, SyslogSeverity,
};
use crate::data::header::EventHeader;
use serde::Serialize;

pub const SYSLOG_VERSION: SchemaVersion = SchemaVersion::new(3, 0);

/// A syslog event.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Syslog {
    #[serde(skip)]
    pub(crate) header: EventHeader,
    /// Additional syslog fields as a `name=value` delimited string, per the
    /// listener schema.
    #[serde(skip_serializing_if = "Option::is_none")]
    additional_fields: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    event_source_host: Option<String>,
    event_source_type: SourceType,
    #[serde(skip_serializing_if = "Option::is_none")]
    syslog_facility: Option<SyslogFacility>,
    syslog_fields_version: SchemaVersion,
    syslog_msg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    syslog_pri: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    syslog_proc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    syslog_proc_id: Option<i64>,
    #[serde(rename = "syslogSData", skip_serializing_if = "Option::is_none")]
    syslog_s_data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    syslog_sd_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    syslog_sev: Option<SyslogSeverity>,
    syslog_tag: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    syslog_ver: Option<i64>,
}

impl Syslog {
    pub(crate) fn new(
        header: EventHeader,
        event_source_type: SourceType,
        syslog_msg: &str,
        syslog_tag: &str,
    ) -> Self {
        Self {
            header,
            additional_fields: None,
            event_source_host: None,
            event_source_type,
            syslog_facility: None,
            syslog_fields_version: SYSLOG_VERSION,
            syslog_msg: syslog_msg.to_string(),
            syslog_pri: None,
            syslog_proc: None,
            syslog_proc_id: None,
            syslog_s_data: None,
            syslog_sd_id: None,
            syslog_sev: None,
            syslog_tag: syslog_tag.to_string(),
            syslog_ver: None,
        }
    }

    pub fn header(&self) -> &EventHeader {
        &self.header
    }

    pub fn header_mut(&mut self) -> &mut EventHeader {
        &mut self.header
    }

    pub fn set_additional_fields(&mut self, fields: &str) {
        set_once(&mut self.additional_fields, "additionalFields", fields.to_string());
    }

    pub fn set_event_source_host(&mut self, host: &str) {
        set_once(&mut self.event_source_host, "eventSourceHost", host.to_string());
    }

    pub fn set_facility(&mut self, facility: SyslogFacility) {
        set_once(&mut self.syslog_facility, "syslogFacility", facility);
    }

    pub fn set_priority(&mut self, priority: i32) {
        set_once(&mut self.syslog_pri, "syslogPri", priority);
    }

    pub fn set_proc(&mut self, proc_name: &str) {
        set_once(&mut self.syslog_proc, "syslogProc", proc_name.to_string());
    }

    pub fn set_proc_id(&mut self, proc_id: i64) {
        set_once(&mut self.syslog_proc_id, "syslogProcId", proc_id);
    }

    pub fn set_structured_data(&mut self, s_data: &str) {
        set_once(&mut self.syslog_s_data, "syslogSData", s_data.to_string());
    }

    pub fn set_sd_id(&mut self, sd_id: &str) {
        set_once(&mut self.syslog_sd_id, "syslogSdId", sd_id.to_string());
    }

    pub fn set_severity(&mut self, severity: SyslogSeverity) {
        set_once(&mut self.syslog_sev, "syslogSev", severity);
    }

    pub fn set_version(&mut self, version: i64) {
        set_once(&mut self.syslog_ver, "syslogVer", version);
    }
}
