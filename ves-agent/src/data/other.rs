// Copyright 2021-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::data::common::NameValuePair;
use crate::data::header::EventHeader;
use serde::{Serialize, Serializer};

/// A free-form event: a bag of name/value pairs for anything without a
/// dedicated domain.
#[derive(Debug, Clone)]
pub struct OtherEvent {
    pub(crate) header: EventHeader,
    fields: Vec<NameValuePair>,
}

impl OtherEvent {
    pub(crate) fn new(header: EventHeader) -> Self {
        Self {
            header,
            fields: Vec::new(),
        }
    }

    pub fn header(&self) -> &EventHeader {
        &self.header
    }

    pub fn header_mut(&mut self) -> &mut EventHeader {
        &mut self.header
    }

    pub fn add_field(&mut self, name: &str, value: &str) {
        self.fields.push(NameValuePair::new(name, value));
    }
}

// `otherFields` is a bare array of name/value pairs; the header is carried
// separately like every other domain.
impl Serialize for OtherEvent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.fields.serialize(serializer)
    }
}
