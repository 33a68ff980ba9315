// Copyright 2021-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use thiserror::Error;

/// Errors surfaced by the public agent API.
///
/// Asynchronous delivery failures inside the dispatcher are logged and the
/// affected event dropped; they are never surfaced through this type.
#[derive(Debug, Error)]
pub enum VesError {
    /// Transport setup failed; initialization aborts.
    #[error("HTTP transport setup failed: {0}")]
    HttpLibraryFail(String),

    /// The collector response had unexpected structure; the whole command
    /// list was rejected.
    #[error("unexpected JSON structure in collector response")]
    BadJsonFormat,

    /// A metadata key was missing; the default identity is used.
    #[error("metadata key not found: {0}")]
    JsonKeyNotFound(&'static str),

    /// The metadata service could not be reached; the default identity is
    /// used.
    #[error("metadata service unavailable")]
    NoMetadata,

    /// The metadata service returned something unparseable; the default
    /// identity is used.
    #[error("metadata service returned unusable data")]
    BadMetadata,

    /// The ring buffer was full; the event was dropped.
    #[error("event buffer full - event dropped")]
    EventBufferFull,

    /// `post_event` was called before `run` or after termination started;
    /// the event was dropped.
    #[error("event handler not active - event dropped")]
    EventHandlerInactive,
}

impl VesError {
    /// Human-readable description, for callers that log status codes rather
    /// than propagate them.
    pub fn error_string(&self) -> String {
        self.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_strings_are_stable() {
        assert_eq!(
            VesError::EventBufferFull.error_string(),
            "event buffer full - event dropped"
        );
        assert_eq!(
            VesError::EventHandlerInactive.error_string(),
            "event handler not active - event dropped"
        );
    }
}
