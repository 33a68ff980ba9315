// Copyright 2021-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! The dispatcher: a single worker that drains the event queue, encodes
//! each event and POSTs it to the active collector, handles any commands in
//! the response, and sends the occasional out-of-band throttling-state
//! report.

pub mod http_client;

use crate::command;
use crate::config::{CollectorConfig, Config};
use crate::data::Event;
use crate::encode::encode_event;
use crate::error::VesError;
use crate::metadata::Identity;
use crate::throttle::ThrottleState;
use bytes::Bytes;
use http::header::{AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use http::HeaderValue;
use std::sync::atomic::{AtomicI64, AtomicU8, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};
use ves_common::MutexExt;

/// Messages flowing from producers to the dispatcher. `Terminate` is the
/// in-band shutdown request; it travels the same queue as events so the
/// dispatcher wakes up to it.
#[derive(Debug)]
pub(crate) enum WorkerMessage {
    Event(Box<Event>),
    Terminate,
}

/// Dispatcher lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum HandlerState {
    Uninitialized = 0,
    Inactive = 1,
    Active = 2,
    RequestTerminate = 3,
    Terminating = 4,
    Terminated = 5,
}

impl HandlerState {
    fn from_u8(value: u8) -> HandlerState {
        match value {
            1 => HandlerState::Inactive,
            2 => HandlerState::Active,
            3 => HandlerState::RequestTerminate,
            4 => HandlerState::Terminating,
            5 => HandlerState::Terminated,
            _ => HandlerState::Uninitialized,
        }
    }
}

/// State shared between the public handle, the event constructors and the
/// dispatcher thread.
pub(crate) struct SharedState {
    state: AtomicU8,
    /// Next event sequence number; unique and strictly increasing per
    /// process, starting at 1.
    sequence: AtomicI64,
    /// Measurement interval in seconds as last commanded by the collector;
    /// 0 means not yet specified.
    pub(crate) measurement_interval: Mutex<i64>,
    pub(crate) identity: Identity,
    pub(crate) role: String,
}

impl SharedState {
    pub fn new(identity: Identity, role: String) -> Self {
        Self {
            state: AtomicU8::new(HandlerState::Uninitialized as u8),
            sequence: AtomicI64::new(1),
            measurement_interval: Mutex::new(0),
            identity,
            role,
        }
    }

    pub fn state(&self) -> HandlerState {
        HandlerState::from_u8(self.state.load(Ordering::SeqCst))
    }

    pub fn set_state(&self, state: HandlerState) {
        self.state.store(state as u8, Ordering::SeqCst);
    }

    pub fn next_sequence(&self) -> i64 {
        self.sequence.fetch_add(1, Ordering::SeqCst)
    }

    pub fn measurement_interval(&self) -> i64 {
        *self.measurement_interval.lock_or_panic()
    }
}

/// One prepared collector: its transport plus the two target URLs and the
/// ready-made Basic-auth header.
pub(crate) struct CollectorSession {
    client: Box<dyn http_client::HttpClient>,
    event_url: hyper::Uri,
    throttle_url: hyper::Uri,
    authorization: Option<HeaderValue>,
}

impl CollectorSession {
    pub fn from_config(
        config: &Config,
        collector: &CollectorConfig,
    ) -> Result<Self, VesError> {
        Ok(Self {
            client: http_client::from_config(config, collector)?,
            event_url: collector.event.url.clone(),
            throttle_url: collector.throttle_url.clone(),
            authorization: collector.event.authorization(),
        })
    }

    #[cfg(test)]
    #[allow(clippy::unwrap_used)]
    pub(crate) fn for_tests(
        client: Box<dyn http_client::HttpClient>,
        event_url: &str,
        throttle_url: &str,
    ) -> Self {
        Self {
            client,
            event_url: event_url.parse().unwrap(),
            throttle_url: throttle_url.parse().unwrap(),
            authorization: None,
        }
    }
}

enum PostTarget {
    Event,
    ThrottlingState,
}

pub(crate) struct Dispatcher {
    rx: mpsc::Receiver<WorkerMessage>,
    shared: Arc<SharedState>,
    primary: CollectorSession,
    backup: Option<CollectorSession>,
    on_backup: bool,
    throttle: ThrottleState,
}

impl Dispatcher {
    pub fn new(
        rx: mpsc::Receiver<WorkerMessage>,
        shared: Arc<SharedState>,
        primary: CollectorSession,
        backup: Option<CollectorSession>,
    ) -> Self {
        Self {
            rx,
            shared,
            primary,
            backup,
            on_backup: false,
            throttle: ThrottleState::default(),
        }
    }

    pub async fn run(mut self) {
        info!("event dispatcher started");

        // Defend against a terminate racing in before we ever ran.
        if self.shared.state() == HandlerState::Inactive {
            self.shared.set_state(HandlerState::Active);
        } else {
            error!(
                state = ?self.shared.state(),
                "dispatcher state was not Inactive at start-up - exiting immediately"
            );
        }

        while self.shared.state() == HandlerState::Active {
            let Some(message) = self.rx.recv().await else {
                // Every sender is gone; nothing more can arrive.
                break;
            };
            match message {
                WorkerMessage::Terminate => {
                    debug!("dispatcher received terminate request");
                    self.shared.set_state(HandlerState::Terminating);
                    break;
                }
                WorkerMessage::Event(event) => self.dispatch(*event).await,
            }
        }

        // Producers are rejected from this point on; deplete whatever is
        // still queued without posting it.
        self.shared.set_state(HandlerState::Terminating);
        let mut discarded = 0usize;
        while let Ok(message) = self.rx.try_recv() {
            if matches!(message, WorkerMessage::Event(_)) {
                discarded += 1;
            }
        }
        if discarded > 0 {
            warn!(count = discarded, "discarded queued events at shutdown");
        }
        self.shared.set_state(HandlerState::Terminated);
        info!("event dispatcher stopped");
    }

    async fn dispatch(&mut self, event: Event) {
        let spec = self.throttle.spec_for(event.domain());
        let document = match encode_event(&event, spec) {
            Ok(document) => document,
            Err(e) => {
                error!(error = %e, "failed to encode event - dropped");
                return;
            }
        };
        let body = match serde_json::to_vec(&document) {
            Ok(body) => body,
            Err(e) => {
                error!(error = %e, "failed to serialize event - dropped");
                return;
            }
        };
        debug!(
            domain = event.domain().as_str(),
            sequence = event.header().sequence(),
            size = body.len(),
            "sending event"
        );

        let response_body = self.post(PostTarget::Event, Bytes::from(body)).await;

        // The event is dropped here whether or not delivery succeeded.
        drop(event);

        if let Some(response_body) = response_body {
            if !response_body.is_empty() {
                self.handle_response(&response_body).await;
            }
        }
    }

    async fn handle_response(&mut self, body: &[u8]) {
        match command::handle_response(
            body,
            &mut self.throttle,
            &self.shared.measurement_interval,
        ) {
            Ok(Some(report)) => self.priority_post(report).await,
            Ok(None) => {}
            Err(e) => error!(error = %e, "failed to handle collector response"),
        }
    }

    /// POST the throttling-state report to the separate throttling URL.
    /// Any response to it is not interpreted.
    async fn priority_post(&mut self, report: serde_json::Value) {
        debug!("priority post of throttling state");
        match serde_json::to_vec(&report) {
            Ok(body) => {
                let _ = self
                    .post(PostTarget::ThrottlingState, Bytes::from(body))
                    .await;
            }
            Err(e) => error!(error = %e, "failed to serialize throttling state"),
        }
    }

    /// POST a body to the active collector; on failure flip to the other
    /// collector for subsequent posts. Returns the response body on any 2xx.
    async fn post(&mut self, target: PostTarget, body: Bytes) -> Option<Bytes> {
        let session = match (self.on_backup, &self.backup) {
            (true, Some(backup)) => backup,
            _ => &self.primary,
        };
        let url = match target {
            PostTarget::Event => session.event_url.clone(),
            PostTarget::ThrottlingState => session.throttle_url.clone(),
        };

        let mut builder = http::Request::builder()
            .method(http::Method::POST)
            .uri(url)
            .header(CONTENT_TYPE, ves_common::header::APPLICATION_JSON)
            .header(
                USER_AGENT,
                concat!("ves-agent/", env!("CARGO_PKG_VERSION")),
            );
        if let Some(authorization) = &session.authorization {
            builder = builder.header(AUTHORIZATION, authorization.clone());
        }
        let request = match builder.body(body) {
            Ok(request) => request,
            Err(e) => {
                error!(error = %e, "failed to build collector request");
                return None;
            }
        };

        match session.client.request(request).await {
            Ok(response) if response.status().is_success() => {
                debug!(status = %response.status(), "collector accepted post");
                Some(response.into_body())
            }
            Ok(response) => {
                error!(status = %response.status(), "unexpected collector response - event dropped");
                self.fail_over();
                None
            }
            Err(e) => {
                error!(error = %e, "failed to transfer post to collector - event dropped");
                self.fail_over();
                None
            }
        }
    }

    fn fail_over(&mut self) {
        if self.backup.is_some() {
            self.on_backup = !self.on_backup;
            info!(
                collector = if self.on_backup { "backup" } else { "primary" },
                "switching active collector"
            );
        }
    }
}

/// Spawn the dispatcher on its own thread with a current-thread runtime.
pub(crate) fn spawn(dispatcher: Dispatcher) -> Result<std::thread::JoinHandle<()>, VesError> {
    std::thread::Builder::new()
        .name("ves-dispatcher".to_string())
        .spawn(move || {
            let runtime = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(runtime) => runtime,
                Err(e) => {
                    error!(error = %e, "failed to build dispatcher runtime");
                    dispatcher.shared.set_state(HandlerState::Terminated);
                    return;
                }
            };
            runtime.block_on(dispatcher.run());
        })
        .map_err(|e| VesError::HttpLibraryFail(format!("failed to spawn dispatcher: {e}")))
}
