// Copyright 2021-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

mod common;
mod event;
mod fault;
mod header;
mod heartbeat;
mod measurement;
mod other;
mod signaling;
mod state_change;
mod syslog;
mod voice_quality;

pub use common::*;
pub use event::*;
pub use fault::*;
pub use header::*;
pub use heartbeat::*;
pub use measurement::*;
pub use other::*;
pub use signaling::*;
pub use state_change::*;
pub use syslog::*;
pub use voice_quality::*;
