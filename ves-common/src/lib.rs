// Copyright 2021-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0
#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use http::HeaderValue;
use std::net::IpAddr;
use std::str::FromStr;
use std::sync::{Mutex, MutexGuard};

pub mod connector;
pub mod http_common;

/// Extension trait for `Mutex` that acquires the lock, panicking if it is
/// poisoned. Avoids scattering `#[allow(clippy::unwrap_used)]` over every
/// lock site.
pub trait MutexExt<T> {
    fn lock_or_panic(&self) -> MutexGuard<'_, T>;
}

impl<T> MutexExt<T> for Mutex<T> {
    #[inline(always)]
    #[track_caller]
    fn lock_or_panic(&self) -> MutexGuard<'_, T> {
        #[allow(clippy::unwrap_used)]
        self.lock().unwrap()
    }
}

pub mod header {
    #![allow(clippy::declare_interior_mutable_const)]
    use http::HeaderValue;

    pub const APPLICATION_JSON_STR: &str = "application/json";
    pub const APPLICATION_JSON: HeaderValue = HeaderValue::from_static(APPLICATION_JSON_STR);
}

pub fn parse_uri(uri: &str) -> anyhow::Result<hyper::Uri> {
    Ok(hyper::Uri::from_str(uri)?)
}

/// A single collector endpoint: the URL to POST to, the Basic-auth
/// credentials for it, the request timeout and an optional local address to
/// bind outgoing connections to.
#[derive(Clone, Debug)]
pub struct Endpoint {
    pub url: hyper::Uri,
    pub username: Option<String>,
    pub password: Option<String>,
    pub timeout_ms: u64,
    pub source_ip: Option<IpAddr>,
}

impl Default for Endpoint {
    fn default() -> Self {
        Endpoint {
            url: hyper::Uri::default(),
            username: None,
            password: None,
            timeout_ms: Self::DEFAULT_TIMEOUT,
            source_ip: None,
        }
    }
}

impl Endpoint {
    /// Default value for the timeout field in milliseconds.
    pub const DEFAULT_TIMEOUT: u64 = 5_000;

    #[inline]
    pub fn from_url(url: hyper::Uri) -> Endpoint {
        Endpoint {
            url,
            ..Default::default()
        }
    }

    pub fn with_credentials(
        mut self,
        username: Option<String>,
        password: Option<String>,
    ) -> Self {
        self.username = username;
        self.password = password;
        self
    }

    /// Set a custom timeout for this endpoint. Pass 0 to keep the default.
    pub fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = if timeout_ms == 0 {
            Self::DEFAULT_TIMEOUT
        } else {
            timeout_ms
        };
        self
    }

    /// The `Authorization: Basic` header value for this endpoint, when
    /// credentials are configured.
    pub fn authorization(&self) -> Option<HeaderValue> {
        let username = self.username.as_deref()?;
        let password = self.password.as_deref().unwrap_or_default();
        let encoded = BASE64.encode(format!("{username}:{password}"));
        HeaderValue::from_str(&format!("Basic {encoded}")).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_authorization_encodes_credentials() {
        let endpoint = Endpoint::from_url(parse_uri("http://collector:8080/events").unwrap())
            .with_credentials(Some("user".to_string()), Some("pass".to_string()));
        let header = endpoint.authorization().unwrap();
        // base64("user:pass")
        assert_eq!(header.to_str().unwrap(), "Basic dXNlcjpwYXNz");
    }

    #[test]
    fn endpoint_without_credentials_has_no_authorization() {
        let endpoint = Endpoint::from_url(parse_uri("http://collector:8080/events").unwrap());
        assert!(endpoint.authorization().is_none());
    }

    #[test]
    fn zero_timeout_keeps_default() {
        let endpoint = Endpoint::default().with_timeout(0);
        assert_eq!(endpoint.timeout_ms, Endpoint::DEFAULT_TIMEOUT);
        let endpoint = Endpoint::default().with_timeout(250);
        assert_eq!(endpoint.timeout_ms, 250);
    }

    #[test]
    fn mutex_ext_locks() {
        let m = Mutex::new(41);
        *m.lock_or_panic() += 1;
        assert_eq!(*m.lock_or_panic(), 42);
    }
}
