// Copyright 2021-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Agent configuration.
//!
//! Collector URLs are derived from the configured FQDN/port/path/topic:
//! `scheme://host:port[/path]/eventListener/v<api-version>[/topic]` for
//! events, with `<base>/clientThrottlingState` (no topic) for the
//! out-of-band throttling-state POST.

use crate::data::SourceType;
use crate::error::VesError;
use crate::metadata::DEFAULT_METADATA_URL;
use std::net::IpAddr;
use std::path::PathBuf;
use tracing::Level;
use ves_common::connector::TlsSettings;

/// Version of the event listener API this library implements.
pub const API_MAJOR_VERSION: u32 = 5;
pub const API_MINOR_VERSION: u32 = 0;

/// Default ring-buffer depth between producers and the dispatcher.
pub const DEFAULT_RING_BUFFER_SIZE: usize = 100;

fn api_version_string() -> String {
    if API_MINOR_VERSION == 0 {
        format!("{API_MAJOR_VERSION}")
    } else {
        format!("{API_MAJOR_VERSION}.{API_MINOR_VERSION}")
    }
}

/// One collector target: the event endpoint (URL, credentials, timeout,
/// local bind address) plus the throttling-state URL alongside it.
#[derive(Debug, Clone)]
pub(crate) struct CollectorConfig {
    pub event: ves_common::Endpoint,
    pub throttle_url: hyper::Uri,
}

/// Fully-resolved agent configuration, built via [`ConfigBuilder`].
#[derive(Debug, Clone)]
pub struct Config {
    pub(crate) primary: CollectorConfig,
    pub(crate) backup: Option<CollectorConfig>,
    pub(crate) ring_buffer_size: usize,
    pub(crate) secure: bool,
    pub(crate) tls: TlsSettings,
    pub(crate) source_type: SourceType,
    pub(crate) role: String,
    pub(crate) metadata_url: String,
    pub(crate) verbosity: u8,
}

impl Config {
    /// Start building a configuration for the given primary collector.
    pub fn builder(fqdn: &str, port: u16, source_type: SourceType, role: &str) -> ConfigBuilder {
        ConfigBuilder {
            fqdn: fqdn.to_string(),
            port,
            backup_fqdn: None,
            backup_port: None,
            path: None,
            topic: None,
            ring_buffer_size: DEFAULT_RING_BUFFER_SIZE,
            secure: false,
            tls: TlsSettings::default(),
            username: None,
            password: None,
            backup_username: None,
            backup_password: None,
            source_ip: None,
            backup_source_ip: None,
            source_type,
            role: role.to_string(),
            metadata_url: DEFAULT_METADATA_URL.to_string(),
            verbosity: 0,
        }
    }

    /// The log level matching the configured verbosity: 0 for normal
    /// operation, positive values for chattier logs.
    pub fn log_level(&self) -> Level {
        if self.verbosity == 0 {
            Level::INFO
        } else {
            Level::DEBUG
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    fqdn: String,
    port: u16,
    backup_fqdn: Option<String>,
    backup_port: Option<u16>,
    path: Option<String>,
    topic: Option<String>,
    ring_buffer_size: usize,
    secure: bool,
    tls: TlsSettings,
    username: Option<String>,
    password: Option<String>,
    backup_username: Option<String>,
    backup_password: Option<String>,
    source_ip: Option<IpAddr>,
    backup_source_ip: Option<IpAddr>,
    source_type: SourceType,
    role: String,
    metadata_url: String,
    verbosity: u8,
}

impl ConfigBuilder {
    /// Configure a secondary collector for failover.
    pub fn backup(mut self, fqdn: &str, port: u16) -> Self {
        self.backup_fqdn = Some(fqdn.to_string());
        self.backup_port = Some(port);
        self
    }

    /// Optional URL path segment in front of `eventListener`.
    pub fn path(mut self, path: &str) -> Self {
        self.path = Some(path.to_string());
        self
    }

    /// Optional topic segment appended to the event URL.
    pub fn topic(mut self, topic: &str) -> Self {
        self.topic = Some(topic.to_string());
        self
    }

    /// Ring-buffer depth. Zero keeps the default.
    pub fn ring_buffer_size(mut self, size: usize) -> Self {
        if size > 0 {
            self.ring_buffer_size = size;
        }
        self
    }

    /// Use HTTPS instead of HTTP. TLS parameters are only consulted when
    /// this is set.
    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    pub fn cert_file(mut self, path: PathBuf) -> Self {
        self.tls.cert_file = Some(path);
        self
    }

    pub fn key_file(mut self, path: PathBuf) -> Self {
        self.tls.key_file = Some(path);
        self
    }

    pub fn ca_info(mut self, path: PathBuf) -> Self {
        self.tls.ca_info = Some(path);
        self
    }

    pub fn ca_path(mut self, path: PathBuf) -> Self {
        self.tls.ca_path = Some(path);
        self
    }

    pub fn verify_peer(mut self, verify: bool) -> Self {
        self.tls.verify_peer = verify;
        self
    }

    pub fn verify_host(mut self, verify: bool) -> Self {
        self.tls.verify_host = verify;
        self
    }

    /// Basic-auth credentials for the primary collector.
    pub fn credentials(mut self, username: &str, password: &str) -> Self {
        self.username = Some(username.to_string());
        self.password = Some(password.to_string());
        self
    }

    /// Basic-auth credentials for the backup collector.
    pub fn backup_credentials(mut self, username: &str, password: &str) -> Self {
        self.backup_username = Some(username.to_string());
        self.backup_password = Some(password.to_string());
        self
    }

    /// Local address to bind when connecting to the primary collector.
    pub fn source_ip(mut self, ip: IpAddr) -> Self {
        self.source_ip = Some(ip);
        self
    }

    /// Local address to bind when connecting to the backup collector.
    pub fn backup_source_ip(mut self, ip: IpAddr) -> Self {
        self.backup_source_ip = Some(ip);
        self
    }

    /// Override the metadata service URL (used by tests and labs).
    pub fn metadata_url(mut self, url: &str) -> Self {
        self.metadata_url = url.to_string();
        self
    }

    /// 0 for normal operation, positive values for chattier logs.
    pub fn verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }

    pub fn build(self) -> Result<Config, VesError> {
        let scheme = if self.secure { "https" } else { "http" };
        let primary = build_collector(
            scheme,
            &self.fqdn,
            self.port,
            self.path.as_deref(),
            self.topic.as_deref(),
            self.username,
            self.password,
            self.source_ip,
        )?;
        let backup = match (self.backup_fqdn, self.backup_port) {
            (Some(fqdn), Some(port)) => Some(build_collector(
                scheme,
                &fqdn,
                port,
                self.path.as_deref(),
                self.topic.as_deref(),
                self.backup_username,
                self.backup_password,
                self.backup_source_ip,
            )?),
            _ => None,
        };

        Ok(Config {
            primary,
            backup,
            ring_buffer_size: self.ring_buffer_size,
            secure: self.secure,
            tls: self.tls,
            source_type: self.source_type,
            role: self.role,
            metadata_url: self.metadata_url,
            verbosity: self.verbosity,
        })
    }
}

#[allow(clippy::too_many_arguments)]
fn build_collector(
    scheme: &str,
    fqdn: &str,
    port: u16,
    path: Option<&str>,
    topic: Option<&str>,
    username: Option<String>,
    password: Option<String>,
    source_ip: Option<IpAddr>,
) -> Result<CollectorConfig, VesError> {
    let path_segment = match path {
        Some(path) if !path.is_empty() => format!("/{path}"),
        _ => String::new(),
    };
    let base = format!(
        "{scheme}://{fqdn}:{port}{path_segment}/eventListener/v{}",
        api_version_string()
    );
    let event = match topic {
        Some(topic) if !topic.is_empty() => format!("{base}/{topic}"),
        _ => base.clone(),
    };
    let throttle = format!("{base}/clientThrottlingState");

    let event_url = ves_common::parse_uri(&event)
        .map_err(|e| VesError::HttpLibraryFail(format!("bad event URL {event}: {e}")))?;
    let throttle_url = ves_common::parse_uri(&throttle)
        .map_err(|e| VesError::HttpLibraryFail(format!("bad throttling URL {throttle}: {e}")))?;

    let mut endpoint =
        ves_common::Endpoint::from_url(event_url).with_credentials(username, password);
    endpoint.source_ip = source_ip;
    Ok(CollectorConfig {
        event: endpoint,
        throttle_url,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_url_with_path_and_topic() {
        let config = Config::builder("collector.example.com", 30000, SourceType::VirtualMachine, "vFirewall")
            .path("vendor_event_listener")
            .topic("example_vnf")
            .build()
            .unwrap();
        assert_eq!(
            config.primary.event.url.to_string(),
            "http://collector.example.com:30000/vendor_event_listener/eventListener/v5/example_vnf"
        );
        assert_eq!(
            config.primary.throttle_url.to_string(),
            "http://collector.example.com:30000/vendor_event_listener/eventListener/v5/clientThrottlingState"
        );
    }

    #[test]
    fn minimal_urls() {
        let config = Config::builder("127.0.0.1", 8080, SourceType::Other, "role")
            .build()
            .unwrap();
        assert_eq!(
            config.primary.event.url.to_string(),
            "http://127.0.0.1:8080/eventListener/v5"
        );
        assert_eq!(
            config.primary.throttle_url.to_string(),
            "http://127.0.0.1:8080/eventListener/v5/clientThrottlingState"
        );
        assert!(config.backup.is_none());
        assert_eq!(config.ring_buffer_size, DEFAULT_RING_BUFFER_SIZE);
    }

    #[test]
    fn secure_scheme_and_backup() {
        let config = Config::builder("primary.example.com", 8443, SourceType::Router, "vRouter")
            .secure(true)
            .verify_peer(true)
            .verify_host(true)
            .backup("backup.example.com", 8443)
            .credentials("user", "pass")
            .backup_credentials("buser", "bpass")
            .build()
            .unwrap();
        assert!(config
            .primary
            .event
            .url
            .to_string()
            .starts_with("https://primary.example.com:8443"));
        let backup = config.backup.unwrap();
        assert!(backup
            .event
            .url
            .to_string()
            .starts_with("https://backup.example.com:8443"));
        assert_eq!(backup.event.username.as_deref(), Some("buser"));
    }

    #[test]
    fn bad_fqdn_fails_with_transport_error() {
        let result = Config::builder("not a host", 8080, SourceType::Other, "role").build();
        assert!(matches!(result, Err(VesError::HttpLibraryFail(_))));
    }

    #[test]
    fn verbosity_maps_to_level() {
        let quiet = Config::builder("h", 1, SourceType::Other, "r").build().unwrap();
        assert_eq!(quiet.log_level(), Level::INFO);
        let chatty = Config::builder("h", 1, SourceType::Other, "r")
            .verbosity(2)
            .build()
            .unwrap();
        assert_eq!(chatty.log_level(), Level::DEBUG);
    }

    #[test]
    fn zero_ring_buffer_size_keeps_default() {
        let config = Config::builder("h", 1, SourceType::Other, "r")
            .ring_buffer_size(0)
            .build()
            .unwrap();
        assert_eq!(config.ring_buffer_size, DEFAULT_RING_BUFFER_SIZE);
    }
}
