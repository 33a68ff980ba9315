// Copyright 2021-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Connector construction for collector clients: plain TCP and, behind the
//! `https` feature, rustls-based TLS with the certificate options a VNF
//! deployment needs (client cert/key, private CA bundle or directory, and
//! the peer-verification escape hatch for lab collectors).

use hyper_util::client::legacy::connect::HttpConnector;
use std::net::IpAddr;

pub fn http_connector(source_ip: Option<IpAddr>) -> HttpConnector {
    let mut connector = HttpConnector::new();
    connector.set_local_address(source_ip);
    connector
}

/// TLS parameters for a secure collector, consulted only when the agent is
/// configured with `secure = true`.
#[derive(Clone, Debug, Default)]
pub struct TlsSettings {
    pub cert_file: Option<std::path::PathBuf>,
    pub key_file: Option<std::path::PathBuf>,
    pub ca_info: Option<std::path::PathBuf>,
    pub ca_path: Option<std::path::PathBuf>,
    pub verify_peer: bool,
    pub verify_host: bool,
}

#[cfg(feature = "https")]
mod tls {
    use super::{http_connector, TlsSettings};
    use anyhow::Context;
    use hyper_util::client::legacy::connect::HttpConnector;
    use rustls::pki_types::{CertificateDer, PrivateKeyDer};
    use std::fs::File;
    use std::io::BufReader;
    use std::net::IpAddr;
    use std::path::Path;
    use std::sync::Arc;
    use tracing::warn;

    pub type HttpsConnector = hyper_rustls::HttpsConnector<HttpConnector>;

    pub fn https_connector(
        settings: &TlsSettings,
        source_ip: Option<IpAddr>,
    ) -> anyhow::Result<HttpsConnector> {
        let tls_config = client_tls_config(settings)?;
        let mut inner = http_connector(source_ip);
        inner.enforce_http(false);
        Ok(hyper_rustls::HttpsConnectorBuilder::new()
            .with_tls_config(tls_config)
            .https_or_http()
            .enable_http1()
            .wrap_connector(inner))
    }

    fn client_tls_config(settings: &TlsSettings) -> anyhow::Result<rustls::ClientConfig> {
        let builder = rustls::ClientConfig::builder();

        let builder = if settings.verify_peer {
            if !settings.verify_host {
                // rustls has no peer-only verification mode; host checking is
                // part of certificate verification.
                warn!("verify_host=false is ignored while verify_peer=true");
            }
            builder.with_root_certificates(root_store(settings)?)
        } else {
            warn!("TLS peer verification disabled for collector connection");
            builder
                .dangerous()
                .with_custom_certificate_verifier(Arc::new(NoVerification::new()))
        };

        let config = match (&settings.cert_file, &settings.key_file) {
            (Some(cert_file), Some(key_file)) => {
                let certs = load_certs(cert_file)?;
                let key = load_key(key_file)?;
                builder.with_client_auth_cert(certs, key)?
            }
            (None, None) => builder.with_no_client_auth(),
            _ => anyhow::bail!("client cert_file and key_file must be provided together"),
        };

        Ok(config)
    }

    fn root_store(settings: &TlsSettings) -> anyhow::Result<rustls::RootCertStore> {
        let mut roots = rustls::RootCertStore::empty();

        if let Some(ca_info) = &settings.ca_info {
            for cert in load_certs(ca_info)? {
                roots
                    .add(cert)
                    .with_context(|| format!("bad CA certificate in {}", ca_info.display()))?;
            }
        }
        if let Some(ca_path) = &settings.ca_path {
            for entry in std::fs::read_dir(ca_path)
                .with_context(|| format!("cannot read CA directory {}", ca_path.display()))?
            {
                let path = entry?.path();
                if !path.is_file() {
                    continue;
                }
                // Non-PEM files in the directory are skipped, matching the
                // permissive CAPATH behaviour VNF deployments rely on.
                if let Ok(certs) = load_certs(&path) {
                    for cert in certs {
                        let _ = roots.add(cert);
                    }
                }
            }
        }
        if settings.ca_info.is_none() && settings.ca_path.is_none() {
            let result = rustls_native_certs::load_native_certs();
            for cert in result.certs {
                let _ = roots.add(cert);
            }
        }

        anyhow::ensure!(!roots.is_empty(), "no usable root certificates found");
        Ok(roots)
    }

    fn load_certs(path: &Path) -> anyhow::Result<Vec<CertificateDer<'static>>> {
        let mut reader = BufReader::new(
            File::open(path).with_context(|| format!("cannot open {}", path.display()))?,
        );
        let certs = rustls_pemfile::certs(&mut reader)
            .collect::<Result<Vec<_>, _>>()
            .with_context(|| format!("bad PEM data in {}", path.display()))?;
        anyhow::ensure!(!certs.is_empty(), "no certificates in {}", path.display());
        Ok(certs)
    }

    fn load_key(path: &Path) -> anyhow::Result<PrivateKeyDer<'static>> {
        let mut reader = BufReader::new(
            File::open(path).with_context(|| format!("cannot open {}", path.display()))?,
        );
        rustls_pemfile::private_key(&mut reader)
            .with_context(|| format!("bad PEM data in {}", path.display()))?
            .with_context(|| format!("no private key in {}", path.display()))
    }

    /// Certificate verifier used when the deployment explicitly opts out of
    /// peer verification (`verify_peer = false`).
    #[derive(Debug)]
    struct NoVerification {
        provider: rustls::crypto::CryptoProvider,
    }

    impl NoVerification {
        fn new() -> Self {
            Self {
                provider: rustls::crypto::ring::default_provider(),
            }
        }
    }

    impl rustls::client::danger::ServerCertVerifier for NoVerification {
        fn verify_server_cert(
            &self,
            _end_entity: &CertificateDer<'_>,
            _intermediates: &[CertificateDer<'_>],
            _server_name: &rustls::pki_types::ServerName<'_>,
            _ocsp_response: &[u8],
            _now: rustls::pki_types::UnixTime,
        ) -> Result<rustls::client::danger::ServerCertVerified, rustls::Error> {
            Ok(rustls::client::danger::ServerCertVerified::assertion())
        }

        fn verify_tls12_signature(
            &self,
            message: &[u8],
            cert: &CertificateDer<'_>,
            dss: &rustls::DigitallySignedStruct,
        ) -> Result<rustls::client::danger::HandshakeSignatureValid, rustls::Error> {
            rustls::crypto::verify_tls12_signature(
                message,
                cert,
                dss,
                &self.provider.signature_verification_algorithms,
            )
        }

        fn verify_tls13_signature(
            &self,
            message: &[u8],
            cert: &CertificateDer<'_>,
            dss: &rustls::DigitallySignedStruct,
        ) -> Result<rustls::client::danger::HandshakeSignatureValid, rustls::Error> {
            rustls::crypto::verify_tls13_signature(
                message,
                cert,
                dss,
                &self.provider.signature_verification_algorithms,
            )
        }

        fn supported_verify_schemes(&self) -> Vec<rustls::SignatureScheme> {
            self.provider
                .signature_verification_algorithms
                .supported_schemes()
        }
    }
}

#[cfg(feature = "https")]
pub use tls::{https_connector, HttpsConnector};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_connector_binds_local_address() {
        let connector = http_connector(Some("127.0.0.1".parse().unwrap()));
        // No observable accessor on HttpConnector; construction not
        // panicking with a bind address is the contract here.
        let _ = connector;
    }

    #[test]
    fn tls_settings_default_is_insecure_off() {
        let settings = TlsSettings::default();
        assert!(!settings.verify_peer);
        assert!(settings.cert_file.is_none());
    }
}
