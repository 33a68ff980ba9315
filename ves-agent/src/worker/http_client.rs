// Copyright 2021-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Collector transport.
//!
//! The dispatcher talks to the collector through the [`HttpClient`] trait so
//! tests can substitute a capturing client; production uses a hyper client,
//! with rustls behind the `https` feature.

use crate::config::{CollectorConfig, Config};
use crate::error::VesError;
use bytes::Bytes;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use tracing::debug;
use ves_common::http_common::{
    collect_response_bytes, new_client_periodic, Connect, GenericHttpClient, HttpError,
};

pub type ResponseFuture =
    Pin<Box<dyn Future<Output = Result<http::Response<Bytes>, HttpError>> + Send>>;

pub trait HttpClient: Send + Sync {
    fn request(&self, req: http::Request<Bytes>) -> ResponseFuture;
}

/// Build the transport for one collector, honoring the secure flag, TLS
/// parameters and local bind address.
pub(crate) fn from_config(
    config: &Config,
    collector: &CollectorConfig,
) -> Result<Box<dyn HttpClient>, VesError> {
    let timeout = Duration::from_millis(collector.event.timeout_ms);
    if !config.secure {
        debug!(url = %collector.event.url, "using plain HTTP collector client");
        let connector = ves_common::connector::http_connector(collector.event.source_ip);
        return Ok(Box::new(HyperClient {
            client: new_client_periodic(connector),
            timeout,
        }));
    }

    #[cfg(feature = "https")]
    {
        debug!(url = %collector.event.url, "using HTTPS collector client");
        let connector =
            ves_common::connector::https_connector(&config.tls, collector.event.source_ip)
                .map_err(|e| VesError::HttpLibraryFail(e.to_string()))?;
        Ok(Box::new(HyperClient {
            client: new_client_periodic(connector),
            timeout,
        }))
    }
    #[cfg(not(feature = "https"))]
    {
        Err(VesError::HttpLibraryFail(
            "secure collector configured but the https feature is not enabled".to_string(),
        ))
    }
}

struct HyperClient<C: Connect> {
    client: GenericHttpClient<C>,
    timeout: Duration,
}

impl<C: Connect> HttpClient for HyperClient<C> {
    fn request(&self, req: http::Request<Bytes>) -> ResponseFuture {
        let client = self.client.clone();
        let timeout = self.timeout;
        Box::pin(async move {
            let (parts, body) = req.into_parts();
            let req = http::Request::from_parts(parts, http_body_util::Full::new(body));
            let response = tokio::time::timeout(timeout, client.request(req))
                .await
                .map_err(|_| HttpError::Timeout)?
                .map_err(|e| HttpError::Network(e.to_string()))?;
            let status = response.status();
            let bytes = collect_response_bytes(response).await?;
            http::Response::builder()
                .status(status)
                .body(bytes)
                .map_err(|e| HttpError::Other(format!("failed to build response: {e}")))
        })
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};
    use ves_common::MutexExt;

    /// A scripted client: captures every request and pops canned responses,
    /// answering 202 with an empty body when the script runs dry.
    #[derive(Clone, Default)]
    pub(crate) struct MockClient {
        pub requests: Arc<Mutex<Vec<http::Request<Bytes>>>>,
        responses: Arc<Mutex<VecDeque<Result<http::Response<Bytes>, HttpError>>>>,
    }

    impl MockClient {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn push_response(&self, status: u16, body: &str) {
            #[allow(clippy::unwrap_used)]
            let response = http::Response::builder()
                .status(status)
                .body(Bytes::from(body.to_string()))
                .unwrap();
            self.responses.lock_or_panic().push_back(Ok(response));
        }

        pub fn push_error(&self) {
            self.responses
                .lock_or_panic()
                .push_back(Err(HttpError::Network("connection refused".to_string())));
        }

        pub fn request_count(&self) -> usize {
            self.requests.lock_or_panic().len()
        }

        pub fn request_uri(&self, index: usize) -> String {
            self.requests.lock_or_panic()[index].uri().to_string()
        }

        pub fn request_body_json(&self, index: usize) -> serde_json::Value {
            #[allow(clippy::unwrap_used)]
            serde_json::from_slice(self.requests.lock_or_panic()[index].body()).unwrap()
        }
    }

    impl HttpClient for MockClient {
        fn request(&self, req: http::Request<Bytes>) -> ResponseFuture {
            let response = self.responses.lock_or_panic().pop_front();
            self.requests.lock_or_panic().push(req);
            Box::pin(async move {
                match response {
                    Some(scripted) => scripted,
                    #[allow(clippy::unwrap_used)]
                    None => Ok(http::Response::builder()
                        .status(202)
                        .body(Bytes::new())
                        .unwrap()),
                }
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::MockClient;
    use super::*;

    #[tokio::test]
    async fn mock_client_captures_requests() {
        let mock = MockClient::new();
        mock.push_response(200, "ok");
        let response = mock
            .request(
                http::Request::builder()
                    .method(http::Method::POST)
                    .uri("http://collector:8080/events")
                    .body(Bytes::from_static(b"{}"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
        assert_eq!(mock.request_count(), 1);
        assert_eq!(mock.request_uri(0), "http://collector:8080/events");
    }

    #[tokio::test]
    async fn mock_client_defaults_to_accepted() {
        let mock = MockClient::new();
        let response = mock
            .request(
                http::Request::builder()
                    .uri("http://collector:8080/events")
                    .body(Bytes::new())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), 202);
        assert!(response.body().is_empty());
    }
}
