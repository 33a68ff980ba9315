// Copyright 2021-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use http_body_util::BodyExt;
use hyper::body::Incoming;
use thiserror::Error;

/// Request body type used by every client in this workspace. Collector
/// payloads are always fully materialized before sending.
pub type Body = http_body_util::Full<bytes::Bytes>;

pub type GenericHttpClient<C> = hyper_util::client::legacy::Client<C, Body>;
pub type HttpResponse = http::Response<Incoming>;

pub trait Connect:
    hyper_util::client::legacy::connect::Connect + Clone + Send + Sync + 'static
{
}
impl<C: hyper_util::client::legacy::connect::Connect + Clone + Send + Sync + 'static> Connect
    for C
{
}

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("request timed out")]
    Timeout,
    #[error("{0}")]
    Other(String),
}

pub fn client_builder() -> hyper_util::client::legacy::Builder {
    hyper_util::client::legacy::Client::builder(hyper_util::rt::TokioExecutor::default())
}

/// Create a hyper client for fixed-interval sending.
///
/// This client does not keep connections open because otherwise we would get
/// a closed pipe every second connection when the collector uses a low
/// keep-alive. Not a problem for a client used once every few seconds.
pub fn new_client_periodic<C: Connect>(connector: C) -> GenericHttpClient<C> {
    client_builder()
        .pool_max_idle_per_host(0)
        .build(connector)
}

pub async fn collect_response_bytes(response: HttpResponse) -> Result<bytes::Bytes, HttpError> {
    Ok(response
        .into_body()
        .collect()
        .await
        .map_err(|e| HttpError::Network(format!("failed to read response body: {e}")))?
        .to_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_error_display() {
        assert_eq!(
            HttpError::Network("refused".to_string()).to_string(),
            "network error: refused"
        );
        assert_eq!(HttpError::Timeout.to_string(), "request timed out");
    }
}
