// Copyright 2026-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! reqwest-based HTTP backend.

use std::time::Duration;

use tracing::debug;

use crate::config::ProxyConfiguration;
use crate::converter::EncodedBody;
use crate::request::EncodedRequest;
use crate::tls::build_tls_config;
use crate::{RestError, RestResponse, TransportError};

/// A backend that sends HTTP requests via [`reqwest::Client`].
///
/// Holds a connection-pooling client that is reused across all requests.
/// Cloning is cheap and clones share the pool.
#[derive(Debug, Clone)]
pub(crate) struct ReqwestBackend {
    client: reqwest::Client,
}

impl ReqwestBackend {
    /// Construct a new backend.
    ///
    /// `read_timeout` of zero means no read timeout. Without a proxy, system
    /// proxy settings are ignored so routing only depends on the options.
    pub(crate) fn new(
        trust_self_signed: bool,
        proxy: Option<&ProxyConfiguration>,
        read_timeout: Duration,
    ) -> Result<Self, TransportError> {
        let tls = build_tls_config(trust_self_signed)?;
        let mut builder = reqwest::Client::builder().use_preconfigured_tls(tls);

        builder = match proxy {
            Some(proxy) => builder.proxy(build_proxy(proxy)?),
            None => builder.no_proxy(),
        };

        if !read_timeout.is_zero() {
            builder = builder.read_timeout(read_timeout);
        }

        let client = builder
            .build()
            .map_err(|e| TransportError::InvalidConfig(e.to_string()))?;
        Ok(Self { client })
    }
}

/// Route every scheme through `proxy`. Credentials are scoped to the proxy:
/// reqwest only sends them in `Proxy-Authorization` to that host and port.
fn build_proxy(proxy: &ProxyConfiguration) -> Result<reqwest::Proxy, TransportError> {
    let url = proxy.url();
    let mut reqwest_proxy =
        reqwest::Proxy::all(&url).map_err(|e| TransportError::InvalidConfig(e.to_string()))?;
    if proxy.is_auth_required() {
        if let (Some(username), Some(password)) = (proxy.username(), proxy.password()) {
            reqwest_proxy = reqwest_proxy.basic_auth(username, password);
        }
    }
    debug!(
        proxy = %url,
        authenticated = proxy.is_auth_required(),
        "routing requests through proxy"
    );
    Ok(reqwest_proxy)
}

impl super::Backend for ReqwestBackend {
    async fn send(&self, request: EncodedRequest) -> Result<RestResponse, RestError> {
        let mut builder = self
            .client
            .request(http::Method::from(request.method), request.url);

        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }

        builder = match request.body {
            Some(EncodedBody::Bytes { data, .. }) => builder.body(data),
            Some(EncodedBody::Multipart(form)) => builder.multipart(form),
            None => builder,
        };

        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await.map_err(map_reqwest_error)?;

        let status = response.status();

        // Collect headers before consuming the response body.
        let headers: Vec<(String, String)> = response
            .headers()
            .iter()
            .map(|(name, value)| {
                let v = value.to_str().map_err(|_| {
                    RestError::IoError(format!(
                        "response header '{}' contains non-UTF-8 value",
                        name
                    ))
                })?;
                Ok((name.as_str().to_string(), v.to_string()))
            })
            .collect::<Result<Vec<_>, RestError>>()?;

        let body = response.bytes().await.map_err(map_reqwest_error)?;

        Ok(RestResponse {
            status,
            headers,
            body,
        })
    }
}

/// Map a `reqwest::Error` to our `RestError` variants.
fn map_reqwest_error(e: reqwest::Error) -> RestError {
    // The Display of reqwest errors hides the cause (e.g. the TLS alert).
    let message = error_chain(&e);
    if e.is_timeout() {
        RestError::TimedOut
    } else if e.is_connect() {
        RestError::ConnectionFailed(message)
    } else if e.is_builder() {
        RestError::InvalidRequest(message)
    } else {
        RestError::IoError(message)
    }
}

fn error_chain(e: &(dyn std::error::Error + 'static)) -> String {
    let mut message = e.to_string();
    let mut source = e.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
