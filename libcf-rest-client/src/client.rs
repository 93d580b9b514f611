// Copyright 2026-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! The public `RestClient` struct.

use std::sync::Arc;
use std::time::{Duration, Instant};

use url::Url;

use crate::backend::reqwest_backend::ReqwestBackend;
use crate::backend::Backend;
use crate::config::ProxyConfiguration;
use crate::converter::{EncodedBody, MessageConverters, Payload, PayloadKind};
use crate::error_handler::ResponseErrorHandler;
use crate::logging::LoggingInterceptor;
use crate::request::EncodedRequest;
use crate::{RestError, RestRequest, RestResponse};

/// A configured async REST client.
///
/// Built once by a [`crate::TransportFactory`] and reused across many calls.
/// Cloning is cheap; clones share the connection pool, converters, error
/// handler and log callbacks. The pool is released when the last clone is
/// dropped.
#[derive(Debug, Clone)]
pub struct RestClient {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    backend: ReqwestBackend,
    converters: MessageConverters,
    error_handler: Arc<dyn ResponseErrorHandler>,
    interceptor: LoggingInterceptor,
    read_timeout: Duration,
    trust_self_signed: bool,
    proxy: Option<ProxyConfiguration>,
}

pub(crate) struct ClientParts {
    pub(crate) backend: ReqwestBackend,
    pub(crate) converters: MessageConverters,
    pub(crate) error_handler: Arc<dyn ResponseErrorHandler>,
    pub(crate) interceptor: LoggingInterceptor,
    pub(crate) read_timeout: Duration,
    pub(crate) trust_self_signed: bool,
    pub(crate) proxy: Option<ProxyConfiguration>,
}

impl RestClient {
    pub(crate) fn from_parts(parts: ClientParts) -> Self {
        Self {
            inner: Arc::new(Inner {
                backend: parts.backend,
                converters: parts.converters,
                error_handler: parts.error_handler,
                interceptor: parts.interceptor,
                read_timeout: parts.read_timeout,
                trust_self_signed: parts.trust_self_signed,
                proxy: parts.proxy,
            }),
        }
    }

    /// The read timeout in effect. Zero means none.
    pub fn read_timeout(&self) -> Duration {
        self.inner.read_timeout
    }

    /// Whether self-signed server certificates are accepted.
    pub fn trusts_self_signed(&self) -> bool {
        self.inner.trust_self_signed
    }

    /// The proxy requests are routed through, if any.
    pub fn proxy(&self) -> Option<&ProxyConfiguration> {
        self.inner.proxy.as_ref()
    }

    /// The message converters, in precedence order.
    pub fn converters(&self) -> &MessageConverters {
        &self.inner.converters
    }

    /// Send a request and return the response.
    ///
    /// The body is encoded by the first matching message converter. Responses
    /// the error handler flags are returned as [`RestError::Response`]. Every
    /// request that reaches the transport is logged, whether it succeeds or
    /// not.
    pub async fn send(&self, request: RestRequest) -> Result<RestResponse, RestError> {
        let url = Url::parse(&request.url)
            .map_err(|e| RestError::InvalidRequest(format!("{}: {e}", request.url)))?;
        let method = request.method;
        let encoded = self.encode(request, url.clone())?;

        let start = Instant::now();
        let result = self.execute(encoded).await;
        self.inner.interceptor.record(
            method,
            &url,
            result.as_ref().map(|response| response.status),
            start.elapsed(),
        );
        result
    }

    /// Decode a response body into a payload of `kind`.
    pub fn read(&self, response: &RestResponse, kind: PayloadKind) -> Result<Payload, RestError> {
        let media_type = response.content_type();
        self.inner
            .converters
            .read(kind, media_type.as_ref(), &response.body)
    }

    /// Send a request and decode the response body into a payload of `kind`.
    pub async fn exchange(
        &self,
        request: RestRequest,
        kind: PayloadKind,
    ) -> Result<Payload, RestError> {
        let response = self.send(request).await?;
        self.read(&response, kind)
    }

    fn encode(&self, request: RestRequest, url: Url) -> Result<EncodedRequest, RestError> {
        let has_content_type = request.has_header("content-type");
        let RestRequest {
            method,
            mut headers,
            body,
            content_type,
            timeout,
            ..
        } = request;

        let body = match body {
            Some(payload) => {
                let encoded = self
                    .inner
                    .converters
                    .write(&payload, content_type.as_ref())?;
                match &encoded {
                    EncodedBody::Bytes { content_type: value, .. } if !has_content_type => {
                        headers.push(("Content-Type".to_owned(), value.clone()));
                    }
                    // The header has to carry the boundary reqwest generates.
                    EncodedBody::Multipart(_) => {
                        headers.retain(|(name, _)| !name.eq_ignore_ascii_case("content-type"));
                    }
                    EncodedBody::Bytes { .. } => {}
                }
                Some(encoded)
            }
            None => None,
        };

        Ok(EncodedRequest {
            method,
            url,
            headers,
            body,
            timeout,
        })
    }

    async fn execute(&self, request: EncodedRequest) -> Result<RestResponse, RestError> {
        let response = self.inner.backend.send(request).await?;
        let handler = &self.inner.error_handler;
        if handler.has_error(response.status) {
            return Err(RestError::Response(
                handler.handle_error(response.status, &response.body),
            ));
        }
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::HttpMethod;
    use crate::TransportFactory;

    #[test]
    fn factory_creates_client() {
        let client = TransportFactory::new()
            .read_timeout(Duration::from_secs(3))
            .build()
            .unwrap();
        assert_eq!(client.read_timeout(), Duration::from_secs(3));
        assert!(!client.trusts_self_signed());
        assert!(client.proxy().is_none());
        assert_eq!(client.converters(), &MessageConverters::default());
    }

    #[test]
    fn clones_share_state() {
        let client = TransportFactory::new().build().unwrap();
        let clone = client.clone();
        assert!(Arc::ptr_eq(&client.inner, &clone.inner));
    }

    #[test]
    fn encode_sets_content_type_from_converter() {
        let client = TransportFactory::new().build().unwrap();
        let request = RestRequest::new(HttpMethod::Post, "https://api.example.com/v2/apps")
            .body(Payload::Json(serde_json::json!({"name": "web"})));
        let url = Url::parse(&request.url).unwrap();

        let encoded = client.encode(request, url).unwrap();
        assert_eq!(
            encoded.headers,
            vec![("Content-Type".to_owned(), "application/json".to_owned())]
        );
        let body = encoded.body.unwrap();
        assert_eq!(body.data().unwrap().as_ref(), br#"{"name":"web"}"#);
    }

    #[test]
    fn encode_drops_caller_content_type_for_multipart() {
        let client = TransportFactory::new().build().unwrap();
        let form = crate::MultipartForm::new().part(
            "application",
            Payload::Upload(crate::UploadApplicationPayload::new("app.zip", &b"zip"[..])),
        );
        let request = RestRequest::new(HttpMethod::Put, "https://api.example.com/v2/apps/1/bits")
            .header("Content-Type", "multipart/form-data")
            .header("Accept", "application/json")
            .body(Payload::Form(form));
        let url = Url::parse(&request.url).unwrap();

        let encoded = client.encode(request, url).unwrap();
        assert_eq!(
            encoded.headers,
            vec![("Accept".to_owned(), "application/json".to_owned())]
        );
        assert!(matches!(encoded.body, Some(EncodedBody::Multipart(_))));
    }

    #[test]
    fn encode_without_body() {
        let client = TransportFactory::new().build().unwrap();
        let request = RestRequest::new(HttpMethod::Get, "https://api.example.com/v2/info");
        let url = Url::parse(&request.url).unwrap();

        let encoded = client.encode(request, url).unwrap();
        assert!(encoded.headers.is_empty());
        assert!(encoded.body.is_none());
    }

    #[test]
    fn encode_keeps_caller_content_type() {
        let client = TransportFactory::new().build().unwrap();
        let request = RestRequest::new(HttpMethod::Put, "https://api.example.com/v2/apps/1")
            .header("content-type", "application/vnd.cf+json")
            .body(Payload::Json(serde_json::json!({})));
        let url = Url::parse(&request.url).unwrap();

        let encoded = client.encode(request, url).unwrap();
        assert_eq!(encoded.headers.len(), 1);
        assert_eq!(encoded.headers[0].1, "application/vnd.cf+json");
    }

    #[tokio::test]
    async fn send_rejects_relative_url() {
        let client = TransportFactory::new().build().unwrap();
        let result = client
            .send(RestRequest::new(HttpMethod::Get, "/v2/info"))
            .await;
        assert!(matches!(result, Err(RestError::InvalidRequest(_))));
    }

    #[cfg_attr(miri, ignore)]
    #[tokio::test]
    async fn send_returns_error_when_no_server() {
        let client = TransportFactory::new().build().unwrap();
        let result = client
            .send(RestRequest::new(HttpMethod::Get, "http://127.0.0.1:1/v2/info"))
            .await;
        assert!(matches!(result, Err(RestError::ConnectionFailed(_))));
    }
}
