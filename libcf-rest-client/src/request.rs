// Copyright 2026-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! HTTP request type for `libcf-rest-client`.

use std::fmt;
use std::time::Duration;

use mime::Mime;
use serde::Serialize;

use crate::converter::Payload;

/// Standard HTTP methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    /// GET
    Get,
    /// POST
    Post,
    /// PUT
    Put,
    /// DELETE
    Delete,
    /// HEAD
    Head,
    /// PATCH
    Patch,
    /// OPTIONS
    Options,
    /// TRACE
    Trace,
}

impl HttpMethod {
    /// The method name as sent on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Head => "HEAD",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Trace => "TRACE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<HttpMethod> for http::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => http::Method::GET,
            HttpMethod::Post => http::Method::POST,
            HttpMethod::Put => http::Method::PUT,
            HttpMethod::Delete => http::Method::DELETE,
            HttpMethod::Head => http::Method::HEAD,
            HttpMethod::Patch => http::Method::PATCH,
            HttpMethod::Options => http::Method::OPTIONS,
            HttpMethod::Trace => http::Method::TRACE,
        }
    }
}

/// An outgoing REST request.
#[derive(Debug, Clone)]
pub struct RestRequest {
    /// HTTP method.
    pub method: HttpMethod,

    /// Absolute URL string (e.g. `"https://api.example.com/v2/apps"`).
    pub url: String,

    /// Request headers as a list of (name, value) pairs.
    ///
    /// Vec preserves insertion order and allows duplicate header names,
    /// both of which are valid in HTTP.
    pub headers: Vec<(String, String)>,

    /// Body, encoded by the client's message converters.
    pub body: Option<Payload>,

    /// Requested body media type. `None` lets the selected converter pick.
    pub content_type: Option<Mime>,

    /// Per-request timeout for the whole exchange.
    pub timeout: Option<Duration>,
}

impl RestRequest {
    /// Create a new request with the given method and URL, no headers, no
    /// body and no per-request timeout.
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: None,
            content_type: None,
            timeout: None,
        }
    }

    /// Append a header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Set the body.
    pub fn body(mut self, body: Payload) -> Self {
        self.body = Some(body);
        self
    }

    /// Request a body media type.
    pub fn content_type(mut self, content_type: Mime) -> Self {
        self.content_type = Some(content_type);
        self
    }

    /// Set a per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub(crate) fn has_header(&self, name: &str) -> bool {
        self.headers
            .iter()
            .any(|(header, _)| header.eq_ignore_ascii_case(name))
    }
}

/// A request with its body already encoded, ready for the backend.
#[derive(Debug)]
pub(crate) struct EncodedRequest {
    pub(crate) method: HttpMethod,
    pub(crate) url: url::Url,
    pub(crate) headers: Vec<(String, String)>,
    pub(crate) body: Option<crate::converter::EncodedBody>,
    pub(crate) timeout: Option<Duration>,
}
