// Copyright 2026-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! HTTP response type for `libcf-rest-client`.

use http::StatusCode;
use mime::Mime;

/// An HTTP response received from the server.
#[derive(Debug, Clone)]
pub struct RestResponse {
    /// HTTP status.
    pub status: StatusCode,

    /// Response headers as a list of (name, value) pairs.
    pub headers: Vec<(String, String)>,

    /// Response body bytes.
    pub body: bytes::Bytes,
}

impl RestResponse {
    /// The first value of the header `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(header, _)| header.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// The parsed `Content-Type`, if present and valid.
    pub fn content_type(&self) -> Option<Mime> {
        self.header("content-type")?.parse().ok()
    }
}
