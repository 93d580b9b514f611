// Copyright 2026-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! The record logged for each REST call.

use http::StatusCode;
use serde::Serialize;
use url::Url;

use crate::request::HttpMethod;

/// The values logged for one REST call.
///
/// Immutable: every field is fixed at construction, including the local
/// wall-clock [`time`](Self::time) captured by [`RestLogEntry::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RestLogEntry {
    method: HttpMethod,
    uri: Url,
    status: String,
    #[serde(serialize_with = "serialize_status")]
    http_status: Option<StatusCode>,
    message: Option<String>,
    duration_ms: u64,
    time: String,
}

impl RestLogEntry {
    /// Record a call. The current local time is captured here and never
    /// recomputed.
    pub fn new(
        method: HttpMethod,
        uri: Url,
        status: impl Into<String>,
        http_status: Option<StatusCode>,
        message: Option<String>,
        duration_ms: u64,
    ) -> Self {
        Self {
            method,
            uri,
            status: status.into(),
            http_status,
            message,
            duration_ms,
            time: chrono::Local::now().format("%H:%M:%S%.3f").to_string(),
        }
    }

    /// The request method.
    pub fn method(&self) -> HttpMethod {
        self.method
    }

    /// The request URI.
    pub fn uri(&self) -> &Url {
        &self.uri
    }

    /// Outcome of the call, e.g. `"OK"` or `"ERROR"`.
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Response status, absent when no response was received.
    pub fn http_status(&self) -> Option<StatusCode> {
        self.http_status
    }

    /// Additional detail, usually the error description.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Elapsed time of the call in milliseconds.
    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    /// Local time of day at which the entry was created.
    pub fn time(&self) -> &str {
        &self.time
    }
}

fn serialize_status<S>(status: &Option<StatusCode>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match status {
        Some(status) => serializer.serialize_some(&status.as_u16()),
        None => serializer.serialize_none(),
    }
}
