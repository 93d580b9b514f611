// Copyright 2026-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Call logging.
//!
//! Every request/response cycle through a [`crate::RestClient`] produces one
//! [`RestLogEntry`], failed calls included. Entries are emitted as `tracing`
//! events and handed to the registered [`RestLogCallback`]s.

use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use http::StatusCode;
use tracing::debug;
use url::Url;

use crate::log_entry::RestLogEntry;
use crate::request::HttpMethod;
use crate::RestError;

/// Status text for calls that got a non-error response.
pub const STATUS_OK: &str = "OK";
/// Status text for calls that got an error response.
pub const STATUS_ERROR: &str = "ERROR";
/// Status text for calls that got no response at all.
pub const STATUS_EXCEPTION: &str = "EXCEPTION";

/// Receives a [`RestLogEntry`] for every completed call.
pub trait RestLogCallback: fmt::Debug + Send + Sync {
    /// Called once per call, after the call completed or failed.
    fn on_new_log_entry(&self, entry: &RestLogEntry);
}

/// Builds log entries and fans them out to callbacks.
#[derive(Debug, Clone, Default)]
pub struct LoggingInterceptor {
    callbacks: Vec<Arc<dyn RestLogCallback>>,
}

impl LoggingInterceptor {
    /// An interceptor that notifies `callbacks` in order.
    pub fn new(callbacks: Vec<Arc<dyn RestLogCallback>>) -> Self {
        Self { callbacks }
    }

    /// Record the outcome of one call and return the entry.
    pub fn record(
        &self,
        method: HttpMethod,
        uri: &Url,
        outcome: Result<StatusCode, &RestError>,
        elapsed: Duration,
    ) -> RestLogEntry {
        let duration_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        let entry = match outcome {
            Ok(status) => {
                RestLogEntry::new(method, uri.clone(), STATUS_OK, Some(status), None, duration_ms)
            }
            Err(RestError::Response(err)) => RestLogEntry::new(
                method,
                uri.clone(),
                STATUS_ERROR,
                Some(err.status()),
                Some(
                    err.description()
                        .unwrap_or_else(|| err.status_text())
                        .to_owned(),
                ),
                duration_ms,
            ),
            Err(err) => RestLogEntry::new(
                method,
                uri.clone(),
                STATUS_EXCEPTION,
                None,
                Some(err.to_string()),
                duration_ms,
            ),
        };

        debug!(
            http.method = %entry.method(),
            http.url = %entry.uri(),
            http.status = entry.http_status().map(|s| s.as_u16()),
            status = entry.status(),
            detail = entry.message(),
            duration_ms = entry.duration_ms(),
            "REST call completed"
        );

        for callback in &self.callbacks {
            callback.on_new_log_entry(&entry);
        }
        entry
    }
}

/// A bounded in-memory log. Once full, the oldest entry is dropped for each
/// new one.
#[derive(Debug)]
pub struct RestLogBuffer {
    capacity: usize,
    entries: Mutex<VecDeque<RestLogEntry>>,
}

impl RestLogBuffer {
    /// A buffer that keeps at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    /// Maximum number of entries kept.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of entries currently held.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether the buffer holds no entries.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// A snapshot of the entries, oldest first.
    pub fn entries(&self) -> Vec<RestLogEntry> {
        self.lock().iter().cloned().collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, VecDeque<RestLogEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl RestLogCallback for RestLogBuffer {
    fn on_new_log_entry(&self, entry: &RestLogEntry) {
        if self.capacity == 0 {
            return;
        }
        let mut entries = self.lock();
        while entries.len() >= self.capacity {
            entries.pop_front();
        }
        entries.push_back(entry.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_handler::CloudOperationError;

    fn uri() -> Url {
        Url::parse("https://api.example.com/v2/apps").unwrap()
    }

    #[test]
    fn success_is_ok() {
        let entry = LoggingInterceptor::default().record(
            HttpMethod::Get,
            &uri(),
            Ok(StatusCode::OK),
            Duration::from_millis(42),
        );
        assert_eq!(entry.status(), STATUS_OK);
        assert_eq!(entry.http_status(), Some(StatusCode::OK));
        assert_eq!(entry.message(), None);
        assert_eq!(entry.duration_ms(), 42);
    }

    #[test]
    fn error_response_is_error() {
        let err = CloudOperationError::new(
            StatusCode::NOT_FOUND,
            Some("The app could not be found".to_owned()),
            Some(100004),
        );
        let entry = LoggingInterceptor::default().record(
            HttpMethod::Delete,
            &uri(),
            Err(&RestError::Response(err)),
            Duration::from_millis(7),
        );
        assert_eq!(entry.status(), STATUS_ERROR);
        assert_eq!(entry.http_status(), Some(StatusCode::NOT_FOUND));
        assert_eq!(entry.message(), Some("The app could not be found"));
    }

    #[test]
    fn error_response_without_description_uses_reason() {
        let err = CloudOperationError::new(StatusCode::BAD_GATEWAY, None, None);
        let entry = LoggingInterceptor::default().record(
            HttpMethod::Get,
            &uri(),
            Err(&RestError::Response(err)),
            Duration::ZERO,
        );
        assert_eq!(entry.message(), Some("Bad Gateway"));
    }

    #[test]
    fn transport_failure_is_exception() {
        let entry = LoggingInterceptor::default().record(
            HttpMethod::Post,
            &uri(),
            Err(&RestError::ConnectionFailed("refused".to_owned())),
            Duration::from_millis(3),
        );
        assert_eq!(entry.status(), STATUS_EXCEPTION);
        assert_eq!(entry.http_status(), None);
        assert_eq!(entry.message(), Some("connection failed: refused"));
    }

    #[test]
    fn callbacks_receive_every_entry() {
        let buffer = Arc::new(RestLogBuffer::new(10));
        let callback: Arc<dyn RestLogCallback> = buffer.clone();
        let interceptor = LoggingInterceptor::new(vec![callback]);
        interceptor.record(HttpMethod::Get, &uri(), Ok(StatusCode::OK), Duration::ZERO);
        interceptor.record(
            HttpMethod::Get,
            &uri(),
            Err(&RestError::TimedOut),
            Duration::ZERO,
        );

        let entries = buffer.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].status(), STATUS_OK);
        assert_eq!(entries[1].status(), STATUS_EXCEPTION);
    }

    #[test]
    fn buffer_drops_oldest() {
        let buffer = RestLogBuffer::new(2);
        for ms in 1..=3 {
            buffer.on_new_log_entry(&RestLogEntry::new(
                HttpMethod::Get,
                uri(),
                STATUS_OK,
                Some(StatusCode::OK),
                None,
                ms,
            ));
        }
        let durations: Vec<_> = buffer.entries().iter().map(|e| e.duration_ms()).collect();
        assert_eq!(durations, [2, 3]);
        assert_eq!(buffer.len(), buffer.capacity());
    }

    #[test]
    fn zero_capacity_buffer_keeps_nothing() {
        let buffer = RestLogBuffer::new(0);
        buffer.on_new_log_entry(&RestLogEntry::new(
            HttpMethod::Get,
            uri(),
            STATUS_OK,
            None,
            None,
            0,
        ));
        assert!(buffer.is_empty());
    }
}
