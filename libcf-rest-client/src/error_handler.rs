// Copyright 2026-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Classification of error responses.
//!
//! A [`ResponseErrorHandler`] sits between the transport and the caller and
//! turns non-2xx responses into a structured [`CloudOperationError`] before
//! the caller ever sees the body.

use std::fmt;

use http::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// A structured error returned by the platform.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct CloudOperationError {
    status: StatusCode,
    status_text: String,
    description: Option<String>,
    code: Option<i64>,
}

impl CloudOperationError {
    /// Create an error for the given status. The status text is the
    /// canonical reason phrase.
    pub fn new(status: StatusCode, description: Option<String>, code: Option<i64>) -> Self {
        Self {
            status,
            status_text: status.canonical_reason().unwrap_or_default().to_owned(),
            description,
            code,
        }
    }

    /// The HTTP status of the failed response.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// The reason phrase for [`Self::status`].
    pub fn status_text(&self) -> &str {
        &self.status_text
    }

    /// The platform's description of the failure, if it sent one.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// The platform's numeric error code, if it sent one.
    pub fn code(&self) -> Option<i64> {
        self.code
    }
}

impl fmt::Display for CloudOperationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.status.as_u16(), self.status_text)?;
        if let Some(description) = &self.description {
            write!(f, ": {description}")?;
        }
        Ok(())
    }
}

/// Decides which responses are errors and how to describe them.
pub trait ResponseErrorHandler: fmt::Debug + Send + Sync {
    /// Whether a response with this status is an error. Defaults to any 4xx
    /// or 5xx status.
    fn has_error(&self, status: StatusCode) -> bool {
        status.is_client_error() || status.is_server_error()
    }

    /// Build the error for a response that [`Self::has_error`] flagged.
    fn handle_error(&self, status: StatusCode, body: &[u8]) -> CloudOperationError;
}

/// Error body shapes sent by the cloud controller and the UAA.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
}

/// The default handler for cloud controller and UAA responses.
///
/// Reads `description` (cloud controller) or `error_description` (UAA) and
/// `code` from a JSON body. Non-JSON bodies are used verbatim as the
/// description; empty bodies leave it unset.
#[derive(Debug, Default, Clone, Copy)]
pub struct CloudControllerResponseErrorHandler;

impl ResponseErrorHandler for CloudControllerResponseErrorHandler {
    fn handle_error(&self, status: StatusCode, body: &[u8]) -> CloudOperationError {
        match serde_json::from_slice::<ErrorBody>(body) {
            Ok(parsed) => CloudOperationError::new(
                status,
                parsed.description.or(parsed.error_description),
                parsed.code,
            ),
            Err(_) => {
                let text = String::from_utf8_lossy(body).trim().to_owned();
                CloudOperationError::new(status, (!text.is_empty()).then_some(text), None)
            }
        }
    }
}
