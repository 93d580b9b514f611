// Copyright 2026-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Error types for `libcf-rest-client`.

use thiserror::Error;

use crate::error_handler::CloudOperationError;

/// Errors raised while building a client from a [`crate::TransportFactory`].
///
/// These are configuration errors: they are surfaced once, at construction
/// time, and are never retried.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The TLS context could not be created.
    #[error("cannot create TLS connection factory: {0}")]
    TlsSetup(String),

    /// The transport options could not be turned into a client.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Errors that can occur while sending a request through a [`crate::RestClient`].
#[derive(Debug, Error)]
pub enum RestError {
    /// The connection to the server (or proxy) could not be established.
    ///
    /// TLS handshake failures, including untrusted certificates and hostname
    /// mismatches, are reported here.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The request exceeded its timeout.
    #[error("request timed out")]
    TimedOut,

    /// An I/O error occurred during the request.
    #[error("I/O error: {0}")]
    IoError(String),

    /// The request could not be built (bad URL, bad header).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// No message converter could encode or decode a body, or the converter
    /// rejected it.
    #[error("conversion failed: {0}")]
    Conversion(String),

    /// The server answered with a status the error handler classified as an
    /// error.
    #[error(transparent)]
    Response(#[from] CloudOperationError),
}
