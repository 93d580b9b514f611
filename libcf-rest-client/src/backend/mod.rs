// Copyright 2026-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

pub(crate) mod reqwest_backend;

/// Moves encoded requests over the wire.
///
/// Not object-safe: `RestClient` stores the concrete backend.
pub(crate) trait Backend {
    /// Send an encoded request and return the raw response. Status codes are
    /// not interpreted here.
    async fn send(
        &self,
        request: crate::request::EncodedRequest,
    ) -> Result<crate::RestResponse, crate::RestError>;
}
