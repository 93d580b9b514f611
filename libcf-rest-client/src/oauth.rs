// Copyright 2026-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use url::Url;

use crate::RestClient;

/// The client used to talk to the authorization server.
///
/// Pairs the authorization server URL with a [`RestClient`] built with the
/// same transport options as the API client. Token acquisition and refresh
/// live with the caller.
#[derive(Debug, Clone)]
pub struct OauthClient {
    authorization_url: Url,
    client: RestClient,
}

impl OauthClient {
    /// Create a client for the authorization server at `authorization_url`.
    pub fn new(authorization_url: Url, client: RestClient) -> Self {
        Self {
            authorization_url,
            client,
        }
    }

    /// The authorization server URL.
    pub fn authorization_url(&self) -> &Url {
        &self.authorization_url
    }

    /// The transport used for authorization requests.
    pub fn rest_client(&self) -> &RestClient {
        &self.client
    }
}
