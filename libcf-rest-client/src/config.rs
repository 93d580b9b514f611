// Copyright 2026-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Configuration types for `libcf-rest-client`.

use std::fmt;
use std::io;
use std::time::Duration;

use serde::Deserialize;
use tracing::warn;

/// A forward proxy that all requests are routed through.
///
/// Credentials are only attached when both a username and a password are
/// present and non-empty, see [`ProxyConfiguration::is_auth_required`].
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct ProxyConfiguration {
    host: String,
    port: u16,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    password: Option<String>,
}

impl ProxyConfiguration {
    /// A proxy without credentials.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            username: None,
            password: None,
        }
    }

    /// Attach basic credentials for the proxy.
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// The proxy host.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// The proxy port.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// The proxy username, if any.
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// The proxy password, if any.
    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    /// Whether credentials should be sent to the proxy.
    pub fn is_auth_required(&self) -> bool {
        matches!(
            (self.username(), self.password()),
            (Some(user), Some(pass)) if !user.is_empty() && !pass.is_empty()
        )
    }

    /// The proxy as an `http://host:port` URL string.
    pub(crate) fn url(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("http://[{}]:{}", self.host, self.port)
        } else {
            format!("http://{}:{}", self.host, self.port)
        }
    }
}

impl fmt::Debug for ProxyConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyConfiguration")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Options for a [`crate::TransportFactory`].
///
/// This is a construction-time concern: once the client is built, the
/// options are embedded in the underlying `reqwest::Client` and this value
/// is not retained.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TransportOptions {
    /// Accept any server certificate chain while still checking the hostname.
    pub trust_self_signed: bool,

    /// Route every request through this proxy.
    pub proxy: Option<ProxyConfiguration>,

    /// Read timeout. `None` uses [`platform_default_read_timeout`];
    /// `Some(Duration::ZERO)` disables the timeout.
    #[serde(default, with = "optional_millis")]
    pub read_timeout: Option<Duration>,
}

impl TransportOptions {
    /// The read timeout the client will use, resolving the platform default
    /// when none was configured.
    pub fn effective_read_timeout(&self) -> Duration {
        self.read_timeout_with(socket_default_read_timeout)
    }

    /// Like [`Self::effective_read_timeout`], resolving the default with
    /// `lookup`, which only runs when no timeout was configured.
    pub(crate) fn read_timeout_with<F>(&self, lookup: F) -> Duration
    where
        F: FnOnce() -> io::Result<Option<Duration>>,
    {
        self.read_timeout.unwrap_or_else(|| read_timeout_or_default(lookup))
    }
}

/// The platform's default read timeout for a fresh, unconnected TCP socket.
///
/// Returns `Duration::ZERO` (no timeout) when the platform has no default or
/// when the socket cannot be queried. Never fails.
pub fn platform_default_read_timeout() -> Duration {
    read_timeout_or_default(socket_default_read_timeout)
}

/// Run `lookup` and map every failure to `Duration::ZERO`.
pub(crate) fn read_timeout_or_default<F>(lookup: F) -> Duration
where
    F: FnOnce() -> io::Result<Option<Duration>>,
{
    match lookup() {
        Ok(timeout) => timeout.unwrap_or(Duration::ZERO),
        Err(e) => {
            warn!(error = %e, "could not read default socket read timeout, using none");
            Duration::ZERO
        }
    }
}

pub(crate) fn socket_default_read_timeout() -> io::Result<Option<Duration>> {
    let socket = socket2::Socket::new(socket2::Domain::IPV4, socket2::Type::STREAM, None)?;
    socket.read_timeout()
}

mod optional_millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer};

    pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<u64>::deserialize(deserializer)?.map(Duration::from_millis))
    }
}
