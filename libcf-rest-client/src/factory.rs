// Copyright 2026-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! The transport factory: builds fully configured [`RestClient`]s.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;
use url::Url;

use crate::backend::reqwest_backend::ReqwestBackend;
use crate::client::ClientParts;
use crate::config::{socket_default_read_timeout, ProxyConfiguration, TransportOptions};
use crate::converter::MessageConverters;
use crate::error_handler::{CloudControllerResponseErrorHandler, ResponseErrorHandler};
use crate::logging::{LoggingInterceptor, RestLogCallback};
use crate::oauth::OauthClient;
use crate::{RestClient, TransportError};

/// Builder for [`RestClient`].
///
/// Defaults: certificates verified against the Mozilla roots, no proxy,
/// platform default read timeout, the standard converter list, the cloud
/// controller error handler and no log callbacks.
#[derive(Debug, Clone, Default)]
pub struct TransportFactory {
    options: TransportOptions,
    converters: Option<MessageConverters>,
    error_handler: Option<Arc<dyn ResponseErrorHandler>>,
    log_callbacks: Vec<Arc<dyn RestLogCallback>>,
}

impl TransportFactory {
    /// Create a new factory with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all transport options at once.
    pub fn options(mut self, options: TransportOptions) -> Self {
        self.options = options;
        self
    }

    /// Route all requests through `proxy`, or connect directly with `None`.
    pub fn proxy(mut self, proxy: Option<ProxyConfiguration>) -> Self {
        self.options.proxy = proxy;
        self
    }

    /// Accept self-signed certificates. Hostnames are still verified.
    pub fn trust_self_signed(mut self, trust: bool) -> Self {
        self.options.trust_self_signed = trust;
        self
    }

    /// Override the platform default read timeout. `Duration::ZERO` disables
    /// it.
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.options.read_timeout = Some(timeout);
        self
    }

    /// Replace the message converter list.
    pub fn converters(mut self, converters: MessageConverters) -> Self {
        self.converters = Some(converters);
        self
    }

    /// Replace the response error handler.
    pub fn error_handler(mut self, handler: Arc<dyn ResponseErrorHandler>) -> Self {
        self.error_handler = Some(handler);
        self
    }

    /// Register a callback notified of every call. Callbacks run in
    /// registration order.
    pub fn log_callback(mut self, callback: Arc<dyn RestLogCallback>) -> Self {
        self.log_callbacks.push(callback);
        self
    }

    /// Build the [`RestClient`].
    ///
    /// Returns [`TransportError::TlsSetup`] if the TLS context cannot be
    /// created and [`TransportError::InvalidConfig`] if the proxy cannot be
    /// used.
    pub fn build(&self) -> Result<RestClient, TransportError> {
        self.build_with(socket_default_read_timeout)
    }

    /// Build with `default_read_timeout` standing in for the socket lookup.
    /// A failed lookup leaves the client without a read timeout.
    pub(crate) fn build_with<F>(
        &self,
        default_read_timeout: F,
    ) -> Result<RestClient, TransportError>
    where
        F: FnOnce() -> io::Result<Option<Duration>>,
    {
        let read_timeout = self.options.read_timeout_with(default_read_timeout);
        let backend = ReqwestBackend::new(
            self.options.trust_self_signed,
            self.options.proxy.as_ref(),
            read_timeout,
        )?;

        debug!(
            trust_self_signed = self.options.trust_self_signed,
            proxy = self.options.proxy.is_some(),
            read_timeout_ms = u64::try_from(read_timeout.as_millis()).unwrap_or(u64::MAX),
            "built REST client"
        );

        Ok(RestClient::from_parts(ClientParts {
            backend,
            converters: self.converters.clone().unwrap_or_default(),
            error_handler: self
                .error_handler
                .clone()
                .unwrap_or_else(|| Arc::new(CloudControllerResponseErrorHandler)),
            interceptor: LoggingInterceptor::new(self.log_callbacks.clone()),
            read_timeout,
            trust_self_signed: self.options.trust_self_signed,
            proxy: self.options.proxy.clone(),
        }))
    }

    /// Build a client with these settings and hand it to a new
    /// [`OauthClient`].
    pub fn build_oauth_client(
        &self,
        authorization_url: Url,
    ) -> Result<OauthClient, TransportError> {
        Ok(OauthClient::new(authorization_url, self.build()?))
    }
}

/// Build a client with the given proxy and trust mode and default settings
/// otherwise.
pub fn build_client(
    proxy: Option<&ProxyConfiguration>,
    trust_self_signed: bool,
) -> Result<RestClient, TransportError> {
    TransportFactory::new()
        .proxy(proxy.cloned())
        .trust_self_signed(trust_self_signed)
        .build()
}

/// Build an [`OauthClient`] for `authorization_url` on top of
/// [`build_client`].
pub fn build_oauth_client(
    authorization_url: Url,
    proxy: Option<&ProxyConfiguration>,
    trust_self_signed: bool,
) -> Result<OauthClient, TransportError> {
    Ok(OauthClient::new(
        authorization_url,
        build_client(proxy, trust_self_signed)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converter::MessageConverter;

    #[test]
    fn build_client_without_proxy() {
        let client = build_client(None, false).unwrap();
        assert!(client.proxy().is_none());
        assert!(!client.trusts_self_signed());
    }

    #[test]
    fn build_client_keeps_proxy() {
        let proxy = ProxyConfiguration::new("proxy.local", 3128).with_credentials("u", "p");
        let client = build_client(Some(&proxy), true).unwrap();
        assert_eq!(client.proxy(), Some(&proxy));
        assert!(client.trusts_self_signed());
    }

    #[test]
    fn default_read_timeout_is_platform_default() {
        let client = TransportFactory::new().build().unwrap();
        assert_eq!(
            client.read_timeout(),
            crate::config::platform_default_read_timeout()
        );
    }

    #[test]
    fn failed_timeout_lookup_builds_client_without_timeout() {
        let client = TransportFactory::new()
            .build_with(|| Err(io::Error::other("socket creation denied")))
            .unwrap();
        assert_eq!(client.read_timeout(), Duration::ZERO);
    }

    #[cfg_attr(miri, ignore)]
    #[tokio::test]
    async fn client_without_timeout_still_sends() {
        use httpmock::prelude::*;

        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/v2/info");
                then.status(200).body("{}");
            })
            .await;

        let client = TransportFactory::new()
            .build_with(|| Err(io::Error::other("socket creation denied")))
            .unwrap();
        let response = client
            .send(crate::RestRequest::new(
                crate::HttpMethod::Get,
                server.url("/v2/info"),
            ))
            .await
            .unwrap();
        assert_eq!(response.status, 200);
        mock.assert_async().await;
    }

    #[test]
    fn configured_timeout_skips_lookup() {
        let client = TransportFactory::new()
            .read_timeout(Duration::from_secs(7))
            .build_with(|| -> io::Result<Option<Duration>> {
                panic!("default read timeout looked up although one was configured")
            })
            .unwrap();
        assert_eq!(client.read_timeout(), Duration::from_secs(7));
    }

    #[test]
    fn options_replace_settings() {
        let options = TransportOptions {
            trust_self_signed: true,
            proxy: None,
            read_timeout: Some(Duration::from_secs(60)),
        };
        let client = TransportFactory::new().options(options).build().unwrap();
        assert!(client.trusts_self_signed());
        assert_eq!(client.read_timeout(), Duration::from_secs(60));
    }

    #[test]
    fn custom_converters_are_used() {
        let converters = MessageConverters::new(vec![MessageConverter::Json]);
        let client = TransportFactory::new()
            .converters(converters.clone())
            .build()
            .unwrap();
        assert_eq!(client.converters(), &converters);
    }

    #[test]
    fn oauth_client_gets_same_options() {
        let url = Url::parse("https://login.example.com").unwrap();
        let proxy = ProxyConfiguration::new("proxy.local", 3128);
        let oauth = build_oauth_client(url.clone(), Some(&proxy), true).unwrap();
        assert_eq!(oauth.authorization_url(), &url);
        assert_eq!(oauth.rest_client().proxy(), Some(&proxy));
        assert!(oauth.rest_client().trusts_self_signed());
    }
}
