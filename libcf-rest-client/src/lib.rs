// Copyright 2026-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

#![deny(missing_docs)]
#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

//! `libcf-rest-client` builds the HTTP transport used by Cloud Foundry API
//! clients and logs every REST call made through it.
//!
//! A [`TransportFactory`] produces a [`RestClient`] configured with:
//!
//! - TLS trust: certificates are verified against the Mozilla root set, or,
//!   in trust-self-signed mode, any chain is accepted while the hostname is
//!   still checked against the certificate;
//! - an optional forward proxy, with basic credentials sent only to it;
//! - a read timeout, defaulting to the platform default for a fresh socket;
//! - an ordered list of message converters (raw bytes, text, resources,
//!   application uploads, forms, JSON);
//! - a response error handler and a call-logging interceptor that records
//!   one [`RestLogEntry`] per call.
//!
//! # Quick start
//!
//! ```rust,no_run
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! use std::sync::Arc;
//! use libcf_rest_client::{
//!     HttpMethod, PayloadKind, ProxyConfiguration, RestLogBuffer, RestRequest, TransportFactory,
//! };
//!
//! let log = Arc::new(RestLogBuffer::new(100));
//! let client = TransportFactory::new()
//!     .proxy(Some(ProxyConfiguration::new("proxy.internal", 3128)))
//!     .trust_self_signed(true)
//!     .log_callback(log.clone())
//!     .build()?;
//!
//! let info = client
//!     .exchange(
//!         RestRequest::new(HttpMethod::Get, "https://api.example.com/v2/info"),
//!         PayloadKind::Json,
//!     )
//!     .await?;
//! println!("{info:?}, {} call(s) logged", log.len());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod converter;
pub mod error_handler;
pub mod logging;

pub(crate) mod backend;
mod client;
mod error;
mod factory;
mod log_entry;
mod oauth;
mod request;
mod response;
mod tls;

pub use client::RestClient;
pub use config::{platform_default_read_timeout, ProxyConfiguration, TransportOptions};
pub use converter::{
    MessageConverter, MessageConverters, MultipartForm, Payload, PayloadKind, Resource,
    UploadApplicationPayload,
};
pub use error::{RestError, TransportError};
pub use error_handler::{
    CloudControllerResponseErrorHandler, CloudOperationError, ResponseErrorHandler,
};
pub use factory::{build_client, build_oauth_client, TransportFactory};
pub use log_entry::RestLogEntry;
pub use logging::{LoggingInterceptor, RestLogBuffer, RestLogCallback};
pub use oauth::OauthClient;
pub use request::{HttpMethod, RestRequest};
pub use response::RestResponse;
