// Copyright 2026-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! rustls configuration for the transport.
//!
//! In trust-self-signed mode the server certificate is checked in two
//! independent steps: the chain check accepts any chain, the hostname check
//! is the standard one. Hostname verification is never disabled.

use std::sync::Arc;

use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
use rustls::crypto::{CryptoProvider, WebPkiSupportedAlgorithms};
use rustls::pki_types::{CertificateDer, ServerName, UnixTime};
use rustls::{ClientConfig, DigitallySignedStruct, RootCertStore, SignatureScheme};
use tracing::debug;

use crate::TransportError;

/// Build the rustls client configuration for the given trust mode.
pub(crate) fn build_tls_config(trust_self_signed: bool) -> Result<ClientConfig, TransportError> {
    let provider = Arc::new(rustls::crypto::ring::default_provider());
    let builder = ClientConfig::builder_with_provider(provider.clone())
        .with_safe_default_protocol_versions()
        .map_err(|e| TransportError::TlsSetup(e.to_string()))?;

    let mut config = if trust_self_signed {
        debug!("TLS configured to accept self-signed certificates");
        builder
            .dangerous()
            .with_custom_certificate_verifier(Arc::new(TrustSelfSignedVerifier::new(&provider)))
            .with_no_client_auth()
    } else {
        let roots = RootCertStore {
            roots: webpki_roots::TLS_SERVER_ROOTS.to_vec(),
        };
        builder.with_root_certificates(roots).with_no_client_auth()
    };
    config.alpn_protocols = vec![b"http/1.1".to_vec()];
    Ok(config)
}

/// Accepts any certificate chain but requires the end-entity certificate to
/// be valid for the requested server name.
#[derive(Debug)]
pub(crate) struct TrustSelfSignedVerifier {
    algorithms: WebPkiSupportedAlgorithms,
}

impl TrustSelfSignedVerifier {
    pub(crate) fn new(provider: &CryptoProvider) -> Self {
        Self {
            algorithms: provider.signature_verification_algorithms,
        }
    }

    fn check_chain(
        &self,
        _end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
    ) -> Result<(), rustls::Error> {
        Ok(())
    }

    fn check_hostname(
        &self,
        end_entity: &CertificateDer<'_>,
        server_name: &ServerName<'_>,
    ) -> Result<(), rustls::Error> {
        let cert = rustls::server::ParsedCertificate::try_from(end_entity)?;
        rustls::client::verify_server_name(&cert, server_name)
    }
}

impl ServerCertVerifier for TrustSelfSignedVerifier {
    fn verify_server_cert(
        &self,
        end_entity: &CertificateDer<'_>,
        intermediates: &[CertificateDer<'_>],
        server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: UnixTime,
    ) -> Result<ServerCertVerified, rustls::Error> {
        self.check_chain(end_entity, intermediates)?;
        self.check_hostname(end_entity, server_name)?;
        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        rustls::crypto::verify_tls12_signature(message, cert, dss, &self.algorithms)
    }

    fn verify_tls13_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        rustls::crypto::verify_tls13_signature(message, cert, dss, &self.algorithms)
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        self.algorithms.supported_schemes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn self_signed(names: &[&str]) -> CertificateDer<'static> {
        let key = rcgen::KeyPair::generate().unwrap();
        let params =
            rcgen::CertificateParams::new(names.iter().map(|n| n.to_string()).collect::<Vec<_>>())
                .unwrap();
        params.self_signed(&key).unwrap().der().clone()
    }

    fn verifier() -> TrustSelfSignedVerifier {
        TrustSelfSignedVerifier::new(&rustls::crypto::ring::default_provider())
    }

    #[test]
    fn builds_both_modes() {
        let trusted = build_tls_config(false).unwrap();
        assert_eq!(trusted.alpn_protocols, vec![b"http/1.1".to_vec()]);
        assert!(build_tls_config(true).is_ok());
    }

    #[test]
    fn accepts_self_signed_for_matching_name() {
        let cert = self_signed(&["cf.example.com"]);
        let name = ServerName::try_from("cf.example.com").unwrap();
        assert!(verifier()
            .verify_server_cert(&cert, &[], &name, &[], UnixTime::now())
            .is_ok());
    }

    #[test]
    fn rejects_self_signed_for_other_name() {
        let cert = self_signed(&["cf.example.com"]);
        let name = ServerName::try_from("evil.example.net").unwrap();
        let err = verifier()
            .verify_server_cert(&cert, &[], &name, &[], UnixTime::now())
            .unwrap_err();
        assert!(matches!(err, rustls::Error::InvalidCertificate(_)));
    }

    #[test]
    fn rejects_ip_when_cert_only_names_dns() {
        let cert = self_signed(&["localhost"]);
        let name = ServerName::try_from("127.0.0.1").unwrap();
        assert!(verifier()
            .verify_server_cert(&cert, &[], &name, &[], UnixTime::now())
            .is_err());
    }

    #[test]
    fn rejects_garbage_certificate() {
        let cert = CertificateDer::from(vec![0u8; 16]);
        let name = ServerName::try_from("cf.example.com").unwrap();
        assert!(verifier()
            .verify_server_cert(&cert, &[], &name, &[], UnixTime::now())
            .is_err());
    }

    #[test]
    fn advertises_provider_schemes() {
        assert!(!verifier().supported_verify_schemes().is_empty());
    }
}
