//! TLS setup for both ends.
//!
//! The server loads a PEM certificate chain and private key. The client does
//! not verify the server certificate at all: the probe server normally runs
//! with a self-signed certificate, and what is being diagnosed is how the
//! client uploads, not who it talks to.

use std::fs;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

use rustls::pki_types::{CertificateDer, PrivateKeyDer};
use tokio_rustls::TlsAcceptor;
use tracing::debug;

use crate::error::TlsError;

/// Server side TLS configuration.
#[derive(Debug, Clone)]
pub struct TlsSettings {
    server_config: Arc<rustls::ServerConfig>,
}

impl TlsSettings {
    pub fn from_pem(cert_pem: &[u8], key_pem: &[u8]) -> Result<Self, TlsError> {
        let certs = rustls_pemfile::certs(&mut BufReader::new(cert_pem))
            .collect::<Result<Vec<CertificateDer<'static>>, _>>()
            .map_err(|source| TlsError::Pem { source })?;
        if certs.is_empty() {
            return Err(TlsError::NoCertificate);
        }

        let key: PrivateKeyDer<'static> = rustls_pemfile::private_key(&mut BufReader::new(key_pem))
            .map_err(|source| TlsError::Pem { source })?
            .ok_or(TlsError::NoPrivateKey)?;

        let server_config = rustls::ServerConfig::builder_with_provider(rustls::crypto::ring::default_provider().into())
            .with_safe_default_protocol_versions()?
            .with_no_client_auth()
            .with_single_cert(certs, key)?;

        debug!("loaded server certificate");
        Ok(Self { server_config: Arc::new(server_config) })
    }

    pub fn from_files(cert_path: &Path, key_path: &Path) -> Result<Self, TlsError> {
        let read = |path: &Path| fs::read(path).map_err(|source| TlsError::ReadFile { path: path.to_path_buf(), source });
        Self::from_pem(&read(cert_path)?, &read(key_path)?)
    }

    pub fn acceptor(&self) -> TlsAcceptor {
        TlsAcceptor::from(Arc::clone(&self.server_config))
    }
}

/// Client configuration that accepts any server certificate.
pub fn insecure_client_config() -> Result<Arc<rustls::ClientConfig>, TlsError> {
    let client_config = rustls::ClientConfig::builder_with_provider(rustls::crypto::ring::default_provider().into())
        .with_safe_default_protocol_versions()?
        .dangerous()
        .with_custom_certificate_verifier(Arc::new(danger::NoVerifier))
        .with_no_client_auth();

    Ok(Arc::new(client_config))
}

mod danger {
    use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
    use rustls::pki_types::{CertificateDer, ServerName, UnixTime};
    use rustls::{DigitallySignedStruct, Error, SignatureScheme};

    #[derive(Debug)]
    pub struct NoVerifier;

    impl ServerCertVerifier for NoVerifier {
        fn verify_server_cert(
            &self,
            _end_entity: &CertificateDer<'_>,
            _intermediates: &[CertificateDer<'_>],
            _server_name: &ServerName<'_>,
            _ocsp_response: &[u8],
            _now: UnixTime,
        ) -> Result<ServerCertVerified, Error> {
            Ok(ServerCertVerified::assertion())
        }

        fn verify_tls12_signature(
            &self,
            _message: &[u8],
            _cert: &CertificateDer<'_>,
            _dss: &DigitallySignedStruct,
        ) -> Result<HandshakeSignatureValid, Error> {
            Ok(HandshakeSignatureValid::assertion())
        }

        fn verify_tls13_signature(
            &self,
            _message: &[u8],
            _cert: &CertificateDer<'_>,
            _dss: &DigitallySignedStruct,
        ) -> Result<HandshakeSignatureValid, Error> {
            Ok(HandshakeSignatureValid::assertion())
        }

        fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
            rustls::crypto::ring::default_provider().signature_verification_algorithms.supported_schemes()
        }
    }
}
