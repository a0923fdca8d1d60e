use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use rustls::crypto::CryptoProvider;
use rustls::{ClientConfig, SupportedProtocolVersion};

use crate::error::ChannelError;
use crate::trust::{TrustPolicy, load_trust_store};
use crate::verifier::AcceptAnyServerCert;

static TLS12_ONLY: &[&SupportedProtocolVersion] = &[&rustls::version::TLS12];
static TLS13_ONLY: &[&SupportedProtocolVersion] = &[&rustls::version::TLS13];

/// TLS versions offered during the handshake.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum TransportProtocol {
    /// Offer every version the provider supports.
    #[default]
    Any,
    /// Offer TLS 1.2 only.
    Tls12,
    /// Offer TLS 1.3 only.
    Tls13,
}

impl TransportProtocol {
    fn versions(self) -> &'static [&'static SupportedProtocolVersion] {
        match self {
            Self::Any => rustls::ALL_VERSIONS,
            Self::Tls12 => TLS12_ONLY,
            Self::Tls13 => TLS13_ONLY,
        }
    }
}

impl fmt::Display for TransportProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Any => "TLS",
            Self::Tls12 => "TLSv1.2",
            Self::Tls13 => "TLSv1.3",
        })
    }
}

impl FromStr for TransportProtocol {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "any" | "tls" | "ssl" => Ok(Self::Any),
            "1.2" | "tls1.2" | "tlsv1.2" => Ok(Self::Tls12),
            "1.3" | "tls1.3" | "tlsv1.3" => Ok(Self::Tls13),
            other => Err(format!("unknown secure transport '{other}'")),
        }
    }
}

/// Builds the client configuration for one connect call.
///
/// The trust policy is baked into the returned config, so two calls with
/// different policies never observe each other.
pub fn client_config(
    provider: &Arc<CryptoProvider>,
    protocol: TransportProtocol,
    policy: &TrustPolicy,
) -> Result<Arc<ClientConfig>, ChannelError> {
    let builder = ClientConfig::builder_with_provider(Arc::clone(provider))
        .with_protocol_versions(protocol.versions())
        .map_err(|source| ChannelError::UnsupportedAlgorithm { protocol, source })?;

    let config = match policy {
        TrustPolicy::AcceptAll => {
            tracing::warn!(
                target: "burstlink::tls",
                "peer certificate validation is disabled for this connection"
            );
            builder
                .dangerous()
                .with_custom_certificate_verifier(Arc::new(AcceptAnyServerCert::new(
                    Arc::clone(provider),
                )))
                .with_no_client_auth()
        }
        TrustPolicy::ValidateAgainstStore { path, .. } => {
            let roots = load_trust_store(path)?;
            builder.with_root_certificates(roots).with_no_client_auth()
        }
    };

    Ok(Arc::new(config))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring_provider() -> Arc<CryptoProvider> {
        Arc::new(rustls::crypto::ring::default_provider())
    }

    #[test]
    fn parses_protocol_names() {
        assert_eq!("1.2".parse(), Ok(TransportProtocol::Tls12));
        assert_eq!("TLSv1.3".parse(), Ok(TransportProtocol::Tls13));
        assert_eq!("any".parse(), Ok(TransportProtocol::Any));
        assert!("sslv3".parse::<TransportProtocol>().is_err());
    }

    #[test]
    fn accept_all_config_builds_without_store() {
        let config = client_config(
            &ring_provider(),
            TransportProtocol::Any,
            &TrustPolicy::accept_all_insecure(),
        );
        assert!(config.is_ok());
    }

    #[test]
    fn provider_without_tls12_suites_rejects_tls12() {
        let base = rustls::crypto::ring::default_provider();
        let provider = Arc::new(CryptoProvider {
            cipher_suites: base
                .cipher_suites
                .iter()
                .copied()
                .filter(|suite| suite.version().version == rustls::ProtocolVersion::TLSv1_3)
                .collect(),
            ..base
        });

        let error = client_config(
            &provider,
            TransportProtocol::Tls12,
            &TrustPolicy::accept_all_insecure(),
        )
        .expect_err("no TLS 1.2 suites available");

        assert_eq!(
            error.kind(),
            crate::ChannelErrorKind::UnsupportedAlgorithm
        );
    }

    #[test]
    fn missing_store_is_a_connection_failure() {
        let error = client_config(
            &ring_provider(),
            TransportProtocol::Any,
            &TrustPolicy::validate_against_store("/nonexistent/burstlink/store.pem", None),
        )
        .expect_err("store is missing");

        assert_eq!(error.kind(), crate::ChannelErrorKind::ConnectionFailure);
    }
}
