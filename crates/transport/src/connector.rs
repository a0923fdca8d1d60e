use std::sync::Arc;
use std::time::Duration;

use protocol::BurstChannel;
use rustls::crypto::CryptoProvider;

use crate::channel::SecureChannel;
use crate::endpoint::Endpoint;
use crate::error::ChannelError;
use crate::tls::TransportProtocol;
use crate::trust::TrustPolicy;

/// A connected channel as seen by the session layer.
///
/// Reads and availability queries come from [`BurstChannel`]; the remaining
/// operations cover the request write, the deadline and release.
pub trait Channel: BurstChannel {
    /// Bounds every later read by `deadline`.
    fn set_read_deadline(&mut self, deadline: Duration) -> Result<(), ChannelError>;

    /// Writes and flushes the whole request.
    fn send(&mut self, bytes: &[u8]) -> Result<(), ChannelError>;

    /// Releases the channel. Must be idempotent and must not fail.
    fn close(&mut self);
}

/// Opens channels for a session.
pub trait Connector {
    /// Channel type produced by [`open`](Self::open).
    type Channel: Channel;

    /// Connects to `endpoint`, judging the peer with `policy`.
    fn open(&self, endpoint: &Endpoint, policy: &TrustPolicy)
    -> Result<Self::Channel, ChannelError>;
}

impl Channel for SecureChannel {
    fn set_read_deadline(&mut self, deadline: Duration) -> Result<(), ChannelError> {
        Self::set_read_deadline(self, deadline)
    }

    fn send(&mut self, bytes: &[u8]) -> Result<(), ChannelError> {
        self.write(bytes)
    }

    fn close(&mut self) {
        Self::close(self);
    }
}

/// Production connector opening [`SecureChannel`]s.
#[derive(Clone, Debug)]
pub struct TlsConnector {
    provider: Arc<CryptoProvider>,
    protocol: TransportProtocol,
}

impl Default for TlsConnector {
    fn default() -> Self {
        Self::new()
    }
}

impl TlsConnector {
    /// Creates a connector offering every TLS version `ring` supports.
    #[must_use]
    pub fn new() -> Self {
        Self::with_provider(Arc::new(rustls::crypto::ring::default_provider()))
    }

    /// Creates a connector that uses `provider` for every handshake.
    #[must_use]
    pub const fn with_provider(provider: Arc<CryptoProvider>) -> Self {
        Self {
            provider,
            protocol: TransportProtocol::Any,
        }
    }

    /// Restricts the offered TLS versions.
    #[must_use]
    pub fn with_protocol(mut self, protocol: TransportProtocol) -> Self {
        self.protocol = protocol;
        self
    }

    /// Returns the requested protocol family.
    #[must_use]
    pub const fn protocol(&self) -> TransportProtocol {
        self.protocol
    }
}

impl Connector for TlsConnector {
    type Channel = SecureChannel;

    fn open(
        &self,
        endpoint: &Endpoint,
        policy: &TrustPolicy,
    ) -> Result<SecureChannel, ChannelError> {
        SecureChannel::open_with(&self.provider, endpoint, policy, self.protocol)
    }
}
