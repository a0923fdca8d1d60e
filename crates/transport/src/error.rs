use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::tls::TransportProtocol;

/// Failure classes a channel can report.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ChannelErrorKind {
    /// Name resolution, TCP connect, trust setup or TLS handshake failed.
    ConnectionFailure,
    /// The requested TLS versions are not available from the crypto provider.
    UnsupportedAlgorithm,
    /// A read or write exceeded its deadline.
    Timeout,
    /// Any other read or write failure.
    Io,
}

/// Errors produced while opening or using a [`SecureChannel`](crate::SecureChannel).
#[derive(Debug, Error)]
pub enum ChannelError {
    /// The host name could not be resolved.
    #[error("failed to resolve {endpoint}: {source}")]
    Resolve {
        /// Endpoint being resolved.
        endpoint: String,
        /// Resolver error.
        #[source]
        source: io::Error,
    },
    /// Resolution succeeded but produced no usable address.
    #[error("{endpoint} did not resolve to any usable address")]
    NoAddresses {
        /// Endpoint being resolved.
        endpoint: String,
    },
    /// Every resolved address refused or timed out.
    #[error("failed to connect to {address}: {source}")]
    Connect {
        /// Last address attempted.
        address: String,
        /// Socket error for that address.
        #[source]
        source: io::Error,
    },
    /// The host is not a valid TLS server name.
    #[error("'{host}' is not a valid TLS server name")]
    InvalidServerName {
        /// Offending host.
        host: String,
    },
    /// The trust store could not be read.
    #[error("failed to read trust store {}: {source}", path.display())]
    TrustStoreRead {
        /// Trust store path.
        path: PathBuf,
        /// Filesystem error.
        #[source]
        source: io::Error,
    },
    /// The trust store held no usable certificate.
    #[error("trust store {} is unusable: {detail}", path.display())]
    TrustStoreInvalid {
        /// Trust store path.
        path: PathBuf,
        /// What was wrong with it.
        detail: String,
    },
    /// The TLS handshake did not complete.
    #[error("TLS handshake with {endpoint} failed: {source}")]
    Handshake {
        /// Peer being contacted.
        endpoint: String,
        /// Handshake error; rustls failures arrive wrapped as `InvalidData`.
        #[source]
        source: io::Error,
    },
    /// The crypto provider cannot serve the requested protocol versions.
    #[error("secure transport {protocol} is not available: {source}")]
    UnsupportedAlgorithm {
        /// Requested protocol family.
        protocol: TransportProtocol,
        /// Error reported by rustls.
        #[source]
        source: rustls::Error,
    },
    /// A read or write hit the deadline.
    #[error("timed out while trying to {operation}")]
    Timeout {
        /// Operation that was pending.
        operation: &'static str,
        /// Socket error.
        #[source]
        source: io::Error,
    },
    /// A read or write failed.
    #[error("failed to {operation}: {source}")]
    Io {
        /// Operation that failed.
        operation: &'static str,
        /// Socket error.
        #[source]
        source: io::Error,
    },
    /// The channel was already closed.
    #[error("channel is closed")]
    Closed,
}

impl ChannelError {
    /// Wraps an I/O error from `operation`, separating deadline expiry.
    pub(crate) fn io(operation: &'static str, source: io::Error) -> Self {
        if protocol::is_timeout(&source) {
            Self::Timeout { operation, source }
        } else {
            Self::Io { operation, source }
        }
    }

    /// Returns the failure class.
    #[must_use]
    pub const fn kind(&self) -> ChannelErrorKind {
        match self {
            Self::Resolve { .. }
            | Self::NoAddresses { .. }
            | Self::Connect { .. }
            | Self::InvalidServerName { .. }
            | Self::TrustStoreRead { .. }
            | Self::TrustStoreInvalid { .. }
            | Self::Handshake { .. } => ChannelErrorKind::ConnectionFailure,
            Self::UnsupportedAlgorithm { .. } => ChannelErrorKind::UnsupportedAlgorithm,
            Self::Timeout { .. } => ChannelErrorKind::Timeout,
            Self::Io { .. } | Self::Closed => ChannelErrorKind::Io,
        }
    }
}

impl From<ChannelError> for io::Error {
    fn from(error: ChannelError) -> Self {
        let kind = match &error {
            ChannelError::Timeout { source, .. } | ChannelError::Io { source, .. } => {
                source.kind()
            }
            ChannelError::Closed => io::ErrorKind::NotConnected,
            _ => io::ErrorKind::Other,
        };
        Self::new(kind, error)
    }
}
