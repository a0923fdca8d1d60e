use std::io;

use thiserror::Error;

use super::chunk::Attempt;
use crate::hex::HexError;

/// Classification of a failed reassembly, used to pick a session status.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ReassemblyErrorKind {
    /// A read or write exceeded the channel deadline.
    Timeout,
    /// A read or write failed for any other reason.
    Io,
    /// The first burst could not be normalised through its hex form.
    MalformedHexInput,
    /// The peer did something the protocol does not allow.
    ProtocolFailure,
}

/// Errors produced by [`ResponseReassembler::run`](super::ResponseReassembler::run).
#[derive(Debug, Error)]
pub enum ReassemblyError {
    /// The read deadline elapsed while waiting for a burst.
    #[error("timed out waiting for the {attempt} response burst")]
    Timeout {
        /// Read that was pending.
        attempt: Attempt,
        /// Error reported by the channel.
        #[source]
        source: io::Error,
    },
    /// Reading a burst failed.
    #[error("failed to read the {attempt} response burst: {source}")]
    Read {
        /// Read that failed.
        attempt: Attempt,
        /// Error reported by the channel.
        #[source]
        source: io::Error,
    },
    /// Writing the acknowledgement for a probe failed.
    #[error("failed to acknowledge handshake probe: {source}")]
    Acknowledge {
        /// Error reported by the channel.
        #[source]
        source: io::Error,
    },
    /// The first burst did not survive the hex round trip.
    #[error("malformed first response burst: {0}")]
    MalformedHex(#[from] HexError),
    /// The stream ended before any response byte arrived.
    #[error("peer closed the connection before sending a response")]
    PeerClosed,
}

impl ReassemblyError {
    /// Wraps a read failure, separating deadline expiry from other I/O errors.
    pub(super) fn read(attempt: Attempt, source: io::Error) -> Self {
        if is_timeout(&source) {
            Self::Timeout { attempt, source }
        } else {
            Self::Read { attempt, source }
        }
    }

    /// Returns the failure class.
    #[must_use]
    pub fn kind(&self) -> ReassemblyErrorKind {
        match self {
            Self::Timeout { .. } => ReassemblyErrorKind::Timeout,
            Self::Acknowledge { source } if is_timeout(source) => ReassemblyErrorKind::Timeout,
            Self::Read { .. } | Self::Acknowledge { .. } => ReassemblyErrorKind::Io,
            Self::MalformedHex(_) => ReassemblyErrorKind::MalformedHexInput,
            Self::PeerClosed => ReassemblyErrorKind::ProtocolFailure,
        }
    }
}

/// Reports whether `error` represents an elapsed socket deadline.
///
/// Unix sockets report `WouldBlock` when `SO_RCVTIMEO` fires, Windows reports
/// `TimedOut`.
#[must_use]
pub fn is_timeout(error: &io::Error) -> bool {
    matches!(
        error.kind(),
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn would_block_read_is_a_timeout() {
        let error = ReassemblyError::read(
            Attempt::First,
            io::Error::from(io::ErrorKind::WouldBlock),
        );
        assert_eq!(error.kind(), ReassemblyErrorKind::Timeout);
        assert!(error.to_string().contains("first"));
    }

    #[test]
    fn reset_connection_is_io() {
        let error = ReassemblyError::read(
            Attempt::Second,
            io::Error::from(io::ErrorKind::ConnectionReset),
        );
        assert_eq!(error.kind(), ReassemblyErrorKind::Io);
    }

    #[test]
    fn acknowledge_timeout_is_classified_as_timeout() {
        let error = ReassemblyError::Acknowledge {
            source: io::Error::from(io::ErrorKind::TimedOut),
        };
        assert_eq!(error.kind(), ReassemblyErrorKind::Timeout);
    }

    #[test]
    fn peer_closed_is_protocol_failure() {
        assert_eq!(
            ReassemblyError::PeerClosed.kind(),
            ReassemblyErrorKind::ProtocolFailure
        );
    }

    #[test]
    fn hex_errors_convert() {
        let error = ReassemblyError::from(HexError::OddLength { len: 3 });
        assert_eq!(error.kind(), ReassemblyErrorKind::MalformedHexInput);
    }
}
