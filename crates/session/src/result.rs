use std::fmt;

use protocol::{ReassembledResponse, ReassemblyError, ReassemblyErrorKind};
use transport::{ChannelError, ChannelErrorKind};

use crate::exit_code::{ExitCode, HasExitCode};

/// Outcome class of one exchange.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SessionStatus {
    /// A response was reassembled.
    Ok,
    /// A read or write hit its deadline.
    Timeout,
    /// The channel could not be opened, or a read or write failed.
    IoFailure,
    /// The peer broke the response protocol.
    ProtocolFailure,
}

impl SessionStatus {
    /// Returns the numeric code older callers of this client expect:
    /// `0` success, `1` socket failure, `2` stream I/O failure (deadlines
    /// included) and `4` anything else.
    #[must_use]
    pub const fn legacy_code(self) -> i32 {
        match self {
            Self::Ok => 0,
            Self::IoFailure => 1,
            Self::Timeout => 2,
            Self::ProtocolFailure => 4,
        }
    }

    /// Short lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Timeout => "timeout",
            Self::IoFailure => "io failure",
            Self::ProtocolFailure => "protocol failure",
        }
    }
}

impl HasExitCode for SessionStatus {
    fn exit_code(&self) -> ExitCode {
        match self {
            Self::Ok => ExitCode::Ok,
            Self::Timeout => ExitCode::Timeout,
            Self::IoFailure => ExitCode::SocketIo,
            Self::ProtocolFailure => ExitCode::Protocol,
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The underlying error class behind a failed exchange.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// Resolve, connect, trust setup or handshake failed.
    ConnectionFailure,
    /// The requested TLS versions are unavailable.
    UnsupportedAlgorithm,
    /// A deadline elapsed.
    Timeout,
    /// A read or write failed.
    IoFailure,
    /// The first burst did not survive hex normalisation.
    MalformedHexInput,
    /// The peer closed or misbehaved.
    ProtocolFailure,
}

impl From<ChannelErrorKind> for FailureKind {
    fn from(kind: ChannelErrorKind) -> Self {
        match kind {
            ChannelErrorKind::ConnectionFailure => Self::ConnectionFailure,
            ChannelErrorKind::UnsupportedAlgorithm => Self::UnsupportedAlgorithm,
            ChannelErrorKind::Timeout => Self::Timeout,
            ChannelErrorKind::Io => Self::IoFailure,
        }
    }
}

impl From<ReassemblyErrorKind> for FailureKind {
    fn from(kind: ReassemblyErrorKind) -> Self {
        match kind {
            ReassemblyErrorKind::Timeout => Self::Timeout,
            ReassemblyErrorKind::Io => Self::IoFailure,
            ReassemblyErrorKind::MalformedHexInput => Self::MalformedHexInput,
            ReassemblyErrorKind::ProtocolFailure => Self::ProtocolFailure,
        }
    }
}

/// What went wrong, kept for reporting.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionFailure {
    kind: FailureKind,
    message: String,
}

impl SessionFailure {
    /// Creates a failure record.
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Error class.
    #[must_use]
    pub const fn kind(&self) -> FailureKind {
        self.kind
    }

    /// Human-readable description, including the error chain.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for SessionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Result of one exchange. Failures are values, never panics or errors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionResult {
    status: SessionStatus,
    response: Option<ReassembledResponse>,
    failure: Option<SessionFailure>,
}

impl SessionResult {
    /// A successful exchange.
    #[must_use]
    pub fn success(response: ReassembledResponse) -> Self {
        Self {
            status: SessionStatus::Ok,
            response: Some(response),
            failure: None,
        }
    }

    /// A failed exchange with `status`.
    #[must_use]
    pub fn failed(status: SessionStatus, failure: SessionFailure) -> Self {
        Self {
            status,
            response: None,
            failure: Some(failure),
        }
    }

    /// A failure while opening the channel. Every open failure is reported
    /// as [`SessionStatus::IoFailure`]; the kind keeps the detail.
    pub(crate) fn from_open_error(error: &ChannelError) -> Self {
        Self::failed(
            SessionStatus::IoFailure,
            SessionFailure::new(error.kind().into(), render_chain(error)),
        )
    }

    /// A failure while configuring or writing to an open channel.
    pub(crate) fn from_channel_error(error: &ChannelError) -> Self {
        Self::failed(
            SessionStatus::IoFailure,
            SessionFailure::new(FailureKind::IoFailure, render_chain(error)),
        )
    }

    /// A failure while reassembling the response.
    pub(crate) fn from_reassembly_error(error: &ReassemblyError) -> Self {
        let status = match error.kind() {
            ReassemblyErrorKind::Timeout => SessionStatus::Timeout,
            ReassemblyErrorKind::Io => SessionStatus::IoFailure,
            ReassemblyErrorKind::MalformedHexInput | ReassemblyErrorKind::ProtocolFailure => {
                SessionStatus::ProtocolFailure
            }
        };
        Self::failed(
            status,
            SessionFailure::new(error.kind().into(), render_chain(error)),
        )
    }

    /// Outcome class.
    #[must_use]
    pub const fn status(&self) -> SessionStatus {
        self.status
    }

    /// Reassembled response, present only on success.
    #[must_use]
    pub const fn response(&self) -> Option<&ReassembledResponse> {
        self.response.as_ref()
    }

    /// Failure detail, present only on failure.
    #[must_use]
    pub const fn failure(&self) -> Option<&SessionFailure> {
        self.failure.as_ref()
    }

    /// Returns `true` when a response was reassembled.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        matches!(self.status, SessionStatus::Ok)
    }

    /// Consumes the result, returning the response if there is one.
    #[must_use]
    pub fn into_response(self) -> Option<ReassembledResponse> {
        self.response
    }
}

impl HasExitCode for SessionResult {
    fn exit_code(&self) -> ExitCode {
        self.status.exit_code()
    }
}

fn render_chain(error: &dyn std::error::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}
