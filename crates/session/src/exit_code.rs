//! Process exit codes reported by the burstlink client.
//!
//! The numbering follows the rsync convention the rest of the toolchain
//! already scripts against, restricted to the failures a single exchange can
//! produce.
//!
//! # Examples
//!
//! ```
//! use session::exit_code::ExitCode;
//!
//! assert_eq!(ExitCode::Timeout.as_i32(), 30);
//! assert_eq!(ExitCode::Timeout.description(), "timeout in data send/receive");
//! ```

use std::fmt;

/// Exit codes returned by the `burstlink` binary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum ExitCode {
    /// The exchange completed and a response was printed.
    Ok = 0,

    /// Syntax or usage error.
    ///
    /// Returned when command-line arguments are invalid or contradict each
    /// other.
    Syntax = 1,

    /// The peer violated the response protocol.
    ///
    /// Returned when the stream closed before a response or the first burst
    /// could not be normalised.
    Protocol = 2,

    /// The exchange could not be started.
    ///
    /// Returned when the endpoint file or the request input cannot be read.
    StartClient = 5,

    /// Error in socket I/O, including failed connects and handshakes.
    SocketIo = 10,

    /// A read or write exceeded its deadline.
    Timeout = 30,
}

impl ExitCode {
    /// Returns the numeric exit code value.
    ///
    /// ```
    /// use session::exit_code::ExitCode;
    ///
    /// assert_eq!(ExitCode::Ok.as_i32(), 0);
    /// assert_eq!(ExitCode::SocketIo.as_i32(), 10);
    /// ```
    #[must_use]
    pub const fn as_i32(self) -> i32 {
        self as i32
    }

    /// Returns a human-readable description of this exit code.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Ok => "success",
            Self::Syntax => "syntax or usage error",
            Self::Protocol => "protocol violation in response stream",
            Self::StartClient => "error starting client session",
            Self::SocketIo => "error in socket IO",
            Self::Timeout => "timeout in data send/receive",
        }
    }

    /// Returns `true` if this represents a successful exit.
    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Ok)
    }

    /// Creates an exit code from an i32 value.
    ///
    /// Returns `None` if the value doesn't correspond to a known exit code.
    ///
    /// ```
    /// use session::exit_code::ExitCode;
    ///
    /// assert_eq!(ExitCode::from_i32(5), Some(ExitCode::StartClient));
    /// assert_eq!(ExitCode::from_i32(23), None);
    /// ```
    #[must_use]
    pub const fn from_i32(value: i32) -> Option<Self> {
        match value {
            0 => Some(Self::Ok),
            1 => Some(Self::Syntax),
            2 => Some(Self::Protocol),
            5 => Some(Self::StartClient),
            10 => Some(Self::SocketIo),
            30 => Some(Self::Timeout),
            _ => None,
        }
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code.as_i32()
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        let value = u8::try_from(code.as_i32()).unwrap_or(u8::MAX);
        Self::from(value)
    }
}

/// Types that know which process exit code they should produce.
pub trait HasExitCode {
    /// Returns the exit code for this value.
    fn exit_code(&self) -> ExitCode;
}

impl HasExitCode for ExitCode {
    fn exit_code(&self) -> ExitCode {
        *self
    }
}
