use std::io;
use std::path::PathBuf;

use logging::LogInitError;
use protocol::HexError;
use session::{ConfigError, ExitCode, HasExitCode};
use thiserror::Error;

/// Everything that can stop the client before an exchange starts.
#[derive(Debug, Error)]
pub enum CliError {
    /// `clap` rejected the arguments.
    #[error(transparent)]
    Usage(#[from] clap::Error),
    /// An option value was accepted by the parser but is unusable.
    #[error("invalid {option}: {detail}")]
    InvalidOption {
        /// Option name, including dashes.
        option: &'static str,
        /// What is wrong with it.
        detail: String,
    },
    /// A required choice was not made.
    #[error("{0}")]
    Missing(&'static str),
    /// The request hex could not be decoded.
    #[error("invalid --request-hex: {0}")]
    RequestHex(#[source] HexError),
    /// The request file could not be read.
    #[error("failed to read request file {}: {source}", path.display())]
    RequestFile {
        /// File path.
        path: PathBuf,
        /// Filesystem error.
        #[source]
        source: io::Error,
    },
    /// The endpoint file could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Diagnostics could not be set up.
    #[error(transparent)]
    Logging(#[from] LogInitError),
}

impl HasExitCode for CliError {
    fn exit_code(&self) -> ExitCode {
        match self {
            Self::Usage(_) | Self::InvalidOption { .. } | Self::Missing(_) | Self::RequestHex(_) => {
                ExitCode::Syntax
            }
            Self::RequestFile { .. } | Self::Logging(_) => ExitCode::StartClient,
            Self::Config(error) => error.exit_code(),
        }
    }
}
