//! Endpoint file parsing.
//!
//! The endpoint file holds the peer host on its first line and the TCP port
//! on its second. Surrounding whitespace on either line is ignored; anything
//! after the second line is ignored too.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;
use transport::Endpoint;

use crate::exit_code::{ExitCode, HasExitCode};

/// Errors produced while loading an endpoint file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read endpoint file {}: {source}", path.display())]
    Read {
        /// File path.
        path: PathBuf,
        /// Filesystem error.
        #[source]
        source: io::Error,
    },
    /// The first line is missing or blank.
    #[error("endpoint file has no host on its first line")]
    MissingHost,
    /// The second line is missing or blank.
    #[error("endpoint file has no port on its second line")]
    MissingPort,
    /// The second line is not a TCP port.
    #[error("invalid port '{value}' in endpoint file: {source}")]
    InvalidPort {
        /// Text found on the port line.
        value: String,
        /// Parse failure.
        #[source]
        source: std::num::ParseIntError,
    },
}

impl HasExitCode for ConfigError {
    fn exit_code(&self) -> ExitCode {
        ExitCode::StartClient
    }
}

/// Host and port read from an endpoint file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EndpointConfig {
    host: String,
    port: u16,
}

impl EndpointConfig {
    /// Reads and parses the endpoint file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents)
    }

    /// Parses endpoint file contents.
    pub fn parse(contents: &str) -> Result<Self, ConfigError> {
        let mut lines = contents.lines().map(str::trim);

        let host = lines
            .next()
            .filter(|line| !line.is_empty())
            .ok_or(ConfigError::MissingHost)?;
        let port_text = lines
            .next()
            .filter(|line| !line.is_empty())
            .ok_or(ConfigError::MissingPort)?;
        let port = port_text
            .parse::<u16>()
            .map_err(|source| ConfigError::InvalidPort {
                value: port_text.to_owned(),
                source,
            })?;

        Ok(Self {
            host: host.to_owned(),
            port,
        })
    }

    /// Peer host name or address literal.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Peer TCP port.
    #[must_use]
    pub const fn port(&self) -> u16 {
        self.port
    }

    /// Converts into a transport endpoint with the given connect timeout.
    #[must_use]
    pub fn into_endpoint(self, connect_timeout: Duration) -> Endpoint {
        Endpoint::new(self.host, self.port).with_connect_timeout(connect_timeout)
    }
}
