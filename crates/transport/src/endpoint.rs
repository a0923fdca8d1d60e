use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;

/// Connect timeout applied when the caller does not choose one.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_millis(60_000);

/// Address of the peer a channel connects to.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Endpoint {
    host: String,
    port: u16,
    connect_timeout: Duration,
    bind_address: Option<SocketAddr>,
}

impl Endpoint {
    /// Creates an endpoint with [`DEFAULT_CONNECT_TIMEOUT`].
    #[must_use]
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            bind_address: None,
        }
    }

    /// Returns a copy with the given connect timeout.
    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Returns a copy that binds the local socket to `address` before
    /// connecting. The port is ignored; an ephemeral port is always used.
    #[must_use]
    pub fn with_bind_address(mut self, address: SocketAddr) -> Self {
        self.bind_address = Some(address);
        self
    }

    /// Returns the host name or address literal.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the TCP port.
    #[must_use]
    pub const fn port(&self) -> u16 {
        self.port
    }

    /// Returns the connect timeout.
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    /// Returns the local bind address, if any.
    #[must_use]
    pub const fn bind_address(&self) -> Option<SocketAddr> {
        self.bind_address
    }

    /// Host name with surrounding IPv6 brackets removed, as TLS expects it.
    pub(crate) fn server_name_host(&self) -> &str {
        self.host
            .strip_prefix('[')
            .and_then(|inner| inner.strip_suffix(']'))
            .unwrap_or(&self.host)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let host = self.server_name_host();
        if host.contains(':') {
            write!(f, "[{host}]:{}", self.port)
        } else {
            write!(f, "{host}:{}", self.port)
        }
    }
}
