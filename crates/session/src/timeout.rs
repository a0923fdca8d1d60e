//! Deadlines applied to one exchange.
//!
//! [`SessionTimeouts`] gathers the three durations a session uses:
//!
//! - **read deadline**: how long a single read may block before the exchange
//!   fails with a timeout.
//! - **connect timeout**: how long the TCP connect and TLS handshake may take.
//! - **grace period**: a short pause between writing the request and reading
//!   the first burst, giving the peer time to start answering.
//!
//! # Examples
//!
//! ```
//! use std::time::Duration;
//! use session::timeout::SessionTimeouts;
//!
//! let timeouts = SessionTimeouts::default()
//!     .with_read_deadline(Duration::from_secs(5))
//!     .with_grace_period(Duration::ZERO);
//!
//! assert_eq!(timeouts.read_deadline(), Duration::from_secs(5));
//! assert_eq!(timeouts.connect_timeout(), Duration::from_secs(60));
//! assert!(timeouts.grace_period().is_zero());
//! ```

use std::time::Duration;

/// Default read deadline in milliseconds.
pub const DEFAULT_READ_DEADLINE_MS: u64 = 60_000;

/// Default connect timeout in milliseconds.
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 60_000;

/// Default pause between the request write and the first read.
pub const DEFAULT_GRACE_PERIOD: Duration = Duration::from_millis(10);

/// Read, connect and grace durations for one exchange.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionTimeouts {
    read_deadline: Duration,
    connect_timeout: Duration,
    grace_period: Duration,
}

impl Default for SessionTimeouts {
    fn default() -> Self {
        Self {
            read_deadline: Duration::from_millis(DEFAULT_READ_DEADLINE_MS),
            connect_timeout: Duration::from_millis(DEFAULT_CONNECT_TIMEOUT_MS),
            grace_period: DEFAULT_GRACE_PERIOD,
        }
    }
}

impl SessionTimeouts {
    /// Builds timeouts from optional millisecond values, falling back to the
    /// defaults for anything not given.
    ///
    /// ```
    /// use std::time::Duration;
    /// use session::timeout::SessionTimeouts;
    ///
    /// let timeouts = SessionTimeouts::from_millis(Some(250), None);
    /// assert_eq!(timeouts.read_deadline(), Duration::from_millis(250));
    /// assert_eq!(timeouts.connect_timeout(), Duration::from_secs(60));
    /// ```
    #[must_use]
    pub fn from_millis(read_deadline_ms: Option<u64>, connect_timeout_ms: Option<u64>) -> Self {
        let defaults = Self::default();
        Self {
            read_deadline: read_deadline_ms.map_or(defaults.read_deadline, Duration::from_millis),
            connect_timeout: connect_timeout_ms
                .map_or(defaults.connect_timeout, Duration::from_millis),
            grace_period: defaults.grace_period,
        }
    }

    /// Returns a copy with the given read deadline.
    #[must_use]
    pub const fn with_read_deadline(mut self, deadline: Duration) -> Self {
        self.read_deadline = deadline;
        self
    }

    /// Returns a copy with the given connect timeout.
    #[must_use]
    pub const fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Returns a copy with the given grace period.
    #[must_use]
    pub const fn with_grace_period(mut self, grace: Duration) -> Self {
        self.grace_period = grace;
        self
    }

    /// Per-read deadline.
    #[must_use]
    pub const fn read_deadline(&self) -> Duration {
        self.read_deadline
    }

    /// TCP connect and handshake timeout.
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    /// Pause before the first read.
    #[must_use]
    pub const fn grace_period(&self) -> Duration {
        self.grace_period
    }
}
