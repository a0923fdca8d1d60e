use std::ops::{Deref, DerefMut};
use std::thread;
use std::time::{Duration, Instant};

use logging::{trace_exit, trace_session, trace_stats};
use protocol::{ResponseReassembler, to_hex};
use transport::{Channel, Connector, Endpoint, TlsConnector, TrustPolicy};

use crate::result::SessionResult;
use crate::timeout::DEFAULT_GRACE_PERIOD;

/// Runs one request/response exchange per call.
///
/// The coordinator owns a [`Connector`], opens a fresh channel for every
/// exchange and closes it on every exit path. It never panics and never
/// returns an error: failures are reported through [`SessionResult`].
#[derive(Debug)]
pub struct SessionCoordinator<C = TlsConnector> {
    connector: C,
    grace_period: Duration,
}

impl Default for SessionCoordinator<TlsConnector> {
    fn default() -> Self {
        Self::new(TlsConnector::default())
    }
}

impl<C: Connector> SessionCoordinator<C> {
    /// Creates a coordinator with the default 10 ms grace period.
    pub const fn new(connector: C) -> Self {
        Self {
            connector,
            grace_period: DEFAULT_GRACE_PERIOD,
        }
    }

    /// Returns a copy pausing `grace` between the request write and the
    /// first read.
    #[must_use]
    pub const fn with_grace_period(mut self, grace: Duration) -> Self {
        self.grace_period = grace;
        self
    }

    /// Pause between the request write and the first read.
    pub const fn grace_period(&self) -> Duration {
        self.grace_period
    }

    /// The connector channels are opened through.
    pub const fn connector(&self) -> &C {
        &self.connector
    }

    /// Sends `request` to `endpoint` and reassembles the reply.
    pub fn exchange(
        &self,
        endpoint: &Endpoint,
        policy: &TrustPolicy,
        request: &[u8],
        read_deadline: Duration,
    ) -> SessionResult {
        let started = Instant::now();
        trace_session!(
            "exchange with {endpoint}: {} request bytes, {} trust",
            request.len(),
            if policy.is_insecure() { "insecure" } else { "store" }
        );

        let result = self.exchange_inner(endpoint, policy, request, read_deadline);

        match result.response() {
            Some(response) => trace_stats!(
                "sent {} bytes, received {} bytes in {} ms",
                request.len(),
                response.len(),
                started.elapsed().as_millis()
            ),
            None => trace_session!(
                "exchange with {endpoint} ended with {}: {}",
                result.status(),
                result.failure().map_or("", |failure| failure.message())
            ),
        }
        result
    }

    fn exchange_inner(
        &self,
        endpoint: &Endpoint,
        policy: &TrustPolicy,
        request: &[u8],
        read_deadline: Duration,
    ) -> SessionResult {
        let mut channel = match self.connector.open(endpoint, policy) {
            Ok(channel) => ClosingChannel(channel),
            Err(error) => return SessionResult::from_open_error(&error),
        };

        if let Err(error) = channel.set_read_deadline(read_deadline) {
            return SessionResult::from_channel_error(&error);
        }
        if let Err(error) = channel.send(request) {
            return SessionResult::from_channel_error(&error);
        }
        trace_session!("request sent: {}", to_hex(request));

        if !self.grace_period.is_zero() {
            thread::sleep(self.grace_period);
        }

        match ResponseReassembler::new().run(&mut *channel) {
            Ok(response) => {
                trace_session!("response: {}", response.to_hex());
                SessionResult::success(response)
            }
            Err(error) => SessionResult::from_reassembly_error(&error),
        }
    }
}

/// Closes the wrapped channel when dropped.
struct ClosingChannel<T: Channel>(T);

impl<T: Channel> Deref for ClosingChannel<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T: Channel> DerefMut for ClosingChannel<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.0
    }
}

impl<T: Channel> Drop for ClosingChannel<T> {
    fn drop(&mut self) {
        self.0.close();
        trace_exit!("session channel released");
    }
}
