use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use protocol::BurstChannel;
use transport::{Channel, ChannelError, Connector, Endpoint, TrustPolicy};

/// One step of a scripted peer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Burst {
    /// Bytes that are already buffered: availability reports their length.
    Ready(Vec<u8>),
    /// Bytes still in flight: availability reports zero, a read returns them.
    Delayed(Vec<u8>),
    /// Nothing arrives: availability reports zero and a read hits the
    /// deadline.
    Stall,
    /// The peer closed: availability reports zero and a read returns `0`.
    Eof,
    /// A read fails with the given error kind.
    Fail(io::ErrorKind),
}

impl Burst {
    /// Shorthand for [`Burst::Ready`].
    pub fn ready(bytes: impl AsRef<[u8]>) -> Self {
        Self::Ready(bytes.as_ref().to_vec())
    }

    /// Shorthand for [`Burst::Delayed`].
    pub fn delayed(bytes: impl AsRef<[u8]>) -> Self {
        Self::Delayed(bytes.as_ref().to_vec())
    }
}

/// Everything a scripted channel observed, shared between clones.
#[derive(Clone, Debug, Default)]
pub struct ChannelLog {
    inner: Arc<Mutex<Observed>>,
}

#[derive(Debug, Default)]
struct Observed {
    opens: usize,
    closes: usize,
    read_deadline: Option<Duration>,
    writes: Vec<Vec<u8>>,
    read_requests: Vec<usize>,
}

impl ChannelLog {
    fn lock(&self) -> MutexGuard<'_, Observed> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of channels opened.
    pub fn opens(&self) -> usize {
        self.lock().opens
    }

    /// Number of `close` calls that released an open channel.
    pub fn closes(&self) -> usize {
        self.lock().closes
    }

    /// Last read deadline applied.
    pub fn read_deadline(&self) -> Option<Duration> {
        self.lock().read_deadline
    }

    /// Every write and request, in order.
    pub fn writes(&self) -> Vec<Vec<u8>> {
        self.lock().writes.clone()
    }

    /// Buffer length of every read call, in order.
    pub fn read_requests(&self) -> Vec<usize> {
        self.lock().read_requests.clone()
    }
}

/// A [`BurstChannel`] and [`Channel`] replaying a fixed script.
///
/// Availability reports the length of the leading [`Burst::Ready`] step.
/// A read consumes from the leading data step; a partially consumed step keeps
/// its remainder at the front as ready bytes. With the script exhausted,
/// availability is zero and reads stall.
#[derive(Debug)]
pub struct ScriptedChannel {
    script: VecDeque<Burst>,
    log: ChannelLog,
    open: bool,
    fail_send: Option<io::ErrorKind>,
    fail_deadline: bool,
}

impl ScriptedChannel {
    /// Creates a channel replaying `script`.
    pub fn new(script: impl IntoIterator<Item = Burst>) -> Self {
        Self::with_log(script, ChannelLog::default())
    }

    fn with_log(script: impl IntoIterator<Item = Burst>, log: ChannelLog) -> Self {
        log.lock().opens += 1;
        Self {
            script: script.into_iter().collect(),
            log,
            open: true,
            fail_send: None,
            fail_deadline: false,
        }
    }

    /// Returns the shared observation log.
    pub fn log(&self) -> ChannelLog {
        self.log.clone()
    }

    /// Steps not yet consumed.
    pub fn remaining(&self) -> usize {
        self.script.len()
    }

    fn ensure_open(&self) -> io::Result<()> {
        if self.open {
            Ok(())
        } else {
            Err(io::Error::from(io::ErrorKind::NotConnected))
        }
    }
}

impl BurstChannel for ScriptedChannel {
    fn bytes_available_now(&mut self) -> io::Result<usize> {
        self.ensure_open()?;
        Ok(match self.script.front() {
            Some(Burst::Ready(bytes)) => bytes.len(),
            _ => 0,
        })
    }

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.ensure_open()?;
        self.log.lock().read_requests.push(buf.len());

        match self.script.pop_front() {
            Some(Burst::Ready(mut bytes) | Burst::Delayed(mut bytes)) => {
                let count = bytes.len().min(buf.len());
                buf[..count].copy_from_slice(&bytes[..count]);
                if count < bytes.len() {
                    self.script.push_front(Burst::Ready(bytes.split_off(count)));
                }
                Ok(count)
            }
            Some(Burst::Eof) => {
                self.script.push_front(Burst::Eof);
                Ok(0)
            }
            Some(Burst::Fail(kind)) => Err(io::Error::new(kind, "scripted failure")),
            Some(Burst::Stall) | None => Err(io::Error::new(
                io::ErrorKind::WouldBlock,
                "scripted read deadline",
            )),
        }
    }

    fn write_all_and_flush(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.ensure_open()?;
        if let Some(kind) = self.fail_send {
            return Err(io::Error::new(kind, "scripted write failure"));
        }
        self.log.lock().writes.push(bytes.to_vec());
        Ok(())
    }
}

impl Channel for ScriptedChannel {
    fn set_read_deadline(&mut self, deadline: Duration) -> Result<(), ChannelError> {
        if self.fail_deadline || deadline.is_zero() {
            return Err(ChannelError::Io {
                operation: "set read deadline",
                source: io::Error::from(io::ErrorKind::InvalidInput),
            });
        }
        self.log.lock().read_deadline = Some(deadline);
        Ok(())
    }

    fn send(&mut self, bytes: &[u8]) -> Result<(), ChannelError> {
        self.write_all_and_flush(bytes)
            .map_err(|source| ChannelError::Io {
                operation: "write to peer",
                source,
            })
    }

    fn close(&mut self) {
        if self.open {
            self.open = false;
            self.log.lock().closes += 1;
        }
    }
}

/// How a [`ScriptedConnector`] answers `open`.
#[derive(Clone, Debug)]
enum OpenOutcome {
    Connect,
    Refuse,
    Unsupported,
}

/// A [`Connector`] handing out [`ScriptedChannel`]s that share one log.
#[derive(Debug)]
pub struct ScriptedConnector {
    script: Mutex<Option<Vec<Burst>>>,
    log: ChannelLog,
    outcome: OpenOutcome,
    fail_send: Option<io::ErrorKind>,
    fail_deadline: bool,
}

impl ScriptedConnector {
    /// The first channel replays `script`; later channels start exhausted.
    pub fn new(script: impl IntoIterator<Item = Burst>) -> Self {
        Self {
            script: Mutex::new(Some(script.into_iter().collect())),
            log: ChannelLog::default(),
            outcome: OpenOutcome::Connect,
            fail_send: None,
            fail_deadline: false,
        }
    }

    /// A connector whose every connect attempt is refused.
    pub fn refusing() -> Self {
        Self {
            outcome: OpenOutcome::Refuse,
            ..Self::new([])
        }
    }

    /// A connector whose crypto provider lacks the requested algorithms.
    pub fn unsupported() -> Self {
        Self {
            outcome: OpenOutcome::Unsupported,
            ..Self::new([])
        }
    }

    /// Channels fail every write with `kind`.
    pub fn failing_send(mut self, kind: io::ErrorKind) -> Self {
        self.fail_send = Some(kind);
        self
    }

    /// Channels reject every read deadline.
    pub fn failing_deadline(mut self) -> Self {
        self.fail_deadline = true;
        self
    }

    /// Returns the log shared by every channel this connector opens.
    pub fn log(&self) -> ChannelLog {
        self.log.clone()
    }
}

impl Connector for ScriptedConnector {
    type Channel = ScriptedChannel;

    fn open(
        &self,
        endpoint: &Endpoint,
        _policy: &TrustPolicy,
    ) -> Result<ScriptedChannel, ChannelError> {
        match self.outcome {
            OpenOutcome::Connect => {}
            OpenOutcome::Refuse => {
                return Err(ChannelError::Connect {
                    address: endpoint.to_string(),
                    source: io::Error::from(io::ErrorKind::ConnectionRefused),
                });
            }
            OpenOutcome::Unsupported => {
                return Err(ChannelError::UnsupportedAlgorithm {
                    protocol: transport::TransportProtocol::Tls13,
                    source: rustls::Error::General("no usable cipher suites configured".into()),
                });
            }
        }

        let script = self
            .script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .unwrap_or_default();
        let mut channel = ScriptedChannel::with_log(script, self.log.clone());
        channel.fail_send = self.fail_send;
        channel.fail_deadline = self.fail_deadline;
        Ok(channel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ready_bursts_report_their_length() {
        let mut channel = ScriptedChannel::new([Burst::ready([1, 2, 3]), Burst::delayed([4])]);
        assert_eq!(channel.bytes_available_now().expect("available"), 3);

        let mut buf = [0u8; 2];
        assert_eq!(channel.read(&mut buf).expect("read"), 2);
        assert_eq!(buf, [1, 2]);
        assert_eq!(channel.bytes_available_now().expect("available"), 1);

        let mut buf = [0u8; 4];
        assert_eq!(channel.read(&mut buf).expect("read"), 1);
        assert_eq!(channel.bytes_available_now().expect("available"), 0);
        assert_eq!(channel.read(&mut buf).expect("read"), 1);
        assert_eq!(buf[0], 4);
    }

    #[test]
    fn exhausted_script_stalls() {
        let mut channel = ScriptedChannel::new([]);
        let error = channel.read(&mut [0u8; 4]).expect_err("nothing scripted");
        assert_eq!(error.kind(), io::ErrorKind::WouldBlock);
    }

    #[test]
    fn close_is_counted_once() {
        let mut channel = ScriptedChannel::new([]);
        let log = channel.log();
        Channel::close(&mut channel);
        Channel::close(&mut channel);
        assert_eq!(log.closes(), 1);
        assert!(channel.bytes_available_now().is_err());
    }

    #[test]
    fn connector_hands_script_to_first_channel_only() {
        let connector = ScriptedConnector::new([Burst::ready(b"x")]);
        let endpoint = Endpoint::new("scripted", 1);
        let policy = TrustPolicy::accept_all_insecure();

        let first = connector.open(&endpoint, &policy).expect("open");
        let second = connector.open(&endpoint, &policy).expect("open");
        assert_eq!(first.remaining(), 1);
        assert_eq!(second.remaining(), 0);
        assert_eq!(connector.log().opens(), 2);
    }
}
