use std::io;

use logging::{trace_io, trace_proto};

use super::channel::BurstChannel;
use super::chunk::{Attempt, ReassembledResponse, ReceivedChunk};
use super::error::{ReassemblyError, ReassemblyErrorKind};
use crate::hex::{from_hex, to_hex};
use crate::sentinel::{HANDSHAKE_ACK, MIN_PROBE_LEN, is_handshake_probe};

/// Position of a [`ResponseReassembler`] in the response protocol.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ReassemblyState {
    /// Waiting for the first burst, which may turn out to be a probe.
    AwaitFirst,
    /// A probe arrived; the acknowledgement is being written.
    HandshakeRetry,
    /// The first payload burst is stored; collecting the second.
    AwaitSecond,
    /// The response has been assembled.
    Done,
    /// Reassembly stopped with the recorded failure class.
    Failed(ReassemblyErrorKind),
}

impl ReassemblyState {
    /// Reports whether no further transitions will happen.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed(_))
    }
}

/// Drives one response out of a [`BurstChannel`].
///
/// The reassembler owns no transport; each call to [`run`](Self::run) borrows
/// the channel for the duration of one response and leaves the reassembler in
/// [`ReassemblyState::Done`] or [`ReassemblyState::Failed`].
#[derive(Clone, Debug)]
pub struct ResponseReassembler {
    state: ReassemblyState,
    handshake_probes: usize,
}

impl Default for ResponseReassembler {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseReassembler {
    /// Creates a reassembler waiting for the first burst.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: ReassemblyState::AwaitFirst,
            handshake_probes: 0,
        }
    }

    /// Returns the current state.
    #[must_use]
    pub const fn state(&self) -> ReassemblyState {
        self.state
    }

    /// Returns how many probes were acknowledged during the last run.
    #[must_use]
    pub const fn handshake_probes(&self) -> usize {
        self.handshake_probes
    }

    /// Reads one response from `channel`.
    ///
    /// Probes are acknowledged for as long as the peer keeps sending them; the
    /// channel's read deadline is the only bound. Calling `run` again restarts
    /// the machine from [`ReassemblyState::AwaitFirst`].
    pub fn run<C>(&mut self, channel: &mut C) -> Result<ReassembledResponse, ReassemblyError>
    where
        C: BurstChannel + ?Sized,
    {
        self.state = ReassemblyState::AwaitFirst;
        self.handshake_probes = 0;

        match self.drive(channel) {
            Ok(response) => {
                self.state = ReassemblyState::Done;
                trace_proto!(
                    "response reassembled: {} bytes ({} + {}) {}",
                    response.len(),
                    response.first_burst().len(),
                    response.second_burst().len(),
                    response.to_hex()
                );
                Ok(response)
            }
            Err(error) => {
                self.state = ReassemblyState::Failed(error.kind());
                trace_proto!("reassembly failed in {:?}: {error}", self.state);
                Err(error)
            }
        }
    }

    fn drive<C>(&mut self, channel: &mut C) -> Result<ReassembledResponse, ReassemblyError>
    where
        C: BurstChannel + ?Sized,
    {
        let first = loop {
            self.state = ReassemblyState::AwaitFirst;
            let chunk = read_first_burst(channel)?;
            let chunk_hex = to_hex(chunk.bytes());

            if !is_handshake_probe(&chunk_hex) {
                // Normalise through the hex form; a no-op for well-formed reads.
                let normalised = from_hex(&chunk_hex)?;
                trace_proto!("first burst accepted: {} bytes", normalised.len());
                break ReceivedChunk::new(normalised, Attempt::First);
            }

            self.state = ReassemblyState::HandshakeRetry;
            trace_proto!("handshake probe received, sending OK");
            channel
                .write_all_and_flush(&HANDSHAKE_ACK)
                .map_err(|source| ReassemblyError::Acknowledge { source })?;
            self.handshake_probes += 1;
        };

        self.state = ReassemblyState::AwaitSecond;
        let mut second = read_available(channel, Attempt::Second)?;
        if second.is_empty() {
            // The peer may still be transmitting the tail.
            second = read_available(channel, Attempt::Second)?;
        }
        trace_proto!("second burst: {} bytes", second.len());

        Ok(ReassembledResponse::from_chunks(first, second))
    }
}

fn read_first_burst<C>(channel: &mut C) -> Result<ReceivedChunk, ReassemblyError>
where
    C: BurstChannel + ?Sized,
{
    let available = channel
        .bytes_available_now()
        .map_err(|source| ReassemblyError::read(Attempt::First, source))?;
    trace_io!("available before first read: {available}");

    let wanted = if available == 0 {
        MIN_PROBE_LEN
    } else {
        available
    };
    let chunk = read_up_to(channel, wanted, Attempt::First)?;
    if chunk.is_empty() {
        return Err(ReassemblyError::PeerClosed);
    }
    Ok(chunk)
}

fn read_available<C>(channel: &mut C, attempt: Attempt) -> Result<ReceivedChunk, ReassemblyError>
where
    C: BurstChannel + ?Sized,
{
    let available = channel
        .bytes_available_now()
        .map_err(|source| ReassemblyError::read(attempt, source))?;
    trace_io!("available before {attempt} read: {available}");

    if available == 0 {
        return Ok(ReceivedChunk::new(Vec::new(), attempt));
    }
    read_up_to(channel, available, attempt)
}

/// Issues one read of up to `len` bytes and keeps only what arrived.
fn read_up_to<C>(
    channel: &mut C,
    len: usize,
    attempt: Attempt,
) -> Result<ReceivedChunk, ReassemblyError>
where
    C: BurstChannel + ?Sized,
{
    let mut buffer = vec![0u8; len];
    let read = loop {
        match channel.read(&mut buffer) {
            Ok(read) => break read,
            Err(error) if error.kind() == io::ErrorKind::Interrupted => {}
            Err(source) => return Err(ReassemblyError::read(attempt, source)),
        }
    };
    buffer.truncate(read);
    trace_io!("{attempt} read returned {read} of {len} bytes: {}", to_hex(&buffer));
    Ok(ReceivedChunk::new(buffer, attempt))
}
