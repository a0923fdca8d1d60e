use std::collections::VecDeque;
use std::io;

use super::*;
use crate::sentinel::MIN_PROBE_LEN;

/// What the fake peer does on the next read.
enum Step {
    Data { bytes: Vec<u8>, buffered: bool },
    /// Reports nothing on the first poll, then behaves as buffered data.
    Arriving(Vec<u8>),
    /// The availability poll itself fails.
    PollErr(io::ErrorKind),
    Err(io::ErrorKind),
    Eof,
}

fn ready(bytes: &[u8]) -> Step {
    Step::Data {
        bytes: bytes.to_vec(),
        buffered: true,
    }
}

fn in_flight(bytes: &[u8]) -> Step {
    Step::Data {
        bytes: bytes.to_vec(),
        buffered: false,
    }
}

#[derive(Default)]
struct FakePeer {
    steps: VecDeque<Step>,
    written: Vec<u8>,
    read_sizes: Vec<usize>,
    fail_writes: bool,
}

impl FakePeer {
    fn new(steps: impl IntoIterator<Item = Step>) -> Self {
        Self {
            steps: steps.into_iter().collect(),
            ..Self::default()
        }
    }
}

impl BurstChannel for FakePeer {
    fn bytes_available_now(&mut self) -> io::Result<usize> {
        match self.steps.front_mut() {
            Some(Step::Data {
                bytes,
                buffered: true,
            }) => Ok(bytes.len()),
            Some(step @ Step::Arriving(_)) => {
                if let Step::Arriving(bytes) = std::mem::replace(step, Step::Eof) {
                    *step = ready(&bytes);
                }
                Ok(0)
            }
            Some(Step::PollErr(kind)) => Err(io::Error::from(*kind)),
            _ => Ok(0),
        }
    }

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.read_sizes.push(buf.len());
        match self.steps.pop_front() {
            Some(Step::Data { bytes, .. }) => {
                let count = bytes.len().min(buf.len());
                buf[..count].copy_from_slice(&bytes[..count]);
                Ok(count)
            }
            Some(Step::Err(kind) | Step::PollErr(kind)) => Err(io::Error::from(kind)),
            Some(Step::Eof) => Ok(0),
            Some(Step::Arriving(_)) => Err(io::Error::from(io::ErrorKind::WouldBlock)),
            None => Err(io::Error::from(io::ErrorKind::WouldBlock)),
        }
    }

    fn write_all_and_flush(&mut self, bytes: &[u8]) -> io::Result<()> {
        if self.fail_writes {
            return Err(io::Error::from(io::ErrorKind::BrokenPipe));
        }
        self.written.extend_from_slice(bytes);
        Ok(())
    }
}

#[test]
fn new_reassembler_awaits_first_burst() {
    let reassembler = ResponseReassembler::default();
    assert_eq!(reassembler.state(), ReassemblyState::AwaitFirst);
    assert_eq!(reassembler.handshake_probes(), 0);
    assert!(!reassembler.state().is_terminal());
}

#[test]
fn single_burst_with_empty_second() {
    let mut peer = FakePeer::new([ready(&[0xab, 0xcd])]);
    let mut reassembler = ResponseReassembler::new();

    let response = reassembler.run(&mut peer).expect("response");

    assert_eq!(response.as_bytes(), [0xab, 0xcd]);
    assert_eq!(response.first_burst(), [0xab, 0xcd]);
    assert!(response.second_burst().is_empty());
    assert_eq!(reassembler.state(), ReassemblyState::Done);
    assert!(peer.written.is_empty());
    // Nothing was buffered for the second burst, so no read was issued.
    assert_eq!(peer.read_sizes, vec![2]);
}

#[test]
fn nothing_buffered_probes_four_bytes() {
    let mut peer = FakePeer::new([in_flight(&[1, 2, 3, 4, 5, 6])]);

    let response = ResponseReassembler::new().run(&mut peer).expect("response");

    assert_eq!(peer.read_sizes[0], MIN_PROBE_LEN);
    assert_eq!(response.as_bytes(), [1, 2, 3, 4]);
}

#[test]
fn short_first_read_is_not_padded() {
    let mut peer = FakePeer::new([in_flight(&[0x07])]);

    let response = ResponseReassembler::new().run(&mut peer).expect("response");

    assert_eq!(response.as_bytes(), [0x07]);
    assert_eq!(response.first_burst().len(), 1);
}

#[test]
fn each_probe_is_acknowledged() {
    let mut peer = FakePeer::new([
        ready(b"ashu"),
        ready(b"ashu"),
        ready(&[0x01]),
        ready(&[0x02, 0x03]),
    ]);
    let mut reassembler = ResponseReassembler::new();

    let response = reassembler.run(&mut peer).expect("response");

    assert_eq!(response.as_bytes(), [0x01, 0x02, 0x03]);
    assert_eq!(peer.written, b"OKOK");
    assert_eq!(reassembler.handshake_probes(), 2);
}

#[test]
fn probe_prefix_in_longer_burst_is_payload() {
    let mut peer = FakePeer::new([ready(b"ashuX")]);

    let response = ResponseReassembler::new().run(&mut peer).expect("response");

    assert_eq!(response.as_bytes(), b"ashuX");
    assert!(peer.written.is_empty());
}

#[test]
fn empty_second_read_is_retried_once() {
    let mut peer = FakePeer::new([ready(&[0xaa]), Step::Arriving(vec![0xbb])]);

    let response = ResponseReassembler::new().run(&mut peer).expect("response");

    assert_eq!(response.as_bytes(), [0xaa, 0xbb]);
    assert_eq!(response.second_burst(), [0xbb]);
}

#[test]
fn interrupted_read_is_retried() {
    let mut peer = FakePeer::new([
        Step::Err(io::ErrorKind::Interrupted),
        in_flight(&[0x10, 0x20]),
    ]);

    let response = ResponseReassembler::new().run(&mut peer).expect("response");

    assert_eq!(response.as_bytes(), [0x10, 0x20]);
}

#[test]
fn deadline_on_first_read_is_timeout() {
    let mut peer = FakePeer::new([Step::Err(io::ErrorKind::WouldBlock)]);
    let mut reassembler = ResponseReassembler::new();

    let error = reassembler.run(&mut peer).expect_err("deadline");

    assert_eq!(error.kind(), ReassemblyErrorKind::Timeout);
    assert_eq!(
        reassembler.state(),
        ReassemblyState::Failed(ReassemblyErrorKind::Timeout)
    );
}

#[test]
fn failed_second_poll_names_the_attempt() {
    let mut peer = FakePeer::new([ready(&[0x01]), Step::PollErr(io::ErrorKind::ConnectionReset)]);

    let error = ResponseReassembler::new()
        .run(&mut peer)
        .expect_err("poll fails");

    assert!(matches!(
        error,
        ReassemblyError::Read {
            attempt: Attempt::Second,
            ..
        }
    ));
    assert_eq!(error.kind(), ReassemblyErrorKind::Io);
}

#[test]
fn second_burst_still_in_flight_is_left_behind() {
    let mut peer = FakePeer::new([ready(&[0x01]), in_flight(&[0x02])]);

    let response = ResponseReassembler::new().run(&mut peer).expect("response");

    assert_eq!(response.as_bytes(), [0x01]);
    assert_eq!(peer.steps.len(), 1);
}

#[test]
fn reset_connection_is_io_failure() {
    let mut peer = FakePeer::new([Step::Err(io::ErrorKind::ConnectionReset)]);

    let error = ResponseReassembler::new()
        .run(&mut peer)
        .expect_err("reset");

    assert_eq!(error.kind(), ReassemblyErrorKind::Io);
}

#[test]
fn closed_stream_before_payload_is_protocol_failure() {
    let mut peer = FakePeer::new([Step::Eof]);
    let mut reassembler = ResponseReassembler::new();

    let error = reassembler.run(&mut peer).expect_err("peer closed");

    assert!(matches!(error, ReassemblyError::PeerClosed));
    assert_eq!(
        reassembler.state(),
        ReassemblyState::Failed(ReassemblyErrorKind::ProtocolFailure)
    );
}

#[test]
fn failed_acknowledgement_is_io_failure() {
    let mut peer = FakePeer::new([ready(b"ashu")]);
    peer.fail_writes = true;

    let error = ResponseReassembler::new()
        .run(&mut peer)
        .expect_err("write fails");

    assert!(matches!(error, ReassemblyError::Acknowledge { .. }));
    assert_eq!(error.kind(), ReassemblyErrorKind::Io);
}

#[test]
fn rerun_resets_probe_count() {
    let mut reassembler = ResponseReassembler::new();
    reassembler
        .run(&mut FakePeer::new([ready(b"ashu"), ready(&[1])]))
        .expect("first run");
    assert_eq!(reassembler.handshake_probes(), 1);

    reassembler
        .run(&mut FakePeer::new([ready(&[2])]))
        .expect("second run");
    assert_eq!(reassembler.handshake_probes(), 0);
}
