//! Response reassembly driven by scripted peers.

use std::io;

use proptest::prelude::*;
use protocol::{
    HANDSHAKE_ACK, ReassemblyErrorKind, ReassemblyState, ResponseReassembler, from_hex, to_hex,
};
use test_support::{Burst, ScriptedChannel};

#[test]
fn sentinel_then_two_payload_bursts() {
    let mut channel = ScriptedChannel::new([
        Burst::ready([0x61, 0x73, 0x68, 0x75]),
        Burst::ready([0xDE, 0xAD]),
        Burst::ready([0xBE, 0xEF]),
    ]);
    let log = channel.log();

    let response = ResponseReassembler::new()
        .run(&mut channel)
        .expect("response");

    assert_eq!(response.as_bytes(), [0xDE, 0xAD, 0xBE, 0xEF]);
    assert_eq!(response.to_hex(), "deadbeef");
    assert_eq!(log.writes(), vec![HANDSHAKE_ACK.to_vec()]);
}

#[test]
fn lone_burst_is_the_whole_response() {
    let mut channel = ScriptedChannel::new([Burst::ready([0xAB, 0xCD])]);

    let response = ResponseReassembler::new()
        .run(&mut channel)
        .expect("response");

    assert_eq!(response.as_bytes(), [0xAB, 0xCD]);
    assert!(channel.log().writes().is_empty());
}

#[test]
fn empty_buffer_triggers_four_byte_probe() {
    let mut channel = ScriptedChannel::new([Burst::delayed(b"ashu"), Burst::ready([0x01])]);
    let log = channel.log();

    let response = ResponseReassembler::new()
        .run(&mut channel)
        .expect("response");

    assert_eq!(log.read_requests()[0], 4);
    assert_eq!(response.as_bytes(), [0x01]);
    assert_eq!(log.writes(), vec![b"OK".to_vec()]);
}

#[test]
fn three_sentinels_get_three_acknowledgements() {
    let mut channel = ScriptedChannel::new([
        Burst::ready(b"ashu"),
        Burst::ready(b"ashu"),
        Burst::delayed(b"ashu"),
        Burst::ready([0x42]),
    ]);
    let log = channel.log();
    let mut reassembler = ResponseReassembler::new();

    let response = reassembler.run(&mut channel).expect("response");

    assert_eq!(log.writes(), vec![b"OK".to_vec(); 3]);
    assert_eq!(reassembler.handshake_probes(), 3);
    assert_eq!(response.as_bytes(), [0x42]);
}

#[test]
fn stalled_peer_fails_with_timeout() {
    let mut channel = ScriptedChannel::new([Burst::ready(b"ashu"), Burst::Stall]);
    let mut reassembler = ResponseReassembler::new();

    let error = reassembler.run(&mut channel).expect_err("stall");

    assert_eq!(error.kind(), ReassemblyErrorKind::Timeout);
    assert_eq!(
        reassembler.state(),
        ReassemblyState::Failed(ReassemblyErrorKind::Timeout)
    );
    assert_eq!(channel.log().writes().len(), 1);
}

#[test]
fn broken_stream_fails_with_io() {
    let mut channel = ScriptedChannel::new([Burst::Fail(io::ErrorKind::ConnectionAborted)]);

    let error = ResponseReassembler::new()
        .run(&mut channel)
        .expect_err("broken");

    assert_eq!(error.kind(), ReassemblyErrorKind::Io);
}

#[test]
fn eof_before_payload_fails_with_protocol_failure() {
    let mut channel = ScriptedChannel::new([Burst::ready(b"ashu"), Burst::Eof]);

    let error = ResponseReassembler::new()
        .run(&mut channel)
        .expect_err("peer closed");

    assert_eq!(error.kind(), ReassemblyErrorKind::ProtocolFailure);
}

#[test]
fn oversized_first_burst_keeps_leading_zero_bytes() {
    let payload = [0x00, 0x01, 0x00, 0x0F, 0xF0];
    let mut channel = ScriptedChannel::new([Burst::ready(payload)]);

    let response = ResponseReassembler::new()
        .run(&mut channel)
        .expect("response");

    assert_eq!(response.to_hex(), "0001000ff0");
    assert_eq!(from_hex(&response.to_hex()), Ok(payload.to_vec()));
}

proptest! {
    #[test]
    fn any_two_bursts_concatenate(
        first in proptest::collection::vec(any::<u8>(), 1..64),
        second in proptest::collection::vec(any::<u8>(), 0..64),
    ) {
        prop_assume!(to_hex(&first) != "61736875");
        let mut script = vec![Burst::Ready(first.clone())];
        if !second.is_empty() {
            script.push(Burst::Ready(second.clone()));
        }
        let mut channel = ScriptedChannel::new(script);

        let response = ResponseReassembler::new().run(&mut channel).expect("response");

        let mut expected = first;
        expected.extend_from_slice(&second);
        prop_assert_eq!(response.as_bytes(), expected.as_slice());
    }
}
