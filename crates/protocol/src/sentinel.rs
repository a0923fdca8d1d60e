//! Wire constants for the liveness handshake.

/// Raw bytes of the liveness probe the peer may send before any payload.
pub const HANDSHAKE_SENTINEL: [u8; 4] = *b"ashu";

/// Hex form of [`HANDSHAKE_SENTINEL`], compared case-insensitively.
pub const HANDSHAKE_SENTINEL_HEX: &str = "61736875";

/// Acknowledgement written back for every probe.
pub const HANDSHAKE_ACK: [u8; 2] = *b"OK";

/// Bytes requested on the first read when nothing is buffered yet.
///
/// The peer may not have flushed its send buffer when the first poll happens;
/// probing for a sentinel-sized read keeps the call blocking instead of
/// returning an empty chunk.
pub const MIN_PROBE_LEN: usize = HANDSHAKE_SENTINEL.len();

/// Reports whether `chunk` is exactly one liveness probe.
///
/// The comparison goes through the hex form so that it matches the peer's
/// own check byte for byte.
#[must_use]
pub fn is_handshake_probe(chunk_hex: &str) -> bool {
    chunk_hex.eq_ignore_ascii_case(HANDSHAKE_SENTINEL_HEX)
}
