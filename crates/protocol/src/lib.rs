#![deny(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(missing_docs)]

//! Response framing helpers for the burstlink client.
//!
//! The peer answers a request in a way that cannot be framed by a length
//! prefix: it may first send one or more four-byte liveness probes (`ashu`)
//! that must each be acknowledged with `OK`, and it then delivers the real
//! response as two OS-level bursts whose boundary the receiver cannot predict.
//! This crate holds the pieces that deal with those bytes:
//!
//! - [`hex`] converts between raw bytes and lowercase hex text without dropping
//!   leading zero nibbles.
//! - [`sentinel`] defines the probe and acknowledgement byte strings.
//! - [`reassembly`] implements [`ResponseReassembler`], the state machine that
//!   polls a [`BurstChannel`] and returns the merged response.
//!
//! # Invariants
//!
//! - `from_hex(&to_hex(bytes)) == bytes` for every byte slice.
//! - A reassembled response is the first accepted burst followed by the second
//!   burst, in that order, and never starts with an unacknowledged probe.
//!
//! # Examples
//!
//! ```
//! use protocol::{from_hex, to_hex};
//!
//! let encoded = to_hex(&[0x00, 0x0f, 0xa0]);
//! assert_eq!(encoded, "000fa0");
//! assert_eq!(from_hex(&encoded).expect("valid hex"), vec![0x00, 0x0f, 0xa0]);
//! ```

pub mod hex;
pub mod reassembly;
pub mod sentinel;

pub use hex::{HexError, from_hex, to_hex};
pub use reassembly::{
    Attempt, BurstChannel, ReassembledResponse, ReassemblyError, ReassemblyErrorKind,
    ReassemblyState, ReceivedChunk, ResponseReassembler, is_timeout,
};
pub use sentinel::{
    HANDSHAKE_ACK, HANDSHAKE_SENTINEL, HANDSHAKE_SENTINEL_HEX, MIN_PROBE_LEN, is_handshake_probe,
};
