//! Two-burst response reassembly.
//!
//! # Overview
//!
//! After a request is written the peer answers in up to three phases:
//!
//! 1. zero or more four-byte liveness probes (`ashu`), each of which must be
//!    acknowledged with `OK` before the peer proceeds;
//! 2. a first payload burst;
//! 3. a second payload burst, possibly empty.
//!
//! There is no length prefix. [`ResponseReassembler`] therefore polls
//! [`BurstChannel::bytes_available_now`] to size each read, and the merged
//! result only guarantees "whatever arrived in burst one, followed by whatever
//! arrived in burst two". A burst boundary may legitimately fall inside the
//! payload; payload validation is the caller's concern.
//!
//! # State machine
//!
//! ```text
//!              probe                 ack sent
//!  AwaitFirst -------> HandshakeRetry --------> AwaitFirst
//!      |
//!      | payload
//!      v
//!  AwaitSecond ------> Done
//!
//!  any I/O failure, timeout or malformed chunk ---> Failed(kind)
//! ```
//!
//! # Examples
//!
//! ```
//! use protocol::{BurstChannel, ResponseReassembler, ReassemblyState};
//! use std::collections::VecDeque;
//! use std::io;
//!
//! struct Bursts(VecDeque<Vec<u8>>, Vec<u8>);
//!
//! impl BurstChannel for Bursts {
//!     fn bytes_available_now(&mut self) -> io::Result<usize> {
//!         Ok(self.0.front().map_or(0, Vec::len))
//!     }
//!     fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
//!         let burst = self.0.pop_front().unwrap_or_default();
//!         buf[..burst.len()].copy_from_slice(&burst);
//!         Ok(burst.len())
//!     }
//!     fn write_all_and_flush(&mut self, bytes: &[u8]) -> io::Result<()> {
//!         self.1.extend_from_slice(bytes);
//!         Ok(())
//!     }
//! }
//!
//! let mut channel = Bursts(
//!     VecDeque::from([b"ashu".to_vec(), vec![0xde, 0xad], vec![0xbe, 0xef]]),
//!     Vec::new(),
//! );
//! let mut reassembler = ResponseReassembler::new();
//! let response = reassembler.run(&mut channel).expect("response reassembles");
//!
//! assert_eq!(response.as_bytes(), &[0xde, 0xad, 0xbe, 0xef]);
//! assert_eq!(channel.1, b"OK");
//! assert_eq!(reassembler.state(), ReassemblyState::Done);
//! ```

mod channel;
mod chunk;
mod error;
mod machine;

pub use channel::BurstChannel;
pub use chunk::{Attempt, ReassembledResponse, ReceivedChunk};
pub use error::{ReassemblyError, ReassemblyErrorKind, is_timeout};
pub use machine::{ReassemblyState, ResponseReassembler};

#[cfg(test)]
mod tests;
