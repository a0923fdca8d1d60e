use std::fmt;

use crate::hex::to_hex;

/// Which payload read produced a chunk.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Attempt {
    /// The read that follows the request (and any handshake probes).
    First,
    /// The read that collects the remainder of the response.
    Second,
}

impl Attempt {
    /// Returns a lowercase label used in diagnostics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::First => "first",
            Self::Second => "second",
        }
    }
}

impl fmt::Display for Attempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bytes returned by one read during reassembly.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReceivedChunk {
    bytes: Vec<u8>,
    source_attempt: Attempt,
}

impl ReceivedChunk {
    /// Wraps bytes read during `source_attempt`.
    #[must_use]
    pub const fn new(bytes: Vec<u8>, source_attempt: Attempt) -> Self {
        Self {
            bytes,
            source_attempt,
        }
    }

    /// Returns the chunk contents.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns the number of bytes in the chunk.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Reports whether the read returned no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Returns the read that produced the chunk.
    #[must_use]
    pub const fn source_attempt(&self) -> Attempt {
        self.source_attempt
    }

    /// Consumes the chunk and returns its bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// The first accepted burst followed by the second burst.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ReassembledResponse {
    bytes: Vec<u8>,
    first_len: usize,
}

impl ReassembledResponse {
    /// Concatenates `first` and `second` in that order.
    #[must_use]
    pub fn from_chunks(first: ReceivedChunk, second: ReceivedChunk) -> Self {
        let first_len = first.len();
        let mut bytes = first.into_bytes();
        bytes.extend_from_slice(second.bytes());
        Self { bytes, first_len }
    }

    /// Returns the merged response.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns the portion delivered by the first burst.
    #[must_use]
    pub fn first_burst(&self) -> &[u8] {
        &self.bytes[..self.first_len]
    }

    /// Returns the portion delivered by the second burst.
    #[must_use]
    pub fn second_burst(&self) -> &[u8] {
        &self.bytes[self.first_len..]
    }

    /// Returns the total response length.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Reports whether the response holds no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Renders the response as lowercase hex.
    #[must_use]
    pub fn to_hex(&self) -> String {
        to_hex(&self.bytes)
    }

    /// Consumes the response and returns its bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

impl AsRef<[u8]> for ReassembledResponse {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl From<ReassembledResponse> for Vec<u8> {
    fn from(response: ReassembledResponse) -> Self {
        response.bytes
    }
}
