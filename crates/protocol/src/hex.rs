//! Lowercase hexadecimal encoding that preserves the exact byte count.
//!
//! Every byte maps to exactly two characters, high nibble first, so a leading
//! `0x0a` renders as `"0a"` rather than `"a"`. Decoding accepts either case and
//! rejects odd-length input instead of guessing where the missing nibble went.

use thiserror::Error;

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// Errors produced by [`from_hex`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
pub enum HexError {
    /// The input had an odd number of characters.
    #[error("uneven number ({len}) of hex digits")]
    OddLength {
        /// Length of the rejected input in bytes.
        len: usize,
    },
    /// A character outside `[0-9a-fA-F]` was found.
    #[error("invalid hex digit {byte:#04x} at offset {index}")]
    InvalidDigit {
        /// Offset of the offending character.
        index: usize,
        /// The offending byte.
        byte: u8,
    },
}

/// Encodes `bytes` as lowercase hex, two characters per byte.
///
/// ```
/// assert_eq!(protocol::to_hex(b"ashu"), "61736875");
/// assert_eq!(protocol::to_hex(&[]), "");
/// ```
#[must_use]
pub fn to_hex(bytes: &[u8]) -> String {
    let mut encoded = String::with_capacity(bytes.len() * 2);
    for &byte in bytes {
        encoded.push(char::from(HEX_DIGITS[usize::from(byte >> 4)]));
        encoded.push(char::from(HEX_DIGITS[usize::from(byte & 0x0f)]));
    }
    encoded
}

/// Decodes a hex string produced by [`to_hex`] (or its upper-case variant).
///
/// ```
/// use protocol::{HexError, from_hex};
///
/// assert_eq!(from_hex("DEad").expect("valid hex"), vec![0xde, 0xad]);
/// assert_eq!(from_hex("abc"), Err(HexError::OddLength { len: 3 }));
/// ```
pub fn from_hex(text: &str) -> Result<Vec<u8>, HexError> {
    let raw = text.as_bytes();
    if raw.len() % 2 != 0 {
        return Err(HexError::OddLength { len: raw.len() });
    }

    raw.chunks_exact(2)
        .enumerate()
        .map(|(pair, digits)| {
            let index = pair * 2;
            let high = nibble(digits[0], index)?;
            let low = nibble(digits[1], index + 1)?;
            Ok((high << 4) | low)
        })
        .collect()
}

const fn nibble(byte: u8, index: usize) -> Result<u8, HexError> {
    match byte {
        b'0'..=b'9' => Ok(byte - b'0'),
        b'a'..=b'f' => Ok(byte - b'a' + 10),
        b'A'..=b'F' => Ok(byte - b'A' + 10),
        _ => Err(HexError::InvalidDigit { index, byte }),
    }
}
