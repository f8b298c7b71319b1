//! Data Matrix high-level encoding.
//!
//! This crate turns an octet message into the data codewords of a Data
//! Matrix symbol following annex P of ISO/IEC 16022. It covers the six
//! compaction modes (ASCII, C40, Text, X12, EDIFACT, Base 256), the
//! look-ahead mode arbitration, the 05/06 macro shortcut, automatic
//! symbol size selection and the randomized padding. Bit placement and
//! Reed-Solomon error correction are downstream concerns of a renderer.
//!
//! # Example
//!
//! ```
//! use dmtx_hle::{encode, SymbolShape};
//!
//! // three digit pairs compact to one codeword each
//! let codewords = encode("123456", SymbolShape::Square)?;
//! assert_eq!(codewords, vec![142, 164, 186]);
//! # Ok::<(), dmtx_hle::EncodeError>(())
//! ```
#![no_std]

extern crate alloc;
#[cfg(test)]
extern crate std;

use alloc::vec::Vec;

mod encodation;
mod symbol_size;

pub use encodation::EncodeError;
pub use symbol_size::{Dimension, SymbolInfo, SymbolShape};

/// Encode a string into Data Matrix data codewords.
///
/// The text is transcoded to ISO 8859-1 first; characters outside that
/// set fail with [EncodeError::IllegalCharacter]. The returned vector is
/// exactly as long as the data capacity of the smallest symbol of the
/// requested shape that fits the message.
pub fn encode(msg: &str, shape: SymbolShape) -> Result<Vec<u8>, EncodeError> {
    let bytes = latin1_bytes(msg)?;
    encodation::encode_data(&bytes, shape, None, None)
}

/// Encode raw ISO 8859-1 octets, optionally bounding the symbol size.
///
/// `min_size` and `max_size` constrain the overall symbol dimensions in
/// modules; a symbol qualifies when both its width and height lie within
/// the bounds.
pub fn encode_bytes(
    msg: &[u8],
    shape: SymbolShape,
    min_size: Option<Dimension>,
    max_size: Option<Dimension>,
) -> Result<Vec<u8>, EncodeError> {
    encodation::encode_data(msg, shape, min_size, max_size)
}

fn latin1_bytes(msg: &str) -> Result<Vec<u8>, EncodeError> {
    msg.chars()
        .map(|ch| {
            if (ch as u32) < 256 {
                Ok(ch as u8)
            } else {
                Err(EncodeError::IllegalCharacter(ch))
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use pretty_assertions::assert_eq;

    #[test]
    fn latin1_transcoding() {
        assert_eq!(latin1_bytes("Aé\u{ff}"), Ok(vec![0x41, 0xE9, 0xFF]));
        assert_eq!(
            latin1_bytes("A\u{100}"),
            Err(EncodeError::IllegalCharacter('\u{100}'))
        );
    }

    #[test]
    fn str_and_bytes_agree() {
        let a = encode("Hello World!", SymbolShape::None).unwrap();
        let b = encode_bytes(b"Hello World!", SymbolShape::None, None, None).unwrap();
        assert_eq!(a, b);
    }
}
