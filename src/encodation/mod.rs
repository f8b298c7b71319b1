//! Conversion of a message into data codewords, ISO/IEC 16022 annex P.
//!
//! A driver loop hands an [EncoderContext](context::EncoderContext) to one
//! compaction mode at a time; the look-ahead arbiter decides when a mode
//! stops paying for itself. Every mode owns its end-of-data rules, the
//! driver only unlatches and pads.

use alloc::vec::Vec;
use core::fmt;

use crate::symbol_size::{Dimension, SymbolShape};

mod ascii;
mod base256;
mod c40;
mod context;
mod edifact;
mod look_ahead;
mod mode;
mod text;
mod x12;


use context::EncoderContext;
use mode::Mode;

pub(crate) const MACRO05: u8 = 236;
pub(crate) const MACRO06: u8 = 237;
pub(crate) const MACRO05_HEAD: &[u8] = b"[)>\x1E05\x1D";
pub(crate) const MACRO06_HEAD: &[u8] = b"[)>\x1E06\x1D";
pub(crate) const MACRO_TRAIL: &[u8] = b"\x1E\x04";

pub(crate) const UNLATCH: u8 = 254;

/// Error when encoding a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeError {
    /// The character can not be represented in ISO 8859-1, or the active
    /// compaction mode has no value for it.
    IllegalCharacter(char),
    /// A Base-256 run longer than the 1555 bytes its length field covers.
    MessageTooLong(usize),
    /// No symbol in the catalog satisfies the size and shape constraints.
    NoFittingSymbol(usize),
    /// A compaction tail state the upstream adjustment rules out.
    InternalInvariant,
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IllegalCharacter(ch) => write!(f, "illegal character {:?}", ch),
            Self::MessageTooLong(len) => {
                write!(f, "message too long, {} bytes in one base-256 run", len)
            }
            Self::NoFittingSymbol(needed) => {
                write!(f, "no symbol fits {} data codewords", needed)
            }
            Self::InternalInvariant => f.write_str("unexpected compaction tail state"),
        }
    }
}

impl core::error::Error for EncodeError {}

/// 253-state randomization for PAD codewords past the first.
fn randomize_253_state(ch: u8, pos: usize) -> u8 {
    let pseudo_random = ((149 * pos) % 253) + 1;
    let tmp = ch as usize + pseudo_random;
    if tmp <= 254 {
        tmp as u8
    } else {
        (tmp - 254) as u8
    }
}

fn is_macro(msg: &[u8], head: &[u8]) -> bool {
    msg.len() > head.len()
        && msg.len() > MACRO_TRAIL.len()
        && msg.starts_with(head)
        && msg.ends_with(MACRO_TRAIL)
}

/// Encode `msg` into data codewords; the result is exactly as long as the
/// selected symbol's data capacity.
pub(crate) fn encode_data(
    msg: &[u8],
    shape: SymbolShape,
    min_size: Option<Dimension>,
    max_size: Option<Dimension>,
) -> Result<Vec<u8>, EncodeError> {
    let mut ctx = EncoderContext::new(msg, shape, min_size, max_size);

    // a full 05/06 macro header and trailer collapse into one codeword
    if is_macro(msg, MACRO05_HEAD) {
        ctx.push(MACRO05);
        ctx.set_skip_at_end(MACRO_TRAIL.len());
        ctx.set_pos(MACRO05_HEAD.len());
    } else if is_macro(msg, MACRO06_HEAD) {
        ctx.push(MACRO06);
        ctx.set_skip_at_end(MACRO_TRAIL.len());
        ctx.set_pos(MACRO06_HEAD.len());
    }

    let mut mode = Mode::Ascii;
    while ctx.has_more_characters() {
        mode.encode(&mut ctx)?;
        if let Some(new_mode) = ctx.take_new_mode() {
            mode = new_mode;
        }
    }

    let len = ctx.codeword_count();
    let capacity = ctx.update_symbol_info(len)?;
    if len < capacity && mode != Mode::Ascii && mode != Mode::Base256 {
        ctx.push(UNLATCH);
    }
    if ctx.codeword_count() < capacity {
        ctx.push(ascii::PAD);
    }
    while ctx.codeword_count() < capacity {
        let pad = randomize_253_state(ascii::PAD, ctx.codeword_count() + 1);
        ctx.push(pad);
    }

    Ok(ctx.into_codewords())
}
