use alloc::vec::Vec;

use super::{context::EncoderContext, look_ahead::look_ahead, mode::Mode, EncodeError, UNLATCH};

pub(super) const SHIFT1: u8 = 0;
pub(super) const SHIFT2: u8 = 1;
pub(super) const SHIFT3: u8 = 2;
// Upper shift lives in the shift 2 set.
pub(super) const UPPER_SHIFT_VALUE: u8 = 30;

/// A character's C40 values. Natives take one value, the shift sets two,
/// extended characters stack an upper shift on top. Returns the number of
/// values appended.
pub(super) fn encode_char(ch: u8, buf: &mut Vec<u8>) -> usize {
    match ch {
        b' ' => buf.push(3),
        b'0'..=b'9' => buf.push(ch - b'0' + 4),
        b'A'..=b'Z' => buf.push(ch - b'A' + 14),
        0x00..=0x1F => buf.extend_from_slice(&[SHIFT1, ch]),
        b'!'..=b'/' => buf.extend_from_slice(&[SHIFT2, ch - 33]),
        b':'..=b'@' => buf.extend_from_slice(&[SHIFT2, ch - 58 + 15]),
        b'['..=b'_' => buf.extend_from_slice(&[SHIFT2, ch - 91 + 22]),
        0x60..=0x7F => buf.extend_from_slice(&[SHIFT3, ch - 96]),
        0x80..=0xFF => {
            buf.extend_from_slice(&[SHIFT2, UPPER_SHIFT_VALUE]);
            return 2 + encode_char(ch - 128, buf);
        }
    }
    match ch {
        b' ' | b'0'..=b'9' | b'A'..=b'Z' => 1,
        _ => 2,
    }
}

/// Pack three C40/Text/X12 values into two codewords.
pub(super) fn write_three_values(ctx: &mut EncoderContext, c1: u8, c2: u8, c3: u8) {
    let v = 1600 * c1 as u16 + 40 * c2 as u16 + c3 as u16 + 1;
    ctx.push((v / 256) as u8);
    ctx.push((v % 256) as u8);
}

fn write_next_triple(ctx: &mut EncoderContext, buffer: &mut Vec<u8>) {
    write_three_values(ctx, buffer[0], buffer[1], buffer[2]);
    buffer.drain(..3);
}

/// Undo the last character: drop its values from the buffer, step the
/// cursor back and unlock the symbol size. Returns the value count the
/// character would have on re-encoding, the new `last_char_size`.
fn backtrack_one_character(
    ctx: &mut EncoderContext,
    buffer: &mut Vec<u8>,
    last_char_size: usize,
    encode_char: fn(u8, &mut Vec<u8>) -> usize,
) -> usize {
    buffer.truncate(buffer.len() - last_char_size);
    ctx.rewind(1);
    let mut removed = Vec::with_capacity(4);
    let size = encode_char(ctx.current_char(), &mut removed);
    ctx.reset_symbol_info();
    size
}

/// End-of-data rules shared by C40 and Text.
///
/// `rest` is the number of values that do not fill a triple. A rest of two
/// is completed with a shift 1; a rest of one only survives when exactly
/// one codeword of space is left (the value's character falls back to
/// Ascii); anything else was removed by the backtracking upstream.
fn handle_eod(ctx: &mut EncoderContext, buffer: &mut Vec<u8>) -> Result<(), EncodeError> {
    let unwritten = (buffer.len() / 3) * 2;
    let rest = buffer.len() % 3;
    let cur_codeword_count = ctx.codeword_count() + unwritten;
    let capacity = ctx.update_symbol_info(cur_codeword_count)?;
    let available = capacity - cur_codeword_count;

    if rest == 2 {
        buffer.push(SHIFT1);
        while buffer.len() >= 3 {
            write_next_triple(ctx, buffer);
        }
        if ctx.has_more_characters() {
            ctx.push(UNLATCH);
        }
    } else if available == 1 && rest == 1 {
        while buffer.len() >= 3 {
            write_next_triple(ctx, buffer);
        }
        if ctx.has_more_characters() {
            ctx.push(UNLATCH);
        }
        ctx.rewind(1);
    } else if rest == 0 {
        while buffer.len() >= 3 {
            write_next_triple(ctx, buffer);
        }
        if available > 0 || ctx.has_more_characters() {
            ctx.push(UNLATCH);
        }
    } else {
        return Err(EncodeError::InternalInvariant);
    }
    ctx.set_new_mode(Mode::Ascii);
    Ok(())
}

/// The loop shared by C40 and Text; only the value table differs.
///
/// `look_ahead_mode` is the mode the arbiter is asked to defend. Text
/// passes C40 here: an answer of C40 keeps the compactor running, any
/// other answer exits through the epilogue.
pub(super) fn encode_shared(
    ctx: &mut EncoderContext,
    encode_char: fn(u8, &mut Vec<u8>) -> usize,
    look_ahead_mode: Mode,
) -> Result<(), EncodeError> {
    let mut buffer = Vec::new();
    while ctx.has_more_characters() {
        let ch = ctx.current_char();
        ctx.advance(1);
        let mut last_char_size = encode_char(ch, &mut buffer);

        let unwritten = (buffer.len() / 3) * 2;
        let cur_codeword_count = ctx.codeword_count() + unwritten;
        let capacity = ctx.update_symbol_info(cur_codeword_count)?;
        let available = capacity - cur_codeword_count;

        if !ctx.has_more_characters() {
            // avoid a lone value in the last triple
            if buffer.len() % 3 == 2 && available != 2 {
                last_char_size = backtrack_one_character(ctx, &mut buffer, last_char_size, encode_char);
            }
            while buffer.len() % 3 == 1
                && ((last_char_size <= 3 && available != 1) || last_char_size > 3)
            {
                last_char_size = backtrack_one_character(ctx, &mut buffer, last_char_size, encode_char);
            }
            break;
        }

        if buffer.len() % 3 == 0 {
            let new_mode = look_ahead(ctx.message(), ctx.pos(), look_ahead_mode);
            if new_mode != look_ahead_mode {
                ctx.set_new_mode(new_mode);
                break;
            }
        }
    }
    handle_eod(ctx, &mut buffer)
}

pub(super) fn encode(ctx: &mut EncoderContext) -> Result<(), EncodeError> {
    encode_shared(ctx, encode_char, Mode::C40)
}
