use super::{context::EncoderContext, look_ahead::look_ahead, mode::Mode, EncodeError};

pub(super) const LATCH_C40: u8 = 230;
pub(super) const LATCH_BASE256: u8 = 231;
pub(super) const LATCH_X12: u8 = 238;
pub(super) const LATCH_TEXT: u8 = 239;
pub(super) const LATCH_EDIFACT: u8 = 240;

pub(super) const PAD: u8 = 129;
pub(super) const UPPER_SHIFT: u8 = 235;

/// Number of consecutive digits starting at `start`.
fn consecutive_digit_count(msg: &[u8], start: usize) -> usize {
    msg[start..]
        .iter()
        .take_while(|ch| ch.is_ascii_digit())
        .count()
}

/// One step of Ascii compaction: a digit pair, a latch, or one character.
pub(super) fn encode(ctx: &mut EncoderContext) -> Result<(), EncodeError> {
    if consecutive_digit_count(ctx.message(), ctx.pos()) >= 2 {
        let d1 = ctx.current_char() - b'0';
        ctx.advance(1);
        let d2 = ctx.current_char() - b'0';
        ctx.advance(1);
        ctx.push(d1 * 10 + d2 + 130);
        return Ok(());
    }
    let ch = ctx.current_char();
    let new_mode = look_ahead(ctx.message(), ctx.pos(), Mode::Ascii);
    if new_mode != Mode::Ascii {
        ctx.push(new_mode.latch_from_ascii());
        ctx.set_new_mode(new_mode);
    } else if ch >= 128 {
        ctx.push(UPPER_SHIFT);
        ctx.push(ch - 128 + 1);
        ctx.advance(1);
    } else {
        ctx.push(ch + 1);
        ctx.advance(1);
    }
    Ok(())
}
