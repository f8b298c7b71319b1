use arrayvec::ArrayVec;

use super::{c40, context::EncoderContext, look_ahead::look_ahead, mode::Mode, EncodeError, UNLATCH};

/// CR, `*` and `>`: the ANSI X12 segment/element terminators.
pub(super) fn is_x12_term_sep(ch: u8) -> bool {
    matches!(ch, b'\r' | b'*' | b'>')
}

pub(super) fn is_native_x12(ch: u8) -> bool {
    is_x12_term_sep(ch) || matches!(ch, b' ' | b'0'..=b'9' | b'A'..=b'Z')
}

fn encode_char(ch: u8) -> Result<u8, EncodeError> {
    match ch {
        b'\r' => Ok(0),
        b'*' => Ok(1),
        b'>' => Ok(2),
        b' ' => Ok(3),
        b'0'..=b'9' => Ok(ch - b'0' + 4),
        b'A'..=b'Z' => Ok(ch - b'A' + 14),
        _ => Err(EncodeError::IllegalCharacter(ch as char)),
    }
}

/// Unflushed values are abandoned: the cursor steps back over them and the
/// characters re-enter in the next mode.
fn handle_eod(ctx: &mut EncoderContext, buffered: usize) -> Result<(), EncodeError> {
    let codeword_count = ctx.codeword_count();
    let capacity = ctx.update_symbol_info(codeword_count)?;
    let available = capacity - codeword_count;
    ctx.rewind(buffered);
    let remaining = ctx.remaining_characters();
    if remaining > 1 || available > 1 || remaining != available {
        ctx.push(UNLATCH);
    }
    if !ctx.new_mode_pending() {
        ctx.set_new_mode(Mode::Ascii);
    }
    Ok(())
}

pub(super) fn encode(ctx: &mut EncoderContext) -> Result<(), EncodeError> {
    let mut buffer = ArrayVec::<u8, 3>::new();
    while ctx.has_more_characters() {
        let ch = ctx.current_char();
        ctx.advance(1);
        buffer.push(encode_char(ch)?);
        if buffer.len() == 3 {
            c40::write_three_values(ctx, buffer[0], buffer[1], buffer[2]);
            buffer.clear();

            let new_mode = look_ahead(ctx.message(), ctx.pos(), Mode::X12);
            if new_mode != Mode::X12 {
                ctx.set_new_mode(new_mode);
                break;
            }
        }
    }
    handle_eod(ctx, buffer.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn value_table() {
        assert_eq!(encode_char(b'\r'), Ok(0));
        assert_eq!(encode_char(b'*'), Ok(1));
        assert_eq!(encode_char(b'>'), Ok(2));
        assert_eq!(encode_char(b' '), Ok(3));
        assert_eq!(encode_char(b'0'), Ok(4));
        assert_eq!(encode_char(b'9'), Ok(13));
        assert_eq!(encode_char(b'A'), Ok(14));
        assert_eq!(encode_char(b'Z'), Ok(39));
    }

    #[test]
    fn rejects_foreign_characters() {
        assert_eq!(
            encode_char(b'a'),
            Err(EncodeError::IllegalCharacter('a'))
        );
        assert_eq!(
            encode_char(0xE9),
            Err(EncodeError::IllegalCharacter('é'))
        );
    }
}
