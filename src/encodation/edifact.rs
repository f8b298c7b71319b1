use arrayvec::ArrayVec;

use super::{context::EncoderContext, look_ahead::look_ahead, mode::Mode, EncodeError};

/// The unlatch value inside the 6-bit stream.
const UNLATCH_VALUE: u8 = 31;

fn encode_char(ch: u8, buf: &mut ArrayVec<u8, 4>) -> Result<(), EncodeError> {
    match ch {
        0x20..=0x3F => buf.push(ch),
        0x40..=0x5E => buf.push(ch - 64),
        _ => return Err(EncodeError::IllegalCharacter(ch as char)),
    }
    Ok(())
}

/// Pack 1 to 4 six-bit values into 24 bits and emit the occupied bytes:
/// one codeword per value, except that the fourth value rides along in
/// the third codeword.
fn encode_to_codewords(values: &[u8]) -> ArrayVec<u8, 3> {
    debug_assert!(!values.is_empty() && values.len() <= 4);
    let get = |i: usize| values.get(i).copied().unwrap_or(0) as u32;
    let v = (get(0) << 18) | (get(1) << 12) | (get(2) << 6) | get(3);

    let mut codewords = ArrayVec::new();
    codewords.push(((v >> 16) & 255) as u8);
    if values.len() >= 2 {
        codewords.push(((v >> 8) & 255) as u8);
    }
    if values.len() >= 3 {
        codewords.push((v & 255) as u8);
    }
    codewords
}

/// End of data, with the unlatch value already buffered.
///
/// A lone unlatch is dropped entirely when the symbol is nearly full; a
/// short tail at the end of the message prefers plain Ascii codewords
/// over a partial 6-bit group when the symbol leaves no room for one.
fn handle_eod(ctx: &mut EncoderContext, buffer: &ArrayVec<u8, 4>) -> Result<(), EncodeError> {
    let result = handle_eod_inner(ctx, buffer);
    // on error the driver must be back in Ascii before propagating
    ctx.set_new_mode(Mode::Ascii);
    result
}

fn handle_eod_inner(
    ctx: &mut EncoderContext,
    buffer: &ArrayVec<u8, 4>,
) -> Result<(), EncodeError> {
    let count = buffer.len();
    if count == 1 {
        // only the unlatch remains, maybe the symbol is full enough to
        // drop it
        let codeword_count = ctx.codeword_count();
        let capacity = ctx.update_symbol_info(codeword_count)?;
        let available = capacity - codeword_count;
        if ctx.remaining_characters() == 0 && available <= 2 {
            return Ok(());
        }
    }

    let rest_chars = count - 1;
    let encoded = encode_to_codewords(buffer);
    let end_of_symbol_reached = !ctx.has_more_characters();
    let mut rest_in_ascii = end_of_symbol_reached && rest_chars <= 2;

    if rest_chars <= 2 {
        let codeword_count = ctx.codeword_count();
        let capacity = ctx.update_symbol_info(codeword_count + rest_chars)?;
        if capacity - codeword_count >= 3 {
            rest_in_ascii = false;
            ctx.update_symbol_info(codeword_count + encoded.len())?;
        }
    }

    if rest_in_ascii {
        ctx.reset_symbol_info();
        ctx.rewind(rest_chars);
    } else {
        for codeword in &encoded {
            ctx.push(*codeword);
        }
    }
    Ok(())
}

pub(super) fn encode(ctx: &mut EncoderContext) -> Result<(), EncodeError> {
    let mut buffer = ArrayVec::<u8, 4>::new();
    while ctx.has_more_characters() {
        encode_char(ctx.current_char(), &mut buffer)?;
        ctx.advance(1);

        if buffer.len() == 4 {
            for codeword in &encode_to_codewords(&buffer) {
                ctx.push(*codeword);
            }
            buffer.clear();

            let new_mode = look_ahead(ctx.message(), ctx.pos(), Mode::Edifact);
            if new_mode != Mode::Edifact {
                // Edifact always re-enters through Ascii
                ctx.set_new_mode(Mode::Ascii);
                break;
            }
        }
    }
    buffer.push(UNLATCH_VALUE);
    handle_eod(ctx, &buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn packed(values: &[u8]) -> ArrayVec<u8, 3> {
        encode_to_codewords(values)
    }

    #[test]
    fn pack_four() {
        let cw = packed(&[0b10_01_00, 0b11_01_10, 0b01_10_10, 0b00_00_01]);
        assert_eq!(&cw[..], &[0b10_01_00_11, 0b01_10_01_10, 0b10_00_00_01]);
    }

    #[test]
    fn pack_three() {
        let cw = packed(&[0b10_01_00, 0b11_01_10, 0b01_10_10]);
        assert_eq!(&cw[..], &[0b10_01_00_11, 0b01_10_01_10, 0b10_00_00_00]);
    }

    #[test]
    fn pack_two() {
        let cw = packed(&[0b10_01_00, 0b11_01_10]);
        assert_eq!(&cw[..], &[0b10_01_00_11, 0b01_10_00_00]);
    }

    #[test]
    fn pack_one() {
        // a lone unlatch packs to 31 << 2
        let cw = packed(&[UNLATCH_VALUE]);
        assert_eq!(&cw[..], &[124]);
    }

    #[test]
    fn six_bit_values() {
        let mut buf = ArrayVec::new();
        encode_char(b' ', &mut buf).unwrap();
        encode_char(b'?', &mut buf).unwrap();
        encode_char(b'@', &mut buf).unwrap();
        encode_char(b'^', &mut buf).unwrap();
        assert_eq!(&buf[..], &[0x20, 0x3F, 0, 30]);
        let mut buf = ArrayVec::new();
        assert_eq!(
            encode_char(b'_', &mut buf),
            Err(EncodeError::IllegalCharacter('_'))
        );
    }
}
