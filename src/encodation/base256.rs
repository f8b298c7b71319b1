use alloc::vec;
use alloc::vec::Vec;

use super::{context::EncoderContext, look_ahead::look_ahead, mode::Mode, EncodeError};

/// 255-state randomization, applied to the length field and every data
/// byte of a Base-256 run. `pos` is 1-based over the full codeword vector.
fn randomize_255_state(ch: u8, pos: usize) -> u8 {
    let pseudo_random = ((149 * pos) % 255) + 1;
    let tmp = ch as usize + pseudo_random;
    if tmp <= 255 {
        tmp as u8
    } else {
        (tmp - 256) as u8
    }
}

pub(super) fn encode(ctx: &mut EncoderContext) -> Result<(), EncodeError> {
    // index 0 is the length field, filled in below
    let mut buffer: Vec<u8> = vec![0];
    while ctx.has_more_characters() {
        buffer.push(ctx.current_char());
        ctx.advance(1);

        let new_mode = look_ahead(ctx.message(), ctx.pos(), Mode::Base256);
        if new_mode != Mode::Base256 {
            ctx.set_new_mode(new_mode);
            break;
        }
    }

    let data_count = buffer.len() - 1;
    let current_size = ctx.codeword_count() + data_count + 1;
    let capacity = ctx.update_symbol_info(current_size)?;
    let must_pad = capacity - current_size > 0;

    // a run that fills the symbol exactly needs no length field; the
    // reader infers the count from the symbol end
    if ctx.has_more_characters() || must_pad {
        if data_count <= 249 {
            buffer[0] = data_count as u8;
        } else if data_count <= 1555 {
            buffer[0] = (data_count / 250 + 249) as u8;
            buffer.insert(1, (data_count % 250) as u8);
        } else {
            return Err(EncodeError::MessageTooLong(data_count));
        }
    }

    for ch in buffer {
        let pos = ctx.codeword_count() + 1;
        ctx.push(randomize_255_state(ch, pos));
    }
    Ok(())
}
