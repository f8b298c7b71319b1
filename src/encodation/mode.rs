use super::{ascii, base256, c40, context::EncoderContext, edifact, text, x12, EncodeError};

/// The six compaction modes of a Data Matrix symbol.
///
/// `Ascii` is the initial and terminal mode; every other mode is entered
/// through a latch codeword and left through its own unlatch rule.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum Mode {
    Ascii,
    C40,
    Text,
    X12,
    Edifact,
    Base256,
}

impl Mode {
    /// Fixed index, used by the look-ahead accumulators.
    pub(super) fn index(self) -> usize {
        match self {
            Self::Ascii => 0,
            Self::C40 => 1,
            Self::Text => 2,
            Self::X12 => 3,
            Self::Edifact => 4,
            Self::Base256 => 5,
        }
    }

    /// The codeword that switches an Ascii stream into this mode.
    pub(super) fn latch_from_ascii(self) -> u8 {
        match self {
            Self::Ascii => unreachable!("ascii is never latched into"),
            Self::C40 => ascii::LATCH_C40,
            Self::Text => ascii::LATCH_TEXT,
            Self::X12 => ascii::LATCH_X12,
            Self::Edifact => ascii::LATCH_EDIFACT,
            Self::Base256 => ascii::LATCH_BASE256,
        }
    }

    /// Run this mode's compactor until it requests a switch or runs out
    /// of characters.
    pub(super) fn encode(self, ctx: &mut EncoderContext) -> Result<(), EncodeError> {
        match self {
            Self::Ascii => ascii::encode(ctx),
            Self::C40 => c40::encode(ctx),
            Self::Text => text::encode(ctx),
            Self::X12 => x12::encode(ctx),
            Self::Edifact => edifact::encode(ctx),
            Self::Base256 => base256::encode(ctx),
        }
    }
}
