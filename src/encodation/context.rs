use alloc::vec::Vec;

use super::{mode::Mode, EncodeError};
use crate::symbol_size::{Dimension, SymbolInfo, SymbolShape};

/// Shared mutable state of one encoding run.
///
/// The driver owns the context and lends it to one compactor at a time.
/// The cursor only moves backwards through the explicit rewinds of the
/// C40/Text backtracking, the X12 epilogue and the EDIFACT ascii fallback.
pub(super) struct EncoderContext<'a> {
    msg: &'a [u8],
    pos: usize,
    codewords: Vec<u8>,
    new_mode: Option<Mode>,
    symbol: Option<&'static SymbolInfo>,
    shape: SymbolShape,
    min_size: Option<Dimension>,
    max_size: Option<Dimension>,
    skip_at_end: usize,
}

impl<'a> EncoderContext<'a> {
    pub fn new(
        msg: &'a [u8],
        shape: SymbolShape,
        min_size: Option<Dimension>,
        max_size: Option<Dimension>,
    ) -> Self {
        Self {
            msg,
            pos: 0,
            codewords: Vec::new(),
            new_mode: None,
            symbol: None,
            shape,
            min_size,
            max_size,
            skip_at_end: 0,
        }
    }

    /// The full message, trailer included. The look-ahead arbiter works
    /// on this slice.
    pub fn message(&self) -> &'a [u8] {
        self.msg
    }

    pub fn current_char(&self) -> u8 {
        self.msg[self.pos]
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn set_pos(&mut self, pos: usize) {
        self.pos = pos;
    }

    pub fn advance(&mut self, n: usize) {
        self.pos += n;
    }

    pub fn rewind(&mut self, n: usize) {
        self.pos -= n;
    }

    /// Number of characters the compactors may still consume. Trailer
    /// bytes hidden by `skip_at_end` do not count.
    fn total_char_count(&self) -> usize {
        self.msg.len() - self.skip_at_end
    }

    pub fn has_more_characters(&self) -> bool {
        self.pos < self.total_char_count()
    }

    pub fn remaining_characters(&self) -> usize {
        self.total_char_count() - self.pos
    }

    pub fn codeword_count(&self) -> usize {
        self.codewords.len()
    }

    pub fn push(&mut self, codeword: u8) {
        self.codewords.push(codeword);
    }

    pub fn set_new_mode(&mut self, mode: Mode) {
        self.new_mode = Some(mode);
    }

    pub fn new_mode_pending(&self) -> bool {
        self.new_mode.is_some()
    }

    pub fn take_new_mode(&mut self) -> Option<Mode> {
        self.new_mode.take()
    }

    pub fn set_skip_at_end(&mut self, n: usize) {
        self.skip_at_end = n;
    }

    /// Lock the smallest symbol that fits `len` codewords and return its
    /// data capacity.
    ///
    /// A symbol, once locked, is kept as long as `len` still fits into it;
    /// only [reset_symbol_info](Self::reset_symbol_info) shrinks it again.
    pub fn update_symbol_info(&mut self, len: usize) -> Result<usize, EncodeError> {
        match self.symbol {
            Some(symbol) if len <= symbol.data_capacity() => Ok(symbol.data_capacity()),
            _ => {
                let symbol =
                    SymbolInfo::lookup(len, self.shape, self.min_size, self.max_size)
                        .ok_or(EncodeError::NoFittingSymbol(len))?;
                self.symbol = Some(symbol);
                Ok(symbol.data_capacity())
            }
        }
    }

    pub fn reset_symbol_info(&mut self) {
        self.symbol = None;
    }

    pub fn into_codewords(self) -> Vec<u8> {
        self.codewords
    }
}
