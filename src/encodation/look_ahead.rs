//! Mode arbitration, steps J through R of ISO/IEC 16022 annex P.
//!
//! The arbiter is a pure function of `(message, start, current mode)`. It
//! keeps one fractional codeword-count estimate per mode and stops as soon
//! as the rules single out a winner, or at the end of the message.
//!
//! Every increment in annex P is a multiple of 1/12, so the counts are
//! exact integer twelfths. Floating point never enters the decision.

use super::mode::Mode;
use super::x12::{is_native_x12, is_x12_term_sep};

type C = u32;

const DENUM: C = 12;

const ASCII: usize = 0;
const C40: usize = 1;
const TEXT: usize = 2;
const X12: usize = 3;
const EDIFACT: usize = 4;
const BASE256: usize = 5;

const MODES: [Mode; 6] = [
    Mode::Ascii,
    Mode::C40,
    Mode::Text,
    Mode::X12,
    Mode::Edifact,
    Mode::Base256,
];

/// Fraction with fixed denominator 12.
#[derive(Copy, Clone, PartialEq, Eq)]
struct Frac(C);

impl Frac {
    #[inline]
    fn new(num: C, denum: C) -> Self {
        debug_assert!(denum > 0 && DENUM % denum == 0);
        Self(num * (DENUM / denum))
    }

    #[inline]
    fn add(&mut self, num: C, denum: C) {
        debug_assert!(denum > 0 && DENUM % denum == 0);
        self.0 += num * (DENUM / denum);
    }

    #[inline]
    fn double(&mut self) {
        self.0 *= 2;
    }

    /// Round up to a whole codeword count, in place.
    #[inline]
    fn ceil_assign(&mut self) {
        self.0 = self.ceil() * DENUM;
    }

    /// The fraction rounded up to a whole codeword count.
    #[inline]
    fn ceil(&self) -> C {
        self.0.div_ceil(DENUM)
    }
}

fn is_extended(ch: u8) -> bool {
    ch >= 128
}

fn is_native_c40(ch: u8) -> bool {
    matches!(ch, b' ' | b'0'..=b'9' | b'A'..=b'Z')
}

fn is_native_text(ch: u8) -> bool {
    matches!(ch, b' ' | b'0'..=b'9' | b'a'..=b'z')
}

fn is_native_edifact(ch: u8) -> bool {
    matches!(ch, 0x20..=0x5E)
}

// Reserved flag characters would cost 4 codewords in Base-256; none exist
// in plain data, so the estimate stays a flat 1 per octet.
fn is_special_b256(_ch: u8) -> bool {
    false
}

/// The six per-mode codeword-count estimates, initialized per step J.
struct Counts([Frac; 6]);

impl Counts {
    fn new(current_mode: Mode) -> Self {
        let mut counts = [
            Frac::new(1, 2),
            Frac::new(1, 1),
            Frac::new(1, 1),
            Frac::new(1, 1),
            Frac::new(1, 1),
            Frac::new(5, 4),
        ];
        if current_mode != Mode::Ascii {
            for count in counts.iter_mut() {
                count.double();
            }
        }
        counts[current_mode.index()] = Frac::new(0, 1);
        Self(counts)
    }

    /// Steps L through Q: charge one character to every mode's estimate.
    fn process(&mut self, ch: u8) {
        let counts = &mut self.0;

        if ch.is_ascii_digit() {
            counts[ASCII].add(1, 2);
        } else if is_extended(ch) {
            counts[ASCII].ceil_assign();
            counts[ASCII].add(2, 1);
        } else {
            counts[ASCII].ceil_assign();
            counts[ASCII].add(1, 1);
        }

        if is_native_c40(ch) {
            counts[C40].add(2, 3);
        } else if is_extended(ch) {
            counts[C40].add(8, 3);
        } else {
            counts[C40].add(4, 3);
        }

        if is_native_text(ch) {
            counts[TEXT].add(2, 3);
        } else if is_extended(ch) {
            counts[TEXT].add(8, 3);
        } else {
            counts[TEXT].add(4, 3);
        }

        if is_native_x12(ch) {
            counts[X12].add(2, 3);
        } else if is_extended(ch) {
            counts[X12].add(13, 3);
        } else {
            counts[X12].add(10, 3);
        }

        if is_native_edifact(ch) {
            counts[EDIFACT].add(3, 4);
        } else if is_extended(ch) {
            counts[EDIFACT].add(17, 4);
        } else {
            counts[EDIFACT].add(13, 4);
        }

        if is_special_b256(ch) {
            counts[BASE256].add(4, 1);
        } else {
            counts[BASE256].add(1, 1);
        }
    }

    /// All six estimates rounded up to whole codewords.
    fn ceiled(&self) -> [C; 6] {
        [
            self.0[ASCII].ceil(),
            self.0[C40].ceil(),
            self.0[TEXT].ceil(),
            self.0[X12].ceil(),
            self.0[EDIFACT].ceil(),
            self.0[BASE256].ceil(),
        ]
    }
}

/// Which modes attain the minimum, and how many do.
fn find_minimums(counts: &[C; 6]) -> ([bool; 6], usize) {
    let min = *counts.iter().min().unwrap();
    let mut mins = [false; 6];
    let mut min_count = 0;
    for (slot, count) in mins.iter_mut().zip(counts.iter()) {
        if *count == min {
            *slot = true;
            min_count += 1;
        }
    }
    (mins, min_count)
}

/// Decide which mode the encoder should continue in at `start`.
pub(super) fn look_ahead(msg: &[u8], start: usize, current_mode: Mode) -> Mode {
    if start >= msg.len() {
        return current_mode;
    }
    let mut counts = Counts::new(current_mode);
    let mut processed = 0;

    loop {
        // step K, message exhausted
        if start + processed == msg.len() {
            let ints = counts.ceiled();
            let (mins, min_count) = find_minimums(&ints);
            if mins[ASCII] {
                return Mode::Ascii;
            }
            for mode in [BASE256, EDIFACT, TEXT, X12] {
                if min_count == 1 && mins[mode] {
                    return MODES[mode];
                }
            }
            return Mode::C40;
        }

        let ch = msg[start + processed];
        processed += 1;
        counts.process(ch);

        // step R
        if processed >= 4 {
            let ints = counts.ceiled();
            let (mins, min_count) = find_minimums(&ints);

            if ints[ASCII] < ints[BASE256]
                && ints[ASCII] < ints[C40]
                && ints[ASCII] < ints[TEXT]
                && ints[ASCII] < ints[X12]
                && ints[ASCII] < ints[EDIFACT]
            {
                return Mode::Ascii;
            }
            if ints[BASE256] < ints[ASCII]
                || !(mins[C40] || mins[TEXT] || mins[X12] || mins[EDIFACT])
            {
                return Mode::Base256;
            }
            if min_count == 1 && mins[EDIFACT] {
                return Mode::Edifact;
            }
            if min_count == 1 && mins[TEXT] {
                return Mode::Text;
            }
            if min_count == 1 && mins[X12] {
                return Mode::X12;
            }
            if ints[C40] + 1 < ints[ASCII]
                && ints[C40] + 1 < ints[BASE256]
                && ints[C40] + 1 < ints[EDIFACT]
                && ints[C40] + 1 < ints[TEXT]
            {
                if ints[C40] < ints[X12] {
                    return Mode::C40;
                }
                if ints[C40] == ints[X12] {
                    // tie: X12 wins only if a terminator/separator shows
                    // up before any character X12 can not hold natively
                    let scan_from = (start + processed + 1).min(msg.len());
                    for &tc in &msg[scan_from..] {
                        if is_x12_term_sep(tc) {
                            return Mode::X12;
                        }
                        if !is_native_x12(tc) {
                            break;
                        }
                    }
                    return Mode::C40;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn frac_arithmetic() {
        assert_eq!(Frac::new(1, 2).0, 6);
        assert_eq!(Frac::new(5, 4).0, 15);
        let mut f = Frac::new(1, 2);
        f.add(3, 4);
        assert_eq!(f.0, 15);
        assert_eq!(f.ceil(), 2);
        f.ceil_assign();
        assert_eq!(f.0, 24);
        assert_eq!(Frac::new(0, 1).ceil(), 0);
        assert_eq!(Frac::new(2, 1).ceil(), 2);
    }

    #[test]
    fn empty_rest_keeps_mode() {
        assert_eq!(look_ahead(b"AB", 2, Mode::Edifact), Mode::Edifact);
        assert_eq!(look_ahead(b"", 0, Mode::Base256), Mode::Base256);
    }

    #[test]
    fn digits_stay_ascii() {
        assert_eq!(look_ahead(b"123456", 0, Mode::Ascii), Mode::Ascii);
    }

    #[test]
    fn upper_case_run_picks_c40() {
        assert_eq!(look_ahead(b"AIMAIMAIM", 0, Mode::Ascii), Mode::C40);
    }

    #[test]
    fn lower_case_run_picks_text() {
        assert_eq!(look_ahead(b"aimaimaim", 0, Mode::Ascii), Mode::Text);
    }

    #[test]
    fn x12_separators_win_over_c40() {
        assert_eq!(look_ahead(b"AB\r>ABC123>AB", 0, Mode::Ascii), Mode::X12);
    }

    #[test]
    fn binary_run_picks_base256() {
        assert_eq!(
            look_ahead(b"\xab\xe4\xf6\xfc\xe9\xbb", 0, Mode::Ascii),
            Mode::Base256
        );
    }

    #[test]
    fn edifact_charset_picks_edifact() {
        assert_eq!(
            look_ahead(b".A.C1.3.DATA.123", 0, Mode::Ascii),
            Mode::Edifact
        );
    }

    #[test]
    fn ascii_wins_over_started_edifact() {
        // the doubled starting counts of a non-ascii caller still lose
        // against plain ascii once an extended character shows up
        assert_eq!(
            look_ahead(b".\xFCXX.XXX.XXX.XXX", 0, Mode::Edifact),
            Mode::Ascii
        );
    }

    #[test]
    fn is_pure() {
        let msg = b"AB\r>ABC123>ABCD";
        let first = look_ahead(msg, 0, Mode::Ascii);
        for _ in 0..3 {
            assert_eq!(look_ahead(msg, 0, Mode::Ascii), first);
        }
    }
}
