//! Signed-digit (Booth) window recoding.
//!
//! A scalar is split into consecutive windows of `c` bits and each window
//! is replaced by a signed digit `d` with `|d| <= 2^(c-1)`, so that the
//! accumulation pass needs only `2^(c-1)` buckets per window instead of
//! `2^c - 1` (the usual halving trick behind the BDLO12 bucket method).
//! Recoding is a single pass with a one-bit running carry: each window's
//! raw value is read out, the incoming carry added, and the result
//! re-centred into `[-2^(w-1), 2^(w-1)]` by subtracting `2^w` whenever it
//! lands past the half-way point, producing a carry into the next window
//! up. This is the same recentring a reference variable-base MSM's SD
//! ("signed digit") recoder performs per-window before propagating the
//! carry into the next-most-significant digit — except that recoder
//! walks windows from most to least significant and simply discards the
//! carry out of its very first (most significant) window, since there is
//! no still-more-significant digit in its fixed-length output vector to
//! add it to. That silently drops a unit whenever the top window happens
//! to round up past its half-way point, independent of whether the
//! scalar's bit width divides evenly by the window size `c`.
//!
//! [`recode_scalar`] walks the same carry chain least-to-most
//! significant and always checks the carry out of the last nominal
//! window; when it fires, it appends one further digit of value exactly
//! `1` positioned immediately above that window's own bits rather than
//! dropping it. This is the "reimplementers should verify this does not
//! silently drop a non-zero digit" case the design notes call out.

use crate::bigint::BigInteger;

/// Number of `c`-bit windows needed to cover `bits` bits.
pub fn window_count(bits: usize, c: usize) -> usize {
    debug_assert!(c >= 1);
    (bits + c - 1) / c
}

fn read_chunk(scalar: &impl BigInteger, offset: usize, width: usize) -> u64 {
    let mut v = 0u64;
    for j in 0..width {
        if scalar.get_bit(offset + j) {
            v |= 1 << j;
        }
    }
    v
}

/// Re-centres a `width`-bit unsigned value (already folded with any
/// incoming carry) into a signed digit, returning `(digit, carry_out)`.
fn recentre(raw: u64, width: usize) -> (i64, bool) {
    let half = 1u64 << (width - 1);
    if raw >= half {
        (raw as i64 - (1i64 << width), true)
    } else {
        (raw as i64, false)
    }
}

/// Window 0: no incoming carry, since there are no bits below position 0.
pub fn signed_bottom_window(scalar: &impl BigInteger, c: usize) -> (i64, bool) {
    recentre(read_chunk(scalar, 0, c), c)
}

/// A full-width interior window starting at bit `offset`, threading the
/// carry produced by the previous window.
pub fn signed_full_window(
    scalar: &impl BigInteger,
    offset: usize,
    c: usize,
    carry_in: bool,
) -> (i64, bool) {
    let raw = read_chunk(scalar, offset, c) + carry_in as u64;
    recentre(raw, c)
}

/// The last nominal window, of width `width` (`<= c`; equal to `c` when
/// the scalar's bit width happens to divide evenly). Callers must still
/// inspect the returned carry: a `true` means one further digit of value
/// `1`, positioned at bit `offset + width`, completes the recoding.
pub fn signed_top_window(
    scalar: &impl BigInteger,
    offset: usize,
    width: usize,
    carry_in: bool,
) -> (i64, bool) {
    debug_assert!(width >= 1 && width < 64);
    let raw = read_chunk(scalar, offset, width) + carry_in as u64;
    recentre(raw, width)
}

/// A single recoded window: `digit` is the signed digit, `bit_offset` is
/// the position it contributes at (`scalar += digit << bit_offset`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Digit {
    pub digit: i64,
    pub bit_offset: usize,
}

/// Recodes a `bits`-bit scalar into signed digits of window width `c`.
///
/// Yields `window_count(bits, c)` digits at offsets `0, c, 2c, ...`, plus
/// one further digit of value `1` when the top window carries out (see
/// module docs). The sum `Σ digit << bit_offset` always equals `scalar`.
pub fn recode_scalar(scalar: &impl BigInteger, bits: usize, c: usize) -> Vec<Digit> {
    debug_assert!(c >= 1 && c < 64);
    debug_assert!(bits >= 1);
    let num_windows = window_count(bits, c);
    let mut digits = Vec::with_capacity(num_windows + 1);

    let (d0, mut carry) = signed_bottom_window(scalar, c);
    digits.push(Digit { digit: d0, bit_offset: 0 });

    let mut last_offset = 0usize;
    let mut last_width = c;
    for w in 1..num_windows {
        let offset = w * c;
        let width = if w + 1 == num_windows { bits - offset } else { c };
        let (digit, carry_out) = if width == c {
            signed_full_window(scalar, offset, c, carry)
        } else {
            signed_top_window(scalar, offset, width, carry)
        };
        digits.push(Digit { digit, bit_offset: offset });
        carry = carry_out;
        last_offset = offset;
        last_width = width;
    }

    if carry {
        digits.push(Digit { digit: 1, bit_offset: last_offset + last_width });
    }
    digits
}
