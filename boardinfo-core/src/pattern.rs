// File:    pattern.rs
// Author:  apezoo
// Date:    2025-08-04
//
// Description: The blank-OTP baseline pattern shared by the record encoder and the image differ.
//
// License:
// This project is licensed under the terms of the GNU AGPLv3 license.
// See the LICENSE.md file in the project root for full license information.

//! Erased OTP memory does not read back as a uniform value: words alternate
//! between all zeros and all ones, and the last word of OTP is all ones. Both
//! the encoder (to initialise unused bytes) and the differ (to decide which
//! cells were touched) go through [`tail_pattern`].

/// Number of bytes in one OTP word.
pub const WORD_BYTES: usize = 4;

/// Number of words in the full OTP image of the target device family.
pub const OTP_WORDS: usize = 0x800;

/// Returns the blank value of the OTP word at `index`.
///
/// Odd positions are all ones and even positions are all zeros. This holds for
/// any region with an even number of words that ends at the last word of OTP,
/// such as an encoded record or the default image.
#[must_use]
pub const fn pattern(index: usize) -> u32 {
    if index & 1 == 1 { u32::MAX } else { 0 }
}

/// Returns the blank value of word `index` in a region of `words` words that
/// ends at the last word of OTP.
///
/// The pattern is anchored at the end, so for an odd-sized region the parity
/// of every index flips relative to [`pattern`].
#[must_use]
pub const fn tail_pattern(index: usize, words: usize) -> u32 {
    pattern(index + (words & 1))
}

/// Builds `words` little-endian words of baseline pattern, anchored at the end.
#[must_use]
pub fn blank_bytes(words: usize) -> Vec<u8> {
    (0..words)
        .flat_map(|i| tail_pattern(i, words).to_le_bytes())
        .collect()
}
