// File:    report.rs
// Author:  apezoo
// Date:    2025-08-04
//
// Description: Places an encoded record in a blank OTP image and reports the words that differ from blank.
//
// License:
// This project is licensed under the terms of the GNU AGPLv3 license.
// See the LICENSE.md file in the project root for full license information.

//! OTP cells can only be programmed in one direction, so a programming tool
//! must only write the words a record actually changes. This module produces
//! that sparse list, one `*,0xIII,0xVVVVVVVV` line per touched word.

use crate::error::BoardInfoError;
use crate::pattern::{OTP_WORDS, WORD_BYTES, blank_bytes, tail_pattern};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A word of the OTP image whose value differs from the blank pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TouchedWord {
    /// Word index within the OTP image.
    pub index: u32,
    /// Value to program at that index.
    pub value: u32,
}

impl fmt::Display for TouchedWord {
    /// The leading `*` is the segment column of the programming CSV; it is always a wildcard.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "*,0x{:03X},0x{:08X}", self.index, self.value)
    }
}

/// A full OTP image, stored as little-endian bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpImage {
    bytes: Vec<u8>,
}

impl OtpImage {
    /// A blank image of `words` words.
    #[must_use]
    pub fn blank(words: usize) -> Self {
        Self {
            bytes: blank_bytes(words),
        }
    }

    /// Size of the image in words.
    #[must_use]
    pub fn len_words(&self) -> usize {
        self.bytes.len() / WORD_BYTES
    }

    /// Copies `buffer` over the last `buffer.len()` bytes of the image.
    ///
    /// # Errors
    ///
    /// Returns [`BoardInfoError::BufferTooLarge`] if the buffer is larger than the image.
    pub fn overlay_tail(&mut self, buffer: &[u8]) -> Result<(), BoardInfoError> {
        let capacity = self.bytes.len();
        let start = capacity
            .checked_sub(buffer.len())
            .ok_or(BoardInfoError::BufferTooLarge {
                len: buffer.len(),
                capacity,
            })?;
        self.bytes[start..].copy_from_slice(buffer);
        Ok(())
    }

    /// The word at `index`, if it lies inside the image.
    #[must_use]
    pub fn word(&self, index: usize) -> Option<u32> {
        let start = index.checked_mul(WORD_BYTES)?;
        let bytes = self.bytes.get(start..start + WORD_BYTES)?;
        Some(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Every word that differs from the blank pattern, in ascending index order.
    #[must_use]
    pub fn touched(&self) -> Vec<TouchedWord> {
        let words = self.len_words();
        (0u32..)
            .zip(self.bytes.chunks_exact(WORD_BYTES).enumerate())
            .filter_map(|(index, (position, bytes))| {
                let value = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
                (value != tail_pattern(position, words)).then_some(TouchedWord { index, value })
            })
            .collect()
    }
}

/// Places `buffer` at the tail of a blank image of `capacity_words` words and
/// returns the words it changed.
///
/// # Errors
///
/// Returns [`BoardInfoError::BufferTooLarge`] if the buffer does not fit.
pub fn diff(buffer: &[u8], capacity_words: usize) -> Result<Vec<TouchedWord>, BoardInfoError> {
    let mut image = OtpImage::blank(capacity_words);
    image.overlay_tail(buffer)?;
    let touched = image.touched();
    debug!(
        "{} of {} OTP words touched by a {}-byte buffer",
        touched.len(),
        image.len_words(),
        buffer.len()
    );
    Ok(touched)
}

/// [`diff`] against the full OTP image of the target device family.
///
/// # Errors
///
/// Returns [`BoardInfoError::BufferTooLarge`] if the buffer exceeds the OTP size.
pub fn decode_and_report(buffer: &[u8]) -> Result<Vec<TouchedWord>, BoardInfoError> {
    diff(buffer, OTP_WORDS)
}

/// Formats a report as newline-terminated CSV lines.
#[must_use]
pub fn render(report: &[TouchedWord]) -> String {
    report.iter().map(|word| format!("{word}\n")).collect()
}
