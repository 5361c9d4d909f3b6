// File:    error.rs
// Author:  apezoo
// Date:    2025-08-04
//
// Description: Error type shared by the board-info encoder, parser, and image differ.
//
// License:
// This project is licensed under the terms of the GNU AGPLv3 license.
// See the LICENSE.md file in the project root for full license information.

use thiserror::Error;

/// Everything that can go wrong while encoding, parsing, or diffing a record.
///
/// Every variant is a deterministic function of the input, so none of them is
/// worth retrying.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardInfoError {
    /// A MAC address is not six hex octets separated by `:` or `-`.
    #[error("invalid MAC address '{input}' (expected the form 12:34:56:78:9A:BC)")]
    InvalidMacAddress {
        /// The rejected text.
        input: String,
    },

    /// More MAC addresses than the header's count field can describe.
    #[error("too many MAC addresses ({count} given, at most {max} allowed)")]
    TooManyMacAddresses {
        /// Number of addresses supplied.
        count: usize,
        /// Largest count the header can hold.
        max: usize,
    },

    /// The board string holds a character outside 7-bit ASCII.
    #[error("board string is not ASCII: {character:?} at position {position}")]
    InvalidEncoding {
        /// Character offset of the first offending character.
        position: usize,
        /// The offending character.
        character: char,
    },

    /// The record does not fit the header's word count field.
    #[error("record needs {words} words but at most {max} fit in the header")]
    RecordTooLarge {
        /// Words the record would need, including padding.
        words: usize,
        /// Largest word count the header can hold.
        max: usize,
    },

    /// The buffer is larger than the OTP image it should be placed in.
    #[error("buffer of {len} bytes does not fit in an OTP image of {capacity} bytes")]
    BufferTooLarge {
        /// Length of the supplied buffer in bytes.
        len: usize,
        /// Size of the OTP image in bytes.
        capacity: usize,
    },

    /// The buffer ends before the record it claims to hold.
    #[error("buffer too short (need {need} bytes, got {have})")]
    BufferTooShort {
        /// Bytes required.
        need: usize,
        /// Bytes available.
        have: usize,
    },

    /// The header word is not a valid record header.
    #[error("invalid record header 0x{word:08X}")]
    InvalidHeader {
        /// The raw header word.
        word: u32,
    },

    /// The board string has no NUL terminator inside the record.
    #[error("board string is not NUL-terminated within the record")]
    UnterminatedBoardString,
}
