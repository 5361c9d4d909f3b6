// File:    header.rs
// Author:  apezoo
// Date:    2025-08-04
//
// Description: Packing and unpacking of the record header word that closes every board-info record.
//
// License:
// This project is licensed under the terms of the GNU AGPLv3 license.
// See the LICENSE.md file in the project root for full license information.

//! The header is the last word of a record. Bit 31 is reserved and must be
//! clear, bits 30..19 describe the record, and bits 18..0 are not written at
//! all, so they keep whatever the blank pattern had at the header's position.

use crate::error::BoardInfoError;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy)]
struct BitField {
    shift: u32,
    size: u32,
}

impl BitField {
    const fn mask(self) -> u32 {
        ((1 << self.size) - 1) << self.shift
    }

    const fn max(self) -> u32 {
        (1 << self.size) - 1
    }

    const fn insert(self, word: u32, value: u32) -> u32 {
        word ^ (((value << self.shift) ^ word) & self.mask())
    }

    const fn extract(self, word: u32) -> u32 {
        (word & self.mask()) >> self.shift
    }
}

const RESERVED: BitField = BitField { shift: 31, size: 1 };
const WORDS: BitField = BitField { shift: 25, size: 5 };
const MAC_COUNT: BitField = BitField { shift: 22, size: 3 };
const HAS_SERIAL: BitField = BitField { shift: 21, size: 1 };
const HAS_BOARD_ID: BitField = BitField { shift: 20, size: 1 };
const HAS_BOARD_STRING: BitField = BitField { shift: 19, size: 1 };

/// Largest record size, in words, the header can describe.
pub const MAX_WORDS: usize = WORDS.max() as usize;

/// Largest number of MAC addresses the header can describe.
pub const MAX_MAC_ADDRESSES: usize = MAC_COUNT.max() as usize;

/// Decoded view of a record header word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    /// Total size of the record in words, header and padding included.
    pub words: u8,
    /// Number of MAC addresses in the record.
    pub mac_count: u8,
    /// Whether a serial number is present.
    pub has_serial: bool,
    /// Whether a board identifier is present.
    pub has_board_id: bool,
    /// Whether a board string is present.
    pub has_board_string: bool,
}

impl Header {
    /// Writes the header fields over `base`, the blank value of the header's position.
    ///
    /// Counts wider than their field are truncated to the field width; callers
    /// validate them beforehand.
    #[must_use]
    pub const fn pack(self, base: u32) -> u32 {
        let mut word = RESERVED.insert(base, 0);
        word = WORDS.insert(word, self.words as u32);
        word = MAC_COUNT.insert(word, self.mac_count as u32);
        word = HAS_SERIAL.insert(word, self.has_serial as u32);
        word = HAS_BOARD_ID.insert(word, self.has_board_id as u32);
        HAS_BOARD_STRING.insert(word, self.has_board_string as u32)
    }

    /// Reads the header fields out of a raw header word.
    ///
    /// # Errors
    ///
    /// Returns [`BoardInfoError::InvalidHeader`] if the reserved bit is set.
    #[allow(clippy::cast_possible_truncation)]
    pub fn unpack(word: u32) -> Result<Self, BoardInfoError> {
        if RESERVED.extract(word) != 0 {
            return Err(BoardInfoError::InvalidHeader { word });
        }
        Ok(Self {
            words: WORDS.extract(word) as u8,
            mac_count: MAC_COUNT.extract(word) as u8,
            has_serial: HAS_SERIAL.extract(word) == 1,
            has_board_id: HAS_BOARD_ID.extract(word) == 1,
            has_board_string: HAS_BOARD_STRING.extract(word) == 1,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_limits_follow_widths() {
        assert_eq!(MAX_WORDS, 31);
        assert_eq!(MAX_MAC_ADDRESSES, 7);
    }

    #[test]
    fn pack_keeps_low_bits_of_base() {
        let header = Header {
            words: 2,
            mac_count: 0,
            has_serial: true,
            has_board_id: false,
            has_board_string: false,
        };
        assert_eq!(header.pack(u32::MAX), 0x0427_FFFF);
        assert_eq!(header.pack(0), 0x0420_0000);
    }

    #[test]
    fn pack_clears_reserved_bit() {
        let header = Header {
            words: 0,
            mac_count: 0,
            has_serial: false,
            has_board_id: false,
            has_board_string: false,
        };
        assert_eq!(header.pack(u32::MAX), 0x0007_FFFF);
    }

    #[test]
    fn unpack_reverses_pack() {
        let header = Header {
            words: 30,
            mac_count: 7,
            has_serial: true,
            has_board_id: true,
            has_board_string: true,
        };
        assert_eq!(Header::unpack(header.pack(u32::MAX)), Ok(header));
    }

    #[test]
    fn unpack_rejects_reserved_bit() {
        assert_eq!(
            Header::unpack(0xFFFF_FFFF),
            Err(BoardInfoError::InvalidHeader { word: 0xFFFF_FFFF })
        );
    }
}
