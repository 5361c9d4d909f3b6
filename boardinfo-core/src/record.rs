// File:    record.rs
// Author:  apezoo
// Date:    2025-08-04
//
// Description: Encodes board-identification fields into an OTP record and parses records back.
//
// License:
// This project is licensed under the terms of the GNU AGPLv3 license.
// See the LICENSE.md file in the project root for full license information.

//! A record is a run of 32-bit little-endian words that ends with a [`Header`].
//! Fields are laid down back to front starting right before the header, in
//! a fixed order: MAC addresses, serial number, board identifier, board string.
//! Bytes no field covers keep the blank pattern.

use crate::error::BoardInfoError;
use crate::header::{Header, MAX_MAC_ADDRESSES, MAX_WORDS};
use crate::mac::{MAC_LEN, MacAddress};
use crate::pattern::{WORD_BYTES, blank_bytes, tail_pattern};
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use std::iter;

/// Bytes reserved for each MAC address (two words, the top two bytes stay blank).
const MAC_SLOT: usize = 2 * WORD_BYTES;

/// The board-identification fields held in one OTP record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Record {
    /// 32-bit serial number.
    pub serial_number: Option<u32>,
    /// 32-bit board identifier.
    pub board_id: Option<u32>,
    /// Free-form ASCII board description, stored NUL-terminated.
    pub board_string: Option<String>,
    /// MAC addresses, in the order they are laid down from the header.
    pub mac_addresses: Vec<MacAddress>,
}

/// One field ready to be written into the record.
enum Field<'a> {
    Mac(&'a MacAddress),
    SerialNumber(u32),
    BoardId(u32),
    BoardString(&'a str),
}

impl Field<'_> {
    /// Words this field accounts for in the record size.
    const fn words(&self) -> usize {
        match self {
            Self::Mac(_) => MAC_SLOT / WORD_BYTES,
            Self::SerialNumber(_) | Self::BoardId(_) => 1,
            Self::BoardString(text) => (text.len() + 1).div_ceil(WORD_BYTES),
        }
    }

    fn write(&self, cursor: &mut BackCursor<'_>) {
        match self {
            Self::Mac(mac) => cursor.place(MAC_SLOT, &mac.storage_bytes()),
            Self::SerialNumber(value) | Self::BoardId(value) => {
                cursor.place(WORD_BYTES, &value.to_le_bytes());
            }
            // the first character ends up nearest the header
            Self::BoardString(text) => {
                for byte in text.bytes().chain(iter::once(0)) {
                    cursor.place(1, &[byte]);
                }
            }
        }
    }
}

/// Write position that only ever moves toward the start of the buffer.
struct BackCursor<'a> {
    buffer: &'a mut [u8],
    pos: usize,
}

impl BackCursor<'_> {
    /// Steps back over a `slot`-byte slot and writes `bytes` at its low end.
    fn place(&mut self, slot: usize, bytes: &[u8]) {
        self.pos -= slot;
        self.buffer[self.pos..self.pos + bytes.len()].copy_from_slice(bytes);
    }
}

/// Read position mirroring [`BackCursor`], bounded by the record.
struct ReadCursor<'a> {
    buffer: &'a [u8],
    pos: usize,
}

impl<'a> ReadCursor<'a> {
    fn take(&mut self, slot: usize) -> Option<&'a [u8]> {
        self.pos = self.pos.checked_sub(slot)?;
        Some(&self.buffer[self.pos..self.pos + slot])
    }

    fn take_word(&mut self) -> Option<u32> {
        let bytes = self.take(WORD_BYTES)?;
        Some(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }
}

impl Record {
    /// Builds a record from raw field values, parsing the MAC addresses.
    ///
    /// # Errors
    ///
    /// Returns [`BoardInfoError::InvalidMacAddress`] for the first address that does not parse.
    pub fn from_fields(
        serial_number: Option<u32>,
        mac_addresses: Option<&[&str]>,
        board_id: Option<u32>,
        board_string: Option<&str>,
    ) -> Result<Self, BoardInfoError> {
        let mac_addresses = mac_addresses
            .unwrap_or_default()
            .iter()
            .map(|mac| mac.parse())
            .collect::<Result<Vec<MacAddress>, _>>()?;
        Ok(Self {
            serial_number,
            board_id,
            board_string: board_string.map(str::to_string),
            mac_addresses,
        })
    }

    fn fields(&self) -> Vec<Field<'_>> {
        let mut fields: Vec<Field<'_>> = self.mac_addresses.iter().map(Field::Mac).collect();
        fields.extend(self.serial_number.map(Field::SerialNumber));
        fields.extend(self.board_id.map(Field::BoardId));
        fields.extend(self.board_string.as_deref().map(Field::BoardString));
        fields
    }

    /// Checks the MAC address count and the board string encoding.
    ///
    /// # Errors
    ///
    /// Returns [`BoardInfoError::TooManyMacAddresses`] or [`BoardInfoError::InvalidEncoding`].
    pub fn validate(&self) -> Result<(), BoardInfoError> {
        let count = self.mac_addresses.len();
        if count > MAX_MAC_ADDRESSES {
            return Err(BoardInfoError::TooManyMacAddresses {
                count,
                max: MAX_MAC_ADDRESSES,
            });
        }
        if let Some((position, character)) = self
            .board_string
            .as_deref()
            .and_then(|text| text.chars().enumerate().find(|(_, c)| !c.is_ascii()))
        {
            return Err(BoardInfoError::InvalidEncoding {
                position,
                character,
            });
        }
        Ok(())
    }

    /// Number of words the encoded record occupies, header and padding included.
    ///
    /// # Errors
    ///
    /// Returns [`BoardInfoError::RecordTooLarge`] if the count does not fit the header.
    pub fn word_count(&self) -> Result<usize, BoardInfoError> {
        let mut words = 1 + self.fields().iter().map(Field::words).sum::<usize>();
        if words & 1 == 1 {
            words += 1;
        }
        if words > MAX_WORDS {
            return Err(BoardInfoError::RecordTooLarge {
                words,
                max: MAX_WORDS,
            });
        }
        Ok(words)
    }

    /// The header describing this record.
    ///
    /// # Errors
    ///
    /// Fails like [`Record::validate`] and [`Record::word_count`].
    #[allow(clippy::cast_possible_truncation)]
    pub fn header(&self) -> Result<Header, BoardInfoError> {
        self.validate()?;
        let words = self.word_count()?;
        Ok(Header {
            words: words as u8,
            mac_count: self.mac_addresses.len() as u8,
            has_serial: self.serial_number.is_some(),
            has_board_id: self.board_id.is_some(),
            has_board_string: self.board_string.is_some(),
        })
    }

    /// Encodes the record into `4 * word_count` bytes.
    ///
    /// # Errors
    ///
    /// Returns the first validation failure; nothing is encoded in that case.
    pub fn encode(&self) -> Result<Vec<u8>, BoardInfoError> {
        let header = self.header()?;
        let words = usize::from(header.words);
        let header_pos = (words - 1) * WORD_BYTES;

        let mut buffer = blank_bytes(words);
        let header_word = header.pack(tail_pattern(words - 1, words));
        buffer[header_pos..].copy_from_slice(&header_word.to_le_bytes());

        let mut cursor = BackCursor {
            buffer: &mut buffer,
            pos: header_pos,
        };
        for field in self.fields() {
            field.write(&mut cursor);
            trace!("field written, cursor at byte {}", cursor.pos);
        }

        debug!("encoded board-info record: {words} words, header 0x{header_word:08X}");
        Ok(buffer)
    }

    /// Parses a record from the end of `buffer`.
    ///
    /// The buffer may be exactly one encoded record or anything ending in one,
    /// such as a full OTP image.
    ///
    /// # Errors
    ///
    /// Returns [`BoardInfoError::BufferTooShort`] if the buffer cannot hold the
    /// record its header describes, [`BoardInfoError::InvalidHeader`] if the
    /// header is inconsistent, [`BoardInfoError::UnterminatedBoardString`] if
    /// the board string runs off the record, and
    /// [`BoardInfoError::InvalidEncoding`] for a non-ASCII board string.
    pub fn decode(buffer: &[u8]) -> Result<Self, BoardInfoError> {
        Self::decode_with_header(buffer).map(|(_, record)| record)
    }

    /// Like [`Record::decode`], but also returns the header as stored.
    ///
    /// The stored header can claim more words than the fields need, so it is
    /// not always equal to what [`Record::header`] rebuilds from the fields.
    ///
    /// # Errors
    ///
    /// Fails like [`Record::decode`].
    pub fn decode_with_header(buffer: &[u8]) -> Result<(Header, Self), BoardInfoError> {
        let have = buffer.len();
        let header_pos = have.checked_sub(WORD_BYTES).ok_or(BoardInfoError::BufferTooShort {
            need: WORD_BYTES,
            have,
        })?;
        let raw = &buffer[header_pos..];
        let word = u32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]);
        let header = Header::unpack(word)?;

        let words = usize::from(header.words);
        if words == 0 || words & 1 == 1 {
            return Err(BoardInfoError::InvalidHeader { word });
        }
        let need = words * WORD_BYTES;
        if need > have {
            return Err(BoardInfoError::BufferTooShort { need, have });
        }

        let record = &buffer[have - need..];
        let mut cursor = ReadCursor {
            buffer: record,
            pos: need - WORD_BYTES,
        };
        let invalid = BoardInfoError::InvalidHeader { word };

        let mut mac_addresses = Vec::with_capacity(usize::from(header.mac_count));
        for _ in 0..header.mac_count {
            let slot = cursor.take(MAC_SLOT).ok_or_else(|| invalid.clone())?;
            let mut bytes = [0u8; MAC_LEN];
            bytes.copy_from_slice(&slot[..MAC_LEN]);
            mac_addresses.push(MacAddress::from_storage_bytes(bytes));
        }

        let serial_number = if header.has_serial {
            Some(cursor.take_word().ok_or_else(|| invalid.clone())?)
        } else {
            None
        };
        let board_id = if header.has_board_id {
            Some(cursor.take_word().ok_or_else(|| invalid.clone())?)
        } else {
            None
        };

        let board_string = if header.has_board_string {
            let mut text = String::new();
            loop {
                let byte = cursor
                    .take(1)
                    .ok_or(BoardInfoError::UnterminatedBoardString)?[0];
                if byte == 0 {
                    break;
                }
                if !byte.is_ascii() {
                    return Err(BoardInfoError::InvalidEncoding {
                        position: text.len(),
                        character: char::from(byte),
                    });
                }
                text.push(char::from(byte));
            }
            Some(text)
        } else {
            None
        };

        debug!("decoded board-info record: {words} words, header 0x{word:08X}");
        let record = Self {
            serial_number,
            board_id,
            board_string,
            mac_addresses,
        };
        Ok((header, record))
    }
}

/// Encodes one record from raw field values.
///
/// `mac_addresses` are written as `12:34:56:78:9A:BC` (or with `-` separators).
///
/// # Errors
///
/// Returns [`BoardInfoError::InvalidMacAddress`], [`BoardInfoError::TooManyMacAddresses`],
/// [`BoardInfoError::InvalidEncoding`], or [`BoardInfoError::RecordTooLarge`].
pub fn encode(
    serial_number: Option<u32>,
    mac_addresses: Option<&[&str]>,
    board_id: Option<u32>,
    board_string: Option<&str>,
) -> Result<Vec<u8>, BoardInfoError> {
    Record::from_fields(serial_number, mac_addresses, board_id, board_string)?.encode()
}
