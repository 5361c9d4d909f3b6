// File:    lib.rs
// Author:  apezoo
// Date:    2025-08-04
//
// Description: The main library crate for boardinfo-core, tying together record encoding and OTP image diffing.
//
// License:
// This project is licensed under the terms of the GNU AGPLv3 license.
// See the LICENSE.md file in the project root for full license information.

//! # Board-Info Core Library
//!
//! This library encodes board-identification fields (serial number, board
//! identifier, board string, MAC addresses) into the record format stored at
//! the end of OTP memory, and turns an encoded record into the sparse list of
//! words a programming tool has to write.
//!
//! ```
//! use boardinfo_core::{encode, report};
//!
//! let buffer = encode(Some(0x1234_5678), None, None, None)?;
//! assert_eq!(
//!     report::render(&report::decode_and_report(&buffer)?),
//!     "*,0x7FE,0x12345678\n*,0x7FF,0x0427FFFF\n"
//! );
//! # Ok::<(), boardinfo_core::BoardInfoError>(())
//! ```

/// Error type shared by every operation in this crate.
pub mod error;
/// Record header word layout.
pub mod header;
/// MAC address parsing and storage order.
pub mod mac;
/// The blank OTP pattern.
pub mod pattern;
/// Record encoding and parsing.
pub mod record;
/// Differing an encoded record against a blank OTP image.
pub mod report;

pub use error::BoardInfoError;
pub use header::{Header, MAX_MAC_ADDRESSES, MAX_WORDS};
pub use mac::MacAddress;
pub use pattern::{OTP_WORDS, WORD_BYTES, pattern};
pub use record::{Record, encode};
pub use report::{OtpImage, TouchedWord, decode_and_report};
