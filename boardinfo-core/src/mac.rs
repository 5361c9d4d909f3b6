// File:    mac.rs
// Author:  apezoo
// Date:    2025-08-04
//
// Description: MAC address parsing and the byte order used when storing addresses in OTP.
//
// License:
// This project is licensed under the terms of the GNU AGPLv3 license.
// See the LICENSE.md file in the project root for full license information.

//! MAC addresses as they appear on the command line and in record files.

use crate::error::BoardInfoError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of octets in a MAC address.
pub const MAC_LEN: usize = 6;

/// A 48-bit MAC address, kept in the order it is written (`12:34:...` is `[0x12, 0x34, ...]`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MacAddress([u8; MAC_LEN]);

impl MacAddress {
    /// Creates an address from its octets in written order.
    #[must_use]
    pub const fn new(octets: [u8; MAC_LEN]) -> Self {
        Self(octets)
    }

    /// The octets in written order.
    #[must_use]
    pub const fn octets(&self) -> [u8; MAC_LEN] {
        self.0
    }

    /// The octets in the order they are stored in OTP (reversed, least significant first).
    #[must_use]
    pub fn storage_bytes(&self) -> [u8; MAC_LEN] {
        let mut bytes = self.0;
        bytes.reverse();
        bytes
    }

    /// Rebuilds an address from bytes read out of OTP.
    #[must_use]
    pub fn from_storage_bytes(mut bytes: [u8; MAC_LEN]) -> Self {
        bytes.reverse();
        Self(bytes)
    }
}

impl FromStr for MacAddress {
    type Err = BoardInfoError;

    /// Parses six hex octets separated by `:` or `-` (the separators may be mixed).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || BoardInfoError::InvalidMacAddress {
            input: s.to_string(),
        };

        let tokens: Vec<&str> = s.split([':', '-']).collect();
        if tokens.len() != MAC_LEN {
            return Err(invalid());
        }

        let mut octets = [0u8; MAC_LEN];
        for (octet, token) in octets.iter_mut().zip(&tokens) {
            // from_str_radix alone would also take a leading '+'
            if token.is_empty() || token.len() > 2 || !token.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(invalid());
            }
            *octet = u8::from_str_radix(token, 16).map_err(|_| invalid())?;
        }
        Ok(Self(octets))
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02X}:{b:02X}:{c:02X}:{d:02X}:{e:02X}:{g:02X}")
    }
}

impl TryFrom<String> for MacAddress {
    type Error = BoardInfoError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MacAddress> for String {
    fn from(mac: MacAddress) -> Self {
        mac.to_string()
    }
}
