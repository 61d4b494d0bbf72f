//! Application identity hashing.
//!
//! The shell stores the destinations of an application in files named after a 64-bit CRC of
//! the application identity (an explicit app id such as `Microsoft.Windows.Explorer`, or a full
//! executable path with known folders replaced by their GUIDs). The identity is upper-cased,
//! encoded as UTF-16LE and hashed with the reflected ECMA-182 polynomial, starting from an
//! all-ones register and without a final inversion.
//!
//! The result has to be bit-exact with the files written by the shell, otherwise existing
//! destinations files are silently not found.
//!
//! # Examples
//!
//! ```rust
//! use jumpscope::AppIdHash;
//!
//! let hash = AppIdHash::compute("Microsoft.Windows.Explorer");
//! assert_eq!(hash.to_string(), "f01b4d95cf55d32a");
//! ```

use std::fmt;

use widestring::U16String;

/// Reflected form of the ECMA-182 polynomial `0x42F0E1EBA9EA3693`
const POLYNOMIAL: u64 = 0x92C6_4265_D321_39A4;

const TABLE: [u64; 256] = build_table();

const fn build_table() -> [u64; 256] {
    let mut table = [0u64; 256];
    let mut index = 0;
    while index < 256 {
        let mut crc = index as u64;
        let mut bit = 0;
        while bit < 8 {
            crc = if crc & 1 == 1 {
                (crc >> 1) ^ POLYNOMIAL
            } else {
                crc >> 1
            };
            bit += 1;
        }
        table[index] = crc;
        index += 1;
    }
    table
}

/// Hash of an application identity, as used in destinations file names.
///
/// The [`fmt::Display`] implementation produces the lowercase hexadecimal file name stem,
/// without zero padding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AppIdHash(u64);

impl AppIdHash {
    /// Computes the hash of an application identity.
    ///
    /// Case-insensitive: each character is upper-cased with a one-to-one mapping before the
    /// identity is encoded as UTF-16LE.
    ///
    /// # Arguments
    /// * `app_id` - Explicit app id or full executable path
    #[must_use]
    pub fn compute(app_id: &str) -> AppIdHash {
        let upper: String = app_id.chars().map(upper_char).collect();
        let units = U16String::from_str(&upper);

        let mut crc = u64::MAX;
        for unit in units.as_slice() {
            for byte in unit.to_le_bytes() {
                crc = TABLE[((crc ^ u64::from(byte)) & 0xFF) as usize] ^ (crc >> 8);
            }
        }

        AppIdHash(crc)
    }

    /// Returns the raw 64-bit value
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for AppIdHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:x}", self.0)
    }
}

/// Upper-cases a character only when the mapping is a single character, so the identity
/// keeps its length (`ß` stays `ß`).
fn upper_char(c: char) -> char {
    let mut upper = c.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(single), None) => single,
        _ => c,
    }
}
