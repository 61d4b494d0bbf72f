//! Low-level byte stream parser for destinations decoding.
//!
//! This module provides the [`crate::file::parser::Parser`] type, a cursor-based binary data parser
//! used for every layout this crate understands: compound file headers and directories, shell
//! link structures, serialized property stores and the sequential custom destinations format.
//!
//! Every read is bounds checked and fails with [`crate::Error::OutOfBounds`] instead of
//! panicking, which is what lets the file level readers stop cleanly at the first damaged
//! object. A custom destinations file is decoded by threading a single parser through every
//! embedded object, so each decoder must leave the cursor exactly behind the bytes it owns.
//!
//! # Usage Examples
//!
//! ```rust
//! use jumpscope::Parser;
//!
//! let data = [0x02, 0x00, 0x00, 0x00, 0x48, 0x00, 0x69, 0x00];
//! let mut parser = Parser::new(&data);
//!
//! let count = parser.read_le::<u32>()?;
//! let text = parser.read_utf16(count as usize)?;
//! assert_eq!(text, "Hi");
//! assert!(!parser.has_more_data());
//! # Ok::<(), jumpscope::Error>(())
//! ```

use crate::{
    file::io::{read_le_at, ByteIO},
    Error::OutOfBounds,
    Result,
};

use widestring::U16Str;

/// Little-endian cursor over a borrowed buffer.
///
/// # Examples
///
/// ```rust
/// use jumpscope::Parser;
///
/// let data = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08];
/// let mut parser = Parser::new(&data);
///
/// let first = parser.read_le::<u32>()?;
/// assert_eq!(first, 0x04030201);
///
/// parser.seek(6)?;
/// let last_bytes = parser.read_le::<u16>()?;
/// assert_eq!(last_bytes, 0x0807);
/// # Ok::<(), jumpscope::Error>(())
/// ```
pub struct Parser<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> Parser<'a> {
    /// Create a new [`crate::file::parser::Parser`] from a byte slice.
    ///
    /// # Arguments
    /// * `data` - The byte slice to read from
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Parser { data, position: 0 }
    }

    /// Returns the length of the underlying data buffer.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the parser has no data.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns `true` if there is more data available to parse.
    #[must_use]
    pub fn has_more_data(&self) -> bool {
        self.position < self.data.len()
    }

    /// Move the current position to the specified index.
    ///
    /// Seeking to exactly the end of the data is allowed, it leaves nothing to read.
    ///
    /// # Arguments
    /// * `pos` - The position to move the cursor to
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if position is beyond the data length.
    pub fn seek(&mut self, pos: usize) -> Result<()> {
        if pos > self.data.len() {
            return Err(OutOfBounds);
        }

        self.position = pos;
        Ok(())
    }

    /// Move the position forward by the specified number of bytes.
    ///
    /// # Arguments
    /// * `step` - Amount of bytes to advance
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if advancing by step would exceed the data length.
    pub fn advance_by(&mut self, step: usize) -> Result<()> {
        self.position = self.calc_end_position(step)?;
        Ok(())
    }

    /// Get the current position of the parser within the data buffer.
    #[must_use]
    pub fn pos(&self) -> usize {
        self.position
    }

    /// Get access to the underlying data buffer.
    #[must_use]
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Returns the number of bytes remaining from the current position.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.position)
    }

    /// Align the position to a specific boundary.
    ///
    /// # Arguments
    /// * `alignment` - The boundary to align to (must be a power of 2)
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if aligning would exceed the data length.
    pub fn align(&mut self, alignment: usize) -> Result<()> {
        let padding = (alignment - (self.position % alignment)) % alignment;
        self.advance_by(padding)
    }

    /// Read a type `T` from the current position in little-endian format and advance the position.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if reading would exceed the data length.
    pub fn read_le<T: ByteIO>(&mut self) -> Result<T> {
        read_le_at::<T>(self.data, &mut self.position)
    }

    /// Calculates an end position safely with overflow checking.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the calculation would overflow
    /// or if the resulting position exceeds the data length.
    pub fn calc_end_position(&self, length: usize) -> Result<usize> {
        let end = self.position.checked_add(length).ok_or(OutOfBounds)?;

        if end > self.data.len() {
            return Err(OutOfBounds);
        }

        Ok(end)
    }

    /// Reads a slice of bytes of the specified length from the current position.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if reading `length` bytes would exceed the data.
    pub fn read_bytes(&mut self, length: usize) -> Result<&'a [u8]> {
        let end = self.calc_end_position(length)?;
        let bytes = &self.data[self.position..end];
        self.position = end;
        Ok(bytes)
    }

    /// Reads a 16-byte GUID in its mixed-endian in-memory layout.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if fewer than 16 bytes remain.
    pub fn read_guid(&mut self) -> Result<uguid::Guid> {
        let mut buffer = [0u8; 16];
        buffer.copy_from_slice(self.read_bytes(16)?);
        Ok(uguid::Guid::from_bytes(buffer))
    }

    /// Reads `count` UTF-16 code units and decodes them, replacing invalid sequences.
    ///
    /// A trailing null terminator within the counted units is dropped.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if fewer than `count * 2` bytes remain.
    pub fn read_utf16(&mut self, count: usize) -> Result<String> {
        let byte_len = count.checked_mul(2).ok_or(OutOfBounds)?;
        let bytes = self.read_bytes(byte_len)?;
        Ok(decode_utf16(bytes))
    }

    /// Reads a null-terminated UTF-16 string and advances past the terminator.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if no terminator is found before the end of data.
    pub fn read_utf16z(&mut self) -> Result<String> {
        let start = self.position;
        let mut end = start;
        loop {
            let unit: u16 = read_le_at(self.data, &mut end)?;
            if unit == 0 {
                break;
            }
        }

        let text = decode_utf16(&self.data[start..end - 2]);
        self.position = end;
        Ok(text)
    }

    /// Reads a null-terminated single byte string and advances past the terminator.
    ///
    /// Bytes are mapped one to one onto code points (Latin-1), which is exact for the ASCII
    /// paths found in shell structures and lossless for everything else.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if no terminator is found before the end of data.
    pub fn read_ansiz(&mut self) -> Result<String> {
        let start = self.position;
        let Some(length) = self.data[start..].iter().position(|b| *b == 0) else {
            return Err(OutOfBounds);
        };

        let text = decode_ansi(&self.data[start..start + length]);
        self.position = start + length + 1;
        Ok(text)
    }
}

/// Decodes little-endian UTF-16 bytes, stopping at the first null code unit.
pub(crate) fn decode_utf16(bytes: &[u8]) -> String {
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .take_while(|unit| *unit != 0)
        .collect();

    U16Str::from_slice(&units).to_string_lossy()
}

/// Decodes single byte (Latin-1) text, stopping at the first null byte.
pub(crate) fn decode_ansi(bytes: &[u8]) -> String {
    bytes
        .iter()
        .take_while(|b| **b != 0)
        .map(|b| char::from(*b))
        .collect()
}
