//! Byte sources and binary parsing primitives.
//!
//! This module abstracts over where destinations data lives (a file snapshot read from disk
//! or a caller supplied buffer) and provides the cursor based [`Parser`] every decoder in this crate is
//! written against.
//!
//! # Key Components
//!
//! - [`Backend`] - Trait for bounds-checked access to a byte source
//! - [`Memory`] - Owned buffer backend, also used for files read from disk
//! - [`Parser`] - Cursor over a byte slice
//! - [`io`] - Little-endian primitive reads

pub mod io;
mod memory;
pub mod parser;

pub use memory::Memory;
pub use parser::Parser;

use crate::{Error, Result};

/// Read-only byte source of a destinations file or container stream
///
/// Implementations only expose their bytes; bounds checked access is provided on top of
/// [`Backend::data`]. All implementations must be thread-safe.
pub trait Backend: Send + Sync {
    /// Returns the entire data buffer.
    fn data(&self) -> &[u8];

    /// Returns `len` bytes starting at `offset`.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the range overflows or ends past the data.
    fn data_slice(&self, offset: usize, len: usize) -> Result<&[u8]> {
        offset
            .checked_add(len)
            .and_then(|end| self.data().get(offset..end))
            .ok_or(Error::OutOfBounds)
    }

    /// Returns the total length of the data buffer.
    fn len(&self) -> usize {
        self.data().len()
    }

    /// Returns `true` if the source holds no data.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
