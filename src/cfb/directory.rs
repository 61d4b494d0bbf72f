//! Compound file directory entries.

use strum::FromRepr;

use crate::{
    file::{parser::decode_utf16, Parser},
    Result,
};

/// Size of a single directory entry
pub const ENTRY_SIZE: usize = 128;
/// Sibling / child id meaning "no entry"
pub const NOSTREAM: u32 = 0xFFFF_FFFF;

/// Kind of object a directory entry describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRepr)]
#[repr(u8)]
pub enum ObjectType {
    /// Unallocated entry
    Unknown = 0,
    /// Storage (a folder of streams)
    Storage = 1,
    /// Stream (a named byte sequence)
    Stream = 2,
    /// The root storage, always the first entry
    Root = 5,
}

/// One entry of the compound file directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    /// Entry name
    pub name: String,
    /// Object kind
    pub object_type: ObjectType,
    /// Left sibling in the red-black tree of the parent storage
    pub left: u32,
    /// Right sibling in the red-black tree of the parent storage
    pub right: u32,
    /// Root of the child tree (storages only)
    pub child: u32,
    /// First sector of the content (mini sector for small streams)
    pub start_sector: u32,
    /// Content size in bytes
    pub size: u64,
}

impl DirectoryEntry {
    /// Parses a 128-byte directory entry.
    ///
    /// Version 3 files only define the low 32 bits of the stream size; the high half may
    /// contain garbage and is dropped.
    ///
    /// # Arguments
    /// * `data` - The entry bytes
    /// * `major_version` - Major version from the file header
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if fewer than 128 bytes are provided or
    /// [`crate::Error::Malformed`] for an invalid name length.
    pub fn parse(data: &[u8], major_version: u16) -> Result<DirectoryEntry> {
        let mut parser = Parser::new(data);
        let name_bytes = parser.read_bytes(64)?;
        let name_len = parser.read_le::<u16>()? as usize;
        if name_len > 64 || name_len % 2 != 0 {
            return Err(malformed_error!(
                "Invalid directory entry name length - {}",
                name_len
            ));
        }

        let object_type =
            ObjectType::from_repr(parser.read_le::<u8>()?).unwrap_or(ObjectType::Unknown);
        let _color = parser.read_le::<u8>()?;
        let left = parser.read_le::<u32>()?;
        let right = parser.read_le::<u32>()?;
        let child = parser.read_le::<u32>()?;
        // CLSID, state bits, creation and modification time
        parser.advance_by(16 + 4 + 8 + 8)?;
        let start_sector = parser.read_le::<u32>()?;
        let mut size = parser.read_le::<u64>()?;
        if major_version == 3 {
            size &= 0xFFFF_FFFF;
        }

        Ok(DirectoryEntry {
            name: decode_utf16(&name_bytes[..name_len]),
            object_type,
            left,
            right,
            child,
            start_sector,
            size,
        })
    }
}
