//! Link target item id list.
//!
//! The id list is the shell's own serialized path to the target. It is kept raw (the shell
//! resolver can bind to it directly) and can be walked for a file system path when the link has
//! no link info: a volume item (`C:\`) followed by one file entry item per path component.

use crate::{
    file::{
        parser::{decode_ansi, decode_utf16},
        Parser,
    },
    Result,
};

/// Extension block carrying the long (Unicode) name of a file entry item
const FILE_ENTRY_EXTENSION: u32 = 0xBEEF_0004;

/// Class type nibble of a volume item
const CLASS_VOLUME: u8 = 0x20;
/// Class type nibble of a file entry item
const CLASS_FILE_ENTRY: u8 = 0x30;

/// A serialized item id list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdList {
    /// The complete list including the terminal null item, as stored in the link
    pub raw: Vec<u8>,
    /// Item payloads without their size prefix
    pub items: Vec<Vec<u8>>,
}

impl IdList {
    /// Reads a size-prefixed id list at the current parser position.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if an item overruns the list and
    /// [`crate::Error::OutOfBounds`] for truncated data.
    pub fn read(parser: &mut Parser) -> Result<IdList> {
        let size = parser.read_le::<u16>()? as usize;
        let raw = parser.read_bytes(size)?;

        let mut items = Vec::new();
        let mut list = Parser::new(raw);
        while list.remaining() >= 2 {
            let item_size = list.read_le::<u16>()? as usize;
            if item_size == 0 {
                break;
            }
            if item_size < 2 || item_size - 2 > list.remaining() {
                return Err(malformed_error!("Invalid id list item size - {}", item_size));
            }

            items.push(list.read_bytes(item_size - 2)?.to_vec());
        }

        Ok(IdList {
            raw: raw.to_vec(),
            items,
        })
    }

    /// Reconstructs a file system path from a volume item and the file entry items below it.
    ///
    /// Returns `None` when the list does not describe a local file system location.
    #[must_use]
    pub fn path(&self) -> Option<String> {
        let mut path: Option<String> = None;

        for item in &self.items {
            let Some(class_type) = item.first() else {
                continue;
            };

            match class_type & 0x70 {
                CLASS_VOLUME => {
                    let volume = decode_ansi(item.get(1..)?);
                    if !volume.is_empty() {
                        path = Some(volume);
                    }
                }
                CLASS_FILE_ENTRY => {
                    let name = file_entry_name(item)?;
                    let current = path.as_mut()?;
                    if !current.ends_with('\\') {
                        current.push('\\');
                    }
                    current.push_str(&name);
                }
                _ => {}
            }
        }

        path
    }
}

/// Name of a file entry item, preferring the long name of the extension block.
fn file_entry_name(item: &[u8]) -> Option<String> {
    let unicode = item[0] & 0x04 != 0;
    // class type, unknown, file size, modification time, attributes
    let mut parser = Parser::new(item);
    parser.advance_by(12).ok()?;

    let primary = if unicode {
        parser.read_utf16z().ok()?
    } else {
        let name = parser.read_ansiz().ok()?;
        parser.align(2).ok()?;
        name
    };

    if unicode {
        return Some(primary);
    }

    Some(extension_long_name(&item[parser.pos()..]).unwrap_or(primary))
}

fn extension_long_name(block: &[u8]) -> Option<String> {
    let mut parser = Parser::new(block);
    let size = parser.read_le::<u16>().ok()? as usize;
    let version = parser.read_le::<u16>().ok()?;
    let signature = parser.read_le::<u32>().ok()?;
    if signature != FILE_ENTRY_EXTENSION || size > block.len() || version < 3 {
        return None;
    }

    let offset = match version {
        3..=6 => 20,
        7 => 38,
        8 => 42,
        _ => 46,
    };

    let name = decode_utf16(block.get(offset..size)?);
    (!name.is_empty()).then_some(name)
}
