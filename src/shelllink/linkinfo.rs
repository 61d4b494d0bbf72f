//! Link info structure: where the target lived when the link was created.

use crate::{
    file::{
        parser::{decode_ansi, decode_utf16},
        Parser,
    },
    Result,
};

/// Volume id and local base path are present
const VOLUME_ID_AND_LOCAL_BASE_PATH: u32 = 0x1;
/// Common network relative link and path suffix are present
const COMMON_NETWORK_RELATIVE_LINK: u32 = 0x2;

/// Decoded link info
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkInfo {
    /// Local path of the target
    pub local_base_path: Option<String>,
    /// Share name of a network target (`\\server\share`)
    pub network_share: Option<String>,
    /// Remainder of the path appended to the base path or share
    pub common_path_suffix: Option<String>,
}

impl LinkInfo {
    /// Reads a link info structure and advances the parser past its declared size.
    ///
    /// Unicode variants of the paths are used when the header carries them.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] for inconsistent sizes or offsets and
    /// [`crate::Error::OutOfBounds`] for truncated data.
    pub fn read(parser: &mut Parser) -> Result<LinkInfo> {
        let start = parser.pos();
        let size = parser.read_le::<u32>()? as usize;
        if size < 0x1C {
            return Err(malformed_error!("Invalid link info size - {}", size));
        }

        parser.seek(start)?;
        let data = parser.read_bytes(size)?;

        let mut info = Parser::new(data);
        info.advance_by(4)?;
        let header_size = info.read_le::<u32>()? as usize;
        let flags = info.read_le::<u32>()?;
        let _volume_id_offset = info.read_le::<u32>()?;
        let local_base_path_offset = info.read_le::<u32>()? as usize;
        let network_link_offset = info.read_le::<u32>()? as usize;
        let common_path_suffix_offset = info.read_le::<u32>()? as usize;
        let (local_base_path_offset_unicode, common_path_suffix_offset_unicode) =
            if header_size >= 0x24 {
                (
                    info.read_le::<u32>()? as usize,
                    info.read_le::<u32>()? as usize,
                )
            } else {
                (0, 0)
            };

        let mut result = LinkInfo::default();

        if flags & VOLUME_ID_AND_LOCAL_BASE_PATH != 0 {
            result.local_base_path = if local_base_path_offset_unicode != 0 {
                string_at(data, local_base_path_offset_unicode, true)?
            } else {
                string_at(data, local_base_path_offset, false)?
            };
        }

        if flags & COMMON_NETWORK_RELATIVE_LINK != 0 {
            result.network_share = network_share(data, network_link_offset)?;
        }

        result.common_path_suffix = if common_path_suffix_offset_unicode != 0 {
            string_at(data, common_path_suffix_offset_unicode, true)?
        } else {
            string_at(data, common_path_suffix_offset, false)?
        };

        Ok(result)
    }

    /// Full target path: local base path or network share, joined with the common suffix.
    #[must_use]
    pub fn path(&self) -> Option<String> {
        let suffix = self.common_path_suffix.as_deref().unwrap_or_default();

        if let Some(base) = &self.local_base_path {
            return Some(format!("{base}{suffix}"));
        }

        let share = self.network_share.as_ref()?;
        if suffix.is_empty() {
            Some(share.clone())
        } else {
            Some(format!("{share}\\{suffix}"))
        }
    }
}

fn network_share(data: &[u8], offset: usize) -> Result<Option<String>> {
    if offset == 0 || offset >= data.len() {
        return Ok(None);
    }

    let mut parser = Parser::new(&data[offset..]);
    let _size = parser.read_le::<u32>()?;
    let _flags = parser.read_le::<u32>()?;
    let net_name_offset = parser.read_le::<u32>()? as usize;
    let _device_name_offset = parser.read_le::<u32>()?;
    let _provider_type = parser.read_le::<u32>()?;

    if net_name_offset > 0x14 {
        let net_name_offset_unicode = parser.read_le::<u32>()? as usize;
        return string_at(&data[offset..], net_name_offset_unicode, true);
    }

    string_at(&data[offset..], net_name_offset, false)
}

fn string_at(data: &[u8], offset: usize, unicode: bool) -> Result<Option<String>> {
    if offset == 0 {
        return Ok(None);
    }

    let Some(bytes) = data.get(offset..) else {
        return Err(malformed_error!("Link info string offset out of range - {}", offset));
    };

    let text = if unicode {
        decode_utf16(bytes)
    } else {
        decode_ansi(bytes)
    };

    Ok((!text.is_empty()).then_some(text))
}
