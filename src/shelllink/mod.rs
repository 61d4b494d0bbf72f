//! Native shell link (`.lnk`) decoding.
//!
//! Destinations files embed every item as a serialized shell link. This module decodes the
//! binary layout directly, without a shell round trip:
//!
//! ```text
//! header (76 bytes) [id list] [link info] [string data...] extra data blocks... terminal block
//! ```
//!
//! # Key Components
//!
//! - [`ShellLink`] - A decoded link with path accessors
//! - [`header::ShellLinkHeader`] / [`header::LinkFlags`] - Fixed header
//! - [`idlist::IdList`] - Target item id list
//! - [`linkinfo::LinkInfo`] - Local or network target location
//! - [`extradata::ExtraData`] - Environment, folder and property store blocks
//! - [`propstore::PropertyStore`] - Attached properties and the keys read from them
//!
//! # Usage Examples
//!
//! ```rust,no_run
//! use jumpscope::{shelllink::ShellLink, Parser};
//!
//! let data = std::fs::read("Editor.lnk")?;
//! let link = ShellLink::parse(&mut Parser::new(&data))?;
//! println!("{:?} {:?}", link.target_path(), link.arguments);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod extradata;
pub mod header;
pub mod idlist;
pub mod linkinfo;
pub mod propstore;

use std::path::Path;

use crate::{
    file::{parser::decode_ansi, Backend, Memory, Parser},
    Error, Result,
};

use extradata::ExtraData;
use header::{LinkFlags, ShellLinkHeader, SHELL_LINK_CLSID};
use idlist::IdList;
use linkinfo::LinkInfo;
use propstore::PropertyStore;

/// A decoded shell link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellLink {
    /// Fixed header
    pub header: ShellLinkHeader,
    /// Target item id list
    pub id_list: Option<IdList>,
    /// Target location
    pub link_info: Option<LinkInfo>,
    /// Description (`NAME_STRING`)
    pub description: Option<String>,
    /// Path of the target relative to the link
    pub relative_path: Option<String>,
    /// Working directory
    pub working_directory: Option<String>,
    /// Command line arguments
    pub arguments: Option<String>,
    /// Icon location as stored in the string data
    pub icon_location: Option<String>,
    /// Trailing extra data blocks
    pub extra: ExtraData,
    /// The exact bytes of the link
    raw: Vec<u8>,
}

impl ShellLink {
    /// Decodes a shell link at the current parser position.
    ///
    /// On success the parser is positioned right after the terminal extra data block, which
    /// is where the next object of an enclosing stream starts.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] or [`crate::Error::OutOfBounds`] if the link is
    /// damaged. The enclosing stream position is lost in that case.
    pub fn parse(parser: &mut Parser) -> Result<ShellLink> {
        let start = parser.pos();
        let header = ShellLinkHeader::read(parser)?;
        let flags = header.flags;

        let id_list = if flags.contains(LinkFlags::HAS_LINK_TARGET_ID_LIST) {
            Some(IdList::read(parser)?)
        } else {
            None
        };

        let link_info = if flags.contains(LinkFlags::HAS_LINK_INFO) {
            Some(LinkInfo::read(parser)?)
        } else {
            None
        };

        let unicode = flags.contains(LinkFlags::IS_UNICODE);
        let mut string_data = |flag: LinkFlags| -> Result<Option<String>> {
            if !flags.contains(flag) {
                return Ok(None);
            }

            let count = parser.read_le::<u16>()? as usize;
            let text = if unicode {
                parser.read_utf16(count)?
            } else {
                decode_ansi(parser.read_bytes(count)?)
            };
            Ok((!text.is_empty()).then_some(text))
        };

        let description = string_data(LinkFlags::HAS_NAME)?;
        let relative_path = string_data(LinkFlags::HAS_RELATIVE_PATH)?;
        let working_directory = string_data(LinkFlags::HAS_WORKING_DIR)?;
        let arguments = string_data(LinkFlags::HAS_ARGUMENTS)?;
        let icon_location = string_data(LinkFlags::HAS_ICON_LOCATION)?;

        let extra = ExtraData::read(parser)?;
        let raw = parser.data()[start..parser.pos()].to_vec();

        Ok(ShellLink {
            header,
            id_list,
            link_info,
            description,
            relative_path,
            working_directory,
            arguments,
            icon_location,
            extra,
            raw,
        })
    }

    /// Decodes a class-identified link object: a 16-byte class id followed by the link.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the class id is not the shell link class or the
    /// link itself is damaged.
    pub fn from_ole_stream(parser: &mut Parser) -> Result<ShellLink> {
        let clsid = parser.read_guid()?;
        if clsid != SHELL_LINK_CLSID {
            return Err(malformed_error!("Embedded object is not a shell link - {}", clsid));
        }

        ShellLink::parse(parser)
    }

    /// Decodes a `.lnk` file from disk.
    ///
    /// # Errors
    /// Returns [`crate::Error::FileError`] if the file cannot be read, [`crate::Error::Empty`]
    /// for an empty file, or a decoding error for a damaged link.
    pub fn from_file(path: impl AsRef<Path>) -> Result<ShellLink> {
        let file = Memory::from_file(path)?;
        if file.data().is_empty() {
            return Err(Error::Empty);
        }

        ShellLink::parse(&mut Parser::new(file.data()))
    }

    /// Resolved target path.
    ///
    /// Link info is used unless the link forbids it, then the environment variable target,
    /// then the path described by the id list. Environment variables are expanded.
    #[must_use]
    pub fn target_path(&self) -> Option<String> {
        let flags = self.header.flags;

        let from_link_info = || {
            if flags.contains(LinkFlags::FORCE_NO_LINK_INFO) {
                return None;
            }
            self.link_info.as_ref().and_then(LinkInfo::path)
        };
        let from_environment = || {
            if flags.contains(LinkFlags::DISABLE_LINK_PATH_TRACKING) {
                return None;
            }
            self.extra.environment_target.clone()
        };
        let from_id_list = || self.id_list.as_ref().and_then(IdList::path);

        let path = if flags.contains(LinkFlags::PREFER_ENVIRONMENT_PATH) {
            from_environment()
                .or_else(from_link_info)
                .or_else(from_id_list)
        } else {
            from_link_info()
                .or_else(from_environment)
                .or_else(from_id_list)
        }?;

        Some(expand_environment(&path))
    }

    /// Icon location, from the icon environment block when the link has one.
    #[must_use]
    pub fn icon_location(&self) -> Option<String> {
        let location = if self.header.flags.contains(LinkFlags::HAS_EXP_ICON) {
            self.extra
                .icon_environment
                .as_ref()
                .or(self.icon_location.as_ref())
        } else {
            self.icon_location.as_ref()
        }?;

        Some(expand_environment(location))
    }

    /// Icon index within the icon location
    #[must_use]
    pub fn icon_index(&self) -> i32 {
        self.header.icon_index
    }

    /// Properties attached to the link
    #[must_use]
    pub fn property_store(&self) -> Option<&PropertyStore> {
        self.extra.property_store.as_ref()
    }

    /// Raw bytes of the serialized item id list, including its terminal item
    #[must_use]
    pub fn id_list_bytes(&self) -> Option<&[u8]> {
        self.id_list.as_ref().map(|list| list.raw.as_slice())
    }

    /// The exact bytes this link was decoded from, a valid `.lnk` file on its own
    #[must_use]
    pub fn raw(&self) -> &[u8] {
        &self.raw
    }
}

/// Expands `%NAME%` references from the process environment. Unknown variables stay as-is.
pub(crate) fn expand_environment(value: &str) -> String {
    let mut result = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find('%') {
        result.push_str(&rest[..start]);
        let after = &rest[start + 1..];

        let Some(end) = after.find('%') else {
            result.push_str(&rest[start..]);
            return result;
        };

        let name = &after[..end];
        match std::env::var(name) {
            Ok(expanded) if !name.is_empty() => {
                result.push_str(&expanded);
                rest = &after[end + 1..];
            }
            _ => {
                result.push('%');
                result.push_str(name);
                rest = &after[end..];
            }
        }
    }

    result.push_str(rest);
    result
}
