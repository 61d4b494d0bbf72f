//! Shell link header and link flags.

use bitflags::bitflags;
use uguid::{guid, Guid};

use crate::{file::Parser, Result};

/// Size of the fixed shell link header
pub const HEADER_SIZE: u32 = 0x4C;
/// Class id of shell link objects, `{00021401-0000-0000-C000-000000000046}`
pub const SHELL_LINK_CLSID: Guid = guid!("00021401-0000-0000-C000-000000000046");

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    /// Flags describing which optional structures follow the header
    pub struct LinkFlags: u32 {
        /// A target item id list follows the header
        const HAS_LINK_TARGET_ID_LIST = 0x0000_0001;
        /// A link info structure is present
        const HAS_LINK_INFO = 0x0000_0002;
        /// A description string is present
        const HAS_NAME = 0x0000_0004;
        /// A relative path string is present
        const HAS_RELATIVE_PATH = 0x0000_0008;
        /// A working directory string is present
        const HAS_WORKING_DIR = 0x0000_0010;
        /// A command line arguments string is present
        const HAS_ARGUMENTS = 0x0000_0020;
        /// An icon location string is present
        const HAS_ICON_LOCATION = 0x0000_0040;
        /// Strings are UTF-16, otherwise ANSI
        const IS_UNICODE = 0x0000_0080;
        /// Link info is ignored
        const FORCE_NO_LINK_INFO = 0x0000_0100;
        /// An environment variable target block is present
        const HAS_EXP_STRING = 0x0000_0200;
        /// Run a 16-bit target in a separate virtual machine
        const RUN_IN_SEPARATE_PROCESS = 0x0000_0400;
        /// A darwin (installer) block is present
        const HAS_DARWIN_ID = 0x0000_1000;
        /// Run as a different user
        const RUN_AS_USER = 0x0000_2000;
        /// An icon environment block is present
        const HAS_EXP_ICON = 0x0000_4000;
        /// Id list target is not aliased
        const NO_PIDL_ALIAS = 0x0000_8000;
        /// A shim layer block is present
        const RUN_WITH_SHIM_LAYER = 0x0002_0000;
        /// No link tracking block
        const FORCE_NO_LINK_TRACK = 0x0004_0000;
        /// Target properties are collected into the property store block
        const ENABLE_TARGET_METADATA = 0x0008_0000;
        /// Ignore the environment variable target block
        const DISABLE_LINK_PATH_TRACKING = 0x0010_0000;
        /// Ignore known folder blocks
        const DISABLE_KNOWN_FOLDER_TRACKING = 0x0020_0000;
        /// Do not use the known folder alias
        const DISABLE_KNOWN_FOLDER_ALIAS = 0x0040_0000;
        /// Target may itself be a link
        const ALLOW_LINK_TO_LINK = 0x0080_0000;
        /// Unalias the target when saving
        const UNALIAS_ON_SAVE = 0x0100_0000;
        /// Prefer the environment variable target over the id list
        const PREFER_ENVIRONMENT_PATH = 0x0200_0000;
        /// Keep the local id list for UNC targets
        const KEEP_LOCAL_ID_LIST_FOR_UNC_TARGET = 0x0400_0000;
    }
}

/// The fixed 76-byte shell link header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellLinkHeader {
    /// Optional structure flags
    pub flags: LinkFlags,
    /// File attributes of the target
    pub file_attributes: u32,
    /// Creation time of the target (FILETIME)
    pub creation_time: u64,
    /// Access time of the target (FILETIME)
    pub access_time: u64,
    /// Write time of the target (FILETIME)
    pub write_time: u64,
    /// Size of the target (low 32 bits)
    pub file_size: u32,
    /// Index of the icon within the icon location
    pub icon_index: i32,
    /// Expected window state of the launched application
    pub show_command: u32,
    /// Keyboard shortcut
    pub hot_key: u16,
}

impl ShellLinkHeader {
    /// Reads the header at the current parser position.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] for a wrong header size or class id and
    /// [`crate::Error::OutOfBounds`] for truncated data.
    pub fn read(parser: &mut Parser) -> Result<ShellLinkHeader> {
        let size = parser.read_le::<u32>()?;
        if size != HEADER_SIZE {
            return Err(malformed_error!("Invalid shell link header size - {:#x}", size));
        }

        let clsid = parser.read_guid()?;
        if clsid != SHELL_LINK_CLSID {
            return Err(malformed_error!("Invalid shell link class id - {}", clsid));
        }

        let header = ShellLinkHeader {
            flags: LinkFlags::from_bits_retain(parser.read_le::<u32>()?),
            file_attributes: parser.read_le::<u32>()?,
            creation_time: parser.read_le::<u64>()?,
            access_time: parser.read_le::<u64>()?,
            write_time: parser.read_le::<u64>()?,
            file_size: parser.read_le::<u32>()?,
            icon_index: parser.read_le::<i32>()?,
            show_command: parser.read_le::<u32>()?,
            hot_key: parser.read_le::<u16>()?,
        };

        // Reserved1-3
        parser.advance_by(2 + 4 + 4)?;
        Ok(header)
    }
}
