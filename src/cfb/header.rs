//! Compound file header.
//!
//! The first 512 bytes of every compound file: signature, version, sector geometry and the
//! first 109 FAT sector locations.

use crate::{file::Parser, Error, Result};

/// Compound file signature `D0 CF 11 E0 A1 B1 1A E1`
pub const SIGNATURE: [u8; 8] = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];
/// Size of the fixed header, the first sector starts right behind it (version 3)
pub const HEADER_SIZE: usize = 512;
/// Number of FAT sector locations stored in the header itself
pub const HEADER_DIFAT_ENTRIES: usize = 109;

/// Highest regular sector id
pub const MAXREGSECT: u32 = 0xFFFF_FFFA;
/// Marks a sector holding DIFAT data
pub const DIFSECT: u32 = 0xFFFF_FFFC;
/// Marks a sector holding FAT data
pub const FATSECT: u32 = 0xFFFF_FFFD;
/// Terminates a sector chain
pub const ENDOFCHAIN: u32 = 0xFFFF_FFFE;
/// Unallocated sector
pub const FREESECT: u32 = 0xFFFF_FFFF;

/// The fixed header at the start of every compound file.
///
/// Only the fields needed to locate the allocation tables, the directory and the mini stream
/// are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// Major format version, 3 (512-byte sectors) or 4 (4096-byte sectors)
    pub major_version: u16,
    /// Sector size as a power of two
    pub sector_shift: u16,
    /// Mini sector size as a power of two
    pub mini_sector_shift: u16,
    /// Number of FAT sectors
    pub fat_sector_count: u32,
    /// First sector of the directory chain
    pub first_directory_sector: u32,
    /// Streams smaller than this live in the mini stream
    pub mini_stream_cutoff: u32,
    /// First sector of the mini FAT chain
    pub first_mini_fat_sector: u32,
    /// Number of mini FAT sectors
    pub mini_fat_sector_count: u32,
    /// First sector of the DIFAT chain
    pub first_difat_sector: u32,
    /// Number of DIFAT sectors
    pub difat_sector_count: u32,
    /// FAT sector locations stored in the header
    pub difat: Vec<u32>,
}

impl Header {
    /// Parses and validates the header at the start of `data`.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] for a bad signature, byte order or sector geometry,
    /// [`crate::Error::NotSupported`] for an unknown major version and
    /// [`crate::Error::OutOfBounds`] if `data` is shorter than a header.
    pub fn parse(data: &[u8]) -> Result<Header> {
        if data.len() < HEADER_SIZE {
            return Err(Error::OutOfBounds);
        }

        let mut parser = Parser::new(data);
        if parser.read_bytes(8)? != SIGNATURE {
            return Err(malformed_error!("Invalid compound file signature"));
        }

        // Header CLSID and minor version are not used
        parser.advance_by(16 + 2)?;
        let major_version = parser.read_le::<u16>()?;
        let byte_order = parser.read_le::<u16>()?;
        let sector_shift = parser.read_le::<u16>()?;
        let mini_sector_shift = parser.read_le::<u16>()?;
        parser.advance_by(6)?;
        let _directory_sector_count = parser.read_le::<u32>()?;
        let fat_sector_count = parser.read_le::<u32>()?;
        let first_directory_sector = parser.read_le::<u32>()?;
        let _transaction_signature = parser.read_le::<u32>()?;
        let mini_stream_cutoff = parser.read_le::<u32>()?;
        let first_mini_fat_sector = parser.read_le::<u32>()?;
        let mini_fat_sector_count = parser.read_le::<u32>()?;
        let first_difat_sector = parser.read_le::<u32>()?;
        let difat_sector_count = parser.read_le::<u32>()?;

        let mut difat = Vec::with_capacity(HEADER_DIFAT_ENTRIES);
        for _ in 0..HEADER_DIFAT_ENTRIES {
            difat.push(parser.read_le::<u32>()?);
        }

        if byte_order != 0xFFFE {
            return Err(malformed_error!("Invalid byte order mark - {:#06x}", byte_order));
        }

        match (major_version, sector_shift) {
            (3, 9) | (4, 12) => {}
            (3 | 4, _) => {
                return Err(malformed_error!(
                    "Invalid sector shift {} for version {}",
                    sector_shift,
                    major_version
                ))
            }
            _ => return Err(Error::NotSupported),
        }

        if mini_sector_shift != 6 {
            return Err(malformed_error!(
                "Invalid mini sector shift - {}",
                mini_sector_shift
            ));
        }

        if mini_stream_cutoff != 4096 {
            return Err(malformed_error!(
                "Invalid mini stream cutoff - {}",
                mini_stream_cutoff
            ));
        }

        Ok(Header {
            major_version,
            sector_shift,
            mini_sector_shift,
            fat_sector_count,
            first_directory_sector,
            mini_stream_cutoff,
            first_mini_fat_sector,
            mini_fat_sector_count,
            first_difat_sector,
            difat_sector_count,
            difat,
        })
    }

    /// Size of a regular sector in bytes
    #[must_use]
    pub fn sector_size(&self) -> usize {
        1 << self.sector_shift
    }

    /// Size of a mini sector in bytes
    #[must_use]
    pub fn mini_sector_size(&self) -> usize {
        1 << self.mini_sector_shift
    }

    /// File offset of a regular sector. Sector 0 starts right after the first sector sized block.
    #[must_use]
    pub fn sector_offset(&self, sector: u32) -> usize {
        (sector as usize + 1) << self.sector_shift
    }
}
