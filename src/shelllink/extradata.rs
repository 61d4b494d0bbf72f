//! Extra data blocks trailing a shell link.

use log::debug;
use strum::FromRepr;
use uguid::Guid;

use crate::{
    file::{
        parser::{decode_ansi, decode_utf16},
        Parser,
    },
    shelllink::propstore::PropertyStore,
    Result,
};

/// Signatures of the extra data blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRepr)]
#[repr(u32)]
pub enum BlockSignature {
    /// Target path with environment variables
    EnvironmentVariable = 0xA000_0001,
    /// Console window properties
    Console = 0xA000_0002,
    /// Distributed link tracker data
    Tracker = 0xA000_0003,
    /// Console code page
    ConsoleFe = 0xA000_0004,
    /// Special folder location of the target
    SpecialFolder = 0xA000_0005,
    /// Installer descriptor
    Darwin = 0xA000_0006,
    /// Icon path with environment variables
    IconEnvironment = 0xA000_0007,
    /// Shim layer name
    Shim = 0xA000_0008,
    /// Serialized property store
    PropertyStore = 0xA000_0009,
    /// Known folder location of the target
    KnownFolder = 0xA000_000B,
    /// Alternate id list
    VistaAndAboveIdList = 0xA000_000C,
}

/// The extra data blocks this crate uses
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtraData {
    /// Target path containing environment variable references
    pub environment_target: Option<String>,
    /// Icon location containing environment variable references
    pub icon_environment: Option<String>,
    /// Properties attached to the link
    pub property_store: Option<PropertyStore>,
    /// Known folder id and the offset of its item in the id list
    pub known_folder: Option<(Guid, u32)>,
    /// Special folder id and the offset of its item in the id list
    pub special_folder: Option<(u32, u32)>,
}

impl ExtraData {
    /// Reads extra data blocks until the terminal block.
    ///
    /// Data ending without a terminal block is accepted. A property store that fails to decode
    /// is dropped, its block size still keeps the parser aligned.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] for a block size that cannot hold a signature and
    /// [`crate::Error::OutOfBounds`] for a block overrunning the data.
    pub fn read(parser: &mut Parser) -> Result<ExtraData> {
        let mut extra = ExtraData::default();

        while parser.remaining() >= 4 {
            let size = parser.read_le::<u32>()? as usize;
            if size < 4 {
                break;
            }
            if size < 8 {
                return Err(malformed_error!("Invalid extra data block size - {}", size));
            }

            let signature = parser.read_le::<u32>()?;
            let body = parser.read_bytes(size - 8)?;

            match BlockSignature::from_repr(signature) {
                Some(BlockSignature::EnvironmentVariable) => {
                    extra.environment_target = environment_string(body);
                }
                Some(BlockSignature::IconEnvironment) => {
                    extra.icon_environment = environment_string(body);
                }
                Some(BlockSignature::PropertyStore) => match PropertyStore::parse(body) {
                    Ok(store) => extra.property_store = Some(store),
                    Err(error) => debug!("Ignoring undecodable link property store - {error}"),
                },
                Some(BlockSignature::KnownFolder) => {
                    let mut block = Parser::new(body);
                    extra.known_folder = Some((block.read_guid()?, block.read_le::<u32>()?));
                }
                Some(BlockSignature::SpecialFolder) => {
                    let mut block = Parser::new(body);
                    extra.special_folder =
                        Some((block.read_le::<u32>()?, block.read_le::<u32>()?));
                }
                _ => {}
            }
        }

        Ok(extra)
    }
}

/// Decodes the 260-byte ANSI / 520-byte Unicode pair, preferring the Unicode variant.
fn environment_string(body: &[u8]) -> Option<String> {
    let unicode = body.get(260..780).map(decode_utf16).unwrap_or_default();
    if !unicode.is_empty() {
        return Some(unicode);
    }

    let ansi = decode_ansi(body.get(..260).unwrap_or(body));
    (!ansi.is_empty()).then_some(ansi)
}
