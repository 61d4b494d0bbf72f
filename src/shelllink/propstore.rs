//! Serialized property store (`1SPS` storages) and the property keys this crate reads.
//!
//! Links written for jump lists carry an attached property store with the application identity
//! and the titles an application provided for its destinations. A store is a sequence of
//! storages, each identified by a format id and holding either integer-id or string-name
//! values:
//!
//! ```text
//! storage := size:u32 version:u32 ('1SPS') format_id:guid value* 0:u32
//! value   := size:u32 (id:u32 | name_size:u32) reserved:u8 [name] typed_value
//! typed   := vt:u16 padding:u16 payload
//! ```
//!
//! Every value is decoded inside its own declared size, so an unknown variant type only loses
//! that one value.

use uguid::{guid, Guid};

use crate::{
    file::{
        parser::{decode_ansi, decode_utf16},
        Parser,
    },
    Result,
};

/// Storage version signature, `1SPS`
const STORAGE_VERSION: u32 = 0x5350_5331;
/// Format id of storages whose values are named by strings instead of integer ids
const STRING_NAME_FORMAT: Guid = guid!("D5CDD505-2E9C-101B-9397-08002B2CF9AE");

/// Identifies a shell property: format id plus property id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PropertyKey {
    /// Property set format id
    pub fmtid: Guid,
    /// Property id within the set
    pub pid: u32,
}

impl PropertyKey {
    /// Creates a property key
    #[must_use]
    pub const fn new(fmtid: Guid, pid: u32) -> PropertyKey {
        PropertyKey { fmtid, pid }
    }
}

/// Property keys read by the link decoder and the pinned applications resolver
pub mod keys {
    use super::PropertyKey;
    use uguid::guid;

    /// `System.Title`
    pub const TITLE: PropertyKey =
        PropertyKey::new(guid!("F29F85E0-4FF9-1068-AB91-08002B27B3D9"), 2);
    /// `System.ItemNameDisplay`
    pub const ITEM_NAME_DISPLAY: PropertyKey =
        PropertyKey::new(guid!("B725F130-47EF-101A-A5F1-02608C9EEBAC"), 10);
    /// `System.ParsingPath`
    pub const PARSING_PATH: PropertyKey =
        PropertyKey::new(guid!("28636AA6-953D-11D2-B5D6-00C04FD918D0"), 30);
    /// `System.Link.TargetParsingPath`
    pub const LINK_TARGET_PARSING_PATH: PropertyKey =
        PropertyKey::new(guid!("B9B4B3FC-2B51-4A42-B5D8-324146AFCF25"), 2);
    /// `System.AppUserModel.ID`
    pub const APP_USER_MODEL_ID: PropertyKey =
        PropertyKey::new(guid!("9F4C2855-9F79-4B39-A8D0-E1D42DE1D5F3"), 5);
    /// `System.AppUserModel.IsDestListSeparator`
    pub const IS_DEST_LIST_SEPARATOR: PropertyKey =
        PropertyKey::new(guid!("9F4C2855-9F79-4B39-A8D0-E1D42DE1D5F3"), 6);
    /// `System.AppUserModel.ActivationContext`
    pub const ACTIVATION_CONTEXT: PropertyKey =
        PropertyKey::new(guid!("9F4C2855-9F79-4B39-A8D0-E1D42DE1D5F3"), 20);
    /// `System.AppUserModel.DestListProvidedTitle`
    pub const DEST_LIST_PROVIDED_TITLE: PropertyKey =
        PropertyKey::new(guid!("9F4C2855-9F79-4B39-A8D0-E1D42DE1D5F3"), 28);
    /// `System.AppUserModel.DestListProvidedDescription`
    pub const DEST_LIST_PROVIDED_DESCRIPTION: PropertyKey =
        PropertyKey::new(guid!("9F4C2855-9F79-4B39-A8D0-E1D42DE1D5F3"), 29);
    /// `System.AppUserModel.DestListLogoUri`
    pub const DEST_LIST_LOGO_URI: PropertyKey =
        PropertyKey::new(guid!("9F4C2855-9F79-4B39-A8D0-E1D42DE1D5F3"), 30);
    /// Title of a pinned taskbar item
    pub const PINNED_TITLE: PropertyKey =
        PropertyKey::new(guid!("9E5E05AC-1936-4A75-94F7-4704B8B01923"), 0);
}

/// A typed property value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyValue {
    /// `VT_EMPTY` or `VT_NULL`
    Empty,
    /// `VT_LPWSTR`, `VT_LPSTR` or `VT_BSTR`
    String(String),
    /// `VT_BOOL`
    Bool(bool),
    /// Signed integer types
    Int(i64),
    /// Unsigned integer types
    UInt(u64),
    /// `VT_FILETIME`, 100ns intervals since 1601
    FileTime(u64),
    /// `VT_CLSID`
    Guid(Guid),
    /// A variant type this crate does not decode
    Unsupported(u16),
}

impl PropertyValue {
    /// Returns the string value, `None` for other types and for empty strings
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(value) if !value.is_empty() => Some(value),
            _ => None,
        }
    }

    /// Returns the boolean value
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropertyValue::Bool(value) => Some(*value),
            _ => None,
        }
    }
}

/// One decoded property
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    /// Key of the property; string-named properties carry pid 0
    pub key: PropertyKey,
    /// Name of a string-named property
    pub name: Option<String>,
    /// The value
    pub value: PropertyValue,
}

/// A decoded serialized property store
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyStore {
    /// Properties in storage order
    pub properties: Vec<Property>,
}

impl PropertyStore {
    /// Parses a serialized property store.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] for a bad storage version or sizes that overrun
    /// the data.
    pub fn parse(data: &[u8]) -> Result<PropertyStore> {
        let mut parser = Parser::new(data);
        let mut properties = Vec::new();

        while parser.remaining() >= 4 {
            let storage_size = parser.read_le::<u32>()? as usize;
            if storage_size == 0 {
                break;
            }
            if storage_size < 24 {
                return Err(malformed_error!(
                    "Invalid property storage size - {}",
                    storage_size
                ));
            }

            let storage = parser.read_bytes(storage_size - 4)?;
            read_storage(storage, &mut properties)?;
        }

        Ok(PropertyStore { properties })
    }

    /// Returns the value of the first property with `key`
    #[must_use]
    pub fn get(&self, key: &PropertyKey) -> Option<&PropertyValue> {
        self.properties
            .iter()
            .find(|property| property.key == *key)
            .map(|property| &property.value)
    }

    /// Returns the non-empty string value of `key`
    #[must_use]
    pub fn string(&self, key: &PropertyKey) -> Option<&str> {
        self.get(key).and_then(PropertyValue::as_str)
    }
}

fn read_storage(data: &[u8], properties: &mut Vec<Property>) -> Result<()> {
    let mut parser = Parser::new(data);
    let version = parser.read_le::<u32>()?;
    if version != STORAGE_VERSION {
        return Err(malformed_error!(
            "Invalid property storage version - {:#x}",
            version
        ));
    }

    let fmtid = parser.read_guid()?;
    let string_names = fmtid == STRING_NAME_FORMAT;

    while parser.remaining() >= 4 {
        let value_size = parser.read_le::<u32>()? as usize;
        if value_size == 0 {
            break;
        }
        if value_size < 9 {
            return Err(malformed_error!("Invalid property value size - {}", value_size));
        }

        let mut value = Parser::new(parser.read_bytes(value_size - 4)?);
        let (pid, name) = if string_names {
            let name_size = value.read_le::<u32>()? as usize;
            let _reserved = value.read_le::<u8>()?;
            (0, Some(decode_utf16(value.read_bytes(name_size)?)))
        } else {
            let pid = value.read_le::<u32>()?;
            let _reserved = value.read_le::<u8>()?;
            (pid, None)
        };

        properties.push(Property {
            key: PropertyKey::new(fmtid, pid),
            name,
            value: read_typed_value(&mut value)?,
        });
    }

    Ok(())
}

fn read_typed_value(parser: &mut Parser) -> Result<PropertyValue> {
    let vt = parser.read_le::<u16>()?;
    let _padding = parser.read_le::<u16>()?;

    let value = match vt {
        0x00 | 0x01 => PropertyValue::Empty,
        // VT_LPWSTR, count includes the terminator
        0x1F => {
            let count = parser.read_le::<u32>()? as usize;
            PropertyValue::String(parser.read_utf16(count)?)
        }
        // VT_LPSTR
        0x1E => {
            let size = parser.read_le::<u32>()? as usize;
            PropertyValue::String(decode_ansi(parser.read_bytes(size)?))
        }
        // VT_BSTR, size in bytes
        0x08 => {
            let size = parser.read_le::<u32>()? as usize;
            PropertyValue::String(decode_utf16(parser.read_bytes(size)?))
        }
        0x0B => PropertyValue::Bool(parser.read_le::<i16>()? != 0),
        0x10 => PropertyValue::Int(i64::from(parser.read_le::<i8>()?)),
        0x02 => PropertyValue::Int(i64::from(parser.read_le::<i16>()?)),
        0x03 | 0x16 => PropertyValue::Int(i64::from(parser.read_le::<i32>()?)),
        0x14 => PropertyValue::Int(parser.read_le::<i64>()?),
        0x11 => PropertyValue::UInt(u64::from(parser.read_le::<u8>()?)),
        0x12 => PropertyValue::UInt(u64::from(parser.read_le::<u16>()?)),
        0x13 | 0x17 => PropertyValue::UInt(u64::from(parser.read_le::<u32>()?)),
        0x15 => PropertyValue::UInt(parser.read_le::<u64>()?),
        0x40 => PropertyValue::FileTime(parser.read_le::<u64>()?),
        0x48 => PropertyValue::Guid(parser.read_guid()?),
        other => PropertyValue::Unsupported(other),
    };

    Ok(value)
}
