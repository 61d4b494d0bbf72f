use uguid::{guid, Guid};

use super::{pad_to, push_utf16};
use crate::shelllink::{
    header::{LinkFlags, HEADER_SIZE, SHELL_LINK_CLSID},
    propstore::PropertyKey,
};

const MY_COMPUTER: Guid = guid!("20D04FE0-3AEA-1069-A2D8-08002B30309D");

fn push_ansi(data: &mut Vec<u8>, text: &str) {
    data.extend(text.chars().map(|c| c as u8));
}

/// Encodes a shell link.
///
/// `build` returns the link without class id, ending with a terminal extra data block.
#[derive(Debug, Clone)]
pub struct LinkBuilder {
    unicode: bool,
    icon_index: i32,
    id_list: Option<Vec<u8>>,
    link_info: Option<Vec<u8>>,
    description: Option<String>,
    working_directory: Option<String>,
    arguments: Option<String>,
    icon_location: Option<String>,
    extra: Vec<u8>,
}

impl Default for LinkBuilder {
    fn default() -> Self {
        LinkBuilder {
            unicode: true,
            icon_index: 0,
            id_list: None,
            link_info: None,
            description: None,
            working_directory: None,
            arguments: None,
            icon_location: None,
            extra: Vec::new(),
        }
    }
}

impl LinkBuilder {
    pub fn new() -> Self {
        LinkBuilder::default()
    }

    /// Writes string data single byte per character
    pub fn ansi(mut self) -> Self {
        self.unicode = false;
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn with_arguments(mut self, arguments: &str) -> Self {
        self.arguments = Some(arguments.to_string());
        self
    }

    pub fn with_working_directory(mut self, directory: &str) -> Self {
        self.working_directory = Some(directory.to_string());
        self
    }

    pub fn with_icon_location(mut self, location: &str, index: i32) -> Self {
        self.icon_location = Some(location.to_string());
        self.icon_index = index;
        self
    }

    /// Target path through a link info structure
    pub fn with_local_path(mut self, path: &str) -> Self {
        self.link_info = Some(link_info_local(path));
        self
    }

    /// A size-prefixed id list from [`IdListBuilder::build`]
    pub fn with_id_list(mut self, id_list: Vec<u8>) -> Self {
        self.id_list = Some(id_list);
        self
    }

    /// A serialized store from [`PropertyStoreBuilder::build`]
    pub fn with_property_store(mut self, store: Vec<u8>) -> Self {
        self.extra
            .extend_from_slice(&((store.len() + 8) as u32).to_le_bytes());
        self.extra.extend_from_slice(&0xA000_0009_u32.to_le_bytes());
        self.extra.extend_from_slice(&store);
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut flags = LinkFlags::empty();
        flags.set(LinkFlags::HAS_LINK_TARGET_ID_LIST, self.id_list.is_some());
        flags.set(LinkFlags::HAS_LINK_INFO, self.link_info.is_some());
        flags.set(LinkFlags::HAS_NAME, self.description.is_some());
        flags.set(LinkFlags::HAS_WORKING_DIR, self.working_directory.is_some());
        flags.set(LinkFlags::HAS_ARGUMENTS, self.arguments.is_some());
        flags.set(LinkFlags::HAS_ICON_LOCATION, self.icon_location.is_some());
        flags.set(LinkFlags::IS_UNICODE, self.unicode);

        let mut data = Vec::new();
        data.extend_from_slice(&HEADER_SIZE.to_le_bytes());
        data.extend_from_slice(&SHELL_LINK_CLSID.to_bytes());
        data.extend_from_slice(&flags.bits().to_le_bytes());
        data.extend_from_slice(&0x20_u32.to_le_bytes());
        data.extend_from_slice(&[0u8; 24]);
        data.extend_from_slice(&0_u32.to_le_bytes());
        data.extend_from_slice(&self.icon_index.to_le_bytes());
        data.extend_from_slice(&1_u32.to_le_bytes());
        data.extend_from_slice(&[0u8; 12]);

        if let Some(id_list) = &self.id_list {
            data.extend_from_slice(id_list);
        }
        if let Some(link_info) = &self.link_info {
            data.extend_from_slice(link_info);
        }

        for text in [
            &self.description,
            &self.working_directory,
            &self.arguments,
            &self.icon_location,
        ]
        .into_iter()
        .flatten()
        {
            if self.unicode {
                data.extend_from_slice(&(text.encode_utf16().count() as u16).to_le_bytes());
                push_utf16(&mut data, text);
            } else {
                data.extend_from_slice(&(text.chars().count() as u16).to_le_bytes());
                push_ansi(&mut data, text);
            }
        }

        data.extend_from_slice(&self.extra);
        data.extend_from_slice(&0_u32.to_le_bytes());
        data
    }
}

/// Class id followed by the link, as embedded in destinations files
pub fn ole_link(link: LinkBuilder) -> Vec<u8> {
    let mut data = SHELL_LINK_CLSID.to_bytes().to_vec();
    data.extend_from_slice(&link.build());
    data
}

/// Link info with a volume id, an ANSI local base path and an empty common suffix
pub fn link_info_local(path: &str) -> Vec<u8> {
    const HEADER: usize = 0x1C;
    const VOLUME_ID: usize = 0x11;

    let local_base_path_offset = HEADER + VOLUME_ID;
    let common_path_suffix_offset = local_base_path_offset + path.chars().count() + 1;
    let size = common_path_suffix_offset + 1;

    let mut data = Vec::with_capacity(size);
    data.extend_from_slice(&(size as u32).to_le_bytes());
    data.extend_from_slice(&(HEADER as u32).to_le_bytes());
    data.extend_from_slice(&1_u32.to_le_bytes());
    data.extend_from_slice(&(HEADER as u32).to_le_bytes());
    data.extend_from_slice(&(local_base_path_offset as u32).to_le_bytes());
    data.extend_from_slice(&0_u32.to_le_bytes());
    data.extend_from_slice(&(common_path_suffix_offset as u32).to_le_bytes());

    // Volume id: size, drive type (fixed), serial, label offset, empty label
    data.extend_from_slice(&(VOLUME_ID as u32).to_le_bytes());
    data.extend_from_slice(&3_u32.to_le_bytes());
    data.extend_from_slice(&0x1234_5678_u32.to_le_bytes());
    data.extend_from_slice(&0x10_u32.to_le_bytes());
    data.push(0);

    push_ansi(&mut data, path);
    data.push(0);
    data.push(0);
    data
}

/// A complete environment style extra data block (`0xA0000001` or `0xA0000007`)
pub fn environment_block(signature: u32, text: &str) -> Vec<u8> {
    let mut data = Vec::with_capacity(0x314);
    data.extend_from_slice(&0x314_u32.to_le_bytes());
    data.extend_from_slice(&signature.to_le_bytes());

    let mut ansi = Vec::new();
    push_ansi(&mut ansi, text);
    ansi.resize(260, 0);
    data.extend_from_slice(&ansi);

    let mut unicode = Vec::new();
    push_utf16(&mut unicode, text);
    unicode.resize(520, 0);
    data.extend_from_slice(&unicode);
    data
}

/// Encodes an item id list
#[derive(Debug, Clone, Default)]
pub struct IdListBuilder {
    items: Vec<Vec<u8>>,
}

impl IdListBuilder {
    pub fn new() -> Self {
        IdListBuilder::default()
    }

    /// Root folder item (My Computer)
    pub fn with_root(mut self) -> Self {
        let mut item = vec![0x1F, 0x50];
        item.extend_from_slice(&MY_COMPUTER.to_bytes());
        self.items.push(item);
        self
    }

    pub fn with_volume(mut self, volume: &str) -> Self {
        let mut item = vec![0x2F];
        push_ansi(&mut item, volume);
        item.resize(23, 0);
        self.items.push(item);
        self
    }

    /// File entry item with a short name and a `0xBEEF0004` extension of `version`
    pub fn with_file_entry(mut self, short_name: &str, long_name: &str, version: u16) -> Self {
        let mut item = vec![0x32, 0x00];
        item.extend_from_slice(&0_u32.to_le_bytes());
        item.extend_from_slice(&0_u32.to_le_bytes());
        item.extend_from_slice(&0x20_u16.to_le_bytes());
        push_ansi(&mut item, short_name);
        item.push(0);
        pad_to(&mut item, 2);

        let long_name_offset = match version {
            3..=6 => 20,
            7 => 38,
            8 => 42,
            _ => 46,
        };
        let mut block = vec![0u8; long_name_offset];
        block[2..4].copy_from_slice(&version.to_le_bytes());
        block[4..8].copy_from_slice(&0xBEEF_0004_u32.to_le_bytes());
        push_utf16(&mut block, long_name);
        block.extend_from_slice(&[0, 0]);
        let block_offset = item.len() as u16;
        block.extend_from_slice(&block_offset.to_le_bytes());
        let block_size = block.len() as u16;
        block[0..2].copy_from_slice(&block_size.to_le_bytes());

        item.extend_from_slice(&block);
        self.items.push(item);
        self
    }

    /// Size-prefixed list including the terminal null item
    pub fn build(&self) -> Vec<u8> {
        let mut list = Vec::new();
        for item in &self.items {
            list.extend_from_slice(&((item.len() + 2) as u16).to_le_bytes());
            list.extend_from_slice(item);
        }
        list.extend_from_slice(&[0, 0]);

        let mut data = (list.len() as u16).to_le_bytes().to_vec();
        data.extend_from_slice(&list);
        data
    }
}

/// Encodes a serialized property store with one storage per value
#[derive(Debug, Clone, Default)]
pub struct PropertyStoreBuilder {
    values: Vec<(PropertyKey, u16, Vec<u8>)>,
}

impl PropertyStoreBuilder {
    pub fn new() -> Self {
        PropertyStoreBuilder::default()
    }

    /// `VT_LPWSTR`
    pub fn with_string(mut self, key: PropertyKey, value: &str) -> Self {
        let mut payload = Vec::new();
        payload.extend_from_slice(&((value.encode_utf16().count() + 1) as u32).to_le_bytes());
        push_utf16(&mut payload, value);
        payload.extend_from_slice(&[0, 0]);
        pad_to(&mut payload, 4);
        self.values.push((key, 0x1F, payload));
        self
    }

    /// `VT_BOOL`
    pub fn with_bool(mut self, key: PropertyKey, value: bool) -> Self {
        let raw: i16 = if value { -1 } else { 0 };
        let mut payload = raw.to_le_bytes().to_vec();
        pad_to(&mut payload, 4);
        self.values.push((key, 0x0B, payload));
        self
    }

    /// `VT_UI4`
    pub fn with_u32(mut self, key: PropertyKey, value: u32) -> Self {
        self.values.push((key, 0x13, value.to_le_bytes().to_vec()));
        self
    }

    /// Any variant type with a raw payload
    pub fn with_raw(mut self, key: PropertyKey, vt: u16, payload: &[u8]) -> Self {
        self.values.push((key, vt, payload.to_vec()));
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut data = Vec::new();
        for (key, vt, payload) in &self.values {
            let mut value = Vec::new();
            value.extend_from_slice(&((4 + 4 + 1 + 4 + payload.len()) as u32).to_le_bytes());
            value.extend_from_slice(&key.pid.to_le_bytes());
            value.push(0);
            value.extend_from_slice(&vt.to_le_bytes());
            value.extend_from_slice(&0_u16.to_le_bytes());
            value.extend_from_slice(payload);

            let storage_size = 4 + 4 + 16 + value.len() + 4;
            data.extend_from_slice(&(storage_size as u32).to_le_bytes());
            data.extend_from_slice(&0x5350_5331_u32.to_le_bytes());
            data.extend_from_slice(&key.fmtid.to_bytes());
            data.extend_from_slice(&value);
            data.extend_from_slice(&0_u32.to_le_bytes());
        }

        data.extend_from_slice(&0_u32.to_le_bytes());
        data
    }
}
