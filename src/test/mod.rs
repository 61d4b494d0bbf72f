//! Test-only encoders and collaborators.
//!
//! The encoders write the binary layouts the readers consume, so tests can craft exact inputs
//! without shipping sample files:
//!
//! - [`LinkBuilder`], [`IdListBuilder`], [`PropertyStoreBuilder`] - shell links and their parts
//! - [`CompoundFileBuilder`] - version 3 compound files
//! - [`CustomDestinationsBuilder`] - custom destinations files
//! - [`MockShell`], [`MockPinnedItem`] - scripted shell collaborators

mod custom;
mod link;

pub use cfb::CompoundFileBuilder;
pub use custom::CustomDestinationsBuilder;
pub use link::{
    environment_block, link_info_local, ole_link, IdListBuilder, LinkBuilder,
    PropertyStoreBuilder,
};
pub use mocks::{MockPinnedItem, MockShell};

/// Appends `text` as little-endian UTF-16 code units, without terminator
pub fn push_utf16(data: &mut Vec<u8>, text: &str) {
    for unit in text.encode_utf16() {
        data.extend_from_slice(&unit.to_le_bytes());
    }
}

/// Pads `data` with zeros to a multiple of `alignment`
pub fn pad_to(data: &mut Vec<u8>, alignment: usize) {
    while data.len() % alignment != 0 {
        data.push(0);
    }
}
