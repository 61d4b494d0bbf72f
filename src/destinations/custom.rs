//! Custom destinations (`*.customDestinations-ms`).
//!
//! A flat sequential layout written by applications through the jump list API:
//!
//! ```text
//! header   := version:i32 category_count:i32 reserved:i32
//! category := type:i32 payload footer:u32 (0xBABFFBAB)
//! custom   := title_len:i16 title:utf16[title_len] item_count:i32 object[item_count]   (type 0)
//! known    := known_category_id:i32                                                    (type 1)
//! tasks    := item_count:i32 object[item_count]                                        (type 2)
//! object   := clsid:guid shell_link
//! ```
//!
//! Objects have no length prefix, the only way to find the next one is decoding the current
//! one completely. This is why items over the category limit are still decoded, and why a
//! damaged object ends the file.

use std::path::Path;

use log::{debug, info, warn};
use strum::FromRepr;

use crate::{
    decoder::LinkDecoder,
    destinations::{
        automatic::source_name, CategoryCounter, Destinations, RECENT_CATEGORY, TASKS_CATEGORY,
    },
    file::{Backend, Memory, Parser},
    records::LinkRecord,
    Error, Result,
};

/// Expected value of the footer trailing every category, bytes `AB FB BF BA`
pub const CATEGORY_FOOTER: u32 = 0xBABF_FBAB;
/// Upper bound of objects read per category, whatever the file declares
pub const MAX_CATEGORY_ITEMS: i32 = 1000;

/// Kind of a category block
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRepr)]
#[repr(i32)]
pub enum CategoryType {
    /// Application defined category with a title and links
    Custom = 0,
    /// Reference to a shell maintained category (recent, frequent), no links
    Known = 1,
    /// Application tasks
    Tasks = 2,
}

/// Reads a custom destinations file.
///
/// # Arguments
/// * `path` - Path of the file
/// * `decoder` - Link decoder
/// * `limit` - Maximum number of emitted items per custom category; tasks are not limited
pub fn read_file(path: &Path, decoder: &LinkDecoder, limit: usize) -> Destinations {
    info!("Jump list processing starts: {}", path.display());
    let source = source_name(path);

    let result = match Memory::from_file(path) {
        Ok(memory) => parse(memory.data(), &source, decoder, limit),
        Err(error) => Destinations::failed(Vec::new(), error),
    };

    if let Some(error) = &result.error {
        warn!("{source}: jump list parsing stopped - {error}");
    }
    info!(
        "Jump list processing ends: {}, {} retrieved",
        path.display(),
        result.items.len()
    );
    result
}

/// Decodes the categories of a custom destinations buffer.
///
/// An unknown category type or a damaged object ends the buffer, earlier items are kept.
pub fn parse(data: &[u8], source: &str, decoder: &LinkDecoder, limit: usize) -> Destinations {
    let mut items = Vec::new();
    match parse_categories(data, source, decoder, limit, &mut items) {
        Ok(()) => Destinations { items, error: None },
        Err(error) => Destinations::failed(items, error),
    }
}

fn parse_categories(
    data: &[u8],
    source: &str,
    decoder: &LinkDecoder,
    limit: usize,
    items: &mut Vec<LinkRecord>,
) -> Result<()> {
    if data.is_empty() {
        return Err(Error::Empty);
    }

    let mut parser = Parser::new(data);
    let _version = parser.read_le::<i32>()?;
    let category_count = parser.read_le::<i32>()?;
    let _reserved = parser.read_le::<i32>()?;

    for _ in 0..category_count.max(0) {
        let raw_type = parser.read_le::<i32>()?;
        match CategoryType::from_repr(raw_type) {
            Some(CategoryType::Custom) => {
                let title = read_category_title(&mut parser)?;
                let category = title.as_deref().unwrap_or(RECENT_CATEGORY);
                read_links(&mut parser, source, category, decoder, Some(limit), items)?;
            }
            Some(CategoryType::Known) => {
                let _known_category = parser.read_le::<i32>()?;
            }
            Some(CategoryType::Tasks) => {
                read_links(&mut parser, source, TASKS_CATEGORY, decoder, None, items)?;
            }
            None => return Err(Error::UnsupportedCategory(raw_type)),
        }

        let footer = parser.read_le::<u32>()?;
        if footer != CATEGORY_FOOTER {
            debug!("{source}: unexpected category footer {footer:#010x}");
        }
    }

    Ok(())
}

/// Reads the counted UTF-16 title of a custom category, `None` when it is empty
fn read_category_title(parser: &mut Parser) -> Result<Option<String>> {
    let count = parser.read_le::<i16>()?;
    if count <= 0 {
        return Ok(None);
    }

    let title = parser.read_utf16(count as usize)?;
    Ok((!title.is_empty()).then_some(title))
}

fn read_links(
    parser: &mut Parser,
    source: &str,
    category: &str,
    decoder: &LinkDecoder,
    limit: Option<usize>,
    items: &mut Vec<LinkRecord>,
) -> Result<()> {
    let declared = parser.read_le::<i32>()?;
    let count = declared.clamp(0, MAX_CATEGORY_ITEMS);
    if count != declared {
        debug!("{source}: {category} declares {declared} items, reading {count}");
    }

    let mut counter = CategoryCounter::new(limit);
    for _ in 0..count {
        if let Some(record) = decoder.decode(parser, source, category, counter.over_limit())? {
            items.push(record);
        }
        counter.increment();
    }

    Ok(())
}
