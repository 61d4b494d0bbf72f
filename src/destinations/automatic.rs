//! Automatic destinations (`*.automaticDestinations-ms`).
//!
//! A compound file whose streams each hold one serialized shell link without class id. The
//! reserved `DestList` stream holds usage bookkeeping and is skipped.

use std::path::Path;

use log::{info, warn};

use crate::{
    cfb::CompoundFile,
    decoder::LinkDecoder,
    destinations::{CategoryCounter, Destinations, RECENT_CATEGORY},
    file::Parser,
    shelllink::header::SHELL_LINK_CLSID,
};

/// Stream holding the pin and usage list, not a link
pub const DEST_LIST_STREAM: &str = "DestList";

/// Reads an automatic destinations file.
///
/// The container is released before this returns, whatever happened while decoding.
///
/// # Arguments
/// * `path` - Path of the file
/// * `decoder` - Link decoder
/// * `limit` - Maximum number of emitted items
pub fn read_file(path: &Path, decoder: &LinkDecoder, limit: usize) -> Destinations {
    info!("Jump list processing starts: {}", path.display());
    let source = source_name(path);

    let result = match CompoundFile::open(path) {
        Ok(container) => parse_container(&container, &source, decoder, limit),
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

/// Decodes the link streams of an opened container, in directory order.
///
/// A stream that cannot be read or decoded ends the container, earlier items are kept.
pub fn parse_container(
    container: &CompoundFile,
    source: &str,
    decoder: &LinkDecoder,
    limit: usize,
) -> Destinations {
    let mut items = Vec::new();
    let mut counter = CategoryCounter::new(Some(limit));

    for stream in container.streams() {
        if stream.name() == DEST_LIST_STREAM {
            continue;
        }

        let data = match stream.read() {
            Ok(data) => data,
            Err(error) => return Destinations::failed(items, error),
        };

        let mut object = Vec::with_capacity(16 + data.len());
        object.extend_from_slice(&SHELL_LINK_CLSID.to_bytes());
        object.extend_from_slice(&data);

        let mut parser = Parser::new(&object);
        match decoder.decode(&mut parser, source, RECENT_CATEGORY, counter.over_limit()) {
            Ok(Some(record)) => items.push(record),
            Ok(None) => {}
            Err(error) => return Destinations::failed(items, error),
        }
        counter.increment();
    }

    Destinations { items, error: None }
}

/// File name of a destinations file, used as the record source
pub(crate) fn source_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::{Enrichment, KnownAppIds},
        shell::{NoInstalledApplications, NoShell},
        test::{CompoundFileBuilder, LinkBuilder},
        Error,
    };

    fn link(path: &str) -> Vec<u8> {
        LinkBuilder::new().with_local_path(path).build()
    }

    fn decode(data: Vec<u8>, limit: usize) -> Destinations {
        let known = KnownAppIds::default();
        let decoder = LinkDecoder::new(Enrichment::Disabled, &known, &NoShell, &NoInstalledApplications);
        let container = CompoundFile::from_mem(data).unwrap();
        parse_container(&container, "f01b4d95cf55d32a.automaticDestinations-ms", &decoder, limit)
    }

    #[test]
    fn skips_dest_list() {
        let data = CompoundFileBuilder::new()
            .with_stream("DestList", vec![0xFF; 200])
            .with_stream("1", link("C:\\Docs\\report.docx"))
            .with_stream("2", link("C:\\Docs\\notes.txt"))
            .build();

        let result = decode(data, 10);
        assert!(result.is_complete());
        assert_eq!(result.items.len(), 2);
        assert_eq!(result.items[0].title.as_deref(), Some("report"));
        assert_eq!(result.items[1].title.as_deref(), Some("notes"));
        for item in &result.items {
            assert_eq!(item.category, "Recent");
            assert_eq!(item.source_file, "f01b4d95cf55d32a.automaticDestinations-ms");
        }
    }

    #[test]
    fn limit_applies_to_streams() {
        let mut builder = CompoundFileBuilder::new().with_stream("DestList", vec![0; 32]);
        for index in 0..5 {
            builder = builder.with_stream(&format!("{:x}", index + 1), link(&format!("C:\\f{index}.txt")));
        }

        let result = decode(builder.build(), 2);
        assert!(result.is_complete());
        let titles: Vec<_> = result.items.iter().filter_map(|i| i.title.as_deref()).collect();
        assert_eq!(titles, ["f0", "f1"]);
    }

    #[test]
    fn malformed_stream_keeps_earlier_items() {
        let data = CompoundFileBuilder::new()
            .with_stream("1", link("C:\\a.txt"))
            .with_stream("2", vec![0x4C, 0x00, 0x00])
            .with_stream("3", link("C:\\c.txt"))
            .build();

        let result = decode(data, 10);
        assert_eq!(result.items.len(), 1);
        assert_eq!(result.items[0].title.as_deref(), Some("a"));
        assert!(result.error.as_ref().is_some_and(Error::is_malformed));
    }

    #[test]
    fn missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let known = KnownAppIds::default();
        let decoder = LinkDecoder::new(Enrichment::Disabled, &known, &NoShell, &NoInstalledApplications);

        let result = read_file(&dir.path().join("0.automaticDestinations-ms"), &decoder, 10);
        assert!(result.items.is_empty());
        assert!(matches!(result.error, Some(Error::ContainerOpen { .. })));
    }

    #[test]
    fn from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("f01b4d95cf55d32a.automaticDestinations-ms");
        std::fs::write(
            &path,
            CompoundFileBuilder::new()
                .with_stream("DestList", vec![1; 64])
                .with_stream("1", link("C:\\Photos\\cat.png"))
                .build(),
        )
        .unwrap();

        let known = KnownAppIds::default();
        let decoder = LinkDecoder::new(Enrichment::Disabled, &known, &NoShell, &NoInstalledApplications);
        let result = read_file(&path, &decoder, 10);
        assert!(result.is_complete());
        assert_eq!(result.items.len(), 1);
        assert_eq!(result.items[0].target_path.as_deref(), Some("C:\\Photos\\cat.png"));
        assert_eq!(source_name(&path), "f01b4d95cf55d32a.automaticDestinations-ms");
    }
}
