//! Read-only Compound File Binary (structured storage) reader.
//!
//! Automatic destinations files are compound files: a small FAT file system with a directory
//! of named streams. This module reads such a file, assembles its allocation tables and exposes
//! the streams of the root storage in directory order. It knows nothing about what the streams
//! contain, the reserved `DestList` stream is skipped by the caller.
//!
//! # Architecture
//!
//! - [`header`] - Fixed header: geometry, allocation table locations
//! - [`directory`] - 128-byte directory entries
//! - [`CompoundFile`] - Loaded container owning its byte source
//! - [`StreamEntry`] - A named stream, read on demand
//!
//! The container owns its [`crate::file::Backend`]; dropping the [`CompoundFile`] releases the
//! buffer on every exit path, including when decoding a stream fails half way.
//!
//! # Usage Examples
//!
//! ```rust,no_run
//! use jumpscope::cfb::CompoundFile;
//!
//! let container = CompoundFile::open("f01b4d95cf55d32a.automaticDestinations-ms")?;
//! for stream in container.streams() {
//!     let data = stream.read()?;
//!     println!("{}: {} bytes", stream.name(), data.len());
//! }
//! # Ok::<(), jumpscope::Error>(())
//! ```

pub mod directory;
pub mod header;

use std::{collections::HashSet, path::Path};

use crate::{
    file::{io::read_le, Backend, Memory},
    Error, Result,
};

use directory::{DirectoryEntry, ObjectType, ENTRY_SIZE, NOSTREAM};
use header::{Header, ENDOFCHAIN, FREESECT, HEADER_DIFAT_ENTRIES, MAXREGSECT};

/// A loaded compound file.
///
/// Allocation tables and the directory are read eagerly when the file is opened, stream
/// contents are only assembled when [`StreamEntry::read`] is called.
pub struct CompoundFile {
    /// The byte source, kept alive for the lifetime of the container
    backend: Box<dyn Backend>,
    /// Parsed file header
    header: Header,
    /// Sector allocation table
    fat: Vec<u32>,
    /// Mini sector allocation table
    mini_fat: Vec<u32>,
    /// All directory entries, indexed by their id
    entries: Vec<DirectoryEntry>,
    /// Contents of the mini stream (owned by the root entry)
    mini_stream: Vec<u8>,
    /// Ids of the root storage's streams, in directory order
    stream_ids: Vec<u32>,
}

impl CompoundFile {
    /// Reads a compound file from disk and loads it.
    ///
    /// # Arguments
    /// * `path` - Path of the container
    ///
    /// # Errors
    /// Returns [`crate::Error::ContainerOpen`] if the file does not exist, cannot be read or
    /// is not a valid compound file. The underlying reason is kept as the error source.
    pub fn open(path: impl AsRef<Path>) -> Result<CompoundFile> {
        let path = path.as_ref();
        Memory::from_file(path)
            .and_then(|memory| CompoundFile::load(Box::new(memory)))
            .map_err(|source| Error::ContainerOpen {
                path: path.display().to_string(),
                source: Box::new(source),
            })
    }

    /// Loads a compound file from an owned buffer.
    ///
    /// # Errors
    /// Returns [`crate::Error::ContainerOpen`] if the buffer is not a valid compound file.
    pub fn from_mem(data: Vec<u8>) -> Result<CompoundFile> {
        CompoundFile::load(Box::new(Memory::new(data))).map_err(|source| Error::ContainerOpen {
            path: "<memory>".to_string(),
            source: Box::new(source),
        })
    }

    fn load(backend: Box<dyn Backend>) -> Result<CompoundFile> {
        if backend.is_empty() {
            return Err(Error::Empty);
        }

        let header = Header::parse(backend.data())?;
        let mut file = CompoundFile {
            backend,
            header,
            fat: Vec::new(),
            mini_fat: Vec::new(),
            entries: Vec::new(),
            mini_stream: Vec::new(),
            stream_ids: Vec::new(),
        };

        file.fat = file.load_fat()?;
        file.entries = file.load_directory()?;
        file.mini_fat = file.load_mini_fat()?;

        let root = file
            .entries
            .first()
            .ok_or_else(|| malformed_error!("Compound file has no root entry"))?;
        if root.object_type != ObjectType::Root {
            return Err(malformed_error!(
                "First directory entry is not the root - {:?}",
                root.object_type
            ));
        }

        let (root_start, root_size, root_child) = (root.start_sector, root.size, root.child);
        file.mini_stream = file.read_chain(root_start, root_size, false)?;
        file.stream_ids = file.collect_streams(root_child)?;

        Ok(file)
    }

    /// Lazily enumerates the streams of the root storage in directory order.
    ///
    /// Storages and their nested streams are not visited.
    #[must_use]
    pub fn streams(&self) -> Streams<'_> {
        Streams {
            file: self,
            ids: self.stream_ids.iter(),
        }
    }

    /// Returns the parsed file header
    #[must_use]
    pub fn header(&self) -> &Header {
        &self.header
    }

    fn sector(&self, sector: u32) -> Result<&[u8]> {
        if sector > MAXREGSECT {
            return Err(malformed_error!("Invalid sector id - {:#x}", sector));
        }

        self.backend
            .data_slice(self.header.sector_offset(sector), self.header.sector_size())
    }

    /// Assembles the FAT from the header DIFAT slots and the DIFAT sector chain.
    ///
    /// Declared sector counts are bounded by the file size, so the table never outgrows the
    /// input.
    fn load_fat(&self) -> Result<Vec<u32>> {
        let fat_count = self.header.fat_sector_count as usize;
        let difat_count = self.header.difat_sector_count as usize;
        let file_sectors = self.backend.len() / self.header.sector_size();
        if fat_count > file_sectors || difat_count > file_sectors {
            return Err(malformed_error!(
                "Declared {} FAT and {} DIFAT sectors, file holds {}",
                fat_count,
                difat_count,
                file_sectors
            ));
        }

        let mut fat_sectors: Vec<u32> = self
            .header
            .difat
            .iter()
            .take(fat_count.min(HEADER_DIFAT_ENTRIES))
            .copied()
            .filter(|sector| *sector != FREESECT)
            .collect();

        let slots_per_sector = self.header.sector_size() / 4 - 1;
        let mut current = self.header.first_difat_sector;
        let mut visited = HashSet::new();
        for _ in 0..difat_count {
            if current == ENDOFCHAIN || current == FREESECT {
                break;
            }
            if !visited.insert(current) {
                return Err(malformed_error!("DIFAT chain loops at sector {}", current));
            }

            let data = self.sector(current)?;
            for slot in 0..slots_per_sector {
                let sector = read_le::<u32>(&data[slot * 4..])?;
                if sector != FREESECT && fat_sectors.len() < fat_count {
                    fat_sectors.push(sector);
                }
            }
            current = read_le::<u32>(&data[slots_per_sector * 4..])?;
        }

        if fat_sectors.len() != fat_count {
            return Err(malformed_error!(
                "Expected {} FAT sectors, found {}",
                fat_count,
                fat_sectors.len()
            ));
        }

        let mut fat = Vec::with_capacity(fat_count * self.header.sector_size() / 4);
        for sector in fat_sectors {
            let data = self.sector(sector)?;
            fat.extend(
                data.chunks_exact(4)
                    .map(|chunk| u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]])),
            );
        }

        Ok(fat)
    }

    fn load_directory(&self) -> Result<Vec<DirectoryEntry>> {
        let chain = follow_chain(self.header.first_directory_sector, &self.fat)?;

        let mut entries = Vec::new();
        for sector in chain {
            let data = self.sector(sector)?;
            for raw in data.chunks_exact(ENTRY_SIZE) {
                entries.push(DirectoryEntry::parse(raw, self.header.major_version)?);
            }
        }

        Ok(entries)
    }

    fn load_mini_fat(&self) -> Result<Vec<u32>> {
        if self.header.mini_fat_sector_count == 0 {
            return Ok(Vec::new());
        }

        let chain = follow_chain(self.header.first_mini_fat_sector, &self.fat)?;
        let mut mini_fat = Vec::with_capacity(chain.len() * self.header.sector_size() / 4);
        for sector in chain {
            let data = self.sector(sector)?;
            mini_fat.extend(
                data.chunks_exact(4)
                    .map(|chunk| u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]])),
            );
        }

        Ok(mini_fat)
    }

    /// Walks the red-black tree below `child` and returns the stream ids sorted by id.
    fn collect_streams(&self, child: u32) -> Result<Vec<u32>> {
        let mut visited = vec![false; self.entries.len()];
        let mut pending = vec![child];
        let mut streams = Vec::new();

        while let Some(id) = pending.pop() {
            if id == NOSTREAM {
                continue;
            }

            let Some(entry) = self.entries.get(id as usize) else {
                return Err(malformed_error!("Directory entry id out of range - {}", id));
            };
            if std::mem::replace(&mut visited[id as usize], true) {
                return Err(malformed_error!("Directory tree contains a cycle at {}", id));
            }

            if entry.object_type == ObjectType::Stream {
                streams.push(id);
            }
            pending.push(entry.right);
            pending.push(entry.left);
        }

        streams.sort_unstable();
        Ok(streams)
    }

    /// Assembles `size` bytes from a sector chain, in the mini stream when `mini` is set.
    fn read_chain(&self, start: u32, size: u64, mini: bool) -> Result<Vec<u8>> {
        let size = usize::try_from(size).map_err(|_| Error::OutOfBounds)?;
        if size == 0 {
            return Ok(Vec::new());
        }

        let (table, sector_size) = if mini {
            (&self.mini_fat, self.header.mini_sector_size())
        } else {
            (&self.fat, self.header.sector_size())
        };

        let chain = follow_chain(start, table)?;
        if chain.len().saturating_mul(sector_size) < size {
            return Err(malformed_error!(
                "Sector chain holds {} bytes, stream declares {}",
                chain.len() * sector_size,
                size
            ));
        }

        let mut data = Vec::with_capacity(size);
        for sector in chain {
            let chunk = if mini {
                let offset = sector as usize * sector_size;
                self.mini_stream
                    .get(offset..offset + sector_size)
                    .ok_or(Error::OutOfBounds)?
            } else {
                self.sector(sector)?
            };

            let wanted = (size - data.len()).min(sector_size);
            data.extend_from_slice(&chunk[..wanted]);
            if data.len() == size {
                break;
            }
        }

        Ok(data)
    }
}

/// Follows a sector chain through an allocation table until [`ENDOFCHAIN`].
///
/// A chain longer than the table can only be a loop and is rejected.
fn follow_chain(start: u32, table: &[u32]) -> Result<Vec<u32>> {
    let mut chain = Vec::new();
    let mut current = start;

    while current != ENDOFCHAIN {
        if current > MAXREGSECT || current as usize >= table.len() {
            return Err(malformed_error!("Invalid sector in chain - {:#x}", current));
        }
        if chain.len() >= table.len() {
            return Err(malformed_error!("Sector chain starting at {} loops", start));
        }

        chain.push(current);
        current = table[current as usize];
    }

    Ok(chain)
}

/// Forward-only iterator over the streams of a [`CompoundFile`]
pub struct Streams<'a> {
    file: &'a CompoundFile,
    ids: std::slice::Iter<'a, u32>,
}

impl<'a> Iterator for Streams<'a> {
    type Item = StreamEntry<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = *self.ids.next()?;
        Some(StreamEntry {
            file: self.file,
            entry: &self.file.entries[id as usize],
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.ids.size_hint()
    }
}

/// A named stream inside a [`CompoundFile`]
pub struct StreamEntry<'a> {
    file: &'a CompoundFile,
    entry: &'a DirectoryEntry,
}

impl StreamEntry<'_> {
    /// Name of the stream
    #[must_use]
    pub fn name(&self) -> &str {
        &self.entry.name
    }

    /// Declared length of the stream in bytes
    #[must_use]
    pub fn len(&self) -> u64 {
        self.entry.size
    }

    /// Returns `true` for a zero-length stream
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entry.size == 0
    }

    /// Reads the whole stream.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the sector chain is broken or shorter than the
    /// declared length.
    pub fn read(&self) -> Result<Vec<u8>> {
        let mini = self.entry.size < u64::from(self.file.header.mini_stream_cutoff);
        self.file
            .read_chain(self.entry.start_sector, self.entry.size, mini)
    }
}
