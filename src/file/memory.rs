use std::{fs, path::Path};

use super::Backend;
use crate::Result;

/// Owned buffer holding a destinations file, a link file or a caller supplied container.
///
/// Files are read completely when opened. The shell rewrites destinations files while they are
/// in use, so the buffer is a snapshot that later writes cannot change under the decoders.
#[derive(Debug, Default)]
pub struct Memory {
    data: Vec<u8>,
}

impl Memory {
    /// Takes ownership of `data`
    #[must_use]
    pub fn new(data: Vec<u8>) -> Memory {
        Memory { data }
    }

    /// Reads the file at `path` into memory.
    ///
    /// # Errors
    /// Returns [`crate::Error::FileError`] if the file cannot be read.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Memory> {
        Ok(Memory::new(fs::read(path)?))
    }
}

impl From<Vec<u8>> for Memory {
    fn from(data: Vec<u8>) -> Self {
        Memory::new(data)
    }
}

impl Backend for Memory {
    fn data(&self) -> &[u8] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn bounded_slices() {
        let mut header = Vec::new();
        for value in [2_i32, 3, 0] {
            header.extend_from_slice(&value.to_le_bytes());
        }
        let memory = Memory::from(header);

        assert_eq!(memory.len(), 12);
        assert_eq!(memory.data_slice(4, 4).unwrap(), &[3, 0, 0, 0]);
        assert!(memory.data_slice(12, 0).unwrap().is_empty());
        assert!(matches!(memory.data_slice(8, 5), Err(Error::OutOfBounds)));
        assert!(matches!(
            memory.data_slice(usize::MAX, 2),
            Err(Error::OutOfBounds)
        ));
    }

    #[test]
    fn empty() {
        let memory = Memory::default();
        assert!(memory.is_empty());
        assert!(memory.data_slice(0, 1).is_err());
    }

    #[test]
    fn file_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.customDestinations-ms");
        std::fs::write(&path, [0x02, 0x00, 0x00, 0x00, 0xAB, 0xFB, 0xBF, 0xBA]).unwrap();

        let memory = Memory::from_file(&path).unwrap();
        std::fs::write(&path, b"").unwrap();

        assert_eq!(memory.len(), 8);
        assert_eq!(memory.data_slice(4, 4).unwrap(), &[0xAB, 0xFB, 0xBF, 0xBA]);
        assert!(Memory::from_file(&path).unwrap().is_empty());
    }

    #[test]
    fn missing_file() {
        let dir = tempfile::tempdir().unwrap();
        match Memory::from_file(dir.path().join("missing.automaticDestinations-ms")) {
            Err(Error::FileError(io_error)) => {
                assert_eq!(io_error.kind(), std::io::ErrorKind::NotFound);
            }
            _ => panic!("Expected FileError"),
        }
    }
}
