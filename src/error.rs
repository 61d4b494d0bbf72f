use thiserror::Error;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// Most of these never reach a caller of [`crate::JumpListService`]: destinations files and
/// the pinned list are decoded behind a file-level boundary that logs the error and keeps
/// whatever was collected so far. The lower level readers ([`crate::cfb::CompoundFile`],
/// [`crate::shelllink::ShellLink`], [`crate::destinations`]) do surface them.
///
/// # Error Categories
///
/// ## Container and stream errors
/// - [`Error::ContainerOpen`] - The compound container could not be opened
/// - [`Error::Malformed`] - Corrupted or invalid structure, the stream position is lost
/// - [`Error::OutOfBounds`] - Attempted to read beyond the end of the data
/// - [`Error::UnsupportedCategory`] - Unknown category kind in a custom destinations file
/// - [`Error::NotSupported`] - Unsupported container version or feature
/// - [`Error::Empty`] - Empty input provided
///
/// ## External errors
/// - [`Error::FileError`] - Filesystem I/O errors
/// - [`Error::Shell`] - A shell collaborator failed
/// - [`Error::Config`] - Configuration could not be deserialized
///
/// # Examples
///
/// ```rust,no_run
/// use jumpscope::{cfb::CompoundFile, Error};
///
/// match CompoundFile::open("f01b4d95cf55d32a.automaticDestinations-ms") {
///     Ok(container) => println!("{} streams", container.streams().count()),
///     Err(Error::ContainerOpen { path, source }) => eprintln!("{path}: {source}"),
///     Err(e) => eprintln!("Other error: {e}"),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// The data is damaged and could not be parsed.
    ///
    /// When this is returned while decoding an embedded object, the position within the
    /// enclosing stream can no longer be trusted and the remaining items must be abandoned.
    ///
    /// # Fields
    ///
    /// * `message` - Detailed description of what was malformed
    /// * `file` - Source file where the error was detected
    /// * `line` - Source line where the error was detected
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// An out of bound access was attempted while parsing the data.
    #[error("Out of Bound read would have occurred!")]
    OutOfBounds,

    /// This container version or feature is not supported.
    #[error("This file type is not supported")]
    NotSupported,

    /// Provided input was empty.
    #[error("Provided input was empty")]
    Empty,

    /// File I/O error.
    #[error("{0}")]
    FileError(#[from] std::io::Error),

    /// The path does not exist or is not a valid compound container.
    #[error("Could not open compound container {path} - {source}")]
    ContainerOpen {
        /// Path of the container that failed to open
        path: String,
        /// The underlying reason
        #[source]
        source: Box<Error>,
    },

    /// A custom destinations file declares a category kind this library does not know.
    ///
    /// The associated value is the raw category type read from the file.
    #[error("Unsupported destinations category type - {0}")]
    UnsupportedCategory(i32),

    /// An external shell collaborator failed or is unavailable on this system.
    #[error("Shell - {0}")]
    Shell(String),

    /// The configuration could not be deserialized.
    #[error("{0}")]
    Config(#[from] serde_json::Error),
}

impl Error {
    /// Returns `true` when the error means the enclosing stream position is no longer
    /// trustworthy, so remaining items of the stream or category have to be abandoned.
    #[must_use]
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            Error::Malformed { .. } | Error::OutOfBounds | Error::UnsupportedCategory(_)
        )
    }
}
