// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![deny(unsafe_code)]

//! # jumpscope
//!
//! A cross-platform decoder for shell jump lists: the per-application
//! `*.automaticDestinations-ms` and `*.customDestinations-ms` files that record recent items,
//! application defined categories and tasks, plus the list of applications pinned to the
//! taskbar.
//!
//! Built in pure Rust, `jumpscope` decodes both container formats and the shell links embedded
//! in them natively. Everything that needs the platform shell (localized titles, icons, store
//! application logos, the pinned list) goes through the [`shell::ShellResolver`] trait, so the
//! decoders run anywhere and a host on Windows plugs in the real shell.
//!
//! ## Features
//!
//! - **Compound file reader** - Read-only structured storage for automatic destinations
//! - **Custom destinations** - Custom categories, known categories and tasks
//! - **Native shell links** - Header, id list, link info, string data, extra data and
//!   property store decoding
//! - **Enrichment** - Store application detection, indirect strings, logos and icons through a
//!   pluggable shell resolver
//! - **Fault containment** - A damaged file yields the items decoded before the damage, never a
//!   panic
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use jumpscope::prelude::*;
//!
//! let service = JumpListService::offline(JumpListConfig::default());
//! let items = service.jump_list_items("Microsoft.Windows.Explorer", &NoInstalledApplications);
//! for item in items.iter().filter(|item| !item.is_separator) {
//!     println!("[{}] {}", item.category, item.title.as_deref().unwrap_or_default());
//! }
//! ```
//!
//! ### File names
//!
//! Destinations files are named after a CRC-64 of the application identity:
//!
//! ```rust
//! use jumpscope::AppIdHash;
//!
//! assert_eq!(AppIdHash::compute("Microsoft.Windows.Explorer").to_string(), "f01b4d95cf55d32a");
//! ```
//!
//! ## Architecture
//!
//! - [`appid`] - Identity hash and destinations file names
//! - [`cfb`] - Compound file container reader
//! - [`shelllink`] - Shell link decoding
//! - [`destinations`] - Automatic and custom destinations readers
//! - [`decoder`] - Link → record conversion and enrichment
//! - [`pinned`] - Pinned taskbar applications
//! - [`jumplist`] - [`JumpListService`], tying everything together
//! - [`shell`] - External collaborator traits
//!
//! ## Error Handling
//!
//! Low level decoders return [`Result`]. The file level readers and [`JumpListService`] never
//! fail: they log through the `log` facade and return fewer records instead. The partial result
//! of a single file together with the reason it stopped is available through
//! [`destinations::Destinations`].

#[macro_use]
pub(crate) mod error;
pub(crate) mod file;

/// Shared functionality which is used in unit-tests
#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types and traits.
///
/// ```rust,no_run
/// use jumpscope::prelude::*;
///
/// let service = JumpListService::offline(JumpListConfig::offline());
/// let pinned = service.pinned_applications(&KnownFolders::new());
/// assert!(pinned.is_empty());
/// ```
pub mod prelude;

/// Application identity hashing.
pub mod appid;

/// Read-only compound file (structured storage) container.
pub mod cfb;

/// Reader configuration.
pub mod config;

/// Conversion of embedded shell links into records, including shell enrichment.
pub mod decoder;

/// Automatic and custom destinations file readers.
pub mod destinations;

/// Jump list assembly.
pub mod jumplist;

/// Pinned taskbar applications.
pub mod pinned;

/// Records produced by this crate.
pub mod records;

/// External shell collaborators.
pub mod shell;

/// Native shell link decoding.
pub mod shelllink;

/// `jumpscope` Result type
///
/// A type alias for `std::result::Result<T, Error>` where the error type is always [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// `jumpscope` Error type
///
/// The main error type for all operations in this crate.
///
/// # Example
///
/// ```rust,no_run
/// use jumpscope::{cfb::CompoundFile, Error};
///
/// match CompoundFile::open("f01b4d95cf55d32a.automaticDestinations-ms") {
///     Ok(container) => println!("{} streams", container.streams().count()),
///     Err(Error::ContainerOpen { path, source }) => println!("{path}: {source}"),
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
pub use error::Error;

/// Low-level parsing cursor used by every decoder.
///
/// # Example
///
/// ```rust
/// use jumpscope::Parser;
///
/// let mut parser = Parser::new(&[0x02, 0x00, 0x00, 0x00]);
/// assert_eq!(parser.read_le::<i32>()?, 2);
/// # Ok::<(), jumpscope::Error>(())
/// ```
pub use file::parser::Parser;

pub use appid::AppIdHash;
pub use config::{Enrichment, JumpListConfig};
pub use jumplist::JumpListService;
pub use records::{LinkRecord, PinnedAppKind, PinnedAppRecord, PropertySubset};
