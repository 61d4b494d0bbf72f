//! External shell collaborators.
//!
//! Decoding destinations files is self-contained, but turning the decoded links into what a
//! user sees (localized titles, icons, store application logos, the pinned taskbar list) needs
//! the platform shell. Those services are modelled as traits so the readers stay portable and
//! testable:
//!
//! - [`ShellResolver`] - shell items, indirect strings, icons, package assets, pinned list
//! - [`InstalledApplications`] - store package lookup by application identity
//! - [`PropertyBag`] - typed property access on a shell item
//! - [`KnownFolders`] - known folder prefixes used in path based identities
//!
//! Every [`ShellResolver`] method defaults to "absent", so [`NoShell`] is a complete resolver
//! for platforms without a shell: records are still produced from the native link data.

use std::{collections::HashMap, path::Path, path::PathBuf};

use uguid::Guid;

use crate::{
    records::PropertySubset,
    shelllink::propstore::{PropertyKey, PropertyStore, PropertyValue},
    Result,
};

/// An image produced by the shell resolver.
///
/// Icons are owned values. A resolver backed by thread-affine native objects must copy the
/// pixels out before returning them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Icon {
    /// Decoded pixels, 32-bit BGRA rows
    Bitmap {
        /// Width in pixels
        width: u32,
        /// Height in pixels
        height: u32,
        /// Pixel data, `width * height * 4` bytes
        pixels: Vec<u8>,
    },
    /// An image file on disk, such as a package logo asset
    File(PathBuf),
}

/// Typed property lookup on a shell item
pub trait PropertyBag {
    /// Returns the value of `key`, `None` when the item does not have the property
    fn value(&self, key: &PropertyKey) -> Option<PropertyValue>;

    /// Returns the non-empty string value of `key`
    fn string(&self, key: &PropertyKey) -> Option<String> {
        self.value(key)
            .and_then(|value| value.as_str().map(str::to_string))
    }

    /// Returns the boolean value of `key`
    fn boolean(&self, key: &PropertyKey) -> Option<bool> {
        self.value(key).and_then(|value| value.as_bool())
    }
}

impl PropertyBag for PropertyStore {
    fn value(&self, key: &PropertyKey) -> Option<PropertyValue> {
        self.get(key).cloned()
    }
}

impl PropertyBag for HashMap<PropertyKey, PropertyValue> {
    fn value(&self, key: &PropertyKey) -> Option<PropertyValue> {
        self.get(key).cloned()
    }
}

/// A shell item resolved from an id list or a path
#[derive(Default)]
pub struct ShellItem {
    /// Icon of the item
    pub icon: Option<Icon>,
    /// Properties of the item
    pub properties: Option<Box<dyn PropertyBag>>,
}

/// Access to the platform shell.
///
/// Implementations must not panic; failures are reported as absence.
pub trait ShellResolver {
    /// Binds to a shell item through a serialized item id list
    fn item_from_id_list(&self, _id_list: &[u8]) -> Option<ShellItem> {
        None
    }

    /// Binds to a shell item through a file system path
    fn item_from_path(&self, _path: &Path) -> Option<ShellItem> {
        None
    }

    /// Resolves an indirect (`@`-prefixed) resource string, optionally within a package
    fn indirect_string(&self, _value: &str, _package_full_name: Option<&str>) -> Option<String> {
        None
    }

    /// Loads a small icon from a resource location and index
    fn resource_icon(&self, _location: &str, _index: i32) -> Option<Icon> {
        None
    }

    /// Root directory of an installed package
    fn package_path(&self, _package_full_name: &str) -> Option<PathBuf> {
        None
    }

    /// Resolves a package relative image asset at the requested pixel size
    fn package_image_asset(
        &self,
        _package_full_name: &str,
        _asset: &str,
        _size: u32,
    ) -> Option<PathBuf> {
        None
    }

    /// Opens the list of applications pinned to the taskbar.
    ///
    /// `None` when the list is not available on this system.
    fn pinned_list(&self) -> Option<Box<dyn PinnedList + '_>> {
        None
    }
}

/// A resolver without a platform shell
#[derive(Debug, Clone, Copy, Default)]
pub struct NoShell;

impl ShellResolver for NoShell {}

/// Pull enumeration of pinned taskbar items
pub trait PinnedList {
    /// Returns the next item, `Ok(None)` at the end of the list.
    ///
    /// # Errors
    /// Returns [`crate::Error::Shell`] when the item cannot be bound.
    fn next_item(&mut self) -> Result<Option<Box<dyn PinnedItem>>>;
}

/// A pinned taskbar item
pub trait PinnedItem: PropertyBag {
    /// The shell property subset of the item
    fn shell_properties(&self) -> PropertySubset;
}

/// Store package lookup by application identity
pub trait InstalledApplications {
    /// Package full name of the store application with `app_id`, `None` for anything else
    fn package_full_name(&self, app_id: &str) -> Option<String>;
}

/// Lookup without any installed store applications
#[derive(Debug, Clone, Copy, Default)]
pub struct NoInstalledApplications;

impl InstalledApplications for NoInstalledApplications {
    fn package_full_name(&self, _app_id: &str) -> Option<String> {
        None
    }
}

/// Application identity → package full name, exact match first, then case-insensitive
impl InstalledApplications for HashMap<String, String> {
    fn package_full_name(&self, app_id: &str) -> Option<String> {
        self.get(app_id).cloned().or_else(|| {
            self.iter()
                .find(|(id, _)| id.eq_ignore_ascii_case(app_id))
                .map(|(_, package)| package.clone())
        })
    }
}

/// Known folder paths and their ids.
///
/// Path based application identities use `{GUID}\relative\path` instead of the absolute
/// path when the executable lives below a known folder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KnownFolders {
    folders: Vec<(String, Guid)>,
}

impl KnownFolders {
    /// Creates an empty table
    #[must_use]
    pub fn new() -> KnownFolders {
        KnownFolders::default()
    }

    /// Adds a known folder
    #[must_use]
    pub fn with_folder(mut self, path: &str, id: Guid) -> KnownFolders {
        self.folders
            .push((path.trim_end_matches('\\').to_string(), id));
        self
    }

    /// Number of known folders
    #[must_use]
    pub fn len(&self) -> usize {
        self.folders.len()
    }

    /// Returns `true` if no folders are known
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.folders.is_empty()
    }

    /// Rewrites the longest known folder prefix of `path` (case-insensitive, on a component
    /// boundary) to its `{GUID}` form. Paths outside known folders are returned unchanged.
    #[must_use]
    pub fn replace_with_guid(&self, path: &str) -> String {
        let best = self
            .folders
            .iter()
            .filter(|(folder, _)| !folder.is_empty() && is_folder_prefix(path, folder))
            .max_by_key(|(folder, _)| folder.len());

        match best {
            Some((folder, id)) => format!(
                "{{{}}}{}",
                id.to_string().to_uppercase(),
                &path[folder.len()..]
            ),
            None => path.to_string(),
        }
    }
}

fn is_folder_prefix(path: &str, folder: &str) -> bool {
    let Some(head) = path.get(..folder.len()) else {
        return false;
    };

    head.eq_ignore_ascii_case(folder)
        && matches!(path[folder.len()..].chars().next(), None | Some('\\'))
}
