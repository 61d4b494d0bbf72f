//! Value types produced by the destinations readers and the pinned applications resolver.

use strum::Display;

use crate::shell::Icon;

/// One jump list entry, or a category separator.
///
/// Records are plain values: nothing refers back to the file they were decoded from, and an
/// [`Icon`] is owned data that can be moved to another thread as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkRecord {
    /// Category label, `Recent`, `Tasks` or a title provided by the application
    pub category: String,
    /// Display title, always present on non-separator records
    pub title: Option<String>,
    /// Description (tooltip)
    pub description: Option<String>,
    /// Target path, or the application identity for store applications
    pub target_path: Option<String>,
    /// Command line arguments
    pub arguments: Option<String>,
    /// Working directory
    pub working_directory: Option<String>,
    /// Icon resource location
    pub icon_location: Option<String>,
    /// Icon index within the icon location
    pub icon_index: i32,
    /// Resolved icon
    pub icon: Option<Icon>,
    /// The target is a store (packaged) application
    pub is_store_application: bool,
    /// File name of the destinations file the record was decoded from
    pub source_file: String,
    /// The record only marks a boundary between items
    pub is_separator: bool,
}

impl LinkRecord {
    /// Creates a separator record.
    ///
    /// Category and source are kept for diagnostics, every other field is empty.
    #[must_use]
    pub fn separator(category: &str, source_file: &str) -> LinkRecord {
        LinkRecord {
            category: category.to_string(),
            source_file: source_file.to_string(),
            is_separator: true,
            ..LinkRecord::default()
        }
    }

    /// Returns `true` if the record points somewhere, i.e. it is not a separator
    #[must_use]
    pub fn has_target(&self) -> bool {
        !self.is_separator
    }
}

/// Kind of a pinned taskbar item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum PinnedAppKind {
    /// A store (packaged) application
    Package,
    /// A regular shortcut
    Link,
}

/// Shell properties of a pinned item or window, supplied by the shell resolver
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertySubset {
    /// The item is an application
    pub is_application: bool,
    /// The item is a store (packaged) application
    pub is_store_app: bool,
    /// Explicit application user model id
    pub application_user_model_id: Option<String>,
    /// Parsing path of the item (link path, or package identity)
    pub parsing_path: Option<String>,
    /// Parsing path of the link target
    pub link_target_parsing_path: Option<String>,
}

/// An application pinned to the taskbar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinnedAppRecord {
    /// Display title, `unknown` when the shell provides none
    pub title: String,
    /// Position in the pinned list
    pub order: usize,
    /// Package or link
    pub kind: PinnedAppKind,
    /// Shell properties of the pinned item
    pub shell_properties: PropertySubset,
    /// Application identity used to match windows and destinations files
    pub app_id: Option<String>,
    /// Executable (or package identity) the item launches
    pub executable: Option<String>,
}
