//! Applications pinned to the taskbar.
//!
//! The pinned list is owned by the shell and enumerated through [`ShellResolver::pinned_list`].
//! Every item is turned into a [`PinnedAppRecord`] with three independent resolution chains,
//! each an ordered list of strategies where the first present value wins:
//!
//! - title: pinned title property, display name, `unknown`
//! - executable: package identity of store applications, the link target when it is an
//!   executable, the target of the `.lnk` file itself, the parsing path
//! - application identity: the explicit application user model id, else the executable with
//!   its known folder prefix rewritten to `{GUID}` form
//!
//! A missing pinned list or a failing enumeration yields fewer records, never an error.

use std::path::Path;

use log::{debug, warn};

use crate::{
    records::{PinnedAppKind, PinnedAppRecord, PropertySubset},
    shell::{KnownFolders, PinnedItem, ShellResolver},
    shelllink::{propstore::keys, ShellLink},
};

/// Title of a pinned item without any usable name
pub const UNKNOWN_TITLE: &str = "unknown";

type TitleStrategy = fn(&dyn PinnedItem) -> Option<String>;

const TITLE_STRATEGIES: [TitleStrategy; 2] = [pinned_title, display_name];

fn pinned_title(item: &dyn PinnedItem) -> Option<String> {
    item.string(&keys::PINNED_TITLE)
}

fn display_name(item: &dyn PinnedItem) -> Option<String> {
    item.string(&keys::ITEM_NAME_DISPLAY)
}

type ExecutableStrategy = fn(&PropertySubset) -> Option<String>;

const EXECUTABLE_STRATEGIES: [ExecutableStrategy; 4] = [
    package_identity,
    executable_link_target,
    link_file_target,
    parsing_path,
];

fn package_identity(properties: &PropertySubset) -> Option<String> {
    if properties.is_store_app {
        properties.parsing_path.clone()
    } else {
        None
    }
}

fn executable_link_target(properties: &PropertySubset) -> Option<String> {
    if properties.is_store_app {
        return None;
    }

    properties
        .link_target_parsing_path
        .clone()
        .filter(|target| is_executable_file(Path::new(target)))
}

/// Target of the pinned `.lnk` file itself, for links whose target is not an executable
fn link_file_target(properties: &PropertySubset) -> Option<String> {
    if properties.is_store_app || properties.link_target_parsing_path.is_none() {
        return None;
    }

    let link_path = properties.parsing_path.as_deref()?;
    if !Path::new(link_path).is_file() {
        return None;
    }

    match ShellLink::from_file(link_path) {
        Ok(link) => link.target_path(),
        Err(error) => {
            debug!("Pinned link {link_path} could not be decoded - {error}");
            None
        }
    }
}

fn parsing_path(properties: &PropertySubset) -> Option<String> {
    properties.parsing_path.clone()
}

fn is_executable_file(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .is_some_and(|extension| extension.eq_ignore_ascii_case("exe"))
}

/// Resolves the applications pinned to the taskbar
pub struct PinnedAppResolver<'a> {
    shell: &'a dyn ShellResolver,
    known_folders: &'a KnownFolders,
}

impl<'a> PinnedAppResolver<'a> {
    /// Creates a resolver.
    ///
    /// # Arguments
    /// * `shell` - Provides the pinned list
    /// * `known_folders` - Known folders used to build path based application identities
    #[must_use]
    pub fn new(shell: &'a dyn ShellResolver, known_folders: &'a KnownFolders) -> Self {
        PinnedAppResolver {
            shell,
            known_folders,
        }
    }

    /// Enumerates the pinned list to its end, in list order.
    ///
    /// Enumeration stops at the first item the shell fails to provide; records collected so
    /// far are returned.
    #[must_use]
    pub fn resolve(&self) -> Vec<PinnedAppRecord> {
        let mut records = Vec::new();
        let Some(mut list) = self.shell.pinned_list() else {
            debug!("Pinned application list is not available");
            return records;
        };

        loop {
            let item = match list.next_item() {
                Ok(Some(item)) => item,
                Ok(None) => break,
                Err(error) => {
                    warn!("Pinned application enumeration stopped - {error}");
                    break;
                }
            };

            let record = self.record(item.as_ref(), records.len());
            debug!(
                "Pinned application {}: {} ({}) {}",
                record.order,
                record.title,
                record.kind,
                record.app_id.as_deref().unwrap_or_default()
            );
            records.push(record);
        }

        records
    }

    /// Builds the record of one pinned item at position `order`
    #[must_use]
    pub fn record(&self, item: &dyn PinnedItem, order: usize) -> PinnedAppRecord {
        let shell_properties = item.shell_properties();

        let kind = if shell_properties.is_store_app {
            PinnedAppKind::Package
        } else {
            PinnedAppKind::Link
        };

        let title = TITLE_STRATEGIES
            .iter()
            .find_map(|strategy| strategy(item))
            .unwrap_or_else(|| UNKNOWN_TITLE.to_string());

        let executable = EXECUTABLE_STRATEGIES
            .iter()
            .find_map(|strategy| strategy(&shell_properties));

        let app_id = shell_properties
            .application_user_model_id
            .clone()
            .filter(|app_id| !app_id.is_empty())
            .or_else(|| {
                executable
                    .as_deref()
                    .map(|executable| self.known_folders.replace_with_guid(executable))
            });

        PinnedAppRecord {
            title,
            order,
            kind,
            shell_properties,
            app_id,
            executable,
        }
    }
}
