//! Jump list assembly for an application identity.
//!
//! [`JumpListService`] ties the pieces together: it hashes an application identity into the
//! destinations file names, reads whichever of the two files exist and concatenates their
//! records, automatic destinations first. It also hosts the pinned applications enumeration,
//! which shares the configuration and the shell resolver.
//!
//! # Usage Examples
//!
//! ```rust,no_run
//! use jumpscope::{shell::NoInstalledApplications, JumpListConfig, JumpListService};
//!
//! let service = JumpListService::offline(JumpListConfig::offline());
//! for item in service.jump_list_items("Microsoft.Windows.Explorer", &NoInstalledApplications) {
//!     println!("[{}] {:?} -> {:?}", item.category, item.title, item.target_path);
//! }
//! ```

use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::{
    appid::AppIdHash,
    config::{JumpListConfig, KnownAppIds},
    decoder::LinkDecoder,
    destinations::{automatic, custom},
    pinned::PinnedAppResolver,
    records::{LinkRecord, PinnedAppRecord},
    shell::{InstalledApplications, KnownFolders, NoShell, ShellResolver},
};

/// Folder below the Recent folder holding automatic destinations
pub const AUTOMATIC_DESTINATIONS_DIR: &str = "AutomaticDestinations";
/// Folder below the Recent folder holding custom destinations
pub const CUSTOM_DESTINATIONS_DIR: &str = "CustomDestinations";
/// File extension of automatic destinations
pub const AUTOMATIC_DESTINATIONS_EXT: &str = "automaticDestinations-ms";
/// File extension of custom destinations
pub const CUSTOM_DESTINATIONS_EXT: &str = "customDestinations-ms";

/// Candidate destinations files of one application identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationFiles {
    /// Hash the file names are derived from
    pub hash: AppIdHash,
    /// `AutomaticDestinations/<hash>.automaticDestinations-ms`
    pub automatic: PathBuf,
    /// `CustomDestinations/<hash>.customDestinations-ms`
    pub custom: PathBuf,
}

impl DestinationFiles {
    /// Builds both candidate paths below `recent_dir`
    #[must_use]
    pub fn new(recent_dir: &Path, app_id: &str) -> DestinationFiles {
        let hash = AppIdHash::compute(app_id);
        DestinationFiles {
            hash,
            automatic: recent_dir
                .join(AUTOMATIC_DESTINATIONS_DIR)
                .join(format!("{hash}.{AUTOMATIC_DESTINATIONS_EXT}")),
            custom: recent_dir
                .join(CUSTOM_DESTINATIONS_DIR)
                .join(format!("{hash}.{CUSTOM_DESTINATIONS_EXT}")),
        }
    }
}

/// Reads jump lists and pinned applications.
///
/// The service holds read-only configuration only; every call decodes the files anew and no
/// state is shared between calls.
pub struct JumpListService<S: ShellResolver = NoShell> {
    config: JumpListConfig,
    known_app_ids: KnownAppIds,
    shell: S,
}

impl JumpListService<NoShell> {
    /// Creates a service without a platform shell
    #[must_use]
    pub fn offline(config: JumpListConfig) -> Self {
        JumpListService::new(config, NoShell)
    }
}

impl<S: ShellResolver> JumpListService<S> {
    /// Creates a service.
    ///
    /// # Arguments
    /// * `config` - Reader configuration
    /// * `shell` - Shell resolver used for enrichment and the pinned list
    #[must_use]
    pub fn new(config: JumpListConfig, shell: S) -> Self {
        let known_app_ids = config.known_app_ids();
        JumpListService {
            config,
            known_app_ids,
            shell,
        }
    }

    /// The configuration
    #[must_use]
    pub fn config(&self) -> &JumpListConfig {
        &self.config
    }

    /// The shell resolver
    #[must_use]
    pub fn shell(&self) -> &S {
        &self.shell
    }

    /// Candidate destinations files of `app_id`, `None` when the Recent folder is unknown
    #[must_use]
    pub fn destination_files(&self, app_id: &str) -> Option<DestinationFiles> {
        let recent_dir = self.config.recent_dir()?;
        Some(DestinationFiles::new(&recent_dir, app_id))
    }

    /// Jump list of an application identity: automatic destinations, then custom ones.
    ///
    /// Missing files contribute nothing. A damaged file contributes what was decoded before
    /// the damage and never prevents the other file from being read.
    ///
    /// # Arguments
    /// * `app_id` - Explicit application identity or path based identity
    /// * `installed` - Store package lookup used during enrichment
    #[must_use]
    pub fn jump_list_items(
        &self,
        app_id: &str,
        installed: &dyn InstalledApplications,
    ) -> Vec<LinkRecord> {
        let Some(files) = self.destination_files(app_id) else {
            debug!("No Recent folder, no jump list for {app_id}");
            return Vec::new();
        };

        let decoder = LinkDecoder::new(
            self.config.enrichment,
            &self.known_app_ids,
            &self.shell,
            installed,
        );
        let limit = self.config.category_limit;

        let mut items = Vec::new();
        if files.automatic.exists() {
            items.extend(automatic::read_file(&files.automatic, &decoder, limit).items);
        }
        if files.custom.exists() {
            items.extend(custom::read_file(&files.custom, &decoder, limit).items);
        }

        info!(
            "Jump list of {app_id} ({}): {} items",
            files.hash,
            items.len()
        );
        items
    }

    /// Jump list of an executable without an explicit application identity.
    ///
    /// The identity is the configured known application id of the executable, else its path
    /// with the known folder prefix rewritten to `{GUID}` form.
    #[must_use]
    pub fn jump_list_items_for_executable(
        &self,
        executable: &str,
        known_folders: &KnownFolders,
        installed: &dyn InstalledApplications,
    ) -> Vec<LinkRecord> {
        let app_id = self.app_id_for_executable(executable, known_folders);
        self.jump_list_items(&app_id, installed)
    }

    /// Application identity derived from an executable path
    #[must_use]
    pub fn app_id_for_executable(&self, executable: &str, known_folders: &KnownFolders) -> String {
        match self.known_app_ids.by_path(executable) {
            Some(app_id) => app_id.to_string(),
            None => known_folders.replace_with_guid(executable),
        }
    }

    /// Applications pinned to the taskbar, empty when disabled in the configuration
    #[must_use]
    pub fn pinned_applications(&self, known_folders: &KnownFolders) -> Vec<PinnedAppRecord> {
        if !self.config.show_pinned_apps {
            return Vec::new();
        }

        PinnedAppResolver::new(&self.shell, known_folders).resolve()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::{
        config::Enrichment,
        records::PropertySubset,
        shell::NoInstalledApplications,
        shelllink::propstore::keys,
        test::{CompoundFileBuilder, CustomDestinationsBuilder, LinkBuilder, MockPinnedItem, MockShell},
    };
    use uguid::guid;

    fn config(recent: &Path) -> JumpListConfig {
        JumpListConfig {
            recent_dir: Some(recent.to_path_buf()),
            ..JumpListConfig::offline()
        }
    }

    fn write_both(recent: &Path, app_id: &str) -> DestinationFiles {
        let files = DestinationFiles::new(recent, app_id);
        std::fs::create_dir_all(files.automatic.parent().unwrap()).unwrap();
        std::fs::create_dir_all(files.custom.parent().unwrap()).unwrap();
        std::fs::write(
            &files.automatic,
            CompoundFileBuilder::new()
                .with_stream("DestList", vec![0; 32])
                .with_stream("1", LinkBuilder::new().with_local_path("C:\\recent.txt").build())
                .build(),
        )
        .unwrap();
        std::fs::write(
            &files.custom,
            CustomDestinationsBuilder::new()
                .with_tasks(vec![LinkBuilder::new().with_local_path("C:\\task.exe")])
                .build(),
        )
        .unwrap();
        files
    }

    #[test]
    fn file_names() {
        let files = DestinationFiles::new(Path::new("/recent"), "Microsoft.Windows.Explorer");
        assert_eq!(
            files.automatic,
            Path::new("/recent/AutomaticDestinations/f01b4d95cf55d32a.automaticDestinations-ms")
        );
        assert_eq!(
            files.custom,
            Path::new("/recent/CustomDestinations/f01b4d95cf55d32a.customDestinations-ms")
        );
    }

    #[test]
    fn automatic_then_custom() {
        let dir = tempfile::tempdir().unwrap();
        write_both(dir.path(), "Vendor.App");

        let service = JumpListService::offline(config(dir.path()));
        let items = service.jump_list_items("VENDOR.APP", &NoInstalledApplications);
        let summary: Vec<_> = items
            .iter()
            .map(|item| (item.category.as_str(), item.title.as_deref().unwrap_or_default()))
            .collect();
        assert_eq!(summary, [("Recent", "recent"), ("Tasks", "task")]);
    }

    #[test]
    fn only_one_file_present() {
        let dir = tempfile::tempdir().unwrap();
        let files = write_both(dir.path(), "Vendor.App");
        std::fs::remove_file(&files.automatic).unwrap();

        let service = JumpListService::offline(config(dir.path()));
        let items = service.jump_list_items("Vendor.App", &NoInstalledApplications);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].category, "Tasks");

        assert!(service
            .jump_list_items("Other.App", &NoInstalledApplications)
            .is_empty());
    }

    #[test]
    fn damaged_file_does_not_block_the_other() {
        let dir = tempfile::tempdir().unwrap();
        let files = write_both(dir.path(), "Vendor.App");
        std::fs::write(&files.automatic, b"not a compound file").unwrap();

        let service = JumpListService::offline(config(dir.path()));
        let items = service.jump_list_items("Vendor.App", &NoInstalledApplications);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title.as_deref(), Some("task"));
    }

    #[test]
    fn executable_identity() {
        let program_files = guid!("905e63b6-c1bf-494e-b29c-65b732d3d21a");
        let folders = KnownFolders::new().with_folder("C:\\Program Files", program_files);

        let dir = tempfile::tempdir().unwrap();
        write_both(
            dir.path(),
            "{905E63B6-C1BF-494E-B29C-65B732D3D21A}\\Vendor\\app.exe",
        );
        write_both(dir.path(), "Microsoft.Windows.Explorer");

        let service = JumpListService::offline(config(dir.path()));
        assert_eq!(
            service.app_id_for_executable("C:\\Windows\\explorer.exe", &folders),
            "Microsoft.Windows.Explorer"
        );
        assert_eq!(
            service
                .jump_list_items_for_executable(
                    "C:\\Program Files\\Vendor\\app.exe",
                    &folders,
                    &NoInstalledApplications
                )
                .len(),
            2
        );
        assert_eq!(
            service
                .jump_list_items_for_executable(
                    "C:\\Windows\\explorer.exe",
                    &folders,
                    &NoInstalledApplications
                )
                .len(),
            2
        );
    }

    #[test]
    fn enrichment_uses_installed_lookup() {
        let dir = tempfile::tempdir().unwrap();
        write_both(dir.path(), "Vendor.App");

        let mut installed = HashMap::new();
        installed.insert(
            "Microsoft.Windows.Explorer".to_string(),
            "Microsoft.Windows.Explorer_pkg".to_string(),
        );

        let files = DestinationFiles::new(dir.path(), "Vendor.App");
        std::fs::write(
            &files.custom,
            CustomDestinationsBuilder::new()
                .with_tasks(vec![LinkBuilder::new()
                    .with_local_path("C:\\Windows\\explorer.exe")
                    .with_property_store(
                        crate::test::PropertyStoreBuilder::new()
                            .with_string(keys::TITLE, "Explorer")
                            .build(),
                    )])
                .build(),
        )
        .unwrap();

        let service = JumpListService::new(
            JumpListConfig {
                enrichment: Enrichment::IdList,
                ..config(dir.path())
            },
            MockShell::default(),
        );
        let items = service.jump_list_items("Vendor.App", &installed);
        let task = items.iter().find(|item| item.category == "Tasks").unwrap();
        assert!(task.is_store_application);
        assert_eq!(task.target_path.as_deref(), Some("Microsoft.Windows.Explorer"));
        assert_eq!(task.title.as_deref(), Some("Explorer"));
    }

    #[test]
    fn pinned_applications_toggle() {
        let mut shell = MockShell::default();
        shell.pinned = Some(vec![
            MockPinnedItem::new(PropertySubset::default()).with_string(keys::PINNED_TITLE, "Pinned")
        ]);
        let folders = KnownFolders::new();

        let dir = tempfile::tempdir().unwrap();
        let enabled = JumpListConfig {
            show_pinned_apps: true,
            ..config(dir.path())
        };
        let service = JumpListService::new(enabled.clone(), shell);
        assert_eq!(service.pinned_applications(&folders).len(), 1);

        let disabled = JumpListConfig {
            show_pinned_apps: false,
            ..enabled
        };
        let service = JumpListService::new(disabled, service.shell);
        assert!(service.pinned_applications(&folders).is_empty());
        assert!(!service.config().show_pinned_apps);
    }
}
