//! Jump list reader configuration.
//!
//! [`JumpListConfig`] is read-only once a [`crate::JumpListService`] is built from it. It
//! deserializes from JSON with every field optional, so a host can keep it in its settings
//! file:
//!
//! ```rust
//! use jumpscope::{Enrichment, JumpListConfig};
//!
//! let config = JumpListConfig::from_json(
//!     r#"{ "category_limit": 5, "enrichment": "temp_file", "known_app_ids": { "notepad.exe": "Vendor.Notepad" } }"#,
//! )?;
//! assert_eq!(config.category_limit, 5);
//! assert_eq!(config.enrichment, Enrichment::TempFile);
//! assert!(config.show_pinned_apps);
//! # Ok::<(), jumpscope::Error>(())
//! ```

use std::{
    collections::{BTreeMap, HashMap},
    path::PathBuf,
};

use serde::{Deserialize, Serialize};

use crate::Result;

/// Default number of items emitted per limited category
pub const DEFAULT_CATEGORY_LIMIT: usize = 10;

/// How decoded links are enriched through the shell
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Enrichment {
    /// Only the natively decoded link data is used
    Disabled,
    /// Properties come from the link itself, the icon from the shell item bound through the
    /// link's id list
    #[default]
    IdList,
    /// The link is written to a temporary `.lnk` file and the shell item of that file provides
    /// properties and icon
    TempFile,
}

/// Configuration of the jump list reader
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JumpListConfig {
    /// Maximum number of items emitted per limited category (`Recent` and custom categories)
    pub category_limit: usize,
    /// Enrichment strategy
    pub enrichment: Enrichment,
    /// Whether pinned applications are enumerated at all
    pub show_pinned_apps: bool,
    /// Executable path or file name → application identity overrides
    pub known_app_ids: BTreeMap<String, String>,
    /// Override of the per-user `Recent` folder holding the destinations directories
    pub recent_dir: Option<PathBuf>,
}

impl Default for JumpListConfig {
    fn default() -> Self {
        let mut known_app_ids = BTreeMap::new();
        known_app_ids.insert(
            "explorer.exe".to_string(),
            "Microsoft.Windows.Explorer".to_string(),
        );

        JumpListConfig {
            category_limit: DEFAULT_CATEGORY_LIMIT,
            enrichment: Enrichment::default(),
            show_pinned_apps: true,
            known_app_ids,
            recent_dir: None,
        }
    }
}

impl JumpListConfig {
    /// Configuration using only natively decoded data: no shell enrichment, no pinned list.
    #[must_use]
    pub fn offline() -> Self {
        JumpListConfig {
            enrichment: Enrichment::Disabled,
            show_pinned_apps: false,
            ..JumpListConfig::default()
        }
    }

    /// Deserializes a configuration from JSON, missing fields take their defaults.
    ///
    /// # Errors
    /// Returns [`crate::Error::Config`] for invalid JSON or mistyped fields.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Folder holding `AutomaticDestinations` and `CustomDestinations`.
    ///
    /// Defaults to `<roaming app data>/Microsoft/Windows/Recent`; `None` when that cannot be
    /// determined on this system.
    #[must_use]
    pub fn recent_dir(&self) -> Option<PathBuf> {
        self.recent_dir.clone().or_else(|| {
            dirs::data_dir().map(|dir| dir.join("Microsoft").join("Windows").join("Recent"))
        })
    }

    /// Builds the lookup table of the configured application identity overrides
    #[must_use]
    pub fn known_app_ids(&self) -> KnownAppIds {
        KnownAppIds::new(&self.known_app_ids)
    }
}

/// Case-insensitive executable → application identity table.
///
/// Each configured key is stored lowercase; keys containing a directory are additionally
/// stored under their file name, so an override for `C:\Tools\app.exe` also matches a link
/// pointing at `app.exe` elsewhere.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KnownAppIds {
    ids: HashMap<String, String>,
}

impl KnownAppIds {
    /// Builds the table from configured pairs
    #[must_use]
    pub fn new(pairs: &BTreeMap<String, String>) -> KnownAppIds {
        let mut ids = HashMap::new();
        for (executable, app_id) in pairs {
            let key = executable.to_lowercase();
            let name = file_name(&key).to_string();
            if name != key {
                ids.entry(name).or_insert_with(|| app_id.clone());
            }
            ids.insert(key, app_id.clone());
        }

        KnownAppIds { ids }
    }

    /// Looks up a full executable path, then its file name
    #[must_use]
    pub fn by_path(&self, executable: &str) -> Option<&str> {
        let key = executable.to_lowercase();
        self.ids
            .get(&key)
            .or_else(|| self.ids.get(file_name(&key)))
            .map(String::as_str)
    }

    /// Looks up the file name of `path` only
    #[must_use]
    pub fn by_file_name(&self, path: &str) -> Option<&str> {
        let name = file_name(path).to_lowercase();
        if name.is_empty() {
            return None;
        }

        self.ids.get(&name).map(String::as_str)
    }

    /// Number of lookup keys
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns `true` if no overrides are configured
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// File name component of a Windows or POSIX style path
pub(crate) fn file_name(path: &str) -> &str {
    path.rsplit(['\\', '/']).next().unwrap_or(path)
}

/// File name without its last extension
pub(crate) fn file_stem(path: &str) -> &str {
    let name = file_name(path);
    match name.rfind('.') {
        Some(0) | None => name,
        Some(dot) => &name[..dot],
    }
}
