//! # jumpscope Prelude
//!
//! This module provides a convenient prelude for the most commonly used types and traits
//! from the jumpscope library. Import this module to get quick access to the essential
//! types for reading jump lists and pinned applications.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all jumpscope operations
pub use crate::Error;

/// The result type used throughout jumpscope
pub use crate::Result;

/// Reader configuration
pub use crate::config::{Enrichment, JumpListConfig, KnownAppIds};

// ================================================================================================
// Main Entry Points
// ================================================================================================

/// Jump list and pinned applications entry point
pub use crate::jumplist::{DestinationFiles, JumpListService};

/// Identity hash used in destinations file names
pub use crate::AppIdHash;

/// Low-level parsing cursor
pub use crate::Parser;

// ================================================================================================
// Records
// ================================================================================================

/// Values produced by the readers
pub use crate::records::{LinkRecord, PinnedAppKind, PinnedAppRecord, PropertySubset};

/// Result of reading one destinations file
pub use crate::destinations::Destinations;

// ================================================================================================
// Containers and Links
// ================================================================================================

/// Compound file container
pub use crate::cfb::CompoundFile;

/// Decoded shell link
pub use crate::shelllink::ShellLink;

/// Property store access
pub use crate::shelllink::propstore::{keys, PropertyKey, PropertyStore, PropertyValue};

// ================================================================================================
// Shell Collaborators
// ================================================================================================

/// Traits and defaults for the platform shell
pub use crate::shell::{
    Icon, InstalledApplications, KnownFolders, NoInstalledApplications, NoShell, PinnedItem,
    PinnedList, PropertyBag, ShellItem, ShellResolver,
};
