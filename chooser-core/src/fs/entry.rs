//! ``src/fs/entry.rs``
//!
//! Listing records exchanged with a [`ListingGateway`](super::gateway::ListingGateway).

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

use super::path_utils;

/// Kind of a listed entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Directory,
}

/// One immediate child of a listed directory.
///
/// `identifier` is the gateway's canonical address for the entry (usually a
/// full path); `name` is only a display label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DirectoryEntry {
    pub identifier: CompactString,
    pub name: CompactString,
    pub kind: EntryKind,
}

impl DirectoryEntry {
    #[must_use]
    pub fn file(identifier: impl Into<CompactString>, name: impl Into<CompactString>) -> Self {
        Self {
            identifier: identifier.into(),
            name: name.into(),
            kind: EntryKind::File,
        }
    }

    #[must_use]
    pub fn directory(
        identifier: impl Into<CompactString>,
        name: impl Into<CompactString>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            name: name.into(),
            kind: EntryKind::Directory,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

/// Directory handle passed to the gateway when requesting a listing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DirectoryRef {
    pub identifier: CompactString,
    pub name: CompactString,
}

impl DirectoryRef {
    /// Build a handle whose name is the basename of `identifier`.
    #[must_use]
    pub fn new(identifier: &str) -> Self {
        Self {
            identifier: CompactString::from(identifier),
            name: CompactString::from(path_utils::basename(identifier)),
        }
    }
}

