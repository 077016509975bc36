//! ``src/model/nav_state.rs``
//! ============================================================================
//! # `NavigationState`: Single Source of Truth for a Chooser Session
//!
//! Holds the current directory, its ancestor chain (breadcrumbs), the loading
//! phase, the last good listing and the two target slots. Only the
//! [`Navigator`](crate::controller::navigator::Navigator) mutates it; hosts get
//! clones through snapshots.
//!
//! Invariants:
//! - `breadcrumbs` is exactly the strict ancestor chain of
//!   `current_directory`, root first, never containing the current directory.
//! - `entries` is the last listing that was applied; it is not meaningful
//!   while the phase is `Loading`.

use compact_str::CompactString;
use smallvec::SmallVec;

use crate::fs::dir_loader::Generation;
use crate::fs::entry::DirectoryEntry;
use crate::fs::path_utils::{self, ROOT};

/// One ancestor directory of the current directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BreadcrumbEntry {
    pub label: CompactString,
    pub identifier: CompactString,
}

impl BreadcrumbEntry {
    /// Crumb for `identifier`, labelled `/` at the root and by basename elsewhere.
    #[must_use]
    pub fn for_directory(identifier: &str) -> Self {
        Self {
            label: directory_label(identifier),
            identifier: CompactString::from(identifier),
        }
    }
}

/// Display label of a directory identifier.
#[must_use]
pub fn directory_label(identifier: &str) -> CompactString {
    if identifier == ROOT {
        CompactString::const_new(ROOT)
    } else {
        CompactString::from(path_utils::basename(identifier))
    }
}

pub type Breadcrumbs = SmallVec<[BreadcrumbEntry; 8]>;

/// Listing phase of the current directory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoadPhase {
    #[default]
    Idle,

    /// A listing stamped `generation` is in flight for the current directory.
    Loading { generation: Generation },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationState {
    pub(crate) current_directory: CompactString,
    pub(crate) breadcrumbs: Breadcrumbs,
    pub(crate) phase: LoadPhase,
    pub(crate) entries: Vec<DirectoryEntry>,
    pub(crate) selected_target: Option<CompactString>,
    pub(crate) draft_target: Option<CompactString>,
}

impl NavigationState {
    /// Fresh session state at the root.
    #[must_use]
    pub fn new() -> Self {
        Self {
            current_directory: CompactString::const_new(ROOT),
            breadcrumbs: SmallVec::new(),
            phase: LoadPhase::Idle,
            entries: Vec::new(),
            selected_target: None,
            draft_target: None,
        }
    }

    #[must_use]
    pub fn current_directory(&self) -> &str {
        &self.current_directory
    }

    #[must_use]
    pub fn breadcrumbs(&self) -> &[BreadcrumbEntry] {
        &self.breadcrumbs
    }

    #[must_use]
    pub const fn phase(&self) -> LoadPhase {
        self.phase
    }

    #[inline]
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self.phase, LoadPhase::Loading { .. })
    }

    /// Last applied listing; stale while loading.
    #[must_use]
    pub fn entries(&self) -> &[DirectoryEntry] {
        &self.entries
    }

    #[must_use]
    pub fn selected_target(&self) -> Option<&str> {
        self.selected_target.as_deref()
    }

    #[must_use]
    pub fn draft_target(&self) -> Option<&str> {
        self.draft_target.as_deref()
    }

    /// Whether `identifier` names an entry of the current listing.
    #[must_use]
    pub fn has_entry(&self, identifier: &str) -> bool {
        self.entries.iter().any(|e: &DirectoryEntry| e.identifier == identifier)
    }

    /// Descend into `directory`, recording the current directory as a crumb.
    pub(crate) fn descend(&mut self, directory: &str) {
        let crumb = BreadcrumbEntry::for_directory(&self.current_directory);
        self.breadcrumbs.push(crumb);
        self.current_directory = CompactString::from(directory);
        self.draft_target = None;
    }

    /// Jump back to the crumb at `index`, dropping it and everything deeper.
    pub(crate) fn ascend_to(&mut self, index: usize) {
        let target = self.breadcrumbs[index].identifier.clone();
        self.breadcrumbs.truncate(index);
        self.current_directory = target;
        self.draft_target = None;
    }

    pub(crate) const fn begin_loading(&mut self, generation: Generation) {
        self.phase = LoadPhase::Loading { generation };
    }

    pub(crate) fn finish_loading(&mut self, entries: Vec<DirectoryEntry>) {
        self.entries = entries;
        self.phase = LoadPhase::Idle;
    }

    /// Leave the loading phase keeping the previous listing.
    pub(crate) const fn abort_loading(&mut self) {
        self.phase = LoadPhase::Idle;
    }

    /// Check the breadcrumb invariant against `current_directory`.
    #[must_use]
    pub fn breadcrumbs_consistent(&self) -> bool {
        let mut previous: Option<&str> = None;

        for crumb in &self.breadcrumbs {
            if let Some(prev) = previous
                && !path_utils::is_strict_ancestor(prev, &crumb.identifier)
            {
                return false;
            }
            if !path_utils::is_strict_ancestor(&crumb.identifier, &self.current_directory) {
                return false;
            }
            previous = Some(crumb.identifier.as_str());
        }

        true
    }
}

impl Default for NavigationState {
    fn default() -> Self {
        Self::new()
    }
}
