//! ``src/model/ui_state.rs``
//!
//! Read-only views handed to the presentation layer: notices, the rows of the
//! item grid, the crumb trail and the session snapshot.

use compact_str::CompactString;

use crate::fs::entry::EntryKind;
use crate::model::composer_state::ComposerState;
use crate::model::nav_state::NavigationState;

/// Notice levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum NoticeLevel {
    Warning = 0,
    Error = 1,
}

/// Display-only message for the host; never affects navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: CompactString,
    pub level: NoticeLevel,
}

impl Notice {
    pub fn warning(message: impl Into<CompactString>) -> Self {
        Self {
            message: message.into(),
            level: NoticeLevel::Warning,
        }
    }

    pub fn error(message: impl Into<CompactString>) -> Self {
        Self {
            message: message.into(),
            level: NoticeLevel::Error,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Directory,
    File,
    /// The composed, not-yet-created target.
    Draft,
}

impl From<EntryKind> for ItemKind {
    fn from(kind: EntryKind) -> Self {
        match kind {
            EntryKind::Directory => Self::Directory,
            EntryKind::File => Self::File,
        }
    }
}

/// One row of the chooser grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChooserItem {
    pub identifier: CompactString,
    pub name: CompactString,
    pub kind: ItemKind,
    pub selected: bool,
    /// Name carries the document extension (drafts always do).
    pub is_document: bool,
}

/// One element of the rendered crumb trail. The last one is the current
/// directory and is not a navigation target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Crumb {
    pub label: CompactString,
    pub identifier: CompactString,
    pub current: bool,
}

/// Everything the presentation layer needs to render one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChooserSnapshot {
    pub navigation: NavigationState,
    pub composer: ComposerState,
    pub notice: Option<Notice>,
    pub items: Vec<ChooserItem>,
    pub crumbs: Vec<Crumb>,
}

impl Default for ChooserSnapshot {
    fn default() -> Self {
        Self {
            navigation: NavigationState::new(),
            composer: ComposerState::default(),
            notice: None,
            items: Vec::new(),
            crumbs: vec![Crumb {
                label: CompactString::const_new("/"),
                identifier: CompactString::const_new("/"),
                current: true,
            }],
        }
    }
}
