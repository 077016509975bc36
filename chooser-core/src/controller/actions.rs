//! src/controller/actions.rs
//! ============================================================================
//! # Intents: Host Commands for the Chooser
//!
//! Every gesture a host can forward to a running [`ChooserLoop`]. Each
//! variant maps onto exactly one [`Navigator`] operation.
//!
//! [`ChooserLoop`]: super::event_loop::ChooserLoop
//! [`Navigator`]: super::navigator::Navigator

use compact_str::CompactString;

use crate::fs::entry::DirectoryEntry;
use crate::model::nav_state::BreadcrumbEntry;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// List the root.
    Initialize,

    EnterDirectory(DirectoryEntry),

    SelectFile(DirectoryEntry),

    /// Reselect the draft target.
    SelectDraft,

    NavigateToBreadcrumb(BreadcrumbEntry),

    /// Re-list the current directory.
    Reload,

    OpenPrompt,

    ClosePrompt,

    /// Raw text typed into the prompt.
    UpdateFilenameDraft(CompactString),

    SubmitPrompt,

    CancelDraft,

    /// End the session; `confirmed == false` aborts without a target.
    Finish { confirmed: bool },
}

impl Intent {
    /// Whether this intent may start a directory listing.
    #[must_use]
    pub const fn navigates(&self) -> bool {
        matches!(
            self,
            Self::Initialize | Self::EnterDirectory(_) | Self::NavigateToBreadcrumb(_) | Self::Reload
        )
    }
}
