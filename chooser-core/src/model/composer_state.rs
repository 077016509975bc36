//! ``src/model/composer_state.rs``
//!
//! # `ComposerState`: New-Target Filename Prompt
//!
//! Sub-state of the chooser that collects the leaf name of a vault that does
//! not exist yet. The raw input is stored verbatim; it is only checked when
//! the host asks whether the confirm control may be enabled.

use compact_str::CompactString;

use crate::error::{ChooserError, CoreResult};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComposerState {
    pub(crate) prompt_open: bool,
    pub(crate) filename_draft: Option<CompactString>,
}

impl ComposerState {
    #[must_use]
    pub const fn prompt_open(&self) -> bool {
        self.prompt_open
    }

    #[must_use]
    pub fn filename_draft(&self) -> Option<&str> {
        self.filename_draft.as_deref()
    }

    pub(crate) fn open(&mut self) {
        self.prompt_open = true;
        self.filename_draft = Some(CompactString::default());
    }

    pub(crate) fn close(&mut self) {
        self.prompt_open = false;
        self.filename_draft = None;
    }

    /// Whether the current draft may be submitted.
    #[must_use]
    pub fn can_submit(&self) -> bool {
        self.prompt_open && self.filename_draft.as_deref().is_some_and(|d| validate_filename(d).is_ok())
    }
}

/// Check a single new leaf name: at least one non-dot character and no path
/// separators.
pub fn validate_filename(name: &str) -> CoreResult<()> {
    if !name.chars().any(|c: char| c != '.') {
        return Err(ChooserError::invalid_filename(
            name,
            "must contain a character other than '.'",
        ));
    }

    if name.contains(['/', '\\']) {
        return Err(ChooserError::invalid_filename(
            name,
            "must not contain path separators",
        ));
    }

    Ok(())
}
