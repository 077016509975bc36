//! src/error.rs
//! ============================================================================
//! # `ChooserError`: Unified Error Type for the Target Chooser
//!
//! Every fallible operation in the crate returns `CoreResult<T>`. Command
//! precondition violations are reported without touching the navigation
//! state; listing failures carry the directory they were fetched for so the
//! presentation layer can show a non-fatal notice.

use std::{io, path::PathBuf};

use compact_str::CompactString;
use thiserror::Error;

/// Convenient alias carrying the unified error type
pub type CoreResult<T> = Result<T, ChooserError>;

/// Unified error type for all chooser operations.
#[derive(Debug, Error)]
pub enum ChooserError {
    // ────────────────────────────────────────────────────────────
    // Command preconditions
    // ────────────────────────────────────────────────────────────
    /// `enter_directory` was given a file entry.
    #[error("Not a directory: {0}")]
    NotADirectory(CompactString),

    /// `select_file` was given a directory entry.
    #[error("Not a file: {0}")]
    NotAFile(CompactString),

    /// Breadcrumb is not part of the current ancestor chain.
    #[error("Unknown breadcrumb: {0}")]
    UnknownBreadcrumb(CompactString),

    /// Composer command issued while the filename prompt is closed.
    #[error("Filename prompt is not open")]
    PromptClosed,

    #[error("Invalid filename: {name:?} - {reason}")]
    InvalidFilename {
        name: CompactString,
        reason: &'static str,
    },

    #[error("No draft target to act on")]
    NoDraftTarget,

    // ────────────────────────────────────────────────────────────
    // Listing gateway
    // ────────────────────────────────────────────────────────────
    /// A prompt was submitted before the current directory finished listing.
    #[error("Listing of {0} is still in progress")]
    ListingPending(CompactString),

    #[error("Failed to list {directory}: {reason}")]
    ListingFailed {
        directory: CompactString,
        reason: CompactString,
    },

    /// Identifier tried to leave the gateway root.
    #[error("Path escapes gateway root: {0}")]
    PathEscape(CompactString),

    // ────────────────────────────────────────────────────────────
    // Configuration and environment
    // ────────────────────────────────────────────────────────────
    #[error("Config parse error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Config serialize error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    #[error("Failed to access config file {path:?}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Logging setup failed: {0}")]
    Logging(CompactString),

    /// Any other error, with description.
    #[error("Unexpected error: {0}")]
    Other(CompactString),
}

impl ChooserError {
    /// Create a listing failure for `directory` from a gateway error
    pub fn listing_failed(directory: &str, source: &anyhow::Error) -> Self {
        Self::ListingFailed {
            directory: CompactString::from(directory),
            reason: CompactString::from(format!("{source:#}")),
        }
    }

    pub fn invalid_filename(name: &str, reason: &'static str) -> Self {
        Self::InvalidFilename {
            name: CompactString::from(name),
            reason,
        }
    }

    pub fn config_io<P: Into<PathBuf>>(path: P, source: io::Error) -> Self {
        Self::ConfigIo {
            path: path.into(),
            source,
        }
    }

    /// True for errors raised by a command whose precondition did not hold.
    /// The navigation state is never modified when one of these is returned.
    #[inline]
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::NotADirectory(_)
                | Self::NotAFile(_)
                | Self::UnknownBreadcrumb(_)
                | Self::PromptClosed
                | Self::InvalidFilename { .. }
                | Self::NoDraftTarget
                | Self::ListingPending(_)
        )
    }

    /// True when the session can carry on after reporting the error.
    #[inline]
    pub fn is_recoverable(&self) -> bool {
        self.is_precondition() || matches!(self, Self::ListingFailed { .. } | Self::PathEscape(_))
    }
}

// Allow conversion from `anyhow::Error` as fallback.
impl From<anyhow::Error> for ChooserError {
    fn from(e: anyhow::Error) -> Self {
        Self::Other(CompactString::from(format!("{e:#}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_failure_keeps_directory_and_reason() {
        let err = ChooserError::listing_failed("/vaults", &anyhow::anyhow!("connection reset"));

        assert!(err.is_recoverable());
        assert!(!err.is_precondition());
        assert_eq!(err.to_string(), "Failed to list /vaults: connection reset");
    }

    #[test]
    fn precondition_errors_are_recoverable() {
        for err in [
            ChooserError::NotADirectory("/a.bcup".into()),
            ChooserError::PromptClosed,
            ChooserError::NoDraftTarget,
            ChooserError::invalid_filename("..", "must contain a non-dot character"),
        ] {
            assert!(err.is_precondition(), "{err}");
            assert!(err.is_recoverable(), "{err}");
        }
    }

    #[test]
    fn config_errors_are_not_recoverable() {
        let err = ChooserError::config_io("/etc/chooser.toml", io::Error::other("disk gone"));
        assert!(!err.is_recoverable());
        assert!(!ChooserError::Logging("bad directive".into()).is_recoverable());
    }
}
