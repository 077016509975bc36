//! src/config.rs
//! ============================================================================
//! # Config: Chooser Configuration Loader and Saver
//!
//! Loads and saves settings as TOML from the platform config directory using
//! the [`directories`](https://docs.rs/directories) crate. Missing keys fall
//! back to defaults so older files keep working.
//!
//! ## Example
//! ```rust,ignore
//! let config = Config::load().await?;
//! config.save().await?;
//! ```

use std::path::PathBuf;

use compact_str::CompactString;
use directories::{ProjectDirs, UserDirs};
use serde::{Deserialize, Serialize};
use tokio::fs as TokioFs;
use tracing::info;

use crate::error::{ChooserError, CoreResult};
use crate::fs::path_utils;

/// Extension of vault documents.
pub const DEFAULT_DOCUMENT_EXTENSION: &str = ".bcup";

/// Logging configuration consumed by [`Logger`](crate::logging::Logger).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default directive when `RUST_LOG` is unset.
    pub level: CompactString,

    pub log_dir: PathBuf,

    /// Rolling file prefix, files end up as `<prefix>.YYYY-MM-DD`.
    pub file_prefix: CompactString,

    /// Mirror events to stderr.
    pub stderr: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: CompactString::const_new("info"),
            log_dir: PathBuf::from("logs"),
            file_prefix: CompactString::const_new("chooser"),
            stderr: false,
        }
    }
}

/// Main configuration struct for the chooser.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Suffix appended to composed targets (`.bcup`).
    pub document_extension: CompactString,

    pub show_hidden: bool,

    /// Base directory served as `/` by the local gateway. Home when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root_dir: Option<PathBuf>,

    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            document_extension: CompactString::const_new(DEFAULT_DOCUMENT_EXTENSION),
            show_hidden: false,
            root_dir: None,
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Loads config from the app config dir, writing defaults when absent.
    pub async fn load() -> CoreResult<Self> {
        let path = Self::config_path()?;

        if TokioFs::try_exists(&path).await.unwrap_or(false) {
            info!("Loading config from {}", path.display());
            let text = TokioFs::read_to_string(&path)
                .await
                .map_err(|e| ChooserError::config_io(&path, e))?;

            Self::from_toml_str(&text)
        } else {
            info!(
                "No config file found at {}, using default configuration. Creating it now.",
                path.display()
            );

            let default_config = Self::default();
            default_config.save().await?;

            Ok(default_config)
        }
    }

    /// Parse a TOML document, normalising the document extension.
    pub fn from_toml_str(text: &str) -> CoreResult<Self> {
        let mut cfg: Self = toml::from_str(text)?;
        cfg.document_extension = cfg.document_suffix();
        Ok(cfg)
    }

    /// Document extension with its leading dot. A blank setting falls back to
    /// [`DEFAULT_DOCUMENT_EXTENSION`].
    #[must_use]
    pub fn document_suffix(&self) -> CompactString {
        if self.document_extension.trim().trim_start_matches('.').is_empty() {
            return CompactString::const_new(DEFAULT_DOCUMENT_EXTENSION);
        }

        path_utils::normalize_suffix(&self.document_extension)
    }

    /// Saves config to the app config dir.
    pub async fn save(&self) -> CoreResult<()> {
        let path = Self::config_path()?;

        info!("Saving config to {}", path.display());

        if let Some(parent) = path.parent() {
            TokioFs::create_dir_all(parent)
                .await
                .map_err(|e| ChooserError::config_io(parent, e))?;
        }

        let toml_str = toml::to_string_pretty(self)?;
        TokioFs::write(&path, toml_str)
            .await
            .map_err(|e| ChooserError::config_io(&path, e))?;

        Ok(())
    }

    /// Returns the canonical config file path using `directories::ProjectDirs`.
    pub fn config_path() -> CoreResult<PathBuf> {
        let proj_dirs = ProjectDirs::from("org", "buttercup", "VaultChooser").ok_or_else(|| {
            ChooserError::Other(CompactString::const_new("Could not determine config directory."))
        })?;
        Ok(proj_dirs.config_dir().join("config.toml"))
    }

    /// Directory the local gateway serves as `/`.
    pub fn resolved_root_dir(&self) -> CoreResult<PathBuf> {
        if let Some(dir) = &self.root_dir {
            return Ok(dir.clone());
        }

        UserDirs::new()
            .map(|dirs: UserDirs| dirs.home_dir().to_path_buf())
            .ok_or_else(|| {
                ChooserError::Other(CompactString::const_new("Could not determine home directory."))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_target_bcup_documents() {
        let cfg = Config::default();

        assert_eq!(cfg.document_extension, ".bcup");
        assert!(!cfg.show_hidden);
        assert_eq!(cfg.logging.level, "info");
    }

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let cfg = Config::from_toml_str(
            r#"
            show_hidden = true
            document_extension = "kdbx"

            [logging]
            stderr = true
            "#,
        )
        .unwrap();

        assert!(cfg.show_hidden);
        assert_eq!(cfg.document_extension, ".kdbx");
        assert!(cfg.logging.stderr);
        assert_eq!(cfg.logging.file_prefix, "chooser");
        assert_eq!(cfg.root_dir, None);
    }

    #[test]
    fn blank_extension_falls_back_to_default() {
        for text in [r#"document_extension = """#, r#"document_extension = " . ""#] {
            let cfg = Config::from_toml_str(text).unwrap();
            assert_eq!(cfg.document_extension, DEFAULT_DOCUMENT_EXTENSION);
        }

        let literal = Config {
            document_extension: CompactString::default(),
            ..Config::default()
        };
        assert_eq!(literal.document_suffix(), ".bcup");
    }

    #[test]
    fn explicit_root_dir_wins() {
        let cfg = Config::from_toml_str(r#"root_dir = "/srv/vaults""#).unwrap();

        assert_eq!(cfg.resolved_root_dir().unwrap(), PathBuf::from("/srv/vaults"));
    }

    #[test]
    fn malformed_file_is_a_config_error() {
        let err = Config::from_toml_str("show_hidden = maybe").unwrap_err();

        assert!(matches!(err, ChooserError::Config(_)));
    }

    #[test]
    fn round_trips_through_toml() {
        let text = toml::to_string_pretty(&Config::default()).unwrap();
        let cfg = Config::from_toml_str(&text).unwrap();

        assert_eq!(cfg.document_extension, ".bcup");
    }
}
