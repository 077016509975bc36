//! ``src/fs/local_gateway.rs``
//!
//! # `LocalGateway`: Listing Gateway over the Local Disk
//!
//! Serves gateway identifiers (`/`, `/vaults/work`) from a base directory on
//! disk. The base is the gateway's `/`; identifiers can never reach above it.

use std::cmp::Ordering;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use compact_str::CompactString;
use tokio::fs as TokioFs;
use tracing::{instrument, trace};

use crate::error::ChooserError;
use crate::fs::entry::{DirectoryEntry, DirectoryRef, EntryKind};
use crate::fs::gateway::ListingGateway;
use crate::fs::path_utils;

#[derive(Debug, Clone)]
pub struct LocalGateway {
    base: PathBuf,
    show_hidden: bool,
}

impl LocalGateway {
    #[must_use]
    pub fn new(base: impl Into<PathBuf>, show_hidden: bool) -> Self {
        Self {
            base: base.into(),
            show_hidden,
        }
    }

    #[must_use]
    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Map a gateway identifier onto a path below the base directory.
    pub fn resolve(&self, identifier: &str) -> Result<PathBuf, ChooserError> {
        let mut path: PathBuf = self.base.clone();

        for segment in identifier.split('/') {
            match segment {
                "" | "." => {}
                ".." => return Err(ChooserError::PathEscape(CompactString::from(identifier))),
                name => path.push(name),
            }
        }

        Ok(path)
    }

    async fn entry_kind(path: &Path, fallback: std::fs::FileType) -> EntryKind {
        // Follow symlinks so linked directories stay navigable.
        let is_dir = match TokioFs::metadata(path).await {
            Ok(meta) => meta.is_dir(),
            Err(_) => fallback.is_dir(),
        };

        if is_dir {
            EntryKind::Directory
        } else {
            EntryKind::File
        }
    }

    fn sort_entries(entries: &mut [DirectoryEntry]) {
        entries.sort_by(|a: &DirectoryEntry, b: &DirectoryEntry| -> Ordering {
            if a.is_dir() && !b.is_dir() {
                Ordering::Less
            } else if !a.is_dir() && b.is_dir() {
                Ordering::Greater
            } else {
                a.name.cmp(&b.name)
            }
        });
    }
}

#[async_trait]
impl ListingGateway for LocalGateway {
    #[instrument(level = "debug", skip(self), fields(identifier = %directory.identifier))]
    async fn get_directory_contents(&self, directory: &DirectoryRef) -> Result<Vec<DirectoryEntry>> {
        let dir: PathBuf = self.resolve(&directory.identifier)?;

        let mut reader = TokioFs::read_dir(&dir)
            .await
            .with_context(|| format!("Failed to read directory: {}", dir.display()))?;

        let mut entries: Vec<DirectoryEntry> = Vec::new();

        while let Some(entry) = reader.next_entry().await? {
            let path: PathBuf = entry.path();

            let Some(name) = path.file_name().and_then(OsStr::to_str) else {
                trace!("skipping non-UTF8 entry {}", path.display());
                continue;
            };

            if !self.show_hidden && name.starts_with('.') {
                continue;
            }

            let file_type = entry.file_type().await?;
            let kind = Self::entry_kind(&path, file_type).await;

            entries.push(DirectoryEntry {
                identifier: path_utils::join(&directory.identifier, name),
                name: CompactString::from(name),
                kind,
            });
        }

        Self::sort_entries(&mut entries);
        trace!("listed {} entries", entries.len());

        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use tokio::fs::File;

    async fn create_test_directory() -> Result<TempDir> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path();

        File::create(path.join("work.bcup")).await?;
        File::create(path.join("notes.txt")).await?;
        File::create(path.join(".hidden.bcup")).await?;
        TokioFs::create_dir(path.join("vaults")).await?;
        File::create(path.join("vaults").join("family.bcup")).await?;

        Ok(temp_dir)
    }

    #[tokio::test]
    async fn lists_root_directories_first() {
        let temp_dir = create_test_directory().await.unwrap();
        let gateway = LocalGateway::new(temp_dir.path(), false);

        let entries = gateway
            .get_directory_contents(&DirectoryRef::new("/"))
            .await
            .unwrap();

        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["vaults", "notes.txt", "work.bcup"]);
        assert_eq!(entries[0].identifier, "/vaults");
        assert_eq!(entries[0].kind, EntryKind::Directory);
        assert_eq!(entries[2].identifier, "/work.bcup");
    }

    #[tokio::test]
    async fn hidden_entries_follow_config() {
        let temp_dir = create_test_directory().await.unwrap();
        let gateway = LocalGateway::new(temp_dir.path(), true);

        let entries = gateway
            .get_directory_contents(&DirectoryRef::new("/"))
            .await
            .unwrap();

        assert_eq!(entries.len(), 4);
        assert!(entries.iter().any(|e| e.identifier == "/.hidden.bcup"));
    }

    #[tokio::test]
    async fn lists_nested_directory() {
        let temp_dir = create_test_directory().await.unwrap();
        let gateway = LocalGateway::new(temp_dir.path(), false);

        let entries = gateway
            .get_directory_contents(&DirectoryRef::new("/vaults"))
            .await
            .unwrap();

        assert_eq!(entries, vec![DirectoryEntry::file("/vaults/family.bcup", "family.bcup")]);
    }

    #[tokio::test]
    async fn missing_directory_is_an_error() {
        let temp_dir = create_test_directory().await.unwrap();
        let gateway = LocalGateway::new(temp_dir.path(), false);

        let result = gateway
            .get_directory_contents(&DirectoryRef::new("/nope"))
            .await;

        assert!(result.is_err());
    }

    #[test]
    fn parent_segments_are_refused() {
        let gateway = LocalGateway::new("/srv/vaults", false);
        assert_eq!(gateway.base(), Path::new("/srv/vaults"));

        assert!(matches!(
            gateway.resolve("/a/../../etc"),
            Err(ChooserError::PathEscape(_))
        ));
        assert_eq!(
            gateway.resolve("/a//./b").unwrap(),
            PathBuf::from("/srv/vaults/a/b")
        );
    }
}
