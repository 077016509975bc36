//! ``src/fs/memory_gateway.rs``
//!
//! # `MemoryGateway`: Virtual Tree Listing Gateway
//!
//! Holds a whole tree in memory. Useful for virtual stores, demos and tests;
//! directories can be marked as failing and every listing can be delayed to
//! emulate a slow remote.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::time::Duration;

use anyhow::{Result, bail};
use async_trait::async_trait;
use compact_str::CompactString;
use tracing::trace;

use crate::fs::entry::{DirectoryEntry, DirectoryRef, EntryKind};
use crate::fs::gateway::ListingGateway;
use crate::fs::path_utils::{self, ROOT};

#[derive(Debug, Clone)]
pub struct MemoryGateway {
    /// Directory identifier -> children, in insertion-independent order.
    tree: BTreeMap<CompactString, BTreeSet<(bool, CompactString)>>,
    failing: HashSet<CompactString>,
    latency: Option<Duration>,
}

impl MemoryGateway {
    #[must_use]
    pub fn new() -> Self {
        let mut tree = BTreeMap::new();
        tree.insert(CompactString::const_new(ROOT), BTreeSet::new());

        Self {
            tree,
            failing: HashSet::new(),
            latency: None,
        }
    }

    /// Build a tree from absolute paths. A trailing `/` marks a directory;
    /// every intermediate segment becomes a directory.
    #[must_use]
    pub fn from_paths<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut gateway = Self::new();
        for path in paths {
            gateway.insert(path.as_ref());
        }
        gateway
    }

    /// Add one path (and its missing ancestors) to the tree.
    pub fn insert(&mut self, path: &str) {
        let is_dir_leaf: bool = path.ends_with('/');
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        let mut parent = CompactString::const_new(ROOT);
        for (idx, segment) in segments.iter().enumerate() {
            let is_last = idx + 1 == segments.len();
            let is_dir = !is_last || is_dir_leaf;
            let identifier = path_utils::join(&parent, segment);

            self.tree
                .entry(parent.clone())
                .or_default()
                .insert((!is_dir, CompactString::from(*segment)));

            if is_dir {
                self.tree.entry(identifier.clone()).or_default();
            }
            parent = identifier;
        }
    }

    /// Make every listing of `identifier` fail.
    #[must_use]
    pub fn failing_on(mut self, identifier: &str) -> Self {
        self.failing.insert(CompactString::from(identifier));
        self
    }

    /// Delay every listing by `latency`.
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }
}

impl Default for MemoryGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ListingGateway for MemoryGateway {
    async fn get_directory_contents(&self, directory: &DirectoryRef) -> Result<Vec<DirectoryEntry>> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        if self.failing.contains(&directory.identifier) {
            bail!("listing of {} is unavailable", directory.identifier);
        }

        let Some(children) = self.tree.get(&directory.identifier) else {
            bail!("no such directory: {}", directory.identifier);
        };

        trace!(directory = %directory.identifier, children = children.len(), "memory listing");

        Ok(children
            .iter()
            .map(|(is_file, name)| DirectoryEntry {
                identifier: path_utils::join(&directory.identifier, name),
                name: name.clone(),
                kind: if *is_file {
                    EntryKind::File
                } else {
                    EntryKind::Directory
                },
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> MemoryGateway {
        MemoryGateway::from_paths([
            "/home/user/work.bcup",
            "/home/user/archive/",
            "/home/readme.txt",
            "/srv/",
        ])
    }

    #[tokio::test]
    async fn builds_intermediate_directories() {
        let gateway = sample();

        let root = gateway
            .get_directory_contents(&DirectoryRef::new("/"))
            .await
            .unwrap();
        assert_eq!(
            root,
            vec![
                DirectoryEntry::directory("/home", "home"),
                DirectoryEntry::directory("/srv", "srv"),
            ]
        );

        let user = gateway
            .get_directory_contents(&DirectoryRef::new("/home/user"))
            .await
            .unwrap();
        assert_eq!(
            user,
            vec![
                DirectoryEntry::directory("/home/user/archive", "archive"),
                DirectoryEntry::file("/home/user/work.bcup", "work.bcup"),
            ]
        );
    }

    #[tokio::test]
    async fn empty_directory_lists_nothing() {
        let entries = sample()
            .get_directory_contents(&DirectoryRef::new("/srv"))
            .await
            .unwrap();
        assert!(entries.is_empty());
    }

    #[tokio::test]
    async fn failing_and_unknown_directories_error() {
        let gateway = sample().failing_on("/home");

        assert!(gateway
            .get_directory_contents(&DirectoryRef::new("/home"))
            .await
            .is_err());
        assert!(gateway
            .get_directory_contents(&DirectoryRef::new("/missing"))
            .await
            .is_err());
    }
}
