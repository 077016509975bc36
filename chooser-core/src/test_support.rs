//! Shared fixtures for unit tests.

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use compact_str::CompactString;
use tokio::sync::oneshot;

use crate::fs::entry::{DirectoryEntry, DirectoryRef};
use crate::fs::gateway::ListingGateway;
use crate::fs::path_utils;

pub fn dir(identifier: &str) -> DirectoryEntry {
    DirectoryEntry::directory(identifier, path_utils::basename(identifier))
}

pub fn file(identifier: &str) -> DirectoryEntry {
    DirectoryEntry::file(identifier, path_utils::basename(identifier))
}

type Release = oneshot::Sender<Result<Vec<DirectoryEntry>>>;

/// Gateway whose listings resolve only when the test releases them, so
/// completion order can be chosen freely.
#[derive(Debug, Default)]
pub struct ScriptedGateway {
    pending: Mutex<HashMap<CompactString, oneshot::Receiver<Result<Vec<DirectoryEntry>>>>>,
}

impl ScriptedGateway {
    /// Park the next listing of `identifier` until the returned sender fires.
    pub fn hold(&self, identifier: &str) -> Release {
        let (tx, rx) = oneshot::channel();
        self.pending
            .lock()
            .unwrap()
            .insert(CompactString::from(identifier), rx);
        tx
    }
}

#[async_trait]
impl ListingGateway for ScriptedGateway {
    async fn get_directory_contents(&self, directory: &DirectoryRef) -> Result<Vec<DirectoryEntry>> {
        let rx = self.pending.lock().unwrap().remove(&directory.identifier);

        match rx {
            Some(rx) => rx
                .await
                .unwrap_or_else(|_| Err(anyhow!("release for {} dropped", directory.identifier))),
            None => Err(anyhow!("no scripted listing for {}", directory.identifier)),
        }
    }
}
