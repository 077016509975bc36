//! ``src/fs/gateway.rs``
//!
//! # `ListingGateway`: Directory Listing Capability
//!
//! The chooser never touches storage directly. Everything it knows about the
//! tree comes from a gateway that lists the immediate children of one
//! directory at a time. Local disks, remote stores and in-memory trees are
//! all just implementations of this trait.

use std::sync::Arc;

use async_trait::async_trait;

use super::entry::{DirectoryEntry, DirectoryRef};

/// Asynchronous directory listing source.
///
/// Errors are gateway-defined; the chooser only reports them.
#[async_trait]
pub trait ListingGateway: Send + Sync + std::fmt::Debug {
    async fn get_directory_contents(
        &self,
        directory: &DirectoryRef,
    ) -> anyhow::Result<Vec<DirectoryEntry>>;
}

/// Shared handle the navigator holds on its gateway.
pub type SharedGateway = Arc<dyn ListingGateway>;
