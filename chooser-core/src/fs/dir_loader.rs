//! ``src/fs/dir_loader.rs``
//!
//! # Directory Loader: Background Listing Requests
//!
//! Each navigation spawns one listing task. The task never touches the
//! navigation state; it reports back over a channel and the owner of the
//! state decides whether the result is still wanted.

use std::time::{Duration, Instant};

use compact_str::CompactString;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tracing::{Instrument, debug, info_span, warn};

use crate::error::{ChooserError, CoreResult};
use crate::fs::entry::{DirectoryEntry, DirectoryRef};
use crate::fs::gateway::{ListingGateway, SharedGateway};

/// Monotonic stamp identifying one listing request.
pub type Generation = u64;

/// Result of a listing request, stamped with the request that produced it.
#[derive(Debug)]
pub struct ListingOutcome {
    pub generation: Generation,
    pub directory: CompactString,
    pub result: CoreResult<Vec<DirectoryEntry>>,
    pub exec: Duration,
}

/// Fetch a directory listing on the runtime and report it on `tx`.
///
/// A closed receiver means the session is gone; the result is dropped.
pub fn spawn_listing(
    generation: Generation,
    gateway: SharedGateway,
    directory: DirectoryRef,
    tx: UnboundedSender<ListingOutcome>,
) -> JoinHandle<()> {
    let span = info_span!("listing", generation, directory = %directory.identifier);

    tokio::spawn(
        async move {
            let outcome = fetch_listing(generation, gateway.as_ref(), &directory).await;

            if tx.send(outcome).is_err() {
                debug!("listing receiver dropped, discarding result");
            }
        }
        .instrument(span),
    )
}

/// Run one listing against `gateway` and wrap the result.
pub async fn fetch_listing(
    generation: Generation,
    gateway: &dyn ListingGateway,
    directory: &DirectoryRef,
) -> ListingOutcome {
    let start: Instant = Instant::now();

    let result = gateway
        .get_directory_contents(directory)
        .await
        .map_err(|e: anyhow::Error| {
            warn!(error = %e, "gateway failed to list directory");
            ChooserError::listing_failed(&directory.identifier, &e)
        });

    let exec: Duration = start.elapsed();

    if let Ok(entries) = &result {
        debug!(entries = entries.len(), ?exec, "listing completed");
    }

    ListingOutcome {
        generation,
        directory: directory.identifier.clone(),
        result,
        exec,
    }
}
