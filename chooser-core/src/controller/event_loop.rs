//! ``src/controller/event_loop.rs``
//! ============================================================================
//! # `ChooserLoop`: Async Driver for One Chooser Session
//!
//! Multiplexes host intents and listing outcomes onto a single
//! [`Navigator`], publishing a fresh [`ChooserSnapshot`] on a watch channel
//! after every change. The loop ends on [`Intent::Finish`], yielding the
//! chosen target, or when every intent sender is dropped, yielding `None`.

use compact_str::CompactString;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::sync::watch;
use tracing::{debug, info, instrument, trace, warn};

use crate::config::Config;
use crate::controller::actions::Intent;
use crate::controller::navigator::{Navigator, SubmitOutcome};
use crate::error::{ChooserError, CoreResult};
use crate::fs::dir_loader::ListingOutcome;
use crate::fs::gateway::SharedGateway;
use crate::model::ui_state::ChooserSnapshot;

/// Host side of a running session.
#[derive(Debug, Clone)]
pub struct ChooserHandle {
    intent_tx: UnboundedSender<Intent>,
    snapshots: watch::Receiver<ChooserSnapshot>,
}

impl ChooserHandle {
    /// Forward an intent to the session.
    pub fn send(&self, intent: Intent) -> CoreResult<()> {
        self.intent_tx
            .send(intent)
            .map_err(|_| ChooserError::Other(CompactString::const_new("chooser session has ended")))
    }

    /// Latest published snapshot.
    #[must_use]
    pub fn snapshot(&self) -> ChooserSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Receiver for snapshot changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ChooserSnapshot> {
        self.snapshots.clone()
    }
}

pub struct ChooserLoop {
    navigator: Navigator,
    listing_rx: UnboundedReceiver<ListingOutcome>,
    intent_rx: UnboundedReceiver<Intent>,
    snapshot_tx: watch::Sender<ChooserSnapshot>,
}

impl ChooserLoop {
    #[must_use]
    pub fn new(gateway: SharedGateway, config: &Config) -> (Self, ChooserHandle) {
        let (navigator, listing_rx) = Navigator::new(gateway, config);
        let (intent_tx, intent_rx) = mpsc::unbounded_channel::<Intent>();
        let (snapshot_tx, snapshots) = watch::channel(navigator.snapshot());

        info!("chooser session created");

        (
            Self {
                navigator,
                listing_rx,
                intent_rx,
                snapshot_tx,
            },
            ChooserHandle {
                intent_tx,
                snapshots,
            },
        )
    }

    /// Drive the session to completion.
    #[instrument(name = "chooser", skip_all)]
    pub async fn run(mut self) -> Option<CompactString> {
        loop {
            tokio::select! {
                Some(outcome) = self.listing_rx.recv() => {
                    if self.navigator.apply_listing(outcome) {
                        self.publish();
                    }
                }

                intent = self.intent_rx.recv() => {
                    match intent {
                        Some(Intent::Finish { confirmed }) => {
                            let mut chosen = None;
                            self.navigator.finish(confirmed, |target| chosen = target);
                            return chosen;
                        }
                        Some(intent) => {
                            self.dispatch(intent);
                            self.publish();
                        }
                        None => {
                            info!("all chooser handles dropped, aborting session");
                            return None;
                        }
                    }
                }
            }
        }
    }

    fn dispatch(&mut self, intent: Intent) {
        trace!(navigates = intent.navigates(), "dispatching {:?}", intent);

        let result: CoreResult<()> = match intent {
            Intent::Initialize => {
                self.navigator.initialize();
                Ok(())
            }
            Intent::EnterDirectory(entry) => self.navigator.enter_directory(&entry),
            Intent::SelectFile(entry) => self.navigator.select_file(&entry),
            Intent::SelectDraft => self.navigator.select_draft(),
            Intent::NavigateToBreadcrumb(crumb) => self.navigator.navigate_to_breadcrumb(&crumb),
            Intent::Reload => {
                self.navigator.reload();
                Ok(())
            }
            Intent::OpenPrompt => {
                self.navigator.open_prompt();
                Ok(())
            }
            Intent::ClosePrompt => {
                self.navigator.close_prompt();
                Ok(())
            }
            Intent::UpdateFilenameDraft(text) => self.navigator.update_filename_draft(text),
            Intent::SubmitPrompt => self.navigator.submit_prompt().map(|outcome: SubmitOutcome| {
                debug!(?outcome, "prompt submitted");
            }),
            Intent::CancelDraft => self.navigator.cancel_draft(),
            // handled by `run`
            Intent::Finish { .. } => Ok(()),
        };

        if let Err(err) = result {
            warn!(error = %err, "intent rejected");
        }
    }

    fn publish(&self) {
        self.snapshot_tx.send_replace(self.navigator.snapshot());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::memory_gateway::MemoryGateway;
    use crate::model::ui_state::ItemKind;
    use crate::test_support::dir;
    use std::sync::Arc;
    use std::time::Duration;

    fn session(paths: &[&str]) -> (ChooserLoop, ChooserHandle) {
        let gateway: SharedGateway = Arc::new(MemoryGateway::from_paths(paths));
        ChooserLoop::new(gateway, &Config::default())
    }

    async fn wait_listed(handle: &ChooserHandle, directory: &str) {
        let mut rx = handle.subscribe();
        rx.wait_for(|s| {
            s.navigation.current_directory() == directory
                && !s.navigation.is_loading()
                && !s.navigation.entries().is_empty()
        })
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn confirmed_session_yields_new_target() {
        let (chooser, handle) = session(&["/home/old.bcup"]);
        let task = tokio::spawn(chooser.run());

        handle.send(Intent::Initialize).unwrap();
        wait_listed(&handle, "/").await;

        handle.send(Intent::EnterDirectory(dir("/home"))).unwrap();
        wait_listed(&handle, "/home").await;

        handle.send(Intent::OpenPrompt).unwrap();
        handle.send(Intent::UpdateFilenameDraft("family".into())).unwrap();
        handle.send(Intent::SubmitPrompt).unwrap();
        handle.send(Intent::Finish { confirmed: true }).unwrap();

        let chosen = task.await.unwrap();
        assert_eq!(chosen.as_deref(), Some("/home/family.bcup"));
    }

    #[tokio::test]
    async fn snapshots_follow_navigation() {
        let (chooser, handle) = session(&["/home/old.bcup", "/srv/"]);
        let _task = tokio::spawn(chooser.run());

        handle.send(Intent::Initialize).unwrap();
        wait_listed(&handle, "/").await;

        let snapshot = handle.snapshot();
        let names: Vec<&str> = snapshot.items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["home", "srv"]);
        assert!(snapshot.items.iter().all(|i| i.kind == ItemKind::Directory));

        handle.send(Intent::EnterDirectory(dir("/home"))).unwrap();
        wait_listed(&handle, "/home").await;

        let snapshot = handle.snapshot();
        assert_eq!(snapshot.crumbs.len(), 2);
        assert_eq!(snapshot.items.len(), 1);
        assert!(snapshot.items[0].is_document);
    }

    #[tokio::test]
    async fn rejected_intent_leaves_session_running() {
        let (chooser, handle) = session(&["/a.bcup"]);
        let task = tokio::spawn(chooser.run());

        handle.send(Intent::SubmitPrompt).unwrap();
        handle.send(Intent::CancelDraft).unwrap();
        handle
            .send(Intent::SelectFile(crate::test_support::file("/a.bcup")))
            .unwrap();
        handle.send(Intent::Finish { confirmed: true }).unwrap();

        assert_eq!(task.await.unwrap().as_deref(), Some("/a.bcup"));
    }

    #[tokio::test]
    async fn aborted_session_yields_nothing() {
        let (chooser, handle) = session(&["/a.bcup"]);
        let task = tokio::spawn(chooser.run());

        handle
            .send(Intent::SelectFile(crate::test_support::file("/a.bcup")))
            .unwrap();
        handle.send(Intent::Finish { confirmed: false }).unwrap();

        assert_eq!(task.await.unwrap(), None);
    }

    #[tokio::test]
    async fn dropping_every_handle_ends_session() {
        let (chooser, handle) = session(&[]);
        let task = tokio::spawn(chooser.run());

        drop(handle);

        let chosen = tokio::time::timeout(Duration::from_secs(5), task)
            .await
            .expect("loop should stop")
            .unwrap();
        assert_eq!(chosen, None);
    }

    #[tokio::test]
    async fn send_fails_after_session_ends() {
        let (chooser, handle) = session(&[]);
        let task = tokio::spawn(chooser.run());

        handle.send(Intent::Finish { confirmed: false }).unwrap();
        task.await.unwrap();

        assert!(handle.send(Intent::Reload).is_err());
    }
}
