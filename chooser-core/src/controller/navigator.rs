//! ``src/controller/navigator.rs``
//! ============================================================================
//! # `Navigator`: Navigation and Target-Selection State Machine
//!
//! Owns the [`NavigationState`] and the [`ComposerState`] of one chooser
//! session. Every command runs synchronously; commands that change directory
//! also spawn a listing task whose [`ListingOutcome`] comes back on the
//! channel returned by [`Navigator::new`]. The owner feeds outcomes into
//! [`Navigator::apply_listing`], which drops any outcome whose generation is
//! no longer the live one.
//!
//! States: `Idle` and `Loading`. Navigation requests are accepted in either
//! state; the newest request always wins.

use compact_str::{CompactString, format_compact};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, instrument, trace, warn};

use crate::config::Config;
use crate::error::{ChooserError, CoreResult};
use crate::fs::dir_loader::{Generation, ListingOutcome, spawn_listing};
use crate::fs::entry::{DirectoryEntry, DirectoryRef, EntryKind};
use crate::fs::gateway::SharedGateway;
use crate::fs::path_utils::{self, ROOT};
use crate::model::composer_state::{ComposerState, validate_filename};
use crate::model::nav_state::{BreadcrumbEntry, LoadPhase, NavigationState, directory_label};
use crate::model::ui_state::{ChooserItem, ChooserSnapshot, Crumb, ItemKind, Notice};

/// What happened to a submitted filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The composed path is now both the draft and the selected target.
    Drafted(CompactString),

    /// The composed path already exists in the listing; draft and selection
    /// were cleared.
    Collided(CompactString),
}

#[derive(Debug)]
pub struct Navigator {
    state: NavigationState,
    composer: ComposerState,
    notice: Option<Notice>,
    gateway: SharedGateway,
    task_tx: UnboundedSender<ListingOutcome>,
    generation: Generation,
    document_extension: CompactString,
}

impl Navigator {
    /// Create a navigator at the root and the receiver its listings arrive on.
    #[must_use]
    pub fn new(gateway: SharedGateway, config: &Config) -> (Self, UnboundedReceiver<ListingOutcome>) {
        let (task_tx, task_rx) = mpsc::unbounded_channel::<ListingOutcome>();

        let navigator = Self {
            state: NavigationState::new(),
            composer: ComposerState::default(),
            notice: None,
            gateway,
            task_tx,
            generation: 0,
            document_extension: config.document_suffix(),
        };

        (navigator, task_rx)
    }

    // ────────────────────────────────────────────────────────────
    // Read access
    // ────────────────────────────────────────────────────────────

    #[must_use]
    pub const fn state(&self) -> &NavigationState {
        &self.state
    }

    #[must_use]
    pub const fn composer(&self) -> &ComposerState {
        &self.composer
    }

    #[must_use]
    pub const fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    #[must_use]
    pub fn document_extension(&self) -> &str {
        &self.document_extension
    }

    /// Whether the host may enable its confirm control for the prompt.
    #[must_use]
    pub fn can_submit(&self) -> bool {
        !self.state.is_loading() && self.composer.can_submit()
    }

    /// Rows to render: the listing (nothing while loading) followed by the
    /// draft target, if any.
    #[must_use]
    pub fn items(&self) -> Vec<ChooserItem> {
        let selected: Option<&str> = self.state.selected_target();
        let mut items: Vec<ChooserItem> = Vec::new();

        if !self.state.is_loading() {
            items.extend(self.state.entries().iter().map(|entry: &DirectoryEntry| ChooserItem {
                identifier: entry.identifier.clone(),
                name: entry.name.clone(),
                kind: ItemKind::from(entry.kind),
                selected: selected == Some(entry.identifier.as_str()),
                is_document: entry.kind == EntryKind::File
                    && path_utils::has_extension(&entry.name, &self.document_extension),
            }));
        }

        if let Some(draft) = self.state.draft_target() {
            items.push(ChooserItem {
                identifier: CompactString::from(draft),
                name: CompactString::from(path_utils::basename(draft)),
                kind: ItemKind::Draft,
                selected: selected == Some(draft),
                is_document: true,
            });
        }

        items
    }

    /// Breadcrumbs followed by the current directory as a final crumb.
    #[must_use]
    pub fn crumb_trail(&self) -> Vec<Crumb> {
        let current: &str = self.state.current_directory();

        self.state
            .breadcrumbs()
            .iter()
            .map(|crumb: &BreadcrumbEntry| Crumb {
                label: crumb.label.clone(),
                identifier: crumb.identifier.clone(),
                current: false,
            })
            .chain(std::iter::once(Crumb {
                label: directory_label(current),
                identifier: CompactString::from(current),
                current: true,
            }))
            .collect()
    }

    /// Immutable copy of everything the presentation layer renders.
    #[must_use]
    pub fn snapshot(&self) -> ChooserSnapshot {
        ChooserSnapshot {
            navigation: self.state.clone(),
            composer: self.composer.clone(),
            notice: self.notice.clone(),
            items: self.items(),
            crumbs: self.crumb_trail(),
        }
    }

    // ────────────────────────────────────────────────────────────
    // Navigation
    // ────────────────────────────────────────────────────────────

    /// Start listing the root.
    #[instrument(level = "debug", skip(self))]
    pub fn initialize(&mut self) {
        info!("initializing chooser at root");
        self.state.current_directory = CompactString::const_new(ROOT);
        self.state.breadcrumbs.clear();
        self.state.draft_target = None;
        self.request_listing();
    }

    /// Descend into a directory entry of the current listing.
    #[instrument(level = "debug", skip(self, entry), fields(path = %entry.identifier))]
    pub fn enter_directory(&mut self, entry: &DirectoryEntry) -> CoreResult<()> {
        if entry.kind != EntryKind::Directory {
            return Err(ChooserError::NotADirectory(entry.identifier.clone()));
        }

        info!(from = %self.state.current_directory, "entering directory");
        self.state.descend(&entry.identifier);
        self.request_listing();

        Ok(())
    }

    /// Make an existing file the selected target.
    pub fn select_file(&mut self, entry: &DirectoryEntry) -> CoreResult<()> {
        if entry.kind != EntryKind::File {
            return Err(ChooserError::NotAFile(entry.identifier.clone()));
        }

        debug!(path = %entry.identifier, "file selected");
        self.state.selected_target = Some(entry.identifier.clone());

        Ok(())
    }

    /// Jump to an ancestor directory.
    #[instrument(level = "debug", skip(self, target), fields(path = %target.identifier))]
    pub fn navigate_to_breadcrumb(&mut self, target: &BreadcrumbEntry) -> CoreResult<()> {
        let index: usize = self
            .state
            .breadcrumbs()
            .iter()
            .position(|crumb: &BreadcrumbEntry| crumb == target)
            .ok_or_else(|| ChooserError::UnknownBreadcrumb(target.identifier.clone()))?;

        info!(from = %self.state.current_directory, "navigating to breadcrumb");
        self.state.ascend_to(index);
        self.request_listing();

        Ok(())
    }

    /// List the current directory again, e.g. after a failed listing.
    pub fn reload(&mut self) {
        debug!(directory = %self.state.current_directory, "reloading");
        self.request_listing();
    }

    /// Apply a listing result if it belongs to the live request.
    ///
    /// Returns `false` when the outcome was superseded and discarded.
    pub fn apply_listing(&mut self, outcome: ListingOutcome) -> bool {
        let LoadPhase::Loading { generation } = self.state.phase() else {
            trace!(generation = outcome.generation, "no listing pending, discarding outcome");
            return false;
        };

        if outcome.generation != generation {
            trace!(
                stale = outcome.generation,
                live = generation,
                directory = %outcome.directory,
                "discarding stale listing"
            );
            return false;
        }

        match outcome.result {
            Ok(entries) => {
                debug!(
                    directory = %outcome.directory,
                    entries = entries.len(),
                    exec = ?outcome.exec,
                    "listing applied"
                );
                self.state.finish_loading(entries);
                self.notice = None;
            }
            Err(err) => {
                warn!(directory = %outcome.directory, error = %err, "listing failed, keeping previous entries");
                self.state.abort_loading();
                self.notice = Some(Notice::error(format_compact!("{err}")));
            }
        }

        true
    }

    fn request_listing(&mut self) {
        self.generation += 1;
        self.state.begin_loading(self.generation);

        let directory = DirectoryRef::new(&self.state.current_directory);
        spawn_listing(
            self.generation,
            self.gateway.clone(),
            directory,
            self.task_tx.clone(),
        );
    }

    // ────────────────────────────────────────────────────────────
    // New-target composer
    // ────────────────────────────────────────────────────────────

    pub fn open_prompt(&mut self) {
        self.composer.open();
    }

    pub fn close_prompt(&mut self) {
        self.composer.close();
    }

    /// Store raw prompt input verbatim.
    pub fn update_filename_draft(&mut self, text: impl Into<CompactString>) -> CoreResult<()> {
        if !self.composer.prompt_open {
            return Err(ChooserError::PromptClosed);
        }

        self.composer.filename_draft = Some(text.into());
        Ok(())
    }

    /// Turn the filename draft into a collision-checked target path.
    #[instrument(level = "debug", skip(self))]
    pub fn submit_prompt(&mut self) -> CoreResult<SubmitOutcome> {
        if !self.composer.prompt_open {
            return Err(ChooserError::PromptClosed);
        }

        let name: CompactString = self.composer.filename_draft.clone().unwrap_or_default();
        validate_filename(&name)?;

        // the collision check needs the listing of the current directory
        if self.state.is_loading() {
            return Err(ChooserError::ListingPending(self.state.current_directory.clone()));
        }

        let joined = path_utils::join(&self.state.current_directory, &name);
        let target = path_utils::with_extension(&joined, &self.document_extension);

        self.composer.close();

        if self.state.has_entry(&target) {
            warn!(path = %target, "new target collides with an existing entry, discarding");
            self.state.draft_target = None;
            self.state.selected_target = None;
            self.notice = Some(Notice::warning(format_compact!(
                "{} already exists",
                path_utils::basename(&target)
            )));
            return Ok(SubmitOutcome::Collided(target));
        }

        info!(path = %target, "new target drafted");
        self.state.draft_target = Some(target.clone());
        self.state.selected_target = Some(target.clone());

        Ok(SubmitOutcome::Drafted(target))
    }

    /// Select the drafted target again after picking something else.
    pub fn select_draft(&mut self) -> CoreResult<()> {
        let draft = self.state.draft_target.clone().ok_or(ChooserError::NoDraftTarget)?;
        self.state.selected_target = Some(draft);
        Ok(())
    }

    /// Drop the draft target; the selection follows only if it still points
    /// at the draft.
    pub fn cancel_draft(&mut self) -> CoreResult<()> {
        let draft = self.state.draft_target.take().ok_or(ChooserError::NoDraftTarget)?;

        if self.state.selected_target.as_ref() == Some(&draft) {
            self.state.selected_target = None;
        }

        debug!(draft = %draft, "draft cancelled");
        Ok(())
    }

    // ────────────────────────────────────────────────────────────
    // Completion
    // ────────────────────────────────────────────────────────────

    /// End the session, handing the selected target (or none when the user
    /// aborted) to `callback` exactly once.
    pub fn finish<F>(self, confirmed: bool, callback: F)
    where
        F: FnOnce(Option<CompactString>),
    {
        let target = if confirmed {
            self.state.selected_target
        } else {
            None
        };

        info!(confirmed, path = ?target, "chooser finished");
        callback(target);
    }
}
