pub mod error;

pub mod config;

pub mod controller {

    pub mod actions;
    pub use actions::Intent;

    pub mod navigator;
    pub use navigator::{Navigator, SubmitOutcome};

    pub mod event_loop;
    pub use event_loop::{ChooserHandle, ChooserLoop};
}

pub mod model {
    pub mod nav_state;
    pub use nav_state::{BreadcrumbEntry, Breadcrumbs, LoadPhase, NavigationState};

    pub mod composer_state;
    pub use composer_state::{ComposerState, validate_filename};

    pub mod ui_state;
    pub use ui_state::{ChooserItem, ChooserSnapshot, Crumb, ItemKind, Notice, NoticeLevel};
}

pub mod fs {
    pub mod path_utils;

    pub mod entry;
    pub use entry::{DirectoryEntry, DirectoryRef, EntryKind};

    pub mod gateway;
    pub use gateway::{ListingGateway, SharedGateway};

    pub mod dir_loader;

    pub mod local_gateway;
    pub use local_gateway::LocalGateway;

    pub mod memory_gateway;
    pub use memory_gateway::MemoryGateway;
}

pub mod logging;
pub use logging::Logger;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::Config;
pub use error::{ChooserError, CoreResult};
