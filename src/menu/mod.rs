//! # Interactive Menus
//!
//! Short-lived, multi-step interactive flows built on the [`WaitRegistry`]. A menu
//! renders an artifact, attaches reaction buttons, and waits for an allowed actor to
//! press one (or, for some kinds, type an equivalent answer). Each interaction either
//! moves the menu to another page or terminates it.
//!
//! ## Menu kinds
//!
//! - [`ButtonMenu`]: arbitrary emoji buttons, one choice ends the menu
//! - [`OrderedMenu`]: up to ten numbered or lettered options, reaction or typed answer
//! - [`Paginator`]: items split across pages with arrow navigation
//! - [`SelectionDialog`]: a cursor moved up and down a list, confirmed with a button
//! - [`Slideshow`]: one image per page with arrow navigation
//!
//! Every kind is built from [`InteractionSettings`] (who may interact, timeout,
//! cleanup) and a kind-specific config; construction validates the config so a
//! broken menu is rejected before anything is rendered.
//!
//! ## Lifecycle
//!
//! ```text
//! AwaitingDisplay ──send──▶ Rendered(page) ──interaction──▶ Rendered(page')
//!                                 │
//!                                 └──choice / stop / timeout / cancel──▶ Terminated
//! ```
//!
//! Exactly one wait is live for the page currently shown. The wait is registered
//! only after the artifact is delivered and its buttons are attached.

use std::{fmt, sync::Arc};

use thiserror::Error;

use crate::event::{ArtifactId, ChannelId, Event, WaitRegistry};

pub mod button;
pub(crate) mod flow;
pub mod ordered;
pub mod pager;
pub mod paginator;
pub mod render;
pub mod selection;
pub mod settings;
pub mod slideshow;

pub use button::{ButtonMenu, ButtonMenuConfig};
pub use ordered::{OrderedMenu, OrderedMenuConfig};
pub use pager::Pager;
pub use paginator::{Paginator, PaginatorConfig};
pub use render::{ArtifactSink, Content, Continuation};
pub use selection::{SelectionDialog, SelectionDialogConfig};
pub use settings::{Cleanup, InteractionSettings, MockRoleLookup, RoleLookup};
pub use slideshow::{Slideshow, SlideshowConfig};

use flow::FlowControl;

pub const CANCEL: &str = "❌";
pub const CONFIRM: &str = "✅";
pub const STOP: &str = "⏹";
pub const LEFT: &str = "◀";
pub const RIGHT: &str = "▶";
pub const BIG_LEFT: &str = "⏪";
pub const BIG_RIGHT: &str = "⏩";
pub const UP: &str = "🔼";
pub const DOWN: &str = "🔽";

/// Runs with the artifact a menu rendered.
pub type ArtifactAction = Arc<dyn Fn(&ArtifactId) + Send + Sync>;
/// Runs with the artifact and a 1-based choice or page number.
pub type IndexAction = Arc<dyn Fn(&ArtifactId, usize) + Send + Sync>;

/// Collaborators a menu needs while displayed.
#[derive(Clone)]
pub struct MenuContext {
    pub waiter: WaitRegistry<Event>,
    pub sink: Arc<dyn ArtifactSink>,
    pub roles: Arc<dyn RoleLookup>,
}

impl MenuContext {
    pub fn new(
        waiter: WaitRegistry<Event>,
        sink: Arc<dyn ArtifactSink>,
        roles: Arc<dyn RoleLookup>,
    ) -> Self {
        Self {
            waiter,
            sink,
            roles,
        }
    }
}

/// How a menu ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Termination {
    /// A choice was made; 0-based index into the menu's choices.
    Selected(usize),
    Cancelled,
    /// Stopped from the menu itself, or it had nothing to wait for.
    Stopped,
    TimedOut,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowState {
    AwaitingDisplay,
    /// `page` is the page shown, or the cursor position for selection dialogs.
    Rendered { artifact: ArtifactId, page: usize },
    Terminated(Termination),
}

pub trait Menu {
    /// Sends a new artifact to `channel` and starts waiting once it is delivered.
    fn display(self, ctx: &MenuContext, channel: &ChannelId) -> MenuHandle;

    /// Re-renders an existing artifact instead of sending a new one.
    fn display_on(self, ctx: &MenuContext, channel: &ChannelId, artifact: &ArtifactId)
        -> MenuHandle;
}

/// Observes and cancels a displayed menu.
#[derive(Clone)]
pub struct MenuHandle {
    flow: Arc<dyn FlowControl>,
}

impl MenuHandle {
    pub(crate) fn new(flow: Arc<dyn FlowControl>) -> Self {
        Self { flow }
    }

    pub fn state(&self) -> FlowState {
        self.flow.state()
    }

    pub fn artifact(&self) -> Option<ArtifactId> {
        self.flow.artifact()
    }

    pub fn is_terminated(&self) -> bool {
        matches!(self.state(), FlowState::Terminated(_))
    }

    /// Cancels the menu from outside, e.g. because the command that showed it was aborted.
    ///
    /// Runs the menu's cancel or final action. Returns `false` when the menu already
    /// terminated, or an interaction is being handled at this very moment.
    pub fn cancel(&self) -> bool {
        self.flow.cancel()
    }
}

impl fmt::Debug for MenuHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MenuHandle")
            .field("state", &self.state())
            .finish()
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MenuError {
    #[error("Menu needs at least one choice")]
    NoChoices,
    #[error("Menu supports at most {max} choices, got {got}")]
    TooManyChoices { max: usize, got: usize },
    #[error("Menu has no content to display")]
    NoContent,
    #[error("Menu has no {0} action")]
    MissingAction(&'static str),
    #[error("Menu needs at least one item")]
    NoItems,
    #[error("Items per page must be at least 1")]
    InvalidItemsPerPage,
}

pub type MenuResult<T> = Result<T, MenuError>;
