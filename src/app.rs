//! Application state for mediascope.
//!
//! - [state]: the [Session] object owning files, caches and tabs.
//! - [cache]: lazily filled per-file property cache.
//! - [view]: composition of the card, grid and details views from cached data.
//! - [query]: debounced filter text.
//! - [pager]: pagination of the parameter catalog.
//! - [tab]: the workspace tab machine.
//! - [settings]: the settings form draft.
//! - [keymap] and [actions]: key bindings and the prompt line editor.
//! - [handlers]: keypress and action handling on [Session].

pub mod actions;
pub mod cache;
pub mod handlers;
pub mod keymap;
pub mod pager;
pub mod query;
pub mod settings;
pub mod state;
pub mod tab;
pub mod view;

pub use cache::PropertyCache;
pub use state::{DetailsState, KeypressResult, Session, ViewMode};
pub use tab::{Panel, TabKind, Visibility, Workspace};
