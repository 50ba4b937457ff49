//! Terminal UI for mediascope.
//!
//! - [render]: the per-frame entry point and the tab body renderers.
//! - [widgets]: dialog helpers, palette and the chrome around the body.
//! - [overlays]: notifications stacked over the workspace.

pub mod overlays;
pub mod render;
pub mod widgets;

pub use render::render;
