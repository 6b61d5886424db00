//! Install assistant sidebar
//!
//! The sidebar is split into a pure state machine and the pieces that
//! perform its side effects:
//!
//! - [`state`]: `SidebarState`, events, effects and the `reduce` transition
//! - [`controller`]: owns a state, runs effects (fetch, clipboard, timers, persistence)
//! - [`clipboard`]: clipboard access with a terminal fallback
//! - [`view`]: render model derived from a state, with text rendering

pub mod clipboard;
pub mod controller;
pub mod state;
pub mod view;

pub use controller::Sidebar;
pub use state::{Effect, FetchStatus, SidebarEvent, SidebarState, reduce};
pub use view::SidebarView;
