// src/lib.rs

//! Viewport management for an embedded terminal surface.
//!
//! Tracks how many character cells fit in the host window, fans resize and
//! font-change notifications out to subscribers, propagates font settings
//! into the host's styling, and drives cooperative fullscreen toggling.
//! The host window system sits behind `platform::WindowBackend`.

pub mod config;
pub mod dispatch;
pub mod fullscreen;
pub mod manager;
pub mod platform;
pub mod sizer;

pub use config::{FontConfig, SharedFontConfig};
pub use dispatch::{ResizeDispatcher, ResizeEvent, ResizeHandler, SubscriberId};
pub use fullscreen::{
    toggle_fullscreen, FullscreenError, FullscreenOutcome, FullscreenReply, PendingFullscreen,
};
pub use manager::ViewportManager;
pub use platform::{ComputedStyle, FontProperty, HeadlessBackend, WindowBackend};
pub use sizer::{FontMetrics, GridSizer, TerminalGrid, DEFAULT_GRID_COLS, DEFAULT_GRID_ROWS};
