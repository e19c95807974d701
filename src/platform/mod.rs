// src/platform/mod.rs

//! Platform abstraction layer.
//!
//! Everything the viewport needs from the host window system sits behind
//! the `WindowBackend` trait; `HeadlessBackend` is the windowless
//! implementation used by tests and demos.

pub mod backend;
pub mod headless;

pub use backend::{ComputedStyle, FontProperty, WindowBackend};
pub use headless::{HeadlessBackend, InlineFont};
