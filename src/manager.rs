// src/manager.rs

//! The owning context that ties the viewport pieces together.

use crate::config::SharedFontConfig;
use crate::dispatch::{ResizeDispatcher, ResizeEvent, ResizeHandler, SubscriberId};
use crate::fullscreen::{self, FullscreenError, FullscreenOutcome};
use crate::platform::{FontProperty, WindowBackend};
use crate::sizer::{GridSizer, TerminalGrid};
use anyhow::Result;
use log::debug;
use std::cell::{Ref, RefCell};
use std::rc::Rc;
use std::time::Duration;

/// Owns the resize fan-out, the grid sizer with its memoized measurement
/// surface, the platform backend and the shared font configuration.
///
/// Every operation takes `&self`: the manager is meant to live in an `Rc`
/// so resize subscribers can hold a handle back into it and recompute their
/// grid from inside a broadcast. Single-threaded, like the event-loop model
/// it serves.
pub struct ViewportManager<B: WindowBackend> {
    backend: RefCell<B>,
    dispatcher: ResizeDispatcher,
    sizer: GridSizer<B>,
    font_config: SharedFontConfig,
}

impl<B: WindowBackend> ViewportManager<B> {
    pub fn new(backend: B, font_config: SharedFontConfig) -> Self {
        ViewportManager {
            backend: RefCell::new(backend),
            dispatcher: ResizeDispatcher::new(),
            sizer: GridSizer::new(),
            font_config,
        }
    }

    /// Registers a resize subscriber; idempotent per handler. See
    /// `ResizeDispatcher::subscribe`.
    pub fn on_resize(&self, handler: ResizeHandler) -> SubscriberId {
        self.dispatcher.subscribe(handler)
    }

    /// Removes a previously registered subscriber, returning whether it was
    /// still registered.
    pub fn unsubscribe(&self, id: SubscriberId) -> bool {
        self.dispatcher.unsubscribe(id)
    }

    /// Fans `event` out to every subscriber in registration order, then
    /// returns.
    pub fn trigger_resize(&self, event: &ResizeEvent) {
        self.dispatcher.broadcast(event);
    }

    /// Character grid for a viewport of the given pixel size, measured
    /// against the output surface's current font. See `GridSizer::grid_for`
    /// for the fallback rules.
    pub fn terminal_grid(&self, width_px: f64, height_px: f64) -> Result<TerminalGrid> {
        self.sizer
            .grid_for(&self.backend.borrow(), width_px, height_px)
    }

    /// Sets the font size: writes the shared configuration, restyles the
    /// root surface and every modal container present right now, then
    /// notifies subscribers so dependent layout is recomputed.
    pub fn set_font_size(&self, value: &str) {
        debug!("ViewportManager: font size -> {:?}", value);
        self.font_config.borrow_mut().size = value.to_string();
        self.apply_font_property(FontProperty::Size, value);
        self.dispatcher.broadcast(&ResizeEvent::FontChanged);
    }

    /// Sets the font family, with the same propagation as `set_font_size`.
    pub fn set_font_family(&self, value: &str) {
        debug!("ViewportManager: font family -> {:?}", value);
        self.font_config.borrow_mut().family = value.to_string();
        self.apply_font_property(FontProperty::Family, value);
        self.dispatcher.broadcast(&ResizeEvent::FontChanged);
    }

    /// Toggles fullscreen for the document body, waiting at most `timeout`
    /// for the platform's answer. See `fullscreen::toggle_fullscreen`.
    pub fn toggle_fullscreen(
        &self,
        timeout: Duration,
    ) -> Result<FullscreenOutcome, FullscreenError> {
        fullscreen::toggle_fullscreen(&mut *self.backend.borrow_mut(), timeout)
    }

    /// Handle to the shared font configuration.
    pub fn font_config(&self) -> SharedFontConfig {
        Rc::clone(&self.font_config)
    }

    /// Read access to the backend, e.g. for platform state queries.
    ///
    /// The borrow must not be held across calls back into the manager.
    pub fn backend(&self) -> Ref<'_, B> {
        self.backend.borrow()
    }

    /// Tears the manager down, releasing the backend and the measurement
    /// surface memoized for it.
    pub fn into_backend(self) -> B {
        self.backend.into_inner()
    }

    fn apply_font_property(&self, property: FontProperty, value: &str) {
        let mut backend = self.backend.borrow_mut();
        backend.style_app_root(property, value);
        backend.style_modal_containers(property, value);
    }
}
