// src/platform/headless.rs

//! A deterministic, windowless `WindowBackend`.
//!
//! Stands in for a real platform in tests, demos and CI runs. Styles are
//! recorded instead of rendered, glyph advances follow a fixed model, and
//! fullscreen transitions resolve synchronously unless configured to deny
//! or stall. Inspection accessors expose everything the backend was asked
//! to do.

use crate::fullscreen::{FullscreenReply, PendingFullscreen};
use crate::platform::backend::{ComputedStyle, FontProperty, WindowBackend};
use anyhow::Result;
use log::trace;
use std::cell::Cell;
use std::sync::mpsc::Sender;

/// Inline font styles recorded for one surface.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InlineFont {
    pub size: Option<String>,
    pub family: Option<String>,
}

impl InlineFont {
    fn apply(&mut self, property: FontProperty, value: &str) {
        match property {
            FontProperty::Size => self.size = Some(value.to_string()),
            FontProperty::Family => self.family = Some(value.to_string()),
        }
    }
}

/// Glyph advance as a fraction of the font size. Half an em keeps the
/// arithmetic exact for the usual even pixel sizes; real platforms measure
/// the actual glyph instead.
const DEFAULT_ADVANCE_EM: f64 = 0.5;

/// In-memory backend with a scripted document.
pub struct HeadlessBackend {
    line_style: Option<ComputedStyle>,
    char_advance_em: f64,
    root: InlineFont,
    modals: Vec<InlineFont>,
    fullscreen_active: bool,
    exit_supported: bool,
    fullscreen_denial: Option<String>,
    fullscreen_stalled: bool,
    held_replies: Vec<Sender<FullscreenReply>>,
    enter_requests: u32,
    exit_requests: u32,
    surfaces_created: Cell<u32>,
}

impl HeadlessBackend {
    /// A backend whose output surface has not mounted yet.
    pub fn new() -> Self {
        HeadlessBackend {
            line_style: None,
            char_advance_em: DEFAULT_ADVANCE_EM,
            root: InlineFont::default(),
            modals: Vec::new(),
            fullscreen_active: false,
            exit_supported: true,
            fullscreen_denial: None,
            fullscreen_stalled: false,
            held_replies: Vec::new(),
            enter_requests: 0,
            exit_requests: 0,
            surfaces_created: Cell::new(0),
        }
    }

    /// A backend whose output surface is mounted with the given line style.
    pub fn with_line_style(style: ComputedStyle) -> Self {
        let mut backend = Self::new();
        backend.line_style = Some(style);
        backend
    }

    /// Mounts, replaces or unmounts the output surface's sampled line.
    pub fn set_line_style(&mut self, style: Option<ComputedStyle>) {
        self.line_style = style;
    }

    /// Changes the modeled glyph advance, as a fraction of the font size.
    pub fn set_char_advance_em(&mut self, em: f64) {
        self.char_advance_em = em;
    }

    /// Mounts one more modal container.
    pub fn add_modal_container(&mut self) {
        self.modals.push(InlineFont::default());
    }

    /// Controls whether programmatic fullscreen exit is available.
    pub fn set_exit_supported(&mut self, supported: bool) {
        self.exit_supported = supported;
    }

    /// While set, fullscreen requests are denied with this reason and the
    /// fullscreen state stays untouched.
    pub fn set_fullscreen_denial(&mut self, reason: Option<String>) {
        self.fullscreen_denial = reason;
    }

    /// While set, fullscreen requests are accepted but never answered; only
    /// the caller's timeout ends the wait.
    pub fn set_fullscreen_stalled(&mut self, stalled: bool) {
        self.fullscreen_stalled = stalled;
    }

    /// Inline styles recorded on the root surface.
    pub fn root_font(&self) -> &InlineFont {
        &self.root
    }

    /// Inline styles recorded on each mounted modal container.
    pub fn modal_fonts(&self) -> &[InlineFont] {
        &self.modals
    }

    pub fn fullscreen_enter_requests(&self) -> u32 {
        self.enter_requests
    }

    pub fn fullscreen_exit_requests(&self) -> u32 {
        self.exit_requests
    }

    /// How many measurement surfaces have been handed out.
    pub fn measure_surfaces_created(&self) -> u32 {
        self.surfaces_created.get()
    }

    fn answer(&mut self, entering: bool) -> PendingFullscreen {
        if self.fullscreen_stalled {
            let (tx, pending) = PendingFullscreen::channel();
            // Keep the sender alive so the receipt stalls instead of
            // reading as abandoned.
            self.held_replies.push(tx);
            return pending;
        }
        match self.fullscreen_denial.clone() {
            Some(reason) => PendingFullscreen::ready(FullscreenReply::Denied(reason)),
            None => {
                self.fullscreen_active = entering;
                PendingFullscreen::ready(FullscreenReply::Granted)
            }
        }
    }
}

impl Default for HeadlessBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl WindowBackend for HeadlessBackend {
    type MeasureSurface = ();

    fn sample_line_style(&self) -> Option<ComputedStyle> {
        self.line_style.clone()
    }

    fn create_measure_surface(&self) -> Result<()> {
        self.surfaces_created.set(self.surfaces_created.get() + 1);
        trace!("HeadlessBackend: measurement surface created");
        Ok(())
    }

    fn measure_text_width(&self, _surface: &(), style: &ComputedStyle, sample: &str) -> f64 {
        let font_px = style.font_size_px().unwrap_or(0.0);
        font_px * self.char_advance_em * sample.chars().count() as f64
    }

    fn style_app_root(&mut self, property: FontProperty, value: &str) {
        trace!("HeadlessBackend: root {:?} -> {:?}", property, value);
        self.root.apply(property, value);
        // Restyling the root cascades into the output line's computed
        // style, as it would in a live document.
        if let Some(style) = self.line_style.as_mut() {
            match property {
                FontProperty::Size => style.font_size = value.to_string(),
                FontProperty::Family => style.font_family = value.to_string(),
            }
        }
    }

    fn style_modal_containers(&mut self, property: FontProperty, value: &str) {
        trace!(
            "HeadlessBackend: {} modal container(s) {:?} -> {:?}",
            self.modals.len(),
            property,
            value
        );
        for modal in &mut self.modals {
            modal.apply(property, value);
        }
    }

    fn fullscreen_active(&self) -> bool {
        self.fullscreen_active
    }

    fn supports_fullscreen_exit(&self) -> bool {
        self.exit_supported
    }

    fn request_fullscreen_enter(&mut self) -> PendingFullscreen {
        self.enter_requests += 1;
        self.answer(true)
    }

    fn request_fullscreen_exit(&mut self) -> PendingFullscreen {
        self.exit_requests += 1;
        self.answer(false)
    }
}
