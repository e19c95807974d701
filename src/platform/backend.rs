// src/platform/backend.rs

//! The `WindowBackend` trait and the style types that cross it.

use crate::fullscreen::PendingFullscreen;
use anyhow::Result;

/// Computed style sampled from a rendered line of the output surface.
///
/// Values are the strings the platform reports, kept verbatim. The numeric
/// accessors strip the `px` suffix; platforms that report other units make
/// the value unusable and the sizer falls back to its default grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComputedStyle {
    pub font_size: String,
    pub font_family: String,
    pub line_height: String,
}

impl ComputedStyle {
    pub fn new(font_size: &str, font_family: &str, line_height: &str) -> Self {
        ComputedStyle {
            font_size: font_size.to_string(),
            font_family: font_family.to_string(),
            line_height: line_height.to_string(),
        }
    }

    /// Font size in pixels, if the reported value is a `px` length.
    pub fn font_size_px(&self) -> Option<f64> {
        parse_px(&self.font_size)
    }

    /// Line height in pixels, if the reported value is a `px` length.
    /// Keyword values such as `"normal"` yield `None`.
    pub fn line_height_px(&self) -> Option<f64> {
        parse_px(&self.line_height)
    }
}

fn parse_px(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    let trimmed = trimmed.strip_suffix("px").unwrap_or(trimmed);
    trimmed.trim().parse::<f64>().ok()
}

/// Which font property a style write targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontProperty {
    Size,
    Family,
}

/// The host platform's window and document facilities, as the viewport
/// needs them: computed-style sampling, offscreen text measurement, inline
/// style writes and fullscreen transitions.
///
/// Implementations decide what the "output surface", "root surface" and
/// "modal containers" concretely are; the viewport only relies on the
/// contracts stated here. Like the rest of the crate, the trait assumes the
/// single-threaded event-loop model of its host.
pub trait WindowBackend {
    /// Handle to the platform's offscreen text-measurement surface. The
    /// sizer creates it once on first use and reuses it afterwards.
    type MeasureSurface;

    /// Computed style of the first rendered line of the output surface, or
    /// `None` when the surface is not mounted or has no rendered line yet.
    fn sample_line_style(&self) -> Option<ComputedStyle>;

    /// Creates the offscreen measurement surface.
    fn create_measure_surface(&self) -> Result<Self::MeasureSurface>;

    /// Width in pixels of `sample` rendered in the font described by
    /// `style`. Only the font size and family of `style` are relevant.
    fn measure_text_width(
        &self,
        surface: &Self::MeasureSurface,
        style: &ComputedStyle,
        sample: &str,
    ) -> f64;

    /// Applies a font property to the root application surface.
    fn style_app_root(&mut self, property: FontProperty, value: &str);

    /// Applies a font property to every modal container mounted at the time
    /// of the call. The set of containers is queried fresh each time; it
    /// may be empty.
    fn style_modal_containers(&mut self, property: FontProperty, value: &str);

    /// Whether a fullscreen element is currently active.
    fn fullscreen_active(&self) -> bool;

    /// Whether the platform can leave fullscreen programmatically.
    fn supports_fullscreen_exit(&self) -> bool;

    /// Asks the platform to make the document body fullscreen. Returns
    /// immediately; the receipt resolves when the platform answers.
    fn request_fullscreen_enter(&mut self) -> PendingFullscreen;

    /// Asks the platform to leave fullscreen. Returns immediately; the
    /// receipt resolves when the platform answers.
    fn request_fullscreen_exit(&mut self) -> PendingFullscreen;
}
