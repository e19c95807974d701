// src/sizer.rs

//! Pixel-to-character-grid sizing.
//!
//! Character metrics are sampled live from the output surface on every
//! request and never cached, since a font change silently invalidates them.
//! The only retained resource is the offscreen measurement surface, created
//! on first use and reused for the lifetime of the sizer.

use crate::platform::{ComputedStyle, WindowBackend};
use anyhow::{Context, Result};
use log::{trace, warn};
use once_cell::unsync::OnceCell;

/// Grid assumed whenever the output surface cannot be sampled, e.g. before
/// it first mounts.
pub const DEFAULT_GRID_COLS: u16 = 80;
pub const DEFAULT_GRID_ROWS: u16 = 25;

/// Narrow glyph whose rendered advance stands in for the character width.
const MEASURE_SAMPLE: &str = "-";

/// Measured character-cell metrics, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontMetrics {
    pub char_width_px: f64,
    pub line_height_px: f64,
}

/// Terminal dimensions in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalGrid {
    pub cols: u16,
    pub rows: u16,
}

impl TerminalGrid {
    /// The grid reported when no metrics are available.
    pub const FALLBACK: TerminalGrid = TerminalGrid {
        cols: DEFAULT_GRID_COLS,
        rows: DEFAULT_GRID_ROWS,
    };

    /// Floor-divides pixel dimensions by per-cell metrics. Fractional cells
    /// are discarded; negative pixel sizes clamp to an empty grid. No upper
    /// bound is applied beyond the integer range, so callers with stricter
    /// limits clamp the result themselves.
    pub fn from_pixels(width_px: f64, height_px: f64, metrics: &FontMetrics) -> TerminalGrid {
        TerminalGrid {
            cols: (width_px / metrics.char_width_px).floor() as u16,
            rows: (height_px / metrics.line_height_px).floor() as u16,
        }
    }
}

/// Converts viewport pixel dimensions into a character grid, using metrics
/// sampled from the live output surface.
///
/// Generic over the backend so the measurement-surface handle can be stored
/// without boxing.
pub struct GridSizer<B: WindowBackend> {
    measure_surface: OnceCell<B::MeasureSurface>,
}

impl<B: WindowBackend> GridSizer<B> {
    pub fn new() -> Self {
        GridSizer {
            measure_surface: OnceCell::new(),
        }
    }

    /// Character grid for a viewport of `width_px` by `height_px`.
    ///
    /// Falls back to the default 80x25 grid when the output surface is
    /// missing or has no rendered line, and when the sampled metrics are
    /// degenerate (zero or negative, or a line height that is not a pixel
    /// length). Fails only if the platform cannot provide the measurement
    /// surface.
    pub fn grid_for(&self, backend: &B, width_px: f64, height_px: f64) -> Result<TerminalGrid> {
        let style = match backend.sample_line_style() {
            Some(style) => style,
            None => {
                trace!(
                    "GridSizer: no sampleable output line, assuming {}x{}",
                    DEFAULT_GRID_COLS,
                    DEFAULT_GRID_ROWS
                );
                return Ok(TerminalGrid::FALLBACK);
            }
        };

        let metrics = match self.sample_metrics(backend, &style)? {
            Some(metrics) => metrics,
            None => return Ok(TerminalGrid::FALLBACK),
        };

        let grid = TerminalGrid::from_pixels(width_px, height_px, &metrics);
        trace!(
            "GridSizer: {}x{} px -> {}x{} cells (cell {}x{} px)",
            width_px,
            height_px,
            grid.cols,
            grid.rows,
            metrics.char_width_px,
            metrics.line_height_px
        );
        Ok(grid)
    }

    /// Measures the character cell for `style`. `None` means the metrics
    /// are unusable and the caller should fall back to the default grid.
    fn sample_metrics(&self, backend: &B, style: &ComputedStyle) -> Result<Option<FontMetrics>> {
        let surface = self
            .measure_surface
            .get_or_try_init(|| backend.create_measure_surface())
            .context("creating the text measurement surface")?;

        let char_width_px = backend.measure_text_width(surface, style, MEASURE_SAMPLE);

        let line_height_px = match style.line_height_px() {
            Some(height) => height,
            None => {
                warn!(
                    "GridSizer: line height {:?} is not a pixel length, assuming {}x{}",
                    style.line_height, DEFAULT_GRID_COLS, DEFAULT_GRID_ROWS
                );
                return Ok(None);
            }
        };

        if char_width_px <= 0.0 || line_height_px <= 0.0 {
            warn!(
                "GridSizer: degenerate metrics (cell {}x{} px), assuming {}x{}",
                char_width_px, line_height_px, DEFAULT_GRID_COLS, DEFAULT_GRID_ROWS
            );
            return Ok(None);
        }

        Ok(Some(FontMetrics {
            char_width_px,
            line_height_px,
        }))
    }
}

impl<B: WindowBackend> Default for GridSizer<B> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fullscreen::{FullscreenReply, PendingFullscreen};
    use crate::platform::FontProperty;
    use anyhow::bail;
    use std::cell::Cell;

    /// Backend with fixed metrics, enough to drive the sizer.
    struct FixedBackend {
        style: Option<ComputedStyle>,
        char_width_px: f64,
        surfaces_created: Cell<u32>,
        fail_surface_creation: bool,
    }

    impl FixedBackend {
        fn new(style: Option<ComputedStyle>, char_width_px: f64) -> Self {
            FixedBackend {
                style,
                char_width_px,
                surfaces_created: Cell::new(0),
                fail_surface_creation: false,
            }
        }
    }

    impl WindowBackend for FixedBackend {
        type MeasureSurface = ();

        fn sample_line_style(&self) -> Option<ComputedStyle> {
            self.style.clone()
        }

        fn create_measure_surface(&self) -> Result<()> {
            if self.fail_surface_creation {
                bail!("measurement surface unavailable");
            }
            self.surfaces_created.set(self.surfaces_created.get() + 1);
            Ok(())
        }

        fn measure_text_width(&self, _: &(), _: &ComputedStyle, sample: &str) -> f64 {
            self.char_width_px * sample.chars().count() as f64
        }

        fn style_app_root(&mut self, _: FontProperty, _: &str) {}

        fn style_modal_containers(&mut self, _: FontProperty, _: &str) {}

        fn fullscreen_active(&self) -> bool {
            false
        }

        fn supports_fullscreen_exit(&self) -> bool {
            false
        }

        fn request_fullscreen_enter(&mut self) -> PendingFullscreen {
            PendingFullscreen::ready(FullscreenReply::Granted)
        }

        fn request_fullscreen_exit(&mut self) -> PendingFullscreen {
            PendingFullscreen::ready(FullscreenReply::Granted)
        }
    }

    fn mono_style() -> ComputedStyle {
        ComputedStyle::new("16px", "monospace", "16px")
    }

    #[test]
    fn from_pixels_floors_partial_cells() {
        let metrics = FontMetrics {
            char_width_px: 8.0,
            line_height_px: 16.0,
        };
        assert_eq!(
            TerminalGrid::from_pixels(800.0, 400.0, &metrics),
            TerminalGrid { cols: 100, rows: 25 }
        );
        assert_eq!(
            TerminalGrid::from_pixels(799.9, 415.9, &metrics),
            TerminalGrid { cols: 99, rows: 25 }
        );
    }

    #[test]
    fn from_pixels_clamps_negative_sizes_to_zero() {
        let metrics = FontMetrics {
            char_width_px: 8.0,
            line_height_px: 16.0,
        };
        let grid = TerminalGrid::from_pixels(-10.0, -10.0, &metrics);
        assert_eq!(grid, TerminalGrid { cols: 0, rows: 0 });
    }

    #[test]
    fn missing_output_line_yields_the_default_grid() {
        let backend = FixedBackend::new(None, 8.0);
        let sizer = GridSizer::new();
        let grid = sizer.grid_for(&backend, 1024.0, 768.0).unwrap();
        assert_eq!(grid, TerminalGrid::FALLBACK);
        assert_eq!(grid, TerminalGrid { cols: 80, rows: 25 });
    }

    #[test]
    fn measured_metrics_drive_the_grid() {
        let backend = FixedBackend::new(Some(mono_style()), 8.0);
        let sizer = GridSizer::new();
        let grid = sizer.grid_for(&backend, 800.0, 400.0).unwrap();
        assert_eq!(grid, TerminalGrid { cols: 100, rows: 25 });
    }

    #[test]
    fn measurement_surface_is_created_once() {
        let backend = FixedBackend::new(Some(mono_style()), 8.0);
        let sizer = GridSizer::new();
        for _ in 0..5 {
            sizer.grid_for(&backend, 640.0, 480.0).unwrap();
        }
        assert_eq!(backend.surfaces_created.get(), 1);
    }

    #[test_log::test]
    fn zero_width_glyph_falls_back_to_the_default_grid() {
        let backend = FixedBackend::new(Some(mono_style()), 0.0);
        let sizer = GridSizer::new();
        let grid = sizer.grid_for(&backend, 800.0, 400.0).unwrap();
        assert_eq!(grid, TerminalGrid::FALLBACK);
    }

    #[test]
    fn keyword_line_height_falls_back_to_the_default_grid() {
        let style = ComputedStyle::new("16px", "monospace", "normal");
        let backend = FixedBackend::new(Some(style), 8.0);
        let sizer = GridSizer::new();
        let grid = sizer.grid_for(&backend, 800.0, 400.0).unwrap();
        assert_eq!(grid, TerminalGrid::FALLBACK);
    }

    #[test]
    fn surface_creation_failure_propagates() {
        let mut backend = FixedBackend::new(Some(mono_style()), 8.0);
        backend.fail_surface_creation = true;
        let sizer = GridSizer::new();
        assert!(sizer.grid_for(&backend, 800.0, 400.0).is_err());
    }

    #[test]
    fn fresh_style_is_sampled_on_every_request() {
        let mut backend = FixedBackend::new(Some(mono_style()), 8.0);
        let sizer = GridSizer::new();
        assert_eq!(
            sizer.grid_for(&backend, 800.0, 400.0).unwrap(),
            TerminalGrid { cols: 100, rows: 25 }
        );

        // Line height doubles; the next request must see it.
        backend.style = Some(ComputedStyle::new("16px", "monospace", "32px"));
        assert_eq!(
            sizer.grid_for(&backend, 800.0, 400.0).unwrap(),
            TerminalGrid { cols: 100, rows: 12 }
        );
    }
}
