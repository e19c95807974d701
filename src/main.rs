// src/main.rs

//! Demo binary: drives the viewport against the headless backend and logs
//! what a host application would observe.

use anyhow::Result;
use log::info;
use std::cell::Cell;
use std::path::Path;
use std::rc::Rc;
use std::time::Duration;

use term_viewport::{
    ComputedStyle, FontConfig, HeadlessBackend, ResizeEvent, ResizeHandler, TerminalGrid,
    ViewportManager,
};

fn main() -> Result<()> {
    // Default filter is "info" if RUST_LOG is not set.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_micros()
        .init();

    info!("Starting term-viewport demo...");

    let font_config = match std::env::var_os("TERM_VIEWPORT_CONFIG") {
        Some(path) => FontConfig::load_or_default(Path::new(&path)),
        None => FontConfig::default(),
    };
    info!("Font config: {:?}", font_config);

    let backend = HeadlessBackend::with_line_style(ComputedStyle::new(
        &font_config.size,
        &font_config.family,
        "16px",
    ));
    let manager = Rc::new(ViewportManager::new(backend, font_config.into_shared()));

    // A pane that reflows itself on every notification, the way a terminal
    // widget would.
    let pane_size = Rc::new(Cell::new((1024.0_f64, 768.0_f64)));
    let pane_grid = Rc::new(Cell::new(TerminalGrid::FALLBACK));
    let reflow: ResizeHandler = {
        let weak = Rc::downgrade(&manager);
        let pane_size = Rc::clone(&pane_size);
        let pane_grid = Rc::clone(&pane_grid);
        Rc::new(move |event| {
            if let ResizeEvent::WindowResized {
                width_px,
                height_px,
            } = *event
            {
                pane_size.set((width_px, height_px));
            }
            let manager = match weak.upgrade() {
                Some(manager) => manager,
                None => return Ok(()),
            };
            let (width_px, height_px) = pane_size.get();
            let grid = manager.terminal_grid(width_px, height_px)?;
            pane_grid.set(grid);
            info!(
                "Pane: {:?} -> {} cols x {} rows",
                event, grid.cols, grid.rows
            );
            Ok(())
        })
    };
    manager.on_resize(reflow);

    manager.trigger_resize(&ResizeEvent::WindowResized {
        width_px: 1024.0,
        height_px: 768.0,
    });

    manager.set_font_size("18px");
    manager.set_font_family("Fira Code");
    info!("Font config now: {:?}", manager.font_config().borrow());

    let timeout = Duration::from_millis(250);
    info!("Fullscreen toggle: {:?}", manager.toggle_fullscreen(timeout)?);
    info!("Fullscreen toggle: {:?}", manager.toggle_fullscreen(timeout)?);

    let grid = pane_grid.get();
    info!("Final pane grid: {} cols x {} rows", grid.cols, grid.rows);
    Ok(())
}
