// tests/viewport_pipeline.rs

//! End-to-end run of the viewport pipeline against the headless backend:
//! resize notifications, grid sizing, font propagation and fullscreen
//! toggling, driven the way a host application would.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use term_viewport::{
    ComputedStyle, FontConfig, FullscreenOutcome, HeadlessBackend, ResizeEvent, TerminalGrid,
    ViewportManager,
};

/// A terminal widget stand-in: remembers its viewport, reflows on every
/// notification and keeps a log of what it saw.
struct Pane {
    size_px: Cell<(f64, f64)>,
    grid: Cell<TerminalGrid>,
    seen: RefCell<Vec<ResizeEvent>>,
}

impl Pane {
    fn new() -> Rc<Pane> {
        Rc::new(Pane {
            size_px: Cell::new((0.0, 0.0)),
            grid: Cell::new(TerminalGrid::FALLBACK),
            seen: RefCell::new(Vec::new()),
        })
    }

    fn attach(pane: &Rc<Pane>, manager: &Rc<ViewportManager<HeadlessBackend>>) {
        let pane = Rc::clone(pane);
        let weak = Rc::downgrade(manager);
        manager.on_resize(Rc::new(move |event| {
            pane.seen.borrow_mut().push(*event);
            if let ResizeEvent::WindowResized {
                width_px,
                height_px,
            } = *event
            {
                pane.size_px.set((width_px, height_px));
            }
            if let Some(manager) = weak.upgrade() {
                let (width_px, height_px) = pane.size_px.get();
                pane.grid.set(manager.terminal_grid(width_px, height_px)?);
            }
            Ok(())
        }));
    }
}

#[test_log::test]
fn window_resize_then_font_change_then_fullscreen() {
    let mut backend = HeadlessBackend::with_line_style(ComputedStyle::new(
        "14px",
        "monospace",
        "16px",
    ));
    backend.add_modal_container();

    let config = FontConfig::default().into_shared();
    let manager = Rc::new(ViewportManager::new(backend, Rc::clone(&config)));

    let pane = Pane::new();
    Pane::attach(&pane, &manager);

    // 14px font at half-em advance: 7px cells, 16px lines.
    manager.trigger_resize(&ResizeEvent::WindowResized {
        width_px: 1400.0,
        height_px: 800.0,
    });
    assert_eq!(pane.grid.get(), TerminalGrid { cols: 200, rows: 50 });

    // The font change restyles the document and the pane reflows with the
    // new 10px cells while keeping its last known viewport.
    manager.set_font_size("20px");
    assert_eq!(config.borrow().size, "20px");
    assert_eq!(pane.grid.get(), TerminalGrid { cols: 140, rows: 50 });

    {
        let backend = manager.backend();
        assert_eq!(backend.root_font().size.as_deref(), Some("20px"));
        assert_eq!(backend.modal_fonts()[0].size.as_deref(), Some("20px"));
        // Two sizings so far, one measurement surface.
        assert_eq!(backend.measure_surfaces_created(), 1);
    }

    assert_eq!(
        *pane.seen.borrow(),
        vec![
            ResizeEvent::WindowResized {
                width_px: 1400.0,
                height_px: 800.0,
            },
            ResizeEvent::FontChanged,
        ]
    );

    let timeout = Duration::from_millis(100);
    assert_eq!(
        manager.toggle_fullscreen(timeout),
        Ok(FullscreenOutcome::Entered)
    );
    assert_eq!(
        manager.toggle_fullscreen(timeout),
        Ok(FullscreenOutcome::Exited)
    );
}

#[test]
fn panes_reflow_in_subscription_order() {
    let manager = Rc::new(ViewportManager::new(
        HeadlessBackend::with_line_style(ComputedStyle::new("16px", "monospace", "16px")),
        FontConfig::default().into_shared(),
    ));

    let order = Rc::new(RefCell::new(Vec::new()));
    for tag in ["status-bar", "scrollback", "composer"] {
        let order = Rc::clone(&order);
        manager.on_resize(Rc::new(move |_| {
            order.borrow_mut().push(tag);
            Ok(())
        }));
    }

    manager.set_font_family("Fira Code");
    assert_eq!(*order.borrow(), vec!["status-bar", "scrollback", "composer"]);
}

#[test]
fn sizing_before_the_output_mounts_uses_the_default_grid() {
    let manager = ViewportManager::new(
        HeadlessBackend::new(),
        FontConfig::default().into_shared(),
    );
    assert_eq!(
        manager.terminal_grid(1920.0, 1080.0).unwrap(),
        TerminalGrid { cols: 80, rows: 25 }
    );
}
