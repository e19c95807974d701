// src/dispatch.rs

//! Resize notification fan-out.
//!
//! A `ResizeDispatcher` keeps an ordered registry of subscriber callbacks
//! and invokes them synchronously on every broadcast. Registration is
//! idempotent per callback, notification order is registration order, and a
//! failing subscriber never prevents the remaining ones from running.

use anyhow::Result;
use log::{debug, error};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Notification delivered to every resize subscriber.
///
/// `WindowResized` carries fractional pixel dimensions because host
/// platforms report fractional layout boxes; `FontChanged` means character
/// metrics are stale and cached layout must be recomputed even though the
/// window itself did not move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResizeEvent {
    /// The area available to the terminal surface changed, in pixels.
    WindowResized { width_px: f64, height_px: f64 },
    /// The font size or family changed.
    FontChanged,
}

/// Callback invoked on every broadcast.
///
/// Subscribers report failure through the `Result`; the dispatcher logs it
/// and moves on to the next subscriber.
pub type ResizeHandler = Rc<dyn Fn(&ResizeEvent) -> Result<()>>;

/// Token identifying one registered handler, used to remove it later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

/// Ordered fan-out registry for resize notifications.
///
/// Uses interior mutability so subscribers can be registered and removed
/// through shared references, including from inside a running broadcast.
pub struct ResizeDispatcher {
    subscribers: RefCell<Vec<(SubscriberId, ResizeHandler)>>,
    next_id: Cell<u64>,
}

impl ResizeDispatcher {
    pub fn new() -> Self {
        ResizeDispatcher {
            subscribers: RefCell::new(Vec::new()),
            next_id: Cell::new(0),
        }
    }

    /// Registers `handler` and returns its token.
    ///
    /// Registration is idempotent by callback identity: subscribing the same
    /// `Rc` again returns the token it already holds, so a handler fires at
    /// most once per broadcast no matter how many times it was passed in.
    pub fn subscribe(&self, handler: ResizeHandler) -> SubscriberId {
        let mut subscribers = self.subscribers.borrow_mut();
        if let Some((id, _)) = subscribers
            .iter()
            .find(|(_, existing)| Rc::ptr_eq(existing, &handler))
        {
            debug!("ResizeDispatcher: handler already registered as {:?}", id);
            return *id;
        }
        let id = SubscriberId(self.next_id.get());
        self.next_id.set(self.next_id.get() + 1);
        subscribers.push((id, handler));
        debug!(
            "ResizeDispatcher: registered {:?} ({} subscriber(s) total)",
            id,
            subscribers.len()
        );
        id
    }

    /// Removes the handler registered under `id`, returning whether anything
    /// was removed. The remaining handlers keep their relative order.
    pub fn unsubscribe(&self, id: SubscriberId) -> bool {
        let mut subscribers = self.subscribers.borrow_mut();
        let before = subscribers.len();
        subscribers.retain(|(sid, _)| *sid != id);
        let removed = subscribers.len() != before;
        if removed {
            debug!("ResizeDispatcher: removed {:?}", id);
        }
        removed
    }

    /// Invokes every handler registered at the time of the call, in
    /// registration order, passing `event` to each. Returns once all of
    /// them have run.
    ///
    /// The registry is snapshotted up front, so handlers are free to
    /// subscribe or unsubscribe during the broadcast; such changes take
    /// effect from the next broadcast. A handler returning `Err` is logged
    /// and the remaining handlers still run.
    pub fn broadcast(&self, event: &ResizeEvent) {
        let snapshot: Vec<(SubscriberId, ResizeHandler)> = self.subscribers.borrow().clone();
        if snapshot.is_empty() {
            return;
        }
        debug!(
            "ResizeDispatcher: broadcasting {:?} to {} subscriber(s)",
            event,
            snapshot.len()
        );
        for (id, handler) in snapshot {
            if let Err(e) = handler(event) {
                error!("ResizeDispatcher: subscriber {:?} failed: {:#}", id, e);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.subscribers.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.borrow().is_empty()
    }
}

impl Default for ResizeDispatcher {
    fn default() -> Self {
        Self::new()
    }
}
