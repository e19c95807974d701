// src/fullscreen.rs

//! Cooperative fullscreen toggling.
//!
//! Fullscreen transitions are platform promises: a request returns
//! immediately and the platform reports the outcome later. This module
//! models that as a request/reply pair. The backend hands back a
//! `PendingFullscreen` receipt and the caller waits on it with an explicit
//! bound; this wait is the one suspension point in the crate.

use crate::platform::WindowBackend;
use log::{debug, info};
use std::fmt;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::Duration;

/// The platform's answer to a fullscreen request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FullscreenReply {
    /// The transition completed.
    Granted,
    /// The platform refused, e.g. for permission or user-gesture reasons.
    Denied(String),
}

/// Receipt for an in-flight fullscreen transition.
pub struct PendingFullscreen {
    reply: Receiver<FullscreenReply>,
}

impl PendingFullscreen {
    /// Creates a receipt together with the sender the platform fulfills it
    /// with. The sender may move to another thread.
    pub fn channel() -> (Sender<FullscreenReply>, PendingFullscreen) {
        let (tx, rx) = mpsc::channel();
        (tx, PendingFullscreen { reply: rx })
    }

    /// A receipt that is already fulfilled, for platforms that complete
    /// transitions synchronously.
    pub fn ready(reply: FullscreenReply) -> PendingFullscreen {
        let (tx, pending) = Self::channel();
        // The receiver is alive inside `pending`, so this cannot fail.
        let _ = tx.send(reply);
        pending
    }

    /// Waits for the platform's answer, at most `timeout`.
    ///
    /// A platform that never answers is cut off by the timeout rather than
    /// suspending the caller forever.
    pub fn wait(self, timeout: Duration) -> Result<(), FullscreenError> {
        match self.reply.recv_timeout(timeout) {
            Ok(FullscreenReply::Granted) => Ok(()),
            Ok(FullscreenReply::Denied(reason)) => Err(FullscreenError::Denied(reason)),
            Err(RecvTimeoutError::Timeout) => Err(FullscreenError::TimedOut(timeout)),
            Err(RecvTimeoutError::Disconnected) => Err(FullscreenError::Abandoned),
        }
    }
}

/// Why a fullscreen transition did not complete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FullscreenError {
    /// The platform rejected the request.
    Denied(String),
    /// The platform dropped the request without answering.
    Abandoned,
    /// No answer arrived within the allowed wait.
    TimedOut(Duration),
}

impl fmt::Display for FullscreenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FullscreenError::Denied(reason) => {
                write!(f, "fullscreen request denied: {}", reason)
            }
            FullscreenError::Abandoned => {
                write!(f, "fullscreen request dropped by the platform")
            }
            FullscreenError::TimedOut(timeout) => {
                write!(f, "no fullscreen reply within {:?}", timeout)
            }
        }
    }
}

impl std::error::Error for FullscreenError {}

/// What a `toggle_fullscreen` call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FullscreenOutcome {
    /// No fullscreen element was active; the document body entered
    /// fullscreen.
    Entered,
    /// A fullscreen element was active; the window left fullscreen.
    Exited,
    /// A fullscreen element was active but the platform cannot exit
    /// programmatically; nothing was requested.
    ExitUnavailable,
}

/// Toggles fullscreen for the document body.
///
/// The platform owns the fullscreen state, so the current direction is read
/// from it on every call instead of being tracked locally. Waits at most
/// `timeout` for the platform's answer.
pub fn toggle_fullscreen<B>(
    backend: &mut B,
    timeout: Duration,
) -> Result<FullscreenOutcome, FullscreenError>
where
    B: WindowBackend + ?Sized,
{
    if !backend.fullscreen_active() {
        debug!("Fullscreen: requesting entry");
        backend.request_fullscreen_enter().wait(timeout)?;
        info!("Fullscreen: entered");
        Ok(FullscreenOutcome::Entered)
    } else if backend.supports_fullscreen_exit() {
        debug!("Fullscreen: requesting exit");
        backend.request_fullscreen_exit().wait(timeout)?;
        info!("Fullscreen: exited");
        Ok(FullscreenOutcome::Exited)
    } else {
        debug!("Fullscreen: active, but the platform cannot exit programmatically");
        Ok(FullscreenOutcome::ExitUnavailable)
    }
}
