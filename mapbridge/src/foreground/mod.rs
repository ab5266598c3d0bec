//! Foreground surface tracking.
//!
//! The platform reports resume/pause transitions for its UI surfaces. The
//! [`ForegroundTracker`] remembers the surface that resumed last so a map
//! session can be started on top of it.
//!
//! The tracker never owns the surface: it keeps a `Weak` reference, and a
//! surface that has been torn down reads as absent even if no pause was
//! reported for it.

use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use crate::launcher::NavigationRequest;

/// A visible UI surface able to start the map screen.
///
/// Implemented by the platform adapter. `start_map_session` is
/// fire-and-forget: no acknowledgement or error comes back.
pub trait ForegroundSurface: Send + Sync {
    /// Name used in log fields.
    fn name(&self) -> &str;

    /// Hand the navigation record to the platform's screen-start mechanism.
    fn start_map_session(&self, request: &NavigationRequest);
}

/// Tracks the currently visible surface.
///
/// Updated from lifecycle callbacks on the control thread; read by the
/// launcher from any thread.
#[derive(Default)]
pub struct ForegroundTracker {
    top: Mutex<Option<Weak<dyn ForegroundSurface>>>,
}

impl ForegroundTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember `surface` as the visible one.
    pub fn on_resume(&self, surface: &Arc<dyn ForegroundSurface>) {
        tracing::debug!(surface = surface.name(), "Surface resumed");
        *self.top.lock() = Some(Arc::downgrade(surface));
    }

    /// Forget the visible surface.
    ///
    /// Only one surface can be resumed at a time, so the slot is cleared
    /// whichever surface is passed.
    pub fn on_pause(&self, surface: &Arc<dyn ForegroundSurface>) {
        tracing::debug!(surface = surface.name(), "Surface paused");
        *self.top.lock() = None;
    }

    /// The visible surface, if it is still alive.
    pub fn top(&self) -> Option<Arc<dyn ForegroundSurface>> {
        self.top.lock().as_ref().and_then(Weak::upgrade)
    }
}

impl fmt::Debug for ForegroundTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let top = self.top();
        f.debug_struct("ForegroundTracker")
            .field(
                "top",
                &top.as_ref().map(|surface| surface.name().to_string()),
            )
            .finish()
    }
}
