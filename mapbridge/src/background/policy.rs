//! Background policy evaluator.
//!
//! Runs once per foreground→background transition: reads the state providers,
//! applies [`decide`], and stops the location subsystem only when nothing
//! still needs it.

use std::fmt;
use std::sync::Arc;

use super::decision::{decide, BackgroundDecision, BackgroundSignals, LocationMode};

/// Log target for location policy decisions.
pub const LOCATION_TARGET: &str = "mapbridge::location";

/// Synchronous state queries read by the policy.
///
/// Each query is answered by a different part of the app (display manager,
/// routing controller, map engine, track recorder).
pub trait BackgroundStateSource: Send + Sync {
    /// A non-primary display is in use.
    fn auxiliary_display_in_use(&self) -> bool;
    fn is_navigating(&self) -> bool;
    fn is_engine_created(&self) -> bool;
    fn location_mode(&self) -> LocationMode;
    fn is_track_recording_enabled(&self) -> bool;

    /// Read every query once.
    fn snapshot(&self) -> BackgroundSignals {
        BackgroundSignals {
            auxiliary_display_in_use: self.auxiliary_display_in_use(),
            navigating: self.is_navigating(),
            engine_created: self.is_engine_created(),
            location_mode: self.location_mode(),
            track_recording_enabled: self.is_track_recording_enabled(),
        }
    }
}

/// The location subsystem controlled by the policy.
///
/// Both calls may be repeated across transitions and must tolerate it.
pub trait LocationSubsystem: Send + Sync {
    /// Release location updates. Blocking, idempotent.
    fn stop(&self);

    /// Resume location updates after returning to the foreground.
    fn resume_in_foreground(&self);
}

/// Applies the background policy on lifecycle transitions.
pub struct BackgroundPolicy {
    state: Arc<dyn BackgroundStateSource>,
    location: Arc<dyn LocationSubsystem>,
}

impl fmt::Debug for BackgroundPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackgroundPolicy").finish_non_exhaustive()
    }
}

impl BackgroundPolicy {
    pub fn new(
        state: Arc<dyn BackgroundStateSource>,
        location: Arc<dyn LocationSubsystem>,
    ) -> Self {
        Self { state, location }
    }

    /// Handle the app leaving the foreground.
    pub fn on_background(&self) -> BackgroundDecision {
        let signals = self.state.snapshot();
        let decision = decide(&signals);

        tracing::info!(
            target: LOCATION_TARGET,
            decision = %decision,
            auxiliary_display = signals.auxiliary_display_in_use,
            navigating = signals.navigating,
            engine_created = signals.engine_created,
            mode = %signals.location_mode,
            track_recording = signals.track_recording_enabled,
            "{}",
            decision.rationale()
        );

        if decision.is_stop() {
            self.location.stop();
        }
        decision
    }

    /// Handle the app returning to the foreground.
    pub fn on_foreground(&self) {
        tracing::debug!(target: LOCATION_TARGET, "Resuming location in the foreground");
        self.location.resume_in_foreground();
    }
}
