//! Pure keep/stop decision for location tracking in the background.
//!
//! # Precedence
//!
//! Conditions are checked in fixed order; the first match wins:
//!
//! 1. An auxiliary display (car head unit) is in use → keep
//! 2. Navigation is in progress → keep
//! 3. Map engine not created yet, or location mode is pending position → keep
//! 4. Background track recording is enabled → keep
//! 5. Otherwise → stop

use std::fmt;

use serde::Serialize;

/// Location mode reported by the map engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationMode {
    /// No position fix acquired yet; the engine is still waiting for one.
    PendingPosition,
    NotFollowNoPosition,
    NotFollow,
    Follow,
    FollowAndRotate,
}

impl LocationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            LocationMode::PendingPosition => "pending_position",
            LocationMode::NotFollowNoPosition => "not_follow_no_position",
            LocationMode::NotFollow => "not_follow",
            LocationMode::Follow => "follow",
            LocationMode::FollowAndRotate => "follow_and_rotate",
        }
    }
}

impl fmt::Display for LocationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of the inputs read on a foreground→background transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BackgroundSignals {
    /// A non-primary display (e.g. a car head unit) is using the map.
    pub auxiliary_display_in_use: bool,
    pub navigating: bool,
    pub engine_created: bool,
    pub location_mode: LocationMode,
    pub track_recording_enabled: bool,
}

impl Default for BackgroundSignals {
    /// Signals that lead to [`BackgroundDecision::Stop`].
    fn default() -> Self {
        Self {
            auxiliary_display_in_use: false,
            navigating: false,
            engine_created: true,
            location_mode: LocationMode::NotFollow,
            track_recording_enabled: false,
        }
    }
}

/// Why location tracking stays on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KeepReason {
    AuxiliaryDisplay,
    Navigating,
    EngineNotCreated,
    PendingPosition,
    TrackRecording,
}

impl KeepReason {
    /// Human-readable rationale, used in logs.
    pub fn rationale(&self) -> &'static str {
        match self {
            KeepReason::AuxiliaryDisplay => {
                "Auxiliary display is active, keeping location in the background"
            }
            KeepReason::Navigating => {
                "Navigation is in progress, keeping location in the background"
            }
            KeepReason::EngineNotCreated => {
                "Map engine is not created yet, keeping location in the background"
            }
            KeepReason::PendingPosition => {
                "PENDING_POSITION mode, keeping location in the background"
            }
            KeepReason::TrackRecording => {
                "Track recording is active, keeping location in the background"
            }
        }
    }
}

/// Outcome of the background policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BackgroundDecision {
    Keep(KeepReason),
    Stop,
}

impl BackgroundDecision {
    pub fn is_stop(&self) -> bool {
        matches!(self, BackgroundDecision::Stop)
    }

    pub fn rationale(&self) -> &'static str {
        match self {
            BackgroundDecision::Keep(reason) => reason.rationale(),
            BackgroundDecision::Stop => "Stopping location in the background",
        }
    }
}

impl fmt::Display for BackgroundDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackgroundDecision::Keep(_) => f.write_str("KEEP"),
            BackgroundDecision::Stop => f.write_str("STOP"),
        }
    }
}

/// Apply the precedence rules to a snapshot.
pub fn decide(signals: &BackgroundSignals) -> BackgroundDecision {
    if signals.auxiliary_display_in_use {
        BackgroundDecision::Keep(KeepReason::AuxiliaryDisplay)
    } else if signals.navigating {
        BackgroundDecision::Keep(KeepReason::Navigating)
    } else if !signals.engine_created {
        BackgroundDecision::Keep(KeepReason::EngineNotCreated)
    } else if signals.location_mode == LocationMode::PendingPosition {
        BackgroundDecision::Keep(KeepReason::PendingPosition)
    } else if signals.track_recording_enabled {
        BackgroundDecision::Keep(KeepReason::TrackRecording)
    } else {
        BackgroundDecision::Stop
    }
}
