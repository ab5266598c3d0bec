//! `policy` command: evaluate the background location policy.

use clap::{Args, ValueEnum};
use mapbridge::background::{decide, BackgroundDecision, BackgroundSignals, LocationMode};
use serde::Serialize;

use super::common::print_json;
use crate::error::CliError;

/// Location mode selection for CLI arguments.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum ModeArg {
    /// Waiting for the first position fix
    PendingPosition,
    NotFollowNoPosition,
    NotFollow,
    Follow,
    FollowAndRotate,
}

impl From<ModeArg> for LocationMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::PendingPosition => LocationMode::PendingPosition,
            ModeArg::NotFollowNoPosition => LocationMode::NotFollowNoPosition,
            ModeArg::NotFollow => LocationMode::NotFollow,
            ModeArg::Follow => LocationMode::Follow,
            ModeArg::FollowAndRotate => LocationMode::FollowAndRotate,
        }
    }
}

#[derive(Debug, Args)]
pub struct PolicyArgs {
    /// An auxiliary display (car head unit) is in use
    #[arg(long)]
    aux_display: bool,

    /// Navigation is in progress
    #[arg(long)]
    navigating: bool,

    /// The map engine has not been created yet
    #[arg(long)]
    engine_not_created: bool,

    /// Current location mode
    #[arg(long, value_enum, default_value_t = ModeArg::NotFollow)]
    mode: ModeArg,

    /// Background track recording is enabled
    #[arg(long)]
    track_recording: bool,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

impl PolicyArgs {
    fn signals(&self) -> BackgroundSignals {
        BackgroundSignals {
            auxiliary_display_in_use: self.aux_display,
            navigating: self.navigating,
            engine_created: !self.engine_not_created,
            location_mode: self.mode.into(),
            track_recording_enabled: self.track_recording,
        }
    }
}

#[derive(Serialize)]
struct PolicyReport {
    signals: BackgroundSignals,
    decision: BackgroundDecision,
    rationale: &'static str,
}

impl PolicyReport {
    fn new(signals: BackgroundSignals) -> Self {
        let decision = decide(&signals);
        Self {
            signals,
            decision,
            rationale: decision.rationale(),
        }
    }
}

pub fn run(args: PolicyArgs) -> Result<(), CliError> {
    let report = PolicyReport::new(args.signals());

    if args.json {
        return print_json(&report);
    }

    println!("{}: {}", report.decision, report.rationale);
    Ok(())
}
