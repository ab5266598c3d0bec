//! `session` command: simulate a map session end to end.
//!
//! Launches a session against a console surface that prints the navigation
//! request, replays the given native signals through the registry, then
//! prints every event the caller would have received.

use std::sync::Arc;

use clap::{Args, ValueEnum};
use mapbridge::app::{AppConfig, MapBridgeApp};
use mapbridge::background::{BackgroundStateSource, LocationMode, LocationSubsystem};
use mapbridge::coord::GeoPoint;
use mapbridge::foreground::ForegroundSurface;
use mapbridge::launcher::{LaunchRequest, NavigationRequest};
use mapbridge::session::{FireOutcome, MapSignal, SessionCallbacks, SessionRegistry};

use super::common::print_json;
use crate::error::CliError;

/// Native map signal selection for CLI arguments.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum SignalArg {
    Ready,
    Close,
    StartOrder,
    CancelOrder,
    CompleteOrder,
    ShowRoute,
    /// Click at the session's target position
    MapClick,
}

impl SignalArg {
    fn to_signal(self, target: GeoPoint) -> MapSignal {
        match self {
            SignalArg::Ready => MapSignal::Ready,
            SignalArg::Close => MapSignal::Close,
            SignalArg::StartOrder => MapSignal::StartOrder,
            SignalArg::CancelOrder => MapSignal::CancelOrder,
            SignalArg::CompleteOrder => MapSignal::CompleteOrder,
            SignalArg::ShowRoute => MapSignal::ShowRoute,
            SignalArg::MapClick => MapSignal::MapClick {
                lat: target.lat(),
                lng: target.lng(),
            },
        }
    }
}

#[derive(Debug, Args)]
pub struct SessionArgs {
    /// Target latitude in degrees
    #[arg(long, allow_hyphen_values = true)]
    lat: f64,

    /// Target longitude in degrees
    #[arg(long, allow_hyphen_values = true)]
    lng: f64,

    /// Map zoom level
    #[arg(long, default_value_t = 15.0)]
    zoom: f32,

    /// Title shown on the map screen
    #[arg(long, default_value = "")]
    title: String,

    /// Order the session belongs to
    #[arg(long)]
    order_id: String,

    /// Launch with no foreground surface
    #[arg(long)]
    no_surface: bool,

    /// Native signals to replay, in order
    #[arg(long = "signal", value_enum)]
    signals: Vec<SignalArg>,
}

/// Surface that prints navigation requests as JSON.
struct ConsoleSurface;

impl ForegroundSurface for ConsoleSurface {
    fn name(&self) -> &str {
        "console"
    }

    fn start_map_session(&self, request: &NavigationRequest) {
        println!("navigate:");
        if let Err(e) = print_json(request) {
            tracing::error!(error = %e, "Failed to print navigation request");
        }
    }
}

/// Device with nothing keeping location alive in the background.
struct IdleDevice;

impl BackgroundStateSource for IdleDevice {
    fn auxiliary_display_in_use(&self) -> bool {
        false
    }
    fn is_navigating(&self) -> bool {
        false
    }
    fn is_engine_created(&self) -> bool {
        true
    }
    fn location_mode(&self) -> LocationMode {
        LocationMode::NotFollow
    }
    fn is_track_recording_enabled(&self) -> bool {
        false
    }
}

impl LocationSubsystem for IdleDevice {
    fn stop(&self) {
        tracing::info!("Location stopped");
    }
    fn resume_in_foreground(&self) {
        tracing::info!("Location resumed");
    }
}

pub fn run(args: SessionArgs, config: AppConfig) -> Result<(), CliError> {
    let target = GeoPoint::new(args.lat, args.lng)?;
    let device = Arc::new(IdleDevice);
    let app = MapBridgeApp::new(config, device.clone(), device);

    let surface: Arc<dyn ForegroundSurface> = Arc::new(ConsoleSurface);
    if !args.no_surface {
        app.surface_resumed(&surface);
    }

    let (callbacks, mut events) = SessionCallbacks::forwarding(args.order_id.as_str());
    let request = LaunchRequest::new(target, args.zoom, args.title, args.order_id);
    let launched = app.launch(request, callbacks);

    if let Err(e) = &launched {
        println!("launch failed: {}", e);
    }

    let registry = app.registry();
    for signal in &args.signals {
        let signal = signal.to_signal(target);
        println!("{:<15} {}", signal.name(), describe(&registry, signal));
    }

    let received = events.drain();
    println!("events:");
    print_json(&received)?;

    launched.map(|_| ()).map_err(CliError::from)
}

fn describe(registry: &SessionRegistry, signal: MapSignal) -> &'static str {
    match registry.fire(signal) {
        FireOutcome::Delivered(_) => "delivered",
        FireOutcome::NoHandler => "no handler",
        FireOutcome::MissingOrderId => "dropped: no order id",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_click_uses_target() {
        let target = GeoPoint::new(48.1, 11.5).unwrap();
        assert_eq!(
            SignalArg::MapClick.to_signal(target),
            MapSignal::MapClick {
                lat: 48.1,
                lng: 11.5
            }
        );
    }

    #[test]
    fn test_order_signals_map_directly() {
        let target = GeoPoint::new(0.0, 0.0).unwrap();
        assert_eq!(
            SignalArg::StartOrder.to_signal(target),
            MapSignal::StartOrder
        );
        assert_eq!(SignalArg::Close.to_signal(target), MapSignal::Close);
    }

    #[test]
    fn test_describe_delivered_and_missing_handler() {
        let registry = SessionRegistry::new();
        registry.set_callbacks(SessionCallbacks::new().on_ready(|| {}));

        assert_eq!(describe(&registry, MapSignal::Ready), "delivered");
        assert_eq!(describe(&registry, MapSignal::ShowRoute), "no handler");
    }

    #[test]
    fn test_run_without_surface_reports_missing_context() {
        let args = SessionArgs {
            lat: 53.55,
            lng: 9.99,
            zoom: 15.0,
            title: "Drop-off".to_string(),
            order_id: "O1".to_string(),
            no_surface: true,
            signals: vec![SignalArg::Ready],
        };

        let err = run(args, AppConfig::default()).unwrap_err();
        assert!(matches!(err, CliError::Launch(_)));
    }
}
