//! Application bootstrap and lifecycle routing.
//!
//! [`MapBridgeApp`] is built once at startup from an [`AppConfig`] and the
//! platform's location adapters. It owns the session registry, foreground
//! tracker, launcher and background policy, and the platform forwards its
//! lifecycle hooks to it.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         MapBridgeApp                          │
//! │                                                               │
//! │  surface_resumed/paused ──► ForegroundTracker                 │
//! │                                   │ top()                     │
//! │  launch ──────────────────► MapSessionLauncher                │
//! │                                   │ set_callbacks             │
//! │  native map signals ──────► SessionRegistry ──► callbacks     │
//! │                                                               │
//! │  entered_background ──────► BackgroundPolicy ──► location     │
//! │  entered_foreground ──────► BackgroundPolicy ──► location     │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use mapbridge::app::{AppConfig, MapBridgeApp};
//!
//! let config = AppConfig::load(None)?;
//! let _guard = config.init_logging()?;
//! let app = MapBridgeApp::new(config, state_source, location);
//!
//! app.surface_resumed(&main_surface);
//! app.launch(request, callbacks)?;
//! ```

mod bootstrap;
mod config;
mod error;

pub use bootstrap::MapBridgeApp;
pub use config::{AppConfig, BuildInfo, SessionConfig};
pub use error::AppError;
