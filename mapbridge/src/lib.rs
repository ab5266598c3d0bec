//! MapBridge - map session coordination for courier apps
//!
//! This library bridges a launched map-viewing UI session to an external
//! order-management caller, and decides whether location tracking keeps
//! running when the hosting application goes to the background.
//!
//! # Modules
//!
//! - [`session`]: callback registry correlating native map signals with the
//!   current session and order id
//! - [`foreground`]: tracker for the currently visible UI surface
//! - [`launcher`]: starts a map session on the foreground surface
//! - [`background`]: keep/stop policy for the location subsystem
//! - [`app`]: explicit application bootstrap wiring everything together
//! - [`config`]: INI configuration file
//! - [`assets`]: copies bundled map files into storage
//! - [`logging`]: tracing subscriber setup

pub mod app;
pub mod assets;
pub mod background;
pub mod config;
pub mod coord;
pub mod foreground;
pub mod launcher;
pub mod logging;
pub mod session;
