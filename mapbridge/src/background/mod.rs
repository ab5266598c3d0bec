//! Background location policy.
//!
//! Decides whether the location subsystem keeps running once the application
//! loses foreground visibility.
//!
//! - [`decide`]: pure function over a [`BackgroundSignals`] snapshot
//! - [`BackgroundPolicy`]: reads the providers, decides, and stops location
//!
//! # Example
//!
//! ```
//! use mapbridge::background::{decide, BackgroundDecision, BackgroundSignals, KeepReason};
//!
//! let signals = BackgroundSignals { navigating: true, ..Default::default() };
//! assert_eq!(decide(&signals), BackgroundDecision::Keep(KeepReason::Navigating));
//! ```

mod decision;
mod policy;

pub use decision::{decide, BackgroundDecision, BackgroundSignals, KeepReason, LocationMode};
pub use policy::{BackgroundPolicy, BackgroundStateSource, LocationSubsystem, LOCATION_TARGET};
