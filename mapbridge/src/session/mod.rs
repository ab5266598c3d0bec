//! Session callback registry and event types.
//!
//! The native map UI raises [`MapSignal`]s without any session handle. The
//! [`SessionRegistry`] holds the one current [`SessionCallbacks`] set and
//! turns each signal into a callback invocation, attaching the stored order
//! id to order actions.
//!
//! # Example
//!
//! ```
//! use mapbridge::session::{SessionCallbacks, SessionEvent, SessionRegistry};
//!
//! let registry = SessionRegistry::new();
//! let (callbacks, mut events) = SessionCallbacks::forwarding("O-1001");
//! registry.set_callbacks(callbacks);
//!
//! // Called from the map engine thread
//! registry.on_ready();
//! registry.on_start_order();
//!
//! assert_eq!(
//!     events.drain(),
//!     vec![SessionEvent::Ready, SessionEvent::StartOrder("O-1001".into())]
//! );
//! ```

mod callbacks;
mod event;
mod registry;

pub use callbacks::SessionCallbacks;
pub use event::{MapSignal, OrderId, SessionEvent, SessionEvents, SessionId};
pub use registry::{FireOutcome, SessionPhase, SessionRegistry};
