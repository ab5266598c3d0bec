//! Session identity and event types.
//!
//! Two directions of traffic exist:
//!
//! - [`MapSignal`] flows *in* from the native map UI. It carries no order
//!   identity: the native side only knows "the user pressed Start".
//! - [`SessionEvent`] flows *out* to the order-management caller, with the
//!   order id attached by the registry.

use std::fmt;

use serde::Serialize;
use tokio::sync::mpsc::UnboundedReceiver;

/// External identifier correlating order actions to a backend order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    /// Create an order id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for OrderId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for OrderId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identity minted by the registry for every callback registration.
///
/// Ids are monotonically increasing within one registry, starting at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct SessionId(pub(crate) u64);

impl SessionId {
    /// Numeric value of the id.
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session-{}", self.0)
    }
}

/// Signal raised by the native map UI.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MapSignal {
    Ready,
    Close,
    StartOrder,
    CancelOrder,
    CompleteOrder,
    ShowRoute,
    MapClick { lat: f64, lng: f64 },
}

impl MapSignal {
    /// Short name used in log fields.
    pub fn name(&self) -> &'static str {
        match self {
            MapSignal::Ready => "ready",
            MapSignal::Close => "close",
            MapSignal::StartOrder => "start_order",
            MapSignal::CancelOrder => "cancel_order",
            MapSignal::CompleteOrder => "complete_order",
            MapSignal::ShowRoute => "show_route",
            MapSignal::MapClick { .. } => "map_click",
        }
    }

    /// Whether this signal needs the stored order id to be delivered.
    pub fn is_order_action(&self) -> bool {
        matches!(
            self,
            MapSignal::StartOrder | MapSignal::CancelOrder | MapSignal::CompleteOrder
        )
    }
}

/// Event delivered to the order-management caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionEvent {
    Ready,
    Close,
    StartOrder(OrderId),
    CancelOrder(OrderId),
    CompleteOrder(OrderId),
    ShowRoute,
    MapClick { lat: f64, lng: f64 },
}

impl SessionEvent {
    /// Order id carried by order actions.
    pub fn order_id(&self) -> Option<&OrderId> {
        match self {
            SessionEvent::StartOrder(id)
            | SessionEvent::CancelOrder(id)
            | SessionEvent::CompleteOrder(id) => Some(id),
            _ => None,
        }
    }
}

/// Single-consumer stream of events for one session.
///
/// Obtained from [`SessionCallbacks::forwarding`](super::SessionCallbacks::forwarding).
/// The stream ends once the registry lets go of the session's callbacks,
/// either because a newer session replaced them or because the registry was
/// cleared.
#[derive(Debug)]
pub struct SessionEvents {
    rx: UnboundedReceiver<SessionEvent>,
}

impl SessionEvents {
    pub(crate) fn new(rx: UnboundedReceiver<SessionEvent>) -> Self {
        Self { rx }
    }

    /// Wait for the next event.
    ///
    /// Returns `None` once the session has been replaced or cleared and all
    /// buffered events were consumed.
    pub async fn recv(&mut self) -> Option<SessionEvent> {
        self.rx.recv().await
    }

    /// Take the next buffered event without waiting.
    pub fn try_recv(&mut self) -> Option<SessionEvent> {
        self.rx.try_recv().ok()
    }

    /// Take every buffered event.
    pub fn drain(&mut self) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        while let Some(event) = self.try_recv() {
            events.push(event);
        }
        events
    }
}
