//! The callback set supplied by the order-management caller.

use std::fmt;

use tokio::sync::mpsc::{self, UnboundedSender};

use super::event::{OrderId, SessionEvent, SessionEvents};

type Action = Box<dyn Fn() + Send + Sync>;
type OrderAction = Box<dyn Fn(&OrderId) + Send + Sync>;
type ClickAction = Box<dyn Fn(f64, f64) + Send + Sync>;

/// Seven optional callbacks plus an optional order id.
///
/// A set is registered as a whole with
/// [`SessionRegistry::set_callbacks`](super::SessionRegistry::set_callbacks)
/// and replaces every field of the previous set, including fields this set
/// leaves empty.
///
/// All callbacks may be invoked from the map engine's thread.
///
/// # Example
///
/// ```
/// use mapbridge::session::SessionCallbacks;
///
/// let callbacks = SessionCallbacks::new()
///     .with_order_id("O-1001")
///     .on_ready(|| println!("map ready"))
///     .on_start_order(|id| println!("start {}", id));
/// assert_eq!(callbacks.order_id().map(|id| id.as_str()), Some("O-1001"));
/// ```
#[derive(Default)]
pub struct SessionCallbacks {
    pub(crate) on_ready: Option<Action>,
    pub(crate) on_close: Option<Action>,
    pub(crate) on_show_route: Option<Action>,
    pub(crate) on_start_order: Option<OrderAction>,
    pub(crate) on_cancel_order: Option<OrderAction>,
    pub(crate) on_complete_order: Option<OrderAction>,
    pub(crate) on_map_click: Option<ClickAction>,
    pub(crate) order_id: Option<OrderId>,
}

impl SessionCallbacks {
    /// An empty set: every fire against it is a no-op.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a set whose callbacks forward [`SessionEvent`]s to a channel.
    ///
    /// The returned [`SessionEvents`] is the only consumer. It sees the end
    /// of the stream once the registry drops this set.
    pub fn forwarding(order_id: impl Into<OrderId>) -> (Self, SessionEvents) {
        let (tx, rx) = mpsc::unbounded_channel();
        let callbacks = Self::new()
            .with_order_id(order_id)
            .on_ready(forward(&tx, || SessionEvent::Ready))
            .on_close(forward(&tx, || SessionEvent::Close))
            .on_show_route(forward(&tx, || SessionEvent::ShowRoute))
            .on_start_order(forward_order(&tx, SessionEvent::StartOrder))
            .on_cancel_order(forward_order(&tx, SessionEvent::CancelOrder))
            .on_complete_order(forward_order(&tx, SessionEvent::CompleteOrder))
            .on_map_click({
                let tx = tx.clone();
                move |lat, lng| send(&tx, SessionEvent::MapClick { lat, lng })
            });
        (callbacks, SessionEvents::new(rx))
    }

    /// Set the order id the order actions are keyed by.
    pub fn with_order_id(mut self, order_id: impl Into<OrderId>) -> Self {
        self.order_id = Some(order_id.into());
        self
    }

    /// Replace (or remove) the order id.
    pub fn set_order_id(&mut self, order_id: Option<OrderId>) {
        self.order_id = order_id;
    }

    /// The stored order id.
    pub fn order_id(&self) -> Option<&OrderId> {
        self.order_id.as_ref()
    }

    /// Called when the map UI has finished loading.
    pub fn on_ready(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_ready = Some(Box::new(f));
        self
    }

    /// Called when the map UI closes.
    pub fn on_close(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_close = Some(Box::new(f));
        self
    }

    /// Called when the user asks for the route.
    pub fn on_show_route(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_show_route = Some(Box::new(f));
        self
    }

    pub fn on_start_order(mut self, f: impl Fn(&OrderId) + Send + Sync + 'static) -> Self {
        self.on_start_order = Some(Box::new(f));
        self
    }

    pub fn on_cancel_order(mut self, f: impl Fn(&OrderId) + Send + Sync + 'static) -> Self {
        self.on_cancel_order = Some(Box::new(f));
        self
    }

    pub fn on_complete_order(mut self, f: impl Fn(&OrderId) + Send + Sync + 'static) -> Self {
        self.on_complete_order = Some(Box::new(f));
        self
    }

    /// Called with the clicked position (latitude, longitude).
    pub fn on_map_click(mut self, f: impl Fn(f64, f64) + Send + Sync + 'static) -> Self {
        self.on_map_click = Some(Box::new(f));
        self
    }

    /// True when no callback and no order id are set.
    pub fn is_empty(&self) -> bool {
        self.on_ready.is_none()
            && self.on_close.is_none()
            && self.on_show_route.is_none()
            && self.on_start_order.is_none()
            && self.on_cancel_order.is_none()
            && self.on_complete_order.is_none()
            && self.on_map_click.is_none()
            && self.order_id.is_none()
    }
}

impl fmt::Debug for SessionCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionCallbacks")
            .field("order_id", &self.order_id)
            .field("on_ready", &self.on_ready.is_some())
            .field("on_close", &self.on_close.is_some())
            .field("on_show_route", &self.on_show_route.is_some())
            .field("on_start_order", &self.on_start_order.is_some())
            .field("on_cancel_order", &self.on_cancel_order.is_some())
            .field("on_complete_order", &self.on_complete_order.is_some())
            .field("on_map_click", &self.on_map_click.is_some())
            .finish()
    }
}

fn send(tx: &UnboundedSender<SessionEvent>, event: SessionEvent) {
    if tx.send(event).is_err() {
        tracing::trace!("Session event receiver dropped, discarding event");
    }
}

fn forward(
    tx: &UnboundedSender<SessionEvent>,
    make: fn() -> SessionEvent,
) -> impl Fn() + Send + Sync + 'static {
    let tx = tx.clone();
    move || send(&tx, make())
}

fn forward_order(
    tx: &UnboundedSender<SessionEvent>,
    make: fn(OrderId) -> SessionEvent,
) -> impl Fn(&OrderId) + Send + Sync + 'static {
    let tx = tx.clone();
    move |id| send(&tx, make(id.clone()))
}
