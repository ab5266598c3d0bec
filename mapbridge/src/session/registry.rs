//! Session callback registry.
//!
//! The registry is the only channel carrying events from the map UI back to
//! the order-management caller. Native signals carry no session handle, so
//! the registry routes every signal to "whatever the current session is".
//!
//! # Thread Safety
//!
//! Registrations and clears arrive on the control thread while signals arrive
//! on the map engine's thread. The callback set is stored as an immutable
//! `Arc<SessionCallbacks>` snapshot swapped under a mutex: a fire either sees
//! the complete old set or the complete new one, never a mix. Callbacks run
//! after the lock is released, so they may call back into the registry.

use std::mem;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use super::callbacks::SessionCallbacks;
use super::event::{MapSignal, OrderId, SessionEvent, SessionId};

/// Logical phase of the current session.
///
/// ```text
/// NotStarted --set_callbacks--> Launched --Ready--> Ready --action--> Active
///      ^                                                                 |
///      +------------------------ clear ------ Closed <------ Close ------+
/// ```
///
/// `Close` moves any started phase to `Closed`. Order actions, route requests
/// and map clicks move `Launched` or `Ready` to `Active`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    NotStarted,
    Launched,
    Ready,
    Active,
    Closed,
}

impl SessionPhase {
    /// Whether a session is registered and has not been closed yet.
    pub fn is_live(&self) -> bool {
        matches!(
            self,
            SessionPhase::Launched | SessionPhase::Ready | SessionPhase::Active
        )
    }

    fn after(self, signal: &MapSignal) -> SessionPhase {
        match (self, signal) {
            (SessionPhase::NotStarted, _) => SessionPhase::NotStarted,
            (SessionPhase::Closed, _) => SessionPhase::Closed,
            (_, MapSignal::Close) => SessionPhase::Closed,
            (SessionPhase::Launched, MapSignal::Ready) => SessionPhase::Ready,
            (phase, MapSignal::Ready) => phase,
            _ => SessionPhase::Active,
        }
    }
}

/// What a fire call did.
#[derive(Debug, Clone, PartialEq)]
pub enum FireOutcome {
    /// The matching callback was invoked with this event.
    Delivered(SessionEvent),
    /// No callback is registered for the signal.
    NoHandler,
    /// An order-action callback is registered but no order id is stored.
    MissingOrderId,
}

impl FireOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, FireOutcome::Delivered(_))
    }

    /// The delivered event, if any.
    pub fn event(&self) -> Option<&SessionEvent> {
        match self {
            FireOutcome::Delivered(event) => Some(event),
            _ => None,
        }
    }
}

#[derive(Debug)]
struct RegistryState {
    callbacks: Arc<SessionCallbacks>,
    session_id: Option<SessionId>,
    phase: SessionPhase,
}

impl RegistryState {
    fn empty() -> Self {
        Self {
            callbacks: Arc::new(SessionCallbacks::new()),
            session_id: None,
            phase: SessionPhase::NotStarted,
        }
    }
}

/// Holder of the current session's callback set and order id.
///
/// Constructed once by the application and shared by `Arc` with the launcher
/// and the native bridge.
#[derive(Debug)]
pub struct SessionRegistry {
    state: Mutex<RegistryState>,
    next_id: AtomicU64,
    clear_on_close: bool,
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionRegistry {
    /// Create an empty registry that keeps callbacks after `Close`.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(RegistryState::empty()),
            next_id: AtomicU64::new(1),
            clear_on_close: false,
        }
    }

    /// Clear the registry automatically once `Close` has been delivered.
    pub fn with_clear_on_close(mut self, enabled: bool) -> Self {
        self.clear_on_close = enabled;
        self
    }

    /// Replace the whole callback set and start a new session.
    ///
    /// Fields absent from `callbacks` become absent in the registry. The
    /// previous set is dropped, which ends its forwarding stream if it had one.
    pub fn set_callbacks(&self, callbacks: SessionCallbacks) -> SessionId {
        let order_id = callbacks.order_id.clone();

        let (session_id, previous, previous_id, previous_phase) = {
            let mut state = self.state.lock();
            // Minted under the lock so the current id never goes backwards.
            let session_id = SessionId(self.next_id.fetch_add(1, Ordering::Relaxed));
            let previous = mem::replace(&mut state.callbacks, Arc::new(callbacks));
            let previous_id = state.session_id.replace(session_id);
            let previous_phase = mem::replace(&mut state.phase, SessionPhase::Launched);
            (session_id, previous, previous_id, previous_phase)
        };

        if let Some(previous_id) = previous_id.filter(|_| previous_phase.is_live()) {
            tracing::warn!(
                previous = %previous_id,
                previous_phase = ?previous_phase,
                session = %session_id,
                "Replacing a session that was never closed"
            );
        }

        tracing::info!(
            session = %session_id,
            order_id = ?order_id.as_ref().map(OrderId::as_str),
            "Session callbacks registered"
        );

        drop(previous);
        session_id
    }

    /// Route a native signal to the current callback set.
    pub fn fire(&self, signal: MapSignal) -> FireOutcome {
        let (callbacks, session_id, phase_before) = {
            let mut state = self.state.lock();
            let phase_before = state.phase;
            state.phase = phase_before.after(&signal);
            (Arc::clone(&state.callbacks), state.session_id, phase_before)
        };

        if phase_before == SessionPhase::Closed {
            tracing::warn!(
                session = ?session_id,
                signal = signal.name(),
                "Signal received after the session closed"
            );
        }

        let outcome = dispatch(&callbacks, signal);

        match &outcome {
            FireOutcome::Delivered(_) => {
                tracing::debug!(
                    session = ?session_id,
                    signal = signal.name(),
                    "Signal delivered"
                );
            }
            FireOutcome::NoHandler => {
                tracing::debug!(
                    session = ?session_id,
                    signal = signal.name(),
                    "No callback for signal"
                );
            }
            FireOutcome::MissingOrderId => {
                tracing::warn!(
                    session = ?session_id,
                    signal = signal.name(),
                    "Order action dropped: no order id registered"
                );
            }
        }

        if self.clear_on_close && signal == MapSignal::Close {
            if let Some(session_id) = session_id {
                self.clear_session(session_id);
            }
        }

        outcome
    }

    pub fn on_ready(&self) -> FireOutcome {
        self.fire(MapSignal::Ready)
    }

    pub fn on_close(&self) -> FireOutcome {
        self.fire(MapSignal::Close)
    }

    pub fn on_show_route(&self) -> FireOutcome {
        self.fire(MapSignal::ShowRoute)
    }

    /// Fire the start action with the stored order id.
    pub fn on_start_order(&self) -> FireOutcome {
        self.fire(MapSignal::StartOrder)
    }

    /// Fire the cancel action with the stored order id.
    pub fn on_cancel_order(&self) -> FireOutcome {
        self.fire(MapSignal::CancelOrder)
    }

    /// Fire the complete action with the stored order id.
    pub fn on_complete_order(&self) -> FireOutcome {
        self.fire(MapSignal::CompleteOrder)
    }

    pub fn on_map_click(&self, lat: f64, lng: f64) -> FireOutcome {
        self.fire(MapSignal::MapClick { lat, lng })
    }

    /// The stored order id.
    pub fn order_id(&self) -> Option<OrderId> {
        self.state.lock().callbacks.order_id.clone()
    }

    /// Id of the current session, if one is registered.
    pub fn session_id(&self) -> Option<SessionId> {
        self.state.lock().session_id
    }

    pub fn phase(&self) -> SessionPhase {
        self.state.lock().phase
    }

    /// Reset every field to absent, releasing captured references.
    pub fn clear(&self) {
        let previous = {
            let mut state = self.state.lock();
            mem::replace(&mut *state, RegistryState::empty())
        };
        if let Some(session_id) = previous.session_id {
            tracing::info!(session = %session_id, "Session callbacks cleared");
        }
    }

    /// Clear only if `session_id` is still the current session.
    fn clear_session(&self, session_id: SessionId) {
        let previous = {
            let mut state = self.state.lock();
            if state.session_id != Some(session_id) {
                return;
            }
            mem::replace(&mut *state, RegistryState::empty())
        };
        tracing::info!(session = %session_id, "Session closed, callbacks released");
        drop(previous);
    }
}

fn dispatch(callbacks: &SessionCallbacks, signal: MapSignal) -> FireOutcome {
    match signal {
        MapSignal::Ready => invoke(&callbacks.on_ready, SessionEvent::Ready),
        MapSignal::Close => invoke(&callbacks.on_close, SessionEvent::Close),
        MapSignal::ShowRoute => invoke(&callbacks.on_show_route, SessionEvent::ShowRoute),
        MapSignal::StartOrder => invoke_order(
            &callbacks.on_start_order,
            callbacks.order_id.as_ref(),
            SessionEvent::StartOrder,
        ),
        MapSignal::CancelOrder => invoke_order(
            &callbacks.on_cancel_order,
            callbacks.order_id.as_ref(),
            SessionEvent::CancelOrder,
        ),
        MapSignal::CompleteOrder => invoke_order(
            &callbacks.on_complete_order,
            callbacks.order_id.as_ref(),
            SessionEvent::CompleteOrder,
        ),
        MapSignal::MapClick { lat, lng } => match &callbacks.on_map_click {
            Some(callback) => {
                callback(lat, lng);
                FireOutcome::Delivered(SessionEvent::MapClick { lat, lng })
            }
            None => FireOutcome::NoHandler,
        },
    }
}

fn invoke(callback: &Option<Box<dyn Fn() + Send + Sync>>, event: SessionEvent) -> FireOutcome {
    match callback {
        Some(callback) => {
            callback();
            FireOutcome::Delivered(event)
        }
        None => FireOutcome::NoHandler,
    }
}

fn invoke_order(
    callback: &Option<Box<dyn Fn(&OrderId) + Send + Sync>>,
    order_id: Option<&OrderId>,
    make: fn(OrderId) -> SessionEvent,
) -> FireOutcome {
    match (callback, order_id) {
        (Some(callback), Some(order_id)) => {
            callback(order_id);
            FireOutcome::Delivered(make(order_id.clone()))
        }
        (Some(_), None) => FireOutcome::MissingOrderId,
        (None, _) => FireOutcome::NoHandler,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize};

    fn recorder() -> (Arc<Mutex<Vec<String>>>, SessionCallbacks) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let l1 = Arc::clone(&log);
        let l2 = Arc::clone(&log);
        let l3 = Arc::clone(&log);
        let l4 = Arc::clone(&log);
        let l5 = Arc::clone(&log);
        let l6 = Arc::clone(&log);
        let l7 = Arc::clone(&log);
        let callbacks = SessionCallbacks::new()
            .on_ready(move || l1.lock().push("ready".to_string()))
            .on_close(move || l2.lock().push("close".to_string()))
            .on_show_route(move || l3.lock().push("route".to_string()))
            .on_start_order(move |id| l4.lock().push(format!("start:{}", id)))
            .on_cancel_order(move |id| l5.lock().push(format!("cancel:{}", id)))
            .on_complete_order(move |id| l6.lock().push(format!("complete:{}", id)))
            .on_map_click(move |lat, lng| l7.lock().push(format!("click:{lat},{lng}")));
        (log, callbacks)
    }

    #[test]
    fn test_empty_registry_is_inert() {
        let registry = SessionRegistry::new();
        assert_eq!(registry.order_id(), None);
        assert_eq!(registry.session_id(), None);
        assert_eq!(registry.phase(), SessionPhase::NotStarted);
        assert_eq!(registry.on_ready(), FireOutcome::NoHandler);
        assert_eq!(registry.on_start_order(), FireOutcome::NoHandler);
        assert_eq!(registry.phase(), SessionPhase::NotStarted);
    }

    #[test]
    fn test_start_order_fires_once_with_stored_id() {
        let registry = SessionRegistry::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::new(Mutex::new(None));
        let (c, s) = (Arc::clone(&calls), Arc::clone(&seen));
        let callbacks = SessionCallbacks::new()
            .with_order_id("O1")
            .on_start_order(move |id| {
                c.fetch_add(1, Ordering::SeqCst);
                *s.lock() = Some(id.clone());
            });
        registry.set_callbacks(callbacks);

        let outcome = registry.on_start_order();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(*seen.lock(), Some(OrderId::from("O1")));
        assert_eq!(
            outcome,
            FireOutcome::Delivered(SessionEvent::StartOrder("O1".into()))
        );
    }

    #[test]
    fn test_order_action_without_order_id_is_reported() {
        let registry = SessionRegistry::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&calls);
        registry.set_callbacks(SessionCallbacks::new().on_cancel_order(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        }));

        assert_eq!(registry.on_cancel_order(), FireOutcome::MissingOrderId);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_order_id_without_callback_is_no_handler() {
        let registry = SessionRegistry::new();
        registry.set_callbacks(SessionCallbacks::new().with_order_id("O1"));
        assert_eq!(registry.on_complete_order(), FireOutcome::NoHandler);
        assert_eq!(registry.order_id(), Some(OrderId::from("O1")));
    }

    #[test]
    fn test_every_signal_reaches_its_callback() {
        let registry = SessionRegistry::new();
        let (log, callbacks) = recorder();
        registry.set_callbacks(callbacks.with_order_id("O7"));

        registry.on_ready();
        registry.on_show_route();
        registry.on_start_order();
        registry.on_cancel_order();
        registry.on_complete_order();
        registry.on_map_click(1.5, 2.5);
        registry.on_close();

        assert_eq!(
            *log.lock(),
            vec![
                "ready",
                "route",
                "start:O7",
                "cancel:O7",
                "complete:O7",
                "click:1.5,2.5",
                "close"
            ]
        );
    }

    #[test]
    fn test_clear_resets_everything() {
        let registry = SessionRegistry::new();
        let (log, callbacks) = recorder();
        registry.set_callbacks(callbacks.with_order_id("O1"));

        registry.clear();

        assert_eq!(registry.order_id(), None);
        assert_eq!(registry.session_id(), None);
        assert_eq!(registry.phase(), SessionPhase::NotStarted);
        assert_eq!(registry.on_ready(), FireOutcome::NoHandler);
        assert_eq!(registry.on_close(), FireOutcome::NoHandler);
        assert_eq!(registry.on_show_route(), FireOutcome::NoHandler);
        assert_eq!(registry.on_start_order(), FireOutcome::NoHandler);
        assert_eq!(registry.on_cancel_order(), FireOutcome::NoHandler);
        assert_eq!(registry.on_complete_order(), FireOutcome::NoHandler);
        assert_eq!(registry.on_map_click(0.0, 0.0), FireOutcome::NoHandler);
        assert!(log.lock().is_empty());
    }

    #[test]
    fn test_set_callbacks_replaces_all_fields() {
        let registry = SessionRegistry::new();
        let (log_a, callbacks_a) = recorder();
        registry.set_callbacks(callbacks_a.with_order_id("A"));

        let ready_b = Arc::new(AtomicUsize::new(0));
        let r = Arc::clone(&ready_b);
        registry.set_callbacks(SessionCallbacks::new().on_ready(move || {
            r.fetch_add(1, Ordering::SeqCst);
        }));

        assert_eq!(registry.order_id(), None);
        assert_eq!(registry.on_map_click(1.0, 1.0), FireOutcome::NoHandler);
        assert_eq!(registry.on_close(), FireOutcome::NoHandler);
        assert!(registry.on_ready().is_delivered());
        assert_eq!(ready_b.load(Ordering::SeqCst), 1);
        assert!(log_a.lock().is_empty());
    }

    #[test]
    fn test_session_ids_increase() {
        let registry = SessionRegistry::new();
        let first = registry.set_callbacks(SessionCallbacks::new());
        let second = registry.set_callbacks(SessionCallbacks::new());
        assert_eq!(first.value(), 1);
        assert_eq!(second.value(), 2);
        assert_eq!(registry.session_id(), Some(second));
    }

    #[test]
    fn test_phase_transitions() {
        let registry = SessionRegistry::new();
        registry.set_callbacks(SessionCallbacks::new());
        assert_eq!(registry.phase(), SessionPhase::Launched);

        registry.on_ready();
        assert_eq!(registry.phase(), SessionPhase::Ready);

        registry.on_map_click(0.0, 0.0);
        assert_eq!(registry.phase(), SessionPhase::Active);

        registry.on_ready();
        assert_eq!(registry.phase(), SessionPhase::Active);

        registry.on_close();
        assert_eq!(registry.phase(), SessionPhase::Closed);

        registry.on_start_order();
        assert_eq!(registry.phase(), SessionPhase::Closed);
    }

    #[test]
    fn test_callbacks_survive_close_by_default() {
        let registry = SessionRegistry::new();
        let (log, callbacks) = recorder();
        registry.set_callbacks(callbacks.with_order_id("O1"));

        registry.on_close();
        let late = registry.on_complete_order();

        assert!(late.is_delivered());
        assert_eq!(registry.order_id(), Some(OrderId::from("O1")));
        assert_eq!(*log.lock(), vec!["close", "complete:O1"]);
    }

    #[test]
    fn test_clear_on_close() {
        let registry = SessionRegistry::new().with_clear_on_close(true);
        let (log, callbacks) = recorder();
        registry.set_callbacks(callbacks.with_order_id("O1"));

        assert!(registry.on_close().is_delivered());
        assert_eq!(registry.on_complete_order(), FireOutcome::NoHandler);
        assert_eq!(registry.order_id(), None);
        assert_eq!(registry.phase(), SessionPhase::NotStarted);
        assert_eq!(*log.lock(), vec!["close"]);
    }

    #[test]
    fn test_clear_on_close_keeps_session_started_from_close_callback() {
        let registry = Arc::new(SessionRegistry::new().with_clear_on_close(true));
        let inner = Arc::clone(&registry);
        registry.set_callbacks(SessionCallbacks::new().on_close(move || {
            inner.set_callbacks(SessionCallbacks::new().with_order_id("next"));
        }));

        registry.on_close();

        assert_eq!(registry.order_id(), Some(OrderId::from("next")));
        assert_eq!(registry.phase(), SessionPhase::Launched);
    }

    #[test]
    fn test_callback_may_reenter_registry() {
        let registry = Arc::new(SessionRegistry::new());
        let inner = Arc::clone(&registry);
        registry.set_callbacks(SessionCallbacks::new().on_close(move || inner.clear()));

        assert!(registry.on_close().is_delivered());
        assert_eq!(registry.session_id(), None);
    }

    #[test]
    fn test_concurrent_fire_sees_complete_sets() {
        let registry = Arc::new(SessionRegistry::new());
        let mismatch = Arc::new(AtomicBool::new(false));

        let writer = {
            let registry = Arc::clone(&registry);
            let mismatch = Arc::clone(&mismatch);
            std::thread::spawn(move || {
                for i in 0..5000 {
                    let own = OrderId::from(format!("O{i}"));
                    let expected = own.clone();
                    let flag = Arc::clone(&mismatch);
                    let callbacks = SessionCallbacks::new()
                        .with_order_id(own)
                        .on_start_order(move |id| {
                            if *id != expected {
                                flag.store(true, Ordering::SeqCst);
                            }
                        });
                    registry.set_callbacks(callbacks);
                }
            })
        };

        for _ in 0..20000 {
            registry.on_start_order();
        }
        writer.join().unwrap();

        assert!(!mismatch.load(Ordering::SeqCst));
        assert_eq!(registry.order_id(), Some(OrderId::from("O4999")));
    }

    #[test]
    fn test_concurrent_registrations_never_move_session_backwards() {
        let registry = Arc::new(SessionRegistry::new());

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || {
                    for _ in 0..500 {
                        let id = registry.set_callbacks(SessionCallbacks::new());
                        let current = registry.session_id().unwrap();
                        assert!(current >= id, "current {current} behind {id}");
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(registry.session_id().map(|id| id.value()), Some(2000));
    }
}
