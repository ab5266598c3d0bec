//! Map session launcher.
//!
//! Accepts a launch request from the order-management caller, registers its
//! callbacks with the [`SessionRegistry`], and asks the foreground surface to
//! open the map screen.
//!
//! # Launch Sequence
//!
//! ```text
//! launch(request, callbacks)
//!   1. registry.set_callbacks(callbacks + order id)   (replaces any prior session)
//!   2. tracker.top()  ── none ──► Err(MissingContext), registry stays populated
//!   3. surface.start_map_session(&NavigationRequest)   (fire-and-forget)
//! ```

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use crate::coord::GeoPoint;
use crate::foreground::ForegroundTracker;
use crate::session::{OrderId, SessionCallbacks, SessionId, SessionRegistry};

/// Errors returned by [`MapSessionLauncher::launch`].
#[derive(Debug, Error)]
pub enum LaunchError {
    /// No surface is in the foreground to start the map screen from.
    ///
    /// The callbacks were still registered under `session_id`.
    #[error("Cannot start map: no active foreground surface ({session_id})")]
    MissingContext { session_id: SessionId },
}

/// What the caller asks to show.
#[derive(Debug, Clone)]
pub struct LaunchRequest {
    pub target: GeoPoint,
    pub zoom: f32,
    pub title: String,
    pub order_id: OrderId,
}

impl LaunchRequest {
    pub fn new(
        target: GeoPoint,
        zoom: f32,
        title: impl Into<String>,
        order_id: impl Into<OrderId>,
    ) -> Self {
        Self {
            target,
            zoom,
            title: title.into(),
            order_id: order_id.into(),
        }
    }
}

/// Flat record handed to the platform's screen-start mechanism.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NavigationRequest {
    pub lat: f64,
    pub lng: f64,
    pub zoom: f32,
    pub title: String,
    pub order_id: OrderId,
}

impl From<&LaunchRequest> for NavigationRequest {
    fn from(request: &LaunchRequest) -> Self {
        Self {
            lat: request.target.lat(),
            lng: request.target.lng(),
            zoom: request.zoom,
            title: request.title.clone(),
            order_id: request.order_id.clone(),
        }
    }
}

/// A session whose navigation request has been issued.
#[derive(Debug, Clone, PartialEq)]
pub struct LaunchedSession {
    pub session_id: SessionId,
    pub request: NavigationRequest,
}

/// Starts map sessions on the foreground surface.
#[derive(Debug, Clone)]
pub struct MapSessionLauncher {
    registry: Arc<SessionRegistry>,
    tracker: Arc<ForegroundTracker>,
}

impl MapSessionLauncher {
    pub fn new(registry: Arc<SessionRegistry>, tracker: Arc<ForegroundTracker>) -> Self {
        Self { registry, tracker }
    }

    /// Launch a map session for one order.
    ///
    /// The request's order id overrides any id already set on `callbacks`.
    /// Registration happens before the foreground lookup, so a failed launch
    /// leaves the registry holding the new callbacks.
    pub fn launch(
        &self,
        request: LaunchRequest,
        mut callbacks: SessionCallbacks,
    ) -> Result<LaunchedSession, LaunchError> {
        callbacks.set_order_id(Some(request.order_id.clone()));
        let session_id = self.registry.set_callbacks(callbacks);

        let Some(surface) = self.tracker.top() else {
            tracing::error!(
                session = %session_id,
                order_id = %request.order_id,
                "Cannot start map: no active foreground surface"
            );
            return Err(LaunchError::MissingContext { session_id });
        };

        let navigation = NavigationRequest::from(&request);
        tracing::info!(
            session = %session_id,
            order_id = %navigation.order_id,
            surface = surface.name(),
            target = %request.target,
            zoom = navigation.zoom,
            "Starting map session"
        );
        surface.start_map_session(&navigation);

        Ok(LaunchedSession {
            session_id,
            request: navigation,
        })
    }
}
