//! Application bootstrap implementation.

use std::sync::Arc;

use tracing::info;

use super::config::{AppConfig, BuildInfo};
use crate::background::{
    BackgroundDecision, BackgroundPolicy, BackgroundStateSource, LocationSubsystem,
};
use crate::foreground::{ForegroundSurface, ForegroundTracker};
use crate::launcher::{LaunchError, LaunchRequest, LaunchedSession, MapSessionLauncher};
use crate::session::{SessionCallbacks, SessionRegistry};

/// MapBridge application wiring.
///
/// Built once; every component is shared through `Arc` so platform glue can
/// hold on to the registry (for native map signals) independently.
#[derive(Debug)]
pub struct MapBridgeApp {
    registry: Arc<SessionRegistry>,
    tracker: Arc<ForegroundTracker>,
    launcher: MapSessionLauncher,
    policy: BackgroundPolicy,
    config: AppConfig,
}

impl MapBridgeApp {
    /// Build the application.
    ///
    /// # Arguments
    ///
    /// * `config` - Application configuration
    /// * `state` - Answers the background policy's state queries
    /// * `location` - Location subsystem stopped by the background policy
    pub fn new(
        config: AppConfig,
        state: Arc<dyn BackgroundStateSource>,
        location: Arc<dyn LocationSubsystem>,
    ) -> Self {
        let registry = Arc::new(
            SessionRegistry::new().with_clear_on_close(config.session.clear_on_close),
        );
        let tracker = Arc::new(ForegroundTracker::new());
        let launcher = MapSessionLauncher::new(Arc::clone(&registry), Arc::clone(&tracker));
        let policy = BackgroundPolicy::new(state, location);

        info!(
            flavor = %config.build.flavor,
            application_id = %config.build.application_id,
            version = %config.build.version_name,
            clear_on_close = config.session.clear_on_close,
            "MapBridge application created"
        );

        Self {
            registry,
            tracker,
            launcher,
            policy,
            config,
        }
    }

    /// A UI surface became visible.
    pub fn surface_resumed(&self, surface: &Arc<dyn ForegroundSurface>) {
        self.tracker.on_resume(surface);
    }

    /// A UI surface stopped being visible.
    pub fn surface_paused(&self, surface: &Arc<dyn ForegroundSurface>) {
        self.tracker.on_pause(surface);
    }

    /// The application as a whole returned to the foreground.
    pub fn entered_foreground(&self) {
        self.policy.on_foreground();
    }

    /// The application as a whole left the foreground.
    pub fn entered_background(&self) -> BackgroundDecision {
        self.policy.on_background()
    }

    /// Start a map session for one order. See [`MapSessionLauncher::launch`].
    pub fn launch(
        &self,
        request: LaunchRequest,
        callbacks: SessionCallbacks,
    ) -> Result<LaunchedSession, LaunchError> {
        self.launcher.launch(request, callbacks)
    }

    /// The registry the native map screen reports its signals to.
    pub fn registry(&self) -> Arc<SessionRegistry> {
        Arc::clone(&self.registry)
    }

    pub fn tracker(&self) -> Arc<ForegroundTracker> {
        Arc::clone(&self.tracker)
    }

    pub fn build_info(&self) -> &BuildInfo {
        &self.config.build
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}
