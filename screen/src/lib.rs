//! # livemap-screen
//!
//! The live location screen: a map with the user's position on it and a
//! "my location" button.
//!
//! [`LocationScreen`] is the composition root. It owns one
//! [`LocationStream`], one [`MapPresenter`] and one [`SettingsResolver`], and
//! drives them from the host's lifecycle callbacks:
//!
//! ```rust,ignore
//! let screen = LocationScreen::new(services, LocationRequestConfig::default())?;
//! screen.on_create(&registry, saved_state.is_none()).await;
//! // user taps the location button
//! screen.on_location_button_clicked().await;
//! screen.on_destroy();
//! ```

#![warn(missing_docs)]

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use livemap_location::{
    LocationError, LocationProvider, LocationRequestConfig, LocationStream, LocationUpdate,
    ResolutionRegistry, ResolutionResult, SettingsClient, SettingsOutcome, SettingsResolver,
    Subscription,
};
use livemap_map::{MapPresenter, MapService, StatusIndicator};
use livemap_permission::{GateOutcome, Permission, PermissionGate, PermissionService, Rationale};
use log::{debug, info, warn};


/// Errors returned when building a screen.
#[derive(Debug, thiserror::Error)]
pub enum ScreenError {
    /// The location request configuration was rejected.
    #[error(transparent)]
    Config(#[from] LocationError),
}

/// Platform services the screen is built from.
#[derive(Clone)]
pub struct ScreenServices {
    /// Runtime permission checks and dialog.
    pub permissions: Arc<dyn PermissionService>,
    /// Device location provider.
    pub provider: Arc<dyn LocationProvider>,
    /// Location settings check.
    pub settings: Arc<dyn SettingsClient>,
    /// The map view.
    pub map: Arc<dyn MapService>,
    /// The "my location" button icon.
    pub indicator: Arc<dyn StatusIndicator>,
}

impl fmt::Debug for ScreenServices {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScreenServices").finish_non_exhaustive()
    }
}

/// One live location screen.
pub struct LocationScreen {
    gate: PermissionGate,
    stream: LocationStream,
    presenter: Arc<Mutex<MapPresenter>>,
    resolver: SettingsResolver,
    subscription: Mutex<Option<Subscription>>,
    paused: AtomicBool,
}

impl fmt::Debug for LocationScreen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocationScreen")
            .field("stream", &self.stream)
            .field("resolver", &self.resolver)
            .field("observing", &self.is_observing())
            .finish_non_exhaustive()
    }
}

impl LocationScreen {
    /// Build the screen. The map marker is added right away; location updates
    /// start only after [`on_create`](Self::on_create) gets the permission.
    ///
    /// # Errors
    ///
    /// Returns [`ScreenError::Config`] if `config` fails validation.
    pub fn new(
        services: ScreenServices,
        config: LocationRequestConfig,
    ) -> Result<Self, ScreenError> {
        config.validate()?;

        let presenter = MapPresenter::new(services.map, services.indicator);

        Ok(Self {
            gate: PermissionGate::new(services.permissions),
            stream: LocationStream::new(services.provider, config),
            presenter: Arc::new(Mutex::new(presenter)),
            resolver: SettingsResolver::new(services.settings),
            subscription: Mutex::new(None),
            paused: AtomicBool::new(false),
        })
    }

    /// The location stream behind the screen.
    #[must_use]
    pub const fn stream(&self) -> &LocationStream {
        &self.stream
    }

    /// The current location state.
    #[must_use]
    pub fn current(&self) -> LocationUpdate {
        self.stream.current()
    }

    /// Whether the screen observes the location stream.
    #[must_use]
    pub fn is_observing(&self) -> bool {
        self.subscription().is_some()
    }

    /// Whether a camera move is waiting for a fix.
    #[must_use]
    pub fn is_camera_move_pending(&self) -> bool {
        self.presenter().is_camera_move_pending()
    }

    /// Whether the settings prompt is registered.
    #[must_use]
    pub fn is_resolver_registered(&self) -> bool {
        self.resolver.is_registered()
    }

    /// The screen was created.
    ///
    /// Registers the settings prompt, starts location updates once the
    /// permission is granted and, for a fresh screen (not restored from saved
    /// state), checks the settings and centers the camera on the first fix.
    pub async fn on_create(&self, registry: &dyn ResolutionRegistry, is_initial_state: bool) {
        let presenter = self.presenter.clone();
        self.resolver.register(
            registry,
            Box::new(move |result| {
                if result == ResolutionResult::Declined {
                    debug!("settings prompt declined, dropping pending camera move");
                    lock(&presenter).cancel_pending_camera_move();
                }
            }),
        );

        self.set_up_location_updates(is_initial_state).await;

        if is_initial_state {
            self.presenter().move_camera_to_current_location();
        }
    }

    /// Observe location updates once the permission is granted, optionally
    /// making sure the device settings can serve them.
    pub async fn set_up_location_updates(&self, ensure_settings: bool) -> GateOutcome {
        let outcome = self
            .gate
            .run_if_granted(
                Permission::FineLocation,
                || Rationale::Proceed,
                || self.observe_location_updates(),
            )
            .await;

        if !outcome.is_granted() {
            info!("location permission not granted, updates stay off");
            return outcome;
        }

        if ensure_settings {
            match self.resolver.check_and_resolve(self.stream.config()).await {
                SettingsOutcome::Satisfied => {}
                SettingsOutcome::ResolvableFailure(_) => debug!("waiting on settings prompt"),
                SettingsOutcome::UnresolvableFailure(reason) => {
                    warn!("location settings unusable: {reason}");
                }
            }
        }

        outcome
    }

    /// The "my location" button was tapped.
    ///
    /// When location is off this reruns the permission and settings flow and
    /// restarts provider updates that failed to start. The camera then
    /// centers on the user now or on the next fix.
    pub async fn on_location_button_clicked(&self) {
        if self.stream.current().is_unavailable() {
            self.set_up_location_updates(true).await;
        }

        self.presenter().move_camera_to_current_location();
    }

    /// The screen went to the background. Location updates stop.
    pub fn on_stop(&self) {
        let subscription = self.subscription().take();
        if let Some(subscription) = subscription {
            self.paused.store(true, Ordering::SeqCst);
            subscription.cancel();
        }
    }

    /// The screen came back. Updates resume if they ran before [`on_stop`](Self::on_stop).
    pub fn on_start(&self) {
        if self.paused.swap(false, Ordering::SeqCst) {
            self.observe_location_updates();
        }
    }

    /// The screen is gone. Stops updates and releases the settings prompt.
    pub fn on_destroy(&self) {
        self.paused.store(false, Ordering::SeqCst);
        let subscription = self.subscription().take();
        if let Some(subscription) = subscription {
            subscription.cancel();
        }
        self.resolver.unregister();
    }

    fn observe_location_updates(&self) {
        let mut slot = self.subscription();
        if slot.is_some() {
            drop(slot);
            if self.stream.restart() {
                debug!("retrying location updates after a failed start");
            }
            return;
        }

        let presenter = self.presenter.clone();
        *slot = Some(self.stream.observe(move |update| lock(&presenter).render(update)));
    }

    fn subscription(&self) -> MutexGuard<'_, Option<Subscription>> {
        self.subscription
            .lock()
            .expect("subscription mutex poisoned")
    }

    fn presenter(&self) -> MutexGuard<'_, MapPresenter> {
        lock(&self.presenter)
    }
}

fn lock(presenter: &Mutex<MapPresenter>) -> MutexGuard<'_, MapPresenter> {
    presenter.lock().expect("presenter mutex poisoned")
}
