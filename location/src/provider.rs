use std::sync::Arc;

use crate::{Location, LocationRequestConfig, LocationResult};

/// Receives pushes from a [`LocationProvider`].
///
/// Both methods are called on the provider's delivery thread, which is the UI
/// thread on mobile platforms.
pub trait LocationCallback: Send + Sync {
    /// A new location result. `None` when the platform delivered a result
    /// without a usable fix.
    fn on_location_result(&self, location: Option<Location>);

    /// Whether location is currently usable, independent of having a fix.
    fn on_location_availability(&self, available: bool);
}

/// A platform location provider (fused location, `CoreLocation`, `GeoClue2`).
pub trait LocationProvider: Send + Sync {
    /// Start pushing updates for `config` to `callback`.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform refuses the request.
    fn request_updates(
        &self,
        config: &LocationRequestConfig,
        callback: Arc<dyn LocationCallback>,
    ) -> LocationResult<()>;

    /// Stop pushing updates to a callback previously passed to
    /// [`request_updates`](Self::request_updates).
    fn remove_updates(&self, callback: &Arc<dyn LocationCallback>);
}
