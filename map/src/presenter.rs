use std::fmt;
use std::sync::Arc;

use livemap_location::{Location, LocationUpdate};
use log::debug;

use crate::{
    LatLng, LocationIcon, MapService, MarkerHandle, MarkerIcon, MarkerOptions, StatusIndicator,
};

/// Zoom level used when centering on the user.
pub const DEFAULT_ZOOM: f32 = 14.0;

/// Keeps the location marker, status icon and camera in step with location
/// updates.
///
/// A camera move requested before any fix is known is remembered and carried
/// out, once, when the first [`LocationUpdate::Available`] is rendered.
pub struct MapPresenter {
    map: Arc<dyn MapService>,
    indicator: Arc<dyn StatusIndicator>,
    marker: Box<dyn MarkerHandle>,
    latest: LocationUpdate,
    camera_move_pending: bool,
}

impl fmt::Debug for MapPresenter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapPresenter")
            .field("latest", &self.latest)
            .field("camera_move_pending", &self.camera_move_pending)
            .finish_non_exhaustive()
    }
}

impl MapPresenter {
    /// Add the hidden location marker to `map` and disable marker taps.
    pub fn new(map: Arc<dyn MapService>, indicator: Arc<dyn StatusIndicator>) -> Self {
        let marker = map.add_marker(MarkerOptions {
            position: LatLng::default(),
            icon: MarkerIcon::Violet,
            visible: false,
        });
        map.set_marker_clicks_consumed(true);

        Self {
            map,
            indicator,
            marker,
            latest: LocationUpdate::default(),
            camera_move_pending: false,
        }
    }

    /// The last update rendered.
    #[must_use]
    pub const fn latest(&self) -> &LocationUpdate {
        &self.latest
    }

    /// Whether a camera move is waiting for a fix.
    #[must_use]
    pub const fn is_camera_move_pending(&self) -> bool {
        self.camera_move_pending
    }

    /// Reflect `update` on the map.
    pub fn render(&mut self, update: &LocationUpdate) {
        self.latest = *update;

        match update {
            LocationUpdate::Available(location) => {
                self.marker.set_position(location.into());
                self.marker.set_visible(true);
                self.indicator.set_icon(LocationIcon::Enabled);

                if self.camera_move_pending {
                    self.animate_to(location);
                }
            }
            LocationUpdate::Searching => {
                self.marker.set_visible(false);
                self.indicator.set_icon(LocationIcon::Searching);
            }
            LocationUpdate::Unavailable => {
                self.marker.set_visible(false);
                self.indicator.set_icon(LocationIcon::Disabled);
            }
        }
    }

    /// Center the camera on the current fix, or as soon as one arrives.
    pub fn move_camera_to_current_location(&mut self) {
        if let LocationUpdate::Available(location) = self.latest {
            self.animate_to(&location);
        } else {
            debug!("no fix yet, deferring camera move");
            self.camera_move_pending = true;
        }
    }

    /// Forget a deferred camera move.
    pub fn cancel_pending_camera_move(&mut self) {
        self.camera_move_pending = false;
    }

    fn animate_to(&mut self, location: &Location) {
        self.camera_move_pending = false;
        self.map.animate_camera(location.into(), DEFAULT_ZOOM);
    }
}
