//! Map surface for the live location screen.
//!
//! The map itself (tiles, gestures, camera animation) is rendered by the
//! platform SDK behind [`MapService`]. [`MapPresenter`] owns the single
//! location marker and the status icon, and keeps them in step with the
//! [`LocationUpdate`](livemap_location::LocationUpdate) values it is given.

#![warn(missing_docs)]

mod presenter;

use livemap_location::Location;
use serde::{Deserialize, Serialize};

pub use presenter::{DEFAULT_ZOOM, MapPresenter};

/// A map coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LatLng {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

impl LatLng {
    /// Create a coordinate.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl From<&Location> for LatLng {
    fn from(location: &Location) -> Self {
        Self::new(location.latitude, location.longitude)
    }
}

impl From<Location> for LatLng {
    fn from(location: Location) -> Self {
        Self::from(&location)
    }
}

/// Marker pin colors, as hues understood by the map SDK.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerIcon {
    /// The SDK's default red pin.
    #[default]
    Default,
    /// Violet pin, used for the user's own position.
    Violet,
}

/// Initial state of a marker added to the map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerOptions {
    /// Where the marker is placed.
    pub position: LatLng,
    /// Pin color.
    pub icon: MarkerIcon,
    /// Whether the marker starts visible.
    pub visible: bool,
}

/// Icon shown on the "my location" button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationIcon {
    /// A fix is shown on the map.
    Enabled,
    /// Waiting for a fix.
    Searching,
    /// Location is off.
    Disabled,
}

/// A marker previously added to a [`MapService`].
pub trait MarkerHandle: Send + Sync {
    /// Move the marker.
    fn set_position(&self, position: LatLng);

    /// Show or hide the marker.
    fn set_visible(&self, visible: bool);
}

/// The platform map view.
pub trait MapService: Send + Sync {
    /// Add a marker and return a handle to it.
    fn add_marker(&self, options: MarkerOptions) -> Box<dyn MarkerHandle>;

    /// Animate the camera to `target` at `zoom`.
    fn animate_camera(&self, target: LatLng, zoom: f32);

    /// When `true`, marker taps are consumed and do nothing.
    fn set_marker_clicks_consumed(&self, consumed: bool);
}

/// The view showing the current [`LocationIcon`].
pub trait StatusIndicator: Send + Sync {
    /// Swap the icon.
    fn set_icon(&self, icon: LocationIcon);
}
