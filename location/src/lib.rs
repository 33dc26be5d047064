//! Live device location as a small availability state machine.
//!
//! The platform location provider pushes two kinds of callbacks: fixes and
//! availability flags. [`LocationStream`] folds them into a single
//! [`LocationUpdate`] that any number of observers can follow, starting the
//! provider when the first observer attaches and stopping it when the last
//! one leaves. [`SettingsResolver`] checks whether the device settings can
//! satisfy a [`LocationRequestConfig`] and asks the user to fix them when the
//! platform offers a one-tap resolution.

#![warn(missing_docs)]

mod config;
mod provider;
mod settings;
mod stream;

use serde::{Deserialize, Serialize};

pub use config::{LocationRequestConfig, Priority};
pub use provider::{LocationCallback, LocationProvider};
pub use settings::{
    RESOLUTION_REQUEST_KEY, ResolutionCallback, ResolutionHandle, ResolutionLauncher,
    ResolutionRegistry, ResolutionResult, SettingsClient, SettingsError, SettingsOutcome,
    SettingsResolver,
};
pub use stream::{LocationStream, LocationUpdates, Subscription};

/// A single reported geographic position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Latitude in degrees (-90 to 90).
    pub latitude: f64,
    /// Longitude in degrees (-180 to 180).
    pub longitude: f64,
    /// Horizontal accuracy in meters, if available.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,
    /// Timestamp as Unix epoch milliseconds, if available.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<u64>,
}

impl Location {
    /// A fix with coordinates only.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            accuracy: None,
            timestamp: None,
        }
    }

    /// Attach a horizontal accuracy in meters.
    #[must_use]
    pub const fn with_accuracy(mut self, accuracy: f64) -> Self {
        self.accuracy = Some(accuracy);
        self
    }

    /// Attach a Unix epoch timestamp in milliseconds.
    #[must_use]
    pub const fn with_timestamp(mut self, timestamp: u64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}

/// The current location state shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "state", content = "location", rename_all = "snake_case")]
pub enum LocationUpdate {
    /// Location is usable and a fix is known.
    Available(Location),
    /// Location is usable but no fix has arrived yet.
    #[default]
    Searching,
    /// Location services are disabled or denied.
    Unavailable,
}

impl LocationUpdate {
    /// Returns `true` for [`LocationUpdate::Available`].
    #[must_use]
    pub const fn is_available(&self) -> bool {
        matches!(self, Self::Available(_))
    }

    /// Returns `true` for [`LocationUpdate::Unavailable`].
    #[must_use]
    pub const fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable)
    }

    /// The fix carried by an available update.
    #[must_use]
    pub const fn location(&self) -> Option<&Location> {
        match self {
            Self::Available(location) => Some(location),
            Self::Searching | Self::Unavailable => None,
        }
    }
}

/// Errors that can occur when accessing location.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocationError {
    /// Location services are disabled on the device.
    #[error("location services disabled")]
    ServiceDisabled,
    /// The request configuration cannot be honoured.
    #[error("invalid location request: {0}")]
    InvalidConfig(String),
    /// The platform provider reported an error.
    #[error("location provider error: {0}")]
    Provider(String),
}

/// Result alias for location operations.
pub type LocationResult<T> = Result<T, LocationError>;
