use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{LocationError, LocationResult};

const DEFAULT_INTERVAL_MS: u64 = 10_000;
const DEFAULT_FASTEST_INTERVAL_MS: u64 = 5_000;

/// Trade-off between accuracy and power drawn by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    /// Most accurate fix available, typically GPS.
    HighAccuracy,
    /// Block-level accuracy at moderate power.
    #[default]
    BalancedPowerAccuracy,
    /// City-level accuracy at low power.
    LowPower,
    /// Only fixes requested by other apps.
    Passive,
}

/// What the app asks of the location provider.
///
/// Built once and handed to both the stream and the settings check.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationRequestConfig {
    priority: Priority,
    interval_ms: u64,
    fastest_interval_ms: u64,
}

impl Default for LocationRequestConfig {
    fn default() -> Self {
        Self {
            priority: Priority::default(),
            interval_ms: DEFAULT_INTERVAL_MS,
            fastest_interval_ms: DEFAULT_FASTEST_INTERVAL_MS,
        }
    }
}

impl LocationRequestConfig {
    /// Create a request configuration.
    #[must_use]
    pub fn new(priority: Priority, interval: Duration, fastest_interval: Duration) -> Self {
        Self {
            priority,
            interval_ms: millis(interval),
            fastest_interval_ms: millis(fastest_interval),
        }
    }

    /// Desired update priority.
    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }

    /// Desired interval between updates.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    /// Fastest interval the app can handle.
    #[must_use]
    pub const fn fastest_interval(&self) -> Duration {
        Duration::from_millis(self.fastest_interval_ms)
    }

    /// Check that the intervals describe a request a provider can honour.
    ///
    /// # Errors
    ///
    /// Returns [`LocationError::InvalidConfig`] if the interval is zero or the
    /// fastest interval exceeds the interval.
    pub fn validate(&self) -> LocationResult<()> {
        if self.interval_ms == 0 {
            return Err(LocationError::InvalidConfig(
                "interval must be greater than zero".into(),
            ));
        }
        if self.fastest_interval_ms > self.interval_ms {
            return Err(LocationError::InvalidConfig(format!(
                "fastest interval {}ms exceeds interval {}ms",
                self.fastest_interval_ms, self.interval_ms
            )));
        }
        Ok(())
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
