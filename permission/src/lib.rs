//! Runtime permission gating.
//!
//! This crate models the single runtime permission check that guards location
//! access. The platform dialog is reached through [`PermissionService`];
//! [`PermissionGate`] turns it into the "run this once the permission is
//! granted" flow used by the location screen.

#![warn(missing_docs)]

mod gate;
/// Platform-specific implementations.
pub mod sys;

use futures::future::BoxFuture;

pub use gate::{GateOutcome, PermissionGate, Rationale};

/// Types of permissions that can be requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Permission {
    /// Precise access to device location.
    FineLocation,
    /// Approximate access to device location.
    CoarseLocation,
}

/// The current status of a permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PermissionStatus {
    /// Permission has been granted by the user.
    Granted,
    /// Permission has been denied by the user.
    Denied,
    /// Permission is restricted (e.g., parental controls on iOS).
    Restricted,
    /// Permission has not been requested yet.
    NotDetermined,
}

impl PermissionStatus {
    /// Returns `true` if the permission is granted.
    #[must_use]
    pub const fn is_granted(self) -> bool {
        matches!(self, Self::Granted)
    }
}

/// Errors that can occur when requesting permissions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PermissionError {
    /// The permission type is not supported on this platform.
    #[error("permission not supported on this platform")]
    NotSupported,
    /// An unknown error occurred.
    #[error("unknown error: {0}")]
    Unknown(String),
}

/// Access to the operating system's runtime permission machinery.
pub trait PermissionService: Send + Sync {
    /// Whether `permission` is currently granted.
    fn is_granted(&self, permission: Permission) -> bool;

    /// Whether the OS advises explaining the permission before asking again.
    fn should_show_rationale(&self, permission: Permission) -> bool;

    /// Show the permission dialog and resolve with the user's answer.
    fn request(
        &self,
        permission: Permission,
    ) -> BoxFuture<'_, Result<PermissionStatus, PermissionError>>;
}
