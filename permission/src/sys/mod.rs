//! Platform-specific permission implementations.
//!
//! Mobile targets supply their own [`PermissionService`](crate::PermissionService)
//! from the host application; this module only covers desktop defaults.

#[cfg(target_os = "linux")]
mod linux;

use futures::future::BoxFuture;

use crate::{Permission, PermissionError, PermissionService, PermissionStatus};

/// The default permission service for the current desktop platform.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemPermissions;

impl SystemPermissions {
    /// Create the system permission service.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Check the current status of a permission without requesting it.
    #[must_use]
    pub fn check(self, permission: Permission) -> PermissionStatus {
        check(permission)
    }
}

impl PermissionService for SystemPermissions {
    fn is_granted(&self, permission: Permission) -> bool {
        check(permission).is_granted()
    }

    fn should_show_rationale(&self, _permission: Permission) -> bool {
        false
    }

    fn request(
        &self,
        permission: Permission,
    ) -> BoxFuture<'_, Result<PermissionStatus, PermissionError>> {
        Box::pin(async move { request(permission) })
    }
}

#[cfg(target_os = "linux")]
use linux::{check, request};

// Fallback for targets without a desktop implementation
#[cfg(not(target_os = "linux"))]
const fn check(_permission: Permission) -> PermissionStatus {
    PermissionStatus::NotDetermined
}

#[cfg(not(target_os = "linux"))]
const fn request(_permission: Permission) -> Result<PermissionStatus, PermissionError> {
    Err(PermissionError::NotSupported)
}
