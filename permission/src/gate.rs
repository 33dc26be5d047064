use std::sync::Arc;

use log::{debug, warn};

use crate::{Permission, PermissionService, PermissionStatus};

/// Answer returned by a rationale callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rationale {
    /// Continue and show the permission dialog.
    Proceed,
    /// Abandon the request.
    Cancel,
}

/// How a [`PermissionGate::run_if_granted`] call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOutcome {
    /// The permission was already granted; no dialog was shown.
    AlreadyGranted,
    /// The user granted the permission through the dialog.
    Granted,
    /// The user denied the permission, or the request failed.
    Denied,
    /// The rationale callback cancelled the request.
    Cancelled,
}

impl GateOutcome {
    /// Returns `true` if the guarded action ran.
    #[must_use]
    pub const fn is_granted(self) -> bool {
        matches!(self, Self::AlreadyGranted | Self::Granted)
    }
}

/// Runs actions only once a runtime permission has been granted.
#[derive(Clone)]
pub struct PermissionGate {
    service: Arc<dyn PermissionService>,
}

impl std::fmt::Debug for PermissionGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PermissionGate").finish_non_exhaustive()
    }
}

impl PermissionGate {
    /// Create a gate backed by `service`.
    #[must_use]
    pub fn new(service: Arc<dyn PermissionService>) -> Self {
        Self { service }
    }

    /// Run `on_granted` if `permission` is, or becomes, granted.
    ///
    /// An already granted permission runs `on_granted` before the first
    /// suspension point. When the OS asks for a rationale, `on_needs_rationale`
    /// decides whether the dialog is shown at all. A denial leaves everything
    /// untouched; there is no retry until the caller asks again.
    pub async fn run_if_granted<R, G>(
        &self,
        permission: Permission,
        on_needs_rationale: R,
        on_granted: G,
    ) -> GateOutcome
    where
        R: FnOnce() -> Rationale,
        G: FnOnce(),
    {
        if self.service.is_granted(permission) {
            on_granted();
            return GateOutcome::AlreadyGranted;
        }

        if self.service.should_show_rationale(permission)
            && on_needs_rationale() == Rationale::Cancel
        {
            debug!("{permission:?} request cancelled after rationale");
            return GateOutcome::Cancelled;
        }

        match self.service.request(permission).await {
            Ok(PermissionStatus::Granted) => {
                on_granted();
                GateOutcome::Granted
            }
            Ok(status) => {
                debug!("{permission:?} not granted: {status:?}");
                GateOutcome::Denied
            }
            Err(err) => {
                warn!("{permission:?} request failed: {err}");
                GateOutcome::Denied
            }
        }
    }
}
