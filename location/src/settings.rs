use std::fmt;
use std::sync::{Arc, Mutex};

use futures::future::BoxFuture;
use log::{debug, warn};

use crate::LocationRequestConfig;

/// Registry key used for the settings resolution prompt.
pub const RESOLUTION_REQUEST_KEY: &str = "locationSettings";

/// Opaque token identifying a one-tap resolution the platform can offer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResolutionHandle(String);

impl ResolutionHandle {
    /// Wrap a platform token (an intent sender id, a URL, ...).
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The platform token.
    #[must_use]
    pub fn token(&self) -> &str {
        &self.0
    }
}

/// Why device settings do not satisfy a request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    /// The platform can fix the settings after a user prompt.
    #[error("location settings need user resolution")]
    Resolvable(ResolutionHandle),
    /// The settings cannot be fixed from inside the app.
    #[error("location settings check failed: {0}")]
    Other(String),
}

/// Result of [`SettingsResolver::check_and_resolve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsOutcome {
    /// Device settings already satisfy the request.
    Satisfied,
    /// A resolution prompt was launched. Its answer shows up later through the
    /// location stream, not here.
    ResolvableFailure(ResolutionHandle),
    /// The settings cannot be fixed from inside the app.
    UnresolvableFailure(String),
}

/// The user's answer to a resolution prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionResult {
    /// The user applied the suggested settings change.
    Accepted,
    /// The user dismissed the prompt.
    Declined,
}

/// Callback receiving the answer to a resolution prompt.
pub type ResolutionCallback = Box<dyn Fn(ResolutionResult) + Send + Sync>;

/// Checks device location settings against a request.
pub trait SettingsClient: Send + Sync {
    /// Resolve with `Ok(())` if current settings satisfy `config`.
    fn check_settings<'a>(
        &'a self,
        config: &'a LocationRequestConfig,
    ) -> BoxFuture<'a, Result<(), SettingsError>>;
}

/// A registered prompt that can show a resolution to the user.
pub trait ResolutionLauncher: Send + Sync {
    /// Show the prompt for `handle`. Returns without waiting for the answer.
    fn launch(&self, handle: &ResolutionHandle);

    /// Release the registration. No further results are delivered.
    fn unregister(&self);
}

/// Where resolution prompts are registered, usually owned by the host screen.
pub trait ResolutionRegistry: Send + Sync {
    /// Register a prompt under `key`; answers are delivered to `on_result`.
    fn register(&self, key: &str, on_result: ResolutionCallback) -> Box<dyn ResolutionLauncher>;
}

/// Makes sure device settings can serve a location request.
///
/// The prompt launcher belongs to the hosting screen: call
/// [`register`](Self::register) when the screen is created and
/// [`unregister`](Self::unregister) when it is destroyed.
pub struct SettingsResolver {
    client: Arc<dyn SettingsClient>,
    launcher: Mutex<Option<Arc<dyn ResolutionLauncher>>>,
}

impl fmt::Debug for SettingsResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SettingsResolver")
            .field("registered", &self.is_registered())
            .finish_non_exhaustive()
    }
}

impl SettingsResolver {
    /// Create a resolver without a registered launcher.
    #[must_use]
    pub fn new(client: Arc<dyn SettingsClient>) -> Self {
        Self {
            client,
            launcher: Mutex::new(None),
        }
    }

    /// Register the resolution prompt with the host's registry.
    ///
    /// Replaces (and unregisters) a previous registration.
    pub fn register(&self, registry: &dyn ResolutionRegistry, on_result: ResolutionCallback) {
        let launcher = registry.register(RESOLUTION_REQUEST_KEY, on_result);
        let previous = self
            .launcher
            .lock()
            .expect("launcher mutex poisoned")
            .replace(Arc::from(launcher));
        if let Some(previous) = previous {
            previous.unregister();
        }
    }

    /// Release the resolution prompt. Safe to call more than once.
    pub fn unregister(&self) {
        let launcher = self.launcher.lock().expect("launcher mutex poisoned").take();
        if let Some(launcher) = launcher {
            launcher.unregister();
        }
    }

    /// Whether a launcher is currently registered.
    #[must_use]
    pub fn is_registered(&self) -> bool {
        self.launcher
            .lock()
            .expect("launcher mutex poisoned")
            .is_some()
    }

    /// Check the device settings against `config`, prompting the user when the
    /// platform can fix them.
    ///
    /// Overlapping calls run independently.
    pub async fn check_and_resolve(&self, config: &LocationRequestConfig) -> SettingsOutcome {
        match self.client.check_settings(config).await {
            Ok(()) => {
                debug!("location settings satisfied");
                SettingsOutcome::Satisfied
            }
            Err(SettingsError::Resolvable(handle)) => {
                self.launch(&handle);
                SettingsOutcome::ResolvableFailure(handle)
            }
            Err(SettingsError::Other(reason)) => {
                warn!("location settings cannot be resolved: {reason}");
                SettingsOutcome::UnresolvableFailure(reason)
            }
        }
    }

    fn launch(&self, handle: &ResolutionHandle) {
        let launcher = self.launcher.lock().expect("launcher mutex poisoned").clone();
        if let Some(launcher) = launcher {
            debug!("launching location settings resolution");
            launcher.launch(handle);
        } else {
            warn!("no resolution launcher registered, skipping settings prompt");
        }
    }
}

impl Drop for SettingsResolver {
    fn drop(&mut self) {
        self.unregister();
    }
}
