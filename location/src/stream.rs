use std::fmt;
use std::pin::Pin;
use std::sync::{Arc, Mutex, Weak};
use std::task::{Context, Poll};

use async_channel::{Receiver, unbounded};
use futures::Stream;
use log::{debug, info, warn};

use crate::{
    Location, LocationCallback, LocationProvider, LocationRequestConfig, LocationUpdate,
};

type Observer = Arc<dyn Fn(&LocationUpdate) + Send + Sync>;

#[derive(Default)]
struct State {
    value: LocationUpdate,
    observers: Vec<(u64, Observer)>,
    next_id: u64,
    subscribed: bool,
}

struct Shared {
    provider: Arc<dyn LocationProvider>,
    config: LocationRequestConfig,
    callback: Arc<dyn LocationCallback>,
    state: Mutex<State>,
}

impl Shared {
    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().expect("location state mutex poisoned")
    }

    /// Applies `next` to the current value and notifies observers if it changed.
    fn transition(&self, next: impl FnOnce(&LocationUpdate) -> Option<LocationUpdate>) {
        let (update, observers) = {
            let mut state = self.lock();
            let Some(update) = next(&state.value) else {
                return;
            };
            if update == state.value {
                return;
            }
            state.value = update;
            let observers: Vec<Observer> =
                state.observers.iter().map(|(_, o)| o.clone()).collect();
            (update, observers)
        };

        match &update {
            LocationUpdate::Available(fix) => {
                debug!("Location: lat {}, lng {}", fix.latitude, fix.longitude);
            }
            LocationUpdate::Searching => debug!("Location: searching"),
            LocationUpdate::Unavailable => debug!("Location: unavailable"),
        }

        for observer in observers {
            observer(&update);
        }
    }

    fn start_updates(&self) {
        match self
            .provider
            .request_updates(&self.config, self.callback.clone())
        {
            Ok(()) => {
                self.lock().subscribed = true;
                info!("Location updates started");
            }
            Err(err) => {
                warn!("failed to start location updates: {err}");
                self.transition(|_| Some(LocationUpdate::Unavailable));
            }
        }
    }

    fn detach(&self, id: u64) {
        let stop = {
            let mut state = self.lock();
            let before = state.observers.len();
            state.observers.retain(|(observer_id, _)| *observer_id != id);
            let removed = state.observers.len() != before;
            let stop = removed && state.observers.is_empty() && state.subscribed;
            if stop {
                state.subscribed = false;
            }
            stop
        };

        if stop {
            self.provider.remove_updates(&self.callback);
            info!("Location updates stopped");
        }
    }
}

/// Folds provider callbacks into the shared state.
///
/// Holds the stream weakly so a provider that outlives the stream cannot keep
/// it alive or mutate it.
struct StreamCallback {
    shared: Weak<Shared>,
}

impl LocationCallback for StreamCallback {
    fn on_location_result(&self, location: Option<Location>) {
        let (Some(shared), Some(fix)) = (self.shared.upgrade(), location) else {
            return;
        };

        shared.transition(|current| {
            if current.is_unavailable() {
                debug!("dropping fix received while unavailable");
                None
            } else {
                Some(LocationUpdate::Available(fix))
            }
        });
    }

    fn on_location_availability(&self, available: bool) {
        let Some(shared) = self.shared.upgrade() else {
            return;
        };

        shared.transition(|current| match (available, current) {
            (false, _) => Some(LocationUpdate::Unavailable),
            (true, LocationUpdate::Unavailable) => Some(LocationUpdate::Searching),
            (true, _) => None,
        });
    }
}

/// The device location as a single observable value.
///
/// The provider is subscribed only while at least one observer is attached.
/// A fix that arrives after the provider reported location as unavailable is
/// dropped; only an availability callback can leave
/// [`LocationUpdate::Unavailable`].
#[derive(Clone)]
pub struct LocationStream {
    shared: Arc<Shared>,
}

impl fmt::Debug for LocationStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.shared.lock();
        f.debug_struct("LocationStream")
            .field("value", &state.value)
            .field("observers", &state.observers.len())
            .field("subscribed", &state.subscribed)
            .finish()
    }
}

impl LocationStream {
    /// Create an inactive stream in the [`LocationUpdate::Searching`] state.
    pub fn new(provider: Arc<dyn LocationProvider>, config: LocationRequestConfig) -> Self {
        let shared = Arc::new_cyclic(|weak| Shared {
            provider,
            config,
            callback: Arc::new(StreamCallback {
                shared: weak.clone(),
            }),
            state: Mutex::new(State::default()),
        });
        Self { shared }
    }

    /// The request configuration passed to the provider and settings check.
    #[must_use]
    pub fn config(&self) -> &LocationRequestConfig {
        &self.shared.config
    }

    /// The current value.
    #[must_use]
    pub fn current(&self) -> LocationUpdate {
        self.shared.lock().value
    }

    /// Whether the provider subscription is running.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.shared.lock().subscribed
    }

    /// Number of attached observers.
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.shared.lock().observers.len()
    }

    /// Attach an observer.
    ///
    /// The observer is called at once with the current value and then on
    /// every change. The first observer starts provider updates. Dropping the
    /// returned [`Subscription`] detaches it; the last detach stops updates.
    pub fn observe<F>(&self, observer: F) -> Subscription
    where
        F: Fn(&LocationUpdate) + Send + Sync + 'static,
    {
        let observer: Observer = Arc::new(observer);
        let (id, current, start) = {
            let mut state = self.shared.lock();
            let id = state.next_id;
            state.next_id += 1;
            let start = state.observers.is_empty() && !state.subscribed;
            state.observers.push((id, observer.clone()));
            (id, state.value, start)
        };

        observer(&current);

        if start {
            self.shared.start_updates();
        }

        Subscription {
            shared: Some(Arc::downgrade(&self.shared)),
            id,
        }
    }

    /// Ask the provider for updates again if a previous start failed while
    /// observers are still attached. Returns whether a start was attempted.
    #[must_use = "a start is only attempted while observers are attached"]
    pub fn restart(&self) -> bool {
        let start = {
            let state = self.shared.lock();
            !state.subscribed && !state.observers.is_empty()
        };
        if start {
            self.shared.start_updates();
        }
        start
    }

    /// Attach an observer that forwards every value into an async stream.
    #[must_use]
    pub fn updates(&self) -> LocationUpdates {
        let (sender, receiver) = unbounded();
        let subscription = self.observe(move |update| {
            if let Err(err) = sender.try_send(*update) {
                warn!("dropping location update: {err}");
            }
        });

        LocationUpdates {
            receiver: Box::pin(receiver),
            _subscription: subscription,
        }
    }
}

/// An attached observer of a [`LocationStream`]. Detaches on drop.
#[must_use = "dropping a subscription detaches the observer"]
pub struct Subscription {
    shared: Option<Weak<Shared>>,
    id: u64,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("attached", &self.shared.is_some())
            .finish()
    }
}

impl Subscription {
    /// Detach the observer now.
    pub fn cancel(mut self) {
        self.detach();
    }

    fn detach(&mut self) {
        if let Some(shared) = self.shared.take().and_then(|weak| weak.upgrade()) {
            shared.detach(self.id);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.detach();
    }
}

/// Async stream of location values; see [`LocationStream::updates`].
pub struct LocationUpdates {
    receiver: Pin<Box<Receiver<LocationUpdate>>>,
    _subscription: Subscription,
}

impl fmt::Debug for LocationUpdates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocationUpdates")
            .field("pending", &self.receiver.len())
            .finish_non_exhaustive()
    }
}

impl Stream for LocationUpdates {
    type Item = LocationUpdate;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.receiver.as_mut().poll_next(cx)
    }
}
