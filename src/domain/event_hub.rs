//! Multicast hub for user lifecycle events.
//!
//! [`EventHub`] wraps a [`tokio::sync::broadcast`] channel. The channel is
//! created lazily by the first [`EventHub::subscribe`] call and then lives
//! for the rest of the process, shared by every later subscriber.
//!
//! # Backpressure
//!
//! The channel is a bounded ring of `capacity` events. A publish never
//! waits: it writes into the ring and returns. A subscriber that falls
//! more than `capacity` events behind loses the oldest ones (only that
//! subscriber is affected), is told how many it missed, and resumes from
//! the oldest event still retained. Events published before the first
//! subscriber arrives are dropped, so nothing is buffered while nobody
//! listens. The ring length is `capacity` rounded up to a power of two,
//! and `capacity` itself is kept within `1..=`[`MAX_CAPACITY`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

use futures_util::Stream;
use tokio::sync::broadcast;

use super::UserEvent;

/// Largest ring capacity a hub accepts.
pub const MAX_CAPACITY: usize = 65_536;

/// Broadcast hub for [`UserEvent`]s.
///
/// Cheap to clone; all clones share the same channel.
#[derive(Debug, Clone)]
pub struct EventHub {
    inner: Arc<HubInner>,
}

#[derive(Debug)]
struct HubInner {
    capacity: usize,
    sender: OnceLock<broadcast::Sender<UserEvent>>,
    published: AtomicU64,
    dropped_before_activation: AtomicU64,
}

impl EventHub {
    /// Creates a new, not yet activated `EventHub`.
    ///
    /// `capacity` is clamped to `1..=MAX_CAPACITY`, so activation on the
    /// first subscribe cannot fail.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Arc::new(HubInner {
                capacity: capacity.clamp(1, MAX_CAPACITY),
                sender: OnceLock::new(),
                published: AtomicU64::new(0),
                dropped_before_activation: AtomicU64::new(0),
            }),
        }
    }

    /// Publishes an event to all current subscribers.
    ///
    /// Returns the number of subscribers the event was queued for. Never
    /// blocks on slow or departed subscribers.
    pub fn publish(&self, event: UserEvent) -> usize {
        let Some(sender) = self.inner.sender.get() else {
            self.inner
                .dropped_before_activation
                .fetch_add(1, Ordering::Relaxed);
            tracing::debug!(
                event_type = event.event_type_str(),
                "event hub inactive, event dropped"
            );
            return 0;
        };
        self.inner.published.fetch_add(1, Ordering::Relaxed);
        // Err only means nobody is subscribed right now.
        sender.send(event).unwrap_or(0)
    }

    /// Registers a new subscriber that receives every event published
    /// from now on. Activates the hub on first use.
    #[must_use]
    pub fn subscribe(&self) -> Subscription {
        let sender = self.inner.sender.get_or_init(|| {
            tracing::info!(capacity = self.inner.capacity, "event hub activated");
            broadcast::channel(self.inner.capacity).0
        });
        Subscription {
            receiver: sender.subscribe(),
            missed: 0,
        }
    }

    /// Returns the current number of registered subscribers.
    #[must_use]
    pub fn receiver_count(&self) -> usize {
        self.inner
            .sender
            .get()
            .map_or(0, broadcast::Sender::receiver_count)
    }

    /// Returns `true` once the first subscriber has activated the hub.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.inner.sender.get().is_some()
    }

    /// Ring capacity per subscriber.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.inner.capacity
    }

    /// Number of events published while the hub was active.
    #[must_use]
    pub fn published(&self) -> u64 {
        self.inner.published.load(Ordering::Relaxed)
    }

    /// Number of events dropped because no subscriber had activated the
    /// hub yet.
    #[must_use]
    pub fn dropped_before_activation(&self) -> u64 {
        self.inner.dropped_before_activation.load(Ordering::Relaxed)
    }
}

/// One subscriber's cursor into the hub.
///
/// Dropping it unregisters the subscriber and frees its position in the
/// ring.
#[derive(Debug)]
pub struct Subscription {
    receiver: broadcast::Receiver<UserEvent>,
    missed: u64,
}

impl Subscription {
    /// Waits for the next event.
    ///
    /// Returns `None` only if the hub itself has been dropped. Evicted
    /// events are skipped, logged and added to [`Subscription::missed`].
    pub async fn recv(&mut self) -> Option<UserEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    self.missed = self.missed.saturating_add(n);
                    tracing::warn!(
                        lagged = n,
                        total_missed = self.missed,
                        "stream subscriber lagged behind event hub"
                    );
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Total number of events this subscriber lost to eviction.
    #[must_use]
    pub fn missed(&self) -> u64 {
        self.missed
    }

    /// Turns the subscription into a stream of events.
    ///
    /// The subscription is dropped, and therefore unregistered, when the
    /// stream is dropped.
    pub fn into_stream(self) -> impl Stream<Item = UserEvent> + Send + 'static {
        futures_util::stream::unfold(self, |mut sub| async move {
            sub.recv().await.map(|event| (event, sub))
        })
    }
}
