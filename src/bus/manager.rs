//! Topic bus: named broadcast channels with per-listener queues.

use crate::config::BusConfig;
use crossbeam_channel::{bounded, unbounded, Sender, TrySendError};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

use super::handle::Subscription;
use super::types::{BusEvent, DropReason, Payload, SubscriptionId};

/// Outcome of queueing one event for one listener.
enum Delivery {
    Queued,
    Full,
    Disconnected,
}

/// Internal listener state.
struct Listener {
    sender: Sender<BusEvent>,
    /// Max pending events before the listener is dropped (None = unbounded).
    capacity: Option<usize>,
}

impl Listener {
    /// Queue an event without blocking.
    fn try_send(&self, event: BusEvent) -> Delivery {
        if let Some(capacity) = self.capacity {
            // One slot past capacity is reserved for the Dropped notice.
            if self.sender.len() >= capacity {
                return Delivery::Full;
            }
        }

        match self.sender.try_send(event) {
            Ok(()) => Delivery::Queued,
            Err(TrySendError::Full(_)) => Delivery::Full,
            Err(TrySendError::Disconnected(_)) => Delivery::Disconnected,
        }
    }
}

type ChannelTable = HashMap<String, HashMap<SubscriptionId, Listener>>;

pub(crate) struct BusInner {
    /// Listeners by channel name. Channels with no listeners are absent.
    channels: RwLock<ChannelTable>,
    /// Counter for generating subscription IDs.
    next_id: AtomicU64,
    config: BusConfig,
}

impl BusInner {
    /// Remove a listener. Returns false if it was already gone.
    pub(crate) fn remove(&self, channel: &str, id: SubscriptionId) -> bool {
        let mut channels = self.channels.write();
        let Some(listeners) = channels.get_mut(channel) else {
            return false;
        };

        let removed = listeners.remove(&id).is_some();
        if listeners.is_empty() {
            channels.remove(channel);
        }

        if removed {
            debug!(channel, subscription = %id, "listener removed");
        }
        removed
    }
}

/// Named broadcast channels.
///
/// Cloning is cheap; clones share the same channel table.
#[derive(Clone)]
pub struct TopicBus {
    inner: Arc<BusInner>,
}

impl TopicBus {
    /// Create a bus with unbounded listener queues.
    pub fn new() -> Self {
        Self::with_config(BusConfig::default())
    }

    pub fn with_config(config: BusConfig) -> Self {
        Self {
            inner: Arc::new(BusInner {
                channels: RwLock::new(HashMap::new()),
                next_id: AtomicU64::new(1),
                config,
            }),
        }
    }

    /// Register a listener on `channel`.
    ///
    /// Only events published after this call are delivered. The listener is
    /// removed when the returned subscription is cancelled or dropped.
    pub fn subscribe(&self, channel: &str) -> Subscription {
        let id = SubscriptionId(self.inner.next_id.fetch_add(1, Ordering::SeqCst));
        let capacity = self.inner.config.buffer_size.map(|n| n.max(1));
        let (sender, receiver) = match capacity {
            Some(n) => bounded(n + 1),
            None => unbounded(),
        };

        self.inner
            .channels
            .write()
            .entry(channel.to_string())
            .or_default()
            .insert(id, Listener { sender, capacity });

        debug!(channel, subscription = %id, "listener registered");

        Subscription::new(id, channel.to_string(), receiver, Arc::downgrade(&self.inner))
    }

    /// Remove a listener by id. Idempotent.
    pub fn unsubscribe(&self, channel: &str, id: SubscriptionId) -> bool {
        self.inner.remove(channel, id)
    }

    /// Queue `payload` for every listener currently on `channel`.
    ///
    /// Never blocks. Listeners whose queue is full are dropped with a
    /// [`DropReason::BufferOverflow`] notice. Returns the number of listeners
    /// the event was queued for.
    pub fn publish(&self, channel: &str, payload: Payload) -> usize {
        // Exclusive lock keeps publishes on one channel totally ordered.
        let mut channels = self.inner.channels.write();
        let Some(listeners) = channels.get_mut(channel) else {
            debug!(channel, "publish with no listeners");
            return 0;
        };

        let event = BusEvent::Message {
            channel: channel.to_string(),
            payload,
        };

        let mut delivered = 0;
        let mut overflowed = Vec::new();
        let mut disconnected = Vec::new();

        for (id, listener) in listeners.iter() {
            match listener.try_send(event.clone()) {
                Delivery::Queued => delivered += 1,
                Delivery::Full => overflowed.push(*id),
                Delivery::Disconnected => disconnected.push(*id),
            }
        }

        for id in overflowed {
            if let Some(listener) = listeners.remove(&id) {
                warn!(channel, subscription = %id, "dropping slow subscriber");
                let _ = listener.sender.try_send(BusEvent::Dropped {
                    reason: DropReason::BufferOverflow,
                });
            }
        }
        for id in disconnected {
            listeners.remove(&id);
        }

        if listeners.is_empty() {
            channels.remove(channel);
        }

        debug!(channel, delivered, "published");
        delivered
    }

    /// Number of listeners currently registered on `channel`.
    pub fn listener_count(&self, channel: &str) -> usize {
        self.inner
            .channels
            .read()
            .get(channel)
            .map_or(0, |listeners| listeners.len())
    }

    /// Number of channels with at least one listener.
    pub fn channel_count(&self) -> usize {
        self.inner.channels.read().len()
    }

    /// Drop every listener, notifying each with [`DropReason::Shutdown`].
    pub fn close(&self) {
        let channels = std::mem::take(&mut *self.inner.channels.write());
        let mut closed = 0;
        for listener in channels.into_values().flat_map(|listeners| listeners.into_values()) {
            let _ = listener.sender.try_send(BusEvent::Dropped {
                reason: DropReason::Shutdown,
            });
            closed += 1;
        }
        debug!(closed, "bus closed");
    }
}

impl Default for TopicBus {
    fn default() -> Self {
        Self::new()
    }
}
