//! Subscription handle: the live event sequence for one listener.

use crossbeam_channel::{Receiver, RecvError, RecvTimeoutError, TryRecvError};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Weak;
use std::time::Duration;
use tracing::{debug, warn};

use super::manager::BusInner;
use super::types::{BusEvent, DropReason, Payload, SubscriptionId};

/// A live, cancellable sequence of events from one channel.
///
/// Dropping the subscription cancels it.
pub struct Subscription {
    id: SubscriptionId,
    channel: String,
    receiver: Receiver<BusEvent>,
    bus: Weak<BusInner>,
    cancelled: AtomicBool,
    /// Set once a `Dropped` notice has been received.
    drop_reason: Mutex<Option<DropReason>>,
}

impl Subscription {
    /// Wrap a registered listener's queue. Only the bus creates these.
    pub(crate) fn new(
        id: SubscriptionId,
        channel: String,
        receiver: Receiver<BusEvent>,
        bus: Weak<BusInner>,
    ) -> Self {
        Self {
            id,
            channel,
            receiver,
            bus,
            cancelled: AtomicBool::new(false),
            drop_reason: Mutex::new(None),
        }
    }

    /// Identifier assigned by the bus at subscribe time.
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Name of the channel this subscription listens on.
    pub fn channel(&self) -> &str {
        &self.channel
    }

    /// Stop receiving events and release the listener registration.
    ///
    /// Idempotent. Events still queued at cancellation are discarded.
    pub fn cancel(&self) {
        if self.cancelled.swap(true, Ordering::SeqCst) {
            return;
        }

        if let Some(bus) = self.bus.upgrade() {
            bus.remove(&self.channel, self.id);
        }

        while self.receiver.try_recv().is_ok() {}
    }

    /// Whether `cancel` has been called (explicitly or on drop).
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Receive the next event (blocking).
    ///
    /// Returns an error once the subscription is cancelled or dropped by the bus
    /// and its queue is drained.
    pub fn recv(&self) -> Result<BusEvent, RecvError> {
        if self.is_cancelled() {
            return Err(RecvError);
        }
        let event = self.receiver.recv()?;
        if self.is_cancelled() {
            return Err(RecvError);
        }
        Ok(self.observe(event))
    }

    /// Try to receive an event (non-blocking).
    pub fn try_recv(&self) -> Result<BusEvent, TryRecvError> {
        if self.is_cancelled() {
            return Err(TryRecvError::Disconnected);
        }
        let event = self.receiver.try_recv()?;
        if self.is_cancelled() {
            return Err(TryRecvError::Disconnected);
        }
        Ok(self.observe(event))
    }

    /// Receive with timeout.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<BusEvent, RecvTimeoutError> {
        if self.is_cancelled() {
            return Err(RecvTimeoutError::Disconnected);
        }
        let event = self.receiver.recv_timeout(timeout)?;
        if self.is_cancelled() {
            return Err(RecvTimeoutError::Disconnected);
        }
        Ok(self.observe(event))
    }

    /// Why the bus dropped this subscription, once its `Dropped` notice has
    /// been received. `None` while live or after a plain cancel.
    pub fn drop_reason(&self) -> Option<DropReason> {
        *self.drop_reason.lock()
    }

    fn observe(&self, event: BusEvent) -> BusEvent {
        if let BusEvent::Dropped { reason } = &event {
            *self.drop_reason.lock() = Some(*reason);
        }
        event
    }

    /// Blocking iterator over published payloads.
    ///
    /// Ends when the subscription is cancelled or dropped by the bus.
    pub fn iter(&self) -> Iter<'_> {
        Iter { subscription: self }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("channel", &self.channel)
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

/// Iterator returned by [`Subscription::iter`].
pub struct Iter<'a> {
    subscription: &'a Subscription,
}

impl Iterator for Iter<'_> {
    type Item = Payload;

    fn next(&mut self) -> Option<Payload> {
        match self.subscription.recv().ok()? {
            BusEvent::Message { payload, .. } => Some(payload),
            BusEvent::Dropped {
                reason: DropReason::BufferOverflow,
            } => {
                warn!(channel = %self.subscription.channel, "subscription evicted for falling behind");
                None
            }
            BusEvent::Dropped { reason } => {
                debug!(channel = %self.subscription.channel, ?reason, "subscription ended");
                None
            }
        }
    }
}

impl<'a> IntoIterator for &'a Subscription {
    type Item = Payload;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}
