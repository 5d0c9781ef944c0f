//! Event and channel types for the topic bus.

use crate::error::Result;
use crate::types::{Comment, Post};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Global channel shared by every post event.
pub const POSTS_CHANNEL: &str = "posts";

/// Demonstration channel fed by the counter ticker.
pub const COUNT_CHANNEL: &str = "count";

/// Per-post channel carrying that post's comment events.
pub fn comments_channel(post_id: &str) -> String {
    format!("comments-{}", post_id)
}

/// What happened to the record carried by a [`MutationEvent`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MutationKind {
    Created,
    Updated,
    Deleted,
}

/// Envelope published for post and comment mutations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationEvent<T> {
    pub mutation: MutationKind,
    pub data: T,
}

impl<T> MutationEvent<T> {
    /// Wrap a record snapshot.
    pub fn new(mutation: MutationKind, data: T) -> Self {
        Self { mutation, data }
    }
}

/// A published payload, keyed by the resource it describes.
///
/// Serializes as `{"post": {...}}`, `{"comment": {...}}` or `{"count": n}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Payload {
    Post(MutationEvent<Post>),
    Comment(MutationEvent<Comment>),
    Count(u64),
}

impl Payload {
    /// Post event for the global posts channel.
    pub fn post(mutation: MutationKind, post: Post) -> Self {
        Payload::Post(MutationEvent::new(mutation, post))
    }

    /// Comment event for a per-post channel.
    pub fn comment(mutation: MutationKind, comment: Comment) -> Self {
        Payload::Comment(MutationEvent::new(mutation, comment))
    }

    /// Encode in its wire shape.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Events delivered to a subscription.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BusEvent {
    /// A payload published on the subscribed channel.
    Message { channel: String, payload: Payload },

    /// The subscription was dropped by the bus. No further events follow.
    Dropped { reason: DropReason },
}

impl BusEvent {
    /// The payload, if this is a message.
    pub fn payload(&self) -> Option<&Payload> {
        match self {
            BusEvent::Message { payload, .. } => Some(payload),
            BusEvent::Dropped { .. } => None,
        }
    }

    /// Consume the event, keeping only the payload of a message.
    pub fn into_payload(self) -> Option<Payload> {
        match self {
            BusEvent::Message { payload, .. } => Some(payload),
            BusEvent::Dropped { .. } => None,
        }
    }
}

/// Why a subscription was dropped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    /// The listener's queue was full (slow consumer).
    BufferOverflow,
    /// The bus was closed.
    Shutdown,
}

/// Unique identifier for a subscription.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}
