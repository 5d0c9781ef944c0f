//! Topic bus for live subscriptions.
//!
//! Channels are named broadcast topics, materialized lazily on first
//! subscribe. Each listener owns its own queue, so publishing never waits on
//! a slow consumer:
//! - Events published after a subscription are delivered in publish order
//! - No replay: late subscribers never see earlier events
//! - Cancelling (or dropping) a subscription releases its registration
//!
//! # Example
//!
//! ```ignore
//! let bus = TopicBus::new();
//! let sub = bus.subscribe(POSTS_CHANNEL);
//!
//! bus.publish(POSTS_CHANNEL, Payload::Count(1));
//!
//! for payload in &sub {
//!     println!("{}", serde_json::to_string(&payload)?);
//! }
//! ```

mod handle;
mod manager;
mod types;

pub use handle::{Iter, Subscription};
pub use manager::TopicBus;
pub use types::{
    comments_channel, BusEvent, DropReason, MutationEvent, MutationKind, Payload, SubscriptionId,
    COUNT_CHANNEL, POSTS_CHANNEL,
};
