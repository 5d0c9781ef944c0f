//! # Postwire
//!
//! An in-memory users/posts/comments server core where mutations are bridged
//! to live subscribers through a topic bus.
//!
//! ## Core Concepts
//!
//! - **Record Store**: Ordered in-memory collections of users, posts and comments
//! - **Topic Bus**: Named broadcast channels with cancellable per-listener queues
//! - **Bridge**: Decides which post/comment mutations become events, based on
//!   whether the post is published before and after
//! - **Resolvers**: Queries, mutations and subscriptions on a [`Server`] context
//!
//! ## Example
//!
//! ```ignore
//! use postwire::{CreateCommentInput, RecordStore, Server, ServerConfig};
//!
//! let server = Server::with_store(ServerConfig::default(), RecordStore::demo());
//!
//! // Listen for comments on a published post
//! let comments = server.subscribe_to_comments("125")?;
//!
//! server.create_comment(CreateCommentInput {
//!     text: "hi".into(),
//!     author: "123456".into(),
//!     post: "125".into(),
//! })?;
//!
//! let event = comments.recv()?;
//! ```

pub mod bridge;
pub mod bus;
pub mod config;
pub mod error;
pub mod records;
mod resolvers;
pub mod server;
pub mod ticker;
pub mod types;

// Re-exports
pub use bridge::Publication;
pub use bus::{
    comments_channel, BusEvent, DropReason, MutationEvent, MutationKind, Payload, Subscription,
    SubscriptionId, TopicBus, COUNT_CHANNEL, POSTS_CHANNEL,
};
pub use config::{Args, BusConfig, ServerConfig};
pub use error::{RecordKind, Result, ServerError};
pub use records::RecordStore;
pub use server::Server;
pub use ticker::Ticker;
pub use types::*;
