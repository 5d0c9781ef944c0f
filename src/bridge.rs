//! Mutation-to-event decisions.
//!
//! Given a post's visibility before and after a mutation, decide whether an
//! event is published, on which channel and with which snapshot. Post events
//! go to [`POSTS_CHANNEL`] and only describe posts that were observable at the
//! relevant instant. Comment events always fire, on the parent post's channel.
//! Users never produce events.

use crate::bus::{comments_channel, MutationKind, Payload, TopicBus, POSTS_CHANNEL};
use crate::types::{Comment, Post};

/// A decided event: where it goes and what it carries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Publication {
    pub channel: String,
    pub payload: Payload,
}

impl Publication {
    fn post(mutation: MutationKind, post: &Post) -> Self {
        Self {
            channel: POSTS_CHANNEL.to_string(),
            payload: Payload::post(mutation, post.clone()),
        }
    }

    /// Publish on the bus. Returns the number of listeners reached.
    pub fn publish(self, bus: &TopicBus) -> usize {
        bus.publish(&self.channel, self.payload)
    }
}

/// A new post is announced only if it is created published.
pub fn post_created(post: &Post) -> Option<Publication> {
    post.published
        .then(|| Publication::post(MutationKind::Created, post))
}

/// A removed post is announced only if it was published when removed.
pub fn post_deleted(post: &Post) -> Option<Publication> {
    post.published
        .then(|| Publication::post(MutationKind::Deleted, post))
}

/// Decide the event for a post update.
///
/// | before | after | event                          |
/// |--------|-------|--------------------------------|
/// | true   | true  | UPDATED with the updated post  |
/// | false  | false | none                           |
/// | false  | true  | CREATED with the updated post  |
/// | true   | false | DELETED with the original post |
pub fn post_updated(before: &Post, after: &Post) -> Option<Publication> {
    match (before.published, after.published) {
        (true, true) => Some(Publication::post(MutationKind::Updated, after)),
        (false, false) => None,
        (false, true) => Some(Publication::post(MutationKind::Created, after)),
        (true, false) => Some(Publication::post(MutationKind::Deleted, before)),
    }
}

/// Every comment mutation is published on its parent post's channel.
pub fn comment_changed(mutation: MutationKind, comment: &Comment) -> Publication {
    Publication {
        channel: comments_channel(&comment.post),
        payload: Payload::comment(mutation, comment.clone()),
    }
}
