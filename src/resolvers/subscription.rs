//! Subscription resolvers: validate arguments and open the right channel.

use crate::bus::{comments_channel, Subscription, COUNT_CHANNEL, POSTS_CHANNEL};
use crate::error::{Result, ServerError};
use crate::server::Server;
use tracing::debug;

impl Server {
    /// Live comment events for one published post.
    ///
    /// Rejected if the post does not exist or is not published. The check and
    /// the registration happen under the store's read lock, so no mutation can
    /// slip between them.
    pub fn subscribe_to_comments(&self, post_id: &str) -> Result<Subscription> {
        let store = self.store.read();

        match store.find_post(post_id) {
            None => Err(ServerError::SubscriptionRejected(format!(
                "post {} not found",
                post_id
            ))),
            Some(post) if !post.published => Err(ServerError::SubscriptionRejected(format!(
                "post {} is not published",
                post_id
            ))),
            Some(_) => {
                let subscription = self.bus.subscribe(&comments_channel(post_id));
                debug!(post_id, subscription = %subscription.id(), "comment subscription opened");
                Ok(subscription)
            }
        }
    }

    /// Live events for every observable post.
    pub fn subscribe_to_posts(&self) -> Subscription {
        self.bus.subscribe(POSTS_CHANNEL)
    }

    /// Live values of the demonstration counter.
    pub fn subscribe_to_count(&self) -> Subscription {
        self.bus.subscribe(COUNT_CHANNEL)
    }
}
