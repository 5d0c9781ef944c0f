//! Read-only resolvers: collection queries and relation lookups.

use crate::server::Server;
use crate::types::{Comment, Post, User};

impl Server {
    // --- Collections ---

    /// Users whose name contains `query` (case-insensitive). `None` returns all.
    pub fn users(&self, query: Option<&str>) -> Vec<User> {
        self.store.read().filter_users(query)
    }

    /// Posts whose title or body contains `query` (case-insensitive).
    pub fn posts(&self, query: Option<&str>) -> Vec<Post> {
        self.store.read().filter_posts(query)
    }

    /// Comments whose text contains `query` (case-insensitive).
    pub fn comments(&self, query: Option<&str>) -> Vec<Comment> {
        self.store.read().filter_comments(query)
    }

    /// User by id.
    pub fn user(&self, id: &str) -> Option<User> {
        self.store.read().find_user(id).cloned()
    }

    /// Post by id, published or not.
    pub fn post(&self, id: &str) -> Option<Post> {
        self.store.read().find_post(id).cloned()
    }

    /// Comment by id.
    pub fn comment(&self, id: &str) -> Option<Comment> {
        self.store.read().find_comment(id).cloned()
    }

    // --- Relations ---

    /// The user who wrote `post`.
    pub fn post_author(&self, post: &Post) -> Option<User> {
        self.user(&post.author)
    }

    /// Comments on `post`, in store order.
    pub fn post_comments(&self, post: &Post) -> Vec<Comment> {
        self.store.read().comments_on_post(&post.id)
    }

    /// Posts written by `user`.
    pub fn user_posts(&self, user: &User) -> Vec<Post> {
        self.store.read().posts_by_author(&user.id)
    }

    /// Comments written by `user`.
    pub fn user_comments(&self, user: &User) -> Vec<Comment> {
        self.store.read().comments_by_author(&user.id)
    }

    /// The user who wrote `comment`.
    pub fn comment_author(&self, comment: &Comment) -> Option<User> {
        self.user(&comment.author)
    }

    /// The post `comment` belongs to.
    pub fn comment_post(&self, comment: &Comment) -> Option<Post> {
        self.post(&comment.post)
    }
}
