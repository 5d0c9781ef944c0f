//! Mutation resolvers.
//!
//! Each mutation checks its preconditions, changes the store, asks the bridge
//! for an event and publishes it, all under the store's write lock. A failed
//! check returns before anything is changed or published.

use crate::bridge::{self, Publication};
use crate::bus::MutationKind;
use crate::error::{RecordKind, Result, ServerError};
use crate::server::Server;
use crate::types::{
    Comment, CreateCommentInput, CreatePostInput, CreateUserInput, Post, UpdateCommentInput,
    UpdatePostInput, UpdateUserInput, User,
};
use std::collections::HashSet;
use tracing::debug;

impl Server {
    fn emit(&self, publication: Option<Publication>) {
        if let Some(publication) = publication {
            let channel = publication.channel.clone();
            let delivered = publication.publish(&self.bus);
            debug!(%channel, delivered, "mutation event published");
        }
    }

    // --- Users ---

    /// Register a user. Fails if the email is already in use.
    pub fn create_user(&self, input: CreateUserInput) -> Result<User> {
        let mut store = self.store.write();

        if store.user_with_email(&input.email).is_some() {
            return Err(ServerError::Conflict(input.email));
        }

        let user = User::from_input(input);
        store.insert_user(user.clone());

        debug!(id = %user.id, "user created");
        Ok(user)
    }

    /// Patch a user. A new email must not belong to a different user.
    pub fn update_user(&self, id: &str, patch: UpdateUserInput) -> Result<User> {
        let mut store = self.store.write();

        if store.find_user(id).is_none() {
            return Err(ServerError::not_found(RecordKind::User, id));
        }

        if let Some(email) = &patch.email {
            if store.user_with_email(email).is_some_and(|other| other.id != id) {
                return Err(ServerError::Conflict(email.clone()));
            }
        }

        let user = store
            .find_user_mut(id)
            .ok_or_else(|| ServerError::not_found(RecordKind::User, id))?;
        user.apply(patch);

        debug!(id, "user updated");
        Ok(user.clone())
    }

    /// Delete a user along with their posts, their comments and every comment
    /// on their posts.
    ///
    /// Cascaded removals publish nothing.
    pub fn delete_user(&self, id: &str) -> Result<User> {
        let mut store = self.store.write();

        let user = store
            .remove_user(id)
            .ok_or_else(|| ServerError::not_found(RecordKind::User, id))?;

        let removed_posts: HashSet<String> = store
            .remove_posts_where(|p| p.author == id)
            .into_iter()
            .map(|p| p.id)
            .collect();
        let removed_comments =
            store.remove_comments_where(|c| c.author == id || removed_posts.contains(&c.post));

        debug!(
            id,
            posts = removed_posts.len(),
            comments = removed_comments.len(),
            "user deleted with cascade"
        );
        Ok(user)
    }

    // --- Posts ---

    /// Create a post. Fails if the author does not exist.
    pub fn create_post(&self, input: CreatePostInput) -> Result<Post> {
        let mut store = self.store.write();

        if store.find_user(&input.author).is_none() {
            return Err(ServerError::Precondition(format!(
                "author {} does not exist",
                input.author
            )));
        }

        let post = Post::from_input(input);
        store.insert_post(post.clone());

        debug!(id = %post.id, published = post.published, "post created");
        self.emit(bridge::post_created(&post));
        Ok(post)
    }

    /// Patch a post, announcing visibility transitions.
    pub fn update_post(&self, id: &str, patch: UpdatePostInput) -> Result<Post> {
        let mut store = self.store.write();

        let post = store
            .find_post_mut(id)
            .ok_or_else(|| ServerError::not_found(RecordKind::Post, id))?;
        let before = post.clone();
        post.apply(patch);
        let after = post.clone();

        debug!(id, was_published = before.published, published = after.published, "post updated");
        self.emit(bridge::post_updated(&before, &after));
        Ok(after)
    }

    /// Delete a post and its comments. Cascaded comment removals publish nothing.
    pub fn delete_post(&self, id: &str) -> Result<Post> {
        let mut store = self.store.write();

        let post = store
            .remove_post(id)
            .ok_or_else(|| ServerError::not_found(RecordKind::Post, id))?;
        let removed_comments = store.remove_comments_where(|c| c.post == id);

        debug!(id, comments = removed_comments.len(), "post deleted");
        self.emit(bridge::post_deleted(&post));
        Ok(post)
    }

    // --- Comments ---

    /// Comment on a published post.
    pub fn create_comment(&self, input: CreateCommentInput) -> Result<Comment> {
        let mut store = self.store.write();

        if store.find_user(&input.author).is_none() {
            return Err(ServerError::Precondition(format!(
                "author {} does not exist",
                input.author
            )));
        }
        match store.find_post(&input.post) {
            None => {
                return Err(ServerError::Precondition(format!(
                    "post {} does not exist",
                    input.post
                )))
            }
            Some(post) if !post.published => {
                return Err(ServerError::Precondition(format!(
                    "post {} is not published",
                    input.post
                )))
            }
            Some(_) => {}
        }

        let comment = Comment::from_input(input);
        store.insert_comment(comment.clone());

        debug!(id = %comment.id, post = %comment.post, "comment created");
        self.emit(Some(bridge::comment_changed(MutationKind::Created, &comment)));
        Ok(comment)
    }

    /// Patch a comment. The parent post's visibility is not re-checked.
    pub fn update_comment(&self, id: &str, patch: UpdateCommentInput) -> Result<Comment> {
        let mut store = self.store.write();

        let comment = store
            .find_comment_mut(id)
            .ok_or_else(|| ServerError::not_found(RecordKind::Comment, id))?;
        if let Some(text) = patch.text {
            comment.text = text;
        }
        let comment = comment.clone();

        debug!(id, "comment updated");
        self.emit(Some(bridge::comment_changed(MutationKind::Updated, &comment)));
        Ok(comment)
    }

    pub fn delete_comment(&self, id: &str) -> Result<Comment> {
        let mut store = self.store.write();

        let comment = store
            .remove_comment(id)
            .ok_or_else(|| ServerError::not_found(RecordKind::Comment, id))?;

        debug!(id, "comment deleted");
        self.emit(Some(bridge::comment_changed(MutationKind::Deleted, &comment)));
        Ok(comment)
    }
}
