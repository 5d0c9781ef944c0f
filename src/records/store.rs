//! In-memory record collections.

use crate::types::{Comment, Post, User};

use super::filter::contains_ignore_case;

/// Three ordered collections (users, posts, comments) keyed by id.
///
/// This is a plain data-access layer: it performs no validation and publishes
/// nothing. Precondition checks and event decisions live in the mutation
/// resolvers.
#[derive(Clone, Debug, Default)]
pub struct RecordStore {
    users: Vec<User>,
    posts: Vec<Post>,
    comments: Vec<Comment>,
}

impl RecordStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with records.
    pub fn with_records(users: Vec<User>, posts: Vec<Post>, comments: Vec<Comment>) -> Self {
        Self {
            users,
            posts,
            comments,
        }
    }

    /// Store seeded with the demo dataset.
    pub fn demo() -> Self {
        let user = |id: &str, name: &str, email: &str, age: i32| User {
            id: id.to_string(),
            name: name.to_string(),
            email: email.to_string(),
            age: Some(age),
        };
        let post = |id: &str, title: &str, body: &str, published: bool, author: &str| Post {
            id: id.to_string(),
            title: title.to_string(),
            body: body.to_string(),
            published,
            author: author.to_string(),
        };
        let comment = |id: &str, text: &str, author: &str, post: &str| Comment {
            id: id.to_string(),
            text: text.to_string(),
            author: author.to_string(),
            post: post.to_string(),
        };

        Self::with_records(
            vec![
                user("123456", "David Rhodes", "rhodesdav@gmail.com", 56),
                user("1234567", "Shelly Schwentker", "shelly@gmail.com", 53),
                user("12345678", "Lisa Carver", "lmcatt@gmail.com", 57),
            ],
            vec![
                post("123", "Pandemic Workflows", "Lorem Hipster Ipsum espresso", false, "123456"),
                post(
                    "124",
                    "Pandemic Relationships",
                    "Lorem Hipster social distancing nespresso",
                    false,
                    "1234567",
                ),
                post(
                    "125",
                    "Pandemic Pet Adoption",
                    "Lorem Woofster Ipsum reindeer antlers",
                    true,
                    "12345678",
                ),
            ],
            vec![
                comment("501", "Adopted a beagle last week.", "123456", "125"),
                comment("502", "Cats are easier.", "1234567", "125"),
            ],
        )
    }

    // --- Reads ---

    /// All users in insertion order.
    pub fn users(&self) -> &[User] {
        &self.users
    }

    /// All posts in insertion order.
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    /// All comments in insertion order.
    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    /// Look up a user by id.
    pub fn find_user(&self, id: &str) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    /// Look up a post by id.
    pub fn find_post(&self, id: &str) -> Option<&Post> {
        self.posts.iter().find(|p| p.id == id)
    }

    /// Look up a comment by id.
    pub fn find_comment(&self, id: &str) -> Option<&Comment> {
        self.comments.iter().find(|c| c.id == id)
    }

    pub(crate) fn find_user_mut(&mut self, id: &str) -> Option<&mut User> {
        self.users.iter_mut().find(|u| u.id == id)
    }

    pub(crate) fn find_post_mut(&mut self, id: &str) -> Option<&mut Post> {
        self.posts.iter_mut().find(|p| p.id == id)
    }

    pub(crate) fn find_comment_mut(&mut self, id: &str) -> Option<&mut Comment> {
        self.comments.iter_mut().find(|c| c.id == id)
    }

    /// Find the user registered under an email address.
    pub fn user_with_email(&self, email: &str) -> Option<&User> {
        self.users.iter().find(|u| u.email == email)
    }

    /// Users whose name contains `query`, case-insensitively. `None` returns all.
    pub fn filter_users(&self, query: Option<&str>) -> Vec<User> {
        match query {
            Some(q) => self
                .users
                .iter()
                .filter(|u| contains_ignore_case(&u.name, q))
                .cloned()
                .collect(),
            None => self.users.clone(),
        }
    }

    /// Posts whose title or body contains `query`, case-insensitively.
    pub fn filter_posts(&self, query: Option<&str>) -> Vec<Post> {
        match query {
            Some(q) => self
                .posts
                .iter()
                .filter(|p| contains_ignore_case(&p.title, q) || contains_ignore_case(&p.body, q))
                .cloned()
                .collect(),
            None => self.posts.clone(),
        }
    }

    /// Comments whose text contains `query`, case-insensitively.
    pub fn filter_comments(&self, query: Option<&str>) -> Vec<Comment> {
        match query {
            Some(q) => self
                .comments
                .iter()
                .filter(|c| contains_ignore_case(&c.text, q))
                .cloned()
                .collect(),
            None => self.comments.clone(),
        }
    }

    /// Posts whose author is `user_id`.
    pub fn posts_by_author(&self, user_id: &str) -> Vec<Post> {
        self.posts
            .iter()
            .filter(|p| p.author == user_id)
            .cloned()
            .collect()
    }

    /// Comments whose author is `user_id`.
    pub fn comments_by_author(&self, user_id: &str) -> Vec<Comment> {
        self.comments
            .iter()
            .filter(|c| c.author == user_id)
            .cloned()
            .collect()
    }

    /// Comments attached to `post_id`.
    pub fn comments_on_post(&self, post_id: &str) -> Vec<Comment> {
        self.comments
            .iter()
            .filter(|c| c.post == post_id)
            .cloned()
            .collect()
    }

    // --- Writes ---

    /// Append a user. Callers check email uniqueness first.
    pub fn insert_user(&mut self, user: User) {
        self.users.push(user);
    }

    /// Append a post.
    pub fn insert_post(&mut self, post: Post) {
        self.posts.push(post);
    }

    /// Append a comment.
    pub fn insert_comment(&mut self, comment: Comment) {
        self.comments.push(comment);
    }

    /// Remove a user by id, returning it. No cascade.
    pub fn remove_user(&mut self, id: &str) -> Option<User> {
        let index = self.users.iter().position(|u| u.id == id)?;
        Some(self.users.remove(index))
    }

    /// Remove a post by id, returning it. No cascade.
    pub fn remove_post(&mut self, id: &str) -> Option<Post> {
        let index = self.posts.iter().position(|p| p.id == id)?;
        Some(self.posts.remove(index))
    }

    /// Remove a comment by id, returning it.
    pub fn remove_comment(&mut self, id: &str) -> Option<Comment> {
        let index = self.comments.iter().position(|c| c.id == id)?;
        Some(self.comments.remove(index))
    }

    /// Remove every post matching `pred`. Returns the removed posts in order.
    pub fn remove_posts_where<F>(&mut self, pred: F) -> Vec<Post>
    where
        F: Fn(&Post) -> bool,
    {
        let (removed, kept): (Vec<Post>, Vec<Post>) = std::mem::take(&mut self.posts)
            .into_iter()
            .partition(|p| pred(p));
        self.posts = kept;
        removed
    }

    /// Remove every comment matching `pred`. Returns the removed comments in order.
    pub fn remove_comments_where<F>(&mut self, pred: F) -> Vec<Comment>
    where
        F: Fn(&Comment) -> bool,
    {
        let (removed, kept): (Vec<Comment>, Vec<Comment>) = std::mem::take(&mut self.comments)
            .into_iter()
            .partition(|c| pred(c));
        self.comments = kept;
        removed
    }
}
