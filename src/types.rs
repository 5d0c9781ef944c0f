//! Core record types.

use serde::{Deserialize, Serialize};

/// Generate a fresh opaque record identifier.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// A registered user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<i32>,
}

/// A post authored by a user.
///
/// `published` gates whether the post and its comments are observable by
/// subscribers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub title: String,
    pub body: String,
    pub published: bool,
    /// Author user id.
    pub author: String,
}

/// A comment on a post.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub text: String,
    /// Author user id.
    pub author: String,
    /// Parent post id.
    pub post: String,
}

/// Input for creating a user (before id assigned).
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CreateUserInput {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub age: Option<i32>,
}

/// Partial update for a user. Absent fields are left unchanged.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct UpdateUserInput {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub age: Option<i32>,
}

/// Input for creating a post.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CreatePostInput {
    pub title: String,
    pub body: String,
    pub published: bool,
    pub author: String,
}

/// Partial update for a post.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct UpdatePostInput {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub published: Option<bool>,
}

/// Input for creating a comment.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CreateCommentInput {
    pub text: String,
    pub author: String,
    pub post: String,
}

/// Partial update for a comment.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct UpdateCommentInput {
    #[serde(default)]
    pub text: Option<String>,
}

impl User {
    pub fn from_input(input: CreateUserInput) -> Self {
        Self {
            id: new_id(),
            name: input.name,
            email: input.email,
            age: input.age,
        }
    }

    /// Apply a patch in place. Email uniqueness is checked by the caller.
    pub fn apply(&mut self, patch: UpdateUserInput) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(age) = patch.age {
            self.age = Some(age);
        }
    }
}

impl Post {
    pub fn from_input(input: CreatePostInput) -> Self {
        Self {
            id: new_id(),
            title: input.title,
            body: input.body,
            published: input.published,
            author: input.author,
        }
    }

    /// Apply a patch in place.
    pub fn apply(&mut self, patch: UpdatePostInput) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(body) = patch.body {
            self.body = body;
        }
        if let Some(published) = patch.published {
            self.published = published;
        }
    }
}

impl Comment {
    pub fn from_input(input: CreateCommentInput) -> Self {
        Self {
            id: new_id(),
            text: input.text,
            author: input.author,
            post: input.post,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ids_are_unique() {
        let a = new_id();
        let b = new_id();
        assert_ne!(a, b);
        assert!(!a.is_empty());
    }

    #[test]
    fn test_post_patch_only_touches_present_fields() {
        let mut post = Post {
            id: "1".into(),
            title: "Old".into(),
            body: "Body".into(),
            published: false,
            author: "u".into(),
        };

        post.apply(UpdatePostInput {
            title: Some("New".into()),
            ..Default::default()
        });

        assert_eq!(post.title, "New");
        assert_eq!(post.body, "Body");
        assert!(!post.published);
    }

    #[test]
    fn test_user_age_optional_in_json() {
        let user: User =
            serde_json::from_value(json!({"id": "1", "name": "A", "email": "a@x"})).unwrap();
        assert_eq!(user.age, None);

        let value = serde_json::to_value(&user).unwrap();
        assert!(value.get("age").is_none());
    }
}
