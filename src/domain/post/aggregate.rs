//! Post aggregate.

use crate::domain::foundation::{PostId, Timestamp, UserId, ValidationError};

/// Maximum title length in characters.
pub const MAX_TITLE_LEN: usize = 200;

/// Maximum content length in characters.
pub const MAX_CONTENT_LEN: usize = 20_000;

/// A blog post owned by a single author.
#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    id: PostId,
    user_id: UserId,
    title: String,
    content: String,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl Post {
    /// Creates a new post, validating title and content.
    pub fn new(
        id: PostId,
        user_id: UserId,
        title: String,
        content: String,
    ) -> Result<Self, ValidationError> {
        let title = validate_title(title)?;
        let content = validate_content(content)?;
        let now = Timestamp::now();

        Ok(Self {
            id,
            user_id,
            title,
            content,
            created_at: now,
            updated_at: now,
        })
    }

    /// Rebuilds a post from storage without validation.
    pub fn reconstitute(
        id: PostId,
        user_id: UserId,
        title: String,
        content: String,
        created_at: Timestamp,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            id,
            user_id,
            title,
            content,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> &PostId {
        &self.id
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    /// Returns true if the given user authored this post.
    pub fn is_owner(&self, user_id: &UserId) -> bool {
        &self.user_id == user_id
    }

    /// Replaces title and content.
    ///
    /// Nothing is changed if either value is invalid.
    pub fn edit(&mut self, title: String, content: String) -> Result<(), ValidationError> {
        let title = validate_title(title)?;
        let content = validate_content(content)?;
        self.title = title;
        self.content = content;
        self.updated_at = Timestamp::now();
        Ok(())
    }
}

fn validate_title(title: String) -> Result<String, ValidationError> {
    let title = title.trim().to_string();
    if title.is_empty() {
        return Err(ValidationError::empty_field("title"));
    }
    let len = title.chars().count();
    if len > MAX_TITLE_LEN {
        return Err(ValidationError::too_long("title", MAX_TITLE_LEN, len));
    }
    Ok(title)
}

fn validate_content(content: String) -> Result<String, ValidationError> {
    if content.trim().is_empty() {
        return Err(ValidationError::empty_field("content"));
    }
    let len = content.chars().count();
    if len > MAX_CONTENT_LEN {
        return Err(ValidationError::too_long("content", MAX_CONTENT_LEN, len));
    }
    Ok(content)
}
