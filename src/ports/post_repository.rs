//! Post repository port.
//!
//! Defines the contract for persisting and retrieving Post aggregates.
//! The storage engine behind it is interchangeable; this service ships an
//! in-memory adapter.

use crate::domain::foundation::{DomainError, PostId};
use crate::domain::post::Post;
use async_trait::async_trait;

/// One page of posts plus the total count.
#[derive(Debug, Clone, PartialEq)]
pub struct PostPage {
    pub items: Vec<Post>,
    pub total: u64,
}

/// Repository port for Post aggregate persistence.
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Insert a new post.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn insert(&self, post: &Post) -> Result<(), DomainError>;

    /// Update an existing post.
    ///
    /// # Errors
    ///
    /// - `PostNotFound` if the post doesn't exist
    async fn update(&self, post: &Post) -> Result<(), DomainError>;

    /// Find a post by its ID.
    ///
    /// Returns `None` if not found.
    async fn find_by_id(&self, id: &PostId) -> Result<Option<Post>, DomainError>;

    /// List posts newest first. `page` is 1-based.
    async fn list(&self, page: u32, per_page: u32) -> Result<PostPage, DomainError>;

    /// Delete a post.
    ///
    /// # Errors
    ///
    /// - `PostNotFound` if the post doesn't exist
    async fn delete(&self, id: &PostId) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn PostRepository) {}
    }
}
