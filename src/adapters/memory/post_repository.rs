//! In-memory implementation of the `PostRepository` port.
//!
//! Posts live in a single vector kept newest first, so listing is a slice.
//! Nothing survives a restart.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, PostId};
use crate::domain::post::Post;
use crate::ports::{PostPage, PostRepository};

#[derive(Debug, Default)]
pub struct InMemoryPostRepository {
    posts: RwLock<Vec<Post>>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored posts.
    pub async fn len(&self) -> usize {
        self.posts.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.posts.read().await.is_empty()
    }
}

fn not_found(id: &PostId) -> DomainError {
    DomainError::new(ErrorCode::PostNotFound, format!("Post not found: {}", id))
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn insert(&self, post: &Post) -> Result<(), DomainError> {
        let mut posts = self.posts.write().await;
        if posts.iter().any(|p| p.id() == post.id()) {
            return Err(DomainError::new(
                ErrorCode::DatabaseError,
                format!("Duplicate post id: {}", post.id()),
            ));
        }
        posts.insert(0, post.clone());
        Ok(())
    }

    async fn update(&self, post: &Post) -> Result<(), DomainError> {
        let mut posts = self.posts.write().await;
        let slot = posts
            .iter_mut()
            .find(|p| p.id() == post.id())
            .ok_or_else(|| not_found(post.id()))?;
        *slot = post.clone();
        Ok(())
    }

    async fn find_by_id(&self, id: &PostId) -> Result<Option<Post>, DomainError> {
        let posts = self.posts.read().await;
        Ok(posts.iter().find(|p| p.id() == id).cloned())
    }

    async fn list(&self, page: u32, per_page: u32) -> Result<PostPage, DomainError> {
        let posts = self.posts.read().await;
        let per_page = per_page as usize;
        let offset = (page.max(1) as usize - 1).saturating_mul(per_page);

        let items = posts.iter().skip(offset).take(per_page).cloned().collect();
        Ok(PostPage {
            items,
            total: posts.len() as u64,
        })
    }

    async fn delete(&self, id: &PostId) -> Result<(), DomainError> {
        let mut posts = self.posts.write().await;
        let before = posts.len();
        posts.retain(|p| p.id() != id);
        if posts.len() == before {
            return Err(not_found(id));
        }
        Ok(())
    }
}
