//! GetPostHandler - Query handler for a single post.

use std::sync::Arc;

use crate::domain::foundation::PostId;
use crate::domain::post::{Post, PostError};
use crate::ports::PostRepository;

#[derive(Debug, Clone)]
pub struct GetPostQuery {
    pub post_id: PostId,
}

pub struct GetPostHandler {
    repository: Arc<dyn PostRepository>,
}

impl GetPostHandler {
    pub fn new(repository: Arc<dyn PostRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, query: GetPostQuery) -> Result<Post, PostError> {
        self.repository
            .find_by_id(&query.post_id)
            .await?
            .ok_or_else(|| PostError::not_found(query.post_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::post::test_support::{post_by, MockPostRepository};

    #[tokio::test]
    async fn returns_existing_post() {
        let post = post_by("author-1", "Hello");
        let handler = GetPostHandler::new(Arc::new(MockPostRepository::new().with_post(post.clone())));

        let found = handler.handle(GetPostQuery { post_id: *post.id() }).await.unwrap();
        assert_eq!(found, post);
    }

    #[tokio::test]
    async fn missing_post_is_not_found() {
        let handler = GetPostHandler::new(Arc::new(MockPostRepository::new()));
        let id = PostId::new();

        let err = handler.handle(GetPostQuery { post_id: id }).await.unwrap_err();
        assert_eq!(err, PostError::NotFound(id));
    }
}
