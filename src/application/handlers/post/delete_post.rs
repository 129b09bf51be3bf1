//! DeletePostHandler - Command handler for removing posts.

use std::sync::Arc;

use crate::domain::foundation::{PostId, UserId};
use crate::domain::post::PostError;
use crate::ports::PostRepository;

#[derive(Debug, Clone)]
pub struct DeletePostCommand {
    pub post_id: PostId,
    pub user_id: UserId,
}

pub struct DeletePostHandler {
    repository: Arc<dyn PostRepository>,
}

impl DeletePostHandler {
    pub fn new(repository: Arc<dyn PostRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, cmd: DeletePostCommand) -> Result<(), PostError> {
        let post = self
            .repository
            .find_by_id(&cmd.post_id)
            .await?
            .ok_or_else(|| PostError::not_found(cmd.post_id))?;

        if !post.is_owner(&cmd.user_id) {
            return Err(PostError::forbidden());
        }

        self.repository.delete(&cmd.post_id).await?;
        tracing::debug!(post_id = %cmd.post_id, "post deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::post::test_support::{post_by, user, MockPostRepository};

    #[tokio::test]
    async fn owner_can_delete() {
        let post = post_by("owner", "Doomed");
        let repo = Arc::new(MockPostRepository::new().with_post(post.clone()));
        let handler = DeletePostHandler::new(repo.clone());

        handler
            .handle(DeletePostCommand {
                post_id: *post.id(),
                user_id: user("owner"),
            })
            .await
            .unwrap();

        assert!(repo.saved_posts().is_empty());
    }

    #[tokio::test]
    async fn other_user_is_forbidden() {
        let post = post_by("owner", "Safe");
        let repo = Arc::new(MockPostRepository::new().with_post(post.clone()));
        let handler = DeletePostHandler::new(repo.clone());

        let err = handler
            .handle(DeletePostCommand {
                post_id: *post.id(),
                user_id: user("intruder"),
            })
            .await
            .unwrap_err();

        assert_eq!(err, PostError::Forbidden);
        assert_eq!(repo.saved_posts().len(), 1);
    }

    #[tokio::test]
    async fn missing_post_is_not_found() {
        let handler = DeletePostHandler::new(Arc::new(MockPostRepository::new()));
        let id = PostId::new();

        let err = handler
            .handle(DeletePostCommand {
                post_id: id,
                user_id: user("owner"),
            })
            .await
            .unwrap_err();
        assert_eq!(err, PostError::NotFound(id));
    }
}
