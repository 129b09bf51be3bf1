//! UpdatePostHandler - Command handler for editing posts.

use std::sync::Arc;

use crate::domain::foundation::{PostId, UserId};
use crate::domain::post::{Post, PostError};
use crate::ports::PostRepository;

/// Command to replace a post's title and content.
#[derive(Debug, Clone)]
pub struct UpdatePostCommand {
    pub post_id: PostId,
    pub user_id: UserId,
    pub title: String,
    pub content: String,
}

pub struct UpdatePostHandler {
    repository: Arc<dyn PostRepository>,
}

impl UpdatePostHandler {
    pub fn new(repository: Arc<dyn PostRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, cmd: UpdatePostCommand) -> Result<Post, PostError> {
        // 1. Load post
        let mut post = self
            .repository
            .find_by_id(&cmd.post_id)
            .await?
            .ok_or_else(|| PostError::not_found(cmd.post_id))?;

        // 2. Authorize - only the owner may edit
        if !post.is_owner(&cmd.user_id) {
            return Err(PostError::forbidden());
        }

        // 3. Apply and persist
        post.edit(cmd.title, cmd.content)?;
        self.repository.update(&post).await?;

        Ok(post)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::post::test_support::{post_by, user, MockPostRepository};

    fn command(post: &Post, caller: &str, title: &str) -> UpdatePostCommand {
        UpdatePostCommand {
            post_id: *post.id(),
            user_id: user(caller),
            title: title.to_string(),
            content: "edited".to_string(),
        }
    }

    #[tokio::test]
    async fn owner_can_update() {
        let post = post_by("owner", "Before");
        let repo = Arc::new(MockPostRepository::new().with_post(post.clone()));
        let handler = UpdatePostHandler::new(repo.clone());

        let updated = handler.handle(command(&post, "owner", "After")).await.unwrap();

        assert_eq!(updated.title(), "After");
        assert_eq!(repo.saved_posts()[0].title(), "After");
    }

    #[tokio::test]
    async fn other_user_is_forbidden() {
        let post = post_by("owner", "Before");
        let repo = Arc::new(MockPostRepository::new().with_post(post.clone()));
        let handler = UpdatePostHandler::new(repo.clone());

        let err = handler.handle(command(&post, "intruder", "After")).await.unwrap_err();

        assert_eq!(err, PostError::Forbidden);
        assert_eq!(repo.saved_posts()[0].title(), "Before");
    }

    #[tokio::test]
    async fn missing_post_is_not_found() {
        let handler = UpdatePostHandler::new(Arc::new(MockPostRepository::new()));
        let ghost = post_by("owner", "Ghost");

        let err = handler.handle(command(&ghost, "owner", "After")).await.unwrap_err();
        assert_eq!(err, PostError::NotFound(*ghost.id()));
    }

    #[tokio::test]
    async fn invalid_edit_is_rejected() {
        let post = post_by("owner", "Before");
        let handler =
            UpdatePostHandler::new(Arc::new(MockPostRepository::new().with_post(post.clone())));

        let err = handler.handle(command(&post, "owner", "")).await.unwrap_err();
        assert!(matches!(err, PostError::ValidationFailed { .. }));
    }
}
