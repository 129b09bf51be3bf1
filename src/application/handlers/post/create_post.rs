//! CreatePostHandler - Command handler for creating posts.
//!
//! This is where posts enter the real-time feed: once a post is stored, a
//! `post_created` event goes to every connected client.

use std::sync::Arc;

use crate::domain::foundation::{PostId, UserId};
use crate::domain::post::{Post, PostCreated, PostError};
use crate::ports::{EventBroadcaster, PostRepository};

/// Command to create a new post.
#[derive(Debug, Clone)]
pub struct CreatePostCommand {
    pub user_id: UserId,
    pub title: String,
    pub content: String,
}

/// Handler for creating posts.
pub struct CreatePostHandler {
    repository: Arc<dyn PostRepository>,
    broadcaster: Arc<dyn EventBroadcaster>,
}

impl CreatePostHandler {
    pub fn new(
        repository: Arc<dyn PostRepository>,
        broadcaster: Arc<dyn EventBroadcaster>,
    ) -> Self {
        Self {
            repository,
            broadcaster,
        }
    }

    pub async fn handle(&self, cmd: CreatePostCommand) -> Result<Post, PostError> {
        // 1. Build aggregate (validates title and content)
        let post = Post::new(PostId::new(), cmd.user_id, cmd.title, cmd.content)?;

        // 2. Persist; nothing is broadcast if this fails
        self.repository.insert(&post).await?;

        // 3. Notify connected clients
        let event = PostCreated::from_post(&post);
        tracing::debug!(post_id = %post.id(), "broadcasting post_created");
        self.broadcaster.broadcast(event.to_broadcast()).await;

        Ok(post)
    }
}
