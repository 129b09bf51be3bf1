//! Post domain events.

use serde::Serialize;

use crate::domain::foundation::{BroadcastEvent, EventKind, PostId, Timestamp, UserId};

use super::Post;

/// Published after a new post has been persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostCreated {
    pub post_id: PostId,
    pub user_id: UserId,
    pub title: String,
    pub created_at: Timestamp,
}

impl PostCreated {
    pub fn from_post(post: &Post) -> Self {
        Self {
            post_id: *post.id(),
            user_id: post.user_id().clone(),
            title: post.title().to_string(),
            created_at: *post.created_at(),
        }
    }

    /// Builds the live notification for connected clients.
    pub fn to_broadcast(&self) -> BroadcastEvent {
        let data = serde_json::json!({
            "post_id": self.post_id,
            "user_id": self.user_id,
            "title": self.title,
            "created_at": self.created_at,
        });
        BroadcastEvent {
            kind: EventKind::PostCreated,
            data,
            occurred_at: self.created_at,
        }
    }
}
