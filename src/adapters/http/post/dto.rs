//! Request and response types for post endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::post::Post;
use crate::ports::PostPage;

// ════════════════════════════════════════════════════════════════════════════
// Requests
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdatePostRequest {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListPostsParams {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

// ════════════════════════════════════════════════════════════════════════════
// Responses
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub content: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Post> for PostResponse {
    fn from(post: &Post) -> Self {
        Self {
            id: post.id().to_string(),
            user_id: post.user_id().to_string(),
            title: post.title().to_string(),
            content: post.content().to_string(),
            created_at: post.created_at().to_rfc3339(),
            updated_at: post.updated_at().to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostListResponse {
    pub items: Vec<PostResponse>,
    pub page: u32,
    pub per_page: u32,
    pub total: u64,
}

impl PostListResponse {
    pub fn new(page: PostPage, page_number: u32, per_page: u32) -> Self {
        Self {
            items: page.items.iter().map(PostResponse::from).collect(),
            page: page_number,
            per_page,
            total: page.total,
        }
    }
}
