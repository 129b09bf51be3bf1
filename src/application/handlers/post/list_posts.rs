//! ListPostsHandler - Query handler for paginated listing.

use std::sync::Arc;

use crate::domain::post::PostError;
use crate::ports::{PostPage, PostRepository};

pub const DEFAULT_PER_PAGE: u32 = 20;
pub const MAX_PER_PAGE: u32 = 100;

/// Listing query. Missing values fall back to page 1 and [`DEFAULT_PER_PAGE`].
#[derive(Debug, Clone, Default)]
pub struct ListPostsQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl ListPostsQuery {
    /// Effective `(page, per_page)`: page is at least 1, per_page is within `1..=MAX_PER_PAGE`.
    pub fn normalized(&self) -> (u32, u32) {
        let page = self.page.unwrap_or(1).max(1);
        let per_page = self
            .per_page
            .unwrap_or(DEFAULT_PER_PAGE)
            .clamp(1, MAX_PER_PAGE);
        (page, per_page)
    }
}

pub struct ListPostsHandler {
    repository: Arc<dyn PostRepository>,
}

impl ListPostsHandler {
    pub fn new(repository: Arc<dyn PostRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, query: ListPostsQuery) -> Result<PostPage, PostError> {
        let (page, per_page) = query.normalized();
        Ok(self.repository.list(page, per_page).await?)
    }
}
