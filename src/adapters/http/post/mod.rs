//! HTTP adapter for post endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    CreatePostRequest, ListPostsParams, PostListResponse, PostResponse, UpdatePostRequest,
};
pub use handlers::PostHandlers;
pub use routes::{protected_post_routes, public_post_routes};
