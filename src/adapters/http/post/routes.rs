//! HTTP routes for post endpoints.
//!
//! Reads are public; writes are mounted under `/api/v1` behind auth.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{create_post, delete_post, get_post, list_posts, update_post, PostHandlers};

/// `GET /posts`, `GET /posts/:id`
pub fn public_post_routes(handlers: PostHandlers) -> Router {
    Router::new()
        .route("/posts", get(list_posts))
        .route("/posts/:id", get(get_post))
        .with_state(handlers)
}

/// `POST /posts`, `PUT /posts/:id`, `DELETE /posts/:id`; nest under `/api/v1`.
pub fn protected_post_routes(handlers: PostHandlers) -> Router {
    Router::new()
        .route("/posts", post(create_post))
        .route("/posts/:id", axum::routing::put(update_post).delete(delete_post))
        .with_state(handlers)
}
