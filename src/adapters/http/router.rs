//! Top-level router assembly.
//!
//! ```text
//! GET    /                    home
//! GET    /posts               list posts
//! GET    /posts/:id           get post
//! GET    /ws                  live post feed (no auth)
//! GET    /api/v1/me           ┐
//! POST   /api/v1/posts        │ Bearer token required
//! PUT    /api/v1/posts/:id    │
//! DELETE /api/v1/posts/:id    ┘
//! ```

use axum::{http::HeaderValue, middleware, routing::get, Router};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::adapters::websocket::{websocket_router, Hub, WebSocketState};

use super::home::{home, me};
use super::middleware::{auth_middleware, AuthState};
use super::post::{protected_post_routes, public_post_routes, PostHandlers};

/// Everything the HTTP surface needs.
#[derive(Clone)]
pub struct AppState {
    pub posts: PostHandlers,
    pub validator: AuthState,
    pub hub: Hub,
}

/// Build the full application router.
///
/// An empty `cors_origins` allows any origin.
pub fn app_router(state: AppState, cors_origins: &[String]) -> Router {
    let api = Router::new()
        .route("/me", get(me))
        .merge(protected_post_routes(state.posts.clone()))
        .layer(middleware::from_fn_with_state(
            state.validator.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/", get(home))
        .merge(public_post_routes(state.posts))
        .merge(websocket_router().with_state(WebSocketState::new(state.hub)))
        .nest("/api/v1", api)
        .layer(cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(parsed))
}

