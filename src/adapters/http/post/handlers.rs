//! HTTP handlers for post endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::middleware::RequireAuth;
use crate::adapters::http::ErrorResponse;
use crate::application::handlers::post::{
    CreatePostCommand, CreatePostHandler, DeletePostCommand, DeletePostHandler, GetPostHandler,
    GetPostQuery, ListPostsHandler, ListPostsQuery, UpdatePostCommand, UpdatePostHandler,
};
use crate::domain::foundation::PostId;
use crate::domain::post::PostError;

use super::dto::{
    CreatePostRequest, ListPostsParams, PostListResponse, PostResponse, UpdatePostRequest,
};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct PostHandlers {
    create_handler: Arc<CreatePostHandler>,
    get_handler: Arc<GetPostHandler>,
    list_handler: Arc<ListPostsHandler>,
    update_handler: Arc<UpdatePostHandler>,
    delete_handler: Arc<DeletePostHandler>,
}

impl PostHandlers {
    pub fn new(
        create_handler: Arc<CreatePostHandler>,
        get_handler: Arc<GetPostHandler>,
        list_handler: Arc<ListPostsHandler>,
        update_handler: Arc<UpdatePostHandler>,
        delete_handler: Arc<DeletePostHandler>,
    ) -> Self {
        Self {
            create_handler,
            get_handler,
            list_handler,
            update_handler,
            delete_handler,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/v1/posts - Create a post and notify live clients
pub async fn create_post(
    State(handlers): State<PostHandlers>,
    RequireAuth(user): RequireAuth,
    Json(req): Json<CreatePostRequest>,
) -> Response {
    let cmd = CreatePostCommand {
        user_id: user.id,
        title: req.title,
        content: req.content,
    };

    match handlers.create_handler.handle(cmd).await {
        Ok(post) => (StatusCode::CREATED, Json(PostResponse::from(&post))).into_response(),
        Err(e) => handle_post_error(e),
    }
}

/// GET /posts/:id - Get a single post
pub async fn get_post(
    State(handlers): State<PostHandlers>,
    Path(post_id): Path<String>,
) -> Response {
    let post_id = match parse_post_id(&post_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match handlers.get_handler.handle(GetPostQuery { post_id }).await {
        Ok(post) => (StatusCode::OK, Json(PostResponse::from(&post))).into_response(),
        Err(e) => handle_post_error(e),
    }
}

/// GET /posts - List posts, newest first
pub async fn list_posts(
    State(handlers): State<PostHandlers>,
    Query(params): Query<ListPostsParams>,
) -> Response {
    let query = ListPostsQuery {
        page: params.page,
        per_page: params.per_page,
    };
    let (page, per_page) = query.normalized();

    match handlers.list_handler.handle(query).await {
        Ok(result) => (
            StatusCode::OK,
            Json(PostListResponse::new(result, page, per_page)),
        )
            .into_response(),
        Err(e) => handle_post_error(e),
    }
}

/// PUT /api/v1/posts/:id - Replace title and content (owner only)
pub async fn update_post(
    State(handlers): State<PostHandlers>,
    RequireAuth(user): RequireAuth,
    Path(post_id): Path<String>,
    Json(req): Json<UpdatePostRequest>,
) -> Response {
    let post_id = match parse_post_id(&post_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let cmd = UpdatePostCommand {
        post_id,
        user_id: user.id,
        title: req.title,
        content: req.content,
    };

    match handlers.update_handler.handle(cmd).await {
        Ok(post) => (StatusCode::OK, Json(PostResponse::from(&post))).into_response(),
        Err(e) => handle_post_error(e),
    }
}

/// DELETE /api/v1/posts/:id - Delete a post (owner only)
pub async fn delete_post(
    State(handlers): State<PostHandlers>,
    RequireAuth(user): RequireAuth,
    Path(post_id): Path<String>,
) -> Response {
    let post_id = match parse_post_id(&post_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let cmd = DeletePostCommand {
        post_id,
        user_id: user.id,
    };

    match handlers.delete_handler.handle(cmd).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => handle_post_error(e),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Error handling
// ════════════════════════════════════════════════════════════════════════════

fn parse_post_id(raw: &str) -> Result<PostId, Response> {
    raw.parse::<PostId>().map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request("Invalid post ID")),
        )
            .into_response()
    })
}

fn handle_post_error(error: PostError) -> Response {
    let status = match &error {
        PostError::NotFound(_) => StatusCode::NOT_FOUND,
        PostError::Forbidden => StatusCode::FORBIDDEN,
        PostError::ValidationFailed { .. } => StatusCode::BAD_REQUEST,
        PostError::Infrastructure(msg) => {
            tracing::error!(error = %msg, "post operation failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (status, Json(ErrorResponse::new(error.code(), error.message()))).into_response()
}
