//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod post;

pub use post::{
    CreatePostCommand, CreatePostHandler, DeletePostCommand, DeletePostHandler, GetPostHandler,
    GetPostQuery, ListPostsHandler, ListPostsQuery, UpdatePostCommand, UpdatePostHandler,
};
