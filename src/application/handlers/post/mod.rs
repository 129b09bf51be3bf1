//! Post command and query handlers.

mod create_post;
mod delete_post;
mod get_post;
mod list_posts;
mod update_post;

#[cfg(test)]
pub(crate) mod test_support;

pub use create_post::{CreatePostCommand, CreatePostHandler};
pub use delete_post::{DeletePostCommand, DeletePostHandler};
pub use get_post::{GetPostHandler, GetPostQuery};
pub use list_posts::{ListPostsHandler, ListPostsQuery, DEFAULT_PER_PAGE, MAX_PER_PAGE};
pub use update_post::{UpdatePostCommand, UpdatePostHandler};
