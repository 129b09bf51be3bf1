//! Post domain module.
//!
//! Blog posts and the notification emitted when one is created.
//!
//! # Events
//!
//! - `PostCreated` - Published after a new post is persisted; fanned out live

mod aggregate;
mod errors;
mod events;

pub use aggregate::{Post, MAX_CONTENT_LEN, MAX_TITLE_LEN};
pub use errors::PostError;
pub use events::PostCreated;
