//! HTTP adapters - REST API implementations.

pub mod error;
pub mod home;
pub mod middleware;
pub mod post;
pub mod router;

pub use error::ErrorResponse;
pub use post::PostHandlers;
pub use router::{app_router, AppState};
