//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `PostRepository` - Post persistence
//! - `EventBroadcaster` - Live fan-out of broadcast events (implemented by the WebSocket hub)
//! - `SessionValidator` - Access token validation for the protected API

mod event_broadcaster;
mod post_repository;
mod session_validator;

pub use event_broadcaster::EventBroadcaster;
pub use post_repository::{PostPage, PostRepository};
pub use session_validator::SessionValidator;
