//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `auth` - Token validation (HS256 JWT, mock)
//! - `http` - REST endpoints and router
//! - `memory` - In-process post storage
//! - `websocket` - Live post feed (hub, sessions, connections)

pub mod auth;
pub mod http;
pub mod memory;
pub mod websocket;
