//! WebSocket adapters for real-time post notifications.
//!
//! # Architecture
//!
//! ```text
//!  POST /api/v1/posts ──▶ CreatePostHandler ──▶ EventBroadcaster (Hub)
//!                                                     │ Broadcast
//!                                                     ▼
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                 Hub dispatch loop (single owner)                  │
//! │   Register / Unregister / Broadcast / Snapshot / Shutdown (FIFO)  │
//! │   live set: ClientId → SessionHandle                              │
//! └──────────────────────────────────────────────────────────────────┘
//!        │ try_send              │ try_send              │ try_send
//!        ▼                       ▼                       ▼
//!   ClientSession A         ClientSession B         ClientSession C
//!   write path ─▶ wire      write path ─▶ wire      write path ─▶ wire
//!   read path  ◀─ wire      read path  ◀─ wire      read path  ◀─ wire
//! ```
//!
//! # Components
//!
//! - [`connection`] - Connection adapter traits and the axum WebSocket adapter
//! - [`memory`] - In-process connection pair
//! - [`session`] - Per-connection read/write paths
//! - [`hub`] - Registry and dispatcher
//! - [`messages`] - Wire envelope
//! - [`handler`] - Axum upgrade endpoint

pub mod connection;
pub mod handler;
pub mod hub;
pub mod memory;
pub mod messages;
pub mod session;

pub use connection::{
    Connection, ConnectionError, ConnectionReceiver, ConnectionSender, WebSocketConnection,
};
pub use handler::{websocket_router, ws_handler, WebSocketState};
pub use hub::Hub;
pub use memory::{MemoryConnection, MemoryPeer};
pub use messages::{ConnectedMessage, EventMessage, ServerMessage};
pub use session::{ClientId, ClientSession, SessionEnd, SessionHandle, SessionState};
