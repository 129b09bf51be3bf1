//! WebSocket upgrade endpoint for the live post feed.
//!
//! `GET /ws` upgrades the request and hands the socket to the hub. The
//! endpoint sits outside the authenticated `/api/v1` group, so anyone may
//! subscribe to post notifications.

use axum::{
    extract::{ws::WebSocketUpgrade, State},
    response::Response,
    routing::get,
    Router,
};

use super::connection::WebSocketConnection;
use super::hub::Hub;

/// State required for WebSocket handling.
#[derive(Clone)]
pub struct WebSocketState {
    pub hub: Hub,
}

impl WebSocketState {
    pub fn new(hub: Hub) -> Self {
        Self { hub }
    }
}

/// Handle WebSocket upgrade requests.
///
/// Route: `GET /ws`
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<WebSocketState>) -> Response {
    ws.on_upgrade(move |socket| async move {
        let client_id = state.hub.connect(WebSocketConnection::new(socket)).await;
        tracing::info!(client_id = %client_id, "websocket client connected");
    })
}

/// Create axum router for the WebSocket endpoint.
pub fn websocket_router() -> Router<WebSocketState> {
    Router::new().route("/ws", get(ws_handler))
}
