//! Connection adapter seam between the hub and a bidirectional transport.
//!
//! A connection is split once into a sending half (owned by the session's
//! write path) and a receiving half (owned by its read path). Framing
//! details such as ping/pong and text vs. binary stay inside the adapter.

use async_trait::async_trait;
use axum::extract::ws::{Message, WebSocket};
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use thiserror::Error;

/// Errors surfaced by a connection adapter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectionError {
    /// The connection is already closed.
    #[error("Connection closed")]
    Closed,

    /// The underlying transport failed.
    #[error("Transport error: {0}")]
    Transport(String),
}

/// Sending half of a connection.
#[async_trait]
pub trait ConnectionSender: Send + 'static {
    /// Send one text frame.
    async fn send(&mut self, text: &str) -> Result<(), ConnectionError>;

    /// Close the connection. Closing twice is not an error.
    async fn close(&mut self) -> Result<(), ConnectionError>;
}

/// Receiving half of a connection.
#[async_trait]
pub trait ConnectionReceiver: Send + 'static {
    /// Wait for the next data frame.
    ///
    /// Returns `Ok(None)` once the peer has closed the connection.
    async fn receive(&mut self) -> Result<Option<Vec<u8>>, ConnectionError>;
}

/// One accepted bidirectional connection.
pub trait Connection: Send + 'static {
    type Sender: ConnectionSender;
    type Receiver: ConnectionReceiver;

    fn split(self) -> (Self::Sender, Self::Receiver);
}

// ============================================
// axum WebSocket
// ============================================

/// Connection adapter over an upgraded axum WebSocket.
pub struct WebSocketConnection {
    socket: WebSocket,
}

impl WebSocketConnection {
    pub fn new(socket: WebSocket) -> Self {
        Self { socket }
    }
}

impl Connection for WebSocketConnection {
    type Sender = WebSocketSender;
    type Receiver = WebSocketReceiver;

    fn split(self) -> (Self::Sender, Self::Receiver) {
        let (sink, stream) = self.socket.split();
        (
            WebSocketSender {
                sink,
                closed: false,
            },
            WebSocketReceiver { stream },
        )
    }
}

pub struct WebSocketSender {
    sink: SplitSink<WebSocket, Message>,
    closed: bool,
}

#[async_trait]
impl ConnectionSender for WebSocketSender {
    async fn send(&mut self, text: &str) -> Result<(), ConnectionError> {
        if self.closed {
            return Err(ConnectionError::Closed);
        }
        self.sink
            .send(Message::Text(text.to_owned()))
            .await
            .map_err(|e| ConnectionError::Transport(e.to_string()))
    }

    async fn close(&mut self) -> Result<(), ConnectionError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        // The close frame may fail if the peer is already gone; the sink
        // still needs closing either way.
        let frame = self.sink.send(Message::Close(None)).await;
        self.sink
            .close()
            .await
            .map_err(|e| ConnectionError::Transport(e.to_string()))?;
        frame.map_err(|e| ConnectionError::Transport(e.to_string()))
    }
}

pub struct WebSocketReceiver {
    stream: SplitStream<WebSocket>,
}

#[async_trait]
impl ConnectionReceiver for WebSocketReceiver {
    async fn receive(&mut self) -> Result<Option<Vec<u8>>, ConnectionError> {
        loop {
            match self.stream.next().await {
                None | Some(Ok(Message::Close(_))) => return Ok(None),
                Some(Ok(Message::Text(text))) => return Ok(Some(text.into_bytes())),
                Some(Ok(Message::Binary(bytes))) => return Ok(Some(bytes)),
                // Protocol ping/pong are answered by axum
                Some(Ok(Message::Ping(_))) | Some(Ok(Message::Pong(_))) => continue,
                Some(Err(e)) => return Err(ConnectionError::Transport(e.to_string())),
            }
        }
    }
}
