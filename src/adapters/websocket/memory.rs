//! In-process connection adapter.
//!
//! `MemoryConnection::pair` returns the server-side connection plus a
//! `MemoryPeer` that plays the remote client. The server → peer wire is
//! bounded, so a peer that stops reading eventually stalls the session's
//! write path exactly like a slow TCP client would.
//!
//! # Example
//!
//! ```ignore
//! let (connection, mut peer) = MemoryConnection::pair(16);
//! hub.connect(connection).await;
//! let greeting = peer.recv().await;
//! ```

use async_trait::async_trait;
use tokio::sync::{mpsc, watch};

use super::connection::{Connection, ConnectionError, ConnectionReceiver, ConnectionSender};

/// Server side of an in-memory connection.
pub struct MemoryConnection {
    outgoing: mpsc::Sender<String>,
    incoming: mpsc::Receiver<Result<Vec<u8>, ConnectionError>>,
    closed: watch::Sender<bool>,
}

/// Client side of an in-memory connection.
pub struct MemoryPeer {
    frames: mpsc::Receiver<String>,
    inbound: Option<mpsc::Sender<Result<Vec<u8>, ConnectionError>>>,
    closed: watch::Receiver<bool>,
}

impl MemoryConnection {
    /// Create a connected pair. `wire_capacity` bounds unread server frames.
    pub fn pair(wire_capacity: usize) -> (MemoryConnection, MemoryPeer) {
        let (out_tx, out_rx) = mpsc::channel(wire_capacity.max(1));
        let (in_tx, in_rx) = mpsc::channel(16);
        let (closed_tx, closed_rx) = watch::channel(false);

        (
            MemoryConnection {
                outgoing: out_tx,
                incoming: in_rx,
                closed: closed_tx,
            },
            MemoryPeer {
                frames: out_rx,
                inbound: Some(in_tx),
                closed: closed_rx,
            },
        )
    }
}

impl Connection for MemoryConnection {
    type Sender = MemorySender;
    type Receiver = MemoryReceiver;

    fn split(self) -> (Self::Sender, Self::Receiver) {
        (
            MemorySender {
                outgoing: Some(self.outgoing),
                closed: self.closed,
            },
            MemoryReceiver {
                incoming: self.incoming,
            },
        )
    }
}

pub struct MemorySender {
    outgoing: Option<mpsc::Sender<String>>,
    closed: watch::Sender<bool>,
}

#[async_trait]
impl ConnectionSender for MemorySender {
    async fn send(&mut self, text: &str) -> Result<(), ConnectionError> {
        let outgoing = self.outgoing.as_ref().ok_or(ConnectionError::Closed)?;
        outgoing
            .send(text.to_owned())
            .await
            .map_err(|_| ConnectionError::Transport("peer went away".to_string()))
    }

    async fn close(&mut self) -> Result<(), ConnectionError> {
        self.outgoing = None;
        self.closed.send_replace(true);
        Ok(())
    }
}

pub struct MemoryReceiver {
    incoming: mpsc::Receiver<Result<Vec<u8>, ConnectionError>>,
}

#[async_trait]
impl ConnectionReceiver for MemoryReceiver {
    async fn receive(&mut self) -> Result<Option<Vec<u8>>, ConnectionError> {
        match self.incoming.recv().await {
            Some(Ok(frame)) => Ok(Some(frame)),
            Some(Err(e)) => Err(e),
            None => Ok(None),
        }
    }
}

impl MemoryPeer {
    /// Next frame sent by the server, or `None` once the server side is gone.
    pub async fn recv(&mut self) -> Option<String> {
        self.frames.recv().await
    }

    /// Next frame if one is already buffered.
    pub fn try_recv(&mut self) -> Option<String> {
        self.frames.try_recv().ok()
    }

    /// Send a data frame to the server.
    pub async fn send(&self, frame: impl Into<Vec<u8>>) -> Result<(), ConnectionError> {
        let inbound = self.inbound.as_ref().ok_or(ConnectionError::Closed)?;
        inbound
            .send(Ok(frame.into()))
            .await
            .map_err(|_| ConnectionError::Closed)
    }

    /// Make the server's next read fail with a transport error.
    pub async fn fail(&self, reason: &str) {
        if let Some(inbound) = &self.inbound {
            let _ = inbound
                .send(Err(ConnectionError::Transport(reason.to_string())))
                .await;
        }
    }

    /// Close the client side; the server reads end-of-stream.
    pub fn close(&mut self) {
        self.inbound = None;
    }

    /// True once the server explicitly closed or dropped its sending half.
    pub fn is_closed(&self) -> bool {
        *self.closed.borrow() || self.closed.has_changed().is_err()
    }

    /// Wait until the server side closes.
    pub async fn wait_closed(&mut self) {
        loop {
            if *self.closed.borrow_and_update() {
                return;
            }
            if self.closed.changed().await.is_err() {
                return;
            }
        }
    }
}
