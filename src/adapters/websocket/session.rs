//! Per-connection client session.
//!
//! A session bridges one connection to the hub. It owns the connection and
//! the receiving end of a bounded outbound queue; the hub owns the matching
//! [`SessionHandle`]. Dropping the handle is how the hub releases a session:
//! the queue closes and the release signal fires. Queued frames still drain
//! before the connection closes. [`SessionHandle::evict`] instead tells the
//! session to discard its queue and drop the connection at once.
//!
//! ```text
//!            SessionHandle (hub side)             ClientSession (task)
//!   outbound ──────── mpsc (bounded) ────────▶ write path ──▶ wire
//!   release  ──────── oneshot ───────────────▶ supervisor
//!   finished ◀─────── oneshot ──────────────── supervisor
//!                                              read path  ◀── wire
//! ```
//!
//! Lifecycle: `Connecting → Registered → Active → Unregistering → Closed`.
//! A session is single-use; once closed it never becomes active again.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::timeout;
use uuid::Uuid;

use super::connection::{Connection, ConnectionError, ConnectionReceiver, ConnectionSender};
use super::hub::Hub;
use super::messages::ServerMessage;

/// Unique identifier for a client session.
///
/// Generated server-side when a client connects.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClientId(Uuid);

impl ClientId {
    /// Create a new random client ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ClientId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Session lifecycle states, used for logging transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Connecting,
    Registered,
    Active,
    Unregistering,
    Closed,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Connecting => "connecting",
            SessionState::Registered => "registered",
            SessionState::Active => "active",
            SessionState::Unregistering => "unregistering",
            SessionState::Closed => "closed",
        }
    }
}

/// Reason sent on the release signal. A dropped signal is a plain release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseReason {
    /// The outbound queue overflowed; pending frames are discarded.
    Evicted,
}

/// Hub-side half of a session.
///
/// Only the hub's dispatch loop holds it. Dropping it releases the session.
pub struct SessionHandle {
    id: ClientId,
    outbound: mpsc::Sender<Arc<str>>,
    release: oneshot::Sender<ReleaseReason>,
    finished: oneshot::Receiver<()>,
}

impl SessionHandle {
    pub fn id(&self) -> &ClientId {
        &self.id
    }

    pub(crate) fn outbound(&self) -> &mpsc::Sender<Arc<str>> {
        &self.outbound
    }

    /// Release the session, returning a receiver that resolves once the
    /// session task has fully stopped.
    pub(crate) fn release(self) -> oneshot::Receiver<()> {
        self.finished
    }

    /// Release a slow session: it drops its queue and connection without
    /// flushing.
    pub(crate) fn evict(self) -> oneshot::Receiver<()> {
        // Err means the session already stopped.
        let _ = self.release.send(ReleaseReason::Evicted);
        self.finished
    }
}

impl fmt::Debug for SessionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionHandle").field("id", &self.id).finish()
    }
}

/// Why a session stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEnd {
    /// Peer sent a close frame or the stream ended.
    PeerClosed,
    /// Reading from the connection failed.
    ReadFailed(ConnectionError),
    /// Writing to the connection failed.
    WriteFailed(ConnectionError),
    /// The hub released the session (unregistered or shutting down).
    Released,
    /// The hub evicted the session for falling behind.
    Evicted,
}

/// One connected peer.
pub struct ClientSession<C: Connection> {
    id: ClientId,
    connection: C,
    outbound: mpsc::Receiver<Arc<str>>,
    released: oneshot::Receiver<ReleaseReason>,
    finished: oneshot::Sender<()>,
    hub: Hub,
    close_timeout: Duration,
}

impl<C: Connection> ClientSession<C> {
    /// Create a session and the handle the hub registers.
    pub fn new(
        connection: C,
        hub: Hub,
        queue_capacity: usize,
        close_timeout: Duration,
    ) -> (Self, SessionHandle) {
        let id = ClientId::new();
        let (outbound_tx, outbound_rx) = mpsc::channel(queue_capacity.max(1));
        let (release_tx, release_rx) = oneshot::channel();
        let (finished_tx, finished_rx) = oneshot::channel();

        tracing::trace!(client_id = %id, state = SessionState::Connecting.as_str(), "session created");

        let session = Self {
            id: id.clone(),
            connection,
            outbound: outbound_rx,
            released: release_rx,
            finished: finished_tx,
            hub,
            close_timeout,
        };
        let handle = SessionHandle {
            id,
            outbound: outbound_tx,
            release: release_tx,
            finished: finished_rx,
        };
        (session, handle)
    }

    pub fn id(&self) -> &ClientId {
        &self.id
    }

    /// Run both paths until the session ends, then unregister.
    pub async fn run(self) -> SessionEnd {
        let ClientSession {
            id,
            connection,
            outbound,
            mut released,
            finished,
            hub,
            close_timeout,
        } = self;

        let (sender, receiver) = connection.split();
        tracing::debug!(client_id = %id, state = SessionState::Active.as_str(), "session active");

        let (stop_tx, stop_rx) = oneshot::channel::<()>();
        let mut write_task = tokio::spawn(write_path(
            id.clone(),
            sender,
            outbound,
            stop_rx,
            close_timeout,
        ));
        let mut read_task = tokio::spawn(read_path(id.clone(), receiver));

        let end = tokio::select! {
            result = &mut write_task => {
                read_task.abort();
                result.unwrap_or(SessionEnd::Released)
            }
            result = &mut read_task => {
                // Peer is gone: stop writing and close our side.
                drop(stop_tx);
                finish_writer(&id, &mut write_task, close_timeout).await;
                result.unwrap_or(SessionEnd::PeerClosed)
            }
            reason = &mut released => {
                read_task.abort();
                match reason {
                    Ok(ReleaseReason::Evicted) => {
                        // Both halves must be gone before the connection drops.
                        write_task.abort();
                        let _ = (&mut write_task).await;
                        let _ = (&mut read_task).await;
                        SessionEnd::Evicted
                    }
                    Err(_) => {
                        // Queued frames drain before the writer closes the connection.
                        finish_writer(&id, &mut write_task, close_timeout).await;
                        SessionEnd::Released
                    }
                }
            }
        };

        tracing::debug!(
            client_id = %id,
            state = SessionState::Unregistering.as_str(),
            reason = ?end,
            "session ending"
        );
        hub.unregister(&id).await;

        tracing::debug!(client_id = %id, state = SessionState::Closed.as_str(), "session closed");
        drop(finished);
        end
    }
}

/// Drain the outbound queue to the wire; closes the connection on the way out.
///
/// Stops when the queue closes (the hub let go) or `stop` resolves (the read
/// path ended).
async fn write_path<S: ConnectionSender>(
    id: ClientId,
    mut sender: S,
    mut outbound: mpsc::Receiver<Arc<str>>,
    mut stop: oneshot::Receiver<()>,
    close_timeout: Duration,
) -> SessionEnd {
    match ServerMessage::connected(&id).to_json() {
        Ok(greeting) => {
            if let Err(e) = sender.send(&greeting).await {
                tracing::debug!(client_id = %id, error = %e, "failed to send greeting");
                close_quietly(&id, &mut sender, close_timeout).await;
                return SessionEnd::WriteFailed(e);
            }
        }
        Err(e) => tracing::warn!(client_id = %id, error = %e, "failed to serialize greeting"),
    }

    loop {
        let frame = tokio::select! {
            frame = outbound.recv() => frame,
            _ = &mut stop => None,
        };
        let Some(frame) = frame else { break };

        if let Err(e) = sender.send(&frame).await {
            tracing::debug!(client_id = %id, error = %e, "send error, closing connection");
            close_quietly(&id, &mut sender, close_timeout).await;
            return SessionEnd::WriteFailed(e);
        }
    }

    close_quietly(&id, &mut sender, close_timeout).await;
    SessionEnd::Released
}

/// Give the write path `close_timeout` to finish, then abort it.
async fn finish_writer(
    id: &ClientId,
    write_task: &mut JoinHandle<SessionEnd>,
    close_timeout: Duration,
) {
    if timeout(close_timeout, &mut *write_task).await.is_err() {
        tracing::warn!(client_id = %id, "write path did not finish in time, aborting");
        write_task.abort();
    }
}

/// Drain inbound frames until the peer goes away. Content is ignored.
async fn read_path<R: ConnectionReceiver>(id: ClientId, mut receiver: R) -> SessionEnd {
    loop {
        match receiver.receive().await {
            Ok(Some(frame)) => {
                tracing::trace!(client_id = %id, bytes = frame.len(), "ignoring inbound frame");
            }
            Ok(None) => {
                tracing::debug!(client_id = %id, "client closed connection");
                return SessionEnd::PeerClosed;
            }
            Err(e) => {
                tracing::debug!(client_id = %id, error = %e, "receive error");
                return SessionEnd::ReadFailed(e);
            }
        }
    }
}

async fn close_quietly<S: ConnectionSender>(id: &ClientId, sender: &mut S, close_timeout: Duration) {
    match timeout(close_timeout, sender.close()).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => tracing::debug!(client_id = %id, error = %e, "close failed"),
        Err(_) => tracing::debug!(client_id = %id, "close timed out"),
    }
}
