//! Broadcast hub: registry of live sessions and fan-out of broadcast events.
//!
//! A single dispatch loop owns the set of live sessions. Every change to it
//! arrives as a [`HubCommand`] on one bounded channel and is applied in
//! arrival order, so registration, unregistration and broadcast never race
//! and no lock guards the set.
//!
//! # Backpressure
//!
//! Fan-out uses `try_send` on each session's bounded queue. A session whose
//! queue is full is evicted on the spot: it is removed from the live set and
//! its handle dropped, which closes the queue and tells the session to close
//! its connection. One slow client never delays the others.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::future::join_all;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, oneshot, watch};

use crate::config::HubConfig;
use crate::domain::foundation::BroadcastEvent;
use crate::ports::EventBroadcaster;

use super::connection::Connection;
use super::messages::ServerMessage;
use super::session::{ClientId, ClientSession, SessionHandle, SessionState};

/// Commands processed by the dispatch loop.
pub(crate) enum HubCommand {
    Register(SessionHandle),
    Unregister(ClientId),
    Broadcast(BroadcastEvent),
    Snapshot(oneshot::Sender<Vec<ClientId>>),
    Shutdown,
}

/// Cloneable handle to the hub.
///
/// Created once at startup and passed to everything that needs it (the
/// upgrade endpoint and the post handlers).
#[derive(Clone)]
pub struct Hub {
    commands: mpsc::Sender<HubCommand>,
    stopped: watch::Receiver<bool>,
    session_queue_capacity: usize,
    close_timeout: Duration,
}

impl Hub {
    /// Spawn the dispatch loop and return a handle to it.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(config: HubConfig) -> Self {
        let (commands_tx, commands_rx) = mpsc::channel(config.command_queue_capacity.max(1));
        let (stopped_tx, stopped_rx) = watch::channel(false);

        let dispatcher = Dispatcher {
            sessions: HashMap::new(),
            commands: commands_rx,
            stopped: stopped_tx,
        };
        tokio::spawn(dispatcher.run());

        tracing::info!(
            session_queue_capacity = config.session_queue_capacity,
            command_queue_capacity = config.command_queue_capacity,
            "broadcast hub started"
        );

        Self {
            commands: commands_tx,
            stopped: stopped_rx,
            session_queue_capacity: config.session_queue_capacity.max(1),
            close_timeout: config.close_timeout(),
        }
    }

    /// Admit a session into the live set.
    ///
    /// Fire-and-forget. If the hub is shutting down the handle is dropped,
    /// which tells the session to close.
    pub async fn register(&self, handle: SessionHandle) {
        if let Err(mpsc::error::SendError(command)) =
            self.commands.send(HubCommand::Register(handle)).await
        {
            if let HubCommand::Register(handle) = command {
                tracing::debug!(client_id = %handle.id(), "hub stopped, rejecting session");
            }
        }
    }

    /// Remove a session from the live set. Unknown ids are ignored.
    pub async fn unregister(&self, id: &ClientId) {
        if self
            .commands
            .send(HubCommand::Unregister(id.clone()))
            .await
            .is_err()
        {
            tracing::trace!(client_id = %id, "hub stopped, unregister skipped");
        }
    }

    /// Queue an event for every session live when it is dispatched.
    ///
    /// Returns once the event is queued; delivery happens asynchronously.
    pub async fn broadcast(&self, event: BroadcastEvent) {
        let kind = event.kind;
        if self
            .commands
            .send(HubCommand::Broadcast(event))
            .await
            .is_err()
        {
            tracing::debug!(kind = %kind, "hub stopped, dropping broadcast");
        }
    }

    /// Wrap an accepted connection in a session, register it and run it.
    pub async fn connect<C: Connection>(&self, connection: C) -> ClientId {
        let (session, handle) = ClientSession::new(
            connection,
            self.clone(),
            self.session_queue_capacity,
            self.close_timeout,
        );
        let id = session.id().clone();

        self.register(handle).await;
        tokio::spawn(session.run());

        id
    }

    /// Ids of the currently live sessions. Empty once the hub has stopped.
    pub async fn live_sessions(&self) -> Vec<ClientId> {
        let (reply_tx, reply_rx) = oneshot::channel();
        if self
            .commands
            .send(HubCommand::Snapshot(reply_tx))
            .await
            .is_err()
        {
            return Vec::new();
        }
        reply_rx.await.unwrap_or_default()
    }

    pub async fn live_count(&self) -> usize {
        self.live_sessions().await.len()
    }

    /// Stop accepting sessions, release every live one and wait for all of
    /// them to finish. Safe to call more than once.
    pub async fn shutdown(&self) {
        let _ = self.commands.send(HubCommand::Shutdown).await;

        let mut stopped = self.stopped.clone();
        loop {
            if *stopped.borrow_and_update() {
                return;
            }
            if stopped.changed().await.is_err() {
                return;
            }
        }
    }

    /// True once the dispatch loop has finished shutting down.
    pub fn is_stopped(&self) -> bool {
        *self.stopped.borrow()
    }
}

#[async_trait]
impl EventBroadcaster for Hub {
    async fn broadcast(&self, event: BroadcastEvent) {
        Hub::broadcast(self, event).await
    }
}

/// Sole owner of the live-session set.
struct Dispatcher {
    sessions: HashMap<ClientId, SessionHandle>,
    commands: mpsc::Receiver<HubCommand>,
    stopped: watch::Sender<bool>,
}

impl Dispatcher {
    async fn run(mut self) {
        while let Some(command) = self.commands.recv().await {
            match command {
                HubCommand::Register(handle) => self.register(handle),
                HubCommand::Unregister(id) => self.unregister(&id),
                HubCommand::Broadcast(event) => self.broadcast(event),
                HubCommand::Snapshot(reply) => {
                    let _ = reply.send(self.sessions.keys().cloned().collect());
                }
                HubCommand::Shutdown => break,
            }
        }

        self.drain().await;
    }

    fn register(&mut self, handle: SessionHandle) {
        let id = handle.id().clone();
        self.sessions.insert(id.clone(), handle);
        tracing::debug!(
            client_id = %id,
            state = SessionState::Registered.as_str(),
            live = self.sessions.len(),
            "session registered"
        );
    }

    fn unregister(&mut self, id: &ClientId) {
        // Dropping the handle closes the queue and releases the session.
        if self.sessions.remove(id).is_some() {
            tracing::debug!(client_id = %id, live = self.sessions.len(), "session unregistered");
        }
    }

    fn broadcast(&mut self, event: BroadcastEvent) {
        let frame: Arc<str> = match ServerMessage::from_event(&event).to_json() {
            Ok(json) => json.into(),
            Err(e) => {
                tracing::warn!(kind = %event.kind, error = %e, "failed to serialize event");
                return;
            }
        };

        let mut evicted = Vec::new();
        let mut closed = Vec::new();
        let mut recipients = 0usize;
        for (id, handle) in &self.sessions {
            match handle.outbound().try_send(Arc::clone(&frame)) {
                Ok(()) => recipients += 1,
                Err(TrySendError::Full(_)) => {
                    tracing::warn!(client_id = %id, kind = %event.kind, "outbound queue full, disconnecting slow client");
                    evicted.push(id.clone());
                }
                Err(TrySendError::Closed(_)) => closed.push(id.clone()),
            }
        }
        for id in &evicted {
            if let Some(handle) = self.sessions.remove(id) {
                drop(handle.evict());
            }
        }
        for id in &closed {
            self.sessions.remove(id);
        }

        tracing::debug!(
            kind = %event.kind,
            recipients,
            evicted = evicted.len(),
            "broadcast dispatched"
        );
    }

    /// Release everything and wait for the sessions to finish.
    async fn drain(mut self) {
        self.commands.close();

        let mut pending: Vec<_> = self
            .sessions
            .drain()
            .map(|(_, handle)| handle.release())
            .collect();

        // Commands that were already queued when shutdown arrived.
        while let Some(command) = self.commands.recv().await {
            match command {
                HubCommand::Register(handle) => {
                    tracing::debug!(client_id = %handle.id(), "hub stopping, rejecting session");
                    pending.push(handle.release());
                }
                HubCommand::Snapshot(reply) => {
                    let _ = reply.send(Vec::new());
                }
                HubCommand::Unregister(_) | HubCommand::Broadcast(_) | HubCommand::Shutdown => {}
            }
        }

        let released = pending.len();
        join_all(pending).await;

        tracing::info!(released, "broadcast hub stopped");
        let _ = self.stopped.send(true);
    }
}

#[cfg(test)]
impl Hub {
    /// Poll until `id` leaves the live set; false if it never does.
    pub(crate) async fn wait_until_absent(&self, id: &ClientId) -> bool {
        for _ in 0..200 {
            if !self.live_sessions().await.contains(id) {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::websocket::session::test_support::{detached, DetachedSession};
    use crate::adapters::websocket::session::ReleaseReason;
    use crate::domain::foundation::EventKind;
    use serde_json::{json, Value};

    fn post_created(id: u32) -> BroadcastEvent {
        BroadcastEvent::new(EventKind::PostCreated, json!({ "post_id": id }))
    }

    fn post_id_of(frame: &str) -> u64 {
        let value: Value = serde_json::from_str(frame).unwrap();
        assert_eq!(value["kind"], "post_created");
        value["post_id"].as_u64().unwrap()
    }

    async fn attach(hub: &Hub, capacity: usize) -> (ClientId, DetachedSession) {
        let (handle, session) = detached(capacity);
        let id = handle.id().clone();
        hub.register(handle).await;
        (id, session)
    }

    #[tokio::test]
    async fn registered_session_is_live() {
        let hub = Hub::start(HubConfig::default());
        let (id, _session) = attach(&hub, 4).await;

        assert_eq!(hub.live_sessions().await, vec![id]);
    }

    #[tokio::test]
    async fn broadcast_reaches_every_live_session_once() {
        let hub = Hub::start(HubConfig::default());
        let (_a, mut a) = attach(&hub, 4).await;
        let (_b, mut b) = attach(&hub, 4).await;

        hub.broadcast(post_created(1)).await;
        hub.live_count().await; // barrier: broadcast has been dispatched

        assert_eq!(post_id_of(&a.outbound.try_recv().unwrap()), 1);
        assert_eq!(post_id_of(&b.outbound.try_recv().unwrap()), 1);
        assert!(a.outbound.try_recv().is_err());
        assert!(b.outbound.try_recv().is_err());
    }

    #[tokio::test]
    async fn late_registration_sees_no_earlier_broadcast() {
        let hub = Hub::start(HubConfig::default());
        hub.broadcast(post_created(1)).await;
        let (_late, mut late) = attach(&hub, 4).await;
        hub.broadcast(post_created(2)).await;
        hub.live_count().await;

        assert_eq!(post_id_of(&late.outbound.try_recv().unwrap()), 2);
        assert!(late.outbound.try_recv().is_err());
    }

    #[tokio::test]
    async fn unregister_releases_and_stops_delivery() {
        let hub = Hub::start(HubConfig::default());
        let (a_id, mut a) = attach(&hub, 4).await;
        let (_b_id, mut b) = attach(&hub, 4).await;

        hub.unregister(&a_id).await;
        hub.broadcast(post_created(2)).await;
        hub.live_count().await;

        assert!((&mut a.released).await.is_err());
        assert!(a.outbound.recv().await.is_none());
        assert_eq!(post_id_of(&b.outbound.try_recv().unwrap()), 2);
    }

    #[tokio::test]
    async fn unregister_twice_is_harmless() {
        let hub = Hub::start(HubConfig::default());
        let (id, _session) = attach(&hub, 4).await;
        let (other, _other_session) = attach(&hub, 4).await;

        hub.unregister(&id).await;
        hub.unregister(&id).await;
        hub.unregister(&ClientId::new()).await;

        assert_eq!(hub.live_sessions().await, vec![other]);
    }

    #[tokio::test]
    async fn full_queue_evicts_only_the_slow_session() {
        let hub = Hub::start(HubConfig::default());
        let (slow_id, mut slow) = attach(&hub, 1).await;
        let (fast_id, mut fast) = attach(&hub, 8).await;

        hub.broadcast(post_created(1)).await; // fills the slow queue
        hub.broadcast(post_created(2)).await; // overflows it

        assert_eq!(hub.live_sessions().await, vec![fast_id]);
        assert!(!hub.live_sessions().await.contains(&slow_id));
        assert_eq!((&mut slow.released).await, Ok(ReleaseReason::Evicted));

        assert_eq!(post_id_of(&fast.outbound.try_recv().unwrap()), 1);
        assert_eq!(post_id_of(&fast.outbound.try_recv().unwrap()), 2);
    }

    #[tokio::test]
    async fn broadcasts_keep_their_order() {
        let hub = Hub::start(HubConfig::default());
        let (_id, mut session) = attach(&hub, 16).await;

        for n in 1..=10 {
            hub.broadcast(post_created(n)).await;
        }
        hub.live_count().await;

        let received: Vec<u64> = (0..10)
            .map(|_| post_id_of(&session.outbound.try_recv().unwrap()))
            .collect();
        assert_eq!(received, (1..=10).collect::<Vec<u64>>());
    }

    #[tokio::test]
    async fn shutdown_waits_for_sessions_to_finish() {
        let hub = Hub::start(HubConfig::default());
        let (_id, mut session) = attach(&hub, 4).await;
        let finished = session.finished.take().unwrap();

        let shutdown = tokio::spawn({
            let hub = hub.clone();
            async move { hub.shutdown().await }
        });

        assert!((&mut session.released).await.is_err());
        tokio::task::yield_now().await;
        assert!(!shutdown.is_finished());

        drop(finished);
        shutdown.await.unwrap();
        assert!(hub.is_stopped());
        assert_eq!(hub.live_count().await, 0);
    }

    #[tokio::test]
    async fn register_after_shutdown_releases_immediately() {
        let hub = Hub::start(HubConfig::default());
        hub.shutdown().await;

        let (_id, mut session) = attach(&hub, 4).await;

        assert!((&mut session.released).await.is_err());
        assert!(session.outbound.recv().await.is_none());
        hub.broadcast(post_created(1)).await;
        hub.shutdown().await;
    }
}
