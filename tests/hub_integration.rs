//! Integration tests for the broadcast hub.
//!
//! Clients are in-memory connection pairs, so every scenario runs the real
//! session read/write paths without a network.

use std::time::Duration;

use proptest::prelude::*;
use serde_json::{json, Value};
use tokio::time::timeout;

use rest_ws::adapters::websocket::{ClientId, Hub, MemoryConnection, MemoryPeer};
use rest_ws::config::HubConfig;
use rest_ws::domain::foundation::{BroadcastEvent, EventKind};

// =============================================================================
// Test Infrastructure
// =============================================================================

const WAIT: Duration = Duration::from_secs(2);

fn hub_with(session_queue_capacity: usize) -> Hub {
    Hub::start(HubConfig {
        session_queue_capacity,
        close_timeout_ms: 100,
        ..HubConfig::default()
    })
}

fn post_created(n: u64) -> BroadcastEvent {
    BroadcastEvent::new(EventKind::PostCreated, json!({ "post_id": n, "title": format!("post {}", n) }))
}

/// Connect a client and consume its greeting.
async fn join(hub: &Hub, wire_capacity: usize) -> (ClientId, MemoryPeer) {
    let (connection, mut peer) = MemoryConnection::pair(wire_capacity);
    let id = hub.connect(connection).await;
    let greeting = next_frame(&mut peer).await;
    assert_eq!(greeting["kind"], "connected");
    assert_eq!(greeting["client_id"], id.to_string());
    (id, peer)
}

async fn next_frame(peer: &mut MemoryPeer) -> Value {
    let frame = timeout(WAIT, peer.recv())
        .await
        .expect("timed out waiting for a frame")
        .expect("connection closed");
    serde_json::from_str(&frame).unwrap()
}

async fn next_post_id(peer: &mut MemoryPeer) -> u64 {
    let frame = next_frame(peer).await;
    assert_eq!(frame["kind"], "post_created");
    frame["post_id"].as_u64().unwrap()
}

async fn eventually_live(hub: &Hub, expected: usize) {
    for _ in 0..400 {
        if hub.live_count().await == expected {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("live count never reached {}", expected);
}

// =============================================================================
// Scenarios
// =============================================================================

#[tokio::test]
async fn two_clients_then_one_leaves() {
    let hub = hub_with(16);
    let (_a_id, mut a) = join(&hub, 16).await;
    let (b_id, mut b) = join(&hub, 16).await;
    assert_eq!(hub.live_count().await, 2);

    hub.broadcast(post_created(1)).await;
    assert_eq!(next_post_id(&mut a).await, 1);
    assert_eq!(next_post_id(&mut b).await, 1);

    b.close();
    eventually_live(&hub, 1).await;
    assert!(!hub.live_sessions().await.contains(&b_id));

    hub.broadcast(post_created(2)).await;
    assert_eq!(next_post_id(&mut a).await, 2);
}

#[tokio::test]
async fn unregister_then_overflow_scenario() {
    let hub = hub_with(2);
    let (a_id, mut a) = join(&hub, 1).await;
    let (b_id, mut b) = join(&hub, 1).await;

    hub.broadcast(post_created(1)).await;
    assert_eq!(next_post_id(&mut a).await, 1);
    assert_eq!(next_post_id(&mut b).await, 1);

    hub.unregister(&a_id).await;
    hub.broadcast(post_created(2)).await;
    assert_eq!(next_post_id(&mut b).await, 2);
    timeout(WAIT, a.wait_closed()).await.expect("A was never closed");
    assert!(a.try_recv().is_none());

    // B stops reading; its wire and queue fill and it gets cut off.
    for n in 3..=10 {
        hub.broadcast(post_created(n)).await;
    }
    timeout(WAIT, b.wait_closed()).await.expect("B was never closed");
    eventually_live(&hub, 0).await;
    assert!(!hub.live_sessions().await.contains(&b_id));
}

#[tokio::test]
async fn late_client_sees_only_later_events() {
    let hub = hub_with(16);
    let (_, mut early) = join(&hub, 16).await;

    hub.broadcast(post_created(1)).await;
    assert_eq!(next_post_id(&mut early).await, 1);

    let (_, mut late) = join(&hub, 16).await;
    hub.broadcast(post_created(2)).await;

    assert_eq!(next_post_id(&mut early).await, 2);
    assert_eq!(next_post_id(&mut late).await, 2);
    assert!(late.try_recv().is_none());
}

#[tokio::test]
async fn slow_client_is_dropped_without_stalling_others() {
    let hub = hub_with(4);
    let (_, mut reader) = join(&hub, 16).await;

    // One wire slot: the greeting fills it and the peer never reads again.
    let (connection, mut stalled) = MemoryConnection::pair(1);
    let stalled_id = hub.connect(connection).await;

    for n in 1..=12 {
        hub.broadcast(post_created(n)).await;
        assert_eq!(next_post_id(&mut reader).await, n);
    }

    timeout(WAIT, stalled.wait_closed())
        .await
        .expect("slow client was never closed");
    eventually_live(&hub, 1).await;
    assert!(!hub.live_sessions().await.contains(&stalled_id));
}

#[tokio::test]
async fn evicted_client_is_closed_without_waiting_out_the_close_timeout() {
    let hub = Hub::start(HubConfig {
        session_queue_capacity: 2,
        ..HubConfig::default()
    });

    let (connection, mut stalled) = MemoryConnection::pair(1);
    let stalled_id = hub.connect(connection).await;

    for n in 1..=10 {
        hub.broadcast(post_created(n)).await;
    }
    eventually_live(&hub, 0).await;
    assert!(!hub.live_sessions().await.contains(&stalled_id));

    timeout(Duration::from_secs(1), stalled.wait_closed())
        .await
        .expect("evicted client stayed open");
    assert!(stalled.is_closed());
}

#[tokio::test]
async fn inbound_chatter_does_not_disturb_delivery() {
    let hub = hub_with(16);
    let (_, mut peer) = join(&hub, 16).await;

    peer.send("ping?").await.unwrap();
    hub.broadcast(post_created(7)).await;

    assert_eq!(next_post_id(&mut peer).await, 7);
    assert_eq!(hub.live_count().await, 1);
}

#[tokio::test]
async fn shutdown_closes_every_client_before_returning() {
    let hub = hub_with(16);
    let (_, mut a) = join(&hub, 16).await;
    let (_, mut b) = join(&hub, 16).await;

    timeout(WAIT, hub.shutdown()).await.expect("shutdown hung");

    assert!(hub.is_stopped());
    assert!(a.is_closed());
    assert!(b.is_closed());
    assert_eq!(hub.live_count().await, 0);

    // Drain anything left and confirm the wire ended.
    while timeout(WAIT, a.recv()).await.unwrap().is_some() {}
    while timeout(WAIT, b.recv()).await.unwrap().is_some() {}
}

#[tokio::test]
async fn connecting_after_shutdown_closes_the_client() {
    let hub = hub_with(16);
    hub.shutdown().await;

    let (connection, mut peer) = MemoryConnection::pair(16);
    hub.connect(connection).await;

    timeout(WAIT, peer.wait_closed())
        .await
        .expect("late client was never closed");
    assert_eq!(hub.live_count().await, 0);
}

#[tokio::test]
async fn broadcast_after_shutdown_is_a_no_op() {
    let hub = hub_with(16);
    hub.shutdown().await;

    timeout(WAIT, hub.broadcast(post_created(1)))
        .await
        .expect("broadcast blocked after shutdown");
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    /// Every client receives every event, in broadcast order.
    #[test]
    fn each_client_sees_events_in_broadcast_order(
        clients in 1usize..4,
        post_ids in proptest::collection::vec(0u64..1_000, 1..24),
    ) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();

        let received = runtime.block_on(async {
            let hub = hub_with(64);
            let mut peers = Vec::new();
            for _ in 0..clients {
                peers.push(join(&hub, 64).await.1);
            }

            for id in &post_ids {
                hub.broadcast(post_created(*id)).await;
            }

            let mut received = Vec::new();
            for peer in &mut peers {
                let mut seen = Vec::new();
                for _ in 0..post_ids.len() {
                    seen.push(next_post_id(peer).await);
                }
                received.push(seen);
            }
            hub.shutdown().await;
            received
        });

        for seen in received {
            prop_assert_eq!(&seen, &post_ids);
        }
    }
}
