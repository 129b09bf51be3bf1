//! EventBroadcaster port - hands notifications to live clients.
//!
//! The caller has already committed its write when it broadcasts. Delivery
//! is best-effort: slow or dead clients are dropped by the implementation,
//! and nothing is reported back to the caller.

use async_trait::async_trait;

use crate::domain::foundation::BroadcastEvent;

/// Port for fanning out a broadcast event to every connected client.
///
/// Implementations must return without waiting on any individual client.
#[async_trait]
pub trait EventBroadcaster: Send + Sync {
    async fn broadcast(&self, event: BroadcastEvent);
}
