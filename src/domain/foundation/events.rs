//! Broadcast events pushed to live WebSocket clients.
//!
//! A `BroadcastEvent` is produced once per notable write (currently: a post
//! was created) and fanned out to every connected client at dispatch time.
//! Clients that connect afterwards never see it; there is no history.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;

use super::Timestamp;

/// Kind of a broadcast event, serialized as the envelope's `kind` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// A new post was persisted.
    PostCreated,
}

impl EventKind {
    /// Wire name of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::PostCreated => "post_created",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable notification payload handed to the hub.
///
/// `data` is owned by the producer and should be a JSON object; its fields
/// are flattened into the wire envelope next to `kind`. The names `kind` and
/// `timestamp` belong to the envelope; payload keys using them are dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct BroadcastEvent {
    pub kind: EventKind,
    pub data: JsonValue,
    pub occurred_at: Timestamp,
}

impl BroadcastEvent {
    /// Creates a broadcast event stamped with the current time.
    pub fn new(kind: EventKind, data: JsonValue) -> Self {
        Self {
            kind,
            data,
            occurred_at: Timestamp::now(),
        }
    }
}
