//! WebSocket message types for real-time post notifications.
//!
//! The feed is server → client only. Every frame is a JSON object whose
//! `kind` field names the message:
//!
//! ```text
//! {"kind":"connected","client_id":"…","timestamp":"…"}
//! {"kind":"post_created","post_id":"…","title":"…","user_id":"…","created_at":"…","timestamp":"…"}
//! ```

use serde::Serialize;
use serde_json::{Map, Value};

use crate::domain::foundation::{BroadcastEvent, EventKind, Timestamp};

use super::session::ClientId;

/// Envelope fields a payload may not override.
const RESERVED_KEYS: [&str; 2] = ["kind", "timestamp"];

/// All message types that can be sent from server to client.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Sent once when the session becomes active.
    Connected(ConnectedMessage),

    /// A post was created.
    PostCreated(EventMessage),
}

/// Greeting sent before any broadcast.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectedMessage {
    pub client_id: String,
    pub timestamp: String,
}

/// Broadcast payload; `data` fields sit next to `kind` on the wire.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventMessage {
    #[serde(flatten)]
    pub data: Map<String, Value>,
    pub timestamp: String,
}

impl ServerMessage {
    pub fn connected(client_id: &ClientId) -> Self {
        ServerMessage::Connected(ConnectedMessage {
            client_id: client_id.to_string(),
            timestamp: Timestamp::now().to_rfc3339(),
        })
    }

    /// Convert a broadcast event into its wire message.
    ///
    /// Non-object payloads are wrapped under a `data` key. Payload keys that
    /// collide with envelope fields are dropped.
    pub fn from_event(event: &BroadcastEvent) -> Self {
        let data = match &event.data {
            Value::Object(map) => map
                .iter()
                .filter(|(key, _)| !RESERVED_KEYS.contains(&key.as_str()))
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
            other => {
                let mut map = Map::new();
                map.insert("data".to_string(), other.clone());
                map
            }
        };
        let message = EventMessage {
            data,
            timestamp: event.occurred_at.to_rfc3339(),
        };
        match event.kind {
            EventKind::PostCreated => ServerMessage::PostCreated(message),
        }
    }

    /// Serialize to the JSON text sent on the wire.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn connected_message_serializes_with_kind_tag() {
        let client_id = ClientId::new();
        let json = ServerMessage::connected(&client_id).to_json().unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["kind"], "connected");
        assert_eq!(value["client_id"], client_id.to_string());
        assert!(value["timestamp"].is_string());
    }

    #[test]
    fn post_created_flattens_payload_next_to_kind() {
        let event = BroadcastEvent::new(
            EventKind::PostCreated,
            json!({"post_id": "p-1", "title": "Hello"}),
        );
        let json = ServerMessage::from_event(&event).to_json().unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["kind"], "post_created");
        assert_eq!(value["post_id"], "p-1");
        assert_eq!(value["title"], "Hello");
        assert_eq!(value["timestamp"], event.occurred_at.to_rfc3339());
    }

    #[test]
    fn payload_cannot_override_envelope_fields() {
        let event = BroadcastEvent::new(
            EventKind::PostCreated,
            json!({"kind": "spoofed", "timestamp": "yesterday", "title": "Hello"}),
        );
        let json = ServerMessage::from_event(&event).to_json().unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();

        assert_eq!(json.matches(r#""kind""#).count(), 1);
        assert_eq!(json.matches(r#""timestamp""#).count(), 1);
        assert_eq!(value["kind"], "post_created");
        assert_eq!(value["timestamp"], event.occurred_at.to_rfc3339());
        assert_eq!(value["title"], "Hello");
    }

    #[test]
    fn scalar_payload_is_wrapped() {
        let event = BroadcastEvent::new(EventKind::PostCreated, json!(42));
        let json = ServerMessage::from_event(&event).to_json().unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["kind"], "post_created");
        assert_eq!(value["data"], 42);
    }
}
