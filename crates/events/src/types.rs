//! Event types for the veto event system

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use veto_core::{ActionKind, ChannelId, TeamSide, UserId};

/// Envelope wrapping all events with metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct EventEnvelope {
    /// Unique event ID
    pub id: Uuid,
    /// When the event occurred
    pub timestamp: DateTime<Utc>,
    /// The actual event
    pub event: Event,
}

impl EventEnvelope {
    /// Create a new event envelope with auto-generated ID and timestamp
    pub fn new(event: Event) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            event,
        }
    }
}

/// All possible events in the system
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    // Veto lifecycle
    /// A veto was started in a channel
    #[serde(rename = "veto.started")]
    VetoStarted {
        channel: ChannelId,
        format: u32,
        maps: Vec<String>,
        team1: Vec<UserId>,
        team2: Vec<UserId>,
    },

    /// A team banned or picked a map
    #[serde(rename = "veto.action")]
    VetoAction {
        channel: ChannelId,
        kind: ActionKind,
        map: String,
        team: TeamSide,
        actor: UserId,
    },

    /// Only the decider was left; the veto is over
    #[serde(rename = "veto.completed")]
    VetoCompleted {
        channel: ChannelId,
        maps: Vec<String>,
    },

    /// The veto was cancelled on request
    #[serde(rename = "veto.cancelled")]
    VetoCancelled { channel: ChannelId },

    /// The veto sat idle past the configured timeout
    #[serde(rename = "veto.expired")]
    VetoExpired { channel: ChannelId },

    // Configuration
    /// An entry of the map pool was replaced
    #[serde(rename = "pool.map_replaced")]
    MapReplaced { old_map: String, new_map: String },

    // System events
    /// Generic error event
    #[serde(rename = "error")]
    Error {
        message: String,
        context: Option<String>,
    },
}

impl Event {
    /// Get the channel associated with this event, if any
    pub fn channel(&self) -> Option<ChannelId> {
        match self {
            Event::VetoStarted { channel, .. } => Some(*channel),
            Event::VetoAction { channel, .. } => Some(*channel),
            Event::VetoCompleted { channel, .. } => Some(*channel),
            Event::VetoCancelled { channel } => Some(*channel),
            Event::VetoExpired { channel } => Some(*channel),
            Event::MapReplaced { .. } => None,
            Event::Error { .. } => None,
        }
    }

    /// Wire name used for the `type` tag and SSE event names
    pub fn event_type(&self) -> &'static str {
        match self {
            Event::VetoStarted { .. } => "veto.started",
            Event::VetoAction { .. } => "veto.action",
            Event::VetoCompleted { .. } => "veto.completed",
            Event::VetoCancelled { .. } => "veto.cancelled",
            Event::VetoExpired { .. } => "veto.expired",
            Event::MapReplaced { .. } => "pool.map_replaced",
            Event::Error { .. } => "error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_envelope_creation() {
        let event = Event::VetoCancelled { channel: 7 };
        let envelope = EventEnvelope::new(event);

        assert!(!envelope.id.is_nil());
        assert!(envelope.timestamp <= Utc::now());
    }

    #[test]
    fn test_event_serialization() {
        let event = Event::VetoAction {
            channel: 7,
            kind: ActionKind::Ban,
            map: "haven".to_string(),
            team: TeamSide::Team1,
            actor: 11,
        };

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains(r#""type":"veto.action""#));
        assert!(json.contains(r#""kind":"ban""#));
        assert!(json.contains(r#""team":"team1""#));
    }

    #[test]
    fn test_event_deserialization() {
        let json = r#"{"type":"veto.completed","channel":9,"maps":["ascent","lotus"]}"#;
        let event: Event = serde_json::from_str(json).unwrap();

        match event {
            Event::VetoCompleted { channel, maps } => {
                assert_eq!(channel, 9);
                assert_eq!(maps, vec!["ascent", "lotus"]);
            }
            _ => panic!("Wrong event type"),
        }
    }

    #[test]
    fn test_event_channel() {
        assert_eq!(Event::VetoExpired { channel: 3 }.channel(), Some(3));

        let error_event = Event::Error {
            message: "test".to_string(),
            context: None,
        };
        assert_eq!(error_event.channel(), None);
    }

    #[test]
    fn test_event_type_matches_serde_tag() {
        let event = Event::MapReplaced {
            old_map: "bind".to_string(),
            new_map: "abyss".to_string(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], event.event_type());
    }
}
