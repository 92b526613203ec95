use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::format::ActionKind;
use super::session::{TeamSide, VetoAction, VetoSession};
use super::{ChannelId, UserId};

/// Read-only view of a session after an operation, enough for a
/// presentation layer to render without touching the session itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct SessionSnapshot {
    pub channel: ChannelId,
    /// Number of maps decided (1, 3 or 5)
    pub format: u32,
    pub completed: bool,
    /// Maps to be played, in pick order with the decider last. Only set
    /// once the veto is completed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_maps: Option<Vec<String>>,
    pub next_team: TeamSide,
    pub next_team_members: Vec<UserId>,
    /// `None` once the veto is completed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_action: Option<ActionKind>,
    pub maps_remaining: Vec<String>,
    pub banned_maps: Vec<String>,
    pub picked_maps: Vec<String>,
    pub selections_made: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_action: Option<VetoAction>,
}

impl SessionSnapshot {
    pub fn from_session(session: &VetoSession) -> Self {
        let completed = session.is_completed();
        Self {
            channel: session.channel(),
            format: session.format().size(),
            completed,
            final_maps: completed.then(|| session.picked_maps().to_vec()),
            next_team: session.active_team(),
            next_team_members: session.active_members().iter().copied().collect(),
            next_action: (!completed).then(|| session.current_action()),
            maps_remaining: session.maps_remaining().to_vec(),
            banned_maps: session.banned_maps().to_vec(),
            picked_maps: session.picked_maps().to_vec(),
            selections_made: session.selections_made(),
            last_action: session.history().last().cloned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MapPool, VetoFormat};

    fn session() -> VetoSession {
        let pool = MapPool::new(["haven", "bind", "ascent"]).unwrap();
        VetoSession::new(42, pool, [1, 2], [3], VetoFormat::BestOf1).unwrap()
    }

    #[test]
    fn test_snapshot_in_progress() {
        let mut session = session();
        session.ban("bind", 2).unwrap();

        let snapshot = session.snapshot();
        assert_eq!(snapshot.channel, 42);
        assert_eq!(snapshot.format, 1);
        assert!(!snapshot.completed);
        assert!(snapshot.final_maps.is_none());
        assert_eq!(snapshot.next_team, TeamSide::Team2);
        assert_eq!(snapshot.next_team_members, vec![3]);
        assert_eq!(snapshot.next_action, Some(ActionKind::Ban));
        assert_eq!(snapshot.maps_remaining, vec!["haven", "ascent"]);

        let last = snapshot.last_action.unwrap();
        assert_eq!(last.map, "bind");
        assert_eq!(last.actor, 2);
        assert_eq!(last.team, TeamSide::Team1);
    }

    #[test]
    fn test_snapshot_completed() {
        let mut session = session();
        session.ban("bind", 1).unwrap();
        session.ban("haven", 3).unwrap();

        let snapshot = session.snapshot();
        assert!(snapshot.completed);
        assert_eq!(snapshot.final_maps, Some(vec!["ascent".to_string()]));
        assert!(snapshot.next_action.is_none());
        assert!(snapshot.maps_remaining.is_empty());
    }

    #[test]
    fn test_snapshot_serialization_skips_empty_fields() {
        let snapshot = session().snapshot();
        let json = serde_json::to_value(&snapshot).unwrap();

        assert_eq!(json["next_action"], "ban");
        assert_eq!(json["next_team"], "team1");
        assert!(json.get("final_maps").is_none());
        assert!(json.get("last_action").is_none());
    }
}
