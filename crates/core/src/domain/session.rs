use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::format::{ActionKind, VetoFormat};
use super::pool::{normalize_map_name, MapPool};
use super::snapshot::SessionSnapshot;
use super::{ChannelId, UserId};
use crate::error::{Result, VetoError};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, ToSchema)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "snake_case")]
pub enum TeamSide {
    Team1,
    Team2,
}

impl TeamSide {
    pub fn other(&self) -> Self {
        match self {
            Self::Team1 => Self::Team2,
            Self::Team2 => Self::Team1,
        }
    }
}

impl fmt::Display for TeamSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Team1 => f.write_str("Team 1"),
            Self::Team2 => f.write_str("Team 2"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, ToSchema)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "snake_case")]
pub enum VetoState {
    #[default]
    InProgress,
    Completed,
}

/// One accepted ban or pick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct VetoAction {
    pub kind: ActionKind,
    pub map: String,
    pub team: TeamSide,
    pub actor: UserId,
    pub at: DateTime<Utc>,
}

/// State machine for a single veto in one channel.
///
/// `maps_remaining`, `banned_maps` and `picked_maps` always partition the
/// starting pool. The only mutations are [`VetoSession::ban`] and
/// [`VetoSession::pick`].
#[derive(Debug, Clone)]
pub struct VetoSession {
    channel: ChannelId,
    format: VetoFormat,
    maps_remaining: Vec<String>,
    banned_maps: Vec<String>,
    picked_maps: Vec<String>,
    team1: BTreeSet<UserId>,
    team2: BTreeSet<UserId>,
    active_team: TeamSide,
    selections_made: usize,
    state: VetoState,
    history: Vec<VetoAction>,
    started_at: DateTime<Utc>,
    last_action_at: DateTime<Utc>,
}

impl VetoSession {
    /// Team 1 always acts first.
    ///
    /// Rosters must be non-empty and disjoint.
    pub fn new(
        channel: ChannelId,
        pool: MapPool,
        team1: impl IntoIterator<Item = UserId>,
        team2: impl IntoIterator<Item = UserId>,
        format: VetoFormat,
    ) -> Result<Self> {
        let team1: BTreeSet<UserId> = team1.into_iter().collect();
        let team2: BTreeSet<UserId> = team2.into_iter().collect();

        if team1.is_empty() {
            return Err(VetoError::EmptyTeam {
                side: TeamSide::Team1,
            });
        }
        if team2.is_empty() {
            return Err(VetoError::EmptyTeam {
                side: TeamSide::Team2,
            });
        }
        if let Some(shared) = team1.intersection(&team2).next() {
            return Err(VetoError::TeamsOverlap(*shared));
        }

        let now = Utc::now();
        Ok(Self {
            channel,
            format,
            maps_remaining: pool.into_maps(),
            banned_maps: Vec::new(),
            picked_maps: Vec::new(),
            team1,
            team2,
            active_team: TeamSide::Team1,
            selections_made: 0,
            state: VetoState::InProgress,
            history: Vec::new(),
            started_at: now,
            last_action_at: now,
        })
    }

    pub fn channel(&self) -> ChannelId {
        self.channel
    }

    pub fn format(&self) -> VetoFormat {
        self.format
    }

    pub fn action_sequence(&self) -> &'static [ActionKind] {
        self.format.action_sequence()
    }

    pub fn maps_remaining(&self) -> &[String] {
        &self.maps_remaining
    }

    pub fn banned_maps(&self) -> &[String] {
        &self.banned_maps
    }

    pub fn picked_maps(&self) -> &[String] {
        &self.picked_maps
    }

    pub fn team(&self, side: TeamSide) -> &BTreeSet<UserId> {
        match side {
            TeamSide::Team1 => &self.team1,
            TeamSide::Team2 => &self.team2,
        }
    }

    pub fn active_team(&self) -> TeamSide {
        self.active_team
    }

    pub fn active_members(&self) -> &BTreeSet<UserId> {
        self.team(self.active_team)
    }

    pub fn selections_made(&self) -> usize {
        self.selections_made
    }

    pub fn state(&self) -> VetoState {
        self.state
    }

    pub fn history(&self) -> &[VetoAction] {
        &self.history
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn last_action_at(&self) -> DateTime<Utc> {
        self.last_action_at
    }

    pub fn current_action(&self) -> ActionKind {
        self.format.action_at(self.selections_made)
    }

    pub fn is_completed(&self) -> bool {
        self.state == VetoState::Completed
    }

    pub fn is_ban_phase(&self) -> bool {
        self.current_action() == ActionKind::Ban
    }

    pub fn is_pick_phase(&self) -> bool {
        self.current_action() == ActionKind::Pick
    }

    /// Membership in the team whose turn it is. This is the only
    /// authorization check; `ban` and `pick` do not perform it.
    pub fn can_act(&self, actor: UserId) -> bool {
        self.active_members().contains(&actor)
    }

    pub fn ban(&mut self, map: &str, actor: UserId) -> Result<()> {
        self.apply(ActionKind::Ban, map, actor)
    }

    pub fn pick(&mut self, map: &str, actor: UserId) -> Result<()> {
        self.apply(ActionKind::Pick, map, actor)
    }

    pub fn apply(&mut self, kind: ActionKind, map: &str, actor: UserId) -> Result<()> {
        if self.is_completed() {
            return Err(VetoError::VetoCompleted);
        }

        let expected = self.current_action();
        if kind != expected {
            return Err(VetoError::WrongActionKind { expected });
        }

        let map = normalize_map_name(map);
        let Some(index) = self.maps_remaining.iter().position(|m| *m == map) else {
            return Err(self.rejection(map));
        };

        let map = self.maps_remaining.remove(index);
        match kind {
            ActionKind::Ban => self.banned_maps.push(map.clone()),
            ActionKind::Pick => self.picked_maps.push(map.clone()),
        }

        let now = Utc::now();
        self.history.push(VetoAction {
            kind,
            map,
            team: self.active_team,
            actor,
            at: now,
        });
        self.last_action_at = now;
        self.advance();

        Ok(())
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::from_session(self)
    }

    fn rejection(&self, map: String) -> VetoError {
        if self.banned_maps.contains(&map) {
            VetoError::MapAlreadyBanned(map)
        } else if self.picked_maps.contains(&map) {
            VetoError::MapAlreadyPicked(map)
        } else {
            VetoError::MapNotInPool(map)
        }
    }

    // The team flips on the completing action too.
    fn advance(&mut self) {
        if self.maps_remaining.len() == 1 {
            let decider = self.maps_remaining.remove(0);
            self.picked_maps.push(decider);
            self.state = VetoState::Completed;
        }
        self.selections_made += 1;
        self.active_team = self.active_team.other();
    }
}
