use thiserror::Error;

use crate::domain::{ActionKind, ChannelId, TeamSide, UserId};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VetoError {
    #[error("Invalid veto format: {0}. Supply 1, 3 or 5 maps")]
    FormatSizeInvalid(u32),

    #[error("There is already an active veto in channel {0}")]
    SessionAlreadyActive(ChannelId),

    #[error("No active veto in channel {0}")]
    NoActiveVeto(ChannelId),

    #[error("The veto is already completed")]
    VetoCompleted,

    #[error("You must {expected} a map")]
    WrongActionKind { expected: ActionKind },

    #[error("Map already banned: {0}")]
    MapAlreadyBanned(String),

    #[error("Map already picked: {0}")]
    MapAlreadyPicked(String),

    #[error("Map not in maps list: {0}")]
    MapNotInPool(String),

    #[error("User {actor} is not on the team whose turn it is")]
    NotYourTurn { actor: UserId },

    #[error("Only tournament organizers can do that (user {actor})")]
    NotOrganizer { actor: UserId },

    #[error("Map pool needs at least 2 maps, got {size}")]
    PoolTooSmall { size: usize },

    #[error("Map appears more than once in the pool: {0}")]
    DuplicateMap(String),

    #[error("Map name cannot be empty")]
    EmptyMapName,

    #[error("Map not found in the current pool: {0}")]
    MapNotFound(String),

    #[error("{side} has no players")]
    EmptyTeam { side: TeamSide },

    #[error("User {0} is listed on both teams")]
    TeamsOverlap(UserId),
}

impl VetoError {
    /// Stable machine-readable code for API responses.
    pub fn code(&self) -> &'static str {
        match self {
            Self::FormatSizeInvalid(_) => "format_size_invalid",
            Self::SessionAlreadyActive(_) => "session_already_active",
            Self::NoActiveVeto(_) => "no_active_veto",
            Self::VetoCompleted => "veto_completed",
            Self::WrongActionKind { .. } => "wrong_action_kind",
            Self::MapAlreadyBanned(_) => "map_already_banned",
            Self::MapAlreadyPicked(_) => "map_already_picked",
            Self::MapNotInPool(_) => "map_not_in_pool",
            Self::NotYourTurn { .. } => "not_your_turn",
            Self::NotOrganizer { .. } => "not_organizer",
            Self::PoolTooSmall { .. } => "pool_too_small",
            Self::DuplicateMap(_) => "duplicate_map",
            Self::EmptyMapName => "empty_map_name",
            Self::MapNotFound(_) => "map_not_found",
            Self::EmptyTeam { .. } => "empty_team",
            Self::TeamsOverlap(_) => "teams_overlap",
        }
    }
}

pub type Result<T> = std::result::Result<T, VetoError>;
