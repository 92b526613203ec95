use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{Result, VetoError};

/// The two moves a team can make on its turn.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, ToSchema)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Ban,
    Pick,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ban => "ban",
            Self::Pick => "pick",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

use ActionKind::{Ban, Pick};

const BO1: &[ActionKind] = &[];
const BO3: &[ActionKind] = &[Ban, Ban, Pick, Pick, Ban, Ban];
const BO5: &[ActionKind] = &[Ban, Ban, Pick, Pick, Pick, Pick];

/// Number of maps decided by a veto, which fixes its action sequence.
///
/// The sequence only covers the opening of the draft. Once it runs out every
/// further turn is a ban, so pools of any size collapse to one decider.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "u32", into = "u32")]
pub enum VetoFormat {
    BestOf1,
    BestOf3,
    BestOf5,
}

impl VetoFormat {
    pub const ALL: [VetoFormat; 3] = [Self::BestOf1, Self::BestOf3, Self::BestOf5];

    pub fn from_size(size: u32) -> Result<Self> {
        match size {
            1 => Ok(Self::BestOf1),
            3 => Ok(Self::BestOf3),
            5 => Ok(Self::BestOf5),
            other => Err(VetoError::FormatSizeInvalid(other)),
        }
    }

    pub fn size(&self) -> u32 {
        match self {
            Self::BestOf1 => 1,
            Self::BestOf3 => 3,
            Self::BestOf5 => 5,
        }
    }

    pub fn action_sequence(&self) -> &'static [ActionKind] {
        match self {
            Self::BestOf1 => BO1,
            Self::BestOf3 => BO3,
            Self::BestOf5 => BO5,
        }
    }

    /// Action required on the given turn, falling back to a ban once the
    /// declared sequence is exhausted.
    pub fn action_at(&self, turn: usize) -> ActionKind {
        self.action_sequence().get(turn).copied().unwrap_or(Ban)
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::BestOf1 => "Best-of-1 | Teams alternate bans until one map remains.",
            Self::BestOf3 => "Best-of-3 | Ban, Ban, Pick, Pick, Ban, Ban, Decider.",
            Self::BestOf5 => "Best-of-5 | Ban, Ban, Pick, Pick, Pick, Pick, Decider.",
        }
    }
}

impl TryFrom<u32> for VetoFormat {
    type Error = VetoError;

    fn try_from(size: u32) -> Result<Self> {
        Self::from_size(size)
    }
}

impl From<VetoFormat> for u32 {
    fn from(format: VetoFormat) -> Self {
        format.size()
    }
}
