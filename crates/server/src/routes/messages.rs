//! Chat message dispatch: `-map` bans, `+map` picks.

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::ToSchema;
use veto_core::{ActionKind, ChannelId, SessionSnapshot, UserId, VetoError};

use crate::error::{AppError, ErrorResponse};
use crate::state::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct ChatMessage {
    pub author: UserId,
    pub content: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    /// False when the message was not a veto command for this channel
    pub handled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<SessionSnapshot>,
}

impl MessageResponse {
    fn ignored() -> Self {
        Self {
            handled: false,
            session: None,
        }
    }
}

/// Splits `-bind` / `+ Bind` into an action and a map name.
pub fn parse_command(content: &str) -> Option<(ActionKind, &str)> {
    let content = content.trim();
    let (kind, rest) = if let Some(rest) = content.strip_prefix('-') {
        (ActionKind::Ban, rest)
    } else if let Some(rest) = content.strip_prefix('+') {
        (ActionKind::Pick, rest)
    } else {
        return None;
    };

    let map = rest.trim();
    (!map.is_empty()).then_some((kind, map))
}

#[utoipa::path(
    post,
    path = "/api/channels/{channel}/messages",
    params(("channel" = u64, Path, description = "Channel ID")),
    request_body = ChatMessage,
    responses(
        (status = 200, description = "Dispatch result", body = MessageResponse),
        (status = 400, description = "Command rejected; message is meant for the channel", body = ErrorResponse)
    ),
    tag = "vetoes"
)]
pub async fn handle_message(
    State(state): State<AppState>,
    Path(channel): Path<ChannelId>,
    Json(msg): Json<ChatMessage>,
) -> Result<Json<MessageResponse>, AppError> {
    let Some((kind, map)) = parse_command(&msg.content) else {
        return Ok(Json(MessageResponse::ignored()));
    };

    match state.registry.act(channel, kind, map, msg.author) {
        Ok(session) => Ok(Json(MessageResponse {
            handled: true,
            session: Some(session),
        })),
        // Chatter from spectators and channels without a veto is not an error
        Err(VetoError::NoActiveVeto(_)) | Err(VetoError::NotYourTurn { .. }) => {
            debug!(channel = %channel, author = %msg.author, "Ignoring chat command");
            Ok(Json(MessageResponse::ignored()))
        }
        Err(err) => Err(err.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ban_and_pick() {
        assert_eq!(parse_command("-bind"), Some((ActionKind::Ban, "bind")));
        assert_eq!(parse_command(" + Haven "), Some((ActionKind::Pick, "Haven")));
    }

    #[test]
    fn test_parse_ignores_other_messages() {
        assert_eq!(parse_command("gl hf"), None);
        assert_eq!(parse_command("-"), None);
        assert_eq!(parse_command("+   "), None);
        assert_eq!(parse_command(""), None);
    }
}
