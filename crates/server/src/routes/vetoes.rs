use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use veto_core::{mentions::parse_mentions, ChannelId, SessionSnapshot, UserId, VetoError};

use crate::error::{AppError, ErrorResponse};
use crate::state::AppState;

/// A team given either as ids or as a string of chat mentions.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum TeamRoster {
    Ids(Vec<UserId>),
    /// e.g. `"<@123> <@!456>"`
    Mentions(String),
}

impl TeamRoster {
    pub fn into_ids(self) -> Vec<UserId> {
        match self {
            TeamRoster::Ids(ids) => ids,
            TeamRoster::Mentions(text) => parse_mentions(&text),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct StartVetoRequest {
    /// Organizer starting the veto
    pub actor: UserId,
    /// Number of maps to play: 1, 3 or 5
    pub format: u32,
    pub team1: TeamRoster,
    pub team2: TeamRoster,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StartVetoResponse {
    /// Human-readable summary of the ban/pick order
    pub description: String,
    #[serde(flatten)]
    pub session: SessionSnapshot,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ActionRequest {
    pub map: String,
    /// User performing the action
    pub actor: UserId,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct CancelQuery {
    /// Organizer cancelling the veto
    pub actor: UserId,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CancelResponse {
    /// Whether a veto was running
    pub cancelled: bool,
}

#[utoipa::path(
    post,
    path = "/api/channels/{channel}/veto",
    params(("channel" = u64, Path, description = "Channel ID")),
    request_body = StartVetoRequest,
    responses(
        (status = 201, description = "Veto started", body = StartVetoResponse),
        (status = 400, description = "Invalid format or rosters", body = ErrorResponse),
        (status = 403, description = "Caller is not an organizer", body = ErrorResponse),
        (status = 409, description = "A veto is already running here", body = ErrorResponse)
    ),
    tag = "vetoes"
)]
pub async fn start_veto(
    State(state): State<AppState>,
    Path(channel): Path<ChannelId>,
    Json(req): Json<StartVetoRequest>,
) -> Result<(StatusCode, Json<StartVetoResponse>), AppError> {
    state.authorize_organizer(req.actor)?;

    let pool = state.map_pool.current().await;
    let session = state.registry.start(
        channel,
        pool.maps(),
        req.team1.into_ids(),
        req.team2.into_ids(),
        req.format,
    )?;

    Ok((
        StatusCode::CREATED,
        Json(StartVetoResponse {
            description: session.format().description().to_string(),
            session: session.snapshot(),
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/api/channels/{channel}/veto",
    params(("channel" = u64, Path, description = "Channel ID")),
    responses(
        (status = 200, description = "Active veto", body = SessionSnapshot),
        (status = 404, description = "No veto in this channel", body = ErrorResponse)
    ),
    tag = "vetoes"
)]
pub async fn get_veto(
    State(state): State<AppState>,
    Path(channel): Path<ChannelId>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let snapshot = state
        .registry
        .snapshot(channel)
        .ok_or(VetoError::NoActiveVeto(channel))?;
    Ok(Json(snapshot))
}

#[utoipa::path(
    delete,
    path = "/api/channels/{channel}/veto",
    params(("channel" = u64, Path, description = "Channel ID"), CancelQuery),
    responses(
        (status = 200, description = "Cancellation result", body = CancelResponse),
        (status = 403, description = "Caller is not an organizer", body = ErrorResponse)
    ),
    tag = "vetoes"
)]
pub async fn cancel_veto(
    State(state): State<AppState>,
    Path(channel): Path<ChannelId>,
    Query(query): Query<CancelQuery>,
) -> Result<Json<CancelResponse>, AppError> {
    state.authorize_organizer(query.actor)?;

    Ok(Json(CancelResponse {
        cancelled: state.registry.cancel(channel).is_some(),
    }))
}

#[utoipa::path(
    post,
    path = "/api/channels/{channel}/ban",
    params(("channel" = u64, Path, description = "Channel ID")),
    request_body = ActionRequest,
    responses(
        (status = 200, description = "Map banned", body = SessionSnapshot),
        (status = 400, description = "Map unavailable or pick phase", body = ErrorResponse),
        (status = 403, description = "Not the actor's turn", body = ErrorResponse),
        (status = 404, description = "No veto in this channel", body = ErrorResponse)
    ),
    tag = "vetoes"
)]
pub async fn ban_map(
    State(state): State<AppState>,
    Path(channel): Path<ChannelId>,
    Json(req): Json<ActionRequest>,
) -> Result<Json<SessionSnapshot>, AppError> {
    Ok(Json(state.registry.ban(channel, &req.map, req.actor)?))
}

#[utoipa::path(
    post,
    path = "/api/channels/{channel}/pick",
    params(("channel" = u64, Path, description = "Channel ID")),
    request_body = ActionRequest,
    responses(
        (status = 200, description = "Map picked", body = SessionSnapshot),
        (status = 400, description = "Map unavailable or ban phase", body = ErrorResponse),
        (status = 403, description = "Not the actor's turn", body = ErrorResponse),
        (status = 404, description = "No veto in this channel", body = ErrorResponse)
    ),
    tag = "vetoes"
)]
pub async fn pick_map(
    State(state): State<AppState>,
    Path(channel): Path<ChannelId>,
    Json(req): Json<ActionRequest>,
) -> Result<Json<SessionSnapshot>, AppError> {
    Ok(Json(state.registry.pick(channel, &req.map, req.actor)?))
}
