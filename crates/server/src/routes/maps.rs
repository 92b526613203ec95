use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use veto_core::{ActionKind, UserId, VetoFormat};

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct MapsResponse {
    pub maps: Vec<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ReplaceMapRequest {
    /// Organizer making the change
    pub actor: UserId,
    pub old_map: String,
    pub new_map: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReplaceMapResponse {
    pub old_map: String,
    pub new_map: String,
    pub maps: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FormatInfo {
    /// Number of maps played
    pub size: u32,
    pub description: String,
    /// Actions in turn order; turns past the end are bans
    pub sequence: Vec<ActionKind>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FormatsResponse {
    pub formats: Vec<FormatInfo>,
}

#[utoipa::path(
    get,
    path = "/api/maps",
    responses(
        (status = 200, description = "Configured map pool", body = MapsResponse)
    ),
    tag = "maps"
)]
pub async fn list_maps(State(state): State<AppState>) -> Json<MapsResponse> {
    Json(MapsResponse {
        maps: state.map_pool.current().await.into_maps(),
    })
}

#[utoipa::path(
    post,
    path = "/api/maps/replace",
    request_body = ReplaceMapRequest,
    responses(
        (status = 200, description = "Entry replaced and saved", body = ReplaceMapResponse),
        (status = 400, description = "Empty or duplicate replacement", body = crate::error::ErrorResponse),
        (status = 403, description = "Caller is not an organizer", body = crate::error::ErrorResponse),
        (status = 404, description = "Map not in pool", body = crate::error::ErrorResponse)
    ),
    tag = "maps"
)]
pub async fn replace_map(
    State(state): State<AppState>,
    Json(req): Json<ReplaceMapRequest>,
) -> Result<Json<ReplaceMapResponse>, AppError> {
    state.authorize_organizer(req.actor)?;

    let (old_map, new_map, pool) = state.map_pool.replace(&req.old_map, &req.new_map).await?;

    Ok(Json(ReplaceMapResponse {
        old_map,
        new_map,
        maps: pool.into_maps(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/formats",
    responses(
        (status = 200, description = "Supported veto formats", body = FormatsResponse)
    ),
    tag = "maps"
)]
pub async fn list_formats() -> Json<FormatsResponse> {
    let formats = VetoFormat::ALL
        .iter()
        .map(|format| FormatInfo {
            size: format.size(),
            description: format.description().to_string(),
            sequence: format.action_sequence().to_vec(),
        })
        .collect();

    Json(FormatsResponse { formats })
}
