//! HTTP surface of the map veto service.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod sweeper;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Map Veto API",
        version = "0.1.0",
        description = "Turn-based map ban/pick vetoes for competitive matches"
    ),
    paths(
        routes::health_check,
        routes::list_maps,
        routes::replace_map,
        routes::list_formats,
        routes::start_veto,
        routes::get_veto,
        routes::cancel_veto,
        routes::ban_map,
        routes::pick_map,
        routes::handle_message,
        routes::sse::events_stream,
    ),
    components(schemas(
        error::ErrorResponse,
        routes::HealthResponse,
        routes::MapsResponse,
        routes::ReplaceMapRequest,
        routes::ReplaceMapResponse,
        routes::FormatInfo,
        routes::FormatsResponse,
        routes::TeamRoster,
        routes::StartVetoRequest,
        routes::StartVetoResponse,
        routes::ActionRequest,
        routes::CancelResponse,
        routes::ChatMessage,
        routes::MessageResponse,
        veto_core::SessionSnapshot,
        veto_core::VetoAction,
        veto_core::ActionKind,
        veto_core::TeamSide,
    )),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "maps", description = "Map pool and format endpoints"),
        (name = "vetoes", description = "Per-channel veto sessions"),
        (name = "events", description = "Real-time event streaming (SSE)"),
    )
)]
pub struct ApiDoc;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api/openapi.json", ApiDoc::openapi()))
        .route("/health", get(routes::health_check))
        .route("/api/maps", get(routes::list_maps))
        .route("/api/maps/replace", post(routes::replace_map))
        .route("/api/formats", get(routes::list_formats))
        .route(
            "/api/channels/{channel}/veto",
            get(routes::get_veto)
                .post(routes::start_veto)
                .delete(routes::cancel_veto),
        )
        .route("/api/channels/{channel}/ban", post(routes::ban_map))
        .route("/api/channels/{channel}/pick", post(routes::pick_map))
        .route(
            "/api/channels/{channel}/messages",
            post(routes::handle_message),
        )
        .route("/api/events", get(routes::sse::events_stream))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
