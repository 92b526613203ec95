use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;
use veto_core::VetoError;

use crate::config::ConfigError;

#[derive(Debug)]
pub enum AppError {
    Veto(VetoError),
    Config(ConfigError),
}

#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Machine-readable error code
    pub error: String,
    /// Human-readable message, suitable for relaying to chat
    pub message: String,
}

fn veto_status(err: &VetoError) -> StatusCode {
    match err {
        VetoError::NoActiveVeto(_) | VetoError::MapNotFound(_) => StatusCode::NOT_FOUND,
        VetoError::SessionAlreadyActive(_) | VetoError::VetoCompleted => StatusCode::CONFLICT,
        VetoError::NotYourTurn { .. } | VetoError::NotOrganizer { .. } => {
            StatusCode::FORBIDDEN
        }
        _ => StatusCode::BAD_REQUEST,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self {
            AppError::Veto(err) => (veto_status(&err), err.code(), err.to_string()),
            AppError::Config(err) => {
                tracing::error!("Config error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "config_error",
                    err.to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_type.to_string(),
            message,
        });

        (status, body).into_response()
    }
}

impl From<VetoError> for AppError {
    fn from(err: VetoError) -> Self {
        AppError::Veto(err)
    }
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        match err {
            // A rejected replacement is the caller's fault, not the server's
            ConfigError::InvalidPool { source, .. } => AppError::Veto(source),
            other => AppError::Config(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use veto_core::ActionKind;

    #[test]
    fn test_veto_status_mapping() {
        assert_eq!(
            veto_status(&VetoError::NoActiveVeto(1)),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            veto_status(&VetoError::SessionAlreadyActive(1)),
            StatusCode::CONFLICT
        );
        assert_eq!(
            veto_status(&VetoError::NotYourTurn { actor: 5 }),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            veto_status(&VetoError::NotOrganizer { actor: 5 }),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            veto_status(&VetoError::WrongActionKind {
                expected: ActionKind::Pick
            }),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            veto_status(&VetoError::FormatSizeInvalid(2)),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_into_response_status() {
        let response = AppError::from(VetoError::MapAlreadyBanned("bind".into())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = AppError::from(ConfigError::Write {
            path: "cfg/bot_config.json".into(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        })
        .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = AppError::from(ConfigError::InvalidPool {
            path: "cfg/bot_config.json".into(),
            source: VetoError::MapNotFound("pearl".into()),
        })
        .into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
