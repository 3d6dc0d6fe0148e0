use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Infrastructure-level failures of the client itself.
///
/// Backend API failures are a separate concern and carry their own type
/// at the gateway; this enum covers the cases where the client cannot
/// continue serving the current request.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("session expired")]
    SessionExpired,

    #[error("session storage failed: {0}")]
    SessionStore(#[source] anyhow::Error),

    #[error("configuration error: {0}")]
    ConfigError(anyhow::Error),

    #[error("internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::ConfigError(anyhow::Error::new(err))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorResponse {
            error: String,
            #[serde(skip_serializing_if = "Option::is_none")]
            details: Option<String>,
        }

        let (status, error_message, details) = match self {
            // An expired session is not an error page; the user is sent
            // back through login.
            AppError::SessionExpired => return Redirect::to("/login").into_response(),
            AppError::SessionStore(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Session storage error".to_string(),
                Some(err.to_string()),
            ),
            AppError::ConfigError(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Configuration error".to_string(),
                Some(err.to_string()),
            ),
            AppError::InternalError(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
                Some(err.to_string()),
            ),
        };

        (
            status,
            Json(ErrorResponse {
                error: error_message,
                details,
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header;

    #[test]
    fn session_expired_redirects_to_login() {
        let response = AppError::SessionExpired.into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/login"
        );
    }

    #[test]
    fn internal_error_is_500() {
        let response = AppError::InternalError(anyhow::anyhow!("boom")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
