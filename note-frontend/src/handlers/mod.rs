pub mod app;
pub mod auth;
pub mod dashboard;
pub mod metrics;
pub mod notes;
pub mod share;

use askama::Template;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use client_core::error::AppError;
use tower_sessions::Session;

use crate::services::backend::ApiError;
use crate::session::SessionController;

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub message: String,
}

#[derive(Template)]
#[template(path = "access_denied.html")]
pub struct AccessDeniedTemplate {}

/// Turn a gateway failure into a page. A 401 is authoritative: the
/// session is invalidated and the visitor goes back through login;
/// everything else renders a notification and changes nothing locally.
pub(crate) async fn gateway_error(session: &Session, err: ApiError) -> Response {
    match err {
        ApiError::Unauthorized => {
            SessionController::new(session.clone()).invalidate().await;
            AppError::SessionExpired.into_response()
        }
        ApiError::Backend { status, detail } => {
            (status, ErrorTemplate { message: detail }).into_response()
        }
        ApiError::Transport(err) => {
            tracing::error!(error = %err, "note service call failed");
            (
                StatusCode::BAD_GATEWAY,
                ErrorTemplate {
                    message: "The note service is unreachable. Please try again.".to_string(),
                },
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::TokenStore;
    use axum::http::header;
    use std::sync::Arc;
    use tower_sessions::MemoryStore;

    #[tokio::test]
    async fn unauthorized_clears_the_token_and_redirects_to_login() {
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);
        let store = TokenStore::new(session.clone());
        store.set("stale-token").await.unwrap();

        let response = gateway_error(&session, ApiError::Unauthorized).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/login");
        assert_eq!(store.get().await, None);
    }

    #[tokio::test]
    async fn backend_error_renders_a_page_and_keeps_the_token() {
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);
        let store = TokenStore::new(session.clone());
        store.set("still-good").await.unwrap();

        let response = gateway_error(
            &session,
            ApiError::Backend {
                status: StatusCode::NOT_FOUND,
                detail: "Note not found".to_string(),
            },
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(store.get().await.as_deref(), Some("still-good"));
    }
}
