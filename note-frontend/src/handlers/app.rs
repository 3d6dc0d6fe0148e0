use axum::response::{IntoResponse, Redirect};
use tower_sessions::Session;

use crate::session::{SessionController, SessionState};

pub async fn index(session: Session) -> impl IntoResponse {
    let controller = SessionController::new(session);
    match controller.state().await {
        SessionState::Authenticated(_) => Redirect::to("/notes"),
        SessionState::Anonymous => Redirect::to("/login"),
    }
}

pub async fn health_check() -> &'static str {
    "OK"
}
