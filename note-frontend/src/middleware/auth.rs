use axum::{
    body::Body,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::session::{SessionController, SessionState};

/// Route gating for protected pages. The state is re-derived from the
/// token store on every request, so a token cleared elsewhere takes
/// effect at the next navigation.
pub async fn require_session(session: Session, request: Request<Body>, next: Next) -> Response {
    let controller = SessionController::new(session);

    match controller.state().await {
        SessionState::Authenticated(_) => next.run(request).await,
        SessionState::Anonymous => {
            // Remember where the visitor was headed so login can land
            // them there instead of on the notes list.
            if let Some(path_and_query) = request.uri().path_and_query() {
                controller.remember_redirect(path_and_query.as_str()).await;
            }
            Redirect::to("/login").into_response()
        }
    }
}
