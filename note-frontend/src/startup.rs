use axum::{
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use client_core::middleware::tracing::request_id_middleware;
use time::Duration;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tower_sessions::{cookie::Key, Expiry, MemoryStore, SessionManagerLayer};

use crate::handlers::{
    app::{health_check, index},
    auth::{login_handler, login_page, logout_handler, register_handler, register_page},
    dashboard::{dashboard_handler, track_handler},
    notes::{create_note, delete_note, edit_note_page, list_notes, new_note_page, update_note},
    share::{add_share, remove_share, share_page},
};
use crate::middleware::auth::require_session;
use crate::middleware::metrics::metrics_middleware;
use crate::AppState;

pub fn build_router(state: AppState, session_key: Key) -> Router {
    // Session setup: the cookie-backed store the token lives in. The
    // session id cookie is signed with the configured key so a tampered
    // cookie reads as no session at all.
    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(false) // Set to true in production with HTTPS
        .with_signed(session_key)
        .with_expiry(Expiry::OnInactivity(Duration::hours(24)));

    // Everything behind require_session; anonymous visitors are sent to
    // /login with their target remembered.
    let protected = Router::new()
        .route("/notes", get(list_notes))
        .route("/notes/new", get(new_note_page).post(create_note))
        .route("/notes/:id/edit", get(edit_note_page).post(update_note))
        .route("/notes/:id/delete", post(delete_note))
        .route("/notes/:id/share", get(share_page).post(add_share))
        .route("/notes/:id/share/remove", post(remove_share))
        .route("/dashboard", get(dashboard_handler))
        .route_layer(from_fn(require_session));

    Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .route("/metrics", get(crate::handlers::metrics::metrics))
        .route("/login", get(login_page).post(login_handler))
        .route("/register", get(register_page).post(register_handler))
        .route("/logout", get(logout_handler))
        .route("/track", post(track_handler))
        .merge(protected)
        .nest_service(
            "/static",
            ServeDir::new(crate::config::crate_dir().join("static")),
        )
        .layer(session_layer)
        .layer(from_fn(metrics_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}
