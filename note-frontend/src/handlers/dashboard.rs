use askama::Template;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use tower_sessions::Session;

use crate::handlers::{gateway_error, AccessDeniedTemplate};
use crate::models::analytics::AnalyticsReport;
use crate::models::user::AuthUser;
use crate::session::{SessionController, SessionState};
use crate::AppState;

#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub report: AnalyticsReport,
    pub email: String,
    pub is_admin: bool,
}

pub async fn dashboard_handler(
    State(state): State<AppState>,
    session: Session,
    user: AuthUser,
) -> Response {
    let session_user = user.session_user();

    // The dashboard is admin-only; everyone else gets a denial page,
    // and the analytics call is never made on their behalf.
    if !state.policy.is_admin(Some(&session_user)) {
        return (StatusCode::FORBIDDEN, AccessDeniedTemplate {}).into_response();
    }

    match state.backend.get_analytics(&user.access_token).await {
        Ok(report) => DashboardTemplate {
            report,
            email: session_user.email,
            is_admin: true,
        }
        .into_response(),
        Err(err) => gateway_error(&session, err).await,
    }
}

#[derive(Deserialize)]
pub struct TrackPayload {
    #[serde(rename = "timeSpent")]
    pub time_spent: u64,
    pub page: String,
}

/// Receives the page-dwell beacon and forwards it to the backend,
/// fire-and-forget. Anonymous beacons are silently dropped.
pub async fn track_handler(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<TrackPayload>,
) -> StatusCode {
    if let SessionState::Authenticated(user) = SessionController::new(session).state().await {
        let backend = state.backend.clone();
        tokio::spawn(async move {
            if let Err(err) = backend
                .track_activity(&user.email, payload.time_spent, &payload.page)
                .await
            {
                tracing::debug!(error = %err, "activity telemetry dropped");
            }
        });
    }

    StatusCode::NO_CONTENT
}
