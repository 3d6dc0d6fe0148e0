use askama::Template;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use client_core::error::AppError;
use serde::Deserialize;
use tower_sessions::Session;
use validator::Validate;

use crate::services::backend::ApiError;
use crate::session::{SessionController, SessionState};
use crate::AppState;

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub error: Option<String>,
}

#[derive(Template)]
#[template(path = "register.html")]
pub struct RegisterTemplate {
    pub error: Option<String>,
}

#[derive(Deserialize, Validate)]
pub struct LoginForm {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Deserialize, Validate)]
pub struct RegisterForm {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6))]
    pub password: String,
}

pub async fn login_page(session: Session) -> Response {
    // An authenticated visitor has no business on the login page.
    if let SessionState::Authenticated(_) = SessionController::new(session).state().await {
        return Redirect::to("/notes").into_response();
    }

    LoginTemplate { error: None }.into_response()
}

pub async fn login_handler(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    if form.validate().is_err() {
        return Ok((
            StatusCode::UNPROCESSABLE_ENTITY,
            LoginTemplate {
                error: Some("Enter a valid email address and password.".to_string()),
            },
        )
            .into_response());
    }

    match state.backend.login(&form.email, &form.password).await {
        Ok(token) => {
            let controller = SessionController::new(session);
            let user = controller.establish(&token).await?;

            tracing::info!(email = %user.email, "user logged in");

            let target = controller
                .take_redirect()
                .await
                .unwrap_or_else(|| "/notes".to_string());
            Ok(Redirect::to(&target).into_response())
        }
        // A 401 here is bad credentials, not an expired session: the
        // token store stays exactly as it was.
        Err(ApiError::Unauthorized) | Err(ApiError::Backend { .. }) => Ok((
            StatusCode::UNPROCESSABLE_ENTITY,
            LoginTemplate {
                error: Some("Invalid email or password.".to_string()),
            },
        )
            .into_response()),
        Err(ApiError::Transport(err)) => {
            tracing::error!(error = %err, "login request failed");
            Ok((
                StatusCode::BAD_GATEWAY,
                LoginTemplate {
                    error: Some("The note service is unreachable. Please try again.".to_string()),
                },
            )
                .into_response())
        }
    }
}

pub async fn register_page(session: Session) -> Response {
    if let SessionState::Authenticated(_) = SessionController::new(session).state().await {
        return Redirect::to("/notes").into_response();
    }

    RegisterTemplate { error: None }.into_response()
}

pub async fn register_handler(
    State(state): State<AppState>,
    Form(form): Form<RegisterForm>,
) -> Response {
    if form.validate().is_err() {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            RegisterTemplate {
                error: Some(
                    "Enter a valid email address and a password of at least 6 characters."
                        .to_string(),
                ),
            },
        )
            .into_response();
    }

    match state.backend.register(&form.email, &form.password).await {
        Ok(()) => Redirect::to("/login").into_response(),
        Err(ApiError::Backend { detail, .. }) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            RegisterTemplate {
                error: Some(detail),
            },
        )
            .into_response(),
        Err(err) => {
            tracing::error!(error = %err, "registration request failed");
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                RegisterTemplate {
                    error: Some("Registration failed. Please try again.".to_string()),
                },
            )
                .into_response()
        }
    }
}

pub async fn logout_handler(State(state): State<AppState>, session: Session) -> impl IntoResponse {
    let controller = SessionController::new(session);

    // Best-effort logout telemetry; the session is cleared regardless.
    if let SessionState::Authenticated(user) = controller.state().await {
        let backend = state.backend.clone();
        let email = user.email.clone();
        tokio::spawn(async move {
            if let Err(err) = backend.track_logout(&email).await {
                tracing::debug!(error = %err, "logout telemetry dropped");
            }
        });
        tracing::info!(email = %user.email, "user logged out");
    }

    controller.invalidate().await;

    Redirect::to("/login")
}
