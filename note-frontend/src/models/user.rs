use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::session::{SessionController, SessionState, SessionUser};

/// Authenticated user context for a handler, derived through the
/// session controller. Extraction fails with a redirect to login when
/// the visitor is anonymous.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub email: String,
    pub role: Option<String>,
    pub access_token: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state).await.map_err(|_| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to extract session",
            )
                .into_response()
        })?;

        let controller = SessionController::new(session);

        match controller.state().await {
            SessionState::Authenticated(user) => {
                // The token is read fresh from the store, not cached, so
                // a just-cleared token can never ride along.
                let access_token = controller
                    .store()
                    .get()
                    .await
                    .ok_or_else(|| Redirect::to("/login").into_response())?;

                Ok(AuthUser {
                    email: user.email,
                    role: user.role,
                    access_token,
                })
            }
            SessionState::Anonymous => Err(Redirect::to("/login").into_response()),
        }
    }
}

impl AuthUser {
    pub fn session_user(&self) -> SessionUser {
        SessionUser {
            email: self.email.clone(),
            role: self.role.clone(),
        }
    }
}
