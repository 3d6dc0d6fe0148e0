use client_core::error::AppError;
use tower_sessions::Session;

use crate::session::decoder::{self, SessionUser};
use crate::session::token_store::TokenStore;
use crate::utils::jwt::decode_claims;

/// Session key remembering where an anonymous visitor was headed before
/// being bounced to login.
const REDIRECT_KEY: &str = "redirect_to";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Anonymous,
    Authenticated(SessionUser),
}

/// The one component that owns login state. Handlers and middleware ask
/// it instead of reading the session cookie ad hoc, so every consumer
/// sees the same answer within a request.
pub struct SessionController {
    session: Session,
    store: TokenStore,
}

impl SessionController {
    pub fn new(session: Session) -> Self {
        let store = TokenStore::new(session.clone());
        Self { session, store }
    }

    pub fn store(&self) -> &TokenStore {
        &self.store
    }

    /// Re-derive the state from storage. Called on every navigation, so
    /// the state tracks the store even when it was mutated elsewhere.
    pub async fn state(&self) -> SessionState {
        match decoder::decode(&self.store).await {
            Some(user) => SessionState::Authenticated(user),
            None => SessionState::Anonymous,
        }
    }

    /// Store a freshly issued token and transition to authenticated.
    /// The token is decoded first; a token we cannot read is refused
    /// rather than persisted.
    pub async fn establish(&self, token: &str) -> Result<SessionUser, AppError> {
        let claims =
            decode_claims(token).map_err(|err| AppError::InternalError(err.context(
                "login response carried an unreadable access token",
            )))?;

        self.store
            .set(token)
            .await
            .map_err(|err| AppError::SessionStore(anyhow::Error::new(err)))?;

        Ok(SessionUser {
            email: claims.sub,
            role: claims.role,
        })
    }

    /// Transition to anonymous: explicit logout, or a backend 401.
    pub async fn invalidate(&self) {
        self.store.clear().await;
    }

    /// Remember the path a redirect-to-login interrupted.
    pub async fn remember_redirect(&self, path: &str) {
        let _ = self.session.insert(REDIRECT_KEY, path).await;
    }

    /// Consume the remembered path, if any.
    pub async fn take_redirect(&self) -> Option<String> {
        self.session.remove(REDIRECT_KEY).await.unwrap_or(None)
    }
}
