use tower_sessions::Session;

/// Fixed well-known key under which the bearer token is persisted.
pub const TOKEN_KEY: &str = "access_token";

/// Wraps the cookie-backed session as the single place the bearer token
/// lives. No expiry check happens here; an expired token is only found
/// out when the backend answers 401.
#[derive(Clone)]
pub struct TokenStore {
    session: Session,
}

impl TokenStore {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    pub async fn set(&self, token: &str) -> Result<(), tower_sessions::session::Error> {
        self.session.insert(TOKEN_KEY, token).await
    }

    pub async fn get(&self) -> Option<String> {
        self.session.get(TOKEN_KEY).await.unwrap_or(None)
    }

    pub async fn clear(&self) {
        let _ = self.session.remove::<String>(TOKEN_KEY).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tower_sessions::MemoryStore;

    fn test_session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    #[tokio::test]
    async fn set_then_get_round_trips() {
        let store = TokenStore::new(test_session());
        assert_eq!(store.get().await, None);

        store.set("tok-123").await.unwrap();
        assert_eq!(store.get().await.as_deref(), Some("tok-123"));
    }

    #[tokio::test]
    async fn clear_removes_the_token() {
        let store = TokenStore::new(test_session());
        store.set("tok-123").await.unwrap();
        store.clear().await;
        assert_eq!(store.get().await, None);
    }
}
