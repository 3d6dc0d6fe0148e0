use crate::session::token_store::TokenStore;
use crate::utils::jwt::decode_claims;

/// Identity derived from the stored token. Never persisted itself;
/// recomputed from the Token Store on demand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser {
    pub email: String,
    pub role: Option<String>,
}

/// Derive the current identity from the token store.
///
/// Absent token means logged out, not an error. A token that is present
/// but unparseable is treated the same way, and the corrupt value is
/// dropped from the store so later reads agree.
pub async fn decode(store: &TokenStore) -> Option<SessionUser> {
    let token = store.get().await?;

    match decode_claims(&token) {
        Ok(claims) => Some(SessionUser {
            email: claims.sub,
            role: claims.role,
        }),
        Err(err) => {
            tracing::debug!(error = %err, "discarding undecodable token");
            store.clear().await;
            None
        }
    }
}
