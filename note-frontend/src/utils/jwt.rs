use anyhow::Result;
use base64::{engine::general_purpose, Engine as _};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct TokenClaims {
    /// Subject claim; the backend puts the account email here.
    pub sub: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub exp: Option<i64>,
}

/// Decode JWT claims without validation.
///
/// The signature is deliberately NOT checked: the decoded identity is a
/// UI convenience only. The backend re-checks authorization on every
/// call and answers 401 when the token is invalid or expired, and that
/// response is what actually ends a session.
pub fn decode_claims(token: &str) -> Result<TokenClaims> {
    let parts: Vec<&str> = token.split('.').collect();

    if parts.len() != 3 {
        return Err(anyhow::anyhow!("invalid token format"));
    }

    let payload = general_purpose::URL_SAFE_NO_PAD
        .decode(parts[1])
        .map_err(|e| anyhow::anyhow!("failed to decode token payload: {}", e))?;

    let claims: TokenClaims = serde_json::from_slice(&payload)
        .map_err(|e| anyhow::anyhow!("failed to parse token claims: {}", e))?;

    Ok(claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{engine::general_purpose, Engine as _};

    pub(crate) fn make_token(payload: &str) -> String {
        let header = general_purpose::URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let body = general_purpose::URL_SAFE_NO_PAD.encode(payload.as_bytes());
        format!("{header}.{body}.signature")
    }

    #[test]
    fn decodes_sub_and_role() {
        let token = make_token(r#"{"sub":"alice@example.com","role":"admin","exp":9999999999}"#);
        let claims = decode_claims(&token).unwrap();
        assert_eq!(claims.sub, "alice@example.com");
        assert_eq!(claims.role.as_deref(), Some("admin"));
        assert_eq!(claims.exp, Some(9999999999));
    }

    #[test]
    fn role_is_optional() {
        let token = make_token(r#"{"sub":"bob@example.com","exp":9999999999}"#);
        let claims = decode_claims(&token).unwrap();
        assert_eq!(claims.sub, "bob@example.com");
        assert!(claims.role.is_none());
    }

    #[test]
    fn rejects_wrong_segment_count() {
        assert!(decode_claims("not-a-token").is_err());
        assert!(decode_claims("one.two").is_err());
    }

    #[test]
    fn rejects_garbage_payload() {
        assert!(decode_claims("aGVhZGVy.!!!notbase64!!!.sig").is_err());
    }

    #[test]
    fn rejects_payload_without_sub() {
        let token = make_token(r#"{"role":"admin"}"#);
        assert!(decode_claims(&token).is_err());
    }
}
