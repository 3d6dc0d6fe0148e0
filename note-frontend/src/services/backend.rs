use axum::http::StatusCode;
use client_core::observability::TracedClientExt;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

use crate::config::BackendSettings;
use crate::models::analytics::AnalyticsReport;
use crate::models::note::{Note, NoteDraft, NotesPage, ShareGrant};

/// Gateway failures, in the client's error taxonomy.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP 401 from any call. The authoritative session-invalid
    /// signal, regardless of what the local decoder believed.
    #[error("authentication rejected by the note service")]
    Unauthorized,

    /// Non-2xx with whatever detail the backend offered.
    #[error("{detail}")]
    Backend { status: StatusCode, detail: String },

    /// Transport-level failure; surfaced once, never retried.
    #[error("request to the note service failed: {0}")]
    Transport(#[from] reqwest::Error),
}

#[derive(Deserialize)]
struct ShareList {
    #[serde(default, rename = "sharedWith")]
    shared_with: Vec<ShareGrant>,
}

/// HTTP gateway to the note backend. One method per backend operation;
/// authenticated methods take the bearer token by argument so callers
/// read it fresh from the token store at call time.
pub struct BackendClient {
    client: Client,
    settings: BackendSettings,
}

impl BackendClient {
    pub fn new(settings: BackendSettings) -> Self {
        Self {
            client: Client::new(),
            settings,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.settings.url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.settings.url, path)
    }

    /// Map a response to the error taxonomy; 2xx passes through.
    async fn check(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized);
        }
        if status.is_success() {
            return Ok(response);
        }

        let detail = response
            .json::<serde_json::Value>()
            .await
            .ok()
            .and_then(|body| {
                body.get("detail")
                    .and_then(|d| d.as_str())
                    .map(str::to_owned)
            })
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            });

        Err(ApiError::Backend { status, detail })
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<String, ApiError> {
        let response = self
            .client
            .traced_post(&self.url("/auth/login"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;
        let response = Self::check(response).await?;

        let body: serde_json::Value = response.json().await?;
        body["access_token"]
            .as_str()
            .map(str::to_owned)
            .ok_or_else(|| ApiError::Backend {
                status: StatusCode::BAD_GATEWAY,
                detail: "login response carried no access token".to_string(),
            })
    }

    pub async fn register(&self, email: &str, password: &str) -> Result<(), ApiError> {
        let response = self
            .client
            .traced_post(&self.url("/auth/register"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    pub async fn list_notes(
        &self,
        token: &str,
        search: &str,
        page: u32,
    ) -> Result<NotesPage, ApiError> {
        let response = self
            .client
            .traced_get(&self.url("/notes"))
            .query(&[("search", search), ("page", &page.to_string())])
            .bearer_auth(token)
            .send()
            .await?;
        let response = Self::check(response).await?;
        Ok(response.json().await?)
    }

    pub async fn get_note(&self, token: &str, id: &str) -> Result<Note, ApiError> {
        let response = self
            .client
            .traced_get(&self.url(&format!("/notes/{id}")))
            .bearer_auth(token)
            .send()
            .await?;
        let response = Self::check(response).await?;
        Ok(response.json().await?)
    }

    pub async fn create_note(&self, token: &str, draft: &NoteDraft) -> Result<Note, ApiError> {
        let response = self
            .client
            .traced_post(&self.url("/notes"))
            .json(draft)
            .bearer_auth(token)
            .send()
            .await?;
        let response = Self::check(response).await?;
        Ok(response.json().await?)
    }

    pub async fn update_note(
        &self,
        token: &str,
        id: &str,
        draft: &NoteDraft,
    ) -> Result<Note, ApiError> {
        let response = self
            .client
            .traced_put(&self.url(&format!("/notes/{id}")))
            .json(draft)
            .bearer_auth(token)
            .send()
            .await?;
        let response = Self::check(response).await?;
        Ok(response.json().await?)
    }

    pub async fn delete_note(&self, token: &str, id: &str) -> Result<(), ApiError> {
        let response = self
            .client
            .traced_delete(&self.url(&format!("/notes/{id}")))
            .bearer_auth(token)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    pub async fn get_shares(&self, token: &str, id: &str) -> Result<Vec<ShareGrant>, ApiError> {
        let response = self
            .client
            .traced_get(&self.url(&format!("/notes/{id}/share")))
            .bearer_auth(token)
            .send()
            .await?;
        let response = Self::check(response).await?;
        let list: ShareList = response.json().await?;
        Ok(list.shared_with)
    }

    /// Submit the complete replacement share list. This is a replace,
    /// not a merge: callers fetch the current list, rebuild it, and
    /// send the whole thing. Last write wins under concurrent editors.
    pub async fn replace_shares(
        &self,
        token: &str,
        id: &str,
        grants: &[ShareGrant],
    ) -> Result<(), ApiError> {
        let response = self
            .client
            .traced_put(&self.url(&format!("/notes/{id}/share")))
            .json(grants)
            .bearer_auth(token)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    pub async fn get_analytics(&self, token: &str) -> Result<AnalyticsReport, ApiError> {
        let response = self
            .client
            .traced_get(&self.url("/analytics"))
            .bearer_auth(token)
            .send()
            .await?;
        let response = Self::check(response).await?;
        Ok(response.json().await?)
    }

    /// Page-visit telemetry. Callers spawn this and drop failures; a
    /// lost beacon must never surface to the user.
    pub async fn track_activity(
        &self,
        email: &str,
        time_spent: u64,
        page: &str,
    ) -> Result<(), ApiError> {
        let response = self
            .client
            .traced_post(&self.url("/analytics/track"))
            .json(&json!({ "email": email, "timeSpent": time_spent, "page": page }))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    pub async fn track_logout(&self, email: &str) -> Result<(), ApiError> {
        let response = self
            .client
            .traced_post(&self.url("/analytics/track-logout"))
            .json(&json!({ "email": email }))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }
}
