use askama::Template;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;
use tower_sessions::Session;

use crate::handlers::{gateway_error, AccessDeniedTemplate};
use crate::models::note::{remove_grant, upsert_grant, Note, Permission, ShareGrant};
use crate::models::user::AuthUser;
use crate::AppState;

#[derive(Template)]
#[template(path = "share.html")]
pub struct ShareTemplate {
    pub note_id: String,
    pub note_title: String,
    pub grants: Vec<ShareGrant>,
    pub email: String,
    pub is_admin: bool,
}

#[derive(Deserialize)]
pub struct AddShareForm {
    pub email: String,
    pub permission: Permission,
}

#[derive(Deserialize)]
pub struct RemoveShareForm {
    pub email: String,
}

/// Fetch the note and confirm this session may manage its sharing.
async fn sharable_note(
    state: &AppState,
    session: &Session,
    user: &AuthUser,
    id: &str,
) -> Result<Note, Response> {
    let note = match state.backend.get_note(&user.access_token, id).await {
        Ok(note) => note,
        Err(err) => return Err(gateway_error(session, err).await),
    };

    if !state.policy.can_share(Some(&user.session_user()), &note) {
        return Err((StatusCode::FORBIDDEN, AccessDeniedTemplate {}).into_response());
    }

    Ok(note)
}

pub async fn share_page(
    State(state): State<AppState>,
    session: Session,
    user: AuthUser,
    Path(id): Path<String>,
) -> Response {
    let note = match sharable_note(&state, &session, &user, &id).await {
        Ok(note) => note,
        Err(response) => return response,
    };

    let grants = match state.backend.get_shares(&user.access_token, &id).await {
        Ok(grants) => grants,
        Err(err) => return gateway_error(&session, err).await,
    };

    ShareTemplate {
        note_id: id,
        note_title: note.title,
        grants,
        is_admin: state.policy.is_admin(Some(&user.session_user())),
        email: user.email,
    }
    .into_response()
}

/// Add or change a grant. The share list is replaced wholesale: fetch
/// the current list, upsert the entry by email, submit the full result.
pub async fn add_share(
    State(state): State<AppState>,
    session: Session,
    user: AuthUser,
    Path(id): Path<String>,
    Form(form): Form<AddShareForm>,
) -> Response {
    if let Err(response) = sharable_note(&state, &session, &user, &id).await {
        return response;
    }

    let mut grants = match state.backend.get_shares(&user.access_token, &id).await {
        Ok(grants) => grants,
        Err(err) => return gateway_error(&session, err).await,
    };

    upsert_grant(
        &mut grants,
        ShareGrant {
            email: form.email,
            permission: form.permission,
        },
    );

    match state
        .backend
        .replace_shares(&user.access_token, &id, &grants)
        .await
    {
        Ok(()) => Redirect::to(&format!("/notes/{id}/share")).into_response(),
        Err(err) => gateway_error(&session, err).await,
    }
}

pub async fn remove_share(
    State(state): State<AppState>,
    session: Session,
    user: AuthUser,
    Path(id): Path<String>,
    Form(form): Form<RemoveShareForm>,
) -> Response {
    if let Err(response) = sharable_note(&state, &session, &user, &id).await {
        return response;
    }

    let mut grants = match state.backend.get_shares(&user.access_token, &id).await {
        Ok(grants) => grants,
        Err(err) => return gateway_error(&session, err).await,
    };

    remove_grant(&mut grants, &form.email);

    match state
        .backend
        .replace_shares(&user.access_token, &id, &grants)
        .await
    {
        Ok(()) => Redirect::to(&format!("/notes/{id}/share")).into_response(),
        Err(err) => gateway_error(&session, err).await,
    }
}
