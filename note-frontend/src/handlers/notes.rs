use askama::Template;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;
use tower_sessions::Session;

use crate::handlers::{gateway_error, AccessDeniedTemplate};
use crate::models::note::{Note, NoteDraft};
use crate::models::user::AuthUser;
use crate::AppState;

/// One note card plus the controls this session is allowed to see.
pub struct NoteCard {
    pub note: Note,
    pub can_edit: bool,
    pub can_delete: bool,
    pub can_share: bool,
}

#[derive(Template)]
#[template(path = "notes.html")]
pub struct NotesTemplate {
    pub cards: Vec<NoteCard>,
    pub search: String,
    pub page: u32,
    pub total_pages: u32,
    pub email: String,
    pub is_admin: bool,
}

#[derive(Template)]
#[template(path = "note_editor.html")]
pub struct EditorTemplate {
    pub id: Option<String>,
    pub title: String,
    pub content: String,
    pub tags: String,
    pub email: String,
    pub is_admin: bool,
}

#[derive(Deserialize)]
pub struct NotesQuery {
    #[serde(default)]
    pub search: String,
    pub page: Option<u32>,
}

#[derive(Deserialize)]
pub struct EditorForm {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub tags: String,
}

pub async fn list_notes(
    State(state): State<AppState>,
    session: Session,
    user: AuthUser,
    Query(query): Query<NotesQuery>,
) -> Response {
    let page = query.page.unwrap_or(1).max(1);

    match state
        .backend
        .list_notes(&user.access_token, &query.search, page)
        .await
    {
        Ok(notes_page) => {
            let session_user = user.session_user();
            let cards = notes_page
                .notes
                .into_iter()
                .map(|note| NoteCard {
                    can_edit: state.policy.can_edit(Some(&session_user), &note),
                    can_delete: state.policy.can_delete(Some(&session_user), &note),
                    can_share: state.policy.can_share(Some(&session_user), &note),
                    note,
                })
                .collect();

            NotesTemplate {
                cards,
                search: query.search,
                page,
                total_pages: notes_page.total_pages.max(1),
                is_admin: state.policy.is_admin(Some(&session_user)),
                email: session_user.email,
            }
            .into_response()
        }
        Err(err) => gateway_error(&session, err).await,
    }
}

pub async fn new_note_page(State(state): State<AppState>, user: AuthUser) -> Response {
    EditorTemplate {
        id: None,
        title: String::new(),
        content: String::new(),
        tags: String::new(),
        is_admin: state.policy.is_admin(Some(&user.session_user())),
        email: user.email,
    }
    .into_response()
}

pub async fn create_note(
    State(state): State<AppState>,
    session: Session,
    user: AuthUser,
    Form(form): Form<EditorForm>,
) -> Response {
    let draft = NoteDraft::from_form(form.title, form.content, &form.tags);

    match state.backend.create_note(&user.access_token, &draft).await {
        Ok(_) => Redirect::to("/notes").into_response(),
        Err(err) => gateway_error(&session, err).await,
    }
}

pub async fn edit_note_page(
    State(state): State<AppState>,
    session: Session,
    user: AuthUser,
    Path(id): Path<String>,
) -> Response {
    let note = match state.backend.get_note(&user.access_token, &id).await {
        Ok(note) => note,
        Err(err) => return gateway_error(&session, err).await,
    };

    let session_user = user.session_user();
    if !state.policy.can_edit(Some(&session_user), &note) {
        return (StatusCode::FORBIDDEN, AccessDeniedTemplate {}).into_response();
    }

    EditorTemplate {
        id: Some(id),
        title: note.title.clone(),
        content: note.content.clone(),
        tags: note.tags_joined(),
        is_admin: state.policy.is_admin(Some(&session_user)),
        email: session_user.email,
    }
    .into_response()
}

pub async fn update_note(
    State(state): State<AppState>,
    session: Session,
    user: AuthUser,
    Path(id): Path<String>,
    Form(form): Form<EditorForm>,
) -> Response {
    // Re-fetch and re-check before writing: no cached authorization.
    let note = match state.backend.get_note(&user.access_token, &id).await {
        Ok(note) => note,
        Err(err) => return gateway_error(&session, err).await,
    };
    if !state.policy.can_edit(Some(&user.session_user()), &note) {
        return (StatusCode::FORBIDDEN, AccessDeniedTemplate {}).into_response();
    }

    let draft = NoteDraft::from_form(form.title, form.content, &form.tags);

    match state
        .backend
        .update_note(&user.access_token, &id, &draft)
        .await
    {
        Ok(_) => Redirect::to("/notes").into_response(),
        Err(err) => gateway_error(&session, err).await,
    }
}

pub async fn delete_note(
    State(state): State<AppState>,
    session: Session,
    user: AuthUser,
    Path(id): Path<String>,
) -> Response {
    // The delete call is never issued for a session the policy turns
    // down; the backend would refuse it anyway.
    let note = match state.backend.get_note(&user.access_token, &id).await {
        Ok(note) => note,
        Err(err) => return gateway_error(&session, err).await,
    };
    if !state.policy.can_delete(Some(&user.session_user()), &note) {
        return (StatusCode::FORBIDDEN, AccessDeniedTemplate {}).into_response();
    }

    match state.backend.delete_note(&user.access_token, &id).await {
        Ok(()) => Redirect::to("/notes").into_response(),
        Err(err) => gateway_error(&session, err).await,
    }
}
