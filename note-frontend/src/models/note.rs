use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A note as the backend serves it. Held only for the lifetime of the
/// request that fetched it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    #[serde(default)]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub owner: String,
    #[serde(default, rename = "sharedWith")]
    pub shared_with: Vec<ShareGrant>,
    #[serde(default, rename = "createdAt")]
    pub created_at: Option<String>,
    #[serde(default, rename = "updatedAt")]
    pub updated_at: Option<String>,
}

impl Note {
    pub fn created_display(&self) -> String {
        format_timestamp(self.created_at.as_deref())
    }

    pub fn updated_display(&self) -> String {
        format_timestamp(self.updated_at.as_deref())
    }

    pub fn tags_joined(&self) -> String {
        self.tags.join(", ")
    }
}

/// Backend timestamps arrive as ISO strings, with or without an offset
/// depending on how the record was written. Fall back to the raw string
/// rather than dropping the note.
fn format_timestamp(raw: Option<&str>) -> String {
    let Some(raw) = raw else {
        return String::new();
    };

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return parsed.format("%Y-%m-%d %H:%M").to_string();
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return parsed.format("%Y-%m-%d %H:%M").to_string();
    }

    raw.to_string()
}

/// Fields the client sends when creating or updating a note.
#[derive(Debug, Clone, Serialize)]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
}

impl NoteDraft {
    /// Build a draft from form input, splitting the comma-separated tag
    /// field the way the editor presents it.
    pub fn from_form(title: String, content: String, tags: &str) -> Self {
        let tags = tags
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();
        Self {
            title,
            content,
            tags,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    Read,
    Write,
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Permission::Read => f.write_str("read"),
            Permission::Write => f.write_str("write"),
        }
    }
}

/// One entry of a note's share list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareGrant {
    pub email: String,
    pub permission: Permission,
}

/// Add or overwrite the grant for an email. The share list holds at
/// most one grant per email; re-sharing with a different permission
/// replaces the old entry instead of appending.
pub fn upsert_grant(grants: &mut Vec<ShareGrant>, grant: ShareGrant) {
    match grants.iter_mut().find(|g| g.email == grant.email) {
        Some(existing) => existing.permission = grant.permission,
        None => grants.push(grant),
    }
}

pub fn remove_grant(grants: &mut Vec<ShareGrant>, email: &str) {
    grants.retain(|g| g.email != email);
}

/// One page of the notes listing.
#[derive(Debug, Clone, Deserialize)]
pub struct NotesPage {
    #[serde(default)]
    pub notes: Vec<Note>,
    #[serde(default, rename = "totalPages")]
    pub total_pages: u32,
    #[serde(default, rename = "totalNotes")]
    pub total_notes: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grant(email: &str, permission: Permission) -> ShareGrant {
        ShareGrant {
            email: email.to_string(),
            permission,
        }
    }

    #[test]
    fn upsert_appends_new_email() {
        let mut grants = vec![grant("a@example.com", Permission::Read)];
        upsert_grant(&mut grants, grant("b@example.com", Permission::Write));
        assert_eq!(grants.len(), 2);
    }

    #[test]
    fn upsert_overwrites_existing_email_without_duplicating() {
        let mut grants = vec![grant("a@example.com", Permission::Read)];
        upsert_grant(&mut grants, grant("a@example.com", Permission::Write));
        assert_eq!(grants.len(), 1);
        assert_eq!(grants[0].permission, Permission::Write);
    }

    #[test]
    fn remove_drops_only_the_named_email() {
        let mut grants = vec![
            grant("a@example.com", Permission::Read),
            grant("b@example.com", Permission::Write),
        ];
        remove_grant(&mut grants, "a@example.com");
        assert_eq!(grants, vec![grant("b@example.com", Permission::Write)]);
    }

    #[test]
    fn note_deserializes_backend_field_names() {
        let note: Note = serde_json::from_str(
            r#"{
                "id": "abc123",
                "title": "groceries",
                "content": "milk",
                "tags": ["home"],
                "owner": "alice@example.com",
                "sharedWith": [{"email": "bob@example.com", "permission": "write"}],
                "createdAt": "2026-01-05T10:30:00Z",
                "updatedAt": "2026-01-06T08:00:00.123456"
            }"#,
        )
        .unwrap();

        assert_eq!(note.owner, "alice@example.com");
        assert_eq!(note.shared_with[0].permission, Permission::Write);
        assert_eq!(note.created_display(), "2026-01-05 10:30");
        assert_eq!(note.updated_display(), "2026-01-06 08:00");
    }

    #[test]
    fn draft_splits_and_trims_tags() {
        let draft = NoteDraft::from_form("t".into(), "c".into(), " home,  work ,,misc");
        assert_eq!(draft.tags, vec!["home", "work", "misc"]);
    }
}
