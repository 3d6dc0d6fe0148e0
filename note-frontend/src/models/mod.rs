pub mod analytics;
pub mod note;
pub mod user;

pub use analytics::AnalyticsReport;
pub use note::{Note, NoteDraft, NotesPage, Permission, ShareGrant};
pub use user::AuthUser;
