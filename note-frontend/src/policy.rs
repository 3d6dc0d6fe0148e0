use crate::models::note::{Note, Permission};
use crate::session::SessionUser;

/// Role claim value that marks an administrator.
const ADMIN_ROLE: &str = "admin";

/// Pure access decisions over the current session and a resource
/// snapshot. Nothing here is cached and nothing here is enforcement:
/// the backend re-checks every operation and its 401/403 answers win.
#[derive(Debug, Clone, Default)]
pub struct Policy {
    admin_email: Option<String>,
}

impl Policy {
    pub fn new(admin_email: Option<String>) -> Self {
        Self { admin_email }
    }

    /// Admin is decided by the token's role claim. The configured email
    /// comparison is kept as a fallback for backends that issue tokens
    /// without a role claim.
    pub fn is_admin(&self, user: Option<&SessionUser>) -> bool {
        let Some(user) = user else {
            return false;
        };

        if user.role.as_deref() == Some(ADMIN_ROLE) {
            return true;
        }

        self.admin_email.as_deref() == Some(user.email.as_str())
    }

    pub fn is_owner(user: &SessionUser, note: &Note) -> bool {
        user.email == note.owner
    }

    pub fn can_edit(&self, user: Option<&SessionUser>, note: &Note) -> bool {
        let Some(u) = user else {
            return false;
        };

        Self::is_owner(u, note)
            || self.is_admin(user)
            || note
                .shared_with
                .iter()
                .any(|g| g.email == u.email && g.permission == Permission::Write)
    }

    pub fn can_delete(&self, user: Option<&SessionUser>, note: &Note) -> bool {
        let Some(u) = user else {
            return false;
        };

        Self::is_owner(u, note) || self.is_admin(user)
    }

    pub fn can_share(&self, user: Option<&SessionUser>, note: &Note) -> bool {
        match user {
            Some(u) => Self::is_owner(u, note),
            None => false,
        }
    }
}
