use crate::User;

/// The authenticated caller, resolved from a bearer session.
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: String,
    pub email: String,
    pub is_super_admin: bool,
    pub session_id: String,
}

impl Identity {
    #[must_use]
    pub fn from_user(user: &User, session_id: impl Into<String>) -> Self {
        Self {
            user_id: user.id.clone(),
            email: user.email.clone(),
            is_super_admin: user.is_super_admin,
            session_id: session_id.into(),
        }
    }
}
