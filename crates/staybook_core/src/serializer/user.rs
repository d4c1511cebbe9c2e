use crate::model::user::{User, UserId};
use serde::Serialize;

/// Read-only user identity, nested inside other representations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserRepr {
    pub id: UserId,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl From<&User> for UserRepr {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
        }
    }
}
