//! Read-only user lookups.

use crate::model::user::UserId;
use crate::repo::user_repo::UserRepository;
use crate::serializer::user::UserRepr;
use crate::service::{load_user_repr, ServiceResult};

pub struct UserService<U: UserRepository> {
    users: U,
}

impl<U: UserRepository> UserService<U> {
    pub fn new(users: U) -> Self {
        Self { users }
    }

    pub fn get(&self, id: UserId) -> ServiceResult<UserRepr> {
        load_user_repr(&self.users, id)
    }
}
