//! User identity record.
//!
//! Users are owned by the account system; this layer only reads them (the
//! repository insert exists for seeding).

use crate::model::validation::{validate_required_text, ValidationResult};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type UserId = Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl User {
    /// Creates a user with a generated id and empty profile names.
    pub fn new(username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: username.into(),
            first_name: String::new(),
            last_name: String::new(),
            email: email.into(),
        }
    }

    pub fn with_names(
        mut self,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        self.first_name = first_name.into();
        self.last_name = last_name.into();
        self
    }

    /// Validates record-level invariants.
    pub fn validate(&self) -> ValidationResult<()> {
        validate_required_text("username", &self.username)?;
        Ok(())
    }
}
