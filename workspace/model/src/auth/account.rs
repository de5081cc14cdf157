use chrono::{DateTime, Utc};

use super::error::Result;
use super::password::{PasswordHash, PasswordHasher};

/// Generic authenticated account: identity, credential and status flags.
///
/// Domain user types embed this by value and forward identity operations to it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Account {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub(crate) password: PasswordHash,
    pub first_name: String,
    pub last_name: String,
    pub is_staff: bool,
    pub is_active: bool,
    pub is_superuser: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub date_joined: DateTime<Utc>,
}

impl Account {
    /// Build an account that has not been persisted yet (`id == 0`).
    pub fn new(username: impl Into<String>, email: impl Into<String>, password: PasswordHash) -> Self {
        Self {
            id: 0,
            username: username.into(),
            email: email.into(),
            password,
            first_name: String::new(),
            last_name: String::new(),
            is_staff: false,
            is_active: true,
            is_superuser: false,
            last_login: None,
            date_joined: Utc::now(),
        }
    }

    pub fn password(&self) -> &PasswordHash {
        &self.password
    }

    pub fn set_password(&mut self, hasher: &PasswordHasher, raw: &str) -> Result<()> {
        self.password = hasher.hash(raw)?;
        Ok(())
    }

    pub fn set_unusable_password(&mut self) {
        self.password = PasswordHash::unusable();
    }

    pub fn check_password(&self, raw: &str) -> bool {
        self.password.verify(raw)
    }

    pub fn has_usable_password(&self) -> bool {
        self.password.is_usable()
    }

    /// First and last name separated by a space, trimmed.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }

    pub fn short_name(&self) -> &str {
        &self.first_name
    }
}
