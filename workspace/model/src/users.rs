//! The band/brand user: a base [`Account`] plus role, genre and currency.

use std::fmt;

use sea_orm::ActiveValue::{NotSet, Set};

use crate::auth::{Account, PasswordHash, PasswordHasher, Result};
use crate::entities::user;

/// Maximum number of characters allowed in [`CustomUser::genre`].
pub const GENRE_MAX_LENGTH: usize = 50;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CustomUser {
    account: Account,
    pub role_id: Option<i32>,
    pub genre: Option<String>,
    pub currency_id: Option<i32>,
}

impl CustomUser {
    pub fn new(account: Account) -> Self {
        Self {
            account,
            role_id: None,
            genre: None,
            currency_id: None,
        }
    }

    pub fn account(&self) -> &Account {
        &self.account
    }

    pub fn account_mut(&mut self) -> &mut Account {
        &mut self.account
    }

    pub fn id(&self) -> i32 {
        self.account.id
    }

    pub fn username(&self) -> &str {
        &self.account.username
    }

    pub fn email(&self) -> &str {
        &self.account.email
    }

    pub fn check_password(&self, raw: &str) -> bool {
        self.account.check_password(raw)
    }

    pub fn set_password(&mut self, hasher: &PasswordHasher, raw: &str) -> Result<()> {
        self.account.set_password(hasher, raw)
    }

    /// Active model with every column set. A zero id is left unset so the
    /// database assigns one on insert.
    pub fn to_active_model(&self) -> user::ActiveModel {
        let account = &self.account;
        user::ActiveModel {
            id: if account.id == 0 { NotSet } else { Set(account.id) },
            username: Set(account.username.clone()),
            email: Set(account.email.clone()),
            password: Set(account.password().as_str().to_string()),
            first_name: Set(account.first_name.clone()),
            last_name: Set(account.last_name.clone()),
            is_staff: Set(account.is_staff),
            is_active: Set(account.is_active),
            is_superuser: Set(account.is_superuser),
            last_login: Set(account.last_login),
            date_joined: Set(account.date_joined),
            role_id: Set(self.role_id),
            genre: Set(self.genre.clone()),
            currency_id: Set(self.currency_id),
        }
    }
}

impl From<user::Model> for CustomUser {
    fn from(model: user::Model) -> Self {
        let account = Account {
            id: model.id,
            username: model.username,
            email: model.email,
            password: PasswordHash::from_stored(model.password),
            first_name: model.first_name,
            last_name: model.last_name,
            is_staff: model.is_staff,
            is_active: model.is_active,
            is_superuser: model.is_superuser,
            last_login: model.last_login,
            date_joined: model.date_joined,
        };

        Self {
            account,
            role_id: model.role_id,
            genre: model.genre,
            currency_id: model.currency_id,
        }
    }
}

impl fmt::Display for CustomUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.username())
    }
}
