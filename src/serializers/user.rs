use std::borrow::Cow;
use std::fmt;

use model::auth::{normalize_email, NewUser, UserManager, MAX_PASSWORD_BYTES};
use model::users::CustomUser;
use sea_orm::ConnectionTrait;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, trace};
use utoipa::ToSchema;
use validator::{Validate, ValidateEmail, ValidationError};

use super::SerializerError;

/// Every field the user serializer knows about, in wire order.
pub const FIELDS: [&str; 7] = [
    "id",
    "role_id",
    "username",
    "email",
    "password",
    "genre",
    "currency_id",
];

/// Fields accepted on input but never emitted.
pub const WRITE_ONLY_FIELDS: [&str; 1] = ["password"];

fn validate_username(username: &str) -> Result<(), ValidationError> {
    let allowed = |c: char| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_');
    if username.chars().all(allowed) {
        return Ok(());
    }
    let mut error = ValidationError::new("invalid_username");
    error.message = Some(Cow::Borrowed(
        "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.",
    ));
    Err(error)
}

fn validate_email_or_blank(email: &str) -> Result<(), ValidationError> {
    if email.is_empty() || email.validate_email() {
        return Ok(());
    }
    let mut error = ValidationError::new("email");
    error.message = Some(Cow::Borrowed("Enter a valid email address."));
    Err(error)
}

fn validate_password_bytes(password: &str) -> Result<(), ValidationError> {
    if password.len() <= MAX_PASSWORD_BYTES {
        return Ok(());
    }
    let mut error = ValidationError::new("password_too_long");
    error.message = Some(Cow::Owned(format!(
        "Ensure this field has no more than {} bytes.",
        MAX_PASSWORD_BYTES
    )));
    Err(error)
}

/// Write shape for creating a user. `id` is read-only and ignored if sent.
#[derive(Clone, Default, Deserialize, Serialize, ToSchema, Validate)]
pub struct UserInput {
    /// Role classification
    pub role_id: Option<i32>,
    /// Letters, digits and @/./+/-/_ only, at most 150 characters
    #[validate(required, length(min = 1, max = 150), custom(function = "validate_username"))]
    pub username: Option<String>,
    /// May be blank
    #[validate(custom(function = "validate_email_or_blank"))]
    pub email: Option<String>,
    /// Write-only; stored as a bcrypt hash
    #[validate(required, length(min = 1, max = 128), custom(function = "validate_password_bytes"))]
    pub password: Option<String>,
    /// Musical genre, at most 50 characters
    #[validate(length(max = 50))]
    pub genre: Option<String>,
    /// Preferred currency
    pub currency_id: Option<i32>,
}

/// Write shape for replacing a user's fields. Omitting `password` keeps the
/// current credential.
#[derive(Clone, Default, Deserialize, Serialize, ToSchema, Validate)]
pub struct UserUpdateInput {
    pub role_id: Option<i32>,
    #[validate(required, length(min = 1, max = 150), custom(function = "validate_username"))]
    pub username: Option<String>,
    #[validate(custom(function = "validate_email_or_blank"))]
    pub email: Option<String>,
    #[validate(length(min = 1, max = 128), custom(function = "validate_password_bytes"))]
    pub password: Option<String>,
    #[validate(length(max = 50))]
    pub genre: Option<String>,
    pub currency_id: Option<i32>,
}

/// Read shape. There is no password slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserRepresentation {
    pub id: i32,
    pub role_id: Option<i32>,
    pub username: String,
    pub email: String,
    pub genre: Option<String>,
    pub currency_id: Option<i32>,
}

impl From<&CustomUser> for UserRepresentation {
    fn from(user: &CustomUser) -> Self {
        Self {
            id: user.id(),
            role_id: user.role_id,
            username: user.username().to_string(),
            email: user.email().to_string(),
            genre: user.genre.clone(),
            currency_id: user.currency_id,
        }
    }
}

/// Input that passed field validation for creation.
#[derive(Clone)]
pub struct ValidatedUser {
    username: String,
    email: String,
    password: String,
    role_id: Option<i32>,
    genre: Option<String>,
    currency_id: Option<i32>,
}

/// Input that passed field validation for an update.
#[derive(Clone)]
pub struct ValidatedUpdate {
    username: String,
    email: String,
    password: Option<String>,
    role_id: Option<i32>,
    genre: Option<String>,
    currency_id: Option<i32>,
}

fn redacted(password: Option<&String>) -> Option<&'static str> {
    password.map(|_| "**redacted**")
}

impl fmt::Debug for UserInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserInput")
            .field("role_id", &self.role_id)
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &redacted(self.password.as_ref()))
            .field("genre", &self.genre)
            .field("currency_id", &self.currency_id)
            .finish()
    }
}

impl fmt::Debug for UserUpdateInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserUpdateInput")
            .field("role_id", &self.role_id)
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &redacted(self.password.as_ref()))
            .field("genre", &self.genre)
            .field("currency_id", &self.currency_id)
            .finish()
    }
}

impl fmt::Debug for ValidatedUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatedUser")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"**redacted**")
            .field("role_id", &self.role_id)
            .field("genre", &self.genre)
            .field("currency_id", &self.currency_id)
            .finish()
    }
}

impl fmt::Debug for ValidatedUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatedUpdate")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &redacted(self.password.as_ref()))
            .field("role_id", &self.role_id)
            .field("genre", &self.genre)
            .field("currency_id", &self.currency_id)
            .finish()
    }
}

/// Maps [`CustomUser`] to and from its external field set.
///
/// Creation goes through [`UserManager::create_user`] so the password is
/// hashed; field assignment alone would store it as-is.
#[derive(Clone, Copy, Debug)]
pub struct CustomUserSerializer {
    manager: UserManager,
}

impl CustomUserSerializer {
    pub fn new(manager: UserManager) -> Self {
        Self { manager }
    }

    pub fn to_representation(user: &CustomUser) -> UserRepresentation {
        UserRepresentation::from(user)
    }

    pub fn validate(input: UserInput) -> Result<ValidatedUser, SerializerError> {
        input.validate()?;
        let UserInput {
            role_id,
            username,
            email,
            password,
            genre,
            currency_id,
        } = input;

        // `required` has already rejected missing values.
        Ok(ValidatedUser {
            username: username.unwrap_or_default(),
            email: email.unwrap_or_default(),
            password: password.unwrap_or_default(),
            role_id,
            genre,
            currency_id,
        })
    }

    pub fn validate_update(input: UserUpdateInput) -> Result<ValidatedUpdate, SerializerError> {
        input.validate()?;
        let UserUpdateInput {
            role_id,
            username,
            email,
            password,
            genre,
            currency_id,
        } = input;

        Ok(ValidatedUpdate {
            username: username.unwrap_or_default(),
            email: email.unwrap_or_default(),
            password,
            role_id,
            genre,
            currency_id,
        })
    }

    #[instrument(skip(self, db))]
    pub async fn create<C: ConnectionTrait>(
        &self,
        db: &C,
        validated: ValidatedUser,
    ) -> Result<CustomUser, SerializerError> {
        trace!("Routing user creation through UserManager::create_user");
        let new_user = NewUser {
            username: validated.username,
            email: validated.email,
            password: Some(validated.password),
            role_id: validated.role_id,
            genre: validated.genre,
            currency_id: validated.currency_id,
        };
        Ok(self.manager.create_user(db, new_user).await?)
    }

    #[instrument(skip(self, db))]
    pub async fn update<C: ConnectionTrait>(
        &self,
        db: &C,
        mut instance: CustomUser,
        validated: ValidatedUpdate,
    ) -> Result<CustomUser, SerializerError> {
        debug!("Replacing fields of user {}", instance.id());
        {
            let account = instance.account_mut();
            account.username = validated.username;
            account.email = normalize_email(&validated.email);
        }
        instance.role_id = validated.role_id;
        instance.genre = validated.genre;
        instance.currency_id = validated.currency_id;

        if let Some(raw) = validated.password.as_deref() {
            debug!("Re-hashing password for user {}", instance.id());
            instance.set_password(self.manager.hasher(), raw)?;
        }

        Ok(self.manager.save(db, &instance).await?)
    }

    /// Validate then create, in one step.
    pub async fn save<C: ConnectionTrait>(&self, db: &C, input: UserInput) -> Result<CustomUser, SerializerError> {
        let validated = Self::validate(input)?;
        self.create(db, validated).await
    }
}
