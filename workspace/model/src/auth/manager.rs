use std::fmt;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, SqlErr,
};
use tracing::{debug, error, info, instrument, trace, warn};

use super::account::Account;
use super::error::{AuthError, Result};
use super::password::{PasswordHash, PasswordHasher};
use crate::entities::user;
use crate::users::{CustomUser, GENRE_MAX_LENGTH};

/// Field values for a user that does not exist yet.
#[derive(Clone, Default)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    /// Raw password. `None` stores an unusable credential.
    pub password: Option<String>,
    pub role_id: Option<i32>,
    pub genre: Option<String>,
    pub currency_id: Option<i32>,
}

impl fmt::Debug for NewUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewUser")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "**redacted**"))
            .field("role_id", &self.role_id)
            .field("genre", &self.genre)
            .field("currency_id", &self.currency_id)
            .finish()
    }
}

/// Lowercase the domain part of an email address and trim surrounding whitespace.
pub fn normalize_email(email: &str) -> String {
    let email = email.trim();
    match email.rsplit_once('@') {
        Some((local, domain)) => format!("{}@{}", local, domain.to_lowercase()),
        None => email.to_string(),
    }
}

/// Creation routines and lookups for [`CustomUser`] rows.
///
/// `create_user` is the only path that turns a raw password into a stored
/// credential; callers should never assign the password column themselves.
#[derive(Clone, Copy, Debug, Default)]
pub struct UserManager {
    hasher: PasswordHasher,
}

impl UserManager {
    pub fn new(hasher: PasswordHasher) -> Self {
        Self { hasher }
    }

    pub fn hasher(&self) -> &PasswordHasher {
        &self.hasher
    }

    #[instrument(skip(self, db))]
    pub async fn create_user<C: ConnectionTrait>(&self, db: &C, new_user: NewUser) -> Result<CustomUser> {
        self.create(db, new_user, false).await
    }

    #[instrument(skip(self, db))]
    pub async fn create_superuser<C: ConnectionTrait>(&self, db: &C, new_user: NewUser) -> Result<CustomUser> {
        self.create(db, new_user, true).await
    }

    async fn create<C: ConnectionTrait>(&self, db: &C, new_user: NewUser, superuser: bool) -> Result<CustomUser> {
        trace!("Entering UserManager::create");
        if new_user.username.is_empty() {
            warn!("Rejected user creation without a username");
            return Err(AuthError::Validation {
                field: "username",
                message: "The given username must be set".to_string(),
            });
        }
        check_genre(new_user.genre.as_deref())?;

        let password = match new_user.password.as_deref() {
            Some(raw) => self.hasher.hash(raw)?,
            None => {
                debug!("No password supplied for '{}', storing unusable credential", new_user.username);
                PasswordHash::unusable()
            }
        };

        let mut account = Account::new(new_user.username, normalize_email(&new_user.email), password);
        account.is_staff = superuser;
        account.is_superuser = superuser;

        let mut user = CustomUser::new(account);
        user.role_id = new_user.role_id;
        user.genre = new_user.genre;
        user.currency_id = new_user.currency_id;

        trace!("Attempting to insert new user into database");
        let model = user
            .to_active_model()
            .insert(db)
            .await
            .map_err(|e| map_write_error(e, user.username()))?;

        info!("User created successfully with ID: {}, username: {}", model.id, model.username);
        Ok(CustomUser::from(model))
    }

    pub async fn get<C: ConnectionTrait>(&self, db: &C, id: i32) -> Result<Option<CustomUser>> {
        let found = user::Entity::find_by_id(id).one(db).await?;
        Ok(found.map(CustomUser::from))
    }

    pub async fn get_by_username<C: ConnectionTrait>(&self, db: &C, username: &str) -> Result<Option<CustomUser>> {
        let found = user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(db)
            .await?;
        Ok(found.map(CustomUser::from))
    }

    /// One page of users ordered by id. `page` starts at 1.
    pub async fn list<C: ConnectionTrait>(&self, db: &C, page: u64, limit: u64) -> Result<Vec<CustomUser>> {
        debug!("Fetching users - page: {}, limit: {}", page, limit);
        let users = user::Entity::find()
            .order_by_asc(user::Column::Id)
            .paginate(db, limit.max(1))
            .fetch_page(page.saturating_sub(1))
            .await?;
        Ok(users.into_iter().map(CustomUser::from).collect())
    }

    pub async fn count<C: ConnectionTrait>(&self, db: &C) -> Result<u64> {
        Ok(user::Entity::find().count(db).await?)
    }

    /// Write every column of an existing user back to storage.
    #[instrument(skip(self, db))]
    pub async fn save<C: ConnectionTrait>(&self, db: &C, user: &CustomUser) -> Result<CustomUser> {
        if user.id() == 0 {
            return Err(AuthError::Validation {
                field: "id",
                message: "User has not been persisted yet".to_string(),
            });
        }
        check_genre(user.genre.as_deref())?;

        let model = user
            .to_active_model()
            .update(db)
            .await
            .map_err(|e| match e {
                DbErr::RecordNotUpdated => AuthError::UserNotFound(user.id()),
                other => map_write_error(other, user.username()),
            })?;

        info!("User with ID {} saved", model.id);
        Ok(CustomUser::from(model))
    }

    /// Returns `false` when no row had the given id.
    pub async fn delete<C: ConnectionTrait>(&self, db: &C, id: i32) -> Result<bool> {
        let result = user::Entity::delete_by_id(id).exec(db).await?;
        debug!("Delete operation completed. Rows affected: {}", result.rows_affected);
        Ok(result.rows_affected > 0)
    }
}

fn check_genre(genre: Option<&str>) -> Result<()> {
    match genre {
        Some(genre) if genre.chars().count() > GENRE_MAX_LENGTH => Err(AuthError::Validation {
            field: "genre",
            message: format!("Ensure this field has no more than {} characters", GENRE_MAX_LENGTH),
        }),
        _ => Ok(()),
    }
}

fn map_write_error(err: DbErr, username: &str) -> AuthError {
    let username_violation = match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(message)) => message.contains("username"),
        _ => false,
    };
    if username_violation {
        warn!("Username '{}' already exists", username);
        AuthError::UsernameTaken(username.to_string())
    } else {
        error!("Failed to write user '{}': {}", username, err);
        AuthError::Database(err)
    }
}
