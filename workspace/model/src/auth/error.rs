use thiserror::Error;

/// Errors raised by the base account concept.
#[derive(Error, Debug)]
pub enum AuthError {
    /// A field the manager requires was missing or malformed
    #[error("Invalid {field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    /// The username collides with an existing account
    #[error("A user with username '{0}' already exists")]
    UsernameTaken(String),

    /// The row being saved no longer exists
    #[error("User {0} not found")]
    UserNotFound(i32),

    /// bcrypt failed to produce a hash
    #[error("Password hashing error: {0}")]
    Hashing(#[from] bcrypt::BcryptError),

    /// Error from the database operations
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

/// Type alias for Result with AuthError
pub type Result<T> = std::result::Result<T, AuthError>;
