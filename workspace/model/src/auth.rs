//! The base account concept: identity, credentials and the creation routines
//! every user type goes through.

pub mod account;
pub mod error;
pub mod manager;
pub mod password;

pub use account::Account;
pub use error::{AuthError, Result};
pub use manager::{normalize_email, NewUser, UserManager};
pub use password::{PasswordHash, PasswordHasher, MAX_PASSWORD_BYTES, UNUSABLE_PASSWORD_PREFIX};
