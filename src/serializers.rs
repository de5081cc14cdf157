pub mod user;

use model::auth::AuthError;
use thiserror::Error;
use validator::ValidationErrors;

/// Failure while turning external input into a persisted entity.
#[derive(Error, Debug)]
pub enum SerializerError {
    /// Field-level validation rejected the input
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    /// The creation or save routine rejected the input
    #[error(transparent)]
    Auth(#[from] AuthError),
}
