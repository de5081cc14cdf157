use std::fmt;

use tracing::{debug, warn};

use super::error::AuthError;

/// Marker prefix for credentials that can never be verified.
pub const UNUSABLE_PASSWORD_PREFIX: &str = "!";

/// bcrypt only reads this many bytes of input; longer passwords are rejected.
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Hashes raw passwords with bcrypt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    /// Create a hasher with the given bcrypt cost, clamped to the range bcrypt accepts.
    pub fn new(cost: u32) -> Self {
        let clamped = cost.clamp(4, 31);
        if clamped != cost {
            warn!("bcrypt cost {} out of range, using {}", cost, clamped);
        }
        Self { cost: clamped }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    pub fn hash(&self, raw: &str) -> Result<PasswordHash, AuthError> {
        debug!("Hashing password with bcrypt cost {}", self.cost);
        match bcrypt::non_truncating_hash(raw, self.cost) {
            Ok(hashed) => Ok(PasswordHash(hashed)),
            Err(bcrypt::BcryptError::Truncation(len)) => Err(AuthError::Validation {
                field: "password",
                message: format!(
                    "Ensure this field has no more than {} bytes (it has {})",
                    MAX_PASSWORD_BYTES, len
                ),
            }),
            Err(e) => Err(e.into()),
        }
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}

/// Stored credential. Never holds a plaintext password.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// A credential that no password verifies against.
    pub fn unusable() -> Self {
        Self(UNUSABLE_PASSWORD_PREFIX.to_string())
    }

    /// Wrap a value read back from storage.
    pub fn from_stored(value: String) -> Self {
        Self(value)
    }

    pub fn is_usable(&self) -> bool {
        !self.0.starts_with(UNUSABLE_PASSWORD_PREFIX)
    }

    pub fn verify(&self, raw: &str) -> bool {
        if !self.is_usable() {
            return false;
        }
        match bcrypt::non_truncating_verify(raw, &self.0) {
            Ok(matches) => matches,
            Err(bcrypt::BcryptError::Truncation(_)) => false,
            Err(e) => {
                warn!("Stored password hash could not be verified: {}", e);
                false
            }
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

// Keeps hashes out of logs.
impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_usable() {
            f.write_str("PasswordHash(**redacted**)")
        } else {
            f.write_str("PasswordHash(unusable)")
        }
    }
}
