use thiserror::Error;

use models::errors::ModelError;

/// Business errors for auth workflows.
///
/// The first four kinds are expected outcomes and end up as a failed
/// envelope; `Hash` and `StorageUnavailable` are propagated to the caller.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{0}")]
    Validation(String),
    #[error("Username already exists")]
    DuplicateUsername,
    #[error("User not found")]
    NotFound,
    #[error("Wrong password")]
    WrongPassword,
    #[error("hashing error: {0}")]
    Hash(String),
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),
}

impl AuthError {
    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            AuthError::Validation(_) => 1001,
            AuthError::DuplicateUsername => 1002,
            AuthError::NotFound => 1003,
            AuthError::WrongPassword => 1004,
            AuthError::Hash(_) => 1101,
            AuthError::StorageUnavailable(_) => 1200,
        }
    }

    /// Whether the error is a routine outcome to report inside the envelope.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            AuthError::Validation(_) | AuthError::DuplicateUsername | AuthError::NotFound | AuthError::WrongPassword
        )
    }
}

impl From<ModelError> for AuthError {
    fn from(e: ModelError) -> Self {
        match e {
            ModelError::Duplicate(_) => AuthError::DuplicateUsername,
            ModelError::Validation(msg) => AuthError::Validation(msg),
            ModelError::Db(msg) => AuthError::StorageUnavailable(msg),
        }
    }
}
