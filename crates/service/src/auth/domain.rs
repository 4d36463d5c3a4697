use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};

pub type UserId = i32;

/// Registration input
#[derive(Clone, Deserialize)]
pub struct RegisterInput {
    pub username: String,
    pub password: String,
}

/// Login input
#[derive(Clone, Deserialize)]
pub struct LoginInput {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for RegisterInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterInput").field("username", &self.username).field("password", &"<redacted>").finish()
    }
}

impl fmt::Debug for LoginInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginInput").field("username", &self.username).field("password", &"<redacted>").finish()
    }
}

/// Stored user. Hash and salt never leave the process when serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    #[serde(skip_serializing)]
    pub password_salt: String,
    pub created_at: DateTime<Utc>,
}

/// Username comparison rule used for uniqueness and lookup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UsernamePolicy {
    #[default]
    CaseInsensitive,
    CaseSensitive,
}

impl UsernamePolicy {
    /// Normalized key the uniqueness constraint is enforced on.
    pub fn key(&self, username: &str) -> String {
        let trimmed = username.trim();
        match self {
            UsernamePolicy::CaseInsensitive => trimmed.to_lowercase(),
            UsernamePolicy::CaseSensitive => trimmed.to_string(),
        }
    }
}

/// Outcome envelope returned by every auth operation.
///
/// Serializes as `{"data": .., "success": .., "message": ..}`; a failure
/// always carries `data: null`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceResponse<T> {
    Ok(T),
    Err(String),
}

impl<T> ServiceResponse<T> {
    pub fn failure(message: impl Into<String>) -> Self {
        ServiceResponse::Err(message.into())
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ServiceResponse::Ok(_))
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            ServiceResponse::Ok(data) => Some(data),
            ServiceResponse::Err(_) => None,
        }
    }

    /// Failure message; empty on success.
    pub fn message(&self) -> &str {
        match self {
            ServiceResponse::Ok(_) => "",
            ServiceResponse::Err(msg) => msg,
        }
    }

    pub fn into_result(self) -> Result<T, String> {
        match self {
            ServiceResponse::Ok(data) => Ok(data),
            ServiceResponse::Err(msg) => Err(msg),
        }
    }
}

impl<T: Serialize> Serialize for ServiceResponse<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Envelope<'a, T> {
            data: Option<&'a T>,
            success: bool,
            message: &'a str,
        }
        Envelope { data: self.data(), success: self.is_success(), message: self.message() }.serialize(serializer)
    }
}
