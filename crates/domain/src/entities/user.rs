//! User entity - credentials and role.

use crate::error::DomainError;
use crate::ids::UserId;
use crate::value_objects::UserRole;

const MAX_USERNAME_LENGTH: usize = 100;

/// Stored account. `password_hash` is a bcrypt hash and may be missing on
/// records created outside the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub username: Username,
    pub role: UserRole,
    pub password_hash: Option<String>,
}

/// A validated username (non-empty, trimmed, <=100 chars).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Username(String);

impl Username {
    pub fn new(name: impl Into<String>) -> Result<Self, DomainError> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(DomainError::validation("Username cannot be empty"));
        }
        if trimmed.chars().count() > MAX_USERNAME_LENGTH {
            return Err(DomainError::validation(format!(
                "Username cannot exceed {} characters",
                MAX_USERNAME_LENGTH
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Username {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fields for a new account; the password is already hashed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: Username,
    pub password_hash: String,
    pub role: UserRole,
}

/// Partial account update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    pub username: Option<Username>,
    pub role: Option<UserRole>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_is_trimmed_and_bounded() {
        assert_eq!(Username::new("  alice ").unwrap().as_str(), "alice");
        assert!(Username::new("").is_err());
        assert!(Username::new("x".repeat(101)).is_err());
    }
}
