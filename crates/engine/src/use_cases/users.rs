//! User accounts: registration, login and admin management.
//!
//! Passwords are stored as bcrypt hashes. Login failures for unknown users
//! and wrong passwords are indistinguishable to the caller.

use std::sync::Arc;

use curricula_domain::{DomainError, NewUser, User, UserId, UserPatch, UserRole, Username};

use crate::infrastructure::ports::{PasswordError, PasswordHasherPort, RepoError, UserRepo};

#[derive(Debug, thiserror::Error)]
pub enum UserError {
    #[error("{entity_type} not found: {id}")]
    NotFound { entity_type: &'static str, id: String },
    #[error("{0}")]
    InvalidInput(String),
    #[error("Username already exists")]
    UsernameTaken(String),
    #[error("Invalid username or password")]
    InvalidCredentials,
    #[error("Password error: {0}")]
    Password(#[from] PasswordError),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

impl From<DomainError> for UserError {
    fn from(err: DomainError) -> Self {
        UserError::InvalidInput(err.to_string())
    }
}

/// Username, password and optional role as received from a client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub username: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
}

pub struct UserUseCases {
    users: Arc<dyn UserRepo>,
    hasher: Arc<dyn PasswordHasherPort>,
}

impl UserUseCases {
    pub fn new(users: Arc<dyn UserRepo>, hasher: Arc<dyn PasswordHasherPort>) -> Self {
        Self { users, hasher }
    }

    /// Create an account. Serves both self-registration and admin creation.
    pub async fn register(&self, credentials: Credentials) -> Result<User, UserError> {
        let (username, password) = required_credentials(&credentials)?;
        let role = match credentials.role.as_deref() {
            Some(raw) if !raw.trim().is_empty() => raw.parse::<UserRole>()?,
            _ => UserRole::default(),
        };

        if self.users.find_by_username(&username).await?.is_some() {
            return Err(UserError::UsernameTaken(username.to_string()));
        }

        let new_user = NewUser {
            username: username.clone(),
            password_hash: self.hasher.hash(password)?,
            role,
        };

        let user = self
            .users
            .create(&new_user)
            .await?
            .ok_or_else(|| UserError::UsernameTaken(username.to_string()))?;

        tracing::info!(user_id = %user.id, username = %user.username, role = %user.role, "User created");
        Ok(user)
    }

    pub async fn login(&self, credentials: Credentials) -> Result<User, UserError> {
        let (username, password) = required_credentials(&credentials)?;

        let user = self
            .users
            .find_by_username(&username)
            .await?
            .ok_or(UserError::InvalidCredentials)?;

        let hash = user.password_hash.as_deref().ok_or_else(|| {
            PasswordError::MalformedHash("Password hash is missing.".to_string())
        })?;

        if !self.hasher.verify(password, hash)? {
            tracing::info!(username = %username, "Login rejected");
            return Err(UserError::InvalidCredentials);
        }

        Ok(user)
    }

    /// Rename and/or change role. Absent fields keep their value.
    pub async fn update(
        &self,
        id: &UserId,
        username: Option<String>,
        role: Option<String>,
    ) -> Result<User, UserError> {
        let current = self
            .users
            .get(id)
            .await?
            .ok_or_else(|| user_not_found(id))?;

        let username = username
            .filter(|u| !u.trim().is_empty())
            .map(Username::new)
            .transpose()?;
        let role = role
            .filter(|r| !r.trim().is_empty())
            .map(|r| r.parse::<UserRole>())
            .transpose()?;

        if let Some(new_name) = &username {
            if *new_name != current.username {
                if let Some(other) = self.users.find_by_username(new_name).await? {
                    if other.id != current.id {
                        return Err(UserError::UsernameTaken(new_name.to_string()));
                    }
                }
            }
        }

        let patch = UserPatch { username, role };
        if patch == UserPatch::default() {
            return Ok(current);
        }

        // a concurrent rename can still lose to the store's uniqueness constraint
        let updated = match self.users.update(id, &patch).await {
            Err(e) if e.is_constraint_violation() => {
                let name = patch.username.as_ref().map(ToString::to_string);
                return Err(UserError::UsernameTaken(name.unwrap_or_default()));
            }
            result => result?.ok_or_else(|| user_not_found(id))?,
        };
        tracing::info!(user_id = %id, "User updated");
        Ok(updated)
    }

    pub async fn delete(&self, id: &UserId) -> Result<(), UserError> {
        if !self.users.delete(id).await? {
            return Err(user_not_found(id));
        }
        tracing::info!(user_id = %id, "User deleted");
        Ok(())
    }
}

fn required_credentials(credentials: &Credentials) -> Result<(Username, &str), UserError> {
    match (credentials.username.as_deref(), credentials.password.as_deref()) {
        (Some(username), Some(password)) if !username.trim().is_empty() && !password.is_empty() => {
            Ok((Username::new(username)?, password))
        }
        _ => Err(UserError::InvalidInput(
            "Username and password are required".to_string(),
        )),
    }
}

fn user_not_found(id: &UserId) -> UserError {
    UserError::NotFound {
        entity_type: "User",
        id: id.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::{MockPasswordHasherPort, MockUserRepo};

    fn user(id: &str, name: &str, hash: Option<&str>) -> User {
        User {
            id: UserId::new(id).unwrap(),
            username: Username::new(name).unwrap(),
            role: UserRole::User,
            password_hash: hash.map(str::to_string),
        }
    }

    fn credentials(username: &str, password: &str) -> Credentials {
        Credentials {
            username: Some(username.to_string()),
            password: Some(password.to_string()),
            role: None,
        }
    }

    #[tokio::test]
    async fn register_hashes_password_and_defaults_role() {
        let mut users = MockUserRepo::new();
        users.expect_find_by_username().returning(|_| Ok(None));
        users
            .expect_create()
            .withf(|new| new.password_hash == "hashed:secret" && new.role == UserRole::User)
            .returning(|new| Ok(Some(user("4:u:1", new.username.as_str(), Some(new.password_hash.as_str())))));

        let mut hasher = MockPasswordHasherPort::new();
        hasher
            .expect_hash()
            .returning(|p| Ok(format!("hashed:{p}")));

        let use_case = UserUseCases::new(Arc::new(users), Arc::new(hasher));
        let created = use_case.register(credentials("alice", "secret")).await.unwrap();

        assert_eq!(created.username.as_str(), "alice");
    }

    #[tokio::test]
    async fn register_requires_username_and_password() {
        let use_case = UserUseCases::new(
            Arc::new(MockUserRepo::new()),
            Arc::new(MockPasswordHasherPort::new()),
        );

        let err = use_case
            .register(Credentials {
                username: Some("alice".to_string()),
                ..Default::default()
            })
            .await
            .unwrap_err();

        assert!(matches!(err, UserError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn register_rejects_taken_username() {
        let mut users = MockUserRepo::new();
        users
            .expect_find_by_username()
            .returning(|_| Ok(Some(user("4:u:1", "alice", Some("h")))));
        users.expect_create().never();

        let use_case = UserUseCases::new(Arc::new(users), Arc::new(MockPasswordHasherPort::new()));
        let err = use_case.register(credentials("alice", "pw")).await.unwrap_err();

        assert!(matches!(err, UserError::UsernameTaken(name) if name == "alice"));
    }

    #[tokio::test]
    async fn login_with_wrong_password_is_invalid_credentials() {
        let mut users = MockUserRepo::new();
        users
            .expect_find_by_username()
            .returning(|_| Ok(Some(user("4:u:1", "alice", Some("h")))));
        let mut hasher = MockPasswordHasherPort::new();
        hasher.expect_verify().returning(|_, _| Ok(false));

        let use_case = UserUseCases::new(Arc::new(users), Arc::new(hasher));
        let err = use_case.login(credentials("alice", "nope")).await.unwrap_err();

        assert!(matches!(err, UserError::InvalidCredentials));
    }

    #[tokio::test]
    async fn login_for_unknown_user_is_invalid_credentials() {
        let mut users = MockUserRepo::new();
        users.expect_find_by_username().returning(|_| Ok(None));

        let use_case = UserUseCases::new(Arc::new(users), Arc::new(MockPasswordHasherPort::new()));
        let err = use_case.login(credentials("bob", "pw")).await.unwrap_err();

        assert!(matches!(err, UserError::InvalidCredentials));
    }

    #[tokio::test]
    async fn login_without_stored_hash_is_a_password_error() {
        let mut users = MockUserRepo::new();
        users
            .expect_find_by_username()
            .returning(|_| Ok(Some(user("4:u:1", "alice", None))));

        let use_case = UserUseCases::new(Arc::new(users), Arc::new(MockPasswordHasherPort::new()));
        let err = use_case.login(credentials("alice", "pw")).await.unwrap_err();

        assert!(matches!(err, UserError::Password(PasswordError::MalformedHash(_))));
    }

    #[tokio::test]
    async fn rename_rejected_by_store_constraint_is_username_taken() {
        let mut users = MockUserRepo::new();
        users
            .expect_get()
            .returning(|id| Ok(Some(user(id.as_str(), "alice", Some("h")))));
        users.expect_find_by_username().returning(|_| Ok(None));
        users.expect_update().returning(|_, _| {
            Err(RepoError::ConstraintViolation(
                "already exists with label `User` and property `username`".to_string(),
            ))
        });

        let use_case = UserUseCases::new(Arc::new(users), Arc::new(MockPasswordHasherPort::new()));
        let err = use_case
            .update(&UserId::new("4:u:1").unwrap(), Some("bob".to_string()), None)
            .await
            .unwrap_err();

        assert!(matches!(err, UserError::UsernameTaken(name) if name == "bob"));
    }

    #[tokio::test]
    async fn update_missing_user_is_not_found() {
        let mut users = MockUserRepo::new();
        users.expect_get().returning(|_| Ok(None));

        let use_case = UserUseCases::new(Arc::new(users), Arc::new(MockPasswordHasherPort::new()));
        let err = use_case
            .update(&UserId::new("4:u:9").unwrap(), Some("x".to_string()), None)
            .await
            .unwrap_err();

        assert!(matches!(err, UserError::NotFound { entity_type: "User", .. }));
    }

    #[tokio::test]
    async fn update_changes_role() {
        let mut users = MockUserRepo::new();
        users
            .expect_get()
            .returning(|id| Ok(Some(user(id.as_str(), "alice", Some("h")))));
        users
            .expect_update()
            .withf(|_, patch| patch.role == Some(UserRole::Admin) && patch.username.is_none())
            .returning(|id, _| {
                let mut updated = user(id.as_str(), "alice", Some("h"));
                updated.role = UserRole::Admin;
                Ok(Some(updated))
            });

        let use_case = UserUseCases::new(Arc::new(users), Arc::new(MockPasswordHasherPort::new()));
        let updated = use_case
            .update(&UserId::new("4:u:1").unwrap(), None, Some("admin".to_string()))
            .await
            .unwrap();

        assert_eq!(updated.role, UserRole::Admin);
    }

    #[tokio::test]
    async fn delete_missing_user_is_not_found() {
        let mut users = MockUserRepo::new();
        users.expect_delete().returning(|_| Ok(false));

        let use_case = UserUseCases::new(Arc::new(users), Arc::new(MockPasswordHasherPort::new()));
        let err = use_case
            .delete(&UserId::new("4:u:9").unwrap())
            .await
            .unwrap_err();

        assert!(matches!(err, UserError::NotFound { .. }));
    }
}
