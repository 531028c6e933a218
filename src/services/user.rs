//! User service
//!
//! Account management and credential checks. Plaintext passwords stop here:
//! the service hashes them with Argon2id before anything reaches the
//! repository, and authentication failures are reported uniformly so a
//! caller cannot tell an unknown email from a wrong password.

use crate::db::is_unique_violation;
use crate::db::repositories::{CrudRepository, UserRepository};
use crate::models::{CreateUserRecord, UpdateUserRecord, User};
use crate::services::password::{hash_password, verify_password};
use anyhow::{Context, Result};
use std::sync::Arc;

/// Error types for user service operations
#[derive(Debug, thiserror::Error)]
pub enum UserServiceError {
    /// Credentials did not match an account. Deliberately carries no detail
    /// about which part failed.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Email is already registered
    #[error("Email '{0}' is already registered")]
    EmailExists(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Input for creating a user account. The password is plaintext; the
/// service hashes it before storage.
#[derive(Debug, Clone)]
pub struct CreateUserInput {
    pub email: String,
    pub name: String,
    pub password: String,
}

impl CreateUserInput {
    pub fn new(
        email: impl Into<String>,
        name: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            name: name.into(),
            password: password.into(),
        }
    }
}

/// Input for a partial account update. A supplied password is plaintext and
/// gets rehashed; flags may only be changed through this path, never at
/// registration.
#[derive(Debug, Clone, Default)]
pub struct UpdateUserInput {
    pub email: Option<String>,
    pub name: Option<String>,
    pub password: Option<String>,
    pub is_active: Option<bool>,
    pub is_superuser: Option<bool>,
}

impl UpdateUserInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_email(mut self, email: String) -> Self {
        self.email = Some(email);
        self
    }

    pub fn with_name(mut self, name: String) -> Self {
        self.name = Some(name);
        self
    }

    pub fn with_password(mut self, password: String) -> Self {
        self.password = Some(password);
        self
    }

    pub fn with_is_active(mut self, is_active: bool) -> Self {
        self.is_active = Some(is_active);
        self
    }

    pub fn with_is_superuser(mut self, is_superuser: bool) -> Self {
        self.is_superuser = Some(is_superuser);
        self
    }
}

/// User service for account management and authentication
pub struct UserService {
    user_repo: Arc<dyn UserRepository>,
}

impl UserService {
    /// Create a new user service with the given repository
    pub fn new(user_repo: Arc<dyn UserRepository>) -> Self {
        Self { user_repo }
    }

    /// Register a new user.
    ///
    /// The password is hashed before storage, and the account always starts
    /// active and non-superuser. Input shape (email syntax, required fields)
    /// is the caller's responsibility.
    ///
    /// # Errors
    ///
    /// - `EmailExists` if the email is already registered, mapped from the
    ///   store's unique constraint so concurrent registrations race safely
    /// - `InternalError` for other database errors
    pub async fn create(&self, input: CreateUserInput) -> Result<User, UserServiceError> {
        let password_hash = hash_password(&input.password).context("Failed to hash password")?;

        let record = CreateUserRecord {
            email: input.email,
            name: input.name,
            password_hash,
        };

        let created = match self.user_repo.create(&record).await {
            Ok(user) => user,
            Err(e) if is_unique_violation(&e) => {
                return Err(UserServiceError::EmailExists(record.email));
            }
            Err(e) => return Err(UserServiceError::InternalError(e)),
        };

        tracing::info!(user_id = created.id, "User registered");

        Ok(created)
    }

    /// Get a user by ID
    pub async fn get(&self, id: i64) -> Result<Option<User>, UserServiceError> {
        let user = self
            .user_repo
            .get(id)
            .await
            .context("Failed to get user by ID")?;

        Ok(user)
    }

    /// Get a user by email (exact match)
    pub async fn get_by_email(&self, email: &str) -> Result<Option<User>, UserServiceError> {
        let user = self
            .user_repo
            .get_by_email(email)
            .await
            .context("Failed to get user by email")?;

        Ok(user)
    }

    /// List users, primary key ascending
    pub async fn get_multi(&self, skip: i64, limit: i64) -> Result<Vec<User>, UserServiceError> {
        let users = self
            .user_repo
            .get_multi(skip, limit)
            .await
            .context("Failed to list users")?;

        Ok(users)
    }

    /// Apply a partial update to `target`.
    ///
    /// A supplied plaintext password is rehashed; the stored hash is never
    /// overwritten with plaintext.
    pub async fn update(
        &self,
        target: &User,
        input: UpdateUserInput,
    ) -> Result<User, UserServiceError> {
        let mut record = UpdateUserRecord {
            email: input.email,
            name: input.name,
            password_hash: None,
            is_active: input.is_active,
            is_superuser: input.is_superuser,
        };

        if let Some(password) = input.password {
            record.password_hash =
                Some(hash_password(&password).context("Failed to hash password")?);
        }

        let updated = self
            .user_repo
            .update(target, &record)
            .await
            .context("Failed to update user")?;

        Ok(updated)
    }

    /// Delete a user by id, returning the account as it existed
    pub async fn remove(&self, id: i64) -> Result<Option<User>, UserServiceError> {
        let removed = self
            .user_repo
            .remove(id)
            .await
            .context("Failed to delete user")?;

        Ok(removed)
    }

    /// Authenticate by email and password.
    ///
    /// Activation is not part of the credential decision: the user is
    /// returned regardless of `is_active`, and callers authorize with the
    /// flag projections.
    ///
    /// # Errors
    ///
    /// `InvalidCredentials` for an unknown email or a wrong password; the
    /// two cases are indistinguishable to the caller.
    pub async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<User, UserServiceError> {
        let user = match self
            .user_repo
            .get_by_email(email)
            .await
            .context("Failed to get user by email")?
        {
            Some(user) => user,
            None => {
                tracing::debug!("Authentication failed");
                return Err(UserServiceError::InvalidCredentials);
            }
        };

        let password_valid = verify_password(password, &user.password_hash)
            .context("Failed to verify password")?;

        if !password_valid {
            tracing::debug!(user_id = user.id, "Authentication failed");
            return Err(UserServiceError::InvalidCredentials);
        }

        Ok(user)
    }

    /// Whether the account may authenticate
    pub fn is_active(&self, user: &User) -> bool {
        user.is_active
    }

    /// Whether the account has superuser privileges
    pub fn is_superuser(&self, user: &User) -> bool {
        user.is_superuser
    }

    /// Case-insensitive substring search over name and email
    pub async fn search(
        &self,
        term: &str,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<User>, UserServiceError> {
        let users = self
            .user_repo
            .search(term, skip, limit)
            .await
            .context("Failed to search users")?;

        Ok(users)
    }

    /// Count all users
    pub async fn count(&self) -> Result<i64, UserServiceError> {
        let count = self
            .user_repo
            .count()
            .await
            .context("Failed to count users")?;

        Ok(count)
    }
}
