//! User model
//!
//! The User entity plus the repository-facing input shapes. Password hashing
//! happens in the service layer; the repository only ever sees the hash.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User entity representing a registered account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier
    pub id: i64,
    /// Email address (unique, the login key)
    pub email: String,
    /// Display name
    pub name: String,
    /// Password hash (argon2, PHC string)
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Whether the account may authenticate
    pub is_active: bool,
    /// Whether the account has superuser privileges
    pub is_superuser: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// Repository input for inserting a user.
///
/// Carries no active/superuser flags: new rows are always persisted with
/// is_active=true and is_superuser=false, so registration cannot
/// self-elevate.
#[derive(Debug, Clone)]
pub struct CreateUserRecord {
    pub email: String,
    pub name: String,
    /// Already-hashed password
    pub password_hash: String,
}

/// Repository input for a partial user update.
///
/// Only `Some` fields are applied; everything else is left untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateUserRecord {
    pub email: Option<String>,
    pub name: Option<String>,
    /// Already-hashed replacement password
    pub password_hash: Option<String>,
    pub is_active: Option<bool>,
    pub is_superuser: Option<bool>,
}

impl UpdateUserRecord {
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

    pub fn with_password_hash(mut self, password_hash: String) -> Self {
        self.password_hash = Some(password_hash);
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

    /// True when no field would change.
    pub fn is_empty(&self) -> bool {
        self.email.is_none()
            && self.name.is_none()
            && self.password_hash.is_none()
            && self.is_active.is_none()
            && self.is_superuser.is_none()
    }
}
