//! User repository
//!
//! Database operations for user accounts: the generic CRUD contract plus
//! email lookup and name/email search.

use crate::db::repositories::CrudRepository;
use crate::models::{CreateUserRecord, UpdateUserRecord, User};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;

/// User repository trait
#[async_trait]
pub trait UserRepository:
    CrudRepository<Entity = User, CreateInput = CreateUserRecord, UpdateInput = UpdateUserRecord>
{
    /// Exact-match lookup on the unique email column
    async fn get_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Case-insensitive substring search over name and email, paginated
    async fn search(&self, term: &str, skip: i64, limit: i64) -> Result<Vec<User>>;

    /// Count all users
    async fn count(&self) -> Result<i64>;
}

/// SQLx-based user repository implementation
pub struct SqlxUserRepository {
    pool: SqlitePool,
}

impl SqlxUserRepository {
    /// Create a new SQLx user repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: SqlitePool) -> Arc<dyn UserRepository> {
        Arc::new(Self::new(pool))
    }
}

const USER_COLUMNS: &str =
    "id, email, name, password_hash, is_active, is_superuser, created_at, updated_at";

#[async_trait]
impl CrudRepository for SqlxUserRepository {
    type Entity = User;
    type CreateInput = CreateUserRecord;
    type UpdateInput = UpdateUserRecord;

    async fn get(&self, id: i64) -> Result<Option<User>> {
        let row = sqlx::query(&format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to get user by ID")?;

        row.map(|r| row_to_user(&r)).transpose()
    }

    async fn get_multi(&self, skip: i64, limit: i64) -> Result<Vec<User>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM users ORDER BY id LIMIT ? OFFSET ?",
            USER_COLUMNS
        ))
        .bind(limit)
        .bind(skip)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list users")?;

        rows.iter().map(row_to_user).collect()
    }

    async fn create(&self, input: &CreateUserRecord) -> Result<User> {
        let now = Utc::now();

        // is_active/is_superuser are hard-coded: registration cannot
        // self-elevate regardless of caller-supplied flags.
        let result = sqlx::query(
            r#"
            INSERT INTO users (email, name, password_hash, is_active, is_superuser, created_at, updated_at)
            VALUES (?, ?, ?, 1, 0, ?, ?)
            "#,
        )
        .bind(&input.email)
        .bind(&input.name)
        .bind(&input.password_hash)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .context("Failed to create user")?;

        let id = result.last_insert_rowid();

        self.get(id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("User not found after creation"))
    }

    async fn update(&self, target: &User, input: &UpdateUserRecord) -> Result<User> {
        let now = Utc::now();
        let new_email = input.email.as_ref().unwrap_or(&target.email);
        let new_name = input.name.as_ref().unwrap_or(&target.name);
        let new_password_hash = input
            .password_hash
            .as_ref()
            .unwrap_or(&target.password_hash);
        let new_is_active = input.is_active.unwrap_or(target.is_active);
        let new_is_superuser = input.is_superuser.unwrap_or(target.is_superuser);

        sqlx::query(
            r#"
            UPDATE users
            SET email = ?, name = ?, password_hash = ?, is_active = ?, is_superuser = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(new_email)
        .bind(new_name)
        .bind(new_password_hash)
        .bind(new_is_active)
        .bind(new_is_superuser)
        .bind(now)
        .bind(target.id)
        .execute(&self.pool)
        .await
        .context("Failed to update user")?;

        self.get(target.id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("User not found after update"))
    }

    async fn remove(&self, id: i64) -> Result<Option<User>> {
        let existing = match self.get(id).await? {
            Some(user) => user,
            None => return Ok(None),
        };

        sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete user")?;

        Ok(Some(existing))
    }
}

#[async_trait]
impl UserRepository for SqlxUserRepository {
    async fn get_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM users WHERE email = ?",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get user by email")?;

        row.map(|r| row_to_user(&r)).transpose()
    }

    async fn search(&self, term: &str, skip: i64, limit: i64) -> Result<Vec<User>> {
        let pattern = format!("%{}%", term);

        let rows = sqlx::query(&format!(
            "SELECT {} FROM users WHERE name LIKE ? OR email LIKE ? ORDER BY id LIMIT ? OFFSET ?",
            USER_COLUMNS
        ))
        .bind(&pattern)
        .bind(&pattern)
        .bind(limit)
        .bind(skip)
        .fetch_all(&self.pool)
        .await
        .context("Failed to search users")?;

        rows.iter().map(row_to_user).collect()
    }

    async fn count(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM users")
            .fetch_one(&self.pool)
            .await
            .context("Failed to count users")?;

        Ok(row.get("count"))
    }
}

fn row_to_user(row: &sqlx::sqlite::SqliteRow) -> Result<User> {
    Ok(User {
        id: row.get("id"),
        email: row.get("email"),
        name: row.get("name"),
        password_hash: row.get("password_hash"),
        is_active: row.get("is_active"),
        is_superuser: row.get("is_superuser"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, migrations};

    async fn setup_test_repo() -> SqlxUserRepository {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        SqlxUserRepository::new(pool)
    }

    fn record(email: &str, name: &str) -> CreateUserRecord {
        CreateUserRecord {
            email: email.to_string(),
            name: name.to_string(),
            password_hash: "$argon2id$fake-hash".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_user() {
        let repo = setup_test_repo().await;

        let created = repo
            .create(&record("a@x.com", "Alice"))
            .await
            .expect("Failed to create user");

        assert!(created.id > 0);
        assert_eq!(created.email, "a@x.com");
        assert_eq!(created.name, "Alice");
        assert!(created.is_active);
        assert!(!created.is_superuser);
    }

    #[tokio::test]
    async fn test_create_duplicate_email_fails() {
        let repo = setup_test_repo().await;

        repo.create(&record("a@x.com", "Alice"))
            .await
            .expect("Failed to create user");

        let result = repo.create(&record("a@x.com", "Other")).await;
        assert!(result.is_err(), "duplicate email must surface as an error");
    }

    #[tokio::test]
    async fn test_get_not_found() {
        let repo = setup_test_repo().await;

        let found = repo.get(99999).await.expect("Failed to get user");
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_get_by_email() {
        let repo = setup_test_repo().await;
        repo.create(&record("find-me@x.com", "Findable"))
            .await
            .expect("Failed to create user");

        let found = repo
            .get_by_email("find-me@x.com")
            .await
            .expect("Failed to get by email")
            .expect("User not found");
        assert_eq!(found.name, "Findable");

        let missing = repo
            .get_by_email("nobody@x.com")
            .await
            .expect("Failed to get by email");
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_get_multi_pagination() {
        let repo = setup_test_repo().await;
        for i in 1..=5 {
            repo.create(&record(&format!("u{}@x.com", i), &format!("User {}", i)))
                .await
                .expect("Failed to create user");
        }

        let page1 = repo.get_multi(0, 2).await.expect("Failed to list");
        let page2 = repo.get_multi(2, 2).await.expect("Failed to list");
        let page3 = repo.get_multi(4, 2).await.expect("Failed to list");

        assert_eq!(page1.len(), 2);
        assert_eq!(page2.len(), 2);
        assert_eq!(page3.len(), 1);
        // Stable ascending order by primary key
        assert!(page1[0].id < page1[1].id);
        assert!(page1[1].id < page2[0].id);
    }

    #[tokio::test]
    async fn test_get_multi_zero_limit() {
        let repo = setup_test_repo().await;
        repo.create(&record("a@x.com", "Alice"))
            .await
            .expect("Failed to create user");

        let empty = repo.get_multi(0, 0).await.expect("Failed to list");
        assert!(empty.is_empty());
    }

    #[tokio::test]
    async fn test_update_partial() {
        let repo = setup_test_repo().await;
        let created = repo
            .create(&record("a@x.com", "Alice"))
            .await
            .expect("Failed to create user");

        let updated = repo
            .update(
                &created,
                &UpdateUserRecord::new().with_name("Alicia".to_string()),
            )
            .await
            .expect("Failed to update user");

        assert_eq!(updated.name, "Alicia");
        assert_eq!(updated.email, "a@x.com"); // Unchanged
        assert_eq!(updated.password_hash, created.password_hash);
        assert!(updated.updated_at >= created.updated_at);
    }

    #[tokio::test]
    async fn test_update_flags() {
        let repo = setup_test_repo().await;
        let created = repo
            .create(&record("a@x.com", "Alice"))
            .await
            .expect("Failed to create user");

        let updated = repo
            .update(
                &created,
                &UpdateUserRecord::new()
                    .with_is_active(false)
                    .with_is_superuser(true),
            )
            .await
            .expect("Failed to update user");

        assert!(!updated.is_active);
        assert!(updated.is_superuser);
    }

    #[tokio::test]
    async fn test_remove_returns_prior_entity() {
        let repo = setup_test_repo().await;
        let created = repo
            .create(&record("gone@x.com", "Gone"))
            .await
            .expect("Failed to create user");

        let removed = repo
            .remove(created.id)
            .await
            .expect("Failed to remove user")
            .expect("Removed entity should be returned");
        assert_eq!(removed.email, "gone@x.com");

        assert!(repo.get(created.id).await.expect("Failed to get").is_none());
    }

    #[tokio::test]
    async fn test_remove_not_found() {
        let repo = setup_test_repo().await;

        let removed = repo.remove(12345).await.expect("Failed to remove");
        assert!(removed.is_none());
    }

    #[tokio::test]
    async fn test_search_matches_name_or_email() {
        let repo = setup_test_repo().await;
        repo.create(&record("alice@wonder.org", "Alice"))
            .await
            .expect("Failed to create user");
        repo.create(&record("bob@x.com", "Bob Wonder"))
            .await
            .expect("Failed to create user");
        repo.create(&record("carol@x.com", "Carol"))
            .await
            .expect("Failed to create user");

        let hits = repo.search("wonder", 0, 10).await.expect("Failed to search");
        assert_eq!(hits.len(), 2);

        // Case-insensitive
        let hits = repo.search("WONDER", 0, 10).await.expect("Failed to search");
        assert_eq!(hits.len(), 2);

        let none = repo.search("zzz", 0, 10).await.expect("Failed to search");
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_count() {
        let repo = setup_test_repo().await;
        assert_eq!(repo.count().await.expect("Failed to count"), 0);

        repo.create(&record("a@x.com", "A"))
            .await
            .expect("Failed to create user");
        repo.create(&record("b@x.com", "B"))
            .await
            .expect("Failed to create user");

        assert_eq!(repo.count().await.expect("Failed to count"), 2);
    }
}
