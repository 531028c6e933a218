//! Category repository
//!
//! CRUD plus name lookup and the per-category news counts used by listing
//! screens. Category names are unique at the store level; a duplicate name
//! surfaces as a constraint error from `create`.

use crate::db::repositories::CrudRepository;
use crate::models::{Category, CategoryWithCount, CreateCategoryInput, UpdateCategoryInput};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;

/// Category repository trait
#[async_trait]
pub trait CategoryRepository:
    CrudRepository<Entity = Category, CreateInput = CreateCategoryInput, UpdateInput = UpdateCategoryInput>
{
    /// Look up a category by its unique name (exact match)
    async fn get_by_name(&self, name: &str) -> Result<Option<Category>>;

    /// List categories with how many news items carry each, name ascending.
    /// Categories with no news appear with a count of 0.
    async fn list_with_news_counts(&self, skip: i64, limit: i64) -> Result<Vec<CategoryWithCount>>;

    /// Total number of categories
    async fn count(&self) -> Result<i64>;
}

/// SQLx-based category repository implementation
pub struct SqlxCategoryRepository {
    pool: SqlitePool,
}

impl SqlxCategoryRepository {
    /// Create a new SQLx category repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: SqlitePool) -> Arc<dyn CategoryRepository> {
        Arc::new(Self::new(pool))
    }
}

const CATEGORY_COLUMNS: &str = "id, name, description, created_at";

#[async_trait]
impl CrudRepository for SqlxCategoryRepository {
    type Entity = Category;
    type CreateInput = CreateCategoryInput;
    type UpdateInput = UpdateCategoryInput;

    async fn get(&self, id: i64) -> Result<Option<Category>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM categories WHERE id = ?",
            CATEGORY_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get category by ID")?;

        row.map(|r| row_to_category(&r)).transpose()
    }

    async fn get_multi(&self, skip: i64, limit: i64) -> Result<Vec<Category>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM categories ORDER BY id LIMIT ? OFFSET ?",
            CATEGORY_COLUMNS
        ))
        .bind(limit)
        .bind(skip)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list categories")?;

        rows.iter().map(row_to_category).collect()
    }

    async fn create(&self, input: &CreateCategoryInput) -> Result<Category> {
        let now = Utc::now();

        let result = sqlx::query(
            "INSERT INTO categories (name, description, created_at) VALUES (?, ?, ?)",
        )
        .bind(&input.name)
        .bind(&input.description)
        .bind(now)
        .execute(&self.pool)
        .await
        .context("Failed to create category")?;

        let id = result.last_insert_rowid();

        self.get(id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Category not found after creation"))
    }

    async fn update(&self, target: &Category, input: &UpdateCategoryInput) -> Result<Category> {
        let new_name = input.name.as_ref().unwrap_or(&target.name);
        let new_description = input
            .description
            .clone()
            .or_else(|| target.description.clone());

        sqlx::query("UPDATE categories SET name = ?, description = ? WHERE id = ?")
            .bind(new_name)
            .bind(&new_description)
            .bind(target.id)
            .execute(&self.pool)
            .await
            .context("Failed to update category")?;

        self.get(target.id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Category not found after update"))
    }

    async fn remove(&self, id: i64) -> Result<Option<Category>> {
        let existing = match self.get(id).await? {
            Some(category) => category,
            None => return Ok(None),
        };

        // Association rows go with it via ON DELETE CASCADE; news rows stay
        sqlx::query("DELETE FROM categories WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete category")?;

        Ok(Some(existing))
    }
}

#[async_trait]
impl CategoryRepository for SqlxCategoryRepository {
    async fn get_by_name(&self, name: &str) -> Result<Option<Category>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM categories WHERE name = ?",
            CATEGORY_COLUMNS
        ))
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get category by name")?;

        row.map(|r| row_to_category(&r)).transpose()
    }

    async fn list_with_news_counts(&self, skip: i64, limit: i64) -> Result<Vec<CategoryWithCount>> {
        let rows = sqlx::query(
            r#"
            SELECT c.id, c.name, c.description, c.created_at,
                   COUNT(nc.news_id) as news_count
            FROM categories c
            LEFT JOIN news_categories nc ON c.id = nc.category_id
            GROUP BY c.id
            ORDER BY c.name
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(limit)
        .bind(skip)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list categories with counts")?;

        rows.iter()
            .map(|row| {
                Ok(CategoryWithCount {
                    category: row_to_category(row)?,
                    news_count: row.get("news_count"),
                })
            })
            .collect()
    }

    async fn count(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM categories")
            .fetch_one(&self.pool)
            .await
            .context("Failed to count categories")?;

        Ok(row.get("count"))
    }
}

fn row_to_category(row: &sqlx::sqlite::SqliteRow) -> Result<Category> {
    Ok(Category {
        id: row.get("id"),
        name: row.get("name"),
        description: row.get("description"),
        created_at: row.get("created_at"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, migrations};

    async fn setup_test_repo() -> (SqlitePool, SqlxCategoryRepository) {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        (pool.clone(), SqlxCategoryRepository::new(pool))
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let (_pool, repo) = setup_test_repo().await;

        let created = repo
            .create(&CreateCategoryInput::new("politics").with_description("Political coverage"))
            .await
            .expect("Failed to create category");

        assert!(created.id > 0);
        assert_eq!(created.name, "politics");
        assert_eq!(created.description.as_deref(), Some("Political coverage"));

        let fetched = repo
            .get(created.id)
            .await
            .expect("Failed to get category")
            .expect("Category should exist");
        assert_eq!(fetched.name, "politics");
    }

    #[tokio::test]
    async fn test_duplicate_name_rejected() {
        let (_pool, repo) = setup_test_repo().await;

        repo.create(&CreateCategoryInput::new("tech"))
            .await
            .expect("Failed to create category");

        let result = repo.create(&CreateCategoryInput::new("tech")).await;
        assert!(result.is_err(), "duplicate name must violate the unique constraint");
    }

    #[tokio::test]
    async fn test_get_by_name_exact_match() {
        let (_pool, repo) = setup_test_repo().await;

        repo.create(&CreateCategoryInput::new("science"))
            .await
            .expect("Failed to create category");

        let found = repo
            .get_by_name("science")
            .await
            .expect("Failed to get by name");
        assert!(found.is_some());

        let missing = repo
            .get_by_name("scien")
            .await
            .expect("Failed to get by name");
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_update_partial() {
        let (_pool, repo) = setup_test_repo().await;

        let created = repo
            .create(&CreateCategoryInput::new("sprots").with_description("Games"))
            .await
            .expect("Failed to create category");

        let updated = repo
            .update(&created, &UpdateCategoryInput::new().with_name("sports".to_string()))
            .await
            .expect("Failed to update category");

        assert_eq!(updated.name, "sports");
        assert_eq!(updated.description.as_deref(), Some("Games")); // Untouched
    }

    #[tokio::test]
    async fn test_list_with_news_counts() {
        let (pool, repo) = setup_test_repo().await;

        let busy = repo
            .create(&CreateCategoryInput::new("busy"))
            .await
            .expect("Failed to create category");
        let quiet = repo
            .create(&CreateCategoryInput::new("quiet"))
            .await
            .expect("Failed to create category");

        let author = sqlx::query("INSERT INTO users (email, name, password_hash) VALUES ('a@x.com', 'a', 'h')")
            .execute(&pool)
            .await
            .expect("Failed to create user")
            .last_insert_rowid();
        for i in 0..2 {
            let news = sqlx::query(
                "INSERT INTO news (title, content, author_id) VALUES (?, 'c', ?)",
            )
            .bind(format!("n{}", i))
            .bind(author)
            .execute(&pool)
            .await
            .expect("Failed to create news")
            .last_insert_rowid();
            sqlx::query("INSERT INTO news_categories (news_id, category_id) VALUES (?, ?)")
                .bind(news)
                .bind(busy.id)
                .execute(&pool)
                .await
                .expect("Failed to attach category");
        }

        let listed = repo
            .list_with_news_counts(0, 10)
            .await
            .expect("Failed to list with counts");

        assert_eq!(listed.len(), 2);
        // Name ascending: busy before quiet
        assert_eq!(listed[0].category.id, busy.id);
        assert_eq!(listed[0].news_count, 2);
        assert_eq!(listed[1].category.id, quiet.id);
        assert_eq!(listed[1].news_count, 0);
    }

    #[tokio::test]
    async fn test_remove_returns_prior_state() {
        let (_pool, repo) = setup_test_repo().await;

        let created = repo
            .create(&CreateCategoryInput::new("ephemeral"))
            .await
            .expect("Failed to create category");

        let removed = repo
            .remove(created.id)
            .await
            .expect("Failed to remove category")
            .expect("Removed entity should be returned");
        assert_eq!(removed.name, "ephemeral");

        assert!(repo.get(created.id).await.expect("Failed to get").is_none());
        assert!(repo.remove(created.id).await.expect("Failed to remove").is_none());
    }

    #[tokio::test]
    async fn test_count() {
        let (_pool, repo) = setup_test_repo().await;

        assert_eq!(repo.count().await.expect("Failed to count"), 0);
        repo.create(&CreateCategoryInput::new("one"))
            .await
            .expect("Failed to create category");
        repo.create(&CreateCategoryInput::new("two"))
            .await
            .expect("Failed to create category");
        assert_eq!(repo.count().await.expect("Failed to count"), 2);
    }
}
