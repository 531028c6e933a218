//! Favorite repository
//!
//! Bookmarks linking users to news items. The (user, news) pair is unique;
//! adding the same pair twice surfaces the constraint error to the caller.
//! Favorites are keyed two ways: by surrogate id for generic removal and by
//! the (user, news) pair for the toggle-style flows.

use crate::models::{Favorite, FavoriteWithNews, News};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;

/// Favorite repository trait
#[async_trait]
pub trait FavoriteRepository: Send + Sync {
    /// Record that `user_id` favorited `news_id`. Fails on a duplicate pair
    /// or when either side does not exist.
    async fn add(&self, user_id: i64, news_id: i64) -> Result<Favorite>;

    /// Fetch a favorite by its surrogate id
    async fn get(&self, id: i64) -> Result<Option<Favorite>>;

    /// Look up a favorite by its (user, news) pair
    async fn get_by_user_and_news(&self, user_id: i64, news_id: i64) -> Result<Option<Favorite>>;

    /// Whether `user_id` has favorited `news_id`
    async fn exists(&self, user_id: i64, news_id: i64) -> Result<bool>;

    /// Delete a favorite by surrogate id, returning it as it existed
    async fn remove(&self, id: i64) -> Result<Option<Favorite>>;

    /// Delete a favorite by its (user, news) pair, returning it as it
    /// existed. `Ok(None)` when the pair was not favorited.
    async fn remove_by_user_and_news(
        &self,
        user_id: i64,
        news_id: i64,
    ) -> Result<Option<Favorite>>;

    /// List a user's favorites with the news item attached, most recently
    /// favorited first
    async fn list_by_user(
        &self,
        user_id: i64,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<FavoriteWithNews>>;

    /// Count a user's favorites
    async fn count_by_user(&self, user_id: i64) -> Result<i64>;
}

/// SQLx-based favorite repository implementation
pub struct SqlxFavoriteRepository {
    pool: SqlitePool,
}

impl SqlxFavoriteRepository {
    /// Create a new SQLx favorite repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: SqlitePool) -> Arc<dyn FavoriteRepository> {
        Arc::new(Self::new(pool))
    }
}

const FAVORITE_COLUMNS: &str = "id, user_id, news_id, created_at";

#[async_trait]
impl FavoriteRepository for SqlxFavoriteRepository {
    async fn add(&self, user_id: i64, news_id: i64) -> Result<Favorite> {
        let now = Utc::now();

        let result =
            sqlx::query("INSERT INTO favorites (user_id, news_id, created_at) VALUES (?, ?, ?)")
                .bind(user_id)
                .bind(news_id)
                .bind(now)
                .execute(&self.pool)
                .await
                .context("Failed to add favorite")?;

        let id = result.last_insert_rowid();

        self.get(id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Favorite not found after creation"))
    }

    async fn get(&self, id: i64) -> Result<Option<Favorite>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM favorites WHERE id = ?",
            FAVORITE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get favorite by ID")?;

        row.map(|r| row_to_favorite(&r)).transpose()
    }

    async fn get_by_user_and_news(&self, user_id: i64, news_id: i64) -> Result<Option<Favorite>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM favorites WHERE user_id = ? AND news_id = ?",
            FAVORITE_COLUMNS
        ))
        .bind(user_id)
        .bind(news_id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get favorite by pair")?;

        row.map(|r| row_to_favorite(&r)).transpose()
    }

    async fn exists(&self, user_id: i64, news_id: i64) -> Result<bool> {
        Ok(self.get_by_user_and_news(user_id, news_id).await?.is_some())
    }

    async fn remove(&self, id: i64) -> Result<Option<Favorite>> {
        let existing = match self.get(id).await? {
            Some(favorite) => favorite,
            None => return Ok(None),
        };

        sqlx::query("DELETE FROM favorites WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete favorite")?;

        Ok(Some(existing))
    }

    async fn remove_by_user_and_news(
        &self,
        user_id: i64,
        news_id: i64,
    ) -> Result<Option<Favorite>> {
        let existing = match self.get_by_user_and_news(user_id, news_id).await? {
            Some(favorite) => favorite,
            None => return Ok(None),
        };

        sqlx::query("DELETE FROM favorites WHERE id = ?")
            .bind(existing.id)
            .execute(&self.pool)
            .await
            .context("Failed to delete favorite")?;

        Ok(Some(existing))
    }

    async fn list_by_user(
        &self,
        user_id: i64,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<FavoriteWithNews>> {
        let rows = sqlx::query(
            r#"
            SELECT f.id, f.user_id, f.news_id, f.created_at,
                   n.id AS n_id, n.title AS n_title, n.content AS n_content,
                   n.summary AS n_summary, n.image_url AS n_image_url,
                   n.is_published AS n_is_published, n.author_id AS n_author_id,
                   n.created_at AS n_created_at, n.updated_at AS n_updated_at
            FROM favorites f
            INNER JOIN news n ON f.news_id = n.id
            WHERE f.user_id = ?
            ORDER BY f.created_at DESC, f.id DESC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .bind(skip)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list favorites")?;

        rows.iter()
            .map(|row| {
                Ok(FavoriteWithNews {
                    favorite: row_to_favorite(row)?,
                    news: row_to_joined_news(row)?,
                })
            })
            .collect()
    }

    async fn count_by_user(&self, user_id: i64) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM favorites WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .context("Failed to count favorites")?;

        Ok(row.get("count"))
    }
}

fn row_to_favorite(row: &sqlx::sqlite::SqliteRow) -> Result<Favorite> {
    Ok(Favorite {
        id: row.get("id"),
        user_id: row.get("user_id"),
        news_id: row.get("news_id"),
        created_at: row.get("created_at"),
    })
}

fn row_to_joined_news(row: &sqlx::sqlite::SqliteRow) -> Result<News> {
    Ok(News {
        id: row.get("n_id"),
        title: row.get("n_title"),
        content: row.get("n_content"),
        summary: row.get("n_summary"),
        image_url: row.get("n_image_url"),
        is_published: row.get("n_is_published"),
        author_id: row.get("n_author_id"),
        created_at: row.get("n_created_at"),
        updated_at: row.get("n_updated_at"),
    })
}
