//! News repository
//!
//! Database operations for news articles: the generic CRUD contract plus the
//! author-scoped, category-scoped, and search listings, eager author/category
//! loading, and many-to-many category replacement.
//!
//! Category membership is relationship metadata, not a column: it is written
//! only by `create_with_author` and `update_categories`, both of which run
//! the row write and the association writes inside one transaction. Requested
//! category ids that do not resolve to existing rows are dropped rather than
//! failing the operation.

use crate::db::repositories::CrudRepository;
use crate::models::{
    Category, CreateNewsInput, CreateNewsRecord, News, NewsDetail, NewsWithAuthor, UpdateNewsInput,
    User,
};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, SqliteConnection, SqlitePool};
use std::sync::Arc;

/// News repository trait
#[async_trait]
pub trait NewsRepository:
    CrudRepository<Entity = News, CreateInput = CreateNewsRecord, UpdateInput = UpdateNewsInput>
{
    /// Fetch one news item eagerly loaded with its author and category set
    async fn get_with_categories(&self, id: i64) -> Result<Option<NewsDetail>>;

    /// List news with author, newest first
    async fn get_multi_with_author(&self, skip: i64, limit: i64) -> Result<Vec<NewsWithAuthor>>;

    /// Insert a news row stamped with `author_id` and attach the resolvable
    /// subset of `category_ids`, all in one transaction
    async fn create_with_author(
        &self,
        input: &CreateNewsInput,
        author_id: i64,
        category_ids: &[i64],
    ) -> Result<NewsDetail>;

    /// Replace the full category set of `target`: delete every existing
    /// association, then insert the resolvable subset of `category_ids`.
    /// Both phases run in one transaction; an empty list clears all
    /// categories.
    async fn update_categories(&self, target: &News, category_ids: &[i64]) -> Result<NewsDetail>;

    /// Author-scoped listing, newest first
    async fn get_multi_by_author(
        &self,
        author_id: i64,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<News>>;

    /// Category-scoped listing with author, newest first
    async fn get_multi_by_category(
        &self,
        category_id: i64,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<NewsWithAuthor>>;

    /// Case-insensitive substring search over title and content, with
    /// author, newest first
    async fn search(&self, term: &str, skip: i64, limit: i64) -> Result<Vec<NewsWithAuthor>>;

    /// Count news rows for an author (0 when none exist)
    async fn get_count_by_author(&self, author_id: i64) -> Result<i64>;
}

/// SQLx-based news repository implementation
pub struct SqlxNewsRepository {
    pool: SqlitePool,
}

impl SqlxNewsRepository {
    /// Create a new SQLx news repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: SqlitePool) -> Arc<dyn NewsRepository> {
        Arc::new(Self::new(pool))
    }
}

const NEWS_COLUMNS: &str =
    "id, title, content, summary, image_url, is_published, author_id, created_at, updated_at";

// Joined select used by every author-eager listing; author columns are
// aliased with a u_ prefix for unambiguous row mapping.
const NEWS_WITH_AUTHOR_SELECT: &str = r#"
    SELECT n.id, n.title, n.content, n.summary, n.image_url, n.is_published,
           n.author_id, n.created_at, n.updated_at,
           u.id AS u_id, u.email AS u_email, u.name AS u_name,
           u.password_hash AS u_password_hash, u.is_active AS u_is_active,
           u.is_superuser AS u_is_superuser, u.created_at AS u_created_at,
           u.updated_at AS u_updated_at
    FROM news n
    INNER JOIN users u ON n.author_id = u.id
"#;

#[async_trait]
impl CrudRepository for SqlxNewsRepository {
    type Entity = News;
    type CreateInput = CreateNewsRecord;
    type UpdateInput = UpdateNewsInput;

    async fn get(&self, id: i64) -> Result<Option<News>> {
        let row = sqlx::query(&format!("SELECT {} FROM news WHERE id = ?", NEWS_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to get news by ID")?;

        row.map(|r| row_to_news(&r)).transpose()
    }

    async fn get_multi(&self, skip: i64, limit: i64) -> Result<Vec<News>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM news ORDER BY id LIMIT ? OFFSET ?",
            NEWS_COLUMNS
        ))
        .bind(limit)
        .bind(skip)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list news")?;

        rows.iter().map(row_to_news).collect()
    }

    async fn create(&self, input: &CreateNewsRecord) -> Result<News> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO news (title, content, summary, image_url, is_published, author_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&input.title)
        .bind(&input.content)
        .bind(&input.summary)
        .bind(&input.image_url)
        .bind(input.is_published)
        .bind(input.author_id)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .context("Failed to create news")?;

        let id = result.last_insert_rowid();

        self.get(id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("News not found after creation"))
    }

    async fn update(&self, target: &News, input: &UpdateNewsInput) -> Result<News> {
        let now = Utc::now();
        let new_title = input.title.as_ref().unwrap_or(&target.title);
        let new_content = input.content.as_ref().unwrap_or(&target.content);
        let new_summary = input.summary.clone().or_else(|| target.summary.clone());
        let new_image_url = input.image_url.clone().or_else(|| target.image_url.clone());
        let new_is_published = input.is_published.unwrap_or(target.is_published);

        sqlx::query(
            r#"
            UPDATE news
            SET title = ?, content = ?, summary = ?, image_url = ?, is_published = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(new_title)
        .bind(new_content)
        .bind(&new_summary)
        .bind(&new_image_url)
        .bind(new_is_published)
        .bind(now)
        .bind(target.id)
        .execute(&self.pool)
        .await
        .context("Failed to update news")?;

        self.get(target.id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("News not found after update"))
    }

    async fn remove(&self, id: i64) -> Result<Option<News>> {
        let existing = match self.get(id).await? {
            Some(news) => news,
            None => return Ok(None),
        };

        // Association and favorite rows go with it via ON DELETE CASCADE
        sqlx::query("DELETE FROM news WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete news")?;

        Ok(Some(existing))
    }
}

#[async_trait]
impl NewsRepository for SqlxNewsRepository {
    async fn get_with_categories(&self, id: i64) -> Result<Option<NewsDetail>> {
        let sql = format!("{} WHERE n.id = ?", NEWS_WITH_AUTHOR_SELECT);
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to get news with author")?;

        let row = match row {
            Some(row) => row,
            None => return Ok(None),
        };

        let news = row_to_news(&row)?;
        let author = row_to_joined_author(&row)?;

        let category_rows = sqlx::query(
            r#"
            SELECT c.id, c.name, c.description, c.created_at
            FROM categories c
            INNER JOIN news_categories nc ON c.id = nc.category_id
            WHERE nc.news_id = ?
            ORDER BY c.id
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to get categories for news")?;

        let categories = category_rows
            .iter()
            .map(row_to_category)
            .collect::<Result<Vec<_>>>()?;

        Ok(Some(NewsDetail {
            news,
            author,
            categories,
        }))
    }

    async fn get_multi_with_author(&self, skip: i64, limit: i64) -> Result<Vec<NewsWithAuthor>> {
        let sql = format!(
            "{} ORDER BY n.created_at DESC, n.id DESC LIMIT ? OFFSET ?",
            NEWS_WITH_AUTHOR_SELECT
        );
        let rows = sqlx::query(&sql)
            .bind(limit)
            .bind(skip)
            .fetch_all(&self.pool)
            .await
            .context("Failed to list news with author")?;

        rows.iter().map(row_to_news_with_author).collect()
    }

    async fn create_with_author(
        &self,
        input: &CreateNewsInput,
        author_id: i64,
        category_ids: &[i64],
    ) -> Result<NewsDetail> {
        let record = CreateNewsRecord::from_input(input, author_id);
        let now = Utc::now();

        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin transaction")?;

        let result = sqlx::query(
            r#"
            INSERT INTO news (title, content, summary, image_url, is_published, author_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.title)
        .bind(&record.content)
        .bind(&record.summary)
        .bind(&record.image_url)
        .bind(record.is_published)
        .bind(record.author_id)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await
        .context("Failed to create news")?;

        let id = result.last_insert_rowid();

        attach_categories(&mut tx, id, category_ids).await?;

        tx.commit().await.context("Failed to commit news creation")?;

        self.get_with_categories(id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("News not found after creation"))
    }

    async fn update_categories(&self, target: &News, category_ids: &[i64]) -> Result<NewsDetail> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin transaction")?;

        // Phase 1: clear the existing set. Phase 2 repopulates it; both
        // commit together so a crash cannot leave the entity partially
        // tagged.
        sqlx::query("DELETE FROM news_categories WHERE news_id = ?")
            .bind(target.id)
            .execute(&mut *tx)
            .await
            .context("Failed to clear news categories")?;

        attach_categories(&mut tx, target.id, category_ids).await?;

        tx.commit()
            .await
            .context("Failed to commit category replacement")?;

        self.get_with_categories(target.id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("News not found after category update"))
    }

    async fn get_multi_by_author(
        &self,
        author_id: i64,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<News>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM news WHERE author_id = ? ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?",
            NEWS_COLUMNS
        ))
        .bind(author_id)
        .bind(limit)
        .bind(skip)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list news by author")?;

        rows.iter().map(row_to_news).collect()
    }

    async fn get_multi_by_category(
        &self,
        category_id: i64,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<NewsWithAuthor>> {
        let sql = format!(
            r#"{}
            INNER JOIN news_categories nc ON n.id = nc.news_id
            WHERE nc.category_id = ?
            ORDER BY n.created_at DESC, n.id DESC
            LIMIT ? OFFSET ?"#,
            NEWS_WITH_AUTHOR_SELECT
        );
        let rows = sqlx::query(&sql)
            .bind(category_id)
            .bind(limit)
            .bind(skip)
            .fetch_all(&self.pool)
            .await
            .context("Failed to list news by category")?;

        rows.iter().map(row_to_news_with_author).collect()
    }

    async fn search(&self, term: &str, skip: i64, limit: i64) -> Result<Vec<NewsWithAuthor>> {
        let pattern = format!("%{}%", term);

        let sql = format!(
            r#"{}
            WHERE n.title LIKE ? OR n.content LIKE ?
            ORDER BY n.created_at DESC, n.id DESC
            LIMIT ? OFFSET ?"#,
            NEWS_WITH_AUTHOR_SELECT
        );
        let rows = sqlx::query(&sql)
            .bind(&pattern)
            .bind(&pattern)
            .bind(limit)
            .bind(skip)
            .fetch_all(&self.pool)
            .await
            .context("Failed to search news")?;

        rows.iter().map(row_to_news_with_author).collect()
    }

    async fn get_count_by_author(&self, author_id: i64) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM news WHERE author_id = ?")
            .bind(author_id)
            .fetch_one(&self.pool)
            .await
            .context("Failed to count news by author")?;

        Ok(row.get("count"))
    }
}

/// Resolve `category_ids` to existing category rows and insert association
/// rows for the resolvable subset. Unresolvable ids are dropped, not an
/// error.
async fn attach_categories(
    conn: &mut SqliteConnection,
    news_id: i64,
    category_ids: &[i64],
) -> Result<()> {
    if category_ids.is_empty() {
        return Ok(());
    }

    let mut requested: Vec<i64> = category_ids.to_vec();
    requested.sort_unstable();
    requested.dedup();

    let placeholders = vec!["?"; requested.len()].join(", ");
    let sql = format!(
        "SELECT id FROM categories WHERE id IN ({}) ORDER BY id",
        placeholders
    );
    let mut query = sqlx::query(&sql);
    for id in &requested {
        query = query.bind(id);
    }
    let rows = query
        .fetch_all(&mut *conn)
        .await
        .context("Failed to resolve category ids")?;

    let resolved: Vec<i64> = rows.iter().map(|r| r.get("id")).collect();

    if resolved.len() < requested.len() {
        let dropped: Vec<i64> = requested
            .iter()
            .filter(|id| !resolved.contains(id))
            .copied()
            .collect();
        tracing::warn!(news_id, ?dropped, "Dropping unresolvable category ids");
    }

    for category_id in &resolved {
        sqlx::query("INSERT OR IGNORE INTO news_categories (news_id, category_id) VALUES (?, ?)")
            .bind(news_id)
            .bind(category_id)
            .execute(&mut *conn)
            .await
            .context("Failed to attach category")?;
    }

    Ok(())
}

fn row_to_news(row: &sqlx::sqlite::SqliteRow) -> Result<News> {
    Ok(News {
        id: row.get("id"),
        title: row.get("title"),
        content: row.get("content"),
        summary: row.get("summary"),
        image_url: row.get("image_url"),
        is_published: row.get("is_published"),
        author_id: row.get("author_id"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

fn row_to_joined_author(row: &sqlx::sqlite::SqliteRow) -> Result<User> {
    Ok(User {
        id: row.get("u_id"),
        email: row.get("u_email"),
        name: row.get("u_name"),
        password_hash: row.get("u_password_hash"),
        is_active: row.get("u_is_active"),
        is_superuser: row.get("u_is_superuser"),
        created_at: row.get("u_created_at"),
        updated_at: row.get("u_updated_at"),
    })
}

fn row_to_news_with_author(row: &sqlx::sqlite::SqliteRow) -> Result<NewsWithAuthor> {
    Ok(NewsWithAuthor {
        news: row_to_news(row)?,
        author: row_to_joined_author(row)?,
    })
}

fn row_to_category(row: &sqlx::sqlite::SqliteRow) -> Result<Category> {
    Ok(Category {
        id: row.get("id"),
        name: row.get("name"),
        description: row.get("description"),
        created_at: row.get("created_at"),
    })
}
