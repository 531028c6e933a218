//! News service
//!
//! Article operations layered over the news repository: authored creation,
//! category replacement, the scoped listings, search, and the paginated
//! author page that combines a count with a window of rows.

use crate::db::repositories::{CrudRepository, NewsRepository};
use crate::models::{
    CreateNewsInput, ListParams, News, NewsDetail, NewsWithAuthor, PagedResult, UpdateNewsInput,
};
use anyhow::{Context, Result};
use std::sync::Arc;

/// News service for article management
pub struct NewsService {
    news_repo: Arc<dyn NewsRepository>,
}

impl NewsService {
    /// Create a new news service with the given repository
    pub fn new(news_repo: Arc<dyn NewsRepository>) -> Self {
        Self { news_repo }
    }

    /// Get a news item by id, without relationships
    pub async fn get(&self, id: i64) -> Result<Option<News>> {
        self.news_repo.get(id).await
    }

    /// Get a news item with its author and category set
    pub async fn get_with_categories(&self, id: i64) -> Result<Option<NewsDetail>> {
        self.news_repo.get_with_categories(id).await
    }

    /// List news with authors, newest first
    pub async fn get_multi_with_author(
        &self,
        params: &ListParams,
    ) -> Result<Vec<NewsWithAuthor>> {
        self.news_repo
            .get_multi_with_author(params.skip, params.limit)
            .await
    }

    /// Publish a news item on behalf of `author_id`, attaching the
    /// resolvable subset of `category_ids`.
    pub async fn create_with_author(
        &self,
        input: &CreateNewsInput,
        author_id: i64,
        category_ids: &[i64],
    ) -> Result<NewsDetail> {
        let detail = self
            .news_repo
            .create_with_author(input, author_id, category_ids)
            .await
            .context("Failed to create news")?;

        tracing::info!(news_id = detail.news.id, author_id, "News created");

        Ok(detail)
    }

    /// Apply a partial update to the scalar fields of `target`
    pub async fn update(&self, target: &News, input: &UpdateNewsInput) -> Result<News> {
        self.news_repo.update(target, input).await
    }

    /// Replace the full category set of `target`; an empty list clears it
    pub async fn update_categories(
        &self,
        target: &News,
        category_ids: &[i64],
    ) -> Result<NewsDetail> {
        self.news_repo.update_categories(target, category_ids).await
    }

    /// Delete a news item, returning it as it existed
    pub async fn remove(&self, id: i64) -> Result<Option<News>> {
        self.news_repo.remove(id).await
    }

    /// List an author's news, newest first
    pub async fn get_multi_by_author(
        &self,
        author_id: i64,
        params: &ListParams,
    ) -> Result<Vec<News>> {
        self.news_repo
            .get_multi_by_author(author_id, params.skip, params.limit)
            .await
    }

    /// List news in a category with authors, newest first
    pub async fn get_multi_by_category(
        &self,
        category_id: i64,
        params: &ListParams,
    ) -> Result<Vec<NewsWithAuthor>> {
        self.news_repo
            .get_multi_by_category(category_id, params.skip, params.limit)
            .await
    }

    /// Case-insensitive substring search over title and content
    pub async fn search(&self, term: &str, params: &ListParams) -> Result<Vec<NewsWithAuthor>> {
        self.news_repo.search(term, params.skip, params.limit).await
    }

    /// Count an author's news
    pub async fn get_count_by_author(&self, author_id: i64) -> Result<i64> {
        self.news_repo.get_count_by_author(author_id).await
    }

    /// One page of an author's news together with the author's total, so a
    /// caller can render pagination controls from a single call.
    pub async fn get_page_by_author(
        &self,
        author_id: i64,
        params: &ListParams,
    ) -> Result<PagedResult<News>> {
        let total = self.news_repo.get_count_by_author(author_id).await?;
        let items = self
            .news_repo
            .get_multi_by_author(author_id, params.skip, params.limit)
            .await?;

        Ok(PagedResult::new(items, total, params))
    }
}
