//! Category service
//!
//! Category management over the category repository. A duplicate name is
//! detected from the store's unique constraint and mapped to a domain
//! error, so the answer holds under concurrent creation.

use crate::db::is_unique_violation;
use crate::db::repositories::{CategoryRepository, CrudRepository};
use crate::models::{
    Category, CategoryWithCount, CreateCategoryInput, ListParams, UpdateCategoryInput,
};
use anyhow::{Context, Result};
use std::sync::Arc;

/// Error types for category service operations
#[derive(Debug, thiserror::Error)]
pub enum CategoryServiceError {
    /// Category name is already taken
    #[error("Category '{0}' already exists")]
    NameExists(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Category service
pub struct CategoryService {
    category_repo: Arc<dyn CategoryRepository>,
}

impl CategoryService {
    /// Create a new category service with the given repository
    pub fn new(category_repo: Arc<dyn CategoryRepository>) -> Self {
        Self { category_repo }
    }

    /// Create a category with a unique name.
    ///
    /// # Errors
    ///
    /// - `NameExists` if a category with the name already exists, mapped
    ///   from the store's unique constraint
    /// - `InternalError` for other database errors
    pub async fn create(
        &self,
        input: CreateCategoryInput,
    ) -> Result<Category, CategoryServiceError> {
        let created = match self.category_repo.create(&input).await {
            Ok(category) => category,
            Err(e) if is_unique_violation(&e) => {
                return Err(CategoryServiceError::NameExists(input.name));
            }
            Err(e) => return Err(CategoryServiceError::InternalError(e)),
        };

        Ok(created)
    }

    /// Get a category by id
    pub async fn get(&self, id: i64) -> Result<Option<Category>, CategoryServiceError> {
        let category = self
            .category_repo
            .get(id)
            .await
            .context("Failed to get category")?;

        Ok(category)
    }

    /// Get a category by its unique name
    pub async fn get_by_name(&self, name: &str) -> Result<Option<Category>, CategoryServiceError> {
        let category = self
            .category_repo
            .get_by_name(name)
            .await
            .context("Failed to get category by name")?;

        Ok(category)
    }

    /// List categories, primary key ascending
    pub async fn get_multi(
        &self,
        params: &ListParams,
    ) -> Result<Vec<Category>, CategoryServiceError> {
        let categories = self
            .category_repo
            .get_multi(params.skip, params.limit)
            .await
            .context("Failed to list categories")?;

        Ok(categories)
    }

    /// List categories with per-category news counts, name ascending
    pub async fn list_with_news_counts(
        &self,
        params: &ListParams,
    ) -> Result<Vec<CategoryWithCount>, CategoryServiceError> {
        let listed = self
            .category_repo
            .list_with_news_counts(params.skip, params.limit)
            .await
            .context("Failed to list categories with counts")?;

        Ok(listed)
    }

    /// Apply a partial update to `target`
    pub async fn update(
        &self,
        target: &Category,
        input: UpdateCategoryInput,
    ) -> Result<Category, CategoryServiceError> {
        let updated = self
            .category_repo
            .update(target, &input)
            .await
            .context("Failed to update category")?;

        Ok(updated)
    }

    /// Delete a category; its news associations are removed, the news stay
    pub async fn remove(&self, id: i64) -> Result<Option<Category>, CategoryServiceError> {
        let removed = self
            .category_repo
            .remove(id)
            .await
            .context("Failed to delete category")?;

        Ok(removed)
    }

    /// Total number of categories
    pub async fn count(&self) -> Result<i64, CategoryServiceError> {
        let count = self
            .category_repo
            .count()
            .await
            .context("Failed to count categories")?;

        Ok(count)
    }
}
