//! Favorite service
//!
//! Bookmark flows over the favorite repository. Re-favoriting maps the
//! store's pair-uniqueness violation to a domain error, and removal of an
//! absent favorite is a no-op.

use crate::db::is_unique_violation;
use crate::db::repositories::FavoriteRepository;
use crate::models::{Favorite, FavoriteWithNews, ListParams, PagedResult};
use anyhow::{Context, Result};
use std::sync::Arc;

/// Error types for favorite service operations
#[derive(Debug, thiserror::Error)]
pub enum FavoriteServiceError {
    /// The user has already favorited this news item
    #[error("News item is already favorited")]
    AlreadyFavorited,

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Favorite service
pub struct FavoriteService {
    favorite_repo: Arc<dyn FavoriteRepository>,
}

impl FavoriteService {
    /// Create a new favorite service with the given repository
    pub fn new(favorite_repo: Arc<dyn FavoriteRepository>) -> Self {
        Self { favorite_repo }
    }

    /// Record that `user_id` favorited `news_id`.
    ///
    /// # Errors
    ///
    /// - `AlreadyFavorited` if the pair already exists, mapped from the
    ///   store's pair-unique constraint
    /// - `InternalError` for other database errors, including unknown user
    ///   or news ids
    pub async fn add(&self, user_id: i64, news_id: i64) -> Result<Favorite, FavoriteServiceError> {
        let favorite = match self.favorite_repo.add(user_id, news_id).await {
            Ok(favorite) => favorite,
            Err(e) if is_unique_violation(&e) => {
                return Err(FavoriteServiceError::AlreadyFavorited);
            }
            Err(e) => return Err(FavoriteServiceError::InternalError(e)),
        };

        tracing::debug!(user_id, news_id, "Favorite added");

        Ok(favorite)
    }

    /// Remove the favorite for a (user, news) pair. Returns the removed
    /// favorite, or `None` when the pair was not favorited.
    pub async fn remove(
        &self,
        user_id: i64,
        news_id: i64,
    ) -> Result<Option<Favorite>, FavoriteServiceError> {
        let removed = self
            .favorite_repo
            .remove_by_user_and_news(user_id, news_id)
            .await
            .context("Failed to remove favorite")?;

        Ok(removed)
    }

    /// Whether `user_id` has favorited `news_id`
    pub async fn is_favorited(
        &self,
        user_id: i64,
        news_id: i64,
    ) -> Result<bool, FavoriteServiceError> {
        let exists = self
            .favorite_repo
            .exists(user_id, news_id)
            .await
            .context("Failed to check favorite")?;

        Ok(exists)
    }

    /// List a user's favorites with the news attached, most recent first
    pub async fn list_by_user(
        &self,
        user_id: i64,
        params: &ListParams,
    ) -> Result<Vec<FavoriteWithNews>, FavoriteServiceError> {
        let favorites = self
            .favorite_repo
            .list_by_user(user_id, params.skip, params.limit)
            .await
            .context("Failed to list favorites")?;

        Ok(favorites)
    }

    /// One page of a user's favorites together with the user's total
    pub async fn get_page_by_user(
        &self,
        user_id: i64,
        params: &ListParams,
    ) -> Result<PagedResult<FavoriteWithNews>, FavoriteServiceError> {
        let total = self
            .favorite_repo
            .count_by_user(user_id)
            .await
            .context("Failed to count favorites")?;
        let items = self
            .favorite_repo
            .list_by_user(user_id, params.skip, params.limit)
            .await
            .context("Failed to list favorites")?;

        Ok(PagedResult::new(items, total, params))
    }

    /// Count a user's favorites
    pub async fn count_by_user(&self, user_id: i64) -> Result<i64, FavoriteServiceError> {
        let count = self
            .favorite_repo
            .count_by_user(user_id)
            .await
            .context("Failed to count favorites")?;

        Ok(count)
    }
}
