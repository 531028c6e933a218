//! Favorite model
//!
//! A favorite records that a user bookmarked a news item. The (user, news)
//! pair is unique at the store level.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::News;

/// Favorite entity: one user/news bookmark.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Favorite {
    pub id: i64,
    pub user_id: i64,
    pub news_id: i64,
    pub created_at: DateTime<Utc>,
}

/// A favorite with the favorited news item attached.
#[derive(Debug, Clone, Serialize)]
pub struct FavoriteWithNews {
    pub favorite: Favorite,
    pub news: News,
}
