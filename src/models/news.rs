//! News model
//!
//! The News entity, its input shapes, and the eager-load composites returned
//! by the scoped listings (`NewsWithAuthor`) and the single-item fetch
//! (`NewsDetail`, which adds the category set).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Category, User};

/// News entity representing one authored article.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct News {
    /// Unique identifier
    pub id: i64,
    /// Article title
    pub title: String,
    /// Article body
    pub content: String,
    /// Optional short summary
    pub summary: Option<String>,
    /// Optional image reference
    pub image_url: Option<String>,
    /// Publish flag
    pub is_published: bool,
    /// Authoring user (required)
    pub author_id: i64,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// A news row together with its eagerly loaded author.
#[derive(Debug, Clone, Serialize)]
pub struct NewsWithAuthor {
    pub news: News,
    pub author: User,
}

/// A news row with author and full category set.
#[derive(Debug, Clone, Serialize)]
pub struct NewsDetail {
    pub news: News,
    pub author: User,
    pub categories: Vec<Category>,
}

impl NewsDetail {
    /// Ids of the attached categories, ascending.
    pub fn category_ids(&self) -> Vec<i64> {
        let mut ids: Vec<i64> = self.categories.iter().map(|c| c.id).collect();
        ids.sort_unstable();
        ids
    }
}

/// Input for creating a news row.
///
/// Deliberately has no category-id list: category membership is relationship
/// metadata handled by `create_with_author` / `update_categories`, not a
/// column of the row.
#[derive(Debug, Clone)]
pub struct CreateNewsInput {
    pub title: String,
    pub content: String,
    pub summary: Option<String>,
    pub image_url: Option<String>,
    pub is_published: bool,
}

impl CreateNewsInput {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            summary: None,
            image_url: None,
            is_published: true,
        }
    }
}

/// Repository input for inserting a news row: the caller-facing input plus
/// the stamped author.
#[derive(Debug, Clone)]
pub struct CreateNewsRecord {
    pub title: String,
    pub content: String,
    pub summary: Option<String>,
    pub image_url: Option<String>,
    pub is_published: bool,
    pub author_id: i64,
}

impl CreateNewsRecord {
    pub fn from_input(input: &CreateNewsInput, author_id: i64) -> Self {
        Self {
            title: input.title.clone(),
            content: input.content.clone(),
            summary: input.summary.clone(),
            image_url: input.image_url.clone(),
            is_published: input.is_published,
            author_id,
        }
    }
}

/// Input for a partial news update; only `Some` fields are applied.
#[derive(Debug, Clone, Default)]
pub struct UpdateNewsInput {
    pub title: Option<String>,
    pub content: Option<String>,
    pub summary: Option<String>,
    pub image_url: Option<String>,
    pub is_published: Option<bool>,
}

impl UpdateNewsInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: String) -> Self {
        self.title = Some(title);
        self
    }

    pub fn with_content(mut self, content: String) -> Self {
        self.content = Some(content);
        self
    }

    pub fn with_summary(mut self, summary: String) -> Self {
        self.summary = Some(summary);
        self
    }

    pub fn with_image_url(mut self, image_url: String) -> Self {
        self.image_url = Some(image_url);
        self
    }

    pub fn with_is_published(mut self, is_published: bool) -> Self {
        self.is_published = Some(is_published);
        self
    }
}
