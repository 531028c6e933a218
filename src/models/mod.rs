//! Data models
//!
//! Entities persisted by the repositories (User, News, Category, Favorite),
//! their create/update input shapes, eager-load composites, and the
//! pagination envelope.

mod category;
mod favorite;
mod news;
mod paging;
mod user;

pub use category::{Category, CategoryWithCount, CreateCategoryInput, UpdateCategoryInput};
pub use favorite::{Favorite, FavoriteWithNews};
pub use news::{CreateNewsInput, CreateNewsRecord, News, NewsDetail, NewsWithAuthor, UpdateNewsInput};
pub use paging::{ListParams, PagedResult};
pub use user::{CreateUserRecord, UpdateUserRecord, User};
