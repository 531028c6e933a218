//! Database repositories
//!
//! Repository pattern implementations for database access. The generic CRUD
//! contract lives in `base`; each per-entity repository trait extends it with
//! the scoped queries that entity needs.

pub mod base;
pub mod category;
pub mod favorite;
pub mod news;
pub mod user;

pub use base::CrudRepository;
pub use category::{CategoryRepository, SqlxCategoryRepository};
pub use favorite::{FavoriteRepository, SqlxFavoriteRepository};
pub use news::{NewsRepository, SqlxNewsRepository};
pub use user::{SqlxUserRepository, UserRepository};
