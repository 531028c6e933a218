//! Business logic services
//!
//! Stateless services layered over the repositories. Each service owns its
//! repositories as `Arc<dyn ...>` trait objects and exposes the operations
//! the application calls; credential handling lives here, never in the
//! repositories.

pub mod category;
pub mod favorite;
pub mod news;
pub mod password;
pub mod user;

pub use category::{CategoryService, CategoryServiceError};
pub use favorite::{FavoriteService, FavoriteServiceError};
pub use news::NewsService;
pub use user::{CreateUserInput, UpdateUserInput, UserService, UserServiceError};
