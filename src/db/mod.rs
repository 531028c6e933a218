//! Database layer
//!
//! SQLite-backed persistence for the newswire platform:
//! - connection pool creation (`pool`)
//! - embedded code-based migrations (`migrations`)
//! - repository implementations (`repositories`)

pub mod migrations;
pub mod pool;
pub mod repositories;

pub use pool::{create_pool, create_test_pool};

/// Whether any error in the chain is a unique-constraint violation from the
/// store. Services use this to map a constraint failure onto their domain
/// error without pre-checking, so the answer is race-free.
pub fn is_unique_violation(err: &anyhow::Error) -> bool {
    err.chain()
        .filter_map(|cause| cause.downcast_ref::<sqlx::Error>())
        .any(|e| matches!(e, sqlx::Error::Database(db) if db.is_unique_violation()))
}
