//! Newswire - data-access and service layer for a news content platform
//!
//! Users author news articles, articles belong to zero-or-more categories,
//! and users may mark articles as favorites. This crate provides the
//! persistence layer (repositories over SQLite) and the domain services a
//! REST API would call; it does not define the wire-level API itself.

pub mod config;
pub mod db;
pub mod models;
pub mod services;
