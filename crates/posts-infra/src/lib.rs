//! # Posts Infrastructure
//!
//! Concrete implementations of the `PostStore` port defined in `posts-core`.
//!
//! ## Feature Flags
//!
//! - `postgres` (default) - PostgreSQL store via SeaORM. Without it only the
//!   in-memory store is built.

pub mod database;
pub mod memory;

pub use database::DatabaseConfig;
pub use memory::InMemoryPostStore;

#[cfg(feature = "postgres")]
pub use database::PostgresPostStore;
