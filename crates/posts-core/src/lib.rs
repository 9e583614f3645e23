//! # Posts Core
//!
//! The domain layer of the posts API: the `Post` entity, write-payload
//! validation and the persistence ports implemented by `posts-infra`.
//! This crate has zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;
pub mod validation;

pub use error::{DomainError, RepoError};
