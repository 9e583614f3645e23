use async_trait::async_trait;

use crate::domain::{Post, PostDraft, PostFilter};
use crate::error::RepoError;

/// Factory for per-request units of work over the `posts` table.
///
/// Implementations are shared process-wide; each request calls [`PostStore::begin`]
/// and works against its own [`PostUnitOfWork`].
#[async_trait]
pub trait PostStore: Send + Sync {
    /// Open a new unit of work.
    async fn begin(&self) -> Result<Box<dyn PostUnitOfWork>, RepoError>;

    /// Short backend name, reported by the health endpoint.
    fn backend(&self) -> &'static str;
}

/// A transactional session over the `posts` table.
///
/// Changes become visible to other units of work only after [`commit`](Self::commit).
/// Dropping a unit of work without committing discards its changes.
#[async_trait]
pub trait PostUnitOfWork: Send {
    /// All posts matching `filter`, ordered by ascending id.
    async fn list(&mut self, filter: &PostFilter) -> Result<Vec<Post>, RepoError>;

    async fn find_by_id(&mut self, id: i32) -> Result<Option<Post>, RepoError>;

    /// Insert with a store-assigned id.
    async fn insert(&mut self, draft: PostDraft) -> Result<Post, RepoError>;

    /// Insert under a caller-chosen id. Fails with [`RepoError::Constraint`] if the id is taken.
    async fn insert_with_id(&mut self, id: i32, draft: PostDraft) -> Result<Post, RepoError>;

    /// Replace title and body of an existing post. Fails with [`RepoError::NotFound`] if absent.
    async fn update(&mut self, id: i32, draft: PostDraft) -> Result<Post, RepoError>;

    /// Delete a post. Returns whether a row was removed.
    async fn delete(&mut self, id: i32) -> Result<bool, RepoError>;

    async fn commit(self: Box<Self>) -> Result<(), RepoError>;

    async fn rollback(self: Box<Self>) -> Result<(), RepoError>;
}
